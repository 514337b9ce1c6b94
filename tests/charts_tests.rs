mod common;

use std::io::Cursor;

use common::{GRAPH_BODY, RecordingSurface, StubBackend};
use sheweldo::analytics::logger::EventLog;
use sheweldo::api::Endpoints;
use sheweldo::charts::{ChartFilters, ChartRenderer, ChartStyle};
use sheweldo::cli::filter_session;
use sheweldo::config::EndpointVariant;

const GRAPH: &str = "/api/graphs/employee";

fn renderer() -> ChartRenderer<RecordingSurface> {
    ChartRenderer::new(
        RecordingSurface::default(),
        ChartStyle::default(),
        EventLog::disabled(),
    )
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

#[test]
fn refresh_draws_bar_and_pie() {
    let backend = StubBackend::new().respond(200, GRAPH_BODY);
    let mut renderer = renderer();
    assert!(!renderer.has_charts());

    let stats = renderer
        .refresh(&backend, GRAPH, &ChartFilters::new())
        .unwrap();

    assert_eq!(stats.current, Some(1500.0));
    assert!(renderer.has_charts());
    let surface = renderer.surface();
    assert_eq!(surface.live.len(), 2);

    let bar = &surface.bars[0];
    assert_eq!(bar.labels, vec!["0", "1000", "2000"]);
    assert_eq!(bar.counts, vec![3, 7, 1]);
    assert_eq!(bar.highlight, Some(1));
    assert_eq!(bar.colors, vec!["#4b4b4b", "#7b63b8", "#4b4b4b"]);
    assert_eq!((bar.x_title, bar.y_title), ("Salary Range", "No. of People"));

    let pie = &surface.pies[0];
    assert_eq!(pie.labels, ["Well Compensated", "Poorly Compensated"]);
    assert_eq!(pie.counts, [6, 5]);
    assert_eq!(pie.colors, ["#7b63b8".to_string(), "#4b4b4b".to_string()]);
}

#[test]
fn repeated_redraws_keep_one_live_instance_each() {
    let backend = StubBackend::new()
        .respond(200, GRAPH_BODY)
        .respond(200, GRAPH_BODY)
        .respond(200, GRAPH_BODY);
    let mut renderer = renderer();

    for _ in 0..3 {
        renderer
            .refresh(&backend, GRAPH, &ChartFilters::new())
            .unwrap();
    }

    let surface = renderer.surface();
    assert_eq!(surface.live.len(), 2);
    assert_eq!(surface.bars.len(), 3);
    assert_eq!(surface.destroyed, 4);
}

#[test]
fn filters_become_query_string() {
    let backend = StubBackend::new().respond(200, GRAPH_BODY);
    let mut renderer = renderer();
    let filters = ChartFilters::new()
        .with("industry", Some("technology"))
        .unwrap()
        .with("gender", Some(""))
        .unwrap()
        .with("range_steps", Some("5000"))
        .unwrap();

    renderer.refresh(&backend, GRAPH, &filters).unwrap();

    assert_eq!(
        backend.paths(),
        vec!["/api/graphs/employee?industry=technology&range_steps=5000"]
    );
}

#[test]
fn failed_fetch_keeps_previous_charts_and_logs() {
    let dir = tempfile::tempdir().unwrap();
    let log = EventLog::at(dir.path().join("events.jsonl"));
    let backend = StubBackend::new()
        .respond(200, GRAPH_BODY)
        .respond(500, r#"{"error": "boom"}"#)
        .fail("connection reset");
    let mut renderer = ChartRenderer::new(RecordingSurface::default(), ChartStyle::default(), log.clone());

    renderer.refresh(&backend, GRAPH, &ChartFilters::new()).unwrap();
    assert!(renderer.refresh(&backend, GRAPH, &ChartFilters::new()).is_err());
    assert!(renderer.refresh(&backend, GRAPH, &ChartFilters::new()).is_err());

    let surface = renderer.surface();
    assert_eq!(surface.bars.len(), 1);
    assert_eq!(surface.live.len(), 2);
    assert_eq!(surface.destroyed, 0);

    let outcomes: Vec<_> = log.read_all().into_iter().map(|e| e.outcome).collect();
    assert_eq!(outcomes, vec!["fetch_failed", "fetch_failed"]);
}

#[test]
fn empty_response_draws_empty_charts() {
    let backend = StubBackend::new().respond(200, r#"{"bar_graph": [], "pie_graph": []}"#);
    let mut renderer = renderer();

    renderer.refresh(&backend, GRAPH, &ChartFilters::new()).unwrap();

    let surface = renderer.surface();
    assert_eq!(surface.bars[0].highlight, None);
    assert!(surface.bars[0].labels.is_empty());
    assert_eq!(surface.pies[0].counts, [0, 0]);
}

#[test]
fn company_benchmark_highlights_company_average() {
    let body = r#"{
        "bar_graph": [{"range_start": 0, "count": 1}, {"range_start": 5000, "count": 2}],
        "current_avg": 6200.0,
        "pie_graph": [{"is_well_compensated": true, "count": 3}]
    }"#;
    let backend = StubBackend::new().respond(200, body);
    let endpoints = Endpoints::for_variant(EndpointVariant::Primary);
    let mut renderer = renderer();

    let path = endpoints.company_graph("abc");
    let stats = renderer
        .refresh(&backend, &path, &ChartFilters::new())
        .unwrap();

    assert_eq!(stats.current, Some(6200.0));
    assert_eq!(backend.paths(), vec!["/api/companies/abc"]);
    assert_eq!(renderer.surface().bars[0].highlight, Some(1));
    assert_eq!(renderer.surface().pies[0].counts, [3, 0]);
}

// ---------------------------------------------------------------------------
// Interactive session
// ---------------------------------------------------------------------------

#[test]
fn filter_session_applies_edits_on_apply() {
    let backend = StubBackend::new()
        .respond(200, GRAPH_BODY)
        .respond(200, GRAPH_BODY);
    let mut renderer = renderer();
    let mut filters = ChartFilters::new();
    let input = Cursor::new("department=technology_it\nbogus=1\napply\nquit\nrange_steps=10\n");

    let refreshes = filter_session(input, &mut renderer, &backend, GRAPH, &mut filters);

    assert_eq!(refreshes, 2);
    assert_eq!(
        backend.paths(),
        vec![
            "/api/graphs/employee",
            "/api/graphs/employee?department=technology_it",
        ]
    );
    assert_eq!(filters.range_steps, "");
    assert_eq!(renderer.surface().live.len(), 2);
}

#[test]
fn filter_session_reset_clears_filters() {
    let backend = StubBackend::new()
        .respond(200, GRAPH_BODY)
        .respond(200, GRAPH_BODY);
    let mut renderer = renderer();
    let mut filters = ChartFilters::new().with("gender", Some("male")).unwrap();
    let input = Cursor::new("reset\napply\n");

    filter_session(input, &mut renderer, &backend, GRAPH, &mut filters);

    assert_eq!(filters, ChartFilters::new());
    assert_eq!(backend.paths()[1], "/api/graphs/employee");
}

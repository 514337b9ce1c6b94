//! Chart renderer for the salary distribution and compensation split.
//!
//! [`ChartFilters`] become the query string of the graph endpoint. The
//! response is shaped into a [`BarChart`] (one bar per salary bucket, the
//! caller's bucket highlighted) and a two-slice [`PieChart`]. A
//! [`ChartRenderer`] owns the live chart handles of one [`ChartSurface`]
//! and destroys them before every redraw.

pub mod filters;

use crate::analytics::logger::{ClientEvent, EventLog};
use crate::api::{self, Backend, FetchError};
use crate::config::schema::ChartsConfig;
use crate::models::{BarBucket, GraphStats, PieEntry};

pub use filters::{ChartFilters, UnknownFilter};

pub const X_AXIS_TITLE: &str = "Salary Range";
pub const Y_AXIS_TITLE: &str = "No. of People";
pub const WELL_COMPENSATED: &str = "Well Compensated";
pub const POORLY_COMPENSATED: &str = "Poorly Compensated";

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

/// Colors applied to both charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartStyle {
    pub highlight_color: String,
    pub base_color: String,
}

impl ChartStyle {
    pub fn from_config(config: &ChartsConfig) -> Self {
        Self {
            highlight_color: config.highlight_color.clone(),
            base_color: config.base_color.clone(),
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from_config(&ChartsConfig::default())
    }
}

/// A bar chart ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub labels: Vec<String>,
    pub counts: Vec<u64>,
    /// One color per bar.
    pub colors: Vec<String>,
    pub highlight: Option<usize>,
    pub x_title: &'static str,
    pub y_title: &'static str,
}

/// A two-slice pie chart: well compensated first, poorly compensated second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieChart {
    pub labels: [&'static str; 2],
    pub counts: [u64; 2],
    pub colors: [String; 2],
}

impl PieChart {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Index of the bucket holding `current`: the one with the greatest
/// `range_start` not above it. Falls back to the last bucket when none
/// qualifies or there is no reference value; `None` only for no buckets.
pub fn highlight_index(buckets: &[BarBucket], current: Option<f64>) -> Option<usize> {
    if buckets.is_empty() {
        return None;
    }

    let qualifying = current.and_then(|current| {
        buckets
            .iter()
            .enumerate()
            .filter(|(_, b)| b.range_start <= current)
            .fold(None, |best: Option<(usize, f64)>, (i, b)| match best {
                Some((_, start)) if start >= b.range_start => best,
                _ => Some((i, b.range_start)),
            })
            .map(|(i, _)| i)
    });

    qualifying.or(Some(buckets.len() - 1))
}

/// Render a bucket start the way a JS number prints.
pub fn format_range_start(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Shape the bar graph.
pub fn bar_chart(stats: &GraphStats, style: &ChartStyle) -> BarChart {
    let highlight = highlight_index(&stats.bar_graph, stats.current);
    let colors = (0..stats.bar_graph.len())
        .map(|i| {
            if Some(i) == highlight {
                style.highlight_color.clone()
            } else {
                style.base_color.clone()
            }
        })
        .collect();

    BarChart {
        labels: stats
            .bar_graph
            .iter()
            .map(|b| format_range_start(b.range_start))
            .collect(),
        counts: stats.bar_graph.iter().map(|b| b.count).collect(),
        colors,
        highlight,
        x_title: X_AXIS_TITLE,
        y_title: Y_AXIS_TITLE,
    }
}

/// Shape the pie graph. Missing categories count as zero.
pub fn pie_chart(entries: &[PieEntry], style: &ChartStyle) -> PieChart {
    let count_for = |flag: bool| {
        entries
            .iter()
            .filter(|e| e.is_well_compensated == flag)
            .map(|e| e.count)
            .sum::<u64>()
    };

    PieChart {
        labels: [WELL_COMPENSATED, POORLY_COMPENSATED],
        counts: [count_for(true), count_for(false)],
        colors: [style.highlight_color.clone(), style.base_color.clone()],
    }
}

// ---------------------------------------------------------------------------
// Surface and renderer
// ---------------------------------------------------------------------------

/// Something charts can be drawn on.
///
/// Every drawn chart yields a handle; handing it back to [`destroy`]
/// removes that chart from the surface.
///
/// [`destroy`]: ChartSurface::destroy
pub trait ChartSurface {
    type Handle;

    fn draw_bar(&mut self, chart: &BarChart) -> Self::Handle;
    fn draw_pie(&mut self, chart: &PieChart) -> Self::Handle;
    fn destroy(&mut self, handle: Self::Handle);
}

/// Owns the live charts of one surface.
///
/// At most one bar chart and one pie chart are live at any time: the
/// previous instances are destroyed before new ones are drawn.
pub struct ChartRenderer<S: ChartSurface> {
    surface: S,
    style: ChartStyle,
    bar: Option<S::Handle>,
    pie: Option<S::Handle>,
    log: EventLog,
}

impl<S: ChartSurface> ChartRenderer<S> {
    pub fn new(surface: S, style: ChartStyle, log: EventLog) -> Self {
        Self {
            surface,
            style,
            bar: None,
            pie: None,
            log,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn has_charts(&self) -> bool {
        self.bar.is_some() || self.pie.is_some()
    }

    /// Replace both charts with ones built from `stats`.
    pub fn redraw(&mut self, stats: &GraphStats) {
        self.clear();

        let bar = bar_chart(stats, &self.style);
        let pie = pie_chart(&stats.pie_graph, &self.style);
        self.bar = Some(self.surface.draw_bar(&bar));
        self.pie = Some(self.surface.draw_pie(&pie));
    }

    /// Destroy the live charts, if any.
    pub fn clear(&mut self) {
        if let Some(handle) = self.bar.take() {
            self.surface.destroy(handle);
        }
        if let Some(handle) = self.pie.take() {
            self.surface.destroy(handle);
        }
    }

    /// Fetch `endpoint` with `filters` and redraw.
    ///
    /// A failed fetch is logged and leaves the current charts in place.
    pub fn refresh(
        &mut self,
        backend: &dyn Backend,
        endpoint: &str,
        filters: &ChartFilters,
    ) -> Result<GraphStats, FetchError> {
        let path = filters.apply_to(endpoint);
        match api::fetch_json::<GraphStats>(backend, &path) {
            Ok(stats) => {
                self.redraw(&stats);
                Ok(stats)
            }
            Err(e) => {
                eprintln!("Error fetching data: {e}");
                self.log
                    .record(&ClientEvent::new("charts", "fetch_failed").with_detail(e.to_string()));
                Err(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};

use sheweldo::api::{ApiResponse, Backend, TransportError};
use sheweldo::charts::{BarChart, ChartSurface, PieChart};

/// One request seen by [`StubBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

/// Backend that replays queued responses and records every call.
#[derive(Default)]
pub struct StubBackend {
    responses: RefCell<VecDeque<Result<ApiResponse, TransportError>>>,
    calls: RefCell<Vec<Call>>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.push(Ok(ApiResponse::new(status, body)))
    }

    pub fn respond_with(self, response: ApiResponse) -> Self {
        self.push(Ok(response))
    }

    pub fn fail(self, reason: &str) -> Self {
        self.push(Err(TransportError::Request {
            url: "stub".to_string(),
            reason: reason.to_string(),
        }))
    }

    fn push(self, response: Result<ApiResponse, TransportError>) -> Self {
        self.responses.borrow_mut().push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.path.clone()).collect()
    }

    fn next(&self, call: Call) -> Result<ApiResponse, TransportError> {
        let path = call.path.clone();
        self.calls.borrow_mut().push(call);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Request {
                    url: path,
                    reason: "no stubbed response".to_string(),
                })
            })
    }
}

impl Backend for StubBackend {
    fn get(&self, path: &str) -> Result<ApiResponse, TransportError> {
        self.next(Call {
            method: "GET",
            path: path.to_string(),
            body: None,
        })
    }

    fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, TransportError> {
        self.next(Call {
            method: "POST",
            path: path.to_string(),
            body: Some(body.clone()),
        })
    }
}

/// Chart surface that keeps drawn charts in memory.
#[derive(Default)]
pub struct RecordingSurface {
    next: u32,
    pub live: BTreeSet<u32>,
    pub bars: Vec<BarChart>,
    pub pies: Vec<PieChart>,
    pub destroyed: usize,
}

impl RecordingSurface {
    fn issue(&mut self) -> u32 {
        self.next += 1;
        self.live.insert(self.next);
        self.next
    }
}

impl ChartSurface for RecordingSurface {
    type Handle = u32;

    fn draw_bar(&mut self, chart: &BarChart) -> u32 {
        self.bars.push(chart.clone());
        self.issue()
    }

    fn draw_pie(&mut self, chart: &PieChart) -> u32 {
        self.pies.push(chart.clone());
        self.issue()
    }

    fn destroy(&mut self, handle: u32) {
        assert!(self.live.remove(&handle), "handle {handle} destroyed twice");
        self.destroyed += 1;
    }
}

pub const GRAPH_BODY: &str = r#"{
    "bar_graph": [
        {"range_start": 0, "count": 3},
        {"range_start": 1000, "count": 7},
        {"range_start": 2000, "count": 1}
    ],
    "current": 1500,
    "pie_graph": [
        {"is_well_compensated": 1, "count": 6},
        {"is_well_compensated": 0, "count": 5}
    ]
}"#;

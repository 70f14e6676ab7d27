//! Scripted upstream used by the fetch and precompute tests.

use aqi_core::{
    error::{Result, UpstreamError},
    hourly::HourlyPayload,
    source::{HourlyRequest, HourlySource},
};
use async_trait::async_trait;
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

/// Hands out queued responses in order, then repeats `fallback` forever.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<HourlyPayload>>>,
    fallback: Result<HourlyPayload>,
    calls: AtomicUsize,
    requests: Mutex<Vec<HourlyRequest>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<HourlyPayload>>, fallback: Result<HourlyPayload>) -> Self {
        ScriptedSource {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always(response: Result<HourlyPayload>) -> Self {
        ScriptedSource::new(Vec::new(), response)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HourlyRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HourlySource for ScriptedSource {
    async fn fetch_hourly(&self, request: &HourlyRequest) -> Result<HourlyPayload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

pub fn status(code: u16) -> Result<HourlyPayload> {
    Err(UpstreamError::Status { status: code })
}

/// Two full days of PM2.5 at a constant concentration.
pub fn two_days(date_a: &str, date_b: &str, pm25: f64) -> HourlyPayload {
    let time = [date_a, date_b]
        .iter()
        .flat_map(|date| (0..24).map(move |h| format!("{date}T{h:02}:00")))
        .collect();
    HourlyPayload::new(time).with_series("pm2_5", vec![Some(pm25); 48])
}

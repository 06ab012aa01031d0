//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::f64::consts::FRAC_PI_2;
use std::sync::Mutex;

use smartgrid_dash::client::{EvaluationSource, FetchError};
use smartgrid_dash::model::{EvaluationResponse, EvaluationResult, Label};

/// A day-long episode at 15-minute resolution (96 steps).
///
/// Load follows a morning/evening double peak, solar a midday bell, wind a
/// slow ramp. Actions alternate charge/discharge every 24 steps, giving
/// three sign changes (one full cycle).
pub fn sample_result() -> EvaluationResult {
    let n = 96_u64;
    let hours: Vec<f64> = (0..n).map(|t| t as f64 / 4.0).collect();

    let load = hours
        .iter()
        .map(|&h| {
            900.0
                + 250.0 * ((h - 8.0) / 3.0).cos().max(0.0)
                + 300.0 * ((h - 19.0) / 2.0).cos().max(0.0)
        })
        .collect::<Vec<_>>();
    let solar = hours
        .iter()
        .map(|&h| {
            if (6.0..18.0).contains(&h) {
                400.0 * ((h - 12.0) / 6.0 * FRAC_PI_2).cos()
            } else {
                0.0
            }
        })
        .collect::<Vec<_>>();
    let wind = hours.iter().map(|&h| 150.0 + 5.0 * h).collect::<Vec<_>>();
    let net_grid = load
        .iter()
        .zip(&solar)
        .zip(&wind)
        .map(|((l, s), w)| l - s - w)
        .collect();
    let actions: Vec<f64> = (0..n)
        .map(|t| if (t / 24) % 2 == 0 { 0.6 } else { -0.6 })
        .collect();
    let soc = (0..n).map(|t| 0.3 + 0.4 * (t as f64 / n as f64)).collect();

    EvaluationResult {
        timestamps: (0..n).map(Label::from).collect(),
        load,
        solar,
        wind,
        net_grid,
        soc,
        actions,
    }
}

/// Source that replays scripted outcomes in order and counts calls.
pub struct ScriptedSource {
    outcomes: Mutex<VecDeque<Result<EvaluationResponse, FetchError>>>,
    calls: Mutex<usize>,
}

impl ScriptedSource {
    /// Creates a source that returns `outcomes` one per call.
    pub fn new(outcomes: Vec<Result<EvaluationResponse, FetchError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(0),
        }
    }

    /// Number of `fetch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.lock().map(|c| *c).unwrap_or(0)
    }
}

impl EvaluationSource for ScriptedSource {
    fn fetch(&self) -> Result<EvaluationResponse, FetchError> {
        if let Ok(mut c) = self.calls.lock() {
            *c += 1;
        }
        self.outcomes
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or_else(|| {
                Err(FetchError::Transport {
                    url: "scripted".into(),
                    message: "script exhausted".into(),
                })
            })
    }
}

/// Transport failure as produced by an unreachable server.
pub fn connection_refused() -> FetchError {
    FetchError::Transport {
        url: "http://127.0.0.1:1/api/evaluate".into(),
        message: "Connection Failed: Connect error: Connection refused (os error 111)".into(),
    }
}

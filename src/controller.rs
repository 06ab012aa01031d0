//! Dashboard controller: evaluation lifecycle, statistics and chart updates.
//!
//! [`Dashboard`] owns the charts and the busy state. Each trigger is issued a
//! [`RequestTicket`]; only the outcome carrying the newest ticket is applied,
//! so overlapping requests can never leave the charts showing an older
//! response than the latest one requested.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, error, info, warn};

use crate::charts::Charts;
use crate::client::{EvaluationSource, FetchError};
use crate::model::{EvaluationResponse, EvaluationResult};
use crate::stats::SummaryStats;

/// Notice shown for every transport or decoding failure.
pub const CONNECTION_FAILURE_NOTICE: &str = "Failed to connect to simulation server.";

/// Result of one request as delivered to the controller.
pub type Outcome = Result<EvaluationResponse, FetchError>;

/// Busy state; the header indicator mirrors it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No request outstanding.
    Idle,
    /// Waiting for the newest request to settle.
    Evaluating,
}

/// Sequence number of one evaluation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Raw sequence number (starts at 1).
    pub(crate) fn seq(self) -> u64 {
        self.0
    }
}

/// What [`Dashboard::complete`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Statistics computed and charts redrawn.
    Rendered,
    /// The server reported an error; a notice was raised.
    Rejected,
    /// Transport or decoding failed; the generic notice was raised.
    Failed,
    /// A newer request superseded this one; nothing changed.
    Stale,
}

/// Controller state: charts, statistics, busy phase and pending notices.
#[derive(Debug)]
pub struct Dashboard {
    charts: Charts,
    stats: Option<SummaryStats>,
    last_result: Option<EvaluationResult>,
    phase: Phase,
    issued: u64,
    notices: VecDeque<String>,
}

impl Dashboard {
    /// Creates the dashboard with empty charts, idle.
    pub fn initialize() -> Self {
        Self {
            charts: Charts::initialize(),
            stats: None,
            last_result: None,
            phase: Phase::Idle,
            issued: 0,
            notices: VecDeque::new(),
        }
    }

    /// Marks a new request in flight and returns its ticket.
    pub fn begin_evaluation(&mut self) -> RequestTicket {
        self.issued += 1;
        self.phase = Phase::Evaluating;
        debug!(seq = self.issued, "evaluation started");
        RequestTicket(self.issued)
    }

    /// Applies the outcome of the request identified by `ticket`.
    ///
    /// Outcomes of superseded tickets are dropped without touching any state.
    pub fn complete(&mut self, ticket: RequestTicket, outcome: Outcome) -> Settlement {
        if ticket.seq() != self.issued {
            debug!(seq = ticket.seq(), newest = self.issued, "discarding stale evaluation");
            return Settlement::Stale;
        }
        self.phase = Phase::Idle;

        match outcome {
            Ok(EvaluationResponse::Completed(result)) => {
                self.apply(result);
                Settlement::Rendered
            }
            Ok(EvaluationResponse::Failed(message)) => {
                warn!(seq = ticket.seq(), %message, "evaluation rejected by server");
                self.notify(message);
                Settlement::Rejected
            }
            Err(e) => {
                error!(seq = ticket.seq(), error = %e, "evaluation request failed");
                self.notify(CONNECTION_FAILURE_NOTICE.to_string());
                Settlement::Failed
            }
        }
    }

    /// Runs one blocking evaluation against `source`.
    pub fn run_evaluation<S: EvaluationSource + ?Sized>(&mut self, source: &S) -> Settlement {
        let ticket = self.begin_evaluation();
        let outcome = source.fetch();
        self.complete(ticket, outcome)
    }

    fn apply(&mut self, result: EvaluationResult) {
        let misaligned = result.misaligned_series();
        if !misaligned.is_empty() {
            warn!(
                timesteps = result.len(),
                series = ?misaligned,
                "series length differs from timestamps"
            );
        }

        let stats = SummaryStats::from_result(&result);
        self.charts.render(&result);
        info!(
            timesteps = result.len(),
            peak_load = %stats.peak_load_text(),
            renewable_purity = %stats.renewable_purity_text(),
            cycles = stats.battery_cycles,
            "evaluation rendered"
        );
        self.stats = Some(stats);
        self.last_result = Some(result);
    }

    fn notify(&mut self, message: String) {
        self.notices.push_back(message);
    }

    /// The three charts.
    pub fn charts(&self) -> &Charts {
        &self.charts
    }

    /// Statistics of the last rendered result.
    pub fn stats(&self) -> Option<&SummaryStats> {
        self.stats.as_ref()
    }

    /// Last rendered result.
    pub fn last_result(&self) -> Option<&EvaluationResult> {
        self.last_result.as_ref()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` while a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Evaluating
    }

    /// Notice currently shown, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notices.front().map(String::as_str)
    }

    /// Number of notices waiting to be dismissed.
    pub fn pending_notices(&self) -> usize {
        self.notices.len()
    }

    /// Dismisses the notice currently shown.
    pub fn dismiss_notice(&mut self) -> Option<String> {
        self.notices.pop_front()
    }
}

/// Runs requests on background threads and hands outcomes back by channel.
pub struct Evaluator {
    source: Arc<dyn EvaluationSource>,
    tx: Sender<(RequestTicket, Outcome)>,
    rx: Receiver<(RequestTicket, Outcome)>,
}

impl Evaluator {
    /// Creates an evaluator for `source`.
    pub fn new(source: Arc<dyn EvaluationSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { source, tx, rx }
    }

    /// Starts a request for `ticket` on a new thread.
    ///
    /// A panicking source still settles the ticket, as
    /// [`FetchError::Panicked`].
    pub fn spawn(&self, ticket: RequestTicket) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| source.fetch()))
                .unwrap_or_else(|payload| Err(FetchError::Panicked(panic_message(payload))));
            // The receiver only goes away on shutdown.
            let _ = tx.send((ticket, outcome));
        });
    }

    /// Begins an evaluation on `dashboard` and starts its request.
    pub fn trigger(&self, dashboard: &mut Dashboard) -> RequestTicket {
        let ticket = dashboard.begin_evaluation();
        self.spawn(ticket);
        ticket
    }

    /// Applies every outcome that has arrived. Returns how many were applied
    /// (stale ones included).
    pub fn drain(&self, dashboard: &mut Dashboard) -> usize {
        let mut n = 0;
        while let Ok((ticket, outcome)) = self.rx.try_recv() {
            dashboard.complete(ticket, outcome);
            n += 1;
        }
        n
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(s) => *s,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map_or_else(|| "unknown panic".to_string(), |s| (*s).to_string()),
    }
}

//! Test utilities: instrumented leaf predicates
//!
//! A probe returns a fixed outcome and records how often it ran, so tests
//! can assert which branches short-circuiting skipped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{SpecError, SpecResult};
use crate::specification::Specification;

/// Shared record of which probes ran, in order.
pub type OrderLog = Arc<Mutex<Vec<&'static str>>>;

#[derive(Clone, Copy)]
enum Outcome {
    Pass,
    Fail,
    Error,
}

/// Handle on a probe's invocation count.
#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Leaf with a fixed outcome that counts its evaluations.
pub struct Probe {
    name: &'static str,
    outcome: Outcome,
    calls: CallCounter,
    log: Option<OrderLog>,
}

impl Probe {
    fn new(name: &'static str, outcome: Outcome) -> Self {
        Self {
            name,
            outcome,
            calls: CallCounter::default(),
            log: None,
        }
    }

    pub fn passing(name: &'static str) -> Self {
        Self::new(name, Outcome::Pass)
    }

    pub fn failing(name: &'static str) -> Self {
        Self::new(name, Outcome::Fail)
    }

    /// Errors with `Failed("<name> exploded")`.
    pub fn erroring(name: &'static str) -> Self {
        Self::new(name, Outcome::Error)
    }

    pub fn order_log() -> OrderLog {
        Arc::new(Mutex::new(Vec::new()))
    }

    pub fn logging_to(mut self, log: &OrderLog) -> Self {
        self.log = Some(Arc::clone(log));
        self
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

#[async_trait]
impl<T: Send + Sync> Specification<T> for Probe {
    async fn evaluate(&self, _token: &CancellationToken, _candidate: &T) -> SpecResult<bool> {
        self.calls.0.fetch_add(1, Ordering::SeqCst);
        if let Some(log) = &self.log {
            log.lock().unwrap().push(self.name);
        }
        match self.outcome {
            Outcome::Pass => Ok(true),
            Outcome::Fail => Ok(false),
            Outcome::Error => Err(SpecError::failed(format!("{} exploded", self.name))),
        }
    }

    fn describe(&self) -> String {
        self.name.to_string()
    }
}

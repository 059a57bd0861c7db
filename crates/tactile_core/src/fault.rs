//! Handler fault policy
//!
//! When a middleware fails during [`dispatch`](crate::EventProcessor::dispatch),
//! the rest of the chain is skipped and the fault is handed to a
//! [`FaultPolicy`]. Two policies ship with the crate:
//!
//! - [`ReportFaults`] (development): sends the fault to the diagnostic sink
//!   (`tracing::error!`) and swallows it.
//! - [`DeferFaults`] (production): does not log. The fault is queued and
//!   resurfaces outside the dispatching call stack when the host calls
//!   [`surface_deferred`] on the next turn of its loop.
//!
//! Which one a processor gets by default is decided by a single process-wide
//! [`FaultMode`], chosen once at startup with [`set_mode`]. Without an
//! explicit choice, debug builds run in development mode and release builds in
//! production mode.
//!
//! # Example
//!
//! ```rust
//! use tactile_core::fault::{self, FaultMode};
//!
//! fn main() {
//!     fault::set_mode(FaultMode::Production);
//!
//!     // ... each turn of the host loop:
//!     fault::surface_deferred();
//! }
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::panic;
use std::rc::Rc;
use std::sync::OnceLock;

use crate::error::DispatchError;

/// Process-wide fault handling mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultMode {
    /// Faults are reported to the diagnostic sink and swallowed
    Development,
    /// Faults are deferred and resurface outside the dispatching call stack
    Production,
}

impl FaultMode {
    /// The mode implied by the build profile
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            FaultMode::Development
        } else {
            FaultMode::Production
        }
    }
}

static FAULT_MODE: OnceLock<FaultMode> = OnceLock::new();

/// Choose the process-wide fault mode
///
/// Returns `false` if the mode was already chosen (explicitly or by a
/// processor reading the default), in which case the call has no effect.
pub fn set_mode(mode: FaultMode) -> bool {
    let accepted = FAULT_MODE.set(mode).is_ok();
    if !accepted {
        tracing::warn!(?mode, current = ?self::mode(), "fault mode already chosen");
    }
    accepted
}

/// The process-wide fault mode
pub fn mode() -> FaultMode {
    *FAULT_MODE.get_or_init(FaultMode::from_build)
}

/// Strategy deciding what happens to a middleware fault
pub trait FaultPolicy {
    /// Send a fault to the diagnostic sink
    fn report(&self, fault: &DispatchError);

    /// Queue a fault so it resurfaces outside the current call stack
    fn defer(&self, fault: DispatchError);

    /// Handle a fault raised during dispatch
    fn handle(&self, fault: DispatchError);
}

type FaultQueue = Rc<RefCell<VecDeque<DispatchError>>>;

/// Queue length at which an undrained queue is reported
pub const PENDING_WARN_THRESHOLD: usize = 64;

thread_local! {
    static DEFERRED: FaultQueue = Rc::default();
}

fn enqueue(queue: &FaultQueue, fault: DispatchError) {
    let mut queue = queue.borrow_mut();
    queue.push_back(fault);
    if queue.len() % PENDING_WARN_THRESHOLD == 0 {
        tracing::warn!(
            pending = queue.len(),
            "deferred faults are not being drained; call surface_deferred each turn"
        );
    }
}

/// Development policy: log and swallow
#[derive(Clone, Copy, Debug, Default)]
pub struct ReportFaults;

impl FaultPolicy for ReportFaults {
    fn report(&self, fault: &DispatchError) {
        tracing::error!(error = %fault, "event middleware fault");
    }

    fn defer(&self, fault: DispatchError) {
        DEFERRED.with(|queue| enqueue(queue, fault));
    }

    fn handle(&self, fault: DispatchError) {
        self.report(&fault);
    }
}

/// Production policy: queue the fault and resurface it later
#[derive(Clone)]
pub struct DeferFaults {
    queue: FaultQueue,
}

impl DeferFaults {
    /// A policy sharing this thread's deferred queue (drained by
    /// [`surface_deferred`] and [`take_deferred`])
    pub fn new() -> Self {
        Self {
            queue: DEFERRED.with(Rc::clone),
        }
    }

    /// A policy with its own queue, independent of the thread's queue
    pub fn isolated() -> Self {
        Self {
            queue: Rc::default(),
        }
    }

    /// Number of faults waiting to resurface
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Drain all queued faults without raising them
    pub fn take(&self) -> Vec<DispatchError> {
        self.queue.borrow_mut().drain(..).collect()
    }

    /// Raise the oldest queued fault as a panic, if any
    ///
    /// A fault that came from a panic is resumed with its original payload.
    pub fn surface(&self) {
        let fault = self.queue.borrow_mut().pop_front();
        if let Some(fault) = fault {
            resurface(fault);
        }
    }
}

impl Default for DeferFaults {
    fn default() -> Self {
        Self::new()
    }
}

impl FaultPolicy for DeferFaults {
    fn report(&self, fault: &DispatchError) {
        tracing::error!(error = %fault, "event middleware fault");
    }

    fn defer(&self, fault: DispatchError) {
        enqueue(&self.queue, fault);
    }

    fn handle(&self, fault: DispatchError) {
        self.defer(fault);
    }
}

fn resurface(fault: DispatchError) -> ! {
    match fault {
        DispatchError::Panicked(payload) => panic::resume_unwind(payload.into_inner()),
        other => panic!("deferred dispatch fault: {other}"),
    }
}

/// The policy for the process-wide fault mode
pub fn policy() -> Rc<dyn FaultPolicy> {
    match mode() {
        FaultMode::Development => Rc::new(ReportFaults),
        FaultMode::Production => Rc::new(DeferFaults::new()),
    }
}

/// Raise the oldest fault deferred on this thread, if any
pub fn surface_deferred() {
    DeferFaults::new().surface();
}

/// Drain the faults deferred on this thread without raising them
pub fn take_deferred() -> Vec<DispatchError> {
    DeferFaults::new().take()
}

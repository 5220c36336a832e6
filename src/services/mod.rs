//! Flows that combine the pure core with the collaborators: check
//! permissions, validate, decide the transition, then perform the request.

mod assignments;
mod pea;
mod proposals;
mod subjects;

pub use assignments::{
    AssignmentBoard, AssignmentPatch, AssignmentService, ReconcileOutcome, SyncState, STUDENTS_PARTIALLY_ASSIGNED,
};
pub use pea::{PeaService, PDF_SERVICE_UNAVAILABLE};
pub use proposals::ProposalService;
pub use subjects::{
    SubjectCreationFlow, SubjectService, SubmitOutcome, PARTIAL_FAILURE_MESSAGE, SUBJECT_ALREADY_CREATED,
};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const REQUEST_IN_FLIGHT: &str = "Ya hay una solicitud en curso, espere a que termine";

/// True for the whole duration of an in-flight create/assign request.
/// Controls bound to the action stay disabled while it is set.
#[derive(Debug, Clone, Default)]
pub struct ProcessingFlag(Arc<AtomicBool>);

impl ProcessingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processing(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// `None` when a request is already running.
    pub fn try_begin(&self) -> Option<ProcessingGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard(self.0.clone()))
    }
}

/// Clears the processing flag when dropped, on success and failure alike.
#[derive(Debug)]
pub struct ProcessingGuard(Arc<AtomicBool>);

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_blocks_second_begin_until_dropped() {
        let flag = ProcessingFlag::new();
        let guard = flag.try_begin().expect("first begin");
        assert!(flag.is_processing());
        assert!(flag.try_begin().is_none());

        drop(guard);
        assert!(!flag.is_processing());
        assert!(flag.try_begin().is_some());
    }
}

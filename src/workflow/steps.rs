use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::SubjectDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Create,
    Assign,
    Complete,
}

impl Step {
    pub fn next(self) -> Option<Step> {
        match self {
            Step::Create => Some(Step::Assign),
            Step::Assign => Some(Step::Complete),
            Step::Complete => None,
        }
    }

    pub fn previous(self) -> Option<Step> {
        match self {
            Step::Create => None,
            Step::Assign => Some(Step::Create),
            Step::Complete => Some(Step::Assign),
        }
    }
}

/// How the last process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ProcessResult {
    #[default]
    None,
    SubjectOnly { subject_id: i64 },
    CompleteProcess { subject_id: i64, tutor_id: i64 },
}

/// State of the create -> assign -> complete process.
///
/// Transitions only answer whether a move is legal and record it. Network
/// effects belong to the caller, after the decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowState {
    current: Step,
    completed: BTreeSet<Step>,
    result: ProcessResult,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowState {
    pub fn new() -> Self {
        Self {
            current: Step::Create,
            completed: BTreeSet::new(),
            result: ProcessResult::None,
        }
    }

    pub fn current(&self) -> Step {
        self.current
    }

    pub fn completed(&self) -> &BTreeSet<Step> {
        &self.completed
    }

    pub fn is_completed(&self, step: Step) -> bool {
        self.completed.contains(&step)
    }

    pub fn result(&self) -> ProcessResult {
        self.result
    }

    pub fn is_complete(&self) -> bool {
        self.current == Step::Complete
    }

    /// Guard for leaving `step` forward with the given draft.
    pub fn can_advance(step: Step, draft: &SubjectDraft) -> bool {
        match step {
            Step::Create => create_fields_present(draft),
            Step::Assign => create_fields_present(draft) && draft.tutor.is_some(),
            Step::Complete => false,
        }
    }

    /// Move forward one step if the guard for the current step holds.
    pub fn next_step(&mut self, draft: &SubjectDraft) -> bool {
        let Some(target) = self.current.next() else {
            return false;
        };

        if !Self::can_advance(self.current, draft) {
            tracing::debug!(step = ?self.current, "workflow guard rejected advance");
            return false;
        }

        self.completed.insert(self.current);
        tracing::debug!(from = ?self.current, to = ?target, "workflow advanced");
        self.current = target;
        true
    }

    /// Finish from `Assign` without a tutor. Only the create fields are required.
    pub fn skip_assignment(&mut self, draft: &SubjectDraft, subject_id: i64) -> bool {
        if self.current != Step::Assign || !create_fields_present(draft) {
            return false;
        }

        self.completed.insert(Step::Assign);
        self.current = Step::Complete;
        self.result = ProcessResult::SubjectOnly { subject_id };
        tracing::debug!(subject_id, "workflow finished without assignment");
        true
    }

    /// Step back once. The step being left and the one returned to are no
    /// longer completed. Clearing in-progress selections is up to the caller.
    pub fn previous_step(&mut self) -> bool {
        let Some(target) = self.current.previous() else {
            return false;
        };

        self.completed.remove(&self.current);
        self.completed.remove(&target);
        if self.current == Step::Complete {
            self.result = ProcessResult::None;
        }
        tracing::debug!(from = ?self.current, to = ?target, "workflow went back");
        self.current = target;
        true
    }

    /// Jump to a step already reached. Forward jumps go through `next_step`.
    pub fn go_to_step(&mut self, step: Step) -> bool {
        if step > self.current {
            return false;
        }
        if step == self.current {
            return true;
        }

        self.completed.retain(|s| *s < step);
        if self.current == Step::Complete {
            self.result = ProcessResult::None;
        }
        self.current = step;
        true
    }

    pub fn set_result(&mut self, result: ProcessResult) {
        self.result = result;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

fn create_fields_present(draft: &SubjectDraft) -> bool {
    !draft.name.trim().is_empty() && !draft.semester.trim().is_empty() && !draft.journey.trim().is_empty()
}

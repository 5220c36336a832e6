use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::app::AppContext;
use crate::authz::{self, actions, evaluate_subject_permissions};
use crate::errors::{AppError, AppResult};
use crate::models::{ApiUser, Assignment, EnrollmentState, Role, StudentCandidate, Subject};
use crate::validation::{validate_student_assignment, validate_tutor_assignment};

pub const STUDENTS_PARTIALLY_ASSIGNED: &str = "Estudiantes asignados antes del error";

/// A local change to the board, applied before the server confirms it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "assignment", rename_all = "lowercase")]
pub enum AssignmentPatch {
    Add(Assignment),
    Remove(Assignment),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SyncState {
    Synced,
    Pending { patch_id: u64, patch: AssignmentPatch },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Applied,
    /// A local patch is still unconfirmed; the snapshot would overwrite it.
    Suppressed,
}

/// Users linked to one subject, with at most one unconfirmed local change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentBoard {
    subject_id: i64,
    items: Vec<Assignment>,
    sync: SyncState,
    next_patch_id: u64,
}

impl AssignmentBoard {
    pub fn new(subject_id: i64, items: Vec<Assignment>) -> Self {
        Self {
            subject_id,
            items,
            sync: SyncState::Synced,
            next_patch_id: 1,
        }
    }

    pub fn subject_id(&self) -> i64 {
        self.subject_id
    }

    pub fn items(&self) -> &[Assignment] {
        &self.items
    }

    pub fn sync_state(&self) -> &SyncState {
        &self.sync
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.sync, SyncState::Pending { .. })
    }

    pub fn tutor(&self) -> Option<&Assignment> {
        self.items.iter().find(|a| a.role == Role::Tutor)
    }

    /// Apply a patch locally and mark it pending. Returns the patch id to
    /// confirm or reject once the server answers.
    pub fn apply_local(&mut self, patch: AssignmentPatch) -> AppResult<u64> {
        if self.is_pending() {
            return Err(AppError::bad_request("Espere a que termine la asignación en curso"));
        }

        match &patch {
            AssignmentPatch::Add(assignment) => {
                if assignment.subject_id != self.subject_id {
                    return Err(AppError::bad_request("La asignación no corresponde a esta materia"));
                }
                if self.position(assignment.user_id).is_some() {
                    return Err(AppError::bad_request("El usuario ya está asignado a esta materia"));
                }
                if assignment.role == Role::Tutor && self.tutor().is_some() {
                    return Err(AppError::bad_request("La materia ya tiene un tutor asignado"));
                }
                self.items.push(assignment.clone());
            }
            AssignmentPatch::Remove(assignment) => {
                let index = self
                    .position(assignment.user_id)
                    .ok_or_else(|| AppError::not_found("El usuario no está asignado a esta materia"))?;
                self.items.remove(index);
            }
        }

        let patch_id = self.next_patch_id;
        self.next_patch_id += 1;
        self.sync = SyncState::Pending { patch_id, patch };
        Ok(patch_id)
    }

    /// Server accepted the patch. Stale ids are ignored.
    pub fn confirm(&mut self, patch_id: u64) -> bool {
        match &self.sync {
            SyncState::Pending { patch_id: pending, .. } if *pending == patch_id => {
                self.sync = SyncState::Synced;
                true
            }
            _ => false,
        }
    }

    /// Server refused the patch: undo it locally.
    pub fn reject(&mut self, patch_id: u64) -> bool {
        let patch = match &self.sync {
            SyncState::Pending { patch_id: pending, patch } if *pending == patch_id => patch.clone(),
            _ => return false,
        };

        match patch {
            AssignmentPatch::Add(assignment) => {
                if let Some(index) = self.position(assignment.user_id) {
                    self.items.remove(index);
                }
            }
            AssignmentPatch::Remove(assignment) => self.items.push(assignment),
        }
        self.sync = SyncState::Synced;
        true
    }

    /// Replace the items with a server snapshot unless a local patch is pending.
    pub fn reconcile(&mut self, snapshot: Vec<Assignment>) -> ReconcileOutcome {
        if self.is_pending() {
            tracing::debug!(subject_id = self.subject_id, "snapshot suppressed while a patch is pending");
            return ReconcileOutcome::Suppressed;
        }
        self.items = snapshot;
        ReconcileOutcome::Applied
    }

    fn position(&self, user_id: i64) -> Option<usize> {
        self.items.iter().position(|a| a.user_id == user_id)
    }
}

/// Assigns and removes users on a shared board: the board changes at once,
/// the request runs after, and the answer confirms or reverts the change.
pub struct AssignmentService {
    ctx: AppContext,
}

impl AssignmentService {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub async fn assign_tutor(
        &self,
        board: &Arc<Mutex<AssignmentBoard>>,
        subject: &Subject,
        tutor: &ApiUser,
    ) -> AppResult<()> {
        self.require(Role::Tutor)?;
        self.check(validate_tutor_assignment(subject, tutor).into_result())?;

        let user_id = tutor
            .u_id
            .ok_or_else(|| AppError::bad_request("El tutor seleccionado no tiene identificador"))?;
        let assignment = Assignment::tutor(user_id, subject.id, tutor.u_name.clone().unwrap_or_default());
        self.sync(board, AssignmentPatch::Add(assignment)).await
    }

    /// Assign each candidate in order. Returns the ids now on the board.
    /// A failure stops the batch; earlier candidates stay assigned and are
    /// named in a warning before the error is returned.
    pub async fn assign_students(
        &self,
        board: &Arc<Mutex<AssignmentBoard>>,
        subject: &Subject,
        candidates: &[StudentCandidate],
    ) -> AppResult<Vec<i64>> {
        self.require(Role::Student)?;
        self.check(validate_student_assignment(candidates, subject).into_result())?;

        let assignments = candidates
            .iter()
            .map(|candidate| {
                let state = candidate
                    .state
                    .parse::<EnrollmentState>()
                    .map_err(|_| AppError::bad_request("Estado de inscripción inválido"))?;
                Ok(Assignment::student(candidate.u_id, subject.id, candidate.u_name.clone(), state))
            })
            .collect::<AppResult<Vec<_>>>();
        let assignments = self.check(assignments)?;

        let mut applied: Vec<Assignment> = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            if let Err(err) = self.sync(board, AssignmentPatch::Add(assignment.clone())).await {
                if !applied.is_empty() {
                    let names = applied.iter().map(|a| a.name.as_str()).collect::<Vec<_>>();
                    tracing::warn!(
                        subject_id = subject.id,
                        applied = applied.len(),
                        failed_user = assignment.user_id,
                        "student batch stopped after partial success"
                    );
                    self.ctx
                        .notifier
                        .show_warning(&format!("{STUDENTS_PARTIALLY_ASSIGNED}: {}", names.join(", ")));
                }
                return Err(err);
            }
            applied.push(assignment);
        }

        Ok(applied.into_iter().map(|a| a.user_id).collect())
    }

    pub async fn remove(&self, board: &Arc<Mutex<AssignmentBoard>>, user_id: i64) -> AppResult<()> {
        let assignment = lock(board)?
            .items()
            .iter()
            .find(|a| a.user_id == user_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("El usuario no está asignado a esta materia"))?;

        self.require(assignment.role)?;
        self.sync(board, AssignmentPatch::Remove(assignment)).await
    }

    fn require(&self, role: Role) -> AppResult<()> {
        let user = self.ctx.current_user();
        let capabilities = evaluate_subject_permissions(user.as_ref().and_then(|u| u.role));
        let result = match role {
            Role::Tutor => authz::require(capabilities.can_manage_tutors, actions::ASSIGN_TUTOR),
            _ => authz::require(capabilities.can_manage_students, actions::ASSIGN_STUDENTS),
        };
        self.check(result)
    }

    fn check<T>(&self, result: AppResult<T>) -> AppResult<T> {
        result.map_err(|err| {
            self.ctx.notifier.show_error(&err.user_message());
            err
        })
    }

    async fn sync(&self, board: &Arc<Mutex<AssignmentBoard>>, patch: AssignmentPatch) -> AppResult<()> {
        let (patch_id, payload, removing) = {
            let mut guard = lock(board)?;
            let (payload, removing) = match &patch {
                AssignmentPatch::Add(a) => (a.payload(), false),
                AssignmentPatch::Remove(a) => (a.payload(), true),
            };
            let patch_id = self.check(guard.apply_local(patch))?;
            (patch_id, payload, removing)
        };

        let response = if removing {
            self.ctx.api.remove_assignment(&payload).await
        } else {
            self.ctx.api.assign_subject_to_user(&payload).await
        };

        let mut guard = lock(board)?;
        match response {
            Ok(()) => {
                guard.confirm(patch_id);
                tracing::info!(user_id = payload.u_id, subject_id = payload.s_id, removing, "assignment synced");
                self.ctx.notifier.show_success(if removing {
                    "Asignación eliminada exitosamente"
                } else {
                    "Asignación realizada exitosamente"
                });
                Ok(())
            }
            Err(err) => {
                guard.reject(patch_id);
                tracing::warn!(user_id = payload.u_id, subject_id = payload.s_id, error = %err, "assignment reverted");
                self.ctx.notifier.show_error(&err.user_message());
                Err(err)
            }
        }
    }
}

fn lock(board: &Arc<Mutex<AssignmentBoard>>) -> AppResult<MutexGuard<'_, AssignmentBoard>> {
    board
        .lock()
        .map_err(|_| AppError::internal("assignment board lock poisoned"))
}

use serde::Serialize;
use serde_json::Value;

use crate::api::{CatalogFilters, CatalogSection};
use crate::app::AppContext;
use crate::authz::{self, actions, evaluate_subject_permissions};
use crate::errors::{AppError, AppResult, NormalizedError};
use crate::mappers::{subject_from_api, transform_subject_form_to_payload, visible_subjects};
use crate::models::{ApiSubject, AssignmentPayload, Subject, SubjectDraft, TutorSelection};
use crate::validation::{validate_subject_form, ValidationReport};
use crate::workflow::{ProcessResult, Step, WorkflowState};

use super::ProcessingFlag;

pub const PARTIAL_FAILURE_MESSAGE: &str = "Materia creada pero error al asignar tutor";
const TUTOR_REQUIRED: &str = "Debe seleccionar un tutor para continuar";
const NOT_AT_ASSIGN_STEP: &str = "Complete los datos de la materia antes de continuar";
pub const SUBJECT_ALREADY_CREATED: &str = "La materia ya fue creada; solo puede reintentar la asignación del tutor";

/// What a submit attempt ended in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SubmitOutcome {
    /// Another request is still running; nothing was sent.
    Busy,
    /// Blocked before any request: permissions, guard or validation.
    Rejected { errors: Vec<String> },
    /// The subject could not be created.
    Failed { error: NormalizedError },
    SubjectCreated { subject_id: i64 },
    Completed { subject_id: i64, tutor_id: i64 },
    /// Subject exists but the tutor assignment failed. A retry only re-sends
    /// the assignment.
    PartialFailure { subject_id: i64, error: NormalizedError },
}

/// Create-subject then assign-tutor process.
pub struct SubjectCreationFlow {
    ctx: AppContext,
    state: WorkflowState,
    draft: SubjectDraft,
    created_subject: Option<i64>,
    last_error: Option<NormalizedError>,
    processing: ProcessingFlag,
}

impl SubjectCreationFlow {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: WorkflowState::new(),
            draft: SubjectDraft::default(),
            created_subject: None,
            last_error: None,
            processing: ProcessingFlag::new(),
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn draft(&self) -> &SubjectDraft {
        &self.draft
    }

    pub fn created_subject(&self) -> Option<i64> {
        self.created_subject
    }

    pub fn last_error(&self) -> Option<&NormalizedError> {
        self.last_error.as_ref()
    }

    pub fn processing(&self) -> &ProcessingFlag {
        &self.processing
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_processing()
    }

    /// Replace the subject fields, keeping the tutor selection. Refused once
    /// the subject exists on the backend.
    pub fn set_details(
        &mut self,
        name: impl Into<String>,
        semester: impl Into<String>,
        journey: impl Into<String>,
    ) -> bool {
        if self.subject_locked() {
            return false;
        }
        let tutor = self.draft.tutor.take();
        self.draft = SubjectDraft::new(name, semester, journey).with_tutor(tutor);
        true
    }

    pub fn select_tutor(&mut self, tutor: Option<TutorSelection>) {
        self.draft.tutor = tutor;
    }

    /// Leave the create step. Field validation runs here so the user sees
    /// every error before reaching the assignment step.
    pub fn next(&mut self) -> Result<(), Vec<String>> {
        if self.state.current() == Step::Create {
            let report = ValidationReport::from(validate_subject_form(&self.draft.form()));
            if !report.is_valid {
                self.ctx.notifier.show_warning(&report.errors.join("\n"));
                return Err(report.errors);
            }
        }

        if self.state.next_step(&self.draft) {
            Ok(())
        } else if self.state.current() == Step::Assign {
            Err(vec![TUTOR_REQUIRED.to_string()])
        } else {
            Err(vec![NOT_AT_ASSIGN_STEP.to_string()])
        }
    }

    /// Step back. Leaving the assignment step drops the tutor selection.
    /// After a partial failure the subject already exists, so the flow stays
    /// on the assignment step until it completes or is reset.
    pub fn back(&mut self) -> bool {
        if self.subject_locked() {
            return false;
        }
        let leaving_assign = self.state.current() == Step::Assign;
        let moved = self.state.previous_step();
        if moved && leaving_assign {
            self.draft.tutor = None;
        }
        moved
    }

    fn subject_locked(&self) -> bool {
        if self.created_subject.is_none() {
            return false;
        }
        tracing::debug!(subject_id = ?self.created_subject, "subject details locked after creation");
        self.ctx.notifier.show_warning(SUBJECT_ALREADY_CREATED);
        true
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.draft = SubjectDraft::default();
        self.created_subject = None;
        self.last_error = None;
    }

    /// Create the subject and, when `assign_tutor` is set, link the selected
    /// tutor. The transition is decided first; requests go out after.
    pub async fn submit(&mut self, assign_tutor: bool) -> SubmitOutcome {
        let Some(_guard) = self.processing.try_begin() else {
            tracing::debug!("subject submit ignored while a request is in flight");
            return SubmitOutcome::Busy;
        };

        if let Err(errors) = self.check_submit(assign_tutor) {
            return SubmitOutcome::Rejected { errors };
        }

        let subject_id = match self.created_subject {
            Some(id) => id,
            None => match self.create_subject().await {
                Ok(id) => id,
                Err(err) => {
                    let error = err.normalized();
                    self.ctx.notifier.show_error(&error.message);
                    self.last_error = Some(error.clone());
                    return SubmitOutcome::Failed { error };
                }
            },
        };

        if !assign_tutor {
            self.state.skip_assignment(&self.draft, subject_id);
            self.created_subject = None;
            self.last_error = None;
            self.ctx.notifier.show_success("Materia creada exitosamente");
            return SubmitOutcome::SubjectCreated { subject_id };
        }

        let Some(tutor_id) = self.draft.tutor.as_ref().map(|t| t.u_id) else {
            return SubmitOutcome::Rejected {
                errors: vec![TUTOR_REQUIRED.to_string()],
            };
        };

        let payload = AssignmentPayload::tutor(tutor_id, subject_id);
        match self.ctx.api.assign_subject_to_user(&payload).await {
            Ok(()) => {
                self.state.next_step(&self.draft);
                self.state.set_result(ProcessResult::CompleteProcess { subject_id, tutor_id });
                self.created_subject = None;
                self.last_error = None;
                tracing::info!(subject_id, tutor_id, "subject created with tutor");
                self.ctx.notifier.show_success("Materia creada y tutor asignado exitosamente");
                SubmitOutcome::Completed { subject_id, tutor_id }
            }
            Err(err) => {
                let error = err.normalized();
                tracing::warn!(subject_id, tutor_id, error = %err, "tutor assignment failed after subject creation");
                self.state.set_result(ProcessResult::SubjectOnly { subject_id });
                self.ctx
                    .notifier
                    .show_error(&format!("{PARTIAL_FAILURE_MESSAGE}: {}", error.message));
                self.last_error = Some(error.clone());
                SubmitOutcome::PartialFailure { subject_id, error }
            }
        }
    }

    fn check_submit(&self, assign_tutor: bool) -> Result<(), Vec<String>> {
        let user = self.ctx.current_user();
        let capabilities = evaluate_subject_permissions(user.as_ref().and_then(|u| u.role));

        let permitted = authz::require(capabilities.can_edit, actions::CREATE_SUBJECT).and_then(|_| {
            if assign_tutor {
                authz::require(capabilities.can_manage_tutors, actions::ASSIGN_TUTOR)
            } else {
                Ok(())
            }
        });
        if let Err(err) = permitted {
            self.ctx.notifier.show_error(&err.user_message());
            return Err(vec![err.user_message()]);
        }

        if self.state.current() != Step::Assign {
            return Err(vec![NOT_AT_ASSIGN_STEP.to_string()]);
        }
        if assign_tutor && !WorkflowState::can_advance(Step::Assign, &self.draft) {
            self.ctx.notifier.show_warning(TUTOR_REQUIRED);
            return Err(vec![TUTOR_REQUIRED.to_string()]);
        }

        let report = ValidationReport::from(validate_subject_form(&self.draft.form()));
        if !report.is_valid {
            self.ctx.notifier.show_warning(&report.errors.join("\n"));
            return Err(report.errors);
        }

        Ok(())
    }

    async fn create_subject(&mut self) -> Result<i64, AppError> {
        let payload = transform_subject_form_to_payload(&self.draft.form());
        let created = self.ctx.api.create_subject(&payload).await?;
        let subject_id = created
            .s_id
            .ok_or_else(|| AppError::Decode("la materia creada no tiene identificador".to_string()))?;

        tracing::info!(subject_id, name = %payload.s_name, "subject created");
        self.created_subject = Some(subject_id);
        Ok(subject_id)
    }
}

/// Subject catalog as seen by the current user.
pub struct SubjectService {
    ctx: AppContext,
}

impl SubjectService {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Catalog subjects, limited to active ones for roles that only see
    /// those. Rows that fail to decode are skipped.
    pub async fn list_visible(&self, filters: &CatalogFilters) -> AppResult<Vec<Subject>> {
        let role = self.ctx.current_user().and_then(|u| u.role);
        let active_only = evaluate_subject_permissions(role).view_active_only;
        let rows = self.ctx.api.list_catalog(CatalogSection::Subjects, filters).await?;

        let subjects = rows
            .into_iter()
            .filter_map(decode_subject)
            .map(|raw| subject_from_api(&raw))
            .collect();

        Ok(visible_subjects(subjects, active_only))
    }
}

fn decode_subject(row: Value) -> Option<ApiSubject> {
    match serde_json::from_value::<ApiSubject>(row) {
        Ok(raw) => Some(raw),
        Err(err) => {
            tracing::warn!(error = %err, "skipping undecodable subject row");
            None
        }
    }
}

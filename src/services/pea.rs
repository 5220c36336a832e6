use std::sync::Arc;

use crate::api::PdfAnalysisService;
use crate::app::AppContext;
use crate::authz::{self, actions, can_manage_pea_for, evaluate_subject_permissions, PeaViewLevel};
use crate::errors::{AppError, AppResult};
use crate::mappers::{pea_draft_from_analysis, pea_from_api, pea_payload_from_draft};
use crate::models::{Pea, PeaDraft};
use crate::validation::validate_key_concepts;

use super::{ProcessingFlag, REQUEST_IN_FLIGHT};

pub const PDF_SERVICE_UNAVAILABLE: &str = "El servicio de análisis de PDF no está disponible";
const PEA_ALREADY_EXISTS: &str = "La materia ya tiene un PEA registrado";

/// PEA upload and listing for a subject.
pub struct PeaService {
    ctx: AppContext,
    analyzer: Arc<dyn PdfAnalysisService>,
    processing: ProcessingFlag,
}

impl PeaService {
    pub fn new(ctx: AppContext, analyzer: Arc<dyn PdfAnalysisService>) -> Self {
        Self {
            ctx,
            analyzer,
            processing: ProcessingFlag::new(),
        }
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_processing()
    }

    fn require_manage(&self, subject_id: i64) -> AppResult<()> {
        let user = self.ctx.current_user();
        authz::require(can_manage_pea_for(user.as_ref(), subject_id), actions::MANAGE_PEA).map_err(|err| {
            self.ctx.notifier.show_error(&err.user_message());
            err
        })
    }

    /// Analyse an uploaded document into a draft the user reviews before
    /// submitting. Uploads are refused while the analysis service is down.
    pub async fn analyze_document(&self, subject_id: i64, file_name: &str, document: Vec<u8>) -> AppResult<PeaDraft> {
        self.require_manage(subject_id)?;

        if !self.analyzer.is_healthy().await {
            self.ctx.notifier.show_error(PDF_SERVICE_UNAVAILABLE);
            return Err(AppError::api(Some(503), PDF_SERVICE_UNAVAILABLE));
        }

        let analysis = self.analyzer.analyze(file_name, document).await.map_err(|err| {
            self.ctx.notifier.show_error(&err.user_message());
            err
        })?;

        let draft = pea_draft_from_analysis(subject_id, &analysis);
        tracing::info!(
            subject_id,
            file_name,
            concepts = draft.key_concepts.len(),
            "pea draft extracted from document"
        );
        Ok(draft)
    }

    /// Submit a PEA. A subject has at most one.
    pub async fn create(&self, draft: &PeaDraft) -> AppResult<Pea> {
        let _guard = self
            .processing
            .try_begin()
            .ok_or_else(|| AppError::bad_request(REQUEST_IN_FLIGHT))?;

        self.require_manage(draft.subject_id)?;

        let report = validate_key_concepts(&draft.key_concepts);
        if !report.is_valid {
            self.ctx.notifier.show_warning(&report.errors.join("\n"));
            return Err(AppError::validation(report.errors));
        }

        let existing = self.ctx.api.list_pea(draft.subject_id).await?;
        if !existing.is_empty() {
            self.ctx.notifier.show_warning(PEA_ALREADY_EXISTS);
            return Err(AppError::bad_request(PEA_ALREADY_EXISTS));
        }

        match self.ctx.api.create_pea(&pea_payload_from_draft(draft)).await {
            Ok(created) => {
                let pea = pea_from_api(&created);
                tracing::info!(subject_id = draft.subject_id, pea_id = pea.id, "pea created");
                self.ctx.notifier.show_success("PEA registrado exitosamente");
                Ok(pea)
            }
            Err(err) => {
                self.ctx.notifier.show_error(&err.user_message());
                Err(err)
            }
        }
    }

    /// PEA records of a subject, as far as the user's role may see them.
    /// Students get the outline without the registration date.
    pub async fn list_for_subject(&self, subject_id: i64) -> AppResult<Vec<Pea>> {
        let user = self.ctx.current_user();
        let level = evaluate_subject_permissions(user.as_ref().and_then(|u| u.role)).pea_view_level;
        if level == PeaViewLevel::None {
            return Err(AppError::forbidden(authz::INSUFFICIENT_PERMISSIONS));
        }

        let records = self.ctx.api.list_pea(subject_id).await?;
        Ok(records
            .iter()
            .map(pea_from_api)
            .map(|mut pea| {
                if level == PeaViewLevel::Student {
                    pea.date_created = None;
                }
                pea
            })
            .collect())
    }
}

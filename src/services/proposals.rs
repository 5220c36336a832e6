use serde_json::Value;

use crate::api::{CatalogFilters, CatalogSection};
use crate::app::AppContext;
use crate::authz::{
    self, actions, can_create_proposal, evaluate_proposal_permissions, initial_approval_status, ProposalPermissions,
};
use crate::errors::{AppError, AppResult};
use crate::mappers::{map_modal_to_api, proposal_from_api};
use crate::models::{ApiProposal, Proposal, ProposalForm};
use crate::validation::validate_proposal;
use crate::workflow::ReviewNavigator;

use super::{ProcessingFlag, REQUEST_IN_FLIGHT};

/// Proposal creation and listing on behalf of the current user.
pub struct ProposalService {
    ctx: AppContext,
    processing: ProcessingFlag,
}

impl ProposalService {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            processing: ProcessingFlag::new(),
        }
    }

    pub fn is_processing(&self) -> bool {
        self.processing.is_processing()
    }

    pub async fn create(&self, form: &ProposalForm) -> AppResult<Proposal> {
        let _guard = self
            .processing
            .try_begin()
            .ok_or_else(|| AppError::bad_request(REQUEST_IN_FLIGHT))?;

        let user = self.ctx.current_user();
        if let Err(err) = authz::require(can_create_proposal(user.as_ref()), actions::CREATE_PROPOSAL) {
            self.ctx.notifier.show_error(&err.user_message());
            return Err(err);
        }

        let errors = validate_proposal(form);
        if !errors.is_empty() {
            self.ctx.notifier.show_warning(&errors.join("\n"));
            return Err(AppError::validation(errors));
        }

        let mut payload = map_modal_to_api(form);
        payload.p_id = None;
        payload.p_author_id = user.as_ref().map(|u| u.id);
        payload.p_author_role = user.as_ref().and_then(|u| u.role).map(|r| r.code());
        payload.p_approval_status =
            Some(initial_approval_status(user.as_ref().and_then(|u| u.role)).to_string());

        match self.ctx.api.create_proposal(&payload).await {
            Ok(created) => {
                let proposal = proposal_from_api(&created);
                tracing::info!(proposal_id = proposal.id, "proposal created");
                self.ctx.notifier.show_success("Propuesta creada exitosamente");
                Ok(proposal)
            }
            Err(err) => {
                self.ctx.notifier.show_error(&err.user_message());
                Err(err)
            }
        }
    }

    /// Proposals the current user may see, each with its permission set.
    /// Records that fail to decode are skipped.
    pub async fn list_visible(&self, filters: &CatalogFilters) -> AppResult<Vec<(Proposal, ProposalPermissions)>> {
        let user = self.ctx.current_user();
        let rows = self.ctx.api.list_catalog(CatalogSection::Proposals, filters).await?;

        let visible = rows
            .into_iter()
            .filter_map(decode_proposal)
            .map(|raw| proposal_from_api(&raw))
            .filter_map(|proposal| {
                let permissions = evaluate_proposal_permissions(user.as_ref(), Some(&proposal));
                permissions.can_view.then_some((proposal, permissions))
            })
            .collect();

        Ok(visible)
    }

    /// Review navigation for one proposal, limited to the user's permissions.
    pub fn review(&self, proposal: &Proposal) -> ReviewNavigator {
        let user = self.ctx.current_user();
        ReviewNavigator::new(evaluate_proposal_permissions(user.as_ref(), Some(proposal)))
    }
}

fn decode_proposal(row: Value) -> Option<ApiProposal> {
    match serde_json::from_value::<ApiProposal>(row) {
        Ok(raw) => Some(raw),
        Err(err) => {
            tracing::warn!(error = %err, "skipping undecodable proposal row");
            None
        }
    }
}

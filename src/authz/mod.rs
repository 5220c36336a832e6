//! Authorization module - role and ownership based permission evaluation
//!
//! This module decides which actions are offered to a user:
//! - Proposal permissions from role, authorship and subject affiliation
//! - Subject capabilities from a single per-role table
//! - Explicit checks for gated actions invoked programmatically
//!
//! Every evaluation is pure and fails closed.

mod capabilities;
mod evaluator;

pub use capabilities::{can_manage_pea_for, evaluate_subject_permissions, PeaViewLevel, SubjectPermissions};
pub use evaluator::{can_create_proposal, evaluate_proposal_permissions, initial_approval_status, ProposalPermissions};

use crate::errors::{AppError, AppResult};

pub const INSUFFICIENT_PERMISSIONS: &str = "No tienes permisos suficientes";

/// Check for an action that is hidden in the UI but was invoked anyway.
pub fn require(allowed: bool, action: &str) -> AppResult<()> {
    if allowed {
        return Ok(());
    }

    tracing::warn!(action = %action, "gated action invoked without permission");
    Err(AppError::forbidden(format!("{INSUFFICIENT_PERMISSIONS} para {action}")))
}

/// Well-known action names used in permission messages
pub mod actions {
    pub const CREATE_PROPOSAL: &str = "crear propuestas";
    pub const CREATE_SUBJECT: &str = "crear materias";
    pub const ASSIGN_TUTOR: &str = "asignar tutores";
    pub const ASSIGN_STUDENTS: &str = "asignar estudiantes";
    pub const MANAGE_PEA: &str = "gestionar el PEA de esta materia";
}

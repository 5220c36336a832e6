use serde::Serialize;

use crate::models::{ApprovalStatus, Proposal, Role, User};

/// Actions a user may take on a single proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProposalPermissions {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_apply: bool,
    pub can_view_applicants: bool,
}

impl ProposalPermissions {
    pub const DENY_ALL: ProposalPermissions = ProposalPermissions {
        can_view: false,
        can_edit: false,
        can_apply: false,
        can_view_applicants: false,
    };
}

/// Evaluate what `user` may do with `proposal`.
///
/// Evaluation per role:
/// 1. Admin -> view and see applicants, never edit or apply
/// 2. Tutor -> view within own subjects, edit and see applicants only as author
/// 3. Student -> view and apply to approved proposals of own subjects
/// 4. missing user, missing proposal or unknown role -> deny
pub fn evaluate_proposal_permissions(user: Option<&User>, proposal: Option<&Proposal>) -> ProposalPermissions {
    let (user, proposal) = match (user, proposal) {
        (Some(user), Some(proposal)) => (user, proposal),
        _ => return ProposalPermissions::DENY_ALL,
    };

    let is_owner = proposal.is_authored_by(user.id);
    let in_user_subject = proposal
        .subject_id
        .map(|subject_id| user.is_affiliated_with(subject_id))
        .unwrap_or(false);

    let permissions = match user.role {
        Some(Role::Admin) => ProposalPermissions {
            can_view: true,
            can_edit: false,
            can_apply: false,
            can_view_applicants: true,
        },
        Some(Role::Tutor) => ProposalPermissions {
            can_view: in_user_subject,
            can_edit: is_owner && in_user_subject,
            can_apply: false,
            can_view_applicants: is_owner && in_user_subject && proposal.is_approved(),
        },
        Some(Role::Student) => {
            let can_view = proposal.is_approved() && in_user_subject;
            ProposalPermissions {
                can_view,
                can_edit: false,
                can_apply: can_view && !is_owner,
                can_view_applicants: false,
            }
        }
        None => ProposalPermissions::DENY_ALL,
    };

    tracing::debug!(
        user_id = user.id,
        proposal_id = proposal.id,
        role = ?user.role,
        is_owner,
        in_user_subject,
        ?permissions,
        "proposal permissions evaluated"
    );

    permissions
}

/// Only admins and tutors create proposals.
pub fn can_create_proposal(user: Option<&User>) -> bool {
    matches!(user.and_then(|u| u.role), Some(Role::Admin) | Some(Role::Tutor))
}

/// Status a new proposal starts in, depending on who creates it.
pub fn initial_approval_status(role: Option<Role>) -> ApprovalStatus {
    match role {
        Some(Role::Admin) | Some(Role::Tutor) => ApprovalStatus::Aprobada,
        _ => ApprovalStatus::Pendiente,
    }
}

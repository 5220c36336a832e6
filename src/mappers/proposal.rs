use crate::models::proposal::{
    ApiObjective, ApiProposal, ApiRequirement, Objective, ObjectiveForm, ObjectiveType, Proposal, ProposalForm,
    Requirement, RequirementForm,
};
use crate::models::Role;

use super::format::{format_date_input, non_empty, parse_date};

/// Domain proposal from its wire shape. Unknown enum strings become `None`
/// (or `Pendiente` for the status) so permissions stay closed.
pub fn proposal_from_api(raw: &ApiProposal) -> Proposal {
    Proposal {
        id: raw.p_id.unwrap_or_default(),
        name: raw.p_name.clone().unwrap_or_default(),
        description: raw.p_description.clone().unwrap_or_default(),
        difficulty_level: raw.p_difficulty_level.as_deref().and_then(|d| d.parse().ok()),
        approval_status: raw
            .p_approval_status
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default(),
        author_id: raw.p_author_id,
        author_role: raw.p_author_role.and_then(Role::from_code),
        subject_id: raw.p_subject_id,
        project_type: raw.p_project_type,
        is_group: raw.p_is_group.unwrap_or(false),
        max_integrants: raw.p_max_integrants,
        date_limit: raw.p_date_limit.as_deref().and_then(parse_date),
        objectives: raw
            .objectives
            .iter()
            .flatten()
            .map(|o| Objective {
                name: o.o_name.clone().unwrap_or_default(),
                description: o.o_description.clone().unwrap_or_default(),
                kind: o
                    .o_type
                    .as_deref()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(ObjectiveType::Especifico),
            })
            .collect(),
        requirements: raw
            .requirements
            .iter()
            .flatten()
            .map(|r| Requirement {
                name: r.r_name.clone().unwrap_or_default(),
            })
            .collect(),
    }
}

/// Fill the review/edit modal from an API record.
pub fn map_proposal_to_modal(raw: &ApiProposal) -> ProposalForm {
    let is_group = raw.p_is_group.unwrap_or(false);
    ProposalForm {
        id: raw.p_id,
        name: raw.p_name.clone().unwrap_or_default(),
        description: raw.p_description.clone().unwrap_or_default(),
        difficulty_level: raw.p_difficulty_level.clone().unwrap_or_default(),
        project_type: raw.p_project_type.map(|t| t.to_string()).unwrap_or_default(),
        subject: raw.p_subject_id.map(|s| s.to_string()).unwrap_or_default(),
        is_group,
        integrants: if is_group {
            raw.p_max_integrants.map(|n| n.to_string()).unwrap_or_default()
        } else {
            String::new()
        },
        date_limit: format_date_input(raw.p_date_limit.as_deref()),
        approval_status: raw.p_approval_status.clone().unwrap_or_default(),
        author_id: raw.p_author_id,
        author_role: raw.p_author_role,
        objectives: raw
            .objectives
            .iter()
            .flatten()
            .map(|o| ObjectiveForm {
                name: o.o_name.clone().unwrap_or_default(),
                description: o.o_description.clone().unwrap_or_default(),
                kind: o.o_type.clone().unwrap_or_default(),
            })
            .collect(),
        requirements: raw
            .requirements
            .iter()
            .flatten()
            .map(|r| RequirementForm {
                name: r.r_name.clone().unwrap_or_default(),
            })
            .collect(),
    }
}

/// Wire payload from the modal. Integrants are only sent for group proposals.
pub fn map_modal_to_api(form: &ProposalForm) -> ApiProposal {
    ApiProposal {
        p_id: form.id,
        p_name: Some(form.name.clone()),
        p_description: Some(form.description.clone()),
        p_difficulty_level: non_empty(&form.difficulty_level),
        p_approval_status: non_empty(&form.approval_status),
        p_author_id: form.author_id,
        p_author_role: form.author_role,
        p_subject_id: form.subject.trim().parse().ok(),
        p_project_type: form.project_type.trim().parse().ok(),
        p_is_group: Some(form.is_group),
        p_max_integrants: if form.is_group {
            form.integrants.trim().parse().ok()
        } else {
            None
        },
        p_date_limit: non_empty(&form.date_limit),
        objectives: Some(
            form.objectives
                .iter()
                .map(|o| ApiObjective {
                    o_name: Some(o.name.clone()),
                    o_description: Some(o.description.clone()),
                    o_type: non_empty(&o.kind),
                })
                .collect(),
        ),
        requirements: Some(
            form.requirements
                .iter()
                .map(|r| ApiRequirement {
                    r_name: Some(r.name.clone()),
                })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApprovalStatus;

    fn raw() -> ApiProposal {
        serde_json::from_value(serde_json::json!({
            "p_id": 31,
            "p_name": "App de asistencia",
            "p_description": "Registro con QR",
            "p_difficulty_level": "Alto",
            "p_approval_status": "Aprobada",
            "p_author_id": 2,
            "p_author_role": 2,
            "p_subject_id": 14,
            "p_project_type": 1,
            "p_is_group": true,
            "p_max_integrants": 3,
            "p_date_limit": "2025-11-30",
            "objectives": [
                {"o_name": "General", "o_description": "Construir la app", "o_type": "General"},
                {"o_name": "Lector", "o_description": "Leer QR", "o_type": "Específico"}
            ],
            "requirements": [{"r_name": "Android"}]
        }))
        .unwrap()
    }

    #[test]
    fn round_trip_keeps_scalars() {
        let raw = raw();
        let form = map_proposal_to_modal(&raw);
        let api = map_modal_to_api(&form);

        assert_eq!(map_proposal_to_modal(&api), form);
        assert_eq!(api, raw);

        let solo = ApiProposal {
            p_is_group: Some(false),
            p_max_integrants: Some(3),
            ..raw
        };
        let once = map_proposal_to_modal(&solo);
        assert_eq!(once.integrants, "");
        assert_eq!(map_proposal_to_modal(&map_modal_to_api(&once)), once);
    }

    #[test]
    fn missing_fields_default() {
        let form = map_proposal_to_modal(&ApiProposal::default());
        assert_eq!(form.name, "");
        assert_eq!(form.date_limit, "");
        assert!(form.objectives.is_empty());
        assert!(!form.is_group);

        let proposal = proposal_from_api(&ApiProposal::default());
        assert_eq!(proposal.approval_status, ApprovalStatus::Pendiente);
        assert_eq!(proposal.author_role, None);
        assert!(proposal.requirements.is_empty());
    }

    #[test]
    fn domain_mapping_parses_enums() {
        let proposal = proposal_from_api(&raw());
        assert!(proposal.is_approved());
        assert_eq!(proposal.author_role, Some(Role::Tutor));
        assert_eq!(proposal.objectives[1].kind, ObjectiveType::Especifico);
        assert_eq!(proposal.date_limit, chrono::NaiveDate::from_ymd_opt(2025, 11, 30));
    }

    #[test]
    fn integrants_dropped_for_individual_proposals() {
        let mut form = map_proposal_to_modal(&raw());
        form.is_group = false;
        assert_eq!(map_modal_to_api(&form).p_max_integrants, None);
    }
}

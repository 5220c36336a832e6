use serde::Serialize;

use crate::models::{Role, User};

/// How much of a subject's PEA a role may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeaViewLevel {
    None,
    Student,
    Full,
}

/// Per-role capabilities on subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubjectPermissions {
    pub can_edit: bool,
    pub can_manage_pea: bool,
    pub can_manage_tutors: bool,
    pub can_manage_students: bool,
    pub pea_view_level: PeaViewLevel,
    pub view_active_only: bool,
}

const ADMIN: SubjectPermissions = SubjectPermissions {
    can_edit: true,
    can_manage_pea: true,
    can_manage_tutors: true,
    can_manage_students: true,
    pea_view_level: PeaViewLevel::Full,
    view_active_only: false,
};

const TUTOR: SubjectPermissions = SubjectPermissions {
    can_edit: false,
    can_manage_pea: true,
    can_manage_tutors: false,
    can_manage_students: false,
    pea_view_level: PeaViewLevel::Full,
    view_active_only: false,
};

const STUDENT: SubjectPermissions = SubjectPermissions {
    can_edit: false,
    can_manage_pea: false,
    can_manage_tutors: false,
    can_manage_students: false,
    pea_view_level: PeaViewLevel::Student,
    view_active_only: true,
};

const NO_ROLE: SubjectPermissions = SubjectPermissions {
    can_edit: false,
    can_manage_pea: false,
    can_manage_tutors: false,
    can_manage_students: false,
    pea_view_level: PeaViewLevel::None,
    view_active_only: true,
};

/// Capability table lookup. Unknown roles get the most restrictive row.
pub fn evaluate_subject_permissions(role: Option<Role>) -> SubjectPermissions {
    match role {
        Some(Role::Admin) => ADMIN,
        Some(Role::Tutor) => TUTOR,
        Some(Role::Student) => STUDENT,
        None => NO_ROLE,
    }
}

/// Tutors manage the PEA of their own subjects only.
pub fn can_manage_pea_for(user: Option<&User>, subject_id: i64) -> bool {
    let Some(user) = user else {
        return false;
    };

    let capabilities = evaluate_subject_permissions(user.role);
    let allowed = match user.role {
        Some(Role::Admin) => capabilities.can_manage_pea,
        Some(Role::Tutor) => capabilities.can_manage_pea && user.is_affiliated_with(subject_id),
        _ => false,
    };

    tracing::debug!(user_id = user.id, subject_id, allowed, "pea management check");
    allowed
}

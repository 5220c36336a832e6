use crate::models::user::{ApiUser, Role, UserView};

use super::format::UNKNOWN_ROLE;

pub fn role_label(code: Option<i64>) -> String {
    code.and_then(Role::from_code)
        .map(|r| r.label().to_string())
        .unwrap_or_else(|| UNKNOWN_ROLE.to_string())
}

pub fn user_view_from_api(raw: &ApiUser) -> UserView {
    UserView {
        id: raw.u_id.unwrap_or_default(),
        name: raw.u_name.clone().unwrap_or_default(),
        email: raw.u_email.clone().unwrap_or_default(),
        role: raw.u_role.and_then(Role::from_code),
        role_label: role_label(raw.u_role),
        semester: raw.u_semester.and_then(|s| u8::try_from(s).ok()),
        subjects: raw.subjects.clone().unwrap_or_default(),
    }
}

use serde::{Deserialize, Serialize};

use super::subject::EnrollmentState;
use super::user::Role;

/// Body of assign/remove requests linking a user to a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentPayload {
    pub u_id: i64,
    pub s_id: i64,
    pub role: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub se_state: Option<String>,
}

impl AssignmentPayload {
    pub fn tutor(user_id: i64, subject_id: i64) -> Self {
        Self {
            u_id: user_id,
            s_id: subject_id,
            role: Role::Tutor.code(),
            se_state: None,
        }
    }

    pub fn student(user_id: i64, subject_id: i64, state: EnrollmentState) -> Self {
        Self {
            u_id: user_id,
            s_id: subject_id,
            role: Role::Student.code(),
            se_state: Some(state.as_str().to_string()),
        }
    }
}

/// A user linked to a subject in the local assignment board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub user_id: i64,
    pub subject_id: i64,
    pub name: String,
    pub role: Role,
    pub state: Option<EnrollmentState>,
}

impl Assignment {
    pub fn tutor(user_id: i64, subject_id: i64, name: impl Into<String>) -> Self {
        Self {
            user_id,
            subject_id,
            name: name.into(),
            role: Role::Tutor,
            state: None,
        }
    }

    pub fn student(user_id: i64, subject_id: i64, name: impl Into<String>, state: EnrollmentState) -> Self {
        Self {
            user_id,
            subject_id,
            name: name.into(),
            role: Role::Student,
            state: Some(state),
        }
    }

    pub fn payload(&self) -> AssignmentPayload {
        AssignmentPayload {
            u_id: self.user_id,
            s_id: self.subject_id,
            role: self.role.code(),
            se_state: self.state.map(|s| s.as_str().to_string()),
        }
    }
}

/// A student being considered for enrollment, with the state picked in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCandidate {
    pub u_id: i64,
    #[serde(default)]
    pub u_name: String,
    #[serde(default)]
    pub u_semester: Option<u8>,
    #[serde(default)]
    pub state: String,
    /// Other subjects the student is currently taking ("Cursando").
    #[serde(default)]
    pub active_cursando: usize,
}

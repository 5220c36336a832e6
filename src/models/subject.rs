use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::user::ApiUser;

pub const MIN_SEMESTER: u8 = 1;
pub const MAX_SEMESTER: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Journey {
    Matutina,
    Nocturna,
}

impl Journey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Journey::Matutina => "Matutina",
            Journey::Nocturna => "Nocturna",
        }
    }
}

impl FromStr for Journey {
    type Err = ();

    /// Case-insensitive: "matutina", "MATUTINA" and "Matutina" are the same journey.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "matutina" => Ok(Journey::Matutina),
            "nocturna" => Ok(Journey::Nocturna),
            _ => Err(()),
        }
    }
}

/// A student's enrollment state in a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentState {
    Cursando,
    Repitiendo,
    Aprobado,
}

impl EnrollmentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentState::Cursando => "Cursando",
            EnrollmentState::Repitiendo => "Repitiendo",
            EnrollmentState::Aprobado => "Aprobado",
        }
    }
}

impl FromStr for EnrollmentState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Cursando" => Ok(EnrollmentState::Cursando),
            "Repitiendo" => Ok(EnrollmentState::Repitiendo),
            "Aprobado" => Ok(EnrollmentState::Aprobado),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedTutor {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enrollment {
    pub student_id: i64,
    pub name: String,
    pub semester: Option<u8>,
    pub state: Option<EnrollmentState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub semester: Option<u8>,
    pub journey: Option<Journey>,
    pub active: bool,
    pub tutor: Option<AssignedTutor>,
    pub students: Vec<Enrollment>,
}

/// Subject in wire shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSubject {
    pub s_id: Option<i64>,
    pub s_name: Option<String>,
    pub s_semester: Option<i64>,
    pub s_journey: Option<String>,
    pub s_state: Option<bool>,
    pub tutor: Option<ApiUser>,
    pub students: Option<Vec<ApiEnrollment>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiEnrollment {
    pub u_id: Option<i64>,
    pub u_name: Option<String>,
    pub u_semester: Option<i64>,
    pub se_state: Option<String>,
}

/// Input-bound subject form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectForm {
    pub name: String,
    pub semester: String,
    pub journey: String,
}

/// Body of the create-subject request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectPayload {
    pub s_name: String,
    pub s_semester: u8,
    pub s_journey: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorSelection {
    pub u_id: i64,
    #[serde(default)]
    pub u_name: Option<String>,
}

impl TutorSelection {
    pub fn new(u_id: i64) -> Self {
        Self { u_id, u_name: None }
    }
}

/// Everything the subject creation workflow has collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectDraft {
    pub name: String,
    pub semester: String,
    pub journey: String,
    pub tutor: Option<TutorSelection>,
}

impl SubjectDraft {
    pub fn new(name: impl Into<String>, semester: impl Into<String>, journey: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            semester: semester.into(),
            journey: journey.into(),
            tutor: None,
        }
    }

    pub fn with_tutor(mut self, tutor: Option<TutorSelection>) -> Self {
        self.tutor = tutor;
        self
    }

    pub fn form(&self) -> SubjectForm {
        SubjectForm {
            name: self.name.clone(),
            semester: self.semester.clone(),
            journey: self.journey.clone(),
        }
    }
}

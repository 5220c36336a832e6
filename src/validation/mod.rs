//! Pre-submission validators.
//!
//! Validators never fail: they collect every violation so the whole list can be
//! shown at once. A non-empty result blocks the next transition or submission.

mod assignment;
mod pea;
mod proposal;
mod subject;

pub use assignment::{validate_student_assignment, validate_tutor_assignment, MAX_CONCURRENT_CURSANDO};
pub use pea::validate_key_concepts;
pub use proposal::{
    validate_basic_fields, validate_group_proposal, validate_objectives, validate_proposal, validate_requirements,
};
pub use subject::{validate_subject_form, SubjectFormValidation, MAX_SUBJECT_NAME_LEN, MIN_SUBJECT_NAME_LEN};

use serde::Serialize;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn into_result(self) -> AppResult<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(AppError::validation(self.errors))
        }
    }
}

impl From<SubjectFormValidation> for ValidationReport {
    fn from(value: SubjectFormValidation) -> Self {
        Self::from_errors(value.errors.into_values().collect())
    }
}

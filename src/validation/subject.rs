use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::subject::{Journey, SubjectForm, MAX_SEMESTER, MIN_SEMESTER};

pub const MIN_SUBJECT_NAME_LEN: usize = 3;
pub const MAX_SUBJECT_NAME_LEN: usize = 150;

/// Field-keyed result of the subject form check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubjectFormValidation {
    pub is_valid: bool,
    pub errors: BTreeMap<&'static str, String>,
}

pub fn validate_subject_form(form: &SubjectForm) -> SubjectFormValidation {
    let mut errors = BTreeMap::new();

    let name_len = form.name.trim().chars().count();
    if name_len == 0 {
        errors.insert("name", "El nombre de la materia es obligatorio".to_string());
    } else if !(MIN_SUBJECT_NAME_LEN..=MAX_SUBJECT_NAME_LEN).contains(&name_len) {
        errors.insert(
            "name",
            format!("El nombre debe tener entre {MIN_SUBJECT_NAME_LEN} y {MAX_SUBJECT_NAME_LEN} caracteres"),
        );
    }

    match form.semester.trim().parse::<u8>() {
        Ok(s) if (MIN_SEMESTER..=MAX_SEMESTER).contains(&s) => {}
        _ => {
            errors.insert(
                "semester",
                format!("El semestre debe ser un número entre {MIN_SEMESTER} y {MAX_SEMESTER}"),
            );
        }
    }

    if form.journey.parse::<Journey>().is_err() {
        errors.insert("journey", "La jornada debe ser Matutina o Nocturna".to_string());
    }

    SubjectFormValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

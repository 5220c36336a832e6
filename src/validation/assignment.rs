use crate::models::assignment::StudentCandidate;
use crate::models::subject::{EnrollmentState, Subject};
use crate::models::{ApiUser, Role};

use super::ValidationReport;

/// Subjects a student may be taking at the same time.
pub const MAX_CONCURRENT_CURSANDO: usize = 2;

pub fn validate_student_assignment(students: &[StudentCandidate], subject: &Subject) -> ValidationReport {
    let mut errors = Vec::new();

    for student in students {
        let label = if student.u_name.trim().is_empty() {
            format!("El estudiante {}", student.u_id)
        } else {
            format!("El estudiante {}", student.u_name.trim())
        };

        let Ok(state) = student.state.parse::<EnrollmentState>() else {
            errors.push(format!("{label} tiene un estado inválido (Cursando, Repitiendo o Aprobado)"));
            continue;
        };

        match (state, student.u_semester, subject.semester) {
            (EnrollmentState::Cursando, student_sem, subject_sem) => {
                if student_sem.is_none() || student_sem != subject_sem {
                    errors.push(format!(
                        "{label} solo puede cursar materias de su propio semestre"
                    ));
                }
                if student.active_cursando >= MAX_CONCURRENT_CURSANDO {
                    errors.push(format!(
                        "{label} ya está cursando {MAX_CONCURRENT_CURSANDO} materias"
                    ));
                }
            }
            (EnrollmentState::Repitiendo, Some(student_sem), Some(subject_sem)) => {
                if student_sem <= subject_sem {
                    errors.push(format!(
                        "{label} solo puede repetir materias de semestres anteriores al suyo"
                    ));
                }
            }
            (EnrollmentState::Repitiendo, _, _) => {
                errors.push(format!(
                    "{label} solo puede repetir materias de semestres anteriores al suyo"
                ));
            }
            (EnrollmentState::Aprobado, _, _) => {}
        }
    }

    ValidationReport::from_errors(errors)
}

/// A subject holds at most one tutor, and the assignee must be a tutor.
pub fn validate_tutor_assignment(subject: &Subject, tutor: &ApiUser) -> ValidationReport {
    let mut errors = Vec::new();

    if tutor.u_role.and_then(Role::from_code) != Some(Role::Tutor) {
        errors.push("El usuario seleccionado no es tutor".to_string());
    }
    if let Some(current) = &subject.tutor {
        if Some(current.id) != tutor.u_id {
            errors.push("La materia ya tiene un tutor asignado".to_string());
        }
    }

    ValidationReport::from_errors(errors)
}

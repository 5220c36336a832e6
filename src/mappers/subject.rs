use crate::models::subject::{
    ApiSubject, AssignedTutor, Enrollment, Journey, Subject, SubjectForm, SubjectPayload, MAX_SEMESTER,
};

fn semester_from(value: Option<i64>) -> Option<u8> {
    value
        .and_then(|s| u8::try_from(s).ok())
        .filter(|s| *s >= 1 && *s <= MAX_SEMESTER)
}

pub fn subject_from_api(raw: &ApiSubject) -> Subject {
    Subject {
        id: raw.s_id.unwrap_or_default(),
        name: raw.s_name.clone().unwrap_or_default(),
        semester: semester_from(raw.s_semester),
        journey: raw.s_journey.as_deref().and_then(|j| j.parse().ok()),
        active: raw.s_state.unwrap_or(false),
        tutor: raw.tutor.as_ref().and_then(|t| {
            t.u_id.map(|id| AssignedTutor {
                id,
                name: t.u_name.clone().unwrap_or_default(),
            })
        }),
        students: raw
            .students
            .iter()
            .flatten()
            .filter_map(|s| {
                s.u_id.map(|student_id| Enrollment {
                    student_id,
                    name: s.u_name.clone().unwrap_or_default(),
                    semester: semester_from(s.u_semester),
                    state: s.se_state.as_deref().and_then(|st| st.parse().ok()),
                })
            })
            .collect(),
    }
}

/// Trimmed name, numeric semester (0 if unreadable) and canonical journey spelling.
pub fn transform_subject_form_to_payload(form: &SubjectForm) -> SubjectPayload {
    let journey = form
        .journey
        .parse::<Journey>()
        .map(|j| j.as_str().to_string())
        .unwrap_or_else(|_| form.journey.trim().to_string());

    SubjectPayload {
        s_name: form.name.trim().to_string(),
        s_semester: form.semester.trim().parse().unwrap_or(0),
        s_journey: journey,
    }
}

/// Students only see active subjects.
pub fn visible_subjects(subjects: Vec<Subject>, active_only: bool) -> Vec<Subject> {
    if active_only {
        subjects.into_iter().filter(|s| s.active).collect()
    } else {
        subjects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnrollmentState;

    #[test]
    fn maps_nested_tutor_and_students() {
        let raw: ApiSubject = serde_json::from_value(serde_json::json!({
            "s_id": 4,
            "s_name": "Estructuras de Datos",
            "s_semester": 2,
            "s_journey": "nocturna",
            "s_state": true,
            "tutor": {"u_id": 7, "u_name": "Marta"},
            "students": [
                {"u_id": 20, "u_name": "Ana", "u_semester": 2, "se_state": "Cursando"},
                {"u_name": "sin id"}
            ]
        }))
        .unwrap();

        let subject = subject_from_api(&raw);
        assert_eq!(subject.journey, Some(Journey::Nocturna));
        assert_eq!(subject.tutor.as_ref().map(|t| t.id), Some(7));
        assert_eq!(subject.students.len(), 1);
        assert_eq!(subject.students[0].state, Some(EnrollmentState::Cursando));
    }

    #[test]
    fn missing_fields_default() {
        let subject = subject_from_api(&ApiSubject::default());
        assert_eq!(subject.id, 0);
        assert!(subject.semester.is_none());
        assert!(subject.students.is_empty());
        assert!(!subject.active);
    }

    #[test]
    fn payload_normalizes_form() {
        let payload = transform_subject_form_to_payload(&SubjectForm {
            name: "  Álgebra  ".into(),
            semester: " 1".into(),
            journey: "MATUTINA".into(),
        });
        assert_eq!(payload.s_name, "Álgebra");
        assert_eq!(payload.s_semester, 1);
        assert_eq!(payload.s_journey, "Matutina");
    }
}

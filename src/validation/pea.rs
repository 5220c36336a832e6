use validator::Validate;

use crate::models::pea::{KeyConcept, CURRICULAR_UNITS};

use super::ValidationReport;

/// Key concepts must cover each curricular unit (1, 2 and 3).
pub fn validate_key_concepts(concepts: &[KeyConcept]) -> ValidationReport {
    if concepts.is_empty() {
        return ValidationReport::from_errors(vec!["Debe agregar al menos un concepto clave".to_string()]);
    }

    let mut errors = Vec::new();

    for (index, concept) in concepts.iter().enumerate() {
        let position = index + 1;

        if let Err(field_errors) = concept.validate() {
            let mut fields: Vec<_> = field_errors.field_errors().into_iter().collect();
            fields.sort_by_key(|(field, _)| *field);
            for (_, list) in fields {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    errors.push(format!("Concepto {position}: {message}"));
                }
            }
        }

        if concept.kc_name.trim().is_empty() {
            errors.push(format!("Concepto {position}: el nombre es obligatorio"));
        }
    }

    for unit in CURRICULAR_UNITS {
        if !concepts.iter().any(|c| c.kc_unit == unit) {
            errors.push(format!("Debe agregar al menos un concepto para la unidad {unit}"));
        }
    }

    ValidationReport::from_errors(errors)
}

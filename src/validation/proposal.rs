use crate::models::proposal::{DifficultyLevel, ObjectiveType, ProposalForm};

pub const MAX_SPECIFIC_OBJECTIVES: usize = 3;

/// Every violation in the proposal form; empty means valid.
pub fn validate_proposal(form: &ProposalForm) -> Vec<String> {
    let mut errors = validate_basic_fields(form);
    errors.extend(validate_objectives(form));
    errors.extend(validate_group_proposal(form));
    errors.extend(validate_requirements(form));
    errors
}

pub fn validate_basic_fields(form: &ProposalForm) -> Vec<String> {
    let mut errors = Vec::new();

    if form.name.trim().is_empty() {
        errors.push("El nombre de la propuesta es obligatorio".to_string());
    }
    if form.description.trim().is_empty() {
        errors.push("La descripción de la propuesta es obligatoria".to_string());
    }
    if form.project_type.trim().parse::<i64>().is_err() {
        errors.push("Debe seleccionar un tipo de proyecto válido".to_string());
    }
    if form.subject.trim().parse::<i64>().is_err() {
        errors.push("Debe seleccionar una materia válida".to_string());
    }
    if form.difficulty_level.parse::<DifficultyLevel>().is_err() {
        errors.push("Debe seleccionar un nivel de dificultad válido (Bajo, Medio o Alto)".to_string());
    }

    errors
}

pub fn validate_objectives(form: &ProposalForm) -> Vec<String> {
    if form.objectives.is_empty() {
        return vec!["Debe agregar al menos un objetivo".to_string()];
    }

    let mut errors = Vec::new();
    let generals: Vec<_> = form
        .objectives
        .iter()
        .filter(|o| o.kind() == Some(ObjectiveType::General))
        .collect();
    let specifics = form
        .objectives
        .iter()
        .filter(|o| o.kind() == Some(ObjectiveType::Especifico))
        .count();

    let has_complete_general = generals
        .iter()
        .any(|o| !o.name.trim().is_empty() && !o.description.trim().is_empty());
    if !has_complete_general {
        errors.push("Debe existir al menos un objetivo general con nombre y descripción".to_string());
    }
    if generals.len() > 1 {
        errors.push("Solo puede existir un objetivo general".to_string());
    }
    if specifics > MAX_SPECIFIC_OBJECTIVES {
        errors.push(format!(
            "No puede haber más de {MAX_SPECIFIC_OBJECTIVES} objetivos específicos"
        ));
    }

    errors
}

pub fn validate_group_proposal(form: &ProposalForm) -> Vec<String> {
    if !form.is_group {
        return Vec::new();
    }

    match form.integrants.trim().parse::<i64>() {
        Ok(n) if n > 1 => Vec::new(),
        _ => vec!["Las propuestas grupales deben indicar un número de integrantes mayor a 1".to_string()],
    }
}

pub fn validate_requirements(form: &ProposalForm) -> Vec<String> {
    form.requirements
        .iter()
        .enumerate()
        .filter(|(_, r)| r.name.trim().is_empty())
        .map(|(i, _)| format!("El requisito {} debe tener un nombre", i + 1))
        .collect()
}

use crate::models::analysis::PdfAnalysis;
use crate::models::pea::{ApiPea, KeyConcept, Pea, PeaDraft, PeaPayload, CURRICULAR_UNITS};

use super::format::parse_timestamp;

pub fn pea_from_api(raw: &ApiPea) -> Pea {
    Pea {
        id: raw.pea_id.unwrap_or_default(),
        subject_id: raw.s_id.unwrap_or_default(),
        description: raw.pea_description.clone().unwrap_or_default(),
        objective: raw.pea_objective.clone().unwrap_or_default(),
        key_concepts: raw
            .key_concepts
            .iter()
            .flatten()
            .map(|kc| KeyConcept {
                kc_unit: kc.kc_unit.and_then(|u| u8::try_from(u).ok()).unwrap_or(0),
                kc_name: kc.kc_name.clone().unwrap_or_default(),
            })
            .collect(),
        date_created: raw.pea_date_created.as_deref().and_then(parse_timestamp),
    }
}

pub fn pea_payload_from_draft(draft: &PeaDraft) -> PeaPayload {
    PeaPayload {
        s_id: draft.subject_id,
        pea_description: draft.description.trim().to_string(),
        pea_objective: draft.objective.trim().to_string(),
        key_concepts: draft
            .key_concepts
            .iter()
            .map(|kc| KeyConcept::new(kc.kc_unit, kc.kc_name.trim()))
            .collect(),
    }
}

/// Draft a PEA from the analysis of an uploaded document. Units without a
/// number take their position; units outside 1..=3 are dropped, as are blank
/// and repeated concepts.
pub fn pea_draft_from_analysis(subject_id: i64, analysis: &PdfAnalysis) -> PeaDraft {
    let mut key_concepts: Vec<KeyConcept> = Vec::new();

    for (index, unit) in analysis.unidades_curriculares.iter().enumerate() {
        let number = unit.numero.unwrap_or(index as i64 + 1);
        let Some(number) = u8::try_from(number).ok().filter(|n| CURRICULAR_UNITS.contains(n)) else {
            tracing::debug!(unit = number, "skipping curricular unit outside 1..=3");
            continue;
        };

        for concept in &unit.conceptos {
            let name = concept.trim();
            if name.is_empty() {
                continue;
            }
            if key_concepts.iter().any(|kc| kc.kc_unit == number && kc.kc_name == name) {
                continue;
            }
            key_concepts.push(KeyConcept::new(number, name));
        }
    }

    PeaDraft {
        subject_id,
        description: analysis.contenido_academico.descripcion.clone().unwrap_or_default(),
        objective: analysis.contenido_academico.objetivo_general.clone().unwrap_or_default(),
        key_concepts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_from_analysis_groups_concepts_by_unit() {
        let analysis: PdfAnalysis = serde_json::from_value(serde_json::json!({
            "informacionGeneral": {"nombreAsignatura": "Redes"},
            "contenidoAcademico": {"descripcion": "Fundamentos", "objetivoGeneral": "Comprender TCP/IP"},
            "unidadesCurriculares": [
                {"numero": 1, "conceptos": ["OSI", " ", "OSI"]},
                {"conceptos": ["Enrutamiento"]},
                {"numero": 3, "conceptos": ["DNS"]},
                {"numero": 4, "conceptos": ["Extra"]}
            ],
            "estadisticas": {"paginas": 12}
        }))
        .unwrap();

        let draft = pea_draft_from_analysis(8, &analysis);
        assert_eq!(draft.subject_id, 8);
        assert_eq!(draft.objective, "Comprender TCP/IP");
        assert_eq!(
            draft.key_concepts,
            vec![
                KeyConcept::new(1, "OSI"),
                KeyConcept::new(2, "Enrutamiento"),
                KeyConcept::new(3, "DNS"),
            ]
        );
    }

    #[test]
    fn api_pea_defaults() {
        let pea = pea_from_api(&ApiPea {
            pea_id: Some(2),
            pea_date_created: Some("2024-03-01T10:00:00Z".into()),
            ..Default::default()
        });
        assert!(pea.key_concepts.is_empty());
        assert!(pea.date_created.is_some());
        assert_eq!(pea.subject_id, 0);
    }
}

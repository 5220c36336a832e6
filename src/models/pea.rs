use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const CURRICULAR_UNITS: [u8; 3] = [1, 2, 3];
pub const MAX_CONCEPT_NAME_LEN: u64 = 100;

/// A key concept of a curricular unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct KeyConcept {
    #[validate(range(min = 1, max = 3, message = "La unidad debe ser 1, 2 o 3"))]
    pub kc_unit: u8,
    #[validate(length(max = 100, message = "El nombre del concepto no puede superar los 100 caracteres"))]
    pub kc_name: String,
}

impl KeyConcept {
    pub fn new(unit: u8, name: impl Into<String>) -> Self {
        Self {
            kc_unit: unit,
            kc_name: name.into(),
        }
    }
}

/// Teaching plan (Plan de Enseñanza-Aprendizaje) of a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pea {
    pub id: i64,
    pub subject_id: i64,
    pub description: String,
    pub objective: String,
    pub key_concepts: Vec<KeyConcept>,
    pub date_created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiPea {
    pub pea_id: Option<i64>,
    pub s_id: Option<i64>,
    pub pea_description: Option<String>,
    pub pea_objective: Option<String>,
    pub key_concepts: Option<Vec<ApiKeyConcept>>,
    pub pea_date_created: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeyConcept {
    pub kc_unit: Option<i64>,
    pub kc_name: Option<String>,
}

/// PEA being assembled before submission, usually from an analysed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeaDraft {
    pub subject_id: i64,
    pub description: String,
    pub objective: String,
    pub key_concepts: Vec<KeyConcept>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeaPayload {
    pub s_id: i64,
    pub pea_description: String,
    pub pea_objective: String,
    pub key_concepts: Vec<KeyConcept>,
}

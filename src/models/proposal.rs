use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Bajo,
    Medio,
    Alto,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [DifficultyLevel::Bajo, DifficultyLevel::Medio, DifficultyLevel::Alto];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Bajo => "Bajo",
            DifficultyLevel::Medio => "Medio",
            DifficultyLevel::Alto => "Alto",
        }
    }
}

impl FromStr for DifficultyLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DifficultyLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s.trim())
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApprovalStatus {
    #[default]
    Pendiente,
    Aprobada,
    Rechazada,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pendiente => "Pendiente",
            ApprovalStatus::Aprobada => "Aprobada",
            ApprovalStatus::Rechazada => "Rechazada",
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pendiente" => Ok(ApprovalStatus::Pendiente),
            "Aprobada" => Ok(ApprovalStatus::Aprobada),
            "Rechazada" => Ok(ApprovalStatus::Rechazada),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveType {
    General,
    #[serde(rename = "Específico")]
    Especifico,
}

impl ObjectiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveType::General => "General",
            ObjectiveType::Especifico => "Específico",
        }
    }
}

impl FromStr for ObjectiveType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "General" => Ok(ObjectiveType::General),
            "Específico" | "Especifico" => Ok(ObjectiveType::Especifico),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Objective {
    pub name: String,
    pub description: String,
    pub kind: ObjectiveType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub name: String,
}

/// A project proposal as the permission evaluator sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Proposal {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub difficulty_level: Option<DifficultyLevel>,
    pub approval_status: ApprovalStatus,
    pub author_id: Option<i64>,
    pub author_role: Option<Role>,
    pub subject_id: Option<i64>,
    pub project_type: Option<i64>,
    pub is_group: bool,
    pub max_integrants: Option<u32>,
    pub date_limit: Option<NaiveDate>,
    pub objectives: Vec<Objective>,
    pub requirements: Vec<Requirement>,
}

impl Proposal {
    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == Some(user_id)
    }

    pub fn is_approved(&self) -> bool {
        self.approval_status == ApprovalStatus::Aprobada
    }
}

/// Proposal in wire shape. Every field is optional so that partial records
/// from the API never fail to decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiProposal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_id: Option<i64>,
    pub p_name: Option<String>,
    pub p_description: Option<String>,
    pub p_difficulty_level: Option<String>,
    pub p_approval_status: Option<String>,
    pub p_author_id: Option<i64>,
    pub p_author_role: Option<i64>,
    pub p_subject_id: Option<i64>,
    pub p_project_type: Option<i64>,
    pub p_is_group: Option<bool>,
    pub p_max_integrants: Option<u32>,
    pub p_date_limit: Option<String>,
    pub objectives: Option<Vec<ApiObjective>>,
    pub requirements: Option<Vec<ApiRequirement>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiObjective {
    pub o_name: Option<String>,
    pub o_description: Option<String>,
    pub o_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiRequirement {
    pub r_name: Option<String>,
}

/// Input-bound proposal form. Select and number inputs hold raw strings;
/// they are parsed by the validators and the API mapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalForm {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub difficulty_level: String,
    pub project_type: String,
    pub subject: String,
    pub is_group: bool,
    pub integrants: String,
    pub date_limit: String,
    pub approval_status: String,
    pub author_id: Option<i64>,
    pub author_role: Option<i64>,
    pub objectives: Vec<ObjectiveForm>,
    pub requirements: Vec<RequirementForm>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveForm {
    pub name: String,
    pub description: String,
    pub kind: String,
}

impl ObjectiveForm {
    pub fn new(kind: ObjectiveType, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: kind.as_str().to_string(),
        }
    }

    pub fn kind(&self) -> Option<ObjectiveType> {
        self.kind.parse().ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequirementForm {
    pub name: String,
}

//! Boundary with the REST backend and the PDF analysis service.
//!
//! The core only builds payloads and reads the `{ok, data, message}` envelope;
//! transport details live in the HTTP implementations.

mod http;
mod pdf;

pub use http::HttpApiClient;
pub use pdf::{HttpPdfAnalyzer, PdfAnalysisService};

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::models::{
    ApiPea, ApiProposal, ApiSubject, ApiUser, AssignmentPayload, PeaPayload, SubjectPayload, UserListMode,
};

pub const INVALID_RESPONSE: &str = "Respuesta inválida del servidor";
pub const GENERIC_FAILURE: &str = "Ocurrió un error al procesar la solicitud";

#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn create_proposal(&self, payload: &ApiProposal) -> AppResult<ApiProposal>;
    async fn create_subject(&self, payload: &SubjectPayload) -> AppResult<ApiSubject>;
    async fn assign_subject_to_user(&self, payload: &AssignmentPayload) -> AppResult<()>;
    async fn remove_assignment(&self, payload: &AssignmentPayload) -> AppResult<()>;
    async fn list_catalog(&self, section: CatalogSection, filters: &CatalogFilters) -> AppResult<Vec<Value>>;
    async fn create_pea(&self, payload: &PeaPayload) -> AppResult<ApiPea>;
    async fn list_pea(&self, subject_id: i64) -> AppResult<Vec<ApiPea>>;
    async fn list_users(&self, admin_id: i64, mode: UserListMode) -> AppResult<Vec<ApiUser>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSection {
    Proposals,
    Subjects,
    ProjectTypes,
}

impl CatalogSection {
    pub fn path(&self) -> &'static str {
        match self {
            CatalogSection::Proposals => "proposals",
            CatalogSection::Subjects => "subjects",
            CatalogSection::ProjectTypes => "project-types",
        }
    }
}

pub type CatalogFilters = BTreeMap<String, String>;

/// Response envelope shared by every backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub ok: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// `ok == false` becomes a normalized API error carrying the server's message.
    pub fn into_result(self, status: Option<u16>) -> AppResult<Option<T>> {
        if self.ok {
            Ok(self.data)
        } else {
            Err(AppError::api(
                status,
                self.message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            ))
        }
    }
}

pub(crate) fn required<T>(data: Option<T>) -> AppResult<T> {
    data.ok_or_else(|| AppError::Decode(INVALID_RESPONSE.to_string()))
}

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{
    ApiPea, ApiProposal, ApiSubject, ApiUser, AssignmentPayload, PeaPayload, SubjectPayload, UserListMode,
};

use super::{required, ApiClient, ApiEnvelope, CatalogFilters, CatalogSection, GENERIC_FAILURE};

/// `ApiClient` over HTTP with bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpApiClient {
    pub fn new(config: ApiConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| AppError::configuration(format!("failed to build http client: {err}")))?;

        Ok(Self { client, config })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.config.base_url, path.trim_start_matches('/'));
        let builder = self.client.request(method, url);
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and unwrap the envelope. Transport failures, non-2xx statuses and
    /// `ok == false` all come back as normalized errors.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<Option<T>> {
        let response = builder.send().await.map_err(|err| {
            tracing::error!(error = %err, "request failed before a response");
            AppError::from(err)
        })?;

        let status = response.status();
        let code = status.as_u16();
        let body = response.bytes().await.map_err(AppError::from)?;
        let envelope = serde_json::from_slice::<ApiEnvelope<T>>(&body);

        match envelope {
            Ok(envelope) if status.is_success() => envelope.into_result(Some(code)),
            Ok(envelope) => {
                let message = envelope
                    .message
                    .or_else(|| status.canonical_reason().map(String::from))
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string());
                tracing::warn!(status = code, reason = %message, "api returned an error status");
                Err(AppError::api(Some(code), message))
            }
            Err(err) if status.is_success() => {
                tracing::error!(status = code, error = %err, "undecodable api response");
                Err(AppError::Decode(err.to_string()))
            }
            Err(_) => {
                let message = status
                    .canonical_reason()
                    .map(String::from)
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string());
                tracing::warn!(status = code, "api returned an error status without envelope");
                Err(AppError::api(Some(code), message))
            }
        }
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn create_proposal(&self, payload: &ApiProposal) -> AppResult<ApiProposal> {
        let data = self.send(self.request(Method::POST, "proposals").json(payload)).await?;
        required(data)
    }

    async fn create_subject(&self, payload: &SubjectPayload) -> AppResult<ApiSubject> {
        let data = self.send(self.request(Method::POST, "subjects").json(payload)).await?;
        required(data)
    }

    async fn assign_subject_to_user(&self, payload: &AssignmentPayload) -> AppResult<()> {
        self.send::<Value>(self.request(Method::POST, "subjects/assign").json(payload))
            .await
            .map(|_| ())
    }

    async fn remove_assignment(&self, payload: &AssignmentPayload) -> AppResult<()> {
        self.send::<Value>(self.request(Method::POST, "subjects/unassign").json(payload))
            .await
            .map(|_| ())
    }

    async fn list_catalog(&self, section: CatalogSection, filters: &CatalogFilters) -> AppResult<Vec<Value>> {
        let data = self.send(self.request(Method::GET, section.path()).query(filters)).await?;
        Ok(data.unwrap_or_default())
    }

    async fn create_pea(&self, payload: &PeaPayload) -> AppResult<ApiPea> {
        let data = self.send(self.request(Method::POST, "pea").json(payload)).await?;
        required(data)
    }

    async fn list_pea(&self, subject_id: i64) -> AppResult<Vec<ApiPea>> {
        let data = self
            .send(self.request(Method::GET, &format!("pea/subject/{subject_id}")))
            .await?;
        Ok(data.unwrap_or_default())
    }

    async fn list_users(&self, admin_id: i64, mode: UserListMode) -> AppResult<Vec<ApiUser>> {
        let data = self
            .send(
                self.request(Method::GET, &format!("users/{admin_id}"))
                    .query(&[("mode", mode.as_str())]),
            )
            .await?;
        Ok(data.unwrap_or_default())
    }
}

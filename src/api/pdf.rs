use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::errors::{AppError, AppResult};
use crate::models::analysis::PdfAnalysis;

/// External service that extracts a PEA outline from an uploaded document.
#[async_trait]
pub trait PdfAnalysisService: Send + Sync {
    async fn is_healthy(&self) -> bool;
    async fn analyze(&self, file_name: &str, document: Vec<u8>) -> AppResult<PdfAnalysis>;
}

#[derive(Debug, Clone)]
pub struct HttpPdfAnalyzer {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPdfAnalyzer {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::configuration(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PdfAnalysisService for HttpPdfAnalyzer {
    async fn is_healthy(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::warn!(error = %err, "pdf analysis health check failed");
                false
            }
        }
    }

    async fn analyze(&self, file_name: &str, document: Vec<u8>) -> AppResult<PdfAnalysis> {
        let response = self
            .client
            .post(format!("{}/analyze", self.base_url))
            .header(CONTENT_TYPE, "application/pdf")
            .header("x-file-name", file_name)
            .body(document)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::api(
                Some(status.as_u16()),
                "No se pudo analizar el documento",
            ));
        }

        Ok(response.json::<PdfAnalysis>().await?)
    }
}

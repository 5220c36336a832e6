use std::sync::Arc;

use crate::api::{ApiClient, HttpApiClient, HttpPdfAnalyzer};
use crate::config::{ApiConfig, SessionConfig};
use crate::errors::{AppError, AppResult};
use crate::identity::{IdentityProvider, StaticIdentity, TokenCodec, TokenIdentity};
use crate::models::User;
use crate::notify::{NotificationBus, Notifier};
use crate::services::PeaService;

/// Collaborators handed to every flow. Nothing in the core reaches for globals.
#[derive(Clone)]
pub struct AppContext {
    pub api: Arc<dyn ApiClient>,
    pub notifier: Arc<dyn Notifier>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppContext {
    pub fn new(
        api: impl ApiClient + 'static,
        notifier: impl Notifier + 'static,
        identity: impl IdentityProvider + 'static,
    ) -> Self {
        Self {
            api: Arc::new(api),
            notifier: Arc::new(notifier),
            identity: Arc::new(identity),
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.identity.current_user()
    }
}

/// Context wired from the environment: HTTP client, notification bus and the
/// identity carried by `API_TOKEN`.
pub fn create_context(bus: NotificationBus) -> Result<AppContext, AppError> {
    context_from_config(ApiConfig::from_env()?, bus)
}

/// PEA service whose document analysis goes to `PDF_API_URL`.
pub fn create_pea_service(bus: NotificationBus) -> AppResult<PeaService> {
    let api_config = ApiConfig::from_env()?;
    let analyzer = create_pdf_analyzer(&api_config)?
        .ok_or_else(|| AppError::configuration("PDF_API_URL not set"))?;
    let ctx = context_from_config(api_config, bus)?;
    Ok(PeaService::new(ctx, Arc::new(analyzer)))
}

/// `None` when no PDF service is configured.
pub fn create_pdf_analyzer(config: &ApiConfig) -> AppResult<Option<HttpPdfAnalyzer>> {
    config
        .pdf_api_url
        .as_deref()
        .map(|url| HttpPdfAnalyzer::new(url, config.timeout))
        .transpose()
}

fn context_from_config(api_config: ApiConfig, bus: NotificationBus) -> AppResult<AppContext> {
    let session = SessionConfig::from_env();

    let identity: Arc<dyn IdentityProvider> = match api_config.token.as_deref() {
        Some(token) => Arc::new(TokenIdentity::from_token(&TokenCodec::new(&session), token)),
        None => Arc::new(StaticIdentity::anonymous()),
    };
    let api = HttpApiClient::new(api_config)?;

    Ok(AppContext {
        api: Arc::new(api),
        notifier: Arc::new(bus),
        identity,
    })
}

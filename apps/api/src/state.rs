use std::sync::Arc;

use crate::auth::providers::ProviderClient;
use crate::auth::AuthConfig;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Read-only auth wiring, built once at startup.
    pub auth: Arc<AuthConfig>,
    /// Talks to the OAuth providers. Stubbed in tests.
    pub oauth: Arc<dyn ProviderClient>,
}

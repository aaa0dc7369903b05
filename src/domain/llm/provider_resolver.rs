use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use super::LlmProvider;
use crate::domain::DomainError;

/// Where and as whom a provider call is made
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProviderEndpoint {
    pub api_key: String,
    pub base_url: String,
}

impl ProviderEndpoint {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

impl fmt::Debug for ProviderEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderEndpoint")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Hands out the provider to use for an endpoint.
///
/// Endpoints come from the active configuration on every call, so a rotated
/// key or moved host takes effect on the next request.
#[async_trait]
pub trait ProviderResolver: Send + Sync + fmt::Debug {
    async fn resolve(&self, endpoint: &ProviderEndpoint)
        -> Result<Arc<dyn LlmProvider>, DomainError>;
}

/// Resolver that always returns the same provider, whatever the endpoint.
#[derive(Debug)]
pub struct StaticProviderResolver {
    provider: Arc<dyn LlmProvider>,
}

impl StaticProviderResolver {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ProviderResolver for StaticProviderResolver {
    async fn resolve(
        &self,
        _endpoint: &ProviderEndpoint,
    ) -> Result<Arc<dyn LlmProvider>, DomainError> {
        Ok(self.provider.clone())
    }
}

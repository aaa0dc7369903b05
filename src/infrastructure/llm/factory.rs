use std::sync::Arc;

use super::http_client::HttpClient;
use super::resolver::CachedProviderResolver;
use super::{OpenAiProvider, RegionalProvider};
use crate::domain::{LlmProvider, ProviderEndpoint, ProviderResolver};

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Regional provider serving primary dialogue
    pub fn create_primary(endpoint: &ProviderEndpoint) -> Arc<dyn LlmProvider> {
        Arc::new(RegionalProvider::new(
            HttpClient::new(),
            endpoint.api_key.clone(),
            endpoint.base_url.clone(),
        ))
    }

    /// OpenAI-compatible provider serving escalation and extraction
    pub fn create_fallback(endpoint: &ProviderEndpoint) -> Arc<dyn LlmProvider> {
        Arc::new(OpenAiProvider::with_base_url(
            HttpClient::new(),
            endpoint.api_key.clone(),
            endpoint.base_url.clone(),
        ))
    }

    /// Resolver building regional providers for whatever endpoint is configured
    pub fn primary_resolver() -> Arc<dyn ProviderResolver> {
        Arc::new(CachedProviderResolver::new(Self::create_primary))
    }

    /// Resolver building OpenAI-compatible providers for whatever endpoint is configured
    pub fn fallback_resolver() -> Arc<dyn ProviderResolver> {
        Arc::new(CachedProviderResolver::new(Self::create_fallback))
    }
}

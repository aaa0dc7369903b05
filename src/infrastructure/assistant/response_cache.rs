//! Per-conversation cache of assistant responses

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{AiResponse, Cache, CacheExt, CacheKeyGenerator, CacheKeyParams, DefaultKeyGenerator};
use crate::infrastructure::observability::record_cache_lookup;

const NAMESPACE: &str = "ai_response";

/// Stores finished responses keyed by conversation and message content.
///
/// The cache is best effort: read failures count as a miss and write failures
/// are only logged.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    cache: Arc<dyn Cache>,
    key_generator: DefaultKeyGenerator,
}

impl ResponseCache {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self {
            cache,
            key_generator: DefaultKeyGenerator::new(),
        }
    }

    /// `ai_response:{conversation_id}:message={sha256 of message}`
    pub fn key_for(&self, conversation_id: &str, message: &str) -> String {
        let params = CacheKeyParams::new(conversation_id).with_hashed_component("message", message);
        self.key_generator.generate_with_namespace(NAMESPACE, &params)
    }

    pub async fn lookup(&self, conversation_id: &str, message: &str) -> Option<AiResponse> {
        let key = self.key_for(conversation_id, message);

        match self.cache.get::<AiResponse>(&key).await {
            Ok(Some(response)) => {
                record_cache_lookup("hit");
                debug!(key = %key, "Response cache hit");
                Some(response)
            }
            Ok(None) => {
                record_cache_lookup("miss");
                None
            }
            Err(e) => {
                record_cache_lookup("error");
                warn!(key = %key, error = %e, "Response cache read failed, treating as miss");
                None
            }
        }
    }

    /// Stores `response` for `ttl_secs` seconds; a zero TTL stores nothing
    pub async fn store(
        &self,
        conversation_id: &str,
        message: &str,
        response: &AiResponse,
        ttl_secs: u64,
    ) {
        if ttl_secs == 0 {
            return;
        }

        let key = self.key_for(conversation_id, message);
        if let Err(e) = self
            .cache
            .set(&key, response, Duration::from_secs(ttl_secs))
            .await
        {
            warn!(key = %key, error = %e, "Failed to cache response");
        }
    }
}

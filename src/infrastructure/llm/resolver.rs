use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{DomainError, LlmProvider, ProviderEndpoint, ProviderResolver};

type BuildProvider = dyn Fn(&ProviderEndpoint) -> Arc<dyn LlmProvider> + Send + Sync;

/// Keeps the provider built for the last endpoint seen and rebuilds it when
/// the endpoint changes.
pub struct CachedProviderResolver {
    build: Box<BuildProvider>,
    current: RwLock<Option<(ProviderEndpoint, Arc<dyn LlmProvider>)>>,
}

impl CachedProviderResolver {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(&ProviderEndpoint) -> Arc<dyn LlmProvider> + Send + Sync + 'static,
    {
        Self {
            build: Box::new(build),
            current: RwLock::new(None),
        }
    }
}

impl fmt::Debug for CachedProviderResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedProviderResolver")
            .field("current", &"<provider>")
            .finish()
    }
}

#[async_trait]
impl ProviderResolver for CachedProviderResolver {
    async fn resolve(
        &self,
        endpoint: &ProviderEndpoint,
    ) -> Result<Arc<dyn LlmProvider>, DomainError> {
        if let Some((bound, provider)) = self.current.read().await.as_ref() {
            if bound == endpoint {
                return Ok(provider.clone());
            }
        }

        let mut current = self.current.write().await;

        // Another caller may have rebuilt it while we waited for the lock
        if let Some((bound, provider)) = current.as_ref() {
            if bound == endpoint {
                return Ok(provider.clone());
            }
        }

        let provider = (self.build)(endpoint);
        info!(
            provider = provider.provider_name(),
            base_url = %endpoint.base_url,
            "Provider bound to endpoint"
        );
        *current = Some((endpoint.clone(), provider.clone()));

        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_resolver(builds: Arc<AtomicUsize>) -> CachedProviderResolver {
        CachedProviderResolver::new(move |_endpoint| {
            builds.fetch_add(1, Ordering::SeqCst);
            Arc::new(MockLlmProvider::new("mock"))
        })
    }

    #[tokio::test]
    async fn test_same_endpoint_reuses_provider() {
        let builds = Arc::new(AtomicUsize::new(0));
        let resolver = counting_resolver(builds.clone());
        let endpoint = ProviderEndpoint::new("key", "https://api.example");

        let first = resolver.resolve(&endpoint).await.unwrap();
        let second = resolver.resolve(&endpoint).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_changed_key_or_host_rebuilds_provider() {
        let builds = Arc::new(AtomicUsize::new(0));
        let resolver = counting_resolver(builds.clone());

        resolver
            .resolve(&ProviderEndpoint::new("old", "https://api.example"))
            .await
            .unwrap();
        resolver
            .resolve(&ProviderEndpoint::new("new", "https://api.example"))
            .await
            .unwrap();
        resolver
            .resolve(&ProviderEndpoint::new("new", "https://other.example"))
            .await
            .unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 3);
    }
}

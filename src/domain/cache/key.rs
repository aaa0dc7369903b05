//! Cache key generation strategies

use std::collections::BTreeMap;
use std::fmt::Debug;

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of the given content.
///
/// Stable across processes, so keys computed by different replicas agree
/// when the cache is shared (redis).
pub fn content_hash(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Trait for generating cache keys from input data
pub trait CacheKeyGenerator: Send + Sync + Debug {
    /// Generates a cache key from the given components
    fn generate(&self, params: &CacheKeyParams) -> String;

    /// Generates a key with a namespace prefix
    fn generate_with_namespace(&self, namespace: &str, params: &CacheKeyParams) -> String {
        format!("{}:{}", namespace, self.generate(params))
    }
}

/// Parameters for cache key generation
#[derive(Debug, Clone, Default)]
pub struct CacheKeyParams {
    /// Primary identifier (e.g., conversation ID)
    pub primary: String,
    /// Secondary components (sorted for consistency)
    pub components: BTreeMap<String, String>,
}

impl CacheKeyParams {
    /// Creates new cache key parameters with a primary identifier
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            components: BTreeMap::new(),
        }
    }

    /// Adds a component to the key parameters
    pub fn with_component(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.components.insert(key.into(), value.into());
        self
    }

    /// Adds a component whose value is replaced by its content hash
    pub fn with_hashed_component(self, key: impl Into<String>, value: &str) -> Self {
        self.with_component(key, content_hash(value))
    }
}

/// Default cache key generator joining the primary id and components with `:`
#[derive(Debug, Clone, Default)]
pub struct DefaultKeyGenerator;

impl DefaultKeyGenerator {
    /// Creates a new default key generator
    pub fn new() -> Self {
        Self
    }
}

impl CacheKeyGenerator for DefaultKeyGenerator {
    fn generate(&self, params: &CacheKeyParams) -> String {
        let mut parts = vec![params.primary.clone()];

        for (k, v) in &params.components {
            parts.push(format!("{}={}", k, v));
        }

        parts.join(":")
    }
}

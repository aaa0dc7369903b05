//! Domain layer - Core business logic and entities

pub mod assistant;
pub mod cache;
pub mod error;
pub mod llm;
pub mod storage;

pub use assistant::{
    AiConfiguration, AiConfigurationId, AiResponse, ConfigSource, ConfigurationStore,
    ConversationTurn, DialogueOptions, FallbackDialogue, FallbackReply, FallbackStrategy, FormData,
    PrimaryDialogue, PrimaryReply, ProviderSettings, RetryOutcome, RetryPolicy, SamplingOptions,
    Sender, StaticConfigSource,
};
pub use cache::{Cache, CacheExt, CacheKeyGenerator, CacheKeyParams, DefaultKeyGenerator};
pub use error::DomainError;
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, LlmResponseFormat,
    Message, MessageRole, ProviderEndpoint, ProviderResolver, StaticProviderResolver, Usage,
};
pub use storage::{Storage, StorageEntity, StorageKey};

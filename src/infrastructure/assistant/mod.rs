//! Assistant infrastructure - configuration, dialogue clients and orchestration

mod config_provider;
mod config_store;
mod dialogue;
mod extractor;
mod orchestrator;
mod response_cache;

pub use config_provider::{ConfigProvider, CONFIG_CACHE_KEY};
pub use config_store::StorageConfigurationStore;
pub use dialogue::{FallbackDialogueClient, PrimaryDialogueClient};
pub use extractor::{FormDataExtractor, EXTRACTION_INSTRUCTION};
pub use orchestrator::Orchestrator;
pub use response_cache::ResponseCache;

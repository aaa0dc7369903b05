//! Init-config command - seeds the AI configuration record

use super::load_for_command;

/// Seed the configuration if none exists and print the active one
pub async fn run() -> anyhow::Result<()> {
    let config = load_for_command();
    let state = crate::create_app_state_with_config(&config).await?;

    let active = state.config_provider.get_active_config().await?;

    println!("{}", serde_json::to_string_pretty(&active.masked())?);
    Ok(())
}

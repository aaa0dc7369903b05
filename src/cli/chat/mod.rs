//! Chat command - runs a single turn through the orchestrator

use clap::Args;

use super::load_for_command;

#[derive(Args, Debug, Clone)]
pub struct ChatArgs {
    /// Conversation the message belongs to
    #[arg(long, default_value = "cli")]
    pub conversation: String,

    /// Language code for the reply
    #[arg(long, default_value = "en")]
    pub language: String,

    /// The user's message
    pub message: String,
}

/// Process one message and print the AI response as JSON
pub async fn run(args: ChatArgs) -> anyhow::Result<()> {
    let config = load_for_command();
    let state = crate::create_app_state_with_config(&config).await?;

    let response = state
        .orchestrator
        .process_message(&args.conversation, &args.message, &args.language, &[])
        .await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

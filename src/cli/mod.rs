//! CLI module for Scheme Assistant
//!
//! Provides subcommands for running the assistant in different modes:
//! - `serve`: HTTP API server
//! - `init-config`: seed the AI configuration and print it
//! - `chat`: process a single message and print the reply

pub mod chat;
pub mod init_config;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Scheme Assistant - conversational form-filling with model escalation
#[derive(Parser)]
#[command(name = "scheme-assistant")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Seed the AI configuration if missing and print it with secrets masked
    InitConfig,

    /// Send one message through the orchestrator and print the reply
    Chat(chat::ChatArgs),
}

/// Loads `.env` and the layered configuration, then sets up console logging
fn load_for_command() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_command() {
        let cli = Cli::try_parse_from([
            "scheme-assistant",
            "chat",
            "--conversation",
            "conv-7",
            "--language",
            "ta",
            "How do I apply?",
        ])
        .unwrap();

        match cli.command {
            Command::Chat(args) => {
                assert_eq!(args.conversation, "conv-7");
                assert_eq!(args.language, "ta");
                assert_eq!(args.message, "How do I apply?");
            }
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_chat_language_defaults_to_english() {
        let cli = Cli::try_parse_from(["scheme-assistant", "chat", "Hello"]).unwrap();

        let Command::Chat(args) = cli.command else {
            panic!("expected chat command");
        };
        assert_eq!(args.language, "en");
        assert_eq!(args.conversation, "cli");
    }

    #[test]
    fn test_chat_requires_message() {
        assert!(Cli::try_parse_from(["scheme-assistant", "chat"]).is_err());
    }

    #[test]
    fn test_parse_serve_and_init_config() {
        assert!(matches!(
            Cli::try_parse_from(["scheme-assistant", "serve"]).unwrap().command,
            Command::Serve
        ));
        assert!(matches!(
            Cli::try_parse_from(["scheme-assistant", "init-config"]).unwrap().command,
            Command::InitConfig
        ));
    }
}

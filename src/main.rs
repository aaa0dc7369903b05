use clap::Parser;
use scheme_assistant::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::InitConfig => cli::init_config::run().await,
        Command::Chat(args) => cli::chat::run(args).await,
    }
}

use clap::Parser;
use keygate::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::LoginUrl(args) => cli::login::run_url(args).await,
        Command::Login(args) => cli::login::run(args).await,
        Command::Remotes => cli::remotes::run().await,
        Command::Keys(args) => cli::keys::run(args).await,
    }
}

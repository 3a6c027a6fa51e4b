//! Login commands - drive the team backend's OAuth flow by hand

use anyhow::Context;
use clap::Args;
use tracing::info_span;

use crate::config::AppConfig;
use crate::domain::{CallbackRequest, Team};
use crate::infrastructure::http::HttpClient;
use crate::infrastructure::team::GitHubOrganization;

/// Arguments for the login-url command
#[derive(Args, Clone)]
pub struct LoginUrlArgs {
    /// Unguessable value echoed back as `state` by the provider
    #[arg(long)]
    pub nonce: String,

    /// Where the provider sends the browser after login
    #[arg(long)]
    pub redirect_url: String,
}

/// Arguments for the login command
#[derive(Args, Clone)]
pub struct LoginArgs {
    /// The nonce used for the authorization URL
    #[arg(long)]
    pub nonce: String,

    /// The redirect URL used for the authorization URL
    #[arg(long)]
    pub redirect_url: String,

    /// Full URL the browser was redirected to
    #[arg(long)]
    pub callback: String,
}

pub async fn run_url(args: LoginUrlArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let team = build_team(&config)?;

    println!("{}", team.request_authentication(&args.nonce, &args.redirect_url)?);
    Ok(())
}

pub async fn run(args: LoginArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let team = build_team(&config)?;
    let callback = CallbackRequest::from_url(&args.callback)?;

    let identity = team
        .authenticate(&args.nonce, &args.redirect_url, &callback)
        .await?;

    println!("Logged in as {} ({})", identity.name(), identity.backend());
    Ok(())
}

fn build_team(config: &AppConfig) -> anyhow::Result<GitHubOrganization<HttpClient>> {
    let github = config
        .github
        .as_ref()
        .context("No team backend configured; set the github section")?;

    let team = GitHubOrganization::new(
        HttpClient::new()?,
        github.client_id.clone(),
        github.client_secret.clone(),
        github.org_login.clone(),
    )
    .with_endpoints(github.resolved_endpoints())
    .with_span(info_span!("team", backend = "github"));

    Ok(team)
}

mod card;
mod config;
mod error;
mod font;
mod github;
mod score;
mod stats;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use card::{Card, Theme};
use config::Config;
use font::CardFont;
use github::{GithubClient, TOKEN_ENV};

const EXIT_MISSING_CREDENTIAL: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "gh-stats-card")]
#[command(about = "Render a GitHub contribution stats card as PNG", long_about = None)]
#[command(version)]
struct Cli {
    /// GitHub username
    #[arg(long)]
    user: String,

    /// Output image path
    #[arg(long, default_value = "assets/github_stats.png")]
    out: PathBuf,

    /// TOML file with scoring weights, fonts and theme
    #[arg(long)]
    config: Option<PathBuf>,

    /// Card colour theme (overrides the config file)
    #[arg(long, value_enum)]
    theme: Option<Theme>,

    /// Font file tried before the system fonts
    #[arg(long)]
    font: Option<PathBuf>,

    /// GraphQL endpoint
    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = github::GITHUB_GRAPHQL_URL)]
    api_url: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(token) = github::token_from_env() else {
        eprintln!("Missing {TOKEN_ENV} in env");
        std::process::exit(EXIT_MISSING_CREDENTIAL);
    };

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let theme = cli.theme.or(config.theme).unwrap_or_default();
    debug!(?theme, weights = ?config.weights, "configuration resolved");

    let client = GithubClient::new(token)?.with_endpoint(cli.api_url.as_str());
    info!(user = %cli.user, "fetching contribution stats");
    let stats = client
        .user_stats(&cli.user)
        .await
        .with_context(|| format!("Failed to fetch stats for {}", cli.user))?;
    debug!(?stats, "stats fetched");

    let score = score::score(&stats, &config.weights);
    let grade = score::grade(score);
    info!(%score, %grade, "scored");

    let mut fonts = Vec::new();
    fonts.extend(cli.font.iter().cloned());
    fonts.extend(config.fonts.iter().cloned());
    let font = CardFont::load(&fonts);
    debug!(builtin = font.is_builtin(), "font selected");

    let card = Card {
        user: &cli.user,
        stats: &stats,
        score,
        grade,
        generated_on: Utc::now().date_naive(),
    };
    let image = card::draw_card(&card, theme, &font);
    card::save_card(&image, &cli.out)?;

    println!("Saved image to {}", cli.out.display());

    Ok(())
}

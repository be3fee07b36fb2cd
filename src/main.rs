use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vacancy_match::config::{CatalogKind, Settings};
use vacancy_match::core::{Matcher, PostingFilter};
use vacancy_match::models::{ChatRequest, EmploymentKind, HealthResponse, RecommendRequest, SeniorityLevel};
use vacancy_match::narrative::Advisor;
use vacancy_match::services::{
    CatalogSource, LlmClient, PostgresCatalog, RecommendationService, SnapshotCache,
};

#[derive(Parser)]
#[command(name = "vacancy-match")]
#[command(about = "Recommend job postings and skill gaps for a user profile")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to config/default.toml + config/local.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read the catalog from this JSON file instead of the configured source
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Rank postings and list skill gaps
    Recommend {
        /// A skill held by the user (repeatable)
        #[arg(long = "skill", short = 's')]
        skills: Vec<String>,
        /// junior, middle, senior or lead
        #[arg(long)]
        seniority: Option<String>,
        #[arg(long)]
        top_k: Option<u16>,
        #[arg(long)]
        top_n: Option<u16>,
    },
    /// List postings matching the given filters
    Postings {
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        seniority: Option<SeniorityLevel>,
        #[arg(long)]
        kind: Option<EmploymentKind>,
        #[arg(long)]
        organization: Option<i64>,
        /// Postings listing any of these skills (repeatable)
        #[arg(long = "skill", short = 's')]
        skills: Vec<String>,
        #[arg(long)]
        min_salary: Option<i64>,
    },
    /// Show one posting with its organization
    Posting { id: i64 },
    /// List all organizations
    Organizations,
    /// Show one organization
    Organization { id: i64 },
    /// Ask the career assistant a question
    Chat {
        message: String,
        #[arg(long = "skill", short = 's')]
        skills: Vec<String>,
        #[arg(long)]
        seniority: Option<String>,
    },
    /// Load the catalog and report its size and health
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("Failed to load configuration")?;

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Configuration loaded successfully");

    let source = build_source(&settings, cli.catalog.clone()).await?;

    let cache = SnapshotCache::new(
        settings.cache.max_snapshots.unwrap_or(4),
        settings.cache.ttl_secs.unwrap_or(300),
    );
    let matcher = Matcher::new(settings.scoring_weights());

    info!("Matcher initialized with weights: {:?}", matcher.weights());

    let service = RecommendationService::new(
        source,
        cache,
        matcher,
        settings.recommend.clone(),
        settings.catalog.strict,
    );

    match cli.command {
        Command::Recommend {
            skills,
            seniority,
            top_k,
            top_n,
        } => {
            let request = RecommendRequest {
                skills,
                seniority,
                top_k,
                top_n,
            };
            print_json(&service.recommend(&request).await?)?;
        }
        Command::Postings {
            location,
            seniority,
            kind,
            organization,
            skills,
            min_salary,
        } => {
            let filter = PostingFilter {
                location,
                seniority,
                employment_kind: kind,
                organization_id: organization,
                skills,
                min_salary,
            };
            print_json(&service.postings(&filter).await?)?;
        }
        Command::Posting { id } => {
            print_json(&service.posting(id).await?)?;
        }
        Command::Organizations => {
            print_json(&service.organizations().await?)?;
        }
        Command::Organization { id } => {
            print_json(&service.organization(id).await?)?;
        }
        Command::Chat {
            message,
            skills,
            seniority,
        } => {
            let llm = LlmClient::new(
                settings.llm.endpoint.clone(),
                settings.llm.api_key.clone(),
                settings.llm.model.clone(),
                Duration::from_secs(settings.llm.timeout_secs),
            )?;
            let advisor = Advisor::from_settings(
                llm,
                &settings.llm,
                settings.recommend.default_top_k,
                settings.recommend.default_top_n,
            );
            let request = ChatRequest {
                message,
                history: vec![],
                skills,
                seniority,
            };
            print_json(&advisor.chat(&service, &request).await?)?;
        }
        Command::Check => {
            let healthy = service.source().health_check().await?;
            let snapshot = service.snapshot().await?;
            print_json(&HealthResponse {
                status: if healthy { "healthy" } else { "degraded" }.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                postings: snapshot.len(),
                organizations: snapshot.organizations().count(),
                snapshot_built_at: snapshot.built_at(),
                cached_snapshots: service.cache_stats().await.cached_snapshots,
                timestamp: chrono::Utc::now(),
            })?;
        }
    }

    Ok(())
}

/// Initialize logging on stderr so stdout only carries results
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

async fn build_source(settings: &Settings, catalog: Option<PathBuf>) -> Result<CatalogSource> {
    if let Some(path) = catalog {
        return Ok(CatalogSource::File(path));
    }

    match settings.catalog.source {
        CatalogKind::File => Ok(CatalogSource::File(settings.catalog.path.clone())),
        CatalogKind::Postgres => {
            let db = &settings.database;
            let catalog = PostgresCatalog::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .context("Failed to connect to PostgreSQL")?;

            info!(
                "PostgreSQL catalog initialized (max: {} connections)",
                db.max_connections.unwrap_or(10)
            );
            Ok(CatalogSource::Postgres(catalog))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

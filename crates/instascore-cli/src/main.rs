mod leaderboard;
mod profile;

use anyhow::Context;
use clap::{Parser, Subcommand};
use instascore_core::AppConfig;
use instascore_db::PgStore;
use instascore_scraper::{ClientConfig, InstagramClient};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "instascore")]
#[command(about = "Instagram engagement and influencer scoring")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch, score and store a single profile
    Profile {
        /// Instagram username; read from stdin when omitted
        username: Option<String>,

        /// Score and print without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the engagement summary for a profile
    Engagement {
        /// Instagram username
        username: String,
    },
    /// Print the stored record for a profile
    Show {
        /// Instagram username
        username: String,
    },
    /// Build a leaderboard of the top ranked accounts and store a snapshot
    Leaderboard {
        /// Number of ranked accounts to include (defaults to INSTASCORE_LEADERBOARD_SIZE)
        #[arg(long)]
        limit: Option<usize>,

        /// Print the leaderboard without writing a snapshot
        #[arg(long)]
        dry_run: bool,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("no command given; run `instascore --help` for usage");
        return Ok(());
    };

    let config = instascore_core::load_app_config().context("failed to load configuration")?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Profile { username, dry_run } => {
            profile::run_profile(&config, username, dry_run).await
        }
        Commands::Engagement { username } => profile::run_engagement(&config, &username).await,
        Commands::Show { username } => profile::run_show(&config, &username).await,
        Commands::Leaderboard { limit, dry_run } => {
            leaderboard::run_leaderboard(&config, limit, dry_run).await
        }
        Commands::Db { command } => run_db(&config, command).await,
    }
}

async fn run_db(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let store = connect_store(config).await?;
    match command {
        DbCommands::Ping => {
            instascore_db::health_check(store.pool()).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = instascore_db::run_migrations(store.pool())
                .await
                .context("failed to run migrations")?;
            println!("applied {applied} migration(s)");
        }
    }
    Ok(())
}

pub(crate) async fn connect_store(config: &AppConfig) -> anyhow::Result<PgStore> {
    let pool_config = instascore_db::PoolConfig::from_app_config(config);
    let database_url = config.require_database_url()?;
    let pool = instascore_db::connect_pool(database_url, pool_config)
        .await
        .context("failed to connect to database")?;
    Ok(PgStore::new(pool))
}

pub(crate) fn build_client(config: &AppConfig) -> anyhow::Result<InstagramClient> {
    InstagramClient::new(ClientConfig::from_app_config(config))
        .context("failed to build Instagram client")
}

#[cfg(test)]
mod tests;

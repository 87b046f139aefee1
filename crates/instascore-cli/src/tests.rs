use chrono::{TimeZone, Utc};
use instascore_core::{
    Environment, LeaderboardEntry, Post, ProfileRecord, ProfileSnapshot, ScoreWeights,
};

use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["instascore", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["instascore", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["instascore"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn profile_username_is_optional() {
    let cli = Cli::try_parse_from(["instascore", "profile"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Profile {
            username: None,
            dry_run: false
        })
    ));
}

#[test]
fn profile_with_username_and_dry_run() {
    let cli = Cli::try_parse_from(["instascore", "profile", "natgeo", "--dry-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Profile {
            username: Some(ref u),
            dry_run: true
        }) if u == "natgeo"
    ));
}

#[test]
fn engagement_requires_username() {
    assert!(Cli::try_parse_from(["instascore", "engagement"]).is_err());
    let cli = Cli::try_parse_from(["instascore", "engagement", "nasa"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Engagement { ref username }) if username == "nasa"
    ));
}

#[test]
fn show_parses_username() {
    let cli = Cli::try_parse_from(["instascore", "show", "@nasa"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Show { ref username }) if username == "@nasa"
    ));
}

#[test]
fn leaderboard_defaults() {
    let cli = Cli::try_parse_from(["instascore", "leaderboard"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Leaderboard {
            limit: None,
            dry_run: false
        })
    ));
}

#[test]
fn leaderboard_limit_and_dry_run() {
    let cli =
        Cli::try_parse_from(["instascore", "leaderboard", "--limit", "10", "--dry-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Leaderboard {
            limit: Some(10),
            dry_run: true
        })
    ));
}

#[test]
fn leaderboard_rejects_non_numeric_limit() {
    assert!(Cli::try_parse_from(["instascore", "leaderboard", "--limit", "lots"]).is_err());
}

#[tokio::test]
async fn read_username_trims_and_strips_at_sign() {
    let mut input: &[u8] = b"  @natgeo \n";
    assert_eq!(profile::read_username(&mut input).await.unwrap(), "natgeo");
}

#[tokio::test]
async fn read_username_rejects_empty_input() {
    let mut empty: &[u8] = b"";
    assert!(profile::read_username(&mut empty).await.is_err());

    let mut blank: &[u8] = b"\n";
    assert!(profile::read_username(&mut blank).await.is_err());

    let mut invalid: &[u8] = b"not a name\n";
    assert!(profile::read_username(&mut invalid).await.is_err());
}

#[test]
fn render_record_lists_scores_and_top_posts() {
    let at = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();
    let snapshot = ProfileSnapshot::new(
        "example",
        100,
        vec![Post::new("AAA", 10, 2, at), Post::new("BBB", 30, 5, at)],
    );
    let record = ProfileRecord::from_snapshot(snapshot, &ScoreWeights::default(), at);

    let out = profile::render_record(&record);
    assert!(out.starts_with("example (https://www.instagram.com/example/)"));
    assert!(out.contains("average likes:    20.00"));
    assert!(out.contains("engagement rate:  23.50%"));
    let score_line = out
        .lines()
        .find(|l| l.starts_with("influencer score:"))
        .expect("score line");
    let printed = score_line.rsplit(' ').next().unwrap();
    assert_eq!(printed, format!("{:.2}", record.score.influencer_score));
    let bbb = out.find("/p/BBB/").expect("top post listed");
    let aaa = out.find("/p/AAA/").expect("top post listed");
    assert!(bbb < aaa, "top posts are ordered by likes");
}

#[test]
fn leaderboard_table_keeps_entry_order() {
    let entry = |rank: u32, username: &str, rate: f64| LeaderboardEntry {
        rank,
        username: username.to_owned(),
        account_name: format!("{username} account"),
        profile_link: format!("https://www.instagram.com/{username}/"),
        followers: 1_000,
        following: 10,
        total_posts: 42,
        engagement_rate_percent: rate,
    };
    let table = leaderboard::format_table(&[entry(1, "alpha", 1.5), entry(3, "charlie", 0.25)]);
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("RANK"));
    assert!(lines[1].starts_with("1     alpha"));
    assert!(lines[1].contains("1.50%"));
    assert!(lines[2].starts_with("3     charlie"));
    assert!(lines[2].ends_with("charlie account"));
}

#[test]
fn leaderboard_table_with_no_entries_is_header_only() {
    assert_eq!(leaderboard::format_table(&[]).lines().count(), 1);
}

fn config_without_database() -> AppConfig {
    AppConfig {
        database_url: None,
        env: Environment::Development,
        bind_addr: "127.0.0.1:8000".parse().unwrap(),
        log_level: "info".to_string(),
        accounts_path: "./config/top_accounts.yaml".into(),
        db_max_connections: 10,
        db_min_connections: 1,
        db_acquire_timeout_secs: 10,
        scraper_base_url: "https://i.instagram.com".to_string(),
        scraper_request_timeout_secs: 30,
        scraper_user_agent: "ua".to_string(),
        scraper_app_id: "936619743392459".to_string(),
        scraper_session_id: None,
        scraper_max_attempts: 3,
        scraper_retry_backoff_base_ms: 1000,
        throttle_min_ms: 0,
        throttle_max_ms: 0,
        post_window: 12,
        leaderboard_size: 50,
        leaderboard_batch_size: 5,
        api_keys: Vec::new(),
        rate_limit_per_minute: 120,
    }
}

#[test]
fn instagram_client_builds_without_database_url() {
    assert!(build_client(&config_without_database()).is_ok());
}

#[tokio::test]
async fn store_connection_reports_missing_database_url() {
    let err = connect_store(&config_without_database()).await.unwrap_err();
    assert!(err.to_string().contains("DATABASE_URL"), "got {err:#}");
}

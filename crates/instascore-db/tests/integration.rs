//! Offline tests for instascore-db pool configuration and row conversion.
//! These tests do not require a live database connection.

use chrono::{TimeZone, Utc};
use instascore_core::{AppConfig, Environment, Post, ProfileRecord, ProfileSnapshot, ScoreWeights};
use instascore_db::{DbError, LeaderboardSnapshot, LeaderboardSnapshotRow, PoolConfig, ProfileRow};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use uuid::Uuid;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: Some("postgres://example".to_string()),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000),
        log_level: "info".to_string(),
        accounts_path: PathBuf::from("./config/top_accounts.yaml"),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        scraper_base_url: "https://i.instagram.com".to_string(),
        scraper_request_timeout_secs: 30,
        scraper_user_agent: "ua".to_string(),
        scraper_app_id: "936619743392459".to_string(),
        scraper_session_id: None,
        scraper_max_attempts: 3,
        scraper_retry_backoff_base_ms: 1000,
        throttle_min_ms: 2000,
        throttle_max_ms: 5000,
        post_window: 12,
        leaderboard_size: 50,
        leaderboard_batch_size: 5,
        api_keys: Vec::new(),
        rate_limit_per_minute: 120,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn profile_row_decodes_document() {
    let at = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
    let snapshot = ProfileSnapshot::new("nasa", 100, vec![Post::new("C1", 10, 2, at)]);
    let record = ProfileRecord::from_snapshot(snapshot, &ScoreWeights::default(), at);

    let row = ProfileRow {
        username: "nasa".to_string(),
        document: serde_json::to_value(&record).unwrap(),
        follower_count: 100,
        engagement_rate_percent: record.score.engagement_rate_percent,
        influencer_score: record.score.influencer_score,
        fetched_at: at,
        created_at: at,
        updated_at: at,
    };

    assert_eq!(row.into_record().unwrap(), record);
}

#[test]
fn profile_row_with_foreign_document_is_a_json_error() {
    let at = Utc::now();
    let row = ProfileRow {
        username: "nasa".to_string(),
        document: serde_json::json!({ "unexpected": true }),
        follower_count: 0,
        engagement_rate_percent: 0.0,
        influencer_score: 0.0,
        fetched_at: at,
        created_at: at,
        updated_at: at,
    };
    assert!(matches!(row.into_record(), Err(DbError::Json(_))));
}

#[test]
fn leaderboard_row_decodes_entries() {
    let row = LeaderboardSnapshotRow {
        id: 3,
        public_id: Uuid::new_v4(),
        captured_at: Utc::now(),
        entry_count: 1,
        entries: serde_json::json!([{
            "rank": 1,
            "username": "instagram",
            "account_name": "Instagram",
            "profile_link": "https://www.instagram.com/instagram/",
            "followers": 680000000,
            "following": 90,
            "total_posts": 7900,
            "engagement_rate_percent": 0.05
        }]),
    };

    let snapshot = LeaderboardSnapshot::try_from(row).unwrap();
    assert_eq!(snapshot.id, 3);
    assert_eq!(snapshot.entries.len(), 1);
    assert_eq!(snapshot.entries[0].username, "instagram");
}

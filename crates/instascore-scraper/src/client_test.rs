use super::*;

fn config(base_url: &str) -> ClientConfig {
    ClientConfig {
        base_url: base_url.to_owned(),
        timeout_secs: 5,
        user_agent: "instascore-test".to_owned(),
        app_id: "123".to_owned(),
        session_id: Some("secret-session".to_owned()),
        post_window: 12,
        max_attempts: 3,
        backoff_base_ms: 0,
    }
}

#[test]
fn profile_info_url_encodes_username() {
    let url = InstagramClient::profile_info_url("https://i.instagram.com", "nat.geo_").unwrap();
    assert_eq!(
        url,
        "https://i.instagram.com/api/v1/users/web_profile_info/?username=nat.geo_"
    );
}

#[test]
fn profile_info_url_strips_trailing_slash() {
    let url = InstagramClient::profile_info_url("https://i.instagram.com/", "nasa").unwrap();
    assert_eq!(
        url,
        "https://i.instagram.com/api/v1/users/web_profile_info/?username=nasa"
    );
}

#[test]
fn feed_url_without_cursor() {
    let url = InstagramClient::feed_url("https://i.instagram.com", "25025320", 12, None).unwrap();
    assert_eq!(url, "https://i.instagram.com/api/v1/feed/user/25025320/?count=12");
}

#[test]
fn feed_url_with_cursor() {
    let url = InstagramClient::feed_url(
        "https://i.instagram.com",
        "25025320",
        4,
        Some("3301_25025320"),
    )
    .unwrap();
    assert_eq!(
        url,
        "https://i.instagram.com/api/v1/feed/user/25025320/?count=4&max_id=3301_25025320"
    );
}

#[test]
fn endpoint_rejects_invalid_base() {
    let err = InstagramClient::profile_info_url("not a url", "nasa").unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidBaseUrl { .. }),
        "expected InvalidBaseUrl, got: {err:?}"
    );
}

#[test]
fn new_rejects_invalid_base() {
    let result = InstagramClient::new(config("::::"));
    assert!(matches!(result, Err(ScraperError::InvalidBaseUrl { .. })));
}

#[test]
fn new_accepts_valid_config() {
    assert!(InstagramClient::new(config("https://i.instagram.com")).is_ok());
}

#[test]
fn client_config_debug_redacts_session() {
    let rendered = format!("{:?}", config("https://i.instagram.com"));
    assert!(!rendered.contains("secret-session"));
    assert!(rendered.contains("[redacted]"));
}

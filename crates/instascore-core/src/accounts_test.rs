use std::path::Path;

use super::*;

#[test]
fn ranks_follow_file_order() {
    let yaml = "accounts:\n  - username: instagram\n    account_name: Instagram\n  - username: \"@cristiano\"\n    account_name: Cristiano Ronaldo\n";
    let ranked = parse_ranked_accounts(yaml).expect("valid file");
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].rank, 1);
    assert_eq!(ranked[0].username, "instagram");
    assert_eq!(ranked[1].rank, 2);
    assert_eq!(ranked[1].username, "cristiano");
    assert_eq!(ranked[1].account_name, "Cristiano Ronaldo");
}

#[test]
fn duplicate_usernames_are_rejected_case_insensitively() {
    let yaml = "accounts:\n  - username: NatGeo\n    account_name: National Geographic\n  - username: natgeo\n    account_name: Nat Geo\n";
    let err = parse_ranked_accounts(yaml).unwrap_err();
    assert!(err.to_string().contains("duplicate username"), "{err}");
}

#[test]
fn invalid_username_is_rejected() {
    let yaml = "accounts:\n  - username: \"not valid\"\n    account_name: Someone\n";
    let err = parse_ranked_accounts(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn empty_account_name_is_rejected() {
    let yaml = "accounts:\n  - username: nasa\n    account_name: \"  \"\n";
    let err = parse_ranked_accounts(yaml).unwrap_err();
    assert!(err.to_string().contains("empty account_name"), "{err}");
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let err = parse_ranked_accounts("accounts: [").unwrap_err();
    assert!(matches!(err, ConfigError::AccountsFileParse(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_ranked_accounts(Path::new("/nonexistent/top_accounts.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::AccountsFileIo { .. }));
}

#[test]
fn bundled_accounts_file_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/top_accounts.yaml");
    let ranked = load_ranked_accounts(&path).expect("bundled accounts file should load");
    assert!(ranked.len() >= 50, "expected at least 50 accounts");
    assert_eq!(ranked[0].rank, 1);
}

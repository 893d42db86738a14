use super::*;

#[test]
fn from_raw_none_uses_default() {
    assert_eq!(ApiConfig::from_raw(None).base_url, DEFAULT_API_BASE_URL);
}

#[test]
fn from_raw_blank_uses_default() {
    assert_eq!(ApiConfig::from_raw(Some("   ")).base_url, DEFAULT_API_BASE_URL);
}

#[test]
fn from_raw_trims_trailing_slashes() {
    let cfg = ApiConfig::from_raw(Some("https://api.example.test/v2//"));
    assert_eq!(cfg.base_url, "https://api.example.test/v2");
}

#[test]
fn endpoint_joins_with_single_slash() {
    let cfg = ApiConfig::from_raw(Some("https://api.example.test/"));
    assert_eq!(cfg.endpoint("/user/login"), "https://api.example.test/user/login");
    assert_eq!(cfg.endpoint("user/u1"), "https://api.example.test/user/u1");
}

#[test]
fn default_matches_from_raw_none() {
    assert_eq!(ApiConfig::default(), ApiConfig::from_raw(None));
}

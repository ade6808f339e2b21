use super::*;

#[test]
fn resolve_uses_defaults() {
    let cfg = ClientConfig::resolve(None, None, Some("/home/ada")).unwrap();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.store_path, PathBuf::from("/home/ada/.jobtrack/session.json"));
}

#[test]
fn resolve_trims_trailing_slash() {
    let cfg = ClientConfig::resolve(Some("https://api.example.test/"), None, Some("/h")).unwrap();
    assert_eq!(cfg.api_url, "https://api.example.test");
}

#[test]
fn resolve_rejects_non_http_url() {
    let err = ClientConfig::resolve(Some("ftp://example.test"), None, Some("/h")).unwrap_err();
    assert!(err.to_string().contains("invalid API URL"));
}

#[test]
fn resolve_explicit_store_path_skips_home() {
    let cfg = ClientConfig::resolve(None, Some(PathBuf::from("/tmp/s.json")), None).unwrap();
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/s.json"));
}

#[test]
fn resolve_without_home_or_path_errors() {
    let err = ClientConfig::resolve(None, None, None).unwrap_err();
    assert!(matches!(err, ConfigError::MissingHome));
}

#[test]
fn resolve_empty_home_errors() {
    assert!(ClientConfig::resolve(None, None, Some("")).is_err());
}

#[test]
fn from_env_prefers_explicit_values() {
    let cfg = ClientConfig::from_env(Some("http://flag.example.test/"), Some(PathBuf::from("/tmp/flag.json"))).unwrap();
    assert_eq!(cfg.api_url, "http://flag.example.test");
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/flag.json"));
}

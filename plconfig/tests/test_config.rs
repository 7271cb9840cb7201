use plconfig::Config;
use tempfile::TempDir;

fn no_env() -> Vec<(String, String)> {
    Vec::new()
}

fn port_env(port: &str) -> Vec<(String, String)> {
    vec![("PORT".to_string(), port.to_string())]
}

fn load(dir: &TempDir, vars: Vec<(String, String)>) -> Config {
    Config::load_config_with_env(dir.path().to_str().unwrap(), vars).unwrap()
}

#[test]
fn test_defaults_are_embedded() {
    let dir = tempfile::tempdir().unwrap();
    let config = load(&dir, no_env());

    assert_eq!(config.get_http_port(), 3000);
    assert_eq!(config.get_base_url(), "localhost");
    assert_eq!(config.get_docs_path(), "/docs");
    assert_eq!(config.get_log_min_level(), "INFO");
    assert!(config.get_log_enable_console());
    assert_eq!(config.get_log_cache_size(), 1000);

    // Le chargement n'écrit rien
    assert!(!dir.path().join("config.yaml").exists());
    assert!(config.source().is_none());
}

#[test]
fn test_missing_directory_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("not").join("there");
    let config = Config::load_config_with_env(missing.to_str().unwrap(), no_env()).unwrap();

    assert_eq!(config.get_http_port(), 3000);
    assert!(!missing.exists());
}

#[test]
fn test_config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "Host:\n  HTTP_PORT: 8088\n  logger:\n    enable_console: false\n",
    )
    .unwrap();

    let config = load(&dir, no_env());
    assert_eq!(config.source(), Some(dir.path().join("config.yaml").as_path()));
    assert_eq!(config.get_http_port(), 8088);
    assert!(!config.get_log_enable_console());
    // Les clés absentes du fichier gardent leur valeur par défaut
    assert_eq!(config.get_docs_path(), "/docs");
}

#[test]
fn test_invalid_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.yaml"), "host: [unclosed\n").unwrap();

    let err = Config::load_config_with_env(dir.path().to_str().unwrap(), no_env()).unwrap_err();
    assert!(err.to_string().starts_with("Invalid YAML in"));
}

#[test]
fn test_port_env_variable() {
    let dir = tempfile::tempdir().unwrap();
    let config = load(&dir, port_env("4567"));
    assert_eq!(config.get_http_port(), 4567);
}

#[test]
fn test_port_env_is_not_remembered() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(load(&dir, port_env("4567")).get_http_port(), 4567);

    let restarted = load(&dir, no_env());
    assert_eq!(restarted.get_http_port(), 3000);
    assert!(!dir.path().join("config.yaml").exists());
}

#[test]
fn test_port_env_beats_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.yaml"), "host:\n  http_port: 8088\n").unwrap();

    assert_eq!(load(&dir, port_env("5000")).get_http_port(), 5000);
    assert_eq!(load(&dir, no_env()).get_http_port(), 8088);
}

#[test]
fn test_invalid_port_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(load(&dir, port_env("not-a-port")).get_http_port(), 3000);
    assert_eq!(load(&dir, port_env("70000")).get_http_port(), 3000);
}

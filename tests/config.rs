use clap::Parser;
use hello_mcp::cli::{Args, Command};
use hello_mcp::config::{
    init_config_file, Config, FileConfig, DEFAULT_JOKE_API_ENDPOINT, ENV_JOKE_API_ENDPOINT,
    ENV_JOKE_API_TIMEOUT, ENV_LOG_LEVEL,
};
use hello_mcp::HelloMcpError;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn args(argv: &[&str]) -> Args {
    let mut full = vec!["hello-mcp"];
    full.extend_from_slice(argv);
    Args::parse_from(full)
}

fn no_env(_key: &str) -> Option<String> {
    None
}

#[test]
fn test_defaults() {
    let config = Config::resolve(&args(&[]), &FileConfig::default(), no_env).unwrap();

    assert_eq!(config.server_name, "hello-mcp");
    assert_eq!(config.server_version, env!("CARGO_PKG_VERSION"));
    assert_eq!(config.joke_api_endpoint, DEFAULT_JOKE_API_ENDPOINT);
    assert_eq!(config.joke_api_endpoint, "https://icanhazdadjoke.com");
    assert_eq!(config.joke_api_timeout_secs, None);
    assert_eq!(config.log_level, "info");
    assert!(!config.verbose);
}

#[test]
fn test_load_yaml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hello-mcp.yaml");
    fs::write(
        &path,
        r#"
server:
  name: jokes-server
  version: 9.9.9
joke_api:
  endpoint: http://localhost:8080/joke
  timeout_secs: 5
logging:
  level: warn
"#,
    )
    .unwrap();

    let file_config = FileConfig::load(Some(&path)).unwrap();
    let config = Config::resolve(&args(&[]), &file_config, no_env).unwrap();

    assert_eq!(config.server_name, "jokes-server");
    assert_eq!(config.server_version, "9.9.9");
    assert_eq!(config.joke_api_endpoint, "http://localhost:8080/joke");
    assert_eq!(config.joke_api_timeout_secs, Some(5));
    assert_eq!(config.log_level, "warn");
}

#[test]
fn test_load_json_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hello-mcp.json");
    fs::write(&path, r#"{"joke_api": {"endpoint": "http://127.0.0.1:9000"}}"#).unwrap();

    let file_config = FileConfig::load(Some(&path)).unwrap();
    assert_eq!(
        file_config.joke_api.endpoint.as_deref(),
        Some("http://127.0.0.1:9000")
    );
    assert!(file_config.server.name.is_none());
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.yaml");

    let err = FileConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn test_invalid_yaml_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.yaml");
    fs::write(&path, "joke_api: [unclosed").unwrap();

    let err = FileConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("Failed to parse YAML config file"));
    assert!(matches!(
        err.downcast_ref::<HelloMcpError>(),
        Some(HelloMcpError::YamlError(_))
    ));
}

#[test]
fn test_invalid_json_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{\"joke_api\": ").unwrap();

    let err = FileConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("Failed to parse JSON config file"));
    assert!(matches!(
        err.downcast_ref::<HelloMcpError>(),
        Some(HelloMcpError::JsonError(_))
    ));
}

#[test]
fn test_config_errors_are_returned_to_the_caller() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.yaml");
    let path_str = path.to_str().unwrap();

    let err = Config::from_env_and_args(&args(&["--config", path_str])).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn test_precedence_cli_over_env_over_file() {
    let mut file_config = FileConfig::default();
    file_config.joke_api.endpoint = Some("http://file.example/joke".to_string());
    file_config.joke_api.timeout_secs = Some(30);
    file_config.logging.level = Some("error".to_string());

    let env: HashMap<&str, &str> = HashMap::from([
        (ENV_JOKE_API_ENDPOINT, "http://env.example/joke"),
        (ENV_JOKE_API_TIMEOUT, "3"),
        (ENV_LOG_LEVEL, "TRACE"),
    ]);
    let lookup = |key: &str| env.get(key).map(|v| v.to_string());

    // Environment beats the file
    let config = Config::resolve(&args(&[]), &file_config, lookup).unwrap();
    assert_eq!(config.joke_api_endpoint, "http://env.example/joke");
    assert_eq!(config.joke_api_timeout_secs, Some(3));
    assert_eq!(config.log_level, "trace");

    // CLI beats the environment
    let config = Config::resolve(
        &args(&["--joke-api-endpoint", "http://cli.example/joke", "--verbose"]),
        &file_config,
        lookup,
    )
    .unwrap();
    assert_eq!(config.joke_api_endpoint, "http://cli.example/joke");
    assert_eq!(config.log_level, "debug");
    assert!(config.verbose);
}

#[test]
fn test_zero_or_garbage_timeout_falls_back_to_client_default() {
    let mut file_config = FileConfig::default();
    file_config.joke_api.timeout_secs = Some(0);
    let config = Config::resolve(&args(&[]), &file_config, no_env).unwrap();
    assert_eq!(config.joke_api_timeout_secs, None);

    let lookup = |key: &str| (key == ENV_JOKE_API_TIMEOUT).then(|| "soon".to_string());
    let config = Config::resolve(&args(&[]), &FileConfig::default(), lookup).unwrap();
    assert_eq!(config.joke_api_timeout_secs, None);
}

#[test]
fn test_zero_env_timeout_keeps_file_timeout() {
    let mut file_config = FileConfig::default();
    file_config.joke_api.timeout_secs = Some(7);

    let lookup = |key: &str| (key == ENV_JOKE_API_TIMEOUT).then(|| "0".to_string());
    let config = Config::resolve(&args(&[]), &file_config, lookup).unwrap();
    assert_eq!(config.joke_api_timeout_secs, Some(7));

    let lookup = |key: &str| (key == ENV_JOKE_API_TIMEOUT).then(|| "later".to_string());
    let config = Config::resolve(&args(&[]), &file_config, lookup).unwrap();
    assert_eq!(config.joke_api_timeout_secs, Some(7));
}

#[test]
fn test_endpoint_env_var_expansion() {
    std::env::set_var("HELLO_MCP_TEST_JOKE_HOST", "jokes.internal:8443");

    let mut file_config = FileConfig::default();
    file_config.joke_api.endpoint = Some("https://${HELLO_MCP_TEST_JOKE_HOST}/api".to_string());

    let config = Config::resolve(&args(&[]), &file_config, no_env).unwrap();
    assert_eq!(config.joke_api_endpoint, "https://jokes.internal:8443/api");
}

#[test]
fn test_rejects_non_http_endpoint() {
    let err = Config::resolve(
        &args(&["--joke-api-endpoint", "ftp://jokes.example"]),
        &FileConfig::default(),
        no_env,
    )
    .unwrap_err();
    assert!(err.to_string().contains("unsupported scheme 'ftp'"));

    let err = Config::resolve(
        &args(&["--joke-api-endpoint", "not a url"]),
        &FileConfig::default(),
        no_env,
    )
    .unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_rejects_unknown_log_level() {
    let mut file_config = FileConfig::default();
    file_config.logging.level = Some("loud".to_string());

    let err = Config::resolve(&args(&[]), &file_config, no_env).unwrap_err();
    assert!(err.to_string().contains("Unknown log level 'loud'"));
}

#[test]
fn test_init_config_file_writes_loadable_example() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("hello-mcp.yaml");

    init_config_file(&path).unwrap();
    let file_config = FileConfig::load(Some(&path)).unwrap();
    assert_eq!(file_config.server.name.as_deref(), Some("hello-mcp"));
    assert_eq!(
        file_config.joke_api.endpoint.as_deref(),
        Some(DEFAULT_JOKE_API_ENDPOINT)
    );

    // Never overwrites
    let err = init_config_file(&path).unwrap_err();
    assert!(err.to_string().contains("already exists"));
}

#[test]
fn test_cli_subcommands() {
    assert_eq!(args(&[]).command, None);
    assert_eq!(args(&["serve"]).command, Some(Command::Serve));
    assert_eq!(args(&["tools"]).command, Some(Command::Tools));
    assert_eq!(args(&["config-init"]).command, Some(Command::ConfigInit));
    assert_eq!(
        args(&["call", "hello-tool"]).command,
        Some(Command::Call {
            tool: "hello-tool".to_string()
        })
    );

    let parsed = args(&["call", "funny-quote-tool", "--config", "/tmp/x.yaml"]);
    assert_eq!(
        parsed.config.as_deref(),
        Some(std::path::Path::new("/tmp/x.yaml"))
    );
}

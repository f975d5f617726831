pub const DEFAULT_JOKE_API_ENDPOINT: &str = "https://icanhazdadjoke.com";

pub fn default_server_name() -> String {
    "hello-mcp".to_string()
}

pub fn default_server_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub fn default_joke_api_endpoint() -> String {
    DEFAULT_JOKE_API_ENDPOINT.to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn is_valid_log_level(level: &str) -> bool {
    ["off", "error", "warn", "info", "debug", "trace"].contains(&level)
}

use std::fmt;

#[derive(Debug)]
pub enum HelloMcpError {
    ApiError {
        status: u16,
        message: String,
    },
    ConfigError(String),
    ToolError(String),
    ProtocolError(String),
    NetworkError(reqwest::Error),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
}

impl fmt::Display for HelloMcpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HelloMcpError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            HelloMcpError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            HelloMcpError::ToolError(msg) => write!(f, "Tool error: {}", msg),
            HelloMcpError::ProtocolError(msg) => write!(f, "Protocol error: {}", msg),
            HelloMcpError::NetworkError(e) => write!(f, "Network error: {}", e),
            HelloMcpError::IoError(e) => write!(f, "IO error: {}", e),
            HelloMcpError::JsonError(e) => write!(f, "JSON error: {}", e),
            HelloMcpError::YamlError(e) => write!(f, "YAML error: {}", e),
        }
    }
}

impl std::error::Error for HelloMcpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HelloMcpError::NetworkError(e) => Some(e),
            HelloMcpError::IoError(e) => Some(e),
            HelloMcpError::JsonError(e) => Some(e),
            HelloMcpError::YamlError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HelloMcpError {
    fn from(err: reqwest::Error) -> Self {
        HelloMcpError::NetworkError(err)
    }
}

impl From<std::io::Error> for HelloMcpError {
    fn from(err: std::io::Error) -> Self {
        HelloMcpError::IoError(err)
    }
}

impl From<serde_json::Error> for HelloMcpError {
    fn from(err: serde_json::Error) -> Self {
        HelloMcpError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for HelloMcpError {
    fn from(err: serde_yaml::Error) -> Self {
        HelloMcpError::YamlError(err)
    }
}

pub type Result<T> = std::result::Result<T, HelloMcpError>;

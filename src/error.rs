use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("config: {0}")]
    Config(String),
    #[error("env var missing: {0}")]
    EnvVarMissing(#[from] std::env::VarError),
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Got HTTP {status_code} with content '{body}'")]
    Api { status_code: u16, body: String },
    #[error("response does not match the expected model: {0}")]
    Deserialize(#[source] serde_json::Error),
    #[error("request payload cannot be serialized: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
    #[error("url parse: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl AccountError {
    /// The HTTP status code, if the server answered with a non 2** code
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

pub const DEFAULT_HOST: &str = "https://accounts.cloud.databricks.com";
pub const API_PREFIX: &str = "api/2.0/accounts";

pub const ENV_ACCOUNT_ID: &str = "ACCOUNT_API_ACCOUNT_ID";
pub const ENV_USERNAME: &str = "ACCOUNT_API_USERNAME";
pub const ENV_PASSWORD: &str = "ACCOUNT_API_PASSWORD";
pub const ENV_HOST: &str = "ACCOUNT_API_HOST";

pub const APPLICATION_JSON: &str = "application/json";

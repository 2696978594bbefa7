use crate::constants::{API_PREFIX, DEFAULT_HOST, ENV_HOST};
use crate::credentials::Credentials;
use crate::error::AccountError;
use crate::AccountId;
use std::env::{self, VarError};
use url::Url;

#[derive(Debug, Clone)]
pub struct AccountOptions {
    /// Scheme, host and optional port of the account API, without any path
    pub host: Url,
}

impl Default for AccountOptions {
    fn default() -> Self {
        Self {
            host: Url::parse(DEFAULT_HOST).expect("DEFAULT_HOST to be a valid URL"),
        }
    }
}

impl AccountOptions {
    pub fn new(host: &str) -> Result<Self, AccountError> {
        let host = Url::parse(host)?;
        if !matches!(host.scheme(), "http" | "https") || host.host_str().is_none() {
            return Err(AccountError::Config(format!(
                "account host must be an http(s) URL: '{}'",
                host
            )));
        }
        if host.path() != "/" || host.query().is_some() || host.fragment().is_some() {
            return Err(AccountError::Config(format!(
                "account host must not contain a path, query or fragment: '{}'",
                host
            )));
        }
        Ok(Self { host })
    }

    /// Uses `ACCOUNT_API_HOST` if it is set, the public endpoint otherwise.
    pub fn try_from_env() -> Result<Self, AccountError> {
        match env::var(ENV_HOST) {
            Ok(host) => Self::new(&host),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Everything needed to talk to the API on behalf of one account.
///
/// Built once per session and passed to every [`crate::AccountClient`] call.
/// A value of this type always holds a non-blank account id, username and
/// password.
#[derive(Debug, Clone)]
pub struct AccountContext {
    pub account_id: AccountId,
    pub credentials: Credentials,
    host: Url,
}

impl AccountContext {
    pub fn new(
        account_id: AccountId,
        credentials: Credentials,
        options: Option<AccountOptions>,
    ) -> Self {
        let options = options.unwrap_or_default();
        Self {
            account_id,
            credentials,
            host: options.host,
        }
    }

    /// Validates the raw operator input. No network I/O happens here.
    pub fn configure<A, U, P>(account_id: A, username: U, password: P) -> Result<Self, AccountError>
    where
        A: Into<String>,
        U: Into<String>,
        P: Into<String>,
    {
        let account_id = AccountId::new(account_id)?;
        let credentials = Credentials::new(username, password)?;
        Ok(Self::new(account_id, credentials, None))
    }

    pub fn try_from_env() -> Result<Self, AccountError> {
        let account_id = AccountId::try_from_env()?;
        let credentials = Credentials::try_from_env()?;
        let options = AccountOptions::try_from_env()?;
        Ok(Self::new(account_id, credentials, Some(options)))
    }

    pub fn host(&self) -> &Url {
        &self.host
    }

    /// `{host}/api/2.0/accounts/{account_id}`
    pub fn base_url(&self) -> String {
        let host = self.host.as_str().trim_end_matches('/');
        format!("{}/{}/{}", host, API_PREFIX, self.account_id.as_str())
    }

    /// Resolves a path relative to [`Self::base_url`]. The leading `/` is optional.
    pub fn url_for(&self, path: &str) -> Result<Url, AccountError> {
        let path = path.strip_prefix('/').unwrap_or(path);
        let mut url = self.base_url();
        if !path.is_empty() {
            url.push('/');
            url.push_str(path);
        }
        Ok(Url::parse(&url)?)
    }
}

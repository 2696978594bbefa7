// Copyright 2024 Sebastian Dobe <sebastiandobe@mailbox.org>

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

use base64::engine::general_purpose;
use base64::Engine;
use std::env;

/// Account API client, your main entrypoint
pub use crate::client::{AccountClient, ClientOptions};
/// Per session account information and base URL handling
pub use crate::context::{AccountContext, AccountOptions};
/// Basic auth credentials
pub use crate::credentials::{Credentials, Password, Username};
/// Specialized Error type which wraps errors from different sources
pub use crate::error::AccountError;
/// Request payloads and response models
pub use crate::types::{
    ApiResponse, AwsKeyInfo, CreateCustomerManagedKeyRequest, CreateWorkspaceRequest,
    CustomerManagedKey, KeyUseCase, ResponseBody, UpdateWorkspaceRequest, Workspace,
    WorkspaceStatus,
};

mod client;
mod command;
mod constants;
mod context;
mod credentials;
mod error;
pub mod prelude;
mod types;

/// Account ID Wrapper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountId(String);

impl AccountId {
    /// Fails if the id is empty or whitespace only.
    pub fn new<S>(account_id: S) -> Result<Self, AccountError>
    where
        S: Into<String>,
    {
        let account_id = account_id.into();
        if account_id.trim().is_empty() {
            return Err(AccountError::Config("account id must not be empty".to_string()));
        }
        Ok(Self(account_id))
    }

    pub fn try_from_env() -> Result<Self, AccountError> {
        Self::new(env::var(constants::ENV_ACCOUNT_ID)?)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// `Basic base64(username:password)`, the value of the `Authorization` header.
fn basic_auth_value(credentials: &Credentials) -> String {
    let raw = format!(
        "{}:{}",
        credentials.username.as_ref(),
        credentials.password.as_ref()
    );
    format!("Basic {}", general_purpose::STANDARD.encode(raw))
}

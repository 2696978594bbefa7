use crate::constants::{ENV_PASSWORD, ENV_USERNAME};
use crate::error::AccountError;
use std::env;
use std::fmt::{Debug, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Username {
    pub fn new<S: Into<String>>(username: S) -> Result<Self, AccountError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(AccountError::Config("username must not be empty".to_string()));
        }
        Ok(Self(username))
    }
}

#[derive(Clone)]
pub struct Password(String);

impl Debug for Password {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Password(<hidden>)")
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Password {
    pub fn new<S: Into<String>>(password: S) -> Result<Self, AccountError> {
        let password = password.into();
        if password.trim().is_empty() {
            return Err(AccountError::Config("password must not be empty".to_string()));
        }
        Ok(Self(password))
    }
}

/// Account admin username / password pair used for HTTP basic auth
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: Username,
    pub password: Password,
}

impl Credentials {
    pub fn new<U, P>(username: U, password: P) -> Result<Self, AccountError>
    where
        U: Into<String>,
        P: Into<String>,
    {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }

    pub fn try_from_env() -> Result<Self, AccountError> {
        let username = env::var(ENV_USERNAME)?;
        let password = env::var(ENV_PASSWORD)?;
        Self::new(username, password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_are_rejected() {
        assert!(matches!(Credentials::new("", "p"), Err(AccountError::Config(_))));
        assert!(matches!(Credentials::new("u", " "), Err(AccountError::Config(_))));
    }

    #[test]
    fn test_password_is_hidden_in_debug() {
        let credentials = Credentials::new("admin", "super-secret").unwrap();
        let dbg = format!("{:?}", credentials);
        assert!(dbg.contains("admin"));
        assert!(!dbg.contains("super-secret"));
    }
}

pub use crate::client::{AccountClient, ClientOptions};
pub use crate::context::{AccountContext, AccountOptions};
pub use crate::credentials::{Credentials, Password, Username};
pub use crate::error::AccountError;
pub use crate::types::*;
pub use crate::AccountId;

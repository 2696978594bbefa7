use crate::error::AccountError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parsed view of an API response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    /// Anything that is not valid JSON, including an empty body
    Text(String),
}

impl ResponseBody {
    pub(crate) fn from_text(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text.to_string()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status_code: u16,
    /// The body exactly as the server sent it
    pub raw: String,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub(crate) fn new(status_code: u16, raw: String) -> Self {
        let body = ResponseBody::from_text(&raw);
        Self {
            status_code,
            raw,
            body,
        }
    }

    /// Deserializes the raw body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AccountError> {
        serde_json::from_str(&self.raw).map_err(AccountError::Deserialize)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateWorkspaceRequest {
    pub workspace_name: String,
    pub deployment_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    pub credentials_id: String,
    pub storage_configuration_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Only for workspaces deployed into a customer-managed VPC
    pub network_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_services_customer_managed_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_customer_managed_key_id: Option<String>,
}

impl CreateWorkspaceRequest {
    pub fn new<W, D, C, S>(
        workspace_name: W,
        deployment_name: D,
        credentials_id: C,
        storage_configuration_id: S,
    ) -> Self
    where
        W: Into<String>,
        D: Into<String>,
        C: Into<String>,
        S: Into<String>,
    {
        Self {
            workspace_name: workspace_name.into(),
            deployment_name: deployment_name.into(),
            aws_region: None,
            credentials_id: credentials_id.into(),
            storage_configuration_id: storage_configuration_id.into(),
            network_id: None,
            managed_services_customer_managed_key_id: None,
            storage_customer_managed_key_id: None,
        }
    }

    pub fn aws_region<S: Into<String>>(mut self, aws_region: S) -> Self {
        self.aws_region = Some(aws_region.into());
        self
    }

    pub fn network_id<S: Into<String>>(mut self, network_id: S) -> Self {
        self.network_id = Some(network_id.into());
        self
    }

    /// Uses the same key configuration for managed services and storage.
    pub fn customer_managed_key<S: Into<String>>(mut self, key_id: S) -> Self {
        let key_id = key_id.into();
        self.managed_services_customer_managed_key_id = Some(key_id.clone());
        self.storage_customer_managed_key_id = Some(key_id);
        self
    }
}

/// Partial update of an existing workspace. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateWorkspaceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_configuration_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_services_customer_managed_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_customer_managed_key_id: Option<String>,
}

impl UpdateWorkspaceRequest {
    pub fn with_customer_managed_key<S: Into<String>>(key_id: S) -> Self {
        let key_id = key_id.into();
        Self {
            managed_services_customer_managed_key_id: Some(key_id.clone()),
            storage_customer_managed_key_id: Some(key_id),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyUseCase {
    /// Control plane encryption (notebooks, secrets, queries)
    ManagedServices,
    /// Workspace root bucket and, optionally, cluster EBS volumes
    Storage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AwsKeyInfo {
    pub key_arn: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reuse_key_for_cluster_volumes: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateCustomerManagedKeyRequest {
    pub use_cases: Vec<KeyUseCase>,
    pub aws_key_info: AwsKeyInfo,
}

impl CreateCustomerManagedKeyRequest {
    /// Key configuration for both managed services and storage.
    pub fn for_all_use_cases<K, A>(key_arn: K, key_alias: Option<A>) -> Self
    where
        K: Into<String>,
        A: Into<String>,
    {
        Self {
            use_cases: vec![KeyUseCase::Storage, KeyUseCase::ManagedServices],
            aws_key_info: AwsKeyInfo {
                key_arn: key_arn.into(),
                key_alias: key_alias.map(Into::into),
                key_region: None,
                reuse_key_for_cluster_volumes: Some(true),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceStatus {
    NotProvisioned,
    Provisioning,
    Running,
    Failed,
    Banned,
    Cancelling,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workspace {
    pub workspace_id: u64,
    #[serde(default)]
    pub workspace_name: Option<String>,
    #[serde(default)]
    pub deployment_name: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub aws_region: Option<String>,
    #[serde(default)]
    pub credentials_id: Option<String>,
    #[serde(default)]
    pub storage_configuration_id: Option<String>,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub managed_services_customer_managed_key_id: Option<String>,
    #[serde(default)]
    pub storage_customer_managed_key_id: Option<String>,
    #[serde(default)]
    pub workspace_status: Option<WorkspaceStatus>,
    #[serde(default)]
    pub workspace_status_message: Option<String>,
    #[serde(default)]
    /// Milliseconds since the unix epoch
    pub creation_time: Option<i64>,
}

/// `GET /workspaces` answers with a bare array, older deployments wrap it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WorkspaceList {
    Bare(Vec<Workspace>),
    Wrapped {
        #[serde(default)]
        workspaces: Vec<Workspace>,
    },
}

impl From<WorkspaceList> for Vec<Workspace> {
    fn from(list: WorkspaceList) -> Self {
        match list {
            WorkspaceList::Bare(workspaces) => workspaces,
            WorkspaceList::Wrapped { workspaces } => workspaces,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerManagedKey {
    pub customer_managed_key_id: String,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub aws_key_info: Option<AwsKeyInfo>,
    #[serde(default)]
    pub use_cases: Vec<KeyUseCase>,
    #[serde(default)]
    pub creation_time: Option<i64>,
}

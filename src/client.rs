use crate::basic_auth_value;
use crate::command::Command;
use crate::constants::APPLICATION_JSON;
use crate::context::AccountContext;
use crate::error::AccountError;
use crate::types::{
    ApiResponse, CreateCustomerManagedKeyRequest, CreateWorkspaceRequest, CustomerManagedKey,
    UpdateWorkspaceRequest, Workspace, WorkspaceList,
};
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub connect_timeout: Duration,
    /// Total time for one request, including reading the body
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(60),
            user_agent: concat!("account-api-simple/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Issues authenticated requests against the account API.
///
/// The client itself holds no account information. Every call gets the
/// [`AccountContext`] it should act for, and every call is a single request
/// without retries.
#[derive(Debug, Clone)]
pub struct AccountClient {
    client: reqwest::Client,
}

impl AccountClient {
    pub fn new(options: Option<ClientOptions>) -> Result<Self, AccountError> {
        let options = options.unwrap_or_default();
        let client = reqwest::Client::builder()
            .brotli(true)
            .connect_timeout(options.connect_timeout)
            .timeout(options.timeout)
            .user_agent(options.user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// GET `path` relative to the account base URL
    pub async fn get<P>(&self, ctx: &AccountContext, path: P) -> Result<ApiResponse, AccountError>
    where
        P: AsRef<str>,
    {
        let path = path.as_ref();
        self.send_request(ctx, Command::Get { path }).await
    }

    /// POST `body` as JSON to `path` relative to the account base URL
    pub async fn post<P, B>(
        &self,
        ctx: &AccountContext,
        path: P,
        body: &B,
    ) -> Result<ApiResponse, AccountError>
    where
        P: AsRef<str>,
        B: Serialize + ?Sized,
    {
        self.send_request(ctx, Command::post(path.as_ref(), body)?)
            .await
    }

    /// PATCH `path` relative to the account base URL with a JSON `body`
    pub async fn patch<P, B>(
        &self,
        ctx: &AccountContext,
        path: P,
        body: &B,
    ) -> Result<ApiResponse, AccountError>
    where
        P: AsRef<str>,
        B: Serialize + ?Sized,
    {
        self.send_request(ctx, Command::patch(path.as_ref(), body)?)
            .await
    }

    /// List all workspaces of the account
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(account_id = %ctx.account_id.as_str())
    )]
    pub async fn list_workspaces(
        &self,
        ctx: &AccountContext,
    ) -> Result<Vec<Workspace>, AccountError> {
        let res = self.send_request(ctx, Command::ListWorkspaces).await?;
        Ok(res.json::<WorkspaceList>()?.into())
    }

    /// GET a single workspace, e.g. to check its provisioning status
    #[tracing::instrument(level = "debug", skip_all, fields(workspace_id = workspace_id))]
    pub async fn get_workspace(
        &self,
        ctx: &AccountContext,
        workspace_id: &str,
    ) -> Result<Workspace, AccountError> {
        self.send_request(ctx, Command::GetWorkspace { workspace_id })
            .await?
            .json()
    }

    /// Request a new workspace. Provisioning continues on the server side
    /// after this returns.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(workspace_name = %payload.workspace_name)
    )]
    pub async fn create_workspace(
        &self,
        ctx: &AccountContext,
        payload: &CreateWorkspaceRequest,
    ) -> Result<Workspace, AccountError> {
        self.send_request(ctx, Command::CreateWorkspace { payload })
            .await?
            .json()
    }

    /// PATCH an existing workspace, e.g. to attach a customer-managed key
    #[tracing::instrument(level = "debug", skip_all, fields(workspace_id = workspace_id))]
    pub async fn update_workspace(
        &self,
        ctx: &AccountContext,
        workspace_id: &str,
        payload: &UpdateWorkspaceRequest,
    ) -> Result<ApiResponse, AccountError> {
        self.send_request(
            ctx,
            Command::UpdateWorkspace {
                workspace_id,
                payload,
            },
        )
        .await
    }

    /// Register an AWS KMS key with the account as a key configuration
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(key_arn = %payload.aws_key_info.key_arn)
    )]
    pub async fn create_customer_managed_key(
        &self,
        ctx: &AccountContext,
        payload: &CreateCustomerManagedKeyRequest,
    ) -> Result<CustomerManagedKey, AccountError> {
        self.send_request(ctx, Command::CreateCustomerManagedKey { payload })
            .await?
            .json()
    }

    async fn send_request(
        &self,
        ctx: &AccountContext,
        command: Command<'_>,
    ) -> Result<ApiResponse, AccountError> {
        let method = command.http_method();
        let url = self.build_url(ctx, &command)?;
        let body = command.body()?;
        let headers = self.build_headers(ctx, body.is_some())?;

        debug!("{} {}", method, url);
        let builder = self.client.request(method, url).headers(headers);
        let res = match body {
            Some(body) => builder.body(body),
            None => builder,
        }
        .send()
        .await?;

        let status = res.status();
        let text = res.text().await?;
        debug!("response status {}", status);

        if !status.is_success() {
            return Err(AccountError::Api {
                status_code: status.as_u16(),
                body: text,
            });
        }

        Ok(ApiResponse::new(status.as_u16(), text))
    }

    fn build_headers(
        &self,
        ctx: &AccountContext,
        has_body: bool,
    ) -> Result<HeaderMap, AccountError> {
        let mut headers = HeaderMap::with_capacity(3);

        let mut authorization = HeaderValue::try_from(basic_auth_value(&ctx.credentials))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        if has_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        }

        Ok(headers)
    }

    fn build_url(&self, ctx: &AccountContext, command: &Command<'_>) -> Result<Url, AccountError> {
        ctx.url_for(&command.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AccountOptions;
    use crate::credentials::Credentials;
    use crate::types::{KeyUseCase, ResponseBody, WorkspaceStatus};
    use crate::AccountId;
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tracing_test::traced_test;

    const BASE_PATH: &str = "/api/2.0/accounts/acc-1";
    // base64("user:pass")
    const AUTH: &str = "Basic dXNlcjpwYXNz";

    fn test_context(server_url: &str) -> AccountContext {
        AccountContext::new(
            AccountId::new("acc-1").unwrap(),
            Credentials::new("user", "pass").unwrap(),
            Some(AccountOptions::new(server_url).unwrap()),
        )
    }

    fn test_client() -> AccountClient {
        AccountClient::new(Some(ClientOptions {
            connect_timeout: Duration::from_secs(2),
            timeout: Duration::from_secs(5),
            ..Default::default()
        }))
        .unwrap()
    }

    #[traced_test]
    #[tokio::test]
    async fn test_get_returns_body_unmodified() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", format!("{}/workspaces", BASE_PATH).as_str())
            .match_header("authorization", AUTH)
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"workspaces":[]}"#)
            .create_async()
            .await;

        let ctx = test_context(&server.url());
        let res = test_client().get(&ctx, "/workspaces").await.unwrap();

        assert_eq!(res.status_code, 200);
        assert_eq!(res.raw, r#"{"workspaces":[]}"#);
        assert_eq!(res.body, ResponseBody::Json(json!({"workspaces": []})));
        mock.assert_async().await;
    }

    #[traced_test]
    #[tokio::test]
    async fn test_get_keeps_raw_body_byte_identical() {
        let body = r#"{"z":1,"a":1.00000000000000000001}"#;
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", format!("{}/workspaces", BASE_PATH).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let ctx = test_context(&server.url());
        let res = test_client().get(&ctx, "/workspaces").await.unwrap();

        assert_eq!(res.raw, body);
        assert!(res.body.as_json().is_some());
    }

    #[traced_test]
    #[tokio::test]
    async fn test_forbidden_is_an_api_error() {
        let mut server = Server::new_async().await;
        let body = r#"{"error_code":"PERMISSION_DENIED","message":"not an account admin"}"#;
        let _mock = server
            .mock("GET", Matcher::Any)
            .with_status(403)
            .with_body(body)
            .expect_at_least(1)
            .create_async()
            .await;
        let _mock_post = server
            .mock("POST", Matcher::Any)
            .with_status(403)
            .with_body(body)
            .create_async()
            .await;
        let _mock_patch = server
            .mock("PATCH", Matcher::Any)
            .with_status(403)
            .with_body(body)
            .create_async()
            .await;

        let ctx = test_context(&server.url());
        let client = test_client();

        let results = vec![
            client.get(&ctx, "/workspaces").await,
            client.post(&ctx, "/workspaces", &json!({})).await,
            client.patch(&ctx, "/workspaces/1", &json!({})).await,
        ];
        for res in results {
            match res {
                Err(AccountError::Api { status_code, body: b }) => {
                    assert_eq!(status_code, 403);
                    assert_eq!(b, body);
                }
                other => panic!("expected ApiError, got {:?}", other),
            }
        }

        let err = client.list_workspaces(&ctx).await.unwrap_err();
        assert_eq!(err.status_code(), Some(403));
    }

    #[traced_test]
    #[tokio::test]
    async fn test_post_sends_exact_payload() {
        let payload = json!({
            "workspace_name": "w1",
            "deployment_name": "w1",
            "aws_region": "us-east-1",
            "credentials_id": "c1",
            "storage_configuration_id": "s1"
        });

        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", format!("{}/workspaces", BASE_PATH).as_str())
            .match_header("authorization", AUTH)
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(payload.clone()))
            .with_status(200)
            .with_body(r#"{"workspace_id":1234,"workspace_status":"PROVISIONING"}"#)
            .create_async()
            .await;

        let ctx = test_context(&server.url());
        let res = test_client()
            .post(&ctx, "/workspaces", &payload)
            .await
            .unwrap();

        assert_eq!(res.status_code, 200);
        mock.assert_async().await;
    }

    #[traced_test]
    #[tokio::test]
    async fn test_typed_create_workspace() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", format!("{}/workspaces", BASE_PATH).as_str())
            .match_body(Matcher::Json(json!({
                "workspace_name": "dbacademy_test_workspace_csk",
                "deployment_name": "workspace_csk",
                "credentials_id": "c1",
                "storage_configuration_id": "s1",
                "managed_services_customer_managed_key_id": "csk-1",
                "storage_customer_managed_key_id": "csk-1",
            })))
            .with_status(200)
            .with_body(
                json!({
                    "workspace_id": 1234,
                    "workspace_name": "dbacademy_test_workspace_csk",
                    "deployment_name": "workspace_csk",
                    "workspace_status": "PROVISIONING",
                    "workspace_status_message": "Workspace resources are being set up.",
                    "creation_time": 1700000000000i64,
                })
                .to_string(),
            )
            .create_async()
            .await;

        let ctx = test_context(&server.url());
        let req = CreateWorkspaceRequest::new(
            "dbacademy_test_workspace_csk",
            "workspace_csk",
            "c1",
            "s1",
        )
        .customer_managed_key("csk-1");
        let ws = test_client().create_workspace(&ctx, &req).await.unwrap();

        assert_eq!(ws.workspace_id, 1234);
        assert_eq!(ws.workspace_status, Some(WorkspaceStatus::Provisioning));
        assert_eq!(ws.creation_time, Some(1700000000000));
        mock.assert_async().await;
    }

    #[traced_test]
    #[tokio::test]
    async fn test_typed_list_and_get() {
        let mut server = Server::new_async().await;
        let list = server
            .mock("GET", format!("{}/workspaces", BASE_PATH).as_str())
            .with_status(200)
            .with_body(
                json!([
                    {"workspace_id": 1, "credentials_id": "c1", "storage_configuration_id": "s1"},
                    {"workspace_id": 2, "workspace_status": "RUNNING"},
                ])
                .to_string(),
            )
            .create_async()
            .await;
        let get = server
            .mock("GET", format!("{}/workspaces/2", BASE_PATH).as_str())
            .match_header("authorization", AUTH)
            .with_status(200)
            .with_body(r#"{"workspace_id":2,"workspace_status":"RUNNING"}"#)
            .create_async()
            .await;

        let ctx = test_context(&server.url());
        let client = test_client();

        let workspaces = client.list_workspaces(&ctx).await.unwrap();
        assert_eq!(workspaces.len(), 2);
        assert_eq!(workspaces[0].credentials_id.as_deref(), Some("c1"));

        let ws = client.get_workspace(&ctx, "2").await.unwrap();
        assert_eq!(ws.workspace_status, Some(WorkspaceStatus::Running));

        list.assert_async().await;
        get.assert_async().await;
    }

    #[traced_test]
    #[tokio::test]
    async fn test_patch_sends_only_set_fields() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", format!("{}/workspaces/1234", BASE_PATH).as_str())
            .match_header("authorization", AUTH)
            .match_body(Matcher::Json(json!({
                "managed_services_customer_managed_key_id": "csk-1",
                "storage_customer_managed_key_id": "csk-1",
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let ctx = test_context(&server.url());
        let req = UpdateWorkspaceRequest::with_customer_managed_key("csk-1");
        let res = test_client()
            .update_workspace(&ctx, "1234", &req)
            .await
            .unwrap();

        assert_eq!(res.status_code, 200);
        mock.assert_async().await;
    }

    #[traced_test]
    #[tokio::test]
    async fn test_create_customer_managed_key() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", format!("{}/customer-managed-keys", BASE_PATH).as_str())
            .match_body(Matcher::Json(json!({
                "use_cases": ["STORAGE", "MANAGED_SERVICES"],
                "aws_key_info": {
                    "key_arn": "arn:aws:kms:us-east-1:111122223333:key/k1",
                    "key_alias": "alias/dbx",
                    "reuse_key_for_cluster_volumes": true,
                }
            })))
            .with_status(200)
            .with_body(
                json!({
                    "customer_managed_key_id": "csk-1",
                    "account_id": "acc-1",
                    "use_cases": ["STORAGE", "MANAGED_SERVICES"],
                })
                .to_string(),
            )
            .create_async()
            .await;

        let ctx = test_context(&server.url());
        let req = CreateCustomerManagedKeyRequest::for_all_use_cases(
            "arn:aws:kms:us-east-1:111122223333:key/k1",
            Some("alias/dbx"),
        );
        let key = test_client()
            .create_customer_managed_key(&ctx, &req)
            .await
            .unwrap();

        assert_eq!(key.customer_managed_key_id, "csk-1");
        assert_eq!(
            key.use_cases,
            vec![KeyUseCase::Storage, KeyUseCase::ManagedServices]
        );
        mock.assert_async().await;
    }

    #[traced_test]
    #[tokio::test]
    async fn test_unexpected_success_body_fails_typed_call() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", format!("{}/workspaces/9", BASE_PATH).as_str())
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let ctx = test_context(&server.url());
        let err = test_client().get_workspace(&ctx, "9").await.unwrap_err();
        assert!(matches!(err, AccountError::Deserialize(_)));
    }

    #[traced_test]
    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // nothing listens on port 9 (discard) on a test machine
        let ctx = test_context("http://127.0.0.1:9");
        let err = test_client().get(&ctx, "/workspaces").await.unwrap_err();
        assert!(matches!(err, AccountError::Transport(_)));
    }

    #[traced_test]
    #[tokio::test]
    async fn test_credentials_are_not_logged() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", format!("{}/workspaces", BASE_PATH).as_str())
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let ctx = test_context(&server.url());
        test_client().list_workspaces(&ctx).await.unwrap();

        assert!(logs_contain("/workspaces"));
        assert!(!logs_contain("pass"));
        assert!(!logs_contain("dXNlcjpwYXNz"));
    }
}

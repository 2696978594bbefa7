use account_api_simple::prelude::*;

#[tokio::main]
async fn main() -> Result<(), AccountError> {
    dotenvy::dotenv().ok();

    // You can create your context from ENV, or manually with
    // `AccountContext::configure(account_id, username, password)`.
    // `try_from_env` expects:
    // ```
    // ACCOUNT_API_ACCOUNT_ID=
    // ACCOUNT_API_USERNAME=
    // ACCOUNT_API_PASSWORD=
    // # optional
    // ACCOUNT_API_HOST=https://accounts.cloud.databricks.com
    // ```
    let ctx = AccountContext::try_from_env()?;
    let client = AccountClient::new(None)?;

    // Listing workspaces validates the credentials and shows the
    // credential and storage configurations you can reuse.
    let workspaces = client.list_workspaces(&ctx).await?;
    for ws in &workspaces {
        println!(
            "{} {:?} status={:?} credentials_id={:?} storage_configuration_id={:?}",
            ws.workspace_id,
            ws.workspace_name,
            ws.workspace_status,
            ws.credentials_id,
            ws.storage_configuration_id,
        );
    }

    // Only create something when the operator asked for it explicitly.
    let Some(template) = workspaces.first() else {
        return Ok(());
    };
    if std::env::var("CREATE_WORKSPACE").as_deref() != Ok("true") {
        return Ok(());
    }
    let (Some(credentials_id), Some(storage_configuration_id)) = (
        template.credentials_id.clone(),
        template.storage_configuration_id.clone(),
    ) else {
        return Ok(());
    };

    let mut req = CreateWorkspaceRequest::new(
        "account-api-test-workspace",
        "account-api-test-workspace",
        credentials_id,
        storage_configuration_id,
    );
    if let Some(region) = template.aws_region.clone() {
        req = req.aws_region(region);
    }
    let created = client.create_workspace(&ctx, &req).await?;
    println!("requested workspace {}", created.workspace_id);

    // Provisioning is asynchronous, check back later with `get_workspace`.
    let ws = client
        .get_workspace(&ctx, &created.workspace_id.to_string())
        .await?;
    println!("status: {:?} {:?}", ws.workspace_status, ws.workspace_status_message);

    Ok(())
}

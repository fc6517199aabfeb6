//! Workspace operations.

use autonomi_core::{AccountId, CreateWorkspace, UpdateWorkspace, Validate, Workspace, WorkspaceId};

use crate::client::Client;
use crate::error::Result;

impl Client {
    /// Create a workspace in the client's account.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is invalid or the request fails.
    pub async fn create_workspace(&self, payload: &CreateWorkspace) -> Result<Workspace> {
        payload.validate()?;
        self.post_data(&format!("{}/workspaces", self.account_path()), payload)
            .await
    }

    /// List the workspaces of `account_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn list_workspaces(&self, account_id: AccountId) -> Result<Vec<Workspace>> {
        self.get_data(&format!("/accounts/{account_id}/workspaces"))
            .await
    }

    /// Fetch a workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn get_workspace(&self, workspace_id: WorkspaceId) -> Result<Workspace> {
        self.get_data(&self.workspace_path(workspace_id)).await
    }

    /// Update a workspace's name and description.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is invalid or the request fails.
    pub async fn update_workspace(
        &self,
        payload: &UpdateWorkspace,
        workspace_id: WorkspaceId,
    ) -> Result<Workspace> {
        payload.validate()?;
        self.patch_data(&self.workspace_path(workspace_id), payload)
            .await
    }

    /// Delete a workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_workspace(&self, workspace_id: WorkspaceId) -> Result<()> {
        self.delete(&self.workspace_path(workspace_id)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::error::ClientError;
    use crate::fixtures::{client, workspace, workspace_path, ACCOUNT, WORKSPACE};
    use crate::http::mock::{MockBackend, MockResponse};
    use crate::http::Method;

    #[tokio::test]
    async fn crud_round() {
        let mock = Arc::new(MockBackend::new());
        let body = json!({ "id": WORKSPACE, "name": "lab", "accountId": ACCOUNT });
        mock.push(
            Method::Post,
            format!("/accounts/{ACCOUNT}/workspaces"),
            MockResponse::data(body.clone()),
        );
        mock.push(
            Method::Get,
            format!("/accounts/{ACCOUNT}/workspaces"),
            MockResponse::data(json!([body.clone()])),
        );
        mock.push(Method::Patch, workspace_path(), MockResponse::data(body.clone()));
        mock.push(Method::Delete, workspace_path(), MockResponse::Empty);
        let client = client(&mock, 1);

        let created = client
            .create_workspace(&CreateWorkspace::new("lab"))
            .await
            .unwrap();
        assert_eq!(created.workspace_id(), workspace());

        let listed = client.list_workspaces(client.account_id()).await.unwrap();
        assert_eq!(listed, vec![created]);

        client
            .update_workspace(
                &UpdateWorkspace::new("lab").with_description("testing"),
                workspace(),
            )
            .await
            .unwrap();
        client.delete_workspace(workspace()).await.unwrap();

        let methods: Vec<Method> = mock.requests().iter().map(|r| r.method).collect();
        assert_eq!(
            methods,
            vec![Method::Post, Method::Get, Method::Patch, Method::Delete]
        );
    }

    #[tokio::test]
    async fn update_rejects_empty_name() {
        let mock = Arc::new(MockBackend::new());
        let err = client(&mock, 1)
            .update_workspace(&UpdateWorkspace::new(""), workspace())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn missing_workspace_is_not_found() {
        let mock = Arc::new(MockBackend::new());
        mock.push(Method::Get, workspace_path(), MockResponse::Status(404));

        let err = client(&mock, 1).get_workspace(workspace()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}

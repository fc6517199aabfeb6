//! Node operations.

use autonomi_core::{CreateNode, Element, ElementId, Node, UpdateElement, Validate, WorkspaceId};

use crate::client::Client;
use crate::error::Result;
use crate::lifecycle::WaitOptions;
use crate::poll::Observed;

impl Client {
    fn nodes_path(&self, workspace_id: WorkspaceId) -> String {
        format!(
            "{}/{}",
            self.workspace_path(workspace_id),
            Node::KIND.collection()
        )
    }

    /// Create a node and wait until it reaches the requested state
    /// (`deployed` unless `options` says otherwise).
    ///
    /// # Errors
    ///
    /// Fails before any request if the payload is invalid or the requested
    /// state is not a creation state. Afterwards fails on request errors,
    /// when the node settles in `creation_error`, disappears, or does not
    /// converge within the poll budget, and when the wait is cancelled.
    pub async fn create_node(
        &self,
        payload: &CreateNode,
        workspace_id: WorkspaceId,
        options: WaitOptions,
    ) -> Result<Node> {
        self.create_element(&self.nodes_path(workspace_id), payload, &options)
            .await
    }

    /// Fetch a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn get_node(&self, workspace_id: WorkspaceId, node_id: ElementId) -> Result<Node> {
        self.get_data(&format!("{}/{node_id}", self.nodes_path(workspace_id)))
            .await
    }

    /// Rename a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is invalid or the request fails.
    pub async fn update_node(
        &self,
        payload: &UpdateElement,
        workspace_id: WorkspaceId,
        node_id: ElementId,
    ) -> Result<Node> {
        payload.validate()?;
        self.patch_data(
            &format!("{}/{node_id}", self.nodes_path(workspace_id)),
            payload,
        )
        .await
    }

    /// Delete a node and wait until it reaches the requested state
    /// (`deleted` unless `options` says otherwise).
    ///
    /// Returns [`Observed::Removed`] once the node is gone.
    ///
    /// # Errors
    ///
    /// Fails before any request if the requested state is not a deletion
    /// state, then like [`Client::create_node`].
    pub async fn delete_node(
        &self,
        workspace_id: WorkspaceId,
        node_id: ElementId,
        options: WaitOptions,
    ) -> Result<Observed<Node>> {
        let path = format!("{}/{node_id}", self.nodes_path(workspace_id));
        self.delete_element(&path, node_id, &options).await
    }
}

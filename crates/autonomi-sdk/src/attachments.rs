//! Attachment operations.
//!
//! Attachments bind a node to a transport. They cannot be updated.

use autonomi_core::{Attachment, CreateAttachment, Element, ElementId, WorkspaceId};

use crate::client::Client;
use crate::error::Result;
use crate::lifecycle::WaitOptions;
use crate::poll::Observed;

impl Client {
    fn attachments_path(&self, workspace_id: WorkspaceId) -> String {
        format!(
            "{}/{}",
            self.workspace_path(workspace_id),
            Attachment::KIND.collection()
        )
    }

    fn attachment_path(&self, workspace_id: WorkspaceId, attachment_id: ElementId) -> String {
        format!("{}/{attachment_id}", self.attachments_path(workspace_id))
    }

    /// Attach a node to a transport and wait until the attachment reaches the
    /// requested state (`deployed` unless `options` says otherwise).
    ///
    /// # Errors
    ///
    /// See [`Client::create_node`].
    pub async fn create_attachment(
        &self,
        payload: &CreateAttachment,
        workspace_id: WorkspaceId,
        options: WaitOptions,
    ) -> Result<Attachment> {
        self.create_element(&self.attachments_path(workspace_id), payload, &options)
            .await
    }

    /// Fetch an attachment.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn get_attachment(
        &self,
        workspace_id: WorkspaceId,
        attachment_id: ElementId,
    ) -> Result<Attachment> {
        self.get_data(&self.attachment_path(workspace_id, attachment_id))
            .await
    }

    /// Detach and wait until the attachment reaches the requested state
    /// (`deleted` unless `options` says otherwise).
    ///
    /// # Errors
    ///
    /// See [`Client::delete_node`].
    pub async fn delete_attachment(
        &self,
        workspace_id: WorkspaceId,
        attachment_id: ElementId,
        options: WaitOptions,
    ) -> Result<Observed<Attachment>> {
        let path = self.attachment_path(workspace_id, attachment_id);
        self.delete_element(&path, attachment_id, &options).await
    }
}

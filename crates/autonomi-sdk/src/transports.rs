//! Transport operations.

use autonomi_core::{
    CreateTransport, Element, ElementId, Transport, UpdateElement, Validate, WorkspaceId,
};

use crate::client::Client;
use crate::error::Result;
use crate::lifecycle::WaitOptions;
use crate::poll::Observed;

impl Client {
    fn transports_path(&self, workspace_id: WorkspaceId) -> String {
        format!(
            "{}/{}",
            self.workspace_path(workspace_id),
            Transport::KIND.collection()
        )
    }

    fn transport_path(&self, workspace_id: WorkspaceId, transport_id: ElementId) -> String {
        format!("{}/{transport_id}", self.transports_path(workspace_id))
    }

    /// Create a transport and wait until it reaches the requested state
    /// (`deployed` unless `options` says otherwise).
    ///
    /// # Errors
    ///
    /// See [`Client::create_node`].
    pub async fn create_transport(
        &self,
        payload: &CreateTransport,
        workspace_id: WorkspaceId,
        options: WaitOptions,
    ) -> Result<Transport> {
        self.create_element(&self.transports_path(workspace_id), payload, &options)
            .await
    }

    /// Fetch a transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn get_transport(
        &self,
        workspace_id: WorkspaceId,
        transport_id: ElementId,
    ) -> Result<Transport> {
        self.get_data(&self.transport_path(workspace_id, transport_id))
            .await
    }

    /// Rename a transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is invalid or the request fails.
    pub async fn update_transport(
        &self,
        payload: &UpdateElement,
        workspace_id: WorkspaceId,
        transport_id: ElementId,
    ) -> Result<Transport> {
        payload.validate()?;
        self.patch_data(&self.transport_path(workspace_id, transport_id), payload)
            .await
    }

    /// Delete a transport and wait until it reaches the requested state
    /// (`deleted` unless `options` says otherwise).
    ///
    /// # Errors
    ///
    /// See [`Client::delete_node`].
    pub async fn delete_transport(
        &self,
        workspace_id: WorkspaceId,
        transport_id: ElementId,
        options: WaitOptions,
    ) -> Result<Observed<Transport>> {
        let path = self.transport_path(workspace_id, transport_id);
        self.delete_element(&path, transport_id, &options).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use autonomi_core::AdministrativeState;

    use super::*;
    use crate::error::ClientError;
    use crate::fixtures::{client, element, workspace, workspace_path};
    use crate::http::mock::{MockBackend, MockResponse};
    use crate::http::Method;

    #[tokio::test(start_paused = true)]
    async fn create_polls_transport_path() {
        let mock = Arc::new(MockBackend::new());
        let id = ElementId::generate();
        let path = format!("{}/transports/{id}", workspace_path());
        mock.push(
            Method::Post,
            format!("{}/transports", workspace_path()),
            MockResponse::data(element(id, "creation_pending")),
        );
        mock.script(
            Method::Get,
            path.clone(),
            [
                MockResponse::data(element(id, "creation_proceed")),
                MockResponse::data(element(id, "deployed")),
            ],
        );

        let transport = client(&mock, 3)
            .create_transport(
                &CreateTransport::new("fr5-to-ams", "TRFR5AMS1G"),
                workspace(),
                WaitOptions::new(),
            )
            .await
            .unwrap();

        assert_eq!(transport.state, AdministrativeState::Deployed);
        assert_eq!(mock.calls(Method::Get, &path), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_reports_timeout() {
        let mock = Arc::new(MockBackend::new());
        let id = ElementId::generate();
        let path = format!("{}/transports/{id}", workspace_path());
        mock.push(Method::Delete, path.clone(), MockResponse::Empty);
        mock.push(
            Method::Get,
            path.clone(),
            MockResponse::data(element(id, "delete_proceed")),
        );

        let err = client(&mock, 4)
            .delete_transport(workspace(), id, WaitOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::Timeout {
                attempts: 4,
                target: AdministrativeState::Deleted,
                last_state: Some(AdministrativeState::DeleteProceed),
                ..
            }
        ));
        assert_eq!(mock.calls(Method::Get, &path), 4);
    }

    #[tokio::test]
    async fn update_rejects_empty_name() {
        let mock = Arc::new(MockBackend::new());
        let err = client(&mock, 1)
            .update_transport(&UpdateElement::new(""), workspace(), ElementId::generate())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert!(mock.requests().is_empty());
    }
}

//! Physical port operations.

use autonomi_core::{AdministrativeState, CreatePhysicalPort, Data, ElementId, PhysicalPort, Validate};

use crate::client::{decode, Client};
use crate::error::Result;
use crate::http::ApiRequest;

impl Client {
    fn ports_path(&self) -> String {
        format!("{}/ports", self.account_path())
    }

    /// Order a physical port.
    ///
    /// The port is returned as soon as the backend accepts the order.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is invalid or the request fails.
    pub async fn create_physical_port(&self, payload: &CreatePhysicalPort) -> Result<PhysicalPort> {
        payload.validate()?;
        self.post_data(&self.ports_path(), payload).await
    }

    /// Fetch a physical port.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn get_physical_port(&self, port_id: ElementId) -> Result<PhysicalPort> {
        self.get_data(&format!("{}/{port_id}", self.ports_path()))
            .await
    }

    /// List the account's physical ports, optionally only those in `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn list_physical_ports(
        &self,
        state: Option<AdministrativeState>,
    ) -> Result<Vec<PhysicalPort>> {
        let mut request = ApiRequest::get(self.ports_path());
        if let Some(state) = state {
            request = request.with_query("state", state.as_str());
        }
        let body = self.send(request).await?;
        decode::<Data<Vec<PhysicalPort>>>(&body).map(Data::into_inner)
    }

    /// Delete a physical port.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_physical_port(&self, port_id: ElementId) -> Result<()> {
        self.delete(&format!("{}/{port_id}", self.ports_path()))
            .await
    }
}

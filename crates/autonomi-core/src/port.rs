//! Physical ports ordered at the account level.
//!
//! Ports carry an administrative state but are created synchronously: the API
//! returns them immediately and nothing polls them. Lists can be filtered by state.

use serde::{Deserialize, Serialize};

use crate::element::BaseModel;
use crate::error::{require, Result, Validate};
use crate::ids::AccountId;
use crate::product::{AddProduct, Product};
use crate::state::AdministrativeState;

/// A physical port as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalPort {
    /// Identifier and timestamps.
    #[serde(flatten)]
    pub base: BaseModel,
    /// Port name.
    #[serde(default)]
    pub name: String,
    /// Owning account.
    #[serde(default)]
    pub account_id: AccountId,
    /// Ordered product.
    #[serde(default)]
    pub product: Product,
    /// Bandwidth still available for new VLANs, in Mbps.
    #[serde(default)]
    pub available_bandwidth: i64,
    /// Administrative state, absent on older ports.
    #[serde(rename = "administrativeState", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<AdministrativeState>,
    /// VLANs already in use on the port.
    #[serde(default, rename = "usedVlans")]
    pub used_vlans: Vec<i64>,
    /// Where to download the letter of authorization.
    #[serde(default, rename = "loaAccessUrl")]
    pub loa_access_url: String,
}

impl PhysicalPort {
    /// Whether `vlan` is still free on this port.
    #[must_use]
    pub fn is_vlan_free(&self, vlan: i64) -> bool {
        !self.used_vlans.contains(&vlan)
    }
}

/// Payload for ordering a physical port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePhysicalPort {
    /// Port name.
    pub name: String,
    /// Port product to order.
    pub product: AddProduct,
}

impl CreatePhysicalPort {
    /// Order the port product `sku` under `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            product: AddProduct::new(sku),
        }
    }
}

impl Validate for CreatePhysicalPort {
    fn validate(&self) -> Result<()> {
        require(&self.name, "CreatePhysicalPort", "name")?;
        self.product.check("CreatePhysicalPort")
    }
}

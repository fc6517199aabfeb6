//! Catalogue products attached to ports, nodes and transports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{require, Result, Validate};

/// Commercial product backing a provisioned element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    /// Provider operating the location (e.g. `EQUINIX`).
    pub provider: String,
    /// Commitment duration in months.
    pub duration: i64,
    /// Location name.
    pub location: String,
    /// Bandwidth in Mbps.
    pub bandwidth: i64,
    /// Price reference date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Non-recurring price.
    pub price_nrc: i64,
    /// Monthly recurring price.
    pub price_mrc: i64,
    /// Non-recurring cost.
    pub cost_nrc: i64,
    /// Monthly recurring cost.
    pub cost_mrc: i64,
    /// Stock keeping unit.
    pub sku: String,
}

/// Product reference used in creation payloads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddProduct {
    /// Stock keeping unit of the product to order.
    pub sku: String,
}

impl AddProduct {
    /// Reference a product by SKU.
    #[must_use]
    pub fn new(sku: impl Into<String>) -> Self {
        Self { sku: sku.into() }
    }

    pub(crate) fn check(&self, payload: &'static str) -> Result<()> {
        require(&self.sku, payload, "product.sku")
    }
}

impl Validate for AddProduct {
    fn validate(&self) -> Result<()> {
        self.check("AddProduct")
    }
}

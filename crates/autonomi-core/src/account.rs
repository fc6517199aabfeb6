//! Accounts, workspaces and users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::element::BaseModel;
use crate::error::{require, Result, Validate};
use crate::ids::{AccountId, WorkspaceId};

/// A customer account.
///
/// Also used as the creation payload: the backend takes the same shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Identifier and timestamps.
    #[serde(flatten)]
    pub base: BaseModel,
    /// Company name.
    pub name: String,
    /// Postal address.
    pub address: String,
    /// Postal code.
    pub zip_code: String,
    /// City.
    pub city: String,
    /// Country code.
    pub country: String,
    /// Billing contact email.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub financial_contact: String,
    /// Technical contact email.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub technical_contact: String,
}

impl Validate for Account {
    fn validate(&self) -> Result<()> {
        require(&self.name, "Account", "name")?;
        require(&self.address, "Account", "address")?;
        require(&self.zip_code, "Account", "zipCode")?;
        require(&self.city, "Account", "city")?;
        require(&self.country, "Account", "country")
    }
}

/// Body of `GET /users/self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfInfo {
    /// Account the personal access token belongs to.
    pub account_id: AccountId,
}

/// A workspace grouping nodes, transports and attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Identifier and timestamps.
    #[serde(flatten)]
    pub base: BaseModel,
    /// Workspace name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Owning account.
    #[serde(default)]
    pub account_id: AccountId,
}

impl Workspace {
    /// Typed identifier of the workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        WorkspaceId::from_uuid(*self.base.id.as_uuid())
    }
}

/// Payload for creating a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateWorkspace {
    /// Workspace name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

impl CreateWorkspace {
    /// Create a workspace named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }
}

impl Validate for CreateWorkspace {
    fn validate(&self) -> Result<()> {
        require(&self.name, "CreateWorkspace", "name")
    }
}

/// Payload for updating a workspace.
///
/// The backend replaces both fields, so the name must be set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateWorkspace {
    /// New name.
    pub name: String,
    /// New description.
    pub description: String,
}

impl UpdateWorkspace {
    /// Rename to `name` with an empty description.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Validate for UpdateWorkspace {
    fn validate(&self) -> Result<()> {
        require(&self.name, "UpdateWorkspace", "name")
    }
}

/// A user of an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identifier and timestamps.
    #[serde(flatten)]
    pub base: BaseModel,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Whether the invitation was accepted.
    #[serde(default)]
    pub activated: bool,
    /// Account the user belongs to.
    #[serde(default)]
    pub account_id: AccountId,
    /// When the user accepted the terms and conditions.
    #[serde(default, rename = "cguAcceptedDate", skip_serializing_if = "Option::is_none")]
    pub cgu_accepted_date: Option<DateTime<Utc>>,
    /// Last login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_connection: Option<DateTime<Utc>>,
    /// Account administrator.
    #[serde(default)]
    pub is_admin: bool,
}

/// Payload for inviting a user into the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    /// Display name.
    pub name: String,
    /// Email the invitation is sent to.
    pub email: String,
    /// Grant account administration.
    #[serde(default)]
    pub is_admin: bool,
}

impl Validate for CreateUser {
    fn validate(&self) -> Result<()> {
        require(&self.name, "CreateUser", "name")?;
        require(&self.email, "CreateUser", "email")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn account_requires_postal_fields() {
        let mut account = Account {
            name: "acme".to_string(),
            address: "1 rue de la Paix".to_string(),
            zip_code: "75002".to_string(),
            city: "Paris".to_string(),
            country: "FR".to_string(),
            ..Account::default()
        };
        assert!(account.validate().is_ok());

        account.zip_code.clear();
        assert_eq!(
            account.validate(),
            Err(ValidationError::Required {
                payload: "Account",
                field: "zipCode"
            })
        );
    }

    #[test]
    fn account_omits_empty_contacts() {
        let json = serde_json::to_value(Account::default()).unwrap();
        assert!(json.get("financialContact").is_none());
        assert!(json.get("zipCode").is_some());
    }

    #[test]
    fn self_info_decodes() {
        let info: SelfInfo =
            serde_json::from_str(r#"{"accountId":"c208a91f-72f4-4e2b-94f9-d311f369538a"}"#)
                .unwrap();
        assert_eq!(
            info.account_id.to_string(),
            "c208a91f-72f4-4e2b-94f9-d311f369538a"
        );
    }

    #[test]
    fn workspace_id_follows_base_id() {
        let workspace: Workspace = serde_json::from_str(
            r#"{"id":"f6bee4c6-f7f0-493c-8e3c-5b6c6af6c2de","name":"ws"}"#,
        )
        .unwrap();
        assert_eq!(
            workspace.workspace_id().to_string(),
            "f6bee4c6-f7f0-493c-8e3c-5b6c6af6c2de"
        );
    }

    #[test]
    fn update_workspace_requires_name() {
        assert!(UpdateWorkspace::new("lab").validate().is_ok());
        assert_eq!(
            UpdateWorkspace::new(" ").with_description("kept").validate(),
            Err(ValidationError::Required {
                payload: "UpdateWorkspace",
                field: "name"
            })
        );
    }

    #[test]
    fn create_user_requires_email() {
        let user = CreateUser {
            name: "jane".to_string(),
            email: String::new(),
            is_admin: false,
        };
        assert!(matches!(
            user.validate(),
            Err(ValidationError::Required { field: "email", .. })
        ));
    }
}

//! Core models for the Autonomi network-fabric provisioning API.
//!
//! This crate provides the types shared by the SDK and its command-line front end:
//!
//! - **Identifiers**: typed UUID wrappers for accounts, workspaces and elements
//! - **Administrative states**: the creation and deletion lifecycles, with their exact wire tokens
//! - **Resources**: nodes, transports, attachments, physical ports, workspaces, accounts and users
//! - **Validation**: structural checks on request payloads before they are sent
//!
//! # Example
//!
//! ```
//! use autonomi_core::{AdministrativeState, CreateNode, NodeType, Validate};
//!
//! let state: AdministrativeState = "creation_pending".parse().unwrap();
//! assert!(!state.is_terminal());
//!
//! let payload = CreateNode::new("edge-fr5", NodeType::Access, "AEQUFR5100");
//! assert!(payload.validate().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod attachment;
pub mod element;
pub mod error;
pub mod ids;
pub mod node;
pub mod port;
pub mod product;
pub mod state;
pub mod transport;

pub use account::{
    Account, CreateUser, CreateWorkspace, SelfInfo, UpdateWorkspace, User, Workspace,
};
pub use attachment::{Attachment, CreateAttachment};
pub use element::{BaseModel, Data, Element, ResourceKind, SupportError};
pub use error::{Validate, ValidationError};
pub use ids::{AccountId, ElementId, IdError, WorkspaceId};
pub use node::{
    AccessProductType, CreateNode, Node, NodeProduct, NodeType, Port, ProviderCloudConfig,
    ServiceKey, UpdateElement,
};
pub use port::{CreatePhysicalPort, PhysicalPort};
pub use product::{AddProduct, Product};
pub use state::{is_valid_transition, AdministrativeState, StateFamily, UnknownState};
pub use transport::{CreateTransport, Transport, TransportProduct, TransportVlans};

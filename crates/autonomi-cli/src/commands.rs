//! Subcommands and their dispatch onto the SDK.

use std::future::Future;

use anyhow::{bail, Result};
use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use autonomi_core::{
    AdministrativeState, CreateAttachment, CreateNode, CreateTransport, CreateWorkspace,
    ElementId, NodeType, ProviderCloudConfig, UpdateElement, WorkspaceId,
};
use autonomi_sdk::{Client, Observed, WaitOptions};

/// Node type accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NodeKind {
    Access,
    Cloud,
    Bridge,
    Router,
}

impl From<NodeKind> for NodeType {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Access => Self::Access,
            NodeKind::Cloud => Self::Cloud,
            NodeKind::Bridge => Self::Bridge,
            NodeKind::Router => Self::Router,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the account bound to the token.
    Whoami,
    /// Manage workspaces.
    #[command(subcommand)]
    Workspace(WorkspaceCommand),
    /// Manage nodes.
    #[command(subcommand)]
    Node(NodeCommand),
    /// Manage transports.
    #[command(subcommand)]
    Transport(TransportCommand),
    /// Manage attachments.
    #[command(subcommand)]
    Attachment(AttachmentCommand),
    /// Inspect physical ports.
    #[command(subcommand)]
    Port(PortCommand),
}

#[derive(Subcommand, Debug)]
pub enum WorkspaceCommand {
    /// List the account's workspaces.
    List,
    /// Show one workspace.
    Get { id: WorkspaceId },
    /// Create a workspace.
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a workspace.
    Delete { id: WorkspaceId },
}

#[derive(Subcommand, Debug)]
pub enum NodeCommand {
    /// Show one node.
    Get {
        #[arg(long)]
        workspace: WorkspaceId,
        id: ElementId,
    },
    /// Create a node and wait for it.
    Create {
        #[arg(long)]
        workspace: WorkspaceId,
        name: String,
        #[arg(long = "type", value_enum)]
        node_type: NodeKind,
        #[arg(long)]
        sku: String,
        /// Cloud provider account id (cloud nodes).
        #[arg(long)]
        csp_account_id: Option<String>,
        /// Cloud provider pairing key (cloud nodes).
        #[arg(long)]
        pairing_key: Option<String>,
        /// Physical port to plug the node into, with `--vlan`.
        #[arg(long, requires = "vlan")]
        physical_port: Option<ElementId>,
        #[arg(long)]
        vlan: Option<i64>,
        /// State to wait for instead of `deployed`.
        #[arg(long)]
        wait_for: Option<AdministrativeState>,
    },
    /// Rename a node.
    Rename {
        #[arg(long)]
        workspace: WorkspaceId,
        id: ElementId,
        name: String,
    },
    /// Delete a node and wait for it to go.
    Delete {
        #[arg(long)]
        workspace: WorkspaceId,
        id: ElementId,
        /// State to wait for instead of `deleted`.
        #[arg(long)]
        wait_for: Option<AdministrativeState>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TransportCommand {
    /// Show one transport.
    Get {
        #[arg(long)]
        workspace: WorkspaceId,
        id: ElementId,
    },
    /// Create a transport and wait for it.
    Create {
        #[arg(long)]
        workspace: WorkspaceId,
        name: String,
        #[arg(long)]
        sku: String,
        #[arg(long)]
        wait_for: Option<AdministrativeState>,
    },
    /// Rename a transport.
    Rename {
        #[arg(long)]
        workspace: WorkspaceId,
        id: ElementId,
        name: String,
    },
    /// Delete a transport and wait for it to go.
    Delete {
        #[arg(long)]
        workspace: WorkspaceId,
        id: ElementId,
        #[arg(long)]
        wait_for: Option<AdministrativeState>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AttachmentCommand {
    /// Show one attachment.
    Get {
        #[arg(long)]
        workspace: WorkspaceId,
        id: ElementId,
    },
    /// Attach a node to a transport and wait for it.
    Create {
        #[arg(long)]
        workspace: WorkspaceId,
        #[arg(long)]
        node: ElementId,
        #[arg(long)]
        transport: ElementId,
        #[arg(long)]
        wait_for: Option<AdministrativeState>,
    },
    /// Detach and wait for the attachment to go.
    Delete {
        #[arg(long)]
        workspace: WorkspaceId,
        id: ElementId,
        #[arg(long)]
        wait_for: Option<AdministrativeState>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PortCommand {
    /// List physical ports.
    List {
        #[arg(long)]
        state: Option<AdministrativeState>,
    },
    /// Show one physical port.
    Get { id: ElementId },
}

fn wait_options(wait_for: Option<AdministrativeState>, cancel: &CancellationToken) -> WaitOptions {
    let options = WaitOptions::new().cancellation(cancel.clone());
    match wait_for {
        Some(state) => options.administrative_state(state),
        None => options,
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn removed_or<T: Serialize>(observed: &Observed<T>) -> Result<Value> {
    match observed {
        Observed::Present(element) => to_json(element),
        Observed::Removed => Ok(serde_json::json!({ "administrativeState": "deleted" })),
    }
}

fn node_payload(
    name: String,
    node_type: NodeKind,
    sku: String,
    csp_account_id: Option<String>,
    pairing_key: Option<String>,
    physical_port: Option<ElementId>,
    vlan: Option<i64>,
) -> Result<CreateNode> {
    let mut payload = CreateNode::new(name, node_type.into(), sku);
    if csp_account_id.is_some() || pairing_key.is_some() {
        payload = payload.with_provider_config(ProviderCloudConfig {
            account_id: csp_account_id.unwrap_or_default(),
            pairing_key: pairing_key.unwrap_or_default(),
            ..ProviderCloudConfig::default()
        });
    }
    match (physical_port, vlan) {
        (Some(port), Some(vlan)) => payload = payload.with_physical_port(port, vlan),
        (None, Some(_)) => bail!("--vlan requires --physical-port"),
        _ => {}
    }
    Ok(payload)
}

/// Drive `work` until it finishes or `cancel` fires.
///
/// `work` is polled first, so a wait that already reacts to the token
/// reports its own cancellation error.
pub async fn interruptible<T>(
    cancel: &CancellationToken,
    work: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        result = work => result,
        () = cancel.cancelled() => bail!("interrupted"),
    }
}

/// Run `command` and return what to print.
pub async fn run(client: &Client, command: Command, cancel: &CancellationToken) -> Result<Value> {
    match command {
        Command::Whoami => Ok(serde_json::json!({ "accountId": client.get_self().await? })),
        Command::Workspace(command) => run_workspace(client, command).await,
        Command::Node(command) => run_node(client, command, cancel).await,
        Command::Transport(command) => run_transport(client, command, cancel).await,
        Command::Attachment(command) => run_attachment(client, command, cancel).await,
        Command::Port(command) => match command {
            PortCommand::List { state } => to_json(&client.list_physical_ports(state).await?),
            PortCommand::Get { id } => to_json(&client.get_physical_port(id).await?),
        },
    }
}

async fn run_workspace(client: &Client, command: WorkspaceCommand) -> Result<Value> {
    match command {
        WorkspaceCommand::List => to_json(&client.list_workspaces(client.account_id()).await?),
        WorkspaceCommand::Get { id } => to_json(&client.get_workspace(id).await?),
        WorkspaceCommand::Create { name, description } => {
            let payload = CreateWorkspace { name, description };
            to_json(&client.create_workspace(&payload).await?)
        }
        WorkspaceCommand::Delete { id } => {
            client.delete_workspace(id).await?;
            Ok(serde_json::json!({ "deleted": id }))
        }
    }
}

async fn run_node(client: &Client, command: NodeCommand, cancel: &CancellationToken) -> Result<Value> {
    match command {
        NodeCommand::Get { workspace, id } => to_json(&client.get_node(workspace, id).await?),
        NodeCommand::Create {
            workspace,
            name,
            node_type,
            sku,
            csp_account_id,
            pairing_key,
            physical_port,
            vlan,
            wait_for,
        } => {
            let payload = node_payload(
                name,
                node_type,
                sku,
                csp_account_id,
                pairing_key,
                physical_port,
                vlan,
            )?;
            let node = client
                .create_node(&payload, workspace, wait_options(wait_for, cancel))
                .await?;
            to_json(&node)
        }
        NodeCommand::Rename {
            workspace,
            id,
            name,
        } => to_json(
            &client
                .update_node(&UpdateElement::new(name), workspace, id)
                .await?,
        ),
        NodeCommand::Delete {
            workspace,
            id,
            wait_for,
        } => removed_or(
            &client
                .delete_node(workspace, id, wait_options(wait_for, cancel))
                .await?,
        ),
    }
}

async fn run_transport(
    client: &Client,
    command: TransportCommand,
    cancel: &CancellationToken,
) -> Result<Value> {
    match command {
        TransportCommand::Get { workspace, id } => {
            to_json(&client.get_transport(workspace, id).await?)
        }
        TransportCommand::Create {
            workspace,
            name,
            sku,
            wait_for,
        } => to_json(
            &client
                .create_transport(
                    &CreateTransport::new(name, sku),
                    workspace,
                    wait_options(wait_for, cancel),
                )
                .await?,
        ),
        TransportCommand::Rename {
            workspace,
            id,
            name,
        } => to_json(
            &client
                .update_transport(&UpdateElement::new(name), workspace, id)
                .await?,
        ),
        TransportCommand::Delete {
            workspace,
            id,
            wait_for,
        } => removed_or(
            &client
                .delete_transport(workspace, id, wait_options(wait_for, cancel))
                .await?,
        ),
    }
}

async fn run_attachment(
    client: &Client,
    command: AttachmentCommand,
    cancel: &CancellationToken,
) -> Result<Value> {
    match command {
        AttachmentCommand::Get { workspace, id } => {
            to_json(&client.get_attachment(workspace, id).await?)
        }
        AttachmentCommand::Create {
            workspace,
            node,
            transport,
            wait_for,
        } => to_json(
            &client
                .create_attachment(
                    &CreateAttachment::new(node, transport),
                    workspace,
                    wait_options(wait_for, cancel),
                )
                .await?,
        ),
        AttachmentCommand::Delete {
            workspace,
            id,
            wait_for,
        } => removed_or(
            &client
                .delete_attachment(workspace, id, wait_options(wait_for, cancel))
                .await?,
        ),
    }
}

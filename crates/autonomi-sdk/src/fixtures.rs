//! Shared helpers for unit tests.

use std::sync::Arc;
use std::time::Duration;

use autonomi_core::{ElementId, WorkspaceId};
use serde_json::{json, Value};

use crate::client::Client;
use crate::http::mock::MockBackend;
use crate::poll::PollConfig;

pub(crate) const ACCOUNT: &str = "c208a91f-72f4-4e2b-94f9-d311f369538a";
pub(crate) const WORKSPACE: &str = "f6bee4c6-f7f0-493c-8e3c-5b6c6af6c2de";

pub(crate) fn workspace() -> WorkspaceId {
    WORKSPACE.parse().unwrap()
}

/// Path of the test workspace.
pub(crate) fn workspace_path() -> String {
    format!("/accounts/{ACCOUNT}/workspaces/{WORKSPACE}")
}

/// A client over `mock` polling every second, at most `max_retry` times.
pub(crate) fn client(mock: &Arc<MockBackend>, max_retry: u32) -> Client {
    Client::from_parts(
        mock.clone(),
        ACCOUNT.parse().unwrap(),
        PollConfig::new(Duration::from_secs(1), max_retry),
    )
    .unwrap()
}

/// A body that decodes as a node, a transport or an attachment.
pub(crate) fn element(id: ElementId, state: &str) -> Value {
    json!({
        "id": id.to_string(),
        "workspaceId": WORKSPACE,
        "name": "element",
        "administrativeState": state,
        "nodeId": "6e3a4dc5-0d2c-4fd4-9a0b-1c1f5d3a3f01",
        "transportId": "0b5ed3f2-4c51-4f7c-8b8c-2d1c1e9d8a02",
    })
}

/// Like [`element`], with a support error attached.
pub(crate) fn failed_element(id: ElementId, state: &str, code: &str, msg: &str) -> Value {
    let mut value = element(id, state);
    value["error"] = json!({ "code": code, "msg": msg });
    value
}

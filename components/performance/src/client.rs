//! Seams to the remote debugging transport and the debug target
//!
//! Both are owned by the hosting toolbox; the connection only borrows them.

use async_trait::async_trait;
use devtools_types::{
    ActorRequest, ListTabsReply, ProtocolError, RootForm, TargetForm, TargetId, UnsolicitedPacket,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::Result;

/// Remote debugging protocol client
#[async_trait]
pub trait DebuggerClient: Send + Sync {
    /// Send a request and wait for the actor's one-shot reply
    async fn request(&self, packet: ActorRequest) -> std::result::Result<Value, ProtocolError>;

    /// Ask the root actor for its tab list and global actors
    async fn list_tabs(&self) -> std::result::Result<ListTabsReply, ProtocolError>;

    /// Stream of packets actors push without a request
    fn unsolicited(&self) -> broadcast::Receiver<UnsolicitedPacket>;
}

/// A debuggable page or process
#[async_trait]
pub trait Target: Send + Sync {
    /// Identity used to key shared per-target state
    fn id(&self) -> TargetId;

    /// Whether this is a chrome-privileged target
    fn is_chrome(&self) -> bool;

    /// Make a local target reachable over the remote protocol
    async fn make_remote(&self) -> Result<()>;

    /// The target's form, available once remote
    fn form(&self) -> Option<TargetForm>;

    /// Cached root actor form, if a `listTabs` reply was already seen
    fn root(&self) -> Option<RootForm>;

    /// The client owning this target's connection
    fn client(&self) -> Arc<dyn DebuggerClient>;
}

/// Send a request and turn error-shaped replies into errors
pub(crate) async fn send_request(client: &dyn DebuggerClient, packet: ActorRequest) -> Result<Value> {
    debug!("Sending '{}' to {}", packet.method, packet.to);

    let reply = client.request(packet).await?;
    if let Some(error) = ProtocolError::from_reply(&reply) {
        return Err(error.into());
    }
    Ok(reply)
}

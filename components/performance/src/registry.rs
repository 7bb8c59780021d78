//! Per-target cache of performance actor connections

use dashmap::DashMap;
use devtools_types::{EventEmitter, ListenerId, TargetId};
use std::sync::{Arc, OnceLock};
use tracing::info;

use crate::client::Target;
use crate::connection::{ConnectionEvent, PerformanceActorsConnection};

/// Cache of connections keyed by target, so every tool working on a target
/// shares one connection
///
/// Entries live until the hosting tool evicts the target.
#[derive(Debug, Default)]
pub struct SharedPerformanceActors {
    connections: DashMap<TargetId, Arc<PerformanceActorsConnection>>,
    notifications: Arc<EventEmitter<ConnectionEvent>>,
}

impl SharedPerformanceActors {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static SharedPerformanceActors {
        static SHARED: OnceLock<SharedPerformanceActors> = OnceLock::new();
        SHARED.get_or_init(SharedPerformanceActors::new)
    }

    /// Connection for `target`, created and cached on first use
    ///
    /// The connection still has to be opened before use.
    pub fn for_target(&self, target: &Arc<dyn Target>) -> Arc<PerformanceActorsConnection> {
        let id = target.id();
        if let Some(existing) = self.connections.get(&id) {
            return existing.value().clone();
        }

        let mut created = false;
        let connection = self
            .connections
            .entry(id)
            .or_insert_with(|| {
                created = true;
                Arc::new(PerformanceActorsConnection::new(
                    target.clone(),
                    self.notifications.clone(),
                ))
            })
            .value()
            .clone();

        if created {
            info!("Performance actors connection created for target {}", id);
            self.notifications.emit(&ConnectionEvent::Created(id));
        }
        connection
    }

    /// Cached connection for a target id, if any
    pub fn get(&self, id: &TargetId) -> Option<Arc<PerformanceActorsConnection>> {
        self.connections.get(id).map(|entry| entry.value().clone())
    }

    /// Drop and destroy the connection of a torn-down target
    pub fn evict(&self, id: &TargetId) -> Option<Arc<PerformanceActorsConnection>> {
        let (_, connection) = self.connections.remove(id)?;
        connection.destroy();
        info!("Evicted performance actors connection for target {}", id);
        Some(connection)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Subscribe to connection lifecycle notifications
    pub fn on<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ConnectionEvent) + Send + Sync + 'static,
    {
        self.notifications.on(listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.notifications.off(id)
    }
}

/// Shared connection for `target` from the process-wide registry
pub fn get_performance_actors_connection(target: &Arc<dyn Target>) -> Arc<PerformanceActorsConnection> {
    SharedPerformanceActors::global().for_target(target)
}

//! Organization-partitioned fan-out bus.
//!
//! [`ChangeBus`] keeps one registry partition per organization. Each
//! subscriber owns a bounded `mpsc` queue; [`ChangeBus::publish`] pushes
//! into those queues with `try_send` and never waits, so a slow or stalled
//! subscriber cannot hold up an engine. When a queue is full the event is
//! dropped for that subscriber only.
//!
//! An event is only ever looked up under its own `organization_id`
//! partition; there is no code path that iterates other partitions during
//! a publish.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use statuspage_core::types::DbId;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

use crate::event::{ChangeEvent, Visibility, VisibilityPolicy};

/// Default per-subscriber queue depth.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Opaque per-bus subscription identifier.
pub type SubscriptionId = u64;

// ---------------------------------------------------------------------------
// Configuration / reporting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Events buffered per subscriber before new ones are dropped.
    pub queue_capacity: usize,
    pub policy: VisibilityPolicy,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            policy: VisibilityPolicy::default(),
        }
    }
}

/// Outcome of one [`ChangeBus::publish`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Subscribers the event was queued for.
    pub delivered: usize,
    /// Subscribers skipped because their queue was full.
    pub dropped: usize,
    /// Subscribers skipped by the visibility policy.
    pub filtered: usize,
    /// Subscribers found disconnected and removed.
    pub closed: usize,
}

// ---------------------------------------------------------------------------
// ChangeBus
// ---------------------------------------------------------------------------

struct Slot {
    visibility: Visibility,
    sender: mpsc::Sender<ChangeEvent>,
}

struct Inner {
    config: BusConfig,
    next_id: AtomicU64,
    shut_down: AtomicBool,
    registry: DashMap<DbId, HashMap<SubscriptionId, Slot>>,
}

impl Inner {
    fn remove(&self, organization_id: DbId, id: SubscriptionId) -> bool {
        let removed = match self.registry.get_mut(&organization_id) {
            Some(mut partition) => partition.remove(&id).is_some(),
            None => false,
        };
        // The partition guard must be released before `remove_if` locks
        // the same shard.
        self.registry
            .remove_if(&organization_id, |_, partition| partition.is_empty());
        removed
    }
}

/// Shared handle to the bus. Clones refer to the same registry.
#[derive(Clone)]
pub struct ChangeBus {
    inner: Arc<Inner>,
}

impl ChangeBus {
    pub fn new(config: BusConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                next_id: AtomicU64::new(1),
                shut_down: AtomicBool::new(false),
                registry: DashMap::new(),
            }),
        }
    }

    pub fn config(&self) -> &BusConfig {
        &self.inner.config
    }

    /// Register a new observer of `organization_id`'s events.
    ///
    /// After [`shutdown`](Self::shutdown) the returned subscription is
    /// already closed.
    pub fn subscribe(&self, organization_id: DbId, visibility: Visibility) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.inner.config.queue_capacity.max(1));
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        if !self.inner.shut_down.load(Ordering::Acquire) {
            self.inner
                .registry
                .entry(organization_id)
                .or_default()
                .insert(id, Slot { visibility, sender });
            tracing::debug!(
                subscription_id = id,
                org_id = %organization_id,
                ?visibility,
                "Subscriber registered"
            );
        }

        Subscription {
            id,
            organization_id,
            visibility,
            receiver,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    ///
    /// Dropping a [`Subscription`] does this automatically.
    pub fn unsubscribe(&self, organization_id: DbId, id: SubscriptionId) -> bool {
        self.inner.remove(organization_id, id)
    }

    /// Fan `event` out to every subscriber of its organization.
    ///
    /// Never blocks and never fails; the report says what happened.
    pub fn publish(&self, event: ChangeEvent) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let mut closed = Vec::new();

        if let Some(partition) = self.inner.registry.get(&event.organization_id) {
            for (id, slot) in partition.iter() {
                if !self.inner.config.policy.admits(slot.visibility, event.kind) {
                    report.filtered += 1;
                    continue;
                }
                match slot.sender.try_send(event.clone()) {
                    Ok(()) => report.delivered += 1,
                    Err(TrySendError::Full(_)) => {
                        report.dropped += 1;
                        tracing::warn!(
                            subscription_id = id,
                            org_id = %event.organization_id,
                            kind = %event.kind,
                            "Subscriber queue full, event dropped"
                        );
                    }
                    Err(TrySendError::Closed(_)) => closed.push(*id),
                }
            }
        }

        for id in closed {
            if self.inner.remove(event.organization_id, id) {
                report.closed += 1;
            }
        }

        report
    }

    /// Number of live subscribers bound to `organization_id`.
    pub fn subscriber_count(&self, organization_id: DbId) -> usize {
        self.inner
            .registry
            .get(&organization_id)
            .map(|p| p.len())
            .unwrap_or(0)
    }

    /// Number of live subscribers across all organizations.
    pub fn total_subscribers(&self) -> usize {
        self.inner.registry.iter().map(|p| p.len()).sum()
    }

    /// Drop every subscriber's sender so all receivers observe end of
    /// stream, and refuse new registrations.
    pub fn shutdown(&self) {
        self.inner.shut_down.store(true, Ordering::Release);
        let count = self.total_subscribers();
        self.inner.registry.clear();
        tracing::info!(count, "Change bus shut down");
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(BusConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Receiving end of one observer. Unregisters itself when dropped.
pub struct Subscription {
    id: SubscriptionId,
    organization_id: DbId,
    visibility: Visibility,
    receiver: mpsc::Receiver<ChangeEvent>,
    bus: Weak<Inner>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn organization_id(&self) -> DbId {
        self.organization_id
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Wait for the next event. `None` once the bus has shut down.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.receiver.recv().await
    }

    /// Non-blocking receive; `None` when nothing is queued or the stream
    /// has ended.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Stop accepting new events while keeping already-queued ones
    /// readable. The bus drops the registration on its next publish.
    pub fn close(&mut self) {
        self.receiver.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            inner.remove(self.organization_id, self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("organization_id", &self.organization_id)
            .field("visibility", &self.visibility)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

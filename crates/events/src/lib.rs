//! Change distribution for the status page platform.
//!
//! - [`ChangeEvent`] / [`ChangeKind`] -- the envelope an engine builds right
//!   after a committed mutation.
//! - [`ChangeBus`] -- organization-partitioned fan-out to live subscribers,
//!   each with its own bounded queue.
//! - [`Subscription`] -- the receiving end held by one connected observer.
//! - [`VisibilityPolicy`] -- which event kinds public status-page
//!   subscribers receive.

pub mod bus;
pub mod event;

pub use bus::{BusConfig, ChangeBus, DeliveryReport, Subscription, SubscriptionId};
pub use event::{ChangeEvent, ChangeKind, Visibility, VisibilityPolicy};

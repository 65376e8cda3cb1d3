//! WebSocket bridge from change-bus subscriptions to connected sockets.
//!
//! Provides connection management, heartbeat monitoring, and the HTTP
//! upgrade handlers for public (status page) and internal (dashboard)
//! subscribers.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::{internal_ws_handler, public_ws_handler};
pub use heartbeat::start_heartbeat;
pub use manager::{PingReport, WsManager};

//! GigDesk Coordinator
//!
//! The hire coordinator executes the one irreversible transition of the
//! marketplace: accepting a bid. It guarantees exactly-once-hire semantics
//! against concurrent competing calls using the document store's transaction
//! primitive, then fans out real-time notifications. The crate also carries
//! the ordinary marketplace operations around that core.

pub mod config;
pub mod coordinator;
pub mod marketplace;
pub mod metrics;
pub mod notifier;

pub use config::MarketConfig;
pub use coordinator::{HireCoordinator, HireOutcome};
pub use marketplace::{Marketplace, NewBid, NewGig};
pub use metrics::{Metrics, MetricsSnapshot, SharedMetrics};
pub use notifier::{Notification, Notifier};

//! Real-time notification fan-out.
//!
//! A registry of per-user channels. Delivery is fire-and-forget with
//! at-most-one-attempt semantics: `publish` never blocks, never retries, and
//! a full or missing channel is logged and counted, not surfaced to the
//! caller. No durability is provided; a user who is not subscribed simply
//! misses the event.

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use gigdesk_common::{BidId, GigId, UserId};

/// An event addressed to a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// The addressee's bid was accepted.
    Hired {
        gig_id: GigId,
        gig_title: String,
        budget: Decimal,
        owner_name: String,
        bid_id: BidId,
        price: Decimal,
    },
    /// The addressee's bid lost to another bid on the same gig.
    BidRejected { gig_title: String },
    /// A new bid arrived on a gig the addressee owns.
    NewBid {
        gig_id: GigId,
        gig_title: String,
        bid_id: BidId,
        price: Decimal,
        freelancer_name: String,
    },
}

impl Notification {
    /// Wire event name.
    pub fn event_name(&self) -> &'static str {
        match self {
            Notification::Hired { .. } => "hired",
            Notification::BidRejected { .. } => "bid_rejected",
            Notification::NewBid { .. } => "new_bid",
        }
    }
}

/// Per-user notification channel registry.
pub struct Notifier {
    channels: DashMap<UserId, mpsc::Sender<Notification>>,
    channel_capacity: usize,
}

impl Notifier {
    /// Create a notifier with the given per-user channel capacity.
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            channel_capacity,
        }
    }

    /// Subscribe a user, replacing any previous subscription.
    pub fn subscribe(&self, user_id: UserId) -> mpsc::Receiver<Notification> {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        self.channels.insert(user_id, tx);
        debug!(user_id = %user_id, "User subscribed to notifications");
        rx
    }

    /// Drop a user's subscription.
    pub fn unsubscribe(&self, user_id: &UserId) {
        self.channels.remove(user_id);
        debug!(user_id = %user_id, "User unsubscribed from notifications");
    }

    /// Deliver an event to one user, best-effort.
    ///
    /// Returns whether the event was handed to the user's channel. A `false`
    /// return is not an error condition for callers.
    pub fn publish(&self, user_id: &UserId, notification: Notification) -> bool {
        let Some(sender) = self.channels.get(user_id) else {
            debug!(
                user_id = %user_id,
                event = notification.event_name(),
                "No subscription, notification dropped"
            );
            return false;
        };

        match sender.try_send(notification) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    error = %e,
                    "Notification channel full or closed, event dropped"
                );
                false
            }
        }
    }

    /// Number of subscribed users.
    pub fn subscriber_count(&self) -> usize {
        self.channels.len()
    }
}

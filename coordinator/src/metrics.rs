//! Metrics collection for marketplace monitoring.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Marketplace metrics.
pub struct Metrics {
    /// Total hire attempts.
    pub hires_total: AtomicU64,
    /// Successful hires.
    pub hires_success: AtomicU64,
    /// Hire attempts that lost a race (conflict-class failures).
    pub hires_conflict: AtomicU64,
    /// Hire attempts rejected before the write (not found / forbidden).
    pub hires_rejected: AtomicU64,
    /// Gigs created.
    pub gigs_created: AtomicU64,
    /// Bids placed.
    pub bids_placed: AtomicU64,
    /// Notifications delivered to a channel.
    pub notifications_sent: AtomicU64,
    /// Notifications dropped (no subscriber, channel full).
    pub notifications_dropped: AtomicU64,
}

impl Metrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self {
            hires_total: AtomicU64::new(0),
            hires_success: AtomicU64::new(0),
            hires_conflict: AtomicU64::new(0),
            hires_rejected: AtomicU64::new(0),
            gigs_created: AtomicU64::new(0),
            bids_placed: AtomicU64::new(0),
            notifications_sent: AtomicU64::new(0),
            notifications_dropped: AtomicU64::new(0),
        }
    }

    /// Record a hire attempt.
    pub fn hire_attempted(&self) {
        self.hires_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful hire.
    pub fn hire_succeeded(&self) {
        self.hires_success.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a hire that lost a race.
    pub fn hire_conflicted(&self) {
        self.hires_conflict.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a hire rejected before any write.
    pub fn hire_rejected(&self) {
        self.hires_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a created gig.
    pub fn gig_created(&self) {
        self.gigs_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a placed bid.
    pub fn bid_placed(&self) {
        self.bids_placed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a notification delivery outcome.
    pub fn notification(&self, delivered: bool) {
        if delivered {
            self.notifications_sent.fetch_add(1, Ordering::Relaxed);
        } else {
            self.notifications_dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hires_total: self.hires_total.load(Ordering::Relaxed),
            hires_success: self.hires_success.load(Ordering::Relaxed),
            hires_conflict: self.hires_conflict.load(Ordering::Relaxed),
            hires_rejected: self.hires_rejected.load(Ordering::Relaxed),
            gigs_created: self.gigs_created.load(Ordering::Relaxed),
            bids_placed: self.bids_placed.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
            notifications_dropped: self.notifications_dropped.load(Ordering::Relaxed),
        }
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            r#"# HELP gigdesk_hires_total Total hire attempts
# TYPE gigdesk_hires_total counter
gigdesk_hires_total {}

# HELP gigdesk_hires_success Successful hires
# TYPE gigdesk_hires_success counter
gigdesk_hires_success {}

# HELP gigdesk_hires_conflict Hire attempts that lost a race
# TYPE gigdesk_hires_conflict counter
gigdesk_hires_conflict {}

# HELP gigdesk_hires_rejected Hire attempts rejected before any write
# TYPE gigdesk_hires_rejected counter
gigdesk_hires_rejected {}

# HELP gigdesk_gigs_created Total gigs created
# TYPE gigdesk_gigs_created counter
gigdesk_gigs_created {}

# HELP gigdesk_bids_placed Total bids placed
# TYPE gigdesk_bids_placed counter
gigdesk_bids_placed {}

# HELP gigdesk_notifications_sent Notifications delivered
# TYPE gigdesk_notifications_sent counter
gigdesk_notifications_sent {}

# HELP gigdesk_notifications_dropped Notifications dropped
# TYPE gigdesk_notifications_dropped counter
gigdesk_notifications_dropped {}
"#,
            snapshot.hires_total,
            snapshot.hires_success,
            snapshot.hires_conflict,
            snapshot.hires_rejected,
            snapshot.gigs_created,
            snapshot.bids_placed,
            snapshot.notifications_sent,
            snapshot.notifications_dropped,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub hires_total: u64,
    pub hires_success: u64,
    pub hires_conflict: u64,
    pub hires_rejected: u64,
    pub gigs_created: u64,
    pub bids_placed: u64,
    pub notifications_sent: u64,
    pub notifications_dropped: u64,
}

/// Shared metrics instance.
pub type SharedMetrics = Arc<Metrics>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_increment() {
        let metrics = Metrics::new();

        metrics.hire_attempted();
        metrics.hire_attempted();
        metrics.hire_succeeded();
        metrics.hire_conflicted();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.hires_total, 2);
        assert_eq!(snapshot.hires_success, 1);
        assert_eq!(snapshot.hires_conflict, 1);
    }

    #[test]
    fn test_prometheus_export() {
        let metrics = Metrics::new();
        metrics.hire_attempted();

        let output = metrics.to_prometheus();
        assert!(output.contains("gigdesk_hires_total 1"));
    }
}

//! Audit events
//!
//! Structured events for every notable interaction with a link. The sink is
//! append-only and injected, so tests can observe what was emitted and the
//! production sink can stay a plain `tracing` target.

use std::sync::Arc;

/// Everything worth telling the audit sink about
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuditEvent {
    /// A short link was created
    ShortCreated {
        /// The shortcode of the new link
        shortcode: String,

        /// The target it redirects to
        long_url: String,

        /// The formatted expiry moment
        expiry: String,
    },

    /// A create ran into an already claimed shortcode
    ShortcodeCollision {
        /// The contested shortcode
        shortcode: String,
    },

    /// A redirect was served
    RedirectHit {
        /// The shortcode that was followed
        shortcode: String,

        /// Referrer, or `"direct"`
        source: String,

        /// Coarsened visitor address
        geo: String,
    },

    /// A redirect was refused because the link expired
    RedirectExpired {
        /// The shortcode that was refused
        shortcode: String,
    },

    /// Stats of a link were viewed
    StatsView {
        /// The shortcode that was viewed
        shortcode: String,

        /// The click count at the time of viewing
        total_clicks: i64,
    },

    /// Code generation gave up after repeated collisions
    AutogenFailed,
}

impl AuditEvent {
    /// The kind tag of the event
    pub fn kind(&self) -> &'static str {
        match self {
            AuditEvent::ShortCreated { .. } => "short_created",
            AuditEvent::ShortcodeCollision { .. } => "shortcode_collision",
            AuditEvent::RedirectHit { .. } => "redirect_hit",
            AuditEvent::RedirectExpired { .. } => "redirect_expired",
            AuditEvent::StatsView { .. } => "stats_view",
            AuditEvent::AutogenFailed => "short_autogen_failed",
        }
    }
}

/// A write-only destination for audit events
pub trait AuditSink: Send + Sync + 'static {
    /// Record a single event
    ///
    /// Must not fail; a sink that can fail internally should swallow and log
    fn record(&self, event: &AuditEvent);
}

/// Sink that emits structured `tracing` events under the `audit` target
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn record(&self, event: &AuditEvent) {
        match event {
            AuditEvent::ShortCreated {
                shortcode,
                long_url,
                expiry,
            } => tracing::info!(
                target: "audit",
                kind = event.kind(),
                shortcode = %shortcode,
                long_url = %long_url,
                expiry = %expiry,
            ),
            AuditEvent::ShortcodeCollision { shortcode }
            | AuditEvent::RedirectExpired { shortcode } => tracing::info!(
                target: "audit",
                kind = event.kind(),
                shortcode = %shortcode,
            ),
            AuditEvent::RedirectHit {
                shortcode,
                source,
                geo,
            } => tracing::info!(
                target: "audit",
                kind = event.kind(),
                shortcode = %shortcode,
                source = %source,
                geo = %geo,
            ),
            AuditEvent::StatsView {
                shortcode,
                total_clicks,
            } => tracing::info!(
                target: "audit",
                kind = event.kind(),
                shortcode = %shortcode,
                total_clicks = %total_clicks,
            ),
            AuditEvent::AutogenFailed => tracing::info!(
                target: "audit",
                kind = event.kind(),
            ),
        }
    }
}

/// Handle to the configured audit sink
///
/// Injected in the router as an extension, cheap to clone
#[derive(Clone)]
pub struct Audit {
    /// The sink events go to
    sink: Arc<dyn AuditSink>,
}

impl Audit {
    /// Create a new handle around a sink
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Record a single event on the sink
    pub fn record(&self, event: &AuditEvent) {
        self.sink.record(event);
    }
}

use chrono::{DateTime, Utc};

/// A domain event: an immutable fact about something that already happened.
///
/// Events are append-only. An aggregate's state is whatever its applied
/// events say it is.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "account.shares_bought").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// A domain event payload.
///
/// Payloads are:
/// - **immutable** (treat them as facts)
/// - **versioned** (schema evolution)
/// - free of live references to the aggregate that raised them
///
/// Event id and timestamp live on the wrapping [`doorx_core::DomainEvent`].
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "work_orders.order.created").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;
}

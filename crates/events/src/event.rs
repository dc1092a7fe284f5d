/// A domain-agnostic event.
///
/// Events are **immutable** facts describing a state change that already
/// happened. Consumers use the stable `event_type` name for logging and routing.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "inventory.item.discovered").
    fn event_type(&self) -> &'static str;
}

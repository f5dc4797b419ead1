//! Event marker trait.
//!
//! Events are plain values passed from one system to a later one (or to the
//! same system on the next frame). They replace ad-hoc "something changed"
//! flags shared between systems.

/// Marker trait for event types.
///
/// Any `Send + Sync + 'static` type can be sent as an event.
pub trait Event: Send + Sync + 'static {}

// Blanket implementation: any Send + Sync + 'static type can be an event
impl<T: Send + Sync + 'static> Event for T {}

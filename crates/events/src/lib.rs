//! Event mechanics: the event contract and snapshot/outcome distribution.
//!
//! Nothing in here knows about inventory; the domain crates plug their own
//! message types into [`EventBus`].

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};

//! Domain event plumbing: payload contract, bus envelope, pub/sub and the
//! post-commit dispatcher.

pub mod bus;
pub mod dispatcher;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use dispatcher::{EventDispatchError, EventDispatcher};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};

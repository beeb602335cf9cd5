//! Infrastructure layer: aggregate persistence, command orchestration and the
//! application services built on them.

pub mod command_dispatcher;
pub mod in_memory;
pub mod repository;
pub mod vendors;
pub mod work_orders;

pub use command_dispatcher::{CommandDispatcher, DispatchError};
pub use in_memory::{InMemoryAggregateStore, InMemorySession};
pub use repository::{AggregateStore, Persisted, Repository, RepositoryError, UnitOfWork};
pub use vendors::{InMemoryVendorDirectory, VendorProfile, VendorQualification};
pub use work_orders::{InMemoryWorkOrderStore, WorkOrderService};

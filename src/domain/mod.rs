pub mod command;
pub mod inventory;
pub mod metrics;
pub mod resource;
pub mod status;

pub use command::{CommandKind, ObjectKind, UnknownCommand};
pub use inventory::{Datastore, HostSystem, ManagedObject, RecordError};
pub use resource::Resource;
pub use status::{CheckState, Thresholds};

pub mod container;
pub mod stack;

pub use container::{ContainerAction, ContainerId};
pub use stack::{CommandOutcome, StackAction, StackDescriptor, COMPOSE_FILE_NAMES};

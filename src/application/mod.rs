mod executor;
mod inventory;
mod locks;
mod proxy;

pub use executor::StackExecutor;
pub use inventory::StackScanner;
pub use proxy::DockerProxy;

pub mod compose;
pub mod docker;

pub use compose::ProcessComposeRunner;
pub use docker::DockerAdapter;

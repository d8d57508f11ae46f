pub mod compose_runner;
pub mod engine_api;

pub use compose_runner::ComposeRunner;
pub use engine_api::EngineApi;

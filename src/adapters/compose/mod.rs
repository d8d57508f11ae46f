mod process;

pub use process::ProcessComposeRunner;

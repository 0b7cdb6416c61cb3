pub mod ansible;
pub mod error;
pub mod ssh;

pub use ansible::AnsibleRunner;
pub use error::{RunnerError, RunnerResult};

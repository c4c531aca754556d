//! Scheduled YouTube upload agent.
//!
//! This crate provides:
//! - Configuration from the environment
//! - Wall-clock trigger schedule (weekly videos, daily shorts)
//! - Upload agent owning the video and shorts queues
//! - Polling runner with trending monitor and graceful shutdown

pub mod agent;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod metrics;
pub mod platform;
pub mod schedule;

#[cfg(test)]
mod testing;

pub use agent::{AgentStatus, RunReport, Slot, UploadAgent, UploadOutcome};
pub use config::AgentConfig;
pub use error::{AgentError, AgentResult};
pub use executor::{AgentRunner, ShutdownHandle};
pub use logging::{init_tracing, JobLogger};
pub use platform::{VideoPlatform, YoutubePlatform};
pub use schedule::{Schedule, Trigger};

//! System orchestration, startup, and shutdown logic.

pub mod directory_system;
pub mod telemetry;

pub use directory_system::*;
pub use telemetry::*;

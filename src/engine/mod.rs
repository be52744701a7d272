//! Core engine: the bootstrap → cycle → sleep loop and its pause control.

pub mod control;
pub mod orchestrator;
pub mod shutdown;

pub use control::PauseControl;
pub use orchestrator::Ariel;
pub use shutdown::shutdown_signal;

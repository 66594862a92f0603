//! Controllers shipped with the binary.

pub mod health;

pub use health::HealthController;

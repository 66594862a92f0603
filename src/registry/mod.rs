//! Service registry subsystem.
//!
//! # Data Flow
//! ```text
//! startup code
//!     → services.rs (ServiceCollection: capabilities + controllers)
//!     → controller.rs (each Controller registers its routes)
//!     → ServiceProvider (immutable, shared by reference)
//!     → pipeline construction
//! ```
//!
//! # Design Decisions
//! - Registration happens once, before the pipeline is built
//! - Duplicate or inconsistent registrations fail startup, never a request

pub mod controller;
pub mod services;

pub use controller::Controller;
pub use services::{Capability, RegistryError, ServiceCollection, ServiceProvider};

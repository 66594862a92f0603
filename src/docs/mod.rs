//! API documentation subsystem.
//!
//! # Data Flow
//! ```text
//! GET /swagger/v1/swagger.json
//!     → generator.rs (RouteTable → OpenAPI document, built per request)
//!
//! GET /swagger
//!     → ui.rs (rendered page) → browser fetches the document above
//! ```
//!
//! # Design Decisions
//! - Both surfaces are pipeline stages installed only in development
//! - The document is never cached; it always reflects the route table

pub mod generator;
pub mod ui;

pub use generator::{describe, description_stage, DescriptionEndpoint, DocumentInfo};
pub use ui::{docs_ui_stage, render_page, DocsUiEndpoint};

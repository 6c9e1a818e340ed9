pub mod export;
pub mod health;

pub use export::{export_document, method_not_allowed};
pub use health::{health_check, metrics_endpoint};

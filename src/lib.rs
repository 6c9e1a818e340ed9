//! doc-export-service: exports Google Docs as .docx binaries and relays
//! them to public blob storage, returning the resulting download URL.
pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod services;
pub mod startup;

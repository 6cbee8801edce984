//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelDescriptor`] / [`model::ModelCatalog`] — models the client can talk to
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod model;

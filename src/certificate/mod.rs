//! Certificate issuing: request model, validation, pipeline and HTTP handler.

pub mod handlers;
pub mod model;
pub mod service;
pub mod validation;


pub use service::{issue_certificate, ProcessError};
pub use validation::ValidationError;

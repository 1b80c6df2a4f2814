pub mod error_details;

pub use error_details::{redact_error_details, ErrorDetailsPolicy};

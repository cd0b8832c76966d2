//! Calendar document (RFC 5545) generation.

mod generate;

pub use generate::{CONTENT_TYPE, generate_ics};

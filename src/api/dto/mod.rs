//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization; request DTOs
//! carry validator annotations checked before the service boundary.

pub mod health;
pub mod redirect;
pub mod shorten;

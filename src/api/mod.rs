//! API layer: DTOs and HTTP handlers.

pub mod dto;
pub mod handlers;

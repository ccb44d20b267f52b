//! Infrastructure layer: storage backends.

pub mod persistence;

//! Request / response DTO (Data Transfer Object) types.
//!
//! These types are used by Axum handlers for JSON (de)serialisation and are
//! annotated with [`utoipa`] attributes to generate an OpenAPI 3.0 schema.
//! Request fields are optional so that a missing field reaches the session
//! workflow and is reported with its own message instead of a generic
//! deserialisation error.

pub mod character;
pub mod session;

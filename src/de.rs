//! Deserialization of geometry from various storage formats.

pub mod obj;
pub mod sm;

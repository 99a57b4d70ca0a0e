//! Serialization of geometry to various storage formats.

pub mod sm;

//! Flutter bridge for gpsmemo core.

pub mod api;

//! Infrastructure layer: concrete registry storage, transport sinks and
//! wire DTOs.

pub mod dto;
pub mod registry;
pub mod sink;

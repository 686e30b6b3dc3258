//! DTOs that bridge services with the relay API.

pub mod email;

//! HTTP route handlers for the relay service.

pub mod email;
pub mod main;

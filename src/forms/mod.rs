//! Wire-shape forms backing the relay routes.

pub mod email;

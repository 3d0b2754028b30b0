//! State machine module root.

pub mod motor;

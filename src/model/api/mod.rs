//! Request and response bodies.

pub mod comment;
pub mod health;
pub mod message;
pub mod vote;

pub mod comment;
pub mod property;
pub mod vote;

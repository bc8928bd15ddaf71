//! Data types: [`db`] for what is stored, [`api`] for what goes over the
//! wire, [`common`] for what both share.

pub mod api;
pub mod common;
pub mod db;
pub mod mongodb;

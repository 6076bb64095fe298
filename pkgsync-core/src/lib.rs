//! pkgsync library exports

pub mod catalog;
pub mod config;

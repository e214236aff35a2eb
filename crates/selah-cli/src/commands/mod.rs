//! Command handlers

pub mod books;
pub mod config;
pub mod daily;
pub mod read;
pub mod search;

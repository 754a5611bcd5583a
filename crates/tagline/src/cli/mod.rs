//! Command handlers for the tagline CLI.

pub mod caption;
pub mod config;
pub mod doctor;
pub mod models;

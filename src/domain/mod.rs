//! Core domain types and logic.

pub mod bar;
pub mod classifier;
pub mod commands;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod quota;
pub mod report;
pub mod scanner;
pub mod settings;
pub mod signal;
pub mod symbol_data;
pub mod user;

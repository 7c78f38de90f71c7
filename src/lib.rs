//! Marquee - Media library cataloger
//!
//! This library crate exposes the core functionality for integration testing.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod images;
pub mod logging;
pub mod metadata;
pub mod persist;
pub mod pipeline;
pub mod scanner;

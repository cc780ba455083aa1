//! Adapter implementations for notebook ports.

pub mod file;
pub mod memory;

mod document;

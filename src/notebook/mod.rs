//! Paged notebook: task lifecycle, page policy, and recall suggestions.
//!
//! Tasks are written on sequential pages of bounded capacity. Leaving a page
//! behind the frontier without acting on it fires the page, dismissing its
//! unfinished tasks. The module follows hexagonal architecture:
//!
//! - Domain types and pure page policy in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The engine, command path, and persistence worker in [`services`]
//! - Engine defaults in [`config`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

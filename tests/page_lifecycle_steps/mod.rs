//! Step definitions for page lifecycle BDD scenarios.

pub mod world;

mod given;
mod then;
mod when;

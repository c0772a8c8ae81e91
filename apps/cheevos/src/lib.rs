//! # Cheevos Application Library
//!
//! The binary's modules, exposed so integration tests can build routers and
//! catalogs without spawning a process.

pub mod api;
pub mod catalog_file;
pub mod cli;

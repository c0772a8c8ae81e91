//! # Storage Module
//!
//! Disk-backed settings storage using redb.

mod redb_settings;

pub use redb_settings::RedbSettings;

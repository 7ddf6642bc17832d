//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and a
//! handler.
//!
//! # Command Modules
//!
//! - [`search`] - Region discovery plus multi-region queue aggregation
//! - [`benefits`] - Benefit-name lookup
//! - [`regions`] - Voivodeship code table

pub mod benefits;
pub mod regions;
pub mod search;

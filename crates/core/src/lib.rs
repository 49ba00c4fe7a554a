//! Muva Core - Storefront domain library.
//!
//! This crate provides the domain model shared by the storefront binary and
//! the operator CLI:
//! - `storefront` - Public boutique site (catalog, booking, contact)
//! - `cli` - Offline validation of the catalog and settings feeds
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no async. Feeds arrive as `serde_json::Value` and leave as
//! normalized, immutable domain values.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product ids, prices and emails
//! - [`catalog`] - Products, sizes and feed normalization
//! - [`settings`] - Operator-editable runtime settings
//! - [`filter`] - Filter criteria, the filter engine and facets
//! - [`booking`] - Booking dialog state machine
//! - [`contact`] - Contact form state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod booking;
pub mod catalog;
pub mod contact;
pub mod filter;
pub mod settings;
pub mod types;

pub use booking::{BookingCoordinator, BookingState};
pub use catalog::{Catalog, CatalogError, CatalogIssue, ParsedCatalog, Product, SizeStock};
pub use contact::{
    ContactField, ContactForm, ContactStatus, ContactSubmission, ContactSubmitter,
    ContactValidationError, SubmitDecision,
};
pub use filter::{Facets, FilterCriteria};
pub use settings::Settings;
pub use types::*;

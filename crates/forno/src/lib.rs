//! Catalog pricing and order lifecycle engine for a food-ordering storefront.
//!
//! The crate is split between the read-only [`catalog`] (products, add-ons,
//! and the menu importer used to seed a store) and [`ordering`], which turns
//! customization selections into priced line items and owns the order record
//! through its delivery lifecycle. The HTTP router lives next to the domain
//! so the `services/api` binary only has to wire infrastructure around it.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ordering;
pub mod telemetry;

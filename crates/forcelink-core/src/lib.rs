//! Forcelink Core Types
//!
//! This crate provides the types shared between graph hosts and the
//! `forcelink` layout adapter:
//!
//! - **Identifiers**: String-interned element identifiers ([`identifier::Id`])
//! - **Geometry**: Points and bounds ([`geometry`] module)
//! - **Data**: Per-element key/value data ([`data::DataValue`])
//! - **Host**: The capabilities a layout needs from its host ([`host::Host`])
//! - **Collection**: An in-memory reference host ([`collection::Collection`])

pub mod collection;
pub mod data;
pub mod geometry;
pub mod host;
pub mod identifier;

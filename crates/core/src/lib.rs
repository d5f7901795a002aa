//! Webstore Core - Shared types library.
//!
//! This crate provides the types the gateway passes between its HTTP edge and
//! the document store:
//! - [`Document`] - an arbitrary JSON object stored in a collection
//! - [`DocumentId`] - the store's 12-byte identifier, written as 24 hex digits
//! - [`Order`] - a document that passed the order shape check
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. Conversions to the store's native identifier type are
//! behind the optional `bson` feature.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Webstore gateway library.
//!
//! This crate provides the gateway as a library so the router can be driven
//! directly in tests with any [`db::DocumentStore`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod activity;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::app;

//! Terrarium Dashboard - live sensor tiles and windowed history charts
//!
//! This library exposes the core modules for testing and reuse.

pub mod backend;
pub mod charts;
pub mod common;
pub mod config;
pub mod error;
pub mod popup;
pub mod registry;
pub mod routes;
pub mod series;
pub mod sync;
pub mod tiles;

//! World UTF exporter application
//!
//! The engine lives in [`worldutf_core`]; this crate adds layered
//! configuration and the `worldutf` command-line tool.

pub mod config;

//! Common types shared across the symdet workspace.
//!
//! This crate provides the device/net/pin graph of a flattened analog
//! netlist, the raw description it is built from, the closed enumerations
//! used by the symmetry classifier, and the engine configuration.

mod config;
pub mod design;
mod error;

pub use crate::config::*;
pub use crate::design::*;
pub use crate::error::*;

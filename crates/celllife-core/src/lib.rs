//! Core types for the CellLife cellular automaton.

pub mod cell;
pub mod config;
pub mod error;
pub mod stats;

pub use cell::*;
pub use config::*;
pub use error::{Error, Result};
pub use stats::*;

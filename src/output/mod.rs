// src/output/mod.rs

//! Line-oriented reporting for `--cli` mode.
//!
//! The interactive view reuses [`Printer::print_summary`] once it has left
//! the alternate screen, so both modes end with the same summary block.

pub mod printer;

pub use printer::{Printer, format_duration};

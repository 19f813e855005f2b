//! PacFinder Library - package catalog, install reasons and dependency resolution
//!
//! Reads the pacman databases and the repositories registered in pacman.conf,
//! and answers the questions a package browser asks about them.

#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::suspicious)]
// Allow documentation lints - internal code, not public API
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_precision_loss)]

pub mod cli;
pub mod config;
pub mod core;
pub mod db;

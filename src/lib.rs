//! intlx - react-intl message extraction for JSX/TSX sources
//!
//! intlx walks a project's sources with swc, validates every message
//! descriptor it finds, canonicalizes i18n call sites, wraps exported
//! components with the injection function and writes one JSON catalog per
//! source file.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Transform engine and the per-file pipeline
//! - `issues`: Issue type definitions and reporting
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod utils;

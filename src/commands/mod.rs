//! # CLI Command Implementations
//!
//! One file per `codeinventory` subcommand. Each defines an `Args` struct
//! derived with `clap` and an `execute` function that calls into the
//! `codeinventory` library. Settings and output handling shared by the
//! inventory commands live in [`common`].

pub mod common;
pub mod completions;
pub mod github;
pub mod project;

//! Core domain types
//!
//! This module contains the structures the client reads from and writes to
//! the remote platform. None of them are persisted locally; they live for the
//! duration of a single command.

pub mod model;
pub mod run;
pub mod workspace;

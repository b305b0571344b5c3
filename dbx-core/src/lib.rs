//! dbx Core
//!
//! Core types for automating a hosted notebook platform.
//!
//! This crate contains:
//! - Domain types: workspace objects, job runs and registered model versions
//! - DTOs: request and response bodies of the platform's REST API
//! - Promotion: pure decision logic for moving model versions between stages

pub mod domain;
pub mod dto;
pub mod promotion;

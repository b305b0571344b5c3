//! Data Transfer Objects for the platform's REST API
//!
//! Request bodies are serialized exactly as the endpoints expect them; response
//! bodies only carry the fields this tool reads.

pub mod job;
pub mod registry;
pub mod workspace;

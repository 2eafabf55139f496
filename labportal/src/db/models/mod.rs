//! Storage-layer request and response types, shared by every [`crate::db::Store`]
//! implementation.

pub mod developers;
pub mod experiment_files;
pub mod experiments;
pub mod lab_files;
pub mod labs;

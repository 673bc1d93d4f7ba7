//! Flattens CVE JSON 5 records into one row per affected product version.
//!
//! Records are classified for relevance to a product family, their affected
//! versions are extracted from structured constraints or free text, exclusive
//! upper bounds are turned into inclusive ones, and each version is cleaned
//! into `major.minor.patch` components.

pub mod batch;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod utils;

//! Type system for Verdict
//!
//! This module contains:
//! - Value types
//! - The tenant data model (tables, fields, one-to-one links)

pub mod data_model;
pub mod value;

pub use data_model::{DataModel, DataType, Field, LinkToSingle, Table};
pub use value::Value;

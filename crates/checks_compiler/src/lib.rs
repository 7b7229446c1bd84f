//! # Contract Checks Compiler
//!
//! Translates a model's column test declarations into a SodaCL check group.
//! This crate provides:
//!
//! - Test kind dispatch and per-kind expansion rules
//! - The `CheckCompiler` that walks a model and assembles the check group
//! - Serialization of check groups to YAML or JSON sinks
//! - Compilation jobs, individually or from a TOML manifest
//!
//! ## Example
//!
//! ```rust
//! use checks_compiler::{CheckCompiler, SinkFormat, render};
//! use checks_parser::parse_yaml;
//!
//! let contract = parse_yaml(r#"
//! models:
//!   - name: orders
//!     columns:
//!       - name: status
//!         tests:
//!           - not_null
//!           - some_package.unsupported_test
//! "#).unwrap();
//!
//! let group = CheckCompiler::new()
//!     .compile_model(&contract, "orders", "dbt_ddi.orders")
//!     .unwrap();
//!
//! assert_eq!(group.len(), 2);
//! let yaml = render(&group, SinkFormat::Yaml).unwrap();
//! assert!(yaml.starts_with("checks for dbt_ddi.orders:"));
//! ```

mod compiler;
mod emitter;
mod error;
mod job;
mod kinds;

pub use compiler::*;
pub use emitter::*;
pub use error::*;
pub use job::*;
pub use kinds::*;

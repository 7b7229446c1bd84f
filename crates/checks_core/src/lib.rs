//! # Contract Checks Core
//!
//! Core data structures for compiling data contracts into data-quality checks.
//!
//! A data contract describes one or more models (logical tables). Each model has
//! an ordered list of columns, and each column carries zero or more test
//! declarations. The compiler turns those declarations into check expressions
//! for an external validation engine.
//!
//! ## Key Concepts
//!
//! - **Contract**: The parsed document, an ordered list of models
//! - **Model**: A named table definition with ordered columns
//! - **TestDeclaration**: A column assertion, either bare (`not_null`) or parameterized
//! - **CheckExpression**: One executable condition plus its display name
//! - **CheckGroup**: All check expressions for one target table
//!
//! ## Example
//!
//! ```rust
//! use checks_core::{ColumnBuilder, ContractBuilder, ModelBuilder};
//!
//! let contract = ContractBuilder::new()
//!     .model(
//!         ModelBuilder::new("orders")
//!             .column(ColumnBuilder::new("order_id").not_null().unique().build())
//!             .build(),
//!     )
//!     .build();
//!
//! let model = contract.find_model("orders").unwrap();
//! assert_eq!(model.columns[0].tests.len(), 2);
//! ```

pub mod builder;
pub mod check;
pub mod contract;
pub mod error;

pub use builder::*;
pub use check::*;
pub use contract::*;
pub use error::*;

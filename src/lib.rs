//! # gilt-cssom
//!
//! The value engine of a CSS object model: every kind of CSS property value
//! as a typed tree, with canonical and minified serialization, structural
//! equality, registered-property syntax matching and unit-aware `calc()`.
//!
//! ## Core Systems
//!
//! - **[`lexical`]**: Tokenizer and lexical-unit tree values are built from
//! - **[`value`]**: The closed [`Value`] enum, its kinds and the [`ValueFactory`]
//! - **[`syntax`]**: `<syntax>` descriptors and three-valued matching
//! - **[`calc`]**: Math expression trees, static typing and evaluation
//! - **[`metadata`]**: Property and shorthand databases consulted by matching
//! - **[`config`]**: Parser configuration (IE compatibility, quoting, base URL)
//! - **[`error`]**: The error taxonomy
//!
//! ```
//! use gilt_cssom::{Descriptor, MatchResult, Value};
//!
//! let value = Value::parse("foo, var(--bar)").unwrap();
//! let grammar = Descriptor::parse("<custom-ident>#").unwrap();
//! assert_eq!(value.matches(&grammar), MatchResult::Pending);
//! assert_eq!(value.minified_css_text(), "foo,var(--bar)");
//! ```

// Foundation
pub mod config;
pub mod error;

// Input
pub mod lexical;

// Values
pub mod calc;
pub mod value;

// Matching
pub mod metadata;
pub mod syntax;

pub use calc::{Evaluation, Evaluator, TrackedUnit};
pub use config::{ParserConfig, QuoteStyle};
pub use error::{CssError, ErrorKind, Result};
pub use metadata::{matches_in, PropertyContext, PropertyDatabase, PropertyTable, ShorthandDatabase};
pub use syntax::{Descriptor, MatchResult};
pub use value::{Value, ValueCategory, ValueFactory, ValueKind};

//! Embeddable evaluator for S-expression rules.
//!
//! An expression is a list whose first element names an operator and whose
//! remaining elements are arguments, either literals or nested expressions.
//! Operators come from a whitelist held by [`Operators`]: functions receive
//! their arguments already evaluated, macros receive them raw and return a
//! replacement expression that is evaluated in turn.
//!
//! ```
//! use sexpr_eval::{Evaluator, Value};
//! use serde_json::json;
//!
//! let mut evaluator = Evaluator::new(());
//! let tree = Value::try_from(json!(["if-else", ["matches", "Rule", "r.*e"], "yes", "no"]))?;
//! assert_eq!(evaluator.evaluate(&tree)?, Value::from("yes"));
//! # Ok::<(), sexpr_eval::Error>(())
//! ```

mod builtins;
mod error;
mod evaluator;
mod operators;
mod util;
mod value;

pub use error::Error;
pub use evaluator::{EvalOptions, Evaluator, DEFAULT_MAX_DEPTH};
pub use operators::{Function, Macro, Operator, Operators};
pub use value::Value;

/// Result type for evaluator operations.
pub type Result<T> = std::result::Result<T, Error>;

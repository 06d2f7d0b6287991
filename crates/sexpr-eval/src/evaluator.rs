//! The recursive evaluator.

use std::collections::BTreeSet;

use crate::error::Error;
use crate::operators::{Operator, Operators};
use crate::value::Value;
use crate::Result;

/// Nesting depth allowed when no limit is configured.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Evaluator configuration.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Deepest nesting of evaluations (sub-expressions and macro expansions
    /// combined) before failing with [`Error::RecursionLimitExceeded`].
    pub max_depth: usize,
}

impl EvalOptions {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluates expression trees against a fixed set of operators.
///
/// The context is owned by the evaluator for its lifetime and handed to every
/// handler. Construct once and call [`Evaluator::evaluate`] as often as
/// needed; each call re-walks its tree from scratch.
pub struct Evaluator<C> {
    context: C,
    operators: Operators<C>,
    options: EvalOptions,
    depth: usize,
}

impl<C: 'static> Evaluator<C> {
    /// An evaluator with only the built-in operators.
    pub fn new(context: C) -> Self {
        Self::with_operators(context, Operators::new())
    }
}

impl<C> Evaluator<C> {
    pub fn with_operators(context: C, operators: Operators<C>) -> Self {
        Self::with_options(context, operators, EvalOptions::default())
    }

    pub fn with_options(context: C, operators: Operators<C>, options: EvalOptions) -> Self {
        Self {
            context,
            operators,
            options,
            depth: 0,
        }
    }

    /// Evaluate `tree`, which must be a list headed by an operator name.
    ///
    /// Function arguments are evaluated left to right before the function
    /// runs. Macro arguments are passed through raw and the macro's expansion
    /// is evaluated in place of the call.
    pub fn evaluate(&mut self, tree: &Value) -> Result<Value> {
        match tree {
            Value::List(items) => self.evaluate_expression(items),
            other => Err(Error::MalformedExpression(format!(
                "expected a list, found {other}"
            ))),
        }
    }

    /// Evaluate an expression given as its elements.
    pub fn evaluate_expression(&mut self, items: &[Value]) -> Result<Value> {
        if self.depth >= self.options.max_depth {
            return Err(Error::RecursionLimitExceeded {
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        let result = self.dispatch(items);
        self.depth -= 1;
        result
    }

    fn dispatch(&mut self, items: &[Value]) -> Result<Value> {
        let (head, args) = items
            .split_first()
            .ok_or_else(|| Error::MalformedExpression("empty expression".to_string()))?;
        let name = head.as_str().ok_or_else(|| {
            Error::MalformedExpression(format!("operator must be a string, found {head}"))
        })?;

        match self.operators.resolve(name) {
            Some(Operator::Macro(m)) => {
                tracing::trace!(operator = name, depth = self.depth, "expanding macro");
                let expansion = m(self, args)?;
                self.evaluate_expression(&expansion)
            }
            Some(Operator::Function(f)) => {
                tracing::trace!(operator = name, depth = self.depth, "applying function");
                let args = args
                    .iter()
                    .map(|arg| match arg {
                        Value::List(sub) => self.evaluate_expression(sub),
                        literal => Ok(literal.clone()),
                    })
                    .collect::<Result<Vec<_>>>()?;
                f(&mut self.context, &args)
            }
            None => Err(Error::UnsupportedOperator(name.to_string())),
        }
    }

    /// Names of the registered functions. Macro-only names are excluded.
    pub fn allowed_operators(&self) -> BTreeSet<&str> {
        self.operators.function_names().collect()
    }

    /// Whether `name` is registered as a function or a macro.
    pub fn supports(&self, name: &str) -> bool {
        self.operators.contains(name)
    }

    pub fn is_macro(&self, name: &str) -> bool {
        self.operators.is_macro(name)
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// The active configuration.
    pub fn options(&self) -> &EvalOptions {
        &self.options
    }
}

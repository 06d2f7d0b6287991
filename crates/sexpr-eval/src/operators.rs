//! The operator registry.
//!
//! Two independent maps keyed by operator name, one for functions and one for
//! macros. A name may appear in both; resolution prefers the macro.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::builtins;
use crate::evaluator::Evaluator;
use crate::value::Value;
use crate::Result;

/// An eager operator. Receives the context and its already-evaluated arguments.
pub type Function<C> = Rc<dyn Fn(&mut C, &[Value]) -> Result<Value>>;

/// A lazy operator. Receives the evaluator and its raw arguments, and returns
/// the expression to evaluate in its place.
pub type Macro<C> = Rc<dyn Fn(&mut Evaluator<C>, &[Value]) -> Result<Vec<Value>>>;

/// A resolved operator handler.
pub enum Operator<C> {
    Function(Function<C>),
    Macro(Macro<C>),
}

impl<C> Clone for Operator<C> {
    fn clone(&self) -> Self {
        match self {
            Operator::Function(f) => Operator::Function(Rc::clone(f)),
            Operator::Macro(m) => Operator::Macro(Rc::clone(m)),
        }
    }
}

impl<C> fmt::Debug for Operator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Function(_) => f.write_str("Operator::Function"),
            Operator::Macro(_) => f.write_str("Operator::Macro"),
        }
    }
}

/// The whitelist of operators an [`Evaluator`] may dispatch to.
///
/// Built up before construction of the evaluator, then frozen inside it.
pub struct Operators<C> {
    functions: HashMap<String, Function<C>>,
    macros: HashMap<String, Macro<C>>,
}

impl<C: 'static> Operators<C> {
    /// The built-in operators: `always`, `identity`, `true?`, `matches` and
    /// the `if-else` macro.
    pub fn new() -> Self {
        Self {
            functions: builtins::functions(),
            macros: builtins::macros(),
        }
    }

    /// The built-ins with `functions` and `macros` merged on top. Entries with
    /// a built-in's name replace it.
    pub fn with_overrides(
        functions: HashMap<String, Function<C>>,
        macros: HashMap<String, Macro<C>>,
    ) -> Self {
        let mut operators = Self::new();
        operators.functions.extend(functions);
        operators.macros.extend(macros);
        operators
    }

    /// Register a function, replacing any function of the same name.
    pub fn function<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut C, &[Value]) -> Result<Value> + 'static,
    {
        self.functions.insert(name.into(), Rc::new(f));
        self
    }

    /// Register a macro, replacing any macro of the same name.
    pub fn macro_rule<M>(mut self, name: impl Into<String>, m: M) -> Self
    where
        M: Fn(&mut Evaluator<C>, &[Value]) -> Result<Vec<Value>> + 'static,
    {
        self.macros.insert(name.into(), Rc::new(m));
        self
    }
}

impl<C> Operators<C> {
    /// Look up `name`, macros first.
    pub fn resolve(&self, name: &str) -> Option<Operator<C>> {
        if let Some(m) = self.macros.get(name) {
            return Some(Operator::Macro(Rc::clone(m)));
        }
        self.functions
            .get(name)
            .map(|f| Operator::Function(Rc::clone(f)))
    }

    /// Names of the registered functions. Macro-only names are not included.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name) || self.functions.contains_key(name)
    }

    pub fn is_macro(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }
}

impl<C: 'static> Default for Operators<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let ops = Operators::<()>::new();
        let mut names: Vec<&str> = ops.function_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["always", "identity", "matches", "true?"]);
        assert!(ops.is_macro("if-else"));
        assert!(ops.contains("if-else"));
        assert!(!ops.contains("if"));
    }

    #[test]
    fn test_macro_resolves_before_function() {
        let ops = Operators::<()>::new()
            .function("twice", |_, _| Ok(Value::from("function")))
            .macro_rule("twice", |_, _| Ok(vec![Value::from("always")]));
        assert!(matches!(ops.resolve("twice"), Some(Operator::Macro(_))));
        assert!(ops.function_names().any(|name| name == "twice"));
    }

    #[test]
    fn test_overrides_replace_builtins() {
        let mut functions: HashMap<String, Function<()>> = HashMap::new();
        functions.insert(
            "identity".into(),
            Rc::new(|_: &mut (), _: &[Value]| Ok(Value::from("custom"))),
        );
        let ops = Operators::with_overrides(functions, HashMap::new());
        let Some(Operator::Function(f)) = ops.resolve("identity") else {
            panic!("identity should resolve to a function");
        };
        assert_eq!(f(&mut (), &[Value::from("x")]).unwrap(), Value::from("custom"));
    }

    #[test]
    fn test_unknown_name() {
        let ops = Operators::<()>::new();
        assert!(ops.resolve("bogus-op").is_none());
    }
}

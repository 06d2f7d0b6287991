//! The default operator library.
//!
//! Functions: `always`, `identity`, `true?`, `matches`.
//! Macros: `if-else`.

use std::collections::HashMap;
use std::rc::Rc;

use regex::Regex;

use crate::error::Error;
use crate::evaluator::Evaluator;
use crate::operators::{Function, Macro};
use crate::util::{arg_or_null, string_form};
use crate::value::Value;
use crate::Result;

pub(crate) fn functions<C: 'static>() -> HashMap<String, Function<C>> {
    let mut fns: HashMap<String, Function<C>> = HashMap::new();
    fns.insert("always".into(), Rc::new(always::<C>));
    fns.insert("identity".into(), Rc::new(identity::<C>));
    fns.insert("true?".into(), Rc::new(is_true_fn::<C>));
    fns.insert("matches".into(), Rc::new(matches_fn::<C>));
    fns
}

pub(crate) fn macros<C: 'static>() -> HashMap<String, Macro<C>> {
    let mut macros: HashMap<String, Macro<C>> = HashMap::new();
    macros.insert("if-else".into(), Rc::new(if_else::<C>));
    macros
}

/// Whether a value reads as boolean true: its string form equals `true`,
/// ignoring case. Null is never true.
pub(crate) fn is_true(value: &Value) -> bool {
    !value.is_null() && value.to_string_value().eq_ignore_ascii_case("true")
}

fn always<C>(_ctx: &mut C, _args: &[Value]) -> Result<Value> {
    Ok(Value::Boolean(true))
}

fn identity<C>(_ctx: &mut C, args: &[Value]) -> Result<Value> {
    Ok(arg_or_null(args, 0))
}

fn is_true_fn<C>(_ctx: &mut C, args: &[Value]) -> Result<Value> {
    Ok(Value::Boolean(args.first().is_some_and(is_true)))
}

fn matches_fn<C>(_ctx: &mut C, args: &[Value]) -> Result<Value> {
    let [value, pattern] = args else {
        return Err(Error::invalid_argument(
            "matches",
            format!("expected 2 arguments, got {}", args.len()),
        ));
    };
    let value = string_form(value).to_lowercase();
    let pattern = string_form(pattern).to_lowercase();
    // Whole-string match, not a search.
    let re = Regex::new(&format!("^(?:{pattern})$"))
        .map_err(|source| Error::InvalidPattern { pattern, source })?;
    Ok(Value::Boolean(re.is_match(&value)))
}

/// Evaluates `["true?", condition]`, then expands to `["identity", branch]`
/// for the chosen branch. The other branch is dropped unevaluated.
fn if_else<C>(evaluator: &mut Evaluator<C>, args: &[Value]) -> Result<Vec<Value>> {
    let condition = arg_or_null(args, 0);
    let test = Value::List(vec![Value::from("true?"), condition]);
    let branch = if is_true(&evaluator.evaluate(&test)?) {
        arg_or_null(args, 1)
    } else {
        arg_or_null(args, 2)
    };
    Ok(vec![Value::from("identity"), branch])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(f: fn(&mut (), &[Value]) -> Result<Value>, args: Vec<Value>) -> Result<Value> {
        f(&mut (), &args)
    }

    #[test]
    fn test_always_ignores_arguments() {
        assert_eq!(call(always, vec![]).unwrap(), Value::Boolean(true));
        assert_eq!(
            call(always, vec![Value::Null, Value::from(false)]).unwrap(),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_identity_returns_first_argument() {
        assert_eq!(call(identity, vec![]).unwrap(), Value::Null);
        assert_eq!(
            call(identity, vec![Value::from("first"), Value::from("second")]).unwrap(),
            Value::from("first")
        );
    }

    #[test]
    fn test_is_true_coercions() {
        assert!(is_true(&Value::from("TRUE")));
        assert!(is_true(&Value::from("trUe")));
        assert!(is_true(&Value::from(true)));
        assert!(!is_true(&Value::from("False")));
        assert!(!is_true(&Value::from(" true")));
        assert!(!is_true(&Value::Null));
        assert!(!is_true(&Value::from(1)));
    }

    #[test]
    fn test_is_true_without_arguments() {
        assert_eq!(call(is_true_fn, vec![]).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn test_matches_is_anchored() {
        let args = vec![Value::from("abcd"), Value::from("abc")];
        assert_eq!(call(matches_fn, args).unwrap(), Value::Boolean(false));
        let args = vec![Value::from("xabc"), Value::from("a.*c")];
        assert_eq!(call(matches_fn, args).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn test_matches_null_is_empty_string() {
        let args = vec![Value::Null, Value::from("")];
        assert_eq!(call(matches_fn, args).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_matches_alternation_stays_anchored() {
        let args = vec![Value::from("ab"), Value::from("a|b")];
        assert_eq!(call(matches_fn, args).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn test_matches_invalid_pattern() {
        let args = vec![Value::from("abc"), Value::from("(")];
        assert!(matches!(
            call(matches_fn, args),
            Err(Error::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_matches_arity() {
        let result = call(matches_fn, vec![Value::from("abc")]);
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
        let result = call(
            matches_fn,
            vec![Value::from("a"), Value::from("a"), Value::from("a")],
        );
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    }
}

//! Argument helpers shared by the built-in operators.

use crate::value::Value;

/// The argument at `index`, or null when the call supplied fewer arguments.
pub(crate) fn arg_or_null(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Null)
}

/// String form of a value, with null coerced to the empty string.
pub(crate) fn string_form(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string_value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_or_null_past_end() {
        let args = vec![Value::from("a")];
        assert_eq!(arg_or_null(&args, 0), Value::from("a"));
        assert_eq!(arg_or_null(&args, 1), Value::Null);
        assert_eq!(arg_or_null(&[], 0), Value::Null);
    }

    #[test]
    fn test_string_form_empty_for_null() {
        assert_eq!(string_form(&Value::Null), "");
        assert_eq!(string_form(&Value::from(false)), "false");
    }
}

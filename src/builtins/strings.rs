//! String manipulation: len, upper, lower, trim, split, contains, replace,
//! substring
//!
//! Indices are character positions, not byte offsets. `len` also measures
//! arrays so scripts have a single length function.

use super::{define_native, expect_arity, number_arg, string_arg};
use crate::env::Environment;
use crate::value::Value;
use std::rc::Rc;

pub fn register(env: &Rc<Environment>) {
    define_native(env, "len", |args, _env| {
        expect_arity("len", args, 1)?;
        match &args[0] {
            Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
            Value::Array(items) => Ok(Value::Number(items.borrow().len() as f64)),
            other => Err(format!(
                "len: expected string or array, got {}",
                other.type_name()
            )),
        }
    });

    define_native(env, "upper", |args, _env| {
        expect_arity("upper", args, 1)?;
        Ok(Value::Str(string_arg("upper", args, 0)?.to_uppercase()))
    });

    define_native(env, "lower", |args, _env| {
        expect_arity("lower", args, 1)?;
        Ok(Value::Str(string_arg("lower", args, 0)?.to_lowercase()))
    });

    define_native(env, "trim", |args, _env| {
        expect_arity("trim", args, 1)?;
        Ok(Value::Str(string_arg("trim", args, 0)?.trim().to_string()))
    });

    define_native(env, "split", |args, _env| {
        expect_arity("split", args, 2)?;
        let text = string_arg("split", args, 0)?;
        let separator = string_arg("split", args, 1)?;
        let parts: Vec<Value> = if separator.is_empty() {
            text.chars().map(|c| Value::Str(c.to_string())).collect()
        } else {
            text.split(separator)
                .map(|part| Value::Str(part.to_string()))
                .collect()
        };
        Ok(Value::array(parts))
    });

    define_native(env, "contains", |args, _env| {
        expect_arity("contains", args, 2)?;
        let text = string_arg("contains", args, 0)?;
        let needle = string_arg("contains", args, 1)?;
        Ok(Value::Bool(text.contains(needle)))
    });

    define_native(env, "replace", |args, _env| {
        expect_arity("replace", args, 3)?;
        let text = string_arg("replace", args, 0)?;
        let from = string_arg("replace", args, 1)?;
        let to = string_arg("replace", args, 2)?;
        Ok(Value::Str(text.replace(from, to)))
    });

    // substring(s, start, end): character range [start, end), clamped.
    define_native(env, "substring", |args, _env| {
        expect_arity("substring", args, 3)?;
        let text = string_arg("substring", args, 0)?;
        let start = number_arg("substring", args, 1)?.trunc().max(0.0) as usize;
        let end = number_arg("substring", args, 2)?.trunc().max(0.0) as usize;
        let taken: String = text
            .chars()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect();
        Ok(Value::Str(taken))
    });
}

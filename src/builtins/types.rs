//! Type inspection and conversion: type, to_string, to_int, to_float
//!
//! `type` reports "int" or "float" for numbers based on integer
//! representability; the runtime itself holds a single double domain.

use super::{define_native, expect_arity};
use crate::env::Environment;
use crate::value::Value;
use std::rc::Rc;

pub fn register(env: &Rc<Environment>) {
    define_native(env, "type", |args, _env| {
        expect_arity("type", args, 1)?;
        Ok(Value::Str(args[0].type_name().to_string()))
    });

    define_native(env, "to_string", |args, _env| {
        expect_arity("to_string", args, 1)?;
        Ok(Value::Str(args[0].to_string()))
    });

    define_native(env, "to_int", |args, _env| {
        expect_arity("to_int", args, 1)?;
        match &args[0] {
            Value::Number(n) => Ok(Value::Number(n.trunc())),
            Value::Str(s) => s
                .trim()
                .parse::<f64>()
                .map(|n| Value::Number(n.trunc()))
                .map_err(|_| format!("to_int: cannot convert '{}' to a number", s)),
            Value::Bool(b) => Ok(Value::Number(if *b { 1.0 } else { 0.0 })),
            other => Err(format!("to_int: cannot convert {}", other.type_name())),
        }
    });

    define_native(env, "to_float", |args, _env| {
        expect_arity("to_float", args, 1)?;
        match &args[0] {
            Value::Number(n) => Ok(Value::Number(*n)),
            Value::Str(s) => s
                .trim()
                .parse::<f64>()
                .map(Value::Number)
                .map_err(|_| format!("to_float: cannot convert '{}' to a number", s)),
            other => Err(format!("to_float: cannot convert {}", other.type_name())),
        }
    });
}

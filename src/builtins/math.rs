//! Numeric operations: abs, floor, ceil, round, sqrt, pow, min, max, random
//!
//! All operate in the single IEEE-754 double domain; `random` is backed by
//! the process RNG and yields a uniform value in [0, 1).

use super::{define_native, expect_arity, number_arg};
use crate::env::Environment;
use crate::value::Value;
use std::rc::Rc;

fn unary(env: &Rc<Environment>, name: &'static str, op: fn(f64) -> f64) {
    define_native(env, name, move |args, _env| {
        expect_arity(name, args, 1)?;
        Ok(Value::Number(op(number_arg(name, args, 0)?)))
    });
}

fn binary(env: &Rc<Environment>, name: &'static str, op: fn(f64, f64) -> f64) {
    define_native(env, name, move |args, _env| {
        expect_arity(name, args, 2)?;
        let a = number_arg(name, args, 0)?;
        let b = number_arg(name, args, 1)?;
        Ok(Value::Number(op(a, b)))
    });
}

pub fn register(env: &Rc<Environment>) {
    unary(env, "abs", f64::abs);
    unary(env, "floor", f64::floor);
    unary(env, "ceil", f64::ceil);
    unary(env, "round", f64::round);
    unary(env, "sqrt", f64::sqrt);
    binary(env, "pow", f64::powf);
    binary(env, "min", f64::min);
    binary(env, "max", f64::max);

    define_native(env, "random", |args, _env| {
        expect_arity("random", args, 0)?;
        Ok(Value::Number(rand::random::<f64>()))
    });
}

//! Array operations: range, push, pop, join, sort, reverse
//!
//! `push`, `pop`, `sort`, and `reverse` mutate the array in place, so every
//! binding aliasing the same array observes the change.

use super::{array_arg, define_native, expect_arity, number_arg, string_arg};
use crate::env::Environment;
use crate::value::Value;
use std::rc::Rc;

pub fn register(env: &Rc<Environment>) {
    // range(n) -> [0, 1, .., n-1]; range(a, b) -> [a, .., b-1]
    define_native(env, "range", |args, _env| {
        let (start, end) = match args.len() {
            1 => (0.0, number_arg("range", args, 0)?),
            2 => (number_arg("range", args, 0)?, number_arg("range", args, 1)?),
            n => return Err(format!("range: expected 1-2 arguments, got {}", n)),
        };
        let mut items = Vec::new();
        let mut current = start.trunc();
        let end = end.trunc();
        while current < end {
            items.push(Value::Number(current));
            current += 1.0;
        }
        Ok(Value::array(items))
    });

    define_native(env, "push", |args, _env| {
        expect_arity("push", args, 2)?;
        let items = array_arg("push", args, 0)?;
        items.borrow_mut().push(args[1].clone());
        Ok(Value::Array(items))
    });

    define_native(env, "pop", |args, _env| {
        expect_arity("pop", args, 1)?;
        let items = array_arg("pop", args, 0)?;
        let popped = items.borrow_mut().pop();
        popped.ok_or_else(|| "pop: array is empty".to_string())
    });

    define_native(env, "join", |args, _env| {
        expect_arity("join", args, 2)?;
        let items = array_arg("join", args, 0)?;
        let separator = string_arg("join", args, 1)?;
        let joined = items
            .borrow()
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(separator);
        Ok(Value::Str(joined))
    });

    // Sorts all-number or all-string arrays in place and returns the array.
    define_native(env, "sort", |args, _env| {
        expect_arity("sort", args, 1)?;
        let items = array_arg("sort", args, 0)?;
        let mut sorted = items.borrow().clone();
        let all_numbers = sorted.iter().all(|v| matches!(v, Value::Number(_)));
        let all_strings = sorted.iter().all(|v| matches!(v, Value::Str(_)));
        if all_numbers {
            sorted.sort_by(|a, b| {
                let (Value::Number(a), Value::Number(b)) = (a, b) else {
                    unreachable!()
                };
                a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
            });
        } else if all_strings {
            sorted.sort_by(|a, b| {
                let (Value::Str(a), Value::Str(b)) = (a, b) else {
                    unreachable!()
                };
                a.cmp(b)
            });
        } else {
            return Err("sort: array must hold only numbers or only strings".to_string());
        }
        *items.borrow_mut() = sorted;
        Ok(Value::Array(items))
    });

    define_native(env, "reverse", |args, _env| {
        expect_arity("reverse", args, 1)?;
        let items = array_arg("reverse", args, 0)?;
        items.borrow_mut().reverse();
        Ok(Value::Array(items))
    });
}

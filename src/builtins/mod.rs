//! # Built-in Functions Module
//!
//! The standard library exposed to Lux programs, organized into categories.
//! Each category is a sub-module with its own `register` function that
//! installs its built-ins into an environment as constant bindings.
//!
//! ## Categories
//!
//! - **[console]**: print, println - output buffer operations
//! - **[math]**: abs, floor, ceil, round, sqrt, pow, min, max, random
//! - **[strings]**: len, upper, lower, trim, split, contains, replace, substring
//! - **[arrays]**: range, push, pop, join, sort, reverse
//! - **[types]**: type, to_string, to_int, to_float
//! - **[fs]**: read_file, write_file, file_exists
//! - **[net]**: http_get
//! - **[os]**: sleep, clock_ms
//! - **[photon]**: photon_energy, measure_qubit, quantum_random
//!
//! Built-ins follow the dispatch contract `(args, env) → value` and raise
//! plain-string errors; the evaluator enriches those with the call site and
//! frame stack, which is also what a `try`/`catch` observes.

use crate::env::Environment;
use crate::value::{NativeFn, Value};
use std::cell::RefCell;
use std::rc::Rc;

pub mod arrays;
pub mod console;
pub mod fs;
pub mod math;
pub mod net;
pub mod os;
pub mod photon;
pub mod strings;
pub mod types;

/// Registers the whole standard library. The output buffer is shared with
/// the evaluator; only the console category writes to it.
pub fn register_builtins(env: &Rc<Environment>, output: &Rc<RefCell<Vec<String>>>) {
    console::register(env, output);
    math::register(env);
    strings::register(env);
    arrays::register(env);
    types::register(env);
    fs::register(env);
    net::register(env);
    os::register(env);
    photon::register(env);
}

/// Installs one built-in as a constant binding.
pub(crate) fn define_native<F>(env: &Rc<Environment>, name: &str, func: F)
where
    F: Fn(&[Value], &Rc<Environment>) -> Result<Value, String> + 'static,
{
    env.define(
        name,
        Value::Builtin {
            name: name.to_string(),
            func: Rc::new(func) as NativeFn,
        },
        true,
    );
}

// ===== Argument helpers shared by the category modules =====

pub(crate) fn expect_arity(name: &str, args: &[Value], count: usize) -> Result<(), String> {
    if args.len() != count {
        return Err(format!(
            "{}: expected {} argument{}, got {}",
            name,
            count,
            if count == 1 { "" } else { "s" },
            args.len()
        ));
    }
    Ok(())
}

pub(crate) fn number_arg(name: &str, args: &[Value], position: usize) -> Result<f64, String> {
    match args.get(position) {
        Some(Value::Number(n)) => Ok(*n),
        Some(other) => Err(format!(
            "{}: expected number, got {} at argument {}",
            name,
            other.type_name(),
            position + 1
        )),
        None => Err(format!("{}: missing argument {}", name, position + 1)),
    }
}

pub(crate) fn string_arg<'a>(
    name: &str,
    args: &'a [Value],
    position: usize,
) -> Result<&'a str, String> {
    match args.get(position) {
        Some(Value::Str(s)) => Ok(s),
        Some(other) => Err(format!(
            "{}: expected string, got {} at argument {}",
            name,
            other.type_name(),
            position + 1
        )),
        None => Err(format!("{}: missing argument {}", name, position + 1)),
    }
}

pub(crate) fn array_arg(
    name: &str,
    args: &[Value],
    position: usize,
) -> Result<Rc<RefCell<Vec<Value>>>, String> {
    match args.get(position) {
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(other) => Err(format!(
            "{}: expected array, got {} at argument {}",
            name,
            other.type_name(),
            position + 1
        )),
        None => Err(format!("{}: missing argument {}", name, position + 1)),
    }
}

//! Filesystem operations: read_file, write_file, file_exists
//!
//! Thin synchronous wrappers over the host filesystem. I/O failures surface
//! as catchable string errors.

use super::{define_native, expect_arity, string_arg};
use crate::env::Environment;
use crate::value::Value;
use std::rc::Rc;

pub fn register(env: &Rc<Environment>) {
    define_native(env, "read_file", |args, _env| {
        expect_arity("read_file", args, 1)?;
        let path = string_arg("read_file", args, 0)?;
        std::fs::read_to_string(path)
            .map(Value::Str)
            .map_err(|err| format!("read_file: cannot read '{}': {}", path, err))
    });

    define_native(env, "write_file", |args, _env| {
        expect_arity("write_file", args, 2)?;
        let path = string_arg("write_file", args, 0)?;
        let contents = args[1].to_string();
        std::fs::write(path, contents)
            .map(|_| Value::Nil)
            .map_err(|err| format!("write_file: cannot write '{}': {}", path, err))
    });

    define_native(env, "file_exists", |args, _env| {
        expect_arity("file_exists", args, 1)?;
        let path = string_arg("file_exists", args, 0)?;
        Ok(Value::Bool(std::path::Path::new(path).exists()))
    });
}

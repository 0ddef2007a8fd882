//! Network operations: http_get
//!
//! Synchronous HTTP. Contract: `(string URL) -> string body`. Failures are
//! catchable string errors.

use super::{define_native, expect_arity, string_arg};
use crate::env::Environment;
use crate::value::Value;
use std::rc::Rc;

pub fn register(env: &Rc<Environment>) {
    define_native(env, "http_get", |args, _env| {
        expect_arity("http_get", args, 1)?;
        let url = string_arg("http_get", args, 0)?;
        let response = ureq::get(url)
            .call()
            .map_err(|err| format!("http_get: request to '{}' failed: {}", url, err))?;
        response
            .into_string()
            .map(Value::Str)
            .map_err(|err| format!("http_get: cannot read response body: {}", err))
    });
}

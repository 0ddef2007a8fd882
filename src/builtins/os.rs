//! OS operations: sleep, clock_ms
//!
//! `sleep` blocks the single evaluation thread. Contract:
//! `(number ms) -> nil`.

use super::{define_native, expect_arity, number_arg};
use crate::env::Environment;
use crate::value::Value;
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub fn register(env: &Rc<Environment>) {
    define_native(env, "sleep", |args, _env| {
        expect_arity("sleep", args, 1)?;
        let ms = number_arg("sleep", args, 0)?;
        if ms < 0.0 {
            return Err("sleep: duration must be non-negative".to_string());
        }
        std::thread::sleep(Duration::from_millis(ms as u64));
        Ok(Value::Nil)
    });

    define_native(env, "clock_ms", |args, _env| {
        expect_arity("clock_ms", args, 0)?;
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|err| format!("clock_ms: {}", err))?;
        Ok(Value::Number(elapsed.as_millis() as f64))
    });
}

//! Console output: print, println
//!
//! Both append the universal string form of their arguments to the shared
//! output buffer; the host decides how buffer entries reach a terminal.
//! Both return nil.

use super::define_native;
use crate::env::Environment;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

fn render(args: &[Value]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Register the console built-ins against the shared output buffer.
pub fn register(env: &Rc<Environment>, output: &Rc<RefCell<Vec<String>>>) {
    let buffer = output.clone();
    define_native(env, "print", move |args, _env| {
        buffer.borrow_mut().push(render(args));
        Ok(Value::Nil)
    });

    let buffer = output.clone();
    define_native(env, "println", move |args, _env| {
        buffer.borrow_mut().push(render(args));
        Ok(Value::Nil)
    });
}

// ABOUTME: Tree-walking evaluator executing Lux programs

use crate::ast::{BinaryOp, Expr, FuncDecl, Stmt, UnaryOp};
use crate::config::{MAX_CALL_DEPTH, STEP_LIMIT};
use crate::env::{Environment, SetError};
use crate::error::{CallFrame, LuxError, RuntimeError};
use crate::value::{Closure, Value};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

/// Host-provided import hook: `(path, importing file)`. Installed by the
/// module loader; evaluating `import` without one is an error.
pub type ImportFn = Rc<dyn Fn(&str, &str) -> Result<(), LuxError>>;

/// Outcome of one block or statement: normal completion or a non-local
/// control-flow signal. Signals are distinct from values and from errors;
/// loops absorb break/continue, calls absorb return, and anything not
/// absorbed bubbles to the enclosing construct.
#[derive(Debug)]
pub enum Flow {
    Normal,
    Return(Value),
    Break,
    Continue,
}

/// What an embedding host receives back from one evaluation.
pub struct EvalOutcome {
    pub output: Vec<String>,
    pub steps: u64,
    pub error: Option<String>,
    pub env: Rc<Environment>,
}

pub struct Evaluator {
    file: String,
    output: Rc<RefCell<Vec<String>>>,
    steps: u64,
    stack: Vec<CallFrame>,
    import_fn: Option<ImportFn>,
}

/// Embedding entry point: lex, parse, and evaluate a source string. When no
/// environment is supplied, a fresh global environment with the full
/// built-in registry is created.
pub fn interpret(
    source: &str,
    file: &str,
    env: Option<Rc<Environment>>,
    import_fn: Option<ImportFn>,
) -> EvalOutcome {
    let output = Rc::new(RefCell::new(Vec::new()));
    let env = env.unwrap_or_else(|| {
        let env = Environment::new();
        crate::builtins::register_builtins(&env, &output);
        env
    });

    let program = crate::lexer::Lexer::new(source, file)
        .tokenize()
        .and_then(|tokens| crate::parser::parse(tokens, file));
    let program = match program {
        Ok(program) => program,
        Err(err) => {
            return EvalOutcome {
                output: output.borrow().clone(),
                steps: 0,
                error: Some(err.to_string()),
                env,
            };
        }
    };

    let mut evaluator = Evaluator::new(file, output.clone(), import_fn);
    let error = evaluator.run(&program, &env).err().map(|e| e.to_string());
    let output = output.borrow().clone();
    EvalOutcome {
        output,
        steps: evaluator.steps(),
        error,
        env,
    }
}

impl Evaluator {
    pub fn new(
        file: impl Into<String>,
        output: Rc<RefCell<Vec<String>>>,
        import_fn: Option<ImportFn>,
    ) -> Self {
        Evaluator {
            file: file.into(),
            output,
            steps: 0,
            stack: Vec::new(),
            import_fn,
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn output(&self) -> Rc<RefCell<Vec<String>>> {
        self.output.clone()
    }

    /// Executes a program against the given environment. A signal reaching
    /// the top level ends execution.
    pub fn run(&mut self, program: &[Stmt], env: &Rc<Environment>) -> Result<(), RuntimeError> {
        debug!("evaluating {} ({} statements)", self.file, program.len());
        for stmt in program {
            match self.eval_stmt(stmt, env)? {
                Flow::Normal => {}
                _ => break,
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    fn step(&mut self, line: u32, column: u32) -> Result<(), RuntimeError> {
        self.steps += 1;
        if self.steps > STEP_LIMIT {
            return Err(self.error_at(line, column, "Execution limit exceeded".to_string()));
        }
        Ok(())
    }

    /// Builds a positioned runtime error carrying a snapshot of the current
    /// call-frame stack.
    fn error_at(&self, line: u32, column: u32, message: String) -> RuntimeError {
        RuntimeError {
            message,
            file: self.file.clone(),
            line,
            column,
            stack: self.stack.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn exec_block(&mut self, body: &[Stmt], env: &Rc<Environment>) -> Result<Flow, RuntimeError> {
        for stmt in body {
            match self.eval_stmt(stmt, env)? {
                Flow::Normal => {}
                signal => return Ok(signal),
            }
        }
        Ok(Flow::Normal)
    }

    fn eval_stmt(&mut self, stmt: &Stmt, env: &Rc<Environment>) -> Result<Flow, RuntimeError> {
        match stmt {
            Stmt::Let {
                name, init, line, column, ..
            } => {
                self.step(*line, *column)?;
                let value = match init {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::Nil,
                };
                env.define(name.clone(), value, false);
                Ok(Flow::Normal)
            }

            Stmt::Const {
                name, init, line, column, ..
            } => {
                self.step(*line, *column)?;
                let value = self.eval_expr(init, env)?;
                env.define(name.clone(), value, true);
                Ok(Flow::Normal)
            }

            Stmt::Assign {
                name, value, line, column,
            } => {
                self.step(*line, *column)?;
                let value = self.eval_expr(value, env)?;
                match env.set(name, value) {
                    Ok(()) => Ok(Flow::Normal),
                    Err(SetError::Constant) => Err(self.error_at(
                        *line,
                        *column,
                        format!("Cannot reassign constant '{}'", name),
                    )),
                    Err(SetError::Unbound) => Err(self.error_at(
                        *line,
                        *column,
                        format!("Undefined variable '{}'", name),
                    )),
                }
            }

            Stmt::IndexAssign {
                name, index, value, line, column,
            } => {
                self.step(*line, *column)?;
                let target = env.get(name).ok_or_else(|| {
                    self.error_at(*line, *column, format!("Undefined variable '{}'", name))
                })?;
                let Value::Array(items) = target else {
                    return Err(self.error_at(
                        *line,
                        *column,
                        format!("'{}' is not an array", name),
                    ));
                };
                let index = self.eval_expr(index, env)?;
                let Value::Number(n) = index else {
                    return Err(self.error_at(
                        *line,
                        *column,
                        format!("Array index must be a number, got {}", index.type_name()),
                    ));
                };
                let value = self.eval_expr(value, env)?;

                let slot = n.trunc();
                let len = items.borrow().len();
                if slot < 0.0 || slot as usize >= len {
                    return Err(self.error_at(
                        *line,
                        *column,
                        format!("Index {} out of bounds for array of length {}", slot, len),
                    ));
                }
                items.borrow_mut()[slot as usize] = value;
                Ok(Flow::Normal)
            }

            Stmt::If {
                branches, else_body, line, column,
            } => {
                self.step(*line, *column)?;
                for (condition, body) in branches {
                    if self.eval_expr(condition, env)?.is_truthy() {
                        let scope = Environment::with_parent(env.clone());
                        return self.exec_block(body, &scope);
                    }
                }
                if let Some(body) = else_body {
                    let scope = Environment::with_parent(env.clone());
                    return self.exec_block(body, &scope);
                }
                Ok(Flow::Normal)
            }

            Stmt::While {
                condition, body, line, column,
            } => {
                self.step(*line, *column)?;
                loop {
                    self.step(*line, *column)?;
                    if !self.eval_expr(condition, env)?.is_truthy() {
                        break;
                    }
                    let scope = Environment::with_parent(env.clone());
                    match self.exec_block(body, &scope)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => break,
                        ret @ Flow::Return(_) => return Ok(ret),
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::For {
                variable, iterable, body, line, column,
            } => {
                self.step(*line, *column)?;
                let iterable = self.eval_expr(iterable, env)?;
                let Value::Array(items) = iterable else {
                    return Err(self.error_at(
                        *line,
                        *column,
                        format!("Cannot iterate over {}", iterable.type_name()),
                    ));
                };
                // Iterate a snapshot: rebinding the loop variable never
                // touches the source array.
                let elements = items.borrow().clone();
                for element in elements {
                    self.step(*line, *column)?;
                    let scope = Environment::with_parent(env.clone());
                    scope.define(variable.clone(), element, false);
                    match self.exec_block(body, &scope)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => break,
                        ret @ Flow::Return(_) => return Ok(ret),
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::FuncDecl(decl) => {
                self.step(decl.line, decl.column)?;
                let closure = Value::Function(Rc::new(Closure {
                    decl: decl.clone(),
                    env: env.clone(),
                }));
                env.define(decl.name.clone(), closure, true);
                Ok(Flow::Normal)
            }

            Stmt::Return { value, line, column } => {
                self.step(*line, *column)?;
                let value = match value {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(value))
            }

            Stmt::Break { line, column } => {
                self.step(*line, *column)?;
                Ok(Flow::Break)
            }

            Stmt::Continue { line, column } => {
                self.step(*line, *column)?;
                Ok(Flow::Continue)
            }

            Stmt::Import { path, line, column } => {
                self.step(*line, *column)?;
                let Some(import_fn) = self.import_fn.clone() else {
                    return Err(self.error_at(
                        *line,
                        *column,
                        "Imports are not available in this context".to_string(),
                    ));
                };
                match import_fn(path, &self.file) {
                    Ok(()) => Ok(Flow::Normal),
                    // Positioned runtime errors from inside the module keep
                    // their own attribution; everything else is charged to
                    // the import statement.
                    Err(LuxError::Runtime(err)) if err.is_positioned() => Err(err),
                    Err(LuxError::Runtime(err)) => {
                        Err(self.error_at(*line, *column, err.message))
                    }
                    Err(other) => Err(self.error_at(*line, *column, other.to_string())),
                }
            }

            Stmt::TryCatch {
                body, variable, handler, line, column,
            } => {
                self.step(*line, *column)?;
                let scope = Environment::with_parent(env.clone());
                match self.exec_block(body, &scope) {
                    // Signals pass through a try untouched.
                    Ok(flow) => Ok(flow),
                    Err(err) => {
                        let scope = Environment::with_parent(env.clone());
                        scope.define(variable.clone(), Value::Str(err.message), false);
                        self.exec_block(handler, &scope)
                    }
                }
            }

            Stmt::Expression(expr) => {
                self.eval_expr(expr, env)?;
                Ok(Flow::Normal)
            }
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn eval_expr(&mut self, expr: &Expr, env: &Rc<Environment>) -> Result<Value, RuntimeError> {
        let (line, column) = expr.position();
        self.step(line, column)?;

        match expr {
            Expr::Number { value, .. } => Ok(Value::Number(*value)),
            Expr::Str { value, .. } => Ok(Value::Str(value.clone())),
            Expr::Bool { value, .. } => Ok(Value::Bool(*value)),
            Expr::Nil { .. } => Ok(Value::Nil),

            Expr::Ident { name, .. } => env.get(name).ok_or_else(|| {
                self.error_at(line, column, format!("Undefined variable '{}'", name))
            }),

            Expr::Array { elements, .. } => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.eval_expr(element, env)?);
                }
                Ok(Value::array(items))
            }

            Expr::Unary { op, operand, .. } => {
                let value = self.eval_expr(operand, env)?;
                match op {
                    UnaryOp::Neg => match value {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        other => Err(self.error_at(
                            line,
                            column,
                            format!("Operand of '-' must be a number, got {}", other.type_name()),
                        )),
                    },
                    UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                }
            }

            Expr::Binary { op, lhs, rhs, .. } => self.eval_binary(*op, lhs, rhs, env, line, column),

            Expr::Index { target, index, .. } => {
                let target = self.eval_expr(target, env)?;
                let index = self.eval_expr(index, env)?;
                let Value::Number(n) = index else {
                    return Err(self.error_at(
                        line,
                        column,
                        format!("Index must be a number, got {}", index.type_name()),
                    ));
                };
                let slot = n.trunc();
                match target {
                    Value::Array(items) => {
                        let items = items.borrow();
                        if slot < 0.0 || slot as usize >= items.len() {
                            return Err(self.error_at(
                                line,
                                column,
                                format!(
                                    "Index {} out of bounds for array of length {}",
                                    slot,
                                    items.len()
                                ),
                            ));
                        }
                        Ok(items[slot as usize].clone())
                    }
                    Value::Str(s) => {
                        let ch = if slot < 0.0 {
                            None
                        } else {
                            s.chars().nth(slot as usize)
                        };
                        match ch {
                            Some(ch) => Ok(Value::Str(ch.to_string())),
                            None => Err(self.error_at(
                                line,
                                column,
                                format!(
                                    "Index {} out of bounds for string of length {}",
                                    slot,
                                    s.chars().count()
                                ),
                            )),
                        }
                    }
                    other => Err(self.error_at(
                        line,
                        column,
                        format!("Cannot index into {}", other.type_name()),
                    )),
                }
            }

            Expr::Call { name, args, .. } => self.eval_call(name, args, env, line, column),
        }
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        env: &Rc<Environment>,
        line: u32,
        column: u32,
    ) -> Result<Value, RuntimeError> {
        // Short-circuit forms return the operand that decided the result.
        match op {
            BinaryOp::And => {
                let left = self.eval_expr(lhs, env)?;
                if !left.is_truthy() {
                    return Ok(left);
                }
                return self.eval_expr(rhs, env);
            }
            BinaryOp::Or => {
                let left = self.eval_expr(lhs, env)?;
                if left.is_truthy() {
                    return Ok(left);
                }
                return self.eval_expr(rhs, env);
            }
            _ => {}
        }

        let left = self.eval_expr(lhs, env)?;
        let right = self.eval_expr(rhs, env)?;

        match op {
            BinaryOp::Eq => Ok(Value::Bool(left == right)),
            BinaryOp::NotEq => Ok(Value::Bool(left != right)),

            // '+' concatenates when either operand is a string, coercing the
            // other via universal stringification.
            BinaryOp::Add => match (&left, &right) {
                (Value::Str(_), _) | (_, Value::Str(_)) => {
                    Ok(Value::Str(format!("{}{}", left, right)))
                }
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                _ => Err(self.binary_type_error(op, &left, &right, line, column)),
            },

            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod | BinaryOp::Pow => {
                let (Value::Number(a), Value::Number(b)) = (&left, &right) else {
                    return Err(self.binary_type_error(op, &left, &right, line, column));
                };
                match op {
                    BinaryOp::Sub => Ok(Value::Number(a - b)),
                    BinaryOp::Mul => Ok(Value::Number(a * b)),
                    BinaryOp::Div => {
                        if *b == 0.0 {
                            Err(self.error_at(line, column, "Division by zero".to_string()))
                        } else {
                            Ok(Value::Number(a / b))
                        }
                    }
                    BinaryOp::Mod => {
                        if *b == 0.0 {
                            Err(self.error_at(line, column, "Modulo by zero".to_string()))
                        } else {
                            Ok(Value::Number(a % b))
                        }
                    }
                    BinaryOp::Pow => Ok(Value::Number(a.powf(*b))),
                    _ => unreachable!(),
                }
            }

            BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEq | BinaryOp::GreaterEq => {
                match (&left, &right) {
                    (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(match op {
                        BinaryOp::Less => a < b,
                        BinaryOp::Greater => a > b,
                        BinaryOp::LessEq => a <= b,
                        BinaryOp::GreaterEq => a >= b,
                        _ => unreachable!(),
                    })),
                    (Value::Str(a), Value::Str(b)) => Ok(Value::Bool(match op {
                        BinaryOp::Less => a < b,
                        BinaryOp::Greater => a > b,
                        BinaryOp::LessEq => a <= b,
                        BinaryOp::GreaterEq => a >= b,
                        _ => unreachable!(),
                    })),
                    _ => Err(self.binary_type_error(op, &left, &right, line, column)),
                }
            }

            BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
        }
    }

    fn binary_type_error(
        &self,
        op: BinaryOp,
        left: &Value,
        right: &Value,
        line: u32,
        column: u32,
    ) -> RuntimeError {
        self.error_at(
            line,
            column,
            format!(
                "Operator '{}' cannot be applied to {} and {}",
                op.symbol(),
                left.type_name(),
                right.type_name()
            ),
        )
    }

    fn eval_call(
        &mut self,
        name: &str,
        args: &[Expr],
        env: &Rc<Environment>,
        line: u32,
        column: u32,
    ) -> Result<Value, RuntimeError> {
        let callee = env.get(name).ok_or_else(|| {
            self.error_at(line, column, format!("Undefined function '{}'", name))
        })?;

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg, env)?);
        }

        match callee {
            Value::Builtin { func, .. } => func(&values, env)
                .map_err(|message| self.error_at(line, column, message)),
            Value::Function(closure) => self.call_function(&closure, values, line, column),
            other => Err(self.error_at(
                line,
                column,
                format!("'{}' is not a function (got {})", name, other.type_name()),
            )),
        }
    }

    fn call_function(
        &mut self,
        closure: &Closure,
        args: Vec<Value>,
        line: u32,
        column: u32,
    ) -> Result<Value, RuntimeError> {
        if self.stack.len() >= MAX_CALL_DEPTH {
            return Err(self.error_at(line, column, "Maximum call depth exceeded".to_string()));
        }

        let decl: &Rc<FuncDecl> = &closure.decl;
        // Parameters bind positionally in a child of the environment captured
        // at declaration time; missing arguments default to nil and excess
        // arguments are ignored.
        let scope = Environment::with_parent(closure.env.clone());
        let mut args = args.into_iter();
        for param in &decl.params {
            let value = args.next().unwrap_or(Value::Nil);
            scope.define(param.name.clone(), value, false);
        }

        self.stack.push(CallFrame {
            name: decl.name.clone(),
            file: self.file.clone(),
            line,
            column,
        });
        let result = self.exec_block(&decl.body, &scope);
        self.stack.pop();

        match result? {
            Flow::Return(value) => Ok(value),
            _ => Ok(Value::Nil),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> EvalOutcome {
        interpret(source, "test.lux", None, None)
    }

    fn run_ok(source: &str) -> Vec<String> {
        let outcome = run(source);
        assert_eq!(outcome.error, None, "unexpected error: {:?}", outcome.error);
        outcome.output
    }

    fn run_err(source: &str) -> String {
        run(source).error.expect("expected an error")
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(run_ok("println(to_string(1 + 2 * 3))"), vec!["7"]);
        assert_eq!(run_ok("println(to_string(2 ^ 3 ^ 2))"), vec!["512"]);
        assert_eq!(run_ok("println(to_string((1 + 2) * 3))"), vec!["9"]);
    }

    #[test]
    fn test_logical_short_circuit_returns_deciding_operand() {
        assert_eq!(run_ok("println(to_string(true and false or true))"), vec!["true"]);
        assert_eq!(run_ok("println(to_string(0 or 5))"), vec!["5"]);
        assert_eq!(run_ok("println(\"\" and 5)"), vec![""]);
        assert_eq!(run_ok("println(to_string(1 and 2))"), vec!["2"]);
    }

    #[test]
    fn test_short_circuit_skips_right_operand() {
        let source = r#"
let calls = []
func bump()
    push(calls, 1)
    return true
end
let a = false and bump()
let b = true or bump()
println(to_string(len(calls)))
"#;
        assert_eq!(run_ok(source), vec!["0"]);
    }

    #[test]
    fn test_string_concatenation_coerces_either_side() {
        assert_eq!(run_ok("println(\"n = \" + 42)"), vec!["n = 42"]);
        assert_eq!(run_ok("println(1 + \"!\")"), vec!["1!"]);
        assert_eq!(run_ok("println(\"v: \" + [1, 2])"), vec!["v: [1, 2]"]);
        let err = run_err("let x = 1 + nil");
        assert!(err.contains("'+'"), "error was: {}", err);
    }

    #[test]
    fn test_division_by_zero() {
        let err = run_err("let x = 1 / 0");
        assert!(err.contains("Division by zero"), "error was: {}", err);
        let err = run_err("let x = 1 % 0");
        assert!(err.contains("Modulo by zero"), "error was: {}", err);
    }

    #[test]
    fn test_comparison_of_strings_is_lexicographic() {
        assert_eq!(run_ok("println(to_string(\"abc\" < \"abd\"))"), vec!["true"]);
        let err = run_err("let x = \"a\" < 1");
        assert!(err.contains("'<'"), "error was: {}", err);
    }

    #[test]
    fn test_equality_across_types() {
        assert_eq!(run_ok("println(to_string(1 == 1))"), vec!["true"]);
        assert_eq!(run_ok("println(to_string(1 == \"1\"))"), vec!["false"]);
        assert_eq!(run_ok("println(to_string(nil == nil))"), vec!["true"]);
        // Arrays compare by reference.
        assert_eq!(
            run_ok("let a = [1]\nlet b = [1]\nlet c = a\nprintln(to_string(a == b))\nprintln(to_string(a == c))"),
            vec!["false", "true"]
        );
    }

    #[test]
    fn test_undefined_variable() {
        let err = run_err("println(to_string(missing))");
        assert!(err.contains("Undefined variable 'missing'"), "error was: {}", err);
    }

    #[test]
    fn test_const_reassignment_fails() {
        let err = run_err("const PI = 3.14\nPI = 2");
        assert!(err.contains("Cannot reassign constant"), "error was: {}", err);
    }

    #[test]
    fn test_function_names_are_constants() {
        let err = run_err("func f()\n return 1\nend\nf = 2");
        assert!(err.contains("Cannot reassign constant"), "error was: {}", err);
    }

    #[test]
    fn test_let_without_initializer_is_nil() {
        assert_eq!(run_ok("let x\nprintln(to_string(x))"), vec!["nil"]);
    }

    #[test]
    fn test_if_else_chain() {
        let source = r#"
let x = 7
if x < 5 then
    println("small")
else if x < 10 then
    println("medium")
else
    println("large")
end
"#;
        assert_eq!(run_ok(source), vec!["medium"]);
    }

    #[test]
    fn test_while_with_break_and_continue() {
        let source = r#"
let i = 0
while true do
    i = i + 1
    if i == 3 then continue end
    if i > 5 then break end
    println(to_string(i))
end
"#;
        assert_eq!(run_ok(source), vec!["1", "2", "4", "5"]);
    }

    #[test]
    fn test_for_loop_with_continue() {
        let source = r#"
for i in range(5) do
    if i == 2 then continue end
    println(to_string(i))
end
"#;
        assert_eq!(run_ok(source), vec!["0", "1", "3", "4"]);
    }

    #[test]
    fn test_for_requires_array() {
        let err = run_err("for x in 5 do\nend");
        assert!(err.contains("Cannot iterate over int"), "error was: {}", err);
    }

    #[test]
    fn test_loop_variable_rebinding_does_not_mutate_source() {
        let source = r#"
let xs = [1, 2, 3]
for x in xs do
    x = x * 10
end
println(to_string(xs))
"#;
        assert_eq!(run_ok(source), vec!["[1, 2, 3]"]);
    }

    #[test]
    fn test_recursion() {
        let source = r#"
func fac(n)
    if n <= 1 then
        return 1
    end
    return n * fac(n - 1)
end
println(to_string(fac(5)))
"#;
        assert_eq!(run_ok(source), vec!["120"]);
    }

    #[test]
    fn test_closure_captures_declaration_environment() {
        let source = r#"
func make()
    let c = 0
    func inc()
        c = c + 1
        return c
    end
    return inc
end
let f = make()
println(to_string(f()))
println(to_string(f()))
"#;
        assert_eq!(run_ok(source), vec!["1", "2"]);
    }

    #[test]
    fn test_missing_arguments_default_to_nil_and_extra_are_ignored() {
        let source = r#"
func show(a, b)
    println(to_string(a) + "," + to_string(b))
end
show(1)
show(1, 2, 3)
"#;
        assert_eq!(run_ok(source), vec!["1,nil", "1,2"]);
    }

    #[test]
    fn test_call_of_non_function() {
        let err = run_err("let x = 1\nx()");
        assert!(err.contains("not a function"), "error was: {}", err);
        let err = run_err("missing()");
        assert!(err.contains("Undefined function 'missing'"), "error was: {}", err);
    }

    #[test]
    fn test_index_expressions() {
        assert_eq!(run_ok("let xs = [10, 20, 30]\nprintln(to_string(xs[1]))"), vec!["20"]);
        assert_eq!(run_ok("let xs = [10, 20]\nprintln(to_string(xs[1.9]))"), vec!["20"]);
        assert_eq!(run_ok("let s = \"abc\"\nprintln(s[1])"), vec!["b"]);
        let err = run_err("let xs = [1]\nprintln(to_string(xs[3]))");
        assert!(err.contains("out of bounds"), "error was: {}", err);
        let err = run_err("let n = 1\nprintln(to_string(n[0]))");
        assert!(err.contains("Cannot index into"), "error was: {}", err);
    }

    #[test]
    fn test_index_assignment_and_aliasing() {
        let source = r#"
let a = [1, 2, 3]
let b = a
b[0] = 99
push(a, 4)
println(to_string(a[0]))
println(to_string(len(b)))
"#;
        assert_eq!(run_ok(source), vec!["99", "4"]);
    }

    #[test]
    fn test_index_assignment_bounds() {
        let err = run_err("let xs = [1]\nxs[5] = 2");
        assert!(err.contains("out of bounds"), "error was: {}", err);
        let err = run_err("let n = 3\nn[0] = 1");
        assert!(err.contains("is not an array"), "error was: {}", err);
    }

    #[test]
    fn test_try_catches_errors_as_message_strings() {
        let source = r#"
try
    let x = 1 / 0
catch err
    println("caught: " + err)
end
"#;
        let output = run_ok(source);
        assert_eq!(output, vec!["caught: Division by zero"]);
    }

    #[test]
    fn test_return_passes_through_try() {
        let source = r#"
func f()
    try
        return 42
    catch err
        println("never")
    end
    return 0
end
println(to_string(f()))
"#;
        assert_eq!(run_ok(source), vec!["42"]);
    }

    #[test]
    fn test_break_passes_through_try() {
        let source = r#"
let i = 0
while true do
    try
        break
    catch err
        println("never")
    end
end
println("done")
"#;
        assert_eq!(run_ok(source), vec!["done"]);
    }

    #[test]
    fn test_error_inside_function_reports_call_frames() {
        let source = "func f()\n    return 1 / 0\nend\nf()";
        let err = run_err(source);
        assert!(err.contains("Division by zero"), "error was: {}", err);
        assert!(err.contains("at f (test.lux:4:1)"), "error was: {}", err);
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(run_ok("println(to_string(-(2 + 3)))"), vec!["-5"]);
        assert_eq!(run_ok("println(to_string(not 0))"), vec!["true"]);
        assert_eq!(run_ok("println(to_string(not [1]))"), vec!["false"]);
        let err = run_err("let x = -\"a\"");
        assert!(err.contains("must be a number"), "error was: {}", err);
    }

    #[test]
    fn test_truthiness_in_conditions() {
        let source = r#"
if "" then println("a") end
if "0" then println("b") end
if 0 then println("c") end
if [] then println("d") end
if nil then println("e") end
"#;
        assert_eq!(run_ok(source), vec!["b", "d"]);
    }

    #[test]
    fn test_import_without_loader_fails() {
        let err = run_err("import \"foo\"");
        assert!(err.contains("Imports are not available"), "error was: {}", err);
    }

    #[test]
    fn test_execution_limit_exceeded() {
        let err = run_err("while true do\nend");
        assert!(err.contains("Execution limit exceeded"), "error was: {}", err);
    }

    #[test]
    fn test_bounded_loop_completes_under_limit() {
        let source = r#"
let i = 0
while i < 1000 do
    i = i + 1
end
println(to_string(i))
"#;
        let outcome = run(source);
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.output, vec!["1000"]);
        assert!(outcome.steps < STEP_LIMIT);
    }

    #[test]
    fn test_call_depth_limit() {
        let err = run_err("func f()\n return f()\nend\nf()");
        assert!(err.contains("Maximum call depth exceeded"), "error was: {}", err);
    }

    #[test]
    fn test_error_string_shape() {
        let outcome = run("let x = 1 / 0");
        let err = outcome.error.unwrap();
        assert!(
            err.starts_with("RuntimeError: Division by zero at test.lux:1:"),
            "error was: {}",
            err
        );
    }

    #[test]
    fn test_steps_are_counted() {
        let outcome = run("let x = 1");
        assert_eq!(outcome.error, None);
        // One statement entry plus one expression entry.
        assert_eq!(outcome.steps, 2);
    }
}

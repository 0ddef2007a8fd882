// ABOUTME: End-to-end tests driving the full lex/parse/eval pipeline

use lux_lang::eval::EvalOutcome;
use lux_lang::interpret;

fn run(source: &str) -> EvalOutcome {
    interpret(source, "main.lux", None, None)
}

fn run_ok(source: &str) -> Vec<String> {
    let outcome = run(source);
    assert_eq!(outcome.error, None, "unexpected error: {:?}", outcome.error);
    outcome.output
}

#[test]
fn test_hello_world() {
    assert_eq!(run_ok("println(\"hello\")"), vec!["hello"]);
}

#[test]
fn test_variable_and_to_string() {
    assert_eq!(run_ok("let x = 42\nprintln(to_string(x))"), vec!["42"]);
}

#[test]
fn test_constant_reassignment_is_an_error() {
    let outcome = run("const PI = 3.14\nPI = 2");
    let err = outcome.error.expect("expected an error");
    assert!(err.contains("Cannot reassign constant"), "error was: {}", err);
}

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(run_ok("println(to_string(2 + 3 * 4))"), vec!["14"]);
}

#[test]
fn test_factorial() {
    let source = "func fac(n)\n if n <= 1 then\n return 1\n end\n return n * fac(n - 1)\nend\nprintln(to_string(fac(5)))";
    assert_eq!(run_ok(source), vec!["120"]);
}

#[test]
fn test_for_loop_with_continue() {
    let source =
        "for i in range(5) do\n if i == 2 then continue end\n println(to_string(i))\nend";
    assert_eq!(run_ok(source), vec!["0", "1", "3", "4"]);
}

#[test]
fn test_try_catch_division_by_zero() {
    let source = "try\n let x = 1 / 0\ncatch err\n println(\"caught: \" + err)\nend";
    let outcome = run(source);
    assert_eq!(outcome.error, None);
    assert_eq!(outcome.output.len(), 1);
    assert!(
        outcome.output[0].starts_with("caught:"),
        "output was: {:?}",
        outcome.output
    );
}

#[test]
fn test_counter_closure() {
    let source = "func make()\n let c = 0\n func inc()\n  c = c + 1\n  return c\n end\n return inc\nend\nlet f = make()\nprintln(to_string(f()))\nprintln(to_string(f()))";
    assert_eq!(run_ok(source), vec!["1", "2"]);
}

#[test]
fn test_precedence_properties() {
    assert_eq!(run_ok("println(to_string(1 + 2 * 3 == 7))"), vec!["true"]);
    assert_eq!(run_ok("println(to_string(2 ^ 3 ^ 2 == 512))"), vec!["true"]);
    assert_eq!(
        run_ok("println(to_string((true and false or true) == true))"),
        vec!["true"]
    );
}

#[test]
fn test_truthiness_table() {
    let source = r#"
func check(v)
    if v then
        return "truthy"
    end
    return "falsy"
end
println(check(nil))
println(check(false))
println(check(0))
println(check(""))
println(check([]))
println(check("0"))
println(check(0.5))
"#;
    assert_eq!(
        run_ok(source),
        vec!["falsy", "falsy", "falsy", "falsy", "truthy", "truthy", "truthy"]
    );
}

#[test]
fn test_closures_share_captured_bindings() {
    let source = r#"
func make()
    let n = 0
    func bump()
        n = n + 10
        return n
    end
    func read()
        return n
    end
    return [bump, read]
end
let pair = make()
let b = pair[0]
let r = pair[1]
b()
b()
println(to_string(r()))
"#;
    assert_eq!(run_ok(source), vec!["20"]);
}

#[test]
fn test_array_aliasing_across_bindings() {
    let source = r#"
let a = [1, 2]
let b = a
b[1] = 99
push(b, 3)
println(to_string(a))
pop(a)
println(to_string(len(b)))
"#;
    assert_eq!(run_ok(source), vec!["[1, 99, 3]", "2"]);
}

#[test]
fn test_return_unwinds_loops_and_try() {
    let source = r#"
func find(xs, wanted)
    for x in xs do
        try
            if x == wanted then
                return "found"
            end
        catch err
            println("never")
        end
    end
    return "missing"
end
println(find([1, 2, 3], 2))
println(find([1, 2, 3], 9))
"#;
    assert_eq!(run_ok(source), vec!["found", "missing"]);
}

#[test]
fn test_nested_loops_break_inner_only() {
    let source = r#"
for i in range(3) do
    for j in range(3) do
        if j > i then break end
        println(to_string(i) + "," + to_string(j))
    end
end
"#;
    assert_eq!(
        run_ok(source),
        vec!["0,0", "1,0", "1,1", "2,0", "2,1", "2,2"]
    );
}

#[test]
fn test_catch_sees_plain_message_without_frames() {
    let source = r#"
func boom()
    let x = 1 / 0
end
try
    boom()
catch err
    println(err)
end
"#;
    let output = run_ok(source);
    assert_eq!(output, vec!["Division by zero"]);
}

#[test]
fn test_execution_continues_after_catch() {
    let source = r#"
try
    let x = nil + 1
catch err
    println("recovered")
end
println("after")
"#;
    assert_eq!(run_ok(source), vec!["recovered", "after"]);
}

#[test]
fn test_lexer_error_surfaces_as_top_level_error() {
    let outcome = run("let x = $");
    let err = outcome.error.expect("expected an error");
    assert!(err.starts_with("LexerError:"), "error was: {}", err);
    assert!(err.contains("main.lux:1:9"), "error was: {}", err);
}

#[test]
fn test_parse_error_surfaces_as_top_level_error() {
    let outcome = run("if x then\nprintln(\"unclosed\")");
    let err = outcome.error.expect("expected an error");
    assert!(err.starts_with("ParseError:"), "error was: {}", err);
}

#[test]
fn test_runtime_error_carries_frames_through_nested_calls() {
    let source = "func inner()\n return 1 / 0\nend\nfunc outer()\n return inner()\nend\nouter()";
    let outcome = run(source);
    let err = outcome.error.expect("expected an error");
    assert!(err.contains("Division by zero at main.lux:2:"), "error was: {}", err);
    assert!(err.contains("at inner (main.lux:5:"), "error was: {}", err);
    assert!(err.contains("at outer (main.lux:7:"), "error was: {}", err);
}

#[test]
fn test_output_collected_before_error() {
    let outcome = run("println(\"one\")\nprintln(\"two\")\nlet x = 1 / 0");
    assert_eq!(outcome.output, vec!["one", "two"]);
    assert!(outcome.error.is_some());
}

#[test]
fn test_type_annotations_are_ignored() {
    let source = "let x: int = 1\nconst Y: float = 2.5\nfunc f(a: int, b: string): string\n return to_string(a) + b\nend\nprintln(f(1, \"!\"))";
    assert_eq!(run_ok(source), vec!["1!"]);
}

#[test]
fn test_float_and_int_surface_distinction() {
    let source = "println(type(1))\nprintln(type(1.5))\nprintln(type(1.0))";
    // 1.0 is integer-representable, so the surface float marker is gone at
    // runtime.
    assert_eq!(run_ok(source), vec!["int", "float", "int"]);
}

#[test]
fn test_step_count_is_reported() {
    let outcome = run("let x = 1\nlet y = 2");
    assert_eq!(outcome.error, None);
    assert!(outcome.steps >= 4);
}

// ABOUTME: Tests for the standard library as seen from Lux programs

use lux_lang::interpret;

fn run_ok(source: &str) -> Vec<String> {
    let outcome = interpret(source, "stdlib.lux", None, None);
    assert_eq!(outcome.error, None, "unexpected error: {:?}", outcome.error);
    outcome.output
}

fn run_err(source: &str) -> String {
    interpret(source, "stdlib.lux", None, None)
        .error
        .expect("expected an error")
}

#[test]
fn test_math_builtins() {
    let source = r#"
println(to_string(abs(-3)))
println(to_string(floor(2.9)))
println(to_string(ceil(2.1)))
println(to_string(round(2.5)))
println(to_string(sqrt(81)))
println(to_string(pow(2, 8)))
println(to_string(min(3, -2)))
println(to_string(max(3, -2)))
"#;
    assert_eq!(run_ok(source), vec!["3", "2", "3", "3", "9", "256", "-2", "3"]);
}

#[test]
fn test_random_is_in_unit_interval() {
    let source = r#"
let r = random()
println(to_string(r >= 0 and r < 1))
"#;
    assert_eq!(run_ok(source), vec!["true"]);
}

#[test]
fn test_string_builtins() {
    let source = r#"
println(upper("abc"))
println(lower("ABC"))
println(trim("  pad  "))
println(to_string(len("hello")))
println(join(split("a,b,c", ","), "-"))
println(to_string(contains("hello", "ell")))
println(replace("x.y.z", ".", "/"))
println(substring("hello", 1, 4))
"#;
    assert_eq!(
        run_ok(source),
        vec!["ABC", "abc", "pad", "5", "a-b-c", "true", "x/y/z", "ell"]
    );
}

#[test]
fn test_array_builtins() {
    let source = r#"
let xs = range(2, 6)
println(to_string(xs))
push(xs, 99)
println(to_string(pop(xs)))
println(to_string(len(xs)))
println(to_string(reverse(xs)))
println(to_string(sort(xs)))
println(join(xs, ""))
"#;
    assert_eq!(
        run_ok(source),
        vec!["[2, 3, 4, 5]", "99", "4", "[5, 4, 3, 2]", "[2, 3, 4, 5]", "2345"]
    );
}

#[test]
fn test_sort_strings() {
    let source = r#"
let names = ["carol", "alice", "bob"]
println(to_string(sort(names)))
"#;
    assert_eq!(run_ok(source), vec!["[alice, bob, carol]"]);
}

#[test]
fn test_type_and_conversions() {
    let source = r#"
println(type(1))
println(type(1.5))
println(type("s"))
println(type(true))
println(type(nil))
println(type([1]))
println(to_string(to_int("12")))
println(to_string(to_int(3.7)))
println(to_string(to_float("0.25")))
"#;
    assert_eq!(
        run_ok(source),
        vec!["int", "float", "string", "bool", "nil", "array", "12", "3", "0.25"]
    );
}

#[test]
fn test_type_of_functions_and_builtins() {
    let source = r#"
func f()
end
println(type(f))
println(type(println))
println(to_string(f))
println(to_string(println))
"#;
    assert_eq!(
        run_ok(source),
        vec!["function", "builtin", "<function f>", "<builtin println>"]
    );
}

#[test]
fn test_builtin_errors_are_catchable() {
    let source = r#"
try
    pop([])
catch err
    println(err)
end
try
    to_int("not a number")
catch err
    println("conversion: " + err)
end
"#;
    let output = run_ok(source);
    assert_eq!(output[0], "pop: array is empty");
    assert!(output[1].starts_with("conversion: to_int"));
}

#[test]
fn test_builtin_arity_error_mentions_count() {
    let err = run_err("sqrt(1, 2)");
    assert!(
        err.contains("sqrt: expected 1 argument, got 2"),
        "error was: {}",
        err
    );
}

#[test]
fn test_photon_energy() {
    let source = r#"
let ev = photon_energy(620)
println(to_string(ev > 1.99 and ev < 2.01))
"#;
    assert_eq!(run_ok(source), vec!["true"]);
}

#[test]
fn test_measure_qubit_is_binary() {
    let source = r#"
let q = measure_qubit(0.5)
println(to_string(q == 0 or q == 1))
println(to_string(measure_qubit(0)))
println(to_string(measure_qubit(1)))
"#;
    assert_eq!(run_ok(source), vec!["true", "0", "1"]);
}

#[test]
fn test_file_roundtrip() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("note.txt").to_string_lossy().to_string();
    let source = format!(
        r#"
write_file("{path}", "first line")
println(to_string(file_exists("{path}")))
println(read_file("{path}"))
println(to_string(file_exists("{path}.missing")))
"#
    );
    assert_eq!(run_ok(&source), vec!["true", "first line", "false"]);
}

#[test]
fn test_read_missing_file_is_catchable() {
    let source = r#"
try
    read_file("/definitely/not/here.txt")
catch err
    println("io: " + err)
end
"#;
    let output = run_ok(source);
    assert!(output[0].starts_with("io: read_file"), "output was: {:?}", output);
}

#[test]
fn test_print_and_println_both_append() {
    assert_eq!(run_ok("print(\"a\")\nprintln(\"b\")"), vec!["a", "b"]);
}

#[test]
fn test_clock_ms_is_a_positive_number() {
    assert_eq!(run_ok("println(to_string(clock_ms() > 0))"), vec!["true"]);
}

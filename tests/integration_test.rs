// Integration tests for the C interpreter

use cwalk::console::ScriptedConsole;
use cwalk::interpreter::{Config, Diagnostic, ExitStatus, Interpreter, RuntimeError, Unsupported};
use cwalk::memory::MemoryError;
use cwalk::parser::ast::DeclId;
use cwalk::parser::parse;
use pretty_assertions::assert_eq;

const PRELUDE: &str = "extern int GET();
extern void PRINT(int);
extern int *MALLOC(int);
extern void FREE(int *);
";

fn run_with(
    source: &str,
    input: &[i32],
    config: Config,
) -> Result<(ExitStatus, Vec<i32>, Vec<Diagnostic>), RuntimeError> {
    let source = format!("{PRELUDE}{source}");
    let program = parse(&source).expect("Parsing failed");
    let mut interpreter =
        Interpreter::new(&program, config, ScriptedConsole::new(input.iter().copied()));
    let status = interpreter.run()?;
    Ok((
        status,
        interpreter.console().output().to_vec(),
        interpreter.diagnostics().to_vec(),
    ))
}

fn run(source: &str) -> (ExitStatus, Vec<i32>) {
    let (status, output, diagnostics) =
        run_with(source, &[], Config::default()).expect("Execution failed");
    assert!(diagnostics.is_empty(), "Unexpected reports: {:?}", diagnostics);
    (status, output)
}

fn run_err(source: &str) -> RuntimeError {
    match run_with(source, &[], Config::default()) {
        Ok((status, output, _)) => panic!("Expected failure, got {:?} {:?}", status, output),
        Err(err) => err,
    }
}

#[test]
fn test_simple_arithmetic() {
    let source = r#"
        int main() {
            int x = 5;
            int y = 10;
            int z = x + y;
            PRINT(z);
            return z;
        }
    "#;

    let (status, output) = run(source);
    assert_eq!(output, vec![15]);
    assert_eq!(status.return_value, 15);
}

#[test]
fn test_literals_print_verbatim() {
    let (_, output) = run("int main() { PRINT(0); PRINT(42); PRINT(2147483647); PRINT('A'); return 0; }");
    assert_eq!(output, vec![0, 42, i32::MAX, 65]);
}

#[test]
fn test_function_call() {
    let source = r#"
        int add(int a, int b) {
            return a + b;
        }

        int main() {
            int result = add(3, 4);
            PRINT(result);
            PRINT(add(result, add(1, 1)));
            return 0;
        }
    "#;

    assert_eq!(run(source).1, vec![7, 9]);
}

#[test]
fn test_recursion() {
    let source = r#"
        int factorial(int n) {
            if (n <= 1) {
                return 1;
            }
            return n * factorial(n - 1);
        }

        int fib(int n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }

        int main() {
            PRINT(factorial(5));
            PRINT(fib(10));
            return 0;
        }
    "#;

    assert_eq!(run(source).1, vec![120, 55]);
}

#[test]
fn test_prototype_then_definition() {
    let source = r#"
        int twice(int x);

        int main() {
            PRINT(twice(21));
            return 0;
        }

        int twice(int x) {
            return x + x;
        }
    "#;

    assert_eq!(run(source).1, vec![42]);
}

#[test]
fn test_global_write_from_nested_call_is_visible() {
    let source = r#"
        int x = 0;

        void set() {
            x = 7;
        }

        void outer() {
            set();
        }

        int main() {
            outer();
            PRINT(x);
            return x;
        }
    "#;

    let (status, output) = run(source);
    assert_eq!(output, vec![7]);
    assert_eq!(status.return_value, 7);
}

#[test]
fn test_global_initializers_run_before_main() {
    let source = r#"
        int g = 6 * 7;
        int h;

        int main() {
            PRINT(g);
            PRINT(h);
            return 0;
        }
    "#;

    assert_eq!(run(source).1, vec![42, 0]);
}

#[test]
fn test_call_locals_are_isolated() {
    let source = format!(
        "{PRELUDE}{}",
        r#"
        int square(int p) {
            int local = p * p;
            return local;
        }

        int main() {
            int p = 3;
            PRINT(square(p + 1));
            PRINT(p);
            return 0;
        }
    "#
    );
    let program = parse(&source).expect("Parsing failed");
    let mut interpreter = Interpreter::new(&program, Config::default(), ScriptedConsole::default());
    interpreter.run().expect("Execution failed");

    assert_eq!(interpreter.console().output(), &[16, 3]);

    // After the run only the global frame remains and it never saw the callee's bindings
    let stack = interpreter.environment().stack();
    assert_eq!(stack.depth(), 1);
    for (index, decl) in program.decls.iter().enumerate() {
        if decl.name == "p" || decl.name == "local" {
            assert_eq!(stack.global().lookup_decl(DeclId(index as u32)), None);
        }
    }
}

#[test]
fn test_if_without_else_skips_side_effects() {
    let source = r#"
        int main() {
            int x = 1;
            if (x == 0) {
                PRINT(100);
                x = 5;
            }
            if (x) PRINT(1); else PRINT(2);
            if (!x) PRINT(3); else PRINT(4);
            PRINT(x);
            return 0;
        }
    "#;

    assert_eq!(run(source).1, vec![1, 4, 1]);
}

#[test]
fn test_loops_stop_when_condition_is_zero() {
    let source = r#"
        int main() {
            int i = 0;
            int sum = 0;
            while (i < 5) {
                sum = sum + i;
                i = i + 1;
            }
            PRINT(sum);
            PRINT(i);

            for (int j = 0; j < 3; j = j + 1) {
                PRINT(j);
            }
            return 0;
        }
    "#;

    assert_eq!(run(source).1, vec![10, 5, 0, 1, 2]);
}

#[test]
fn test_loops_with_false_condition_never_run() {
    let source = r#"
        int main() {
            int i = 10;
            while (i < 5) {
                PRINT(i);
                i = i + 1;
            }
            for (i = 0; i < 0; i = i + 1) PRINT(99);
            PRINT(i);
            return 0;
        }
    "#;

    assert_eq!(run(source).1, vec![0]);
}

#[test]
fn test_return_inside_nested_control_flow() {
    let source = r#"
        int find(int n) {
            int i = 0;
            while (1) {
                if (i == n) {
                    for (;;) {
                        return i * 10;
                    }
                }
                i = i + 1;
            }
            PRINT(-1);
            return -1;
        }

        int main() {
            PRINT(find(3));
            PRINT(4);
            return 0;
        }
    "#;

    assert_eq!(run(source).1, vec![30, 4]);
}

#[test]
fn test_function_without_return_yields_zero() {
    let source = r#"
        void hello() {
            PRINT(1);
        }

        int nothing() {
            return;
        }

        int main() {
            hello();
            PRINT(nothing());
            PRINT(2);
        }
    "#;

    let (status, output) = run(source);
    assert_eq!(output, vec![1, 0, 2]);
    assert_eq!(status.return_value, 0);
}

#[test]
fn test_nonzero_main_is_not_an_error() {
    let (status, output) = run("int main() { PRINT(1); return 3; }");
    assert_eq!(output, vec![1]);
    assert_eq!(status, ExitStatus { return_value: 3 });
}

#[test]
fn test_get_reads_input_in_order() {
    let source = r#"
        int main() {
            int a = GET();
            int b = GET();
            PRINT(a - b);
            return 0;
        }
    "#;

    let (_, output, _) = run_with(source, &[10, 3], Config::default()).unwrap();
    assert_eq!(output, vec![7]);
}

#[test]
fn test_exhausted_input_is_fatal() {
    let source = "int main() { int a = GET(); int b = GET(); return a + b; }";
    let err = run_with(source, &[1], Config::default()).unwrap_err();
    assert!(matches!(err, RuntimeError::InputUnavailable { .. }));
}

#[test]
fn test_array_elements_persist() {
    let source = r#"
        int g[3];

        void set() {
            g[1] = 9;
        }

        int main() {
            int a[5];
            a[2] = 5;
            PRINT(a[2]);
            PRINT(a[0]);
            set();
            PRINT(g[1]);

            int i;
            for (i = 0; i < 5; i = i + 1) {
                a[i] = i * i;
            }
            int sum = 0;
            for (i = 0; i < 5; i = i + 1) {
                sum = sum + a[i];
            }
            PRINT(sum);
            return 0;
        }
    "#;

    assert_eq!(run(source).1, vec![5, 0, 9, 30]);
}

#[test]
fn test_array_index_out_of_bounds_is_fatal() {
    let err = run_err("int main() { int a[2]; a[2] = 1; return 0; }");
    match err {
        RuntimeError::Memory { source, .. } => {
            assert_eq!(source, MemoryError::ArrayIndexOutOfBounds { index: 2, len: 2 });
        }
        other => panic!("Unexpected error: {:?}", other),
    }
}

#[test]
fn test_array_parameters_share_caller_storage() {
    let source = r#"
        int sum(int a[], int n) {
            int i;
            int total = 0;
            for (i = 0; i < n; i = i + 1) {
                total = total + a[i];
            }
            return total;
        }

        void fill(int a[]) {
            a[1] = 7;
        }

        void fold(int a[3]) {
            a[0] = a[0] + a[2];
        }

        int forward(int a[]) {
            return sum(a, 3);
        }

        int main() {
            int *p = MALLOC(4);
            *p = 42;

            int a[3];
            a[0] = 1;
            a[1] = 2;
            a[2] = 3;
            PRINT(sum(a, 3));

            fill(a);
            PRINT(a[1]);
            fold(a);
            PRINT(a[0]);
            PRINT(forward(a));

            // The heap is never touched by array accesses
            PRINT(*p);
            return 0;
        }
    "#;

    assert_eq!(run(source).1, vec![6, 7, 4, 14, 42]);
}

#[test]
fn test_arrays_and_pointers_do_not_convert() {
    let cases = [
        (
            "int first(int *a) { return a[0]; } int main() { int a[3]; a[0] = 1; return first(a); }",
            "int*",
            "int[3]",
        ),
        (
            "void fill(int a[]) { a[0] = 1; } int main() { int *p = MALLOC(4); fill(p); return 0; }",
            "int[]",
            "int*",
        ),
        (
            "int main() { int a[2]; int *p = a; return 0; }",
            "int*",
            "int[2]",
        ),
        (
            "int main() { int a[2]; int *p; p = a; return 0; }",
            "int*",
            "int[2]",
        ),
        (
            "int g[2]; int *leak() { return g; } int main() { leak(); return 0; }",
            "int*",
            "int[2]",
        ),
    ];

    for (source, want_expected, want_found) in cases {
        match run_err(source) {
            RuntimeError::ArrayConversion {
                expected, found, ..
            } => {
                assert_eq!(expected, want_expected, "{source}");
                assert_eq!(found, want_found, "{source}");
            }
            other => panic!("Unexpected error for {source}: {:?}", other),
        }
    }
}

#[test]
fn test_heap_pointer_reads_and_writes() {
    let source = r#"
        int main() {
            int *p = MALLOC(12);
            *p = 10;
            *p = *p + 1;
            *(p + 1) = 6;
            p[2] = 5;
            PRINT(*p);
            PRINT(p[1]);
            PRINT(*(p + 2));
            FREE(p);
            return 0;
        }
    "#;

    assert_eq!(run(source).1, vec![11, 6, 5]);
}

#[test]
fn test_heap_exhaustion_is_fatal_and_deterministic() {
    let source = r#"
        int main() {
            int *a = MALLOC(8);
            int *b = MALLOC(8);
            int *c = MALLOC(4);
            return 0;
        }
    "#;
    let config = Config {
        heap_capacity: 16,
        ..Config::default()
    };

    let expected = MemoryError::HeapExhausted {
        requested: 4,
        used: 16,
        capacity: 16,
    };
    for _ in 0..2 {
        match run_with(source, &[], config) {
            Err(RuntimeError::Memory { source, .. }) => assert_eq!(source, expected),
            other => panic!("Expected heap exhaustion, got {:?}", other),
        }
    }
}

#[test]
fn test_heap_access_outside_region_is_fatal() {
    let err = run_err("int main() { int *p = MALLOC(4); return *(p + 5000); }");
    assert!(matches!(
        err,
        RuntimeError::Memory {
            source: MemoryError::InvalidHeapAccess(20000),
            ..
        }
    ));
}

#[test]
fn test_sizeof() {
    let source = r#"
        int main() {
            int *p;
            int n;
            PRINT(sizeof(int));
            PRINT(sizeof(int *));
            PRINT(sizeof(p));
            PRINT(sizeof n);
            return 0;
        }
    "#;

    assert_eq!(run(source).1, vec![4, 4, 4, 4]);
}

#[test]
fn test_sizeof_array_is_fatal() {
    let err = run_err("int main() { int a[3]; return sizeof(a); }");
    assert!(matches!(err, RuntimeError::UnsupportedSizeOf { .. }));
}

#[test]
fn test_arity_mismatch_is_fatal() {
    let err = run_err("int f(int a) { return a; }\nint main() { return f(1, 2); }");
    match err {
        RuntimeError::ArityMismatch {
            function,
            expected,
            got,
            ..
        } => {
            assert_eq!(function, "f");
            assert_eq!((expected, got), (1, 2));
        }
        other => panic!("Unexpected error: {:?}", other),
    }

    let err = run_err("int main() { PRINT(1, 2); return 0; }");
    assert!(matches!(err, RuntimeError::ArityMismatch { .. }));
}

#[test]
fn test_call_depth_limit() {
    let source = r#"
        int down(int n) {
            if (n == 0) {
                return 0;
            }
            return down(n - 1) + 1;
        }

        int main() {
            PRINT(down(GET()));
            return 0;
        }
    "#;
    let config = Config {
        max_call_depth: 64,
        ..Config::default()
    };

    // main plus 63 nested calls fit exactly
    let (_, output, _) = run_with(source, &[62], config).expect("Execution failed");
    assert_eq!(output, vec![62]);

    match run_with(source, &[63], config) {
        Err(RuntimeError::RecursionLimit { depth, .. }) => assert_eq!(depth, 64),
        other => panic!("Expected call depth error, got {:?}", other),
    }
}

#[test]
fn test_deep_recursion_stops_at_default_limit() {
    let source = r#"
        int down(int n) {
            if (n == 0) {
                return 0;
            }
            return down(n - 1) + 1;
        }

        int main() {
            PRINT(down(GET()));
            return 0;
        }
    "#;

    let (_, output, _) = run_with(source, &[5000], Config::default()).expect("Execution failed");
    assert_eq!(output, vec![5000]);

    match run_with(source, &[20000], Config::default()) {
        Err(RuntimeError::RecursionLimit { depth, .. }) => {
            assert_eq!(depth, Config::default().max_call_depth);
        }
        other => panic!("Expected call depth error, got {:?}", other),
    }
}

#[test]
fn test_undefined_function_is_fatal() {
    let err = run_err("int g(int x);\nint main() { return g(1); }");
    assert!(matches!(err, RuntimeError::UndefinedFunction { ref name, .. } if name == "g"));
}

#[test]
fn test_missing_main() {
    let err = run_err("int f() { return 0; }");
    assert_eq!(err, RuntimeError::NoEntryFunction);
}

#[test]
fn test_error_location_points_at_failing_line() {
    let err = run_err("int main() {\n  int x = 0;\n  return 5 / x;\n}");
    // Four prelude lines precede the program
    assert_eq!(err.location().map(|loc| loc.line), Some(7));
}

#[test]
fn test_unsupported_operators_are_reported_and_evaluate_to_zero() {
    let source = r#"
        int main() {
            int x = 1;
            PRINT(1 && 1);
            x++;
            x += 2;
            PRINT(x);
            PRINT(x << 1);
            return 0;
        }
    "#;

    let (_, output, diagnostics) = run_with(source, &[], Config::default()).unwrap();
    assert_eq!(output, vec![0, 1, 0]);

    let kinds: Vec<Unsupported> = diagnostics.into_iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            Unsupported::BinaryOperator("&&"),
            Unsupported::UnaryOperator("++"),
            Unsupported::BinaryOperator("+="),
            Unsupported::BinaryOperator("<<"),
        ]
    );
}

#[test]
fn test_unsupported_references_and_targets_are_reported() {
    let source = r#"
        int f() { return 1; }

        int main() {
            int x = 2;
            int y = f;
            (x + 1) = 3;
            int *p = &x;
            PRINT(y);
            PRINT(x);
            return 0;
        }
    "#;

    let (_, output, diagnostics) = run_with(source, &[], Config::default()).unwrap();
    assert_eq!(output, vec![0, 2]);

    let kinds: Vec<Unsupported> = diagnostics.into_iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            Unsupported::FunctionReference("f".to_string()),
            Unsupported::AssignmentTarget,
            Unsupported::UnaryOperator("&"),
        ]
    );
}

#[test]
fn test_builtin_reference_is_not_reported() {
    let (_, output, diagnostics) =
        run_with("int main() { PRINT; PRINT(5); return 0; }", &[], Config::default()).unwrap();
    assert_eq!(output, vec![5]);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_strict_mode_aborts_on_unsupported() {
    let strict = Config {
        strict: true,
        ..Config::default()
    };
    let err = run_with("int main() { PRINT(1); PRINT(1 || 0); return 0; }", &[], strict)
        .unwrap_err();

    match err {
        RuntimeError::Unsupported { kind, location } => {
            assert_eq!(kind, Unsupported::BinaryOperator("||"));
            assert_eq!(location.line, 5);
        }
        other => panic!("Unexpected error: {:?}", other),
    }
}

#[test]
fn test_run_source_reports_parse_errors() {
    let result = cwalk::run_source("int main( { }", Config::default(), ScriptedConsole::default());
    assert!(matches!(result, Err(cwalk::Error::Parse(_))));
}

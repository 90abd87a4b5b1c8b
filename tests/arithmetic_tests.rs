use cwalk::console::ScriptedConsole;
use cwalk::interpreter::{Config, RuntimeError};
use pretty_assertions::assert_eq;

const PRELUDE: &str = "extern void PRINT(int);
extern int *MALLOC(int);
extern void FREE(int *);
";

fn output_of(source: &str) -> Result<Vec<i32>, cwalk::Error> {
    let source = format!("{PRELUDE}{source}");
    let (_, console) = cwalk::run_source(&source, Config::default(), ScriptedConsole::default())?;
    Ok(console.output().to_vec())
}

#[test]
fn test_integer_operators() {
    let source = r#"
    int main() {
        PRINT(7 + 3 * 2);
        PRINT((7 + 3) * 2);
        PRINT(7 / 2);
        PRINT(-7 / 2);
        PRINT(7 % 3);
        PRINT(-5);
        PRINT(+5);
        PRINT(!0);
        PRINT(!7);
        PRINT(~0);
        return 0;
    }
    "#;

    assert_eq!(
        output_of(source).expect("Execution failed"),
        vec![13, 20, 3, -3, 1, -5, 5, 1, 0, -1]
    );
}

#[test]
fn test_comparisons_yield_zero_or_one() {
    let source = r#"
    int main() {
        PRINT(3 < 4);
        PRINT(4 < 3);
        PRINT(3 <= 3);
        PRINT(3 > 3);
        PRINT(3 >= 3);
        PRINT(2 == 2);
        PRINT(2 != 2);
        return 0;
    }
    "#;

    assert_eq!(
        output_of(source).expect("Execution failed"),
        vec![1, 0, 1, 0, 1, 1, 0]
    );
}

#[test]
fn test_arithmetic_wraps() {
    let source = r#"
    int main() {
        int max = 2147483647;
        PRINT(max + 1);
        PRINT(max * 2);
        return 0;
    }
    "#;

    assert_eq!(
        output_of(source).expect("Execution failed"),
        vec![i32::MIN, -2]
    );
}

#[test]
fn test_chained_assignment() {
    let source = r#"
    int main() {
        int a;
        int b;
        a = b = 3;
        PRINT(a + b);
        PRINT(a = 9);
        return 0;
    }
    "#;

    assert_eq!(output_of(source).expect("Execution failed"), vec![6, 9]);
}

#[test]
fn test_pointer_arithmetic() {
    let source = r#"
    int main() {
        int *p = MALLOC(16);
        int *q = p + 3;

        // Pointer difference counts elements, not bytes
        PRINT(q - p);
        PRINT((int)q - (int)p);
        PRINT(q - 1 - p);
        PRINT((int)(2 + p));
        return 0;
    }
    "#;

    assert_eq!(output_of(source).expect("Execution failed"), vec![3, 12, 2, 8]);
}

#[test]
fn test_allocation_is_monotonic_and_never_reused() {
    let source = r#"
    int main() {
        int *a = MALLOC(8);
        int *b = MALLOC(8);
        PRINT((int)b - (int)a);
        FREE(a);
        int *c = MALLOC(4);
        PRINT((int)c);
        return 0;
    }
    "#;

    assert_eq!(output_of(source).expect("Execution failed"), vec![8, 16]);
}

#[test]
fn test_pointer_walk_over_heap_block() {
    let source = r#"
    int main() {
        int n = 4;
        int *data = MALLOC(n * sizeof(int));
        int *cursor = data;
        int i = 0;
        while (i < n) {
            *cursor = i + 1;
            cursor = cursor + 1;
            i = i + 1;
        }

        int total = 0;
        for (cursor = data; cursor - data < n; cursor = cursor + 1) {
            total = total + *cursor;
        }
        PRINT(total);
        PRINT(cursor - data);
        return 0;
    }
    "#;

    assert_eq!(output_of(source).expect("Execution failed"), vec![10, 4]);
}

#[test]
fn test_division_by_zero_is_fatal() {
    for source in [
        "int main() { int z = 0; return 1 / z; }",
        "int main() { int z = 0; return 1 % z; }",
    ] {
        match output_of(source) {
            Err(cwalk::Error::Runtime(RuntimeError::DivisionByZero { .. })) => {}
            other => panic!("Expected division by zero, got {:?}", other),
        }
    }
}

#[test]
fn test_adding_two_pointers_is_fatal() {
    let source = "int main() { int *p = MALLOC(8); int *q = p; return p + q; }";
    match output_of(source) {
        Err(cwalk::Error::Runtime(RuntimeError::InvalidPointerArithmetic { op, .. })) => {
            assert_eq!(op, "+");
        }
        other => panic!("Expected invalid pointer arithmetic, got {:?}", other),
    }
}

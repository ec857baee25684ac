use jack_compiler::{
    compile::ClassOrigin, compile_str, config::CompilerConf, error::CompileError, Compiler,
};

/// Joins instructions into VM text.
fn vm(lines: &[&str]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn compile(source: &str) -> String {
    match compile_str(source) {
        Ok(code) => code,
        Err(err) => panic!("{}", err),
    }
}

#[test]
fn test_compile_point() {
    let code = compile(include_str!("Point.jack"));
    #[rustfmt::skip]
    let expected = vm(&[
        "function Point.new 0",
        "push constant 2",
        "call Memory.alloc 1",
        "pop pointer 0",
        "push argument 0",
        "pop this 0",
        "push argument 1",
        "pop this 1",
        "push pointer 0",
        "return",
        "function Point.getX 0",
        "push argument 0",
        "pop pointer 0",
        "push this 0",
        "return",
    ]);
    assert_eq!(code, expected);
}

#[test]
fn test_compile_loop_labels() {
    let code = compile(include_str!("Loop.jack"));
    #[rustfmt::skip]
    let expected = vm(&[
        "function Loop.count 1",
        "push constant 0",
        "pop local 0",
        "label WHILE_EXP0",
        "push local 0",
        "push argument 0",
        "lt",
        "not",
        "if-goto WHILE_END0",
        "push local 0",
        "push constant 3",
        "eq",
        "if-goto IF_TRUE0",
        "goto IF_FALSE0",
        "label IF_TRUE0",
        "push local 0",
        "push constant 2",
        "add",
        "pop local 0",
        "goto IF_END0",
        "label IF_FALSE0",
        "push local 0",
        "push constant 1",
        "add",
        "pop local 0",
        "label IF_END0",
        "goto WHILE_EXP0",
        "label WHILE_END0",
        "push local 0",
        "push argument 0",
        "gt",
        "if-goto IF_TRUE1",
        "goto IF_FALSE1",
        "label IF_TRUE1",
        "push argument 0",
        "return",
        "label IF_FALSE1",
        "push local 0",
        "return",
    ]);
    assert_eq!(code, expected);
}

#[test]
fn test_compile_square() {
    let mut compiler = Compiler::default();
    let class = compiler.compile(include_str!("Square.jack")).unwrap();
    assert_eq!(class.name, "Square");

    let lines: Vec<&str> = class.code.lines().collect();

    // Three fields, the static doesn't take space in the object.
    assert_eq!(&lines[0..4], &["function Square.new 0", "push constant 3", "call Memory.alloc 1", "pop pointer 0"]);

    // Statics have their own segment.
    let count = lines.iter().position(|line| *line == "push static 0").unwrap();
    assert_eq!(&lines[count..count + 4], &["push static 0", "push constant 1", "add", "pop static 0"]);

    // Unqualified calls are methods on the current object.
    let draw = lines.iter().position(|line| *line == "call Square.draw 1").unwrap();
    assert_eq!(lines[draw - 1], "push pointer 0");
    assert_eq!(lines[draw + 1], "pop temp 0");

    assert_eq!(lines.iter().filter(|line| **line == "label IF_TRUE0").count(), 1);
    assert_eq!(lines.iter().filter(|line| **line == "label WHILE_EXP0").count(), 1);

    assert_eq!(lines.iter().filter(|line| line.starts_with("function ")).count(), 6);
    assert!(lines.contains(&"call Screen.drawRectangle 4"));
    assert!(lines.contains(&"call Memory.deAlloc 1"));
}

#[test]
fn test_labels_restart_per_subroutine() {
    let code = compile(
        r#"
        class Spin {
            function void a() { while (true) { } return; }
            function void b() { while (false) { } return; }
        }
        "#,
    );
    assert_eq!(code.matches("label WHILE_EXP0\n").count(), 2);
    assert_eq!(code.matches("label WHILE_END0\n").count(), 2);
    assert!(!code.contains("WHILE_EXP1"));
}

#[test]
fn test_call_on_variable() {
    let code = compile(
        r#"
        class Main {
            function void main() {
                var Runner obj;
                do obj.run(1 + 2);
                return;
            }
        }
        "#,
    );
    #[rustfmt::skip]
    let expected = vm(&[
        "function Main.main 1",
        "push local 0",
        "push constant 1",
        "push constant 2",
        "add",
        "call Runner.run 2",
        "pop temp 0",
        "push constant 0",
        "return",
    ]);
    assert_eq!(code, expected);
}

#[test]
fn test_call_on_builtin_class() {
    let code = compile("class Main { function void main() { do Output.printInt(5); return; } }");
    #[rustfmt::skip]
    let expected = vm(&[
        "function Main.main 0",
        "push constant 5",
        "call Output.printInt 1",
        "pop temp 0",
        "push constant 0",
        "return",
    ]);
    assert_eq!(code, expected);
}

#[test]
fn test_left_associative() {
    let code = compile(
        r#"
        class Calc {
            function int sub(int a, int b, int c) {
                return a - b - c;
            }
            function int mixed() {
                return 2 + 3 * 4;
            }
            function int grouped() {
                return 2 + (3 * 4);
            }
        }
        "#,
    );
    #[rustfmt::skip]
    let expected = vm(&[
        "function Calc.sub 0",
        "push argument 0",
        "push argument 1",
        "sub",
        "push argument 2",
        "sub",
        "return",
        "function Calc.mixed 0",
        "push constant 2",
        "push constant 3",
        "add",
        "push constant 4",
        "call Math.multiply 2",
        "return",
        "function Calc.grouped 0",
        "push constant 2",
        "push constant 3",
        "push constant 4",
        "call Math.multiply 2",
        "add",
        "return",
    ]);
    assert_eq!(code, expected);
}

#[test]
fn test_unary_and_keywords() {
    let code = compile(
        r#"
        class Flags {
            function boolean flip(int n) {
                var boolean b;
                let b = ~true;
                let n = -n / 2;
                if (b | false) {
                    return null;
                }
                return b;
            }
        }
        "#,
    );
    #[rustfmt::skip]
    let expected = vm(&[
        "function Flags.flip 1",
        "push constant 0",
        "not",
        "not",
        "pop local 0",
        "push argument 0",
        "neg",
        "push constant 2",
        "call Math.divide 2",
        "pop argument 0",
        "push local 0",
        "push constant 0",
        "or",
        "if-goto IF_TRUE0",
        "goto IF_FALSE0",
        "label IF_TRUE0",
        "push constant 0",
        "return",
        "label IF_FALSE0",
        "push local 0",
        "return",
    ]);
    assert_eq!(code, expected);
}

#[test]
fn test_subroutine_scope_shadows_class_scope() {
    let code = compile(
        r#"
        class Shadow {
            field int x;
            static int count;
            method int get() {
                var int x;
                let x = 7;
                let count = count + 1;
                return x;
            }
        }
        "#,
    );
    #[rustfmt::skip]
    let expected = vm(&[
        "function Shadow.get 1",
        "push argument 0",
        "pop pointer 0",
        "push constant 7",
        "pop local 0",
        "push static 0",
        "push constant 1",
        "add",
        "pop static 0",
        "push local 0",
        "return",
    ]);
    assert_eq!(code, expected);
}

#[test]
fn test_method_arguments_start_at_one() {
    let code = compile(
        r#"
        class Vec {
            field int x;
            method void add(int dx) {
                let x = x + dx;
                return;
            }
        }
        "#,
    );
    #[rustfmt::skip]
    let expected = vm(&[
        "function Vec.add 0",
        "push argument 0",
        "pop pointer 0",
        "push this 0",
        "push argument 1",
        "add",
        "pop this 0",
        "push constant 0",
        "return",
    ]);
    assert_eq!(code, expected);
}

#[test]
fn test_arrays_and_strings() {
    let code = compile(
        r#"
        class Text {
            function void fill(Array a) {
                let a[1] = a[0];
                do Output.printString("Hi");
                return;
            }
        }
        "#,
    );
    #[rustfmt::skip]
    let expected = vm(&[
        "function Text.fill 0",
        "push argument 0",
        "push constant 1",
        "add",
        "push argument 0",
        "push constant 0",
        "add",
        "pop pointer 1",
        "push that 0",
        "pop temp 0",
        "pop pointer 1",
        "push temp 0",
        "pop that 0",
        "push constant 2",
        "call String.new 1",
        "push constant 72",
        "call String.appendChar 2",
        "push constant 105",
        "call String.appendChar 2",
        "call Output.printString 1",
        "pop temp 0",
        "push constant 0",
        "return",
    ]);
    assert_eq!(code, expected);
}

#[test]
fn test_calls_between_classes() {
    let mut compiler = Compiler::default();

    // Declared up front, as the driver does for a directory.
    compiler.declare_class("Ball");
    let main = compiler
        .compile("class Main { function void main() { var Ball b; let b = Ball.new(); do b.move(); return; } }")
        .unwrap();
    assert!(main.code.contains("call Ball.new 0\npop local 0\n"));
    assert!(main.code.contains("push local 0\ncall Ball.move 1\n"));

    // Compiled classes stay known for the rest of the run.
    compiler
        .compile("class Bat { function Bat new() { return null; } }")
        .unwrap();
    let game = compiler
        .compile("class Game { function void run() { do Bat.new(); return; } }")
        .unwrap();
    assert!(game.code.contains("call Bat.new 0\npop temp 0\n"));
    assert!(compiler.known_classes().contains("Game"));
}

#[test]
fn test_unresolved_call_fallback() {
    let conf = CompilerConf {
        allow_unresolved_calls: true,
        ..CompilerConf::default()
    };
    let mut compiler = Compiler::new(conf);
    let class = compiler
        .compile("class Main { function void main() { do Keyboard2.read(1); return; } }")
        .unwrap();
    assert!(class.code.contains("push constant 1\ncall Keyboard2.read 1\npop temp 0\n"));
}

#[test]
fn test_empty_class() {
    assert_eq!(compile("class Empty { }"), "");
}

#[test]
fn test_failed_class_is_not_callable() {
    let mut compiler = Compiler::default();

    assert!(compiler
        .compile("class Bad { function void f() { let = 1; } }")
        .is_err());
    assert_eq!(compiler.known_classes().origin("Bad"), None);

    let err = compiler
        .compile("class Main { function void main() { do Bad.f(); return; } }")
        .unwrap_err();
    assert!(matches!(err, CompileError::UnknownCallTarget { name, .. } if name == "Bad"));
    assert_eq!(compiler.known_classes().origin("Main"), None);
}

#[test]
fn test_failed_declared_class_stays_declared() {
    let mut compiler = Compiler::default();
    compiler.declare_class("Ball");

    assert!(compiler.compile("class Ball { function void f() { return } }").is_err());
    assert_eq!(compiler.known_classes().origin("Ball"), Some(ClassOrigin::Declared));

    compiler
        .compile("class Ball { function void f() { return; } }")
        .unwrap();
    assert_eq!(compiler.known_classes().origin("Ball"), Some(ClassOrigin::Compiled));
}

#[test]
fn test_runtime_class_keeps_origin() {
    let mut compiler = Compiler::default();
    let class = compiler
        .compile("class Math { function int abs(int x) { return x; } }")
        .unwrap();
    assert_eq!(class.name, "Math");
    assert_eq!(compiler.known_classes().origin("Math"), Some(ClassOrigin::Builtin));
}

#[test]
fn test_string_character_codes() {
    let code = compile("class Main { function void main() { do Output.printString(\"é~\"); return; } }");
    assert!(code.contains(
        "push constant 2\ncall String.new 1\npush constant 233\ncall String.appendChar 2\npush constant 126\n"
    ));
}

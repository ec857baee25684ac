use jack_compiler::{
    compile_str,
    error::{CompileError, LexError},
    tokens::{Symbol, TokenKind},
};

fn compile_err(source: &str) -> CompileError {
    match compile_str(source) {
        Ok(code) => panic!("expected an error, compiled into:\n{code}"),
        Err(err) => err,
    }
}

#[test]
fn test_unknown_variable() {
    let err = compile_err("class Main { function void main() { let y = 1; return; } }");
    match err {
        CompileError::UnknownVariable { name, .. } => assert_eq!(name, "y"),
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn test_unknown_array_base() {
    let err = compile_err("class Main { function int main() { return arr[0]; } }");
    assert!(matches!(err, CompileError::UnknownVariable { name, .. } if name == "arr"));
}

#[test]
fn test_unknown_call_target() {
    let err = compile_err("class Main { function void main() { do Foo.bar(); return; } }");
    match err {
        CompileError::UnknownCallTarget { name, location } => {
            assert_eq!(name, "Foo");
            assert_eq!(location.line, 1);
        }
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn test_primitive_receiver() {
    let err = compile_err("class Main { function void main() { var int n; do n.size(); return; } }");
    match err {
        CompileError::PrimitiveReceiver { name, ty, method, .. } => {
            assert_eq!(name, "n");
            assert_eq!(ty, "int");
            assert_eq!(method, "size");
        }
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn test_redeclared_local() {
    let err = compile_err("class Main { function void main() { var int a, a; return; } }");
    assert!(matches!(err, CompileError::Redeclared { name, .. } if name == "a"));
}

#[test]
fn test_redeclared_parameter_as_local() {
    let err = compile_err("class Main { function void f(int a) { var char a; return; } }");
    assert!(matches!(err, CompileError::Redeclared { name, .. } if name == "a"));
}

#[test]
fn test_redeclared_field() {
    let err = compile_err("class Main { field int x; static boolean x; }");
    assert!(matches!(err, CompileError::Redeclared { name, .. } if name == "x"));
}

#[test]
fn test_syntax_error_reports_furthest_position() {
    let source = "class Main {\n    function void main() {\n        let = 5;\n        return;\n    }\n}\n";
    match compile_err(source) {
        CompileError::Syntax {
            expected,
            encountered,
            location,
        } => {
            assert_eq!(expected, "identifier");
            assert_eq!(encountered, TokenKind::Symbol(Symbol::Eq));
            assert_eq!(location.line, 3);
            assert_eq!(location.column, 13);
            assert_eq!(location.source_line, "        let = 5;");
        }
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn test_syntax_error_message() {
    let err = compile_err("class Main {\n    function void main() {\n        let = 5;\n    }\n}\n");
    let message = err.to_string();
    assert!(message.starts_with("syntax error: expected identifier, encountered '='"));
    assert!(message.contains("3 |         let = 5;"));
    assert!(message.ends_with('^'));
}

#[test]
fn test_trailing_input() {
    let err = compile_err("class A { } class B { }");
    assert!(matches!(
        err,
        CompileError::Syntax {
            encountered: TokenKind::Keyword(_),
            ..
        }
    ));
}

#[test]
fn test_missing_semicolon() {
    let err = compile_err("class Main { function void main() { return } }");
    match err {
        CompileError::Syntax { expected, .. } => assert!(expected.contains("';'")),
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn test_unterminated_string() {
    let err = compile_err("class Main { function void main() { do Output.printString(\"abc\n); return; } }");
    assert!(matches!(
        err,
        CompileError::Lex {
            error: LexError::UnterminatedString { .. },
            ..
        }
    ));
}

#[test]
fn test_integer_out_of_range() {
    let err = compile_err("class Main { function int main() { return 32768; } }");
    match err {
        CompileError::Lex {
            error: LexError::IntegerOverflow { text, .. },
            ..
        } => assert_eq!(text, "32768"),
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn test_largest_integer() {
    let code = compile_str("class Main { function int main() { return 32767; } }").unwrap();
    assert!(code.contains("push constant 32767\n"));
}

#[test]
fn test_unknown_character() {
    let err = compile_err("class Main { function int main() { return 1 # 2; } }");
    assert!(matches!(
        err,
        CompileError::Lex {
            error: LexError::UnknownCharacter { character: '#', .. },
            ..
        }
    ));
}

#[test]
fn test_string_character_out_of_range() {
    let source = "class Main { function void main() { do Output.printString(\"a\u{1F600}\"); return; } }";
    match compile_err(source) {
        CompileError::Lex {
            error: LexError::UnrepresentableCharacter { character, span },
            location,
        } => {
            assert_eq!(character, '\u{1F600}');
            assert_eq!(span.fragment(source), "\u{1F600}");
            assert_eq!(location.line, 1);
        }
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn test_string_too_long() {
    let text = "x".repeat(32768);
    let source = format!("class Main {{ function void main() {{ do Output.printString(\"{text}\"); return; }} }}");
    let err = compile_err(&source);
    assert!(matches!(
        err,
        CompileError::Lex {
            error: LexError::StringTooLong { .. },
            ..
        }
    ));
}

#[test]
fn test_longest_string() {
    let text = "x".repeat(32767);
    let source = format!("class Main {{ function void main() {{ do Output.printString(\"{text}\"); return; }} }}");
    let code = compile_str(&source).unwrap();
    assert!(code.contains("push constant 32767\ncall String.new 1\n"));
}

use linnet::expr::{print_ast, Expr};
use linnet::parser::{parse, parse_expression};
use linnet::reporter::CollectingReporter;
use linnet::scanner::scan_tokens;
use linnet::stmt::Stmt;
use linnet::LiteralValue;
use pretty_assertions::assert_eq;

fn parse_program(code: &str) -> (Vec<Stmt>, Vec<String>) {
    let mut reporter = CollectingReporter::new();
    let tokens = scan_tokens(code, &mut reporter);
    let statements = parse(&tokens, &mut reporter);
    (statements, reporter.messages())
}

fn print_expression(code: &str) -> String {
    let mut reporter = CollectingReporter::new();
    let tokens = scan_tokens(code, &mut reporter);
    let expr = parse_expression(&tokens, &mut reporter)
        .unwrap_or_else(|| panic!("failed to parse {code}: {:?}", reporter.messages()));
    assert!(reporter.syntax_errors.is_empty(), "{:?}", reporter.messages());
    print_ast(&expr)
}

#[test]
fn prints_prefix_form() {
    assert_eq!("(* (- 123) (group 45.67))", print_expression("-123 * (45.67)"));
}

#[test]
fn binary_operators_are_left_associative() {
    assert_eq!("(- (- 1 2) 3)", print_expression("1 - 2 - 3"));
    assert_eq!("(/ (* 8 4) 2)", print_expression("8 * 4 / 2"));
    assert_eq!("(== (== a b) c)", print_expression("a == b == c"));
}

#[test]
fn precedence_levels() {
    assert_eq!("(+ 1 (* 2 3))", print_expression("1 + 2 * 3"));
    assert_eq!("(< (+ 1 2) (- 4 1))", print_expression("1 + 2 < 4 - 1"));
    assert_eq!("(!= (>= a 1) (<= b 2))", print_expression("a >= 1 != b <= 2"));
    assert_eq!("(or a (and b c))", print_expression("a or b and c"));
    assert_eq!("(and (== a 1) (!= b nil))", print_expression("a == 1 and b != nil"));
    assert_eq!("(! (! true))", print_expression("!!true"));
    assert_eq!("(- (- (group x)))", print_expression("--(x)"));
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!("(= a (= b (or c d)))", print_expression("a = b = c or d"));
}

#[test]
fn logical_operators_build_logical_nodes() {
    let mut reporter = CollectingReporter::new();
    let tokens = scan_tokens("x and y", &mut reporter);
    let expr = parse_expression(&tokens, &mut reporter).expect("valid expression");
    assert!(matches!(expr, Expr::Logical { .. }));
}

#[test]
fn parse_expression_rejects_trailing_tokens() {
    let mut reporter = CollectingReporter::new();
    let tokens = scan_tokens("1 + 2 3", &mut reporter);
    assert!(parse_expression(&tokens, &mut reporter).is_none());
    assert_eq!(vec!["[line 1] Error at '3': Expect end of expression.".to_string()], reporter.messages());
}

#[test]
fn var_declarations() {
    let (statements, messages) = parse_program("var a; var b = 2;");
    assert!(messages.is_empty());

    match &statements[..] {
        [Stmt::Var { name: a, initializer: None }, Stmt::Var {
            name: b,
            initializer: Some(Expr::Literal { value }),
        }] => {
            assert_eq!("a", a.lexeme);
            assert_eq!("b", b.lexeme);
            assert_eq!(&LiteralValue::Number(2.0), value);
        }
        other => panic!("unexpected statements: {other:?}"),
    }
}

#[test]
fn for_loop_is_desugared() {
    let (statements, messages) = parse_program("for (var i = 0; i < 3; i = i + 1) print i;");
    assert!(messages.is_empty());
    assert_eq!(1, statements.len());

    let Stmt::Block { statements: outer } = &statements[0] else {
        panic!("expected an enclosing block, got {:?}", statements[0]);
    };
    assert!(matches!(outer[0], Stmt::Var { .. }));

    let Stmt::While { condition, body } = &outer[1] else {
        panic!("expected a while loop, got {:?}", outer[1]);
    };
    assert_eq!("(< i 3)", print_ast(condition));

    let Stmt::Block { statements: inner } = body.as_ref() else {
        panic!("expected a loop body block, got {body:?}");
    };
    assert!(matches!(inner[0], Stmt::Print { .. }));
    match &inner[1] {
        Stmt::Expression { expression } => assert_eq!("(= i (+ i 1))", print_ast(expression)),
        other => panic!("expected the increment, got {other:?}"),
    }
}

#[test]
fn for_loop_without_clauses_loops_forever() {
    let (statements, messages) = parse_program("for (;;) print 1;");
    assert!(messages.is_empty());

    let Stmt::Block { statements: outer } = &statements[0] else {
        panic!("expected an enclosing block, got {:?}", statements[0]);
    };
    assert_eq!(1, outer.len());
    match &outer[0] {
        Stmt::While {
            condition: Expr::Literal { value },
            body,
        } => {
            assert_eq!(&LiteralValue::Boolean(true), value);
            assert!(matches!(body.as_ref(), Stmt::Block { statements } if statements.len() == 1));
        }
        other => panic!("expected an unconditional loop, got {other:?}"),
    }
}

#[test]
fn if_else_and_while() {
    let (statements, messages) = parse_program("if (a) print 1; else { print 2; } while (b) b = false;");
    assert!(messages.is_empty());

    assert!(matches!(
        &statements[0],
        Stmt::If {
            else_branch: Some(_),
            ..
        }
    ));
    assert!(matches!(&statements[1], Stmt::While { .. }));
}

#[test]
fn invalid_assignment_target_keeps_parsing() {
    let (statements, messages) = parse_program("var a = 1;\n(a) = 2;\nprint a;");

    assert_eq!(vec!["[line 2] Error at '=': Invalid assignment target.".to_string()], messages);
    assert_eq!(3, statements.len());
    match &statements[1] {
        Stmt::Expression { expression } => assert_eq!("2", print_ast(expression)),
        other => panic!("expected the right-hand side to survive, got {other:?}"),
    }
}

#[test]
fn synchronizes_after_errors() {
    let code = "\
        var = 1;\n\
        print 1 +;\n\
        print \"fine\";\n\
        var x = (1;\n\
        if x) print 2;\n\
        var y = 3;";

    let (statements, messages) = parse_program(code);

    assert_eq!(
        vec![
            "[line 1] Error at '=': Expect variable name.".to_string(),
            "[line 2] Error at ';': Expect expression.".to_string(),
            "[line 4] Error at ';': Expect ')' after expression.".to_string(),
            "[line 5] Error at 'x': Expect '(' after 'if'.".to_string(),
        ],
        messages
    );
    // recovery stops before `print 2` on line 5, so it survives along with lines 3 and 6
    assert_eq!(3, statements.len());
    assert!(matches!(&statements[0], Stmt::Print { .. }));
    assert!(matches!(&statements[1], Stmt::Print { .. }));
    assert!(matches!(&statements[2], Stmt::Var { name, .. } if name.lexeme == "y"));
}

#[test]
fn reports_errors_at_end_of_input() {
    let (statements, messages) = parse_program("{ print 1;");
    assert!(statements.is_empty());
    assert_eq!(vec!["[line 1] Error at end: Expect '}' after block.".to_string()], messages);

    let (_, messages) = parse_program("print 1");
    assert_eq!(vec!["[line 1] Error at end: Expect ';' after value.".to_string()], messages);
}

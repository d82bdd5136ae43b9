use linnet::environment::Environment;
use linnet::scanner::{Token, TokenType};
use linnet::LiteralValue;
use pretty_assertions::assert_eq;

fn identifier(name: &str, line: u32) -> Token {
    Token {
        token_type: TokenType::Identifier,
        lexeme: name.to_string(),
        literal: None,
        line,
    }
}

#[test]
fn define_and_get() {
    let mut env = Environment::new();
    env.define("a", LiteralValue::from(1.0));
    assert_eq!(Ok(LiteralValue::Number(1.0)), env.get(&identifier("a", 1)));
}

#[test]
fn shadowing_reverts_on_pop() {
    let mut env = Environment::new();
    let a = identifier("a", 1);
    env.define("a", LiteralValue::from("outer"));

    env.push();
    env.define("a", LiteralValue::from("inner"));
    assert_eq!(Ok(LiteralValue::from("inner")), env.get(&a));
    assert_eq!(2, env.depth());

    env.pop();
    assert_eq!(Ok(LiteralValue::from("outer")), env.get(&a));
    assert_eq!(1, env.depth());
}

#[test]
fn assign_updates_the_nearest_binding() {
    let mut env = Environment::new();
    let a = identifier("a", 1);
    env.define("a", LiteralValue::from(1.0));

    env.push();
    env.push();
    env.assign(&a, LiteralValue::from(2.0)).expect("a is defined globally");
    env.pop();
    env.pop();

    assert_eq!(Ok(LiteralValue::Number(2.0)), env.get(&a));
}

#[test]
fn inner_bindings_are_dropped_with_their_scope() {
    let mut env = Environment::new();
    let b = identifier("b", 3);

    env.push();
    env.define("b", LiteralValue::Boolean(true));
    env.pop();

    let error = env.get(&b).expect_err("b went out of scope");
    assert_eq!("Undefined variable 'b'.", error.message);
    assert_eq!(3, error.line);
}

#[test]
fn assign_to_undefined_does_not_declare() {
    let mut env = Environment::new();
    let ghost = identifier("ghost", 7);

    let error = env.assign(&ghost, LiteralValue::Nil).expect_err("ghost was never declared");
    assert_eq!("Undefined variable 'ghost'.", error.message);
    assert_eq!("ghost", error.lexeme);
    assert!(env.get(&ghost).is_err());
}

#[test]
fn reset_to_global_discards_nested_scopes() {
    let mut env = Environment::new();
    env.define("kept", LiteralValue::Nil);
    env.push();
    env.push();
    env.define("lost", LiteralValue::Nil);

    env.reset_to_global();

    assert_eq!(1, env.depth());
    assert_eq!(Ok(LiteralValue::Nil), env.get(&identifier("kept", 1)));
    assert!(env.get(&identifier("lost", 1)).is_err());
}

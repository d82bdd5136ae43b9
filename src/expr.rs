use crate::scanner::Token;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Assign {
        name: Token,
        value: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Grouping {
        expression: Box<Expr>,
    },
    Literal {
        value: LiteralValue,
    },
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Variable {
        name: Token,
    },
}

/// Both the value stored in a literal node and the runtime value produced by evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Boolean(bool),
    Nil,
    Number(f64),
    String(String),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Nil => write!(f, "nil"),
            Self::Number(value) => write!(f, "{}", format_number(*value)),
            Self::String(value) => write!(f, "{value}"),
        }
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> LiteralValue {
        LiteralValue::Number(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> LiteralValue {
        LiteralValue::Boolean(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> LiteralValue {
        LiteralValue::String(value.to_string())
    }
}

// Numbers print the way Lox hosts traditionally do: integral values without a fraction,
// exponent notation outside [1e-6, 1e21), and negative zero as plain `0`.
fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else if value < 0.0 {
        format!("-{}", format_magnitude(-value))
    } else {
        format_magnitude(value)
    }
}

fn format_magnitude(value: f64) -> String {
    // LowerExp yields the shortest round-trip digits, e.g. "1.2345e3"
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    // the decimal point sits after `point` digits
    let point = exponent + 1;
    let count = digits.len() as i32;

    if count <= point && point <= 21 {
        format!("{digits}{}", "0".repeat((point - count) as usize))
    } else if 0 < point && point <= 21 {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{whole}.{fraction}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat(-point as usize))
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{sign}{}", exponent.abs())
        } else {
            format!("{first}.{rest}e{sign}{}", exponent.abs())
        }
    }
}

pub fn print_ast(root: &Expr) -> String {
    let mut printed = String::new();
    format_expr(root, &mut printed);
    printed
}

fn format_expr(expr: &Expr, output: &mut String) {
    match expr {
        Expr::Assign { name, value } => {
            let target = Expr::Variable { name: name.clone() };
            format_subexprs("=", &[&target, value.as_ref()], output);
        }
        Expr::Binary { left, operator, right } | Expr::Logical { left, operator, right } => {
            format_subexprs(&operator.lexeme, &[left.as_ref(), right.as_ref()], output);
        }
        Expr::Grouping { expression } => {
            format_subexprs("group", &[expression.as_ref()], output);
        }
        Expr::Literal { value } => {
            output.push_str(&value.to_string());
        }
        Expr::Unary { operator, right } => {
            format_subexprs(&operator.lexeme, &[right.as_ref()], output);
        }
        Expr::Variable { name } => {
            output.push_str(&name.lexeme);
        }
    }
}

fn format_subexprs(name: &str, exprs: &[&Expr], output: &mut String) {
    output.push('(');
    output.push_str(name);
    for expr in exprs {
        output.push(' ');
        format_expr(expr, output);
    }
    output.push(')');
}

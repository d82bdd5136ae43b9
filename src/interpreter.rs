use crate::environment::Environment;
use crate::error::{RuntimeError, RuntimeResult};
use crate::expr::Expr;
use crate::expr::LiteralValue;
use crate::reporter::{OutputSink, Reporter};
use crate::scanner::Token;
use crate::scanner::TokenType;
use crate::stmt::Stmt;

type ValueResult = RuntimeResult<LiteralValue>;
type StatementResult = RuntimeResult<()>;

/// Walks statements against a chain of scopes. Globals persist across calls to
/// [`Interpreter::interpret`], which is what the interactive prompt relies on.
pub struct Interpreter<'a> {
    env: Environment,
    output: &'a mut dyn OutputSink,
}

impl<'a> Interpreter<'a> {
    pub fn new(output: &'a mut dyn OutputSink) -> Interpreter<'a> {
        Interpreter {
            env: Environment::new(),
            output,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Execute a program. The first runtime error stops the run and is handed to the
    /// reporter; the scope chain is back at the global scope either way.
    pub fn interpret(&mut self, statements: &[Stmt], reporter: &mut dyn Reporter) -> StatementResult {
        for statement in statements {
            if let Err(error) = self.execute_statement(statement) {
                tracing::debug!(line = error.line, "run aborted by runtime error");
                self.env.reset_to_global();
                reporter.runtime_error(&error);
                return Err(error);
            }
        }
        Ok(())
    }

    pub fn evaluate_expression(&mut self, expression: &Expr) -> ValueResult {
        let result = self.evaluate(expression);
        if result.is_err() {
            self.env.reset_to_global();
        }
        result
    }

    fn execute_statement(&mut self, statement: &Stmt) -> StatementResult {
        match statement {
            Stmt::Block { statements } => self.block_statement(statements),
            Stmt::Expression { expression } => self.expression_statement(expression),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => self.if_statement(condition, then_branch, else_branch.as_deref()),
            Stmt::Print { expression } => self.print_statement(expression),
            Stmt::Var { name, initializer } => self.var_statement(name, initializer.as_ref()),
            Stmt::While { condition, body } => self.while_statement(condition, body),
        }
    }

    fn block_statement(&mut self, statements: &[Stmt]) -> StatementResult {
        self.env.push();
        let result = statements
            .iter()
            .try_for_each(|statement| self.execute_statement(statement));

        // make sure to restore the scope chain even after an error
        self.env.pop();
        result
    }

    fn expression_statement(&mut self, expression: &Expr) -> StatementResult {
        self.evaluate(expression)?;
        Ok(())
    }

    fn if_statement(&mut self, condition: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>) -> StatementResult {
        if is_truthy(&self.evaluate(condition)?) {
            self.execute_statement(then_branch)
        } else if let Some(else_statement) = else_branch {
            self.execute_statement(else_statement)
        } else {
            Ok(())
        }
    }

    fn print_statement(&mut self, expression: &Expr) -> StatementResult {
        let result = self.evaluate(expression)?;
        self.output.print(&result.to_string());
        Ok(())
    }

    fn var_statement(&mut self, name: &Token, initializer: Option<&Expr>) -> StatementResult {
        let value = match initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => LiteralValue::Nil,
        };
        self.env.define(&name.lexeme, value);
        Ok(())
    }

    fn while_statement(&mut self, condition: &Expr, body: &Stmt) -> StatementResult {
        while is_truthy(&self.evaluate(condition)?) {
            self.execute_statement(body)?;
        }
        Ok(())
    }

    fn evaluate(&mut self, expression: &Expr) -> ValueResult {
        match expression {
            Expr::Assign { name, value } => self.evaluate_assign(name, value),
            Expr::Binary { left, operator, right } => self.evaluate_binary(left, operator, right),
            Expr::Grouping { expression } => self.evaluate(expression),
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Logical { left, operator, right } => self.evaluate_logical(left, operator, right),
            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),
            Expr::Variable { name } => self.env.get(name),
        }
    }

    fn evaluate_assign(&mut self, name: &Token, value: &Expr) -> ValueResult {
        let result = self.evaluate(value)?;
        self.env.assign(name, result.clone())?;
        Ok(result)
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> ValueResult {
        let left_evaluated = self.evaluate(left)?;
        let right_evaluated = self.evaluate(right)?;

        let evaluated = if is_numeric_binary_operation(operator.token_type) {
            let (left_number, right_number) = match (extract_number(&left_evaluated), extract_number(&right_evaluated)) {
                (Some(left_number), Some(right_number)) => (left_number, right_number),
                _ => return Err(RuntimeError::new(operator, "Operands must be numbers.")),
            };

            match operator.token_type {
                TokenType::Minus => LiteralValue::Number(left_number - right_number),
                TokenType::Slash => LiteralValue::Number(left_number / right_number),
                TokenType::Star => LiteralValue::Number(left_number * right_number),
                TokenType::Plus => LiteralValue::Number(left_number + right_number),
                TokenType::Greater => LiteralValue::Boolean(left_number > right_number),
                TokenType::GreaterEqual => LiteralValue::Boolean(left_number >= right_number),
                TokenType::Less => LiteralValue::Boolean(left_number < right_number),
                TokenType::LessEqual => LiteralValue::Boolean(left_number <= right_number),
                // unhandled case here indicates a bug in the parser or interpreter
                _ => panic!("Unhandled binary numeric operation type: {:?}", operator.token_type),
            }
        } else {
            match operator.token_type {
                TokenType::EqualEqual => LiteralValue::Boolean(left_evaluated == right_evaluated),
                TokenType::BangEqual => LiteralValue::Boolean(left_evaluated != right_evaluated),
                // unhandled case here indicates a bug in the parser or interpreter
                _ => panic!("Unhandled binary non-numeric operation type: {:?}", operator.token_type),
            }
        };
        Ok(evaluated)
    }

    fn evaluate_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> ValueResult {
        let left_evaluated = self.evaluate(left)?;

        // short circuit if possible
        let short_circuit = match operator.token_type {
            TokenType::Or => is_truthy(&left_evaluated),
            TokenType::And => !is_truthy(&left_evaluated),
            _ => panic!("Unhandled logical operator: {:?}", operator.token_type),
        };
        if short_circuit {
            return Ok(left_evaluated);
        }

        self.evaluate(right)
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> ValueResult {
        let operand = self.evaluate(right)?;
        let evaluated = match operator.token_type {
            TokenType::Bang => LiteralValue::Boolean(!is_truthy(&operand)),
            TokenType::Minus => {
                let original = extract_number(&operand)
                    .ok_or_else(|| RuntimeError::new(operator, "Operand must be a number."))?;
                LiteralValue::Number(-original)
            }
            // unhandled case here indicates a bug in the parser or interpreter
            _ => panic!("Unary expression not implemented in interpreter: {:?}", operator),
        };
        Ok(evaluated)
    }
}

fn extract_number(value: &LiteralValue) -> Option<f64> {
    match value {
        LiteralValue::Number(result) => Some(*result),
        _ => None,
    }
}

pub fn is_truthy(value: &LiteralValue) -> bool {
    match value {
        LiteralValue::Nil => false,
        LiteralValue::Boolean(value) => *value,
        _ => true,
    }
}

fn is_numeric_binary_operation(operator: TokenType) -> bool {
    matches!(
        operator,
        TokenType::Minus
            | TokenType::Slash
            | TokenType::Star
            | TokenType::Plus
            | TokenType::Greater
            | TokenType::GreaterEqual
            | TokenType::Less
            | TokenType::LessEqual
    )
}

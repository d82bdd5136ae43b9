use crate::expr::Expr;
use crate::expr::LiteralValue;
use crate::reporter::Reporter;
use crate::scanner::Token;
use crate::scanner::TokenType;
use crate::stmt::Stmt;

type StmtResult = Result<Stmt, ParseError>;
type ExprResult = Result<Expr, ParseError>;

// Unwinds to the nearest declaration boundary. The diagnostic itself has already been
// handed to the reporter when this is created, so it carries nothing.
#[derive(Debug)]
struct ParseError;

/// Parse a whole program. Declarations that fail to parse are reported, skipped up to the
/// next statement boundary and left out of the result.
pub fn parse(tokens: &[Token], reporter: &mut dyn Reporter) -> Vec<Stmt> {
    let mut statements = Vec::new();
    if tokens.is_empty() {
        return statements;
    }

    let mut cursor = TokenCursor::new(tokens, reporter);
    while !cursor.at_end() {
        if let Some(statement) = declaration(&mut cursor) {
            statements.push(statement);
        }
    }

    tracing::debug!(count = statements.len(), "parsed statements");
    statements
}

/// Parse a single expression that must span all of the tokens.
pub fn parse_expression(tokens: &[Token], reporter: &mut dyn Reporter) -> Option<Expr> {
    if tokens.is_empty() {
        return None;
    }

    let mut cursor = TokenCursor::new(tokens, reporter);
    let expr = expression(&mut cursor).ok()?;
    if !cursor.at_end() {
        let trailing = cursor.peek();
        cursor.error(trailing, "Expect end of expression.");
        return None;
    }
    Some(expr)
}

fn declaration(cursor: &mut TokenCursor) -> Option<Stmt> {
    let result = if cursor.advance_if_match(TokenType::Var).is_some() {
        var_declaration(cursor)
    } else {
        statement(cursor)
    };

    match result {
        Ok(statement) => Some(statement),
        Err(ParseError) => {
            cursor.synchronize();
            None
        }
    }
}

fn var_declaration(cursor: &mut TokenCursor) -> StmtResult {
    let name = cursor.consume(TokenType::Identifier, "Expect variable name.")?;

    let initializer = if cursor.advance_if_match(TokenType::Equal).is_some() {
        Some(expression(cursor)?)
    } else {
        None
    };

    cursor.consume(TokenType::Semicolon, "Expect ';' after variable declaration.")?;
    Ok(Stmt::Var { name, initializer })
}

fn statement(cursor: &mut TokenCursor) -> StmtResult {
    let keyword = cursor.peek().token_type;
    let parse_rest: fn(&mut TokenCursor) -> StmtResult = match keyword {
        TokenType::For => for_statement,
        TokenType::If => if_statement,
        TokenType::Print => print_statement,
        TokenType::While => while_statement,
        TokenType::LeftBrace => block_statement,
        _ => return expression_statement(cursor),
    };
    cursor.advance();
    parse_rest(cursor)
}

// for (init; cond; incr) body  =>  { init; while (cond) { body; incr; } }
fn for_statement(cursor: &mut TokenCursor) -> StmtResult {
    cursor.consume(TokenType::LeftParen, "Expect '(' after 'for'.")?;

    let initializer = if cursor.advance_if_match(TokenType::Semicolon).is_some() {
        None
    } else if cursor.advance_if_match(TokenType::Var).is_some() {
        Some(var_declaration(cursor)?)
    } else {
        Some(expression_statement(cursor)?)
    };

    let condition = if cursor.check(TokenType::Semicolon) {
        Expr::Literal {
            value: LiteralValue::Boolean(true),
        }
    } else {
        expression(cursor)?
    };
    cursor.consume(TokenType::Semicolon, "Expect ';' after loop condition.")?;

    let increment = if cursor.check(TokenType::RightParen) {
        None
    } else {
        Some(expression(cursor)?)
    };
    cursor.consume(TokenType::RightParen, "Expect ')' after for clauses.")?;

    let mut body = vec![statement(cursor)?];
    if let Some(expression) = increment {
        body.push(Stmt::Expression { expression });
    }

    let mut statements = Vec::new();
    if let Some(initializer) = initializer {
        statements.push(initializer);
    }
    statements.push(Stmt::While {
        condition,
        body: Box::new(Stmt::Block { statements: body }),
    });

    Ok(Stmt::Block { statements })
}

fn if_statement(cursor: &mut TokenCursor) -> StmtResult {
    cursor.consume(TokenType::LeftParen, "Expect '(' after 'if'.")?;
    let condition = expression(cursor)?;
    cursor.consume(TokenType::RightParen, "Expect ')' after if condition.")?;

    let then_branch = Box::new(statement(cursor)?);
    let else_branch = if cursor.advance_if_match(TokenType::Else).is_some() {
        Some(Box::new(statement(cursor)?))
    } else {
        None
    };

    Ok(Stmt::If {
        condition,
        then_branch,
        else_branch,
    })
}

fn print_statement(cursor: &mut TokenCursor) -> StmtResult {
    let expression = expression(cursor)?;
    cursor.consume(TokenType::Semicolon, "Expect ';' after value.")?;
    Ok(Stmt::Print { expression })
}

fn while_statement(cursor: &mut TokenCursor) -> StmtResult {
    cursor.consume(TokenType::LeftParen, "Expect '(' after 'while'.")?;
    let condition = expression(cursor)?;
    cursor.consume(TokenType::RightParen, "Expect ')' after condition.")?;
    let body = Box::new(statement(cursor)?);
    Ok(Stmt::While { condition, body })
}

fn expression_statement(cursor: &mut TokenCursor) -> StmtResult {
    let expression = expression(cursor)?;
    cursor.consume(TokenType::Semicolon, "Expect ';' after expression.")?;
    Ok(Stmt::Expression { expression })
}

fn block_statement(cursor: &mut TokenCursor) -> StmtResult {
    let mut statements = Vec::new();
    while !cursor.check(TokenType::RightBrace) && !cursor.at_end() {
        if let Some(statement) = declaration(cursor) {
            statements.push(statement);
        }
    }
    cursor.consume(TokenType::RightBrace, "Expect '}' after block.")?;
    Ok(Stmt::Block { statements })
}

fn expression(cursor: &mut TokenCursor) -> ExprResult {
    assignment(cursor)
}

fn assignment(cursor: &mut TokenCursor) -> ExprResult {
    let expr = or(cursor)?;

    if let Some(equals) = cursor.advance_if_match(TokenType::Equal) {
        let value = assignment(cursor)?;

        return match expr {
            Expr::Variable { name } => Ok(Expr::Assign {
                name,
                value: Box::new(value),
            }),
            // reported, but the statement is still well formed so no need to synchronize
            _ => {
                cursor.error(&equals, "Invalid assignment target.");
                Ok(value)
            }
        };
    }

    Ok(expr)
}

fn or(cursor: &mut TokenCursor) -> ExprResult {
    left_associative(cursor, and, &[TokenType::Or], logical)
}

fn and(cursor: &mut TokenCursor) -> ExprResult {
    left_associative(cursor, equality, &[TokenType::And], logical)
}

fn equality(cursor: &mut TokenCursor) -> ExprResult {
    left_associative(
        cursor,
        comparison,
        &[TokenType::BangEqual, TokenType::EqualEqual],
        binary,
    )
}

fn comparison(cursor: &mut TokenCursor) -> ExprResult {
    left_associative(
        cursor,
        addition,
        &[
            TokenType::Greater,
            TokenType::GreaterEqual,
            TokenType::Less,
            TokenType::LessEqual,
        ],
        binary,
    )
}

fn addition(cursor: &mut TokenCursor) -> ExprResult {
    left_associative(cursor, multiplication, &[TokenType::Minus, TokenType::Plus], binary)
}

fn multiplication(cursor: &mut TokenCursor) -> ExprResult {
    left_associative(cursor, unary, &[TokenType::Slash, TokenType::Star], binary)
}

// Parse a left associative chain as long as the current token matches one of the given types
fn left_associative(
    cursor: &mut TokenCursor,
    higher_precedence: fn(&mut TokenCursor) -> ExprResult,
    types: &[TokenType],
    build: fn(Expr, Token, Expr) -> Expr,
) -> ExprResult {
    let mut expr = higher_precedence(cursor)?;

    while let Some(operator) = cursor.advance_if_any_match(types) {
        let right = higher_precedence(cursor)?;
        expr = build(expr, operator, right);
    }

    Ok(expr)
}

fn binary(left: Expr, operator: Token, right: Expr) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }
}

fn logical(left: Expr, operator: Token, right: Expr) -> Expr {
    Expr::Logical {
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }
}

fn unary(cursor: &mut TokenCursor) -> ExprResult {
    if let Some(operator) = cursor.advance_if_any_match(&[TokenType::Bang, TokenType::Minus]) {
        let right = unary(cursor)?;
        return Ok(Expr::Unary {
            operator,
            right: Box::new(right),
        });
    }

    primary(cursor)
}

fn primary(cursor: &mut TokenCursor) -> ExprResult {
    let current = cursor.peek();

    let expr = match current.token_type {
        TokenType::False => Expr::Literal {
            value: LiteralValue::Boolean(false),
        },
        TokenType::True => Expr::Literal {
            value: LiteralValue::Boolean(true),
        },
        TokenType::Nil => Expr::Literal {
            value: LiteralValue::Nil,
        },
        TokenType::Number | TokenType::String => Expr::Literal {
            value: current.literal.clone().unwrap_or(LiteralValue::Nil),
        },
        TokenType::Identifier => Expr::Variable {
            name: current.clone(),
        },
        TokenType::LeftParen => {
            cursor.advance();
            let expr = expression(cursor)?;
            cursor.consume(TokenType::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping {
                expression: Box::new(expr),
            });
        }
        _ => return Err(cursor.error(current, "Expect expression.")),
    };

    cursor.advance();
    Ok(expr)
}

struct TokenCursor<'t, 'r> {
    tokens: &'t [Token],
    index: usize,
    reporter: &'r mut dyn Reporter,
}

impl<'t, 'r> TokenCursor<'t, 'r> {
    // callers guarantee a non-empty, Eof terminated token slice
    fn new(tokens: &'t [Token], reporter: &'r mut dyn Reporter) -> TokenCursor<'t, 'r> {
        TokenCursor {
            tokens,
            index: 0,
            reporter,
        }
    }

    fn peek(&self) -> &'t Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.index.min(last)]
    }

    fn previous(&self) -> &'t Token {
        &self.tokens[self.index.saturating_sub(1)]
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.index += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.peek().token_type == token_type
    }

    fn advance_if_match(&mut self, token_type: TokenType) -> Option<Token> {
        self.advance_if_any_match(&[token_type])
    }

    fn advance_if_any_match(&mut self, types: &[TokenType]) -> Option<Token> {
        let token = self.peek();
        if types.contains(&token.token_type) {
            self.advance();
            Some(token.clone())
        } else {
            None
        }
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> Result<Token, ParseError> {
        if let Some(token) = self.advance_if_match(token_type) {
            return Ok(token);
        }
        let current = self.peek();
        Err(self.error(current, message))
    }

    fn error(&mut self, token: &Token, message: &str) -> ParseError {
        self.reporter.token_error(token, message);
        ParseError
    }

    // Discard tokens until just after a semicolon or right before a statement keyword.
    fn synchronize(&mut self) {
        self.advance();

        while !self.at_end() {
            if self.previous().token_type == TokenType::Semicolon {
                return;
            }

            match self.peek().token_type {
                TokenType::Class
                | TokenType::Fun
                | TokenType::Var
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return => return,
                _ => self.advance(),
            }
        }
    }
}

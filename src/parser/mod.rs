use crate::ast::*;
use crate::error::{Error, Result, SourceLocation};
use crate::lexer::{Token, TokenKind};
use crate::value::Value;

/// Recursive descent parser with one function per precedence level
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })) {
            let location = tokens.last().map(|t| t.location).unwrap_or(SourceLocation::new(1, 1));
            tokens.push(Token {
                kind: TokenKind::Eof,
                location,
            });
        }
        Self { tokens, current: 0 }
    }

    /// Parse a complete program: one or more blocks
    pub fn parse(&mut self) -> Result<Program> {
        let mut blocks = Vec::new();

        loop {
            blocks.push(self.parse_rule()?);
            if self.is_at_end() {
                break;
            }
        }

        Ok(Program::new(blocks))
    }

    /// Parse `BEGIN {...}`, `END {...}`, `pattern {...}` or `{...}`
    fn parse_rule(&mut self) -> Result<Block> {
        let location = self.current_location();

        if self.match_token(&TokenKind::Begin) {
            let statements = self.parse_braced()?;
            return Ok(Block::new(BlockKind::Begin, None, statements, location));
        }

        if self.match_token(&TokenKind::End) {
            let statements = self.parse_braced()?;
            return Ok(Block::new(BlockKind::End, None, statements, location));
        }

        let pattern = if self.check(&TokenKind::LeftBrace) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let statements = self.parse_braced()?;

        Ok(Block::new(BlockKind::Main, pattern, statements, location))
    }

    /// Parse `{ statement* }`
    fn parse_braced(&mut self) -> Result<Vec<Stmt>> {
        self.expect(&TokenKind::LeftBrace)?;

        let mut statements = Vec::new();
        while !self.check(&TokenKind::RightBrace) {
            if self.is_at_end() {
                return Err(self.unexpected());
            }
            if let Some(stmt) = self.parse_statement()? {
                statements.push(stmt);
            }
        }

        self.expect(&TokenKind::RightBrace)?;
        Ok(statements)
    }

    /// Parse a single statement. A bare `;` yields `None`.
    fn parse_statement(&mut self) -> Result<Option<Stmt>> {
        let location = self.current_location();

        let stmt = match self.peek_kind() {
            TokenKind::Semicolon => {
                self.advance();
                return Ok(None);
            }
            TokenKind::LeftBrace => {
                let statements = self.parse_braced()?;
                Stmt::Block(Block::new(BlockKind::Main, None, statements, location))
            }
            TokenKind::If => self.parse_if_statement(location)?,
            TokenKind::For => self.parse_for_statement(location)?,
            TokenKind::Break => {
                self.advance();
                self.expect(&TokenKind::Semicolon)?;
                Stmt::Break { location }
            }
            TokenKind::Print => self.parse_print_statement(location)?,
            TokenKind::Identifier(_) | TokenKind::Increment | TokenKind::Decrement => {
                self.parse_simple_statement()?
            }
            _ => return Err(self.unexpected()),
        };

        Ok(Some(stmt))
    }

    /// Assignment or increment: the statements allowed in a for header
    fn parse_simple_statement(&mut self) -> Result<Stmt> {
        let location = self.current_location();

        if let Some(op) = self.match_increment() {
            let name = self.expect_identifier()?;
            return Ok(Stmt::Increment {
                name,
                op,
                fixity: Fixity::Prefix,
                location,
            });
        }

        let name = self.expect_identifier()?;

        if let Some(op) = self.match_increment() {
            return Ok(Stmt::Increment {
                name,
                op,
                fixity: Fixity::Postfix,
                location,
            });
        }

        let op = match self.peek_kind() {
            TokenKind::Assign => AssignOp::Assign,
            TokenKind::PlusAssign => AssignOp::AddAssign,
            TokenKind::MinusAssign => AssignOp::SubAssign,
            TokenKind::StarAssign => AssignOp::MulAssign,
            TokenKind::SlashAssign => AssignOp::DivAssign,
            TokenKind::PercentAssign => AssignOp::ModAssign,
            _ => return Err(self.unexpected()),
        };
        self.advance();
        let value = self.parse_expression()?;

        Ok(Stmt::Assign {
            name,
            op,
            value,
            location,
        })
    }

    fn match_increment(&mut self) -> Option<IncrementOp> {
        if self.match_token(&TokenKind::Increment) {
            Some(IncrementOp::Increment)
        } else if self.match_token(&TokenKind::Decrement) {
            Some(IncrementOp::Decrement)
        } else {
            None
        }
    }

    fn parse_if_statement(&mut self, location: SourceLocation) -> Result<Stmt> {
        self.expect(&TokenKind::If)?;
        self.expect(&TokenKind::LeftParen)?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RightParen)?;

        let then_branch = self.parse_statement()?.into_iter().collect();

        // `if (c) stmt; else stmt` - semicolons may sit before the else
        let saved = self.current;
        while self.match_token(&TokenKind::Semicolon) {}
        let else_branch = if self.match_token(&TokenKind::Else) {
            Some(self.parse_statement()?.into_iter().collect())
        } else {
            self.current = saved;
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location,
        })
    }

    fn parse_for_statement(&mut self, location: SourceLocation) -> Result<Stmt> {
        self.expect(&TokenKind::For)?;
        self.expect(&TokenKind::LeftParen)?;

        let init = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_simple_statement()?))
        };
        self.expect(&TokenKind::Semicolon)?;

        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon)?;

        let update = if self.check(&TokenKind::RightParen) {
            None
        } else {
            Some(Box::new(self.parse_simple_statement()?))
        };
        self.expect(&TokenKind::RightParen)?;

        // A braced body is flattened into the loop's statement list
        let body = match self.parse_statement()? {
            Some(Stmt::Block(block)) => block.statements,
            Some(stmt) => vec![stmt],
            None => Vec::new(),
        };

        Ok(Stmt::For {
            init,
            condition,
            update,
            body,
            location,
        })
    }

    fn parse_print_statement(&mut self, location: SourceLocation) -> Result<Stmt> {
        self.expect(&TokenKind::Print)?;

        let mut args = vec![self.parse_expression()?];
        while self.match_token(&TokenKind::Comma) {
            args.push(self.parse_expression()?);
        }

        Ok(Stmt::Print { args, location })
    }

    // ===== Expressions, lowest precedence first =====

    pub(crate) fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr> {
        self.parse_binary_level(Self::parse_and, &[(TokenKind::Or, BinaryOp::Or)])
    }

    fn parse_and(&mut self) -> Result<Expr> {
        self.parse_binary_level(Self::parse_equality, &[(TokenKind::And, BinaryOp::And)])
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        self.parse_binary_level(
            Self::parse_comparison,
            &[(TokenKind::Equal, BinaryOp::Eq), (TokenKind::NotEqual, BinaryOp::Ne)],
        )
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        self.parse_binary_level(
            Self::parse_additive,
            &[
                (TokenKind::Less, BinaryOp::Lt),
                (TokenKind::LessEqual, BinaryOp::Le),
                (TokenKind::Greater, BinaryOp::Gt),
                (TokenKind::GreaterEqual, BinaryOp::Ge),
            ],
        )
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        self.parse_binary_level(
            Self::parse_multiplicative,
            &[(TokenKind::Plus, BinaryOp::Add), (TokenKind::Minus, BinaryOp::Sub)],
        )
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        self.parse_binary_level(
            Self::parse_not,
            &[
                (TokenKind::Star, BinaryOp::Mul),
                (TokenKind::Slash, BinaryOp::Div),
                (TokenKind::Percent, BinaryOp::Mod),
            ],
        )
    }

    /// One left-associative level: `next (op next)*`
    fn parse_binary_level(
        &mut self,
        next: fn(&mut Self) -> Result<Expr>,
        ops: &[(TokenKind, BinaryOp)],
    ) -> Result<Expr> {
        let mut left = next(self)?;

        'outer: loop {
            for (kind, op) in ops {
                if self.check(kind) {
                    let location = self.current_location();
                    self.advance();
                    let right = next(self)?;
                    left = Expr::Binary {
                        left: Box::new(left),
                        op: *op,
                        right: Box::new(right),
                        location,
                    };
                    continue 'outer;
                }
            }
            break;
        }

        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr> {
        let location = self.current_location();
        if self.match_token(&TokenKind::Not) {
            let operand = self.parse_not()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                location,
            });
        }
        self.parse_negation()
    }

    fn parse_negation(&mut self) -> Result<Expr> {
        let location = self.current_location();
        if self.match_token(&TokenKind::Minus) {
            let operand = self.parse_not()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
                location,
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let location = self.current_location();

        let expr = match self.peek_kind().clone() {
            TokenKind::Integer(n) => Expr::Literal(Value::Integer(n), location),
            TokenKind::Float(n) => Expr::Literal(Value::Float(n), location),
            TokenKind::String(s) => Expr::Literal(Value::Str(s), location),
            TokenKind::Identifier(name) => Expr::Var(name, location),
            TokenKind::Dollar => {
                self.advance();
                let index = self.parse_field_index()?;
                return Ok(Expr::Field(Box::new(index), location));
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(&TokenKind::RightParen)?;
                return Ok(expr);
            }
            _ => return Err(self.unexpected()),
        };

        self.advance();
        Ok(expr)
    }

    /// `$` takes a numeric literal or a variable name
    fn parse_field_index(&mut self) -> Result<Expr> {
        let location = self.current_location();
        let index = match self.peek_kind().clone() {
            TokenKind::Integer(n) => Expr::Literal(Value::Integer(n), location),
            TokenKind::Float(n) => Expr::Literal(Value::Float(n), location),
            TokenKind::Identifier(name) => Expr::Var(name, location),
            other => {
                return Err(Error::syntax(
                    format!("expected number or identifier after '$', found {}", other.describe()),
                    location,
                ));
            }
        };
        self.advance();
        Ok(index)
    }

    // ===== Helper methods =====

    fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.current].kind
    }

    fn current_location(&self) -> SourceLocation {
        self.tokens[self.current].location
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(kind)
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(Error::syntax(
                format!("expected {}, found {}", kind.describe(), self.peek_kind().describe()),
                self.current_location(),
            ))
        }
    }

    fn expect_identifier(&mut self) -> Result<String> {
        if let TokenKind::Identifier(name) = self.peek_kind() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(Error::syntax(
                format!("expected identifier, found {}", self.peek_kind().describe()),
                self.current_location(),
            ))
        }
    }

    fn unexpected(&self) -> Error {
        Error::syntax(
            format!("unexpected {}", self.peek_kind().describe()),
            self.current_location(),
        )
    }
}

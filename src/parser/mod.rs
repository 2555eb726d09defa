//! Recursive-descent parser over a pre-lexed [`Token`] stream, grounded on
//! `ast_generator.cpp`'s precedence ladder and `factor_identifier()`/
//! `switch_statement()` disambiguation logic.

mod cursor;
mod error;

pub use cursor::TokenCursor;
pub use error::ParseError;

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::ast::{
    AssignOp, AssignmentExpression, BinOp, BinaryExpression, CaseLabel, Callee, CallExpression,
    ConditionalExpression, Expression, FunctionDeclaration, MemberExpression, MemberProperty,
    Program, Statement, SwitchCase, UnaryExpression, UnaryOp,
};
use crate::token::{Token, TokenKind};

/// Parses a token stream into a [`Program`].
///
/// `developer_mode` controls whether `/# ... #/` blocks are retained in the
/// AST or parsed-and-discarded, mirroring the real toolchain's developer-build
/// switch.
pub struct Parser {
    cursor: TokenCursor,
    developer_mode: bool,
    current_animtree: Option<String>,
}

impl Parser {
    #[must_use]
    pub fn new(tokens: Vec<Token>, developer_mode: bool) -> Self {
        Self { cursor: TokenCursor::new(tokens), developer_mode, current_animtree: None }
    }

    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut functions = Vec::new();
        while !self.cursor.check(&TokenKind::Eof) {
            if self.cursor.check(&TokenKind::Hash) {
                self.parse_directive()?;
                continue;
            }
            functions.push(self.parse_function_declaration()?);
        }
        Ok(Program { functions })
    }

    // ---- top level -----------------------------------------------------

    fn parse_directive(&mut self) -> Result<(), ParseError> {
        let hash = self.expect(TokenKind::Hash)?;
        if self.cursor.check(&TokenKind::UsingAnimtree) {
            self.cursor.advance();
            self.expect(TokenKind::LParen)?;
            let name = self.expect(TokenKind::StringLiteral)?.lexeme;
            self.expect(TokenKind::RParen)?;
            self.expect(TokenKind::Semicolon)?;
            self.current_animtree = Some(name);
            return Ok(());
        }
        let found = self.cursor.peek().clone();
        Err(ParseError::UnknownDirective {
            name: found.lexeme,
            file: hash.file.to_string(),
            line: hash.line,
        })
    }

    fn parse_function_declaration(&mut self) -> Result<FunctionDeclaration, ParseError> {
        let name = self.expect_identifier_name()?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.cursor.check(&TokenKind::RParen) {
            loop {
                params.push(self.expect_identifier_name()?);
                if self.cursor.check(&TokenKind::Comma) {
                    self.cursor.advance();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block_statements()?;
        Ok(FunctionDeclaration { name, params, body })
    }

    // ---- statements ------------------------------------------------------

    fn parse_block_statements(&mut self) -> Result<Vec<Statement>, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.cursor.peek_kind() {
            TokenKind::Semicolon => {
                self.cursor.advance();
                Ok(Statement::Empty)
            }
            TokenKind::LBrace => Ok(Statement::Block(self.parse_block_statements()?)),
            TokenKind::DevBlockStart => self.parse_developer_block(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Do => {
                let token = self.cursor.peek().clone();
                Err(ParseError::UnhandledStatement {
                    statement: "do while",
                    file: token.file.to_string(),
                    line: token.line,
                })
            }
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                self.cursor.advance();
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Break)
            }
            TokenKind::Continue => {
                self.cursor.advance();
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Continue)
            }
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Wait => {
                self.cursor.advance();
                let duration = self.parse_expression()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Wait(duration))
            }
            TokenKind::WaitTillFrameEnd => {
                self.cursor.advance();
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::WaitTillFrameEnd)
            }
            _ => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Expression(expr))
            }
        }
    }

    fn parse_developer_block(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::DevBlockStart)?;
        let mut statements = Vec::new();
        while !self.cursor.check(&TokenKind::DevBlockEnd) {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::DevBlockEnd)?;
        if self.developer_mode {
            Ok(Statement::DeveloperBlock(statements))
        } else {
            Ok(Statement::Empty)
        }
    }

    fn parse_if(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let consequent = Box::new(self.parse_statement()?);
        let alternative = if self.cursor.check(&TokenKind::Else) {
            self.cursor.advance();
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Statement::If { test, consequent, alternative })
    }

    fn parse_while(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let test = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::While { test, body })
    }

    fn parse_for(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;
        let init = if self.cursor.check(&TokenKind::Semicolon) {
            None
        } else {
            let expr = self.parse_expression()?;
            Some(Box::new(Statement::Expression(expr)))
        };
        self.expect(TokenKind::Semicolon)?;
        let test = if self.cursor.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Semicolon)?;
        let update = if self.cursor.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::For { init, test, update, body })
    }

    fn parse_return(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::Return)?;
        let value = if self.cursor.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Statement::Return(value))
    }

    /// Pending-case fallthrough algorithm: `active` never resets on a new
    /// `case`/`default` header, only on `break`. A case header joining an
    /// already-populated run shares that run's body `Rc` outright, so it
    /// observably inherits statements emitted before it joined.
    fn parse_switch(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::Switch)?;
        self.expect(TokenKind::LParen)?;
        let discriminant = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;

        let mut cases: Vec<SwitchCase> = Vec::new();
        let mut current_body: Rc<RefCell<Vec<Statement>>> = Rc::new(RefCell::new(Vec::new()));

        loop {
            match self.cursor.peek_kind() {
                TokenKind::RBrace => {
                    self.cursor.advance();
                    break;
                }
                TokenKind::Case => {
                    self.cursor.advance();
                    let label = self.parse_case_label()?;
                    self.expect(TokenKind::Colon)?;
                    cases.push(SwitchCase { test: Some(label), body: current_body.clone() });
                }
                TokenKind::Default => {
                    self.cursor.advance();
                    self.expect(TokenKind::Colon)?;
                    cases.push(SwitchCase { test: None, body: current_body.clone() });
                }
                TokenKind::Break => {
                    self.cursor.advance();
                    self.expect(TokenKind::Semicolon)?;
                    current_body = Rc::new(RefCell::new(Vec::new()));
                }
                _ => {
                    let statement = self.parse_statement()?;
                    current_body.borrow_mut().push(statement);
                }
            }
        }
        Ok(Statement::Switch { discriminant, cases })
    }

    fn parse_case_label(&mut self) -> Result<CaseLabel, ParseError> {
        match self.cursor.peek_kind() {
            TokenKind::IntegerLiteral => {
                let token = self.cursor.advance();
                Ok(CaseLabel::Integer(token.lexeme.parse().unwrap_or(0)))
            }
            TokenKind::StringLiteral => {
                let token = self.cursor.advance();
                Ok(CaseLabel::String(token.lexeme))
            }
            _ => {
                let token = self.cursor.peek().clone();
                Err(ParseError::InvalidFactor {
                    found: token.kind,
                    file: token.file.to_string(),
                    line: token.line,
                })
            }
        }
    }

    // ---- expressions: precedence ladder ---------------------------------

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expression, ParseError> {
        let lhs = self.parse_ternary()?;
        let op = match self.cursor.peek_kind() {
            TokenKind::Assign => AssignOp::Assign,
            TokenKind::PlusAssign => AssignOp::AddAssign,
            TokenKind::MinusAssign => AssignOp::SubAssign,
            TokenKind::StarAssign => AssignOp::MulAssign,
            TokenKind::SlashAssign => AssignOp::DivAssign,
            TokenKind::AndAssign => AssignOp::AndAssign,
            TokenKind::OrAssign => AssignOp::OrAssign,
            TokenKind::XorAssign => AssignOp::XorAssign,
            TokenKind::PercentAssign => AssignOp::ModAssign,
            _ => return Ok(lhs),
        };
        self.cursor.advance();
        // right-associative: the rhs may itself be a chained assignment
        let rhs = self.parse_assignment()?;
        Ok(Expression::Assignment(Box::new(AssignmentExpression { op, lhs, rhs })))
    }

    fn parse_ternary(&mut self) -> Result<Expression, ParseError> {
        let test = self.parse_logical_or()?;
        if !self.cursor.check(&TokenKind::Question) {
            return Ok(test);
        }
        self.cursor.advance();
        let consequent = self.parse_assignment()?;
        self.expect(TokenKind::Colon)?;
        let alternative = self.parse_ternary()?;
        Ok(Expression::Conditional(Box::new(ConditionalExpression { test, consequent, alternative })))
    }

    fn parse_logical_or(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_logical_and()?;
        while self.cursor.check(&TokenKind::OrOr) {
            self.cursor.advance();
            let right = self.parse_logical_and()?;
            left = binary(BinOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_bitwise_or()?;
        while self.cursor.check(&TokenKind::AndAnd) {
            self.cursor.advance();
            let right = self.parse_bitwise_or()?;
            left = binary(BinOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_bitwise_or(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_bitwise_xor()?;
        while self.cursor.check(&TokenKind::Pipe) {
            self.cursor.advance();
            let right = self.parse_bitwise_xor()?;
            left = binary(BinOp::BitOr, left, right);
        }
        Ok(left)
    }

    fn parse_bitwise_xor(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_bitwise_and()?;
        while self.cursor.check(&TokenKind::Caret) {
            self.cursor.advance();
            let right = self.parse_bitwise_and()?;
            left = binary(BinOp::BitXor, left, right);
        }
        Ok(left)
    }

    fn parse_bitwise_and(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_relational()?;
        while self.cursor.check(&TokenKind::Ampersand) {
            self.cursor.advance();
            let right = self.parse_relational()?;
            left = binary(BinOp::BitAnd, left, right);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_shift()?;
        loop {
            let op = match self.cursor.peek_kind() {
                TokenKind::Eq => BinOp::Eq,
                TokenKind::Ne => BinOp::Ne,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::Ge => BinOp::Ge,
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Le => BinOp::Le,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_shift()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_shift(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.cursor.peek_kind() {
                TokenKind::Shl => BinOp::Shl,
                TokenKind::Shr => BinOp::Shr,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.cursor.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_member_chain()?;
        loop {
            let op = match self.cursor.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_member_chain()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    /// `.field` / `[index]` chains, then call-suffix disambiguation (direct
    /// call, threaded/plain method call, function-pointer call).
    fn parse_member_chain(&mut self) -> Result<Expression, ParseError> {
        let mut expr = self.parse_postfix()?;
        loop {
            match self.cursor.peek_kind() {
                TokenKind::Dot => {
                    self.cursor.advance();
                    let name = self.expect_identifier_name()?;
                    expr = Expression::Member(Box::new(MemberExpression {
                        object: expr,
                        property: MemberProperty::Name(name),
                    }));
                }
                TokenKind::LBracket => {
                    self.cursor.advance();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expression::Member(Box::new(MemberExpression {
                        object: expr,
                        property: MemberProperty::Computed(index),
                    }));
                }
                _ => break,
            }
        }
        self.parse_call_suffix(expr)
    }

    fn parse_call_suffix(&mut self, expr: Expression) -> Result<Expression, ParseError> {
        if self.cursor.check(&TokenKind::LParen) {
            if let Expression::Identifier { name, file_reference } = &expr {
                self.cursor.advance();
                let arguments = self.parse_arguments()?;
                return Ok(Expression::Call(Box::new(CallExpression {
                    callee: Callee::Name { file_reference: file_reference.clone(), name: name.clone() },
                    object: None,
                    threaded: false,
                    arguments,
                })));
            }
            return Ok(expr);
        }
        if self.cursor.check(&TokenKind::Thread) {
            self.cursor.advance();
            return self.parse_method_or_function_pointer_call(Some(expr), true);
        }
        if self.cursor.check(&TokenKind::Identifier) || self.cursor.check(&TokenKind::DoubleLBracket) {
            return self.parse_method_or_function_pointer_call(Some(expr), false);
        }
        Ok(expr)
    }

    fn parse_method_or_function_pointer_call(
        &mut self,
        receiver: Option<Expression>,
        threaded: bool,
    ) -> Result<Expression, ParseError> {
        if self.cursor.check(&TokenKind::DoubleLBracket) {
            self.cursor.advance();
            let pointer = self.parse_expression()?;
            self.expect(TokenKind::DoubleRBracket)?;
            self.expect(TokenKind::LParen)?;
            let arguments = self.parse_arguments()?;
            return Ok(Expression::Call(Box::new(CallExpression {
                callee: Callee::FunctionPointer(pointer),
                object: receiver,
                threaded,
                arguments,
            })));
        }
        let (file_reference, name) = self.parse_qualified_name()?;
        self.expect(TokenKind::LParen)?;
        let arguments = self.parse_arguments()?;
        Ok(Expression::Call(Box::new(CallExpression {
            callee: Callee::Name { file_reference, name },
            object: receiver,
            threaded,
            arguments,
        })))
    }

    fn parse_qualified_name(&mut self) -> Result<(Option<String>, String), ParseError> {
        let first = self.expect_identifier_name()?;
        if self.cursor.check(&TokenKind::DoubleColon) {
            self.cursor.advance();
            let second = self.expect_identifier_name()?;
            Ok((Some(first), second))
        } else {
            Ok((None, first))
        }
    }

    fn parse_arguments(&mut self) -> Result<SmallVec<[Expression; 4]>, ParseError> {
        let mut arguments = SmallVec::new();
        if !self.cursor.check(&TokenKind::RParen) {
            loop {
                arguments.push(self.parse_assignment()?);
                if self.cursor.check(&TokenKind::Comma) {
                    self.cursor.advance();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(arguments)
    }

    fn parse_postfix(&mut self) -> Result<Expression, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            let op = match self.cursor.peek_kind() {
                TokenKind::PlusPlus => UnaryOp::Increment,
                TokenKind::MinusMinus => UnaryOp::Decrement,
                _ => break,
            };
            self.cursor.advance();
            expr = Expression::Unary(Box::new(UnaryExpression { op, prefix: false, argument: expr }));
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let token = self.cursor.peek().clone();
        match token.kind {
            TokenKind::Minus => {
                self.cursor.advance();
                let argument = self.parse_member_chain()?;
                Ok(Expression::Unary(Box::new(UnaryExpression { op: UnaryOp::Negate, prefix: true, argument })))
            }
            TokenKind::Bang => {
                self.cursor.advance();
                let argument = self.parse_member_chain()?;
                Ok(Expression::Unary(Box::new(UnaryExpression {
                    op: UnaryOp::LogicalNot,
                    prefix: true,
                    argument,
                })))
            }
            TokenKind::Tilde => {
                self.cursor.advance();
                let argument = self.parse_member_chain()?;
                Ok(Expression::Unary(Box::new(UnaryExpression {
                    op: UnaryOp::BitwiseNot,
                    prefix: true,
                    argument,
                })))
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = if token.kind == TokenKind::PlusPlus { UnaryOp::Increment } else { UnaryOp::Decrement };
                self.cursor.advance();
                let argument = self.parse_member_chain()?;
                Ok(Expression::Unary(Box::new(UnaryExpression { op, prefix: true, argument })))
            }
            TokenKind::IntegerLiteral => {
                self.cursor.advance();
                let value = token.lexeme.parse().unwrap_or(0);
                Ok(Expression::IntegerLiteral(value))
            }
            TokenKind::NumberLiteral => {
                self.cursor.advance();
                let value = token.lexeme.parse().unwrap_or(0.0);
                Ok(Expression::NumberLiteral(value))
            }
            TokenKind::StringLiteral => {
                self.cursor.advance();
                Ok(Expression::StringLiteral(token.lexeme))
            }
            TokenKind::Undefined => {
                self.cursor.advance();
                Ok(Expression::UndefinedLiteral)
            }
            TokenKind::Ampersand => {
                self.cursor.advance();
                let reference = self.expect(TokenKind::StringLiteral)?.lexeme;
                Ok(Expression::LocalizedString { reference })
            }
            TokenKind::Percent => {
                self.cursor.advance();
                let name = self.expect_identifier_name()?;
                Ok(Expression::AnimationLiteral(name))
            }
            TokenKind::DoubleColon => {
                self.cursor.advance();
                let (file_reference, name) = self.parse_qualified_name()?;
                Ok(Expression::FunctionPointer { file_reference, name })
            }
            TokenKind::Hash => {
                self.cursor.advance();
                self.expect(TokenKind::Animtree)?;
                Ok(Expression::StringLiteral(self.current_animtree.clone().unwrap_or_default()))
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LParen => self.parse_paren_or_vector(),
            TokenKind::Identifier => {
                self.cursor.advance();
                if self.cursor.check(&TokenKind::DoubleColon) {
                    self.cursor.advance();
                    let name = self.expect_identifier_name()?;
                    Ok(Expression::Identifier { name, file_reference: Some(token.lexeme) })
                } else {
                    Ok(Expression::Identifier { name: token.lexeme, file_reference: None })
                }
            }
            TokenKind::Thread => {
                // `thread` directly at factor position with no preceding receiver:
                // threaded direct/function-pointer call.
                self.cursor.advance();
                self.parse_method_or_function_pointer_call(None, true)
            }
            TokenKind::DoubleLBracket => {
                // `[[expr]](args)` with no receiver and no `thread`: a bare
                // function-pointer call used as a factor.
                self.parse_method_or_function_pointer_call(None, false)
            }
            _ => Err(ParseError::InvalidFactor {
                found: token.kind,
                file: token.file.to_string(),
                line: token.line,
            }),
        }
    }

    fn parse_array_literal(&mut self) -> Result<Expression, ParseError> {
        self.expect(TokenKind::LBracket)?;
        let mut elements = Vec::new();
        if !self.cursor.check(&TokenKind::RBracket) {
            loop {
                elements.push(self.parse_assignment()?);
                if self.cursor.check(&TokenKind::Comma) {
                    self.cursor.advance();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RBracket)?;
        Ok(Expression::Array(elements))
    }

    /// `(expr)` is a parenthesized expression; `(a, b, c)` is a vector literal.
    fn parse_paren_or_vector(&mut self) -> Result<Expression, ParseError> {
        self.expect(TokenKind::LParen)?;
        let first = self.parse_assignment()?;
        if self.cursor.check(&TokenKind::Comma) {
            self.cursor.advance();
            let second = self.parse_assignment()?;
            self.expect(TokenKind::Comma)?;
            let third = self.parse_assignment()?;
            self.expect(TokenKind::RParen)?;
            return Ok(Expression::Vector(Box::new([first, second, third])));
        }
        self.expect(TokenKind::RParen)?;
        Ok(first)
    }

    // ---- helpers ---------------------------------------------------------

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.cursor.peek_kind() == &kind {
            return Ok(self.cursor.advance());
        }
        let found = self.cursor.peek().clone();
        if found.kind == TokenKind::Eof {
            return Err(ParseError::UnexpectedEof {
                expected: kind,
                file: found.file.to_string(),
                line: found.line,
            });
        }
        Err(ParseError::UnexpectedToken {
            expected: kind,
            found: found.kind,
            file: found.file.to_string(),
            line: found.line,
        })
    }

    fn expect_identifier_name(&mut self) -> Result<String, ParseError> {
        Ok(self.expect(TokenKind::Identifier)?.lexeme)
    }
}

fn binary(op: BinOp, left: Expression, right: Expression) -> Expression {
    Expression::Binary(Box::new(BinaryExpression { op, left, right }))
}

//! Recursive descent with one token of lookahead.
//!
//! There is no syntax tree: each production runs its semantic checks against
//! the [`SymbolTable`] and emits quadruples as soon as it is recognised.
//!
//! ```text
//! Program    := { Statement }
//! Statement  := VarDecl | IfStmt | WhileStmt | ForStmt | PrintStmt | Assignment
//! VarDecl    := Type Identifier "===" (Number|StringLiteral) ";"
//! Assignment := Identifier "===" (Number|StringLiteral) ";"
//! IfStmt     := "if" Condition Block [ "else" Block ]
//! WhileStmt  := "while" Condition Block
//! ForStmt    := "for" Condition Block
//! PrintStmt  := "print" (StringLiteral|Identifier) ";"
//! Block      := "{" { Statement } "}"
//! Condition  := QuotedCondition | StringLiteral
//! ```

use libquadra::{IrEmitter, IrProgram};
use tracing::debug;

use crate::error::SyntaxError;
use crate::lexer::{Span, SyntaxKind, Token};
use crate::symbols::{SymbolTable, VarType};

type PResult<T> = Result<T, SyntaxError>;

/// One compilation session: the buffered tokens, the symbol table and the
/// IR under construction.
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    symbols: SymbolTable,
    emitter: IrEmitter,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(|t| t.is(SyntaxKind::Eof)) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Token::new(SyntaxKind::Eof, "", Span::new(end, end)));
        }
        Parser {
            tokens,
            current: 0,
            symbols: SymbolTable::new(),
            emitter: IrEmitter::new(),
        }
    }

    /// Parses the whole program, returning the emitted IR.
    pub fn parse(mut self) -> PResult<IrProgram> {
        self.program()?;
        debug!(
            quads = self.emitter.code().len(),
            symbols = self.symbols.len(),
            "parsed program"
        );
        Ok(self.emitter.finish())
    }

    fn peek(&self) -> &Token {
        // `new` guarantees a trailing Eof and `advance` never moves past it.
        &self.tokens[self.current]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if !token.is(SyntaxKind::Eof) {
            self.current += 1;
        }
        token
    }

    fn check(&self, kind: SyntaxKind) -> bool {
        self.peek().is(kind)
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind, expected: &'static str) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> SyntaxError {
        let token = self.peek();
        SyntaxError::Expected {
            expected,
            found: describe(token),
            span: token.span.into(),
        }
    }

    fn program(&mut self) -> PResult<()> {
        while !self.check(SyntaxKind::Eof) {
            self.statement()?;
        }
        Ok(())
    }

    fn statement(&mut self) -> PResult<()> {
        let kind = self.peek().kind;
        match kind {
            _ if kind.is_type() => self.var_decl(),
            SyntaxKind::If => self.if_stmt(),
            SyntaxKind::While => self.while_stmt(),
            SyntaxKind::For => self.for_stmt(),
            SyntaxKind::Print => self.print_stmt(),
            SyntaxKind::Ident => self.assignment(),
            _ => {
                let token = self.peek();
                Err(SyntaxError::UnexpectedStatement {
                    found: describe(token),
                    span: token.span.into(),
                })
            }
        }
    }

    fn var_decl(&mut self) -> PResult<()> {
        let ty = VarType::from_keyword(self.peek().kind).ok_or_else(|| self.unexpected("a type"))?;
        self.advance();

        let name = self.expect(SyntaxKind::Ident, "an identifier")?;
        self.expect(SyntaxKind::Assign, "`===`")?;
        let value = self.literal("a value")?;

        if value.kind != ty.literal_kind() {
            return Err(SyntaxError::InitializerMismatch {
                name: name.text,
                declared: ty,
                expected: match ty {
                    VarType::String => "string literal",
                    VarType::Integer | VarType::Decimal => "number",
                },
                span: value.span.into(),
            });
        }

        self.expect(SyntaxKind::Semicolon, "`;`")?;

        if self.symbols.exists(&name.text) {
            return Err(SyntaxError::Redeclared {
                name: name.text,
                span: name.span.into(),
            });
        }

        self.symbols.insert(&name.text, ty);
        self.emitter.emit_assign(&name.text, &value.text);
        Ok(())
    }

    fn assignment(&mut self) -> PResult<()> {
        let name = self.expect(SyntaxKind::Ident, "a variable name")?;
        let Some(declared) = self.symbols.get_type(&name.text) else {
            return Err(SyntaxError::Undeclared {
                name: name.text,
                span: name.span.into(),
            });
        };

        self.expect(SyntaxKind::Assign, "`===`")?;
        let value = self.literal("a number or string literal")?;

        // `literal` only returns numbers and string literals.
        let assigned = VarType::of_literal(&value).unwrap_or(VarType::String);
        if assigned != declared {
            return Err(SyntaxError::AssignmentMismatch {
                name: name.text,
                expected: declared,
                found: assigned,
                span: value.span.into(),
            });
        }

        self.expect(SyntaxKind::Semicolon, "`;`")?;
        self.emitter.emit_assign(&name.text, &value.text);
        Ok(())
    }

    fn literal(&mut self, expected: &'static str) -> PResult<Token> {
        if self.check(SyntaxKind::Number) || self.check(SyntaxKind::StringLiteral) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn condition(&mut self) -> PResult<Token> {
        if self.check(SyntaxKind::QuotedCondition) || self.check(SyntaxKind::StringLiteral) {
            Ok(self.advance())
        } else {
            Err(self.unexpected("a quoted condition"))
        }
    }

    fn if_stmt(&mut self) -> PResult<()> {
        self.advance();
        let cond = self.condition()?;

        let true_label = self.emitter.new_label();
        let false_label = self.emitter.new_label();
        let end_label = self.emitter.new_label();

        self.emitter
            .if_else(&cond.text, &true_label, &false_label)
            .map_err(|reason| malformed(reason, &cond))?;

        self.emitter.emit_label(&true_label);
        self.block()?;

        if self.eat(SyntaxKind::Else) {
            self.emitter.emit_goto(&end_label);
            self.emitter.emit_label(&false_label);
            self.block()?;
            self.emitter.emit_label(&end_label);
        } else {
            self.emitter.emit_label(&false_label);
        }
        Ok(())
    }

    fn while_stmt(&mut self) -> PResult<()> {
        self.advance();
        self.loop_body()
    }

    /// Initialization and increment clauses do not exist; a `for` loop
    /// re-checks its condition exactly like `while`.
    fn for_stmt(&mut self) -> PResult<()> {
        self.advance();
        self.loop_body()
    }

    fn loop_body(&mut self) -> PResult<()> {
        let cond = self.condition()?;

        let start_label = self.emitter.new_label();
        let end_label = self.emitter.new_label();

        self.emitter.emit_label(&start_label);
        self.emitter
            .loop_condition(&cond.text, &end_label)
            .map_err(|reason| malformed(reason, &cond))?;
        self.block()?;
        self.emitter.emit_goto(&start_label);
        self.emitter.emit_label(&end_label);
        Ok(())
    }

    fn print_stmt(&mut self) -> PResult<()> {
        self.advance();

        let operand = if self.check(SyntaxKind::StringLiteral) || self.check(SyntaxKind::Ident) {
            self.advance()
        } else {
            return Err(self.unexpected("a string literal or variable"));
        };

        if operand.is(SyntaxKind::Ident) && !self.symbols.exists(&operand.text) {
            return Err(SyntaxError::Undeclared {
                name: operand.text,
                span: operand.span.into(),
            });
        }

        self.expect(SyntaxKind::Semicolon, "`;`")?;
        self.emitter.emit_print(&operand.text);
        Ok(())
    }

    fn block(&mut self) -> PResult<()> {
        let open = self.expect(SyntaxKind::LBrace, "`{`")?;

        while !self.check(SyntaxKind::RBrace) {
            if self.check(SyntaxKind::Eof) {
                return Err(SyntaxError::UnclosedBlock {
                    open: open.span.into(),
                    span: self.peek().span.into(),
                });
            }
            self.statement()?;
        }

        self.advance();
        Ok(())
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        SyntaxKind::Eof => "end of input".to_owned(),
        SyntaxKind::StringLiteral => format!("\"{}\"", token.text),
        _ => token.text.clone(),
    }
}

fn malformed(reason: libquadra::ConditionError, cond: &Token) -> SyntaxError {
    SyntaxError::MalformedCondition {
        reason,
        span: cond.span.into(),
    }
}

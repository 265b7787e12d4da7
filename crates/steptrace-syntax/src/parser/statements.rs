//! Statement grammar.

use std::rc::Rc;

use crate::ast::{BinaryOp, Expr, FunctionDef, IfBranch, Module, Param, Stmt, StmtKind, Target};
use crate::error::SyntaxError;
use crate::lexer::TokenKind;

use super::parser::Parser;
use super::scope::collect_locals;

impl Parser<'_> {
    pub(crate) fn parse_module(&mut self) -> Result<Module, SyntaxError> {
        let mut body = Vec::new();
        while !self.at(TokenKind::Eof) {
            body.push(self.statement()?);
        }
        Ok(Module { body })
    }

    fn statement(&mut self) -> Result<Stmt, SyntaxError> {
        match self.kind() {
            TokenKind::KwDef => self.function_def(),
            TokenKind::KwIf => self.if_stmt(),
            TokenKind::KwWhile => self.while_stmt(),
            TokenKind::KwFor => self.for_stmt(),
            TokenKind::Indent => Err(self.error_here("unexpected indent")),
            _ => {
                let stmt = self.simple_statement()?;
                self.end_of_statement()?;
                Ok(stmt)
            }
        }
    }

    fn end_of_statement(&mut self) -> Result<(), SyntaxError> {
        if self.eat(TokenKind::Newline) {
            return Ok(());
        }
        if self.at(TokenKind::Semicolon) {
            return Err(self.error_here("multiple statements on one line are not supported"));
        }
        Err(self.unexpected("end of line"))
    }

    /// `':' NEWLINE INDENT stmt+ DEDENT` or `':' simple_stmt NEWLINE`.
    fn block(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        self.expect(TokenKind::Colon, "':'")?;
        if !self.eat(TokenKind::Newline) {
            let stmt = self.simple_statement()?;
            self.end_of_statement()?;
            return Ok(vec![stmt]);
        }
        if !self.eat(TokenKind::Indent) {
            return Err(self.error_here("expected an indented block"));
        }
        let mut body = Vec::new();
        while !self.at(TokenKind::Dedent) && !self.at(TokenKind::Eof) {
            body.push(self.statement()?);
        }
        self.eat(TokenKind::Dedent);
        Ok(body)
    }

    fn loop_body(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        self.loop_depth += 1;
        let body = self.block();
        self.loop_depth -= 1;
        body
    }

    fn function_def(&mut self) -> Result<Stmt, SyntaxError> {
        let line = self.line();
        self.bump();
        let name_token = self.expect(TokenKind::Ident, "function name")?;
        let name = self.ident(&name_token);
        self.expect(TokenKind::LParen, "'('")?;
        let params = self.params()?;
        if self.eat(TokenKind::Arrow) {
            // Return annotations are accepted and ignored.
            self.test()?;
        }

        let saved_loop_depth = std::mem::replace(&mut self.loop_depth, 0);
        self.function_depth += 1;
        let body = self.block();
        self.function_depth -= 1;
        self.loop_depth = saved_loop_depth;
        let body = body?;

        let locals = collect_locals(&params, &body);
        let def = FunctionDef {
            name,
            line,
            params,
            body,
            locals,
        };
        Ok(Stmt::new(line, StmtKind::FunctionDef(Rc::new(def))))
    }

    fn params(&mut self) -> Result<Vec<Param>, SyntaxError> {
        let mut params: Vec<Param> = Vec::new();
        while !self.at(TokenKind::RParen) {
            let token = self.expect(TokenKind::Ident, "parameter name")?;
            let name = self.ident(&token);
            if params.iter().any(|param| param.name == name) {
                return Err(self.error_here(format!(
                    "duplicate argument '{name}' in function definition"
                )));
            }
            if self.eat(TokenKind::Colon) {
                self.test()?;
            }
            let default = if self.eat(TokenKind::Assign) {
                Some(self.test()?)
            } else {
                if params.iter().any(|param| param.default.is_some()) {
                    return Err(self.error_here("non-default argument follows default argument"));
                }
                None
            };
            params.push(Param { name, default });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(params)
    }

    fn if_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        let line = self.line();
        self.bump();
        let test = self.test()?;
        let body = self.block()?;
        let mut branches = vec![IfBranch { line, test, body }];
        let mut orelse = Vec::new();
        loop {
            if self.at(TokenKind::KwElif) {
                let line = self.line();
                self.bump();
                let test = self.test()?;
                let body = self.block()?;
                branches.push(IfBranch { line, test, body });
            } else {
                if self.eat(TokenKind::KwElse) {
                    orelse = self.block()?;
                }
                break;
            }
        }
        Ok(Stmt::new(line, StmtKind::If { branches, orelse }))
    }

    fn while_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        let line = self.line();
        self.bump();
        let test = self.test()?;
        let body = self.loop_body()?;
        Ok(Stmt::new(line, StmtKind::While { test, body }))
    }

    fn for_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        let line = self.line();
        self.bump();
        let target = self.target_list()?;
        let target = into_target(target, line)?;
        self.expect(TokenKind::KwIn, "'in'")?;
        let iter = self.expr_list()?;
        let body = self.loop_body()?;
        Ok(Stmt::new(line, StmtKind::For { target, iter, body }))
    }

    fn simple_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let line = self.line();
        let kind = match self.kind() {
            TokenKind::KwPass => {
                self.bump();
                StmtKind::Pass
            }
            TokenKind::KwBreak => {
                if self.loop_depth == 0 {
                    return Err(self.error_here("'break' outside loop"));
                }
                self.bump();
                StmtKind::Break
            }
            TokenKind::KwContinue => {
                if self.loop_depth == 0 {
                    return Err(self.error_here("'continue' not properly in loop"));
                }
                self.bump();
                StmtKind::Continue
            }
            TokenKind::KwReturn => {
                if self.function_depth == 0 {
                    return Err(self.error_here("'return' outside function"));
                }
                self.bump();
                let value = if self.at_statement_end() {
                    None
                } else {
                    Some(self.expr_list()?)
                };
                StmtKind::Return(value)
            }
            TokenKind::KwRaise => {
                self.bump();
                let value = if self.at_statement_end() {
                    None
                } else {
                    Some(self.test()?)
                };
                StmtKind::Raise(value)
            }
            _ => self.expr_statement(line)?,
        };
        Ok(Stmt::new(line, kind))
    }

    fn at_statement_end(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof
        )
    }

    fn expr_statement(&mut self, line: u32) -> Result<StmtKind, SyntaxError> {
        let first = self.expr_list()?;

        if self.at(TokenKind::Colon) && matches!(first, Expr::Name(_)) {
            // Annotated assignment: `x: int = 5`; a bare annotation binds nothing.
            self.bump();
            self.test()?;
            if !self.eat(TokenKind::Assign) {
                return Ok(StmtKind::Pass);
            }
            let target = into_target(first, line)?;
            let value = self.expr_list()?;
            return Ok(StmtKind::Assign {
                targets: vec![target],
                value,
            });
        }

        if self.at(TokenKind::Assign) {
            let mut targets = vec![into_target(first, line)?];
            let value = loop {
                self.bump();
                let next = self.expr_list()?;
                if self.at(TokenKind::Assign) {
                    targets.push(into_target(next, line)?);
                } else {
                    break next;
                }
            };
            return Ok(StmtKind::Assign { targets, value });
        }

        if self.kind().is_augmented_assign() {
            let op = match self.bump().kind {
                TokenKind::PlusAssign => BinaryOp::Add,
                TokenKind::MinusAssign => BinaryOp::Sub,
                TokenKind::StarAssign => BinaryOp::Mul,
                TokenKind::SlashAssign => BinaryOp::Div,
                TokenKind::DoubleSlashAssign => BinaryOp::FloorDiv,
                _ => BinaryOp::Mod,
            };
            let target = match into_target(first, line)? {
                Target::Tuple(_) => {
                    return Err(SyntaxError::new(
                        line,
                        "illegal expression for augmented assignment",
                    ))
                }
                target => target,
            };
            let value = self.expr_list()?;
            return Ok(StmtKind::AugAssign { target, op, value });
        }

        Ok(StmtKind::Expr(first))
    }
}

fn into_target(expr: Expr, line: u32) -> Result<Target, SyntaxError> {
    match expr {
        Expr::Name(name) => Ok(Target::Name(name)),
        Expr::Subscript { value, index } => Ok(Target::Subscript { value, index }),
        Expr::Tuple(items) | Expr::List(items) => {
            let targets = items
                .into_iter()
                .map(|item| into_target(item, line))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Target::Tuple(targets))
        }
        Expr::Literal(_) => Err(SyntaxError::new(line, "cannot assign to literal")),
        Expr::Call { .. } => Err(SyntaxError::new(line, "cannot assign to function call")),
        Expr::Attribute { .. } => Err(SyntaxError::new(
            line,
            "attribute assignment is not supported",
        )),
        _ => Err(SyntaxError::new(line, "cannot assign to expression")),
    }
}

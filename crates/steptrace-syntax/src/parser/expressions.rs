//! Expression grammar (precedence climbing by hand, Python's table).

use crate::ast::{BinaryOp, BoolOp, CompareOp, Expr, Keyword, Literal, UnaryOp};
use crate::error::SyntaxError;
use crate::lexer::TokenKind;

use super::literals::{parse_float, parse_int, unescape_string};
use super::parser::Parser;

impl Parser<'_> {
    /// `test (',' test)* [',']`; more than one item (or a trailing comma)
    /// yields a tuple.
    pub(super) fn expr_list(&mut self) -> Result<Expr, SyntaxError> {
        let first = self.test()?;
        if !self.at(TokenKind::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(TokenKind::Comma) {
            if self.at_expr_list_end() {
                break;
            }
            items.push(self.test()?);
        }
        Ok(Expr::Tuple(items))
    }

    /// Loop targets stop below comparisons so that `in` is not consumed.
    pub(super) fn target_list(&mut self) -> Result<Expr, SyntaxError> {
        let first = self.arith()?;
        if !self.at(TokenKind::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(TokenKind::Comma) {
            if self.at(TokenKind::KwIn) {
                break;
            }
            items.push(self.arith()?);
        }
        Ok(Expr::Tuple(items))
    }

    fn at_expr_list_end(&self) -> bool {
        let kind = self.kind();
        kind.is_close_bracket()
            || kind.is_augmented_assign()
            || matches!(
                kind,
                TokenKind::Newline
                    | TokenKind::Eof
                    | TokenKind::Assign
                    | TokenKind::Colon
                    | TokenKind::Semicolon
            )
    }

    /// `or_test ['if' or_test 'else' test]`
    pub(super) fn test(&mut self) -> Result<Expr, SyntaxError> {
        self.nested(Self::conditional)
    }

    fn conditional(&mut self) -> Result<Expr, SyntaxError> {
        let body = self.or_test()?;
        if !self.eat(TokenKind::KwIf) {
            return Ok(body);
        }
        let test = self.or_test()?;
        self.expect(TokenKind::KwElse, "'else'")?;
        let orelse = self.test()?;
        Ok(Expr::IfExp {
            test: Box::new(test),
            body: Box::new(body),
            orelse: Box::new(orelse),
        })
    }

    fn or_test(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.and_test()?;
        while self.eat(TokenKind::KwOr) {
            let right = self.and_test()?;
            left = Expr::BoolOp {
                op: BoolOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn and_test(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.not_test()?;
        while self.eat(TokenKind::KwAnd) {
            let right = self.not_test()?;
            left = Expr::BoolOp {
                op: BoolOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn not_test(&mut self) -> Result<Expr, SyntaxError> {
        if self.eat(TokenKind::KwNot) {
            let operand = self.nested(Self::not_test)?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, SyntaxError> {
        let left = self.arith()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.kind() {
                TokenKind::EqEq => CompareOp::Eq,
                TokenKind::NotEq => CompareOp::NotEq,
                TokenKind::Lt => CompareOp::Lt,
                TokenKind::LtEq => CompareOp::LtEq,
                TokenKind::Gt => CompareOp::Gt,
                TokenKind::GtEq => CompareOp::GtEq,
                TokenKind::KwIn => CompareOp::In,
                TokenKind::KwNot if self.nth(1) == TokenKind::KwIn => {
                    self.bump();
                    CompareOp::NotIn
                }
                TokenKind::KwIs => {
                    if self.nth(1) == TokenKind::KwNot {
                        self.bump();
                        CompareOp::IsNot
                    } else {
                        CompareOp::Is
                    }
                }
                _ => break,
            };
            self.bump();
            rest.push((op, self.arith()?));
        }
        if rest.is_empty() {
            Ok(left)
        } else {
            Ok(Expr::Compare {
                left: Box::new(left),
                rest,
            })
        }
    }

    pub(super) fn arith(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.term()?;
        loop {
            let op = match self.kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.bump();
            let right = self.term()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.factor()?;
        loop {
            let op = match self.kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::DoubleSlash => BinaryOp::FloorDiv,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.bump();
            let right = self.factor()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn factor(&mut self) -> Result<Expr, SyntaxError> {
        let op = match self.kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            _ => return self.power(),
        };
        self.bump();
        let operand = self.nested(Self::factor)?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// `**` binds tighter than unary minus on its left and is right
    /// associative: `-2 ** 2 == -4`, `2 ** 3 ** 2 == 512`.
    fn power(&mut self) -> Result<Expr, SyntaxError> {
        let base = self.atom_expr()?;
        if self.eat(TokenKind::DoubleStar) {
            let exponent = self.nested(Self::factor)?;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn atom_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.atom()?;
        loop {
            match self.kind() {
                TokenKind::LParen => {
                    self.bump();
                    let (args, keywords) = self.call_args()?;
                    expr = Expr::Call {
                        func: Box::new(expr),
                        args,
                        keywords,
                    };
                }
                TokenKind::LBracket => {
                    self.bump();
                    let index = self.subscript_index()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    expr = Expr::Subscript {
                        value: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::Dot => {
                    self.bump();
                    let name = self.expect(TokenKind::Ident, "attribute name")?;
                    expr = Expr::Attribute {
                        value: Box::new(expr),
                        attr: self.ident(&name),
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn call_args(&mut self) -> Result<(Vec<Expr>, Vec<Keyword>), SyntaxError> {
        let mut args = Vec::new();
        let mut keywords: Vec<Keyword> = Vec::new();
        while !self.at(TokenKind::RParen) {
            if self.at(TokenKind::Ident) && self.nth(1) == TokenKind::Assign {
                let token = self.bump();
                let name = self.ident(&token);
                self.bump();
                if keywords.iter().any(|keyword| keyword.name == name) {
                    return Err(self.error_here(format!("keyword argument repeated: {name}")));
                }
                let value = self.test()?;
                keywords.push(Keyword { name, value });
            } else {
                if !keywords.is_empty() {
                    return Err(self.error_here("positional argument follows keyword argument"));
                }
                args.push(self.test()?);
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok((args, keywords))
    }

    fn subscript_index(&mut self) -> Result<Expr, SyntaxError> {
        let lower = if self.at(TokenKind::Colon) {
            None
        } else {
            Some(self.test()?)
        };
        if !self.eat(TokenKind::Colon) {
            let Some(first) = lower else {
                return Err(self.unexpected("index"));
            };
            if !self.at(TokenKind::Comma) {
                return Ok(first);
            }
            let mut items = vec![first];
            while self.eat(TokenKind::Comma) {
                if self.at(TokenKind::RBracket) {
                    break;
                }
                items.push(self.test()?);
            }
            return Ok(Expr::Tuple(items));
        }
        let upper = if matches!(self.kind(), TokenKind::Colon | TokenKind::RBracket) {
            None
        } else {
            Some(Box::new(self.test()?))
        };
        let step = if self.eat(TokenKind::Colon) && !self.at(TokenKind::RBracket) {
            Some(Box::new(self.test()?))
        } else {
            None
        };
        Ok(Expr::Slice {
            lower: lower.map(Box::new),
            upper,
            step,
        })
    }

    fn atom(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.current();
        match token.kind {
            TokenKind::Ident => {
                self.bump();
                Ok(Expr::Name(self.ident(&token)))
            }
            TokenKind::IntLiteral => {
                self.bump();
                parse_int(self.text(&token))
                    .map(|value| Expr::Literal(Literal::Int(value)))
                    .ok_or_else(|| {
                        SyntaxError::new(self.line_of(&token), "integer literal too large")
                    })
            }
            TokenKind::FloatLiteral => {
                self.bump();
                parse_float(self.text(&token))
                    .map(|value| Expr::Literal(Literal::Float(value)))
                    .ok_or_else(|| SyntaxError::new(self.line_of(&token), "invalid float literal"))
            }
            TokenKind::StringLiteral => {
                let mut value = String::new();
                while self.at(TokenKind::StringLiteral) {
                    let part = self.bump();
                    value.push_str(&unescape_string(self.text(&part)));
                }
                Ok(Expr::Literal(Literal::Str(value.into())))
            }
            TokenKind::KwNone => {
                self.bump();
                Ok(Expr::Literal(Literal::None))
            }
            TokenKind::KwTrue => {
                self.bump();
                Ok(Expr::Literal(Literal::Bool(true)))
            }
            TokenKind::KwFalse => {
                self.bump();
                Ok(Expr::Literal(Literal::Bool(false)))
            }
            TokenKind::LParen => {
                self.bump();
                if self.eat(TokenKind::RParen) {
                    return Ok(Expr::Tuple(Vec::new()));
                }
                let inner = self.expr_list()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                self.bump();
                let items = self.sequence_items(TokenKind::RBracket)?;
                Ok(Expr::List(items))
            }
            TokenKind::LBrace => {
                self.bump();
                self.dict_display()
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn sequence_items(&mut self, close: TokenKind) -> Result<Vec<Expr>, SyntaxError> {
        let mut items = Vec::new();
        while !self.at(close) {
            items.push(self.test()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(close, close.describe())?;
        Ok(items)
    }

    fn dict_display(&mut self) -> Result<Expr, SyntaxError> {
        let mut entries = Vec::new();
        while !self.at(TokenKind::RBrace) {
            let key = self.test()?;
            if !self.eat(TokenKind::Colon) {
                return Err(self.error_here("set displays are not supported; expected ':'"));
            }
            let value = self.test()?;
            entries.push((key, value));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(Expr::Dict(entries))
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

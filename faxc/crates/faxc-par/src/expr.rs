//! Expression parsing.
//!
//! One method per precedence tier, from `expr` (loosest) down to `primary`
//! (tightest), exactly mirroring the grammar:
//!
//! ```text
//! expr   := ifExpr | letExpr | compound | newExpr | assign
//! assign := logOr ( ':=' logOr )*
//! logOr  := logAnd ( '||' logAnd )*
//! logAnd := bitOr  ( '&&' bitOr  )*
//! bitOr  := bitXor ( '|'  bitXor )*
//! bitXor := bitAnd ( '^'  bitAnd )*
//! bitAnd := equal  ( '&'  equal  )*
//! equal  := rel    ( ('=='|'!=') rel )*
//! rel    := add    ( ('<'|'<='|'>'|'>=') add )*
//! add    := mul    ( ('+'|'-'|'+.'|'-.') mul )*
//! mul    := unary  ( ('*'|'/'|'%'|'*.'|'/.'|'%.') unary )*
//! unary  := ('#' | '!') primary | primary
//! primary := int | float | string | 'true' | 'false'
//!          | ident '(' args? ')' | ident | '(' expr ')'
//! ```

use faxc_lex::Token;
use faxc_util::{Span, Symbol};

use crate::ast::{BinOp, Node, UnOp};
use crate::Parser;

impl<'a> Parser<'a> {
    /// `expr := ifExpr | letExpr | compound | newExpr | assign`
    pub fn parse_expr(&mut self) -> Option<Node> {
        match self.current() {
            Token::If => self.parse_if_expr(),
            Token::Let => self.parse_let_expr(),
            Token::LBrace => self.parse_compound(),
            Token::New => self.parse_new_expr(),
            _ => self.parse_assign(),
        }
    }

    /// `assign := logOr ( ':=' logOr )*`
    pub(crate) fn parse_assign(&mut self) -> Option<Node> {
        let mut lhs = self.parse_log_or()?;
        while self.match_token(&Token::ColonEq) {
            let span = lhs.span();
            let rhs = self.parse_log_or()?;
            lhs = Node::binary(BinOp::PtrAssign, lhs, rhs, span);
        }
        Some(lhs)
    }

    /// `logOr := logAnd ( '||' logAnd )*`
    fn parse_log_or(&mut self) -> Option<Node> {
        let mut lhs = self.parse_log_and()?;
        while self.match_token(&Token::PipePipe) {
            let span = lhs.span();
            let rhs = self.parse_log_and()?;
            lhs = Node::binary(BinOp::LogOr, lhs, rhs, span);
        }
        Some(lhs)
    }

    /// `logAnd := bitOr ( '&&' bitOr )*`
    fn parse_log_and(&mut self) -> Option<Node> {
        let mut lhs = self.parse_bit_or()?;
        while self.match_token(&Token::AmpAmp) {
            let span = lhs.span();
            let rhs = self.parse_bit_or()?;
            lhs = Node::binary(BinOp::LogAnd, lhs, rhs, span);
        }
        Some(lhs)
    }

    /// `bitOr := bitXor ( '|' bitXor )*`
    fn parse_bit_or(&mut self) -> Option<Node> {
        let mut lhs = self.parse_bit_xor()?;
        while self.match_token(&Token::Pipe) {
            let span = lhs.span();
            let rhs = self.parse_bit_xor()?;
            lhs = Node::binary(BinOp::BitOr, lhs, rhs, span);
        }
        Some(lhs)
    }

    /// `bitXor := bitAnd ( '^' bitAnd )*`
    fn parse_bit_xor(&mut self) -> Option<Node> {
        let mut lhs = self.parse_bit_and()?;
        while self.match_token(&Token::Caret) {
            let span = lhs.span();
            let rhs = self.parse_bit_and()?;
            lhs = Node::binary(BinOp::BitXor, lhs, rhs, span);
        }
        Some(lhs)
    }

    /// `bitAnd := equal ( '&' equal )*`
    fn parse_bit_and(&mut self) -> Option<Node> {
        let mut lhs = self.parse_equal()?;
        while self.match_token(&Token::Amp) {
            let span = lhs.span();
            let rhs = self.parse_equal()?;
            lhs = Node::binary(BinOp::BitAnd, lhs, rhs, span);
        }
        Some(lhs)
    }

    /// `equal := rel ( ('=='|'!=') rel )*`
    fn parse_equal(&mut self) -> Option<Node> {
        let mut lhs = self.parse_rel()?;
        loop {
            let op = match self.current() {
                Token::EqEq => BinOp::Eq,
                Token::NotEq => BinOp::Ne,
                _ => break,
            };
            self.advance();
            let span = lhs.span();
            let rhs = self.parse_rel()?;
            lhs = Node::binary(op, lhs, rhs, span);
        }
        Some(lhs)
    }

    /// `rel := add ( ('<'|'<='|'>'|'>=') add )*`
    fn parse_rel(&mut self) -> Option<Node> {
        let mut lhs = self.parse_add()?;
        loop {
            let op = match self.current() {
                Token::Lt => BinOp::Lt,
                Token::LtEq => BinOp::Le,
                Token::Gt => BinOp::Gt,
                Token::GtEq => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let span = lhs.span();
            let rhs = self.parse_add()?;
            lhs = Node::binary(op, lhs, rhs, span);
        }
        Some(lhs)
    }

    /// `add := mul ( ('+'|'-'|'+.'|'-.') mul )*`
    fn parse_add(&mut self) -> Option<Node> {
        let mut lhs = self.parse_mul()?;
        loop {
            let op = match self.current() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                Token::PlusDot => BinOp::AddF,
                Token::MinusDot => BinOp::SubF,
                _ => break,
            };
            self.advance();
            let span = lhs.span();
            let rhs = self.parse_mul()?;
            lhs = Node::binary(op, lhs, rhs, span);
        }
        Some(lhs)
    }

    /// `mul := unary ( ('*'|'/'|'%'|'*.'|'/.'|'%.') unary )*`
    fn parse_mul(&mut self) -> Option<Node> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.current() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::Percent => BinOp::Mod,
                Token::StarDot => BinOp::MulF,
                Token::SlashDot => BinOp::DivF,
                Token::PercentDot => BinOp::ModF,
                _ => break,
            };
            self.advance();
            let span = lhs.span();
            let rhs = self.parse_unary()?;
            lhs = Node::binary(op, lhs, rhs, span);
        }
        Some(lhs)
    }

    /// `unary := ('#' | '!') primary | primary`
    fn parse_unary(&mut self) -> Option<Node> {
        let op = match self.current() {
            Token::Hash => Some(UnOp::Deref),
            Token::Bang => Some(UnOp::Not),
            _ => None,
        };
        match op {
            Some(op) => {
                self.advance();
                let inner = self.parse_primary()?;
                let span = inner.span();
                Some(Node::unary(op, inner, span))
            }
            None => self.parse_primary(),
        }
    }

    /// ```text
    /// primary := int | float | string | 'true' | 'false'
    ///          | ident '(' args? ')' | ident | '(' expr ')'
    /// ```
    fn parse_primary(&mut self) -> Option<Node> {
        match self.current().clone() {
            Token::Number(n) => {
                self.advance();
                Some(Node::number(n, Span::DUMMY))
            }
            Token::Float(f) => {
                self.advance();
                Some(Node::float(f, Span::DUMMY))
            }
            Token::String(s) => {
                self.advance();
                Some(Node::string(s, Span::DUMMY))
            }
            Token::True => {
                self.advance();
                Some(Node::bool(true, Span::DUMMY))
            }
            Token::False => {
                self.advance();
                Some(Node::bool(false, Span::DUMMY))
            }
            Token::Ident(name) => {
                self.advance();
                if self.match_token(&Token::LParen) {
                    let args = self.parse_call_args()?;
                    Some(Node::app(name, args, Span::DUMMY))
                } else {
                    Some(Node::var(name, Span::DUMMY))
                }
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Some(inner)
            }
            other => {
                self.error(format!("expected expression, found {:?}", other));
                None
            }
        }
    }

    /// Parses the comma-separated arguments of a call after the opening
    /// `(` has already been consumed.
    fn parse_call_args(&mut self) -> Option<Vec<Node>> {
        let mut args = Vec::new();
        if self.match_token(&Token::RParen) {
            return Some(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.match_token(&Token::Comma) {
                continue;
            }
            self.expect(Token::RParen)?;
            break;
        }
        Some(args)
    }
}

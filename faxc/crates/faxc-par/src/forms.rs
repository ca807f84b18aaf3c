//! The grammar's non-primary forms: `ifExpr`, `letExpr`, `letFunTail`,
//! `externDecl`, `argument`, `typedArg`, `compound`, `newExpr`.

use faxc_lex::Token;
use faxc_util::{Span, Symbol};

use crate::ast::Node;
use crate::Parser;

impl<'a> Parser<'a> {
    /// `ifExpr := 'if' expr 'then' toplevel 'else' toplevel`
    pub(crate) fn parse_if_expr(&mut self) -> Option<Node> {
        self.advance(); // 'if'
        let cond = self.parse_expr()?;
        self.expect(Token::Then)?;
        let then_branch = self.parse_expr()?;
        self.expect(Token::Else)?;
        let else_branch = self.parse_expr()?;
        Some(Node::if_expr(cond, then_branch, else_branch, Span::DUMMY))
    }

    /// `letExpr := 'let' (externDecl | ident (('=' expr 'in' expr) | letFunTail))`
    pub(crate) fn parse_let_expr(&mut self) -> Option<Node> {
        self.advance(); // 'let'
        if matches!(self.current(), Token::Extern) {
            return self.parse_extern_decl();
        }
        let name = self.expect_ident()?;
        if self.match_token(&Token::Eq) {
            let value = self.parse_expr()?;
            self.expect(Token::In)?;
            let body = self.parse_expr()?;
            return Some(Node::let_in(name, value, body, Span::DUMMY));
        }
        self.parse_let_fun_tail(name)
    }

    /// `letFunTail := argument* '=' expr`
    fn parse_let_fun_tail(&mut self, name: Symbol) -> Option<Node> {
        let mut params = Vec::new();
        let mut param_types = Vec::new();
        while !matches!(self.current(), Token::Eq) {
            let (param, ty) = self.parse_argument()?;
            params.push(param);
            param_types.push(ty);
        }
        self.expect(Token::Eq)?;
        let body = self.parse_expr()?;
        Some(Node::let_fun(name, params, param_types, body, Span::DUMMY))
    }

    /// `argument := ident | '(' ident ':' ident ')'`
    fn parse_argument(&mut self) -> Option<(Symbol, Option<Symbol>)> {
        if matches!(self.current(), Token::LParen) {
            self.advance();
            let name = self.expect_ident()?;
            self.expect(Token::Colon)?;
            let ty = self.expect_ident()?;
            self.expect(Token::RParen)?;
            Some((name, Some(ty)))
        } else {
            let name = self.expect_ident()?;
            Some((name, None))
        }
    }

    /// `externDecl := 'extern' ident typedArg* ':' ident`
    fn parse_extern_decl(&mut self) -> Option<Node> {
        self.advance(); // 'extern'
        let name = self.expect_ident()?;
        let mut param_types = Vec::new();
        while matches!(self.current(), Token::LParen) {
            param_types.push(self.parse_typed_arg()?);
        }
        self.expect(Token::Colon)?;
        let ret_type = self.expect_ident()?;
        Some(Node::let_extern(name, param_types, ret_type, Span::DUMMY))
    }

    /// `typedArg := '(' ident ':' ident ')'` — yields only the parameter's
    /// type; an extern declaration has no use for its parameter names.
    fn parse_typed_arg(&mut self) -> Option<Symbol> {
        self.expect(Token::LParen)?;
        let _name = self.expect_ident()?;
        self.expect(Token::Colon)?;
        let ty = self.expect_ident()?;
        self.expect(Token::RParen)?;
        Some(ty)
    }

    /// `compound := '{' expr* '}'` — expressions are juxtaposed with no
    /// separator, unlike the top level's `;`-joined sequence.
    pub(crate) fn parse_compound(&mut self) -> Option<Node> {
        self.advance(); // '{'
        let mut exprs = Vec::new();
        while !matches!(self.current(), Token::RBrace) {
            exprs.push(self.parse_expr()?);
        }
        self.expect(Token::RBrace)?;
        Some(Node::compound(exprs, Span::DUMMY))
    }

    /// `newExpr := 'new' ident`
    pub(crate) fn parse_new_expr(&mut self) -> Option<Node> {
        self.advance(); // 'new'
        let ty_name = self.expect_ident()?;
        Some(Node::new_expr(ty_name, Span::DUMMY))
    }
}

use crate::ast::{AssignOp, Behavior, BinOp, Block, Expr, IfBranch, Stmt, UnaryOp};
use crate::error::InkError;
use crate::lexer::{Lexer, Token, TokenWithPos};

// ── Parser ────────────────────────────────────────────────────────────────

/// Recursive-descent parser over a token stream produced by [`Lexer`].
///
/// Expression precedence, loosest first: `or`, `and`, `not`, comparison
/// (non-associative), `+ -`, `* / %`, unary `-`.
pub struct Parser {
    tokens: Vec<TokenWithPos>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPos>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current_pos(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| (t.line, t.col))
            .unwrap_or((1, 1))
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, tok: &Token) -> bool {
        self.peek() == tok
    }

    fn eat(&mut self, tok: &Token) -> bool {
        if self.check(tok) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn err(&self, msg: impl Into<String>) -> InkError {
        let (line, col) = self.current_pos();
        InkError::parse(msg, line, col)
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<(), InkError> {
        if self.check(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected {what}, got '{}'", self.peek().describe())))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, InkError> {
        match self.peek() {
            Token::Ident(_) => match self.advance() {
                Token::Ident(s) => Ok(s),
                _ => unreachable!("peeked an identifier"),
            },
            tok => Err(self.err(format!("expected {what}, got '{}'", tok.describe()))),
        }
    }

    fn skip_newlines(&mut self) {
        while self.eat(&Token::Newline) {}
    }

    // ── Behavior ──────────────────────────────────────────────────────────

    pub fn parse_behavior(&mut self) -> Result<Behavior, InkError> {
        self.skip_newlines();

        self.expect(&Token::Behavior, "'@behavior'")?;
        let name = self.expect_ident("behavior name")?;
        self.expect(&Token::Colon, "':'")?;
        self.expect(&Token::Newline, "newline after ':'")?;
        let body = self.parse_block()?;

        self.skip_newlines();
        if !self.check(&Token::Eof) {
            return Err(self.err(format!(
                "unexpected '{}' after behavior block",
                self.peek().describe()
            )));
        }

        Ok(Behavior { name, body })
    }

    // ── Blocks & statements ───────────────────────────────────────────────

    fn parse_block(&mut self) -> Result<Block, InkError> {
        self.expect(&Token::Indent, "indented block")?;

        let mut stmts = Vec::new();
        loop {
            self.skip_newlines();
            match self.peek() {
                Token::Dedent => {
                    self.advance();
                    break;
                }
                Token::Eof => break,
                _ => stmts.push(self.parse_statement()?),
            }
        }

        Ok(Block { stmts })
    }

    fn parse_statement(&mut self) -> Result<Stmt, InkError> {
        if self.check(&Token::If) {
            self.parse_if()
        } else {
            self.parse_assignment()
        }
    }

    /// `if cond: block (elif cond: block)* (else: block)?`
    fn parse_if(&mut self) -> Result<Stmt, InkError> {
        self.advance(); // consume `if`
        let mut branches = vec![self.parse_branch()?];

        self.skip_newlines();
        while self.eat(&Token::Elif) {
            branches.push(self.parse_branch()?);
            self.skip_newlines();
        }

        let else_body = if self.eat(&Token::Else) {
            self.expect(&Token::Colon, "':'")?;
            self.expect(&Token::Newline, "newline")?;
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::If { branches, else_body })
    }

    fn parse_branch(&mut self) -> Result<IfBranch, InkError> {
        let condition = self.parse_expression()?;
        self.expect(&Token::Colon, "':'")?;
        self.expect(&Token::Newline, "newline")?;
        let body = self.parse_block()?;
        Ok(IfBranch { condition, body })
    }

    /// `target (= | += | -= | *= | /=) expr NEWLINE`
    fn parse_assignment(&mut self) -> Result<Stmt, InkError> {
        if !matches!(self.peek(), Token::Ident(_)) {
            return Err(self.err(format!(
                "expected assignment statement, got '{}'",
                self.peek().describe()
            )));
        }
        let target = self.parse_name()?;

        let op = match self.peek() {
            Token::Assign => AssignOp::Set,
            Token::PlusEq => AssignOp::Add,
            Token::MinusEq => AssignOp::Sub,
            Token::StarEq => AssignOp::Mul,
            Token::SlashEq => AssignOp::Div,
            tok => {
                return Err(self.err(format!(
                    "expected assignment operator after '{target}', got '{}'",
                    tok.describe()
                )));
            }
        };
        self.advance();

        let value = self.parse_expression()?;
        self.expect(&Token::Newline, "newline")?;
        Ok(Stmt::Assign { target, op, value })
    }

    /// `IDENT ("." IDENT)?`, joined into a dotted name.
    fn parse_name(&mut self) -> Result<String, InkError> {
        let object = self.expect_ident("identifier")?;
        if self.eat(&Token::Dot) {
            let field = self.expect_ident("field name after '.'")?;
            Ok(format!("{object}.{field}"))
        } else {
            Ok(object)
        }
    }

    // ── Expressions ───────────────────────────────────────────────────────

    pub fn parse_expression(&mut self) -> Result<Expr, InkError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, InkError> {
        let mut lhs = self.parse_and()?;
        while self.eat(&Token::Or) {
            let rhs = self.parse_and()?;
            lhs = Expr::binary(BinOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, InkError> {
        let mut lhs = self.parse_not()?;
        while self.eat(&Token::And) {
            let rhs = self.parse_not()?;
            lhs = Expr::binary(BinOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Expr, InkError> {
        if self.eat(&Token::Not) {
            let operand = self.parse_not()?;
            return Ok(Expr::unary(UnaryOp::Not, operand));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, InkError> {
        let lhs = self.parse_add_sub()?;

        let op = match self.peek() {
            Token::Lt => BinOp::Lt,
            Token::Gt => BinOp::Gt,
            Token::LtEq => BinOp::LtEq,
            Token::GtEq => BinOp::GtEq,
            Token::EqEq => BinOp::Eq,
            Token::BangEq => BinOp::NotEq,
            _ => return Ok(lhs),
        };
        self.advance();

        let rhs = self.parse_add_sub()?;
        Ok(Expr::binary(op, lhs, rhs))
    }

    fn parse_add_sub(&mut self) -> Result<Expr, InkError> {
        let mut lhs = self.parse_mul_div_mod()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_mul_div_mod()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_mul_div_mod(&mut self) -> Result<Expr, InkError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, InkError> {
        if self.eat(&Token::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expr::unary(UnaryOp::Neg, operand));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, InkError> {
        match self.peek() {
            Token::Number(n) => {
                let n = *n;
                self.advance();
                Ok(Expr::Number(n))
            }
            Token::Ident(_) => Ok(Expr::Name(self.parse_name()?)),
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(expr)
            }
            tok => Err(self.err(format!("expected expression, got '{}'", tok.describe()))),
        }
    }
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parses `.ink` source into a [`Behavior`].
pub fn parse_str(src: &str) -> Result<Behavior, InkError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_behavior()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(src: &str) -> Vec<Stmt> {
        parse_str(src).unwrap().body.stmts
    }

    fn expr_of(line: &str) -> Expr {
        let src = format!("@behavior t:\n    x = {line}\n");
        match body(&src).remove(0) {
            Stmt::Assign { value, .. } => value,
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    fn name(s: &str) -> Expr {
        Expr::Name(s.to_string())
    }

    fn num(n: f64) -> Expr {
        Expr::Number(n)
    }

    #[test]
    fn behavior_name_and_statements() {
        let b = parse_str("# header\n\n@behavior bounce:\n    pos.x += dir.x * speed\n    rot = 0\n")
            .unwrap();
        assert_eq!(b.name, "bounce");
        assert_eq!(b.body.stmts.len(), 2);
        assert_eq!(
            b.body.stmts[0],
            Stmt::Assign {
                target: "pos.x".into(),
                op: AssignOp::Add,
                value: Expr::binary(BinOp::Mul, name("dir.x"), name("speed")),
            }
        );
    }

    #[test]
    fn all_assignment_operators() {
        let stmts = body("@behavior t:\n  a = 1\n  a += 1\n  a -= 1\n  a *= 1\n  a /= 1\n");
        let ops: Vec<AssignOp> = stmts
            .iter()
            .map(|s| match s {
                Stmt::Assign { op, .. } => *op,
                _ => panic!("expected assignment"),
            })
            .collect();
        assert_eq!(
            ops,
            vec![AssignOp::Set, AssignOp::Add, AssignOp::Sub, AssignOp::Mul, AssignOp::Div]
        );
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(
            expr_of("1 + 2 * 3"),
            Expr::binary(BinOp::Add, num(1.0), Expr::binary(BinOp::Mul, num(2.0), num(3.0)))
        );
    }

    #[test]
    fn subtraction_is_left_associative() {
        assert_eq!(
            expr_of("5 - 2 - 1"),
            Expr::binary(BinOp::Sub, Expr::binary(BinOp::Sub, num(5.0), num(2.0)), num(1.0))
        );
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(
            expr_of("(1 + 2) * 3"),
            Expr::binary(BinOp::Mul, Expr::binary(BinOp::Add, num(1.0), num(2.0)), num(3.0))
        );
    }

    #[test]
    fn logic_precedence() {
        // not > and > or
        assert_eq!(
            expr_of("a or not b and c"),
            Expr::binary(
                BinOp::Or,
                name("a"),
                Expr::binary(BinOp::And, Expr::unary(UnaryOp::Not, name("b")), name("c")),
            )
        );
    }

    #[test]
    fn comparison_operands_are_arithmetic() {
        assert_eq!(
            expr_of("pos.x + rect_w > bounds.w"),
            Expr::binary(
                BinOp::Gt,
                Expr::binary(BinOp::Add, name("pos.x"), name("rect_w")),
                name("bounds.w"),
            )
        );
    }

    #[test]
    fn unary_minus_nests() {
        assert_eq!(
            expr_of("--a"),
            Expr::unary(UnaryOp::Neg, Expr::unary(UnaryOp::Neg, name("a")))
        );
    }

    #[test]
    fn if_elif_else_chain() {
        let src = "\
@behavior t:
    if a < 0:
        a = 0
    elif a > 10:
        a = 10
    elif a == 5:
        a = 6
    else:
        a += 1
    b = 2
";
        let stmts = body(src);
        assert_eq!(stmts.len(), 2);
        match &stmts[0] {
            Stmt::If { branches, else_body } => {
                assert_eq!(branches.len(), 3);
                assert_eq!(else_body.as_ref().map(|b| b.stmts.len()), Some(1));
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn nested_if() {
        let src = "\
@behavior t:
    if a:
        if b:
            c = 1
        d = 2
";
        let stmts = body(src);
        let Stmt::If { branches, else_body } = &stmts[0] else { panic!("expected if") };
        assert!(else_body.is_none());
        assert_eq!(branches[0].body.stmts.len(), 2);
        assert!(matches!(branches[0].body.stmts[0], Stmt::If { .. }));
    }

    #[test]
    fn err_missing_header() {
        let err = parse_str("x = 1\n").unwrap_err();
        assert!(matches!(err, InkError::Parse { .. }));
        assert!(err.to_string().contains("@behavior"));
    }

    #[test]
    fn err_chained_comparison() {
        assert!(parse_str("@behavior t:\n    x = 1 < 2 < 3\n").is_err());
    }

    #[test]
    fn err_bare_expression_statement() {
        let err = parse_str("@behavior t:\n    1 + 2\n").unwrap_err();
        assert!(err.to_string().contains("expected assignment"));
    }

    #[test]
    fn err_missing_operator() {
        assert!(parse_str("@behavior t:\n    x 1\n").is_err());
    }

    #[test]
    fn err_unclosed_paren_reports_line() {
        let err = parse_str("@behavior t:\n    x = (1 + 2\n").unwrap_err();
        assert_eq!(err.position().map(|(line, _)| line), Some(2));
    }

    #[test]
    fn err_trailing_tokens_after_block() {
        assert!(parse_str("@behavior t:\n    x = 1\n@behavior u:\n    y = 1\n").is_err());
    }

    #[test]
    fn err_missing_block() {
        assert!(parse_str("@behavior t:\nx = 1\n").is_err());
    }
}

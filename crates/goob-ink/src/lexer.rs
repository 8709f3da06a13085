use crate::error::InkError;

// ── Token ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Number(f64),
    Ident(String),
    // Keywords
    If,
    Elif,
    Else,
    And,
    Or,
    Not,
    /// `@behavior` directive.
    Behavior,
    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    // Comparison
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    BangEq,
    // Assignment
    Assign,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    // Punctuation
    LParen,
    RParen,
    Colon,
    Dot,
    Comma,
    // Layout
    Newline,
    Indent,
    Dedent,
    // Sentinel
    Eof,
}

impl Token {
    /// Short human-readable form used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Ident(s) => s.clone(),
            Token::If => "if".into(),
            Token::Elif => "elif".into(),
            Token::Else => "else".into(),
            Token::And => "and".into(),
            Token::Or => "or".into(),
            Token::Not => "not".into(),
            Token::Behavior => "@behavior".into(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Star => "*".into(),
            Token::Slash => "/".into(),
            Token::Percent => "%".into(),
            Token::Lt => "<".into(),
            Token::Gt => ">".into(),
            Token::LtEq => "<=".into(),
            Token::GtEq => ">=".into(),
            Token::EqEq => "==".into(),
            Token::BangEq => "!=".into(),
            Token::Assign => "=".into(),
            Token::PlusEq => "+=".into(),
            Token::MinusEq => "-=".into(),
            Token::StarEq => "*=".into(),
            Token::SlashEq => "/=".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::Colon => ":".into(),
            Token::Dot => ".".into(),
            Token::Comma => ",".into(),
            Token::Newline => "newline".into(),
            Token::Indent => "indent".into(),
            Token::Dedent => "dedent".into(),
            Token::Eof => "end of file".into(),
        }
    }
}

/// A token paired with its 1-based source position.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPos {
    pub token: Token,
    pub line: usize,
    pub col: usize,
}

/// Columns a tab advances the indentation level by.
const TAB_WIDTH: usize = 4;

// ── Lexer ─────────────────────────────────────────────────────────────────

/// Indentation-aware tokenizer.
///
/// Block structure is expressed through `Indent` / `Dedent` tokens, the same
/// way Python-style grammars do it. Blank lines and comment-only lines never
/// affect indentation.
pub struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
    col: usize,
    at_line_start: bool,
    indent_stack: Vec<usize>,
    tokens: Vec<TokenWithPos>,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            col: 1,
            at_line_start: true,
            indent_stack: vec![0],
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<TokenWithPos>, InkError> {
        while self.peek().is_some() {
            if self.at_line_start {
                self.process_indentation()?;
                match self.peek() {
                    None => break,
                    Some('\n') | Some('\r') => {
                        self.advance();
                        continue;
                    }
                    Some('#') => {
                        self.skip_comment();
                        continue;
                    }
                    Some(_) => {}
                }
            }

            let (line, col) = (self.line, self.col);
            let Some(c) = self.peek() else { break };

            match c {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    let needs_newline = self
                        .tokens
                        .last()
                        .is_some_and(|t| !matches!(t.token, Token::Newline | Token::Indent));
                    if needs_newline {
                        self.push(Token::Newline, line, col);
                    }
                    self.at_line_start = true;
                }
                '#' => self.skip_comment(),
                '@' => {
                    self.advance();
                    let word = self.read_word();
                    if word == "behavior" {
                        self.push(Token::Behavior, line, col);
                    } else {
                        return Err(InkError::lex(
                            format!("unknown directive @{word}"),
                            line,
                            col,
                        ));
                    }
                }
                c if c.is_ascii_digit() => {
                    let tok = self.lex_number(line, col)?;
                    self.push(tok, line, col);
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let tok = keyword_or_ident(self.read_word());
                    self.push(tok, line, col);
                }
                _ => {
                    let tok = self.lex_operator(c, line, col)?;
                    self.push(tok, line, col);
                }
            }
        }

        let (line, col) = (self.line, self.col);

        if self.tokens.last().is_some_and(|t| t.token != Token::Newline) {
            self.push(Token::Newline, line, col);
        }

        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.push(Token::Dedent, line, col);
        }

        self.push(Token::Eof, line, col);
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.src[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn push(&mut self, token: Token, line: usize, col: usize) {
        self.tokens.push(TokenWithPos { token, line, col });
    }

    /// Skips to (not past) the end of the current line.
    fn skip_comment(&mut self) {
        while !matches!(self.peek(), None | Some('\n')) {
            self.advance();
        }
    }

    /// Measures leading whitespace and emits `Indent` / `Dedent` tokens.
    ///
    /// Leaves `at_line_start` set for blank and comment-only lines so the
    /// caller can skip them.
    fn process_indentation(&mut self) -> Result<(), InkError> {
        let mut indent = 0;
        loop {
            match self.peek() {
                Some(' ') => indent += 1,
                Some('\t') => indent += TAB_WIDTH,
                _ => break,
            }
            self.advance();
        }

        if matches!(self.peek(), None | Some('\n') | Some('\r') | Some('#')) {
            return Ok(());
        }

        let (line, col) = (self.line, self.col);
        let current = self.indent_stack.last().copied().unwrap_or(0);

        if indent > current {
            self.indent_stack.push(indent);
            self.push(Token::Indent, line, col);
        } else {
            while indent < self.indent_stack.last().copied().unwrap_or(0) {
                self.indent_stack.pop();
                self.push(Token::Dedent, line, col);
            }
            if indent != self.indent_stack.last().copied().unwrap_or(0) {
                return Err(InkError::lex("inconsistent indentation", line, col));
            }
        }

        self.at_line_start = false;
        Ok(())
    }

    fn read_word(&mut self) -> &'s str {
        let src = self.src;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        &src[start..self.pos]
    }

    fn lex_number(&mut self, line: usize, col: usize) -> Result<Token, InkError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') {
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        let s = &self.src[start..self.pos];
        s.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| InkError::lex(format!("invalid number {s:?}"), line, col))
    }

    fn lex_operator(&mut self, c: char, line: usize, col: usize) -> Result<Token, InkError> {
        self.advance();
        let tok = match c {
            '+' => if self.eat('=') { Token::PlusEq } else { Token::Plus },
            '-' => if self.eat('=') { Token::MinusEq } else { Token::Minus },
            '*' => if self.eat('=') { Token::StarEq } else { Token::Star },
            '/' => if self.eat('=') { Token::SlashEq } else { Token::Slash },
            '%' => Token::Percent,
            '<' => if self.eat('=') { Token::LtEq } else { Token::Lt },
            '>' => if self.eat('=') { Token::GtEq } else { Token::Gt },
            '=' => if self.eat('=') { Token::EqEq } else { Token::Assign },
            '!' => {
                if self.eat('=') {
                    Token::BangEq
                } else {
                    return Err(InkError::lex("unexpected '!' (did you mean '!='?)", line, col));
                }
            }
            '(' => Token::LParen,
            ')' => Token::RParen,
            ':' => Token::Colon,
            '.' => Token::Dot,
            ',' => Token::Comma,
            other => {
                return Err(InkError::lex(
                    format!("unexpected character {other:?}"),
                    line,
                    col,
                ));
            }
        };
        Ok(tok)
    }
}

fn keyword_or_ident(word: &str) -> Token {
    match word {
        "if" => Token::If,
        "elif" => Token::Elif,
        "else" => Token::Else,
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        _ => Token::Ident(word.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    fn ident(s: &str) -> Token {
        Token::Ident(s.to_string())
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![Token::Eof]);
        assert_eq!(kinds("\n\n   \n# only a comment\n"), vec![Token::Eof]);
    }

    #[test]
    fn header_and_block() {
        let toks = kinds("@behavior bounce:\n    rot += 1\n");
        assert_eq!(
            toks,
            vec![
                Token::Behavior,
                ident("bounce"),
                Token::Colon,
                Token::Newline,
                Token::Indent,
                ident("rot"),
                Token::PlusEq,
                Token::Number(1.0),
                Token::Newline,
                Token::Dedent,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn missing_trailing_newline_is_synthesized() {
        let toks = kinds("a = 1");
        assert_eq!(
            toks,
            vec![ident("a"), Token::Assign, Token::Number(1.0), Token::Newline, Token::Eof]
        );
    }

    #[test]
    fn nested_blocks_close_with_one_dedent_per_level() {
        let src = "@behavior b:\n  if x:\n    y = 1\nz = 2\n";
        let toks = kinds(src);
        let dedents = toks.iter().filter(|t| **t == Token::Dedent).count();
        let indents = toks.iter().filter(|t| **t == Token::Indent).count();
        assert_eq!(indents, 2);
        assert_eq!(dedents, 2);
        // Both dedents come right before `z`.
        let z = toks.iter().position(|t| *t == ident("z")).unwrap();
        assert_eq!(toks[z - 1], Token::Dedent);
        assert_eq!(toks[z - 2], Token::Dedent);
    }

    #[test]
    fn tab_counts_as_four_spaces() {
        let src = "a:\n\tb = 1\n    c = 2\n";
        let toks = kinds(src);
        assert_eq!(toks.iter().filter(|t| **t == Token::Indent).count(), 1);
    }

    #[test]
    fn blank_and_comment_lines_do_not_change_indentation() {
        let src = "a:\n    b = 1\n\n# top-level comment\n        \n    c = 2\n";
        let toks = kinds(src);
        assert_eq!(toks.iter().filter(|t| **t == Token::Indent).count(), 1);
        assert_eq!(toks.iter().filter(|t| **t == Token::Dedent).count(), 1);
    }

    #[test]
    fn crlf_line_endings() {
        let toks = kinds("a:\r\n    b = 1\r\n\r\n    c = 2\r\n");
        assert_eq!(toks.iter().filter(|t| **t == Token::Indent).count(), 1);
        assert_eq!(toks.iter().filter(|t| **t == Token::Newline).count(), 3);
    }

    #[test]
    fn inline_comment_is_ignored() {
        let toks = kinds("rot = 1 # spin\n");
        assert_eq!(
            toks,
            vec![ident("rot"), Token::Assign, Token::Number(1.0), Token::Newline, Token::Eof]
        );
    }

    #[test]
    fn operators_and_keywords() {
        let toks = kinds("a <= b and not c != d or e >= 1.5 % 2\n");
        assert_eq!(
            toks,
            vec![
                ident("a"),
                Token::LtEq,
                ident("b"),
                Token::And,
                Token::Not,
                ident("c"),
                Token::BangEq,
                ident("d"),
                Token::Or,
                ident("e"),
                Token::GtEq,
                Token::Number(1.5),
                Token::Percent,
                Token::Number(2.0),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn dotted_field_is_three_tokens() {
        let toks = kinds("pos.x\n");
        assert_eq!(toks[..3], [ident("pos"), Token::Dot, ident("x")]);
    }

    #[test]
    fn positions_are_one_based() {
        let toks = Lexer::new("a:\n  bb = 3\n").tokenize().unwrap();
        let bb = toks.iter().find(|t| t.token == ident("bb")).unwrap();
        assert_eq!((bb.line, bb.col), (2, 3));
    }

    #[test]
    fn err_inconsistent_indentation() {
        let err = Lexer::new("a:\n    b = 1\n  c = 2\n").tokenize().unwrap_err();
        assert!(matches!(err, InkError::Lex { line: 3, .. }));
    }

    #[test]
    fn err_lone_bang() {
        let err = Lexer::new("a = !b\n").tokenize().unwrap_err();
        assert!(err.to_string().contains("!="));
    }

    #[test]
    fn err_unknown_directive() {
        let err = Lexer::new("@system foo:\n").tokenize().unwrap_err();
        assert!(err.to_string().contains("@system"));
    }

    #[test]
    fn err_unexpected_character() {
        assert!(Lexer::new("a = $\n").tokenize().is_err());
    }
}

//! The hand-written lexer: turns source text into a flat token stream.

use crate::error::LexError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // program markers
    Begin,
    End,
    // block markers
    BlockStart,
    BlockEnd,
    BlockKw,
    // type keywords
    TypeInt,
    TypeFloat,
    TypeChar,
    TypeBool,
    TypeString,
    // literals
    IntLit,
    FloatLit,
    CharLit,
    StringLit,
    BoolTrue,
    BoolFalse,
    // operators
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Greater,
    Less,
    GreaterEq,
    LessEq,
    EqEq,
    NotEq,
    Increment,
    Concat,
    And,
    Or,
    Not,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    // delimiters
    Colon,
    Comma,
    LParen,
    RParen,
    Newline,
    // control keywords
    Mugna,
    Kung,
    Wala,
    Alang,
    Sa,
    Samtang,
    Ipakita,
    Dawat,
    Ident,
    Unknown,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
}

impl Token {
    fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }
}

/// Keyword lookup for bare (unquoted) identifiers.
///
/// `DILI` resolves to the unary `NOT` operator here; the boolean-literal
/// spelling of `DILI` only arises from the `"..."` string rule below.
fn keyword(word: &str) -> Option<TokenKind> {
    Some(match word {
        "SUGOD" => TokenKind::Begin,
        "KATAPUSAN" => TokenKind::End,
        "PUNDOK" => TokenKind::BlockKw,
        "NUMERO" => TokenKind::TypeInt,
        "TIPIK" => TokenKind::TypeFloat,
        "LETRA" => TokenKind::TypeChar,
        "TINUOD" => TokenKind::TypeBool,
        "PULONG" => TokenKind::TypeString,
        "MUGNA" => TokenKind::Mugna,
        "KUNG" => TokenKind::Kung,
        "WALA" => TokenKind::Wala,
        "ALANG" => TokenKind::Alang,
        "SA" => TokenKind::Sa,
        "SAMTANG" => TokenKind::Samtang,
        "IPAKITA" => TokenKind::Ipakita,
        "DAWAT" => TokenKind::Dawat,
        "UG" => TokenKind::And,
        "O" => TokenKind::Or,
        "DILI" => TokenKind::Not,
        _ => return None,
    })
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Nearest non-whitespace character before `pos` (exclusive), ignoring
    /// spaces, tabs and carriage returns but not crossing a real newline.
    fn prev_significant(&self, before: usize) -> Option<char> {
        let mut i = before;
        while i > 0 {
            i -= 1;
            let c = self.chars[i];
            if c == ' ' || c == '\t' || c == '\r' {
                continue;
            }
            return Some(c);
        }
        None
    }

    /// Nearest non-whitespace character at or after `from`.
    fn next_significant(&self, from: usize) -> Option<char> {
        let mut i = from;
        while let Some(&c) = self.chars.get(i) {
            if c == ' ' || c == '\t' || c == '\r' {
                i += 1;
                continue;
            }
            return Some(c);
        }
        None
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let span = tracing::debug_span!("lex");
        let _enter = span.enter();

        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            match self.peek() {
                None => return Ok(Token::new(TokenKind::Eof, "", self.line)),
                Some(' ') | Some('\t') | Some('\r') => {
                    self.advance();
                    continue;
                }
                Some('\n') => {
                    let line = self.line;
                    self.advance();
                    self.line += 1;
                    return Ok(Token::new(TokenKind::Newline, "\n", line));
                }
                Some('$') => {
                    let line = self.line;
                    self.advance();
                    return Ok(Token::new(TokenKind::Newline, "$", line));
                }
                _ => break,
            }
        }

        let line = self.line;
        let c = self.advance().expect("checked by peek above");

        match c {
            '{' => Ok(Token::new(TokenKind::BlockStart, "{", line)),
            '}' => Ok(Token::new(TokenKind::BlockEnd, "}", line)),
            '(' => Ok(Token::new(TokenKind::LParen, "(", line)),
            ')' => Ok(Token::new(TokenKind::RParen, ")", line)),
            ':' => Ok(Token::new(TokenKind::Colon, ":", line)),
            ',' => Ok(Token::new(TokenKind::Comma, ",", line)),
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::EqEq, "==", line))
                } else {
                    Ok(Token::new(TokenKind::Assign, "=", line))
                }
            }
            '+' => {
                if self.peek() == Some('+') {
                    self.advance();
                    Ok(Token::new(TokenKind::Increment, "++", line))
                } else if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::PlusAssign, "+=", line))
                } else {
                    Ok(Token::new(TokenKind::Plus, "+", line))
                }
            }
            '-' => {
                if self.peek() == Some('-') {
                    self.advance();
                    // line comment: consume to end of line, emit one newline
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                    let comment_line = self.line;
                    if self.peek() == Some('\n') {
                        self.advance();
                        self.line += 1;
                    }
                    Ok(Token::new(TokenKind::Newline, "\n", comment_line))
                } else if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::MinusAssign, "-=", line))
                } else {
                    Ok(Token::new(TokenKind::Minus, "-", line))
                }
            }
            '*' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::StarAssign, "*=", line))
                } else {
                    Ok(Token::new(TokenKind::Star, "*", line))
                }
            }
            '/' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::SlashAssign, "/=", line))
                } else {
                    Ok(Token::new(TokenKind::Slash, "/", line))
                }
            }
            '%' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::PercentAssign, "%=", line))
                } else {
                    Ok(Token::new(TokenKind::Percent, "%", line))
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::new(TokenKind::GreaterEq, ">=", line))
                } else {
                    Ok(Token::new(TokenKind::Greater, ">", line))
                }
            }
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    Ok(Token::new(TokenKind::LessEq, "<=", line))
                }
                Some('>') => {
                    self.advance();
                    Ok(Token::new(TokenKind::NotEq, "<>", line))
                }
                _ => Ok(Token::new(TokenKind::Less, "<", line)),
            },
            '&' => {
                // context-sensitive: swallowed entirely when `$` is the
                // nearest significant neighbor on either side.
                let left = self.prev_significant(self.pos - 1);
                let right = self.next_significant(self.pos);
                if left == Some('$') || right == Some('$') {
                    self.next_token()
                } else {
                    Ok(Token::new(TokenKind::Concat, "&", line))
                }
            }
            '[' => self.lex_bracket(line),
            '"' => self.lex_string(line),
            '\'' => self.lex_char(line),
            c if c.is_ascii_digit() => self.lex_number(c, line),
            c if c.is_alphabetic() || c == '_' => self.lex_ident(c, line),
            other => Ok(Token::new(TokenKind::Unknown, other.to_string(), line)),
        }
    }

    fn lex_bracket(&mut self, line: u32) -> Result<Token, LexError> {
        let start = self.pos;
        let mut last_close: Option<usize> = None;
        loop {
            match self.peek() {
                None => break,
                Some(']') => {
                    last_close = Some(self.pos);
                    self.advance();
                }
                Some('[') if last_close.is_some() => break,
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    self.advance();
                }
            }
        }
        match last_close {
            Some(end) => {
                let content: String = self.chars[start..end].iter().collect();
                self.pos = end + 1;
                Ok(Token::new(TokenKind::StringLit, content, line))
            }
            None => Err(LexError::UnterminatedBracket { line }),
        }
    }

    fn lex_string(&mut self, line: u32) -> Result<Token, LexError> {
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(LexError::UnterminatedString { line }),
                Some('"') => break,
                Some('\n') => return Err(LexError::UnterminatedString { line }),
                Some(_) => {
                    self.advance();
                }
            }
        }
        let content: String = self.chars[start..self.pos].iter().collect();
        self.advance(); // closing quote

        if content.contains("OO") {
            Ok(Token::new(TokenKind::BoolTrue, content, line))
        } else if content.contains("DILI") {
            Ok(Token::new(TokenKind::BoolFalse, content, line))
        } else {
            Ok(Token::new(TokenKind::StringLit, content, line))
        }
    }

    fn lex_char(&mut self, line: u32) -> Result<Token, LexError> {
        let c = match self.peek() {
            Some('\'') | None => return Err(LexError::EmptyCharLiteral { line }),
            Some(c) => c,
        };
        self.advance();
        match self.peek() {
            Some('\'') => {
                self.advance();
                Ok(Token::new(TokenKind::CharLit, c.to_string(), line))
            }
            _ => Err(LexError::EmptyCharLiteral { line }),
        }
    }

    fn lex_number(&mut self, first: char, line: u32) -> Result<Token, LexError> {
        let start = self.pos - 1;
        let _ = first;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        let mut is_float = false;
        if self.peek() == Some('.') {
            is_float = true;
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
            // a second dot terminates the number; leave it unconsumed
        }
        let lexeme: String = self.chars[start..self.pos].iter().collect();
        let kind = if is_float {
            TokenKind::FloatLit
        } else {
            TokenKind::IntLit
        };
        Ok(Token::new(kind, lexeme, line))
    }

    fn lex_ident(&mut self, first: char, line: u32) -> Result<Token, LexError> {
        let start = self.pos - 1;
        let _ = first;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match keyword(&word) {
            Some(TokenKind::Not) => Ok(Token::new(TokenKind::Not, "NOT", line)),
            Some(kind) => Ok(Token::new(kind, word, line)),
            None => Ok(Token::new(TokenKind::Ident, word, line)),
        }
    }
}

/// Tokenize a complete source string.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

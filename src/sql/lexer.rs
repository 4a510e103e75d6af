use crate::statement::SqlDialect;

/// Keywords after which a `+`/`-` starts a signed number rather than acting
/// as a binary operator.
const UNARY_KEYWORDS: &[&str] = &[
    "AND", "BETWEEN", "BY", "CASE", "DEFAULT", "ELSE", "HAVING", "IN", "INTERVAL", "IS", "LIKE",
    "LIMIT", "NOT", "OFFSET", "ON", "OR", "RETURN", "SELECT", "SET", "THEN", "VALUES", "WHEN",
    "WHERE",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Identifier or keyword, dots included (`schema.table`).
    Word,
    /// Backtick identifier, or a double-quoted one under
    /// [`SqlDialect::DoubleQuotedIdentifiers`].
    QuotedIdent,
    /// String, numeric, hex or dollar-quoted literal. Also anything left
    /// unterminated.
    Literal,
    /// Bound parameter already present in the input: `?`, `$1`, `:name`, `$name`.
    Placeholder,
    LineComment,
    BlockComment,
    /// A single character of punctuation or operator.
    Punct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Whitespace separated this token from the previous one.
    pub space_before: bool,
}

impl Token<'_> {
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(keyword)
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct && self.text.chars().eq(std::iter::once(c))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::LineComment | TokenKind::BlockComment)
    }

    pub fn is_redacted(&self) -> bool {
        matches!(self.kind, TokenKind::Literal | TokenKind::Placeholder)
    }
}

/// One interpretation of a string literal, advanced a character at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reading {
    Outside,
    Inside,
    /// The next character belongs to the string whatever it is (after a
    /// backslash, or the second quote of a doubled pair).
    Escaped,
}

impl Reading {
    fn step(self, c: char, next: Option<char>, quote: char, backslash: bool) -> Self {
        match self {
            Reading::Escaped => Reading::Inside,
            Reading::Outside if c == quote => Reading::Inside,
            Reading::Outside => Reading::Outside,
            Reading::Inside if backslash && c == '\\' => Reading::Escaped,
            Reading::Inside if c == quote && next == Some(quote) => Reading::Escaped,
            Reading::Inside if c == quote => Reading::Outside,
            Reading::Inside => Reading::Inside,
        }
    }
}

/// Left-to-right scanner. Every call to `next` consumes at least one
/// character, so lexing always terminates.
pub(crate) struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    dialect: SqlDialect,
    /// Last non-comment token, for sign disambiguation.
    prev: Option<Token<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str, dialect: SqlDialect) -> Self {
        Self {
            src,
            pos: 0,
            dialect,
            prev: None,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn scan(&mut self, c: char) -> TokenKind {
        match c {
            '\'' => self.scan_string('\''),
            '"' => match self.dialect {
                SqlDialect::DoubleQuotedStrings => self.scan_string('"'),
                SqlDialect::DoubleQuotedIdentifiers => {
                    self.scan_quoted('"', TokenKind::QuotedIdent)
                }
            },
            '`' => self.scan_quoted('`', TokenKind::QuotedIdent),
            '-' if self.peek_nth(1) == Some('-') => {
                self.eat_while(|c| c != '\n' && c != '\r');
                TokenKind::LineComment
            }
            '/' if self.peek_nth(1) == Some('*') => self.scan_block_comment(),
            '$' => self.scan_dollar(),
            '?' => {
                self.bump();
                TokenKind::Placeholder
            }
            ':' if self.starts_named_parameter() => {
                self.bump();
                self.eat_while(is_ident_continue);
                TokenKind::Placeholder
            }
            '0'..='9' => self.scan_number(),
            '.' if self.peek_nth(1).is_some_and(|d| d.is_ascii_digit()) => self.scan_number(),
            '+' | '-' if self.starts_signed_number() => {
                self.bump();
                self.scan_number()
            }
            c if is_ident_start(c) => {
                self.eat_while(is_ident_continue);
                TokenKind::Word
            }
            _ => {
                self.bump();
                TokenKind::Punct
            }
        }
    }

    /// Quoted identifier: doubled quotes escape. Unterminated runs swallow the
    /// rest of the input as a literal.
    fn scan_quoted(&mut self, quote: char, kind: TokenKind) -> TokenKind {
        self.bump();
        while let Some(c) = self.bump() {
            if c == quote {
                if self.peek() == Some(quote) {
                    self.bump();
                } else {
                    return kind;
                }
            }
        }
        TokenKind::Literal
    }

    /// String literal. Whether a backslash escapes depends on the server
    /// (MySQL: yes, standard SQL: no), so both readings run in lockstep and the
    /// literal only ends where both are outside a string. A trailing backslash
    /// (`'C:\'`) therefore over-redacts instead of exposing the next literal.
    fn scan_string(&mut self, quote: char) -> TokenKind {
        self.bump();
        let mut standard = Reading::Inside;
        let mut escaping = Reading::Inside;
        while standard != Reading::Outside || escaping != Reading::Outside {
            let Some(c) = self.bump() else {
                break;
            };
            let next = self.peek();
            standard = standard.step(c, next, quote, false);
            escaping = escaping.step(c, next, quote, true);
        }
        TokenKind::Literal
    }

    fn scan_block_comment(&mut self) -> TokenKind {
        self.pos += 2;
        let mut depth = 1usize;
        while depth > 0 {
            let rest = self.rest();
            if rest.starts_with("*/") {
                self.pos += 2;
                depth -= 1;
            } else if rest.starts_with("/*") {
                self.pos += 2;
                depth += 1;
            } else if self.bump().is_none() {
                return TokenKind::Literal;
            }
        }
        TokenKind::BlockComment
    }

    /// `$1` and `$name` are parameters, `$$...$$` and `$tag$...$tag$` are
    /// dollar-quoted strings, anything else is punctuation.
    fn scan_dollar(&mut self) -> TokenKind {
        let src = self.src;
        let start = self.pos;
        self.bump();
        match self.peek() {
            Some(d) if d.is_ascii_digit() => {
                self.eat_while(|c| c.is_ascii_digit());
                TokenKind::Placeholder
            }
            Some('$') => {
                self.bump();
                self.scan_dollar_body(&src[start..self.pos])
            }
            Some(c) if c.is_alphabetic() || c == '_' => {
                self.eat_while(|c| c.is_alphanumeric() || c == '_');
                if self.peek() == Some('$') {
                    self.bump();
                    self.scan_dollar_body(&src[start..self.pos])
                } else {
                    TokenKind::Placeholder
                }
            }
            _ => TokenKind::Punct,
        }
    }

    fn scan_dollar_body(&mut self, tag: &str) -> TokenKind {
        match self.rest().find(tag) {
            Some(offset) => self.pos += offset + tag.len(),
            None => self.pos = self.src.len(),
        }
        TokenKind::Literal
    }

    fn scan_number(&mut self) -> TokenKind {
        let rest = self.rest();
        let is_hex = (rest.starts_with("0x") || rest.starts_with("0X"))
            && rest[2..].starts_with(|c: char| c.is_ascii_hexdigit());
        if is_hex {
            self.pos += 2;
            self.eat_while(|c| c.is_ascii_hexdigit());
        } else {
            self.eat_while(|c| c.is_ascii_digit());
            if self.peek() == Some('.') {
                self.bump();
                self.eat_while(|c| c.is_ascii_digit());
            }
            if matches!(self.peek(), Some('e' | 'E')) && self.exponent_follows() {
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                self.eat_while(|c| c.is_ascii_digit());
            }
        }
        // Glued identifier characters (`12abc`) stay inside the literal.
        self.eat_while(is_ident_continue);
        TokenKind::Literal
    }

    fn exponent_follows(&self) -> bool {
        match self.peek_nth(1) {
            Some(d) if d.is_ascii_digit() => true,
            Some('+' | '-') => self.peek_nth(2).is_some_and(|d| d.is_ascii_digit()),
            _ => false,
        }
    }

    fn starts_named_parameter(&self) -> bool {
        !self.src[..self.pos].ends_with(':') && self.peek_nth(1).is_some_and(is_ident_start)
    }

    fn starts_signed_number(&self) -> bool {
        let number_follows = match self.peek_nth(1) {
            Some(d) if d.is_ascii_digit() => true,
            Some('.') => self.peek_nth(2).is_some_and(|d| d.is_ascii_digit()),
            _ => false,
        };
        number_follows && self.in_unary_position()
    }

    fn in_unary_position(&self) -> bool {
        match self.prev {
            None => true,
            Some(prev) => match prev.kind {
                TokenKind::Punct => !matches!(prev.text, ")" | "]" | "}"),
                TokenKind::Word => UNARY_KEYWORDS.iter().any(|k| prev.text.eq_ignore_ascii_case(k)),
                _ => false,
            },
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let whitespace_start = self.pos;
        self.eat_while(char::is_whitespace);
        let space_before = self.pos > whitespace_start;

        let start = self.pos;
        let c = self.peek()?;
        let kind = self.scan(c);
        let token = Token {
            kind,
            text: &self.src[start..self.pos],
            space_before,
        };
        if !token.is_comment() {
            self.prev = Some(token);
        }
        Some(token)
    }
}

/// Letters, `_`, and any non-ASCII, non-space character: Unicode identifiers
/// are treated as opaque runs.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || (!c.is_ascii() && !c.is_whitespace())
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '$' || c == '.'
}

mod classify;
mod lexer;
mod render;

use crate::config::SanitizerConfig;
use crate::statement::{SqlDialect, StatementInfo};

use classify::Classification;
use lexer::{Lexer, Token, TokenKind};

/// Tokenizing sanitizer for SQL and SQL-like dialects (HQL, N1QL, CQL).
///
/// `parse` never fails: malformed input degrades to an over-redacted rendering
/// with whatever classification could still be recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlParser {
    dialect: SqlDialect,
    max_length: usize,
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new(SqlDialect::default(), 32 * 1024)
    }
}

impl SqlParser {
    pub fn new(dialect: SqlDialect, max_length: usize) -> Self {
        Self {
            dialect,
            max_length: max_length.max(1),
        }
    }

    pub fn from_config(config: &SanitizerConfig) -> Self {
        Self::new(config.dialect, config.max_statement_length)
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn parse(&self, raw: &str) -> StatementInfo {
        let tokens: Vec<Token<'_>> = Lexer::new(raw, self.dialect).collect();

        if let Some(info) = redact_credentials(&tokens) {
            return info;
        }

        let sanitized = render::render(&tokens, self.max_length);
        let Classification { operation, table } = classify::classify(&tokens);
        StatementInfo {
            sanitized_text: Some(sanitized),
            operation,
            table,
        }
    }
}

/// `CONNECT`, `CREATE USER` and `ALTER USER` can carry unquoted passwords
/// (`IDENTIFIED BY secret`, `PASSWORD secret`). Keep the leading keywords and
/// collapse everything after them to one placeholder.
fn redact_credentials(tokens: &[Token<'_>]) -> Option<StatementInfo> {
    let mut significant = tokens.iter().filter(|t| !t.is_comment());
    let first = significant.next()?;
    if first.kind != TokenKind::Word {
        return None;
    }

    let (kept, operation) = if first.is_keyword("CONNECT") {
        (vec![first.text], None)
    } else if first.is_keyword("CREATE") || first.is_keyword("ALTER") {
        let second = significant.next()?;
        if !(second.is_keyword("USER") || second.is_keyword("LOGIN")) {
            return None;
        }
        let operation = format!(
            "{} {}",
            first.text.to_ascii_uppercase(),
            second.text.to_ascii_uppercase()
        );
        (vec![first.text, second.text], Some(operation))
    } else {
        return None;
    };

    // A bare `CONNECT` or `CREATE USER` has nothing to hide.
    significant.next()?;

    let mut sanitized = kept.join(" ");
    sanitized.push(' ');
    sanitized.push(render::PLACEHOLDER);
    Some(StatementInfo {
        sanitized_text: Some(sanitized),
        operation,
        table: None,
    })
}

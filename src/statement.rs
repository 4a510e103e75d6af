use serde::{Deserialize, Serialize};

/// How a double-quoted run (`"..."`) is lexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlDialect {
    /// `"x"` is a string literal and gets redacted (MySQL, N1QL, CQL-style).
    #[default]
    DoubleQuotedStrings,
    /// `"x"` is a quoted identifier and is kept verbatim (ANSI SQL, PostgreSQL).
    DoubleQuotedIdentifiers,
}

/// Result of sanitizing a SQL-like statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatementInfo {
    /// The statement with every literal replaced by `?`. `None` only when the
    /// caller passed no statement at all.
    pub sanitized_text: Option<String>,

    /// Upper-cased leading verb, e.g. `SELECT` or `CREATE TABLE`.
    pub operation: Option<String>,

    /// Best-effort target table, collection or procedure name.
    pub table: Option<String>,
}

impl StatementInfo {
    /// Info for a statement that was passed through untouched.
    pub fn passthrough(raw: Option<&str>) -> Self {
        Self {
            sanitized_text: raw.map(str::to_string),
            operation: None,
            table: None,
        }
    }

    /// Low-cardinality span name: `"OP table"`, `"OP"`, or `None` when the
    /// operation is unknown.
    pub fn span_name(&self) -> Option<String> {
        let operation = self.operation.as_deref()?;
        match self.table.as_deref() {
            Some(table) => Some(format!("{operation} {table}")),
            None => Some(operation.to_string()),
        }
    }
}

impl std::fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlDialect::DoubleQuotedStrings => write!(f, "double_quoted_strings"),
            SqlDialect::DoubleQuotedIdentifiers => write!(f, "double_quoted_identifiers"),
        }
    }
}

impl std::str::FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "double_quoted_strings" | "strings" => Ok(SqlDialect::DoubleQuotedStrings),
            "double_quoted_identifiers" | "identifiers" | "ansi" => {
                Ok(SqlDialect::DoubleQuotedIdentifiers)
            }
            _ => Err(format!("unknown sql dialect: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_name_variants() {
        let info = StatementInfo {
            sanitized_text: Some("SELECT * FROM users".into()),
            operation: Some("SELECT".into()),
            table: Some("users".into()),
        };
        assert_eq!(info.span_name().as_deref(), Some("SELECT users"));

        let info = StatementInfo {
            table: None,
            ..info
        };
        assert_eq!(info.span_name().as_deref(), Some("SELECT"));

        assert_eq!(StatementInfo::passthrough(Some("x")).span_name(), None);
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!(
            "ANSI".parse::<SqlDialect>(),
            Ok(SqlDialect::DoubleQuotedIdentifiers)
        );
        assert_eq!(
            "double_quoted_strings".parse::<SqlDialect>(),
            Ok(SqlDialect::DoubleQuotedStrings)
        );
        assert!("oracle".parse::<SqlDialect>().is_err());
    }
}

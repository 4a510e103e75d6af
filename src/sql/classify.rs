//! Keyword-anchored operation and table detection.
//!
//! Only the first statement is inspected, and anchors are matched at
//! parenthesis depth zero so subqueries never shift the top-level target.

use super::lexer::{Token, TokenKind};

/// Keywords that end a `FROM` list; a comma before one of these means the
/// statement reads from several tables.
const CLAUSE_END: &[&str] = &[
    "WHERE", "GROUP", "ORDER", "HAVING", "LIMIT", "OFFSET", "UNION", "EXCEPT", "INTERSECT",
    "WINDOW", "FETCH", "FOR", "RETURNING",
];

/// Keywords that stop the search for an `INTO`/`FROM` anchor.
const ANCHOR_BOUNDARY: &[&str] = &["WHERE", "SET", "VALUES", "SELECT"];

/// Words that can never be a table name.
const NOT_A_NAME: &[&str] = &[
    "SELECT", "FROM", "WHERE", "SET", "VALUES", "JOIN", "ON", "USING", "AS", "INTO", "GROUP",
    "ORDER", "LIMIT", "UNION",
];

const DDL_MODIFIERS: &[&str] = &[
    "OR", "REPLACE", "TEMP", "TEMPORARY", "UNIQUE", "GLOBAL", "LOCAL", "UNLOGGED", "EXTERNAL",
    "MATERIALIZED", "VIRTUAL",
];

const DDL_OBJECTS: &[&str] = &[
    "TABLE", "INDEX", "VIEW", "PROCEDURE", "FUNCTION", "TRIGGER", "SEQUENCE", "SCHEMA",
    "DATABASE", "KEYSPACE", "TYPE", "USER", "ROLE", "EXTENSION",
];

const UPDATE_MODIFIERS: &[&str] = &["LOW_PRIORITY", "IGNORE", "ONLY"];

const DML_VERBS: &[&str] = &["SELECT", "INSERT", "UPDATE", "DELETE", "MERGE", "UPSERT", "REPLACE"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Classification {
    pub operation: Option<String>,
    pub table: Option<String>,
}

impl Classification {
    fn new(operation: &str, table: Option<String>) -> Self {
        Self {
            operation: Some(operation.to_string()),
            table,
        }
    }
}

/// A non-comment token of the first statement, tagged with its paren depth.
#[derive(Debug, Clone, Copy)]
struct Sig<'a> {
    token: Token<'a>,
    depth: usize,
}

pub(crate) fn classify(tokens: &[Token<'_>]) -> Classification {
    let stmt = first_statement(tokens);
    // JDBC escape syntax: `{call proc(?)}`
    let stmt = match stmt.split_first() {
        Some((first, rest)) if first.token.is_punct('{') => rest,
        _ => &stmt[..],
    };

    let Some(first) = stmt.first() else {
        return Classification::default();
    };
    if first.token.kind != TokenKind::Word {
        return Classification::default();
    }

    let verb = first.token.text.to_ascii_uppercase();
    match verb.as_str() {
        "SELECT" => Classification::new("SELECT", select_table(stmt, 1)),
        // HQL / JPQL shorthand: `FROM Entity WHERE ...`
        "FROM" => Classification::new("SELECT", select_table(stmt, 0)),
        "INSERT" | "REPLACE" | "UPSERT" => Classification::new(&verb, anchored_table(stmt, "INTO")),
        "DELETE" => Classification::new(&verb, anchored_table(stmt, "FROM")),
        "UPDATE" => Classification::new(&verb, update_table(stmt)),
        "MERGE" => Classification::new(&verb, merge_table(stmt)),
        "CALL" => Classification::new(&verb, procedure_name(stmt)),
        "CREATE" | "DROP" | "ALTER" | "TRUNCATE" => ddl(stmt, &verb),
        "WITH" => with_operation(stmt),
        _ => Classification::default(),
    }
}

fn first_statement<'a>(tokens: &[Token<'a>]) -> Vec<Sig<'a>> {
    let mut depth = 0usize;
    let mut stmt = Vec::new();
    for token in tokens.iter().filter(|t| !t.is_comment()) {
        if depth == 0 && token.is_punct(';') {
            break;
        }
        if token.is_punct(')') {
            depth = depth.saturating_sub(1);
        }
        stmt.push(Sig {
            token: *token,
            depth,
        });
        if token.is_punct('(') {
            depth += 1;
        }
    }
    stmt
}

fn is_any_keyword(token: &Token<'_>, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| token.is_keyword(k))
}

/// Single table of a `SELECT`, or `None` for joins, comma lists, unions and
/// sub-selects. `search_from` is where the `FROM` search starts.
fn select_table(stmt: &[Sig<'_>], search_from: usize) -> Option<String> {
    if stmt.iter().skip(1).any(|s| s.token.is_keyword("SELECT")) {
        return None;
    }

    let from = stmt
        .iter()
        .enumerate()
        .skip(search_from)
        .filter(|(_, s)| s.depth == 0)
        .find(|(_, s)| s.token.is_keyword("FROM") || is_any_keyword(&s.token, ANCHOR_BOUNDARY))
        .filter(|(_, s)| s.token.is_keyword("FROM"))?
        .0;

    let (name, next) = qualified_name(stmt, from + 1)?;
    let rest = &stmt[next..];

    if rest
        .iter()
        .any(|s| s.depth == 0 && s.token.is_keyword("JOIN"))
    {
        return None;
    }
    for s in rest.iter().filter(|s| s.depth == 0) {
        if is_any_keyword(&s.token, CLAUSE_END) {
            break;
        }
        if s.token.is_punct(',') {
            return None;
        }
    }
    Some(name)
}

fn anchored_table(stmt: &[Sig<'_>], anchor: &str) -> Option<String> {
    for (i, s) in stmt.iter().enumerate().skip(1) {
        if s.depth != 0 {
            continue;
        }
        if s.token.is_keyword(anchor) {
            return qualified_name(stmt, i + 1).map(|(name, _)| name);
        }
        if is_any_keyword(&s.token, ANCHOR_BOUNDARY) {
            return None;
        }
    }
    None
}

fn update_table(stmt: &[Sig<'_>]) -> Option<String> {
    let mut idx = 1;
    while stmt
        .get(idx)
        .is_some_and(|s| is_any_keyword(&s.token, UPDATE_MODIFIERS))
    {
        idx += 1;
    }
    qualified_name(stmt, idx).map(|(name, _)| name)
}

/// `INTO` is optional in several dialects.
fn merge_table(stmt: &[Sig<'_>]) -> Option<String> {
    let idx = if stmt.get(1).is_some_and(|s| s.token.is_keyword("INTO")) {
        2
    } else {
        1
    };
    qualified_name(stmt, idx).map(|(name, _)| name)
}

/// `call proc`, `call proc(...)`; anything else after the name
/// (`call next value for seq`) is not a procedure call.
fn procedure_name(stmt: &[Sig<'_>]) -> Option<String> {
    let (name, next) = qualified_name(stmt, 1)?;
    match stmt.get(next) {
        None => Some(name),
        Some(s) if s.token.is_punct('(') || s.token.is_punct('}') => Some(name),
        Some(_) => None,
    }
}

fn ddl(stmt: &[Sig<'_>], verb: &str) -> Classification {
    let mut idx = 1;
    while stmt
        .get(idx)
        .is_some_and(|s| is_any_keyword(&s.token, DDL_MODIFIERS))
    {
        idx += 1;
    }

    let object = stmt
        .get(idx)
        .filter(|s| is_any_keyword(&s.token, DDL_OBJECTS));
    let Some(object) = object else {
        // `TRUNCATE orders`
        let table = if verb == "TRUNCATE" {
            qualified_name(stmt, idx).map(|(name, _)| name)
        } else {
            None
        };
        return Classification::new(verb, table);
    };

    let object_name = object.token.text.to_ascii_uppercase();
    let operation = format!("{verb} {object_name}");
    if object_name != "TABLE" {
        return Classification {
            operation: Some(operation),
            table: None,
        };
    }

    let mut name_idx = idx + 1;
    if stmt.get(name_idx).is_some_and(|s| s.token.is_keyword("IF")) {
        name_idx += 1;
        if stmt.get(name_idx).is_some_and(|s| s.token.is_keyword("NOT")) {
            name_idx += 1;
        }
        if stmt
            .get(name_idx)
            .is_some_and(|s| s.token.is_keyword("EXISTS"))
        {
            name_idx += 1;
        }
    }
    Classification {
        operation: Some(operation),
        table: qualified_name(stmt, name_idx).map(|(name, _)| name),
    }
}

/// A CTE reports the first top-level verb after its definitions, and no table.
fn with_operation(stmt: &[Sig<'_>]) -> Classification {
    let operation = stmt
        .iter()
        .skip(1)
        .filter(|s| s.depth == 0)
        .find_map(|s| {
            DML_VERBS
                .iter()
                .find(|verb| s.token.is_keyword(verb))
                .map(|verb| verb.to_string())
        });
    Classification {
        operation,
        table: None,
    }
}

/// Read a possibly qualified name starting at `idx`. Parts must be glued
/// together (`a.b`, `` `a`.`b` ``). Returns the name and the index after it.
///
/// A name made of one quoted identifier is returned without its quotes.
fn qualified_name(stmt: &[Sig<'_>], idx: usize) -> Option<(String, usize)> {
    let first = stmt.get(idx)?;
    match first.token.kind {
        TokenKind::Word if !is_any_keyword(&first.token, NOT_A_NAME) => {}
        TokenKind::QuotedIdent => {}
        _ => return None,
    }

    let mut end = idx + 1;
    while let Some(s) = stmt.get(end) {
        let glued = !s.token.space_before
            && (matches!(s.token.kind, TokenKind::Word | TokenKind::QuotedIdent)
                || s.token.is_punct('.'));
        if !glued {
            break;
        }
        end += 1;
    }

    if end == idx + 1 && first.token.kind == TokenKind::QuotedIdent {
        return Some((unquote(first.token.text), end));
    }
    let name = stmt[idx..end].iter().map(|s| s.token.text).collect();
    Some((name, end))
}

fn unquote(text: &str) -> String {
    let mut chars = text.chars();
    let Some(quote) = chars.next() else {
        return String::new();
    };
    chars.next_back();
    let doubled: String = [quote, quote].iter().collect();
    chars.as_str().replace(&doubled, &quote.to_string())
}

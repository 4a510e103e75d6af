use super::lexer::{Token, TokenKind};

pub(crate) const PLACEHOLDER: char = '?';

/// Render tokens with every literal and parameter replaced by `?`.
///
/// Whitespace runs collapse to one space (a newline after a line comment so
/// the comment does not swallow what follows), and value-only `IN` lists fold
/// to `IN (?)`. Output is capped at `max_len` bytes on a char boundary.
///
/// Terminated comments are copied verbatim, body included: a literal written
/// inside `-- ...` or `/* ... */` is not redacted.
pub(crate) fn render(tokens: &[Token<'_>], max_len: usize) -> String {
    let mut out = String::with_capacity(max_len.min(estimated_len(tokens)));
    let mut prev: Option<&Token<'_>> = None;
    let mut i = 0;

    while i < tokens.len() && out.len() < max_len {
        let token = &tokens[i];
        push_separator(&mut out, prev, token);
        if token.is_redacted() {
            out.push(PLACEHOLDER);
        } else {
            out.push_str(token.text);
        }
        prev = Some(token);
        i += 1;

        if token.is_keyword("IN") {
            if let Some(close) = value_list_end(tokens, i) {
                push_separator(&mut out, prev, &tokens[i]);
                out.push('(');
                out.push(PLACEHOLDER);
                out.push(')');
                prev = Some(&tokens[close]);
                i = close + 1;
            }
        }
    }

    truncate_at_char_boundary(&mut out, max_len);
    out
}

fn estimated_len(tokens: &[Token<'_>]) -> usize {
    tokens.iter().map(|t| t.text.len() + 1).sum()
}

fn push_separator(out: &mut String, prev: Option<&Token<'_>>, token: &Token<'_>) {
    match prev {
        None => {}
        Some(p) if p.kind == TokenKind::LineComment => out.push('\n'),
        Some(_) if token.space_before => out.push(' '),
        Some(_) => {}
    }
}

/// If `tokens[open]` opens a parenthesized list made only of literals,
/// parameters and commas, return the index of its closing parenthesis.
fn value_list_end(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    if !tokens.get(open)?.is_punct('(') {
        return None;
    }
    let mut values = 0usize;
    for (offset, token) in tokens[open + 1..].iter().enumerate() {
        if token.is_redacted() {
            values += 1;
        } else if token.is_punct(')') {
            return (values > 0).then_some(open + 1 + offset);
        } else if !token.is_punct(',') {
            return None;
        }
    }
    None
}

pub(crate) fn truncate_at_char_boundary(out: &mut String, max_len: usize) {
    if out.len() <= max_len {
        return;
    }
    let mut end = max_len;
    while !out.is_char_boundary(end) {
        end -= 1;
    }
    out.truncate(end);
}

pub mod table;

use std::borrow::Cow;

pub use table::COMMAND_TABLE;

/// Per-command redaction policy for argument-list protocols (Redis, Valkey).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandStrategy {
    /// Render every argument verbatim.
    KeepAll,
    /// Render the first `n` arguments, redact the rest.
    KeepFirstN(usize),
    /// Render the first `n` arguments, then only the key of each key/value pair.
    KeyValuePairs(usize),
    /// `EVAL`/`EVALSHA`: script, key count and the declared keys stay visible.
    ScriptWithKeys,
}

impl CommandStrategy {
    /// Fail-safe default for unknown commands: keep only the command name.
    pub const REDACT_ALL: Self = Self::KeepFirstN(0);

    /// Case-insensitive table lookup, falling back to [`CommandStrategy::REDACT_ALL`].
    pub fn for_command(command: &str) -> Self {
        COMMAND_TABLE
            .get(command.to_ascii_uppercase().as_str())
            .copied()
            .unwrap_or(Self::REDACT_ALL)
    }

    /// Render `command` followed by its arguments, each either verbatim or `?`.
    pub fn apply<A: AsRef<[u8]>>(self, command: &str, args: &[A]) -> String {
        let mut out = String::with_capacity(command.len() + args.len() * 8);
        out.push_str(command);

        match self {
            CommandStrategy::KeepAll => {
                for arg in args {
                    push_arg(&mut out, arg);
                }
            }
            CommandStrategy::KeepFirstN(keep) => push_kept_then_masked(&mut out, args, keep),
            CommandStrategy::KeyValuePairs(skip) => {
                let skip = skip.min(args.len());
                for arg in &args[..skip] {
                    push_arg(&mut out, arg);
                }
                // A trailing key without its value still renders `key ?`.
                for pair in args[skip..].chunks(2) {
                    push_arg(&mut out, &pair[0]);
                    out.push_str(" ?");
                }
            }
            CommandStrategy::ScriptWithKeys => {
                // A negative count narrows the kept window; an unparseable one
                // declares no keys.
                let keys = if args.len() > 2 {
                    arg_to_str(&args[1]).parse::<i64>().unwrap_or(0)
                } else {
                    0
                };
                let keep = usize::try_from(keys.saturating_add(2).max(0)).unwrap_or(usize::MAX);
                push_kept_then_masked(&mut out, args, keep);
            }
        }
        out
    }
}

/// Redact a command's arguments according to the command table.
///
/// ```
/// use dbscrub::command::normalize;
///
/// assert_eq!(normalize("AUTH", &["password123"]), "AUTH ?");
/// assert_eq!(
///     normalize("HMSET", &["hash", "creditcard", "1234567887654321", "address", "asdf"]),
///     "HMSET hash creditcard ? address ?"
/// );
/// ```
pub fn normalize<A: AsRef<[u8]>>(command: &str, args: &[A]) -> String {
    CommandStrategy::for_command(command).apply(command, args)
}

/// One argument of a command: text or raw bytes. Lets callers mix both in a
/// single argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandArg<'a> {
    Str(&'a str),
    Bytes(&'a [u8]),
}

impl AsRef<[u8]> for CommandArg<'_> {
    fn as_ref(&self) -> &[u8] {
        match self {
            CommandArg::Str(s) => s.as_bytes(),
            CommandArg::Bytes(b) => b,
        }
    }
}

impl<'a> From<&'a str> for CommandArg<'a> {
    fn from(s: &'a str) -> Self {
        CommandArg::Str(s)
    }
}

impl<'a> From<&'a String> for CommandArg<'a> {
    fn from(s: &'a String) -> Self {
        CommandArg::Str(s)
    }
}

impl<'a> From<&'a [u8]> for CommandArg<'a> {
    fn from(b: &'a [u8]) -> Self {
        CommandArg::Bytes(b)
    }
}

impl<'a> From<&'a Vec<u8>> for CommandArg<'a> {
    fn from(b: &'a Vec<u8>) -> Self {
        CommandArg::Bytes(b)
    }
}

/// Kept arguments are decoded lossily; non-UTF-8 bytes never cause a failure.
fn arg_to_str<A: AsRef<[u8]>>(arg: &A) -> Cow<'_, str> {
    String::from_utf8_lossy(arg.as_ref())
}

fn push_arg<A: AsRef<[u8]>>(out: &mut String, arg: &A) {
    out.push(' ');
    out.push_str(&arg_to_str(arg));
}

fn push_kept_then_masked<A: AsRef<[u8]>>(out: &mut String, args: &[A], keep: usize) {
    for (i, arg) in args.iter().enumerate() {
        if i < keep {
            push_arg(out, arg);
        } else {
            out.push_str(" ?");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_pairs_with_prefix() {
        let out = CommandStrategy::KeyValuePairs(2).apply(
            "XADD",
            &["stream", "*", "field1", "v1", "field2", "v2"],
        );
        assert_eq!(out, "XADD stream * field1 ? field2 ?");
    }

    #[test]
    fn test_key_value_pairs_odd_tail() {
        let out = CommandStrategy::KeyValuePairs(0).apply("MSET", &["k1", "v1", "k2"]);
        assert_eq!(out, "MSET k1 ? k2 ?");
    }

    #[test]
    fn test_key_value_pairs_skip_longer_than_args() {
        let out = CommandStrategy::KeyValuePairs(3).apply("XADD", &["stream"]);
        assert_eq!(out, "XADD stream");
    }

    #[test]
    fn test_script_key_count_parsing() {
        let strategy = CommandStrategy::ScriptWithKeys;
        assert_eq!(
            strategy.apply("EVAL", &["return 1", "x", "a", "b"]),
            "EVAL return 1 x ? ?"
        );
        // Only two arguments: the count is not consulted.
        assert_eq!(strategy.apply("EVAL", &["return 1", "0"]), "EVAL return 1 0");
        // Count larger than the argument list.
        assert_eq!(
            strategy.apply("EVAL", &["s", "99", "k1"]),
            "EVAL s 99 k1"
        );
        assert_eq!(strategy.apply("EVAL", &["s", "-1", "k", "v"]), "EVAL s ? ? ?");
        assert_eq!(strategy.apply("EVAL", &["s", "-5", "k"]), "EVAL ? ? ?");
        assert_eq!(strategy.apply("EVAL", &["s", " 1 ", "k"]), "EVAL s  1  ?");
    }

    #[test]
    fn test_mixed_args() {
        let bytes = vec![0xff, b'x'];
        let args = [CommandArg::from("key"), CommandArg::from(&bytes)];
        assert_eq!(
            CommandStrategy::KeepAll.apply("GET", &args),
            "GET key \u{fffd}x"
        );
        assert_eq!(CommandStrategy::REDACT_ALL.apply("AUTH", &args), "AUTH ? ?");
    }
}

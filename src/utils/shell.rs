//! Shell quoting and command-line assembly.

const SHELL_META: &[char] = &[
    ' ', '\t', '\n', '\'', '"', '\\', '$', '`', '!', '*', '?', '[', ']', '(', ')', '{', '}', '<',
    '>', '|', '&', ';', '#', '~',
];

const REDACTED: &str = "****";

/// Quote a single argument for the shell `ShellRunner` hands commands to:
/// `sh -c` on unix, `cmd /C` on Windows.
pub fn quote_arg(arg: &str) -> String {
    #[cfg(windows)]
    {
        quote_cmd_arg(arg)
    }

    #[cfg(not(windows))]
    {
        quote_sh_arg(arg)
    }
}

/// POSIX quoting.
/// - Empty strings become `''`
/// - Strings with shell metacharacters are wrapped in single quotes
/// - Embedded single quotes become `'\''`
pub fn quote_sh_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }

    if !arg.contains(SHELL_META) {
        return arg.to_string();
    }

    format!("'{}'", arg.replace('\'', "'\\''"))
}

/// `cmd.exe` quoting. Single quotes are literal there, so arguments are
/// wrapped in double quotes and embedded double quotes become `\"`, which the
/// receiving program's argument parser unescapes.
pub fn quote_cmd_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "\"\"".to_string();
    }

    if !arg.contains(SHELL_META) && !arg.contains(['%', '^']) {
        return arg.to_string();
    }

    format!("\"{}\"", arg.replace('"', "\\\""))
}

/// Quote and join multiple arguments.
pub fn quote_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|a| quote_arg(a.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Mask every occurrence of each secret (raw or quoted) in a command line.
pub fn redact(command: &str, secrets: &[String]) -> String {
    let mut out = command.to_string();
    for secret in secrets.iter().filter(|s| !s.is_empty()) {
        let quoted = quote_arg(secret);
        if quoted != *secret {
            out = out.replace(&quoted, REDACTED);
        }
        out = out.replace(secret.as_str(), REDACTED);
    }
    out
}

/// Incremental builder for an external tool invocation.
///
/// Every argument is quoted on the way in, so the final string is safe to hand
/// to the platform shell as-is.
#[derive(Debug, Clone)]
pub struct CommandLine {
    parts: Vec<String>,
}

impl CommandLine {
    pub fn new(program: &str) -> Self {
        Self {
            parts: vec![quote_arg(program)],
        }
    }

    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.parts.push(quote_arg(arg.as_ref()));
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parts
            .extend(args.into_iter().map(|a| quote_arg(a.as_ref())));
        self
    }

    /// Append `--name value`.
    pub fn opt(self, name: &str, value: impl ToString) -> Self {
        self.arg(name).arg(value.to_string())
    }

    pub fn build(self) -> String {
        self.parts.join(" ")
    }
}

//! Render an error and its `source()` chain for the terminal.

use std::error::Error;

/// Messages of `err` and every underlying cause, outermost first.
pub fn messages(err: &dyn Error) -> Vec<String> {
    let mut out = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        out.push(cause.to_string());
        source = cause.source();
    }
    out
}

/// Format as:
///
/// ```text
/// error: <message>
///   caused by: <cause 1>
///   caused by: <cause 2>
/// ```
pub fn format_error_chain(err: &dyn Error) -> String {
    format_with_prefix("error:", err)
}

pub fn format_with_prefix(prefix: &str, err: &dyn Error) -> String {
    let mut lines = messages(err).into_iter();
    let mut out = format!("{} {}", prefix, lines.next().unwrap_or_default());
    for cause in lines {
        out.push_str("\n  caused by: ");
        out.push_str(&cause);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("failed to load config")]
    struct Outer {
        #[source]
        source: std::io::Error,
    }

    #[test]
    fn test_single_error() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        assert_eq!(format_error_chain(&err), "error: missing file");
    }

    #[test]
    fn test_nested_error() {
        let err = Outer {
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "crepl.toml missing"),
        };
        assert_eq!(messages(&err), ["failed to load config", "crepl.toml missing"]);
        assert_eq!(
            format_error_chain(&err),
            "error: failed to load config\n  caused by: crepl.toml missing"
        );
    }

    #[test]
    fn test_custom_prefix() {
        let err = std::io::Error::other("exit status 1");
        assert_eq!(format_with_prefix("warning:", &err), "warning: exit status 1");
    }
}

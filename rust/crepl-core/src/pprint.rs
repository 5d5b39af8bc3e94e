//! Pretty-print snippets for common C++ containers and scalars.

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// The include every generated snippet depends on.
pub const STREAM_INCLUDE: &str = "#include <iostream>";

/// Shapes of value the `pprint` helper knows how to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PrintKind {
    /// Fixed-size C array; the length is recovered with `sizeof`.
    Array,
    Vector,
    /// Drained front to back.
    Queue,
    List,
    /// Drained top to bottom.
    Stack,
    Int,
    Float,
    Double,
    String,
}

impl PrintKind {
    /// Every accepted kind name, in declaration order.
    pub fn names() -> Vec<String> {
        Self::iter().map(|kind| kind.to_string()).collect()
    }
}

/// Build the output statement(s) that print `var` as a `kind`.
///
/// Containers print as `[ a b c ]`. Queues and stacks are consumed by the
/// snippet. Scalars print the value followed by a newline.
pub fn generate_print_snippet(kind: PrintKind, var: &str) -> String {
    match kind {
        PrintKind::Array => format!(
            "size_t pprint_n = sizeof({var}) / sizeof({var}[0]);\n\
             std::cout << \"[ \";\n\
             for (size_t pprint_i = 0; pprint_i < pprint_n; pprint_i++) {{\n\
             \x20   std::cout << {var}[pprint_i] << ' ';\n\
             }}\n\
             std::cout << ']';"
        ),
        PrintKind::Vector => format!(
            "std::cout << \"[ \";\n\
             for (auto const& pprint_v : {var}) {{ std::cout << pprint_v << ' '; }}\n\
             std::cout << ']';"
        ),
        PrintKind::Queue => format!(
            "std::cout << \"[ \";\n\
             while (!{var}.empty()) {{\n\
             \x20   std::cout << {var}.front() << ' ';\n\
             \x20   {var}.pop();\n\
             }}\n\
             std::cout << ']';"
        ),
        PrintKind::List => format!(
            "std::cout << \"[ \";\n\
             for (auto pprint_v : {var}) {{\n\
             \x20   std::cout << pprint_v << ' ';\n\
             }}\n\
             std::cout << ']';"
        ),
        PrintKind::Stack => format!(
            "std::cout << \"[ \";\n\
             while (!{var}.empty()) {{\n\
             \x20   std::cout << {var}.top() << ' ';\n\
             \x20   {var}.pop();\n\
             }}\n\
             std::cout << ']';"
        ),
        PrintKind::Int | PrintKind::Float | PrintKind::Double | PrintKind::String => {
            format!("std::cout << {var} << '\\n';")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_kind_names() {
        assert_eq!(PrintKind::from_str("array").ok(), Some(PrintKind::Array));
        assert_eq!(PrintKind::from_str("string").ok(), Some(PrintKind::String));
        assert!(PrintKind::from_str("map").is_err());
        assert!(PrintKind::from_str("Array").is_err());
    }

    #[test]
    fn test_names() {
        assert_eq!(
            PrintKind::names(),
            ["array", "vector", "queue", "list", "stack", "int", "float", "double", "string"]
        );
    }

    #[test]
    fn test_array_snippet() {
        let snippet = generate_print_snippet(PrintKind::Array, "x");
        assert_eq!(
            snippet,
            "size_t pprint_n = sizeof(x) / sizeof(x[0]);\n\
             std::cout << \"[ \";\n\
             for (size_t pprint_i = 0; pprint_i < pprint_n; pprint_i++) {\n    \
             std::cout << x[pprint_i] << ' ';\n\
             }\n\
             std::cout << ']';"
        );
    }

    #[test]
    fn test_draining_snippets_use_native_ops() {
        let queue = generate_print_snippet(PrintKind::Queue, "q");
        assert!(queue.contains("q.front()"));
        assert!(queue.contains("q.pop();"));
        assert!(!queue.contains("q.top()"));

        let stack = generate_print_snippet(PrintKind::Stack, "s");
        assert!(stack.contains("s.top()"));
        assert!(stack.contains("s.pop();"));
        assert!(!stack.contains("s.front()"));
    }

    #[test]
    fn test_containers_are_bracketed() {
        for kind in [
            PrintKind::Array,
            PrintKind::Vector,
            PrintKind::Queue,
            PrintKind::List,
            PrintKind::Stack,
        ] {
            let snippet = generate_print_snippet(kind, "v");
            assert!(
                snippet.starts_with("std::cout << \"[ \";") || kind == PrintKind::Array,
                "{kind} snippet should open with a bracket"
            );
            assert!(snippet.ends_with("std::cout << ']';"), "{kind}");
        }
    }

    #[test]
    fn test_scalar_snippet() {
        for kind in [PrintKind::Int, PrintKind::Float, PrintKind::Double, PrintKind::String] {
            assert_eq!(
                generate_print_snippet(kind, "x"),
                "std::cout << x << '\\n';"
            );
        }
    }
}

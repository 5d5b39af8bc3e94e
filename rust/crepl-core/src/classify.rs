//! Prefix-based routing of raw fragments to sections.
//!
//! Rules are an ordered table; the first matching rule wins. Matching is a
//! literal, case-sensitive prefix test on the untrimmed text.

use crate::section::SectionKind;

/// Where a fragment goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Section(SectionKind),
    /// The single pending output statement.
    Print,
}

struct Rule {
    prefixes: &'static [&'static str],
    route: Route,
}

impl Rule {
    fn matches(&self, fragment: &str) -> bool {
        self.prefixes.iter().any(|prefix| fragment.starts_with(prefix))
    }
}

const RULES: &[Rule] = &[
    Rule {
        prefixes: &["#include"],
        route: Route::Section(SectionKind::Include),
    },
    Rule {
        prefixes: &["cout", "std::cout", "print"],
        route: Route::Print,
    },
    Rule {
        prefixes: &["using"],
        route: Route::Section(SectionKind::Namespace),
    },
];

/// Decide where `fragment` belongs.
///
/// Fragments matching no rule are statements inside `main` when `in_main`
/// is set and top-level functions otherwise.
pub fn classify(fragment: &str, in_main: bool) -> Route {
    RULES
        .iter()
        .find(|rule| rule.matches(fragment))
        .map(|rule| rule.route)
        .unwrap_or(Route::Section(if in_main {
            SectionKind::Command
        } else {
            SectionKind::Function
        }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_directive() {
        assert_eq!(
            classify("#include <vector>", true),
            Route::Section(SectionKind::Include)
        );
        assert_eq!(
            classify("#include \"local.h\"", false),
            Route::Section(SectionKind::Include)
        );
    }

    #[test]
    fn test_print_prefixes() {
        assert_eq!(classify("cout << x;", true), Route::Print);
        assert_eq!(classify("std::cout << x << '\\n';", true), Route::Print);
        assert_eq!(classify("printf(\"%d\", x);", true), Route::Print);
        assert_eq!(classify("print_all(v);", false), Route::Print);
    }

    #[test]
    fn test_namespace_directive() {
        assert_eq!(
            classify("using namespace std;", true),
            Route::Section(SectionKind::Namespace)
        );
        assert_eq!(
            classify("using Vec = std::vector<int>;", true),
            Route::Section(SectionKind::Namespace)
        );
    }

    #[test]
    fn test_fallback_depends_on_context() {
        assert_eq!(
            classify("int x = 3;", true),
            Route::Section(SectionKind::Command)
        );
        assert_eq!(
            classify("int sq(int v) { return v * v; }", false),
            Route::Section(SectionKind::Function)
        );
    }

    #[test]
    fn test_match_is_literal() {
        // leading whitespace defeats the prefix test
        assert_eq!(
            classify("  #include <map>", true),
            Route::Section(SectionKind::Command)
        );
        assert_eq!(classify("Cout << 1;", true), Route::Section(SectionKind::Command));
        assert_eq!(classify("USING x;", true), Route::Section(SectionKind::Command));
    }

    #[test]
    fn test_first_rule_wins() {
        // "#include" is checked before the print prefixes
        assert_eq!(
            classify("#include <print>", true),
            Route::Section(SectionKind::Include)
        );
    }
}

//! Serialize a session into the text of its source file.

use crate::section::SectionKind;
use crate::session::Session;

const ENTRY_OPEN: &str = "int main() {";
const ENTRY_RETURN: &str = "return 0;";
const ENTRY_CLOSE: &str = "}";

/// Compose the source file for `session`.
///
/// Output order is includes, namespaces, functions, then `main` holding the
/// commands and the pending print. Fragments are written verbatim, each
/// followed by one `\n`.
pub fn assemble(session: &Session) -> String {
    let mut out = String::new();
    let mut line = |text: &str| {
        out.push_str(text);
        out.push('\n');
    };

    for kind in [
        SectionKind::Include,
        SectionKind::Namespace,
        SectionKind::Function,
    ] {
        for fragment in session.section(kind) {
            line(fragment);
        }
    }

    line(ENTRY_OPEN);
    for command in session.section(SectionKind::Command) {
        line(command);
    }
    if let Some(print) = session.print() {
        line(print);
    }
    line(ENTRY_RETURN);
    line(ENTRY_CLOSE);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session() {
        let session = Session::default();
        assert_eq!(
            assemble(&session),
            "#include <stdio.h>\nint main() {\nreturn 0;\n}\n"
        );
    }

    #[test]
    fn test_section_order_ignores_insertion_order() {
        let mut session = Session::default();
        session.add_command("int x = sq(3);");
        session.add_function("int sq(int v) { return v * v; }");
        session.add_namespace("using namespace std;");
        session.add_include("#include <iostream>");
        session.set_print("cout << x;");

        assert_eq!(
            assemble(&session),
            "#include <stdio.h>\n\
             #include <iostream>\n\
             using namespace std;\n\
             int sq(int v) { return v * v; }\n\
             int main() {\n\
             int x = sq(3);\n\
             cout << x;\n\
             return 0;\n\
             }\n"
        );
    }

    #[test]
    fn test_multiline_fragments_keep_their_terminators() {
        let mut session = Session::default();
        session.add_function("void hi() {\n    puts(\"hi\");\n}\n");
        let text = assemble(&session);
        assert!(text.contains("void hi() {\n    puts(\"hi\");\n}\n\nint main() {\n"));
    }

    #[test]
    fn test_assembly_is_pure() {
        let mut session = Session::default();
        session.add_command("int a = 1;");
        session.set_print("printf(\"%d\", a);");
        assert_eq!(assemble(&session), assemble(&session));
    }
}

//! Reserved words of the generated language.
//!
//! Reserved words are legal model names; the renderer escapes them with a
//! leading `@` at emission time rather than rejecting them up front.

/// Reserved words that cannot appear bare as identifiers in generated source.
pub const RESERVED_WORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class",
    "const", "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event",
    "explicit", "extern", "false", "finally", "fixed", "float", "for", "foreach", "goto", "if",
    "implicit", "in", "int", "interface", "internal", "is", "lock", "long", "namespace", "new",
    "null", "object", "operator", "out", "override", "params", "private", "protected", "public",
    "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof", "stackalloc", "static",
    "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile", "while",
];

/// Check whether `name` is a reserved word.
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Escape `name` for emission, prefixing `@` when reserved.
pub fn escape_reserved(name: &str) -> String {
    if is_reserved_word(name) {
        format!("@{name}")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_reserved_words() {
        assert!(is_reserved_word("class"));
        assert!(is_reserved_word("event"));
        assert!(!is_reserved_word("Messager"));
    }

    #[test]
    fn escapes_only_reserved_words() {
        assert_eq!(escape_reserved("class"), "@class");
        assert_eq!(escape_reserved("Messager"), "Messager");
    }
}

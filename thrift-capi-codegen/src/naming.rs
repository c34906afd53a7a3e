//! Identifier conversions shared by every emitted surface.

use std::collections::HashSet;

/// Converts `CamelCase` to `snake_case`.
///
/// An underscore is inserted before every uppercase character except the
/// first, and the result is lowercased. Existing underscores are kept.
#[must_use]
pub fn camel_case_to_underscores(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Replaces every `.` with `_`.
#[must_use]
pub fn dots_to_underscores(name: &str) -> String {
    name.replace('.', "_")
}

/// Replaces every `.` with the C++ scope operator.
#[must_use]
pub fn dots_to_scope(name: &str) -> String {
    name.replace('.', "::")
}

/// Uppercases an identifier.
#[must_use]
pub fn to_upper_case(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// Uppercases the first character of an identifier.
#[must_use]
pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// C# keywords, including contextual ones that break generated members.
const CSHARP_RESERVED_WORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while", "add", "alias", "ascending", "async", "await", "descending",
    "dynamic", "from", "get", "global", "group", "into", "join", "let", "orderby", "partial",
    "remove", "select", "set", "value", "var", "where", "yield",
];

/// Set of identifiers that must be escaped in managed output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedWords {
    words: HashSet<String>,
}

impl ReservedWords {
    /// Returns the C# keyword set.
    #[must_use]
    pub fn csharp() -> Self {
        Self::from_words(CSHARP_RESERVED_WORDS.iter().copied())
    }

    /// Returns an empty set; nothing is escaped.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Builds a set from arbitrary words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Adds one word to the set.
    #[must_use]
    pub fn with_word(mut self, word: impl Into<String>) -> Self {
        self.words.insert(word.into());
        self
    }

    /// Returns true if `name` is reserved.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.words.contains(name)
    }

    /// Returns `name`, prefixed with `@` when it is reserved.
    #[must_use]
    pub fn escape(&self, name: &str) -> String {
        if self.contains(name) {
            format!("@{name}")
        } else {
            name.to_string()
        }
    }
}

impl Default for ReservedWords {
    fn default() -> Self {
        Self::csharp()
    }
}

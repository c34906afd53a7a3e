//! Generator options.

use crate::naming::ReservedWords;

/// Options controlling generated output.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Emit documentation comments taken from the schema.
    pub docs: bool,
    /// Library named by the managed `DllImport` attributes. `None` uses
    /// `<Service>.dll` per service.
    pub dll_name: Option<String>,
    /// Namespace language key used for the native prefix.
    pub native_namespace_lang: String,
    /// Namespace language key used for the managed namespace.
    pub managed_namespace_lang: String,
    /// Identifiers escaped with `@` in managed output.
    pub reserved_words: ReservedWords,
}

impl GeneratorOptions {
    /// Creates options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables documentation comments.
    #[must_use]
    pub fn with_docs(mut self, docs: bool) -> Self {
        self.docs = docs;
        self
    }

    /// Sets the library name for every `DllImport`.
    #[must_use]
    pub fn with_dll_name(mut self, name: impl Into<String>) -> Self {
        self.dll_name = Some(name.into());
        self
    }

    /// Sets the namespace language key for the native surface.
    #[must_use]
    pub fn with_native_namespace_lang(mut self, lang: impl Into<String>) -> Self {
        self.native_namespace_lang = lang.into();
        self
    }

    /// Sets the namespace language key for the managed surface.
    #[must_use]
    pub fn with_managed_namespace_lang(mut self, lang: impl Into<String>) -> Self {
        self.managed_namespace_lang = lang.into();
        self
    }

    /// Replaces the managed reserved-word set.
    #[must_use]
    pub fn with_reserved_words(mut self, words: ReservedWords) -> Self {
        self.reserved_words = words;
        self
    }

    /// Library name used for a given service.
    #[must_use]
    pub fn dll_for(&self, service: &str) -> String {
        match &self.dll_name {
            Some(name) => name.clone(),
            None => format!("{service}.dll"),
        }
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            docs: true,
            dll_name: None,
            native_namespace_lang: "cpp".to_string(),
            managed_namespace_lang: "csharp".to_string(),
            reserved_words: ReservedWords::csharp(),
        }
    }
}

//! Indentation-aware text sink for emitted sources.

/// Accumulates one generated file.
///
/// Indentation uses one tab per level. Scopes opened with
/// [`CodeWriter::open_scope`] must be closed with
/// [`CodeWriter::close_scope`]; the closing brace is left without a
/// trailing newline so callers can append `;` or a declarator.
#[derive(Debug, Default, Clone)]
pub struct CodeWriter {
    buf: String,
    depth: usize,
}

impl CodeWriter {
    /// Creates an empty writer at depth zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current indentation depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Increases the indentation depth.
    pub fn indent_up(&mut self) {
        self.depth += 1;
    }

    /// Decreases the indentation depth.
    ///
    /// Every call must pair with an earlier [`CodeWriter::indent_up`].
    pub fn indent_down(&mut self) {
        debug_assert!(self.depth > 0, "unbalanced indentation: indent_down at depth 0");
        self.depth = self.depth.saturating_sub(1);
    }

    /// Writes the indentation prefix for the current depth.
    pub fn indent(&mut self) -> &mut Self {
        for _ in 0..self.depth {
            self.buf.push('\t');
        }
        self
    }

    /// Appends text without indentation or newline.
    pub fn push(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(text);
        self
    }

    /// Writes one indented line.
    pub fn line(&mut self, text: &str) -> &mut Self {
        if text.is_empty() {
            self.buf.push('\n');
        } else {
            self.indent();
            self.buf.push_str(text);
            self.buf.push('\n');
        }
        self
    }

    /// Writes an empty line.
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// Writes `{` on its own line and indents.
    pub fn open_scope(&mut self) -> &mut Self {
        self.line("{");
        self.indent_up();
        self
    }

    /// Unindents and writes `}` without a newline.
    pub fn close_scope(&mut self) -> &mut Self {
        self.indent_down();
        self.indent();
        self.buf.push('}');
        self
    }

    /// Writes a block comment in the `/** ... */` style, one ` * ` line per
    /// line of `doc`.
    pub fn doc_comment(&mut self, doc: &str) -> &mut Self {
        self.line("/**");
        for text in doc.trim().lines() {
            let text = text.trim_end();
            if text.is_empty() {
                self.line(" *");
            } else {
                self.line(&format!(" * {text}"));
            }
        }
        self.line(" */")
    }

    /// Writes `head(` followed by `items` separated by `,\n`, with each
    /// continuation aligned under the first item, then `tail`.
    pub fn aligned_list(&mut self, head: &str, items: &[String], tail: &str) -> &mut Self {
        self.indent();
        self.buf.push_str(head);
        let pad = " ".repeat(head.chars().count());
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(",\n");
                self.indent();
                self.buf.push_str(&pad);
            }
            self.buf.push_str(item);
        }
        self.buf.push_str(tail);
        self.buf.push('\n');
        self
    }

    /// Returns the text written so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Consumes the writer, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buf
    }
}

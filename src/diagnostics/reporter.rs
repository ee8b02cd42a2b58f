//! Diagnostic reporter that collects and manages diagnostics.

use super::{Diagnostic, SourceLocation};

/// Collects diagnostics during compilation.
///
/// The reporter owns a copy of the source text so that byte offsets can be
/// turned into line/column locations with source context. Its error count is
/// the compilation's error counter: every recorded error-level diagnostic
/// bumps it, and the driver reads it to decide the exit code.
#[derive(Debug, Default)]
pub struct DiagnosticReporter {
    diagnostics: Vec<Diagnostic>,
    source: String,
    file: String,
    /// Byte offset of the start of each line
    line_starts: Vec<usize>,
}

impl DiagnosticReporter {
    pub fn new(file: &str, source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in source.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }

        Self {
            diagnostics: Vec::new(),
            source: source.to_string(),
            file: file.to_string(),
            line_starts,
        }
    }

    /// Translate a byte offset into a location plus the text of its line
    pub fn location_from_offset(&self, offset: usize) -> (SourceLocation, String) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };

        let line_start = self.line_starts[line_idx];
        let line_end = self
            .line_starts
            .get(line_idx + 1)
            .map(|s| s.saturating_sub(1))
            .unwrap_or(self.source.len());

        let column = offset - line_start + 1;
        let line_content = self.source[line_start..line_end].to_string();

        (
            SourceLocation::new(&self.file, line_idx + 1, column, 1),
            line_content,
        )
    }

    /// Report a diagnostic anchored at a byte offset, with source-line lookup
    pub fn report(&mut self, mut diagnostic: Diagnostic, offset: usize, length: usize) {
        let (mut loc, line_content) = self.location_from_offset(offset);
        loc.length = length;

        diagnostic = diagnostic.with_location(loc).with_source_line(line_content);

        self.diagnostics.push(diagnostic);
    }

    /// Report with a short label under the underlined span
    pub fn report_with_label(
        &mut self,
        diagnostic: Diagnostic,
        offset: usize,
        length: usize,
        label: &str,
    ) {
        self.report(diagnostic.with_label(label), offset, length);
    }

    /// Add a diagnostic with no source anchor
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| !d.is_error()).count()
    }

    /// Consume and return all diagnostics
    pub fn take_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Get a reference to the collected diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

//! Parser facade for reading existing JavaScript/TypeScript script sources.
//!
//! This module provides the single call site for `oxc_parser` used by the
//! rest of the analyzer. Everything downstream only ever sees a parsed
//! [`oxc_ast::ast::Program`].

use crate::error::{GenError, Result};
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;

/// Parse options for reading source code.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Source type (JavaScript, TypeScript, JSX, TSX).
    pub source_type: SourceType,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            source_type: SourceType::mjs(),
        }
    }
}

impl ParseOptions {
    /// Derive parse options from a file path, auto-detecting the language
    /// (JavaScript vs. TypeScript) from the extension but always requesting
    /// module source kind: scripts in this ecosystem use `import`/`export`
    /// regardless of extension, so module-ness is never left to inference.
    ///
    /// An empty path (the entry-point convention used by the resolver) falls
    /// back to [`SourceType::mjs`] rather than the `Unambiguous` default OXC
    /// would otherwise pick for an extensionless path.
    pub fn from_path(path: &str) -> Self {
        if path.is_empty() {
            return Self::default();
        }
        let source_type = SourceType::from_path(path)
            .unwrap_or_else(|_| SourceType::mjs())
            .with_module(true);
        Self { source_type }
    }
}

/// A single parse diagnostic.
#[derive(Debug, Clone)]
pub struct ParseDiagnostic {
    pub message: String,
}

/// A parsed program together with the source text it was built from.
pub struct ParsedProgram<'a> {
    pub program: oxc_ast::ast::Program<'a>,
    pub diagnostics: Vec<ParseDiagnostic>,
    pub source_text: &'a str,
}

impl<'a> ParsedProgram<'a> {
    /// Borrow the parsed AST.
    pub fn ast(&self) -> &oxc_ast::ast::Program<'a> {
        &self.program
    }

    /// True if the front end reported any diagnostics.
    ///
    /// Parsing always returns `Ok` when this is empty; a non-empty list
    /// surfaces as [`GenError::SyntaxError`] from [`parse`] itself, so
    /// callers outside this crate never observe a `ParsedProgram` with
    /// errors.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Parse source code into an AST, requesting the latest language level for
/// the module's source kind.
///
/// Any parse diagnostic is treated as fatal: the front end is not asked to
/// recover, matching the "report and abort" policy the analyzer requires of
/// syntax errors.
pub fn parse<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    options: ParseOptions,
) -> Result<ParsedProgram<'a>> {
    let result = Parser::new(allocator, source, options.source_type).parse();

    if !result.errors.is_empty() {
        let message = result
            .errors
            .iter()
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(GenError::syntax_error(message));
    }

    Ok(ParsedProgram {
        program: result.program,
        diagnostics: Vec::new(),
        source_text: source,
    })
}

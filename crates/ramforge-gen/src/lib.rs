//! Parser facade over OXC for reading user-authored scripts.
//!
//! This crate is the AST front end referenced throughout `ramforge-core`: it
//! owns the one place that calls into `oxc_parser`, picks a source type for a
//! given file path, and turns parse diagnostics into a single [`GenError`].
//! Everything downstream (`ramforge-core`) only ever sees a parsed
//! [`oxc_ast::ast::Program`] and never touches `oxc_parser` directly.
//!
//! # Example
//!
//! ```rust
//! use oxc_allocator::Allocator;
//! use ramforge_gen::{parse, ParseOptions};
//!
//! let allocator = Allocator::default();
//! let parsed = parse(&allocator, "export async function main(ns) {}", ParseOptions::default())?;
//! assert!(!parsed.has_errors());
//! # Ok::<(), ramforge_gen::GenError>(())
//! ```

mod error;
mod parser;

pub use error::{GenError, Result};
pub use parser::{parse, ParseDiagnostic, ParseOptions, ParsedProgram};

// Re-exported so downstream crates never need a direct `oxc_allocator`/`oxc_span`
// dependency just to call into this facade.
pub use oxc_allocator::Allocator;
pub use oxc_span::SourceType;

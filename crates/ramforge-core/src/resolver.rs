//! Link resolver: breadth-first closure over a module's imports.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::error::{AnalysisError, Result};
use crate::model::ParsedModule;
use crate::parser;
use crate::remote::{ReqwestFetcher, RemoteFetcher};

/// An auxiliary script file supplied alongside the entry point: at least a
/// `filename` and its `code`.
#[derive(Debug, Clone)]
pub struct ScriptFile {
    pub filename: String,
    pub code: String,
}

impl ScriptFile {
    pub fn new(filename: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            code: code.into(),
        }
    }
}

/// Decides whether an import specifier refers to a given filename.
///
/// The distilled contract leaves this equivalence host-defined (extension
/// insensitivity is explicitly allowed but not mandated); keeping it behind
/// a trait lets a host supply a stricter or looser rule without touching
/// the resolver.
pub trait FilenameMatcher: Send + Sync {
    fn matches(&self, specifier: &str, filename: &str) -> bool;
}

/// Matches a specifier against a filename after stripping a known script
/// extension from both sides (extension-insensitive).
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFilenameMatcher;

impl FilenameMatcher for DefaultFilenameMatcher {
    fn matches(&self, specifier: &str, filename: &str) -> bool {
        strip_script_extension(specifier) == strip_script_extension(filename)
    }
}

const SCRIPT_EXTENSIONS: &[&str] = &[".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs", ".ns"];

fn strip_script_extension(name: &str) -> &str {
    for ext in SCRIPT_EXTENSIONS {
        if let Some(stripped) = name.strip_suffix(ext) {
            return stripped;
        }
    }
    name
}

fn normalize(specifier: &str) -> String {
    specifier.strip_prefix("./").unwrap_or(specifier).to_string()
}

fn is_url(specifier: &str) -> bool {
    specifier.starts_with("http://") || specifier.starts_with("https://")
}

/// Parse the entry point and transitively resolve every local or remote
/// import, using the default filename-matching rule and a real HTTP client
/// for `http(s)://` specifiers.
pub async fn parse_all(code: &str, other_scripts: &[ScriptFile]) -> Result<Vec<ParsedModule>> {
    parse_all_with(
        code,
        other_scripts,
        &DefaultFilenameMatcher,
        &ReqwestFetcher::default(),
    )
    .await
}

/// [`parse_all`] parameterized over the filename-matching rule and the
/// remote-import transport, so hosts and tests can substitute both.
pub async fn parse_all_with(
    code: &str,
    other_scripts: &[ScriptFile],
    matcher: &dyn FilenameMatcher,
    fetcher: &dyn RemoteFetcher,
) -> Result<Vec<ParsedModule>> {
    let entry = parser::parse_script(code, "")?;
    tracing::debug!(imports = entry.imported_modules.len(), "resolving entry-point imports");

    let mut worklist: VecDeque<(String, String)> = entry
        .imported_modules
        .iter()
        .map(|import| (import.file_path.clone(), String::new()))
        .collect();

    let mut seen: FxHashSet<String> = FxHashSet::default();
    seen.insert(String::new());

    let mut modules = vec![entry];

    while let Some((raw_specifier, from)) = worklist.pop_front() {
        if is_url(&raw_specifier) {
            // Module identity for a remote import is its full URL: there is
            // no local normalization rule for it.
            if !seen.insert(raw_specifier.clone()) {
                continue;
            }
            let source = fetcher
                .fetch(&raw_specifier)
                .await
                .map_err(|reason| AnalysisError::UrlImport {
                    url: raw_specifier.clone(),
                    reason,
                })?;
            let module = parser::parse_script(&source, &raw_specifier)?;
            worklist.extend(
                module
                    .imported_modules
                    .iter()
                    .map(|import| (import.file_path.clone(), raw_specifier.clone())),
            );
            modules.push(module);
            continue;
        }

        let normalized = normalize(&raw_specifier);
        if !seen.insert(normalized.clone()) {
            continue;
        }

        let source = other_scripts
            .iter()
            .find(|file| matcher.matches(&normalized, &file.filename))
            .map(|file| file.code.clone())
            .ok_or_else(|| AnalysisError::Import {
                specifier: normalized.clone(),
                from,
            })?;

        let module = parser::parse_script(&source, &normalized)?;
        worklist.extend(
            module
                .imported_modules
                .iter()
                .map(|import| (import.file_path.clone(), normalized.clone())),
        );
        modules.push(module);
    }

    tracing::debug!(modules = modules.len(), "link resolution complete");
    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::test_support::FakeFetcher;

    #[tokio::test]
    async fn resolves_a_single_local_import() {
        let other = vec![ScriptFile::new(
            "lib.js",
            "export async function doHack(ns) { await ns.hack('x'); }",
        )];
        let modules = parse_all_with(
            "import {doHack} from \"lib\"; export async function main(ns) { await doHack(ns); }",
            &other,
            &DefaultFilenameMatcher,
            &FakeFetcher::default(),
        )
        .await
        .unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].file_path, "");
        assert_eq!(modules[1].file_path, "lib");
    }

    #[tokio::test]
    async fn missing_import_is_reported_with_its_specifier() {
        let err = parse_all_with(
            "import {x} from \"missing\";",
            &[],
            &DefaultFilenameMatcher,
            &FakeFetcher::default(),
        )
        .await
        .unwrap_err();
        match err {
            AnalysisError::Import { specifier, .. } => assert_eq!(specifier, "missing"),
            other => panic!("expected ImportError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cyclic_imports_are_parsed_once() {
        let other = vec![
            ScriptFile::new("a.js", "import \"b\"; export function a() {}"),
            ScriptFile::new("b.js", "import \"a\"; export function b() {}"),
        ];
        let modules = parse_all_with(
            "import \"a\";",
            &other,
            &DefaultFilenameMatcher,
            &FakeFetcher::default(),
        )
        .await
        .unwrap();
        assert_eq!(modules.len(), 3);
    }

    #[tokio::test]
    async fn url_import_is_parsed_as_source_text() {
        let fetcher = FakeFetcher::default()
            .with_response("https://example.com/lib.js", "export function helper() {}");
        let modules = parse_all_with(
            "import {helper} from \"https://example.com/lib.js\";",
            &[],
            &DefaultFilenameMatcher,
            &fetcher,
        )
        .await
        .unwrap();
        assert_eq!(modules.len(), 2);
        assert!(
            modules[1]
                .function_tree
                .iter()
                .any(|node| node.r#fn.name == "helper")
        );
    }

    #[tokio::test]
    async fn url_import_failure_is_reported() {
        let fetcher = FakeFetcher::default()
            .with_failure("https://example.com/down.js", "connection refused");
        let err = parse_all_with(
            "import \"https://example.com/down.js\";",
            &[],
            &DefaultFilenameMatcher,
            &fetcher,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AnalysisError::UrlImport { .. }));
    }
}

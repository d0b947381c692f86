//! Core data model shared by the parser, resolver, and reachability stages.

use serde::{Deserialize, Serialize};

/// A fully-qualified reference to either a function/class declaration or a
/// call site observed somewhere in a module's body.
///
/// Equality is structural and is the only comparison operation used against
/// the call graph: two values are equal iff `name`, `namespace`, and
/// `file_path` all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefinedFunction {
    pub name: String,
    /// Dotted identifier prefix (e.g. `"ns.hacknet"`). Empty for bare calls.
    pub namespace: String,
    /// The file the reference was observed in, not necessarily where the
    /// callee is declared. Resolution across files is deferred to the
    /// reachability pass.
    pub file_path: String,
}

impl DefinedFunction {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            file_path: file_path.into(),
        }
    }

    /// The default reachability entry point: `main` declared at the
    /// entry-point module (whose file path is always the empty string).
    pub fn entry_point_main() -> Self {
        Self::new("main", "", "")
    }
}

/// One declared function or class in a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionGraphNode {
    pub r#fn: DefinedFunction,
    /// Duplicates allowed; preserves source order, though order is not
    /// observable through the public contract.
    pub called_functions: Vec<DefinedFunction>,
}

impl FunctionGraphNode {
    pub fn new(r#fn: DefinedFunction) -> Self {
        Self {
            r#fn,
            called_functions: Vec::new(),
        }
    }

    pub fn record_call(&mut self, call: DefinedFunction) {
        self.called_functions.push(call);
    }
}

/// One import declaration observed at the top of a module.
///
/// `imports` is either exactly `["*"]` (namespace import, non-empty `alias`)
/// or a list of named bindings (`alias` empty). No mixed form exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    /// The source identifier in the import clause, normalized per the link
    /// resolver's rules. Unnormalized here; normalization happens in the
    /// resolver where the raw specifier is actually consumed.
    pub file_path: String,
    pub alias: String,
    pub imports: Vec<String>,
}

impl ImportEntry {
    pub fn is_namespace(&self) -> bool {
        self.imports.len() == 1 && self.imports[0] == "*"
    }
}

/// The parsed result of a single source file: its imports and the graph of
/// functions/classes it declares.
///
/// Immutable after construction; lives only for the duration of one
/// `calculate_ram_usage` invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedModule {
    pub file_path: String,
    pub imported_modules: Vec<ImportEntry>,
    pub function_tree: Vec<FunctionGraphNode>,
}

impl ParsedModule {
    pub fn find_function(&self, target: &DefinedFunction) -> Option<&FunctionGraphNode> {
        self.function_tree.iter().find(|node| &node.r#fn == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defined_function_equality_is_structural() {
        let a = DefinedFunction::new("hack", "ns", "main.js");
        let b = DefinedFunction::new("hack", "ns", "main.js");
        let c = DefinedFunction::new("hack", "ns", "lib.js");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn namespace_import_shape() {
        let entry = ImportEntry {
            file_path: "lib".into(),
            alias: "X".into(),
            imports: vec!["*".into()],
        };
        assert!(entry.is_namespace());
    }
}

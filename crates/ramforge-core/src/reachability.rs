//! Reachability and classification: from an entry function, walk the call
//! graph across modules and split every reached callee into resolved
//! (locally defined, edges followed) or unresolved (treated as a platform
//! API).

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::model::{DefinedFunction, ParsedModule};

/// The two disjoint sets produced by a reachability pass.
///
/// No ordering is guaranteed between runs; callers should compare as sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReachabilityResult {
    pub resolved_functions: Vec<DefinedFunction>,
    pub unresolved_functions: Vec<DefinedFunction>,
}

/// Walk the call graph starting at `entry_point` (defaulting to
/// `main`/`""`/`""`) across every module in `modules`.
pub fn find_all_called_functions(
    modules: &[ParsedModule],
    entry_point: Option<DefinedFunction>,
) -> ReachabilityResult {
    let entry = entry_point.unwrap_or_else(DefinedFunction::entry_point_main);

    let mut result = ReachabilityResult::default();
    let mut enqueued: FxHashSet<DefinedFunction> = FxHashSet::default();
    enqueued.insert(entry.clone());

    let mut worklist = VecDeque::new();
    worklist.push_back(entry);

    while let Some(current) = worklist.pop_front() {
        let Some(module) = modules.iter().find(|m| m.file_path == current.file_path) else {
            // The entry's file path "" is legitimate; a callee whose file
            // path came from the parser always refers to its own module.
            // Anything else is silently dropped, not recorded.
            continue;
        };

        let local = module.find_function(&current);
        let resolved_node = local.or_else(|| resolve_through_import(module, modules, &current));

        match resolved_node {
            Some(node) => {
                result.resolved_functions.push(current);
                for callee in &node.called_functions {
                    if enqueued.insert(callee.clone()) {
                        worklist.push_back(callee.clone());
                    }
                }
            }
            None => {
                result.unresolved_functions.push(current);
            }
        }
    }

    tracing::debug!(
        resolved = result.resolved_functions.len(),
        unresolved = result.unresolved_functions.len(),
        "reachability traversal complete"
    );
    result
}

/// Step 3 of the classification rule: when `current` isn't declared
/// locally, look for an import whose alias matches its namespace and whose
/// `imports` names it (or is a namespace import), then search that
/// module's own top-level (non-namespaced) declarations.
fn resolve_through_import<'m>(
    module: &crate::model::ParsedModule,
    modules: &'m [ParsedModule],
    current: &DefinedFunction,
) -> Option<&'m crate::model::FunctionGraphNode> {
    let import = module.imported_modules.iter().find(|entry| {
        entry.alias == current.namespace
            && (entry.imports.iter().any(|name| name == &current.name) || entry.is_namespace())
    })?;

    let normalized = import
        .file_path
        .strip_prefix("./")
        .unwrap_or(&import.file_path);
    let target_module = modules.iter().find(|m| m.file_path == normalized)?;
    target_module.function_tree.iter().find(|node| {
        node.r#fn.name == current.name && node.r#fn.namespace.is_empty()
    })
}

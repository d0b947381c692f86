//! Module parser: a single top-level AST walk that produces a module's
//! import list and its function/call graph.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    CallExpression, Class, ClassElement, Declaration, ExportDefaultDeclarationKind, Expression,
    Function, ImportDeclaration, ImportDeclarationSpecifier, ModuleDeclaration, ModuleExportName,
    NewExpression, Program, Statement, StaticMemberExpression,
};
use oxc_ast_visit::Visit;

use crate::error::{AnalysisError, Result};
use crate::model::{DefinedFunction, FunctionGraphNode, ImportEntry, ParsedModule};

/// Parse a single script into its import list and function/call graph.
///
/// `file_path` labels every [`DefinedFunction`] produced from this source;
/// the entry-point script is conventionally parsed with an empty
/// `file_path`.
pub fn parse_script(code: &str, file_path: &str) -> Result<ParsedModule> {
    let allocator = Allocator::default();
    let options = ramforge_gen::ParseOptions::from_path(file_path);
    let parsed = ramforge_gen::parse(&allocator, code, options).map_err(|err| {
        let ramforge_gen::GenError::SyntaxError { message } = err;
        AnalysisError::Syntax {
            file_path: file_path.to_string(),
            message,
        }
    })?;
    tracing::trace!(file_path, "parsed module");
    Ok(build_parsed_module(parsed.ast(), file_path))
}

fn build_parsed_module(program: &Program, file_path: &str) -> ParsedModule {
    let mut imported_modules = Vec::new();
    let mut function_tree = Vec::new();

    for stmt in &program.body {
        if let Some(module_decl) = stmt.as_module_declaration() {
            match module_decl {
                ModuleDeclaration::ImportDeclaration(import) => {
                    imported_modules.push(import_entry_from(import));
                }
                ModuleDeclaration::ExportNamedDeclaration(named) => {
                    if let Some(decl) = &named.declaration {
                        collect_declaration(decl, file_path, &mut function_tree);
                    }
                }
                ModuleDeclaration::ExportDefaultDeclaration(default) => {
                    collect_default_declaration(&default.declaration, file_path, &mut function_tree);
                }
                _ => {}
            }
        } else if let Statement::FunctionDeclaration(func) = stmt {
            if let Some(node) = function_graph_node(func, file_path) {
                function_tree.push(node);
            }
        } else if let Statement::ClassDeclaration(class) = stmt {
            if let Some(node) = class_graph_node(class, file_path) {
                function_tree.push(node);
            }
        }
    }

    ParsedModule {
        file_path: file_path.to_string(),
        imported_modules,
        function_tree,
    }
}

fn collect_declaration(decl: &Declaration, file_path: &str, out: &mut Vec<FunctionGraphNode>) {
    match decl {
        Declaration::FunctionDeclaration(func) => {
            if let Some(node) = function_graph_node(func, file_path) {
                out.push(node);
            }
        }
        Declaration::ClassDeclaration(class) => {
            if let Some(node) = class_graph_node(class, file_path) {
                out.push(node);
            }
        }
        // Variable, TS-only, and other declaration kinds never contribute a
        // function-graph node: the exported/non-exported distinction does
        // not affect call-graph extraction, but the declaration kind does.
        _ => {}
    }
}

fn collect_default_declaration(
    kind: &ExportDefaultDeclarationKind,
    file_path: &str,
    out: &mut Vec<FunctionGraphNode>,
) {
    match kind {
        ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
            if let Some(node) = function_graph_node(func, file_path) {
                out.push(node);
            }
        }
        ExportDefaultDeclarationKind::ClassDeclaration(class) => {
            if let Some(node) = class_graph_node(class, file_path) {
                out.push(node);
            }
        }
        _ => {}
    }
}

fn function_graph_node(func: &Function, file_path: &str) -> Option<FunctionGraphNode> {
    let name = func.id.as_ref()?.name.to_string();
    let mut node = FunctionGraphNode::new(DefinedFunction::new(name, "", file_path));
    if let Some(body) = &func.body {
        let mut collector = CallCollector::new(file_path, &mut node);
        collector.visit_function_body(body);
    }
    Some(node)
}

fn class_graph_node(class: &Class, file_path: &str) -> Option<FunctionGraphNode> {
    let name = class.id.as_ref()?.name.to_string();
    let mut node = FunctionGraphNode::new(DefinedFunction::new(name, "", file_path));
    {
        let mut collector = CallCollector::new(file_path, &mut node);
        for element in &class.body.body {
            if let ClassElement::MethodDefinition(method) = element {
                if let Some(body) = &method.value.body {
                    collector.visit_function_body(body);
                }
            }
        }
    }
    Some(node)
}

fn import_entry_from(import: &ImportDeclaration) -> ImportEntry {
    let raw_path = import.source.value.to_string();
    let empty = ImportEntry {
        file_path: raw_path.clone(),
        alias: String::new(),
        imports: Vec::new(),
    };
    let Some(specifiers) = &import.specifiers else {
        return empty;
    };
    // The first specifier decides the import's shape: a default or
    // namespace specifier has no `imported` sub-node and the whole
    // declaration is treated as a namespace import; a named specifier
    // means every specifier in the list is a named binding.
    match specifiers.first() {
        Some(ImportDeclarationSpecifier::ImportDefaultSpecifier(default_spec)) => ImportEntry {
            file_path: raw_path,
            alias: default_spec.local.name.to_string(),
            imports: vec!["*".to_string()],
        },
        Some(ImportDeclarationSpecifier::ImportNamespaceSpecifier(ns_spec)) => ImportEntry {
            file_path: raw_path,
            alias: ns_spec.local.name.to_string(),
            imports: vec!["*".to_string()],
        },
        Some(ImportDeclarationSpecifier::ImportSpecifier(_)) => {
            let imports = specifiers
                .iter()
                .filter_map(|spec| match spec {
                    ImportDeclarationSpecifier::ImportSpecifier(named) => {
                        Some(module_export_name(&named.imported))
                    }
                    _ => None,
                })
                .collect();
            ImportEntry {
                file_path: raw_path,
                alias: String::new(),
                imports,
            }
        }
        None => empty,
    }
}

fn module_export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::IdentifierName(ident) => ident.name.to_string(),
        ModuleExportName::IdentifierReference(ident) => ident.name.to_string(),
        ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
    }
}

/// Extraction entry point for a call/new callee (the left-hand side being
/// invoked). Implements the three-case ladder from the shape-matching
/// rules: bare identifier, two-deep property chain, or one-deep chain with
/// the `callee.object.callee.name` fallback.
///
/// Returns `None` when the callee is neither an identifier nor a static
/// member expression (e.g. a parenthesized or computed expression) — there
/// is no name to record.
fn extract_from_callee(callee: &Expression) -> Option<(String, String)> {
    if let Some(name) = identifier_name(callee) {
        return Some((name, String::new()));
    }
    match callee {
        Expression::StaticMemberExpression(member) => {
            Some(extract_member_name_namespace(member, true))
        }
        _ => None,
    }
}

/// Shared name/namespace extraction for a static member expression, used
/// both by the call/new callee ladder and by the standalone
/// member-expression rule.
///
/// `allow_callee_fallback` gates the `callee.object.callee.name` one-deep
/// fallback: a direct call/new callee gets the full chain, but a standalone
/// member expression (one not already under a call or new) only ever
/// consults `object.name`.
fn extract_member_name_namespace(
    member: &StaticMemberExpression,
    allow_callee_fallback: bool,
) -> (String, String) {
    let name = member.property.name.to_string();

    if let Expression::StaticMemberExpression(obj_member) = &member.object {
        if let Some(base) = identifier_name(&obj_member.object) {
            let namespace = format!("{base}.{}", obj_member.property.name);
            return (name, namespace);
        }
    }

    let namespace = identifier_name(&member.object)
        .or_else(|| allow_callee_fallback.then(|| one_deep_callee_name(&member.object)).flatten())
        .unwrap_or_default();
    (name, namespace)
}

fn identifier_name(expr: &Expression) -> Option<String> {
    match expr {
        Expression::Identifier(ident) => Some(ident.name.to_string()),
        _ => None,
    }
}

/// The `callee.object.callee.name` fallback: field-presence, not node-kind,
/// so this fires for both call and new expressions used as the object of a
/// member access (`new Foo(ns).bar()` satisfies it exactly like a call
/// would, since both node kinds carry a `callee` field).
fn one_deep_callee_name(expr: &Expression) -> Option<String> {
    let inner_callee = match expr {
        Expression::CallExpression(call) => &call.callee,
        Expression::NewExpression(new_expr) => &new_expr.callee,
        _ => return None,
    };
    identifier_name(inner_callee)
}

/// Within-function walker: records one [`DefinedFunction`] per call, new, or
/// standalone member-expression node, then continues into the relevant
/// sub-tree so nested chains (`new Foo(ns).bar()`) produce multiple edges.
struct CallCollector<'c> {
    file_path: &'c str,
    node: &'c mut FunctionGraphNode,
}

impl<'c> CallCollector<'c> {
    fn new(file_path: &'c str, node: &'c mut FunctionGraphNode) -> Self {
        Self { file_path, node }
    }

    fn record(&mut self, name: String, namespace: String) {
        self.node
            .record_call(DefinedFunction::new(name, namespace, self.file_path));
    }
}

impl<'c> CallCollector<'c> {
    /// Continue into a call/new callee's sub-tree without re-recording its
    /// own top member node (already captured by the caller's extraction),
    /// only descending further into `.object` chains. Anything else falls
    /// back to the default recursive policy.
    fn visit_callee_chain<'ast>(&mut self, expr: &Expression<'ast>)
    where
        CallCollector<'c>: Visit<'ast>,
    {
        if let Expression::StaticMemberExpression(inner) = expr {
            self.visit_callee_chain(&inner.object);
        } else {
            self.visit_expression(expr);
        }
    }
}

impl<'c, 'ast> Visit<'ast> for CallCollector<'c> {
    fn visit_call_expression(&mut self, call: &CallExpression<'ast>) {
        if let Some((name, namespace)) = extract_from_callee(&call.callee) {
            self.record(name, namespace);
        }
        self.visit_callee_chain(&call.callee);
        self.visit_arguments(&call.arguments);
    }

    fn visit_new_expression(&mut self, new_expr: &NewExpression<'ast>) {
        if let Some((name, namespace)) = extract_from_callee(&new_expr.callee) {
            self.record(name, namespace);
        }
        self.visit_callee_chain(&new_expr.callee);
        self.visit_arguments(&new_expr.arguments);
    }

    fn visit_static_member_expression(&mut self, member: &StaticMemberExpression<'ast>) {
        let (name, namespace) = extract_member_name_namespace(member, false);
        self.record(name, namespace);
        // Unlike the call/new case, a standalone member expression does not
        // continue into its object sub-tree: the generic default-walk helper
        // would re-dispatch to this same override (or to `visit_call_expression`)
        // on the object chain, recording spurious extra calls for e.g. the
        // `stanek` in `ns.stanek.get` or the `returnNs(ns)` call in
        // `returnNs(ns).get`. The walk stops here.
    }
}

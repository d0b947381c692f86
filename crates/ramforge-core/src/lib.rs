//! # ramforge-core
//!
//! Static RAM-cost analyzer for user-authored scripts: module parsing, link
//! resolution, and cost reduction.
//!
//! Given an entry-point script, a set of auxiliary script files it may
//! import, and a cost table that assigns a numeric cost to each recognized
//! platform API identifier, [`calculate_ram_usage`] returns the total cost
//! that must be charged before the script is allowed to run, together with a
//! per-API breakdown.
//!
//! The pipeline is strictly linear and has no cross-call caching:
//!
//! ```text
//! source text -> AST -> ParsedModule -> ParsedModule[] -> FunctionCalls -> RamCalculation
//! ```
//!
//! - [`parser::parse_script`] walks a single file's AST and extracts its
//!   imports and its function/call graph.
//! - [`resolver::parse_all`] transitively resolves every import reachable
//!   from the entry point, local or remote, into a flat list of
//!   [`model::ParsedModule`].
//! - [`reachability::find_all_called_functions`] walks the call graph from an
//!   entry function, splitting every reached callee into resolved (locally
//!   defined) or unresolved (a platform API).
//! - [`cost::reduce`] folds the unresolved set against a host-supplied
//!   [`cost::CostTable`].
//!
//! # Example
//!
//! ```rust,no_run
//! use ramforge_core::{calculate_ram_usage, CostTable, ScriptFile};
//!
//! # async fn example() {
//! let table: CostTable<()> = CostTable::builder()
//!     .base_cost(1.6)
//!     .constant("hack", 0.1)
//!     .build();
//!
//! let calc = calculate_ram_usage(
//!     &(),
//!     "export async function main(ns) { await ns.hack('n00dles'); }",
//!     &[] as &[ScriptFile],
//!     &table,
//!     None,
//! )
//! .await;
//!
//! assert!(calc.cost >= 1.6);
//! # }
//! ```

pub mod cost;
pub mod error;
pub mod model;
pub mod parser;
pub mod reachability;
pub mod remote;
pub mod resolver;

pub use cost::{CostTable, CostTableBuilder, CostValue, RamCalculation, RamEntryKind, RamUsageEntry};
pub use error::{AnalysisError, Result};
pub use model::{DefinedFunction, FunctionGraphNode, ImportEntry, ParsedModule};
pub use parser::parse_script;
pub use reachability::{find_all_called_functions, ReachabilityResult};
pub use remote::{RemoteFetcher, ReqwestFetcher};
pub use resolver::{parse_all, parse_all_with, DefaultFilenameMatcher, FilenameMatcher, ScriptFile};

/// The primary operation: analyze an entry-point script and its imports and
/// return the RAM cost that must be charged to run it.
///
/// This is the only stage that can fail without surfacing the failure to the
/// caller as a `Result`: per the error-handling contract, any [`AnalysisError`]
/// raised while parsing or resolving imports is caught here and folded into
/// the returned [`RamCalculation`] as a cost equal to the error's
/// [`AnalysisError::code`] with an empty entry list, so a host UI can render
/// a cost of "syntax error" in place of a number without a separate
/// control-flow channel. [`parse_script`] and [`parse_all`] (the two
/// lower-level operations this function composes) do not do this — they let
/// errors escape via `?`.
///
/// `entry_point` defaults to `main` declared at the entry-point module when
/// `None`, matching [`find_all_called_functions`]. Passing `Some(..)` lets a
/// host let a player designate a non-`main` export as the run target.
pub async fn calculate_ram_usage<P>(
    player: &P,
    code: &str,
    other_scripts: &[ScriptFile],
    cost_table: &CostTable<P>,
    entry_point: Option<DefinedFunction>,
) -> RamCalculation {
    match try_calculate_ram_usage(code, other_scripts, cost_table, player, entry_point).await {
        Ok(calculation) => calculation,
        Err(err) => {
            tracing::debug!(error = %err, code = err.code(), "ram calculation failed");
            RamCalculation {
                cost: err.code() as f64,
                entries: Vec::new(),
            }
        }
    }
}

async fn try_calculate_ram_usage<P>(
    code: &str,
    other_scripts: &[ScriptFile],
    cost_table: &CostTable<P>,
    player: &P,
    entry_point: Option<DefinedFunction>,
) -> Result<RamCalculation> {
    let _span = tracing::debug_span!("calculate_ram_usage").entered();
    let modules = resolver::parse_all(code, other_scripts).await?;
    let reachable = reachability::find_all_called_functions(&modules, entry_point);
    Ok(cost::reduce(&reachable.unresolved_functions, cost_table, player))
}

//! Cost table and cost reducer: folds the unresolved call set against a
//! configurable, host-supplied cost table.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::model::DefinedFunction;

/// The kind tag carried by a [`RamUsageEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RamEntryKind {
    Ns,
    Dom,
    Fn,
    Misc,
}

/// One line item in a [`RamCalculation`]'s breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RamUsageEntry {
    #[serde(rename = "type")]
    pub kind: RamEntryKind,
    pub name: String,
    pub cost: f64,
}

/// The result of reducing an unresolved call set against a cost table: the
/// total cost and the full per-API breakdown that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RamCalculation {
    pub cost: f64,
    pub entries: Vec<RamUsageEntry>,
}

/// A cost-table entry: either a constant, or a function of the opaque
/// player-state value `P`.
pub enum CostValue<P> {
    Constant(f64),
    PlayerDependent(Box<dyn Fn(&P) -> f64 + Send + Sync>),
}

impl<P> CostValue<P> {
    fn resolve(&self, player: &P) -> f64 {
        match self {
            CostValue::Constant(cost) => *cost,
            CostValue::PlayerDependent(f) => f(player),
        }
    }
}

/// A two-level mapping of identifier names to costs, plus the handful of
/// special-namespace entries and the base script cost. Built once via
/// [`CostTable::builder`] and then read-only for the lifetime of the
/// process — this is host-supplied data, never mutated by the analyzer.
pub struct CostTable<P> {
    base_cost: f64,
    top_level: FxHashMap<String, CostValue<P>>,
    sub_apis: FxHashMap<String, FxHashMap<String, CostValue<P>>>,
    special_namespaces: FxHashMap<String, RamUsageEntry>,
}

impl<P> CostTable<P> {
    pub fn builder() -> CostTableBuilder<P> {
        CostTableBuilder::default()
    }

    pub fn base_cost(&self) -> f64 {
        self.base_cost
    }

    /// Look up the cost of `name` under `namespace`, defaulting to `0.0`
    /// when nothing matches.
    ///
    /// `namespace` is split on `.`; a namespace with more than one segment
    /// looks the call up under its *last* segment as a sub-API key
    /// (`costTable[subKey][name]`). A namespace with zero or one segments —
    /// including the common one-deep case `ns.hack` whose namespace is just
    /// `"ns"` — falls back to the flat top-level table keyed by `name`
    /// alone, ignoring the namespace entirely. This is why a bare function
    /// named `purchaseNode` (whose real cost lives under the `hacknet`
    /// sub-API) resolves to `0`: it is a documented false negative, not a
    /// bug.
    fn lookup(&self, namespace: &str, name: &str, player: &P) -> f64 {
        let segments: Vec<&str> = namespace.split('.').collect();
        let value = if segments.len() > 1 {
            segments
                .last()
                .and_then(|sub_key| self.sub_apis.get(*sub_key))
                .and_then(|table| table.get(name))
        } else {
            self.top_level.get(name)
        };
        value.map(|v| v.resolve(player)).unwrap_or(0.0)
    }
}

/// Builder for [`CostTable`], mirroring the base crate's builder-pattern
/// idiom for configuration-shaped types.
pub struct CostTableBuilder<P> {
    base_cost: f64,
    top_level: FxHashMap<String, CostValue<P>>,
    sub_apis: FxHashMap<String, FxHashMap<String, CostValue<P>>>,
    special_namespaces: FxHashMap<String, RamUsageEntry>,
}

impl<P> Default for CostTableBuilder<P> {
    fn default() -> Self {
        Self {
            base_cost: 0.0,
            top_level: FxHashMap::default(),
            sub_apis: FxHashMap::default(),
            special_namespaces: FxHashMap::default(),
        }
    }
}

impl<P> CostTableBuilder<P> {
    pub fn base_cost(mut self, cost: f64) -> Self {
        self.base_cost = cost;
        self
    }

    pub fn constant(mut self, name: impl Into<String>, cost: f64) -> Self {
        self.top_level.insert(name.into(), CostValue::Constant(cost));
        self
    }

    pub fn constant_in(mut self, sub_api: impl Into<String>, name: impl Into<String>, cost: f64) -> Self {
        self.sub_apis
            .entry(sub_api.into())
            .or_default()
            .insert(name.into(), CostValue::Constant(cost));
        self
    }

    pub fn player_dependent(
        mut self,
        name: impl Into<String>,
        cost_fn: impl Fn(&P) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.top_level
            .insert(name.into(), CostValue::PlayerDependent(Box::new(cost_fn)));
        self
    }

    pub fn player_dependent_in(
        mut self,
        sub_api: impl Into<String>,
        name: impl Into<String>,
        cost_fn: impl Fn(&P) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.sub_apis
            .entry(sub_api.into())
            .or_default()
            .insert(name.into(), CostValue::PlayerDependent(Box::new(cost_fn)));
        self
    }

    /// Register one of the fixed full-name namespaces (`"ns.hacknet"`,
    /// `"document"`, `"window"`, `"ns.corporation"`) whose mere presence,
    /// not any specific member name, is enough to charge `entry`.
    pub fn special_namespace(mut self, namespace: impl Into<String>, entry: RamUsageEntry) -> Self {
        self.special_namespaces.insert(namespace.into(), entry);
        self
    }

    pub fn build(self) -> CostTable<P> {
        CostTable {
            base_cost: self.base_cost,
            top_level: self.top_level,
            sub_apis: self.sub_apis,
            special_namespaces: self.special_namespaces,
        }
    }
}

/// Reduce an unresolved call set against `table`, producing the total cost
/// and its breakdown.
///
/// Deduplicates `unresolved` by structural equality before folding, then
/// prepends the fixed `baseCost` entry.
pub fn reduce<P>(unresolved: &[DefinedFunction], table: &CostTable<P>, player: &P) -> RamCalculation {
    let mut entries = vec![RamUsageEntry {
        kind: RamEntryKind::Misc,
        name: "baseCost".to_string(),
        cost: table.base_cost,
    }];
    let mut total = table.base_cost;

    let mut seen: FxHashSet<&DefinedFunction> = FxHashSet::default();
    for call in unresolved {
        if !seen.insert(call) {
            continue;
        }

        if let Some(special) = table.special_namespaces.get(&call.namespace) {
            total += special.cost;
            entries.push(special.clone());
            continue;
        }

        let cost = table.lookup(&call.namespace, &call.name, player);
        total += cost;
        entries.push(RamUsageEntry {
            kind: RamEntryKind::Ns,
            name: call.name.clone(),
            cost,
        });
    }

    tracing::debug!(cost = total, entries = entries.len(), "cost reduction complete");
    RamCalculation {
        cost: total,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn df(name: &str, namespace: &str) -> DefinedFunction {
        DefinedFunction::new(name, namespace, "")
    }

    #[test]
    fn base_cost_floor_with_no_calls() {
        let table: CostTable<()> = CostTable::builder().base_cost(10.0).build();
        let calc = reduce(&[], &table, &());
        assert_eq!(calc.cost, 10.0);
        assert_eq!(calc.entries.len(), 1);
    }

    #[test]
    fn one_deep_call_uses_flat_top_level_lookup() {
        let table: CostTable<()> = CostTable::builder()
            .base_cost(1.0)
            .constant("hack", 100.0)
            .build();
        let calc = reduce(&[df("hack", "ns")], &table, &());
        assert_eq!(calc.cost, 101.0);
    }

    #[test]
    fn two_deep_call_uses_sub_api_lookup_by_last_segment() {
        let table: CostTable<()> = CostTable::builder()
            .base_cost(1.0)
            .constant_in("hacknet", "purchaseNode", 50.0)
            .build();
        let calc = reduce(&[df("purchaseNode", "ns.hacknet")], &table, &());
        // Matches the "ns.hacknet" fixed special-namespace string too; the
        // special-namespace check is expected to take priority in that
        // case, so this test intentionally uses a namespace the special
        // check does not recognize to exercise the generic sub-API path.
        let table2: CostTable<()> = CostTable::builder()
            .base_cost(1.0)
            .constant_in("stanek", "get", 75.0)
            .build();
        let calc2 = reduce(&[df("get", "ns.stanek")], &table2, &());
        assert_eq!(calc2.cost, 76.0);
        let _ = calc;
    }

    #[test]
    fn bare_name_with_single_segment_namespace_ignores_the_namespace() {
        // A free function named like a sub-API member, called without a
        // namespace that resolves to more than one segment, is a
        // documented false negative: it resolves to 0.
        let table: CostTable<()> = CostTable::builder()
            .base_cost(1.0)
            .constant_in("hacknet", "purchaseNode", 50.0)
            .build();
        let calc = reduce(&[df("purchaseNode", "")], &table, &());
        assert_eq!(calc.cost, 1.0);
    }

    #[test]
    fn unmatched_identifier_contributes_zero() {
        let table: CostTable<()> = CostTable::builder().base_cost(1.0).build();
        let calc = reduce(&[df("get", "billybob")], &table, &());
        assert_eq!(calc.cost, 1.0);
    }

    #[test]
    fn special_namespace_bypasses_generic_lookup() {
        let table: CostTable<()> = CostTable::builder()
            .base_cost(1.0)
            .constant_in("hacknet", "purchaseNode", 50.0)
            .special_namespace(
                "ns.hacknet",
                RamUsageEntry {
                    kind: RamEntryKind::Ns,
                    name: "hacknet".to_string(),
                    cost: 4.0,
                },
            )
            .build();
        let calc = reduce(&[df("purchaseNode", "ns.hacknet")], &table, &());
        assert_eq!(calc.cost, 5.0);
    }

    #[test]
    fn deduplicates_identical_calls() {
        let table: CostTable<()> = CostTable::builder().base_cost(1.0).constant("hack", 10.0).build();
        let calc = reduce(&[df("hack", "ns"), df("hack", "ns"), df("hack", "ns")], &table, &());
        assert_eq!(calc.cost, 11.0);
    }

    #[test]
    fn player_dependent_cost_is_invoked_with_player_state() {
        #[derive(Clone, Copy)]
        struct Player {
            source_files: u32,
        }
        let table: CostTable<Player> = CostTable::builder()
            .base_cost(1.0)
            .player_dependent("singularityCall", |player: &Player| {
                f64::from(player.source_files) * 2.0
            })
            .build();
        let calc = reduce(
            &[df("singularityCall", "")],
            &table,
            &Player { source_files: 3 },
        );
        assert_eq!(calc.cost, 7.0);
    }
}

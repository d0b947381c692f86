//! Property-based tests for the two genuinely property-shaped invariants:
//! deduplication of repeated identical calls, and shape-only invariance of
//! cost under renaming the entry function's first formal parameter.

use proptest::prelude::*;
use ramforge_core::{calculate_ram_usage, CostTable};

const RESERVED: &[&str] = &[
    "function", "return", "new", "class", "const", "let", "var", "import", "export", "async",
    "await", "main", "hack", "if", "else", "for", "while", "ns",
];

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,9}".prop_filter("not a reserved word", |s| {
        !RESERVED.contains(&s.as_str())
    })
}

fn table() -> CostTable<()> {
    CostTable::builder().base_cost(1.6).constant("hack", 0.1).build()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Calling the same API identifier `k` times contributes its cost
    /// exactly once, for any repeat count in a reasonable range.
    #[test]
    fn repeated_identical_calls_are_charged_once(repeats in 1usize..12) {
        let body: String = "await ns.hack(\"x\"); ".repeat(repeats);
        let source = format!("export async function main(ns) {{ {body} }}");

        let calc = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(calculate_ram_usage(&(), &source, &[], &table(), None));

        prop_assert_eq!(calc.cost, 1.6 + 0.1);
    }

    /// Renaming the entry function's first formal parameter never changes
    /// the computed cost: the analyzer matches on call shape, not on the
    /// bound identifier's origin.
    #[test]
    fn renaming_the_entry_parameter_does_not_change_cost(param_name in identifier_strategy()) {
        let baseline_source = "export async function main(ns) { await ns.hack(\"x\"); }";
        let renamed_source = format!(
            "export async function main({param_name}) {{ await {param_name}.hack(\"x\"); }}"
        );

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let baseline = runtime.block_on(calculate_ram_usage(&(), baseline_source, &[], &table(), None));
        let renamed = runtime.block_on(calculate_ram_usage(&(), &renamed_source, &[], &table(), None));

        prop_assert_eq!(baseline.cost, renamed.cost);
    }
}

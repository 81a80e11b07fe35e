//! Normalizer property tests.
//!
//! The normalizer must be idempotent, independent of input ordering,
//! and must scrub every occurrence of the sandbox path from every
//! message, for any realistic sandbox path value.

use proptest::prelude::*;

use vetra_harness_core::{normalize_findings, Finding};

fn arb_fragment() -> impl Strategy<Value = String> {
    // Message fragments that can never accidentally contain a
    // sandbox path.
    "[a-z ]{0,12}"
}

fn arb_sandbox_path() -> impl Strategy<Value = String> {
    "[a-z0-9]{4,10}".prop_map(|suffix| format!("/tmp/plugins_{suffix}"))
}

fn arb_finding(sandbox: String) -> impl Strategy<Value = Finding> {
    // Identity keys come from small pools so many findings collide
    // on (tool, rule, path) and the message becomes the deciding
    // sort key, where the scrub/sort interaction lives.
    (
        proptest::sample::select(vec!["alpha", "beta"]),
        proptest::sample::select(vec!["rule1", "rule2"]),
        proptest::sample::select(vec!["a.py", "b.py"]),
        arb_fragment(),
        arb_fragment(),
        any::<bool>(),
    )
        .prop_map(move |(tool, rule_key, path, left, right, embed)| {
            let message = if embed {
                format!("{left}{sandbox}{right}")
            } else {
                format!("{left}{right}")
            };
            Finding {
                tool: tool.to_string(),
                rule_key: rule_key.to_string(),
                path: path.to_string(),
                message,
            }
        })
}

fn arb_case() -> impl Strategy<Value = (Vec<Finding>, String)> {
    arb_sandbox_path().prop_flat_map(|sandbox| {
        (
            proptest::collection::vec(arb_finding(sandbox.clone()), 0..20),
            Just(sandbox),
        )
    })
}

proptest! {
    #[test]
    fn normalization_is_idempotent((findings, sandbox) in arb_case()) {
        let once = normalize_findings(findings, &sandbox);
        let twice = normalize_findings(once.issues.clone(), &sandbox);
        prop_assert_eq!(once.issues, twice.issues);
    }

    #[test]
    fn normalization_is_order_independent(
        (findings, sandbox) in arb_case(),
        seed in any::<u64>(),
    ) {
        // A cheap deterministic shuffle keyed by the seed.
        let mut permuted = findings.clone();
        if !permuted.is_empty() {
            let len = permuted.len();
            for i in 0..len {
                let j = (seed as usize).wrapping_mul(31).wrapping_add(i * 17) % len;
                permuted.swap(i, j);
            }
        }

        let original = normalize_findings(findings, &sandbox);
        let shuffled = normalize_findings(permuted, &sandbox);
        prop_assert_eq!(original.issues, shuffled.issues);
    }

    #[test]
    fn scrubbing_removes_every_sandbox_path_occurrence((findings, sandbox) in arb_case()) {
        let normalized = normalize_findings(findings, &sandbox);
        for finding in &normalized.issues {
            prop_assert!(!finding.message.contains(&sandbox));
        }
    }

    #[test]
    fn sort_order_is_total_and_ascending((findings, sandbox) in arb_case()) {
        let normalized = normalize_findings(findings, &sandbox);
        for pair in normalized.issues.windows(2) {
            let a = (&pair[0].tool, &pair[0].rule_key, &pair[0].path, &pair[0].message);
            let b = (&pair[1].tool, &pair[1].rule_key, &pair[1].path, &pair[1].message);
            prop_assert!(a <= b);
        }
    }
}

//! End-to-end scenarios: expression in, plan set out, dispatcher execution.

use prex::{compile, CompileOptions, Plan};
use std::collections::BTreeSet;
use std::convert::Infallible;

fn plan_set(pre: &str) -> BTreeSet<String> {
    let mut compiled = compile(pre, CompileOptions::default()).unwrap();
    compiled
        .plans()
        .unwrap()
        .iter()
        .map(|p| p.render())
        .collect()
}

fn plan_list(pre: &str, minimize: bool) -> Vec<Plan> {
    let opts = CompileOptions {
        minimize,
        ..CompileOptions::default()
    };
    compile(pre, opts).unwrap().plans().unwrap()
}

/// The symbols of `plan` that appear in `arm`, in plan order.
fn project<'a>(plan: &'a Plan, arm: &[&str]) -> Vec<&'a str> {
    plan.symbols()
        .iter()
        .map(String::as_str)
        .filter(|s| arm.contains(s))
        .collect()
}

#[test]
fn three_way_shuffle_yields_all_permutations() {
    let expected: BTreeSet<String> = ["A B C ", "A C B ", "B A C ", "B C A ", "C A B ", "C B A "]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(plan_set("A&B&C"), expected);
}

#[test]
fn three_way_shuffle_other_alphabet() {
    let plans = plan_set("D&E&F");
    assert_eq!(plans.len(), 6);
    for plan in &plans {
        let mut symbols: Vec<&str> = plan.split_whitespace().collect();
        symbols.sort_unstable();
        assert_eq!(symbols, vec!["D", "E", "F"]);
    }
}

#[test]
fn shuffle_of_pairs_keeps_arm_order() {
    let expected: BTreeSet<String> = [
        "A B C D ",
        "A C B D ",
        "A C D B ",
        "C A B D ",
        "C A D B ",
        "C D A B ",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(plan_set("(A B)&(C D)"), expected);
}

#[test]
fn framed_shuffle_of_uneven_arms() {
    let plans = plan_list("s (A (a b) C & (D E F)) f", false);
    // C(7,3) interleavings of a 4-symbol arm with a 3-symbol arm.
    assert_eq!(plans.len(), 35);

    let distinct: BTreeSet<_> = plans.iter().map(|p| p.render()).collect();
    assert_eq!(distinct.len(), 35);

    for plan in &plans {
        let symbols = plan.symbols();
        assert_eq!(symbols.len(), 9);
        assert_eq!(symbols.first().map(String::as_str), Some("s"));
        assert_eq!(symbols.last().map(String::as_str), Some("f"));
        assert_eq!(project(plan, &["A", "a", "b", "C"]), vec!["A", "a", "b", "C"]);
        assert_eq!(project(plan, &["D", "E", "F"]), vec!["D", "E", "F"]);
    }
}

#[test]
fn union_yields_each_alternative() {
    let expected: BTreeSet<String> = ["A ", "B ", "C "].into_iter().map(String::from).collect();
    assert_eq!(plan_set("A|B|C"), expected);
}

#[test]
fn concatenation_yields_one_plan() {
    let expected: BTreeSet<String> = [String::from("A B C ")].into_iter().collect();
    assert_eq!(plan_set("A B C"), expected);
}

#[test]
fn four_way_shuffle_cardinality() {
    let plans = plan_list("A&B&C&D", true);
    assert_eq!(plans.len(), 24);
    let distinct: BTreeSet<_> = plans.iter().map(|p| p.render()).collect();
    assert_eq!(distinct.len(), 24);
}

#[test]
fn bracketed_symbols_interleave() {
    let expected: BTreeSet<String> = [
        "start load save stop ",
        "start save load stop ",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(plan_set("[start] ([load] & [save]) [stop]"), expected);
}

#[test]
fn enumeration_is_deterministic_across_compiles() {
    let first = plan_list("(A B)&(C D)&E", false);
    let second = plan_list("(A B)&(C D)&E", false);
    assert_eq!(first, second);
}

#[test]
fn reset_is_idempotent() {
    let mut compiled = compile("A&B&C", CompileOptions::default()).unwrap();
    let first = compiled.plans().unwrap();
    compiled.reset();
    let second = compiled.plans().unwrap();
    assert_eq!(first, second);
}

#[test]
fn minimization_preserves_plan_sets() {
    let plain: BTreeSet<_> = plan_list("s (A (a b) C & (D E F)) f", false)
        .iter()
        .map(|p| p.render())
        .collect();
    let minimized: BTreeSet<_> = plan_list("s (A (a b) C & (D E F)) f", true)
        .iter()
        .map(|p| p.render())
        .collect();
    assert_eq!(plain, minimized);
}

#[test]
fn dispatcher_observes_every_interleaving() {
    let mut append = |_: &str, name: &str, mut scope: String| -> Result<String, Infallible> {
        scope.push_str(name);
        scope.push(' ');
        Ok(scope)
    };

    let mut compiled = compile("A&B&C", CompileOptions::default()).unwrap();
    let mut observed = BTreeSet::new();
    while let Some(scope) = compiled.run_once(String::new(), &mut append).unwrap() {
        observed.insert(scope);
    }

    let expected: BTreeSet<String> = ["A B C ", "A C B ", "B A C ", "B C A ", "C A B ", "C B A "]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(observed, expected);
}

#[test]
fn star_enumerates_bounded_prefix() {
    // Cyclic automaton: enumeration terminates with the accepted words up to
    // the length cap instead of diverging.
    let opts = CompileOptions {
        allow_infinite: true,
        ..CompileOptions::default()
    };
    let mut compiled = compile("(A B)*", opts).unwrap();
    let plans: Vec<String> = compiled.plans().unwrap().iter().map(|p| p.render()).collect();
    assert!(plans.contains(&String::new()));
    assert!(plans.contains(&String::from("A B ")));
    assert!(plans.iter().all(|p| {
        let symbols: Vec<&str> = p.split_whitespace().collect();
        symbols.chunks(2).all(|c| c == ["A", "B"])
    }));
}

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use branchpoint::{
    driver::SearchDriver,
    reference::{
        branching::{LexicographicSplit, RandomSplit},
        constraint::Constraint,
        constraints::all_different::AllDifferentConstraint,
        world::ImWorld,
    },
    solver::{
        semantics::DomainSemantics,
        solution::{HashSetDomain, Solution},
        value::StandardValue,
        VariableId,
    },
};

/// Find a permutation of `0..n` (`n` variables, each with domain `0..n`,
/// constrained all-different) — a small stand-in for a combinatorial search
/// benchmark, scaled by `n` the way the crate's own N-Queens bench scaled by
/// board size.

#[derive(Debug, Clone)]
struct PermutationSemantics;

#[derive(Debug)]
enum PermutationConstraint {
    AllDifferent(Vec<VariableId>),
}

impl DomainSemantics for PermutationSemantics {
    type Value = StandardValue;
    type VariableMetadata = ();
    type ConstraintDefinition = PermutationConstraint;

    fn build_constraint(&self, definition: &Self::ConstraintDefinition) -> Box<dyn Constraint<Self>> {
        match definition {
            PermutationConstraint::AllDifferent(vars) => {
                Box::new(AllDifferentConstraint::new(vars.clone()))
            }
        }
    }
}

fn permutation_world(n: usize) -> ImWorld<PermutationSemantics> {
    let semantics = Arc::new(PermutationSemantics);
    let variables: Vec<VariableId> = (0..n as u32).collect();
    let values: im::HashSet<StandardValue> = (0..n as i64).map(StandardValue::Int).collect();

    let mut domains: im::HashMap<VariableId, Box<dyn branchpoint::solver::solution::DomainRepresentation<StandardValue>>> =
        im::HashMap::new();
    for &var in &variables {
        domains.insert(var, Box::new(HashSetDomain::new(values.clone())));
    }

    let initial = Solution {
        domains,
        semantics: semantics.clone(),
    };
    let constraints = vec![semantics.build_constraint(&PermutationConstraint::AllDifferent(variables))];
    ImWorld::new(initial, constraints)
}

fn branching_strategy_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("branching strategy, n=8 permutation");

    group.bench_function("LexicographicSplit", |b| {
        b.iter(|| {
            let world = permutation_world(black_box(8));
            let mut driver = SearchDriver::new(world, LexicographicSplit::new());
            driver.launch(true).unwrap();
            assert_eq!(driver.measures().solution_count, 1);
        })
    });

    group.bench_function("RandomSplit", |b| {
        b.iter(|| {
            let world = permutation_world(black_box(8));
            let mut driver = SearchDriver::new(world, RandomSplit::new());
            driver.launch(true).unwrap();
            assert_eq!(driver.measures().solution_count, 1);
        })
    });

    group.finish();
}

fn search_scaling_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("permutation search, scaling n");

    for n in [4, 6, 8].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            b.iter(|| {
                let world = permutation_world(black_box(n));
                let mut driver = SearchDriver::new(world, LexicographicSplit::new());
                driver.launch(true).unwrap();
                assert_eq!(driver.measures().solution_count, 1);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, search_scaling_benchmark, branching_strategy_benchmarks);
criterion_main!(benches);

//! Effect Query Benchmarks
//!
//! This module benchmarks the effect framework:
//! - Resource interning (hits and first-time names)
//! - Per-operation queries over declared effect lists
//! - Registry capability lookups
//! - Recursive analysis over nested regions

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ember_effects::{
    kind, AnalysisConfig, EffectAnalysis, EffectQuery, EffectRegistry, MemoryEffect,
    RecursionPolicy, Resource, ValueId,
};
use ember_ir::dialect::{ops, standard_registry};
use ember_ir::{Function, Op, Region};

fn registry() -> EffectRegistry {
    match standard_registry() {
        Ok(registry) => registry,
        Err(e) => panic!("standard registry failed to build: {}", e),
    }
}

/// Build `depth` nested `scf.execute_region` ops around a body of `width`
/// loads and stores.
fn create_nested_regions(func: &mut Function, depth: usize, width: usize) -> Op {
    let ptr = func.add_param();
    let mut body = Vec::with_capacity(width + 1);
    for i in 0..width {
        let op = if i % 2 == 0 {
            func.op(ops::LOAD).operand(ptr).results(1).build()
        } else {
            let value = func.add_param();
            func.op(ops::STORE).operands([value, ptr]).build()
        };
        body.push(op);
    }
    body.push(func.op(ops::YIELD).build());

    let mut op = func
        .op(ops::EXECUTE_REGION)
        .region(Region::from_ops(body))
        .build();
    for _ in 1..depth {
        op = func
            .op(ops::EXECUTE_REGION)
            .region(Region::from_ops(vec![op]))
            .build();
    }
    op
}

// ============================================================================
// Resource Benchmarks
// ============================================================================

fn bench_resource_interning(c: &mut Criterion) {
    let mut group = c.benchmark_group("resource_interning");

    group.bench_function("builtin", |b| {
        b.iter(|| black_box(Resource::new(black_box("<Default>"))))
    });

    let names: Vec<String> = (0..64).map(|i| format!("bench.resource.{}", i)).collect();
    for name in &names {
        Resource::new(name);
    }
    group.throughput(Throughput::Elements(names.len() as u64));
    group.bench_function("existing", |b| {
        b.iter(|| {
            for name in &names {
                black_box(Resource::new(black_box(name)));
            }
        })
    });

    group.finish();
}

// ============================================================================
// Instance Query Benchmarks
// ============================================================================

fn bench_instance_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("instance_queries");
    let registry = registry();

    for width in [1usize, 16, 256] {
        let mut func = Function::new("zero");
        let values: Vec<ValueId> = (0..width).map(|_| func.add_param()).collect();
        let op = func.op(ops::ZERO).operands(values.clone()).build();
        let last = values[width - 1];

        group.throughput(Throughput::Elements(width as u64));

        group.bench_with_input(BenchmarkId::new("has_effect", width), &op, |b, op| {
            b.iter(|| {
                let view = registry.interface::<MemoryEffect>(black_box(op));
                black_box(view.map(|view| view.has_effect::<kind::Read>()))
            })
        });

        group.bench_with_input(BenchmarkId::new("only_has_effect", width), &op, |b, op| {
            b.iter(|| {
                let view = registry.interface::<MemoryEffect>(black_box(op));
                black_box(view.map(|view| view.only_has_effect::<kind::Write>()))
            })
        });

        group.bench_with_input(BenchmarkId::new("effects_on_value", width), &op, |b, op| {
            b.iter(|| {
                let view = registry.interface::<MemoryEffect>(black_box(op));
                black_box(view.map(|view| view.effects_on_value(last)))
            })
        });
    }

    group.finish();
}

// ============================================================================
// Registry Benchmarks
// ============================================================================

fn bench_registry_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_lookup");
    let registry = registry();

    let mut func = Function::new("lookup");
    let ptr = func.add_param();
    let lookups = [
        func.op(ops::LOAD).operand(ptr).results(1).build(),
        func.op(ops::ADD).operands([ptr, ptr]).results(1).build(),
        func.op(ops::CALL).symbol("callee").build(),
        func.op(ops::FOR).build(),
    ];

    for op in &lookups {
        group.bench_with_input(BenchmarkId::new("interface", op.name()), op, |b, op| {
            b.iter(|| black_box(registry.interface::<MemoryEffect>(black_box(op)).is_some()))
        });
    }

    group.finish();
}

// ============================================================================
// Recursive Analysis Benchmarks
// ============================================================================

fn bench_recursive_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("recursive_analysis");
    let registry = registry();
    let conservative = EffectAnalysis::new(&registry);
    let recursive = match EffectAnalysis::with_config(
        &registry,
        AnalysisConfig::new().with_recursion(RecursionPolicy::Recursive),
    ) {
        Ok(analysis) => analysis,
        Err(e) => panic!("invalid analysis config: {}", e),
    };

    for (depth, width) in [(1usize, 8usize), (8, 8), (32, 64)] {
        let mut func = Function::new("nested");
        let op = create_nested_regions(&mut func, depth, width);
        let label = format!("{}x{}", depth, width);

        group.bench_with_input(BenchmarkId::new("effects_recursively", &label), &op, |b, op| {
            b.iter(|| black_box(recursive.effects_recursively::<MemoryEffect>(black_box(op))))
        });

        group.bench_with_input(BenchmarkId::new("has_no_effect_conservative", &label), &op, |b, op| {
            b.iter(|| black_box(conservative.has_no_effect::<MemoryEffect>(black_box(op))))
        });

        group.bench_with_input(BenchmarkId::new("might_have_write", &label), &op, |b, op| {
            b.iter(|| black_box(recursive.might_have_effect::<kind::Write>(black_box(op))))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_resource_interning,
    bench_instance_queries,
    bench_registry_lookup,
    bench_recursive_analysis,
);
criterion_main!(benches);

//! Benchmarks for the rule engine
//!
//! Measures:
//! - Plan building (name resolution plus parameter checks)
//! - A full plan-build + validate pass over a typical sign-up form
//! - Resolution of built-in versus custom rule names
//! - A `regex` rule applied to many fields

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fieldcheck_validator::{RuleRegistry, Validator};
use serde_json::{Value, json};

fn signup_form() -> Value {
    json!({
        "username": "ada_lovelace",
        "email": "ada@example.com",
        "password": "correct horse battery staple",
        "password_confirm": "correct horse battery staple",
        "age": "36",
        "plan": "pro",
        "birthday": "1815-12-10",
        "terms": "yes",
    })
}

fn build_plan(v: &mut Validator) {
    v.rule("required", ["username", "email", "password", "terms"])
        .and_then(|v| v.rule("alphaDash", "username"))
        .and_then(|v| v.rule_with("length", "username", [3, 32]))
        .and_then(|v| v.rule("email", "email"))
        .and_then(|v| v.rule_with("regex", ["username", "plan"], ["/^[a-z_]+$/i"]))
        .and_then(|v| v.rule_with("equals", "password_confirm", ["password"]))
        .and_then(|v| v.rule_with("min", "age", [18]))
        .and_then(|v| v.rule_with("in", "plan", [vec!["free", "pro", "team"]]))
        .and_then(|v| v.rule_with("dateFormat", "birthday", ["Y-m-d"]))
        .and_then(|v| v.rule("accepted", "terms"))
        .expect("plan is valid");
}

fn isolated_validator(data: Value, registry: &Arc<RuleRegistry>) -> Validator {
    Validator::builder(data)
        .registry(Arc::clone(registry))
        .build()
}

fn plan_building(c: &mut Criterion) {
    let registry = Arc::new(RuleRegistry::new());
    let data = signup_form();

    c.bench_function("engine/plan_build", |b| {
        b.iter(|| {
            let mut v = isolated_validator(data.clone(), &registry);
            build_plan(&mut v);
            black_box(v.plan().len())
        });
    });
}

fn full_pass(c: &mut Criterion) {
    let registry = Arc::new(RuleRegistry::new());
    let mut group = c.benchmark_group("engine/validate");

    let passing = signup_form();
    let mut failing = signup_form();
    failing["email"] = json!("not-an-email");
    failing["age"] = json!("12");
    failing["terms"] = json!("no");

    for (name, data) in [("passing", passing), ("failing", failing)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| {
                let mut v = isolated_validator(data.clone(), &registry);
                build_plan(&mut v);
                black_box(v.validate().expect("no configuration errors"))
            });
        });
    }

    group.finish();
}

fn resolution(c: &mut Criterion) {
    let registry = RuleRegistry::new();
    for i in 0..32 {
        registry
            .register(format!("custom{i}"), |_, _, _| true)
            .expect("valid name");
    }

    let mut group = c.benchmark_group("engine/resolve");
    for name in ["required", "DATEFORMAT", "custom17"] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &name, |b, name| {
            b.iter(|| black_box(registry.resolve(name).is_ok()));
        });
    }
    group.finish();
}

fn pattern_fields(c: &mut Criterion) {
    let registry = Arc::new(RuleRegistry::new());
    let mut group = c.benchmark_group("engine/regex_fields");

    for count in [1usize, 16, 128] {
        let fields: Vec<String> = (0..count).map(|i| format!("code{i}")).collect();
        let data: Value = fields
            .iter()
            .map(|field| (field.clone(), json!("AB-1234")))
            .collect::<serde_json::Map<_, _>>()
            .into();

        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter(|| {
                let mut v = isolated_validator(data.clone(), &registry);
                v.rule_with("regex", fields.clone(), [r"/^[a-z]{2}-\d{4}$/i"])
                    .expect("pattern is valid");
                black_box(v.validate().expect("no configuration errors"))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, plan_building, full_pass, resolution, pattern_fields);
criterion_main!(benches);

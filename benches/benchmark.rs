// Encode and predict benchmarks for both schemas
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use loanscore_core::{DecisionTree, LogisticRegression, RandomForest, SchemaVariant, TREE_LEAF};
use loanscore_schema::{Deployment, FeatureEncoder, FeatureSchema, RawForm};
use rand::prelude::*;
use std::sync::Arc;

const EDUCATION: &[&str] = &["Graduation", "Secondary", "Junior secondary", "Post Grad", ""];
const INCOME_TYPE: &[&str] = &["Commercial", "Service", "Retired", "Govt Job", "Student", "Unknown"];
const MARITAL: &[&str] = &["M", "W", "S", "D", ""];
const GENDER: &[&str] = &["Male", "Female", "XNA"];
const CONTRACT: &[&str] = &["CL", "RL"];

fn pick<'a>(rng: &mut impl Rng, labels: &[&'a str]) -> &'a str {
    labels[rng.random_range(0..labels.len())]
}

fn generate_random_form(rng: &mut impl Rng) -> RawForm {
    RawForm::new()
        .with("Client_Income", rng.random_range(10000.0..500000.0))
        .with("Child_Count", rng.random_range(0..5) as f64)
        .with("Credit_Amount", rng.random_range(10000.0..1000000.0))
        .with("Loan_Annuity", rng.random_range(1000.0..50000.0))
        .with("Client_Family_Members", rng.random_range(1..8) as f64)
        .with("Age_Years", rng.random_range(21..70) as f64)
        .with("Employed_Years", rng.random_range(0..40) as f64)
        .with("Registration_Years", rng.random_range(0..30) as f64)
        .with("ID_Years", rng.random_range(0..20) as f64)
        .with("Car_Owned", rng.random_bool(0.5))
        .with("Bike_Owned", rng.random_bool(0.2))
        .with("Active_Loan", rng.random_bool(0.5))
        .with("House_Own", rng.random_bool(0.6))
        .with("Workphone_Working", rng.random_bool(0.5))
        .with("Client_Permanent_Match_Tag", pick(rng, &["Yes", "No"]))
        .with("Client_Contact_Work_Tag", pick(rng, &["Yes", "No"]))
        .with("Client_Education", pick(rng, EDUCATION))
        .with("Client_Income_Type", pick(rng, INCOME_TYPE))
        .with("Client_Marital_Status", pick(rng, MARITAL))
        .with("Client_Gender", pick(rng, GENDER))
        .with("Loan_Contract_Type", pick(rng, CONTRACT))
}

/// Forest of depth-one trees over random features
fn generate_random_forest(rng: &mut impl Rng, n_features: usize, n_trees: usize) -> RandomForest {
    let trees = (0..n_trees)
        .map(|_| DecisionTree {
            feature: vec![rng.random_range(0..n_features) as i32, TREE_LEAF, TREE_LEAF],
            threshold: vec![rng.random_range(0.0..100000.0), 0.0, 0.0],
            left: vec![1, TREE_LEAF, TREE_LEAF],
            right: vec![2, TREE_LEAF, TREE_LEAF],
            value: vec![
                [1.0, 1.0],
                [rng.random_range(1.0..50.0), rng.random_range(1.0..50.0)],
                [rng.random_range(1.0..50.0), rng.random_range(1.0..50.0)],
            ],
        })
        .collect();
    RandomForest::new(n_features, trees)
}

fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let mut rng = rand::rng();
    let forms: Vec<RawForm> = (0..1000).map(|_| generate_random_form(&mut rng)).collect();

    for variant in SchemaVariant::ALL {
        let encoder = FeatureEncoder::new(FeatureSchema::for_variant(variant));
        group.bench_with_input(BenchmarkId::new("schema", variant), &forms, |b, forms| {
            b.iter(|| {
                for form in forms {
                    black_box(encoder.encode(black_box(form)));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");
    let mut rng = rand::rng();
    let form = generate_random_form(&mut rng);

    for n_trees in [10, 100, 500].iter() {
        let forest = generate_random_forest(&mut rng, 27, *n_trees);
        let deployment = Deployment::new(SchemaVariant::A, Arc::new(forest)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("schema_a_forest", n_trees),
            n_trees,
            |b, _| {
                b.iter(|| black_box(deployment.predict(black_box(&form)).unwrap()));
            },
        );
    }

    let coefficients: Vec<f64> = (0..20).map(|_| rng.random_range(-0.001..0.001)).collect();
    let logistic = LogisticRegression::new(coefficients, -3.0);
    let deployment = Deployment::new(SchemaVariant::B, Arc::new(logistic)).unwrap();
    group.bench_function("schema_b_logistic", |b| {
        b.iter(|| black_box(deployment.predict(black_box(&form)).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, benchmark_encode, benchmark_predict);
criterion_main!(benches);

/// Benchmarks for the priority bag, the hottest data structure in the
/// kernel: every cycle runs several put/take rounds across the concepts
/// bag and the per-concept link bags.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use noema::{Bag, BagConfig, BudgetValue, Item};

#[derive(Debug, Clone)]
struct Token {
    key: String,
    budget: BudgetValue,
}

impl Token {
    fn new(i: usize) -> Self {
        let priority = 0.05 + (i % 19) as f32 / 20.0;
        Self {
            key: format!("token-{i}"),
            budget: BudgetValue::new(priority, 0.8, 0.5),
        }
    }
}

impl Item for Token {
    fn key(&self) -> &str {
        &self.key
    }
    fn budget(&self) -> &BudgetValue {
        &self.budget
    }
    fn budget_mut(&mut self) -> &mut BudgetValue {
        &mut self.budget
    }
}

fn bag() -> Bag<Token> {
    Bag::new(BagConfig {
        capacity: 1000,
        levels: 100,
        forget_cycles: 10.0,
        relative_threshold: 0.1,
    })
}

fn bench_put_in(c: &mut Criterion) {
    c.bench_function("bag_put_1000", |b| {
        b.iter(|| {
            let mut bag = bag();
            for i in 0..1000 {
                bag.put_in(black_box(Token::new(i)));
            }
            bag
        })
    });
}

fn bench_take_out(c: &mut Criterion) {
    c.bench_function("bag_take_out_under_load", |b| {
        let mut filled = bag();
        for i in 0..1000 {
            filled.put_in(Token::new(i));
        }
        let mut rng = XorShiftRng::seed_from_u64(1);
        b.iter(|| {
            if let Some(token) = filled.take_out(&mut rng) {
                filled.put_back(black_box(token));
            }
        })
    });
}

fn bench_churn(c: &mut Criterion) {
    c.bench_function("bag_churn_put_take_cycle", |b| {
        let mut filled = bag();
        for i in 0..1000 {
            filled.put_in(Token::new(i));
        }
        let mut rng = XorShiftRng::seed_from_u64(1);
        let mut next = 1000;
        b.iter(|| {
            filled.put_in(Token::new(next % 2000));
            next += 1;
            if let Some(token) = filled.take_out(&mut rng) {
                filled.put_back(token);
            }
        })
    });
}

criterion_group!(benches, bench_put_in, bench_take_out, bench_churn);
criterion_main!(benches);

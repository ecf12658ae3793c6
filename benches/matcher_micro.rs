//! Microbenchmark that isolates the matching algorithms from all other overhead
//! (I/O, threading, sorting).

use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{RngExt as _, SeedableRng};

use skim_algo::prelude::*;

const WORDS: [&str; 12] = [
    "src", "matcher", "Test", "fuzzy", "lib", "main", "README", "target", "debug", "util", "options", "core",
];

fn generate_lines(count: usize) -> Vec<Chars> {
    let mut rng = StdRng::seed_from_u64(0x2545_f491);
    (0..count)
        .map(|i| {
            let depth = rng.random_range(1..=5);
            let mut line = String::new();
            for _ in 0..depth {
                line.push_str(WORDS[rng.random_range(0..WORDS.len())]);
                line.push(if rng.random_ratio(1, 3) { '_' } else { '/' });
            }
            line.push_str(&format!("file{}.rs", rng.random_range(0..1000)));
            Chars::from(line.as_str()).with_index(i as i32)
        })
        .collect()
}

fn bench_matcher(c: &mut Criterion) {
    let lines = generate_lines(100_000);

    for algo in Algorithm::ALL {
        let options = MatcherOptionsBuilder::default()
            .algorithm(algo)
            .build()
            .expect("valid options");
        let matcher = LineMatcher::new(options);
        let pattern = matcher.pattern("test");

        c.bench_function(&format!("micro_{algo}"), |b| {
            b.iter(|| {
                let mut count = 0u64;
                for line in &lines {
                    if matcher.match_chars(line, &pattern, false).is_some() {
                        count += 1;
                    }
                }
                count
            });
        });
    }

    c.bench_function("micro_v2_positions", |b| {
        let mut slab = Slab::default();
        let params = MatchParams {
            with_pos: true,
            ..MatchParams::default()
        };
        let pattern: Vec<char> = "mtchr".chars().collect();
        b.iter(|| {
            let mut count = 0u64;
            for line in &lines {
                let (res, _) = fuzzy_match_v2(&params, line, &pattern, Some(&mut slab));
                if res.is_match() {
                    count += 1;
                }
            }
            count
        });
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench_matcher
);
criterion_main!(benches);

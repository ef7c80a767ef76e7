use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use simword::prelude::*;

const SYLLABLES: &[&str] = &[
    "ha", "mau", "se", "ber", "ling", "ten", "stra", "ße", "kü", "che", "wald", "in", "ge", "rot",
];

fn generate_vocabulary(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let mut word = String::new();
            let mut n = i;
            for _ in 0..3 {
                word.push_str(SYLLABLES[n % SYLLABLES.len()]);
                n /= SYLLABLES.len();
            }
            word
        })
        .collect()
}

fn bench_queries(c: &mut Criterion) {
    let words = generate_vocabulary(2_744);
    let index = VocabularyIndex::from_words(words.iter().cloned());
    let queries: Vec<&String> = words.iter().step_by(97).collect();

    let retriever = CandidateRetriever::default();
    let finder = SimilarWordFinder::default();

    let mut group = c.benchmark_group("typo_queries");

    group.bench_function("retrieve", |b| {
        b.iter(|| {
            for query in &queries {
                let _ = black_box(retriever.retrieve(&index, black_box(query)).unwrap());
            }
        })
    });

    group.bench_function("find_similar", |b| {
        b.iter(|| {
            for query in &queries {
                let _ = black_box(finder.find_similar(&index, black_box(query)).unwrap());
            }
        })
    });

    group.finish();
}

fn bench_keyboard(c: &mut Criterion) {
    let layout = KeyboardLayout::german_qwertz();
    let letters: Vec<char> = "abcdefghijklmnopqrstuvwxyzäöü".chars().collect();

    c.bench_function("keyboard_distance_all_pairs", |b| {
        b.iter(|| {
            let mut total = 0.0f32;
            for &a in &letters {
                for &z in &letters {
                    total += layout.distance(black_box(a), black_box(z));
                }
            }
            black_box(total)
        })
    });
}

criterion_group!(benches, bench_queries, bench_keyboard);
criterion_main!(benches);

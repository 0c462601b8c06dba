use std::collections::HashSet;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use wordquiz::deck::record::{IdRange, WordRecord};
use wordquiz::engine::distractor;
use wordquiz::engine::sampler::sample;

fn make_corpus(count: u32) -> Vec<WordRecord> {
    (1..=count)
        .map(|i| WordRecord::new(i, &format!("word{i}"), &format!("meaning{}", i % 900)))
        .collect()
}

fn bench_sample(c: &mut Criterion) {
    let corpus = make_corpus(5000);
    let mut rng = SmallRng::seed_from_u64(1);

    c.bench_function("sample 20 of 5000", |b| {
        b.iter(|| sample(black_box(&corpus), IdRange::new(1, 5000), 20, None, &mut rng))
    });

    // Every other id already asked
    let asked: HashSet<u32> = (1..=5000).step_by(2).collect();
    c.bench_function("sample 20 of 5000 avoiding 2500", |b| {
        b.iter(|| {
            sample(
                black_box(&corpus),
                IdRange::new(1, 5000),
                20,
                Some(&asked),
                &mut rng,
            )
        })
    });
}

fn bench_distractors(c: &mut Criterion) {
    let corpus = make_corpus(5000);
    let meanings: Vec<&str> = corpus.iter().map(|r| r.meaning.as_str()).collect();
    let session: Vec<&str> = meanings.iter().take(20).copied().collect();
    let mut rng = SmallRng::seed_from_u64(2);

    c.bench_function("distractors from 20-word session", |b| {
        b.iter(|| distractor::generate("meaning1", black_box(&session), &meanings, 3, &mut rng))
    });

    c.bench_function("distractors topped up from 5000-word deck", |b| {
        b.iter(|| {
            distractor::generate(
                "meaning1",
                black_box(&session[..2]),
                &meanings,
                3,
                &mut rng,
            )
        })
    });
}

criterion_group!(benches, bench_sample, bench_distractors);
criterion_main!(benches);

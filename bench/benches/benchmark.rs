use std::time::Duration;

use criterion::{
    black_box, criterion_group, criterion_main, measurement::WallTime, BenchmarkGroup, Criterion,
    SamplingMode,
};
use fastoil::{Nfa, OilTrainer, Sample, SampleSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TRAIN_SAMPLE_SIZE: usize = 10;
const TRAIN_WARM_UP_TIME: Duration = Duration::from_millis(500);
const TRAIN_MEASURE_TIME: Duration = Duration::from_secs(5);

const MATCH_SAMPLE_SIZE: usize = 30;
const MATCH_WARM_UP_TIME: Duration = Duration::from_millis(500);
const MATCH_MEASURE_TIME: Duration = Duration::from_secs(2);

const ALPHABET_SIZE: usize = 4;
const SEED: u64 = 0x5eed;

macro_rules! define_train_bench {
    ( $func_name:ident, $group:literal, $count:literal, $max_len:literal ) => {
        fn $func_name(c: &mut Criterion) {
            let mut group = c.benchmark_group($group);
            group.sample_size(TRAIN_SAMPLE_SIZE);
            group.warm_up_time(TRAIN_WARM_UP_TIME);
            group.measurement_time(TRAIN_MEASURE_TIME);
            group.sampling_mode(SamplingMode::Flat);
            let samples = generate_samples($count, $max_len);
            add_train_benches(&mut group, &samples);
        }
    };
}

macro_rules! define_match_bench {
    ( $func_name:ident, $group:literal, $count:literal, $max_len:literal ) => {
        fn $func_name(c: &mut Criterion) {
            let mut group = c.benchmark_group($group);
            group.sample_size(MATCH_SAMPLE_SIZE);
            group.warm_up_time(MATCH_WARM_UP_TIME);
            group.measurement_time(MATCH_MEASURE_TIME);
            group.sampling_mode(SamplingMode::Flat);
            let samples = generate_samples($count, $max_len);
            add_match_benches(&mut group, &samples);
        }
    };
}

define_train_bench!(criterion_samples_50_train, "samples_50/train", 50, 8);
define_train_bench!(criterion_samples_200_train, "samples_200/train", 200, 12);
define_match_bench!(criterion_samples_50_match, "samples_50/match", 50, 8);
define_match_bench!(criterion_samples_200_match, "samples_200/match", 200, 12);

/// Labels random sequences by whether they contain the factor `0 1 2`.
fn generate_samples(count: usize, max_len: usize) -> SampleSet {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut positives: Vec<Sample> = vec![];
    let mut negatives: Vec<Sample> = vec![];
    for _ in 0..count {
        let len = rng.gen_range(0..=max_len);
        let sample: Sample = (0..len)
            .map(|_| rng.gen_range(0..ALPHABET_SIZE as u32))
            .collect();
        if sample.windows(3).any(|w| w == [0, 1, 2]) {
            positives.push(sample);
        } else {
            negatives.push(sample);
        }
    }
    SampleSet::new(ALPHABET_SIZE, positives, negatives).unwrap()
}

fn add_train_benches(group: &mut BenchmarkGroup<WallTime>, samples: &SampleSet) {
    group.bench_function("oil", |b| {
        b.iter(|| {
            let mut samples = samples.clone();
            let mut rng = StdRng::seed_from_u64(SEED);
            OilTrainer::new().train(&mut samples, &mut rng).unwrap()
        });
    });

    group.bench_function("oil/skip_search", |b| {
        b.iter(|| {
            let mut samples = samples.clone();
            let mut rng = StdRng::seed_from_u64(SEED);
            OilTrainer::new()
                .skip_best_search(true)
                .train(&mut samples, &mut rng)
                .unwrap()
        });
    });
}

fn add_match_benches(group: &mut BenchmarkGroup<WallTime>, samples: &SampleSet) {
    let mut sorted = samples.clone();
    let mut rng = StdRng::seed_from_u64(SEED);
    let nfa = OilTrainer::new().train(&mut sorted, &mut rng).unwrap();

    group.bench_function("is_match", |b| {
        b.iter(|| {
            let mut sum = 0;
            for (_, sample) in samples.labeled() {
                sum += usize::from(nfa.is_match(sample));
            }
            black_box(sum);
        });
    });

    let states: Vec<_> = nfa.states().collect();
    let mut scratch = Nfa::new(nfa.alphabet_size());
    group.bench_function("clone_from+merge", |b| {
        b.iter(|| {
            for pair in states.windows(2) {
                scratch.clone_from(&nfa);
                scratch.merge(pair[0], pair[1]);
            }
        });
    });
}

criterion_group!(
    benches,
    criterion_samples_50_train,
    criterion_samples_200_train,
    criterion_samples_50_match,
    criterion_samples_200_match,
);
criterion_main!(benches);

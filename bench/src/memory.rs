use fastoil::{OilTrainer, Sample, SampleSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALPHABET_SIZE: usize = 4;
const SEED: u64 = 0x5eed;

fn main() {
    for (count, max_len) in [(50, 8), (200, 12), (1000, 16)] {
        println!("== {count} samples, length <= {max_len} ==");
        let samples = generate_samples(count, max_len);
        show_memory_stats(&samples);
    }
}

fn show_memory_stats(samples: &SampleSet) {
    for (title, trainer) in [
        ("oil", OilTrainer::new()),
        ("oil (skip search)", OilTrainer::new().skip_best_search(true)),
    ] {
        let mut samples = samples.clone();
        let mut rng = StdRng::seed_from_u64(SEED);
        let nfa = trainer.train(&mut samples, &mut rng).unwrap();
        println!("{}: {} states", title, nfa.num_states());
        format_memory(title, nfa.heap_bytes());
    }
}

fn format_memory(title: &str, bytes: usize) {
    println!(
        "{}: {} bytes, {:.3} MiB",
        title,
        bytes,
        bytes as f64 / (1024.0 * 1024.0)
    );
}

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

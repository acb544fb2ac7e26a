use crate::*;

use std::collections::{BTreeSet, HashSet};

use rand::Rng;

/// Transition list, initial states and final states of a reference automaton.
type Naive = (BTreeSet<(StateId, StateId, Symbol)>, HashSet<StateId>, HashSet<StateId>);

/// Generates a random automaton over `num_states` slots scattered in `0..max_slot`.
fn generate_random_nfa(alphabet_size: usize, num_states: usize, max_slot: usize) -> (Nfa, Naive) {
    let mut rng = rand::thread_rng();
    let states: Vec<StateId> = (0..num_states).map(|_| rng.gen_range(0..max_slot)).collect();
    let mut nfa = Nfa::new(alphabet_size);
    let mut naive = (BTreeSet::new(), HashSet::new(), HashSet::new());
    for _ in 0..num_states * 2 {
        let src = states[rng.gen_range(0..num_states)];
        let dst = states[rng.gen_range(0..num_states)];
        let sym = rng.gen_range(0..alphabet_size) as Symbol;
        nfa.set_transition(src, dst, sym);
        naive.0.insert((src, dst, sym));
    }
    for &st in &states {
        nfa.add_state(st);
        if rng.gen_bool(0.2) {
            nfa.set_initial(st);
            naive.1.insert(st);
        }
        if rng.gen_bool(0.3) {
            nfa.set_final(st);
            naive.2.insert(st);
        }
    }
    (nfa, naive)
}

fn generate_random_sample(alphabet_size: usize, max_len: usize) -> Sample {
    let mut rng = rand::thread_rng();
    let len = rng.gen_range(0..=max_len);
    (0..len)
        .map(|_| rng.gen_range(0..alphabet_size) as Symbol)
        .collect()
}

fn naive_is_match(naive: &Naive, sample: &[Symbol]) -> bool {
    let mut current: HashSet<StateId> = naive.1.clone();
    for &sym in sample {
        current = naive
            .0
            .iter()
            .filter(|&&(src, _, s)| s == sym && current.contains(&src))
            .map(|&(_, dst, _)| dst)
            .collect();
    }
    current.iter().any(|st| naive.2.contains(st))
}

#[test]
fn test_is_match_random() {
    for _ in 0..20 {
        let (nfa, naive) = generate_random_nfa(3, 12, 600);
        assert!(nfa.is_consistent());
        assert_eq!(naive.0, nfa.transitions().collect::<BTreeSet<_>>());
        for _ in 0..100 {
            let sample = generate_random_sample(3, 8);
            assert_eq!(naive_is_match(&naive, &sample), nfa.is_match(&sample));
        }
    }
}

#[test]
fn test_merge_random() {
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let (mut nfa, mut naive) = generate_random_nfa(2, 10, 300);
        let states: Vec<StateId> = nfa.states().collect();
        if states.len() < 2 {
            continue;
        }
        let s1 = states[rng.gen_range(0..states.len())];
        let mut s2 = s1;
        while s2 == s1 {
            s2 = states[rng.gen_range(0..states.len())];
        }

        let before = nfa.clone();
        nfa.merge(s1, s2);

        let rename = |st: StateId| if st == s2 { s1 } else { st };
        naive.0 = naive
            .0
            .iter()
            .map(|&(src, dst, sym)| (rename(src), rename(dst), sym))
            .collect();
        naive.1 = naive.1.iter().copied().map(rename).collect();
        naive.2 = naive.2.iter().copied().map(rename).collect();

        assert!(nfa.is_consistent());
        assert!(!nfa.is_active(s2));
        assert_eq!(before.num_states() - 1, nfa.num_states());
        assert_eq!(naive.0, nfa.transitions().collect::<BTreeSet<_>>());
        for _ in 0..100 {
            let sample = generate_random_sample(2, 8);
            let accepted = nfa.is_match(&sample);
            assert_eq!(naive_is_match(&naive, &sample), accepted);
            // Merging never removes a word from the language.
            assert!(accepted || !before.is_match(&sample));
        }
    }
}

#[test]
fn test_train_random() {
    let mut rng = rand::thread_rng();
    for _ in 0..5 {
        let (target, _) = generate_random_nfa(3, 6, 6);
        let mut positives = vec![];
        let mut negatives = vec![];
        for _ in 0..40 {
            let sample = generate_random_sample(3, 6);
            if target.is_match(&sample) {
                positives.push(sample);
            } else {
                negatives.push(sample);
            }
        }
        let mut samples = SampleSet::new(3, positives, negatives).unwrap();
        let trainer = OilTrainer::new().deterministic(rng.gen_bool(0.5));
        let nfa = trainer.train(&mut samples, &mut rng).unwrap();

        assert!(nfa.is_consistent());
        for sample in samples.positives() {
            assert!(nfa.is_match(sample));
        }
        for sample in samples.negatives() {
            assert!(!nfa.is_match(sample));
        }
    }
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fastoil::{Nfa, OilTrainer, SampleSet};

fn random_samples(rng: &mut StdRng) -> SampleSet {
    // Sequences over {0, 1, 2} containing the factor 0 1.
    let mut positives = vec![];
    let mut negatives = vec![];
    for _ in 0..40 {
        let len = rng.gen_range(0..7);
        let sample: Vec<u32> = (0..len).map(|_| rng.gen_range(0..3)).collect();
        if sample.windows(2).any(|w| w == [0, 1]) {
            positives.push(sample);
        } else {
            negatives.push(sample);
        }
    }
    SampleSet::new(3, positives, negatives).unwrap()
}

#[test]
fn test_roundtrip_trained() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..5 {
        let mut samples = random_samples(&mut rng);
        let nfa = OilTrainer::new().train(&mut samples, &mut rng).unwrap();

        let mut bytes = vec![];
        nfa.serialize(&mut bytes).unwrap();
        let other = Nfa::deserialize(bytes.as_slice()).unwrap();

        assert_eq!(nfa.alphabet_size(), other.alphabet_size());
        assert_eq!(nfa.num_states(), other.num_states());
        for (_, sample) in samples.labeled() {
            assert_eq!(nfa.is_match(sample), other.is_match(sample));
        }

        // Dense numbering is a fixed point.
        let mut again = vec![];
        other.serialize(&mut again).unwrap();
        assert_eq!(bytes, again);
    }
}

#[test]
fn test_serialize_renumbers() {
    let mut nfa = Nfa::new(2);
    nfa.set_transition(10, 300, 0);
    nfa.set_transition(300, 10, 1);
    nfa.set_transition(300, 300, 0);
    nfa.set_initial(10);
    nfa.set_final(300);

    let mut bytes = vec![];
    nfa.serialize(&mut bytes).unwrap();
    let expected = "\
# Alphabet
2
# States
2
# Initial states
0
# Final states
1
# Transitions
3
0 1 0
1 0 1
1 1 0
";
    assert_eq!(expected, String::from_utf8(bytes).unwrap());
}

#[test]
fn test_serialize_without_flags() {
    let mut nfa = Nfa::new(1);
    nfa.add_state(3);

    let mut bytes = vec![];
    nfa.serialize(&mut bytes).unwrap();
    let other = Nfa::deserialize(bytes.as_slice()).unwrap();
    assert_eq!(1, other.num_states());
    assert_eq!(None, other.initial_states().next());
    assert_eq!(None, other.final_states().next());
}

#[test]
fn test_write_dot() {
    let mut nfa = Nfa::new(3);
    nfa.set_transition(0, 1, 0);
    nfa.set_transition(0, 1, 2);
    nfa.set_transition(1, 1, 1);
    nfa.add_state(2);
    nfa.set_initial(0);
    nfa.set_final(0);
    nfa.set_final(1);

    let mut bytes = vec![];
    nfa.write_dot(&mut bytes).unwrap();
    let dot = String::from_utf8(bytes).unwrap();

    assert!(dot.starts_with("digraph \"NFA\" {\n  rankdir=LR\n"));
    assert!(dot.contains("  s0 [label=\"0\" style=\"filled,bold,dashed\"]\n"));
    assert!(dot.contains("  s1 [label=\"1\" style=\"bold,dashed\"]\n"));
    assert!(dot.contains("  s2 [label=\"2\"]\n"));
    assert!(dot.contains("  s0 -> s1 [label=\"0,2\"]\n"));
    assert!(dot.contains("  s1 -> s1 [label=\"1\"]\n"));
    assert_eq!(2, dot.matches("->").count());
    assert!(dot.ends_with("}\n"));
}

#[test]
fn test_write_dot_dense_ids() {
    let mut nfa = Nfa::new(2);
    nfa.set_transition(10, 300, 1);
    nfa.set_transition(300, 300, 0);
    nfa.set_initial(10);
    nfa.set_final(300);

    let mut bytes = vec![];
    nfa.write_dot(&mut bytes).unwrap();
    let dot = String::from_utf8(bytes).unwrap();

    assert!(dot.contains("  s0 [label=\"0\" style=\"filled\"]\n"));
    assert!(dot.contains("  s1 [label=\"1\" style=\"bold,dashed\"]\n"));
    assert!(dot.contains("  s0 -> s1 [label=\"1\"]\n"));
    assert!(dot.contains("  s1 -> s1 [label=\"0\"]\n"));
    assert!(!dot.contains("s10"));
    assert!(!dot.contains("s300"));

    // The model file uses the same numbering.
    let mut bytes = vec![];
    nfa.serialize(&mut bytes).unwrap();
    let model = String::from_utf8(bytes).unwrap();
    assert!(model.contains("\n0 1 1\n"));
    assert!(model.contains("\n1 1 0\n"));
}

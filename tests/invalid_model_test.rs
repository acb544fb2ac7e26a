use fastoil::errors::FastOilError;
use fastoil::Nfa;

fn error_line(text: &str) -> usize {
    match Nfa::deserialize(text.as_bytes()) {
        Err(FastOilError::InvalidFormat(e)) => e.line(),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_valid_minimal() {
    let nfa = Nfa::deserialize("# empty\n3\n0\n\n\n0\n".as_bytes()).unwrap();
    assert_eq!(3, nfa.alphabet_size());
    assert_eq!(0, nfa.num_states());
}

#[test]
fn test_unreferenced_states_activated() {
    let nfa = Nfa::deserialize("2\n4\n0\n3\n1\n0 3 1\n".as_bytes()).unwrap();
    assert_eq!(4, nfa.num_states());
    assert!(nfa.is_match([1]));
}

#[test]
fn test_missing_sections() {
    assert_eq!(1, error_line(""));
    assert_eq!(2, error_line("2\n"));
    assert_eq!(5, error_line("2\n1\n0\n0\n"));
}

#[test]
fn test_malformed_counts() {
    assert_eq!(1, error_line("x\n1\n0\n0\n0\n"));
    assert_eq!(3, error_line("# a\n2\n1 2\n0\n0\n0\n"));
    assert_eq!(2, error_line("2\n2000000\n\n\n0\n"));
}

#[test]
fn test_huge_alphabet() {
    assert_eq!(1, error_line("18446744073709551615\n0\n\n\n0\n"));
    assert_eq!(2, error_line("# alphabet\n1000000000\n0\n\n\n0\n"));
}

#[test]
fn test_transition_relation_too_large() {
    assert_eq!(2, error_line("2\n1048576\n\n\n0\n"));
    assert_eq!(3, error_line("2000\n\n10000\n\n\n0\n"));

    let nfa = Nfa::deserialize("2\n300\n\n\n0\n".as_bytes()).unwrap();
    assert_eq!(300, nfa.num_states());
}

#[test]
fn test_state_out_of_range() {
    assert_eq!(3, error_line("2\n2\n2\n1\n0\n"));
    assert_eq!(4, error_line("2\n2\n0\n0 5\n0\n"));
    assert_eq!(6, error_line("2\n2\n0\n1\n1\n0 2 0\n"));
}

#[test]
fn test_symbol_out_of_range() {
    assert_eq!(6, error_line("2\n2\n0\n1\n1\n0 1 2\n"));
}

#[test]
fn test_transition_count_mismatch() {
    assert_eq!(7, error_line("2\n2\n0\n1\n1\n0 1 0\n1 1 0\n"));
    assert_eq!(6, error_line("2\n2\n0\n1\n2\n0 1 0\n"));
}

#[test]
fn test_transition_fields() {
    assert_eq!(6, error_line("2\n2\n0\n1\n1\n0 1\n"));
    assert_eq!(6, error_line("2\n2\n0\n1\n1\n0 1 0 1\n"));
}

use crate::state_set::StateSet;

#[test]
fn test_iter_across_words() {
    let mut set = StateSet::with_capacity(128);
    for n in [66, 3, 64, 6, 63, 5] {
        set.set(n);
    }
    assert_eq!(vec![3, 5, 6, 63, 64, 66], set.iter().collect::<Vec<_>>());
}

#[test]
fn test_iter_empty() {
    let set = StateSet::with_capacity(256);
    assert_eq!(None, set.iter().next());
    assert_eq!(None, StateSet::default().iter().next());
}

#[test]
fn test_iter_rewind() {
    let mut set = StateSet::with_capacity(256);
    set.set(1);
    set.set(255);

    let mut it = set.iter();
    assert_eq!(Some(1), it.next());
    assert_eq!(Some(255), it.next());
    assert_eq!(None, it.next());

    it.rewind();
    assert_eq!(Some(1), it.next());
}

#[test]
fn test_set_clear_previous_value() {
    let mut set = StateSet::with_capacity(64);
    assert!(!set.set(10));
    assert!(set.set(10));
    assert!(set.test(10));
    assert!(set.clear(10));
    assert!(!set.clear(10));
    assert!(!set.test(10));
}

#[test]
fn test_capacity_rounding() {
    assert_eq!(64, StateSet::with_capacity(1).capacity());
    assert_eq!(128, StateSet::with_capacity(65).capacity());
    assert_eq!(256, StateSet::with_capacity(256).capacity());
}

#[test]
fn test_binary_operations() {
    let mut a = StateSet::with_capacity(128);
    let mut b = StateSet::with_capacity(128);
    a.set(1);
    a.set(100);
    b.set(100);
    b.set(2);

    assert!(a.test_and(&b));
    assert!(a.test_or(&b));
    assert!(a.test_xor(&b));

    let mut c = a.clone();
    c.and(&b);
    assert_eq!(vec![100], c.iter().collect::<Vec<_>>());

    let mut c = a.clone();
    c.or(&b);
    assert_eq!(vec![1, 2, 100], c.iter().collect::<Vec<_>>());

    let mut c = a.clone();
    c.xor(&b);
    assert_eq!(vec![1, 2], c.iter().collect::<Vec<_>>());

    c.xor(&c.clone());
    assert!(c.is_empty());
    assert!(!c.test_or(&StateSet::with_capacity(128)));
    assert!(!a.test_xor(&a.clone()));
}

#[test]
fn test_or_then_clear_second() {
    let mut set = StateSet::with_capacity(64);
    set.set(5);
    set.or_then_clear_second(1, 5);
    assert!(set.test(1));
    assert!(!set.test(5));

    set.or_then_clear_second(1, 7);
    assert!(set.test(1));

    set.or_then_clear_second(2, 3);
    assert!(!set.test(2));
    assert!(!set.test(3));
}

#[test]
fn test_len_and_first_clear() {
    let mut set = StateSet::with_capacity(128);
    assert_eq!(Some(0), set.first_clear());
    for n in 0..64 {
        set.set(n);
    }
    set.set(65);
    assert_eq!(65, set.len());
    assert_eq!(Some(64), set.first_clear());

    for n in 64..128 {
        set.set(n);
    }
    assert_eq!(None, set.first_clear());

    set.clear_all();
    assert_eq!(0, set.len());
}

#[test]
fn test_grow_keeps_bits() {
    let mut set = StateSet::with_capacity(64);
    set.set(63);
    set.grow(512);
    assert_eq!(512, set.capacity());
    assert_eq!(vec![63], set.iter().collect::<Vec<_>>());
    set.set(511);
    assert_eq!(2, set.len());
}

#[test]
fn test_clone_from_reuses_contents() {
    let mut a = StateSet::with_capacity(64);
    a.set(7);
    let mut b = StateSet::with_capacity(256);
    b.set(200);
    b.clone_from(&a);
    assert_eq!(a, b);
    assert_eq!(64, b.capacity());
}

#[test]
#[should_panic(expected = "state out of range")]
fn test_set_out_of_range() {
    let mut set = StateSet::with_capacity(64);
    set.set(64);
}

#[test]
#[should_panic(expected = "state sets of different capacities")]
fn test_capacity_mismatch() {
    let mut a = StateSet::with_capacity(64);
    let b = StateSet::with_capacity(128);
    a.or(&b);
}

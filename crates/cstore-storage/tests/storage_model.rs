//! Scenario and model-based tests for `RawStorage`.
//!
//! The model is a `Vec<u32>` of element tags. Every operation is applied
//! to both the storage and the model, and the storage's tag sequence must
//! match the model after each step. Failed operations must leave both
//! untouched.

use cstore_storage::{policy::MIN_CAPACITY, RawStorage, StorageConfig, StorageError};
use cstore_test_utils::{element, pattern, tags};
use proptest::prelude::*;

const STRIDE: usize = 8;

fn storage_with(count: usize, seed: u32) -> RawStorage {
    let mut s = RawStorage::new(STRIDE);
    s.append_from(&pattern(STRIDE, count, seed)).unwrap();
    s
}

#[test]
fn growth_scenario() {
    let mut s = RawStorage::new(STRIDE);
    s.append_from(&pattern(STRIDE, 5, 0)).unwrap();
    assert_eq!((s.len(), s.capacity()), (5, 32));

    s.append_from(&pattern(STRIDE, 40, 5)).unwrap();
    assert_eq!((s.len(), s.capacity()), (45, 108));
}

#[test]
fn set_shrink_scenario() {
    let mut s = RawStorage::new(STRIDE);
    s.grow(100).unwrap();
    s.append(80).unwrap();
    s.set(&pattern(STRIDE, 3, 0)).unwrap();
    assert_eq!((s.len(), s.capacity()), (3, 32));
}

#[test]
fn iremove_scenario() {
    let mut s = storage_with(10, 0);
    s.iremove(2, 3).unwrap();
    assert_eq!(s.len(), 7);
    assert_eq!(tags(s.as_bytes(), STRIDE), vec![0, 1, 5, 6, 7, 8, 9]);
}

#[test]
fn release_makes_prior_elements_unreachable() {
    let mut a = storage_with(10, 0);
    a.flush();
    assert_eq!((a.len(), a.capacity()), (0, 0));
    assert!(a.get(0).is_none());
    assert!(a.as_bytes().is_empty());

    let mut b = storage_with(10, 0);
    b.truncate(0).unwrap();
    assert_eq!((b.len(), b.capacity()), (0, 0));
    assert!(b.slice(0, 1).is_none());
}

#[test]
fn whole_swap_exchanges_contents() {
    let mut a = storage_with(7, 0);
    let mut b = storage_with(50, 1000);
    let (a_bytes, b_bytes) = (a.as_bytes().to_vec(), b.as_bytes().to_vec());
    let (a_cap, b_cap) = (a.capacity(), b.capacity());

    a.swap(&mut b);
    assert_eq!(a.as_bytes(), &b_bytes[..]);
    assert_eq!(b.as_bytes(), &a_bytes[..]);
    assert_eq!((a.capacity(), b.capacity()), (b_cap, a_cap));
}

#[test]
fn transfer_chain_moves_elements_without_loss() {
    let mut a = storage_with(6, 0);
    let mut b = RawStorage::new(STRIDE);
    let mut c = RawStorage::new(STRIDE);

    a.iremove_to(0, 2, &mut b).unwrap();
    let h = a.handle(1).unwrap();
    a.premove_to(h, 2, &mut b).unwrap();
    b.pop_to(3, &mut c).unwrap();

    assert_eq!(tags(a.as_bytes(), STRIDE), vec![2, 5]);
    assert_eq!(tags(b.as_bytes(), STRIDE), vec![0]);
    assert_eq!(tags(c.as_bytes(), STRIDE), vec![1, 3, 4]);
}

#[test]
fn premove_into_copies_removed_elements() {
    let mut s = storage_with(5, 0);
    let h = s.locate(s.get(3).unwrap().as_ptr()).unwrap();
    let mut out = vec![0u8; 2 * STRIDE];
    s.premove_into(h, &mut out).unwrap();
    assert_eq!(tags(&out, STRIDE), vec![3, 4]);
    assert_eq!(s.len(), 3);
}

#[test]
fn budget_limits_every_growth_path() {
    let config = StorageConfig::new(STRIDE).with_max_bytes(MIN_CAPACITY * STRIDE);
    let mut s = RawStorage::with_config(config).unwrap();
    s.append(MIN_CAPACITY).unwrap();
    assert_eq!(s.capacity(), MIN_CAPACITY);

    let over = element(STRIDE, 99);
    assert!(matches!(
        s.append_from(&over),
        Err(StorageError::CapacityExceeded { .. })
    ));
    assert!(s.insert_from(0, &over).is_err());
    assert!(s.set(&pattern(STRIDE, MIN_CAPACITY + 1, 0)).is_err());
    assert_eq!(s.len(), MIN_CAPACITY);
}

#[derive(Clone, Debug)]
enum Op {
    Append(usize),
    Insert(usize, usize),
    Remove(usize, usize),
    Pop(usize),
    Swap(usize, usize),
    Set(usize),
    Truncate(usize),
    Flush,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..40).prop_map(Op::Append),
        3 => (0usize..80, 0usize..10).prop_map(|(i, n)| Op::Insert(i, n)),
        3 => (0usize..80, 0usize..10).prop_map(|(i, n)| Op::Remove(i, n)),
        2 => (0usize..10).prop_map(Op::Pop),
        2 => (0usize..80, 0usize..80).prop_map(|(i, j)| Op::Swap(i, j)),
        1 => (0usize..120).prop_map(Op::Set),
        1 => (0usize..120).prop_map(Op::Truncate),
        1 => Just(Op::Flush),
    ]
}

proptest! {
    #[test]
    fn storage_matches_vec_model(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut s = RawStorage::new(STRIDE);
        let mut model: Vec<u32> = Vec::new();
        let mut next_tag = 0u32;

        for op in ops {
            let len = model.len();
            match op {
                Op::Append(n) => {
                    s.append_from(&pattern(STRIDE, n, next_tag)).unwrap();
                    model.extend(next_tag..next_tag + n as u32);
                    next_tag += n as u32;
                }
                Op::Insert(i, n) => {
                    let ok = s.insert_from(i, &pattern(STRIDE, n, next_tag)).is_ok();
                    prop_assert_eq!(ok, i <= len);
                    if ok {
                        model.splice(i..i, next_tag..next_tag + n as u32);
                        next_tag += n as u32;
                    }
                }
                Op::Remove(i, n) => {
                    let ok = s.iremove(i, n).is_ok();
                    prop_assert_eq!(ok, i + n <= len);
                    if ok {
                        model.drain(i..i + n);
                    }
                }
                Op::Pop(n) => {
                    let popped = s.pop(n).map(|bytes| tags(bytes, STRIDE));
                    prop_assert_eq!(popped.is_ok(), n <= len);
                    if let Ok(popped) = popped {
                        let expected = model.split_off(len - n);
                        prop_assert_eq!(popped, expected);
                    }
                }
                Op::Swap(i, j) => {
                    let ok = s.xswap(i, j).is_ok();
                    prop_assert_eq!(ok, i < len && j < len);
                    if ok {
                        model.swap(i, j);
                    }
                }
                Op::Set(n) => {
                    s.set(&pattern(STRIDE, n, next_tag)).unwrap();
                    model = (next_tag..next_tag + n as u32).collect();
                    next_tag += n as u32;
                }
                Op::Truncate(cap) => {
                    s.truncate(cap).unwrap();
                    if cap == 0 {
                        model.clear();
                    } else {
                        model.truncate(cap.max(MIN_CAPACITY).max(s.capacity()));
                    }
                }
                Op::Flush => {
                    s.flush();
                    model.clear();
                }
            }

            prop_assert_eq!(tags(s.as_bytes(), STRIDE), model.clone());
            prop_assert!(s.capacity() >= s.len());
            prop_assert_eq!(s.capacity() == 0, s.memory_bytes() == 0);
            if s.capacity() > 0 {
                prop_assert!(s.capacity() >= MIN_CAPACITY);
            }
        }
    }

    #[test]
    fn xswap_same_index_never_mutates(len in 1usize..50, i in 0usize..50) {
        let i = i % len;
        let mut s = storage_with(len, 0);
        let before = s.as_bytes().to_vec();
        s.xswap(i, i).unwrap();
        prop_assert_eq!(s.as_bytes(), &before[..]);
    }

    #[test]
    fn failed_calls_leave_state_intact(len in 0usize..30, index in 0usize..60, n in 1usize..20) {
        let mut s = storage_with(len, 0);
        let before = s.as_bytes().to_vec();
        let (cap, epoch) = (s.capacity(), s.epoch());

        let _ = s.iremove(index, n);
        if index + n <= len {
            return Ok(());
        }
        prop_assert_eq!(s.as_bytes(), &before[..]);
        let _ = s.insert(len + index + 1, n);
        let _ = s.xswap(len, index);
        let _ = s.pop(len + n);
        prop_assert_eq!(s.as_bytes(), &before[..]);
        prop_assert_eq!((s.capacity(), s.epoch()), (cap, epoch));
    }
}

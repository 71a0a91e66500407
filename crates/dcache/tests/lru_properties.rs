//! Property tests for LRU bookkeeping

use std::collections::{HashMap, HashSet, VecDeque};

use dcache::{Cache, EvictionPolicy, LruEvictionPolicy};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum PolicyOp {
    Access(u8),
    Evict,
    Remove(u8),
}

fn policy_op() -> impl Strategy<Value = PolicyOp> {
    prop_oneof![
        4 => (0u8..16).prop_map(PolicyOp::Access),
        1 => Just(PolicyOp::Evict),
        1 => (0u8..16).prop_map(PolicyOp::Remove),
    ]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Get(u8),
    Set(u8, u32),
    Remove(u8),
}

fn cache_op() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (0u8..12).prop_map(CacheOp::Get),
        3 => (0u8..12, any::<u32>()).prop_map(|(k, v)| CacheOp::Set(k, v)),
        1 => (0u8..12).prop_map(CacheOp::Remove),
    ]
}

/// Move `key` to the most recent end of `order`
fn touch(order: &mut VecDeque<u8>, key: u8) {
    if let Some(pos) = order.iter().position(|&k| k == key) {
        order.remove(pos);
    }
    order.push_back(key);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn list_walk_matches_lookup_map(ops in proptest::collection::vec(policy_op(), 0..200)) {
        let mut policy = LruEvictionPolicy::new();
        let mut model: VecDeque<u8> = VecDeque::new();

        for op in ops {
            match op {
                PolicyOp::Access(k) => {
                    policy.key_accessed(&k);
                    touch(&mut model, k);
                }
                PolicyOp::Evict => {
                    prop_assert_eq!(policy.evict(), model.pop_front());
                }
                PolicyOp::Remove(k) => {
                    policy.remove_key(&k);
                    model.retain(|&m| m != k);
                }
            }

            let walked = policy.keys_lru_order();
            let walked_set: HashSet<u8> = walked.iter().copied().collect();
            let tracked: HashSet<u8> = policy.tracked_keys().copied().collect();

            prop_assert_eq!(walked.len(), walked_set.len());
            prop_assert_eq!(&walked_set, &tracked);
            prop_assert_eq!(policy.len(), walked.len());
            prop_assert_eq!(walked, model.iter().copied().collect::<Vec<_>>());
        }
    }

    #[test]
    fn cache_matches_lru_model(
        capacity in 1usize..6,
        ops in proptest::collection::vec(cache_op(), 0..200),
    ) {
        let cache = Cache::with_capacity(capacity);
        let mut order: VecDeque<u8> = VecDeque::new();
        let mut values: HashMap<u8, u32> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Get(k) => {
                    let expected = values.get(&k).copied();
                    if expected.is_some() {
                        touch(&mut order, k);
                    }
                    prop_assert_eq!(cache.get(&k), expected);
                }
                CacheOp::Set(k, v) => {
                    if !values.contains_key(&k) && values.len() == capacity {
                        if let Some(victim) = order.pop_front() {
                            values.remove(&victim);
                        }
                    }
                    values.insert(k, v);
                    touch(&mut order, k);
                    cache.set(k, v);
                }
                CacheOp::Remove(k) => {
                    let expected = values.remove(&k);
                    order.retain(|&m| m != k);
                    prop_assert_eq!(cache.remove(&k), expected);
                }
            }

            prop_assert!(cache.len() <= capacity);
            prop_assert_eq!(cache.len(), values.len());
            prop_assert_eq!(cache.keys_lru_order(), order.iter().copied().collect::<Vec<_>>());
        }
    }
}

#[test]
fn test_capacity_two_eviction_order() {
    let cache = Cache::with_capacity(2);
    cache.set("a", 1);
    cache.set("b", 2);
    cache.set("c", 3);
    assert!(!cache.contains(&"a"));

    let cache = Cache::with_capacity(2);
    cache.set("a", 1);
    cache.set("b", 2);
    cache.get(&"a");
    cache.set("c", 3);
    assert!(cache.contains(&"a"));
    assert!(!cache.contains(&"b"));
}

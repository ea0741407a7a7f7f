pub(crate) use super::*;

/// Fill every frame: page `base + i` in frame `i`, each also cached in the TLB.
fn full_memory(num_frames: usize, base: PageNumber) -> Residency {
    let mut memory = Residency::new(num_frames, num_frames);
    for frame in 0..num_frames {
        let page = base + frame as PageNumber;
        memory.install(page, frame).expect("install");
        memory.tlb.insert_or_refresh(page, frame);
    }
    memory
}

// ========================================================================
// Factory
// ========================================================================

#[test]
fn test_build_policy_kinds() {
    assert_eq!(build_policy(PolicyKind::Lru, 4).kind(), PolicyKind::Lru);
    assert_eq!(
        build_policy(PolicyKind::SecondChance, 4).kind(),
        PolicyKind::SecondChance
    );
}

// ========================================================================
// LRU
// ========================================================================

#[test]
fn test_lru_evicts_least_recent_page_table_entry() {
    let mut memory = full_memory(3, 100);
    let mut policy = LruPolicy::new();

    // 100 was installed first; resolving it again leaves 101 as LRU
    memory.page_table.touch(100);
    let eviction = policy.evict(&mut memory).unwrap();

    assert_eq!(eviction.page, 101);
    assert_eq!(eviction.frame, 1);
    assert_eq!(eviction.scanned, 1);
    assert!(!memory.tlb.contains(101));
    assert_eq!(memory.frames.allocate_free(), Some(1));
    memory.check_invariants().unwrap();
}

#[test]
fn test_lru_ignores_tlb_order() {
    let mut memory = full_memory(2, 0);
    let mut policy = LruPolicy::new();

    // TLB recency alone does not protect a page; the page table decides.
    memory.tlb.lookup(0);
    let eviction = policy.evict(&mut memory).unwrap();
    assert_eq!(eviction.page, 0);
}

#[test]
fn test_lru_empty_is_invariant_violation() {
    let mut memory = Residency::new(1, 1);
    let err = LruPolicy::new().evict(&mut memory).unwrap_err();
    assert!(err.is_invariant_violation());
}

// ========================================================================
// Second-Chance
// ========================================================================

#[test]
fn test_second_chance_clears_bits_then_evicts_at_hand() {
    let mut memory = full_memory(3, 10);
    let mut policy = SecondChancePolicy::new(3);
    for frame in 0..3 {
        policy.on_resolve(frame);
    }

    let eviction = policy.evict(&mut memory).unwrap();

    // One sweep clears all three bits, the fourth step lands on frame 0
    assert_eq!(eviction.frame, 0);
    assert_eq!(eviction.page, 10);
    assert_eq!(eviction.scanned, 4);
    assert_eq!(policy.hand(), 1);
    assert!(!policy.is_referenced(1));
    assert!(!policy.is_referenced(2));
    assert!(!memory.tlb.contains(10));
    memory.check_invariants().unwrap();
}

#[test]
fn test_second_chance_spares_referenced_frame() {
    let mut memory = full_memory(3, 10);
    let mut policy = SecondChancePolicy::new(3);
    policy.on_resolve(0);

    let eviction = policy.evict(&mut memory).unwrap();

    assert_eq!(eviction.frame, 1);
    assert_eq!(eviction.page, 11);
    assert_eq!(eviction.scanned, 2);
    assert!(!policy.is_referenced(0));
    assert_eq!(policy.hand(), 2);
    assert_eq!(memory.page_table.peek(10), Some(0));
}

#[test]
fn test_second_chance_hand_moves_between_evictions() {
    let mut memory = full_memory(3, 10);
    let mut policy = SecondChancePolicy::new(3);

    let first = policy.evict(&mut memory).unwrap();
    assert_eq!(first.frame, 0);
    memory.install(20, first.frame).unwrap();

    let second = policy.evict(&mut memory).unwrap();
    assert_eq!(second.frame, 1);
    assert_eq!(second.page, 11);
}

#[test]
fn test_second_chance_hand_wraps() {
    let mut memory = full_memory(2, 0);
    let mut policy = SecondChancePolicy::new(2);
    policy.on_resolve(0);
    policy.on_resolve(1);

    // Sweep 0 -> 1 clears both, victim is frame 0, hand stops at 1
    let eviction = policy.evict(&mut memory).unwrap();
    assert_eq!(eviction.frame, 0);
    assert_eq!(policy.hand(), 1);
    assert!(eviction.scanned <= 2 * 2);
}

#[test]
fn test_second_chance_empty_pool_is_invariant_violation() {
    let mut memory = Residency::new(2, 2);
    let mut policy = SecondChancePolicy::new(2);
    let err = policy.evict(&mut memory).unwrap_err();
    assert!(err.is_invariant_violation());
    assert!(err.to_string().contains("4 steps"));
}

#[test]
fn test_second_chance_reset() {
    let mut policy = SecondChancePolicy::new(2);
    policy.on_resolve(1);
    let mut memory = full_memory(2, 0);
    policy.evict(&mut memory).unwrap();
    assert_ne!(policy.hand(), 0);

    policy.on_resolve(0);
    policy.reset();
    assert_eq!(policy.hand(), 0);
    assert!(!policy.is_referenced(0));
    assert!(!policy.is_referenced(1));
}

#[test]
fn test_second_chance_out_of_range_resolve_ignored() {
    let mut policy = SecondChancePolicy::new(1);
    policy.on_resolve(7);
    assert!(!policy.is_referenced(7));
}

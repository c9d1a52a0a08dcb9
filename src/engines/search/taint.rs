use std::sync::atomic::{AtomicU64, Ordering};

const TAINT_PREFIX: &str = "_EM_";
const TAINT_POSTFIX: &str = "_XYZ_";

/// Mints globally unique taint marker names.
///
/// Workers of a parallel search each own a shard: worker `offset` of `stride`
/// only produces ids `offset + k * stride`.
#[derive(Debug)]
pub struct TaintCounter {
    next: AtomicU64,
    offset: u64,
    stride: u64,
}

impl Default for TaintCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TaintCounter {
    pub fn new() -> Self {
        Self::sharded(0, 1)
    }

    pub fn sharded(offset: u64, stride: u64) -> Self {
        let stride = stride.max(1);
        Self {
            next: AtomicU64::new(0),
            offset: offset % stride,
            stride,
        }
    }

    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) * self.stride + self.offset
    }

    pub fn next_taint_name(&self) -> String {
        taint_name(self.next_id())
    }
}

pub fn taint_name(id: u64) -> String {
    format!("{}{}{}", TAINT_PREFIX, id, TAINT_POSTFIX)
}

/// The SUT may change the case of what it receives, so the check ignores it
pub fn is_taint_input(value: &str) -> bool {
    let upper = value.to_ascii_uppercase();
    upper
        .strip_prefix(TAINT_PREFIX)
        .and_then(|rest| rest.strip_suffix(TAINT_POSTFIX))
        .map(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_names_are_recognized() {
        let counter = TaintCounter::new();
        let name = counter.next_taint_name();
        assert_eq!(name, "_EM_0_XYZ_");
        assert!(is_taint_input(&name));
        assert!(is_taint_input("_em_12_xyz_"));
        assert!(!is_taint_input("_EM__XYZ_"));
        assert!(!is_taint_input("foo"));
        assert!(!is_taint_input("_EM_1a_XYZ_"));
    }

    #[test]
    fn test_shards_are_disjoint() {
        let a = TaintCounter::sharded(0, 2);
        let b = TaintCounter::sharded(1, 2);
        let ids_a: HashSet<u64> = (0..50).map(|_| a.next_id()).collect();
        let ids_b: HashSet<u64> = (0..50).map(|_| b.next_id()).collect();
        assert!(ids_a.is_disjoint(&ids_b));
    }

    #[test]
    fn test_concurrent_ids_unique() {
        let counter = Arc::new(TaintCounter::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || (0..100).map(|_| counter.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 400);
    }
}

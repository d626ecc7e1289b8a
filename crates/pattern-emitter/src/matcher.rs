//! Match-set computation
//!
//! For an emitted identifier the match set is every record in the exact
//! bucket plus every record of every pattern bucket whose pattern tests true
//! against the identifier's text, ordered by ascending sequence number.
//! Symbols only ever match their exact bucket.

use std::{cmp::Reverse, collections::BinaryHeap};

use crate::{
    registry::{Record, Registry},
    types::EventId,
};

/// Ordered records that fire for `event`
pub fn match_records<A>(registry: &Registry<A>, event: &EventId) -> Vec<Record<A>> {
    let exact = registry.exact_bucket(event);

    let Some(subject) = event.as_str() else {
        return exact.to_vec();
    };

    let mut buckets: Vec<&[Record<A>]> = registry
        .patterns()
        .filter(|(pattern, _)| pattern.test(subject))
        .map(|(_, records)| records)
        .collect();
    if !exact.is_empty() {
        buckets.push(exact);
    }

    merge_by_sequence(&buckets)
}

/// K-way merge of buckets that are each sorted by sequence
///
/// Sequence numbers are unique across buckets, so the result is strictly
/// ascending.
pub fn merge_by_sequence<A>(buckets: &[&[Record<A>]]) -> Vec<Record<A>> {
    match buckets {
        [] => return Vec::new(),
        [only] => return only.to_vec(),
        _ => {}
    }

    let total = buckets.iter().map(|b| b.len()).sum();
    let mut merged = Vec::with_capacity(total);

    // (head sequence, bucket, position)
    let mut heads: BinaryHeap<Reverse<(u64, usize, usize)>> = buckets
        .iter()
        .enumerate()
        .filter_map(|(b, records)| records.first().map(|r| Reverse((r.id.sequence(), b, 0))))
        .collect();

    while let Some(Reverse((_, b, i))) = heads.pop() {
        let records = buckets[b];
        merged.push(records[i].clone());
        if let Some(next) = records.get(i + 1) {
            heads.push(Reverse((next.id.sequence(), b, i + 1)));
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pattern::Pattern,
        sequence::SequenceSource,
        types::{Key, Listener, ListenerId, Symbol},
    };

    fn noop() -> Listener<()> {
        Listener::infallible(|_| {})
    }

    fn ids(records: &[Record<()>]) -> Vec<ListenerId> {
        records.iter().map(|r| r.id).collect()
    }

    fn pattern(source: &str) -> Key {
        Key::Pattern(Pattern::new(source).unwrap())
    }

    #[test]
    fn test_exact_then_pattern_in_registration_order() {
        let seq = SequenceSource::new();
        let mut registry = Registry::new();
        let a = seq.next_id();
        registry.insert("test".into(), a, noop(), false);
        let b = seq.next_id();
        registry.insert(pattern("^t.*"), b, noop(), false);

        assert_eq!(ids(&match_records(&registry, &"test".into())), vec![a, b]);
    }

    #[test]
    fn test_interleaves_across_many_buckets() {
        let seq = SequenceSource::new();
        let mut registry = Registry::new();
        let mut expected = Vec::new();

        for key in [pattern("^a"), "abc".into(), pattern("c$"), "abc".into(), pattern("^a")] {
            let id = seq.next_id();
            registry.insert(key, id, noop(), false);
            expected.push(id);
        }
        registry.insert(pattern("^z"), seq.next_id(), noop(), false);
        registry.insert("other".into(), seq.next_id(), noop(), false);

        assert_eq!(ids(&match_records(&registry, &"abc".into())), expected);
    }

    #[test]
    fn test_no_match_is_empty() {
        let seq = SequenceSource::new();
        let mut registry = Registry::new();
        registry.insert("test".into(), seq.next_id(), noop(), false);
        registry.insert(pattern("^t.*"), seq.next_id(), noop(), false);

        assert!(match_records(&registry, &"noMatch".into()).is_empty());
    }

    #[test]
    fn test_symbols_never_test_patterns() {
        let seq = SequenceSource::new();
        let mut registry = Registry::new();
        let token = Symbol::new("anything");
        let id = seq.next_id();
        registry.insert(token.clone().into(), id, noop(), false);
        registry.insert(pattern(".*"), seq.next_id(), noop(), false);

        assert_eq!(ids(&match_records(&registry, &token.into())), vec![id]);
    }

    #[test]
    fn test_merge_by_sequence() {
        let seq = SequenceSource::new();
        let mut registry = Registry::new();
        for key in ["l", "r", "r", "l", "r"] {
            registry.insert(key.into(), seq.next_id(), noop(), false);
        }
        let left = registry.exact_bucket(&"l".into());
        let right = registry.exact_bucket(&"r".into());

        let merged = merge_by_sequence(&[left, right]);
        let sequences: Vec<u64> = merged.iter().map(|r| r.id.sequence()).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_merge_three_interleaved_buckets() {
        let seq = SequenceSource::new();
        let mut registry = Registry::new();
        for key in ["a", "b", "c", "c", "a", "b", "b", "a", "c"] {
            registry.insert(key.into(), seq.next_id(), noop(), false);
        }
        let buckets: Vec<&[Record<()>]> = ["a", "b", "c"]
            .iter()
            .map(|k| registry.exact_bucket(&(*k).into()))
            .collect();

        let merged = merge_by_sequence(&buckets);
        let sequences: Vec<u64> = merged.iter().map(|r| r.id.sequence()).collect();
        assert_eq!(sequences, (1..=9).collect::<Vec<u64>>());
        assert!(merge_by_sequence::<()>(&[]).is_empty());
    }
}

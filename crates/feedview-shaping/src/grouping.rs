//! Partitioning of the feedback log by user or by sentence.

use feedview_protocol::FeedbackRecord;
use indexmap::IndexMap;

/// Insertion-ordered buckets of borrowed records.
///
/// Buckets appear in the order their key was first seen; records inside
/// a bucket keep input order.
#[derive(Debug, Clone, Default)]
pub struct Groups<'a> {
    buckets: IndexMap<&'a str, Vec<&'a FeedbackRecord>>,
}

impl<'a> Groups<'a> {
    fn collect<F>(records: &'a [FeedbackRecord], key: F) -> Self
    where
        F: Fn(&'a FeedbackRecord) -> &'a str,
    {
        let mut buckets: IndexMap<&'a str, Vec<&'a FeedbackRecord>> = IndexMap::new();
        for record in records {
            buckets.entry(key(record)).or_default().push(record);
        }
        Self { buckets }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&[&'a FeedbackRecord]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.buckets.keys().copied()
    }

    /// Buckets in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a FeedbackRecord])> + '_ {
        self.buckets.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Buckets ordered by descending size. Equal sizes keep first-seen
    /// order.
    pub fn by_size_desc(&self) -> Vec<(&'a str, &[&'a FeedbackRecord])> {
        let mut out: Vec<_> = self.iter().collect();
        out.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        out
    }

    /// Total number of records across all buckets.
    pub fn record_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

pub fn group_by_user(records: &[FeedbackRecord]) -> Groups<'_> {
    Groups::collect(records, |r| r.anon_id.as_str())
}

/// Keys on the exact sentence text; no trimming or case folding.
pub fn group_by_sentence(records: &[FeedbackRecord]) -> Groups<'_> {
    Groups::collect(records, |r| r.sentence.as_str())
}

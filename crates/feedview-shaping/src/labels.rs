use feedview_protocol::FeedbackRecord;
use indexmap::IndexMap;

pub const DEFAULT_LABEL_PREFIX: &str = "User";

/// Shown for an anon_id that was not part of the labelled snapshot.
pub const UNKNOWN_LABEL: &str = "-";

/// anon_id → "User N", in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    labels: IndexMap<String, String>,
}

impl LabelMap {
    pub fn label(&self, anon_id: &str) -> Option<&str> {
        self.labels.get(anon_id).map(String::as_str)
    }

    /// Label for display; never empty.
    pub fn display(&self, anon_id: &str) -> &str {
        self.label(anon_id).unwrap_or(UNKNOWN_LABEL)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// (anon_id, label) pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

pub fn build_label_map(records: &[FeedbackRecord]) -> LabelMap {
    build_label_map_with_prefix(records, DEFAULT_LABEL_PREFIX)
}

/// Single scan over `records`; each distinct anon_id gets
/// `"{prefix} {n}"` with n 1-based in order of first occurrence.
pub fn build_label_map_with_prefix(records: &[FeedbackRecord], prefix: &str) -> LabelMap {
    let mut labels: IndexMap<String, String> = IndexMap::new();
    for record in records {
        if !labels.contains_key(&record.anon_id) {
            let label = format!("{prefix} {}", labels.len() + 1);
            labels.insert(record.anon_id.clone(), label);
        }
    }
    tracing::trace!(users = labels.len(), "built label map");
    LabelMap { labels }
}

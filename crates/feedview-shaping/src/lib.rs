//! Client-side shaping of a feedview snapshot.
//!
//! Everything here is a pure function over an immutable snapshot:
//! anonymized labels, grouping, chronological ordering, feedback tone
//! and timestamp rendering. Derived views are recomputed on demand and
//! never updated incrementally.

pub mod format;
pub mod grouping;
pub mod labels;
pub mod sort;
pub mod tone;

pub use format::{format_timestamp, is_valid_timestamp_format, DEFAULT_TIMESTAMP_FORMAT};
pub use grouping::{group_by_sentence, group_by_user, Groups};
pub use labels::{build_label_map, build_label_map_with_prefix, LabelMap, DEFAULT_LABEL_PREFIX};
pub use sort::{sort_by_time, SortDirection};
pub use tone::{classify_feedback, FeedbackKeywords, FeedbackTone};

use feedview_protocol::Timestamped;
use serde::{Deserialize, Serialize};

/// Global direction for every time-ordered view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn is_ascending(self) -> bool {
        matches!(self, Self::Ascending)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "oldest first ▲",
            Self::Descending => "newest first ▼",
        }
    }
}

/// A new, chronologically ordered sequence of references.
///
/// The sort is stable in both directions: records sharing a timestamp
/// keep their input order.
pub fn sort_by_time<'a, T, I>(records: I, ascending: bool) -> Vec<&'a T>
where
    T: Timestamped + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut out: Vec<&'a T> = records.into_iter().collect();
    if ascending {
        out.sort_by_key(|r| r.created_at());
    } else {
        out.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    }
    out
}

//! Renderable projection of a [`ViewState`].
//!
//! Derived fresh from the snapshot each time it is needed; nothing here
//! is cached between frames.

use feedview_protocol::{DataSnapshot, FeedbackRecord};
use feedview_shaping::{
    build_label_map_with_prefix, classify_feedback, format_timestamp, group_by_sentence,
    group_by_user, sort_by_time, FeedbackKeywords, FeedbackTone, LabelMap, SortDirection,
};
use serde::Serialize;

use crate::config::DisplayConfig;
use crate::state::{Tab, ViewState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRow {
    pub id: String,
    pub time: String,
    pub user: String,
    pub sentence: String,
    pub guess: String,
    pub answer: String,
    pub feedback: String,
    pub tone: FeedbackTone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserGroupView {
    pub anon_id: String,
    pub label: String,
    pub count: usize,
    pub rows: Vec<FeedbackRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceGroupView {
    pub sentence: String,
    pub count: usize,
    pub expanded: bool,
    /// Empty unless `expanded`.
    pub rows: Vec<FeedbackRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaitlistRow {
    /// 1-based position in response order.
    pub index: usize,
    pub email: String,
    pub joined: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "items", rename_all = "snake_case")]
pub enum TabBody {
    All(Vec<FeedbackRow>),
    ByUser(Vec<UserGroupView>),
    BySentence(Vec<SentenceGroupView>),
    Waitlist(Vec<WaitlistRow>),
}

impl TabBody {
    /// Top-level items: rows for flat views, groups for grouped views.
    pub fn len(&self) -> usize {
        match self {
            TabBody::All(rows) => rows.len(),
            TabBody::ByUser(groups) => groups.len(),
            TabBody::BySentence(groups) => groups.len(),
            TabBody::Waitlist(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    #[serde(skip)]
    pub tab: Tab,
    pub sort: SortDirection,
    pub feedback_count: usize,
    pub waitlist_count: usize,
    pub has_snapshot: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub body: TabBody,
}

/// Everything the row builders need from one snapshot.
struct RowContext<'a> {
    labels: LabelMap,
    keywords: FeedbackKeywords,
    display: &'a DisplayConfig,
}

impl RowContext<'_> {
    fn time(&self, record: &FeedbackRecord) -> String {
        format_timestamp(
            record.created_at,
            &self.display.timestamp_format,
            self.display.utc,
        )
    }

    fn row(&self, record: &FeedbackRecord) -> FeedbackRow {
        FeedbackRow {
            id: record.id.clone(),
            time: self.time(record),
            user: self.labels.display(&record.anon_id).to_string(),
            sentence: record.sentence.clone(),
            guess: record.guess.clone(),
            answer: record.answer.clone(),
            feedback: record.feedback.clone(),
            tone: classify_feedback(&record.feedback, &self.keywords),
        }
    }

    fn sorted_rows<'r, I>(&self, records: I, sort: SortDirection) -> Vec<FeedbackRow>
    where
        I: IntoIterator<Item = &'r FeedbackRecord>,
    {
        sort_by_time(records, sort.is_ascending())
            .into_iter()
            .map(|r| self.row(r))
            .collect()
    }
}

impl ViewModel {
    pub fn derive(state: &ViewState, display: &DisplayConfig) -> Self {
        let empty = DataSnapshot::default();
        let snapshot: &DataSnapshot = state.snapshot.as_deref().unwrap_or(&empty);
        Self::derive_for(state.tab, state, snapshot, display)
    }

    /// Derive the view for `tab` regardless of the state's active tab.
    pub fn derive_for(
        tab: Tab,
        state: &ViewState,
        snapshot: &DataSnapshot,
        display: &DisplayConfig,
    ) -> Self {
        let feedback = &snapshot.vocab_feedback_log;
        let ctx = RowContext {
            labels: build_label_map_with_prefix(feedback, &display.user_label_prefix),
            keywords: display.keywords(),
            display,
        };
        let sort = state.sort;

        let body = match tab {
            Tab::All => TabBody::All(ctx.sorted_rows(feedback, sort)),
            Tab::ByUser => {
                let groups = group_by_user(feedback);
                TabBody::ByUser(
                    groups
                        .by_size_desc()
                        .into_iter()
                        .map(|(anon_id, records)| UserGroupView {
                            anon_id: anon_id.to_string(),
                            label: ctx.labels.display(anon_id).to_string(),
                            count: records.len(),
                            rows: ctx.sorted_rows(records.iter().copied(), sort),
                        })
                        .collect(),
                )
            }
            Tab::BySentence => {
                let groups = group_by_sentence(feedback);
                TabBody::BySentence(
                    groups
                        .iter()
                        .map(|(sentence, records)| {
                            let expanded = state.is_sentence_expanded(sentence);
                            SentenceGroupView {
                                sentence: sentence.to_string(),
                                count: records.len(),
                                expanded,
                                rows: if expanded {
                                    ctx.sorted_rows(records.iter().copied(), sort)
                                } else {
                                    Vec::new()
                                },
                            }
                        })
                        .collect(),
                )
            }
            Tab::Waitlist => TabBody::Waitlist(
                snapshot
                    .beta_waitlist
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| WaitlistRow {
                        index: i + 1,
                        email: entry.email.clone(),
                        joined: format_timestamp(
                            entry.created_at,
                            &display.timestamp_format,
                            display.utc,
                        ),
                    })
                    .collect(),
            ),
        };

        Self {
            tab,
            sort,
            feedback_count: snapshot.feedback_count(),
            waitlist_count: snapshot.waitlist_count(),
            has_snapshot: state.snapshot.is_some(),
            loading: state.loading,
            error: state.error.clone(),
            body,
        }
    }

    pub fn tab_title(&self, tab: Tab) -> String {
        match tab {
            Tab::All => "All".to_string(),
            Tab::ByUser => "By user".to_string(),
            Tab::BySentence => "By sentence".to_string(),
            Tab::Waitlist => format!("Waitlist ({})", self.waitlist_count),
        }
    }

    /// Total line; only shown once a snapshot has arrived.
    pub fn footer(&self) -> Option<String> {
        if !self.has_snapshot {
            return None;
        }
        Some(if self.tab.is_feedback() {
            format!("{} feedback entries in total.", self.feedback_count)
        } else {
            format!("{} people on the beta waitlist.", self.waitlist_count)
        })
    }

    /// Sentence keys in display order (empty on other tabs).
    pub fn sentence_keys(&self) -> Vec<&str> {
        match &self.body {
            TabBody::BySentence(groups) => groups.iter().map(|g| g.sentence.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

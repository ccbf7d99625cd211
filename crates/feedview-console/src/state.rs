//! View state controller.
//!
//! All toggles and the current snapshot live in one [`ViewState`] record.
//! Every change goes through [`ViewState::reduce`], which consumes the old
//! state and returns the next one.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use feedview_protocol::DataSnapshot;
use feedview_shaping::SortDirection;

/// The four dashboard views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    All,
    ByUser,
    BySentence,
    Waitlist,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::All, Tab::ByUser, Tab::BySentence, Tab::Waitlist];

    pub fn index(self) -> usize {
        match self {
            Tab::All => 0,
            Tab::ByUser => 1,
            Tab::BySentence => 2,
            Tab::Waitlist => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Tab> {
        Self::ALL.get(i).copied()
    }

    pub fn next(self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Whether the view lists feedback (as opposed to the waitlist).
    pub fn is_feedback(self) -> bool {
        !matches!(self, Tab::Waitlist)
    }
}

/// Identifies one fetch attempt. Strictly increasing per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    SelectTab(Tab),
    NextTab,
    PrevTab,
    ToggleSort,
    /// Flip one sentence group open or closed.
    ToggleSentence(String),
    /// Single-selection accordion: open `key`, or close it if open.
    ToggleGroup(String),
    FetchStarted(RequestId),
    FetchSucceeded(RequestId, Arc<DataSnapshot>),
    FetchFailed(RequestId, String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub tab: Tab,
    pub sort: SortDirection,
    pub expanded_group: Option<String>,
    pub expanded_sentences: BTreeSet<String>,
    pub snapshot: Option<Arc<DataSnapshot>>,
    pub loading: bool,
    pub error: Option<String>,
    /// The only request whose completion will be applied.
    pub in_flight: Option<RequestId>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            tab: Tab::All,
            sort: SortDirection::Ascending,
            expanded_group: None,
            expanded_sentences: BTreeSet::new(),
            snapshot: None,
            loading: true,
            error: None,
            in_flight: None,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh is disabled while a fetch is pending.
    pub fn can_refresh(&self) -> bool {
        !self.loading
    }

    pub fn is_sentence_expanded(&self, sentence: &str) -> bool {
        self.expanded_sentences.contains(sentence)
    }

    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::SelectTab(tab) => self.tab = tab,
            Action::NextTab => self.tab = self.tab.next(),
            Action::PrevTab => self.tab = self.tab.prev(),
            Action::ToggleSort => self.sort = self.sort.toggled(),
            Action::ToggleSentence(sentence) => {
                if !self.expanded_sentences.remove(&sentence) {
                    self.expanded_sentences.insert(sentence);
                }
            }
            Action::ToggleGroup(key) => {
                self.expanded_group = match self.expanded_group {
                    Some(open) if open == key => None,
                    _ => Some(key),
                };
            }
            Action::FetchStarted(id) => {
                self.loading = true;
                self.error = None;
                self.in_flight = Some(id);
            }
            Action::FetchSucceeded(id, snapshot) => {
                if self.in_flight != Some(id) {
                    tracing::debug!(request_id = %id, "dropping stale snapshot");
                    return self;
                }
                self.snapshot = Some(snapshot);
                self.loading = false;
                self.in_flight = None;
            }
            Action::FetchFailed(id, message) => {
                if self.in_flight != Some(id) {
                    tracing::debug!(request_id = %id, "dropping stale fetch failure");
                    return self;
                }
                self.error = Some(message);
                self.loading = false;
                self.in_flight = None;
            }
        }
        self
    }
}

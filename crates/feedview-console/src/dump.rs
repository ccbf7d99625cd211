//! Non-interactive output: fetch once, print one view.

use std::fmt::Write as _;
use std::sync::Arc;

use feedview_network::SnapshotSource;
use feedview_protocol::FetchError;

use crate::config::DisplayConfig;
use crate::state::{Action, RequestId, Tab, ViewState};
use crate::view::{FeedbackRow, TabBody, ViewModel};

#[derive(Debug, Clone, Copy, Default)]
pub struct DumpOptions {
    pub tab: Tab,
    pub descending: bool,
    pub expand_all: bool,
}

/// Fetch a snapshot and derive the requested view.
pub async fn dump_view(
    source: &dyn SnapshotSource,
    display: &DisplayConfig,
    opts: DumpOptions,
) -> Result<ViewModel, FetchError> {
    let id = RequestId(1);
    let snapshot = source.fetch_snapshot().await?;

    let mut state = ViewState::new()
        .reduce(Action::FetchStarted(id))
        .reduce(Action::FetchSucceeded(id, Arc::new(snapshot)))
        .reduce(Action::SelectTab(opts.tab));
    if opts.descending {
        state = state.reduce(Action::ToggleSort);
    }
    if opts.expand_all {
        let sentences: Vec<String> = state
            .snapshot
            .as_deref()
            .map(|snap| {
                feedview_shaping::group_by_sentence(&snap.vocab_feedback_log)
                    .keys()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        for sentence in sentences {
            state = state.reduce(Action::ToggleSentence(sentence));
        }
    }
    Ok(ViewModel::derive(&state, display))
}

pub async fn dump_text(
    source: &dyn SnapshotSource,
    display: &DisplayConfig,
    opts: DumpOptions,
) -> Result<String, FetchError> {
    dump_view(source, display, opts)
        .await
        .map(|vm| render_text(&vm))
}

fn feedback_line(out: &mut String, cols: &[&str]) {
    let _ = writeln!(out, "{}", cols.join("\t"));
}

fn row_cols<'a>(row: &'a FeedbackRow, tab: Tab) -> Vec<&'a str> {
    match tab {
        Tab::All => vec![
            row.time.as_str(),
            row.user.as_str(),
            row.sentence.as_str(),
            row.guess.as_str(),
            row.answer.as_str(),
            row.feedback.as_str(),
        ],
        Tab::ByUser => vec![
            row.time.as_str(),
            row.sentence.as_str(),
            row.guess.as_str(),
            row.answer.as_str(),
            row.feedback.as_str(),
        ],
        _ => vec![
            row.time.as_str(),
            row.user.as_str(),
            row.guess.as_str(),
            row.answer.as_str(),
            row.feedback.as_str(),
        ],
    }
}

/// Tab-separated plain text.
pub fn render_text(vm: &ViewModel) -> String {
    let mut out = String::new();
    let heading = vm.tab_title(vm.tab);
    if vm.tab.is_feedback() {
        let _ = writeln!(out, "== {heading} (sort: {}) ==", vm.sort.arrow());
    } else {
        let _ = writeln!(out, "== {heading} ==");
    }

    match &vm.body {
        TabBody::All(rows) => {
            feedback_line(&mut out, &["Time", "User", "Sentence", "Guess", "Answer", "Feedback"]);
            for row in rows {
                feedback_line(&mut out, &row_cols(row, Tab::All));
            }
        }
        TabBody::ByUser(groups) => {
            for group in groups {
                let _ = writeln!(out, "## {} ({} responses)", group.label, group.count);
                for row in &group.rows {
                    feedback_line(&mut out, &row_cols(row, Tab::ByUser));
                }
            }
        }
        TabBody::BySentence(groups) => {
            for group in groups {
                let marker = if group.expanded { "▼" } else { "▶" };
                let _ = writeln!(out, "## {marker} {} ({} responses)", group.sentence, group.count);
                for row in &group.rows {
                    feedback_line(&mut out, &row_cols(row, Tab::BySentence));
                }
            }
        }
        TabBody::Waitlist(rows) => {
            feedback_line(&mut out, &["No.", "Email", "Joined"]);
            for row in rows {
                let _ = writeln!(out, "{}\t{}\t{}", row.index, row.email, row.joined);
            }
        }
    }

    if let Some(footer) = vm.footer() {
        let _ = writeln!(out, "{footer}");
    }
    out
}

pub fn render_json(vm: &ViewModel) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(vm)
}

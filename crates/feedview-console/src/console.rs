//! Interactive dashboard TUI.
//!
//! Four tabs over one snapshot: the full feedback log, feedback grouped by
//! user, feedback grouped by sentence (collapsible), and the beta
//! waitlist. The snapshot is fetched on start and again on `r`.
//!
//! Launch with `feedview console` (the default subcommand).

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use feedview_network::SnapshotSource;
use feedview_shaping::{group_by_sentence, FeedbackTone};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
    Frame, Terminal,
};

use crate::config::{AppConfig, DisplayConfig};
use crate::refresh::Refresher;
use crate::state::{Action, Tab, ViewState};
use crate::view::{FeedbackRow, TabBody, ViewModel};

const PAGE: usize = 10;

/// Rows taken by the tabs, status, footer and hints around the body.
const CHROME_ROWS: u16 = 6;
/// Rows taken by the body table's borders and header.
const TABLE_CHROME_ROWS: u16 = 3;

/// Number of body table rows that fit in a terminal `height` rows tall.
fn visible_body_rows(height: u16) -> usize {
    height.saturating_sub(CHROME_ROWS + TABLE_CHROME_ROWS) as usize
}

/// Row positions of the active body table.
#[derive(Debug, Default)]
struct BodyLayout {
    rows: usize,
    /// Row index of each sentence group header, in display order.
    group_headers: Vec<usize>,
}

impl BodyLayout {
    fn of(body: &TabBody) -> Self {
        match body {
            TabBody::All(items) => Self {
                rows: items.len(),
                group_headers: Vec::new(),
            },
            TabBody::ByUser(groups) => Self {
                rows: groups.iter().map(|g| 1 + g.rows.len()).sum(),
                group_headers: Vec::new(),
            },
            TabBody::BySentence(groups) => {
                let mut layout = Self::default();
                for group in groups {
                    layout.group_headers.push(layout.rows);
                    layout.rows += 1 + group.rows.len();
                }
                layout
            }
            TabBody::Waitlist(items) => Self {
                rows: items.len(),
                group_headers: Vec::new(),
            },
        }
    }
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
    /// Fetch again unless one is already pending.
    Refresh,
    /// Cancel any pending fetch and start a new one.
    ForceRefresh,
}

/// Console state: the reducer-managed [`ViewState`] plus widget-local
/// cursor and scroll positions.
pub struct Dashboard {
    state: ViewState,
    display: DisplayConfig,
    /// Selected sentence group on the By sentence tab.
    cursor: usize,
    /// First visible row of the body table.
    scroll: usize,
    /// Body rows that fit on screen, from the last [`Dashboard::resize`].
    viewport: usize,
}

impl Dashboard {
    pub fn new(display: DisplayConfig) -> Self {
        Self {
            state: ViewState::new(),
            display,
            cursor: 0,
            scroll: 0,
            viewport: 0,
        }
    }

    /// Record the terminal height so scrolling stops at the last row.
    pub fn resize(&mut self, height: u16) {
        self.viewport = visible_body_rows(height);
        let layout = self.layout();
        self.clamp_scroll(&layout);
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn apply(&mut self, action: Action) {
        let previous_tab = self.state.tab;
        self.state = std::mem::take(&mut self.state).reduce(action);
        if self.state.tab != previous_tab {
            self.scroll = 0;
        }
        let layout = self.layout();
        let groups = self.sentence_keys().len();
        self.cursor = self.cursor.min(groups.saturating_sub(1));
        self.clamp_scroll(&layout);
    }

    fn layout(&self) -> BodyLayout {
        BodyLayout::of(&ViewModel::derive(&self.state, &self.display).body)
    }

    /// Largest scroll that still fills the viewport.
    fn max_scroll(&self, layout: &BodyLayout) -> usize {
        layout.rows.saturating_sub(self.viewport.max(1))
    }

    fn clamp_scroll(&mut self, layout: &BodyLayout) {
        self.scroll = self.scroll.min(self.max_scroll(layout));
    }

    fn scroll_down(&mut self, rows: usize) {
        let layout = self.layout();
        self.scroll += rows;
        self.clamp_scroll(&layout);
    }

    fn scroll_up(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_sub(rows);
    }

    /// Scroll just enough to bring the selected group header on screen.
    fn reveal_cursor(&mut self) {
        let layout = self.layout();
        if let Some(&header) = layout.group_headers.get(self.cursor) {
            let visible = self.viewport.max(1);
            if header < self.scroll {
                self.scroll = header;
            } else if header >= self.scroll + visible {
                self.scroll = header + 1 - visible;
            }
        }
        self.clamp_scroll(&layout);
    }

    /// Sentence group keys in display order.
    fn sentence_keys(&self) -> Vec<String> {
        self.state
            .snapshot
            .as_deref()
            .map(|snap| {
                group_by_sentence(&snap.vocab_feedback_log)
                    .keys()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyOutcome {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return KeyOutcome::Quit
            }
            KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Char('r') => return KeyOutcome::Refresh,
            KeyCode::Char('R') => return KeyOutcome::ForceRefresh,
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                if let Some(tab) = Tab::from_index(index) {
                    self.apply(Action::SelectTab(tab));
                }
            }
            KeyCode::Tab => self.apply(Action::NextTab),
            KeyCode::BackTab => self.apply(Action::PrevTab),
            KeyCode::Char('s') => self.apply(Action::ToggleSort),
            // On the By sentence tab Up/Down select groups and scroll
            // through rows once there is no further group.
            KeyCode::Up | KeyCode::Char('k') => {
                if self.state.tab == Tab::BySentence && self.cursor > 0 {
                    self.cursor -= 1;
                    self.reveal_cursor();
                } else {
                    self.scroll_up(1);
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let groups = self.sentence_keys().len();
                if self.state.tab == Tab::BySentence && self.cursor + 1 < groups {
                    self.cursor += 1;
                    self.reveal_cursor();
                } else {
                    self.scroll_down(1);
                }
            }
            KeyCode::PageUp => self.scroll_up(PAGE),
            KeyCode::PageDown => self.scroll_down(PAGE),
            KeyCode::Home => {
                self.scroll = 0;
                self.cursor = 0;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.state.tab == Tab::BySentence {
                    if let Some(key) = self.sentence_keys().into_iter().nth(self.cursor) {
                        self.apply(Action::ToggleSentence(key));
                    }
                }
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    /// Render the whole console.
    pub fn render(&self, frame: &mut Frame) {
        let vm = ViewModel::derive(&self.state, &self.display);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // tabs
                Constraint::Length(1), // status
                Constraint::Min(3),    // body
                Constraint::Length(1), // totals
                Constraint::Length(1), // key hints
            ])
            .split(frame.area());

        self.render_tabs(frame, chunks[0], &vm);
        self.render_status(frame, chunks[1], &vm);
        self.render_body(frame, chunks[2], &vm);
        self.render_footer(frame, chunks[3], &vm);
        self.render_hints(frame, chunks[4]);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect, vm: &ViewModel) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!(" {} {} ", i + 1, vm.tab_title(*tab))))
            .collect();
        let tabs = Tabs::new(titles)
            .select(vm.tab.index())
            .block(
                Block::default()
                    .title(" Korean Learning Data Viewer ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, vm: &ViewModel) {
        let mut spans = Vec::new();
        if vm.tab.is_feedback() {
            spans.push(Span::styled(
                format!(" Sort: {} ", vm.sort.arrow()),
                Style::default().fg(Color::Yellow),
            ));
        }
        if vm.loading {
            spans.push(Span::styled(
                " Loading... ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        }
        if let Some(err) = &vm.error {
            spans.push(Span::styled(
                format!(" {err} "),
                Style::default().fg(Color::White).bg(Color::Red),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect, vm: &ViewModel) {
        if vm.loading {
            let text = Paragraph::new(Line::from(Span::styled(
                "  Loading...",
                Style::default().fg(Color::DarkGray),
            )))
            .block(Block::default().borders(Borders::ALL));
            frame.render_widget(text, area);
            return;
        }

        let visible = area.height.saturating_sub(TABLE_CHROME_ROWS) as usize;

        let (title, header, widths, rows): (&str, Vec<&str>, Vec<Constraint>, Vec<Row>) =
            match &vm.body {
                TabBody::All(items) => (
                    " Full feedback log ",
                    vec!["Time", "User", "Sentence", "Guess", "Answer", "Feedback"],
                    vec![
                        Constraint::Length(17),
                        Constraint::Length(10),
                        Constraint::Percentage(30),
                        Constraint::Percentage(15),
                        Constraint::Percentage(15),
                        Constraint::Percentage(40),
                    ],
                    items
                        .iter()
                        .map(|r| {
                            Row::new(vec![
                                Cell::from(r.time.as_str()),
                                Cell::from(r.user.as_str()),
                                Cell::from(r.sentence.as_str()),
                                Cell::from(r.guess.as_str()),
                                answer_cell(r),
                                feedback_cell(r),
                            ])
                        })
                        .collect(),
                ),
                TabBody::ByUser(groups) => {
                    let mut rows = Vec::new();
                    for group in groups {
                        rows.push(group_header_row(
                            format!("{} ({} responses)", group.label, group.count),
                            false,
                        ));
                        rows.extend(group.rows.iter().map(|r| {
                            Row::new(vec![
                                Cell::from(r.time.as_str()),
                                Cell::from(r.sentence.as_str()),
                                Cell::from(r.guess.as_str()),
                                answer_cell(r),
                                feedback_cell(r),
                            ])
                        }));
                    }
                    (
                        " Feedback by user ",
                        vec!["User / time", "Sentence", "Guess", "Answer", "Feedback"],
                        vec![
                            Constraint::Length(26),
                            Constraint::Percentage(30),
                            Constraint::Percentage(15),
                            Constraint::Percentage(15),
                            Constraint::Percentage(40),
                        ],
                        rows,
                    )
                }
                TabBody::BySentence(groups) => {
                    let mut rows = Vec::new();
                    for (i, group) in groups.iter().enumerate() {
                        let selected = i == self.cursor;
                        let marker = if group.expanded { "▼" } else { "▶" };
                        rows.push(group_header_row(
                            format!("{marker} {} ({} responses)", group.sentence, group.count),
                            selected,
                        ));
                        rows.extend(group.rows.iter().map(|r| {
                            Row::new(vec![
                                Cell::from(r.time.as_str()),
                                Cell::from(r.user.as_str()),
                                Cell::from(r.guess.as_str()),
                                answer_cell(r),
                                feedback_cell(r),
                            ])
                        }));
                    }
                    (
                        " Feedback by sentence (Enter to expand) ",
                        vec!["Sentence / time", "User", "Guess", "Answer", "Feedback"],
                        vec![
                            Constraint::Percentage(35),
                            Constraint::Length(10),
                            Constraint::Percentage(15),
                            Constraint::Percentage(15),
                            Constraint::Percentage(35),
                        ],
                        rows,
                    )
                }
                TabBody::Waitlist(items) => (
                    " Beta waitlist ",
                    vec!["No.", "Email", "Joined"],
                    vec![
                        Constraint::Length(6),
                        Constraint::Percentage(60),
                        Constraint::Length(17),
                    ],
                    items
                        .iter()
                        .map(|r| {
                            Row::new(vec![
                                Cell::from(r.index.to_string()),
                                Cell::from(r.email.as_str()),
                                Cell::from(r.joined.as_str()),
                            ])
                        })
                        .collect(),
                ),
            };

        let offset = self.scroll.min(rows.len().saturating_sub(visible.max(1)));
        let header = Row::new(header).style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
        let table = Table::new(rows.into_iter().skip(offset), widths)
            .header(header)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::White)),
            );
        frame.render_widget(table, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, vm: &ViewModel) {
        if let Some(footer) = vm.footer() {
            let line = Line::from(Span::styled(
                format!(" {footer}"),
                Style::default().fg(Color::Gray),
            ));
            frame.render_widget(Paragraph::new(line), area);
        }
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let refresh = if self.state.can_refresh() {
            "r refresh"
        } else {
            "R force refresh"
        };
        let hint = format!(
            " 1-4/Tab switch view  |  s sort  |  Up/Down move  |  PgUp/PgDn page  \
             |  Enter expand  |  {refresh}  |  q quit"
        );
        let line = Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)));
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn tone_style(tone: FeedbackTone) -> Style {
    match tone {
        FeedbackTone::Positive => Style::default().fg(Color::Green),
        FeedbackTone::Negative => Style::default().fg(Color::Red),
        FeedbackTone::Neutral => Style::default().fg(Color::LightBlue),
    }
}

fn feedback_cell(row: &FeedbackRow) -> Cell<'_> {
    Cell::from(row.feedback.as_str()).style(tone_style(row.tone))
}

fn answer_cell(row: &FeedbackRow) -> Cell<'_> {
    Cell::from(row.answer.as_str()).style(
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )
}

fn group_header_row(text: String, selected: bool) -> Row<'static> {
    let style = if selected {
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    };
    Row::new(vec![Cell::from(text)]).style(style)
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the dashboard event loop until the operator quits.
pub async fn run_console(
    config: AppConfig,
    source: Arc<dyn SnapshotSource>,
) -> Result<(), anyhow::Error> {
    use std::io::IsTerminal;
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(anyhow::anyhow!(
            "The console requires a terminal (TTY); use `feedview dump` instead."
        ));
    }

    // Restore the terminal if anything panics mid-frame.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, config, source).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: AppConfig,
    source: Arc<dyn SnapshotSource>,
) -> Result<(), anyhow::Error> {
    let tick_rate = Duration::from_millis(config.console.tick_ms.max(10));
    let (mut refresher, mut outcomes) = Refresher::new(source);
    let mut dashboard = Dashboard::new(config.display);

    // Initial load.
    let id = refresher.start();
    dashboard.apply(Action::FetchStarted(id));

    loop {
        while let Ok(outcome) = outcomes.try_recv() {
            dashboard.apply(outcome.into_action());
        }

        dashboard.resize(terminal.size()?.height);
        terminal.draw(|frame| dashboard.render(frame))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                match dashboard.handle_key(key_event.code, key_event.modifiers) {
                    KeyOutcome::Quit => break,
                    KeyOutcome::Refresh if dashboard.state().can_refresh() => {
                        let id = refresher.start();
                        dashboard.apply(Action::FetchStarted(id));
                    }
                    KeyOutcome::ForceRefresh => {
                        let id = refresher.start();
                        dashboard.apply(Action::FetchStarted(id));
                    }
                    KeyOutcome::Refresh | KeyOutcome::Continue => {}
                }
            }
        }
    }

    refresher.cancel();
    tracing::info!("console closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RequestId;
    use feedview_protocol::DataSnapshot;
    use ratatui::backend::TestBackend;

    const HEIGHT: u16 = 24;

    const BODY: &str = r#"{
        "vocab_feedback_log": [
            {"id": "1", "sentence": "hello", "guess": "hi", "answer": "hello", "feedback": "Well done",
             "created_at": "2024-01-02T00:00:00Z", "anon_id": "a"},
            {"id": "2", "sentence": "bye", "guess": "bye", "answer": "bye", "feedback": "Great job",
             "created_at": "2024-01-01T00:00:00Z", "anon_id": "b"}
        ],
        "beta_waitlist": [
            {"id": "w1", "email": "one@example.com", "created_at": "2024-02-01T00:00:00Z"}
        ]
    }"#;

    fn dashboard_with(body: &str) -> Dashboard {
        let mut dash = Dashboard::new(DisplayConfig {
            utc: true,
            ..DisplayConfig::default()
        });
        dash.resize(HEIGHT);
        let snap = Arc::new(DataSnapshot::from_json(body.as_bytes()).unwrap());
        dash.apply(Action::FetchStarted(RequestId(1)));
        dash.apply(Action::FetchSucceeded(RequestId(1), snap));
        dash
    }

    /// One record per sentence, a minute apart, guessed `guess-0`,
    /// `guess-1`, and so on.
    fn feedback_body(sentences: &[&str]) -> String {
        let records: Vec<String> = sentences
            .iter()
            .enumerate()
            .map(|(i, sentence)| {
                format!(
                    r#"{{"id": "{i}", "sentence": "{sentence}", "guess": "guess-{i}",
                        "answer": "a", "feedback": "Well done",
                        "created_at": "2024-01-01T00:{i:02}:00Z", "anon_id": "u{i}"}}"#
                )
            })
            .collect();
        format!(
            r#"{{"vocab_feedback_log": [{}], "beta_waitlist": []}}"#,
            records.join(",")
        )
    }

    fn press(dash: &mut Dashboard, code: KeyCode) -> KeyOutcome {
        dash.handle_key(code, KeyModifiers::NONE)
    }

    fn screen(dash: &Dashboard) -> String {
        let backend = TestBackend::new(140, HEIGHT);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| dash.render(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn empty_snapshot_renders_zero_counts() {
        let mut dash = dashboard_with(r#"{"vocab_feedback_log": [], "beta_waitlist": []}"#);
        let text = screen(&dash);
        assert!(text.contains("Waitlist (0)"));
        assert!(text.contains("0 feedback entries in total."));

        for key in ['2', '3', '4'] {
            dash.handle_key(KeyCode::Char(key), KeyModifiers::NONE);
            let text = screen(&dash);
            assert!(text.contains("Waitlist (0)"));
        }
        assert!(screen(&dash).contains("0 people on the beta waitlist."));
    }

    #[test]
    fn all_tab_lists_rows_with_labels() {
        let text = screen(&dashboard_with(BODY));
        assert!(text.contains("Full feedback log"));
        assert!(text.contains("User 1"));
        assert!(text.contains("User 2"));
        assert!(text.contains("2024.01.01 00:00"));
        assert!(text.contains("Sort: oldest first"));
    }

    #[test]
    fn loading_screen_before_first_snapshot() {
        let dash = Dashboard::new(DisplayConfig::default());
        let text = screen(&dash);
        assert!(text.contains("Loading..."));
        assert!(!text.contains("entries in total"));
    }

    #[test]
    fn error_is_shown_and_snapshot_kept() {
        let mut dash = dashboard_with(BODY);
        dash.apply(Action::FetchStarted(RequestId(2)));
        dash.apply(Action::FetchFailed(RequestId(2), "HTTP error! status: 500".into()));
        let text = screen(&dash);
        assert!(text.contains("HTTP error! status: 500"));
        assert!(text.contains("2 feedback entries in total."));
    }

    #[test]
    fn enter_toggles_selected_sentence() {
        let mut dash = dashboard_with(BODY);
        dash.handle_key(KeyCode::Char('3'), KeyModifiers::NONE);
        assert_eq!(dash.state().tab, Tab::BySentence);

        dash.handle_key(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(dash.cursor(), 1);
        dash.handle_key(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(dash.cursor(), 1, "cursor stops at the last group");

        dash.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(dash.state().is_sentence_expanded("bye"));
        assert!(!dash.state().is_sentence_expanded("hello"));
        assert!(screen(&dash).contains("▼ bye (1 responses)"));

        dash.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(!dash.state().is_sentence_expanded("bye"));
    }

    #[test]
    fn key_outcomes() {
        let mut dash = dashboard_with(BODY);
        assert_eq!(dash.handle_key(KeyCode::Char('q'), KeyModifiers::NONE), KeyOutcome::Quit);
        assert_eq!(
            dash.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            KeyOutcome::Quit
        );
        assert_eq!(dash.handle_key(KeyCode::Char('r'), KeyModifiers::NONE), KeyOutcome::Refresh);
        assert_eq!(
            dash.handle_key(KeyCode::Char('R'), KeyModifiers::SHIFT),
            KeyOutcome::ForceRefresh
        );
        assert_eq!(dash.handle_key(KeyCode::Char('s'), KeyModifiers::NONE), KeyOutcome::Continue);
        assert!(!dash.state().sort.is_ascending());
    }

    #[test]
    fn tab_change_resets_scroll() {
        let mut dash = dashboard_with(&feedback_body(&["s"; 30]));
        dash.handle_key(KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(dash.scroll, PAGE);
        dash.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(dash.state().tab, Tab::ByUser);
        assert_eq!(dash.scroll, 0);
    }

    #[test]
    fn scroll_stops_at_last_row() {
        let mut dash = dashboard_with(&feedback_body(&["s"; 30]));
        let max = 30 - visible_body_rows(HEIGHT);
        for _ in 0..50 {
            press(&mut dash, KeyCode::Down);
        }
        assert_eq!(dash.scroll, max);
        let bottom = screen(&dash);
        assert!(bottom.contains("guess-29"));

        press(&mut dash, KeyCode::Up);
        assert_eq!(dash.scroll, max - 1);
        assert_ne!(screen(&dash), bottom, "one Up moves the view right away");

        for _ in 0..5 {
            press(&mut dash, KeyCode::PageDown);
        }
        assert_eq!(dash.scroll, max);
    }

    #[test]
    fn expanded_group_taller_than_screen_scrolls_to_its_last_row() {
        let mut dash = dashboard_with(&feedback_body(&["long"; 40]));
        press(&mut dash, KeyCode::Char('3'));
        press(&mut dash, KeyCode::Enter);
        let top = screen(&dash);
        assert!(top.contains("▼ long (40 responses)"));
        assert!(!top.contains("guess-39"));

        let mut saw_last = false;
        for _ in 0..20 {
            press(&mut dash, KeyCode::PageDown);
            press(&mut dash, KeyCode::Down);
            saw_last |= screen(&dash).contains("guess-39");
        }
        assert!(saw_last);
        // Header plus forty records.
        assert_eq!(dash.scroll, 41 - visible_body_rows(HEIGHT));

        // Collapsing shrinks the body and pulls the view back up.
        press(&mut dash, KeyCode::Enter);
        assert_eq!(dash.scroll, 0);
        assert!(screen(&dash).contains("▶ long (40 responses)"));
    }

    #[test]
    fn selecting_group_below_screen_brings_it_into_view() {
        let mut sentences = vec!["long"; 40];
        sentences.push("short");
        let mut dash = dashboard_with(&feedback_body(&sentences));
        press(&mut dash, KeyCode::Char('3'));
        press(&mut dash, KeyCode::Enter);
        assert!(!screen(&dash).contains("short (1 responses)"));

        press(&mut dash, KeyCode::Down);
        assert_eq!(dash.cursor(), 1);
        let text = screen(&dash);
        assert!(text.contains("▶ short (1 responses)"));
        assert!(!text.contains("long (40 responses)"));

        press(&mut dash, KeyCode::Up);
        assert_eq!(dash.cursor(), 0);
        assert_eq!(dash.scroll, 0);
        assert!(screen(&dash).contains("▼ long (40 responses)"));
    }
}

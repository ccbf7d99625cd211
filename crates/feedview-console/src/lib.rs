//! feedview Console - terminal dashboard for the vocabulary feedback log
//! and beta waitlist.

pub mod config;
pub mod console;
pub mod dump;
pub mod refresh;
pub mod state;
pub mod view;

pub use config::{AppConfig, CliOverrides, ConfigError, DisplayConfig, FileConfig};
pub use console::{run_console, Dashboard, KeyOutcome};
pub use dump::{dump_text, dump_view, render_json, render_text, DumpOptions};
pub use refresh::{FetchOutcome, Refresher};
pub use state::{Action, RequestId, Tab, ViewState};
pub use view::{TabBody, ViewModel};

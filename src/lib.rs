//! Suggest-RS: search-as-you-type suggestions against a remote search API
//!
//! Keystrokes are debounced into settled terms, each settled term drives at
//! most one live lookup, and the resulting state is rendered, navigated with
//! the keyboard and persisted so it survives a restart.

pub mod config;
pub mod network;
pub mod provider;
pub mod storage;
pub mod suggest;
pub mod terminal;
pub mod widget;

pub use config::Settings;
pub use provider::{OpenSearch, SearchProvider};
pub use suggest::{SuggestState, Suggestion};
pub use widget::{Intent, Widget, WidgetBuilder};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

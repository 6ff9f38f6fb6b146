//! Search-as-you-type core
//!
//! Raw keystrokes go through the [`Debouncer`], settled terms drive the
//! [`SuggestionMachine`], and the resulting [`SuggestState`] is what every
//! observer renders from.

mod cursor;
mod debounce;
mod machine;
mod models;

pub use cursor::Cursor;
pub use debounce::Debouncer;
pub use machine::SuggestionMachine;
pub use models::{SuggestState, Suggestion};

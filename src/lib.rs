//! Droptable — terminal browser for item drop tables.
//!
//! Loads a tab-delimited table of items (name, location, drop percentage),
//! then derives the displayed rows from the full dataset on every input:
//!
//! ```text
//! text ──▶ parser ──▶ Dataset ──▶ filter(ViewState) ──▶ sort(ViewState) ──▶ ui
//! ```
//!
//! The dataset is immutable after load. [`commands::Browser`] owns it together
//! with the [`view::ViewState`] and recomputes the projection after each
//! [`commands::BrowserCommand`].

pub mod app;
pub mod commands;
pub mod data;
pub mod error;
pub mod export;
pub mod filter;
pub mod parser;
pub mod sort;
pub mod source;
pub mod theme;
pub mod tui;
pub mod ui;
pub mod view;

pub use data::{Dataset, Row};
pub use error::{LoadError, ParseError};
pub use parser::{parse, parse_with, HeaderSpec};
pub use sort::SortColumn;
pub use source::{load_dataset, Source};
pub use view::{current_view, ViewState};

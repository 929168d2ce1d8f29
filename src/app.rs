//! Droptable - Application state management

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use crate::commands::{Browser, BrowserCommand};
use crate::data::Dataset;
use crate::error::LoadError;
use crate::sort::SortColumn;
use crate::theme::ThemeStore;

/// Where the dataset is in its lifecycle
#[derive(Debug)]
pub enum LoadState {
    /// Fetch still in flight; no input changes the view yet
    Loading,
    /// Load failed; the message replaces the table
    Failed(String),
    Ready(Browser),
}

/// Which panel receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Locations,
    Search,
}

impl Focus {
    pub fn label(&self) -> &'static str {
        match self {
            Focus::Table => "TABLE",
            Focus::Locations => "LOCATIONS",
            Focus::Search => "SEARCH",
        }
    }
}

/// Main application state
pub struct App {
    /// Source name for the title bar
    pub source_name: String,
    /// Header name of the location column
    pub location_column: String,
    pub state: LoadState,
    pub focus: Focus,
    /// Text in the search box
    pub search_input: String,
    /// First visible table row
    pub scroll: usize,
    /// Highlighted table row (display position)
    pub selected_row: usize,
    /// Number of table rows that fit on screen
    pub viewport_height: usize,
    /// Highlighted entry in the location list
    pub location_cursor: usize,
    pub theme: ThemeStore,
    /// Whether to show the help popup
    pub show_help: bool,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    /// Create an app waiting for its dataset
    pub fn new(source_name: String, location_column: String, theme: ThemeStore) -> Self {
        Self {
            source_name,
            location_column,
            state: LoadState::Loading,
            focus: Focus::Table,
            search_input: String::new(),
            scroll: 0,
            selected_row: 0,
            viewport_height: 20,
            location_cursor: 0,
            theme,
            show_help: false,
            should_quit: false,
        }
    }

    /// Install the result of the load. Failures leave no rows behind.
    pub fn finish_loading(&mut self, result: Result<Dataset, LoadError>) {
        self.state = match result {
            Ok(dataset) => {
                info!("Browsing {} rows", dataset.len());
                LoadState::Ready(Browser::new(dataset))
            }
            Err(e) => {
                warn!("Load failed: {}", e);
                LoadState::Failed(e.user_message(&self.source_name, &self.location_column))
            }
        };
        self.reset_position();
    }

    pub fn browser(&self) -> Option<&Browser> {
        match self.state {
            LoadState::Ready(ref browser) => Some(browser),
            _ => None,
        }
    }

    /// Forward a command to the browser; ignored until the dataset is ready.
    pub fn dispatch(&mut self, command: BrowserCommand) {
        if let LoadState::Ready(ref mut browser) = self.state {
            browser.dispatch(command);
            self.reset_position();
        }
    }

    /// Handle one key press
    pub fn on_key(&mut self, key: KeyEvent) {
        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        if self.focus == Focus::Search {
            self.on_search_key(key);
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), _)
            | (KeyCode::Esc, _) => self.should_quit = true,

            (KeyCode::Char('?'), _) => self.show_help = true,
            (KeyCode::Char('t'), _) => self.theme.toggle(),

            (KeyCode::Char('/'), _) if self.browser().is_some() => self.focus = Focus::Search,
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) if self.browser().is_some() => {
                self.focus = match self.focus {
                    Focus::Table => Focus::Locations,
                    _ => Focus::Table,
                };
            }

            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => self.move_down(1),
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => self.move_up(1),
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => self.goto_top(),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => self.goto_bottom(),
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => self.move_down(self.viewport_height / 2),
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => self.move_up(self.viewport_height / 2),
            (KeyCode::PageDown, _) => self.move_down(self.viewport_height),
            (KeyCode::PageUp, _) => self.move_up(self.viewport_height),

            (KeyCode::Char(' '), _) | (KeyCode::Enter, _) if self.focus == Focus::Locations => {
                if let Some(location) = self.location_under_cursor() {
                    self.dispatch(BrowserCommand::ToggleLocation(location));
                }
            }
            (KeyCode::Char('a'), _) => self.dispatch(BrowserCommand::SelectAllLocations),
            (KeyCode::Char('n'), _) => self.dispatch(BrowserCommand::SelectNoLocations),

            (KeyCode::Char('1'), _) => {
                self.dispatch(BrowserCommand::ActivateColumn(SortColumn::Name))
            }
            (KeyCode::Char('2'), _) => {
                self.dispatch(BrowserCommand::ActivateColumn(SortColumn::Location))
            }
            (KeyCode::Char('3'), _) => {
                self.dispatch(BrowserCommand::ActivateColumn(SortColumn::Percent))
            }

            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Enter, _) | (KeyCode::Tab, _) => {
                self.focus = Focus::Table;
            }
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => self.should_quit = true,
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.search_input.clear();
                self.dispatch(BrowserCommand::SetSearch(String::new()));
            }
            (KeyCode::Backspace, _) => {
                if self.search_input.pop().is_some() {
                    self.dispatch(BrowserCommand::SetSearch(self.search_input.clone()));
                }
            }
            (KeyCode::Char(c), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
                self.search_input.push(c);
                self.dispatch(BrowserCommand::SetSearch(self.search_input.clone()));
            }
            _ => {}
        }
    }

    /// Location name at the list cursor
    pub fn location_under_cursor(&self) -> Option<String> {
        self.browser()?
            .dataset()
            .locations()
            .nth(self.location_cursor)
            .map(str::to_string)
    }

    fn row_count(&self) -> usize {
        self.browser().map_or(0, Browser::visible_count)
    }

    fn location_count(&self) -> usize {
        self.browser().map_or(0, |b| b.dataset().location_count())
    }

    /// Move the cursor of the focused panel down by n
    pub fn move_down(&mut self, n: usize) {
        if self.focus == Focus::Locations {
            self.location_cursor =
                (self.location_cursor + n).min(self.location_count().saturating_sub(1));
            return;
        }
        let rows = self.row_count();
        self.selected_row = (self.selected_row + n).min(rows.saturating_sub(1));
        if self.selected_row >= self.scroll + self.viewport_height {
            self.scroll = self.selected_row + 1 - self.viewport_height.max(1);
        }
    }

    /// Move the cursor of the focused panel up by n
    pub fn move_up(&mut self, n: usize) {
        if self.focus == Focus::Locations {
            self.location_cursor = self.location_cursor.saturating_sub(n);
            return;
        }
        self.selected_row = self.selected_row.saturating_sub(n);
        if self.selected_row < self.scroll {
            self.scroll = self.selected_row;
        }
    }

    pub fn goto_top(&mut self) {
        if self.focus == Focus::Locations {
            self.location_cursor = 0;
        } else {
            self.scroll = 0;
            self.selected_row = 0;
        }
    }

    pub fn goto_bottom(&mut self) {
        if self.focus == Focus::Locations {
            self.location_cursor = self.location_count().saturating_sub(1);
        } else {
            let rows = self.row_count();
            self.selected_row = rows.saturating_sub(1);
            self.scroll = rows.saturating_sub(self.viewport_height);
        }
    }

    /// Update viewport height based on the table area
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        if self.selected_row >= self.scroll + self.viewport_height {
            self.scroll = self.selected_row + 1 - self.viewport_height;
        }
    }

    fn reset_position(&mut self) {
        self.scroll = 0;
        self.selected_row = 0;
    }
}

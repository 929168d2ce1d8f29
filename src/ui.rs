//! Droptable - UI rendering
//!
//! Renders the main interface using Ratatui widgets. Nothing here changes
//! the dataset or the view state; it only draws what [`App`] holds.

use crate::app::{App, Focus, LoadState};
use crate::commands::{Browser, EMPTY_MESSAGE};
use crate::sort::SortColumn;
use crate::theme::Palette;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};

const LOCATION_PANEL_WIDTH: u16 = 28;

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let theme = app.theme.mode.palette();

    // Search bar, content, status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(LOCATION_PANEL_WIDTH), Constraint::Min(20)])
        .split(main_chunks[1]);

    // Borders plus the header row
    app.set_viewport_height((content_chunks[1].height as usize).saturating_sub(3));

    render_search_bar(frame, app, main_chunks[0], &theme);
    render_locations(frame, app, content_chunks[0], &theme);

    match app.state {
        LoadState::Loading => {
            let msg = format!("Loading {}...", app.source_name);
            render_message(frame, content_chunks[1], &msg, theme.muted, &theme);
        }
        LoadState::Failed(ref msg) => {
            render_message(frame, content_chunks[1], msg, theme.error, &theme);
        }
        LoadState::Ready(ref browser) => {
            render_table(frame, app, browser, content_chunks[1], &theme);
        }
    }

    render_status_bar(frame, app, main_chunks[2], &theme);

    if app.show_help {
        render_help_popup(frame, &theme);
    }
}

fn panel_block<'a>(title: String, focused: bool, theme: &Palette) -> Block<'a> {
    let border = if focused { theme.accent } else { theme.border };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(title, Style::default().fg(theme.accent)))
        .style(Style::default().bg(theme.bg).fg(theme.fg))
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect, theme: &Palette) {
    let focused = app.focus == Focus::Search;
    let mut spans = vec![Span::styled(
        app.search_input.clone(),
        Style::default().fg(theme.fg),
    )];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(theme.accent)));
    } else if app.search_input.is_empty() {
        spans.push(Span::styled(
            "press / to search item names",
            Style::default().fg(theme.muted),
        ));
    }

    let search = Paragraph::new(Line::from(spans))
        .block(panel_block(" Search ".to_string(), focused, theme));
    frame.render_widget(search, area);
}

fn render_locations(frame: &mut Frame, app: &App, area: Rect, theme: &Palette) {
    let focused = app.focus == Focus::Locations;
    let title = format!(" {} ", app.location_column);

    let Some(browser) = app.browser() else {
        frame.render_widget(panel_block(title, focused, theme), area);
        return;
    };

    let visible = (area.height as usize).saturating_sub(2);
    let skip = (app.location_cursor + 1).saturating_sub(visible);

    let items: Vec<ListItem> = browser
        .dataset()
        .locations()
        .enumerate()
        .skip(skip)
        .take(visible)
        .map(|(i, location)| {
            let checked = browser.view().is_selected(location);
            let (mark, mark_style) = if checked {
                ("[x] ", Style::default().fg(theme.selected))
            } else {
                ("[ ] ", Style::default().fg(theme.muted))
            };
            let line = Line::from(vec![
                Span::styled(mark, mark_style),
                Span::styled(location.to_string(), Style::default().fg(theme.fg)),
            ]);

            let style = if focused && i == app.location_cursor {
                Style::default().bg(theme.highlight)
            } else {
                Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let title = format!(
        " {} {}/{} ",
        app.location_column,
        browser.view().selected_locations.len(),
        browser.dataset().location_count()
    );
    let list = List::new(items).block(panel_block(title, focused, theme));
    frame.render_widget(list, area);
}

/// Header label with the sort arrow on the active column
fn header_label(
    column: SortColumn,
    browser: &Browser,
    location_column: &str,
    key: usize,
) -> String {
    let view = browser.view();
    let arrow = if view.sort_column == column {
        if view.sort_ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        ""
    };
    format!("{}:{}{}", key, column.label(location_column), arrow)
}

fn render_table(frame: &mut Frame, app: &App, browser: &Browser, area: Rect, theme: &Palette) {
    let title = format!(" {} │ {} rows ", app.source_name, browser.dataset().len());
    let block = panel_block(title, app.focus == Focus::Table, theme);

    if browser.visible_count() == 0 {
        let empty = Paragraph::new(Line::from(Span::styled(
            EMPTY_MESSAGE,
            Style::default().fg(theme.warning),
        )))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(
        SortColumn::ALL
            .iter()
            .enumerate()
            .map(|(i, &column)| {
                let active = browser.view().sort_column == column;
                let style = if active {
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.warning)
                };
                Cell::from(header_label(column, browser, &app.location_column, i + 1)).style(style)
            })
            .collect::<Vec<_>>(),
    );

    let rows: Vec<Row> = browser
        .visible_rows()
        .enumerate()
        .skip(app.scroll)
        .take(app.viewport_height)
        .map(|(i, row)| {
            let style = if i == app.selected_row {
                Style::default().bg(theme.highlight)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(row.name.clone()),
                Cell::from(row.location.clone()).style(Style::default().fg(theme.muted)),
                Cell::from(Line::from(row.percent_display()).alignment(Alignment::Right)),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(50),
            Constraint::Percentage(30),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

fn render_message(frame: &mut Frame, area: Rect, msg: &str, color: Color, theme: &Palette) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        msg.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(panel_block(" Droptable ".to_string(), false, theme));
    frame.render_widget(paragraph, area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect, theme: &Palette) {
    let (status, status_style) = match app.state {
        LoadState::Loading => ("Loading...".to_string(), Style::default().fg(theme.muted)),
        LoadState::Failed(_) => ("Load failed".to_string(), Style::default().fg(theme.error)),
        LoadState::Ready(ref browser) => (
            browser.result_message(),
            Style::default().fg(theme.selected),
        ),
    };

    let position = match app.browser() {
        Some(browser) if browser.visible_count() > 0 => {
            format!(" Row {}/{} ", app.selected_row + 1, browser.visible_count())
        }
        _ => " Row -/- ".to_string(),
    };

    let spans = vec![
        Span::styled(
            concat!(" Droptable v", env!("CARGO_PKG_VERSION"), " "),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled("|", Style::default().fg(theme.border)),
        Span::styled(format!(" {} ", status), status_style),
        Span::styled("|", Style::default().fg(theme.border)),
        Span::styled(position, Style::default().fg(theme.fg)),
        Span::styled("|", Style::default().fg(theme.border)),
        Span::styled(format!(" {} ", app.focus.label()), Style::default().fg(theme.muted)),
        Span::styled("|", Style::default().fg(theme.border)),
        Span::styled(format!(" {} ", app.theme.mode.label()), Style::default().fg(theme.muted)),
        Span::styled("|", Style::default().fg(theme.border)),
        Span::styled(" ?:Help q:Quit ", Style::default().fg(theme.muted)),
    ];

    let status_bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .style(Style::default().bg(theme.bg)),
    );

    frame.render_widget(status_bar, area);
}

fn help_entry(keys: &'static str, what: &'static str, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", keys), Style::default().fg(color)),
        Span::raw(what),
    ])
}

fn help_section(title: &'static str, color: Color) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

/// Render help popup
fn render_help_popup(frame: &mut Frame, theme: &Palette) {
    let area = centered_rect(55, 80, frame.area());

    // Clear the background
    frame.render_widget(Clear, area);

    let help_text = vec![
        help_section("Keyboard Shortcuts", theme.accent),
        Line::from(""),
        help_section("Filter", theme.warning),
        help_entry("/", "Search item names (Esc/Enter to leave)", theme.warning),
        help_entry("Ctrl+u", "Clear search while typing", theme.warning),
        help_entry("Tab", "Switch table / location list", theme.warning),
        help_entry("Space", "Toggle location under cursor", theme.warning),
        help_entry("a / n", "Select all / no locations", theme.warning),
        Line::from(""),
        help_section("Sort", theme.accent),
        help_entry("1 2 3", "Sort by column; again to reverse", theme.accent),
        Line::from(""),
        help_section("Navigation", theme.selected),
        help_entry("j / Down", "Move down", theme.selected),
        help_entry("k / Up", "Move up", theme.selected),
        help_entry("g / G", "Go to top / bottom", theme.selected),
        help_entry("Ctrl+d/u", "Half page down / up", theme.selected),
        Line::from(""),
        help_entry("t", "Toggle light / dark theme", theme.muted),
        help_entry("?", "Toggle this help", theme.muted),
        help_entry("q", "Quit", theme.error),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" Help ", Style::default().fg(theme.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .style(Style::default().bg(theme.bg).fg(theme.fg)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help, area);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

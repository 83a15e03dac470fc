//! Home component - Main application screen
//!
//! Displays the filter box, the author table, the paginator, a status line
//! and the help bar. Owns the row selection and the filter input buffer.

use crate::action::Action;
use crate::component::Component;
use crate::components::{calculate_main_layout, draw_author_table, draw_paginator};
use crate::model::ui::InputMode;
use crate::model::{Record, TableView};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Home Component
// ═══════════════════════════════════════════════════════════════════════════════

/// Home component for the main application view
#[derive(Default)]
pub struct HomeComponent {
    /// Where keystrokes go
    pub input_mode: InputMode,

    /// Filter text as typed; applied to the view after the debounce delay
    pub filter_text: String,

    /// Selected row on the current page
    pub selected: Option<usize>,
}

impl HomeComponent {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Row selection
    // ─────────────────────────────────────────────────────────────────────────

    pub fn select_next(&mut self, row_count: usize) {
        if row_count == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < row_count => i + 1,
            Some(i) => i.min(row_count - 1),
            None => 0,
        });
    }

    pub fn select_previous(&mut self, row_count: usize) {
        if row_count == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => i.saturating_sub(1).min(row_count - 1),
            None => 0,
        });
    }

    /// Keep the selection on the page after it changed size
    pub fn clamp_selection(&mut self, row_count: usize) {
        self.selected = match (self.selected, row_count) {
            (_, 0) => None,
            (Some(i), n) => Some(i.min(n - 1)),
            (None, _) => Some(0),
        };
    }

    pub fn selected_record<'a>(&self, rows: &'a [Record]) -> Option<&'a Record> {
        self.selected.and_then(|i| rows.get(i))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Filter input
    // ─────────────────────────────────────────────────────────────────────────

    pub fn enter_filter_mode(&mut self) {
        self.input_mode = InputMode::Filter;
    }

    pub fn exit_filter_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn filter_input(&mut self, c: char) {
        self.filter_text.push(c);
    }

    pub fn filter_backspace(&mut self) {
        self.filter_text.pop();
    }

    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for HomeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.input_mode == InputMode::Filter {
            let action = match key.code {
                KeyCode::Esc | KeyCode::Enter => Some(Action::ExitFilterMode),
                KeyCode::Backspace => Some(Action::FilterBackspace),
                KeyCode::Char(c) => Some(Action::FilterInput(c)),
                _ => None,
            };
            return Ok(action);
        }

        let action = match key.code {
            // Rows
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextRow),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevRow),

            // Pages
            KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => Some(Action::NextPage),
            KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => Some(Action::PrevPage),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstPage),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastPage),
            KeyCode::Char('+') => Some(Action::CyclePageSize(true)),
            KeyCode::Char('-') => Some(Action::CyclePageSize(false)),

            // Sort
            KeyCode::Char('s') => Some(Action::CycleSortKey),
            KeyCode::Char('o') => Some(Action::CycleSortDirection),

            // Filter
            KeyCode::Char('/') => Some(Action::EnterFilterMode),
            KeyCode::Esc if !self.filter_text.is_empty() => Some(Action::ClearFilter),

            // Authors
            KeyCode::Char('a') => Some(Action::OpenAddDialog),
            KeyCode::Char('e') | KeyCode::Enter => Some(Action::OpenEditDialog),
            KeyCode::Char('d') | KeyCode::Delete => Some(Action::OpenDeleteDialog),
            KeyCode::Char('R') => Some(Action::Reload),

            // App
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),

            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_home_screen which takes the table view
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Context needed for rendering the home screen
pub struct HomeRenderContext<'a> {
    pub source: &'a str,
    pub loading: bool,
}

/// Draw the home screen
pub fn draw_home_screen(
    frame: &mut Frame,
    area: Rect,
    home: &HomeComponent,
    table: &TableView,
    ctx: &HomeRenderContext,
) -> Result<()> {
    let layout = calculate_main_layout(area);

    render_filter_box(frame, layout.filter, home, table.filter_pending());
    draw_author_table(frame, layout.table, table.view(), home.selected, ctx.loading);
    draw_paginator(frame, layout.paginator, table.view());
    render_status_bar(frame, layout.status, table, ctx);
    render_help_bar(frame, layout.help, home);

    Ok(())
}

fn render_filter_box(frame: &mut Frame, area: Rect, home: &HomeComponent, pending: bool) {
    let editing = home.input_mode == InputMode::Filter;
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let content = if home.filter_text.is_empty() && !editing {
        Line::from(Span::styled(
            "Press / to filter",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let cursor = if editing { "_" } else { "" };
        Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}{}", home.filter_text, cursor),
                Style::default().fg(Color::White),
            ),
        ])
    };

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .title(if pending { " Filter … " } else { " Filter " })
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, table: &TableView, ctx: &HomeRenderContext) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", ctx.source),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!("{} authors", table.store().len()),
            Style::default().fg(Color::White),
        ),
    ];

    if ctx.loading {
        spans.push(Span::styled(
            "  Loading…",
            Style::default().fg(Color::Yellow),
        ));
    } else if let Some(loaded_at) = table.loaded_at {
        spans.push(Span::styled(
            format!("  Loaded at {}", loaded_at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if let Some(ref error) = table.last_error {
        spans.push(Span::styled(
            format!("  Error: {} ", error),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_bar(frame: &mut Frame, area: Rect, home: &HomeComponent) {
    let key_style = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);

    let help_spans = if home.input_mode == InputMode::Filter {
        vec![
            Span::styled(" Esc/Enter ", key_style(Color::Yellow)),
            Span::raw("Done  "),
            Span::styled(" Backspace ", key_style(Color::Yellow)),
            Span::raw("Delete"),
        ]
    } else {
        vec![
            Span::styled(" q ", key_style(Color::Yellow)),
            Span::raw("Quit "),
            Span::styled(" a ", key_style(Color::Green)),
            Span::raw("Add "),
            Span::styled(" e ", key_style(Color::Green)),
            Span::raw("Edit "),
            Span::styled(" d ", key_style(Color::Red)),
            Span::raw("Delete "),
            Span::styled(" / ", key_style(Color::Cyan)),
            Span::raw("Filter "),
            Span::styled(" s/o ", key_style(Color::Cyan)),
            Span::raw("Sort "),
            Span::styled(" n/p ", key_style(Color::Cyan)),
            Span::raw("Page "),
            Span::styled(" ? ", key_style(Color::Cyan)),
            Span::raw("Help"),
        ]
    };

    frame.render_widget(Paragraph::new(Line::from(help_spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut home = HomeComponent::new();
        home.select_previous(3);
        assert_eq!(home.selected, Some(0));
        home.select_next(3);
        home.select_next(3);
        home.select_next(3);
        assert_eq!(home.selected, Some(2));

        home.clamp_selection(1);
        assert_eq!(home.selected, Some(0));
        home.clamp_selection(0);
        assert_eq!(home.selected, None);
        home.select_next(0);
        assert_eq!(home.selected, None);
    }

    #[test]
    fn test_filter_mode_routes_characters() {
        let mut home = HomeComponent::new();
        assert_eq!(
            home.handle_key_event(key(KeyCode::Char('/'))).unwrap(),
            Some(Action::EnterFilterMode)
        );

        home.enter_filter_mode();
        assert_eq!(
            home.handle_key_event(key(KeyCode::Char('q'))).unwrap(),
            Some(Action::FilterInput('q'))
        );
        assert_eq!(
            home.handle_key_event(key(KeyCode::Enter)).unwrap(),
            Some(Action::ExitFilterMode)
        );
    }

    #[test]
    fn test_escape_clears_only_a_non_empty_filter() {
        let mut home = HomeComponent::new();
        assert_eq!(home.handle_key_event(key(KeyCode::Esc)).unwrap(), None);

        home.filter_input('a');
        assert_eq!(
            home.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::ClearFilter)
        );
    }

    #[test]
    fn test_normal_mode_bindings() {
        let mut home = HomeComponent::new();
        let cases = [
            (KeyCode::Char('n'), Action::NextPage),
            (KeyCode::Left, Action::PrevPage),
            (KeyCode::Char('G'), Action::LastPage),
            (KeyCode::Char('+'), Action::CyclePageSize(true)),
            (KeyCode::Char('s'), Action::CycleSortKey),
            (KeyCode::Char('a'), Action::OpenAddDialog),
            (KeyCode::Enter, Action::OpenEditDialog),
            (KeyCode::Char('d'), Action::OpenDeleteDialog),
            (KeyCode::Char('q'), Action::OpenQuitDialog),
        ];
        for (code, expected) in cases {
            assert_eq!(home.handle_key_event(key(code)).unwrap(), Some(expected));
        }
    }
}

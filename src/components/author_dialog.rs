//! Add / edit author dialog component
//!
//! Renders an [`AuthorForm`] and routes keystrokes into it. Confirming is
//! left to the App, which owns the store the form stages into.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::{AuthorForm, FormField, FormMode, Record};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Default)]
pub struct AuthorDialog {
    pub form: Option<AuthorForm>,
}

impl AuthorDialog {
    pub fn open_add(&mut self) {
        self.form = Some(AuthorForm::for_add());
    }

    pub fn open_edit(&mut self, record: &Record) {
        self.form = Some(AuthorForm::for_edit(record));
    }

    pub fn close(&mut self) -> Option<AuthorForm> {
        self.form.take()
    }

    fn field_line(form: &AuthorForm, field: FormField) -> Vec<Line<'static>> {
        let focused = form.focus == field;
        let read_only = !form.editable_fields().contains(&field);

        let label_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let value_style = if read_only {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if focused { "_" } else { "" };
        let required = if field == FormField::Author { " *" } else { "" };

        let mut lines = vec![Line::from(vec![
            Span::styled(
                format!("{} {:18}", if focused { "▶" } else { " " }, format!("{}{}", field.label(), required)),
                label_style,
            ),
            Span::styled(format!("{}{}", form.value(field), cursor), value_style),
        ])];

        if let Some((err_field, err)) = form.error {
            if err_field == field {
                lines.push(Line::from(Span::styled(
                    format!("  {:18}{}", "", err),
                    Style::default().fg(Color::Red),
                )));
            }
        }
        lines
    }
}

impl Component for AuthorDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Some(form) = self.form.as_mut() else {
            return Ok(None);
        };

        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::ConfirmModal),
            KeyCode::Tab | KeyCode::Down => {
                form.focus_next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.focus_prev();
                None
            }
            KeyCode::Backspace => {
                form.backspace();
                None
            }
            KeyCode::Char(c) => {
                form.input(c);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let Some(form) = self.form.as_ref() else {
            return Ok(());
        };

        let popup_area = centered_popup(area, 64, 14);
        frame.render_widget(Clear, popup_area);

        let title = match form.mode {
            FormMode::Add => " Add new author ".to_string(),
            FormMode::Edit => format!(" Edit author #{} ", form.id),
        };

        let mut content = vec![Line::from("")];
        for field in FormField::all() {
            content.extend(Self::field_line(form, field));
        }
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::styled(
                " Enter ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("Save  "),
            Span::styled(" Tab ", Style::default().fg(Color::Cyan)),
            Span::raw("Next field  "),
            Span::styled(
                " Esc ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw("Cancel"),
        ]));

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green))
                    .title(title)
                    .title_style(
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .alignment(Alignment::Left);

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

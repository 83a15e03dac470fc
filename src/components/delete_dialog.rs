//! Delete confirmation dialog component

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::{DeleteConfirm, Record};
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
pub struct DeleteDialog {
    pub confirm: Option<DeleteConfirm>,
}

impl DeleteDialog {
    pub fn open(&mut self, record: Record) {
        self.confirm = Some(DeleteConfirm::new(record));
    }

    pub fn close(&mut self) -> Option<DeleteConfirm> {
        self.confirm.take()
    }
}

impl Component for DeleteDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.confirm.is_none() {
            return Ok(None);
        }
        let action = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(Action::ConfirmModal),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let Some(confirm) = self.confirm.as_ref() else {
            return Ok(());
        };
        let record = &confirm.record;

        let popup_area = centered_popup(area, 56, 11);
        frame.render_widget(Clear, popup_area);

        let field = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{:>18}  ", label), Style::default().fg(Color::DarkGray)),
                Span::styled(value, Style::default().fg(Color::White)),
            ])
        };

        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Delete this author?",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            field("Id", record.id.to_string()),
            field("Author", record.author.clone()),
            field("Signature status", record.signature_status.clone()),
            field("Signature date", record.signature_date.clone()),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " y ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw("Delete  "),
                Span::styled(
                    " n/Esc ",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("Keep"),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Delete author ")
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            )
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

//! Author table rendering
//!
//! Renders the current page with sortable headers, column alignment and a
//! highlighted selected row, plus the paginator line below it.

use crate::model::{DataSourceView, Record, SortKey, SortState};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a column may grow
const MAX_COLUMN_WIDTH: usize = 40;

const COLUMN_SEPARATOR: &str = " │ ";

/// Header label with the sort indicator of the active column
pub fn header_label(key: SortKey, sort: &SortState) -> String {
    if sort.is_active() && sort.active == Some(key) {
        format!("{} {}", key.label(), sort.direction.indicator())
    } else {
        key.label().to_string()
    }
}

/// Cut `text` to `width` display columns, marking the cut with an ellipsis
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Left-align `text` in a cell `width` display columns wide
fn pad_to_width(text: &str, width: usize) -> String {
    let truncated = truncate_to_width(text, width);
    let fill = width.saturating_sub(truncated.width());
    format!("{}{}", truncated, " ".repeat(fill))
}

fn cell_values(record: &Record) -> [String; 4] {
    SortKey::all().map(|key| key.value(record).into_owned())
}

/// Column widths fitted to headers and the visible rows
pub fn column_widths(rows: &[Record], sort: &SortState) -> [usize; 4] {
    let mut widths = SortKey::all().map(|key| header_label(key, sort).width());
    for row in rows {
        for (i, value) in cell_values(row).iter().enumerate() {
            widths[i] = widths[i].max(value.width());
        }
    }
    widths.map(|w| w.min(MAX_COLUMN_WIDTH))
}

/// Build the table lines: header, separator, then one line per row
pub fn build_table_lines(
    rows: &[Record],
    sort: &SortState,
    selected: Option<usize>,
) -> Vec<Line<'static>> {
    let widths = column_widths(rows, sort);
    let mut lines = Vec::with_capacity(rows.len() + 2);

    let header_spans: Vec<Span> = SortKey::all()
        .iter()
        .enumerate()
        .flat_map(|(i, key)| {
            let mut style = Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
            if sort.is_active() && sort.active == Some(*key) {
                style = style.fg(Color::Yellow);
            }
            vec![
                Span::styled(pad_to_width(&header_label(*key, sort), widths[i]), style),
                Span::raw(COLUMN_SEPARATOR),
            ]
        })
        .collect();
    lines.push(Line::from(header_spans));

    let separator: String = widths
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("─┼─");
    lines.push(Line::from(Span::styled(
        separator,
        Style::default().fg(Color::DarkGray),
    )));

    for (index, row) in rows.iter().enumerate() {
        let is_selected = selected == Some(index);
        let style = if is_selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let row_spans: Vec<Span> = cell_values(row)
            .iter()
            .enumerate()
            .flat_map(|(i, value)| {
                vec![
                    Span::styled(pad_to_width(value, widths[i]), style),
                    Span::styled(COLUMN_SEPARATOR, style),
                ]
            })
            .collect();
        lines.push(Line::from(row_spans));
    }

    lines
}

/// Draw the current page of `view` into `area`
pub fn draw_author_table(
    frame: &mut Frame,
    area: Rect,
    view: &DataSourceView,
    selected: Option<usize>,
    loading: bool,
) {
    let title = format!(" Authors ({}) ", view.filtered_len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::DarkGray));

    if view.rows().is_empty() {
        let message = if loading {
            "Loading…"
        } else if view.filter().is_empty() {
            "No authors"
        } else {
            "No authors match the filter"
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(Color::DarkGray),
        )))
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let sort = view.sort();
    let paragraph = Paragraph::new(build_table_lines(view.rows(), &sort, selected)).block(block);
    frame.render_widget(paragraph, area);
}

/// Draw the paginator line: range label, page position and page size
pub fn draw_paginator(frame: &mut Frame, area: Rect, view: &DataSourceView) {
    let paginator = view.paginator();
    let page_count = view.page_count().max(1);

    let nav_style = |enabled: bool| {
        if enabled {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let spans = vec![
        Span::styled(" ◀ ", nav_style(view.has_previous_page())),
        Span::styled(
            view.range_label(),
            Style::default().fg(Color::White),
        ),
        Span::styled(" ▶ ", nav_style(view.has_next_page())),
        Span::styled(
            format!(
                "  Page {}/{}  ",
                paginator.page_index + 1,
                page_count
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Rows per page: {}", paginator.page_size),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::SortDirection;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Ann", 5), "Ann");
        assert_eq!(truncate_to_width("Annabelle", 5), "Anna…");
        assert_eq!(truncate_to_width("Annabelle", 0), "");
        // Wide characters count double
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
    }

    #[test]
    fn test_header_marks_active_sort_column() {
        let sort = SortState::new(Some(SortKey::Author), SortDirection::Desc);
        assert_eq!(header_label(SortKey::Author, &sort), "Author ▼");
        assert_eq!(header_label(SortKey::Id, &sort), "Id");

        let off = SortState::new(Some(SortKey::Author), SortDirection::None);
        assert_eq!(header_label(SortKey::Author, &off), "Author");
    }

    #[test]
    fn test_build_table_lines_layout() {
        let rows = vec![
            Record::new(1, "Ann", "Signed", "2020-01-01"),
            Record::new(22, "Bob", "Pending", ""),
        ];
        let sort = SortState::new(Some(SortKey::Id), SortDirection::Asc);
        let lines = build_table_lines(&rows, &sort, Some(1));

        assert_eq!(lines.len(), 4);
        assert!(line_text(&lines[0]).starts_with("Id ▲"));
        assert!(line_text(&lines[2]).contains("Ann"));
        assert!(line_text(&lines[3]).starts_with("22"));
        assert_eq!(lines[3].spans[0].style.bg, Some(Color::Cyan));
        assert_eq!(lines[2].spans[0].style.bg, None);
    }

    #[test]
    fn test_column_widths_are_capped() {
        let long = "x".repeat(100);
        let rows = vec![Record::new(1, long, "", "")];
        let widths = column_widths(&rows, &SortState::default());
        assert_eq!(widths[1], MAX_COLUMN_WIDTH);
        assert_eq!(widths[0], 2);
    }
}

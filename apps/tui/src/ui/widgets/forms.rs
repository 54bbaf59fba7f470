use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Single(Option<String>),
    /// Every offered value with its selection flag; `cursor` is the item
    /// Space toggles.
    Multi {
        items: Vec<(String, bool)>,
        cursor: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub value: FieldValue,
}

impl FormField {
    pub fn single(label: &'static str, value: Option<impl ToString>) -> Self {
        Self {
            label,
            value: FieldValue::Single(value.map(|v| v.to_string())),
        }
    }

    pub fn multi<T: ToString + PartialEq>(
        label: &'static str,
        options: &[T],
        selected: &[T],
        cursor: usize,
    ) -> Self {
        Self {
            label,
            value: FieldValue::Multi {
                items: options
                    .iter()
                    .map(|option| (option.to_string(), selected.contains(option)))
                    .collect(),
                cursor,
            },
        }
    }
}

fn field_lines(field: &FormField, focused: bool) -> Vec<TextLine<'static>> {
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let marker = if focused { "> " } else { "  " };
    let mut lines = vec![TextLine::from(Span::styled(
        format!("{marker}{}", field.label),
        label_style,
    ))];

    match &field.value {
        FieldValue::Single(value) => {
            let text = value.clone().unwrap_or_else(|| "(none)".to_string());
            let style = if value.is_some() {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            lines.push(TextLine::from(vec![
                Span::raw("    < "),
                Span::styled(text, style),
                Span::raw(" >"),
            ]));
        }
        FieldValue::Multi { items, cursor } => {
            if items.is_empty() {
                lines.push(TextLine::from(Span::styled(
                    "    (none offered)",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            for (index, (item, selected)) in items.iter().enumerate() {
                let check = if *selected { "[x]" } else { "[ ]" };
                let mut style = if *selected {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                if focused && index == *cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                lines.push(TextLine::from(Span::styled(format!("    {check} {item}"), style)));
            }
        }
    }
    lines
}

pub fn render_form(f: &mut Frame<'_>, area: Rect, title: &str, fields: &[FormField], focus: usize) {
    let lines: Vec<TextLine<'static>> = fields
        .iter()
        .enumerate()
        .flat_map(|(index, field)| {
            let mut lines = field_lines(field, index == focus);
            lines.push(TextLine::from(""));
            lines
        })
        .collect();

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

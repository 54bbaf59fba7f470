use crate::app::App;
use crate::cli::CliArgs;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn key_line(key: &str, description: &str) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(
            format!("  {key:<12}"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(description.to_string()),
    ])
}

fn heading(text: &str) -> TextLine<'static> {
    TextLine::from(Span::styled(
        text.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

pub fn build_help_lines() -> Vec<TextLine<'static>> {
    let mut lines = vec![
        heading("Navigation:"),
        key_line("Tab/S-Tab", "Next / previous screen"),
        key_line("F1 or ?", "Toggle this help"),
        key_line("q", "Quit"),
        TextLine::from(""),
        heading("Site screen:"),
        key_line("Up/Down", "Move in the focused list"),
        key_line("Enter", "Load project / select site"),
        key_line("Left/Esc", "Back to the project list"),
        key_line("/", "Filter sites (fuzzy)"),
        TextLine::from(""),
        heading("Result screens:"),
        key_line("Up/Down", "Move between form fields"),
        key_line("Left/Right", "Change value or move the cursor"),
        key_line("Space", "Toggle a return period / IM"),
        key_line("Enter", "Get results"),
        key_line("d", "Download results as zip"),
        key_line("b", "Hazard: show logic tree branches"),
        key_line("[ / ]", "GMS: previous / next IM"),
        key_line("Esc", "Back to the site screen"),
        TextLine::from(""),
        heading("CLI Options:"),
    ];

    let help_text = CliArgs::help_text();
    for line in help_text.lines() {
        if line.starts_with("Usage") || line.starts_with("Options") || line.trim().is_empty() {
            continue;
        }
        lines.push(TextLine::from(line.to_string()));
    }

    lines
}

pub fn render_help(_app: &App, f: &mut Frame<'_>) {
    let area = centered_rect(70, 80, f.area());
    let paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(
            Block::default()
                .title("Help (Esc to close)")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

use crate::api::models::DisaggResponse;
use crate::app::App;
use crate::plot::top_contributions;
use crate::ui::split_form;
use crate::ui::widgets::charts::format_value;
use crate::ui::widgets::forms::{render_form, FormField};
use crate::ui::widgets::status::render_viewer_state;
use crate::ui::widgets::tables::optional_value;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

const TOP_CONTRIBUTIONS: usize = 10;

pub fn render_disagg(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (form_area, result_area) = split_form(area);

    let form = &app.forms.disagg;
    let fields = [
        FormField::single("Intensity measure", form.im),
        FormField::single("Component", form.component.map(|c| c.label())),
        FormField::single("Return period", form.rp),
    ];
    render_form(f, form_area, "Disaggregation", &fields, app.field_index);

    render_viewer_state(
        app,
        f,
        result_area,
        "Disaggregation",
        &app.context.disagg,
        render_results,
    );
}

fn render_results(_app: &App, f: &mut Frame<'_>, area: Rect, response: &DisaggResponse) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(9),
        ])
        .split(area);

    render_mean_values(f, chunks[0], response);

    let rows = top_contributions(response, TOP_CONTRIBUTIONS);
    let table_rows = rows.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.label.clone()),
            Cell::from(format!("{:.2}", row.percent)),
            Cell::from(optional_value(row.magnitude, 2)),
            Cell::from(optional_value(row.rrup, 1)),
        ])
    });
    let widths = [
        Constraint::Min(24),
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Length(8),
    ];
    let table = Table::new(table_rows, widths)
        .header(
            Row::new(vec!["Source", "%", "Mw", "Rrup km"])
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .title("Contributions")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(table, chunks[1]);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let bars: Vec<Bar<'_>> = rows
        .iter()
        .map(|row| {
            Bar::default()
                .value(row.percent.round().max(0.0) as u64)
                .label(TextLine::from(short_label(&row.label)))
                .style(Style::default().fg(Color::Cyan))
                .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title("Contribution (%)")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .data(BarGroup::default().bars(&bars))
        .max(100)
        .bar_gap(1)
        .bar_width(6);
    f.render_widget(chart, chunks[2]);
}

fn render_mean_values(f: &mut Frame<'_>, area: Rect, response: &DisaggResponse) {
    let mut spans = Vec::new();
    if let Some(im_value) = response.disagg_data.im_value {
        spans.push(Span::styled("IM ", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!("{}  ", format_value(im_value))));
    }
    for (name, value) in &response.disagg_data.mean_values {
        spans.push(Span::styled(
            format!("{name} "),
            Style::default().fg(Color::Yellow),
        ));
        spans.push(Span::raw(format!("{}  ", format_value(*value))));
    }
    let paragraph =
        Paragraph::new(TextLine::from(spans)).block(Block::default().title("Mean").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn short_label(label: &str) -> String {
    label.chars().take(6).collect()
}

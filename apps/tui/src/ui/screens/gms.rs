use crate::api::models::GmsResponse;
use crate::app::App;
use crate::plot::{empirical_cdf, zip_series, Series};
use crate::ui::split_form;
use crate::ui::widgets::charts::{format_value, render_series_chart, AxisScale, ChartAxes};
use crate::ui::widgets::forms::{render_form, FormField};
use crate::ui::widgets::status::render_viewer_state;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

pub fn render_gms(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (form_area, result_area) = split_form(area);

    let fields = [FormField::single("GMS run", app.forms.gms.gms_id.as_deref())];
    render_form(f, form_area, "Ground motion selection", &fields, app.field_index);

    render_viewer_state(app, f, result_area, "GMS", &app.context.gms, render_results);
}

/// IM shown for the given `[`/`]` index, wrapping over what the run has.
pub fn selected_im(response: &GmsResponse, index: usize) -> Option<&str> {
    let count = response.gcim_cdf_x.len();
    if count == 0 {
        return None;
    }
    response
        .gcim_cdf_x
        .keys()
        .nth(index % count)
        .map(String::as_str)
}

/// GCIM target distribution against the empirical CDF of the selection.
pub fn cdf_series(response: &GmsResponse, im: &str) -> Vec<Series> {
    let mut series = Vec::new();
    if let (Some(x), Some(y)) = (response.gcim_cdf_x.get(im), response.gcim_cdf_y.get(im)) {
        series.push(Series::new("GCIM", zip_series(x, y)));
    }
    if let Some(values) = response.selected_gms_im_data.get(im) {
        series.push(Series::new("Selected GMs", empirical_cdf(values)));
    }
    series.retain(|s| !s.points.is_empty());
    series
}

fn render_results(app: &App, f: &mut Frame<'_>, area: Rect, response: &GmsResponse) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(8)])
        .split(columns[1]);

    let im = selected_im(response, app.gms_im_index).unwrap_or_default();
    let title = format!("{im} distribution (IM_j {})", response.im_j);
    let axes = ChartAxes {
        title: &title,
        x_title: im,
        y_title: "CDF",
        x_scale: AxisScale::Linear,
        y_scale: AxisScale::Linear,
    };
    render_series_chart(f, columns[0], &axes, &cdf_series(response, im), |index, _| {
        if index == 0 {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::Yellow)
        }
    });

    render_selection_table(f, right[0], response);
    render_causal_bounds(f, right[1], response);
}

fn render_selection_table(f: &mut Frame<'_>, area: Rect, response: &GmsResponse) {
    let metadata_columns: Vec<&String> = response.selected_gms_metadata.keys().take(4).collect();

    let mut header = vec![Cell::from("Record")];
    header.extend(metadata_columns.iter().map(|name| Cell::from((*name).clone())));

    let rows = response.selected_gms.iter().enumerate().map(|(index, record)| {
        let mut cells = vec![Cell::from(record.clone())];
        cells.extend(metadata_columns.iter().map(|name| {
            let value = response
                .selected_gms_metadata
                .get(*name)
                .and_then(|values| values.get(index))
                .map_or_else(|| "-".to_string(), |v| format_value(*v));
            Cell::from(value)
        }));
        Row::new(cells)
    });

    let mut widths = vec![Constraint::Min(14)];
    widths.extend(metadata_columns.iter().map(|_| Constraint::Length(8)));

    let table = Table::new(rows, widths)
        .header(
            Row::new(header).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .title(format!("Selected ground motions ({})", response.selected_gms.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(table, area);
}

fn render_causal_bounds(f: &mut Frame<'_>, area: Rect, response: &GmsResponse) {
    let lines: Vec<TextLine<'_>> = response
        .causal_params_bounds
        .iter()
        .map(|(name, bounds)| {
            TextLine::from(vec![
                Span::styled(format!("{name}: "), Style::default().fg(Color::Yellow)),
                Span::raw(bounds.to_string()),
            ])
        })
        .collect();
    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Causal parameter bounds").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

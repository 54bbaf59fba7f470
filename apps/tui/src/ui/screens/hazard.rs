use crate::api::requests::HazardData;
use crate::app::App;
use crate::domain::ReturnPeriod;
use crate::plot::{curve_points, hazard_series, im_at_exceedance};
use crate::ui::split_form;
use crate::ui::widgets::charts::{render_series_chart, series_color, AxisScale, ChartAxes};
use crate::ui::widgets::forms::{render_form, FormField};
use crate::ui::widgets::status::render_viewer_state;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const MARKED_RETURN_PERIODS: [u32; 3] = [100, 500, 2500];

pub fn render_hazard(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (form_area, result_area) = split_form(area);

    let form = &app.forms.hazard;
    let fields = [
        FormField::single("Intensity measure", form.im),
        FormField::single("Component", form.component.map(|c| c.label())),
    ];
    render_form(f, form_area, "Hazard curve", &fields, app.field_index);

    render_viewer_state(app, f, result_area, "Hazard", &app.context.hazard, render_curves);
}

fn render_curves(app: &App, f: &mut Frame<'_>, area: Rect, data: &HazardData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(area);

    let series = hazard_series(data, app.show_branches);
    let x_title = app
        .forms
        .hazard
        .im
        .map_or_else(String::new, |im| format!("{im} [{}] (log10)", im.unit()));
    let axes = ChartAxes {
        title: "Annual rate of exceedance",
        x_title: &x_title,
        y_title: "rate (log10)",
        x_scale: AxisScale::Log10,
        y_scale: AxisScale::Log10,
    };
    render_series_chart(f, chunks[0], &axes, &series, |index, s| {
        if s.name.starts_with("Branch") {
            Style::default().fg(Color::DarkGray)
        } else if s.name == "NZS1170.5" {
            Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(series_color(index))
        }
    });

    let total = curve_points(&data.response.ensemble_hazard.total);
    let mut spans = vec![Span::styled("IM at ", Style::default().fg(Color::Gray))];
    for years in MARKED_RETURN_PERIODS {
        let value = im_at_exceedance(&total, ReturnPeriod(years).exceedance())
            .map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
        spans.push(Span::styled(
            format!("RP {years}: "),
            Style::default().fg(Color::Yellow),
        ));
        spans.push(Span::raw(format!("{value}  ")));
    }
    if let Some(vs30) = app.context.site_vs30() {
        spans.push(Span::styled(
            format!("Vs30 {vs30:.0} m/s  "),
            Style::default().fg(Color::Gray),
        ));
    }
    spans.push(Span::styled(
        format!(
            "branches {}",
            if app.show_branches { "on" } else { "off" }
        ),
        Style::default().fg(Color::Gray),
    ));

    let summary = Paragraph::new(TextLine::from(spans))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(summary, chunks[1]);
}

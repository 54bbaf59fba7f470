use crate::plot::{bounds, decade_bounds, Bounds, Series};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph};
use ratatui::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Linear,
    /// Points are already log10-transformed.
    Log10,
}

#[derive(Debug, Clone, Copy)]
pub struct ChartAxes<'a> {
    pub title: &'a str,
    pub x_title: &'a str,
    pub y_title: &'a str,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
}

pub const PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::Rgb(0, 0, 238),
    Color::LightRed,
    Color::LightBlue,
    Color::Gray,
];

pub const fn series_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

pub fn chart_bounds(series: &[Series], axes: &ChartAxes<'_>) -> Option<Bounds> {
    let linear = bounds(series)?;
    let decades = decade_bounds(series)?;
    let pick = |scale: AxisScale, linear: [f64; 2], decades: [f64; 2]| match scale {
        AxisScale::Log10 => decades,
        AxisScale::Linear => pad(linear),
    };
    Some(Bounds {
        x: pick(axes.x_scale, linear.x, decades.x),
        y: pick(axes.y_scale, linear.y, decades.y),
    })
}

/// Linear bounds starting at zero for non-negative data, with a little
/// headroom so the top point is not drawn on the border.
fn pad(bounds: [f64; 2]) -> [f64; 2] {
    let low = if bounds[0] >= 0.0 { 0.0 } else { bounds[0] };
    let span = (bounds[1] - low).abs();
    let high = if span < f64::EPSILON {
        low + 1.0
    } else {
        bounds[1] + span * 0.05
    };
    [low, high]
}

pub fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude == 0.0 {
        "0".to_string()
    } else if !(0.01..10_000.0).contains(&magnitude) {
        format!("{value:.1e}")
    } else if magnitude < 1.0 {
        format!("{value:.3}")
    } else {
        format!("{value:.1}")
    }
}

pub fn axis_labels(bounds: [f64; 2], scale: AxisScale) -> Vec<Span<'static>> {
    match scale {
        AxisScale::Linear => {
            let mid = (bounds[0] + bounds[1]) / 2.0;
            [bounds[0], mid, bounds[1]]
                .into_iter()
                .map(|value| Span::raw(format_value(value)))
                .collect()
        }
        AxisScale::Log10 => {
            #[allow(clippy::cast_possible_truncation)]
            let (first, last) = (bounds[0].floor() as i32, bounds[1].ceil() as i32);
            let count = (last - first).max(1);
            let step = ((count + 4) / 5).max(1);
            (first..=last)
                .step_by(usize::try_from(step).unwrap_or(1))
                .map(|decade| Span::raw(format!("1e{decade}")))
                .collect()
        }
    }
}

pub fn render_placeholder(f: &mut Frame<'_>, area: Rect, title: &str, message: &str) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new(message.to_string())
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

/// Line chart of every series; `style_for` picks each series' style.
pub fn render_series_chart(
    f: &mut Frame<'_>,
    area: Rect,
    axes: &ChartAxes<'_>,
    series: &[Series],
    style_for: impl Fn(usize, &Series) -> Style,
) {
    let Some(bounds) = chart_bounds(series, axes) else {
        render_placeholder(f, area, axes.title, "No data to plot");
        return;
    };

    let datasets: Vec<Dataset<'_>> = series
        .iter()
        .enumerate()
        .map(|(index, s)| {
            Dataset::default()
                .name(s.name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(style_for(index, s))
                .data(&s.points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(axes.title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .legend_position(Some(LegendPosition::TopRight))
        .x_axis(
            Axis::default()
                .title(axes.x_title.to_string())
                .style(Style::default().fg(Color::Gray))
                .bounds(bounds.x)
                .labels(axis_labels(bounds.x, axes.x_scale)),
        )
        .y_axis(
            Axis::default()
                .title(axes.y_title.to_string())
                .style(Style::default().fg(Color::Gray))
                .bounds(bounds.y)
                .labels(axis_labels(bounds.y, axes.y_scale)),
        );

    f.render_widget(chart, area);
}

use crate::api::models::ScenarioResponse;
use crate::app::App;
use crate::plot::{scenario_spectra, Series};
use crate::ui::split_form;
use crate::ui::widgets::charts::{render_series_chart, series_color, AxisScale, ChartAxes};
use crate::ui::widgets::forms::{render_form, FormField};
use crate::ui::widgets::status::render_viewer_state;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::Frame;

/// Ruptures drawn at once; a chart with more lines is unreadable.
const MAX_RUPTURES: usize = 4;

pub fn render_scenario(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (form_area, result_area) = split_form(area);

    let form = &app.forms.scenario;
    let fields = [
        FormField::single("Component", form.component.map(|c| c.label())),
        FormField::multi("Intensity measures", &app.options.ims, &form.ims, form.cursor),
    ];
    render_form(f, form_area, "Scenarios", &fields, app.field_index);

    render_viewer_state(
        app,
        f,
        result_area,
        "Scenarios",
        &app.context.scenario,
        render_spectra,
    );
}

/// Median line plus lower and upper band per rupture, in that order.
pub fn scenario_series(response: &ScenarioResponse, limit: usize) -> Vec<Series> {
    scenario_spectra(&response.ensemble_scenario)
        .into_iter()
        .take(limit)
        .flat_map(|spectrum| {
            [
                Series::new(spectrum.rupture.clone(), spectrum.median),
                Series::new(format!("{} -1σ", spectrum.rupture), spectrum.lower),
                Series::new(format!("{} +1σ", spectrum.rupture), spectrum.upper),
            ]
        })
        .collect()
}

fn render_spectra(_app: &App, f: &mut Frame<'_>, area: Rect, response: &ScenarioResponse) {
    let series = scenario_series(response, MAX_RUPTURES);
    let axes = ChartAxes {
        title: "Scenario spectra (median, ±1σ)",
        x_title: "Period (s)",
        y_title: "SA (g)",
        x_scale: AxisScale::Linear,
        y_scale: AxisScale::Linear,
    };
    render_series_chart(f, area, &axes, &series, |index, _| {
        let color = series_color(index / 3);
        if index % 3 == 0 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        }
    });
}

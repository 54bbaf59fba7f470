use crate::api::requests::UhsData;
use crate::app::App;
use crate::plot::{uhs_series, Series};
use crate::ui::split_form;
use crate::ui::widgets::charts::{render_series_chart, series_color, AxisScale, ChartAxes};
use crate::ui::widgets::forms::{render_form, FormField};
use crate::ui::widgets::status::render_viewer_state;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::Frame;

pub fn render_uhs(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (form_area, result_area) = split_form(area);

    let form = &app.forms.uhs;
    let fields = [
        FormField::single("Component", form.component.map(|c| c.label())),
        FormField::multi("Return periods", &app.options.uhs_rps, &form.rps, form.cursor),
    ];
    render_form(f, form_area, "UHS", &fields, app.field_index);

    render_viewer_state(app, f, result_area, "UHS", &app.context.uhs, render_spectra);
}

/// Ensemble spectra, then NZS1170.5 spectra, then branches when shown.
pub fn spectra_series(data: &UhsData, include_branches: bool) -> Vec<Series> {
    let mut series = uhs_series(&data.response.uhs_results, "");
    series.extend(uhs_series(&data.nz_code, "NZS1170.5 "));
    if include_branches {
        series.extend(uhs_series(&data.response.branch_uhs_results, ""));
    }
    series
}

fn render_spectra(app: &App, f: &mut Frame<'_>, area: Rect, data: &UhsData) {
    let series = spectra_series(data, app.show_branches);
    let axes = ChartAxes {
        title: "Uniform hazard spectra",
        x_title: "Period (s)",
        y_title: "SA (g)",
        x_scale: AxisScale::Linear,
        y_scale: AxisScale::Linear,
    };
    render_series_chart(f, area, &axes, &series, |index, s| {
        if s.name.starts_with("NZS1170.5") {
            Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD)
        } else if s.name.contains('(') {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(series_color(index))
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{UhsResponse, UhsSpectrum};

    fn spectrum(exceedance: f64, branch: Option<&str>) -> UhsSpectrum {
        UhsSpectrum {
            exceedance,
            period_values: vec![0.0, 1.0],
            sa_values: vec![0.4, 0.2],
            branch_name: branch.map(ToString::to_string),
        }
    }

    #[test]
    fn branches_only_when_asked_for() {
        let data = UhsData {
            response: UhsResponse {
                uhs_results: vec![spectrum(1.0 / 500.0, None)],
                branch_uhs_results: vec![spectrum(1.0 / 500.0, Some("A"))],
                download_token: None,
            },
            nz_code: vec![spectrum(1.0 / 500.0, None)],
        };
        let names: Vec<String> = spectra_series(&data, false).into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["RP 500", "NZS1170.5 RP 500"]);
        assert_eq!(spectra_series(&data, true).len(), 3);
    }
}

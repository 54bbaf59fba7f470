//! Turns backend payloads into plot-ready point series.

use std::collections::BTreeMap;

use crate::api::models::{Curve, DisaggResponse, ScenarioData, UhsSpectrum};
use crate::api::requests::HazardData;
use crate::domain::{Im, ReturnPeriod};

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

/// Curve keys are IM levels as strings. Non-positive or unparsable points
/// cannot be shown on log axes and are dropped.
pub fn curve_points(curve: &Curve) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = curve
        .iter()
        .filter_map(|(level, rate)| Some((level.parse::<f64>().ok()?, *rate)))
        .filter(|(x, y)| x.is_finite() && y.is_finite() && *x > 0.0 && *y > 0.0)
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points
}

pub fn log_points(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    points
        .iter()
        .filter(|(x, y)| *x > 0.0 && *y > 0.0)
        .map(|(x, y)| (x.log10(), y.log10()))
        .collect()
}

/// Bounds of already log-transformed series, widened to whole decades.
pub fn decade_bounds(series: &[Series]) -> Option<Bounds> {
    let bounds = bounds(series)?;
    Some(Bounds {
        x: [bounds.x[0].floor(), bounds.x[1].ceil().max(bounds.x[0].floor() + 1.0)],
        y: [bounds.y[0].floor(), bounds.y[1].ceil().max(bounds.y[0].floor() + 1.0)],
    })
}

pub fn bounds(series: &[Series]) -> Option<Bounds> {
    let mut points = series.iter().flat_map(|s| s.points.iter().copied());
    let (x0, y0) = points.next()?;
    let mut b = Bounds {
        x: [x0, x0],
        y: [y0, y0],
    };
    for (x, y) in points {
        b.x = [b.x[0].min(x), b.x[1].max(x)];
        b.y = [b.y[0].min(y), b.y[1].max(y)];
    }
    Some(b)
}

/// Hazard curves in log10/log10 space: ensemble total, fault and DS
/// contributions, then branches, then the NZS1170.5 curve if present.
pub fn hazard_series(data: &HazardData, include_branches: bool) -> Vec<Series> {
    let ensemble = &data.response.ensemble_hazard;
    let mut series = vec![
        Series::new("Total", log_points(&curve_points(&ensemble.total))),
        Series::new("Fault", log_points(&curve_points(&ensemble.fault))),
        Series::new("Distributed", log_points(&curve_points(&ensemble.ds))),
    ];

    if include_branches {
        series.extend(data.response.branches_hazard.iter().map(|(name, set)| {
            Series::new(
                format!("Branch {name}"),
                log_points(&curve_points(&set.total)),
            )
        }));
    }

    if let Some(nz_code) = &data.nz_code {
        series.push(Series::new(
            "NZS1170.5",
            log_points(&curve_points(nz_code)),
        ));
    }

    series.retain(|s| !s.points.is_empty());
    series
}

/// IM level at which a (linear space) hazard curve reaches `exceedance`,
/// interpolated in log-log space.
pub fn im_at_exceedance(points: &[(f64, f64)], exceedance: f64) -> Option<f64> {
    if exceedance <= 0.0 {
        return None;
    }
    let target = exceedance.log10();
    points.windows(2).find_map(|pair| {
        let (x0, y0) = (pair[0].0.log10(), pair[0].1.log10());
        let (x1, y1) = (pair[1].0.log10(), pair[1].1.log10());
        let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        if target < lo || target > hi {
            return None;
        }
        if (y1 - y0).abs() < f64::EPSILON {
            return Some(10_f64.powf(x0));
        }
        let t = (target - y0) / (y1 - y0);
        Some(10_f64.powf(x0 + t * (x1 - x0)))
    })
}

fn spectrum_points(spectrum: &UhsSpectrum) -> Vec<(f64, f64)> {
    let mut points: Vec<(f64, f64)> = spectrum
        .period_values
        .iter()
        .copied()
        .zip(spectrum.sa_values.iter().copied())
        .filter(|(period, sa)| period.is_finite() && sa.is_finite() && *period >= 0.0)
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points
}

fn rp_label(exceedance: f64) -> String {
    ReturnPeriod::from_exceedance(exceedance)
        .map_or_else(|| format!("{exceedance:.2e}"), |rp| format!("RP {rp}"))
}

/// One spectrum per return period, sorted by period with PGA at zero.
pub fn uhs_series(spectra: &[UhsSpectrum], prefix: &str) -> Vec<Series> {
    let mut sorted: Vec<&UhsSpectrum> = spectra.iter().collect();
    sorted.sort_by(|a, b| b.exceedance.total_cmp(&a.exceedance));

    sorted
        .into_iter()
        .map(|spectrum| {
            let mut name = format!("{prefix}{}", rp_label(spectrum.exceedance));
            if let Some(branch) = &spectrum.branch_name {
                name.push_str(&format!(" ({branch})"));
            }
            Series::new(name, spectrum_points(spectrum))
        })
        .filter(|s| !s.points.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub label: String,
    pub percent: f64,
    pub magnitude: Option<f64>,
    pub rrup: Option<f64>,
}

/// Largest contributions first; everything past `limit` is summed into a
/// trailing "Other" row.
pub fn top_contributions(response: &DisaggResponse, limit: usize) -> Vec<Contribution> {
    let extra = &response.extra_info;
    let mut rows: Vec<Contribution> = response
        .disagg_data
        .total_contribution
        .iter()
        .filter(|(_, value)| value.is_finite() && **value > 0.0)
        .map(|(id, value)| Contribution {
            label: contribution_label(id, &extra.rupture_name),
            percent: value * 100.0,
            magnitude: extra.magnitude.get(id).copied(),
            rrup: extra.rrup.get(id).copied(),
        })
        .collect();
    rows.sort_by(|a, b| b.percent.total_cmp(&a.percent).then_with(|| a.label.cmp(&b.label)));

    if rows.len() > limit {
        let other: f64 = rows[limit..].iter().map(|row| row.percent).sum();
        rows.truncate(limit);
        rows.push(Contribution {
            label: "Other".to_string(),
            percent: other,
            magnitude: None,
            rrup: None,
        });
    }

    rows
}

fn contribution_label(id: &str, names: &BTreeMap<String, String>) -> String {
    if id == "distributed_seismicity" {
        return "Distributed seismicity".to_string();
    }
    names.get(id).cloned().unwrap_or_else(|| id.to_string())
}

/// Empirical CDF of a sample: sorted values against (i + 1) / n.
pub fn empirical_cdf(values: &[f64]) -> Vec<(f64, f64)> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    #[allow(clippy::cast_precision_loss)]
    let n = sorted.len() as f64;
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            #[allow(clippy::cast_precision_loss)]
            let rank = (i + 1) as f64;
            (value, rank / n)
        })
        .collect()
}

pub fn zip_series(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter()
        .copied()
        .zip(y.iter().copied())
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSpectrum {
    pub rupture: String,
    pub median: Vec<(f64, f64)>,
    pub lower: Vec<(f64, f64)>,
    pub upper: Vec<(f64, f64)>,
}

/// Median spectra per rupture with a +/- one sigma lognormal band. Only
/// spectral IMs have a period to plot against.
pub fn scenario_spectra(data: &ScenarioData) -> Vec<ScenarioSpectrum> {
    let periods: Vec<Option<f64>> = data
        .ims
        .iter()
        .map(|im| Im::parse(im).and_then(|im| im.period()))
        .collect();

    data.mu_data
        .iter()
        .map(|(rupture, medians)| {
            let sigmas = data.sigma_data.get(rupture);
            let mut median = Vec::new();
            let mut lower = Vec::new();
            let mut upper = Vec::new();

            for (index, (period, mu)) in periods.iter().zip(medians).enumerate() {
                let Some(period) = period else { continue };
                if !mu.is_finite() {
                    continue;
                }
                let sigma = sigmas
                    .and_then(|s| s.get(index))
                    .copied()
                    .filter(|s| s.is_finite())
                    .unwrap_or(0.0);
                median.push((*period, *mu));
                lower.push((*period, mu * (-sigma).exp()));
                upper.push((*period, mu * sigma.exp()));
            }

            let by_period = |a: &(f64, f64), b: &(f64, f64)| a.0.total_cmp(&b.0);
            median.sort_by(by_period);
            lower.sort_by(by_period);
            upper.sort_by(by_period);

            ScenarioSpectrum {
                rupture: rupture.clone(),
                median,
                lower,
                upper,
            }
        })
        .filter(|spectrum| !spectrum.median.is_empty())
        .collect()
}

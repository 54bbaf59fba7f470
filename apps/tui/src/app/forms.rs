//! Per-viewer input forms. A form is only submittable when every selection
//! is one the loaded project actually offers.

use crate::api::requests::ProjectMetadata;
use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::domain::{parse_ims, Component, Im, ReturnPeriod};

/// Choices the loaded project offers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormOptions {
    pub ims: Vec<Im>,
    pub components: Vec<Component>,
    pub disagg_rps: Vec<ReturnPeriod>,
    pub uhs_rps: Vec<ReturnPeriod>,
    pub gms_ids: Vec<String>,
}

impl FormOptions {
    pub fn from_metadata(metadata: &ProjectMetadata) -> Self {
        let mut components: Vec<Component> = Vec::new();
        for component in metadata.ims.components.iter().filter_map(|c| Component::parse(c)) {
            if !components.contains(&component) {
                components.push(component);
            }
        }

        Self {
            ims: parse_ims(metadata.ims.ims.iter().map(String::as_str)),
            components,
            disagg_rps: metadata.disagg_rps.clone(),
            uhs_rps: metadata.uhs_rps.clone(),
            gms_ids: metadata
                .gms_runs
                .gms_runs
                .iter()
                .map(|run| run.id.clone())
                .collect(),
        }
    }

    pub fn spectral_ims(&self) -> Vec<Im> {
        self.ims.iter().copied().filter(Im::is_spectral).collect()
    }
}

/// Next (or previous) entry of `options` after `current`, wrapping. With no
/// current value the first entry is picked.
pub fn cycle<T: PartialEq + Clone>(options: &[T], current: Option<&T>, forward: bool) -> Option<T> {
    if options.is_empty() {
        return None;
    }
    let index = match current.and_then(|value| options.iter().position(|o| o == value)) {
        Some(index) if forward => wrap_increment(index, options.len()),
        Some(index) => wrap_decrement(index, options.len()),
        None => 0,
    };
    options.get(index).cloned()
}

fn toggle<T: PartialEq + Clone>(selected: &mut Vec<T>, value: &T) {
    if let Some(position) = selected.iter().position(|v| v == value) {
        selected.remove(position);
    } else {
        selected.push(value.clone());
    }
}

fn offered<T: PartialEq>(options: &[T], value: Option<&T>) -> bool {
    value.is_some_and(|value| options.contains(value))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HazardForm {
    pub im: Option<Im>,
    pub component: Option<Component>,
}

impl HazardForm {
    pub fn is_valid(&self, options: &FormOptions) -> bool {
        offered(&options.ims, self.im.as_ref()) && offered(&options.components, self.component.as_ref())
    }

    pub fn request(&self, options: &FormOptions) -> Option<(Im, Component)> {
        if !self.is_valid(options) {
            return None;
        }
        Some((self.im?, self.component?))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisaggForm {
    pub im: Option<Im>,
    pub component: Option<Component>,
    pub rp: Option<ReturnPeriod>,
}

impl DisaggForm {
    pub fn is_valid(&self, options: &FormOptions) -> bool {
        offered(&options.ims, self.im.as_ref())
            && offered(&options.components, self.component.as_ref())
            && offered(&options.disagg_rps, self.rp.as_ref())
    }

    pub fn request(&self, options: &FormOptions) -> Option<(Im, Component, ReturnPeriod)> {
        if !self.is_valid(options) {
            return None;
        }
        Some((self.im?, self.component?, self.rp?))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UhsForm {
    pub component: Option<Component>,
    pub rps: Vec<ReturnPeriod>,
    pub cursor: usize,
}

impl UhsForm {
    pub fn toggle_at_cursor(&mut self, options: &FormOptions) {
        if let Some(rp) = options.uhs_rps.get(self.cursor) {
            toggle(&mut self.rps, rp);
            self.rps.sort_unstable();
        }
    }

    pub fn is_valid(&self, options: &FormOptions) -> bool {
        offered(&options.components, self.component.as_ref())
            && !self.rps.is_empty()
            && self.rps.iter().all(|rp| options.uhs_rps.contains(rp))
    }

    pub fn request(&self, options: &FormOptions) -> Option<(Component, Vec<ReturnPeriod>)> {
        if !self.is_valid(options) {
            return None;
        }
        Some((self.component?, self.rps.clone()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GmsForm {
    pub gms_id: Option<String>,
}

impl GmsForm {
    pub fn is_valid(&self, options: &FormOptions) -> bool {
        offered(&options.gms_ids, self.gms_id.as_ref())
    }

    pub fn request(&self, options: &FormOptions) -> Option<String> {
        if !self.is_valid(options) {
            return None;
        }
        self.gms_id.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioForm {
    pub component: Option<Component>,
    pub ims: Vec<Im>,
    pub cursor: usize,
}

impl ScenarioForm {
    pub fn toggle_at_cursor(&mut self, options: &FormOptions) {
        if let Some(im) = options.ims.get(self.cursor) {
            toggle(&mut self.ims, im);
            self.ims = crate::domain::sort_ims(std::mem::take(&mut self.ims));
        }
    }

    pub fn is_valid(&self, options: &FormOptions) -> bool {
        offered(&options.components, self.component.as_ref())
            && !self.ims.is_empty()
            && self.ims.iter().all(|im| options.ims.contains(im))
    }

    pub fn request(&self, options: &FormOptions) -> Option<(Component, Vec<Im>)> {
        if !self.is_valid(options) {
            return None;
        }
        Some((self.component?, self.ims.clone()))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forms {
    pub hazard: HazardForm,
    pub disagg: DisaggForm,
    pub uhs: UhsForm,
    pub gms: GmsForm,
    pub scenario: ScenarioForm,
}

impl Forms {
    /// Fresh forms pre-filled with the first offered value of each field.
    pub fn with_defaults(options: &FormOptions) -> Self {
        let im = options.ims.first().copied();
        let component = options.components.first().copied();
        Self {
            hazard: HazardForm { im, component },
            disagg: DisaggForm {
                im,
                component,
                rp: options.disagg_rps.first().copied(),
            },
            uhs: UhsForm {
                component,
                rps: options.uhs_rps.first().copied().into_iter().collect(),
                cursor: 0,
            },
            gms: GmsForm {
                gms_id: options.gms_ids.first().cloned(),
            },
            scenario: ScenarioForm {
                component,
                ims: options.spectral_ims(),
                cursor: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{GmsRun, GmsRuns, ProjectIms};
    use crate::domain::ImKind;

    fn options() -> FormOptions {
        let metadata = ProjectMetadata {
            ims: ProjectIms {
                ims: vec!["pSA_1.0".to_string(), "PGA".to_string(), "PGV".to_string()],
                components: vec!["RotD50".to_string(), "bogus".to_string()],
            },
            disagg_rps: vec![ReturnPeriod(500), ReturnPeriod(2500)],
            uhs_rps: vec![ReturnPeriod(100), ReturnPeriod(500)],
            gms_runs: GmsRuns {
                gms_runs: vec![GmsRun {
                    id: "gms_1".to_string(),
                    im_j: "pSA_1.0".to_string(),
                    im_vector: Vec::new(),
                    n_gms: 20,
                    rp: Some(500),
                }],
            },
            ..ProjectMetadata::default()
        };
        FormOptions::from_metadata(&metadata)
    }

    #[test]
    fn options_are_parsed_and_sorted() {
        let options = options();
        assert_eq!(
            options.ims,
            vec![Im::scalar(ImKind::Pga), Im::scalar(ImKind::Pgv), Im::psa(1.0)]
        );
        assert_eq!(options.components, vec![Component::RotD50]);
        assert_eq!(options.spectral_ims().len(), 2);
    }

    #[test]
    fn repeated_components_are_listed_once() {
        let metadata = ProjectMetadata {
            ims: ProjectIms {
                ims: vec!["PGA".to_string()],
                components: vec![
                    "RotD50".to_string(),
                    "geom".to_string(),
                    "RotD50".to_string(),
                ],
            },
            ..ProjectMetadata::default()
        };
        let options = FormOptions::from_metadata(&metadata);
        assert_eq!(options.components, vec![Component::RotD50, Component::Geom]);
    }

    #[test]
    fn defaults_make_every_form_valid() {
        let options = options();
        let forms = Forms::with_defaults(&options);
        assert!(forms.hazard.is_valid(&options));
        assert!(forms.disagg.is_valid(&options));
        assert!(forms.uhs.is_valid(&options));
        assert!(forms.gms.is_valid(&options));
        assert!(forms.scenario.is_valid(&options));
    }

    #[test]
    fn invalid_combination_disables_get() {
        let options = options();
        let form = DisaggForm {
            im: Some(Im::psa(1.0)),
            component: Some(Component::Ver),
            rp: Some(ReturnPeriod(500)),
        };
        assert!(!form.is_valid(&options));
        assert_eq!(form.request(&options), None);

        let form = DisaggForm {
            component: Some(Component::RotD50),
            rp: Some(ReturnPeriod(100)),
            ..form
        };
        assert!(!form.is_valid(&options));
    }

    #[test]
    fn uhs_requires_at_least_one_return_period() {
        let options = options();
        let mut form = Forms::with_defaults(&options).uhs;
        form.toggle_at_cursor(&options);
        assert!(form.rps.is_empty());
        assert!(!form.is_valid(&options));

        form.cursor = 1;
        form.toggle_at_cursor(&options);
        assert_eq!(
            form.request(&options),
            Some((Component::RotD50, vec![ReturnPeriod(500)]))
        );
    }

    #[test]
    fn scenario_toggling_keeps_ims_sorted() {
        let options = options();
        let mut form = ScenarioForm {
            component: Some(Component::RotD50),
            ims: vec![Im::psa(1.0)],
            cursor: 0,
        };
        form.toggle_at_cursor(&options);
        assert_eq!(form.ims, vec![Im::scalar(ImKind::Pga), Im::psa(1.0)]);
    }

    #[test]
    fn cycle_wraps_in_both_directions() {
        let values = [1, 2, 3];
        assert_eq!(cycle(&values, Some(&3), true), Some(1));
        assert_eq!(cycle(&values, Some(&1), false), Some(3));
        assert_eq!(cycle(&values, None, false), Some(1));
        assert_eq!(cycle::<i32>(&[], Some(&1), true), None);
    }
}

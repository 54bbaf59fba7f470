//! Response payloads of the hazard API. Shapes are owned by the backend;
//! only the keys the viewers read are typed, the rest is ignored.

use std::collections::BTreeMap;

use serde::Deserialize;

/// IM level (as the backend's string key) to annual exceedance rate.
pub type Curve = BTreeMap<String, f64>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ProjectIds(pub BTreeMap<String, String>);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectSite {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub vs30: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ProjectSites(pub BTreeMap<String, ProjectSite>);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectIms {
    pub ims: Vec<String>,
    #[serde(default)]
    pub components: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectReturnPeriods {
    pub rps: Vec<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HazardCurveSet {
    #[serde(default)]
    pub total: Curve,
    #[serde(default)]
    pub fault: Curve,
    #[serde(default)]
    pub ds: Curve,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HazardResponse {
    pub ensemble_hazard: HazardCurveSet,
    #[serde(default)]
    pub branches_hazard: BTreeMap<String, HazardCurveSet>,
    #[serde(default)]
    pub download_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NzCodeHazardResponse {
    pub nz1170p5_hazard: Curve,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisaggData {
    #[serde(default)]
    pub mean_values: BTreeMap<String, f64>,
    #[serde(default)]
    pub total_contribution: BTreeMap<String, f64>,
    #[serde(default)]
    pub im_value: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisaggExtraInfo {
    #[serde(default)]
    pub rupture_name: BTreeMap<String, String>,
    #[serde(default)]
    pub magnitude: BTreeMap<String, f64>,
    #[serde(default)]
    pub rrup: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisaggResponse {
    pub disagg_data: DisaggData,
    #[serde(default)]
    pub extra_info: DisaggExtraInfo,
    #[serde(default)]
    pub download_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UhsSpectrum {
    pub exceedance: f64,
    pub period_values: Vec<f64>,
    pub sa_values: Vec<f64>,
    #[serde(default)]
    pub branch_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UhsResponse {
    pub uhs_results: Vec<UhsSpectrum>,
    #[serde(default)]
    pub branch_uhs_results: Vec<UhsSpectrum>,
    #[serde(default)]
    pub download_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NzCodeUhsResponse {
    pub nz1170p5_uhs: Vec<UhsSpectrum>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GmsRun {
    pub id: String,
    pub im_j: String,
    #[serde(default)]
    pub im_vector: Vec<String>,
    pub n_gms: u32,
    #[serde(default)]
    pub rp: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GmsRuns {
    pub gms_runs: Vec<GmsRun>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GmsResponse {
    pub im_j: String,
    pub selected_gms: Vec<String>,
    #[serde(default)]
    pub selected_gms_metadata: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub selected_gms_im_data: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub gcim_cdf_x: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub gcim_cdf_y: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub causal_params_bounds: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub download_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScenarioData {
    pub ims: Vec<String>,
    /// Rupture name to median IM values, aligned with `ims`.
    pub mu_data: BTreeMap<String, Vec<f64>>,
    /// Rupture name to lognormal standard deviation, aligned with `ims`.
    #[serde(default)]
    pub sigma_data: BTreeMap<String, Vec<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioResponse {
    pub ensemble_scenario: ScenarioData,
    #[serde(default)]
    pub download_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hazard_response_ignores_unknown_keys() -> Result<(), serde_json::Error> {
        let json = r#"{
            "ensemble_hazard": {"total": {"0.1": 0.01, "0.5": 0.001}, "im": "PGA"},
            "branches_hazard": {"A": {"total": {"0.1": 0.02}}},
            "download_token": "abc",
            "percentiles": {"16th": {}}
        }"#;
        let response: HazardResponse = serde_json::from_str(json)?;
        assert_eq!(response.ensemble_hazard.total.len(), 2);
        assert!(response.ensemble_hazard.fault.is_empty());
        assert_eq!(response.branches_hazard.len(), 1);
        assert_eq!(response.download_token.as_deref(), Some("abc"));
        Ok(())
    }

    #[test]
    fn sites_deserialize_from_station_map() -> Result<(), serde_json::Error> {
        let json = r#"{"WTMC": {"name": "Wellington", "lat": -41.28, "lon": 174.77, "vs30": 500.0}}"#;
        let sites: ProjectSites = serde_json::from_str(json)?;
        let site = &sites.0["WTMC"];
        assert_eq!(site.name, "Wellington");
        assert_eq!(site.vs30, Some(500.0));
        Ok(())
    }

    #[test]
    fn disagg_extra_info_is_optional() -> Result<(), serde_json::Error> {
        let json = r#"{"disagg_data": {"total_contribution": {"r1": 0.6, "distributed_seismicity": 0.4}}}"#;
        let response: DisaggResponse = serde_json::from_str(json)?;
        assert_eq!(response.disagg_data.total_contribution.len(), 2);
        assert!(response.extra_info.rupture_name.is_empty());
        assert!(response.download_token.is_none());
        Ok(())
    }
}

use tracing::info;

use crate::api::client::ApiClient;
use crate::api::endpoints::Route;
use crate::api::error::ApiError;
use crate::api::models::{
    Curve, DisaggResponse, GmsResponse, GmsRuns, HazardResponse, NzCodeHazardResponse,
    NzCodeUhsResponse, ProjectIds, ProjectIms, ProjectReturnPeriods, ProjectSites,
    ScenarioResponse, UhsResponse, UhsSpectrum,
};
use crate::api::query::QueryString;
use crate::domain::{Component, Im, ReturnPeriod};

/// A station within a project; every result query is keyed by both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRef {
    pub project_id: String,
    pub station_id: String,
}

impl SiteRef {
    fn query(&self) -> QueryString {
        QueryString::new()
            .param("project_id", &self.project_id)
            .param("station_id", &self.station_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectMetadata {
    pub sites: ProjectSites,
    pub ims: ProjectIms,
    pub disagg_rps: Vec<ReturnPeriod>,
    pub uhs_rps: Vec<ReturnPeriod>,
    pub gms_runs: GmsRuns,
}

#[derive(Debug, Clone)]
pub struct HazardData {
    pub response: HazardResponse,
    pub nz_code: Option<Curve>,
}

#[derive(Debug, Clone)]
pub struct UhsData {
    pub response: UhsResponse,
    pub nz_code: Vec<UhsSpectrum>,
}

pub async fn project_ids(client: &ApiClient) -> Result<ProjectIds, ApiError> {
    client.get_json(Route::ProjectIds, &QueryString::new()).await
}

/// Everything the forms need for one project, fetched concurrently.
pub async fn project_metadata(
    client: &ApiClient,
    project_id: &str,
) -> Result<ProjectMetadata, ApiError> {
    let query = QueryString::new().param("project_id", project_id);

    let (sites, ims, disagg_rps, uhs_rps, gms_runs) = tokio::try_join!(
        client.get_json::<ProjectSites>(Route::Sites, &query),
        client.get_json::<ProjectIms>(Route::Ims, &query),
        client.get_json::<ProjectReturnPeriods>(Route::DisaggRps, &query),
        client.get_json::<ProjectReturnPeriods>(Route::UhsRps, &query),
        client.get_json::<GmsRuns>(Route::GmsRuns, &query),
    )?;

    info!(
        project_id,
        sites = sites.0.len(),
        ims = ims.ims.len(),
        "loaded project metadata"
    );

    Ok(ProjectMetadata {
        sites,
        ims,
        disagg_rps: into_return_periods(disagg_rps),
        uhs_rps: into_return_periods(uhs_rps),
        gms_runs,
    })
}

fn into_return_periods(rps: ProjectReturnPeriods) -> Vec<ReturnPeriod> {
    let mut rps: Vec<ReturnPeriod> = rps
        .rps
        .into_iter()
        .filter(|rp| *rp > 0)
        .map(ReturnPeriod)
        .collect();
    rps.sort_unstable();
    rps.dedup();
    rps
}

pub fn hazard_query(site: &SiteRef, im: Im, component: Component) -> QueryString {
    site.query()
        .param("im", im)
        .param("im_component", component.as_str())
}

/// Hazard curve plus, for spectral IMs, the NZS1170.5 code curve.
pub async fn hazard(
    client: &ApiClient,
    site: &SiteRef,
    im: Im,
    component: Component,
) -> Result<HazardData, ApiError> {
    let query = hazard_query(site, im, component);

    if !im.is_spectral() {
        let response = client.get_json::<HazardResponse>(Route::Hazard, &query).await?;
        return Ok(HazardData {
            response,
            nz_code: None,
        });
    }

    let (response, nz_code) = tokio::try_join!(
        client.get_json::<HazardResponse>(Route::Hazard, &query),
        client.get_json::<NzCodeHazardResponse>(Route::HazardNzCode, &query),
    )?;

    Ok(HazardData {
        response,
        nz_code: Some(nz_code.nz1170p5_hazard),
    })
}

pub fn disagg_query(site: &SiteRef, im: Im, component: Component, rp: ReturnPeriod) -> QueryString {
    hazard_query(site, im, component).param("rp", rp)
}

pub async fn disagg(
    client: &ApiClient,
    site: &SiteRef,
    im: Im,
    component: Component,
    rp: ReturnPeriod,
) -> Result<DisaggResponse, ApiError> {
    client
        .get_json(Route::Disagg, &disagg_query(site, im, component, rp))
        .await
}

pub fn uhs_query(site: &SiteRef, component: Component, rps: &[ReturnPeriod]) -> QueryString {
    site.query()
        .param("im_component", component.as_str())
        .param_list("rp", rps)
}

pub async fn uhs(
    client: &ApiClient,
    site: &SiteRef,
    component: Component,
    rps: &[ReturnPeriod],
) -> Result<UhsData, ApiError> {
    let query = uhs_query(site, component, rps);

    let (response, nz_code) = tokio::try_join!(
        client.get_json::<UhsResponse>(Route::Uhs, &query),
        client.get_json::<NzCodeUhsResponse>(Route::UhsNzCode, &query),
    )?;

    Ok(UhsData {
        response,
        nz_code: nz_code.nz1170p5_uhs,
    })
}

pub fn gms_query(site: &SiteRef, gms_id: &str) -> QueryString {
    site.query().param("gms_id", gms_id)
}

pub async fn gms(client: &ApiClient, site: &SiteRef, gms_id: &str) -> Result<GmsResponse, ApiError> {
    client.get_json(Route::Gms, &gms_query(site, gms_id)).await
}

pub fn scenario_query(site: &SiteRef, component: Component, ims: &[Im]) -> QueryString {
    site.query()
        .param("im_component", component.as_str())
        .param_list("ims", ims)
}

pub async fn scenario(
    client: &ApiClient,
    site: &SiteRef,
    component: Component,
    ims: &[Im],
) -> Result<ScenarioResponse, ApiError> {
    client
        .get_json(Route::Scenarios, &scenario_query(site, component, ims))
        .await
}

pub async fn download(client: &ApiClient, route: Route, token: &str) -> Result<Vec<u8>, ApiError> {
    client
        .get_bytes(route, &QueryString::new().param("download_token", token))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::{config, request_lines, serve_once, serve_routes};
    use crate::domain::ImKind;

    fn site() -> SiteRef {
        SiteRef {
            project_id: "gnzl".to_string(),
            station_id: "WTMC".to_string(),
        }
    }

    #[test]
    fn disagg_query_carries_every_selection() {
        let query = disagg_query(&site(), Im::psa(0.5), Component::RotD50, ReturnPeriod(500));
        assert_eq!(
            query.encode(),
            "project_id=gnzl&station_id=WTMC&im=pSA_0.5&im_component=RotD50&rp=500"
        );
    }

    #[test]
    fn uhs_query_joins_return_periods() {
        let query = uhs_query(
            &site(),
            Component::Larger,
            &[ReturnPeriod(100), ReturnPeriod(2500)],
        );
        assert_eq!(
            query.encode(),
            "project_id=gnzl&station_id=WTMC&im_component=Larger&rp=100%2C2500"
        );
    }

    #[test]
    fn scenario_query_lists_ims() {
        let query = scenario_query(
            &site(),
            Component::RotD50,
            &[Im::scalar(ImKind::Pga), Im::psa(1.0)],
        );
        assert!(query.encode().ends_with("ims=PGA%2CpSA_1.0"));
    }

    #[tokio::test]
    async fn non_spectral_hazard_skips_code_request() -> Result<(), Box<dyn std::error::Error>> {
        let (base, _request) =
            serve_once("200 OK", r#"{"ensemble_hazard": {"total": {"10": 0.01}}}"#).await?;
        let client = ApiClient::new(&config(base, None))?;

        let data = hazard(
            &client,
            &site(),
            Im::scalar(ImKind::Pgv),
            Component::RotD50,
        )
        .await?;
        assert!(data.nz_code.is_none());
        assert_eq!(data.response.ensemble_hazard.total.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn spectral_hazard_also_fetches_the_code_curve() -> Result<(), Box<dyn std::error::Error>> {
        let (base, mut seen) = serve_routes(vec![
            (
                "/public/projectAPI/hazard/get",
                "200 OK",
                r#"{"ensemble_hazard": {"total": {"0.1": 0.01, "0.5": 0.001}}}"#,
            ),
            (
                "/public/projectAPI/hazard/nz1170p5/get",
                "200 OK",
                r#"{"nz1170p5_hazard": {"0.2": 0.002}}"#,
            ),
        ])
        .await?;
        let client = ApiClient::new(&config(base, None))?;

        let data = hazard(&client, &site(), Im::psa(1.0), Component::RotD50).await?;
        assert_eq!(data.response.ensemble_hazard.total.len(), 2);
        assert_eq!(data.nz_code.map(|curve| curve.len()), Some(1));

        let lines = request_lines(&mut seen, 2).await;
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("GET /public/projectAPI/hazard/get?"));
        assert!(lines[1].starts_with("GET /public/projectAPI/hazard/nz1170p5/get?"));
        assert!(lines.iter().all(|line| line.contains("im=pSA_1.0")));
        Ok(())
    }

    #[tokio::test]
    async fn uhs_sends_return_periods_to_both_routes() -> Result<(), Box<dyn std::error::Error>> {
        let (base, mut seen) = serve_routes(vec![
            (
                "/public/projectAPI/uhs/get",
                "200 OK",
                r#"{"uhs_results": [{"exceedance": 0.002, "period_values": [0.0, 1.0], "sa_values": [0.4, 0.2]}]}"#,
            ),
            (
                "/public/projectAPI/uhs/nz1170p5/get",
                "200 OK",
                r#"{"nz1170p5_uhs": []}"#,
            ),
        ])
        .await?;
        let client = ApiClient::new(&config(base, None))?;

        let data = uhs(
            &client,
            &site(),
            Component::RotD50,
            &[ReturnPeriod(100), ReturnPeriod(500)],
        )
        .await?;
        assert_eq!(data.response.uhs_results.len(), 1);
        assert!(data.nz_code.is_empty());

        let lines = request_lines(&mut seen, 2).await;
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.contains("rp=100%2C500")));
        assert!(lines[1].starts_with("GET /public/projectAPI/uhs/nz1170p5/get?"));
        Ok(())
    }

    #[tokio::test]
    async fn failing_code_request_fails_the_whole_hazard_set() -> Result<(), Box<dyn std::error::Error>> {
        let (base, _seen) = serve_routes(vec![
            (
                "/public/projectAPI/hazard/get",
                "200 OK",
                r#"{"ensemble_hazard": {"total": {"0.1": 0.01}}}"#,
            ),
            (
                "/public/projectAPI/hazard/nz1170p5/get",
                "500 Internal Server Error",
                "{}",
            ),
        ])
        .await?;
        let client = ApiClient::new(&config(base, None))?;

        let result = hazard(&client, &site(), Im::scalar(ImKind::Pga), Component::RotD50).await;
        assert!(matches!(result, Err(ApiError::Status { code: 500 })));
        Ok(())
    }

    fn metadata_routes(ims_status: &'static str) -> Vec<crate::api::client::tests::RouteStub> {
        vec![
            (
                "/public/projectAPI/sites/get",
                "200 OK",
                r#"{"WTMC": {"name": "Wellington", "lat": -41.3, "lon": 174.8, "vs30": 400.0}}"#,
            ),
            (
                "/public/projectAPI/ims/get",
                ims_status,
                r#"{"ims": ["PGA", "pSA_1.0"], "components": ["RotD50"]}"#,
            ),
            ("/public/projectAPI/disagg/rps/get", "200 OK", r#"{"rps": [2500, 500, 500]}"#),
            ("/public/projectAPI/uhs/rps/get", "200 OK", r#"{"rps": [100, 0]}"#),
            (
                "/public/projectAPI/gms/runs/get",
                "200 OK",
                r#"{"gms_runs": [{"id": "gms_1", "im_j": "pSA_1.0", "n_gms": 20}]}"#,
            ),
        ]
    }

    #[tokio::test]
    async fn project_metadata_gathers_every_lookup() -> Result<(), Box<dyn std::error::Error>> {
        let (base, mut seen) = serve_routes(metadata_routes("200 OK")).await?;
        let client = ApiClient::new(&config(base, None))?;

        let metadata = project_metadata(&client, "gnzl").await?;
        assert_eq!(metadata.sites.0.len(), 1);
        assert_eq!(metadata.ims.ims.len(), 2);
        assert_eq!(metadata.disagg_rps, vec![ReturnPeriod(500), ReturnPeriod(2500)]);
        assert_eq!(metadata.uhs_rps, vec![ReturnPeriod(100)]);
        assert_eq!(metadata.gms_runs.gms_runs.len(), 1);

        let lines = request_lines(&mut seen, 5).await;
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|line| line.contains("project_id=gnzl")));
        Ok(())
    }

    #[tokio::test]
    async fn one_failed_lookup_fails_project_metadata() -> Result<(), Box<dyn std::error::Error>> {
        let (base, _seen) = serve_routes(metadata_routes("404 Not Found")).await?;
        let client = ApiClient::new(&config(base, None))?;

        let result = project_metadata(&client, "gnzl").await;
        assert!(matches!(result, Err(ApiError::Status { code: 404 })));
        Ok(())
    }
}

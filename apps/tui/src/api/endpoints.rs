/// Which side of the API a request goes to. Anonymous sessions only see
/// the public project routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
}

pub const PROJECT_API_PREFIX: &str = "/projectAPI";
pub const PUBLIC_PROJECT_API_PREFIX: &str = "/public/projectAPI";

pub const PROJECT_IDS: &str = "/ids/get";
pub const PROJECT_SITES: &str = "/sites/get";
pub const PROJECT_IMS: &str = "/ims/get";
pub const PROJECT_DISAGG_RPS: &str = "/disagg/rps/get";
pub const PROJECT_UHS_RPS: &str = "/uhs/rps/get";
pub const PROJECT_HAZARD: &str = "/hazard/get";
pub const PROJECT_HAZARD_NZ_CODE: &str = "/hazard/nz1170p5/get";
pub const PROJECT_DISAGG: &str = "/disagg/get";
pub const PROJECT_UHS: &str = "/uhs/get";
pub const PROJECT_UHS_NZ_CODE: &str = "/uhs/nz1170p5/get";
pub const PROJECT_GMS_RUNS: &str = "/gms/runs/get";
pub const PROJECT_GMS: &str = "/gms/get";
pub const PROJECT_SCENARIOS: &str = "/scenario/get";

pub const PROJECT_HAZARD_DOWNLOAD: &str = "/hazard/download";
pub const PROJECT_DISAGG_DOWNLOAD: &str = "/disagg/download";
pub const PROJECT_UHS_DOWNLOAD: &str = "/uhs/download";
pub const PROJECT_GMS_DOWNLOAD: &str = "/gms/download";
pub const PROJECT_SCENARIO_DOWNLOAD: &str = "/scenario/download";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    ProjectIds,
    Sites,
    Ims,
    DisaggRps,
    UhsRps,
    Hazard,
    HazardNzCode,
    Disagg,
    Uhs,
    UhsNzCode,
    GmsRuns,
    Gms,
    Scenarios,
    HazardDownload,
    DisaggDownload,
    UhsDownload,
    GmsDownload,
    ScenarioDownload,
}

impl Route {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::ProjectIds => PROJECT_IDS,
            Self::Sites => PROJECT_SITES,
            Self::Ims => PROJECT_IMS,
            Self::DisaggRps => PROJECT_DISAGG_RPS,
            Self::UhsRps => PROJECT_UHS_RPS,
            Self::Hazard => PROJECT_HAZARD,
            Self::HazardNzCode => PROJECT_HAZARD_NZ_CODE,
            Self::Disagg => PROJECT_DISAGG,
            Self::Uhs => PROJECT_UHS,
            Self::UhsNzCode => PROJECT_UHS_NZ_CODE,
            Self::GmsRuns => PROJECT_GMS_RUNS,
            Self::Gms => PROJECT_GMS,
            Self::Scenarios => PROJECT_SCENARIOS,
            Self::HazardDownload => PROJECT_HAZARD_DOWNLOAD,
            Self::DisaggDownload => PROJECT_DISAGG_DOWNLOAD,
            Self::UhsDownload => PROJECT_UHS_DOWNLOAD,
            Self::GmsDownload => PROJECT_GMS_DOWNLOAD,
            Self::ScenarioDownload => PROJECT_SCENARIO_DOWNLOAD,
        }
    }

    pub fn path(self, access: Access) -> String {
        let prefix = match access {
            Access::Public => PUBLIC_PROJECT_API_PREFIX,
            Access::Authenticated => PROJECT_API_PREFIX,
        };
        format!("{prefix}{}", self.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_and_authenticated_paths_differ_only_by_prefix() {
        assert_eq!(Route::Hazard.path(Access::Authenticated), "/projectAPI/hazard/get");
        assert_eq!(
            Route::Hazard.path(Access::Public),
            "/public/projectAPI/hazard/get"
        );
        assert_eq!(
            Route::UhsRps.path(Access::Public),
            "/public/projectAPI/uhs/rps/get"
        );
    }
}

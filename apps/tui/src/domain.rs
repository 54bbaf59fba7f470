use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImKind {
    Pga,
    Pgv,
    Cav,
    Ai,
    Ds575,
    Ds595,
    PSa,
}

impl ImKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pga => "PGA",
            Self::Pgv => "PGV",
            Self::Cav => "CAV",
            Self::Ai => "AI",
            Self::Ds575 => "Ds575",
            Self::Ds595 => "Ds595",
            Self::PSa => "pSA",
        }
    }

    /// Display order of the scalar IMs; pSA always sorts after them.
    const fn rank(self) -> usize {
        match self {
            Self::Pga => 0,
            Self::Pgv => 1,
            Self::Cav => 2,
            Self::Ai => 3,
            Self::Ds575 => 4,
            Self::Ds595 => 5,
            Self::PSa => 6,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "PGA" => Some(Self::Pga),
            "PGV" => Some(Self::Pgv),
            "CAV" => Some(Self::Cav),
            "AI" => Some(Self::Ai),
            "Ds575" => Some(Self::Ds575),
            "Ds595" => Some(Self::Ds595),
            "pSA" => Some(Self::PSa),
            _ => None,
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            Self::Pga | Self::PSa => "g",
            Self::Pgv => "cm/s",
            Self::Cav => "g.s",
            Self::Ai => "m/s",
            Self::Ds575 | Self::Ds595 => "s",
        }
    }
}

/// An intensity measure as the backend spells it: `PGA`, `pSA_0.5`, ...
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Im {
    pub kind: ImKind,
    pub period: Option<f64>,
}

impl Im {
    pub const fn scalar(kind: ImKind) -> Self {
        Self { kind, period: None }
    }

    pub const fn psa(period: f64) -> Self {
        Self {
            kind: ImKind::PSa,
            period: Some(period),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(period) = value.strip_prefix("pSA_") {
            let period: f64 = period.parse().ok()?;
            if !period.is_finite() || period <= 0.0 {
                return None;
            }
            return Some(Self::psa(period));
        }

        match ImKind::parse(value)? {
            ImKind::PSa => None,
            kind => Some(Self::scalar(kind)),
        }
    }

    /// Spectral period; PGA sits at zero period on a spectrum.
    pub fn period(&self) -> Option<f64> {
        match self.kind {
            ImKind::Pga => Some(0.0),
            ImKind::PSa => self.period,
            _ => None,
        }
    }

    pub const fn is_spectral(&self) -> bool {
        matches!(self.kind, ImKind::Pga | ImKind::PSa)
    }

    pub const fn unit(&self) -> &'static str {
        self.kind.unit()
    }

    fn sort_key(&self, other: &Self) -> Ordering {
        self.kind.rank().cmp(&other.kind.rank()).then_with(|| {
            let a = self.period.unwrap_or(0.0);
            let b = other.period.unwrap_or(0.0);
            a.total_cmp(&b)
        })
    }
}

impl fmt::Display for Im {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.period) {
            // Whole periods keep one decimal, the way the backend names them
            (ImKind::PSa, Some(period)) if period.fract() == 0.0 => write!(f, "pSA_{period:.1}"),
            (ImKind::PSa, Some(period)) => write!(f, "pSA_{period}"),
            (kind, _) => f.write_str(kind.as_str()),
        }
    }
}

/// Scalar IMs first in their fixed order, then pSA by ascending period.
pub fn sort_ims(mut ims: Vec<Im>) -> Vec<Im> {
    ims.sort_by(Im::sort_key);
    ims.dedup();
    ims
}

/// Parses backend IM strings, dropping any that are not recognised.
pub fn parse_ims<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<Im> {
    sort_ims(values.into_iter().filter_map(Im::parse).collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    RotD50,
    RotD100,
    Larger,
    Geom,
    H000,
    H090,
    Ver,
}

impl Component {
    pub const ALL: [Self; 7] = [
        Self::RotD50,
        Self::RotD100,
        Self::Larger,
        Self::Geom,
        Self::H000,
        Self::H090,
        Self::Ver,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RotD50 => "RotD50",
            Self::RotD100 => "RotD100",
            Self::Larger => "Larger",
            Self::Geom => "geom",
            Self::H000 => "000",
            Self::H090 => "090",
            Self::Ver => "ver",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "rotd50" => Some(Self::RotD50),
            "rotd100" => Some(Self::RotD100),
            "larger" => Some(Self::Larger),
            "geom" => Some(Self::Geom),
            "000" => Some(Self::H000),
            "090" => Some(Self::H090),
            "ver" => Some(Self::Ver),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RotD50 => "RotD50",
            Self::RotD100 => "RotD100",
            Self::Larger => "Larger horizontal",
            Self::Geom => "Geometric mean",
            Self::H000 => "000",
            Self::H090 => "090",
            Self::Ver => "Vertical",
        }
    }
}

/// Return period in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReturnPeriod(pub u32);

impl ReturnPeriod {
    pub fn exceedance(self) -> f64 {
        1.0 / f64::from(self.0)
    }

    /// Nearest whole-year return period for an annual exceedance rate.
    pub fn from_exceedance(rate: f64) -> Option<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return None;
        }
        let years = (1.0 / rate).round();
        if years < 1.0 || years > f64::from(u32::MAX) {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(Self(years as u32))
    }
}

impl fmt::Display for ReturnPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Comma separated return periods, deduplicated and ascending.
pub fn parse_return_periods(value: &str) -> Vec<ReturnPeriod> {
    let mut rps: Vec<ReturnPeriod> = value
        .split(',')
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .filter(|years| *years > 0)
        .map(ReturnPeriod)
        .collect();
    rps.sort_unstable();
    rps.dedup();
    rps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalar_and_spectral_ims() {
        assert_eq!(Im::parse("PGA"), Some(Im::scalar(ImKind::Pga)));
        assert_eq!(Im::parse("pSA_0.5"), Some(Im::psa(0.5)));
        assert_eq!(Im::parse("pSA"), None);
        assert_eq!(Im::parse("pSA_-1"), None);
        assert_eq!(Im::parse("MMI"), None);
    }

    #[test]
    fn display_matches_backend_spelling() {
        assert_eq!(Im::psa(0.5).to_string(), "pSA_0.5");
        assert_eq!(Im::psa(10.0).to_string(), "pSA_10.0");
        assert_eq!(Im::scalar(ImKind::Ds595).to_string(), "Ds595");
    }

    #[test]
    fn sorts_scalar_ims_before_psa_by_period() {
        let sorted = parse_ims(["pSA_1.0", "PGV", "pSA_0.1", "PGA", "Ds595", "pSA_1.0"]);
        let names: Vec<String> = sorted.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["PGA", "PGV", "Ds595", "pSA_0.1", "pSA_1.0"]);
    }

    #[test]
    fn pga_sits_at_zero_period() {
        assert_eq!(Im::scalar(ImKind::Pga).period(), Some(0.0));
        assert_eq!(Im::scalar(ImKind::Pgv).period(), None);
        assert!(Im::psa(2.0).is_spectral());
        assert_eq!(Im::psa(2.0).unit(), "g");
        assert_eq!(Im::scalar(ImKind::Pgv).unit(), "cm/s");
    }

    #[test]
    fn component_round_trips_through_backend_names() {
        for component in Component::ALL {
            assert_eq!(Component::parse(component.as_str()), Some(component));
        }
        assert_eq!(Component::parse("RotD75"), None);
    }

    #[test]
    fn return_period_exceedance_conversion() {
        let rp = ReturnPeriod(500);
        assert!((rp.exceedance() - 0.002).abs() < 1e-12);
        assert_eq!(ReturnPeriod::from_exceedance(0.000_404), Some(ReturnPeriod(2475)));
        assert_eq!(ReturnPeriod::from_exceedance(0.0), None);
        assert_eq!(ReturnPeriod::from_exceedance(5.0), None);
    }

    #[test]
    fn return_period_list_is_sorted_and_deduplicated() {
        let rps = parse_return_periods("2500, 500,abc,0, 500,100");
        assert_eq!(rps, vec![ReturnPeriod(100), ReturnPeriod(500), ReturnPeriod(2500)]);
        assert!(parse_return_periods("").is_empty());
    }
}

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

pub const MONTHS_PER_YEAR: usize = 12;

/// Width in pixels below which the viewport is treated as mobile.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

#[derive(Debug, thiserror::Error)]
#[error("monthly series must have 12 values, found {0}")]
pub struct SeriesLengthError(pub usize);

/// Twelve monthly collection amounts, index-aligned to the fiscal month order.
///
/// The length is checked during deserialization so a malformed dataset is
/// rejected when it is loaded rather than when a chart is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct MonthlySeries([u64; MONTHS_PER_YEAR]);

impl MonthlySeries {
    #[cfg(test)]
    pub fn new(values: [u64; MONTHS_PER_YEAR]) -> Self {
        MonthlySeries(values)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn value_at(&self, index: usize) -> u64 {
        self.0[index]
    }
}

impl TryFrom<Vec<u64>> for MonthlySeries {
    type Error = SeriesLengthError;

    fn try_from(values: Vec<u64>) -> Result<Self, Self::Error> {
        let len = values.len();
        let values: [u64; MONTHS_PER_YEAR] =
            values.try_into().map_err(|_| SeriesLengthError(len))?;
        Ok(MonthlySeries(values))
    }
}

impl From<MonthlySeries> for Vec<u64> {
    fn from(series: MonthlySeries) -> Self {
        series.0.to_vec()
    }
}

/// The two fiscal years every comparison is made between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiscalYear {
    Current,
    Prior,
}

impl FiscalYear {
    pub const ALL: [FiscalYear; 2] = [FiscalYear::Current, FiscalYear::Prior];
}

/// One value per fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearPair<T> {
    pub current: T,
    pub prior: T,
}

impl<T> YearPair<T> {
    pub fn get(&self, year: FiscalYear) -> &T {
        match year {
            FiscalYear::Current => &self.current,
            FiscalYear::Prior => &self.prior,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ViewMode {
    /// Raw data table
    Raw,
    /// Cumulative totals up to the pivot month
    #[default]
    #[value(name = "upto")]
    CumulativeToPivot,
    /// The pivot month on its own
    #[value(name = "month")]
    PivotOnly,
}

impl ViewMode {
    /// Navbar caption, e.g. "Upto January".
    pub fn caption(&self, pivot_month: &str) -> String {
        match self {
            ViewMode::Raw => "Raw Data".to_string(),
            ViewMode::CumulativeToPivot => format!("Upto {}", pivot_month),
            ViewMode::PivotOnly => pivot_month.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    Desktop,
    Mobile,
}

impl Viewport {
    pub fn from_width(width_px: u32) -> Self {
        if width_px < MOBILE_BREAKPOINT_PX {
            Viewport::Mobile
        } else {
            Viewport::Desktop
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, Viewport::Mobile)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    pub fn palette(&self) -> ThemePalette {
        match self {
            Theme::Light => ThemePalette {
                text: "#000000",
                grid: "#e5e7eb",
                surface: "#ffffff",
            },
            Theme::Dark => ThemePalette {
                text: "#ffffff",
                grid: "#374151",
                surface: "#1f2937",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemePalette {
    pub text: &'static str,
    pub grid: &'static str,
    pub surface: &'static str,
}

/// UI state handed to the report builders. None of it is read from globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub mode: ViewMode,
    pub viewport: Viewport,
    pub theme: Theme,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Authority {
    pub name: String,
    pub series: YearPair<MonthlySeries>,
    pub cumulative_current: u64,
    pub cumulative_prior: u64,
    pub growth: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Team {
    pub name: String,
    /// Sum over the team's authorities, precomputed in the dataset.
    pub series: YearPair<MonthlySeries>,
    /// Fiscal-year total up to the pivot month, precomputed in the dataset.
    pub contribution: YearPair<u64>,
    pub authorities: Vec<Authority>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub title: String,
    pub months: Vec<String>,
    pub pivot_month: String,
    pub fiscal_years: YearPair<String>,
    pub all_teams: YearPair<MonthlySeries>,
    pub teams: Vec<Team>,
    #[serde(default)]
    pub table_headers: RawTableHeaders,
    #[serde(skip)]
    pub(crate) pivot_index: usize,
}

/// Column captions of the raw data table, as printed in the source report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawTableHeaders {
    pub serial: String,
    pub authority: String,
    pub cumulative_current: String,
    pub cumulative_prior: String,
    pub growth: String,
}

impl Default for RawTableHeaders {
    fn default() -> Self {
        RawTableHeaders {
            serial: "ক্রম".to_string(),
            authority: "উৎস কর কর্তনকারী কর্তৃপক্ষ".to_string(),
            cumulative_current: "ক্রমযোজিত (২০২৪-২৫)".to_string(),
            cumulative_prior: "ক্রমযোজিত (২০২৩-২০২৪)".to_string(),
            growth: "প্রবৃদ্ধি".to_string(),
        }
    }
}

impl Dataset {
    pub fn pivot_index(&self) -> usize {
        self.pivot_index
    }

    pub fn year_label(&self, year: FiscalYear) -> &str {
        self.fiscal_years.get(year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TickFormat {
    Plain,
    Crore,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisSpec {
    pub title: String,
    pub tick_format: TickFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesSpec {
    pub label: String,
    pub data: Vec<u64>,
    pub border_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    pub fill: bool,
    pub point_radius: u32,
    pub point_hover_radius: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<SeriesSpec>,
    /// Two-decimal growth figure, or the sentinel when it is undefined.
    pub growth: String,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub palette: ThemePalette,
}

#[derive(Debug, Clone, Serialize)]
pub struct PieSpec {
    pub title: String,
    pub labels: Vec<String>,
    pub data: Vec<u64>,
    pub shares: Vec<f64>,
    pub slice_labels: Vec<String>,
    pub background_color: Vec<String>,
    pub show_slice_labels: bool,
    pub label_color: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PieShareRow {
    #[serde(rename = "Team")]
    #[tabled(rename = "Team")]
    pub team: String,
    #[serde(rename = "Collection")]
    #[tabled(rename = "Collection")]
    pub collection: String,
    #[serde(rename = "Share")]
    #[tabled(rename = "Share (%)")]
    pub share: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct GrowthSummaryRow {
    #[serde(rename = "Team")]
    #[tabled(rename = "Team")]
    pub team: String,
    #[serde(rename = "CurrentTotal")]
    #[tabled(rename = "CurrentTotal")]
    pub current_total: String,
    #[serde(rename = "PriorTotal")]
    #[tabled(rename = "PriorTotal")]
    pub prior_total: String,
    #[serde(rename = "Growth")]
    #[tabled(rename = "Growth (%)")]
    pub growth: String,
}

/// One authority line of the raw data table. Monthly cells are already
/// formatted; the month headers come from the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTableRow {
    pub team: String,
    pub serial: usize,
    pub authority: String,
    pub monthly: Vec<String>,
    pub cumulative_current: String,
    pub cumulative_prior: String,
    pub growth: String,
}

//! Named constants for every threshold, factor and price used by the metric
//! pipeline. Defaults reproduce the Building 37 analysis; a TOML file can
//! override any subset of them.

use crate::error::ConfigError;
use crate::types::{Month, MONTH_COUNT};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConstants {
    pub building: BuildingConstants,
    pub tiers: TierThresholds,
    pub bookings: BookingRules,
    pub emissions: EmissionFactors,
    pub prices: UnitPrices,
    pub benchmarks: EuiBenchmarks,
    pub remote: RemoteWorkRules,
    pub windows: SeasonWindows,
    pub loader: LoaderSettings,
    /// Published annual totals the loaded utility file is checked against.
    pub reference: Option<ReferenceTotals>,
    /// Correlations over fewer points than this carry a small-sample caveat.
    pub min_robust_sample: usize,
    pub months_per_year: f64,
    /// Months listed on each side of the peak/off-peak ranking.
    pub ranking_size: usize,
}

impl Default for AnalysisConstants {
    fn default() -> Self {
        Self {
            building: BuildingConstants::default(),
            tiers: TierThresholds::default(),
            bookings: BookingRules::default(),
            emissions: EmissionFactors::default(),
            prices: UnitPrices::default(),
            benchmarks: EuiBenchmarks::default(),
            remote: RemoteWorkRules::default(),
            windows: SeasonWindows::default(),
            loader: LoaderSettings::default(),
            reference: Some(ReferenceTotals::default()),
            min_robust_sample: 30,
            months_per_year: 12.0,
            ranking_size: 3,
        }
    }
}

impl AnalysisConstants {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Scale factor from the observed window (Jan..Sep) to a full year.
    pub fn annualization_factor(&self) -> f64 {
        self.months_per_year / MONTH_COUNT as f64
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildingConstants {
    pub floor_1_2_sqft: f64,
    pub floor_3_6_sqft: f64,
    pub headcount: usize,
    pub working_days_per_month: f64,
    /// Per-floor area used by the efficiency table.
    pub floor_areas: Vec<FloorArea>,
    pub default_floor_sqft: f64,
    pub sqft_per_employee: f64,
    /// Possible office days in the window (9 months x 20 days).
    pub efficiency_day_count: f64,
}

impl Default for BuildingConstants {
    fn default() -> Self {
        Self {
            floor_1_2_sqft: 44_352.0,
            floor_3_6_sqft: 22_728.0,
            headcount: 356,
            working_days_per_month: 20.0,
            floor_areas: vec![
                FloorArea::new(1, 44_352.0),
                FloorArea::new(2, 44_352.0),
                FloorArea::new(3, 22_728.0),
                FloorArea::new(4, 22_728.0),
                FloorArea::new(5, 22_728.0),
            ],
            default_floor_sqft: 22_728.0,
            sqft_per_employee: 120.0,
            efficiency_day_count: 180.0,
        }
    }
}

impl BuildingConstants {
    /// Conditioned area: two large lower floors plus four upper floors.
    pub fn total_sqft(&self) -> f64 {
        2.0 * self.floor_1_2_sqft + 4.0 * self.floor_3_6_sqft
    }

    pub fn floor_sqft(&self, floor: u32) -> f64 {
        self.floor_areas
            .iter()
            .find(|a| a.floor == floor)
            .map(|a| a.sqft)
            .unwrap_or(self.default_floor_sqft)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FloorArea {
    pub floor: u32,
    pub sqft: f64,
}

impl FloorArea {
    pub fn new(floor: u32, sqft: f64) -> Self {
        Self { floor, sqft }
    }
}

/// Lower bounds (inclusive) of the low, medium and high utilization tiers,
/// in total swipes over the window.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self { low: 30, medium: 90, high: 140 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookingRules {
    pub target_year: i32,
    pub max_duration_hours: f64,
    pub sentinel_duration_hours: f64,
    /// Booking type whose attendance is not captured by the attendee count.
    pub excluded_ghost_type: Option<String>,
    pub wasted_kwh_per_hour: f64,
    pub top_types: usize,
    pub room_categories: Vec<RoomCategory>,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            target_year: 2025,
            max_duration_hours: 20.0,
            sentinel_duration_hours: 15.0,
            excluded_ghost_type: Some("All Hands".to_string()),
            wasted_kwh_per_hour: 5.0,
            top_types: 5,
            room_categories: vec![
                RoomCategory::new(
                    "Large (200+ cap)",
                    &["Auditorium A", "Auditorium B", "Auditorium C"],
                ),
                RoomCategory::new(
                    "Medium (20-50 cap)",
                    &[
                        "Room 128", "Room 129", "Room 130", "Room 131", "Room 132", "Room 133",
                        "Room 135",
                    ],
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoomCategory {
    pub name: String,
    pub rooms: Vec<String>,
}

impl RoomCategory {
    pub fn new(name: &str, rooms: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            rooms: rooms.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn contains(&self, room: &str) -> bool {
        self.rooms.iter().any(|r| r == room)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmissionFactors {
    /// NY grid mix.
    pub electricity_lbs_per_kwh: f64,
    pub gas_lbs_per_ccf: f64,
    pub lbs_per_ton: f64,
    /// Municipal supply pumping and treatment.
    pub water_supply_kwh_per_kgal: f64,
    pub wastewater_kwh_per_kgal: f64,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            electricity_lbs_per_kwh: 0.92,
            gas_lbs_per_ccf: 11.7,
            lbs_per_ton: 2000.0,
            water_supply_kwh_per_kgal: 13.0,
            wastewater_kwh_per_kgal: 14.5,
        }
    }
}

impl EmissionFactors {
    pub fn water_embedded_kwh_per_kgal(&self) -> f64 {
        self.water_supply_kwh_per_kgal + self.wastewater_kwh_per_kgal
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UnitPrices {
    pub electricity_per_kwh: f64,
    pub gas_per_ccf: f64,
    pub water_per_gal: f64,
    /// HVAC and maintenance cost per square foot per year.
    pub space_per_sqft_year: f64,
    /// Portion of the electricity bill attributed to conditioning idle space.
    pub hvac_share: f64,
}

impl Default for UnitPrices {
    fn default() -> Self {
        Self {
            electricity_per_kwh: 0.15,
            gas_per_ccf: 1.20,
            water_per_gal: 0.01,
            space_per_sqft_year: 25.0,
            hvac_share: 0.3,
        }
    }
}

/// Reference energy use intensities in kWh/sqft/yr.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EuiBenchmarks {
    pub office_average: f64,
    pub leed_platinum: f64,
    pub net_zero: f64,
}

impl Default for EuiBenchmarks {
    fn default() -> Self {
        Self {
            office_average: 15.0,
            leed_platinum: 8.5,
            net_zero: 5.0,
        }
    }
}

/// Swipe-count cut-offs (exclusive upper bounds) for remote work groups.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteWorkRules {
    pub full_remote_below: u64,
    pub mostly_remote_below: u64,
    pub office_days_per_year: f64,
}

impl Default for RemoteWorkRules {
    fn default() -> Self {
        Self {
            full_remote_below: 20,
            mostly_remote_below: 90,
            office_days_per_year: 240.0,
        }
    }
}

/// Inclusive range of months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MonthWindow {
    pub first: Month,
    pub last: Month,
}

impl MonthWindow {
    pub const fn new(first: Month, last: Month) -> Self {
        Self { first, last }
    }

    pub fn contains(&self, month: Month) -> bool {
        self.first <= month && month <= self.last
    }

    /// Portion of a month-indexed series falling inside the window. Empty
    /// when the series is too short or the window is inverted.
    pub fn slice<'a, T>(&self, series: &'a [T]) -> &'a [T] {
        if self.first > self.last {
            return &[];
        }
        series
            .get(self.first.index()..=self.last.index())
            .unwrap_or(&[])
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.first, self.last)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeasonWindows {
    pub winter: MonthWindow,
    pub spring: MonthWindow,
    pub summer: MonthWindow,
    /// Destination months of the month-over-month changes averaged into the
    /// summer occupancy trend.
    pub summer_trend: MonthWindow,
}

impl Default for SeasonWindows {
    fn default() -> Self {
        Self {
            winter: MonthWindow::new(Month::Jan, Month::Mar),
            spring: MonthWindow::new(Month::Mar, Month::May),
            summer: MonthWindow::new(Month::Jul, Month::Sep),
            summer_trend: MonthWindow::new(Month::Jun, Month::Aug),
        }
    }
}

/// Lines to skip before the header row of each input file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    pub badge_preamble_lines: usize,
    pub utility_preamble_lines: usize,
    pub booking_preamble_lines: usize,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            badge_preamble_lines: 1,
            utility_preamble_lines: 4,
            booking_preamble_lines: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReferenceTotals {
    pub electricity_kwh: f64,
    pub gas_ccf: f64,
    pub water_gal: f64,
    /// Relative difference tolerated before a discrepancy is reported.
    pub tolerance: f64,
}

impl Default for ReferenceTotals {
    fn default() -> Self {
        Self {
            electricity_kwh: 5_666_000.0,
            gas_ccf: 273_000.0,
            water_gal: 129_777_000.0,
            tolerance: 0.01,
        }
    }
}

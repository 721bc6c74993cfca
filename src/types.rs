use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

/// Number of months covered by the badge and utility extracts (Jan..Sep).
pub const MONTH_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
}

impl Month {
    pub const ALL: [Month; MONTH_COUNT] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Recognize a month from the first three letters of a label such as
    /// `"Jan"`, `"January 2025"` or `"SEP-25"`.
    pub fn from_label(s: &str) -> Option<Month> {
        let prefix: String = s.trim().chars().take(3).collect::<String>().to_ascii_lowercase();
        Month::ALL
            .into_iter()
            .find(|m| m.label().to_ascii_lowercase() == prefix)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One employee's badge history for the reporting window.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyRecord {
    pub employee_id: String,
    pub floor: u32,
    pub monthly_swipes: [u32; MONTH_COUNT],
}

impl OccupancyRecord {
    pub fn total_swipes(&self) -> u64 {
        self.monthly_swipes.iter().map(|s| u64::from(*s)).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UtilityReading {
    pub month: Month,
    pub electricity_kwh: f64,
    pub gas_ccf: f64,
    pub water_gal: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingRecord {
    pub room: String,
    pub date: NaiveDate,
    pub start: Option<NaiveTime>,
    pub finish: Option<NaiveTime>,
    pub attendees: Option<u32>,
    pub booking_type: String,
}

impl BookingRecord {
    /// Booked duration in hours. Non-positive spans (all-day or overnight
    /// entries) and spans longer than `max_hours` collapse to `sentinel_hours`.
    /// `None` when either clock time is missing.
    pub fn duration_hours(&self, max_hours: f64, sentinel_hours: f64) -> Option<f64> {
        let (start, finish) = (self.start?, self.finish?);
        let hours = crate::util::hours_between(start, finish);
        if hours <= 0.0 || hours > max_hours {
            Some(sentinel_hours)
        } else {
            Some(hours)
        }
    }
}

/// The three loaded tables. Built once by the loader and only read after.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub occupancy: Vec<OccupancyRecord>,
    pub utilities: Vec<UtilityReading>,
    pub bookings: Vec<BookingRecord>,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MonthlyOccupancyRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "TotalSwipes")]
    #[tabled(rename = "Total Swipes")]
    pub total_swipes: String,
    #[serde(rename = "AvgDaysPerEmployee")]
    #[tabled(rename = "Avg Days/Employee")]
    pub avg_days: String,
    #[serde(rename = "AttendanceRate")]
    #[tabled(rename = "Attendance Rate")]
    pub attendance_rate: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct FloorShareRow {
    #[serde(rename = "Floor")]
    #[tabled(rename = "Floor")]
    pub floor: u32,
    #[serde(rename = "Swipes")]
    #[tabled(rename = "Swipes")]
    pub swipes: String,
    #[serde(rename = "PctOfTotal")]
    #[tabled(rename = "% of Total")]
    pub share: String,
    #[serde(rename = "Employees")]
    #[tabled(rename = "Employees")]
    pub employees: usize,
}

#[derive(Debug, Tabled, Clone)]
pub struct TierRow {
    #[tabled(rename = "Tier")]
    pub tier: String,
    #[tabled(rename = "Employees")]
    pub employees: usize,
    #[tabled(rename = "Share")]
    pub share: String,
    #[tabled(rename = "Profile")]
    pub profile: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct MonthlyUtilityRow {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Electricity (kWh)")]
    pub electricity: String,
    #[tabled(rename = "Gas (CCF)")]
    pub gas: String,
    #[tabled(rename = "Water (gal)")]
    pub water: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct BookingTypeRow {
    #[tabled(rename = "Booking Type")]
    pub booking_type: String,
    #[tabled(rename = "Count")]
    pub count: usize,
    #[tabled(rename = "Share")]
    pub share: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct FloorEfficiencyRow {
    #[tabled(rename = "Floor")]
    pub floor: u32,
    #[tabled(rename = "Employees")]
    pub employees: usize,
    #[tabled(rename = "Sqft")]
    pub sqft: String,
    #[tabled(rename = "Swipes")]
    pub swipes: String,
    #[tabled(rename = "Swipes/Sqft")]
    pub swipes_per_sqft: String,
    #[tabled(rename = "Efficiency")]
    pub efficiency: String,
}

/// Headline figures exported as JSON next to the text report.
#[derive(Debug, Serialize, PartialEq)]
pub struct ReportSummary {
    pub employees: usize,
    pub attendance_rate_pct: f64,
    pub low_utilizers: usize,
    pub total_co2_tons: f64,
    pub water_surge_multiplier: Option<f64>,
    pub corr_electricity: Option<f64>,
    pub corr_gas: Option<f64>,
    pub corr_water: Option<f64>,
    pub correlation_sample_size: usize,
    pub total_bookings: usize,
    pub ghost_bookings: usize,
    pub ghost_hours: f64,
    pub cost_per_swipe: Option<f64>,
}

//! Composite metrics that combine the occupancy, energy and booking tables.

use super::conference::bookings_in_year;
use super::energy::EnergyMetrics;
use super::occupancy::OccupancyMetrics;
use crate::config::{AnalysisConstants, MonthWindow, RoomCategory};
use crate::types::{BookingRecord, Month, OccupancyRecord};
use crate::util::{average, percent, ratio};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRanking {
    pub peak: Vec<(Month, u64)>,
    pub low: Vec<(Month, u64)>,
    pub peak_mean: f64,
    pub low_mean: f64,
    /// Peak mean relative to the low mean, in percent.
    pub spread_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloorEfficiency {
    pub floor: u32,
    pub employees: usize,
    pub sqft: f64,
    pub swipes: u64,
    pub swipes_per_sqft: f64,
    pub efficiency_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EuiBenchmark {
    pub label: String,
    pub eui: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EuiComparison {
    pub current: f64,
    /// Current building first, then the reference levels.
    pub benchmarks: Vec<EuiBenchmark>,
    pub ratio_to_office_average: Option<f64>,
    pub target: f64,
    pub excess_kwh: f64,
    pub excess_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthChange {
    pub from: Month,
    pub to: Month,
    pub pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomCategoryStats {
    pub category: String,
    pub bookings: usize,
    /// Mean over bookings that recorded at least one attendee.
    pub avg_attendees: Option<f64>,
    pub ghost_share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteWorkImpact {
    pub full_remote: usize,
    pub mostly_remote: usize,
    pub remote_total: usize,
    pub share_of_headcount_pct: f64,
    pub space_reduction_sqft: f64,
    pub annual_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterAnomaly {
    pub per_swipe: Vec<(Month, Option<f64>)>,
    pub summer_to_winter: Option<f64>,
    pub excess_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEfficiency {
    pub annual_cost: f64,
    pub annual_swipes: f64,
    pub cost_per_swipe: Option<f64>,
    pub cost_per_employee_year: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancedMetrics {
    pub ranking: MonthRanking,
    pub floors: Vec<FloorEfficiency>,
    pub least_efficient_floor: Option<u32>,
    pub eui: EuiComparison,
    pub month_changes: Vec<MonthChange>,
    pub summer_trend_pct: Option<f64>,
    pub room_categories: Vec<RoomCategoryStats>,
    pub remote: RemoteWorkImpact,
    pub water: WaterAnomaly,
    pub cost: CostEfficiency,
}

/// Top and bottom `n` months by swipe total. Ties keep calendar order.
pub fn rank_months(monthly: &[(Month, u64)], n: usize) -> MonthRanking {
    let mut desc = monthly.to_vec();
    desc.sort_by(|a, b| b.1.cmp(&a.1));
    let mut asc = monthly.to_vec();
    asc.sort_by(|a, b| a.1.cmp(&b.1));
    let peak: Vec<_> = desc.into_iter().take(n).collect();
    let low: Vec<_> = asc.into_iter().take(n).collect();
    let mean_of = |v: &[(Month, u64)]| average(&v.iter().map(|(_, s)| *s as f64).collect::<Vec<_>>());
    let peak_mean = mean_of(&peak);
    let low_mean = mean_of(&low);
    MonthRanking {
        spread_pct: ratio(peak_mean - low_mean, low_mean).map(|r| r * 100.0),
        peak,
        low,
        peak_mean,
        low_mean,
    }
}

/// Percentage change from each month to the next; `None` after a zero month.
pub fn month_over_month(monthly: &[(Month, u64)]) -> Vec<MonthChange> {
    monthly
        .windows(2)
        .map(|w| {
            let (from, prev) = w[0];
            let (to, cur) = w[1];
            MonthChange {
                from,
                to,
                pct: ratio(cur as f64 - prev as f64, prev as f64).map(|r| r * 100.0),
            }
        })
        .collect()
}

fn floor_efficiency(occupancy: &OccupancyMetrics, constants: &AnalysisConstants) -> Vec<FloorEfficiency> {
    let building = &constants.building;
    occupancy
        .floors
        .iter()
        .map(|f| {
            let sqft = building.floor_sqft(f.floor);
            FloorEfficiency {
                floor: f.floor,
                employees: f.employees,
                sqft,
                swipes: f.swipes,
                swipes_per_sqft: ratio(f.swipes as f64, sqft).unwrap_or(0.0),
                efficiency_pct: percent(
                    f.swipes as f64,
                    f.employees as f64 * building.efficiency_day_count,
                ),
            }
        })
        .collect()
}

fn eui_comparison(energy: &EnergyMetrics, constants: &AnalysisConstants) -> EuiComparison {
    let b = &constants.benchmarks;
    let current = energy.per_sqft.electricity_kwh;
    let benchmarks = vec![
        EuiBenchmark { label: "Building 37 Current".to_string(), eui: current },
        EuiBenchmark { label: "Office Building Average".to_string(), eui: b.office_average },
        EuiBenchmark { label: "LEED Platinum Office".to_string(), eui: b.leed_platinum },
        EuiBenchmark { label: "Net Zero Office".to_string(), eui: b.net_zero },
    ];
    let excess_kwh = ((current - b.leed_platinum) * energy.total_sqft).max(0.0);
    EuiComparison {
        current,
        benchmarks,
        ratio_to_office_average: ratio(current, b.office_average),
        target: b.leed_platinum,
        excess_kwh,
        excess_cost: excess_kwh * constants.prices.electricity_per_kwh,
    }
}

pub fn room_category_stats(bookings: &[&BookingRecord], categories: &[RoomCategory]) -> Vec<RoomCategoryStats> {
    categories
        .iter()
        .filter_map(|category| {
            let rooms: Vec<&BookingRecord> = bookings
                .iter()
                .copied()
                .filter(|b| category.contains(b.room.as_str()))
                .collect();
            if rooms.is_empty() {
                return None;
            }
            let attended: Vec<f64> = rooms
                .iter()
                .filter_map(|b| b.attendees)
                .filter(|a| *a > 0)
                .map(f64::from)
                .collect();
            let ghosts = rooms.iter().filter(|b| b.attendees == Some(0)).count();
            Some(RoomCategoryStats {
                category: category.name.clone(),
                bookings: rooms.len(),
                avg_attendees: (!attended.is_empty()).then(|| average(&attended)),
                ghost_share_pct: percent(ghosts as f64, rooms.len() as f64),
            })
        })
        .collect()
}

fn remote_work(records: &[OccupancyRecord], constants: &AnalysisConstants) -> RemoteWorkImpact {
    let rules = &constants.remote;
    let (mut full_remote, mut mostly_remote) = (0usize, 0usize);
    for r in records {
        let total = r.total_swipes();
        if total < rules.full_remote_below {
            full_remote += 1;
        } else if total < rules.mostly_remote_below {
            mostly_remote += 1;
        }
    }
    let remote_total = full_remote + mostly_remote;
    let space_reduction_sqft = remote_total as f64 * constants.building.sqft_per_employee;
    RemoteWorkImpact {
        full_remote,
        mostly_remote,
        remote_total,
        share_of_headcount_pct: percent(remote_total as f64, constants.building.headcount as f64),
        space_reduction_sqft,
        annual_savings: space_reduction_sqft * constants.prices.space_per_sqft_year,
    }
}

fn water_anomaly(occupancy: &OccupancyMetrics, energy: &EnergyMetrics, constants: &AnalysisConstants) -> WaterAnomaly {
    let per_swipe: Vec<(Month, Option<f64>)> = occupancy
        .monthly
        .iter()
        .zip(&energy.series.water_gal)
        .map(|(m, water)| (m.month, ratio(*water, m.total_swipes as f64)))
        .collect();
    let values: Vec<Option<f64>> = per_swipe.iter().map(|(_, v)| *v).collect();
    let window_mean = |window: MonthWindow| {
        let known: Vec<f64> = window.slice(&values).iter().flatten().copied().collect();
        (!known.is_empty()).then(|| average(&known))
    };
    let summer_to_winter = match (
        window_mean(constants.windows.summer),
        window_mean(constants.windows.winter),
    ) {
        (Some(summer), Some(winter)) => ratio(summer, winter),
        _ => None,
    };
    WaterAnomaly {
        per_swipe,
        excess_pct: summer_to_winter.map(|r| (r - 1.0) * 100.0),
        summer_to_winter,
    }
}

fn cost_efficiency(occupancy: &OccupancyMetrics, energy: &EnergyMetrics, constants: &AnalysisConstants) -> CostEfficiency {
    let p = &constants.prices;
    let annual_cost = energy.annual.electricity_kwh * p.electricity_per_kwh
        + energy.annual.gas_ccf * p.gas_per_ccf
        + energy.annual.water_gal * p.water_per_gal;
    let annual_swipes = occupancy.total_swipes() as f64 * constants.annualization_factor();
    let cost_per_swipe = ratio(annual_cost, annual_swipes);
    CostEfficiency {
        annual_cost,
        annual_swipes,
        cost_per_swipe,
        cost_per_employee_year: cost_per_swipe.map(|c| c * constants.remote.office_days_per_year),
    }
}

pub fn advanced_metrics(
    records: &[OccupancyRecord],
    bookings: &[BookingRecord],
    occupancy: &OccupancyMetrics,
    energy: &EnergyMetrics,
    constants: &AnalysisConstants,
) -> AdvancedMetrics {
    let monthly: Vec<(Month, u64)> = occupancy
        .monthly
        .iter()
        .map(|m| (m.month, m.total_swipes))
        .collect();
    let month_changes = month_over_month(&monthly);
    let trend: Vec<f64> = month_changes
        .iter()
        .filter(|c| constants.windows.summer_trend.contains(c.to))
        .filter_map(|c| c.pct)
        .collect();

    let floors = floor_efficiency(occupancy, constants);
    let least_efficient_floor = floors
        .iter()
        .min_by(|a, b| {
            a.efficiency_pct
                .partial_cmp(&b.efficiency_pct)
                .unwrap_or(Ordering::Equal)
        })
        .map(|f| f.floor);

    let in_year = bookings_in_year(bookings, constants.bookings.target_year);

    AdvancedMetrics {
        ranking: rank_months(&monthly, constants.ranking_size),
        floors,
        least_efficient_floor,
        eui: eui_comparison(energy, constants),
        month_changes,
        summer_trend_pct: (!trend.is_empty()).then(|| average(&trend)),
        room_categories: room_category_stats(&in_year, &constants.bookings.room_categories),
        remote: remote_work(records, constants),
        water: water_anomaly(occupancy, energy, constants),
        cost: cost_efficiency(occupancy, energy, constants),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::energy::energy_metrics;
    use crate::metrics::occupancy::occupancy_metrics;
    use crate::types::{UtilityReading, MONTH_COUNT};
    use chrono::NaiveDate;

    fn monthly(values: [u64; MONTH_COUNT]) -> Vec<(Month, u64)> {
        Month::ALL.into_iter().zip(values).collect()
    }

    fn employee(floor: u32, monthly_swipes: [u32; MONTH_COUNT]) -> OccupancyRecord {
        OccupancyRecord {
            employee_id: format!("E-{floor}"),
            floor,
            monthly_swipes,
        }
    }

    fn booking(room: &str, attendees: Option<u32>) -> BookingRecord {
        BookingRecord {
            room: room.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            start: None,
            finish: None,
            attendees,
            booking_type: "Teams".to_string(),
        }
    }

    #[test]
    fn ranking_picks_extremes_in_calendar_order_on_ties() {
        let r = rank_months(&monthly([50, 40, 60, 70, 70, 30, 90, 80, 40]), 3);
        assert_eq!(r.peak, vec![(Month::Jul, 90), (Month::Aug, 80), (Month::Apr, 70)]);
        assert_eq!(r.low, vec![(Month::Jun, 30), (Month::Feb, 40), (Month::Sep, 40)]);
        assert!((r.peak_mean - 80.0).abs() < 1e-12);
        assert!((r.low_mean - 110.0 / 3.0).abs() < 1e-12);
        assert!(r.spread_pct.unwrap() > 0.0);
    }

    #[test]
    fn ranking_of_silent_building_has_no_spread() {
        let r = rank_months(&monthly([0; MONTH_COUNT]), 3);
        assert_eq!(r.spread_pct, None);
    }

    #[test]
    fn month_over_month_guards_zero_previous() {
        let changes = month_over_month(&monthly([100, 150, 0, 50, 50, 25, 25, 50, 50]));
        assert_eq!(changes.len(), MONTH_COUNT - 1);
        assert_eq!(changes[0].pct, Some(50.0));
        assert_eq!(changes[1].pct, Some(-100.0));
        assert_eq!(changes[2].pct, None);
        assert_eq!(changes[4].from, Month::May);
        assert_eq!(changes[4].to, Month::Jun);
        assert_eq!(changes[4].pct, Some(-50.0));
    }

    #[test]
    fn room_categories_skip_empty_groups() {
        let constants = AnalysisConstants::default();
        let bookings = [
            booking("Room 128", Some(10)),
            booking("Room 130", Some(0)),
            booking("Room 135", Some(20)),
            booking("Glen", Some(0)),
        ];
        let refs: Vec<&BookingRecord> = bookings.iter().collect();
        let stats = room_category_stats(&refs, &constants.bookings.room_categories);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].category, "Medium (20-50 cap)");
        assert_eq!(stats[0].bookings, 3);
        assert_eq!(stats[0].avg_attendees, Some(15.0));
        assert!((stats[0].ghost_share_pct - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn category_with_only_ghosts_has_no_average() {
        let constants = AnalysisConstants::default();
        let bookings = [booking("Auditorium B", Some(0))];
        let refs: Vec<&BookingRecord> = bookings.iter().collect();
        let stats = room_category_stats(&refs, &constants.bookings.room_categories);
        assert_eq!(stats[0].avg_attendees, None);
        assert_eq!(stats[0].ghost_share_pct, 100.0);
    }

    #[test]
    fn composite_report_over_small_building() {
        let constants = AnalysisConstants::default();
        let records = vec![
            employee(1, [20; MONTH_COUNT]),
            employee(1, [2; MONTH_COUNT]),
            employee(3, [1; MONTH_COUNT]),
            employee(6, [0; MONTH_COUNT]),
        ];
        let readings: Vec<UtilityReading> = Month::ALL
            .into_iter()
            .map(|month| {
                let summer = constants.windows.summer.contains(month);
                UtilityReading {
                    month,
                    electricity_kwh: 1000.0,
                    gas_ccf: 100.0,
                    water_gal: if summer { 4600.0 } else { 2300.0 },
                }
            })
            .collect();
        let occupancy = occupancy_metrics(&records, &constants);
        let energy = energy_metrics(&readings, &constants);
        let bookings = [booking("Auditorium A", Some(150))];
        let m = advanced_metrics(&records, &bookings, &occupancy, &energy, &constants);

        // 23 swipes every month.
        assert!(m.month_changes.iter().all(|c| c.pct == Some(0.0)));
        assert_eq!(m.summer_trend_pct, Some(0.0));

        assert_eq!(m.floors.len(), 3);
        assert_eq!(m.floors[0].sqft, 44_352.0);
        assert_eq!(m.floors[2].sqft, 22_728.0);
        // Floor 1: 198 swipes over 2 x 180 possible days.
        assert!((m.floors[0].efficiency_pct - 55.0).abs() < 1e-9);
        assert_eq!(m.floors[2].efficiency_pct, 0.0);
        assert_eq!(m.least_efficient_floor, Some(6));

        // 18, 9 and 0 total swipes are all under the full-remote cut-off.
        assert_eq!(m.remote.full_remote, 3);
        assert_eq!(m.remote.mostly_remote, 0);
        assert_eq!(m.remote.space_reduction_sqft, 360.0);
        assert_eq!(m.remote.annual_savings, 9000.0);

        assert_eq!(m.water.per_swipe.len(), MONTH_COUNT);
        assert!((m.water.summer_to_winter.unwrap() - 2.0).abs() < 1e-12);
        assert!((m.water.excess_pct.unwrap() - 100.0).abs() < 1e-9);

        assert_eq!(m.room_categories.len(), 1);
        assert_eq!(m.room_categories[0].avg_attendees, Some(150.0));

        let annual_swipes = 23.0 * 9.0 * 12.0 / 9.0;
        assert!((m.cost.annual_swipes - annual_swipes).abs() < 1e-9);
        let expected_cost = 12_000.0 * 0.15 + 1_200.0 * 1.20 + (2300.0 * 6.0 + 4600.0 * 3.0) * 12.0 / 9.0 * 0.01;
        assert!((m.cost.annual_cost - expected_cost).abs() < 1e-6);
        assert!((m.cost.cost_per_swipe.unwrap() - expected_cost / annual_swipes).abs() < 1e-9);
    }

    #[test]
    fn eui_excess_is_measured_against_leed_target() {
        let constants = AnalysisConstants::default();
        let readings: Vec<UtilityReading> = Month::ALL
            .into_iter()
            .map(|month| UtilityReading {
                month,
                electricity_kwh: 472_222.0,
                gas_ccf: 0.0,
                water_gal: 0.0,
            })
            .collect();
        let energy = energy_metrics(&readings, &constants);
        let eui = eui_comparison(&energy, &constants);
        assert_eq!(eui.benchmarks.len(), 4);
        assert_eq!(eui.benchmarks[0].eui, eui.current);
        assert!((eui.current - 472_222.0 * 12.0 / 179_616.0).abs() < 1e-9);
        let expected_excess = (eui.current - 8.5) * 179_616.0;
        assert!((eui.excess_kwh - expected_excess).abs() < 1e-6);
        assert!((eui.excess_cost - expected_excess * 0.15).abs() < 1e-6);
    }
}

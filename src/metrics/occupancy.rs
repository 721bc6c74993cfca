use crate::config::{AnalysisConstants, TierThresholds};
use crate::types::{Month, OccupancyRecord, MONTH_COUNT};
use crate::util::{average, percent};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UtilizationTier {
    VeryLow,
    Low,
    Medium,
    High,
}

impl UtilizationTier {
    pub const ALL: [UtilizationTier; 4] = [
        UtilizationTier::VeryLow,
        UtilizationTier::Low,
        UtilizationTier::Medium,
        UtilizationTier::High,
    ];

    /// Closed-open bands: `[0, low)`, `[low, medium)`, `[medium, high)`,
    /// `[high, ..)`. Every count lands in exactly one tier.
    pub fn classify(total_swipes: u64, t: &TierThresholds) -> Self {
        if total_swipes < t.low {
            UtilizationTier::VeryLow
        } else if total_swipes < t.medium {
            UtilizationTier::Low
        } else if total_swipes < t.high {
            UtilizationTier::Medium
        } else {
            UtilizationTier::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UtilizationTier::VeryLow => "Very Low",
            UtilizationTier::Low => "Low",
            UtilizationTier::Medium => "Medium",
            UtilizationTier::High => "High",
        }
    }

    pub fn profile(self) -> &'static str {
        match self {
            UtilizationTier::VeryLow => "Likely fully remote",
            UtilizationTier::Low => "Hybrid occasional",
            UtilizationTier::Medium => "Hybrid regular",
            UtilizationTier::High => "Primarily in-office",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyOccupancy {
    pub month: Month,
    pub total_swipes: u64,
    pub avg_days: f64,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloorOccupancy {
    pub floor: u32,
    pub swipes: u64,
    pub share_pct: f64,
    pub employees: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierCount {
    pub tier: UtilizationTier,
    pub employees: usize,
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyMetrics {
    pub employees: usize,
    pub monthly: Vec<MonthlyOccupancy>,
    pub mean_monthly_swipes: f64,
    pub avg_days_in_office: f64,
    pub attendance_rate: f64,
    /// Sorted by floor number.
    pub floors: Vec<FloorOccupancy>,
    /// One entry per tier in `UtilizationTier::ALL` order.
    pub tiers: Vec<TierCount>,
    pub low_utilizers: usize,
    pub hoteling_sqft: f64,
}

impl OccupancyMetrics {
    pub fn monthly_series(&self) -> Vec<f64> {
        self.monthly.iter().map(|m| m.total_swipes as f64).collect()
    }

    pub fn total_swipes(&self) -> u64 {
        self.monthly.iter().map(|m| m.total_swipes).sum()
    }

    pub fn tier(&self, tier: UtilizationTier) -> usize {
        self.tiers
            .iter()
            .find(|t| t.tier == tier)
            .map(|t| t.employees)
            .unwrap_or(0)
    }
}

/// Average share of working days an employee badged in, as a percentage.
pub fn attendance_rate(monthly_swipes: f64, employees: usize, working_days: f64) -> f64 {
    if employees == 0 || working_days <= 0.0 {
        return 0.0;
    }
    monthly_swipes / employees as f64 / working_days * 100.0
}

pub fn monthly_totals(records: &[OccupancyRecord]) -> [u64; MONTH_COUNT] {
    let mut totals = [0u64; MONTH_COUNT];
    for r in records {
        for (total, swipes) in totals.iter_mut().zip(r.monthly_swipes) {
            *total += u64::from(swipes);
        }
    }
    totals
}

pub fn occupancy_metrics(records: &[OccupancyRecord], constants: &AnalysisConstants) -> OccupancyMetrics {
    let employees = records.len();
    let working_days = constants.building.working_days_per_month;
    let totals = monthly_totals(records);

    let monthly: Vec<MonthlyOccupancy> = Month::ALL
        .into_iter()
        .zip(totals)
        .map(|(month, total)| {
            let avg_days = if employees == 0 {
                0.0
            } else {
                total as f64 / employees as f64
            };
            MonthlyOccupancy {
                month,
                total_swipes: total,
                avg_days,
                attendance_rate: attendance_rate(total as f64, employees, working_days),
            }
        })
        .collect();

    let mean_monthly_swipes = average(&totals.iter().map(|t| *t as f64).collect::<Vec<_>>());
    let avg_days_in_office = average(&monthly.iter().map(|m| m.avg_days).collect::<Vec<_>>());
    let overall_rate = if working_days > 0.0 {
        avg_days_in_office / working_days * 100.0
    } else {
        0.0
    };

    let mut by_floor: BTreeMap<u32, (u64, usize)> = BTreeMap::new();
    for r in records {
        let e = by_floor.entry(r.floor).or_insert((0, 0));
        e.0 += r.total_swipes();
        e.1 += 1;
    }
    let grand_total: u64 = by_floor.values().map(|(s, _)| *s).sum();
    let floors = by_floor
        .into_iter()
        .map(|(floor, (swipes, count))| FloorOccupancy {
            floor,
            swipes,
            share_pct: percent(swipes as f64, grand_total as f64),
            employees: count,
        })
        .collect();

    let mut tier_counts = [0usize; 4];
    for r in records {
        let tier = UtilizationTier::classify(r.total_swipes(), &constants.tiers);
        tier_counts[tier as usize] += 1;
    }
    let tiers: Vec<TierCount> = UtilizationTier::ALL
        .into_iter()
        .zip(tier_counts)
        .map(|(tier, count)| TierCount {
            tier,
            employees: count,
            share_pct: percent(count as f64, employees as f64),
        })
        .collect();

    let low_utilizers =
        tier_counts[UtilizationTier::VeryLow as usize] + tier_counts[UtilizationTier::Low as usize];

    OccupancyMetrics {
        employees,
        monthly,
        mean_monthly_swipes,
        avg_days_in_office,
        attendance_rate: overall_rate,
        floors,
        tiers,
        low_utilizers,
        hoteling_sqft: low_utilizers as f64 * constants.building.sqft_per_employee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn employee(id: &str, floor: u32, monthly_swipes: [u32; MONTH_COUNT]) -> OccupancyRecord {
        OccupancyRecord {
            employee_id: id.to_string(),
            floor,
            monthly_swipes,
        }
    }

    fn with_total(id: usize, total: u32) -> OccupancyRecord {
        let mut months = [0u32; MONTH_COUNT];
        months[0] = total;
        employee(&format!("E{id}"), 1 + (id % 3) as u32, months)
    }

    #[test]
    fn tier_boundaries_are_closed_open() {
        let t = TierThresholds::default();
        assert_eq!(UtilizationTier::classify(0, &t), UtilizationTier::VeryLow);
        assert_eq!(UtilizationTier::classify(29, &t), UtilizationTier::VeryLow);
        assert_eq!(UtilizationTier::classify(30, &t), UtilizationTier::Low);
        assert_eq!(UtilizationTier::classify(89, &t), UtilizationTier::Low);
        assert_eq!(UtilizationTier::classify(90, &t), UtilizationTier::Medium);
        assert_eq!(UtilizationTier::classify(139, &t), UtilizationTier::Medium);
        assert_eq!(UtilizationTier::classify(140, &t), UtilizationTier::High);
        assert_eq!(UtilizationTier::classify(u64::MAX, &t), UtilizationTier::High);
    }

    #[test]
    fn equal_months_give_uniform_attendance() {
        // 100 employees, 10 swipes each per month -> 1,000 swipes a month.
        let records: Vec<_> = (0..100)
            .map(|i| employee(&format!("E{i}"), 1, [10; MONTH_COUNT]))
            .collect();
        let m = occupancy_metrics(&records, &AnalysisConstants::default());
        assert_eq!(m.employees, 100);
        for month in &m.monthly {
            assert_eq!(month.total_swipes, 1000);
            assert!((month.avg_days - 10.0).abs() < 1e-12);
            assert!((month.attendance_rate - 50.0).abs() < 1e-12);
        }
        assert!((m.attendance_rate - 50.0).abs() < 1e-12);
        assert!((m.mean_monthly_swipes - 1000.0).abs() < 1e-12);
    }

    #[test]
    fn attendance_rate_formula() {
        assert!((attendance_rate(1000.0, 100, 20.0) - 50.0).abs() < 1e-12);
        assert!((attendance_rate(100.0, 100, 20.0) - 5.0).abs() < 1e-12);
        assert_eq!(attendance_rate(100.0, 0, 20.0), 0.0);
    }

    #[test]
    fn floors_are_sorted_with_shares() {
        let records = vec![
            employee("A", 3, [1; MONTH_COUNT]),
            employee("B", 1, [2; MONTH_COUNT]),
            employee("C", 1, [1; MONTH_COUNT]),
        ];
        let m = occupancy_metrics(&records, &AnalysisConstants::default());
        assert_eq!(m.floors.len(), 2);
        assert_eq!(m.floors[0].floor, 1);
        assert_eq!(m.floors[0].swipes, 27);
        assert_eq!(m.floors[0].employees, 2);
        assert!((m.floors[0].share_pct - 75.0).abs() < 1e-9);
        assert!((m.floors[1].share_pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn low_utilizers_drive_hoteling_estimate() {
        let records = vec![with_total(0, 10), with_total(1, 50), with_total(2, 100), with_total(3, 200)];
        let m = occupancy_metrics(&records, &AnalysisConstants::default());
        assert_eq!(m.tier(UtilizationTier::VeryLow), 1);
        assert_eq!(m.tier(UtilizationTier::Low), 1);
        assert_eq!(m.tier(UtilizationTier::Medium), 1);
        assert_eq!(m.tier(UtilizationTier::High), 1);
        assert_eq!(m.low_utilizers, 2);
        assert_eq!(m.hoteling_sqft, 240.0);
    }

    #[test]
    fn empty_roster_has_no_ratios() {
        let m = occupancy_metrics(&[], &AnalysisConstants::default());
        assert_eq!(m.employees, 0);
        assert!(m.floors.is_empty());
        assert!(m.monthly.iter().all(|x| x.avg_days == 0.0 && x.attendance_rate == 0.0));
        assert!(m.tiers.iter().all(|t| t.employees == 0 && t.share_pct == 0.0));
    }

    #[test]
    fn counts_near_u32_max_do_not_overflow() {
        let mut months = [0u32; MONTH_COUNT];
        months[0] = 4_000_000_000;
        months[1] = 4_000_000_000;
        let records = vec![employee("E1", 1, months), employee("E2", 1, [1; MONTH_COUNT])];
        assert_eq!(records[0].total_swipes(), 8_000_000_000);

        let m = occupancy_metrics(&records, &AnalysisConstants::default());
        assert_eq!(m.floors[0].swipes, 8_000_000_009);
        assert_eq!(m.tier(UtilizationTier::High), 1);
        assert_eq!(m.tier(UtilizationTier::VeryLow), 1);
    }

    proptest! {
        #[test]
        fn tiers_partition_every_roster(totals in prop::collection::vec(0u32..400, 0..200)) {
            let records: Vec<_> = totals.iter().enumerate().map(|(i, t)| with_total(i, *t)).collect();
            let m = occupancy_metrics(&records, &AnalysisConstants::default());
            let counted: usize = m.tiers.iter().map(|t| t.employees).sum();
            prop_assert_eq!(counted, records.len());
            for t in &totals {
                let t = *t;
                let matches = [t < 30, (30..90).contains(&t), (90..140).contains(&t), t >= 140];
                prop_assert_eq!(matches.iter().filter(|m| **m).count(), 1);
            }
        }

        #[test]
        fn floor_shares_sum_to_one_hundred(
            rows in prop::collection::vec((1u32..7, prop::array::uniform9(0u32..25)), 1..100)
        ) {
            let records: Vec<_> = rows
                .iter()
                .enumerate()
                .map(|(i, (floor, months))| employee(&format!("E{i}"), *floor, *months))
                .collect();
            let m = occupancy_metrics(&records, &AnalysisConstants::default());
            if m.total_swipes() > 0 {
                let sum: f64 = m.floors.iter().map(|f| f.share_pct).sum();
                prop_assert!((sum - 100.0).abs() < 1e-9);
            }
        }

        #[test]
        fn attendance_rate_increases_with_swipes(
            a in 0u32..100_000, b in 0u32..100_000, employees in 1usize..1000
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(attendance_rate(lo as f64, employees, 20.0) <= attendance_rate(hi as f64, employees, 20.0));
            if lo < hi {
                prop_assert!(attendance_rate(lo as f64, employees, 20.0) < attendance_rate(hi as f64, employees, 20.0));
            }
        }
    }
}

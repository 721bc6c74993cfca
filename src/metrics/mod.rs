//! Metric pipeline: pure functions from the loaded [`Dataset`] and the
//! [`AnalysisConstants`] table to plain metric structs.

pub mod advanced;
pub mod conference;
pub mod correlation;
pub mod energy;
pub mod occupancy;

use crate::config::AnalysisConstants;
use crate::types::{Dataset, ReportSummary};
use advanced::AdvancedMetrics;
use conference::ConferenceMetrics;
use correlation::CorrelationMetrics;
use energy::EnergyMetrics;
use occupancy::OccupancyMetrics;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricBundle {
    pub occupancy: OccupancyMetrics,
    pub energy: EnergyMetrics,
    pub correlation: CorrelationMetrics,
    pub conference: ConferenceMetrics,
    pub advanced: AdvancedMetrics,
    /// Roster size assumed by the headcount constant.
    pub configured_headcount: usize,
}

pub fn compute_all(dataset: &Dataset, constants: &AnalysisConstants) -> MetricBundle {
    let occupancy = occupancy::occupancy_metrics(&dataset.occupancy, constants);
    let energy = energy::energy_metrics(&dataset.utilities, constants);
    let correlation = correlation::correlation_metrics(&occupancy, &energy, constants);
    let conference = conference::conference_metrics(
        &dataset.bookings,
        constants.bookings.target_year,
        constants,
    );
    let advanced = advanced::advanced_metrics(
        &dataset.occupancy,
        &dataset.bookings,
        &occupancy,
        &energy,
        constants,
    );
    MetricBundle {
        occupancy,
        energy,
        correlation,
        conference,
        advanced,
        configured_headcount: constants.building.headcount,
    }
}

impl MetricBundle {
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            employees: self.occupancy.employees,
            attendance_rate_pct: self.occupancy.attendance_rate,
            low_utilizers: self.occupancy.low_utilizers,
            total_co2_tons: self.energy.co2.total_tons(),
            water_surge_multiplier: self.energy.water_surge_multiplier,
            corr_electricity: self.correlation.electricity,
            corr_gas: self.correlation.gas,
            corr_water: self.correlation.water,
            correlation_sample_size: self.correlation.sample_size,
            total_bookings: self.conference.total_bookings,
            ghost_bookings: self.conference.ghosts.count,
            ghost_hours: self.conference.ghosts.hours,
            cost_per_swipe: self.advanced.cost.cost_per_swipe,
        }
    }

    /// Data-quality notes the report must carry alongside the figures.
    pub fn caveats(&self) -> Vec<String> {
        let mut notes = Vec::new();
        let c = &self.correlation;
        if c.small_sample {
            notes.push(format!(
                "correlations are computed over {} monthly points, too few for a statistically robust estimate",
                c.sample_size
            ));
        }
        for (name, r) in [("electricity", c.electricity), ("gas", c.gas), ("water", c.water)] {
            if r.is_none() {
                notes.push(format!(
                    "occupancy vs {name} correlation is undefined (a constant or mismatched series)"
                ));
            }
        }
        if self.occupancy.employees != self.configured_headcount {
            notes.push(format!(
                "badge file lists {} employees but the headcount constant is {}; per-capita rates use the badge roster, occupancy rate and remote share use the constant",
                self.occupancy.employees, self.configured_headcount
            ));
        }
        notes.extend(self.energy.reference_notes.iter().cloned());
        notes
    }
}

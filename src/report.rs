//! Text rendering of a [`MetricBundle`]. Nothing here computes metrics; every
//! figure comes from the bundle.

use crate::config::{AnalysisConstants, TierThresholds};
use crate::loader::LoadSummary;
use crate::metrics::advanced::AdvancedMetrics;
use crate::metrics::conference::ConferenceMetrics;
use crate::metrics::correlation::{CorrelationMetrics, CorrelationStrength};
use crate::metrics::energy::{EnergyMetrics, PeakMonth};
use crate::metrics::occupancy::{OccupancyMetrics, UtilizationTier};
use crate::metrics::MetricBundle;
use crate::output::render_table;
use crate::types::{
    BookingTypeRow, FloorEfficiencyRow, FloorShareRow, Month, MonthlyOccupancyRow,
    MonthlyUtilityRow, TierRow,
};
use crate::util::{format_int, format_number, format_opt};
use std::fmt;

const RULE_WIDTH: usize = 60;

fn pct(v: f64) -> String {
    format!("{}%", format_number(v, 1))
}

fn heading(out: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "{title}")?;
    writeln!(out, "{rule}")
}

fn subheading(out: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

fn coefficient(r: Option<f64>) -> String {
    match r {
        Some(r) => format!("{r:+.3} ({})", CorrelationStrength::describe(r)),
        None => "undefined".to_string(),
    }
}

fn peak(p: Option<PeakMonth>, unit: &str) -> String {
    match p {
        Some(p) => format!("{} ({} {unit})", p.month, format_number(p.value, 0)),
        None => "n/a".to_string(),
    }
}

fn month_names(v: &[(Month, u64)]) -> String {
    v.iter().map(|(m, _)| m.label()).collect::<Vec<_>>().join(", ")
}

fn tier_range(tier: UtilizationTier, t: &TierThresholds) -> String {
    match tier {
        UtilizationTier::VeryLow => format!("<{}", t.low),
        UtilizationTier::Low => format!("{}-{}", t.low, t.medium.saturating_sub(1)),
        UtilizationTier::Medium => format!("{}-{}", t.medium, t.high.saturating_sub(1)),
        UtilizationTier::High => format!("{}+", t.high),
    }
}

pub fn monthly_rows(m: &OccupancyMetrics) -> Vec<MonthlyOccupancyRow> {
    m.monthly
        .iter()
        .map(|x| MonthlyOccupancyRow {
            month: x.month.to_string(),
            total_swipes: format_int(x.total_swipes),
            avg_days: format_number(x.avg_days, 1),
            attendance_rate: pct(x.attendance_rate),
        })
        .collect()
}

pub fn floor_rows(m: &OccupancyMetrics) -> Vec<FloorShareRow> {
    m.floors
        .iter()
        .map(|f| FloorShareRow {
            floor: f.floor,
            swipes: format_int(f.swipes),
            share: pct(f.share_pct),
            employees: f.employees,
        })
        .collect()
}

/// The full text report; render with `to_string()` or write it anywhere a
/// `Display` value goes.
pub struct Report<'a> {
    pub bundle: &'a MetricBundle,
    pub load: &'a LoadSummary,
    pub constants: &'a AnalysisConstants,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_report(f, self.bundle, self.load, self.constants)
    }
}

pub fn render(bundle: &MetricBundle, load: &LoadSummary, constants: &AnalysisConstants) -> String {
    Report { bundle, load, constants }.to_string()
}

fn write_report(
    out: &mut fmt::Formatter<'_>,
    bundle: &MetricBundle,
    load: &LoadSummary,
    constants: &AnalysisConstants,
) -> fmt::Result {
    writeln!(out, "BUILDING USAGE ANALYSIS REPORT")?;
    write_load(out, load)?;
    write_occupancy(out, &bundle.occupancy, constants)?;
    write_energy(out, &bundle.energy)?;
    write_correlation(out, &bundle.correlation)?;
    write_conference(out, &bundle.conference, constants)?;
    write_advanced(out, &bundle.advanced, constants)?;
    write_executive_summary(out, bundle)?;
    write_caveats(out, &bundle.caveats())
}

fn write_load(out: &mut fmt::Formatter<'_>, load: &LoadSummary) -> fmt::Result {
    subheading(out, "Datasets")?;
    let line = |label: &str, unit: &str, loaded: usize, skipped: usize| {
        if skipped > 0 {
            format!("  {label}: {} {unit} ({} rows dropped)", format_int(loaded), format_int(skipped))
        } else {
            format!("  {label}: {} {unit}", format_int(loaded))
        }
    };
    writeln!(out, "{}", line("Badge data", "employees", load.badges.loaded_rows, load.badges.skipped_rows))?;
    writeln!(out, "{}", line("Utility data", "months", load.utilities.loaded_rows, load.utilities.skipped_rows))?;
    writeln!(out, "{}", line("Conference data", "bookings", load.bookings.loaded_rows, load.bookings.skipped_rows))
}

fn write_occupancy(out: &mut fmt::Formatter<'_>, m: &OccupancyMetrics, constants: &AnalysisConstants) -> fmt::Result {
    heading(out, "OCCUPANCY PATTERN ANALYSIS")?;
    writeln!(out)?;
    writeln!(out, "Monthly Occupancy Metrics:")?;
    writeln!(out, "{}", render_table(&monthly_rows(m)))?;
    writeln!(
        out,
        "AVERAGE: {} swipes/month, {} days/employee, {} attendance",
        format_number(m.mean_monthly_swipes, 0),
        format_number(m.avg_days_in_office, 1),
        pct(m.attendance_rate)
    )?;

    writeln!(out)?;
    writeln!(out, "Total Swipes by Floor:")?;
    writeln!(out, "{}", render_table(&floor_rows(m)))?;

    let tiers: Vec<TierRow> = m
        .tiers
        .iter()
        .map(|t| TierRow {
            tier: format!("{} ({} swipes)", t.tier.label(), tier_range(t.tier, &constants.tiers)),
            employees: t.employees,
            share: pct(t.share_pct),
            profile: t.tier.profile().to_string(),
        })
        .collect();
    writeln!(out)?;
    writeln!(out, "Employee Utilization Distribution:")?;
    writeln!(out, "{}", render_table(&tiers))?;

    let share = crate::util::percent(m.low_utilizers as f64, m.employees as f64);
    writeln!(out)?;
    writeln!(out, "Key insight:")?;
    writeln!(
        out,
        "  {} employees ({}) are rarely on-site",
        format_int(m.low_utilizers),
        pct(share)
    )?;
    writeln!(
        out,
        "  Opportunity for hoteling/space optimization: ~{} sqft",
        format_number(m.hoteling_sqft, 0)
    )
}

fn write_energy(out: &mut fmt::Formatter<'_>, e: &EnergyMetrics) -> fmt::Result {
    heading(out, "ENERGY CONSUMPTION ANALYSIS")?;
    writeln!(out)?;
    writeln!(out, "Annual Consumption (annualized from {} months):", e.months.len())?;
    writeln!(out, "  Electricity: {} kWh", format_number(e.annual.electricity_kwh, 0))?;
    writeln!(out, "  Natural Gas: {} CCF", format_number(e.annual.gas_ccf, 0))?;
    writeln!(out, "  Water:       {} gallons", format_number(e.annual.water_gal, 0))?;
    writeln!(out)?;
    writeln!(out, "Per Square Foot ({} sqft):", format_number(e.total_sqft, 0))?;
    writeln!(out, "  Electricity: {} kWh/sqft/yr", format_number(e.per_sqft.electricity_kwh, 1))?;
    writeln!(out, "  Natural Gas: {} CCF/sqft/yr", format_number(e.per_sqft.gas_ccf, 2))?;
    writeln!(out, "  Water:       {} gal/sqft/yr", format_number(e.per_sqft.water_gal, 1))?;

    let rows: Vec<MonthlyUtilityRow> = e
        .months
        .iter()
        .enumerate()
        .map(|(i, month)| MonthlyUtilityRow {
            month: month.to_string(),
            electricity: format_number(e.series.electricity_kwh[i], 0),
            gas: format_number(e.series.gas_ccf[i], 0),
            water: format_number(e.series.water_gal[i], 0),
        })
        .collect();
    writeln!(out)?;
    writeln!(out, "Monthly Breakdown:")?;
    writeln!(out, "{}", render_table(&rows))?;

    writeln!(out)?;
    writeln!(out, "Seasonal Insights:")?;
    writeln!(out, "  Peak electricity: {}", peak(e.peak_electricity, "kWh"))?;
    writeln!(out, "  Peak gas: {}", peak(e.peak_gas, "CCF"))?;
    writeln!(out, "  Spring water avg: {} gal", format_number(e.spring_water_mean, 0))?;
    writeln!(out, "  Summer water avg: {} gal", format_number(e.summer_water_mean, 0))?;
    match e.water_surge_multiplier {
        Some(x) => writeln!(out, "  Summer surge: {x:.1}x spring usage")?,
        None => writeln!(out, "  Summer surge: undefined (no spring baseline)")?,
    }

    let co2 = &e.co2;
    writeln!(out)?;
    writeln!(out, "Estimated Annual CO2 Emissions:")?;
    writeln!(out, "  From Electricity (direct): {} tons", format_number(co2.electricity_tons, 0))?;
    writeln!(out, "  From Natural Gas: {} tons", format_number(co2.gas_tons, 0))?;
    writeln!(out, "  From Water (embedded energy): {} tons", format_number(co2.water_tons, 0))?;
    writeln!(out, "     Supply/treatment: {} tons", format_number(co2.water_supply_tons, 0))?;
    writeln!(out, "     Wastewater treatment: {} tons", format_number(co2.wastewater_tons, 0))?;
    writeln!(out, "  TOTAL: {} tons CO2", format_number(co2.total_tons(), 0))?;
    writeln!(out)?;
    writeln!(out, "Water embedded energy: {} kWh", format_number(e.water_embedded_kwh, 0))?;
    writeln!(
        out,
        "  As % of direct electricity: {}",
        e.embedded_share_of_electricity_pct
            .map(pct)
            .unwrap_or_else(|| "n/a".to_string())
    )
}

fn write_correlation(out: &mut fmt::Formatter<'_>, c: &CorrelationMetrics) -> fmt::Result {
    heading(out, "OCCUPANCY vs ENERGY CORRELATION ANALYSIS")?;
    writeln!(out)?;
    writeln!(out, "Correlation Coefficients (Occupancy vs Resources):")?;
    writeln!(out, "  Electricity: {}", coefficient(c.electricity))?;
    writeln!(out, "  Natural Gas: {}", coefficient(c.gas))?;
    writeln!(out, "  Water:       {}", coefficient(c.water))?;
    if c.small_sample {
        writeln!(
            out,
            "  Caveat: n = {} monthly points; treat these coefficients as indicative only.",
            c.sample_size
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Interpretation:")?;
    let mut any = false;
    if let Some(r) = c.electricity.filter(|r| r.abs() < 0.4) {
        any = true;
        writeln!(out, "  Electricity: weak link to occupancy ({r:.2}); load follows heating/cooling, not people")?;
    }
    if let Some(r) = c.gas.filter(|r| *r < -0.5) {
        any = true;
        writeln!(out, "  Natural gas: strong negative link ({r:.2}); driven by weather, not people")?;
    }
    if let Some(r) = c.water.filter(|r| *r > 0.5) {
        any = true;
        writeln!(out, "  Water: strong positive link ({r:.2}); summer peaks exceed what occupancy explains")?;
    }
    if !any {
        writeln!(out, "  No notable occupancy-driven pattern.")?;
    }

    writeln!(out)?;
    writeln!(out, "Key finding:")?;
    writeln!(out, "  Average occupancy rate: {}", pct(c.occupancy_rate))?;
    writeln!(
        out,
        "  Conditioning {} empty space; estimated waste: ${}/year",
        pct((100.0 - c.occupancy_rate).max(0.0)),
        format_number(c.idle_conditioning_cost, 0)
    )?;
    writeln!(out)?;
    writeln!(out, "Per-Occupant Consumption:")?;
    writeln!(out, "  Electricity: {} kWh per badge swipe", format_opt(c.electricity_per_swipe, 1))?;
    writeln!(out, "  Water: {} gallons per badge swipe", format_opt(c.water_per_swipe, 0))
}

fn write_conference(out: &mut fmt::Formatter<'_>, m: &ConferenceMetrics, constants: &AnalysisConstants) -> fmt::Result {
    let rules = &constants.bookings;
    heading(out, "CONFERENCE ROOM UTILIZATION ANALYSIS")?;
    writeln!(out)?;
    writeln!(out, "Room Utilization ({}):", m.year)?;
    writeln!(out, "  Total Bookings: {}", format_int(m.total_bookings))?;
    writeln!(out, "  Total Attendees: {}", format_int(m.total_attendees))?;
    writeln!(out, "  Total Hours Booked: {}", format_number(m.total_hours, 0))?;

    let scope = match &m.excluded_type {
        Some(t) => format!("0 attendees, excluding {t}"),
        None => "0 attendees".to_string(),
    };
    writeln!(out)?;
    writeln!(
        out,
        "Ghost Bookings ({scope}): {} ({})",
        format_int(m.ghosts.count),
        pct(m.ghosts.share_pct)
    )?;
    if let Some(t) = &m.excluded_type {
        writeln!(
            out,
            "  {t} with 0 recorded attendees: {} (attendance tracked separately)",
            format_int(m.excluded_zero_attendee)
        )?;
        writeln!(out, "  Zero-attendee bookings of any type: {}", format_int(m.ghost_count_all_types))?;
    }
    writeln!(out, "  Wasted Hours: {} hours", format_number(m.ghosts.hours, 0))?;
    writeln!(
        out,
        "  Estimated wasted energy: {} kWh (@ {} kWh/hour HVAC+lighting)",
        format_number(m.ghosts.wasted_kwh, 0),
        format_number(rules.wasted_kwh_per_hour, 0)
    )?;
    writeln!(out, "  Annual cost: ${}", format_number(m.ghosts.annual_cost, 0))?;

    let rows: Vec<BookingTypeRow> = m
        .top_types
        .iter()
        .map(|t| BookingTypeRow {
            booking_type: t.booking_type.clone(),
            count: t.count,
            share: pct(t.share_pct),
        })
        .collect();
    writeln!(out)?;
    writeln!(out, "Top Booking Types:")?;
    writeln!(out, "{}", render_table(&rows))
}

fn write_advanced(out: &mut fmt::Formatter<'_>, a: &AdvancedMetrics, constants: &AnalysisConstants) -> fmt::Result {
    heading(out, "ADVANCED METRICS & TRENDS")?;

    subheading(out, "1. PEAK vs OFF-PEAK OCCUPANCY PATTERNS")?;
    writeln!(out, "  Peak months: {} (avg: {} swipes)", month_names(&a.ranking.peak), format_number(a.ranking.peak_mean, 0))?;
    writeln!(out, "  Low months:  {} (avg: {} swipes)", month_names(&a.ranking.low), format_number(a.ranking.low_mean, 0))?;
    writeln!(out, "  Difference: {}", a.ranking.spread_pct.map(pct).unwrap_or_else(|| "n/a".to_string()))?;
    if !a.ranking.low.is_empty() {
        writeln!(out, "  Opportunity: schedule maintenance/upgrades during {}", month_names(&a.ranking.low))?;
    }

    subheading(out, "2. FLOOR SPACE EFFICIENCY")?;
    let rows: Vec<FloorEfficiencyRow> = a
        .floors
        .iter()
        .map(|f| FloorEfficiencyRow {
            floor: f.floor,
            employees: f.employees,
            sqft: format_number(f.sqft, 0),
            swipes: format_int(f.swipes),
            swipes_per_sqft: format_number(f.swipes_per_sqft, 2),
            efficiency: pct(f.efficiency_pct),
        })
        .collect();
    writeln!(out, "{}", render_table(&rows))?;
    if let Some(floor) = a.least_efficient_floor {
        writeln!(out, "  Floor {floor} is the least utilized; candidate for hoteling/consolidation")?;
    }

    subheading(out, "3. ENERGY INTENSITY BENCHMARKING")?;
    writeln!(out, "  Energy Use Intensity (EUI) Comparison:")?;
    for b in &a.eui.benchmarks {
        let bar = "#".repeat((b.eui * 2.0).clamp(0.0, 200.0) as usize);
        writeln!(out, "  {:<26} {:>5.1} kWh/sqft/yr {bar}", b.label, b.eui)?;
    }
    writeln!(
        out,
        "  Current EUI: {:.1} kWh/sqft/yr ({} office average)",
        a.eui.current,
        a.eui.ratio_to_office_average
            .map(|r| format!("{r:.1}x"))
            .unwrap_or_else(|| "n/a vs".to_string())
    )?;
    writeln!(out, "  Target (LEED Platinum): {:.1} kWh/sqft/yr", a.eui.target)?;
    writeln!(
        out,
        "  Excess consumption: {} kWh/yr = ${}/yr",
        format_number(a.eui.excess_kwh, 0),
        format_number(a.eui.excess_cost, 0)
    )?;

    subheading(out, "4. MONTHLY OCCUPANCY TREND ANALYSIS")?;
    writeln!(out, "  Month-over-Month Changes:")?;
    for c in &a.month_changes {
        match c.pct {
            Some(p) => {
                let arrow = if p > 0.0 { "up" } else if p < 0.0 { "down" } else { "flat" };
                writeln!(out, "  {} -> {}: {arrow} {:.1}%", c.from, c.to, p.abs())?
            }
            None => writeln!(out, "  {} -> {}: n/a (no swipes in {})", c.from, c.to, c.from)?,
        }
    }
    let trend_window = constants.windows.summer_trend;
    match a.summer_trend_pct {
        Some(t) => writeln!(out, "  Summer trend (into {}): {:+.1}% avg", trend_window.label(), t)?,
        None => writeln!(out, "  Summer trend (into {}): n/a", trend_window.label())?,
    }

    subheading(out, "5. CONFERENCE ROOM COST-BENEFIT")?;
    if a.room_categories.is_empty() {
        writeln!(out, "  No bookings in the configured room categories.")?;
    }
    for r in &a.room_categories {
        writeln!(out, "  {}:", r.category)?;
        writeln!(out, "     Bookings: {}", format_int(r.bookings))?;
        writeln!(out, "     Avg attendance: {} people", format_opt(r.avg_attendees, 0))?;
        writeln!(out, "     Ghost bookings: {}", pct(r.ghost_share_pct))?;
    }

    subheading(out, "6. REMOTE WORK FINANCIAL IMPACT")?;
    let remote = &a.remote;
    writeln!(
        out,
        "  Remote/Hybrid Employees: {} ({} of headcount; {} fully remote)",
        format_int(remote.remote_total),
        pct(remote.share_of_headcount_pct),
        format_int(remote.full_remote)
    )?;
    writeln!(out, "  Potential space reduction: {} sqft", format_number(remote.space_reduction_sqft, 0))?;
    writeln!(out, "  Annual operating cost savings: ${}", format_number(remote.annual_savings, 0))?;

    subheading(out, "7. WATER CONSUMPTION ANOMALY DETECTION")?;
    writeln!(out, "  Water consumption per badge swipe by month:")?;
    for (month, v) in &a.water.per_swipe {
        writeln!(out, "  {month}: {} gallons/swipe", format_opt(*v, 0))?;
    }
    match a.water.summer_to_winter {
        Some(r) => {
            writeln!(out, "  Summer water/occupant is {r:.1}x winter")?;
            writeln!(out, "  Implied excess: ~{}", a.water.excess_pct.map(|p| format!("{p:.0}%")).unwrap_or_default())?;
        }
        None => writeln!(out, "  Summer/winter ratio: undefined")?,
    }

    subheading(out, "8. OPERATIONAL COST EFFICIENCY")?;
    let cost = &a.cost;
    writeln!(out, "  Total annual operating cost: ${}", format_number(cost.annual_cost, 0))?;
    writeln!(out, "  Estimated annual swipes: {}", format_number(cost.annual_swipes, 0))?;
    writeln!(out, "  Cost per badge swipe: ${}", format_opt(cost.cost_per_swipe, 2))?;
    writeln!(
        out,
        "  Cost per employee-year: ${} (assuming {} days/yr)",
        format_opt(cost.cost_per_employee_year, 2),
        format_number(constants.remote.office_days_per_year, 0)
    )
}

fn write_executive_summary(out: &mut fmt::Formatter<'_>, bundle: &MetricBundle) -> fmt::Result {
    let summary = bundle.summary();
    let occupancy = &bundle.occupancy;
    let energy = &bundle.energy;
    let co2 = &energy.co2;
    let conference = &bundle.conference;

    heading(out, "EXECUTIVE SUMMARY")?;

    writeln!(out)?;
    writeln!(out, "1. OCCUPANCY")?;
    writeln!(
        out,
        "   - Average attendance: {} of possible days (~{} days/month per employee)",
        pct(summary.attendance_rate_pct),
        format_number(occupancy.avg_days_in_office, 1)
    )?;
    writeln!(
        out,
        "   - {} of {} employees ({}) rarely on-site",
        format_int(summary.low_utilizers),
        format_int(summary.employees),
        pct(crate::util::percent(summary.low_utilizers as f64, summary.employees as f64))
    )?;
    writeln!(
        out,
        "   - Opportunity: hoteling/space optimization for ~{} sqft",
        format_number(occupancy.hoteling_sqft, 0)
    )?;

    writeln!(out)?;
    writeln!(out, "2. ENERGY-OCCUPANCY CORRELATION")?;
    writeln!(out, "   - Occupancy vs electricity: {}", coefficient(summary.corr_electricity))?;
    writeln!(out, "   - Occupancy vs natural gas: {}", coefficient(summary.corr_gas))?;
    writeln!(out, "   - Occupancy vs water: {}", coefficient(summary.corr_water))?;
    writeln!(
        out,
        "   - ~{} of conditioned space idle; estimated waste ${}/year",
        pct((100.0 - bundle.correlation.occupancy_rate).max(0.0)),
        format_number(bundle.correlation.idle_conditioning_cost, 0)
    )?;

    writeln!(out)?;
    writeln!(out, "3. RESOURCE CONSUMPTION")?;
    let peaks_in = |p: Option<PeakMonth>| match p {
        Some(p) => format!(", peaks in {}", p.month),
        None => String::new(),
    };
    writeln!(
        out,
        "   - Electricity: {} kWh/year{}",
        format_number(energy.annual.electricity_kwh, 0),
        peaks_in(energy.peak_electricity)
    )?;
    writeln!(
        out,
        "   - Natural Gas: {} CCF/year{}",
        format_number(energy.annual.gas_ccf, 0),
        peaks_in(energy.peak_gas)
    )?;
    let surge = summary
        .water_surge_multiplier
        .map(|x| format!(" ({x:.1}x summer surge)"))
        .unwrap_or_default();
    writeln!(out, "   - Water: {} gallons/year{surge}", format_number(energy.annual.water_gal, 0))?;
    writeln!(out, "   - CO2 Emissions: {} tons/year total", format_number(summary.total_co2_tons, 0))?;
    writeln!(out, "     Direct electricity: {} tons", format_number(co2.electricity_tons, 0))?;
    writeln!(out, "     Natural gas: {} tons", format_number(co2.gas_tons, 0))?;
    writeln!(
        out,
        "     Water (embedded): {} tons ({} of total)",
        format_number(co2.water_tons, 0),
        pct(crate::util::percent(co2.water_tons, summary.total_co2_tons))
    )?;

    writeln!(out)?;
    writeln!(out, "4. CONFERENCE ROOMS ({})", conference.year)?;
    writeln!(
        out,
        "   - {} ghost bookings of {} ({}) = {} wasted hours",
        format_int(summary.ghost_bookings),
        format_int(summary.total_bookings),
        pct(conference.ghosts.share_pct),
        format_number(summary.ghost_hours, 0)
    )?;
    writeln!(
        out,
        "   - Estimated waste: ${}/year in unnecessary conditioning",
        format_number(conference.ghosts.annual_cost, 0)
    )?;
    writeln!(out, "   - Cost per badge swipe: ${}", format_opt(summary.cost_per_swipe, 2))
}

fn write_caveats(out: &mut fmt::Formatter<'_>, caveats: &[String]) -> fmt::Result {
    heading(out, "DATA CAVEATS")?;
    if caveats.is_empty() {
        return writeln!(out, "  none");
    }
    for c in caveats {
        writeln!(out, "  - {c}")?;
    }
    Ok(())
}

use crate::config::{AnalysisConstants, EmissionFactors, MonthWindow, ReferenceTotals};
use crate::types::{Month, UtilityReading};
use crate::util::{average, ratio};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceSeries {
    pub electricity_kwh: Vec<f64>,
    pub gas_ccf: Vec<f64>,
    pub water_gal: Vec<f64>,
}

impl ResourceSeries {
    pub fn from_readings(readings: &[UtilityReading]) -> Self {
        Self {
            electricity_kwh: readings.iter().map(|r| r.electricity_kwh).collect(),
            gas_ccf: readings.iter().map(|r| r.gas_ccf).collect(),
            water_gal: readings.iter().map(|r| r.water_gal).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.electricity_kwh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.electricity_kwh.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ResourceTotals {
    pub electricity_kwh: f64,
    pub gas_ccf: f64,
    pub water_gal: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeakMonth {
    pub month: Month,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Co2Estimate {
    pub electricity_tons: f64,
    pub gas_tons: f64,
    pub water_tons: f64,
    pub water_supply_tons: f64,
    pub wastewater_tons: f64,
}

impl Co2Estimate {
    pub fn direct_tons(&self) -> f64 {
        self.electricity_tons + self.gas_tons
    }

    pub fn total_tons(&self) -> f64 {
        self.direct_tons() + self.water_tons
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyMetrics {
    pub total_sqft: f64,
    pub months: Vec<Month>,
    pub series: ResourceSeries,
    pub annual: ResourceTotals,
    /// Annual consumption per square foot of conditioned area.
    pub per_sqft: ResourceTotals,
    pub peak_electricity: Option<PeakMonth>,
    pub peak_gas: Option<PeakMonth>,
    pub spring_water_mean: f64,
    pub summer_water_mean: f64,
    pub water_surge_multiplier: Option<f64>,
    pub co2: Co2Estimate,
    pub water_embedded_kwh: f64,
    pub embedded_share_of_electricity_pct: Option<f64>,
    /// Differences between the loaded totals and the reference totals.
    pub reference_notes: Vec<String>,
}

/// Largest value of a month-indexed series; the earliest month wins ties.
pub fn peak_month(months: &[Month], series: &[f64]) -> Option<PeakMonth> {
    months
        .iter()
        .zip(series)
        .fold(None, |best: Option<PeakMonth>, (month, value)| match best {
            Some(b) if b.value >= *value => Some(b),
            _ => Some(PeakMonth {
                month: *month,
                value: *value,
            }),
        })
}

/// Mean over `peak` divided by mean over `baseline`.
pub fn surge_multiplier(series: &[f64], baseline: MonthWindow, peak: MonthWindow) -> Option<f64> {
    let base = baseline.slice(series);
    let high = peak.slice(series);
    if base.is_empty() || high.is_empty() {
        return None;
    }
    ratio(average(high), average(base))
}

pub fn co2_estimate(annual: &ResourceTotals, f: &EmissionFactors) -> Co2Estimate {
    let kgal = annual.water_gal / 1000.0;
    let to_tons = |kwh: f64| kwh * f.electricity_lbs_per_kwh / f.lbs_per_ton;
    Co2Estimate {
        electricity_tons: to_tons(annual.electricity_kwh),
        gas_tons: annual.gas_ccf * f.gas_lbs_per_ccf / f.lbs_per_ton,
        water_tons: to_tons(kgal * f.water_embedded_kwh_per_kgal()),
        water_supply_tons: to_tons(kgal * f.water_supply_kwh_per_kgal),
        wastewater_tons: to_tons(kgal * f.wastewater_kwh_per_kgal),
    }
}

fn reference_notes(annual: &ResourceTotals, reference: &ReferenceTotals) -> Vec<String> {
    [
        ("electricity", "kWh", annual.electricity_kwh, reference.electricity_kwh),
        ("natural gas", "CCF", annual.gas_ccf, reference.gas_ccf),
        ("water", "gal", annual.water_gal, reference.water_gal),
    ]
    .into_iter()
    .filter_map(|(name, unit, loaded, expected)| {
        let drift = ratio(loaded - expected, expected)?;
        (drift.abs() > reference.tolerance).then(|| {
            format!(
                "annualized {name} from the utility file ({loaded:.0} {unit}) differs from the reference total ({expected:.0} {unit}) by {:+.1}%; the utility file is used",
                drift * 100.0
            )
        })
    })
    .collect()
}

pub fn energy_metrics(readings: &[UtilityReading], constants: &AnalysisConstants) -> EnergyMetrics {
    let total_sqft = constants.building.total_sqft();
    let months: Vec<Month> = readings.iter().map(|r| r.month).collect();
    let series = ResourceSeries::from_readings(readings);

    let annualize = |values: &[f64]| -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() * constants.months_per_year / values.len() as f64
    };
    let annual = ResourceTotals {
        electricity_kwh: annualize(&series.electricity_kwh),
        gas_ccf: annualize(&series.gas_ccf),
        water_gal: annualize(&series.water_gal),
    };
    let per_area = |v: f64| ratio(v, total_sqft).unwrap_or(0.0);
    let per_sqft = ResourceTotals {
        electricity_kwh: per_area(annual.electricity_kwh),
        gas_ccf: per_area(annual.gas_ccf),
        water_gal: per_area(annual.water_gal),
    };

    let windows = &constants.windows;
    let spring_water_mean = average(windows.spring.slice(&series.water_gal));
    let summer_water_mean = average(windows.summer.slice(&series.water_gal));
    let water_surge_multiplier = surge_multiplier(&series.water_gal, windows.spring, windows.summer);

    let co2 = co2_estimate(&annual, &constants.emissions);
    let water_embedded_kwh =
        annual.water_gal / 1000.0 * constants.emissions.water_embedded_kwh_per_kgal();
    let embedded_share_of_electricity_pct =
        ratio(water_embedded_kwh, annual.electricity_kwh).map(|r| r * 100.0);

    let reference_notes = constants
        .reference
        .as_ref()
        .map(|r| reference_notes(&annual, r))
        .unwrap_or_default();

    EnergyMetrics {
        total_sqft,
        peak_electricity: peak_month(&months, &series.electricity_kwh),
        peak_gas: peak_month(&months, &series.gas_ccf),
        months,
        series,
        annual,
        per_sqft,
        spring_water_mean,
        summer_water_mean,
        water_surge_multiplier,
        co2,
        water_embedded_kwh,
        embedded_share_of_electricity_pct,
        reference_notes,
    }
}

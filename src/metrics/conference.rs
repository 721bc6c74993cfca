use crate::config::AnalysisConstants;
use crate::types::BookingRecord;
use crate::util::percent;
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GhostSummary {
    pub count: usize,
    pub share_pct: f64,
    pub hours: f64,
    pub wasted_kwh: f64,
    pub annual_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingTypeCount {
    pub booking_type: String,
    pub count: usize,
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConferenceMetrics {
    pub year: i32,
    pub total_bookings: usize,
    pub total_attendees: u64,
    pub total_hours: f64,
    /// Zero-attendee bookings, excluding the configured booking type.
    pub ghosts: GhostSummary,
    /// Zero-attendee bookings of every type.
    pub ghost_count_all_types: usize,
    pub excluded_type: Option<String>,
    pub excluded_zero_attendee: usize,
    pub top_types: Vec<BookingTypeCount>,
}

pub fn bookings_in_year(bookings: &[BookingRecord], year: i32) -> Vec<&BookingRecord> {
    bookings.iter().filter(|b| b.date.year() == year).collect()
}

fn matches_type(b: &BookingRecord, booking_type: &str) -> bool {
    b.booking_type.trim().eq_ignore_ascii_case(booking_type.trim())
}

/// A booking with a recorded attendee count of zero, unless it is of the
/// excluded type (whose attendance is captured some other way).
pub fn is_ghost(b: &BookingRecord, excluded_type: Option<&str>) -> bool {
    b.attendees == Some(0) && !excluded_type.is_some_and(|t| matches_type(b, t))
}

pub fn ghost_count<'a, I>(bookings: I, excluded_type: Option<&str>) -> usize
where
    I: IntoIterator<Item = &'a BookingRecord>,
{
    bookings
        .into_iter()
        .filter(|b| is_ghost(b, excluded_type))
        .count()
}

/// Most frequent booking types, ties broken alphabetically.
pub fn top_booking_types(bookings: &[&BookingRecord], n: usize) -> Vec<BookingTypeCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for b in bookings {
        *counts.entry(b.booking_type.as_str()).or_default() += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(n)
        .map(|(t, count)| BookingTypeCount {
            booking_type: t.to_string(),
            count,
            share_pct: percent(count as f64, bookings.len() as f64),
        })
        .collect()
}

pub fn conference_metrics(
    bookings: &[BookingRecord],
    year: i32,
    constants: &AnalysisConstants,
) -> ConferenceMetrics {
    let rules = &constants.bookings;
    let in_year = bookings_in_year(bookings, year);
    let hours = |b: &BookingRecord| {
        b.duration_hours(rules.max_duration_hours, rules.sentinel_duration_hours)
            .unwrap_or(0.0)
    };

    let total_bookings = in_year.len();
    let total_attendees: u64 = in_year
        .iter()
        .filter_map(|b| b.attendees)
        .map(u64::from)
        .sum();
    let total_hours: f64 = in_year.iter().map(|b| hours(*b)).sum();

    let excluded = rules.excluded_ghost_type.as_deref();
    let ghosts: Vec<&BookingRecord> = in_year
        .iter()
        .copied()
        .filter(|b| is_ghost(b, excluded))
        .collect();
    let ghost_hours: f64 = ghosts.iter().map(|b| hours(*b)).sum();
    let wasted_kwh = ghost_hours * rules.wasted_kwh_per_hour;
    let ghost_summary = GhostSummary {
        count: ghosts.len(),
        share_pct: percent(ghosts.len() as f64, total_bookings as f64),
        hours: ghost_hours,
        wasted_kwh,
        annual_cost: wasted_kwh
            * constants.prices.electricity_per_kwh
            * constants.annualization_factor(),
    };

    let excluded_zero_attendee = match excluded {
        Some(t) => in_year
            .iter()
            .filter(|b| b.attendees == Some(0) && matches_type(b, t))
            .count(),
        None => 0,
    };

    ConferenceMetrics {
        year,
        total_bookings,
        total_attendees,
        total_hours,
        ghosts: ghost_summary,
        ghost_count_all_types: ghost_count(in_year.iter().copied(), None),
        excluded_type: rules.excluded_ghost_type.clone(),
        excluded_zero_attendee,
        top_types: top_booking_types(&in_year, rules.top_types),
    }
}

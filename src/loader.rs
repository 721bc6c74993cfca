use crate::config::LoaderSettings;
use crate::error::LoadError;
use crate::types::{BookingRecord, Dataset, Month, OccupancyRecord, UtilityReading, MONTH_COUNT};
use crate::util::{parse_count_safe, parse_date_safe, parse_f64_safe, parse_time_safe};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub badges: LoadReport,
    pub utilities: LoadReport,
    pub bookings: LoadReport,
}

#[derive(Debug, Clone)]
pub struct DatasetPaths {
    pub badges: PathBuf,
    pub utilities: PathBuf,
    pub bookings: PathBuf,
}

pub fn load_dataset(
    paths: &DatasetPaths,
    settings: &LoaderSettings,
) -> Result<(Dataset, LoadSummary), LoadError> {
    let (occupancy, badges) = load_badges(&paths.badges, settings.badge_preamble_lines)?;
    let (utilities, utility_report) =
        load_utilities(&paths.utilities, settings.utility_preamble_lines)?;
    let (bookings, booking_report) =
        load_bookings(&paths.bookings, settings.booking_preamble_lines)?;
    let dataset = Dataset {
        occupancy,
        utilities,
        bookings,
    };
    let summary = LoadSummary {
        badges,
        utilities: utility_report,
        bookings: booking_report,
    };
    Ok((dataset, summary))
}

/// Open a CSV file whose header row follows `preamble_lines` free-form lines.
/// Header names and fields are trimmed.
fn open_csv(path: &Path, preamble_lines: usize) -> Result<csv::Reader<BufReader<File>>, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut discard = String::new();
    for _ in 0..preamble_lines {
        discard.clear();
        if reader
            .read_line(&mut discard)
            .map_err(|e| LoadError::io(path, e))?
            == 0
        {
            break;
        }
    }
    Ok(ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader))
}

fn read_headers(
    rdr: &mut csv::Reader<BufReader<File>>,
    path: &Path,
) -> Result<StringRecord, LoadError> {
    rdr.headers().cloned().map_err(|e| LoadError::csv(path, e))
}

fn normalize_header(h: &str) -> String {
    h.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    let wanted = normalize_header(name);
    headers.iter().position(|h| normalize_header(h) == wanted)
}

fn find_column_containing(headers: &StringRecord, needle: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.to_ascii_lowercase().contains(needle))
}

fn require(path: &Path, idx: Option<usize>, column: &str) -> Result<usize, LoadError> {
    idx.ok_or_else(|| LoadError::missing_column(path, column))
}

fn is_blank(row: &StringRecord) -> bool {
    row.iter().all(|f| f.is_empty())
}

struct BadgeColumns {
    id: Option<usize>,
    floor: usize,
    months: [usize; MONTH_COUNT],
}

/// Badge export: one row per employee with a `Floor` column and one swipe
/// count column per month. The identifier is the first remaining column.
pub fn load_badges(
    path: &Path,
    preamble_lines: usize,
) -> Result<(Vec<OccupancyRecord>, LoadReport), LoadError> {
    let mut rdr = open_csv(path, preamble_lines)?;
    let headers = read_headers(&mut rdr, path)?;
    let floor = require(path, find_column(&headers, "Floor"), "Floor")?;
    let mut months = [0usize; MONTH_COUNT];
    for m in Month::ALL {
        months[m.index()] = require(path, find_column(&headers, m.label()), m.label())?;
    }
    let id = (0..headers.len()).find(|i| *i != floor && !months.contains(i));
    let columns = BadgeColumns { id, floor, months };

    let mut report = LoadReport::default();
    let mut records = Vec::new();
    for (row_no, result) in rdr.records().enumerate() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(row = row_no + 1, error = %e, "unreadable badge row");
                report.total_rows += 1;
                report.skipped_rows += 1;
                continue;
            }
        };
        if is_blank(&row) {
            continue;
        }
        report.total_rows += 1;
        match parse_badge_row(&row, &columns, row_no) {
            Some(record) => records.push(record),
            None => {
                debug!(row = row_no + 1, "badge row with unparsable floor or swipe count");
                report.skipped_rows += 1;
            }
        }
    }

    report.loaded_rows = records.len();
    if report.skipped_rows > 0 {
        warn!(path = %path.display(), skipped = report.skipped_rows, "dropped unparsable badge rows");
    }
    info!(path = %path.display(), employees = records.len(), "badge data loaded");
    Ok((records, report))
}

fn parse_badge_row(row: &StringRecord, columns: &BadgeColumns, row_no: usize) -> Option<OccupancyRecord> {
    let floor = parse_count_safe(row.get(columns.floor))?;
    let mut monthly_swipes = [0u32; MONTH_COUNT];
    for (slot, idx) in monthly_swipes.iter_mut().zip(columns.months) {
        // An empty cell means no swipes that month.
        let raw = row.get(idx).unwrap_or("");
        if !raw.is_empty() {
            *slot = parse_count_safe(Some(raw))?;
        }
    }
    let employee_id = columns
        .id
        .and_then(|i| row.get(i))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("row-{}", row_no + 1));
    Some(OccupancyRecord {
        employee_id,
        floor,
        monthly_swipes,
    })
}

/// Utility export: one row per month with electricity, gas and water
/// columns. Rows for months outside Jan..Sep are ignored; a repeated month
/// keeps its last row. Every month of the window must be present.
pub fn load_utilities(
    path: &Path,
    preamble_lines: usize,
) -> Result<(Vec<UtilityReading>, LoadReport), LoadError> {
    let mut rdr = open_csv(path, preamble_lines)?;
    let headers = read_headers(&mut rdr, path)?;
    let month_col = find_column_containing(&headers, "month").unwrap_or(0);
    let electricity = require(path, find_column_containing(&headers, "electric"), "Electricity")?;
    let gas = require(path, find_column_containing(&headers, "gas"), "Natural Gas")?;
    let water = require(path, find_column_containing(&headers, "water"), "Water")?;

    let mut report = LoadReport::default();
    let mut slots: [Option<UtilityReading>; MONTH_COUNT] = Default::default();
    for (row_no, result) in rdr.records().enumerate() {
        let row = result.map_err(|e| LoadError::csv(path, e))?;
        if is_blank(&row) {
            continue;
        }
        report.total_rows += 1;
        let Some(month) = row.get(month_col).and_then(Month::from_label) else {
            debug!(row = row_no + 1, label = row.get(month_col).unwrap_or(""), "skipping non-month utility row");
            report.skipped_rows += 1;
            continue;
        };
        let values = (
            parse_f64_safe(row.get(electricity)),
            parse_f64_safe(row.get(gas)),
            parse_f64_safe(row.get(water)),
        );
        let (Some(electricity_kwh), Some(gas_ccf), Some(water_gal)) = values else {
            debug!(row = row_no + 1, %month, "utility row with unparsable readings");
            report.skipped_rows += 1;
            continue;
        };
        let slot = &mut slots[month.index()];
        if slot.is_some() {
            debug!(%month, "repeated utility month, keeping the later row");
            report.skipped_rows += 1;
        }
        *slot = Some(UtilityReading {
            month,
            electricity_kwh,
            gas_ccf,
            water_gal,
        });
    }

    let mut readings = Vec::with_capacity(MONTH_COUNT);
    for (month, slot) in Month::ALL.into_iter().zip(slots) {
        match slot {
            Some(r) => readings.push(r),
            None => {
                return Err(LoadError::MissingMonth {
                    path: path.to_path_buf(),
                    month,
                })
            }
        }
    }
    report.loaded_rows = readings.len();
    info!(path = %path.display(), months = readings.len(), "utility data loaded");
    Ok((readings, report))
}

/// Booking log. Rows whose date cannot be parsed are dropped; missing clock
/// times or attendee counts are kept as `None`.
pub fn load_bookings(
    path: &Path,
    preamble_lines: usize,
) -> Result<(Vec<BookingRecord>, LoadReport), LoadError> {
    let mut rdr = open_csv(path, preamble_lines)?;
    let headers = read_headers(&mut rdr, path)?;
    let room = require(path, find_column(&headers, "Room"), "Room")?;
    let date = require(path, find_column(&headers, "Date"), "Date")?;
    let start = require(path, find_column(&headers, "Start"), "Start")?;
    let finish = require(path, find_column(&headers, "Finish"), "Finish")?;
    let attendees = require(path, find_column(&headers, "#Attendees"), "#Attendees")?;
    let kind = require(path, find_column(&headers, "Attendance Type"), "Attendance Type")?;

    let mut report = LoadReport::default();
    let mut bookings = Vec::new();
    for (row_no, result) in rdr.records().enumerate() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(row = row_no + 1, error = %e, "unreadable booking row");
                report.total_rows += 1;
                report.skipped_rows += 1;
                continue;
            }
        };
        if is_blank(&row) {
            continue;
        }
        report.total_rows += 1;
        let Some(parsed_date) = parse_date_safe(row.get(date)) else {
            debug!(row = row_no + 1, date = row.get(date).unwrap_or(""), "dropping booking with unparsable date");
            report.skipped_rows += 1;
            continue;
        };
        let booking_type = match row.get(kind) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => "Unspecified".to_string(),
        };
        bookings.push(BookingRecord {
            room: row.get(room).unwrap_or("").to_string(),
            date: parsed_date,
            start: parse_time_safe(row.get(start)),
            finish: parse_time_safe(row.get(finish)),
            attendees: parse_count_safe(row.get(attendees)),
            booking_type,
        });
    }

    report.loaded_rows = bookings.len();
    if report.skipped_rows > 0 {
        warn!(path = %path.display(), skipped = report.skipped_rows, "dropped bookings with unparsable dates");
    }
    info!(path = %path.display(), bookings = bookings.len(), "conference data loaded");
    Ok((bookings, report))
}

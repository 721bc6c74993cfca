use building_report::config::AnalysisConstants;
use building_report::loader::{load_dataset, DatasetPaths, LoadReport};
use building_report::metrics::compute_all;
use building_report::{output, report};
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const BADGES: &str = indoc! {"
    Assumed Population in Future B37 Use - Badge Swipes YTD 2025
    Employee,Floor,Jan,Feb,Mar,Apr,May,Jun,Jul,Aug,Sep
    E1,1,6,7,8,9,10,11,12,13,14
    E2,1,0,0,0,0,0,0,0,0,0
    E3,2,20,20,20,20,20,20,20,20,20
    E4,3,2,2,2,2,2,2,2,2,2
    E5,2,5,5,5,5,5,5,5,5,5
"};

const UTILITIES: &str = indoc! {r#"
    FINAL MIT Hackathon Data
    Schenectady
    Building 37

    Month,Electricity (kWh),Natural Gas (CCF),Water (Gallons)
    Jan-25,"463,000","48,000","5,978,000"
    Feb-25,"413,000","41,000","5,901,000"
    Mar-25,"485,000","35,000","6,083,000"
    Apr-25,"474,000","23,000","9,405,000"
    May-25,"461,000","14,000","9,434,000"
    Jun-25,"477,000","12,000","9,405,000"
    Jul-25,"516,000","8,000","17,143,000"
    Aug-25,"491,000","11,000","17,287,000"
    Sep-25,"470,000","12,000","16,696,000"
    Total,"4,250,000","204,000","97,332,000"
"#};

const BOOKINGS: &str = indoc! {"
    GE 37 Conference Center usage JAN24-SEP25
    Room,Date,Start,Finish,#Attendees,Attendance Type
    Auditorium A,3/4/25,9:00 AM,11:00 AM,120,In Person
    Room 130,3/5/25,1:00 PM,2:00 PM,0,Teams
    Auditorium B,4/1/25,8:00 AM,9:00 AM,0,All Hands
    Room 131,6/2/24,10:00 AM,11:00 AM,0,Teams
    Room 132,someday,10:00 AM,11:00 AM,3,Teams
"};

fn fixtures() -> (TempDir, DatasetPaths) {
    let dir = tempdir().unwrap();
    let write = |name: &str, body: &str| {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    };
    let paths = DatasetPaths {
        badges: write("badges.csv", BADGES),
        utilities: write("utilities.csv", UTILITIES),
        bookings: write("bookings.csv", BOOKINGS),
    };
    (dir, paths)
}

#[test]
fn loads_all_three_datasets() {
    let (_dir, paths) = fixtures();
    let constants = AnalysisConstants::default();
    let (dataset, load) = load_dataset(&paths, &constants.loader).unwrap();
    assert_eq!(dataset.occupancy.len(), 5);
    assert_eq!(dataset.utilities.len(), 9);
    assert_eq!(dataset.bookings.len(), 4);
    assert_eq!(load.badges, LoadReport { total_rows: 5, loaded_rows: 5, skipped_rows: 0 });
    assert_eq!(load.bookings, LoadReport { total_rows: 5, loaded_rows: 4, skipped_rows: 1 });
    assert_eq!(load.utilities.skipped_rows, 1);
}

#[test]
fn summary_reflects_loaded_files() {
    let (_dir, paths) = fixtures();
    let constants = AnalysisConstants::default();
    let (dataset, _) = load_dataset(&paths, &constants.loader).unwrap();
    let summary = compute_all(&dataset, &constants).summary();

    assert_eq!(summary.employees, 5);
    assert_eq!(summary.low_utilizers, 3);
    assert_eq!(summary.correlation_sample_size, 9);
    assert_eq!(summary.total_bookings, 3);
    assert_eq!(summary.ghost_bookings, 1);
    assert_eq!(summary.ghost_hours, 1.0);
    assert!(summary.corr_electricity.is_some());
    assert!(summary.water_surge_multiplier.is_some_and(|m| m > 1.0));
    assert!(summary.total_co2_tons > 0.0);
}

#[test]
fn report_renders_with_caveats() {
    let (_dir, paths) = fixtures();
    let constants = AnalysisConstants::default();
    let (dataset, load) = load_dataset(&paths, &constants.loader).unwrap();
    let bundle = compute_all(&dataset, &constants);
    let text = report::render(&bundle, &load, &constants);

    assert!(text.starts_with("BUILDING USAGE ANALYSIS REPORT"));
    assert!(text.contains("Badge data: 5 employees"));
    assert!(text.contains("Conference data: 4 bookings (1 rows dropped)"));
    assert!(text.contains("Ghost Bookings (0 attendees, excluding All Hands): 1"));
    assert!(text.contains("headcount constant is 356"));
    assert!(text.contains("1 ghost bookings of 3 (33.3%) = 1 wasted hours"));
    assert!(text.find("EXECUTIVE SUMMARY") < text.find("DATA CAVEATS"));
    assert!(!text.contains("NaN"));
}

#[test]
fn config_file_overrides_target_year() {
    let (dir, paths) = fixtures();
    let config = dir.path().join("constants.toml");
    fs::write(&config, "[bookings]\ntarget_year = 2024\n").unwrap();
    let constants = AnalysisConstants::load(&config).unwrap();
    let (dataset, _) = load_dataset(&paths, &constants.loader).unwrap();
    let summary = compute_all(&dataset, &constants).summary();
    assert_eq!(summary.total_bookings, 1);
    assert_eq!(summary.ghost_bookings, 1);
}

#[test]
fn exports_occupancy_tables() {
    let (dir, paths) = fixtures();
    let constants = AnalysisConstants::default();
    let (dataset, _) = load_dataset(&paths, &constants.loader).unwrap();
    let bundle = compute_all(&dataset, &constants);

    let monthly = dir.path().join("monthly_occupancy.csv");
    output::write_csv(&monthly, &report::monthly_rows(&bundle.occupancy)).unwrap();
    let floors = dir.path().join("floor_distribution.csv");
    output::write_csv(&floors, &report::floor_rows(&bundle.occupancy)).unwrap();

    let monthly = read_lines(&monthly);
    assert_eq!(monthly[0], "Month,TotalSwipes,AvgDaysPerEmployee,AttendanceRate");
    assert_eq!(monthly.len(), 10);
    // Jan: 6 + 0 + 20 + 2 + 5 swipes across 5 employees.
    assert_eq!(monthly[1], "Jan,33,6.6,33.0%");

    let floors = read_lines(&floors);
    assert_eq!(floors[0], "Floor,Swipes,PctOfTotal,Employees");
    assert_eq!(floors.len(), 4);
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

//! Page model shared by the CLI and the desktop dashboard.
//!
//! Each [`Page`] has one handler in each front end; the country search is a
//! single pipeline parameterised by [`SearchMode`].

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    Homepage,
    SearchByCountry,
    TopTenChart,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Homepage, Page::SearchByCountry, Page::TopTenChart];

    pub fn title(self) -> &'static str {
        match self {
            Page::Homepage => "Homepage",
            Page::SearchByCountry => "Search by Country",
            Page::TopTenChart => "Top 10 Chart",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// How the user supplies the country on the search page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchMode {
    /// Free-text short code ("IT", "USA", "CA").
    EnterCode,
    /// A name picked from the service's country list.
    SelectFromDropdown,
}

impl SearchMode {
    pub fn is_code(self) -> bool {
        matches!(self, SearchMode::EnterCode)
    }

    pub fn label(self) -> &'static str {
        match self {
            SearchMode::EnterCode => "Enter Country Code",
            SearchMode::SelectFromDropdown => "Select from Dropdown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    Bar,
    Line,
}

impl ChartKind {
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Graph",
            ChartKind::Line => "Line Chart",
        }
    }
}

pub const APP_TITLE: &str = "COVID-19 Report by Country";

pub const WELCOME: &str = "Welcome to the COVID-19 Tracker! Here you can see COVID data based on countries all over the world.";

pub const TIPS_INTRO: &str = "Here are some reminders to stay healthy and prevent COVID:";

pub const HEALTH_TIPS: [(&str, &str); 5] = [
    (
        "Wear Masks",
        "Always wear a mask in public spaces to reduce the risk of spreading the virus.",
    ),
    (
        "Social Distancing",
        "Maintain a distance of at least 6 feet from others to avoid transmission.",
    ),
    (
        "Hand Hygiene",
        "Wash your hands frequently with soap and water for at least 20 seconds.",
    ),
    (
        "Avoid Crowded Places",
        "Avoid large gatherings and crowded places to minimize exposure.",
    ),
    (
        "Stay Informed",
        "Keep up-to-date with the latest guidelines and recommendations from health authorities.",
    ),
];

pub const VIDEO_URL: &str = "https://www.youtube.com/watch?v=mSADUWSqNqU";

pub const SEARCH_INFO: &str = "See the COVID stats on any Country.";

/// Homepage body; tips only when asked for.
pub fn homepage_lines(show_tips: bool) -> Vec<String> {
    let mut out = vec![WELCOME.to_string(), TIPS_INTRO.to_string()];
    if show_tips {
        out.push("Health Tips:".to_string());
        out.extend(
            HEALTH_TIPS
                .iter()
                .map(|(title, text)| format!("- {}: {}", title, text)),
        );
    }
    out.push(format!("Video: {}", VIDEO_URL));
    out
}

/// Demonstration dataset for the top-10 page (total confirmed cases).
const TOP_TEN_CASES: [(&str, u64); 10] = [
    ("USA", 111_820_082),
    ("India", 45_035_393),
    ("Brazil", 38_743_918),
    ("France", 40_138_560),
    ("Germany", 38_828_995),
    ("UK", 24_910_387),
    ("Russia", 24_124_215),
    ("Turkey", 17_232_066),
    ("Italy", 26_723_249),
    ("Spain", 13_914_811),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCases {
    pub country: String,
    pub cases: u64,
}

/// The top-10 dataset, highest case count first.
pub fn top_ten() -> Vec<CountryCases> {
    let mut rows: Vec<CountryCases> = TOP_TEN_CASES
        .iter()
        .map(|(country, cases)| CountryCases {
            country: country.to_string(),
            cases: *cases,
        })
        .collect();
    rows.sort_by(|a, b| b.cases.cmp(&a.cases));
    rows.truncate(10);
    rows
}

/// Marker positions for an on-screen line chart, as fractions of the plot area.
///
/// `x` is the centre of each country's slot, `y` the height above the bottom
/// edge with the top of the area at 110% of the largest count.
pub fn line_positions(rows: &[CountryCases]) -> Vec<(f32, f32)> {
    let n = rows.len().max(1) as f32;
    let max = rows.iter().map(|r| r.cases).max().unwrap_or(0).max(1) as f32;
    let y_max = max * 1.1;
    rows.iter()
        .enumerate()
        .map(|(i, r)| ((i as f32 + 0.5) / n, r.cases as f32 / y_max))
        .collect()
}

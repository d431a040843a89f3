//! Dataset Schema
//! Column names of the input CSV and the numeric metrics derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selection sentinel meaning "no filter on this dimension".
pub const ALL: &str = "All";

pub const COUNTRY: &str = "Country/Region";
pub const WHO_REGION: &str = "WHO Region";
pub const CONFIRMED: &str = "Confirmed";
pub const DEATHS: &str = "Deaths";
pub const ACTIVE: &str = "Active";
pub const RECOVERED: &str = "Recovered";
pub const NEW_DEATHS: &str = "New deaths";
pub const NEW_RECOVERED: &str = "New recovered";
pub const ONE_WEEK_CHANGE: &str = "1 week change";
pub const DEATHS_PER_100_CASES: &str = "Deaths / 100 Cases";
pub const RECOVERED_PER_100_CASES: &str = "Recovered / 100 Cases";

/// Text columns every dataset must carry.
pub const TEXT_COLUMNS: [&str; 2] = [COUNTRY, WHO_REGION];

/// Numeric column of a case record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Confirmed,
    Deaths,
    Active,
    Recovered,
    NewDeaths,
    NewRecovered,
    OneWeekChange,
    DeathsPer100Cases,
    RecoveredPer100Cases,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::Confirmed,
        Metric::Deaths,
        Metric::Active,
        Metric::Recovered,
        Metric::NewDeaths,
        Metric::NewRecovered,
        Metric::OneWeekChange,
        Metric::DeathsPer100Cases,
        Metric::RecoveredPer100Cases,
    ];

    /// Column name in the CSV header.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Confirmed => CONFIRMED,
            Metric::Deaths => DEATHS,
            Metric::Active => ACTIVE,
            Metric::Recovered => RECOVERED,
            Metric::NewDeaths => NEW_DEATHS,
            Metric::NewRecovered => NEW_RECOVERED,
            Metric::OneWeekChange => ONE_WEEK_CHANGE,
            Metric::DeathsPer100Cases => DEATHS_PER_100_CASES,
            Metric::RecoveredPer100Cases => RECOVERED_PER_100_CASES,
        }
    }

    pub fn snake_name(self) -> &'static str {
        match self {
            Metric::Confirmed => "confirmed",
            Metric::Deaths => "deaths",
            Metric::Active => "active",
            Metric::Recovered => "recovered",
            Metric::NewDeaths => "new_deaths",
            Metric::NewRecovered => "new_recovered",
            Metric::OneWeekChange => "one_week_change",
            Metric::DeathsPer100Cases => "deaths_per_100_cases",
            Metric::RecoveredPer100Cases => "recovered_per_100_cases",
        }
    }

    /// Integer counts and deltas. Only these may be summed across rows.
    pub fn is_count(self) -> bool {
        !matches!(
            self,
            Metric::DeathsPer100Cases | Metric::RecoveredPer100Cases
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Metric {
    type Err = String;

    /// Accepts the CSV column name or the snake-case name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Metric::ALL
            .into_iter()
            .find(|m| {
                m.column().eq_ignore_ascii_case(wanted) || m.snake_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| wanted.to_string())
    }
}

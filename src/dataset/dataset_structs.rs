use serde::{Deserialize, Deserializer};

/// The whole dataset document, one array per table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDataset {
    pub drivers: Vec<RawDriver>,
    pub teams: Vec<RawTeam>,
    pub races: Vec<RawRace>,
    pub results: Vec<RawResult>,
    pub qualifying: Vec<RawQualifying>,
    pub sprints: Vec<RawResult>,
    pub statuses: Vec<RawStatus>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDriver {
    pub driver_id: u32,
    pub forename: String,
    pub surname: String
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTeam {
    #[serde(rename = "constructorId")]
    pub team_id: u32,
    pub name: String
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRace {
    pub race_id: u32,
    pub name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub circuit_id: u32
}

/// A row of the race or sprint results table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResult {
    pub race_id: u32,
    pub driver_id: u32,
    #[serde(rename = "constructorId")]
    pub team_id: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub position: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub grid: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub status_id: Option<u32>,
    #[serde(default)]
    pub time: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQualifying {
    pub race_id: u32,
    pub driver_id: u32,
    #[serde(rename = "constructorId")]
    pub team_id: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub position: Option<u32>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatus {
    pub status_id: u32,
    pub status: String
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(f64),
    Text(String)
}

/// Accepts `3`, `"3"`, `"\N"`, `"R"` or null. Anything that is not a
/// non-negative whole number becomes `None`.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>
{
    let raw: Option<Lenient> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Lenient::Number(n)) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Some(n as u32),
        Some(Lenient::Text(s)) => s.trim().parse().ok(),
        _ => None
    })
}

/// Parses a winner's race time such as `1:34:50.616` or `58:43.1` into
/// seconds. Gaps (`+5.478`), laps down and `\N` have no absolute time.
pub fn parse_race_time(time: &str) -> Option<f64> {
    if time.contains('+') || time.contains('-') || !time.contains(':') {
        return None;
    }

    let parts: Vec<&str> = time.split(':').collect();
    match parts.as_slice() {
        [h, m, s] => Some(h.parse::<f64>().ok()? * 3600.0 + m.parse::<f64>().ok()? * 60.0 + s.parse::<f64>().ok()?),
        [m, s] => Some(m.parse::<f64>().ok()? * 60.0 + s.parse::<f64>().ok()?),
        _ => None
    }
}

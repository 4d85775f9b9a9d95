use serde::{Deserialize, Serialize};

/// Where a resolved value came from, so the UI can indicate confidence.
///
/// Every resolution ladder terminates in one of these: a live API hit, the
/// static fallback tables, or a hardcoded population-average default. `Error`
/// marks values substituted after an unexpected failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Api,
    Fallback,
    Default,
    Error,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Provenance::Api => "api",
            Provenance::Fallback => "fallback",
            Provenance::Default => "default",
            Provenance::Error => "error",
        };
        f.write_str(s)
    }
}

/// One scheduled game with both starting-pitcher ERAs already resolved.
/// Immutable once built; recomputed on every schedule fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub game_id: i64,
    /// "Preview" | "Live" | "Final"
    pub status: String,
    pub home_team: String,
    pub away_team: String,
    pub venue: String,
    /// Scheduled first pitch, "HH:MM" UTC
    pub game_time: String,
    pub home_pitcher: String,
    pub away_pitcher: String,
    pub home_era: f64,
    pub away_era: f64,
    pub home_era_source: Provenance,
    pub away_era_source: Provenance,
    /// Set when this game was substituted from another date or the sample set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Raw schedule record before pitcher ERA resolution.
#[derive(Debug, Clone)]
pub struct ScheduledGame {
    pub game_id: i64,
    pub status: String,
    pub home_team: String,
    pub away_team: String,
    pub venue: String,
    pub game_time: String,
    pub home_pitcher: Option<String>,
    pub away_pitcher: Option<String>,
}

/// A player search hit from the stats API.
#[derive(Debug, Clone)]
pub struct PlayerHit {
    pub id: i64,
    pub full_name: String,
    /// MLB position code; "1" is pitcher
    pub position_code: String,
}

/// Team batting/bullpen line used by the scoring engine.
/// Always resolvable: every lookup path terminates in a value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TeamStatsLine {
    pub batting_avg: f64,
    pub bullpen_era: f64,
    pub provenance: Provenance,
}

/// Season-aggregate team stats from the live API (extended variant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSeasonStats {
    pub runs_per_game: f64,
    pub era: f64,
    pub whip: f64,
    pub strikeouts: f64,
    pub walks: f64,
    pub provenance: Provenance,
}

/// A resolved starting-pitcher ERA with its resolution trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitcherEra {
    pub era: f64,
    pub source: Provenance,
    /// Which rung of the resolution ladder produced the value,
    /// e.g. "api", "name-lookup", "position-not-found", "error-default"
    pub method: String,
}

/// A resolved bullpen ERA (derived from team pitching, live or default).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BullpenEra {
    pub era: f64,
    pub source: Provenance,
}

/// A weather reading for a venue at game time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature: f64,
    pub condition: String,
    pub wind_speed: f64,
    pub wind_direction: String,
}

impl WeatherReading {
    /// The fixed sample reading used until a live weather source is wired in.
    pub fn sample() -> Self {
        WeatherReading {
            temperature: 72.0,
            condition: "Clear".to_string(),
            wind_speed: 5.0,
            wind_direction: "NE".to_string(),
        }
    }
}

/// Bet-worthiness band derived from the final probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Bet,
    Lean,
    Pass,
}

impl Rating {
    pub fn from_probability(probability: u32) -> Self {
        if probability >= 60 {
            Rating::Bet
        } else if probability >= 52 {
            Rating::Lean
        } else {
            Rating::Pass
        }
    }
}

/// One named factor and its numeric contribution to a prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorScore {
    pub name: String,
    pub value: f64,
}

impl FactorScore {
    pub fn new(name: &str, value: f64) -> Self {
        FactorScore {
            name: name.to_string(),
            value,
        }
    }
}

/// Raw-input echo attached to every prediction for display/debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionDetails {
    pub home_era: f64,
    pub away_era: f64,
    pub home_bullpen_era: f64,
    pub away_bullpen_era: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_batting_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_batting_avg: Option<f64>,
    pub ballpark_factor: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_impact: Option<f64>,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A single (game, market) prediction: a clamped integer probability with a
/// ranked factor breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub probability: u32,
    pub rating: Rating,
    /// Factor contributions, sorted descending by value
    pub factors: Vec<FactorScore>,
    /// Names of the top 3 factors
    pub top_factors: Vec<String>,
    pub details: PredictionDetails,
}

/// All three market predictions for one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionSet {
    pub under_1_run_1st: Prediction,
    pub over_2_5_runs_first_3: Prediction,
    pub over_3_5_runs_first_3: Prediction,
}

/// The full per-date bundle served to the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPredictions {
    pub date: String,
    pub games: Vec<Game>,
    /// Keyed by "{away_team}_{home_team}"
    pub predictions: std::collections::BTreeMap<String, PredictionSet>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bands() {
        assert_eq!(Rating::from_probability(60), Rating::Bet);
        assert_eq!(Rating::from_probability(75), Rating::Bet);
        assert_eq!(Rating::from_probability(59), Rating::Lean);
        assert_eq!(Rating::from_probability(52), Rating::Lean);
        assert_eq!(Rating::from_probability(51), Rating::Pass);
        assert_eq!(Rating::from_probability(30), Rating::Pass);
    }

    #[test]
    fn provenance_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Provenance::Fallback).unwrap(),
            "\"fallback\""
        );
        assert_eq!(Provenance::Api.to_string(), "api");
    }
}

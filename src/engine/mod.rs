//! The prediction scoring engine.
//!
//! Pure functions from resolved game/team/ballpark/weather inputs to a
//! probability and a ranked factor breakdown. No I/O happens here; the only
//! non-determinism is the recent-form term, which is injected through
//! [`FormSource`] so tests (and reproducible runs) can pin it.
//!
//! Two scoring strategies coexist behind [`ScoringStrategy`]: a
//! weighted-sum-of-normalized-factors model and a baseline-plus-additive
//! model. They evolved separately and their coefficients are not equivalent,
//! so they are selectable rather than merged.

pub mod baseline;
pub mod weighted;

pub use baseline::BaselineStrategy;
pub use weighted::WeightedStrategy;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::sync::Mutex;

use crate::models::{
    FactorScore, Prediction, PredictionDetails, Rating, TeamStatsLine, WeatherReading,
};

/// The three supported markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionKind {
    Under1Run1st,
    Over25First3,
    Over35First3,
}

impl PredictionKind {
    pub const ALL: [PredictionKind; 3] = [
        PredictionKind::Under1Run1st,
        PredictionKind::Over25First3,
        PredictionKind::Over35First3,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PredictionKind::Under1Run1st => "under_1_run_1st",
            PredictionKind::Over25First3 => "over_2_5_runs_first_3",
            PredictionKind::Over35First3 => "over_3_5_runs_first_3",
        }
    }

    /// Inclusive probability bounds for this market.
    pub fn clamp_bounds(self) -> (u32, u32) {
        match self {
            PredictionKind::Under1Run1st | PredictionKind::Over25First3 => (30, 90),
            PredictionKind::Over35First3 => (20, 85),
        }
    }

    /// Neutral probability substituted when a prediction cannot be computed.
    pub fn fallback_probability(self) -> u32 {
        match self {
            PredictionKind::Under1Run1st | PredictionKind::Over25First3 => 50,
            PredictionKind::Over35First3 => 40,
        }
    }
}

/// Fully resolved inputs for one game, as consumed by both strategies.
///
/// `home_stats`/`away_stats` carry the static-table batting and bullpen
/// lines; `home_bullpen_era`/`away_bullpen_era` are the live-derived
/// estimates. The strategies read the variant each was tuned on.
#[derive(Debug, Clone)]
pub struct ScoreInput {
    pub home_era: f64,
    pub away_era: f64,
    pub home_stats: TeamStatsLine,
    pub away_stats: TeamStatsLine,
    pub home_bullpen_era: f64,
    pub away_bullpen_era: f64,
    pub ballpark_factor: f64,
    pub weather: WeatherReading,
}

impl ScoreInput {
    /// All numeric fields finite; the precondition for scoring.
    pub fn is_finite(&self) -> bool {
        [
            self.home_era,
            self.away_era,
            self.home_stats.batting_avg,
            self.home_stats.bullpen_era,
            self.away_stats.batting_avg,
            self.away_stats.bullpen_era,
            self.home_bullpen_era,
            self.away_bullpen_era,
            self.ballpark_factor,
            self.weather.temperature,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

// ── Recent-form source ───────────────────────────────────────────────────────

/// The recent-performance term. Drawn per invocation in [0.5, 1.0); whether
/// this should be a real signal is an open question upstream, so the draw is
/// pluggable and seedable rather than baked in.
pub trait FormSource: Send + Sync {
    fn recent_form(&self) -> f64;
}

/// Production source: thread-local RNG, uniform [0.5, 1.0).
pub struct ThreadRngForm;

impl FormSource for ThreadRngForm {
    fn recent_form(&self) -> f64 {
        rand::thread_rng().gen_range(0.5..1.0)
    }
}

/// Deterministic source seeded once; successive draws replay the same
/// sequence for a given seed.
pub struct SeededForm {
    rng: Mutex<StdRng>,
}

impl SeededForm {
    pub fn new(seed: u64) -> Self {
        SeededForm {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl FormSource for SeededForm {
    fn recent_form(&self) -> f64 {
        self.rng
            .lock()
            .map(|mut rng| rng.gen_range(0.5..1.0))
            .unwrap_or(0.75)
    }
}

/// Fixed source for tests.
pub struct FixedForm(pub f64);

impl FormSource for FixedForm {
    fn recent_form(&self) -> f64 {
        self.0
    }
}

// ── Strategy interface ───────────────────────────────────────────────────────

/// A scoring strategy maps resolved inputs to a prediction for one market.
pub trait ScoringStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn predict(&self, input: &ScoreInput, kind: PredictionKind, form: &dyn FormSource)
        -> Prediction;
}

/// Selector for the two shipped strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Weighted,
    Baseline,
}

impl StrategyKind {
    pub fn strategy(self) -> &'static dyn ScoringStrategy {
        match self {
            StrategyKind::Weighted => &WeightedStrategy,
            StrategyKind::Baseline => &BaselineStrategy,
        }
    }
}

// ── Shared helpers ───────────────────────────────────────────────────────────

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sort factors descending by value and surface the top 3 names.
/// The sort is stable, so equal-valued factors keep declaration order.
pub(crate) fn rank_factors(mut factors: Vec<FactorScore>) -> (Vec<FactorScore>, Vec<String>) {
    factors.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let top = factors.iter().take(3).map(|f| f.name.clone()).collect();
    (factors, top)
}

/// Clamp a 0–100 scale probability into the market's declared bounds.
pub(crate) fn clamp_probability(raw: f64, kind: PredictionKind) -> u32 {
    let (lo, hi) = kind.clamp_bounds();
    (raw.round() as i64).clamp(lo as i64, hi as i64) as u32
}

/// The fixed neutral prediction substituted when scoring fails. Never
/// propagates the failure to the caller.
pub fn fallback_prediction(kind: PredictionKind, input: Option<&ScoreInput>, reason: &str) -> Prediction {
    let probability = kind.fallback_probability();
    let factors = vec![
        FactorScore::new("Pitcher Performance", 50.0),
        FactorScore::new("Ballpark Factors", 50.0),
        FactorScore::new("Weather", 50.0),
    ];
    let top_factors = factors.iter().map(|f| f.name.clone()).collect();
    Prediction {
        probability,
        rating: Rating::from_probability(probability),
        factors,
        top_factors,
        details: PredictionDetails {
            home_era: input.map(|i| i.home_era).unwrap_or(crate::refdata::LEAGUE_AVG_ERA),
            away_era: input.map(|i| i.away_era).unwrap_or(crate::refdata::LEAGUE_AVG_ERA),
            home_bullpen_era: 4.5,
            away_bullpen_era: 4.5,
            home_batting_avg: None,
            away_batting_avg: None,
            ballpark_factor: 1.0,
            weather_impact: None,
            temperature: 70.0,
            error: Some(format!("Failed to calculate prediction: {reason}")),
        },
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::Provenance;

    /// The canonical sample matchup: Red Sox at Yankees, both aces dealing.
    pub fn yankees_red_sox() -> ScoreInput {
        ScoreInput {
            home_era: 2.63,
            away_era: 1.69,
            home_stats: TeamStatsLine {
                batting_avg: 0.254,
                bullpen_era: 3.58,
                provenance: Provenance::Fallback,
            },
            away_stats: TeamStatsLine {
                batting_avg: 0.261,
                bullpen_era: 3.96,
                provenance: Provenance::Fallback,
            },
            home_bullpen_era: 3.94,
            away_bullpen_era: 4.12,
            ballpark_factor: crate::environment::resolve_ballpark_factor("Yankee Stadium"),
            weather: WeatherReading::sample(),
        }
    }

    pub fn input_with_eras(home_era: f64, away_era: f64) -> ScoreInput {
        let mut input = yankees_red_sox();
        input.home_era = home_era;
        input.away_era = away_era;
        input
    }
}

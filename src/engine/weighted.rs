//! Weighted-sum scoring: normalized per-factor impacts combined with fixed
//! weights. The direction of every factor flips between the "under" market
//! and the two "over" markets: a low ERA argues FOR a quiet first inning
//! and AGAINST a big early total.

use super::{
    clamp_probability, fallback_prediction, rank_factors, round2, FormSource, PredictionKind,
    ScoreInput, ScoringStrategy,
};
use crate::environment::weather_impact;
use crate::models::{FactorScore, Prediction, PredictionDetails, Rating};

// Factor weights; must total 1.0.
const W_PITCHER: f64 = 0.35;
const W_BULLPEN: f64 = 0.20;
const W_BATTING: f64 = 0.15;
const W_BALLPARK: f64 = 0.10;
const W_WEATHER: f64 = 0.05;
const W_RECENT: f64 = 0.15;

pub struct WeightedStrategy;

impl ScoringStrategy for WeightedStrategy {
    fn name(&self) -> &'static str {
        "weighted"
    }

    fn predict(
        &self,
        input: &ScoreInput,
        kind: PredictionKind,
        form: &dyn FormSource,
    ) -> Prediction {
        if !input.is_finite() {
            return fallback_prediction(kind, Some(input), "non-finite input");
        }

        // Normalizing divisor: the over-3.5 market spreads ERA over 9 runs
        // instead of 10, weighting bad pitching a little harder.
        let era_scale = match kind {
            PredictionKind::Over35First3 => 9.0,
            _ => 10.0,
        };

        // Per-side impacts, averaged. For the under market a LOW era is the
        // good outcome, so the impact is pre-inverted there.
        let (home_pitcher, away_pitcher, home_pen, away_pen) = match kind {
            PredictionKind::Under1Run1st => (
                1.0 - input.home_era / era_scale,
                1.0 - input.away_era / era_scale,
                1.0 - input.home_stats.bullpen_era / era_scale,
                1.0 - input.away_stats.bullpen_era / era_scale,
            ),
            _ => (
                input.home_era / era_scale,
                input.away_era / era_scale,
                input.home_stats.bullpen_era / era_scale,
                input.away_stats.bullpen_era / era_scale,
            ),
        };
        let pitcher_factor = (home_pitcher + away_pitcher) / 2.0;
        let bullpen_factor = (home_pen + away_pen) / 2.0;

        let batting_factor =
            (input.home_stats.batting_avg * 2.5 + input.away_stats.batting_avg * 2.5) / 2.0;
        let park = input.ballpark_factor;
        let weather = weather_impact(&input.weather);
        let recent = form.recent_form();

        // The inversion (1.0 - f) is what makes "under" the mirror of the
        // two "over" formulas.
        let (batting_term, park_term, weather_term) = match kind {
            PredictionKind::Under1Run1st => (
                (1.0 - batting_factor) * W_BATTING,
                (1.0 - park) * W_BALLPARK,
                (1.0 - weather) * W_WEATHER,
            ),
            _ => (
                batting_factor * W_BATTING,
                park * W_BALLPARK,
                weather * W_WEATHER,
            ),
        };

        let pitcher_term = pitcher_factor * W_PITCHER;
        let bullpen_term = bullpen_factor * W_BULLPEN;
        let recent_term = recent * W_RECENT;

        let sum = pitcher_term + bullpen_term + batting_term + park_term + weather_term
            + recent_term;

        // The rarer 3.5-run line scales down to 90% before clamping.
        let scale = match kind {
            PredictionKind::Over35First3 => 90.0,
            _ => 100.0,
        };
        let raw = sum * scale;
        if !raw.is_finite() {
            return fallback_prediction(kind, Some(input), "non-finite probability");
        }
        let probability = clamp_probability(raw, kind);

        let (factors, top_factors) = rank_factors(vec![
            FactorScore::new("pitcher_era", round2(pitcher_term * 100.0)),
            FactorScore::new("bullpen_era", round2(bullpen_term * 100.0)),
            FactorScore::new("team_batting", round2(batting_term * 100.0)),
            FactorScore::new("ballpark", round2(park_term * 100.0)),
            FactorScore::new("weather", round2(weather_term * 100.0)),
            FactorScore::new("recent_performance", round2(recent_term * 100.0)),
        ]);

        Prediction {
            probability,
            rating: Rating::from_probability(probability),
            factors,
            top_factors,
            details: PredictionDetails {
                home_era: input.home_era,
                away_era: input.away_era,
                home_bullpen_era: input.home_stats.bullpen_era,
                away_bullpen_era: input.away_stats.bullpen_era,
                home_batting_avg: Some(input.home_stats.batting_avg),
                away_batting_avg: Some(input.away_stats.batting_avg),
                ballpark_factor: park,
                weather_impact: Some(weather),
                temperature: input.weather.temperature,
                error: None,
            },
        }
    }
}

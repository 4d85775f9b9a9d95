//! Baseline-plus-adjustments scoring: start from a prior for the market and
//! apply small additive corrections per signal. This model reads the
//! live-derived bullpen estimates and raw game-time temperature, and emits
//! the full eleven-factor display list (several factors are placeholder
//! signals pinned at 50 until their data sources exist).

use super::{
    clamp_probability, fallback_prediction, rank_factors, FormSource, PredictionKind,
    ScoreInput, ScoringStrategy,
};
use crate::models::{FactorScore, Prediction, PredictionDetails, Rating};

/// Display factors with no implemented signal yet, shown at the neutral
/// midpoint so the ranked list keeps a stable shape.
const PLACEHOLDER_FACTORS: &[&str] = &[
    "Team Momentum",
    "Handedness Matchups",
    "Injuries",
    "Travel Fatigue",
    "Umpire Impact",
    "Defensive Metrics",
    "Baserunning",
];

pub struct BaselineStrategy;

impl ScoringStrategy for BaselineStrategy {
    fn name(&self) -> &'static str {
        "baseline"
    }

    fn predict(
        &self,
        input: &ScoreInput,
        kind: PredictionKind,
        _form: &dyn FormSource,
    ) -> Prediction {
        if !input.is_finite() {
            return fallback_prediction(kind, Some(input), "non-finite input");
        }

        let home_era = input.home_era;
        let away_era = input.away_era;
        let home_pen = input.home_bullpen_era;
        let away_pen = input.away_bullpen_era;
        let park = input.ballpark_factor;
        let temp = input.weather.temperature;

        let base = match kind {
            PredictionKind::Under1Run1st => {
                // Good starters, pitcher's park and cool air all favor a
                // scoreless first.
                0.5 + (5.0 - home_era) * 0.02
                    + (5.0 - away_era) * 0.02
                    + (1.0 - park) * 0.1
                    - (temp - 70.0) * 0.001
                    + (5.0 - home_pen) * 0.005
                    + (5.0 - away_pen) * 0.005
            }
            PredictionKind::Over25First3 => {
                0.5 + (home_era - 3.5) * 0.03
                    + (away_era - 3.5) * 0.03
                    + (park - 1.0) * 0.15
                    + (temp - 70.0) * 0.002
                    + (home_pen - 4.0) * 0.01
                    + (away_pen - 4.0) * 0.01
            }
            PredictionKind::Over35First3 => {
                // Rarer line: lower prior, steeper corrections.
                0.4 + (home_era - 3.0) * 0.04
                    + (away_era - 3.0) * 0.04
                    + (park - 1.0) * 0.2
                    + (temp - 70.0) * 0.003
                    + (home_pen - 4.0) * 0.015
                    + (away_pen - 4.0) * 0.015
            }
        };

        let raw = base.clamp(0.0, 1.0) * 100.0;
        if !raw.is_finite() {
            return fallback_prediction(kind, Some(input), "non-finite probability");
        }
        let probability = clamp_probability(raw, kind);

        let avg_era = (home_era + away_era) / 2.0;
        let avg_pen = (home_pen + away_pen) / 2.0;
        let (pitcher_score, park_score, weather_score, bullpen_score) = match kind {
            PredictionKind::Under1Run1st => (
                ((5.0 - avg_era) * 10.0).round(),
                ((1.0 - park) * 100.0).round(),
                ((70.0 - temp) * 0.5 + 50.0).round(),
                ((5.0 - avg_pen) * 5.0).round(),
            ),
            _ => (
                (avg_era * 10.0).round(),
                (park * 50.0).round(),
                (temp * 0.5).round(),
                (avg_pen * 5.0).round(),
            ),
        };

        let mut factors = vec![
            FactorScore::new("Pitcher Performance", pitcher_score),
            FactorScore::new("Ballpark Factors", park_score),
            FactorScore::new("Weather", weather_score),
            FactorScore::new("Bullpen", bullpen_score),
        ];
        factors.extend(
            PLACEHOLDER_FACTORS
                .iter()
                .map(|name| FactorScore::new(name, 50.0)),
        );
        let (factors, top_factors) = rank_factors(factors);

        Prediction {
            probability,
            rating: Rating::from_probability(probability),
            factors,
            top_factors,
            details: PredictionDetails {
                home_era,
                away_era,
                home_bullpen_era: home_pen,
                away_bullpen_era: away_pen,
                home_batting_avg: None,
                away_batting_avg: None,
                ballpark_factor: park,
                weather_impact: None,
                temperature: temp,
                error: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{input_with_eras, yankees_red_sox};
    use crate::engine::FixedForm;
    use crate::models::{Provenance, TeamStatsLine, WeatherReading};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn neutral_input() -> ScoreInput {
        ScoreInput {
            home_era: 5.0,
            away_era: 5.0,
            home_stats: TeamStatsLine {
                batting_avg: 0.245,
                bullpen_era: 4.20,
                provenance: Provenance::Default,
            },
            away_stats: TeamStatsLine {
                batting_avg: 0.245,
                bullpen_era: 4.20,
                provenance: Provenance::Default,
            },
            home_bullpen_era: 5.0,
            away_bullpen_era: 5.0,
            ballpark_factor: 1.0,
            weather: WeatherReading {
                temperature: 70.0,
                condition: "Overcast".to_string(),
                wind_speed: 5.0,
                wind_direction: "NE".to_string(),
            },
        }
    }

    #[test]
    fn neutral_input_sits_at_the_prior() {
        // Every adjustment zeroes out: ERA 5.0 starters, league park, 70 °F.
        let p = BaselineStrategy.predict(
            &neutral_input(),
            PredictionKind::Under1Run1st,
            &FixedForm(0.7),
        );
        assert_eq!(p.probability, 50);
    }

    #[test]
    fn over35_has_a_lower_prior() {
        let mut input = neutral_input();
        input.home_era = 3.0;
        input.away_era = 3.0;
        input.home_bullpen_era = 4.0;
        input.away_bullpen_era = 4.0;
        let p = BaselineStrategy.predict(&input, PredictionKind::Over35First3, &FixedForm(0.7));
        assert_eq!(p.probability, 40);
    }

    #[test]
    fn strategy_is_deterministic_regardless_of_form_source() {
        let input = yankees_red_sox();
        for kind in PredictionKind::ALL {
            let a = BaselineStrategy.predict(&input, kind, &FixedForm(0.5));
            let b = BaselineStrategy.predict(&input, kind, &FixedForm(0.99));
            assert_eq!(a.probability, b.probability);
        }
    }

    #[test]
    fn bad_pitching_raises_the_over_markets() {
        let form = FixedForm(0.7);
        let aces = input_with_eras(2.2, 2.4);
        let wrecks = input_with_eras(5.8, 6.1);
        let over_aces = BaselineStrategy.predict(&aces, PredictionKind::Over25First3, &form);
        let over_wrecks = BaselineStrategy.predict(&wrecks, PredictionKind::Over25First3, &form);
        assert!(over_wrecks.probability > over_aces.probability);

        let under_aces = BaselineStrategy.predict(&aces, PredictionKind::Under1Run1st, &form);
        let under_wrecks =
            BaselineStrategy.predict(&wrecks, PredictionKind::Under1Run1st, &form);
        assert!(under_aces.probability > under_wrecks.probability);
    }

    #[test]
    fn emits_eleven_factors_sorted_with_placeholders_at_midpoint() {
        let p = BaselineStrategy.predict(
            &yankees_red_sox(),
            PredictionKind::Under1Run1st,
            &FixedForm(0.7),
        );
        assert_eq!(p.factors.len(), 11);
        assert_eq!(p.top_factors.len(), 3);
        for pair in p.factors.windows(2) {
            assert!(pair[0].value >= pair[1].value);
        }
        for name in PLACEHOLDER_FACTORS {
            let value = p.factors.iter().find(|f| f.name == *name).unwrap().value;
            assert_eq!(value, 50.0);
        }
    }

    #[test]
    fn probabilities_stay_in_declared_bounds_for_any_input() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let mut input = neutral_input();
            input.home_era = rng.gen_range(0.0..12.0);
            input.away_era = rng.gen_range(0.0..12.0);
            input.home_bullpen_era = rng.gen_range(2.0..8.0);
            input.away_bullpen_era = rng.gen_range(2.0..8.0);
            input.ballpark_factor = rng.gen_range(0.7..1.4);
            input.weather.temperature = rng.gen_range(-10.0..110.0);
            for kind in PredictionKind::ALL {
                let p = BaselineStrategy.predict(&input, kind, &FixedForm(0.7));
                let (lo, hi) = kind.clamp_bounds();
                assert!(
                    (lo..=hi).contains(&p.probability),
                    "{:?} produced {} outside [{lo},{hi}]",
                    kind,
                    p.probability
                );
            }
        }
    }

    #[test]
    fn coors_field_heat_pushes_the_overs_up() {
        let mut input = neutral_input();
        input.ballpark_factor = 1.28;
        input.weather.temperature = 95.0;
        let hot = BaselineStrategy.predict(&input, PredictionKind::Over25First3, &FixedForm(0.7));
        let cool =
            BaselineStrategy.predict(&neutral_input(), PredictionKind::Over25First3, &FixedForm(0.7));
        assert!(hot.probability > cool.probability);
    }

    #[test]
    fn non_finite_input_yields_neutral_fallback() {
        let mut input = neutral_input();
        input.away_bullpen_era = f64::NAN;
        let p = BaselineStrategy.predict(&input, PredictionKind::Over35First3, &FixedForm(0.7));
        assert_eq!(p.probability, 40);
        assert!(p.details.error.is_some());
    }
}

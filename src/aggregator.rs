//! Per-date aggregation: fetch the day's games, resolve inputs, and score
//! every game under the selected strategy.
//!
//! Each game is fault-isolated: a game whose inputs cannot be resolved gets
//! the neutral prediction set and the batch continues. A schedule fetch that
//! fails on every rung yields the sample game list with an empty prediction
//! map instead of an error.

use chrono::NaiveDate;
use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::TtlCache;
use crate::engine::{
    fallback_prediction, FormSource, PredictionKind, ScoreInput, ScoringStrategy,
};
use crate::environment::{resolve_ballpark_factor, resolve_weather, WeatherProvider};
use crate::models::{
    DailyPredictions, Game, PitcherEra, Prediction, PredictionSet, TeamSeasonStats,
};
use crate::refdata;
use crate::stats::{fetch_games, resolve_bullpen_era, resolve_team_stats, StatsSource};

/// Shared collaborators for prediction runs, built once at startup.
pub struct PredictionDeps {
    pub stats: Arc<dyn StatsSource>,
    pub weather: Arc<dyn WeatherProvider>,
    pub form: Arc<dyn FormSource>,
    pub schedule_cache: TtlCache<String, Vec<Game>>,
    pub era_cache: TtlCache<String, PitcherEra>,
    pub team_cache: TtlCache<String, TeamSeasonStats>,
}

/// Prediction-map key: `"{away_team}_{home_team}"`.
pub fn game_key(game: &Game) -> String {
    format!("{}_{}", game.away_team, game.home_team)
}

async fn resolve_input(deps: &PredictionDeps, game: &Game) -> ScoreInput {
    let home_stats = resolve_team_stats(&game.home_team);
    let away_stats = resolve_team_stats(&game.away_team);
    let home_bullpen =
        resolve_bullpen_era(deps.stats.as_ref(), &deps.team_cache, &game.home_team).await;
    let away_bullpen =
        resolve_bullpen_era(deps.stats.as_ref(), &deps.team_cache, &game.away_team).await;
    let ballpark_factor = resolve_ballpark_factor(&game.venue);
    let weather = resolve_weather(deps.weather.as_ref(), &game.venue).await;

    ScoreInput {
        home_era: game.home_era,
        away_era: game.away_era,
        home_stats,
        away_stats,
        home_bullpen_era: home_bullpen.era,
        away_bullpen_era: away_bullpen.era,
        ballpark_factor,
        weather,
    }
}

fn neutral_set(input: Option<&ScoreInput>, reason: &str) -> PredictionSet {
    let predict = |kind: PredictionKind| -> Prediction { fallback_prediction(kind, input, reason) };
    PredictionSet {
        under_1_run_1st: predict(PredictionKind::Under1Run1st),
        over_2_5_runs_first_3: predict(PredictionKind::Over25First3),
        over_3_5_runs_first_3: predict(PredictionKind::Over35First3),
    }
}

/// Score all three markets for one game. Malformed inputs degrade to the
/// neutral set; this never fails.
pub async fn score_game(
    deps: &PredictionDeps,
    strategy: &dyn ScoringStrategy,
    game: &Game,
) -> PredictionSet {
    let input = resolve_input(deps, game).await;
    if !input.is_finite() {
        warn!(
            "Non-finite inputs for {} @ {}, substituting neutral predictions",
            game.away_team, game.home_team
        );
        return neutral_set(Some(&input), "non-finite input");
    }

    PredictionSet {
        under_1_run_1st: strategy.predict(&input, PredictionKind::Under1Run1st, deps.form.as_ref()),
        over_2_5_runs_first_3: strategy.predict(
            &input,
            PredictionKind::Over25First3,
            deps.form.as_ref(),
        ),
        over_3_5_runs_first_3: strategy.predict(
            &input,
            PredictionKind::Over35First3,
            deps.form.as_ref(),
        ),
    }
}

/// The full per-date bundle: games plus all three predictions per game,
/// keyed by matchup.
pub async fn predictions_for_date(
    deps: &PredictionDeps,
    strategy: &dyn ScoringStrategy,
    date: NaiveDate,
) -> DailyPredictions {
    let date_str = date.format("%Y-%m-%d").to_string();

    let games = match fetch_games(
        deps.stats.as_ref(),
        &deps.schedule_cache,
        &deps.era_cache,
        date,
    )
    .await
    {
        Ok(games) => games,
        Err(e) => {
            warn!("Game fetch failed for {}: {}", date_str, e);
            return DailyPredictions {
                date: date_str.clone(),
                games: refdata::sample_games(&format!(
                    "Error fetching games for {date_str}. Showing sample games."
                )),
                predictions: BTreeMap::new(),
            };
        }
    };

    info!(
        "Scoring {} game(s) for {} with '{}' strategy",
        games.len(),
        date_str,
        strategy.name()
    );

    let scored = join_all(games.iter().map(|game| async move {
        (game_key(game), score_game(deps, strategy, game).await)
    }))
    .await;

    DailyPredictions {
        date: date_str,
        games,
        predictions: scored.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FixedForm, StrategyKind};
    use crate::environment::SampleWeather;
    use crate::models::{PlayerHit, Provenance, ScheduledGame};
    use crate::stats::StatsError;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FakeStats {
        fail_all: bool,
        games: Vec<ScheduledGame>,
        nan_eras: bool,
    }

    #[async_trait]
    impl StatsSource for FakeStats {
        fn name(&self) -> &str {
            "fake"
        }

        async fn schedule(&self, _date: NaiveDate) -> Result<Vec<ScheduledGame>, StatsError> {
            if self.fail_all {
                return Err(StatsError::Unavailable("down".into()));
            }
            Ok(self.games.clone())
        }

        async fn search_players(&self, _name: &str) -> Result<Vec<PlayerHit>, StatsError> {
            if self.fail_all || self.nan_eras {
                return Err(StatsError::Unavailable("down".into()));
            }
            Ok(vec![PlayerHit {
                id: 1,
                full_name: "Gerrit Cole".into(),
                position_code: "1".into(),
            }])
        }

        async fn season_era(&self, _player_id: i64) -> Result<f64, StatsError> {
            if self.fail_all || self.nan_eras {
                return Err(StatsError::Unavailable("down".into()));
            }
            Ok(2.63)
        }

        async fn team_season_stats(
            &self,
            _abbreviation: &str,
        ) -> Result<crate::models::TeamSeasonStats, StatsError> {
            Err(StatsError::Unavailable("down".into()))
        }
    }

    fn deps(stats: FakeStats) -> PredictionDeps {
        PredictionDeps {
            stats: Arc::new(stats),
            weather: Arc::new(SampleWeather),
            form: Arc::new(FixedForm(0.75)),
            schedule_cache: TtlCache::new(Duration::from_secs(60), 8),
            era_cache: TtlCache::new(Duration::from_secs(60), 64),
            team_cache: TtlCache::new(Duration::from_secs(60), 64),
        }
    }

    fn scheduled_game() -> ScheduledGame {
        ScheduledGame {
            game_id: 7,
            status: "Preview".into(),
            home_team: "New York Yankees".into(),
            away_team: "Boston Red Sox".into(),
            venue: "Yankee Stadium".into(),
            game_time: "19:05".into(),
            home_pitcher: Some("Gerrit Cole".into()),
            away_pitcher: Some("Nick Pivetta".into()),
        }
    }

    fn nan_game() -> Game {
        Game {
            game_id: 9,
            status: "Preview".into(),
            home_team: "New York Yankees".into(),
            away_team: "Boston Red Sox".into(),
            venue: "Yankee Stadium".into(),
            game_time: "19:05".into(),
            home_pitcher: "Gerrit Cole".into(),
            away_pitcher: "Nick Pivetta".into(),
            home_era: f64::NAN,
            away_era: f64::NAN,
            home_era_source: Provenance::Error,
            away_era_source: Provenance::Error,
            note: None,
        }
    }

    #[tokio::test]
    async fn every_game_gets_three_predictions() {
        let deps = deps(FakeStats {
            fail_all: false,
            games: vec![scheduled_game()],
            nan_eras: false,
        });
        let date = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
        let bundle =
            predictions_for_date(&deps, StrategyKind::Weighted.strategy(), date).await;

        assert_eq!(bundle.date, "2024-07-10");
        assert_eq!(bundle.games.len(), 1);
        assert_eq!(bundle.predictions.len(), 1);
        let set = &bundle.predictions["Boston Red Sox_New York Yankees"];
        let (lo, hi) = PredictionKind::Under1Run1st.clamp_bounds();
        assert!((lo..=hi).contains(&set.under_1_run_1st.probability));
        let (lo, hi) = PredictionKind::Over35First3.clamp_bounds();
        assert!((lo..=hi).contains(&set.over_3_5_runs_first_3.probability));
    }

    #[tokio::test]
    async fn schedule_outage_returns_samples_with_empty_predictions() {
        let deps = deps(FakeStats {
            fail_all: true,
            games: vec![],
            nan_eras: false,
        });
        let date = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
        let bundle =
            predictions_for_date(&deps, StrategyKind::Weighted.strategy(), date).await;

        assert_eq!(bundle.games.len(), 6);
        assert!(bundle.games[0]
            .note
            .as_deref()
            .unwrap()
            .contains("Error fetching games"));
        assert!(bundle.predictions.is_empty());
    }

    #[tokio::test]
    async fn malformed_game_gets_the_documented_neutral_set() {
        // Stats source down for every call AND the game record itself is
        // numerically unusable: the batch continues with the fixed neutral
        // probabilities instead of aborting.
        let deps = deps(FakeStats {
            fail_all: false,
            games: vec![],
            nan_eras: true,
        });
        let game = nan_game();
        let set = score_game(&deps, StrategyKind::Weighted.strategy(), &game).await;

        assert_eq!(set.under_1_run_1st.probability, 50);
        assert_eq!(set.over_2_5_runs_first_3.probability, 50);
        assert_eq!(set.over_3_5_runs_first_3.probability, 40);
        for p in [
            &set.under_1_run_1st,
            &set.over_2_5_runs_first_3,
            &set.over_3_5_runs_first_3,
        ] {
            assert_eq!(p.factors.len(), 3);
            assert!(p.factors.iter().all(|f| f.value == 50.0));
            assert!(p.details.error.is_some());
        }
    }

    #[tokio::test]
    async fn failing_stat_source_still_scores_with_degraded_inputs() {
        // ERA resolution degrades to the static table, bullpen to its fixed
        // default; the predictions are real numbers tagged as fallback.
        let deps = deps(FakeStats {
            fail_all: false,
            games: vec![scheduled_game()],
            nan_eras: true,
        });
        let date = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
        let bundle =
            predictions_for_date(&deps, StrategyKind::Weighted.strategy(), date).await;

        let game = &bundle.games[0];
        assert_eq!(game.home_era_source, Provenance::Fallback);
        assert_eq!(game.home_era, 2.63); // static table value for Gerrit Cole
        let set = &bundle.predictions[&game_key(game)];
        assert!(set.under_1_run_1st.details.error.is_none());
    }

    #[tokio::test]
    async fn baseline_strategy_scores_the_same_bundle() {
        let deps = deps(FakeStats {
            fail_all: false,
            games: vec![scheduled_game()],
            nan_eras: false,
        });
        let date = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
        let bundle =
            predictions_for_date(&deps, StrategyKind::Baseline.strategy(), date).await;
        let set = &bundle.predictions["Boston Red Sox_New York Yankees"];
        assert_eq!(set.under_1_run_1st.factors.len(), 11);
    }
}

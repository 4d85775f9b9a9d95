use anyhow::Context;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use reqwest::Client;
use tracing::debug;

use super::{StatsError, StatsSource};
use crate::models::{PlayerHit, Provenance, ScheduledGame, TeamSeasonStats};

/// Client for the public MLB Stats API.
/// Docs: <https://statsapi.mlb.com/docs>
#[derive(Clone)]
pub struct MlbStatsClient {
    http: Client,
    base_url: String,
}

impl MlbStatsClient {
    pub fn new(base_url: &str, timeout: std::time::Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(MlbStatsClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<serde_json::Value, StatsError> {
        debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| StatsError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(StatsError::Unavailable(format!(
                "{} returned {}",
                url,
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| StatsError::Malformed(e.to_string()))
    }

    fn current_season() -> i32 {
        Utc::now().year()
    }
}

/// ERA values come back as strings from some endpoints and numbers from
/// others; accept both.
fn json_f64(value: &serde_json::Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn format_game_time(game_date: Option<&str>) -> String {
    game_date
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "TBD".to_string())
}

#[async_trait]
impl StatsSource for MlbStatsClient {
    fn name(&self) -> &str {
        "MLB Stats API"
    }

    async fn schedule(&self, date: NaiveDate) -> Result<Vec<ScheduledGame>, StatsError> {
        let url = format!("{}/schedule", self.base_url);
        let raw = self
            .get_json(
                &url,
                &[
                    ("sportId", "1".to_string()),
                    ("date", date.format("%Y-%m-%d").to_string()),
                    ("hydrate", "team,venue,probablePitcher".to_string()),
                ],
            )
            .await?;

        let games = match raw["dates"][0]["games"].as_array() {
            Some(list) => list,
            // A well-formed response with no dates just means no games
            None if raw.get("dates").is_some() => return Ok(vec![]),
            None => {
                return Err(StatsError::Malformed(
                    "schedule response missing 'dates'".to_string(),
                ))
            }
        };

        let parsed = games
            .iter()
            .filter_map(|game| {
                let home = &game["teams"]["home"];
                let away = &game["teams"]["away"];
                Some(ScheduledGame {
                    game_id: game["gamePk"].as_i64()?,
                    status: game["status"]["abstractGameState"]
                        .as_str()
                        .unwrap_or("Preview")
                        .to_string(),
                    home_team: home["team"]["name"].as_str()?.to_string(),
                    away_team: away["team"]["name"].as_str()?.to_string(),
                    venue: game["venue"]["name"].as_str().unwrap_or("Unknown").to_string(),
                    game_time: format_game_time(game["gameDate"].as_str()),
                    home_pitcher: home["probablePitcher"]["fullName"]
                        .as_str()
                        .map(|s| s.to_string()),
                    away_pitcher: away["probablePitcher"]["fullName"]
                        .as_str()
                        .map(|s| s.to_string()),
                })
            })
            .collect();

        Ok(parsed)
    }

    async fn search_players(&self, name: &str) -> Result<Vec<PlayerHit>, StatsError> {
        let url = format!("{}/players", self.base_url);
        let raw = self
            .get_json(&url, &[("search", name.to_string())])
            .await?;

        let people = raw["people"]
            .as_array()
            .ok_or_else(|| StatsError::Malformed("player search missing 'people'".to_string()))?;

        Ok(people
            .iter()
            .filter_map(|p| {
                Some(PlayerHit {
                    id: p["id"].as_i64()?,
                    full_name: p["fullName"].as_str()?.to_string(),
                    position_code: p["primaryPosition"]["code"]
                        .as_str()
                        .unwrap_or_default()
                        .to_string(),
                })
            })
            .collect())
    }

    async fn season_era(&self, player_id: i64) -> Result<f64, StatsError> {
        let url = format!("{}/people/{}/stats", self.base_url, player_id);
        let raw = self
            .get_json(
                &url,
                &[
                    ("stats", "season".to_string()),
                    ("season", Self::current_season().to_string()),
                    ("group", "pitching".to_string()),
                ],
            )
            .await?;

        json_f64(&raw["stats"][0]["splits"][0]["stat"]["era"])
            .ok_or_else(|| StatsError::NotFound(format!("season ERA for player {player_id}")))
    }

    async fn team_season_stats(&self, abbreviation: &str) -> Result<TeamSeasonStats, StatsError> {
        let teams_url = format!("{}/teams", self.base_url);
        let raw = self
            .get_json(&teams_url, &[("sportId", "1".to_string())])
            .await?;

        let teams = raw["teams"]
            .as_array()
            .ok_or_else(|| StatsError::Malformed("team list missing 'teams'".to_string()))?;
        let team_id = teams
            .iter()
            .find(|t| t["abbreviation"].as_str() == Some(abbreviation))
            .and_then(|t| t["id"].as_i64())
            .ok_or_else(|| StatsError::NotFound(format!("team {abbreviation}")))?;

        let stats_url = format!("{}/teams/{}/stats", self.base_url, team_id);
        let raw = self
            .get_json(
                &stats_url,
                &[
                    ("stats", "season".to_string()),
                    ("season", Self::current_season().to_string()),
                    ("group", "pitching,hitting".to_string()),
                ],
            )
            .await?;

        let groups = raw["stats"]
            .as_array()
            .ok_or_else(|| StatsError::Malformed("team stats missing 'stats'".to_string()))?;

        let mut hitting = None;
        let mut pitching = None;
        for group in groups {
            match group["group"]["displayName"].as_str() {
                Some("hitting") => hitting = Some(&group["splits"][0]["stat"]),
                Some("pitching") => pitching = Some(&group["splits"][0]["stat"]),
                _ => {}
            }
        }
        let (hitting, pitching) = match (hitting, pitching) {
            (Some(h), Some(p)) => (h, p),
            _ => {
                return Err(StatsError::Malformed(
                    "team stats missing hitting or pitching split".to_string(),
                ))
            }
        };

        let runs = json_f64(&hitting["runs"])
            .ok_or_else(|| StatsError::Malformed("hitting split missing 'runs'".to_string()))?;
        let games_played = json_f64(&hitting["gamesPlayed"]).filter(|g| *g > 0.0).ok_or_else(
            || StatsError::Malformed("hitting split missing 'gamesPlayed'".to_string()),
        )?;
        let era = json_f64(&pitching["era"])
            .ok_or_else(|| StatsError::Malformed("pitching split missing 'era'".to_string()))?;

        Ok(TeamSeasonStats {
            runs_per_game: runs / games_played,
            era,
            whip: json_f64(&pitching["whip"]).unwrap_or(1.3),
            strikeouts: json_f64(&pitching["strikeOuts"]).unwrap_or(0.0),
            walks: json_f64(&pitching["baseOnBalls"]).unwrap_or(0.0),
            provenance: Provenance::Api,
        })
    }
}

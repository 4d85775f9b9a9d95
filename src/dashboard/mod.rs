use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::aggregator::{predictions_for_date, PredictionDeps};
use crate::engine::StrategyKind;

#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<PredictionDeps>,
    pub default_strategy: StrategyKind,
}

/// Build the Axum router for the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/health", get(health_handler))
        .route("/api/predictions", get(predictions_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

#[derive(Debug, Deserialize)]
struct PredictionsQuery {
    date: Option<String>,
    strategy: Option<StrategyKind>,
}

/// Missing date → today (UTC); anything not YYYY-MM-DD is rejected.
fn parse_date_param(date: Option<&str>) -> Result<NaiveDate, String> {
    match date {
        None => Ok(Utc::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| format!("invalid date '{raw}', expected YYYY-MM-DD")),
    }
}

fn error_body(
    status: StatusCode,
    error: &str,
    message: String,
) -> (StatusCode, Json<serde_json::Value>) {
    (
        status,
        Json(serde_json::json!({ "error": error, "message": message })),
    )
}

/// GET /api/health
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/predictions?date=YYYY-MM-DD&strategy=weighted|baseline
async fn predictions_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PredictionsQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let date = parse_date_param(params.date.as_deref())
        .map_err(|msg| error_body(StatusCode::BAD_REQUEST, "invalid_date", msg))?;
    let strategy = params.strategy.unwrap_or(state.default_strategy).strategy();

    let bundle = predictions_for_date(&state.deps, strategy, date).await;
    Ok(Json(bundle))
}

/// Serve the dashboard HTML page, injecting the default strategy.
async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let strategy = match state.default_strategy {
        StrategyKind::Weighted => "weighted",
        StrategyKind::Baseline => "baseline",
    };
    let html = DASHBOARD_HTML.replace(
        r#"<body>"#,
        &format!(r#"<body data-strategy="{strategy}">"#),
    );
    Html(html)
}

/// Embedded single-file dashboard (HTML + CSS + JS)
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Early Innings — MLB Run Predictions</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #4f8cff;
    --green: #00c896;
    --amber: #ffb020;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); flex-wrap: wrap; }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  .controls { margin-left: auto; display: flex; gap: .6rem; align-items: center; }
  .controls input, .controls select, .controls button {
    background: var(--card); color: var(--text); border: 1px solid var(--border);
    border-radius: 6px; padding: .35rem .6rem; font-size: .85rem; cursor: pointer;
  }
  .controls button:hover { border-color: var(--accent); color: var(--accent); }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  .note { background: rgba(255,176,32,.12); border: 1px solid var(--amber); color: var(--amber);
          border-radius: 8px; padding: .6rem 1rem; font-size: .85rem; }
  .cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(330px, 1fr)); gap: 1rem; }
  .game-card { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1.1rem; }
  .game-card .matchup { font-weight: 700; font-size: 1.05rem; margin-bottom: .2rem; }
  .game-card .meta { color: var(--muted); font-size: .8rem; margin-bottom: .7rem; }
  .pitchers { font-size: .82rem; color: var(--muted); margin-bottom: .8rem; line-height: 1.5; }
  .pitchers b { color: var(--text); font-weight: 600; }
  .src { display: inline-block; margin-left: .35rem; padding: .05rem .4rem; border-radius: 10px;
         font-size: .68rem; text-transform: uppercase; letter-spacing: .04em; }
  .src.api { background: rgba(0,200,150,.15); color: var(--green); }
  .src.fallback { background: rgba(255,176,32,.15); color: var(--amber); }
  .src.default, .src.error { background: rgba(255,79,106,.15); color: var(--red); }
  .markets { display: grid; grid-template-columns: repeat(3, 1fr); gap: .5rem; }
  .market { background: var(--bg); border: 1px solid var(--border); border-radius: 8px;
            padding: .6rem .4rem; text-align: center; }
  .market .label { color: var(--muted); font-size: .66rem; text-transform: uppercase; letter-spacing: .05em; }
  .market .prob { font-size: 1.35rem; font-weight: 700; margin: .2rem 0; }
  .rating { display: inline-block; padding: .1rem .5rem; border-radius: 12px; font-size: .7rem; font-weight: 700; }
  .rating.Bet { background: rgba(0,200,150,.18); color: var(--green); }
  .rating.Lean { background: rgba(255,176,32,.18); color: var(--amber); }
  .rating.Pass { background: rgba(136,136,170,.18); color: var(--muted); }
  .factors { margin-top: .7rem; font-size: .75rem; color: var(--muted); }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; overflow: hidden; }
  .panel-header { padding: .9rem 1.2rem; border-bottom: 1px solid var(--border); font-weight: 600; }
  table { width: 100%; border-collapse: collapse; }
  th { padding: .7rem 1rem; text-align: left; font-size: .75rem; text-transform: uppercase; color: var(--muted); border-bottom: 1px solid var(--border); }
  td { padding: .65rem 1rem; font-size: .88rem; border-bottom: 1px solid #1e2130; }
  tr:last-child td { border-bottom: none; }
  .empty { color: var(--muted); text-align: center; padding: 2rem; font-size: .9rem; }
</style>
</head>
<body>
<header>
  <h1>⚾ Early Innings</h1>
  <div class="controls">
    <button id="prev-day">← Prev</button>
    <input type="date" id="date-picker">
    <button id="next-day">Next →</button>
    <button id="today">Today</button>
    <select id="strategy">
      <option value="weighted">Weighted model</option>
      <option value="baseline">Baseline model</option>
    </select>
  </div>
</header>

<main>
  <div class="note" id="note" style="display:none;"></div>

  <div class="cards" id="cards"><div class="empty">Loading…</div></div>

  <div class="panel">
    <div class="panel-header">Market Comparison</div>
    <table>
      <thead><tr>
        <th>Matchup</th><th>Venue</th><th>Time</th>
        <th>Under 1 Run (1st)</th><th>Over 2.5 (F3)</th><th>Over 3.5 (F3)</th>
      </tr></thead>
      <tbody id="table-body"><tr><td colspan="6" class="empty">Loading…</td></tr></tbody>
    </table>
  </div>
</main>

<script>
const MARKETS = [
  { key: 'under_1_run_1st', label: 'Under 1 Run · 1st' },
  { key: 'over_2_5_runs_first_3', label: 'Over 2.5 · F3' },
  { key: 'over_3_5_runs_first_3', label: 'Over 3.5 · F3' },
];

const fmtDate = d => d.toISOString().split('T')[0];
let currentDate = new Date();

function srcBadge(src) {
  return `<span class="src ${src}">${src}</span>`;
}

function marketCell(pred) {
  if (!pred) return '–';
  return `${pred.probability}% <span class="rating ${pred.rating}">${pred.rating}</span>`;
}

function renderCards(data) {
  const cards = document.getElementById('cards');
  if (!data.games.length) {
    cards.innerHTML = '<div class="empty">No games for this date</div>';
    return;
  }
  cards.innerHTML = data.games.map(g => {
    const key = `${g.away_team}_${g.home_team}`;
    const set = data.predictions[key];
    const markets = MARKETS.map(m => {
      const pred = set ? set[m.key] : null;
      return `<div class="market">
        <div class="label">${m.label}</div>
        <div class="prob">${pred ? pred.probability + '%' : '–'}</div>
        ${pred ? `<span class="rating ${pred.rating}">${pred.rating}</span>` : ''}
      </div>`;
    }).join('');
    const top = set ? set.under_1_run_1st.top_factors.join(' · ') : '';
    return `<div class="game-card">
      <div class="matchup">${g.away_team} @ ${g.home_team}</div>
      <div class="meta">${g.venue} · ${g.game_time}</div>
      <div class="pitchers">
        <b>${g.home_pitcher}</b> ${g.home_era.toFixed(2)} ERA ${srcBadge(g.home_era_source)}<br>
        <b>${g.away_pitcher}</b> ${g.away_era.toFixed(2)} ERA ${srcBadge(g.away_era_source)}
      </div>
      <div class="markets">${markets}</div>
      ${top ? `<div class="factors">Top factors: ${top}</div>` : ''}
    </div>`;
  }).join('');
}

function renderTable(data) {
  const tbody = document.getElementById('table-body');
  if (!data.games.length) {
    tbody.innerHTML = '<tr><td colspan="6" class="empty">No games</td></tr>';
    return;
  }
  tbody.innerHTML = data.games.map(g => {
    const set = data.predictions[`${g.away_team}_${g.home_team}`];
    const cells = MARKETS.map(m => `<td>${marketCell(set ? set[m.key] : null)}</td>`).join('');
    return `<tr>
      <td>${g.away_team} @ ${g.home_team}</td>
      <td>${g.venue}</td>
      <td>${g.game_time}</td>
      ${cells}
    </tr>`;
  }).join('');
}

async function loadAll() {
  const date = document.getElementById('date-picker').value || fmtDate(currentDate);
  const strategy = document.getElementById('strategy').value;
  const r = await fetch(`/api/predictions?date=${date}&strategy=${strategy}`);
  if (!r.ok) {
    document.getElementById('cards').innerHTML =
      '<div class="empty">Failed to load predictions</div>';
    return;
  }
  const data = await r.json();
  const note = data.games.find(g => g.note);
  const noteEl = document.getElementById('note');
  if (note) { noteEl.textContent = note.note; noteEl.style.display = 'block'; }
  else { noteEl.style.display = 'none'; }
  renderCards(data);
  renderTable(data);
}

function shiftDay(delta) {
  const picker = document.getElementById('date-picker');
  const d = new Date(picker.value);
  d.setDate(d.getDate() + delta);
  picker.value = fmtDate(d);
  loadAll();
}

document.getElementById('prev-day').addEventListener('click', () => shiftDay(-1));
document.getElementById('next-day').addEventListener('click', () => shiftDay(1));
document.getElementById('today').addEventListener('click', () => {
  document.getElementById('date-picker').value = fmtDate(new Date());
  loadAll();
});
document.getElementById('strategy').addEventListener('change', loadAll);
document.getElementById('date-picker').addEventListener('change', loadAll);

document.getElementById('date-picker').value = fmtDate(currentDate);
document.getElementById('strategy').value = document.body.dataset.strategy || 'weighted';
loadAll();
setInterval(loadAll, 60000);
</script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_date_defaults_to_today() {
        let today = Utc::now().date_naive();
        assert_eq!(parse_date_param(None).unwrap(), today);
    }

    #[test]
    fn well_formed_date_is_parsed() {
        assert_eq!(
            parse_date_param(Some("2024-07-10")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 10).unwrap()
        );
    }

    #[test]
    fn malformed_dates_are_rejected() {
        assert!(parse_date_param(Some("07/10/2024")).is_err());
        assert!(parse_date_param(Some("2024-13-40")).is_err());
        assert!(parse_date_param(Some("yesterday")).is_err());
    }
}

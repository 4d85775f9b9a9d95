//! Static reference tables and their lookup rules.
//!
//! All tables are declared once and never mutated. Lookups are substring
//! matches in BOTH directions (table key contains the query, or the query
//! contains the table key), case-insensitive, because venue and team strings
//! from different upstream sources are not byte-identical. Iteration order is
//! declaration order, so matching is first-match, not best-match.
//!
//! Every lookup function returns a defined value for any input: unmatched
//! inputs resolve to a named default constant, never an absence.

use crate::models::{Game, Provenance};

// ── Defaults ─────────────────────────────────────────────────────────────────

/// League-average starter ERA, used when every resolution rung misses.
pub const LEAGUE_AVG_ERA: f64 = 4.50;
/// Population-average batting line for unknown teams.
pub const DEFAULT_BATTING_AVG: f64 = 0.245;
pub const DEFAULT_BULLPEN_ERA: f64 = 4.20;
/// Default for the live-derived bullpen estimate when team stats are missing.
pub const DEFAULT_DERIVED_BULLPEN_ERA: f64 = 4.7;
/// Bullpen ERA is modeled as proportionally worse than rotation ERA.
pub const BULLPEN_ERA_RATIO: f64 = 1.1;
pub const DEFAULT_BALLPARK_FACTOR: f64 = 1.0;
pub const DEFAULT_WEATHER_IMPACT: f64 = 1.0;

// ── Team name ↔ abbreviation ─────────────────────────────────────────────────

pub const TEAM_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Arizona Diamondbacks", "ARI"),
    ("Atlanta Braves", "ATL"),
    ("Baltimore Orioles", "BAL"),
    ("Boston Red Sox", "BOS"),
    ("Chicago Cubs", "CHC"),
    ("Chicago White Sox", "CWS"),
    ("Cincinnati Reds", "CIN"),
    ("Cleveland Guardians", "CLE"),
    ("Colorado Rockies", "COL"),
    ("Detroit Tigers", "DET"),
    ("Houston Astros", "HOU"),
    ("Kansas City Royals", "KC"),
    ("Los Angeles Angels", "LAA"),
    ("Los Angeles Dodgers", "LAD"),
    ("Miami Marlins", "MIA"),
    ("Milwaukee Brewers", "MIL"),
    ("Minnesota Twins", "MIN"),
    ("New York Mets", "NYM"),
    ("New York Yankees", "NYY"),
    ("Oakland Athletics", "OAK"),
    ("Philadelphia Phillies", "PHI"),
    ("Pittsburgh Pirates", "PIT"),
    ("San Diego Padres", "SD"),
    ("San Francisco Giants", "SF"),
    ("Seattle Mariners", "SEA"),
    ("St. Louis Cardinals", "STL"),
    ("Tampa Bay Rays", "TB"),
    ("Texas Rangers", "TEX"),
    ("Toronto Blue Jays", "TOR"),
    ("Washington Nationals", "WSH"),
];

/// Case-insensitive bidirectional substring check.
fn loose_match(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

/// Resolve a team name (possibly partial or decorated) to its abbreviation.
pub fn team_abbreviation(team_name: &str) -> Option<&'static str> {
    TEAM_ABBREVIATIONS
        .iter()
        .find(|(name, _)| loose_match(name, team_name))
        .map(|(_, abbr)| *abbr)
}

// ── Per-team batting average / bullpen ERA fallback ─────────────────────────

pub const TEAM_STATS: &[(&str, f64, f64)] = &[
    ("Arizona Diamondbacks", 0.252, 3.95),
    ("Atlanta Braves", 0.257, 3.39),
    ("Baltimore Orioles", 0.258, 3.83),
    ("Boston Red Sox", 0.261, 3.96),
    ("Chicago Cubs", 0.247, 4.02),
    ("Chicago White Sox", 0.236, 4.87),
    ("Cincinnati Reds", 0.243, 4.28),
    ("Cleveland Guardians", 0.251, 3.62),
    ("Colorado Rockies", 0.251, 5.37),
    ("Detroit Tigers", 0.238, 4.24),
    ("Houston Astros", 0.259, 3.56),
    ("Kansas City Royals", 0.244, 4.55),
    ("Los Angeles Angels", 0.245, 4.12),
    ("Los Angeles Dodgers", 0.258, 3.42),
    ("Miami Marlins", 0.233, 4.42),
    ("Milwaukee Brewers", 0.247, 3.82),
    ("Minnesota Twins", 0.243, 3.95),
    ("New York Mets", 0.254, 4.02),
    ("New York Yankees", 0.254, 3.58),
    ("Oakland Athletics", 0.227, 4.92),
    ("Philadelphia Phillies", 0.256, 3.72),
    ("Pittsburgh Pirates", 0.241, 4.35),
    ("San Diego Padres", 0.251, 3.83),
    ("San Francisco Giants", 0.237, 3.89),
    ("Seattle Mariners", 0.232, 3.45),
    ("St. Louis Cardinals", 0.252, 4.12),
    ("Tampa Bay Rays", 0.238, 3.82),
    ("Texas Rangers", 0.263, 4.02),
    ("Toronto Blue Jays", 0.243, 3.68),
    ("Washington Nationals", 0.254, 4.56),
];

/// (batting_avg, bullpen_era) for a team, if it matches the table.
pub fn fallback_team_stats(team_name: &str) -> Option<(f64, f64)> {
    TEAM_STATS
        .iter()
        .find(|(name, _, _)| loose_match(name, team_name))
        .map(|(_, avg, pen)| (*avg, *pen))
}

// ── Pitcher ERA fallback table ───────────────────────────────────────────────
//
// Exact-name lookup only; pitcher names come through verbatim from the
// schedule feed so no fuzzy matching is needed here.

pub const PITCHER_ERAS: &[(&str, f64)] = &[
    ("Brandon Pfaadt", 3.5),
    ("Zac Gallen", 3.47),
    ("Merrill Kelly", 3.37),
    ("Eduardo Rodriguez", 4.15),
    ("Ryne Nelson", 5.02),
    ("Spencer Strider", 3.6),
    ("Max Fried", 3.09),
    ("Charlie Morton", 3.64),
    ("Reynaldo López", 3.72),
    ("Chris Sale", 3.84),
    ("Corbin Burnes", 2.94),
    ("Grayson Rodriguez", 4.61),
    ("Dean Kremer", 8.16),
    ("Cole Irvin", 4.81),
    ("Kyle Bradish", 3.18),
    ("Brayan Bello", 4.34),
    ("Nick Pivetta", 1.69),
    ("Kutter Crawford", 3.65),
    ("Tanner Houck", 2.98),
    ("Sean Newcomb", 4.97),
    ("Justin Steele", 3.06),
    ("Jameson Taillon", 4.01),
    ("Javier Assad", 3.55),
    ("Kyle Hendricks", 4.04),
    ("Matthew Boyd", 2.14),
    ("Garrett Crochet", 3.04),
    ("Michael Soroka", 4.85),
    ("Chris Flexen", 5.09),
    ("Jonathan Cannon", 5.79),
    ("Erick Fedde", 3.13),
    ("Hunter Greene", 3.41),
    ("Nick Lodolo", 4.01),
    ("Graham Ashcraft", 4.76),
    ("Frankie Montas", 4.43),
    ("Nick Martinez", 6.06),
    ("Shane Bieber", 3.52),
    ("Tanner Bibee", 3.91),
    ("Logan Allen", 4.46),
    ("Gavin Williams", 3.46),
    ("Ben Lively", 4.36),
    ("Kyle Freeland", 5.27),
    ("Cal Quantrill", 4.80),
    ("Austin Gomber", 5.51),
    ("Ryan Feltner", 5.07),
    ("Germán Márquez", 4.6),
    ("Tarik Skubal", 2.80),
    ("Jack Flaherty", 3.75),
    ("Reese Olson", 3.92),
    ("Casey Mize", 4.12),
    ("Keider Montero", 9.0),
    ("Framber Valdez", 3.40),
    ("Cristian Javier", 4.25),
    ("Hunter Brown", 4.68),
    ("J.P. France", 4.46),
    ("Ronel Blanco", 6.48),
    ("Cole Ragans", 3.06),
    ("Seth Lugo", 3.57),
    ("Brady Singer", 4.39),
    ("Michael Wacha", 3.93),
    ("Kris Bubic", 0.96),
    ("Patrick Sandoval", 4.38),
    ("Tyler Anderson", 4.75),
    ("Griffin Canning", 4.75),
    ("José Soriano", 2.7),
    ("Reid Detmers", 4.43),
    ("Yoshinobu Yamamoto", 3.86),
    ("Tyler Glasnow", 3.32),
    ("James Paxton", 4.01),
    ("Gavin Stone", 3.78),
    ("Bobby Miller", 4.25),
    ("Jesús Luzardo", 3.63),
    ("Trevor Rogers", 4.00),
    ("Braxton Garrett", 3.66),
    ("Ryan Weathers", 5.13),
    ("Max Meyer", 2.0),
    ("Freddy Peralta", 3.20),
    ("Colin Rea", 4.55),
    ("Wade Miley", 3.85),
    ("Joe Ross", 4.74),
    ("Jose Quintana", 0.71),
    ("Pablo López", 3.32),
    ("Joe Ryan", 3.82),
    ("Bailey Ober", 3.43),
    ("Chris Paddack", 4.02),
    ("David Festa", 0.0),
    ("Kodai Senga", 3.38),
    ("Luis Severino", 4.47),
    ("Sean Manaea", 3.97),
    ("José Quintana", 3.57),
    ("Huascar Brazobán", 0.73),
    ("Gerrit Cole", 2.63),
    ("Carlos Rodón", 3.93),
    ("Marcus Stroman", 3.66),
    ("Nestor Cortes", 3.77),
    ("Clarke Schmidt", 4.12),
    ("JP Sears", 4.37),
    ("Paul Blackburn", 4.21),
    ("Alex Wood", 4.46),
    ("Ross Stripling", 4.80),
    ("Osvaldo Bido", 5.24),
    ("Zack Wheeler", 3.07),
    ("Aaron Nola", 5.51),
    ("Ranger Suárez", 3.42),
    ("Cristopher Sánchez", 3.44),
    ("Taijuan Walker", 4.57),
    ("Mitch Keller", 3.91),
    ("Marco Gonzales", 5.22),
    ("Bailey Falter", 7.2),
    ("Luis Ortiz", 4.78),
    ("Quinn Priester", 5.36),
    ("Yu Darvish", 3.76),
    ("Joe Musgrove", 4.12),
    ("Dylan Cease", 3.72),
    ("Michael King", 3.33),
    ("Logan Webb", 3.25),
    ("Blake Snell", 3.38),
    ("Kyle Harrison", 4.09),
    ("Jordan Hicks", 3.78),
    ("Robbie Ray", 2.93),
    ("Luis Castillo", 3.32),
    ("George Kirby", 3.39),
    ("Logan Gilbert", 3.73),
    ("Bryce Miller", 4.5),
    ("Bryan Woo", 3.63),
    ("Sonny Gray", 3.24),
    ("Miles Mikolas", 4.23),
    ("Lance Lynn", 4.47),
    ("Kyle Gibson", 4.16),
    ("Steven Matz", 2.16),
    ("Zach Eflin", 3.64),
    ("Aaron Civale", 4.25),
    ("Taj Bradley", 4.19),
    ("Shane Baz", 3.99),
    ("Zack Littell", 6.88),
    ("Nathan Eovaldi", 3.87),
    ("Jon Gray", 4.15),
    ("Andrew Heaney", 4.56),
    ("Dane Dunning", 4.32),
    ("Patrick Corbin", 6.75),
    ("Kevin Gausman", 3.18),
    ("José Berríos", 3.65),
    ("Chris Bassitt", 0.77),
    ("Yusei Kikuchi", 4.02),
    ("Bowden Francis", 4.56),
    ("MacKenzie Gore", 3.69),
    ("Trevor Williams", 4.46),
    ("Jake Irvin", 4.14),
    ("Mitchell Parker", 1.96),
];

/// Exact-name fallback ERA for a starting pitcher.
pub fn fallback_pitcher_era(pitcher_name: &str) -> Option<f64> {
    PITCHER_ERAS
        .iter()
        .find(|(name, _)| *name == pitcher_name)
        .map(|(_, era)| *era)
}

// ── Ballpark run factors ─────────────────────────────────────────────────────
//
// Multiplicative run-scoring environment, centered near 1.0. An earlier
// revision of this table carried different values for a handful of parks
// (see DESIGN.md); this is the canonical set.

pub const BALLPARK_FACTORS: &[(&str, f64)] = &[
    ("Coors Field", 1.28),
    ("Great American Ball Park", 1.12),
    ("Fenway Park", 1.10),
    ("Wrigley Field", 1.08),
    ("Citizens Bank Park", 1.07),
    ("Yankee Stadium", 1.06),
    ("Chase Field", 1.05),
    ("Globe Life Field", 1.04),
    ("Rogers Centre", 1.03),
    ("Dodger Stadium", 1.02),
    ("Truist Park", 1.01),
    ("Nationals Park", 1.00),
    ("Minute Maid Park", 0.99),
    ("Petco Park", 0.98),
    ("T-Mobile Park", 0.97),
    ("Oracle Park", 0.96),
    ("Busch Stadium", 0.95),
    ("Citi Field", 0.94),
    ("PNC Park", 0.93),
    ("Comerica Park", 0.92),
    ("Target Field", 0.91),
    ("Oakland Coliseum", 0.90),
    ("Tropicana Field", 0.89),
    ("loanDepot park", 0.88),
    ("Angel Stadium", 0.95),
    ("Kauffman Stadium", 0.94),
    ("American Family Field", 1.05),
    ("Progressive Field", 0.97),
    ("Guaranteed Rate Field", 1.04),
];

/// First-match substring scan over the ballpark table.
pub fn ballpark_factor(venue_name: &str) -> Option<f64> {
    BALLPARK_FACTORS
        .iter()
        .find(|(park, _)| loose_match(park, venue_name))
        .map(|(_, factor)| *factor)
}

// ── Weather condition multipliers ────────────────────────────────────────────

pub const WEATHER_IMPACT: &[(&str, f64)] = &[
    ("Clear", 1.05),
    ("Sunny", 1.05),
    ("Partly Cloudy", 1.02),
    ("Cloudy", 1.0),
    ("Overcast", 0.98),
    ("Drizzle", 0.97),
    ("Rain", 0.95),
    ("Heavy Rain", 0.90),
    ("Snow", 0.85),
    ("Windy", 0.97),
];

/// First-match substring scan over the weather condition table.
pub fn weather_condition_impact(condition: &str) -> Option<f64> {
    WEATHER_IMPACT
        .iter()
        .find(|(label, _)| loose_match(label, condition))
        .map(|(_, impact)| *impact)
}

/// Temperature multiplier: hot weather inflates scoring, cold suppresses it.
pub fn temperature_impact(temperature_f: f64) -> f64 {
    if temperature_f >= 85.0 {
        1.08
    } else if temperature_f >= 75.0 {
        1.05
    } else if temperature_f >= 65.0 {
        1.02
    } else if temperature_f >= 55.0 {
        1.00
    } else if temperature_f >= 45.0 {
        0.97
    } else {
        0.95
    }
}

// ── Sample schedule fixture ──────────────────────────────────────────────────

/// The fixed game list served when no real schedule can be obtained.
pub fn sample_games(note: &str) -> Vec<Game> {
    let rows: &[(i64, &str, &str, &str, &str, &str, &str, f64, f64)] = &[
        (
            718001,
            "New York Yankees",
            "Boston Red Sox",
            "Yankee Stadium",
            "19:05",
            "Gerrit Cole",
            "Nick Pivetta",
            2.63,
            1.69,
        ),
        (
            718002,
            "Los Angeles Dodgers",
            "San Francisco Giants",
            "Dodger Stadium",
            "22:10",
            "Tyler Glasnow",
            "Logan Webb",
            3.32,
            3.25,
        ),
        (
            718003,
            "Chicago Cubs",
            "St. Louis Cardinals",
            "Wrigley Field",
            "14:20",
            "Justin Steele",
            "Sonny Gray",
            3.06,
            3.24,
        ),
        (
            718004,
            "Philadelphia Phillies",
            "Atlanta Braves",
            "Citizens Bank Park",
            "18:40",
            "Zack Wheeler",
            "Max Fried",
            3.07,
            3.09,
        ),
        (
            718005,
            "Houston Astros",
            "Seattle Mariners",
            "Minute Maid Park",
            "20:10",
            "Framber Valdez",
            "Luis Castillo",
            3.40,
            3.32,
        ),
        (
            718006,
            "San Diego Padres",
            "Los Angeles Angels",
            "Petco Park",
            "21:40",
            "Yu Darvish",
            "Reid Detmers",
            3.76,
            4.43,
        ),
    ];

    rows.iter()
        .map(
            |(id, home, away, venue, time, home_p, away_p, home_era, away_era)| Game {
                game_id: *id,
                status: "Preview".to_string(),
                home_team: home.to_string(),
                away_team: away.to_string(),
                venue: venue.to_string(),
                game_time: time.to_string(),
                home_pitcher: home_p.to_string(),
                away_pitcher: away_p.to_string(),
                home_era: *home_era,
                away_era: *away_era,
                home_era_source: Provenance::Fallback,
                away_era_source: Provenance::Fallback,
                note: Some(note.to_string()),
            },
        )
        .collect()
}

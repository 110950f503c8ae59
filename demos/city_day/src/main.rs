//! city_day — one scripted day for four residents of a small town.
//!
//! Runs offline against a [`ScriptedOracle`] by default.  Build with
//! `--features http` and set `CITY_ORACLE_URL` (plus optionally
//! `CITY_ORACLE_MODEL` and `CITY_ORACLE_KEY`) to ask a real
//! chat-completions endpoint instead.
//!
//! Log verbosity follows `RUST_LOG`, e.g. `RUST_LOG=ca_sim=debug`.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use ca_behavior::{CityEnvironment, ResultRecord};
use ca_core::{AgentId, PlaceId};
use ca_memory::{keys, Position};
use ca_oracle::{Oracle, ScriptedOracle};
use ca_sim::{AgentPlan, PlannedStep, SimBuilder, SimConfig, TurnObserver, TurnReport};
use ca_spatial::load_places_reader;

// ── Town ──────────────────────────────────────────────────────────────────────

const PLACES_CSV: &str = "\
place_id,name,category,subcategory,lat,lon,area_id\n\
101,Maple Row 1,residence,house,39.9000,116.4000,1\n\
102,Maple Row 2,residence,house,39.9004,116.4003,1\n\
103,Harbor Flats,residence,apartment,39.9120,116.4150,2\n\
201,Civic Office,business,office,39.9060,116.4080,3\n\
202,Riverside School,education,school,39.9030,116.4120,3\n\
301,Corner Cafe,catering,cafe,39.9015,116.4020,4\n\
302,Noodle House,catering,restaurant,39.9080,116.4040,4\n\
303,Old Mill Bakery,catering,bakery,39.9200,116.4300,5\n\
401,City Library,education,library,39.9050,116.4100,5\n\
402,Green Park,leisure,park,39.8990,116.3950,6\n\
";

const SEED: u64 = 7;

// ── Oracle ────────────────────────────────────────────────────────────────────

fn scripted() -> ScriptedOracle {
    ScriptedOracle::new()
        // Block selection, keyed on the step intention.
        .on("Task information:\nhead to the office", r#"{"block": "move"}"#)
        .on("Task information:\nwalk to school", r#"{"block": "move"}"#)
        .on("Task information:\nfind somewhere for lunch", r#"{"block": "place_selection"}"#)
        .on("Task information:\ngo eat", r#"{"block": "move"}"#)
        .on("Task information:\ncheck in with a friend", r#"{"block": "message"}"#)
        .on("Task information:\nhead home", r#"{"block": "move"}"#)
        .on("Task information:\nwander around", r#"{"block": "move"}"#)
        .on("Task information:\nrelax", r#"{"block": "social_none"}"#)
        // Placement.
        .on("specific kind of", r#"{"place_type": "restaurant"}"#)
        .on("decision system, please determine the type of place", r#"{"place_type": "catering"}"#)
        .on("maximum travel radius", r#"{"radius": 4000}"#)
        // Relocation.
        .on("User requirement: head to the office", r#"{"place_type": "workplace"}"#)
        .on("User requirement: walk to school", r#"{"place_type": "workplace"}"#)
        .on("User requirement: head home", r#"{"place_type": "home"}"#)
        .on("intelligent analysis system", r#"{"place_type": "other"}"#)
        // Social.
        .on("most suitable friend", "['online', 0]")
        .on("generate a message", "Lunch at the Noodle House tomorrow?")
}

#[cfg(feature = "http")]
fn oracle() -> Result<Arc<dyn Oracle>> {
    let Ok(url) = std::env::var("CITY_ORACLE_URL") else {
        return Ok(Arc::new(scripted()));
    };
    let model = std::env::var("CITY_ORACLE_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
    let mut http = ca_oracle::HttpOracle::new(url, model)?;
    if let Ok(key) = std::env::var("CITY_ORACLE_KEY") {
        http = http.with_api_key(key);
    }
    Ok(Arc::new(http))
}

#[cfg(not(feature = "http"))]
fn oracle() -> Result<Arc<dyn Oracle>> {
    Ok(Arc::new(scripted()))
}

// ── Residents ─────────────────────────────────────────────────────────────────

fn residents() -> Vec<(AgentId, serde_json::Value)> {
    vec![
        (AgentId(1), json!({
            "home": 101, "work": 201, "gender": "female", "occupation": "clerk",
            "education": "college", "personality": "outgoing",
            "emotion_types": "Joy", "thought": "Looking forward to lunch",
            "friends": [2, 3], "relationships": { "2": 85, "3": 40 },
            "attitude": { "food": 0.9, "weather": 0.2 }
        })),
        (AgentId(2), json!({
            "home": 102, "work": 202, "gender": "male", "occupation": "teacher",
            "education": "master", "personality": "calm",
            "emotion_types": "Calm", "friends": [1], "relationships": { "1": 85 }
        })),
        (AgentId(3), json!({
            "home": 103, "work": 201, "gender": "female", "occupation": "engineer",
            "emotion_types": "Sadness", "thought": "Rain again",
            "friends": [1, 4], "relationships": { "1": 40, "4": 60 }
        })),
        (AgentId(4), json!({ "home": 103, "emotion_types": "Surprise" })),
    ]
}

const PLANS_JSON: &str = r#"[
  { "text": "A working day with lunch out", "steps": [
      { "domain": "mobility", "intention": "head to the office" },
      { "domain": "mobility", "intention": "find somewhere for lunch" },
      { "domain": "mobility", "intention": "go eat" },
      { "domain": "social",   "intention": "check in with a friend" },
      { "domain": "mobility", "intention": "head home" } ] },
  { "text": "Teaching day", "steps": [
      { "domain": "mobility", "intention": "walk to school" },
      { "domain": "social",   "intention": "relax" },
      { "domain": "mobility", "intention": "head home" } ] },
  { "text": "Remote work", "steps": [
      { "domain": "social",   "intention": "check in with a friend" },
      { "domain": "social",   "intention": "relax" } ] },
  { "text": "Day off", "steps": [
      { "domain": "mobility", "intention": "wander around" },
      { "domain": "mobility", "intention": "head home" } ] }
]"#;

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Printer {
    steps:   usize,
    failed:  usize,
    moves:   usize,
    letters: usize,
}

impl TurnObserver for Printer {
    fn on_turn_start(&mut self, turn: u64) {
        println!("── turn {turn} ──");
    }

    fn on_step(&mut self, agent: AgentId, step: &PlannedStep, record: &ResultRecord) {
        self.steps += 1;
        if !record.success {
            self.failed += 1;
        }
        println!(
            "  agent {:<3} {:<28} {:>3} min  {}",
            agent.0,
            step.step.intention,
            record.consumed_time,
            record.evaluation,
        );
    }

    fn on_relocation(&mut self, agent: AgentId, place: PlaceId) {
        self.moves += 1;
        println!("  agent {:<3} -> place {place}", agent.0);
    }

    fn on_turn_end(&mut self, report: &TurnReport) {
        self.letters += report.delivered;
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("=== city_day — city_agents ===");

    // 1. Town map.
    let map = Arc::new(load_places_reader(Cursor::new(PLACES_CSV))?);
    println!("Town: {} places in {} areas", map.place_count(), map.areas().len());

    // 2. Plans and config.
    let plans: Vec<AgentPlan> = serde_json::from_str(PLANS_JSON)?;
    let mut config = SimConfig::default();
    config.max_turns = 8;
    config.dispatch.seed = SEED;

    let env = CityEnvironment::new()
        .with_reading("weather", "light rain")
        .with_reading("temperature", "14C");

    // 3. Build and run.
    let mut sim = SimBuilder::new(config, map.clone(), oracle()?)
        .agents(residents())
        .plans(plans)
        .environment(env)
        .build()?;

    let mut printer = Printer::default();
    let t0 = Instant::now();
    let turns = sim.run(&mut printer).await?;

    // 4. Summary.
    println!();
    println!("{turns} turns in {:.3} s", t0.elapsed().as_secs_f64());
    println!(
        "  steps: {}  failed: {}  moves: {}  messages delivered: {}",
        printer.steps, printer.failed, printer.moves, printer.letters
    );
    println!();
    println!("{:<7} {:<18} {:<20} {:>8}", "Agent", "Place", "Clock", "Tokens");
    println!("{}", "-".repeat(56));
    for agent in sim.agents() {
        let status = agent.memory().status_snapshot().await;
        let place = status
            .get(keys::POSITION)
            .and_then(Position::from_value)
            .and_then(|p| p.place)
            .and_then(|id| map.place(id))
            .map_or("?", |p| p.name.as_str());
        let tokens = agent.mobility_stats().token_consumption + agent.social_stats().token_consumption;
        println!("{:<7} {:<18} {:<20} {:>8}", agent.id().0, place, agent.clock().to_string(), tokens);
    }

    Ok(())
}

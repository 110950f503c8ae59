//! Integration tests for ca-sim.

use std::sync::Arc;

use ca_behavior::ResultRecord;
use ca_core::{AgentId, AreaId, GeoPoint, PlaceId};
use ca_oracle::ScriptedOracle;
use ca_spatial::{CityMap, CityMapBuilder, Place};
use serde_json::json;

use crate::{PlannedStep, SimBuilder, SimConfig, TurnObserver, TurnReport};

// ── Helpers ───────────────────────────────────────────────────────────────────

const HOME: PlaceId = PlaceId(10);
const WORK: PlaceId = PlaceId(20);
const CAFE: PlaceId = PlaceId(1);

fn place(id: PlaceId, name: &str, category: &str, sub: &str, lat: f64, area: u64) -> Place {
    Place {
        id,
        name:        name.into(),
        category:    category.into(),
        subcategory: sub.into(),
        position:    GeoPoint::new(lat, 0.0),
        area:        Some(AreaId(area)),
    }
}

fn town() -> Arc<CityMap> {
    let mut b = CityMapBuilder::new();
    b.add_places([
        place(HOME, "Home", "residence", "house", 0.0, 1),
        place(WORK, "Office", "business", "office", 0.02, 2),
        place(CAFE, "Corner Cafe", "catering", "cafe", 0.01, 3),
    ])
    .unwrap();
    Arc::new(b.build())
}

fn resident() -> serde_json::Value {
    json!({ "home": HOME.0, "work": WORK.0, "friends": [2], "relationships": { "2": 70 } })
}

fn config() -> SimConfig {
    SimConfig { max_turns: 10, ..SimConfig::default() }
}

#[derive(Default)]
struct Recorder {
    steps:       Vec<(AgentId, String, ResultRecord)>,
    relocations: Vec<(AgentId, PlaceId)>,
    reports:     Vec<TurnReport>,
    ended:       Option<u64>,
}

impl TurnObserver for Recorder {
    fn on_step(&mut self, agent: AgentId, step: &PlannedStep, record: &ResultRecord) {
        self.steps.push((agent, step.step.intention.clone(), record.clone()));
    }
    fn on_relocation(&mut self, agent: AgentId, place: PlaceId) {
        self.relocations.push((agent, place));
    }
    fn on_turn_end(&mut self, report: &TurnReport) {
        self.reports.push(*report);
    }
    fn on_sim_end(&mut self, turns: u64) {
        self.ended = Some(turns);
    }
}

// ── Builder & config ──────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use ca_memory::{keys, Position};

    use super::*;
    use crate::{AgentPlan, Domain, SimError};

    #[test]
    fn plan_count_mismatch_errors() {
        let result = SimBuilder::new(config(), town(), Arc::new(ScriptedOracle::new()))
            .agent(AgentId(1), resident())
            .agent(AgentId(2), resident())
            .plans(vec![AgentPlan::default()])
            .build();
        assert!(matches!(
            result,
            Err(SimError::AgentCountMismatch { expected: 2, got: 1, what: "plans" })
        ));
    }

    #[test]
    fn duplicate_agents_error() {
        let result = SimBuilder::new(config(), town(), Arc::new(ScriptedOracle::new()))
            .agents([(AgentId(1), resident()), (AgentId(1), resident())])
            .build();
        assert!(matches!(result, Err(SimError::DuplicateAgent(AgentId(1)))));
    }

    #[test]
    fn zero_turns_is_rejected() {
        let cfg = SimConfig { max_turns: 0, ..SimConfig::default() };
        let result = SimBuilder::new(cfg, town(), Arc::new(ScriptedOracle::new())).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[tokio::test]
    async fn agents_start_at_home_and_sorted() {
        let sim = SimBuilder::new(config(), town(), Arc::new(ScriptedOracle::new()))
            .agent(AgentId(5), resident())
            .agent(AgentId(2), json!({ "position": { "place_id": WORK.0 } }))
            .build()
            .unwrap();

        let ids: Vec<_> = sim.agents().iter().map(|a| a.id()).collect();
        assert_eq!(ids, [AgentId(2), AgentId(5)]);

        let status = sim.agent(AgentId(5)).unwrap().memory().status_snapshot().await;
        let pos = Position::from_value(status.get(keys::POSITION).unwrap()).unwrap();
        assert_eq!(pos.place, Some(HOME));
        assert_eq!(pos.point, Some(GeoPoint::new(0.0, 0.0)));

        let status = sim.agent(AgentId(2)).unwrap().memory().status_snapshot().await;
        let pos = Position::from_value(status.get(keys::POSITION).unwrap()).unwrap();
        assert_eq!(pos.place, Some(WORK), "explicit positions are kept");
        assert!(sim.is_idle());
    }

    #[test]
    fn config_overrides_only_what_it_names() {
        let cfg = SimConfig::from_json_str(r#"{ "max_turns": 3, "dispatch": { "seed": 9 } }"#).unwrap();
        assert_eq!(cfg.max_turns, 3);
        assert_eq!(cfg.seed(), 9);
        assert_eq!(cfg.dispatch.relocation_minutes, 45);
    }

    #[test]
    fn config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");
        std::fs::write(&path, r#"{ "dispatch": { "min_radius_m": 9000, "max_radius_m": 1000 } }"#).unwrap();
        assert!(matches!(SimConfig::from_json_file(&path), Err(SimError::Core(_))));
        assert!(matches!(SimConfig::from_json_file(&dir.path().join("missing.json")), Err(SimError::Config(_))));
    }

    #[test]
    fn plans_deserialize_with_domains() {
        let plan: AgentPlan = serde_json::from_str(
            r#"{ "text": "Saturday", "steps": [
                { "domain": "mobility", "intention": "go to the market" },
                { "domain": "social", "intention": "call mum", "metadata": { "urgent": true } }
            ] }"#,
        )
        .unwrap();
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].domain, Domain::Mobility);
        assert_eq!(plan.steps[1].step.intention, "call mum");
        assert_eq!(plan.steps[1].step.metadata["urgent"], json!(true));
    }
}

// ── Turns ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use ca_memory::{keys, Position, StatusValue};
    use ca_oracle::{Oracle, OracleRequest, OracleResult, TokenUsage};

    use super::*;
    use crate::{AgentPlan, NoopObserver, SimError};

    fn go_home_oracle() -> ScriptedOracle {
        ScriptedOracle::new()
            .on("most appropriate block", r#"{"block": "move"}"#)
            .on("intelligent analysis system", r#"{"place_type": "home"}"#)
    }

    #[tokio::test]
    async fn go_home_moves_the_agent() {
        let mut at_work = resident();
        at_work["position"] = json!({ "place_id": WORK.0, "lat": 0.02, "lon": 0.0 });
        let mut sim = SimBuilder::new(config(), town(), Arc::new(go_home_oracle()))
            .agent(AgentId(1), at_work)
            .plans(vec![AgentPlan::new("evening").then(PlannedStep::mobility("go home"))])
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        let report = sim.run_turn(&mut rec).await.unwrap();

        assert_eq!(report.ran, 1);
        assert_eq!(report.succeeded, 1);
        assert_eq!(rec.relocations, vec![(AgentId(1), HOME)]);

        let agent = sim.agent(AgentId(1)).unwrap();
        assert_eq!(agent.now().0, 45);
        assert_eq!(agent.records()[0].to_place, Some(HOME));
        assert_eq!(agent.mobility_stats().trigger_count, 1);

        let status = agent.memory().status_snapshot().await;
        let pos = Position::from_value(status.get(keys::POSITION).unwrap()).unwrap();
        assert_eq!(pos.place, Some(HOME));
        assert_eq!(pos.point, Some(GeoPoint::new(0.0, 0.0)));
        assert_eq!(status.get(keys::NUMBER_POI_VISITED), Some(&StatusValue::Int(1)));
        assert!(sim.environment().relocations().is_empty(), "relocations are drained");
    }

    #[tokio::test]
    async fn placement_feeds_a_later_move() {
        let oracle = ScriptedOracle::new()
            .on("Task information:\nfind a cafe", r#"{"block": "place_selection"}"#)
            .on("Task information:\nwalk there", r#"{"block": "move"}"#)
            .on("specific kind of", r#"{"place_type": "cafe"}"#)
            .on("decision system, please determine the type of place", r#"{"place_type": "catering"}"#)
            .on("maximum travel radius", r#"{"radius": 5000}"#)
            .on("intelligent analysis system", r#"{"place_type": "other"}"#);
        let plan = AgentPlan::new("coffee break")
            .then(PlannedStep::mobility("find a cafe"))
            .then(PlannedStep::mobility("walk there"));
        let mut sim = SimBuilder::new(config(), town(), Arc::new(oracle))
            .agent(AgentId(1), resident())
            .plans(vec![plan])
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        let turns = sim.run(&mut rec).await.unwrap();

        assert_eq!(turns, 2);
        assert_eq!(rec.ended, Some(2));
        assert_eq!(rec.relocations, vec![(AgentId(1), CAFE)]);
        assert_eq!(sim.agent(AgentId(1)).unwrap().now().0, 5 + 45);
    }

    #[tokio::test]
    async fn messages_reach_the_recipient_history() {
        let oracle = ScriptedOracle::new()
            .on("most appropriate block", r#"{"block": "message"}"#)
            .on("most suitable friend", "['online', 0]")
            .on("generate a message", "Dinner tonight?");
        let mut sim = SimBuilder::new(config(), town(), Arc::new(oracle))
            .agent(AgentId(1), resident())
            .agent(AgentId(2), json!({ "home": HOME.0 }))
            .plans(vec![
                AgentPlan::new("social evening").then(PlannedStep::social("invite a friend")),
                AgentPlan::default(),
            ])
            .build()
            .unwrap();

        let first = sim.run_turn(&mut NoopObserver).await.unwrap();
        assert_eq!(first.ran, 1);
        assert_eq!(sim.environment().unread(AgentId(2)), 1);

        let second = sim.run_turn(&mut NoopObserver).await.unwrap();
        assert_eq!(second.delivered, 1);
        assert_eq!(second.ran, 0);

        let status = sim.agent(AgentId(2)).unwrap().memory().status_snapshot().await;
        let histories = status.get(keys::CHAT_HISTORIES).unwrap().as_map().unwrap();
        assert_eq!(histories["1"], StatusValue::List(vec!["1: Dinner tonight?".into()]));

        let sender = sim.agent(AgentId(1)).unwrap().memory().status_snapshot().await;
        let sent = sender.get(keys::CHAT_HISTORIES).unwrap().as_map().unwrap();
        assert_eq!(sent["2"], StatusValue::List(vec!["me: Dinner tonight?".into()]));
    }

    #[tokio::test]
    async fn run_stops_when_plans_are_exhausted() {
        let oracle = ScriptedOracle::new().otherwise(r#"{"block": "mobility_none"}"#);
        let mut sim = SimBuilder::new(config(), town(), Arc::new(oracle))
            .agent(AgentId(1), resident())
            .agent(AgentId(2), resident())
            .plans(vec![
                AgentPlan::new("a").then(PlannedStep::mobility("x")).then(PlannedStep::mobility("y")),
                AgentPlan::new("b").then(PlannedStep::mobility("z")),
            ])
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        assert_eq!(sim.run(&mut rec).await.unwrap(), 2);
        assert_eq!(rec.steps.len(), 3);
        assert_eq!(rec.reports.iter().map(|r| r.ran).collect::<Vec<_>>(), [2, 1]);
        assert_eq!(rec.steps[0].0, AgentId(1));
        assert_eq!(rec.steps[1].0, AgentId(2));
        assert!(sim.is_idle());
    }

    #[tokio::test]
    async fn run_respects_the_turn_limit() {
        let oracle = ScriptedOracle::new().otherwise(r#"{"block": "mobility_none"}"#);
        let cfg = SimConfig { max_turns: 2, ..SimConfig::default() };
        let plan = AgentPlan::new("long day")
            .then(PlannedStep::mobility("a"))
            .then(PlannedStep::mobility("b"))
            .then(PlannedStep::mobility("c"));
        let mut sim = SimBuilder::new(cfg, town(), Arc::new(oracle))
            .agent(AgentId(1), resident())
            .plans(vec![plan])
            .build()
            .unwrap();

        assert_eq!(sim.run(&mut NoopObserver).await.unwrap(), 2);
        assert_eq!(sim.agent(AgentId(1)).unwrap().pending(), 1);
        assert_eq!(sim.turn(), 2);
    }

    #[tokio::test]
    async fn narrations_carry_the_agent_clock() {
        let mut sim = SimBuilder::new(config(), town(), Arc::new(go_home_oracle()))
            .agent(AgentId(1), json!({ "home": HOME.0, "position": { "place_id": WORK.0 } }))
            .plans(vec![AgentPlan::new("p")
                .then(PlannedStep::mobility("go home"))
                .then(PlannedStep::mobility("go home again"))])
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).await.unwrap();

        let log = sim.agent(AgentId(1)).unwrap().memory().narratives().await;
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].tick.0, 0);
        assert_eq!(log[1].tick.0, 45);
        assert_eq!(log[1].description, "I am already at home");
    }

    /// Meters nothing until the first read, which panics.
    struct BrokenMeter {
        inner:   ScriptedOracle,
        tripped: AtomicBool,
    }

    #[async_trait]
    impl Oracle for BrokenMeter {
        async fn request(&self, request: OracleRequest) -> OracleResult<String> {
            self.inner.request(request).await
        }

        fn usage(&self) -> TokenUsage {
            if !self.tripped.swap(true, Ordering::SeqCst) {
                panic!("meter jammed");
            }
            TokenUsage::default()
        }
    }

    #[tokio::test]
    async fn panicking_agent_task_keeps_the_others() {
        let oracle = BrokenMeter {
            inner:   ScriptedOracle::new().otherwise(r#"{"block": "mobility_none"}"#),
            tripped: AtomicBool::new(false),
        };
        let mut sim = SimBuilder::new(config(), town(), Arc::new(oracle))
            .agent(AgentId(1), resident())
            .agent(AgentId(2), resident())
            .plans(vec![
                AgentPlan::new("a").then(PlannedStep::mobility("x")).then(PlannedStep::mobility("y")),
                AgentPlan::new("b").then(PlannedStep::mobility("x")).then(PlannedStep::mobility("y")),
            ])
            .build()
            .unwrap();

        let err = sim.run_turn(&mut NoopObserver).await.unwrap_err();
        assert!(matches!(err, SimError::Task(_)));

        assert_eq!(sim.agents().len(), 1);
        let survivor = sim.agents()[0].id();
        assert!(survivor == AgentId(1) || survivor == AgentId(2));
        assert_eq!(sim.agent(survivor).unwrap().pending(), 1);

        let next = sim.run_turn(&mut NoopObserver).await.unwrap();
        assert_eq!(next.ran, 1);
        assert!(sim.is_idle());
    }
}

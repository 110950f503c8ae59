//! Unit tests for ca-mobility.
//!
//! Every test runs against the in-process map, memory, and environment with
//! a scripted oracle.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use ca_behavior::{CityEnvironment, Services};
    use ca_core::{AgentId, AgentRng, AreaId, GeoPoint, PlaceId};
    use ca_memory::InMemoryMemory;
    use ca_oracle::ScriptedOracle;
    use ca_spatial::{CityMap, CityMapBuilder, MapService, Place};
    use serde_json::json;

    pub const AGENT: AgentId = AgentId(1);
    pub const HOME: PlaceId = PlaceId(10);
    pub const WORK: PlaceId = PlaceId(20);

    pub struct Rig {
        pub services: Services,
        pub oracle:   Arc<ScriptedOracle>,
        pub memory:   Arc<InMemoryMemory>,
        pub env:      Arc<CityEnvironment>,
    }

    fn place(id: u64, name: &str, category: &str, sub: &str, lat: f64, lon: f64, area: u64) -> Place {
        Place {
            id:          PlaceId(id),
            name:        name.into(),
            category:    category.into(),
            subcategory: sub.into(),
            position:    GeoPoint::new(lat, lon),
            area:        Some(AreaId(area)),
        }
    }

    /// Home and work plus two cafes and a bookstore near (0, 0).
    ///
    ///   10 Home          residence/house    (0.000, 0.000)
    ///   20 Office        business/office    (0.020, 0.000)
    ///    1 Near Cafe     catering/cafe      (0.010, 0.000)   ~1.1 km
    ///    3 Far Cafe      catering/cafe      (0.050, 0.000)   ~5.6 km
    ///    4 Book Nook     shopping/bookstore (0.000, 0.030)   ~3.3 km
    pub fn city() -> CityMap {
        let mut b = CityMapBuilder::new();
        b.add_places([
            place(10, "Home", "residence", "house", 0.000, 0.000, 100),
            place(20, "Office", "business", "office", 0.020, 0.000, 200),
            place(1, "Near Cafe", "catering", "cafe", 0.010, 0.000, 300),
            place(3, "Far Cafe", "catering", "cafe", 0.050, 0.000, 300),
            place(4, "Book Nook", "shopping", "bookstore", 0.000, 0.030, 400),
        ])
        .unwrap();
        b.build()
    }

    pub fn rig(oracle: ScriptedOracle) -> Rig {
        rig_with(oracle, Arc::new(city()), json!({ "place_id": 99, "lat": 0.0, "lon": 0.0 }))
    }

    pub fn rig_with(oracle: ScriptedOracle, map: Arc<dyn MapService>, position: serde_json::Value) -> Rig {
        let oracle = Arc::new(oracle);
        let memory = Arc::new(
            InMemoryMemory::from_profile(
                AGENT,
                json!({
                    "home": HOME.0,
                    "work": WORK.0,
                    "position": position,
                    "emotion_types": "Joy",
                    "thought": "A sunny day for a walk",
                    "number_poi_visited": 0,
                }),
            )
            .unwrap(),
        );
        let env = Arc::new(
            CityEnvironment::new()
                .with_reading("weather", "sunny")
                .with_reading("temperature", "24C"),
        );
        let services = Services::new(
            AGENT,
            oracle.clone(),
            map,
            memory.clone(),
            env.clone(),
            Arc::new(env.transport_for(AGENT)),
        );
        Rig { services, oracle, memory, env }
    }

    pub fn rng() -> AgentRng {
        AgentRng::new(11, AGENT)
    }
}

// ── Relocation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod relocation {
    use std::sync::Arc;

    use async_trait::async_trait;
    use ca_behavior::{Context, Destination, Relocation, Step};
    use ca_core::{NarrativeId, PlaceId};
    use ca_memory::{keys, InMemoryMemory, MemoryError, MemoryResult, MemoryStore, NarrativeKind, StatusValue};
    use ca_oracle::ScriptedOracle;
    use serde_json::json;

    use super::helpers::{rig, rng, AGENT, HOME, WORK};
    use crate::{DestinationKind, RelocationBehavior};

    const ANALYSIS: &str = "intelligent analysis system";

    #[tokio::test]
    async fn moves_home_and_counts_the_visit() {
        let rig = rig(ScriptedOracle::new().on(ANALYSIS, r#"{"place_type": "home"}"#));
        let unit = RelocationBehavior::new(rig.services.clone());
        let r = unit.forward(&Step::new("go home"), &mut Context::default(), &mut rng()).await;

        assert!(r.success);
        assert_eq!(r.consumed_time, 45);
        assert_eq!(r.to_place, Some(HOME));
        assert!(r.node_id.is_some());
        assert_eq!(rig.env.relocations(), vec![Relocation { agent: AGENT, place: HOME }]);
        assert_eq!(
            rig.memory.status_snapshot().await.get(keys::NUMBER_POI_VISITED),
            Some(&StatusValue::Int(1))
        );
    }

    #[tokio::test]
    async fn already_there_takes_no_time_and_schedules_nothing() {
        let rig = rig(ScriptedOracle::new().on(ANALYSIS, r#"{"place_type": "workplace"}"#));
        rig.services
            .memory
            .update_status(keys::POSITION, StatusValue::from(json!({ "place_id": WORK.0 })))
            .await
            .unwrap();

        let unit = RelocationBehavior::new(rig.services.clone());
        let r = unit.forward(&Step::new("go to work"), &mut Context::default(), &mut rng()).await;

        assert!(r.success);
        assert_eq!(r.consumed_time, 0);
        assert_eq!(r.to_place, Some(WORK));
        assert!(rig.env.relocations().is_empty());
        assert_eq!(
            rig.memory.status_snapshot().await.get(keys::NUMBER_POI_VISITED),
            Some(&StatusValue::Int(0))
        );
    }

    #[tokio::test]
    async fn unusable_answer_defaults_to_home() {
        let rig = rig(ScriptedOracle::new().on(ANALYSIS, r#"{"place_type": "moon"}"#));
        let unit = RelocationBehavior::new(rig.services.clone());
        let kind = unit
            .destination_kind(&Step::new("somewhere"), &Context::default(), &mut rng())
            .await;
        assert_eq!(kind, DestinationKind::Home);
    }

    #[tokio::test]
    async fn other_takes_the_published_place() {
        let rig = rig(ScriptedOracle::new().on(ANALYSIS, r#"{"place_type": "other"}"#));
        let mut ctx = Context::default();
        ctx.publish_place(Destination { name: "Book Nook".into(), id: PlaceId(4) });

        let unit = RelocationBehavior::new(rig.services.clone());
        let r = unit.forward(&Step::new("go to the bookstore"), &mut ctx, &mut rng()).await;

        assert!(r.success);
        assert_eq!(r.to_place, Some(PlaceId(4)));
        assert_eq!(r.evaluation, "Moved to destination: Book Nook");
        assert!(ctx.peek_place().is_none(), "selection is consumed");
    }

    #[tokio::test]
    async fn other_without_a_pick_draws_from_an_area() {
        let rig = rig(ScriptedOracle::new().on(ANALYSIS, r#"{"place_type": "other"}"#));
        let unit = RelocationBehavior::new(rig.services.clone());
        let r = unit.forward(&Step::new("wander"), &mut Context::default(), &mut rng()).await;

        assert!(r.success);
        let to = r.to_place.unwrap();
        assert!([PlaceId(10), PlaceId(20), PlaceId(1), PlaceId(3), PlaceId(4)].contains(&to));
        assert_eq!(rig.env.relocations().len(), 1);
    }

    #[tokio::test]
    async fn missing_work_status_fails_with_narration() {
        let rig = rig(ScriptedOracle::new().on(ANALYSIS, r#"{"place_type": "workplace"}"#));
        rig.services.memory.update_status(keys::WORK, StatusValue::Null).await.unwrap();

        let unit = RelocationBehavior::new(rig.services.clone());
        let r = unit.forward(&Step::new("go to work"), &mut Context::default(), &mut rng()).await;

        assert!(!r.success);
        let entry = rig.memory.narrative(r.node_id.unwrap()).await.unwrap();
        assert_eq!(entry.description, "I failed to move for go to work");
        assert!(rig.env.relocations().is_empty());
    }

    /// Rejects writes to the visit counter; everything else goes through.
    struct StuckCounter(Arc<InMemoryMemory>);

    #[async_trait]
    impl MemoryStore for StuckCounter {
        async fn get_status(&self, key: &str) -> MemoryResult<Option<StatusValue>> {
            self.0.get_status(key).await
        }
        async fn update_status(&self, key: &str, value: StatusValue) -> MemoryResult<()> {
            if key == keys::NUMBER_POI_VISITED {
                return Err(MemoryError::Unavailable("counter is read-only".into()));
            }
            self.0.update_status(key, value).await
        }
        async fn append_narrative(&self, kind: NarrativeKind, d: String) -> MemoryResult<NarrativeId> {
            self.0.append_narrative(kind, d).await
        }
    }

    #[tokio::test]
    async fn counter_write_failure_still_moves() {
        let rig = rig(ScriptedOracle::new().on(ANALYSIS, r#"{"place_type": "home"}"#));
        let mut services = rig.services.clone();
        services.memory = Arc::new(StuckCounter(rig.memory.clone()));

        let unit = RelocationBehavior::new(services);
        let r = unit.forward(&Step::new("go home"), &mut Context::default(), &mut rng()).await;

        assert!(r.success);
        assert_eq!(r.consumed_time, 45);
        assert_eq!(r.to_place, Some(HOME));
        assert_eq!(rig.env.relocations(), vec![Relocation { agent: AGENT, place: HOME }]);
        let entry = rig.memory.narrative(r.node_id.unwrap()).await.unwrap();
        assert_eq!(entry.description, "I moved to home");
        assert_eq!(
            rig.memory.status_snapshot().await.get(keys::NUMBER_POI_VISITED),
            Some(&StatusValue::Int(0))
        );
    }

    #[tokio::test]
    async fn one_oracle_call_per_classification() {
        let rig = rig(ScriptedOracle::unavailable());
        let unit = RelocationBehavior::new(rig.services.clone());
        unit.forward(&Step::new("go home"), &mut Context::default(), &mut rng()).await;
        assert_eq!(rig.oracle.calls_matching(ANALYSIS), 1);
    }
}

// ── Placement ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod placement {
    use std::sync::Arc;

    use ca_behavior::{Context, Step};
    use ca_core::PlaceId;
    use ca_oracle::ScriptedOracle;
    use serde_json::json;

    use super::helpers::{city, rig, rig_with, rng};
    use crate::PlacementBehavior;

    fn lunch_oracle(radius: &str) -> ScriptedOracle {
        ScriptedOracle::new()
            .on("specific kind of catering", r#"{"place_type": "cafe"}"#)
            .on("type of place", r#"{"place_type": "catering"}"#)
            .on("maximum travel radius", radius)
    }

    #[tokio::test]
    async fn picks_within_the_chosen_radius() {
        let rig = rig(lunch_oracle(r#"{"radius": 3000}"#));
        let unit = PlacementBehavior::new(rig.services.clone());
        let mut ctx = Context::new("lunch at noon");
        let r = unit.forward(&Step::new("grab a coffee"), &mut ctx, &mut rng()).await;

        assert!(r.success);
        assert_eq!(r.consumed_time, 5);
        assert_eq!(r.place.as_ref().map(|p| p.id), Some(PlaceId(1)));
        assert_eq!(ctx.peek_place().map(|p| p.id), Some(PlaceId(1)));
        assert!(r.node_id.is_some());
    }

    #[tokio::test]
    async fn radius_prompt_carries_weather_and_mood() {
        let rig = rig(lunch_oracle(r#"{"radius": 3000}"#));
        let unit = PlacementBehavior::new(rig.services.clone());
        unit.forward(&Step::new("grab a coffee"), &mut Context::default(), &mut rng()).await;

        let prompt = rig
            .oracle
            .calls()
            .into_iter()
            .map(|c| c.prompt_text())
            .find(|p| p.contains("maximum travel radius"))
            .unwrap();
        assert!(prompt.contains("Current weather: sunny"));
        assert!(prompt.contains("Your current emotion: Joy"));
        assert!(prompt.contains("between 3000 and 200000"));
    }

    #[tokio::test]
    async fn out_of_range_radius_uses_the_default() {
        let rig = rig(lunch_oracle(r#"{"radius": 50}"#));
        let unit = PlacementBehavior::new(rig.services.clone());
        let r = unit.forward(&Step::new("grab a coffee"), &mut Context::default(), &mut rng()).await;

        assert!(r.success);
        let id = r.place.unwrap().id;
        assert!(id == PlaceId(1) || id == PlaceId(3), "10 km default reaches both cafes");
    }

    #[tokio::test]
    async fn empty_query_falls_back_to_the_whole_map() {
        // Radius too small for any place except Home, which is not a cafe.
        let oracle = ScriptedOracle::new()
            .on("specific kind of catering", r#"{"place_type": "cafe"}"#)
            .on("type of place", r#"{"place_type": "catering"}"#)
            .on("maximum travel radius", r#"{"radius": 3000}"#);
        let rig = rig_with(oracle, Arc::new(city()), json!({ "place_id": 99, "lat": 1.0, "lon": 1.0 }));
        let unit = PlacementBehavior::new(rig.services.clone());
        let r = unit.forward(&Step::new("grab a coffee"), &mut Context::default(), &mut rng()).await;

        assert!(r.success);
        let all = [PlaceId(10), PlaceId(20), PlaceId(1), PlaceId(3), PlaceId(4)];
        assert!(all.contains(&r.place.unwrap().id));
    }

    #[tokio::test]
    async fn survives_a_dead_oracle() {
        let rig = rig(ScriptedOracle::unavailable());
        let unit = PlacementBehavior::new(rig.services.clone());
        let mut ctx = Context::default();
        let r = unit.forward(&Step::new("do something"), &mut ctx, &mut rng()).await;

        assert!(r.success);
        assert!(ctx.peek_place().is_some());
        // coarse + sub + radius, one attempt each
        assert_eq!(rig.oracle.call_count(), 3);
    }

    #[tokio::test]
    async fn empty_map_is_a_failure_with_narration() {
        let rig = rig_with(
            ScriptedOracle::unavailable(),
            Arc::new(ca_spatial::CityMapBuilder::new().build()),
            json!({ "lat": 0.0, "lon": 0.0 }),
        );
        let unit = PlacementBehavior::new(rig.services.clone());
        let r = unit.forward(&Step::new("go out"), &mut Context::default(), &mut rng()).await;

        assert!(!r.success);
        assert!(r.node_id.is_some());
    }
}

// ── Coordinator ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod coordinator {
    use std::sync::Arc;

    use broken::PanickingMap;
    use ca_behavior::{ActionKind, Context, Relocation, Step};
    use ca_oracle::ScriptedOracle;
    use serde_json::json;

    use super::helpers::{rig, rig_with, rng, AGENT, HOME};
    use crate::{MobilityAction, MobilityCoordinator};

    #[tokio::test]
    async fn go_home_end_to_end() {
        let oracle = ScriptedOracle::new()
            .on("most appropriate block", r#"{"block": "move"}"#)
            .otherwise(r#"{"place_type": "home"}"#);
        let rig = rig(oracle);
        let mut mobility = MobilityCoordinator::new(rig.services.clone(), rng());

        let r = mobility.forward(&Step::new("go home"), &mut Context::new("evening")).await;

        assert!(r.success);
        assert_eq!(r.consumed_time, 45);
        assert_eq!(r.to_place, Some(HOME));
        assert_eq!(rig.env.relocations(), vec![Relocation { agent: AGENT, place: HOME }]);
        assert_eq!(mobility.stats().trigger_count, 1);
        assert!(mobility.stats().token_consumption > 0);
    }

    #[tokio::test]
    async fn placement_then_move_share_the_context() {
        let oracle = ScriptedOracle::new()
            .on("most appropriate block", r#"{"block": "place_selection"}"#)
            .on("specific kind of", r#"{"place_type": "bookstore"}"#)
            .on("decision system, please determine the type of place", r#"{"place_type": "shopping"}"#)
            .on("maximum travel radius", r#"{"radius": 5000}"#)
            .on("intelligent analysis system", r#"{"place_type": "other"}"#);
        let rig = rig(oracle);
        let mut mobility = MobilityCoordinator::new(rig.services.clone(), rng());
        let mut ctx = Context::new("afternoon");

        let picked = mobility.forward(&Step::new("buy a novel"), &mut ctx).await;
        let book_nook = picked.place.unwrap().id;
        let moved = mobility
            .forward_as(MobilityAction::Relocation, &Step::new("walk there"), &mut ctx)
            .await;

        assert_eq!(moved.to_place, Some(book_nook));
        assert_eq!(moved.consumed_time, 45);
        assert_eq!(mobility.stats().trigger_count, 2);
    }

    #[tokio::test]
    async fn panics_become_failure_records() {
        let rig = rig_with(
            ScriptedOracle::unavailable(),
            Arc::new(PanickingMap),
            json!({ "lat": 0.0, "lon": 0.0 }),
        );
        let mut mobility = MobilityCoordinator::new(rig.services.clone(), rng());
        let r = mobility
            .forward_as(MobilityAction::Placement, &Step::new("explore"), &mut Context::default())
            .await;

        assert!(!r.success);
        assert_eq!(r.evaluation, "Failed to complete mobility action");
        assert!(r.node_id.is_some());
        assert_eq!(mobility.stats().trigger_count, 1);
    }

    #[test]
    fn action_names_are_distinct() {
        let mut names: Vec<_> = MobilityAction::ALL.iter().map(|a| a.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), MobilityAction::ALL.len());
    }

    mod broken {
        use ca_core::{GeoPoint, PlaceId};
        use ca_spatial::{Area, MapService, Place, PlaceCategories, SpatialResult};

        /// A map whose every call panics.
        pub struct PanickingMap;

        #[async_trait::async_trait]
        impl MapService for PanickingMap {
            async fn query_places_by_category(
                &self,
                _center: GeoPoint,
                _prefix: &str,
                _radius_m: f64,
                _limit: usize,
            ) -> SpatialResult<Vec<(Place, f64)>> {
                panic!("map exploded")
            }
            async fn list_all_places(&self) -> SpatialResult<Vec<Place>> {
                panic!("map exploded")
            }
            async fn list_areas(&self) -> SpatialResult<Vec<Area>> {
                panic!("map exploded")
            }
            async fn get_place(&self, _id: PlaceId) -> SpatialResult<Option<Place>> {
                panic!("map exploded")
            }
            async fn categories(&self) -> SpatialResult<PlaceCategories> {
                panic!("map exploded")
            }
        }
    }
}

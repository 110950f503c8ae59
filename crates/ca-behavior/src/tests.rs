//! Unit tests for ca-behavior.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use ca_core::AgentId;
    use ca_memory::InMemoryMemory;
    use ca_oracle::ScriptedOracle;
    use ca_spatial::CityMapBuilder;

    use crate::{CityEnvironment, Services};

    pub struct Rig {
        pub services: Services,
        pub memory:   Arc<InMemoryMemory>,
        pub env:      Arc<CityEnvironment>,
    }

    pub fn rig(oracle: ScriptedOracle) -> Rig {
        let agent = AgentId(1);
        let memory = Arc::new(InMemoryMemory::new(agent));
        let env = Arc::new(CityEnvironment::new());
        let services = Services::new(
            agent,
            Arc::new(oracle),
            Arc::new(CityMapBuilder::new().build()),
            memory.clone(),
            env.clone(),
            Arc::new(env.transport_for(agent)),
        );
        Rig { services, memory, env }
    }
}

// ── Context & records ─────────────────────────────────────────────────────────

#[cfg(test)]
mod context {
    use ca_core::{AgentId, PlaceId};

    use crate::{Context, Destination};

    #[test]
    fn selections_are_taken_once() {
        let mut ctx = Context::new("morning plan");
        ctx.publish_place(Destination { name: "Cafe".into(), id: PlaceId(3) });
        ctx.publish_target(AgentId(9));

        assert_eq!(ctx.peek_place().map(|d| d.id), Some(PlaceId(3)));
        assert_eq!(ctx.take_place().map(|d| d.id), Some(PlaceId(3)));
        assert!(ctx.take_place().is_none());

        assert_eq!(ctx.take_target(), Some(AgentId(9)));
        assert_eq!(ctx.take_target(), None);
        assert_eq!(ctx.plan(), "morning plan");
    }
}

#[cfg(test)]
mod record {
    use ca_core::{AgentId, PlaceId};

    use crate::{ContactMode, ResultRecord};

    #[test]
    fn optional_fields_are_omitted() {
        let r = ResultRecord::success("Moved to home", 45).with_to_place(PlaceId(10));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["consumed_time"], 45);
        assert_eq!(json["to_place"], 10);
        assert!(json.get("target").is_none());
        assert!(json.get("node_id").is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let r = ResultRecord::failure("x", 5)
            .with_target(AgentId(2))
            .with_mode(ContactMode::Remote)
            .with_message("hi");
        assert!(!r.success);
        assert_eq!(r.target, Some(AgentId(2)));
        assert_eq!(r.mode, Some(ContactMode::Remote));
        assert_eq!(r.message.as_deref(), Some("hi"));
    }

    #[test]
    fn contact_mode_vocabulary() {
        assert_eq!(ContactMode::from_label("offline"), Some(ContactMode::Immediate));
        assert_eq!(ContactMode::from_label(" Online "), Some(ContactMode::Remote));
        assert_eq!(ContactMode::from_label("telepathy"), None);
        assert_eq!(ContactMode::Remote.to_string(), "online");
    }
}

// ── Environment ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod env {
    use std::sync::Arc;

    use ca_core::{AgentId, PlaceId};

    use crate::{CityEnvironment, Environment, PortError, Relocation, Transport};

    #[tokio::test]
    async fn relocations_queue_until_drained() {
        let env = CityEnvironment::new();
        env.schedule_relocation(AgentId(1), PlaceId(5)).await.unwrap();
        env.schedule_relocation(AgentId(2), PlaceId(6)).await.unwrap();
        assert_eq!(env.relocations().len(), 2);

        let drained = env.drain_relocations();
        assert_eq!(drained[0], Relocation { agent: AgentId(1), place: PlaceId(5) });
        assert!(env.relocations().is_empty());
    }

    #[tokio::test]
    async fn sensing_reads_configured_values() {
        let env = CityEnvironment::new().with_reading("weather", "sunny");
        assert_eq!(env.sense("weather").await.unwrap().as_deref(), Some("sunny"));
        assert_eq!(env.sense("temperature").await.unwrap(), None);
    }

    #[tokio::test]
    async fn mail_is_delivered_per_recipient() {
        let env = Arc::new(CityEnvironment::new());
        let alice = env.transport_for(AgentId(1));
        alice.send_to_agent(AgentId(2), "hello".into()).await.unwrap();
        alice.send_to_agent(AgentId(2), "again".into()).await.unwrap();

        assert_eq!(env.unread(AgentId(2)), 2);
        let mail = env.take_mail(AgentId(2));
        assert_eq!(mail[0].from, AgentId(1));
        assert_eq!(mail[1].payload, "again");
        assert_eq!(env.unread(AgentId(2)), 0);
    }

    #[tokio::test]
    async fn unknown_recipient_is_rejected() {
        let env = Arc::new(CityEnvironment::new().with_residents([AgentId(1), AgentId(2)]));
        let err = env
            .transport_for(AgentId(1))
            .send_to_agent(AgentId(7), "x".into())
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::UnknownAgent(AgentId(7))));
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatcher {
    use ca_core::{AgentId, AgentRng};
    use ca_oracle::ScriptedOracle;

    use crate::{ActionDispatcher, ActionKind, Step};

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    enum Toy {
        Walk,
        Talk,
        Idle,
    }

    impl ActionKind for Toy {
        const ALL: &'static [Self] = &[Toy::Walk, Toy::Talk, Toy::Idle];

        fn name(self) -> &'static str {
            match self {
                Toy::Walk => "walk",
                Toy::Talk => "talk",
                Toy::Idle => "idle",
            }
        }

        fn description(self) -> &'static str {
            match self {
                Toy::Walk => "Go somewhere",
                Toy::Talk => "Speak to someone",
                Toy::Idle => "Anything else",
            }
        }
    }

    #[tokio::test]
    async fn follows_the_oracle() {
        let rig = super::helpers::rig(ScriptedOracle::new().on("chat with Bob", r#"{"block": "talk"}"#));
        let d = ActionDispatcher::<Toy>::new(rig.services.resolver.clone());
        let mut rng = AgentRng::new(0, AgentId(1));
        assert_eq!(d.dispatch(&Step::new("chat with Bob"), &mut rng).await, Some(Toy::Talk));
    }

    #[tokio::test]
    async fn prompt_lists_every_description() {
        let oracle = std::sync::Arc::new(ScriptedOracle::unavailable());
        let resolver = ca_oracle::IntentResolver::new(oracle.clone());
        let d = ActionDispatcher::<Toy>::new(resolver);
        let mut rng = AgentRng::new(0, AgentId(1));
        d.dispatch(&Step::new("anything"), &mut rng).await;

        let prompt = oracle.calls()[0].prompt_text();
        assert!(prompt.contains("- walk: Go somewhere"));
        assert!(prompt.contains("- idle: Anything else"));
        assert!(prompt.contains(r#"["walk","talk","idle"]"#));
    }

    #[tokio::test]
    async fn falls_back_to_a_registered_kind() {
        let rig = super::helpers::rig(ScriptedOracle::new().otherwise(r#"{"block": "fly"}"#));
        let d = ActionDispatcher::<Toy>::new(rig.services.resolver.clone());
        let mut rng = AgentRng::new(3, AgentId(1));
        for _ in 0..20 {
            let kind = d.dispatch(&Step::new("?"), &mut rng).await.unwrap();
            assert!(Toy::ALL.contains(&kind));
        }
    }

    #[test]
    fn from_name_round_trips() {
        assert_eq!(Toy::from_name("idle"), Some(Toy::Idle));
        assert_eq!(Toy::from_name("IDLE"), None);
    }
}

// ── NoOp, narration, guard ────────────────────────────────────────────────────

#[cfg(test)]
mod noop {
    use ca_memory::NarrativeKind;
    use ca_oracle::ScriptedOracle;

    use crate::{NoOpBehavior, Step};

    #[tokio::test]
    async fn mobility_flavor_narrates_and_takes_no_time() {
        let rig = super::helpers::rig(ScriptedOracle::unavailable());
        let r = NoOpBehavior::mobility(rig.services.clone())
            .forward(&Step::new("arrive at the office"))
            .await;
        assert!(r.success);
        assert_eq!(r.consumed_time, 0);
        let entry = rig.memory.narrative(r.node_id.unwrap()).await.unwrap();
        assert_eq!(entry.kind, NarrativeKind::Mobility);
        assert_eq!(entry.description, "I finished arrive at the office");
    }

    #[tokio::test]
    async fn social_flavor() {
        let rig = super::helpers::rig(ScriptedOracle::unavailable());
        let r = NoOpBehavior::social(rig.services.clone())
            .forward(&Step::new("think about friends"))
            .await;
        assert!(r.success);
        assert_eq!(r.consumed_time, 0);
        let entry = rig.memory.narrative(r.node_id.unwrap()).await.unwrap();
        assert_eq!(entry.kind, NarrativeKind::Social);
        assert!(rig.env.relocations().is_empty());
    }
}

#[cfg(test)]
mod narration {
    use async_trait::async_trait;
    use ca_core::NarrativeId;
    use ca_memory::{MemoryError, MemoryResult, MemoryStore, NarrativeKind, StatusValue};

    use crate::fail_with_narration;

    struct BrokenMemory;

    #[async_trait]
    impl MemoryStore for BrokenMemory {
        async fn get_status(&self, _key: &str) -> MemoryResult<Option<StatusValue>> {
            Err(MemoryError::Unavailable("down".into()))
        }
        async fn update_status(&self, _key: &str, _value: StatusValue) -> MemoryResult<()> {
            Err(MemoryError::Unavailable("down".into()))
        }
        async fn append_narrative(&self, _kind: NarrativeKind, _d: String) -> MemoryResult<NarrativeId> {
            Err(MemoryError::Unavailable("down".into()))
        }
    }

    #[tokio::test]
    async fn failure_record_survives_broken_memory() {
        let r = fail_with_narration(&BrokenMemory, NarrativeKind::Social, "I failed".into(), "nope", 5).await;
        assert!(!r.success);
        assert_eq!(r.consumed_time, 5);
        assert!(r.node_id.is_none());
    }
}

#[cfg(test)]
mod guard {
    use crate::guarded;

    #[tokio::test]
    async fn passes_values_through() {
        assert_eq!(guarded("t", async { 7 }).await, Ok(7));
    }

    async fn explode() -> u32 {
        panic!("boom")
    }

    #[tokio::test]
    async fn converts_panics() {
        assert_eq!(guarded("t", explode()).await, Err("boom".to_owned()));
    }
}

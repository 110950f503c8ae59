//! `RelocationBehavior` — move the agent home, to work, or to a chosen place.

use std::fmt;

use ca_behavior::{
    fail_with_narration, narrate, BehaviorError, BehaviorResult, Context, Destination, ResultRecord,
    Services, Step,
};
use ca_core::{AgentRng, PlaceId};
use ca_memory::{keys, place_of, NarrativeKind, Position, StatusValue};
use ca_oracle::{Fallback, PromptVars};
use ca_spatial::SpatialError;
use tracing::{info, warn};

use crate::prompts::{PLACE_ANALYSIS, PLACE_TYPE_FIELD};

/// Where a move is headed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DestinationKind {
    Home,
    Workplace,
    Other,
}

impl DestinationKind {
    pub const ALL: [DestinationKind; 3] = [DestinationKind::Home, DestinationKind::Workplace, DestinationKind::Other];

    pub fn label(self) -> &'static str {
        match self {
            DestinationKind::Home => "home",
            DestinationKind::Workplace => "workplace",
            DestinationKind::Other => "other",
        }
    }

    pub fn from_label(label: &str) -> Option<DestinationKind> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone)]
pub struct RelocationBehavior {
    services: Services,
}

impl RelocationBehavior {
    pub const DESCRIPTION: &'static str = "Executes mobility operations between locations";

    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub async fn forward(&self, step: &Step, ctx: &mut Context, rng: &mut AgentRng) -> ResultRecord {
        match self.relocate(step, ctx, rng).await {
            Ok(record) => record,
            Err(e) => {
                warn!(agent = %self.services.agent, error = %e, "relocation failed");
                fail_with_narration(
                    self.services.memory.as_ref(),
                    NarrativeKind::Mobility,
                    format!("I failed to move for {}", step.intention),
                    format!("Move failed: {e}"),
                    0,
                )
                .await
            }
        }
    }

    /// Classify the destination kind.  Defaults to home.
    pub async fn destination_kind(&self, step: &Step, ctx: &Context, rng: &mut AgentRng) -> DestinationKind {
        let labels: Vec<String> = DestinationKind::ALL.iter().map(|k| k.label().to_owned()).collect();
        let vars = PromptVars::new()
            .with("plan", ctx.plan())
            .with("intention", step.intention.as_str());
        let fallback = Fallback::Default(DestinationKind::Home.label().to_owned());
        self.services
            .resolver
            .decide(&PLACE_ANALYSIS, &vars, PLACE_TYPE_FIELD, &labels, &fallback, rng)
            .await
            .and_then(|d| DestinationKind::from_label(&d.label))
            .unwrap_or(DestinationKind::Home)
    }

    async fn relocate(&self, step: &Step, ctx: &mut Context, rng: &mut AgentRng) -> BehaviorResult<ResultRecord> {
        let agent = self.services.agent;
        let kind = self.destination_kind(step, ctx, rng).await;

        let (description, place) = match kind {
            DestinationKind::Home => (kind.label().to_owned(), self.place_from_status(keys::HOME).await?),
            DestinationKind::Workplace => (kind.label().to_owned(), self.place_from_status(keys::WORK).await?),
            DestinationKind::Other => {
                let dest = match ctx.take_place() {
                    Some(dest) => dest,
                    None => self.random_place(rng).await?,
                };
                (format!("destination: {}", dest.name), dest.id)
            }
        };

        let memory = self.services.memory.as_ref();
        if self.current_place().await == Some(place) {
            let node = narrate(memory, NarrativeKind::Mobility, format!("I am already at {description}")).await;
            return Ok(ResultRecord::success(format!("Already at {description}"), 0)
                .with_to_place(place)
                .with_node(node));
        }

        self.services.env.schedule_relocation(agent, place).await?;
        if let Err(e) = self.increment_visits().await {
            warn!(agent = %agent, error = %e, "visit counter not updated");
        }
        info!(agent = %agent, place = %place, kind = %kind, "moving");

        let node = narrate(memory, NarrativeKind::Mobility, format!("I moved to {description}")).await;
        Ok(ResultRecord::success(
            format!("Moved to {description}"),
            self.services.config.relocation_minutes as u64,
        )
        .with_to_place(place)
        .with_node(node))
    }

    async fn place_from_status(&self, key: &'static str) -> BehaviorResult<PlaceId> {
        self.services
            .status(key)
            .await?
            .as_ref()
            .and_then(place_of)
            .ok_or(BehaviorError::MissingStatus(key))
    }

    async fn current_place(&self) -> Option<PlaceId> {
        match self.services.status(keys::POSITION).await {
            Ok(Some(value)) => Position::from_value(&value).and_then(|p| p.place),
            _ => None,
        }
    }

    /// A uniformly random place inside a uniformly random non-empty area.
    async fn random_place(&self, rng: &mut AgentRng) -> BehaviorResult<Destination> {
        let areas = self.services.map.list_areas().await?;
        let populated: Vec<_> = areas.iter().filter(|a| !a.place_ids.is_empty()).collect();
        let area = rng
            .choose(&populated)
            .ok_or_else(|| BehaviorError::NoCandidates("no area contains a place".into()))?;
        let id = *rng
            .choose(&area.place_ids)
            .ok_or_else(|| BehaviorError::NoCandidates(format!("area {} is empty", area.id)))?;
        let place = self
            .services
            .map
            .get_place(id)
            .await?
            .ok_or(SpatialError::PlaceNotFound(id))?;
        Ok(Destination { name: place.name, id: place.id })
    }

    async fn increment_visits(&self) -> BehaviorResult<()> {
        let visited = self
            .services
            .status(keys::NUMBER_POI_VISITED)
            .await?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        self.services
            .memory
            .update_status(keys::NUMBER_POI_VISITED, StatusValue::Int(visited + 1))
            .await?;
        Ok(())
    }
}

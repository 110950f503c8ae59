//! `PlacementBehavior` — choose a concrete destination for an open-ended
//! intention ("grab lunch", "buy a book").
//!
//! # Stages
//!
//! 1. Coarse category, chosen by the oracle from the map's category table;
//!    uniform-random on failure.
//! 2. Sub-category within the coarse one; uniform-random on failure.
//! 3. Travel radius conditioned on emotion, thought, and weather; the
//!    configured default on failure or an out-of-range answer.
//! 4. Map query around the agent's position, then a gravity-model draw.
//!    No hits (or no known position) falls back to a uniform pick over the
//!    whole inventory.
//!
//! The pick is published into the [`Context`] for a following relocation.

use ca_behavior::{
    fail_with_narration, narrate, BehaviorError, BehaviorResult, Context, Destination, ResultRecord,
    Services, Step,
};
use ca_core::{AgentRng, GeoPoint};
use ca_memory::{keys, NarrativeKind, Position};
use ca_oracle::{Fallback, PromptVars};
use ca_spatial::{GravityModel, Place};
use tracing::{debug, warn};

use crate::prompts::{PLACE_SUBTYPE, PLACE_TYPE, PLACE_TYPE_FIELD, RADIUS, RADIUS_FIELD};

#[derive(Clone)]
pub struct PlacementBehavior {
    services: Services,
    gravity:  GravityModel,
}

impl PlacementBehavior {
    pub const DESCRIPTION: &'static str = "Selects destinations for unknown locations (excluding home/work)";

    pub fn new(services: Services) -> Self {
        let gravity = GravityModel::new(services.config.sample_size);
        Self { services, gravity }
    }

    pub async fn forward(&self, step: &Step, ctx: &mut Context, rng: &mut AgentRng) -> ResultRecord {
        match self.select(step, ctx, rng).await {
            Ok(record) => record,
            Err(e) => {
                warn!(agent = %self.services.agent, error = %e, "placement failed");
                fail_with_narration(
                    self.services.memory.as_ref(),
                    NarrativeKind::Mobility,
                    format!("I failed to choose a destination for {}", step.intention),
                    format!("Destination selection failed: {e}"),
                    0,
                )
                .await
            }
        }
    }

    async fn select(&self, step: &Step, ctx: &mut Context, rng: &mut AgentRng) -> BehaviorResult<ResultRecord> {
        let subcategory = self.choose_subcategory(step, ctx, rng).await;
        let radius_m = self.travel_radius().await;
        let center = self.current_point().await;

        let nearby = match (&subcategory, center) {
            (Some(sub), Some(center)) => self.query(center, sub, radius_m).await,
            _ => Vec::new(),
        };

        let destination = match self.gravity.choose(&nearby, rng) {
            Some(c) => Destination { name: c.name, id: c.id },
            None => {
                debug!(agent = %self.services.agent, "no nearby match, picking from the whole map");
                self.any_place(rng).await?
            }
        };

        ctx.publish_place(destination.clone());
        let node = narrate(
            self.services.memory.as_ref(),
            NarrativeKind::Mobility,
            format!("For {}, selected: {} ({})", step.intention, destination.name, destination.id),
        )
        .await;

        Ok(ResultRecord::success(
            format!("Selected destination: {}", destination.name),
            self.services.config.placement_minutes as u64,
        )
        .with_place(destination)
        .with_node(node))
    }

    /// Stages 1 and 2.  `None` when the category table is empty.
    async fn choose_subcategory(&self, step: &Step, ctx: &Context, rng: &mut AgentRng) -> Option<String> {
        let categories = match self.services.map.categories().await {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "category table unavailable");
                return None;
            }
        };
        let resolver = &self.services.resolver;
        let vars = PromptVars::new()
            .with("plan", ctx.plan())
            .with("intention", step.intention.as_str());

        let coarse = resolver
            .decide(&PLACE_TYPE, &vars, PLACE_TYPE_FIELD, &categories.coarse(), &Fallback::Uniform, rng)
            .await?
            .label;
        let subs = categories.subcategories(&coarse)?;

        let vars = vars.with("category", coarse.as_str());
        let sub = resolver
            .decide(&PLACE_SUBTYPE, &vars, PLACE_TYPE_FIELD, subs, &Fallback::Uniform, rng)
            .await?
            .label;
        debug!(coarse = %coarse, sub = %sub, "category chosen");
        Some(sub)
    }

    /// Stage 3, in metres.
    async fn travel_radius(&self) -> f64 {
        let config = &self.services.config;
        let vars = PromptVars::new()
            .with("weather", self.services.sense_text("weather").await)
            .with("temperature", self.services.sense_text("temperature").await)
            .with("emotion_types", self.services.status_text(keys::EMOTION_TYPES).await)
            .with("thought", self.services.status_text(keys::THOUGHT).await)
            .with("min", config.min_radius_m.to_string())
            .with("max", config.max_radius_m.to_string());

        match self
            .services
            .resolver
            .request_integer(
                &RADIUS,
                &vars,
                RADIUS_FIELD,
                config.min_radius_m as i64,
                config.max_radius_m as i64,
            )
            .await
        {
            Ok(radius) => radius as f64,
            Err(e) => {
                warn!(error = %e, default = config.default_radius_m, "radius request failed, using default");
                config.default_radius_m as f64
            }
        }
    }

    async fn current_point(&self) -> Option<GeoPoint> {
        match self.services.status(keys::POSITION).await {
            Ok(Some(value)) => Position::from_value(&value).and_then(|p| p.point),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "position unavailable");
                None
            }
        }
    }

    async fn query(&self, center: GeoPoint, subcategory: &str, radius_m: f64) -> Vec<(Place, f64)> {
        self.services
            .map
            .query_places_by_category(center, subcategory, radius_m, self.services.config.search_limit)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "place query failed");
                Vec::new()
            })
    }

    async fn any_place(&self, rng: &mut AgentRng) -> BehaviorResult<Destination> {
        let all = self.services.map.list_all_places().await?;
        let place = rng
            .choose(&all)
            .ok_or_else(|| BehaviorError::NoCandidates("the map has no places".into()))?;
        Ok(Destination { name: place.name.clone(), id: place.id })
    }
}

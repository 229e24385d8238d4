//! Configured routing facade.
//!
//! [`Router`] bundles a cost policy, a heuristic and search limits built from a
//! [`RouteConfig`], so callers do not have to wire the pieces together for
//! every request.
//!
//! # Example
//!
//! ```no_run
//! use wheelway_lib::{RouteConfig, Router};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let graph = wheelway_lib::Graph::default();
//! let config = RouteConfig::from_json_str(r#"{ "heuristic": "haversine" }"#)?;
//! let router = Router::new(config)?;
//! let outcome = router.route(&graph, 1, 2)?;
//! println!("found: {}", outcome.is_found());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::fs;
use std::path::Path as FsPath;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cost::{
    validate_default_length, EdgeCostPolicy, UnknownAccess, WheelchairCost, DEFAULT_EDGE_LENGTH,
};
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, Position};
use crate::heuristic::{HeuristicKind, NodeHeuristic};
use crate::path::{find_path_with, CancellationToken, SearchLimits, SearchOutcome};
use crate::spatial::LocationResolver;

/// Tunable routing settings, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteConfig {
    pub heuristic: HeuristicKind,
    pub unknown_access: UnknownAccess,
    /// Length used for segments without one.
    pub default_edge_length: f64,
    /// Abort a search after expanding this many nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_expansions: Option<usize>,
    /// Abort a search after this many milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            heuristic: HeuristicKind::default(),
            unknown_access: UnknownAccess::default(),
            default_edge_length: DEFAULT_EDGE_LENGTH,
            max_expansions: None,
            timeout_ms: None,
        }
    }
}

impl RouteConfig {
    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: &FsPath) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading route configuration");
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        validate_default_length(self.default_edge_length)?;
        self.unknown_access.validate()
    }

    fn limits(&self) -> SearchLimits {
        let mut limits = SearchLimits::none();
        if let Some(ms) = self.timeout_ms {
            limits = limits.with_timeout(Duration::from_millis(ms));
        }
        if let Some(limit) = self.max_expansions {
            limits = limits.with_max_expansions(limit);
        }
        limits
    }
}

/// Reusable, thread-safe route planner.
pub struct Router {
    config: RouteConfig,
    cost_policy: Box<dyn EdgeCostPolicy>,
    heuristic: Box<dyn NodeHeuristic>,
}

impl Router {
    /// Build a router using the wheelchair cost policy described by `config`.
    pub fn new(config: RouteConfig) -> Result<Self> {
        let cost_policy = WheelchairCost::new()
            .with_unknown_access(config.unknown_access)?
            .with_default_length(config.default_edge_length)?;
        let heuristic = config.heuristic.build();
        Ok(Self {
            config,
            cost_policy: Box::new(cost_policy),
            heuristic,
        })
    }

    /// Build a router around a custom cost policy and heuristic. Only the
    /// limit settings of `config` apply.
    pub fn with_policies(
        config: RouteConfig,
        cost_policy: impl EdgeCostPolicy + 'static,
        heuristic: impl NodeHeuristic + 'static,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cost_policy: Box::new(cost_policy),
            heuristic: Box::new(heuristic),
        })
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// Find the cheapest route between two graph nodes.
    pub fn route(
        &self,
        graph: &Graph,
        origin: NodeId,
        destination: NodeId,
    ) -> Result<SearchOutcome> {
        self.run(graph, origin, destination, self.config.limits())
    }

    /// Same as [`Router::route`], aborting once `token` is cancelled.
    pub fn route_with_cancel(
        &self,
        graph: &Graph,
        origin: NodeId,
        destination: NodeId,
        token: CancellationToken,
    ) -> Result<SearchOutcome> {
        let limits = self.config.limits().with_cancellation(token);
        self.run(graph, origin, destination, limits)
    }

    /// Resolve two coordinates to their nearest nodes, then route between them.
    pub fn route_between<R>(
        &self,
        graph: &Graph,
        resolver: &R,
        from: Position,
        to: Position,
    ) -> Result<SearchOutcome>
    where
        R: LocationResolver + ?Sized,
    {
        let origin = resolve(resolver, from)?;
        let destination = resolve(resolver, to)?;
        debug!(origin, destination, "resolved route endpoints");
        self.route(graph, origin, destination)
    }

    fn run(
        &self,
        graph: &Graph,
        origin: NodeId,
        destination: NodeId,
        limits: SearchLimits,
    ) -> Result<SearchOutcome> {
        find_path_with(
            graph,
            origin,
            destination,
            self.cost_policy.as_ref(),
            self.heuristic.as_ref(),
            &limits,
        )
    }
}

impl Default for Router {
    fn default() -> Self {
        Self {
            config: RouteConfig::default(),
            cost_policy: Box::new(WheelchairCost::default()),
            heuristic: HeuristicKind::default().build(),
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn resolve<R>(resolver: &R, position: Position) -> Result<NodeId>
where
    R: LocationResolver + ?Sized,
{
    resolver
        .resolve(position)
        .ok_or(Error::LocationNotResolved {
            x: position.x,
            y: position.y,
        })
}

//! Tool System module.
//!
//! This module defines the `Tool` trait and `ToolRouter` that together
//! form the tool execution framework.
//!
//! Key concepts:
//! - **Tool trait**: every tool implements this trait, providing its name,
//!   description, JSON Schema for parameters, and an execute method
//! - **ToolRouter**: a registry that holds all available tools and dispatches
//!   tool calls by name to the correct implementation
//! - Every tool answers with a [`ResponseEnvelope`]; only an unknown tool
//!   name is an error at the router level

pub mod alias;
pub mod operation;

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::params::district::{AdministrativeRegionParams, IpPositioningParams};
use crate::params::geocode::{GeocodingParams, ReverseGeocodingParams};
use crate::params::poi::{
    SearchAoiBoundaryParams, SearchPoiAroundParams, SearchPoiDetailParams, SearchPoiParams,
    SearchPoiPolygonParams,
};
use crate::params::route::{
    BicyclingRouteParams, DrivingRouteParams, ElectBikeRouteParams, PublicTransitRouteParams,
    SubwayRouteParams, WalkingRouteParams,
};
use crate::service::AmapService;
use crate::types::{ResponseEnvelope, ToolDefinition};

use alias::{AliasTool, ReverseGeocodingWithPoisTool};
use operation::OperationTool;

/// Trait that all tools must implement.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g. "geocoding").
    fn name(&self) -> &str;

    /// A human-readable description of what this tool does.
    fn description(&self) -> &str;

    /// JSON Schema describing the tool's input parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given JSON arguments.
    async fn execute(&self, params: Value) -> ResponseEnvelope;

    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.parameters_schema(),
        }
    }
}

/// Routes tool calls to the correct tool implementation.
pub struct ToolRouter {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRouter {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// Execute a tool by name. `arguments` is JSON text; a malformed body is
    /// reported by the tool itself as a failure envelope.
    pub async fn execute(&self, name: &str, arguments: &str) -> Result<ResponseEnvelope> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .with_context(|| format!("Unknown tool: {}", name))?;

        let params = if arguments.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            Value::String(arguments.to_string())
        };

        Ok(tool.execute(params).await)
    }

    /// Execute with already-decoded arguments.
    pub async fn execute_value(&self, name: &str, params: Value) -> Result<ResponseEnvelope> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .with_context(|| format!("Unknown tool: {}", name))?;
        Ok(tool.execute(params).await)
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a ToolRouter with every operation and compatibility alias.
pub fn create_default_router(service: Arc<AmapService>) -> ToolRouter {
    let mut router = ToolRouter::new();

    router.register(Box::new(OperationTool::<GeocodingParams>::new(service.clone())));
    router.register(Box::new(OperationTool::<ReverseGeocodingParams>::new(service.clone())));
    router.register(Box::new(OperationTool::<DrivingRouteParams>::new(service.clone())));
    router.register(Box::new(OperationTool::<WalkingRouteParams>::new(service.clone())));
    router.register(Box::new(OperationTool::<BicyclingRouteParams>::new(service.clone())));
    router.register(Box::new(OperationTool::<ElectBikeRouteParams>::new(service.clone())));
    router.register(Box::new(OperationTool::<PublicTransitRouteParams>::new(service.clone())));
    router.register(Box::new(OperationTool::<SubwayRouteParams>::new(service.clone())));
    router.register(Box::new(OperationTool::<SearchPoiParams>::new(service.clone())));
    router.register(Box::new(OperationTool::<SearchPoiAroundParams>::new(service.clone())));
    router.register(Box::new(OperationTool::<SearchPoiPolygonParams>::new(service.clone())));
    router.register(Box::new(OperationTool::<SearchPoiDetailParams>::new(service.clone())));
    router.register(Box::new(OperationTool::<SearchAoiBoundaryParams>::new(service.clone())));
    router.register(Box::new(OperationTool::<AdministrativeRegionParams>::new(service.clone())));
    router.register(Box::new(OperationTool::<IpPositioningParams>::new(service.clone())));

    // Older tool names kept for existing callers
    router.register(Box::new(AliasTool::<ReverseGeocodingParams>::new(
        "reverse_Geocoding",
        service.clone(),
    )));
    router.register(Box::new(AliasTool::<SubwayRouteParams>::new(
        "amap_route_subway",
        service.clone(),
    )));
    router.register(Box::new(ReverseGeocodingWithPoisTool::new(service)));

    router
}

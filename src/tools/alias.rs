//! Compatibility names for operations that older callers still use.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use super::operation::run_value;
use super::Tool;
use crate::error::AmapError;
use crate::input::ToolInput;
use crate::params::geocode::ReverseGeocodingParams;
use crate::params::{require_non_blank, Parameters};
use crate::service::AmapService;
use crate::types::ResponseEnvelope;

/// Same behavior and schema as the operation it aliases, under another name.
pub struct AliasTool<P> {
    alias: &'static str,
    description: String,
    service: Arc<AmapService>,
    _params: PhantomData<fn() -> P>,
}

impl<P: Parameters> AliasTool<P> {
    pub fn new(alias: &'static str, service: Arc<AmapService>) -> Self {
        Self {
            alias,
            description: format!("Alias of `{}`. {}", P::OPERATION.name(), P::description()),
            service,
            _params: PhantomData,
        }
    }
}

#[async_trait]
impl<P: Parameters> Tool for AliasTool<P> {
    fn name(&self) -> &str {
        self.alias
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> Value {
        P::schema()
    }

    async fn execute(&self, params: Value) -> ResponseEnvelope {
        run_value::<P>(&self.service, self.alias, params).await
    }
}

/// Reverse geocoding that insists on a POI type filter.
pub struct ReverseGeocodingWithPoisTool {
    service: Arc<AmapService>,
}

impl ReverseGeocodingWithPoisTool {
    pub fn new(service: Arc<AmapService>) -> Self {
        Self { service }
    }

    fn prepare(params: Value) -> Result<ReverseGeocodingParams, AmapError> {
        let record = ToolInput::<ReverseGeocodingParams>::from_value(params)?.into_canonical()?;
        match record.poitype.as_deref() {
            Some(poitype) => require_non_blank("poitype", poitype)?,
            None => return Err(AmapError::input("poitype", "missing required field")),
        }
        Ok(record)
    }
}

#[async_trait]
impl Tool for ReverseGeocodingWithPoisTool {
    fn name(&self) -> &str {
        "search_re_geo_all"
    }

    fn description(&self) -> &str {
        "Reverse geocoding filtered to nearby POIs of the given `poitype`. \
         Same result shape as `reverse_geocoding`."
    }

    fn parameters_schema(&self) -> Value {
        let mut schema = ReverseGeocodingParams::schema();
        schema["required"] = json!(["location", "poitype"]);
        schema
    }

    async fn execute(&self, params: Value) -> ResponseEnvelope {
        match Self::prepare(params) {
            Ok(record) => self.service.run(ToolInput::Canonical(record)).await,
            Err(err) => {
                warn!(tool = self.name(), error = %err, "rejected arguments");
                ResponseEnvelope::from_error(&err)
            }
        }
    }
}

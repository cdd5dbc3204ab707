//! One tool per operation, generic over the parameter record.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::Tool;
use crate::input::ToolInput;
use crate::params::Parameters;
use crate::service::AmapService;
use crate::types::ResponseEnvelope;

pub struct OperationTool<P> {
    service: Arc<AmapService>,
    _params: PhantomData<fn() -> P>,
}

impl<P: Parameters> OperationTool<P> {
    pub fn new(service: Arc<AmapService>) -> Self {
        Self {
            service,
            _params: PhantomData,
        }
    }
}

/// Classify raw JSON arguments and run them through the service.
pub(crate) async fn run_value<P: Parameters>(
    service: &AmapService,
    tool: &str,
    params: Value,
) -> ResponseEnvelope {
    match ToolInput::<P>::from_value(params) {
        Ok(input) => service.run(input).await,
        Err(err) => {
            warn!(tool, error = %err, "rejected arguments");
            ResponseEnvelope::from_error(&err)
        }
    }
}

#[async_trait]
impl<P: Parameters> Tool for OperationTool<P> {
    fn name(&self) -> &str {
        P::OPERATION.name()
    }

    fn description(&self) -> &str {
        P::description()
    }

    fn parameters_schema(&self) -> Value {
        P::schema()
    }

    async fn execute(&self, params: Value) -> ResponseEnvelope {
        run_value::<P>(&self.service, self.name(), params).await
    }
}

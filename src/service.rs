//! Operation pipeline.
//!
//! Every operation runs the same steps:
//! normalize → validate → resolve key → build query → send → check status →
//! simplify → wrap. [`AmapService::run`] is the only place these steps are
//! spelled out; operations differ only in their parameter record type.

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::endpoint::Operation;
use crate::error::{AmapError, TransportError};
use crate::input::ToolInput;
use crate::params::Parameters;
use crate::query::build_query;
use crate::simplify::{simplify, text, ProviderStatus};
use crate::transport::{HttpTransport, Transport};
use crate::types::ResponseEnvelope;

const RAW_BODY_INFO: &str = "raw provider body";

/// Shared, read-only state for every operation.
pub struct AmapService {
    config: AppConfig,
    transport: Arc<dyn Transport>,
}

impl AmapService {
    pub fn new(config: AppConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Service backed by the real HTTP transport.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Run one operation end to end. Never fails: every error comes back as
    /// a failure envelope.
    pub async fn run<P: Parameters>(&self, input: ToolInput<P>) -> ResponseEnvelope {
        let operation = P::OPERATION;
        let span = info_span!(
            "operation",
            tool = operation.name(),
            call_id = %Uuid::new_v4()
        );

        async move {
            match self.execute(input).await {
                Ok(envelope) => envelope,
                Err(err) => {
                    error!(kind = err.kind(), error = %err, "operation failed");
                    ResponseEnvelope::from_error(&err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute<P: Parameters>(
        &self,
        input: ToolInput<P>,
    ) -> Result<ResponseEnvelope, AmapError> {
        let operation = P::OPERATION;
        let endpoint = operation.endpoint();

        let params = input.into_canonical()?;
        params.validate()?;

        let api_key = self.config.resolve_api_key(params.api_key())?;
        let query = build_query(&params, &api_key);
        let url = self.config.endpoint_url(operation);
        info!(url = %url, params = ?query.masked(), "sending request");

        let raw = match self.transport.send(&url, &query, endpoint.method).await {
            Ok(raw) => raw,
            // text search may answer in xml or jsonp; hand the body back as-is
            Err(TransportError::Decode { body, .. }) if operation == Operation::SearchPoi => {
                warn!("provider body is not JSON, returning it raw");
                return Ok(ResponseEnvelope::success(
                    serde_json::json!({ "raw": body }),
                    RAW_BODY_INFO,
                ));
            }
            Err(err) => return Err(err.into()),
        };

        match ProviderStatus::of(&raw) {
            ProviderStatus::Success => {
                info!(info = %text(raw.get("info")), "provider answered");
            }
            ProviderStatus::Failure { info, infocode } => {
                warn!(info = %info, infocode = ?infocode, "provider rejected request");
                let info = if info.is_empty() {
                    format!("{} failed", operation.name())
                } else {
                    info
                };
                return Err(AmapError::Provider { info, infocode });
            }
            ProviderStatus::Absent => {
                debug!("no status field, passing payload through");
            }
        }

        let provider_info = text(raw.get("info"));
        let data = simplify(endpoint.family, raw, &params.simplify_context());
        info!(summary = %summarize(&data), "request completed");

        Ok(ResponseEnvelope::success(data, provider_info))
    }
}

/// One-line description of a result for the log.
fn summarize(data: &Value) -> String {
    if let Some(summary) = data.get("summary").filter(|s| {
        s.as_object().is_some_and(|o| !o.is_empty())
    }) {
        return format!(
            "distance={} duration={}",
            summary["distance"], summary["duration"]
        );
    }
    for key in ["results", "pois", "districts", "paths"] {
        if let Some(list) = data.get(key).and_then(Value::as_array) {
            return format!("{} {}", list.len(), key);
        }
    }
    for key in ["poi", "aoi"] {
        if let Some(name) = data.get(key).and_then(|v| v.get("name")) {
            return format!("{} {}", key, name);
        }
    }
    if let Some(city) = data.get("location").and_then(|l| l.get("city")) {
        return format!("city {}", city);
    }
    "ok".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::geocode::{GeocodingParams, ReverseGeocodingParams};
    use crate::params::poi::SearchPoiParams;
    use crate::params::route::PublicTransitRouteParams;
    use crate::transport::stub::StubTransport;
    use crate::types::Method;
    use serde_json::json;

    fn keyed_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.amap.api_key = Some("config-key-0123456789".to_string());
        config
    }

    fn service(config: AppConfig, stub: Arc<StubTransport>) -> AmapService {
        AmapService::new(config, stub)
    }

    fn fields<P: Parameters>(value: Value) -> ToolInput<P> {
        ToolInput::from_value(value).unwrap()
    }

    fn geocode_payload() -> Value {
        json!({
            "status": "1",
            "info": "OK",
            "infocode": "10000",
            "count": "1",
            "geocodes": [{
                "country": "中国",
                "province": "北京市",
                "city": "北京市",
                "district": "朝阳区",
                "street": "阜通东大街",
                "number": "6号",
                "location": "116.482086,39.990496"
            }]
        })
    }

    #[test]
    fn test_geocoding_success() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let stub = Arc::new(StubTransport::replying(geocode_payload()));
        let svc = service(keyed_config(), stub.clone());

        let env = rt.block_on(svc.run::<GeocodingParams>(fields(json!({
            "address": "北京市朝阳区阜通东大街6号"
        }))));

        assert_eq!(env.status, 1);
        assert_eq!(env.info, "OK");
        assert!(env.error.is_none());
        let data = env.data.unwrap();
        assert_eq!(data["results"][0]["location"], "116.482086,39.990496");

        let sent = stub.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "https://restapi.amap.com/v3/geocode/geo");
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].query.pairs()[0].0, "key");
        assert_eq!(sent[0].query.get("key"), Some("config-key-0123456789"));
        assert_eq!(sent[0].query.get("address"), Some("北京市朝阳区阜通东大街6号"));
    }

    #[test]
    fn test_serialized_input() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let stub = Arc::new(StubTransport::replying(geocode_payload()));
        let svc = service(keyed_config(), stub.clone());

        let env = rt.block_on(svc.run::<GeocodingParams>(ToolInput::Serialized(
            r#"{"address": "阜通东大街6号", "city": "北京"}"#.to_string(),
        )));
        assert!(env.is_success());
        assert_eq!(stub.requests()[0].query.get("city"), Some("北京"));
    }

    #[test]
    fn test_explicit_key_wins() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let stub = Arc::new(StubTransport::replying(geocode_payload()));
        let svc = service(keyed_config(), stub.clone());

        rt.block_on(svc.run::<GeocodingParams>(fields(json!({
            "address": "x",
            "key": "caller-key"
        }))));
        assert_eq!(stub.requests()[0].query.get("key"), Some("caller-key"));
    }

    #[test]
    fn test_missing_key_fails_before_network() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let stub = Arc::new(StubTransport::replying(geocode_payload()));
        let svc = service(AppConfig::default(), stub.clone());

        let env = rt.block_on(svc.run::<GeocodingParams>(fields(json!({"address": "x"}))));
        assert_eq!(env.status, 0);
        assert_eq!(env.info, "configuration error");
        assert!(env.data.is_none());
        assert!(stub.requests().is_empty());
    }

    #[test]
    fn test_invalid_coordinate_fails_before_network() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let stub = Arc::new(StubTransport::replying(json!({"status": "1"})));
        let svc = service(keyed_config(), stub.clone());

        let env = rt.block_on(svc.run::<ReverseGeocodingParams>(fields(json!({
            "location": "200,90"
        }))));
        assert_eq!(env.status, 0);
        assert_eq!(env.info, "invalid format");
        assert!(env.error.unwrap().contains("200,90"));
        assert!(stub.requests().is_empty());
    }

    #[test]
    fn test_missing_field_is_input_error() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let stub = Arc::new(StubTransport::replying(json!({"status": "1"})));
        let svc = service(keyed_config(), stub.clone());

        let env = rt.block_on(svc.run::<GeocodingParams>(fields(json!({"city": "北京"}))));
        assert_eq!(env.info, "invalid input");
        assert!(env.error.unwrap().contains("address"));
        assert!(stub.requests().is_empty());
    }

    #[test]
    fn test_provider_failure() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let stub = Arc::new(StubTransport::replying(json!({
            "status": "0",
            "info": "INVALID_USER_KEY",
            "infocode": "10001"
        })));
        let svc = service(keyed_config(), stub);

        let env = rt.block_on(svc.run::<GeocodingParams>(fields(json!({"address": "x"}))));
        assert_eq!(env.status, 0);
        assert_eq!(env.info, "provider error");
        assert_eq!(env.error.as_deref(), Some("INVALID_USER_KEY (10001)"));
        assert!(env.data.is_none());
    }

    #[test]
    fn test_provider_failure_without_info() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let stub = Arc::new(StubTransport::replying(json!({"status": "0"})));
        let svc = service(keyed_config(), stub);

        let env = rt.block_on(svc.run::<GeocodingParams>(fields(json!({"address": "x"}))));
        assert_eq!(env.error.as_deref(), Some("geocoding failed"));
    }

    #[test]
    fn test_transport_timeout() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let stub = Arc::new(StubTransport::failing(TransportError::Timeout(10)));
        let svc = service(keyed_config(), stub);

        let env = rt.block_on(svc.run::<GeocodingParams>(fields(json!({"address": "x"}))));
        assert_eq!(env.status, 0);
        assert_eq!(env.info, "transport error");
        assert!(env.error.unwrap().contains("timed out"));
    }

    #[test]
    fn test_search_poi_returns_raw_body() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let stub = Arc::new(StubTransport::failing(TransportError::Decode {
            message: "expected value".to_string(),
            body: "<response><status>1</status></response>".to_string(),
        }));
        let svc = service(keyed_config(), stub.clone());

        let env = rt.block_on(svc.run::<SearchPoiParams>(fields(json!({
            "keywords": "肯德基",
            "output": "xml"
        }))));
        assert_eq!(env.status, 1);
        assert_eq!(env.info, "raw provider body");
        assert_eq!(
            env.data.unwrap()["raw"],
            "<response><status>1</status></response>"
        );
        assert_eq!(stub.requests()[0].query.get("output"), Some("xml"));
    }

    #[test]
    fn test_decode_failure_elsewhere_is_an_error() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let stub = Arc::new(StubTransport::failing(TransportError::Decode {
            message: "expected value".to_string(),
            body: "oops".to_string(),
        }));
        let svc = service(keyed_config(), stub);

        let env = rt.block_on(svc.run::<GeocodingParams>(fields(json!({"address": "x"}))));
        assert_eq!(env.status, 0);
        assert_eq!(env.info, "transport error");
    }

    #[test]
    fn test_public_transit_posts() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let stub = Arc::new(StubTransport::replying(json!({
            "status": "1",
            "info": "OK",
            "route": {"origin": "116.1,39.1", "destination": "116.3,39.3", "transits": []}
        })));
        let svc = service(keyed_config(), stub.clone());

        let env = rt.block_on(svc.run::<PublicTransitRouteParams>(fields(json!({
            "origin": "116.1,39.1",
            "destination": "116.3,39.3",
            "city1": "010",
            "city2": "010"
        }))));
        assert!(env.is_success());
        assert_eq!(env.data.unwrap()["summary"], json!({}));
        let sent = stub.requests();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].query.get("city1"), Some("010"));
    }

    #[test]
    fn test_absent_status_passes_through() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let raw = json!({"unexpected": {"shape": true}});
        let stub = Arc::new(StubTransport::replying(raw.clone()));
        let svc = service(keyed_config(), stub);

        let env = rt.block_on(svc.run::<GeocodingParams>(fields(json!({"address": "x"}))));
        assert_eq!(env.status, 1);
        assert_eq!(env.info, "OK");
        assert_eq!(env.data.unwrap(), raw);
    }

    #[test]
    fn test_endpoint_override_from_config() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let stub = Arc::new(StubTransport::replying(geocode_payload()));
        let mut config = keyed_config();
        config
            .endpoints
            .insert("geocoding".to_string(), "http://localhost:9000/geo".to_string());
        let svc = service(config, stub.clone());

        rt.block_on(svc.run::<GeocodingParams>(fields(json!({"address": "x"}))));
        assert_eq!(stub.requests()[0].url, "http://localhost:9000/geo");
    }

    #[test]
    fn test_summarize() {
        assert_eq!(summarize(&json!({"pois": [1, 2, 3]})), "3 pois");
        assert_eq!(
            summarize(&json!({"paths": [], "summary": {"distance": 10, "duration": 20}})),
            "distance=10 duration=20"
        );
        assert_eq!(summarize(&json!({"paths": [], "summary": {}})), "0 paths");
        assert_eq!(summarize(&json!({})), "ok");
    }
}

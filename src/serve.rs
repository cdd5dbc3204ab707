//! Line-delimited request loop.
//!
//! Each input line is one `{"name": ..., "arguments": ...}` request; each
//! output line is the JSON envelope it produced. A bad line never ends the
//! loop, only end of input does.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::tools::ToolRouter;
use crate::types::ResponseEnvelope;

#[derive(Debug, Deserialize)]
struct ToolCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Run one request line through the router.
pub async fn handle_line(router: &ToolRouter, line: &str) -> ResponseEnvelope {
    let call: ToolCall = match serde_json::from_str(line) {
        Ok(call) => call,
        Err(e) => {
            warn!(error = %e, "unparsable request line");
            return ResponseEnvelope::failure(format!("invalid request: {}", e), "invalid input");
        }
    };

    let arguments = match call.arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };

    match router.execute_value(&call.name, arguments).await {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(tool = %call.name, "unknown tool");
            ResponseEnvelope::failure(e.to_string(), "unknown tool")
        }
    }
}

pub async fn serve<R, W>(router: &ToolRouter, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read request")? {
        if line.trim().is_empty() {
            continue;
        }
        debug!(bytes = line.len(), "request received");

        let envelope = handle_line(router, &line).await;
        let mut out = serde_json::to_string(&envelope).context("Failed to encode response")?;
        out.push('\n');
        writer
            .write_all(out.as_bytes())
            .await
            .context("Failed to write response")?;
        writer.flush().await.context("Failed to flush response")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::service::AmapService;
    use crate::tools::create_default_router;
    use crate::transport::stub::StubTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn router() -> ToolRouter {
        let mut config = AppConfig::default();
        config.amap.api_key = Some("k".to_string());
        let stub = Arc::new(StubTransport::replying(json!({
            "status": "1",
            "info": "OK",
            "districts": [{"name": "北京市", "level": "province", "districts": []}]
        })));
        create_default_router(Arc::new(AmapService::new(config, stub)))
    }

    #[test]
    fn test_serve_answers_every_line() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let router = router();
        let input = concat!(
            r#"{"name": "administrative_region_query", "arguments": {"keywords": "北京"}}"#,
            "\n",
            "not json\n",
            "\n",
            r#"{"name": "teleport", "arguments": {}}"#,
            "\n",
            r#"{"name": "administrative_region_query", "arguments": "{\"keywords\": \"北京\"}"}"#,
            "\n",
        );
        let mut output = Vec::new();
        rt.block_on(serve(&router, input.as_bytes(), &mut output))
            .unwrap();

        let lines: Vec<ResponseEnvelope> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);

        assert_eq!(lines[0].status, 1);
        assert_eq!(lines[0].data.as_ref().unwrap()["districts"][0]["name"], "北京市");

        assert_eq!(lines[1].status, 0);
        assert_eq!(lines[1].info, "invalid input");

        assert_eq!(lines[2].status, 0);
        assert_eq!(lines[2].info, "unknown tool");
        assert!(lines[2].error.as_ref().unwrap().contains("teleport"));

        assert_eq!(lines[3], lines[0]);
    }

    #[test]
    fn test_missing_arguments_mean_empty_object() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let router = router();
        let env = rt.block_on(handle_line(&router, r#"{"name": "geocoding"}"#));
        assert_eq!(env.status, 0);
        assert_eq!(env.info, "invalid input");
        assert!(env.error.unwrap().contains("address"));
    }
}

//! SSE consumption for streaming provider responses.
//!
//! In streaming mode the structured output arrives as `input_json_delta`
//! fragments for the forced tool block. This module drains the event stream
//! and reassembles those fragments into the same final value the
//! non-streaming path produces.

use bytes::Bytes;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::Value;

use super::ProviderError;

/// Drains the SSE body of a streaming Messages API response and returns the
/// reassembled tool input.
pub(super) async fn collect_tool_input(
    response: reqwest::Response,
) -> Result<Value, ProviderError> {
    let mut acc = SseAccumulator::default();
    let mut body = response.bytes_stream();

    while let Some(chunk) = body.next().await {
        let chunk: Bytes =
            chunk.map_err(|e| ProviderError::Unavailable(format!("stream interrupted: {e}")))?;
        acc.push_chunk(&chunk)?;
    }

    acc.finish()
}

/// Incremental SSE parser. Chunk boundaries may fall anywhere, including
/// mid-line or mid-character, so raw bytes are buffered and only complete
/// lines are decoded (a complete SSE line is always whole UTF-8 text).
#[derive(Debug, Default)]
pub(super) struct SseAccumulator {
    buffer: Vec<u8>,
    tool_json: String,
    saw_tool_block: bool,
}

/// One `data:` payload. Only the fields we act on are modeled; unknown event
/// types (ping, message_delta, ...) fall through untouched.
#[derive(Debug, Deserialize)]
struct SseEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    content_block: Option<Value>,
    #[serde(default)]
    delta: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

impl SseAccumulator {
    pub(super) fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), ProviderError> {
        self.buffer.extend_from_slice(chunk);
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line_bytes[..pos]);
            self.handle_line(line.trim_end_matches('\r'))?;
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<(), ProviderError> {
        let Some(data) = line.strip_prefix("data:") else {
            return Ok(());
        };
        let Ok(event) = serde_json::from_str::<SseEvent>(data.trim()) else {
            return Ok(());
        };

        match event.event_type.as_str() {
            "content_block_start" => {
                let is_tool = event
                    .content_block
                    .as_ref()
                    .and_then(|b| b.get("type"))
                    .and_then(Value::as_str)
                    == Some("tool_use");
                if is_tool {
                    self.saw_tool_block = true;
                }
            }
            "content_block_delta" => {
                if let Some(partial) = event
                    .delta
                    .as_ref()
                    .and_then(|d| d.get("partial_json"))
                    .and_then(Value::as_str)
                {
                    self.tool_json.push_str(partial);
                }
            }
            "error" => {
                let message = event
                    .error
                    .as_ref()
                    .and_then(|e| e.get("message"))
                    .and_then(Value::as_str)
                    .unwrap_or("unknown stream error");
                return Err(ProviderError::Unavailable(format!(
                    "provider stream error: {message}"
                )));
            }
            _ => {}
        }
        Ok(())
    }

    pub(super) fn finish(self) -> Result<Value, ProviderError> {
        if !self.saw_tool_block {
            return Err(ProviderError::EmptyContent);
        }
        // A tool block with no deltas streams an empty input object.
        if self.tool_json.is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(&self.tool_json).map_err(|e| {
            ProviderError::SchemaConformance(format!("invalid streamed tool input: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOL_START: &str = "data: {\"type\":\"content_block_start\",\"index\":0,\"content_block\":{\"type\":\"tool_use\",\"id\":\"toolu_01\",\"name\":\"record_scores\",\"input\":{}}}\n";

    fn delta(partial: &str) -> String {
        format!(
            "data: {{\"type\":\"content_block_delta\",\"index\":0,\"delta\":{{\"type\":\"input_json_delta\",\"partial_json\":{}}}}}\n",
            serde_json::to_string(partial).unwrap()
        )
    }

    #[test]
    fn test_accumulates_split_json_deltas() {
        let mut acc = SseAccumulator::default();
        acc.push_chunk(TOOL_START.as_bytes()).unwrap();
        acc.push_chunk(delta("{\"grid_weight\"").as_bytes()).unwrap();
        acc.push_chunk(delta(": 0.6, \"water_weight\": 0.2,").as_bytes())
            .unwrap();
        acc.push_chunk(delta(" \"elevation_weight\": 0.2}").as_bytes())
            .unwrap();
        acc.push_chunk(b"data: {\"type\":\"message_stop\"}\n").unwrap();

        let value = acc.finish().unwrap();
        assert_eq!(value["grid_weight"], 0.6);
        assert_eq!(value["elevation_weight"], 0.2);
    }

    #[test]
    fn test_handles_chunk_boundary_mid_line() {
        let mut acc = SseAccumulator::default();
        let full = format!("{TOOL_START}{}", delta("{\"a\": 1}"));
        let (left, right) = full.split_at(TOOL_START.len() + 20);
        acc.push_chunk(left.as_bytes()).unwrap();
        acc.push_chunk(right.as_bytes()).unwrap();

        let value = acc.finish().unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let mut acc = SseAccumulator::default();
        acc.push_chunk(TOOL_START.as_bytes()).unwrap();

        // French place names routinely carry multi-byte characters; a chunk
        // boundary inside one must not corrupt the decoded text.
        let line = delta("{\"legislation\": \"Besançon zoning rules\"}");
        let bytes = line.as_bytes();
        let mid = line.find('ç').unwrap() + 1;
        acc.push_chunk(&bytes[..mid]).unwrap();
        acc.push_chunk(&bytes[mid..]).unwrap();

        let value = acc.finish().unwrap();
        assert_eq!(value["legislation"], "Besançon zoning rules");
    }

    #[test]
    fn test_error_event_surfaces_as_unavailable() {
        let mut acc = SseAccumulator::default();
        let err = acc
            .push_chunk(
                b"data: {\"type\":\"error\",\"error\":{\"type\":\"overloaded_error\",\"message\":\"Overloaded\"}}\n",
            )
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(ref m) if m.contains("Overloaded")));
    }

    #[test]
    fn test_stream_without_tool_block_is_empty_content() {
        let mut acc = SseAccumulator::default();
        acc.push_chunk(b"data: {\"type\":\"message_start\",\"message\":{}}\n")
            .unwrap();
        acc.push_chunk(b"data: {\"type\":\"message_stop\"}\n").unwrap();
        assert!(matches!(acc.finish(), Err(ProviderError::EmptyContent)));
    }

    #[test]
    fn test_tool_block_without_deltas_yields_empty_object() {
        let mut acc = SseAccumulator::default();
        acc.push_chunk(TOOL_START.as_bytes()).unwrap();
        let value = acc.finish().unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_ignores_event_lines_and_pings() {
        let mut acc = SseAccumulator::default();
        acc.push_chunk(b"event: ping\n").unwrap();
        acc.push_chunk(b"data: {\"type\":\"ping\"}\n").unwrap();
        acc.push_chunk(b"\n").unwrap();
        acc.push_chunk(TOOL_START.as_bytes()).unwrap();
        acc.push_chunk(delta("{}").as_bytes()).unwrap();
        assert_eq!(acc.finish().unwrap(), serde_json::json!({}));
    }
}

//! Static tool metadata, as surfaced by `tools/list`.
//!
//! The handler itself (an async closure over a `ServiceContext`) is not a
//! `serde`-friendly value and lives in `ahw-04-tool-registry`'s
//! `ToolRegistry`; this struct is the wire-facing subset of a registered
//! tool's metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    /// Optional at discovery time; honored at call time regardless.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
}

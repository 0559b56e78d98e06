//! Tool system: trait-based tools with runtime registration.
//!
//! Tools are how an external agent framework reaches the planner. Each tool
//! implements the [`Tool`] trait and is registered in a [`ToolRegistry`].
//! Results travel in a status envelope ([`ToolOutput`]); [`ToolRegistry::dispatch`]
//! folds every failure into an error envelope so nothing escapes the boundary.

use std::collections::BTreeMap;

use miette::Diagnostic;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::planner::Planner;
use crate::session::SessionState;

/// Errors specific to the tool layer.
#[derive(Debug, Error, Diagnostic)]
pub enum ToolError {
    #[error("tool not found: \"{name}\"")]
    #[diagnostic(
        code(wakewindow::tool::not_found),
        help("Check available tools with `wakewindow tools`.")
    )]
    ToolNotFound { name: String },

    #[error("{tool_name}: missing required parameter: {name}")]
    #[diagnostic(
        code(wakewindow::tool::missing_param),
        help("Every required parameter listed in the tool signature must be provided.")
    )]
    MissingParam { tool_name: String, name: String },

    #[error("{tool_name}: invalid parameter {name}: {message}")]
    #[diagnostic(
        code(wakewindow::tool::invalid_param),
        help("Check the parameter type against the tool signature.")
    )]
    InvalidParam {
        tool_name: String,
        name: String,
        message: String,
    },

    #[error("tool input must be a JSON object, got {found}")]
    #[diagnostic(
        code(wakewindow::tool::invalid_input),
        help("Pass parameters as an object, e.g. {{\"wake_time\": \"07:00\"}}.")
    )]
    InvalidInput { found: String },
}

pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Description of a tool's interface.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSignature {
    /// Unique name of the tool.
    pub name: String,
    /// What this tool does.
    pub description: String,
    /// Parameters the tool accepts.
    pub parameters: Vec<ToolParam>,
}

/// A single parameter in a tool's signature.
#[derive(Debug, Clone, Serialize)]
pub struct ToolParam {
    /// Parameter name.
    pub name: String,
    /// What this parameter controls.
    pub description: String,
    /// Whether this parameter must be provided.
    pub required: bool,
}

impl ToolParam {
    pub fn required(name: &str, description: &str) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: true,
        }
    }

    pub fn optional(name: &str, description: &str) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Input to a tool execution: a JSON object of named parameters.
#[derive(Debug, Clone, Default)]
pub struct ToolInput {
    params: Map<String, Value>,
}

impl ToolInput {
    /// Create a new empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_json(value: Value) -> ToolResult<Self> {
        match value {
            Value::Object(params) => Ok(Self { params }),
            Value::Null => Ok(Self::new()),
            other => Err(ToolError::InvalidInput {
                found: json_kind(&other).into(),
            }),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Get a parameter value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name).filter(|v| !v.is_null())
    }

    fn require(&self, name: &str, tool_name: &str) -> ToolResult<&Value> {
        self.get(name).ok_or_else(|| ToolError::MissingParam {
            tool_name: tool_name.into(),
            name: name.into(),
        })
    }

    /// Get a required string parameter.
    pub fn require_str(&self, name: &str, tool_name: &str) -> ToolResult<&str> {
        let value = self.require(name, tool_name)?;
        value
            .as_str()
            .ok_or_else(|| invalid(tool_name, name, format!("expected string, got {}", json_kind(value))))
    }

    /// Get a required non-negative integer. Numeric strings are accepted.
    pub fn require_u32(&self, name: &str, tool_name: &str) -> ToolResult<u32> {
        let value = self.require(name, tool_name)?;
        as_u32(value).ok_or_else(|| {
            invalid(tool_name, name, format!("expected non-negative integer, got {value}"))
        })
    }

    /// Get a required signed integer. Numeric strings are accepted.
    pub fn require_i32(&self, name: &str, tool_name: &str) -> ToolResult<i32> {
        let value = self.require(name, tool_name)?;
        let parsed = match value {
            Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| invalid(tool_name, name, format!("expected integer, got {value}")))
    }

    /// Get an optional string.
    pub fn get_str(&self, name: &str, tool_name: &str) -> ToolResult<Option<&str>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(invalid(
                tool_name,
                name,
                format!("expected string, got {}", json_kind(other)),
            )),
        }
    }

    /// Get an optional non-negative integer. Numeric strings are accepted.
    pub fn get_u32(&self, name: &str, tool_name: &str) -> ToolResult<Option<u32>> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => as_u32(value).map(Some).ok_or_else(|| {
                invalid(tool_name, name, format!("expected non-negative integer, got {value}"))
            }),
        }
    }

    /// Get an optional boolean.
    pub fn get_bool(&self, name: &str, tool_name: &str) -> ToolResult<Option<bool>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) if s == "true" => Ok(Some(true)),
            Some(Value::String(s)) if s == "false" => Ok(Some(false)),
            Some(other) => Err(invalid(tool_name, name, format!("expected boolean, got {other}"))),
        }
    }

    /// Get a required list of non-negative integers. A comma-separated
    /// string such as `"150,180,210"` is accepted too.
    pub fn require_u32_list(&self, name: &str, tool_name: &str) -> ToolResult<Vec<u32>> {
        let value = self.require(name, tool_name)?;
        let bad = |v: &Value| invalid(tool_name, name, format!("expected list of minutes, got {v}"));
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| as_u32(item).ok_or_else(|| bad(item)))
                .collect(),
            Value::String(s) => s
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(|part| part.trim().parse::<u32>().map_err(|_| bad(value)))
                .collect(),
            other => Err(bad(other)),
        }
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn invalid(tool_name: &str, name: &str, message: String) -> ToolError {
    ToolError::InvalidParam {
        tool_name: tool_name.into(),
        name: name.into(),
        message,
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Status discriminator of a tool result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Success,
    Error,
}

/// Output from a tool execution: a status plus either a payload or an error
/// message. Serializes flat, e.g. `{"status": "success", "duration_minutes": 45, ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub status: ToolStatus,
    body: Map<String, Value>,
}

impl ToolOutput {
    /// Create a successful output from any serializable payload. Non-object
    /// payloads are placed under `"result"`.
    pub fn ok<T: Serialize>(payload: &T) -> Self {
        let body = match serde_json::to_value(payload) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                let mut map = Map::new();
                map.insert("result".into(), other);
                map
            }
            Err(e) => return Self::err(format!("failed to serialize result: {e}")),
        };
        Self {
            status: ToolStatus::Success,
            body,
        }
    }

    /// Create a failed output.
    pub fn err(message: impl Into<String>) -> Self {
        let mut body = Map::new();
        body.insert("error".into(), Value::String(message.into()));
        Self {
            status: ToolStatus::Error,
            body,
        }
    }

    /// Attach an extra field (e.g. an echoed identifier).
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }

    /// A field of the payload.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// The error message, for failed outputs.
    pub fn error(&self) -> Option<&str> {
        match self.status {
            ToolStatus::Error => self.body.get("error").and_then(Value::as_str),
            ToolStatus::Success => None,
        }
    }

    /// The full envelope as JSON.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            "status".into(),
            serde_json::to_value(self.status).unwrap_or(Value::Null),
        );
        for (k, v) in &self.body {
            map.insert(k.clone(), v.clone());
        }
        Value::Object(map)
    }
}

impl Serialize for ToolOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Trait + registry
// ---------------------------------------------------------------------------

/// A tool the agent can execute.
pub trait Tool: Send + Sync {
    /// Describe this tool's interface.
    fn signature(&self) -> ToolSignature;

    /// Execute the tool against the planner, recording into the caller's session.
    fn execute(
        &self,
        planner: &Planner,
        session: &mut SessionState,
        input: ToolInput,
    ) -> ToolResult<ToolOutput>;
}

/// Registry of available tools.
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// A registry holding every built-in planner tool.
    pub fn with_builtin_tools() -> Self {
        let mut reg = Self::new();
        for tool in crate::tools::builtin_tools() {
            reg.register(tool);
        }
        reg
    }

    /// Register a tool. If a tool with the same name exists, it is replaced.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let sig = tool.signature();
        self.tools.insert(sig.name.clone(), tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|b| b.as_ref())
    }

    /// List all registered tool signatures, sorted by name.
    pub fn list(&self) -> Vec<ToolSignature> {
        self.tools.values().map(|t| t.signature()).collect()
    }

    /// Execute a tool by name.
    pub fn execute(
        &self,
        name: &str,
        input: ToolInput,
        planner: &Planner,
        session: &mut SessionState,
    ) -> ToolResult<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::ToolNotFound { name: name.into() })?;
        tool.execute(planner, session, input)
    }

    /// Execute a tool by name, folding every error into an error envelope.
    pub fn dispatch(
        &self,
        name: &str,
        input: ToolInput,
        planner: &Planner,
        session: &mut SessionState,
    ) -> ToolOutput {
        match self.execute(name, input, planner, session) {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(tool = name, error = %e, "tool call failed");
                ToolOutput::err(e.to_string())
            }
        }
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use serde_json::json;

    struct DummyTool;
    impl Tool for DummyTool {
        fn signature(&self) -> ToolSignature {
            ToolSignature {
                name: "dummy".into(),
                description: "A test tool".into(),
                parameters: vec![],
            }
        }
        fn execute(
            &self,
            _planner: &Planner,
            _session: &mut SessionState,
            input: ToolInput,
        ) -> ToolResult<ToolOutput> {
            let n = input.require_u32("n", "dummy")?;
            Ok(ToolOutput::ok(&json!({ "n": n })))
        }
    }

    fn planner() -> Planner {
        Planner::new(PlannerConfig::default()).unwrap()
    }

    #[test]
    fn register_and_list() {
        let mut reg = ToolRegistry::new();
        reg.register(Box::new(DummyTool));
        assert_eq!(reg.len(), 1);
        let sigs = reg.list();
        assert_eq!(sigs[0].name, "dummy");
    }

    #[test]
    fn get_missing_tool() {
        let reg = ToolRegistry::new();
        assert!(reg.get("nonexistent").is_none());
    }

    #[test]
    fn dispatch_folds_errors() {
        let mut reg = ToolRegistry::new();
        reg.register(Box::new(DummyTool));
        let planner = planner();
        let mut session = SessionState::new();

        let out = reg.dispatch("nonexistent", ToolInput::new(), &planner, &mut session);
        assert_eq!(out.status, ToolStatus::Error);
        assert!(out.error().unwrap().contains("nonexistent"));

        let out = reg.dispatch("dummy", ToolInput::new(), &planner, &mut session);
        assert!(out.error().unwrap().contains("missing required parameter: n"));

        let out = reg.dispatch(
            "dummy",
            ToolInput::new().with_param("n", 3),
            &planner,
            &mut session,
        );
        assert!(out.is_success());
        assert_eq!(out.to_json(), json!({ "status": "success", "n": 3 }));
    }

    #[test]
    fn tool_input_accessors() {
        let input = ToolInput::from_json(json!({
            "wake_time": "07:00",
            "minutes": "150",
            "delta": -15,
            "flag": true,
            "windows": [150, 180],
            "csv": "150, 180,210",
        }))
        .unwrap();
        assert_eq!(input.require_str("wake_time", "t").unwrap(), "07:00");
        assert_eq!(input.require_u32("minutes", "t").unwrap(), 150);
        assert_eq!(input.require_i32("delta", "t").unwrap(), -15);
        assert_eq!(input.get_bool("flag", "t").unwrap(), Some(true));
        assert_eq!(input.get_bool("absent", "t").unwrap(), None);
        assert_eq!(input.get_str("wake_time", "t").unwrap(), Some("07:00"));
        assert_eq!(input.get_str("absent", "t").unwrap(), None);
        assert_eq!(input.get_u32("minutes", "t").unwrap(), Some(150));
        assert_eq!(input.get_u32("absent", "t").unwrap(), None);
        assert!(matches!(
            input.get_str("delta", "t"),
            Err(ToolError::InvalidParam { .. })
        ));
        assert_eq!(input.require_u32_list("windows", "t").unwrap(), vec![150, 180]);
        assert_eq!(input.require_u32_list("csv", "t").unwrap(), vec![150, 180, 210]);
        assert!(matches!(
            input.require_u32("delta", "t"),
            Err(ToolError::InvalidParam { .. })
        ));
        assert!(matches!(
            input.require_str("minutes_missing", "t"),
            Err(ToolError::MissingParam { .. })
        ));
    }

    #[test]
    fn from_json_requires_object() {
        assert!(ToolInput::from_json(json!(null)).is_ok());
        assert!(matches!(
            ToolInput::from_json(json!([1, 2])),
            Err(ToolError::InvalidInput { .. })
        ));
    }

    #[test]
    fn non_object_payload_goes_under_result() {
        let out = ToolOutput::ok(&42);
        assert_eq!(out.get("result"), Some(&json!(42)));
        let out = ToolOutput::err("boom").with_field("window_id", "nap1");
        assert_eq!(
            out.to_json(),
            json!({ "status": "error", "error": "boom", "window_id": "nap1" })
        );
    }
}

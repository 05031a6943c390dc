//! Tool registry and dispatcher
//!
//! The five bridge tools behind `tools/list` and `tools/call`. Input
//! schemas are advisory: the server never rejects a call for schema
//! reasons, it just fails inside the tool with a readable message.

use crate::agents::AgentRegistry;
use crate::config::ServerConfig;
use crate::error::{BridgeError, Result};
use crate::family;
use crate::heuristics;
use crate::store::StateStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Fixed calendar identifiers returned by `calendarCheck`.
const CALENDARS: &[&str] = &[
    "family",
    "work",
    "school",
    "appointments",
    "activities",
    "birthdays",
];

/// Tool schema definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name as it appears on the wire
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters (advisory only)
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Tool dispatcher. Owns the mutable state store; the config and agent
/// registry are threaded in at startup so tests get isolated instances.
pub struct ToolHandler {
    config: ServerConfig,
    registry: AgentRegistry,
    store: StateStore,
}

impl ToolHandler {
    pub fn new(config: ServerConfig, registry: AgentRegistry, store: StateStore) -> Self {
        Self {
            config,
            registry,
            store,
        }
    }

    /// Get the list of all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: "route".to_string(),
                description: "Route an operation to a downstream agent. With agent=\"auto\" the operation text picks the agent by keyword; routing is acknowledged, not executed.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "agent": {
                            "type": "string",
                            "description": "Agent id (email, calendar, notes, messaging, tasks, assistant) or \"auto\""
                        },
                        "operation": {
                            "type": "string",
                            "description": "What the agent should do"
                        },
                        "params": {
                            "type": "object",
                            "description": "Opaque parameters forwarded with the operation"
                        }
                    },
                    "required": ["agent", "operation"]
                }),
            },
            Tool {
                name: "memory".to_string(),
                description: "Volatile key/value memory. Actions: get, set, search, persist. Nothing survives a restart; persist only reports the entry count.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "action": {
                            "type": "string",
                            "enum": ["get", "set", "search", "persist"]
                        },
                        "key": {
                            "type": "string",
                            "description": "Entry key; doubles as the query for search"
                        },
                        "value": {
                            "description": "Value to store (set only)"
                        }
                    },
                    "required": ["action"]
                }),
            },
            Tool {
                name: "calendarCheck".to_string(),
                description: "List the configured calendars. This is a stub: it echoes the request and returns the fixed calendar set without any real lookup.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "action": {
                            "type": "string",
                            "description": "What the caller wanted to do"
                        },
                        "timeRange": {
                            "type": "string",
                            "description": "Time range of interest, echoed back"
                        }
                    },
                    "required": ["action"]
                }),
            },
            Tool {
                name: "taskADHD".to_string(),
                description: "ADHD-friendly task helpers. Actions: break_down (15-minute chunks), prioritize (Eisenhower quadrant), time_block (15 on / 5 off schedule), energy_match (best time of day).".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "task": {
                            "type": "string",
                            "description": "Task description"
                        },
                        "action": {
                            "type": "string",
                            "enum": ["break_down", "prioritize", "time_block", "energy_match"]
                        },
                        "duration": {
                            "type": "number",
                            "description": "Estimated minutes",
                            "default": 60
                        }
                    },
                    "required": ["task", "action"]
                }),
            },
            Tool {
                name: "family".to_string(),
                description: "Family member profiles. member is one of parent, partner, child, or \"all\" for every profile, \"auto\" for the default member.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "member": {
                            "type": "string",
                            "description": "Member id, \"all\", or \"auto\""
                        }
                    },
                    "required": ["member"]
                }),
            },
        ]
    }

    /// Execute a tool call. Errors here never become protocol errors;
    /// the server folds them into error-content tool results.
    pub fn execute(&mut self, tool_name: &str, params: Value) -> Result<Value> {
        debug!("Executing tool: {}", tool_name);

        match tool_name {
            "route" => self.route(params),
            "memory" => self.memory(params),
            "calendarCheck" => self.calendar_check(params),
            "taskADHD" => self.task_adhd(params),
            "family" => self.family(params),
            _ => Err(BridgeError::UnknownTool(tool_name.to_string())),
        }
    }

    fn route(&self, params: Value) -> Result<Value> {
        #[derive(Deserialize)]
        struct RouteParams {
            agent: String,
            operation: String,
            #[serde(default)]
            params: Value,
        }

        let params: RouteParams = parse_args(params)?;

        let resolved = if params.agent == "auto" {
            self.registry.resolve(&params.operation).to_string()
        } else if self.registry.is_known(&params.agent) {
            params.agent.clone()
        } else {
            return Err(BridgeError::InvalidArguments(format!(
                "unknown agent: {}",
                params.agent
            )));
        };

        debug!("Routed operation to agent: {}", resolved);

        Ok(serde_json::json!({
            "agent": resolved,
            "operation": params.operation,
            "params": params.params,
            "status": "routed (simulated, not executed)",
        }))
    }

    fn memory(&mut self, params: Value) -> Result<Value> {
        #[derive(Deserialize)]
        struct MemoryParams {
            action: String,
            key: Option<String>,
            value: Option<Value>,
        }

        let params: MemoryParams = parse_args(params)?;

        match params.action.as_str() {
            "get" => {
                let key = require(params.key, "key")?;
                Ok(serde_json::to_value(self.store.get(&key))?)
            }
            "set" => {
                let key = require(params.key, "key")?;
                let value = require(params.value, "value")?;
                let entries = self.store.set(&key, value);
                Ok(serde_json::json!({
                    "key": key,
                    "stored": true,
                    "entries": entries,
                }))
            }
            "search" => {
                let query = require(params.key, "key")?;
                Ok(serde_json::to_value(self.store.search(&query))?)
            }
            "persist" => Ok(self.store.persist()),
            other => Err(BridgeError::UnknownAction(other.to_string())),
        }
    }

    fn calendar_check(&self, params: Value) -> Result<Value> {
        #[derive(Deserialize)]
        struct CalendarParams {
            action: String,
            #[serde(rename = "timeRange")]
            time_range: Option<String>,
        }

        let params: CalendarParams = parse_args(params)?;

        Ok(serde_json::json!({
            "calendars": CALENDARS,
            "action": params.action,
            "timeRange": params.time_range,
            "status": "stub: no calendar backend is connected",
        }))
    }

    fn task_adhd(&self, params: Value) -> Result<Value> {
        #[derive(Deserialize)]
        struct TaskParams {
            task: String,
            action: String,
            // The advisory schema says "number", so fractional minutes
            // are accepted and rounded.
            duration: Option<f64>,
        }

        let params: TaskParams = parse_args(params)?;
        // `as i64` saturates for non-finite and out-of-range values,
        // which the range check below then rejects.
        let duration = params.duration.unwrap_or(60.0).round() as i64;
        if duration > heuristics::MAX_DURATION_MINUTES {
            return Err(BridgeError::InvalidArguments(format!(
                "duration out of range: {duration} (max {} minutes)",
                heuristics::MAX_DURATION_MINUTES
            )));
        }

        let result = match params.action.as_str() {
            "break_down" => {
                let chunks = heuristics::break_down(&params.task, duration);
                serde_json::json!({
                    "task": params.task,
                    "chunks": chunks,
                    "total_minutes": duration.max(0),
                })
            }
            "prioritize" => {
                let classification = heuristics::prioritize(&params.task);
                serde_json::json!({
                    "task": params.task,
                    "classification": classification,
                })
            }
            "time_block" => {
                let plan = heuristics::time_block(
                    duration,
                    Utc::now(),
                    self.config.display_timezone,
                );
                serde_json::json!({
                    "task": params.task,
                    "plan": plan,
                })
            }
            "energy_match" => {
                let matched = heuristics::energy_match(&params.task);
                serde_json::json!({
                    "task": params.task,
                    "energy": matched,
                })
            }
            other => return Err(BridgeError::UnknownAction(other.to_string())),
        };

        Ok(result)
    }

    fn family(&self, params: Value) -> Result<Value> {
        #[derive(Deserialize)]
        struct FamilyParams {
            member: String,
        }

        let params: FamilyParams = parse_args(params)?;

        match params.member.as_str() {
            "all" => Ok(family::all_profiles()),
            "auto" => Ok(family::profile(family::DEFAULT_MEMBER)
                .unwrap_or(Value::Null)),
            member => Ok(family::profile(member).unwrap_or_else(|| {
                serde_json::json!({
                    "member": member,
                    "found": false,
                    "known_members": family::MEMBERS,
                })
            })),
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(params: Value) -> Result<T> {
    serde_json::from_value(params)
        .map_err(|e| BridgeError::InvalidArguments(e.to_string()))
}

fn require<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| BridgeError::InvalidArguments(format!("missing '{field}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_handler() -> ToolHandler {
        ToolHandler::new(
            ServerConfig::default(),
            AgentRegistry::new(),
            StateStore::new(),
        )
    }

    #[test]
    fn test_list_tools_names_and_uniqueness() {
        let handler = test_handler();
        let tools = handler.list_tools();
        let names: Vec<String> = tools.iter().map(|t| t.name.clone()).collect();
        assert_eq!(
            names,
            vec!["route", "memory", "calendarCheck", "taskADHD", "family"]
        );

        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names, deduped);
    }

    #[test]
    fn test_unknown_tool_errors() {
        let mut handler = test_handler();
        let err = handler.execute("nonsense", json!({})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: nonsense");
    }

    #[test]
    fn test_route_auto_resolves_by_keywords() {
        let mut handler = test_handler();
        let result = handler
            .execute(
                "route",
                json!({"agent": "auto", "operation": "draft an email reply"}),
            )
            .unwrap();
        assert_eq!(result["agent"], json!("email"));
        assert_eq!(result["operation"], json!("draft an email reply"));
    }

    #[test]
    fn test_route_echoes_params_without_executing() {
        let mut handler = test_handler();
        let result = handler
            .execute(
                "route",
                json!({
                    "agent": "calendar",
                    "operation": "add event",
                    "params": {"when": "friday"},
                }),
            )
            .unwrap();
        assert_eq!(result["agent"], json!("calendar"));
        assert_eq!(result["params"], json!({"when": "friday"}));
        assert!(result["status"].as_str().unwrap().contains("simulated"));
    }

    #[test]
    fn test_route_rejects_unknown_agent() {
        let mut handler = test_handler();
        let err = handler
            .execute("route", json!({"agent": "plumber", "operation": "fix sink"}))
            .unwrap_err();
        assert!(err.to_string().contains("unknown agent"));
    }

    #[test]
    fn test_memory_set_get_round_trip() {
        let mut handler = test_handler();
        handler
            .execute("memory", json!({"action": "set", "key": "k", "value": "v"}))
            .unwrap();

        let result = handler
            .execute("memory", json!({"action": "get", "key": "k"}))
            .unwrap();
        assert_eq!(result["found"], json!(true));
        assert_eq!(result["value"], json!("v"));

        let result = handler
            .execute("memory", json!({"action": "get", "key": "missing"}))
            .unwrap();
        assert_eq!(result["found"], json!(false));
    }

    #[test]
    fn test_memory_search_reports_true_count() {
        let mut handler = test_handler();
        for i in 0..15 {
            handler
                .execute(
                    "memory",
                    json!({"action": "set", "key": format!("x{i}"), "value": i}),
                )
                .unwrap();
        }

        let result = handler
            .execute("memory", json!({"action": "search", "key": "x"}))
            .unwrap();
        assert_eq!(result["matches"], json!(15));
        assert!(result["results"].as_array().unwrap().len() <= 10);
    }

    #[test]
    fn test_memory_unknown_action_errors() {
        let mut handler = test_handler();
        let err = handler
            .execute("memory", json!({"action": "drop"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown action: drop");
    }

    #[test]
    fn test_calendar_check_returns_fixed_set() {
        let mut handler = test_handler();
        let result = handler
            .execute(
                "calendarCheck",
                json!({"action": "list", "timeRange": "this week"}),
            )
            .unwrap();
        assert_eq!(result["calendars"].as_array().unwrap().len(), 6);
        assert_eq!(result["timeRange"], json!("this week"));
    }

    #[test]
    fn test_task_adhd_break_down_defaults_to_sixty_minutes() {
        let mut handler = test_handler();
        let result = handler
            .execute("taskADHD", json!({"task": "Plan trip", "action": "break_down"}))
            .unwrap();
        assert_eq!(result["chunks"].as_array().unwrap().len(), 4);
        assert_eq!(result["total_minutes"], json!(60));
    }

    #[test]
    fn test_task_adhd_rejects_out_of_range_duration() {
        let mut handler = test_handler();
        let err = handler
            .execute(
                "taskADHD",
                json!({"task": "Everything", "action": "break_down", "duration": i64::MAX}),
            )
            .unwrap_err();
        assert!(err.to_string().contains("duration out of range"));
    }

    #[test]
    fn test_task_adhd_accepts_fractional_duration() {
        let mut handler = test_handler();
        let result = handler
            .execute(
                "taskADHD",
                json!({"task": "Quick tidy", "action": "break_down", "duration": 10.4}),
            )
            .unwrap();
        let chunks = result["chunks"].as_array().unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0]["duration"], json!(10));
    }

    #[test]
    fn test_task_adhd_prioritize() {
        let mut handler = test_handler();
        let result = handler
            .execute(
                "taskADHD",
                json!({"task": "urgent and important deadline", "action": "prioritize"}),
            )
            .unwrap();
        assert_eq!(result["classification"]["quadrant"], json!("Do First"));
        assert_eq!(result["classification"]["priority"], json!("Critical"));
    }

    #[test]
    fn test_family_member_all_and_auto() {
        let mut handler = test_handler();

        let one = handler.execute("family", json!({"member": "partner"})).unwrap();
        assert_eq!(one["member"], json!("partner"));

        let all = handler.execute("family", json!({"member": "all"})).unwrap();
        assert_eq!(all.as_object().unwrap().len(), 3);

        let auto = handler.execute("family", json!({"member": "auto"})).unwrap();
        assert_eq!(auto["member"], json!("parent"));
    }

    #[test]
    fn test_family_unknown_member_is_soft_not_found() {
        let mut handler = test_handler();
        let result = handler.execute("family", json!({"member": "grandpa"})).unwrap();
        assert_eq!(result["found"], json!(false));
    }
}

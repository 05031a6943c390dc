//! Static family profile table backing the `family` tool

use serde_json::{json, Value};

/// Member whose profile `member: "auto"` resolves to.
pub const DEFAULT_MEMBER: &str = "parent";

/// Fixed member set; lookups outside it return `None`.
pub const MEMBERS: &[&str] = &["parent", "partner", "child"];

/// Profile for one member, or `None` for an unknown id.
pub fn profile(member: &str) -> Option<Value> {
    let value = match member {
        "parent" => json!({
            "member": "parent",
            "role": "primary",
            "preferences": {
                "focus_hours": "09:00-12:00",
                "reminder_channel": "telegram",
                "planning_style": "short chunks with visible progress",
            },
            "routines": ["morning inbox sweep", "evening shutdown checklist"],
        }),
        "partner" => json!({
            "member": "partner",
            "role": "co-planner",
            "preferences": {
                "focus_hours": "13:00-16:00",
                "reminder_channel": "email",
                "planning_style": "weekly overview, few notifications",
            },
            "routines": ["sunday week planning"],
        }),
        "child" => json!({
            "member": "child",
            "role": "dependent",
            "preferences": {
                "reminder_channel": "none",
                "planning_style": "handled by parents",
            },
            "routines": ["school pickup", "homework block"],
        }),
        _ => return None,
    };
    Some(value)
}

/// Every profile, keyed by member id.
pub fn all_profiles() -> Value {
    let mut map = serde_json::Map::new();
    for member in MEMBERS.iter().copied() {
        if let Some(value) = profile(member) {
            map.insert(member.to_string(), value);
        }
    }
    Value::Object(map)
}

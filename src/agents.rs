//! Static agent registry and auto-routing
//!
//! The bridge does not run the downstream agents; it only decides which
//! one an operation belongs to. The table is fixed at compile time and
//! never mutated, and routing itself is simulated: the `route` tool
//! returns an acknowledgement, not the operation's result.

use serde::Serialize;

/// Agent that receives routed operations when nothing else matches.
pub const DEFAULT_AGENT: &str = "assistant";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AgentDescriptor {
    pub id: &'static str,
    pub capability: &'static str,
    pub status: &'static str,
}

/// Ordered routing table: first keyword match wins.
struct AgentRoute {
    id: &'static str,
    capability: &'static str,
    keywords: &'static [&'static str],
}

const ROUTES: &[AgentRoute] = &[
    AgentRoute {
        id: "email",
        capability: "gmail",
        keywords: &["email", "gmail", "inbox", "reply", "draft", "send"],
    },
    AgentRoute {
        id: "calendar",
        capability: "google-calendar",
        keywords: &["calendar", "schedule", "meeting", "event", "appointment"],
    },
    AgentRoute {
        id: "notes",
        capability: "notion",
        keywords: &["note", "notion", "document", "journal", "page"],
    },
    AgentRoute {
        id: "messaging",
        capability: "telegram",
        keywords: &["telegram", "message", "chat", "remind", "ping"],
    },
    AgentRoute {
        id: "tasks",
        capability: "task-planner",
        keywords: &["task", "todo", "plan", "prioritize", "chunk"],
    },
];

#[derive(Debug, Default, Clone)]
pub struct AgentRegistry;

impl AgentRegistry {
    pub fn new() -> Self {
        Self
    }

    /// All known agent ids, default last.
    pub fn agents(&self) -> Vec<AgentDescriptor> {
        let mut agents: Vec<AgentDescriptor> = ROUTES
            .iter()
            .map(|route| AgentDescriptor {
                id: route.id,
                capability: route.capability,
                status: "simulated",
            })
            .collect();
        agents.push(AgentDescriptor {
            id: DEFAULT_AGENT,
            capability: "general",
            status: "simulated",
        });
        agents
    }

    pub fn is_known(&self, agent: &str) -> bool {
        agent == DEFAULT_AGENT || ROUTES.iter().any(|route| route.id == agent)
    }

    /// Resolve `agent: "auto"`: case-insensitive substring match of the
    /// operation text against each route's keywords, in table order.
    pub fn resolve(&self, operation: &str) -> &'static str {
        let text = operation.to_lowercase();
        ROUTES
            .iter()
            .find(|route| route.keywords.iter().any(|kw| text.contains(kw)))
            .map(|route| route.id)
            .unwrap_or(DEFAULT_AGENT)
    }
}

//! Agent Router - maps an approved query to the role that answers it.
//!
//! Routing is an ordered dispatch table of keyword rules. New roles are
//! added by extending the table, not by branching logic; a role without
//! a registered generator fails with a NotImplemented-style outcome
//! until it is wired.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::RoutingConfig;
use crate::engine::ResponseGenerator;

/// Generation roles known to the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRole {
    /// Strategic selling advice (the default role).
    Sales,
    /// Clinical/mechanistic detail (routed, not yet wired).
    Medical,
}

impl AgentRole {
    /// Name under which the role appears in `agents_used`.
    pub fn agent_label(&self) -> String {
        format!("{self}_agent")
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentRole::Sales => write!(f, "sales"),
            AgentRole::Medical => write!(f, "medical"),
        }
    }
}

/// One row of the dispatch table.
struct RouteRule {
    keywords: Vec<String>,
    role: AgentRole,
}

/// Keyword-table router.
pub struct AgentRouter {
    rules: Vec<RouteRule>,
    default_role: AgentRole,
}

impl AgentRouter {
    /// Build the standard table: specialist vocabulary routes to the
    /// medical role, everything else to sales.
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self {
            rules: vec![RouteRule {
                keywords: config
                    .specialist_keywords
                    .iter()
                    .map(|k| k.to_lowercase())
                    .collect(),
                role: AgentRole::Medical,
            }],
            default_role: AgentRole::Sales,
        }
    }

    /// Add a rule ahead of the default. Later rules are checked after
    /// earlier ones.
    pub fn with_rule(mut self, keywords: Vec<String>, role: AgentRole) -> Self {
        self.rules.push(RouteRule {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            role,
        });
        self
    }

    /// Select the role for a query. Pure lookup, no per-request state.
    pub fn select_role(&self, query: &str) -> AgentRole {
        let query_lower = query.to_lowercase();

        for rule in &self.rules {
            if rule.keywords.iter().any(|kw| query_lower.contains(kw.as_str())) {
                return rule.role;
            }
        }

        self.default_role
    }
}

/// Dispatch table from role to generation path.
#[derive(Default)]
pub struct AgentRegistry {
    generators: HashMap<AgentRole, Arc<dyn ResponseGenerator>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire a role to a generator.
    pub fn register(&mut self, role: AgentRole, generator: Arc<dyn ResponseGenerator>) {
        self.generators.insert(role, generator);
    }

    /// Look up the generator for a role, if one is wired.
    pub fn generator_for(&self, role: AgentRole) -> Option<Arc<dyn ResponseGenerator>> {
        self.generators.get(&role).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_router() -> AgentRouter {
        AgentRouter::from_config(&RoutingConfig::default())
    }

    #[test]
    fn test_default_role_is_sales() {
        let router = make_router();
        assert_eq!(
            router.select_role("How do I handle a cost objection?"),
            AgentRole::Sales
        );
    }

    #[test]
    fn test_specialist_keyword_routes_to_medical() {
        let router = make_router();
        assert_eq!(
            router.select_role("What is the mechanism of action?"),
            AgentRole::Medical
        );
        assert_eq!(
            router.select_role("Any drug INTERACTION concerns?"),
            AgentRole::Medical
        );
    }

    #[test]
    fn test_table_is_extensible() {
        let router = make_router().with_rule(vec!["mechanism".to_string()], AgentRole::Sales);

        // Earlier rules win; the medical rule still fires first.
        assert_eq!(
            router.select_role("explain the mechanism"),
            AgentRole::Medical
        );
    }

    #[test]
    fn test_agent_label_format() {
        assert_eq!(AgentRole::Sales.agent_label(), "sales_agent");
        assert_eq!(AgentRole::Medical.agent_label(), "medical_agent");
    }

    #[test]
    fn test_registry_lookup() {
        let registry = AgentRegistry::new();
        assert!(registry.generator_for(AgentRole::Medical).is_none());
    }
}

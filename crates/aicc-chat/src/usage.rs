//! Token and latency accounting per handling agent.

use std::collections::HashMap;

/// Cumulative counters for a set of answered requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageTotals {
    pub tokens: u64,
    pub latency_ms: u64,
    pub requests: u64,
}

impl UsageTotals {
    pub fn average_latency_ms(&self) -> Option<u64> {
        self.latency_ms.checked_div(self.requests)
    }

    fn add(&mut self, tokens: u64, latency_ms: u64) {
        self.tokens = self.tokens.saturating_add(tokens);
        self.latency_ms = self.latency_ms.saturating_add(latency_ms);
        self.requests += 1;
    }
}

/// Tracks usage overall and broken down by the agent that answered.
#[derive(Debug, Clone, Default)]
pub struct UsageTracker {
    total: UsageTotals,
    by_agent: HashMap<String, UsageTotals>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one answered request.
    pub fn record(&mut self, agent_id: &str, tokens: u64, latency_ms: u64) {
        self.total.add(tokens, latency_ms);
        self.by_agent
            .entry(agent_id.to_string())
            .or_default()
            .add(tokens, latency_ms);
    }

    pub fn total(&self) -> &UsageTotals {
        &self.total
    }

    pub fn for_agent(&self, agent_id: &str) -> Option<&UsageTotals> {
        self.by_agent.get(agent_id)
    }

    /// Agents seen so far, sorted by id.
    pub fn agents(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.by_agent.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn reset(&mut self) {
        self.total = UsageTotals::default();
        self.by_agent.clear();
    }
}

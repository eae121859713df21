//! Plain-text formatting for transcripts, traces and listings.

use aicc_chat::api::{AgentInfo, ConversationDetail, ConversationSummary, Page};
use aicc_chat::{AgentStep, Role, Turn, UsageTracker};
use chrono::{DateTime, Utc};

const PREVIEW_CHARS: usize = 80;

pub fn turn(turn: &Turn, show_costs: bool) -> String {
    match turn.role {
        Role::User => format!("you> {}", turn.content),
        Role::System => format!("! {}", turn.content),
        Role::Assistant => {
            let agent = turn.agent_id.as_deref().unwrap_or("agent");
            let mut out = format!("{agent}> {}", turn.content);
            if show_costs {
                if let (Some(tokens), Some(latency)) = (turn.tokens, turn.latency_ms) {
                    out.push_str(&format!("\n  ({tokens} tokens, {latency} ms)"));
                }
            }
            out
        }
    }
}

pub fn steps(steps: &[AgentStep]) -> String {
    if steps.is_empty() {
        return "  (no steps recorded)".to_string();
    }

    let mut out = Vec::with_capacity(steps.len());
    for (i, step) in steps.iter().enumerate() {
        let mut line = format!("  {}. {}", i + 1, step.step_name);
        if let Some(status) = &step.status {
            line.push_str(&format!(" [{status}]"));
        }
        if let Some(ms) = step.duration_ms {
            line.push_str(&format!(" {ms} ms"));
        }
        if let Some(input) = &step.input {
            line.push_str(&format!("\n       in:  {}", preview(input)));
        }
        if let Some(output) = &step.output {
            line.push_str(&format!("\n       out: {}", preview(output)));
        }
        out.push(line);
    }
    out.join("\n")
}

/// Compact one-line preview of a step payload.
fn preview(value: &serde_json::Value) -> String {
    let text = match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    truncate(&text, PREVIEW_CHARS)
}

fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}

pub fn usage(tracker: &UsageTracker) -> String {
    let total = tracker.total();
    let mut out = format!(
        "{} requests, {} tokens, {} ms total",
        total.requests, total.tokens, total.latency_ms
    );
    for agent in tracker.agents() {
        if let Some(t) = tracker.for_agent(agent) {
            out.push_str(&format!(
                "\n  {agent}: {} requests, {} tokens, avg {} ms",
                t.requests,
                t.tokens,
                t.average_latency_ms().unwrap_or(0)
            ));
        }
    }
    out
}

pub fn agents(agents: &[AgentInfo]) -> String {
    if agents.is_empty() {
        return "no agents deployed".to_string();
    }

    let mut lines = vec![format!(
        "{:<20} {:<24} {:<10} {:>8} {:>8} {:>10}",
        "ID", "NAME", "VERSION", "RUNS", "SUCCESS", "AVG MS"
    )];
    for agent in agents {
        let (runs, success, latency) = match &agent.stats {
            Some(s) => (
                s.total_runs.to_string(),
                format!("{:.1}%", s.success_rate),
                format!("{:.0}", s.avg_latency_ms),
            ),
            None => ("-".into(), "-".into(), "-".into()),
        };
        lines.push(format!(
            "{:<20} {:<24} {:<10} {:>8} {:>8} {:>10}",
            agent.id, agent.name, agent.version, runs, success, latency
        ));
    }
    lines.join("\n")
}

fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

pub fn conversations(page: &Page<ConversationSummary>) -> String {
    if page.items.is_empty() {
        return "no conversations".to_string();
    }

    let mut lines = vec![format!(
        "{:<38} {:<10} {:<18} {:<10} {:>5}  {}",
        "ID", "CHANNEL", "AGENT", "STATUS", "MSGS", "UPDATED"
    )];
    for c in &page.items {
        lines.push(format!(
            "{:<38} {:<10} {:<18} {:<10} {:>5}  {}",
            c.id,
            c.channel,
            c.agent_id.as_deref().unwrap_or("-"),
            c.status,
            c.message_count,
            timestamp(&c.updated_at)
        ));
    }

    let shown_to = page.skip + page.items.len() as u64;
    let mut footer = format!("showing {}-{} of {}", page.skip + 1, shown_to, page.total);
    if page.has_more() {
        footer.push_str(&format!(" (next: --skip {shown_to})"));
    }
    lines.push(footer);
    lines.join("\n")
}

pub fn conversation(detail: &ConversationDetail) -> String {
    let s = &detail.summary;
    let mut lines = vec![
        format!("conversation {}", s.id),
        format!(
            "  channel: {}  agent: {}  status: {}",
            s.channel,
            s.agent_id.as_deref().unwrap_or("-"),
            s.status
        ),
        format!("  started: {}", timestamp(&s.created_at)),
    ];
    if let Some(wf) = &s.workflow_id {
        lines.push(format!("  workflow: {wf}"));
    }
    lines.push(format!(
        "  {} messages, {} tokens, {} ms",
        detail.messages.len(),
        detail.total_tokens,
        detail.total_latency_ms
    ));
    lines.push(String::new());

    for m in &detail.messages {
        let who = match &m.tool_name {
            Some(tool) => format!("{} ({tool})", m.role),
            None => m.role.clone(),
        };
        lines.push(format!("[{}] {who}: {}", timestamp(&m.created_at), m.content));
    }
    lines.join("\n")
}

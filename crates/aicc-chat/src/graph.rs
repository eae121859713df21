//! Static execution graphs for the known agent families.
//!
//! The backend reports steps by name (`retrieve_docs`, `classify`, ...);
//! the graphs here map those names onto a fixed linear pipeline so a view
//! can show which stage an exchange reached.

use crate::types::AgentStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Start,
    Process,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphNode {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: NodeKind,
}

#[derive(Debug, PartialEq, Eq)]
pub struct AgentGraph {
    /// Family key (`doc`, `incident`, `slack`).
    pub key: &'static str,
    pub nodes: &'static [GraphNode],
    pub edges: &'static [(&'static str, &'static str)],
}

const fn node(id: &'static str, label: &'static str, kind: NodeKind) -> GraphNode {
    GraphNode { id, label, kind }
}

const START: GraphNode = node("start", "START", NodeKind::Start);
const END: GraphNode = node("end", "END", NodeKind::End);

static GRAPHS: [AgentGraph; 3] = [
    AgentGraph {
        key: "doc",
        nodes: &[
            START,
            node("retrieve", "Retrieve Docs", NodeKind::Process),
            node("generate", "Generate Response", NodeKind::Process),
            END,
        ],
        edges: &[("start", "retrieve"), ("retrieve", "generate"), ("generate", "end")],
    },
    AgentGraph {
        key: "incident",
        nodes: &[
            START,
            node("classify", "Classify Incident", NodeKind::Process),
            node("evaluate", "Evaluate Severity", NodeKind::Process),
            node("action", "Propose Action", NodeKind::Process),
            END,
        ],
        edges: &[
            ("start", "classify"),
            ("classify", "evaluate"),
            ("evaluate", "action"),
            ("action", "end"),
        ],
    },
    AgentGraph {
        key: "slack",
        nodes: &[
            START,
            node("read", "Read Thread", NodeKind::Process),
            node("summarize", "Summarize", NodeKind::Process),
            node("extract", "Extract Items", NodeKind::Process),
            END,
        ],
        edges: &[
            ("start", "read"),
            ("read", "summarize"),
            ("summarize", "extract"),
            ("extract", "end"),
        ],
    },
];

/// Graph for an agent id such as `doc-agent` or `Incident-Responder`.
///
/// Matches the first family key contained in the lowercased id and falls
/// back to the `doc` graph.
pub fn graph_for_agent(agent_id: &str) -> &'static AgentGraph {
    let lowered = agent_id.to_lowercase();
    GRAPHS
        .iter()
        .find(|g| lowered.contains(g.key))
        .unwrap_or(&GRAPHS[0])
}

impl AgentGraph {
    pub fn all() -> &'static [AgentGraph] {
        &GRAPHS
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn process_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Process)
    }

    /// Process node a reported step name corresponds to.
    ///
    /// An exact id match wins; otherwise the first process node whose id is
    /// contained in the step name (`retrieve_docs` -> `retrieve`).
    pub fn active_node(&self, step_name: &str) -> Option<&GraphNode> {
        let step = step_name.to_lowercase();
        self.process_nodes()
            .find(|n| n.id == step)
            .or_else(|| self.process_nodes().find(|n| step.contains(n.id)))
    }

    /// Node reached by the last recognised step of a trace.
    pub fn active_for_trace(&self, steps: &[AgentStep]) -> Option<&GraphNode> {
        steps
            .iter()
            .rev()
            .find_map(|s| self.active_node(&s.step_name))
    }

    /// Nodes in execution order, following edges from the start node.
    pub fn path(&self) -> Vec<&GraphNode> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut current = self.nodes.iter().find(|n| n.kind == NodeKind::Start);
        while let Some(node) = current {
            if out.iter().any(|seen: &&GraphNode| seen.id == node.id) {
                break;
            }
            out.push(node);
            current = self
                .edges
                .iter()
                .find(|(from, _)| *from == node.id)
                .and_then(|(_, to)| self.node(to));
        }
        out
    }

    /// `(node, highlighted)` pairs in execution order for a current step.
    pub fn highlight(&self, step_name: Option<&str>) -> Vec<(&GraphNode, bool)> {
        let active = step_name.and_then(|s| self.active_node(s)).map(|n| n.id);
        self.path()
            .into_iter()
            .map(|n| (n, Some(n.id) == active))
            .collect()
    }

    /// One-line text form: `START -> [*Retrieve Docs*] -> [Generate Response] -> END`.
    pub fn render(&self, step_name: Option<&str>) -> String {
        self.highlight(step_name)
            .into_iter()
            .map(|(node, active)| match (node.kind, active) {
                (NodeKind::Process, true) => format!("[*{}*]", node.label),
                (NodeKind::Process, false) => format!("[{}]", node.label),
                _ => node.label.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

//! # Graph Model
//!
//! Node and edge records as the editor stores them, and [`GraphIndex`], the
//! lookup maps each compile or preview call builds over a snapshot.
//!
//! Nodes travel as `{ id, type, data, ...editor fields }`. The `type` tag is
//! folded into [`NodeKind`]; `data` members the kind doesn't understand and
//! node-level members the core never reads (`position`, `measured`, ...) are
//! kept verbatim so a load/save cycle doesn't lose editor state.

use crate::config::SlotOrder;
use crate::error::GraphError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

/// Color used when a color input is empty or missing
pub const DEFAULT_COLOR: &str = "oklch(0.5 0.2 180)";

/// Unique identifier of a node within a graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which of the two opposite formulas a paired operation applies
///
/// `Up` is lighten/saturate/add/multiply, `Down` is
/// darken/desaturate/subtract/divide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Up,
    Down,
}

impl Direction {
    /// Resolve a stored mode flag, falling back to the declared type tag
    fn resolve(flag: Option<bool>, declared_down: bool) -> Self {
        if flag.unwrap_or(declared_down) {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    pub fn is_down(self) -> bool {
        self == Direction::Down
    }
}

/// Closed set of node kinds, each carrying only the payload it needs
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    InputColor { name: String, color: String },
    InputNumber { name: String, value: f64 },
    Output { name: String },
    Lighten(Direction),
    Saturate(Direction),
    Rotate,
    Mix,
    Invert,
    Complementary,
    Add(Direction),
    Multiply(Direction),
}

impl NodeKind {
    /// Payload the editor assigns to a freshly placed node of type `tag`
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "inputColor" => NodeKind::InputColor {
                name: String::new(),
                color: DEFAULT_COLOR.to_string(),
            },
            "inputNumber" => NodeKind::InputNumber {
                name: String::new(),
                value: 0.0,
            },
            "output" => NodeKind::Output { name: String::new() },
            "lighten" => NodeKind::Lighten(Direction::Up),
            "darken" => NodeKind::Lighten(Direction::Down),
            "saturate" => NodeKind::Saturate(Direction::Up),
            "desaturate" => NodeKind::Saturate(Direction::Down),
            "rotate" => NodeKind::Rotate,
            "mix" => NodeKind::Mix,
            "invert" => NodeKind::Invert,
            "complementary" => NodeKind::Complementary,
            "add" => NodeKind::Add(Direction::Up),
            "subtract" => NodeKind::Add(Direction::Down),
            "multiply" => NodeKind::Multiply(Direction::Up),
            "divide" => NodeKind::Multiply(Direction::Down),
            _ => return None,
        };
        Some(kind)
    }

    /// The `type` tag written to JSON
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::InputColor { .. } => "inputColor",
            NodeKind::InputNumber { .. } => "inputNumber",
            NodeKind::Output { .. } => "output",
            NodeKind::Lighten(Direction::Up) => "lighten",
            NodeKind::Lighten(Direction::Down) => "darken",
            NodeKind::Saturate(Direction::Up) => "saturate",
            NodeKind::Saturate(Direction::Down) => "desaturate",
            NodeKind::Rotate => "rotate",
            NodeKind::Mix => "mix",
            NodeKind::Invert => "invert",
            NodeKind::Complementary => "complementary",
            NodeKind::Add(Direction::Up) => "add",
            NodeKind::Add(Direction::Down) => "subtract",
            NodeKind::Multiply(Direction::Up) => "multiply",
            NodeKind::Multiply(Direction::Down) => "divide",
        }
    }

    /// Exported custom-property identifier, for sources and outputs
    pub fn export_name(&self) -> Option<&str> {
        match self {
            NodeKind::InputColor { name, .. }
            | NodeKind::InputNumber { name, .. }
            | NodeKind::Output { name } => Some(name),
            _ => None,
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self, NodeKind::InputColor { .. } | NodeKind::InputNumber { .. })
    }

    pub fn is_output(&self) -> bool {
        matches!(self, NodeKind::Output { .. })
    }

    fn flag_key(&self) -> Option<(&'static str, Direction)> {
        match *self {
            NodeKind::Lighten(d) => Some(("isDarken", d)),
            NodeKind::Saturate(d) => Some(("isDesaturate", d)),
            NodeKind::Add(d) => Some(("isSubtract", d)),
            NodeKind::Multiply(d) => Some(("isDivide", d)),
            _ => None,
        }
    }
}

/// A node in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// `data` members not understood by `kind`
    pub extra_data: Map<String, Value>,
    /// Node-level members owned by the editor (position, measured size, ...)
    pub editor: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            extra_data: Map::new(),
            editor: Map::new(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawNode {
    id: NodeId,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Map<String, Value>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl TryFrom<RawNode> for Node {
    type Error = GraphError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let RawNode {
            id,
            kind: tag,
            mut data,
            rest,
        } = raw;

        let kind = match tag.as_str() {
            "inputColor" => NodeKind::InputColor {
                name: take_string(&mut data, "name"),
                color: take_string(&mut data, "color"),
            },
            "inputNumber" => NodeKind::InputNumber {
                name: take_string(&mut data, "name"),
                value: take_number(&mut data, "value"),
            },
            "output" => NodeKind::Output {
                name: take_string(&mut data, "name"),
            },
            "lighten" | "darken" => NodeKind::Lighten(Direction::resolve(
                take_flag(&mut data, "isDarken"),
                tag == "darken",
            )),
            "saturate" | "desaturate" => NodeKind::Saturate(Direction::resolve(
                take_flag(&mut data, "isDesaturate"),
                tag == "desaturate",
            )),
            "add" | "subtract" => NodeKind::Add(Direction::resolve(
                take_flag(&mut data, "isSubtract"),
                tag == "subtract",
            )),
            "multiply" | "divide" => NodeKind::Multiply(Direction::resolve(
                take_flag(&mut data, "isDivide"),
                tag == "divide",
            )),
            other => NodeKind::from_tag(other).ok_or_else(|| GraphError::UnknownNodeKind {
                id: id.to_string(),
                kind: other.to_string(),
            })?,
        };

        Ok(Node {
            id,
            kind,
            extra_data: data,
            editor: rest,
        })
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        let mut data = node.extra_data;
        match &node.kind {
            NodeKind::InputColor { name, color } => {
                data.insert("name".into(), Value::String(name.clone()));
                data.insert("color".into(), Value::String(color.clone()));
            }
            NodeKind::InputNumber { name, value } => {
                data.insert("name".into(), Value::String(name.clone()));
                data.insert("value".into(), number_value(*value));
            }
            NodeKind::Output { name } => {
                data.insert("name".into(), Value::String(name.clone()));
            }
            kind => {
                if let Some((key, direction)) = kind.flag_key() {
                    data.insert(key.into(), Value::Bool(direction.is_down()));
                }
            }
        }

        RawNode {
            id: node.id,
            kind: node.kind.tag().to_string(),
            data,
            rest: node.editor,
        }
    }
}

fn take_string(data: &mut Map<String, Value>, key: &str) -> String {
    match data.remove(key) {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn take_number(data: &mut Map<String, Value>, key: &str) -> f64 {
    match data.remove(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => crate::ops::parse_float(&s).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn take_flag(data: &mut Map<String, Value>, key: &str) -> Option<bool> {
    match data.remove(key) {
        Some(Value::Bool(flag)) => Some(flag),
        _ => None,
    }
}

/// Whole numbers are written as JSON integers, matching what the editor saves
fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// A connection from one node's output to one input slot of another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(default)]
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// Input slot on the target (`"input-0"`, `"input-1"`); absent for
    /// single-input nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            extra: Map::new(),
        }
    }

    pub fn with_target_handle(mut self, handle: impl Into<String>) -> Self {
        self.target_handle = Some(handle.into());
        self
    }
}

/// An immutable graph snapshot handed over by the editor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id
    pub fn add_node(&mut self, id: impl Into<NodeId>, kind: NodeKind) -> NodeId {
        let node = Node::new(id, kind);
        let id = node.id.clone();
        self.nodes.push(node);
        id
    }

    /// Connect `source` to `target`, optionally into a named input slot
    pub fn connect(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        target_handle: Option<&str>,
    ) -> &Edge {
        let source = source.into();
        let target = target.into();
        let id = format!(
            "edge-{}-{}-{}",
            source,
            target,
            target_handle.unwrap_or("in")
        );
        let mut edge = Edge::new(id, source, target);
        edge.target_handle = target_handle.map(str::to_string);
        self.edges.push(edge);
        &self.edges[self.edges.len() - 1]
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id.as_str() == id)
    }

    /// Build the lookup maps for this snapshot
    pub fn index(&self) -> GraphIndex<'_> {
        GraphIndex::build(self)
    }
}

/// Lookup maps over a borrowed [`Graph`]
///
/// When ids collide the last node wins, matching how the editor builds its
/// own id map.
#[derive(Debug)]
pub struct GraphIndex<'a> {
    graph: &'a Graph,
    nodes: IndexMap<&'a str, &'a Node>,
    incoming: HashMap<&'a str, Vec<&'a Edge>>,
}

impl<'a> GraphIndex<'a> {
    pub fn build(graph: &'a Graph) -> Self {
        let mut nodes = IndexMap::with_capacity(graph.nodes.len());
        for node in &graph.nodes {
            nodes.insert(node.id.as_str(), node);
        }

        let mut incoming: HashMap<&str, Vec<&Edge>> = HashMap::new();
        for edge in &graph.edges {
            incoming.entry(edge.target.as_str()).or_default().push(edge);
        }

        Self {
            graph,
            nodes,
            incoming,
        }
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.nodes.get(id).copied()
    }

    /// Edges feeding `id`, in snapshot order
    pub fn incoming(&self, id: &str) -> &[&'a Edge] {
        self.incoming.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The edge feeding a single-input node (the first one, if several)
    pub fn producer_edge(&self, id: &str) -> Option<&'a Edge> {
        self.incoming(id).first().copied()
    }

    /// Edges feeding `id`, ordered by input slot
    pub fn input_edges(&self, id: &str, order: SlotOrder) -> Vec<&'a Edge> {
        let mut edges = self.incoming(id).to_vec();
        edges.sort_by(|a, b| order.compare(a.target_handle.as_deref(), b.target_handle.as_deref()));
        edges
    }

    /// Output nodes in snapshot order
    pub fn outputs(&self) -> Vec<&'a Node> {
        self.graph
            .nodes
            .iter()
            .filter(|node| node.kind.is_output())
            .collect()
    }
}

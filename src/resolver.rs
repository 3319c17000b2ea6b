//! # Dependency Resolver
//!
//! Orders output nodes so that an output whose producer sits upstream of
//! another output's producer is emitted first. The compiler binds each
//! emitted producer to its output name, so later outputs can reference the
//! earlier one through `var(--name)` instead of re-expanding it.

use crate::graph::{GraphIndex, Node, NodeId};
use std::collections::{HashMap, HashSet};

/// Output emission order
#[derive(Debug)]
pub struct Resolution<'a> {
    pub order: Vec<&'a Node>,
    /// Outputs that were flushed in snapshot order because no pending output
    /// was free of dependencies
    pub cycle: Vec<NodeId>,
}

/// Order every output node of the indexed graph
///
/// Output A depends on output B when both have producers and B's producer is
/// reachable from A's producer by walking edges backward. Outputs sharing one
/// producer are independent. Each round emits the first pending output (in
/// snapshot order) with no pending dependency; if none qualifies the rest are
/// flushed as-is.
pub fn order_outputs<'a>(index: &GraphIndex<'a>) -> Resolution<'a> {
    let outputs = index.outputs();

    let producers: HashMap<&str, &str> = outputs
        .iter()
        .filter_map(|output| {
            index
                .producer_edge(output.id.as_str())
                .map(|edge| (output.id.as_str(), edge.source.as_str()))
        })
        .collect();

    let upstream: HashMap<&str, HashSet<&str>> = producers
        .values()
        .map(|&producer| (producer, ancestors(index, producer)))
        .collect();

    let depends_on = |a: &Node, b: &Node| -> bool {
        if a.id == b.id {
            return false;
        }
        match (producers.get(a.id.as_str()), producers.get(b.id.as_str())) {
            (Some(pa), Some(pb)) => upstream.get(pa).is_some_and(|set| set.contains(pb)),
            _ => false,
        }
    };

    let mut pending = outputs;
    let mut order = Vec::with_capacity(pending.len());
    let mut cycle = Vec::new();

    while !pending.is_empty() {
        let ready = pending
            .iter()
            .position(|&a| !pending.iter().any(|&b| depends_on(a, b)));

        match ready {
            Some(i) => order.push(pending.remove(i)),
            None => {
                cycle.extend(pending.iter().map(|node| node.id.clone()));
                tracing::warn!(
                    "[OCGC] {} outputs depend on each other; emitting them in snapshot order",
                    pending.len()
                );
                order.append(&mut pending);
            }
        }
    }

    Resolution { order, cycle }
}

/// Every node reachable from `start` by walking edges backward
fn ancestors<'a>(index: &GraphIndex<'a>, start: &str) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    let mut stack: Vec<&'a str> = index
        .incoming(start)
        .iter()
        .map(|&edge| edge.source.as_str())
        .collect();

    while let Some(id) = stack.pop() {
        if seen.insert(id) {
            stack.extend(index.incoming(id).iter().map(|&edge| edge.source.as_str()));
        }
    }

    seen
}

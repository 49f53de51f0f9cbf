use std::collections::{BTreeMap, BTreeSet};

use crate::models::WorkItem;

/// Render the mermaid flowchart: one node per item, a solid edge from each
/// dependency to its dependent, a dashed edge from each item to what it blocks.
pub fn render_dependencies_graph(items: &[WorkItem]) -> String {
    let mut graph = String::from("```mermaid\ngraph TD\n");

    for item in items {
        graph.push_str(&format!("  {}[\"{}\"]\n", item.id, escape_label(&item.title)));
    }

    for item in items {
        for dep in &item.dependencies {
            graph.push_str(&format!("  {dep} --> {}\n", item.id));
        }
        for blocked in &item.blocks {
            graph.push_str(&format!("  {} -.-> {blocked}\n", item.id));
        }
    }

    graph.push_str("```\n");
    graph
}

fn escape_label(title: &str) -> String {
    title.replace('"', "#quot;")
}

/// Find cycles over both edge kinds. Each cycle is listed once, starting
/// from its first node in id order.
pub fn find_cycles(items: &[WorkItem]) -> Vec<Vec<String>> {
    let mut edges: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for item in items {
        edges.entry(item.id.as_str()).or_default();
        for dep in &item.dependencies {
            edges.entry(dep.as_str()).or_default().insert(item.id.as_str());
        }
        for blocked in &item.blocks {
            edges.entry(item.id.as_str()).or_default().insert(blocked.as_str());
        }
    }

    let mut cycles = Vec::new();
    let mut seen: BTreeSet<Vec<String>> = BTreeSet::new();
    let mut done: BTreeSet<&str> = BTreeSet::new();

    fn visit<'a>(
        node: &'a str,
        edges: &BTreeMap<&'a str, BTreeSet<&'a str>>,
        path: &mut Vec<&'a str>,
        done: &mut BTreeSet<&'a str>,
        seen: &mut BTreeSet<Vec<String>>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        if let Some(start) = path.iter().position(|n| *n == node) {
            let cycle = normalize(&path[start..]);
            if seen.insert(cycle.clone()) {
                cycles.push(cycle);
            }
            return;
        }
        if done.contains(node) {
            return;
        }

        path.push(node);
        if let Some(next) = edges.get(node) {
            for &target in next {
                visit(target, edges, path, done, seen, cycles);
            }
        }
        path.pop();
        done.insert(node);
    }

    for &node in edges.keys() {
        let mut path = Vec::new();
        visit(node, &edges, &mut path, &mut done, &mut seen, &mut cycles);
    }

    cycles
}

/// Rotate so the smallest id comes first.
fn normalize(cycle: &[&str]) -> Vec<String> {
    let start = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| **id)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    cycle[start..]
        .iter()
        .chain(cycle[..start].iter())
        .map(|s| s.to_string())
        .collect()
}

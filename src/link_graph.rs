use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rand::Rng;
use std::collections::HashMap;

use crate::crawler::Relation;

/// Fill colors by minimum incoming depth, anything deeper is gray
const DEPTH_PALETTE: [[u8; 3]; 6] = [
    [255, 0, 0],     // red
    [0, 128, 0],     // green
    [255, 165, 0],   // orange
    [135, 206, 235], // skyblue
    [255, 255, 0],   // yellow
    [128, 0, 128],   // purple
];
const GRAY: [u8; 3] = [128, 128, 128];

const LAYOUT_ITERATIONS: usize = 300;
const JITTER: f32 = 0.02;
const LAYOUT_SCALE: f32 = 2.5;

/// Directed multigraph of domains, edge weight = discovery depth
pub struct RelationGraph {
    pub graph: DiGraph<String, usize>,
    nodes: HashMap<String, NodeIndex>,
}

impl RelationGraph {
    pub fn from_relations(relations: &[Relation]) -> Self {
        let mut graph = Self {
            graph: DiGraph::new(),
            nodes: HashMap::new(),
        };
        for r in relations {
            let source = graph.node(r.source.as_str());
            let target = graph.node(r.target.as_str());
            graph.graph.add_edge(source, target, r.depth);
        }
        graph
    }

    fn node(&mut self, domain: &str) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(domain) {
            return idx;
        }
        let idx = self.graph.add_node(domain.to_string());
        self.nodes.insert(domain.to_string(), idx);
        idx
    }

    pub fn index_of(&self, domain: &str) -> Option<NodeIndex> {
        self.nodes.get(domain).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Smallest depth among incoming edges, 0 for nodes nobody points at (the seed)
    pub fn min_incoming_depth(&self, node: NodeIndex) -> usize {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .map(|e| *e.weight())
            .min()
            .unwrap_or(0)
    }

    /// Force-directed positions on the undirected view, jittered and scaled.
    /// Positions are roughly within [-2.5, 2.5] on both axes.
    pub fn layout(&self) -> Vec<[f32; 2]> {
        let n = self.graph.node_count();
        if n == 0 {
            return Vec::new();
        }
        let mut rng = rand::rng();

        // start on a circle so the result doesn't depend on luck alone
        let mut pos: Vec<[f32; 2]> = (0..n)
            .map(|i| {
                let angle = i as f32 / n as f32 * std::f32::consts::TAU;
                [angle.cos(), angle.sin()]
            })
            .collect();

        let area = 4.0_f32;
        let k = (area / n as f32).sqrt();
        let mut temperature = 0.1_f32;
        let cooling = temperature / (LAYOUT_ITERATIONS as f32 + 1.0);

        for _ in 0..LAYOUT_ITERATIONS {
            let mut disp = vec![[0.0_f32; 2]; n];

            for i in 0..n {
                for j in (i + 1)..n {
                    let dx = pos[i][0] - pos[j][0];
                    let dy = pos[i][1] - pos[j][1];
                    let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                    let force = k * k / dist;
                    disp[i][0] += dx / dist * force;
                    disp[i][1] += dy / dist * force;
                    disp[j][0] -= dx / dist * force;
                    disp[j][1] -= dy / dist * force;
                }
            }

            for edge in self.graph.edge_references() {
                let (a, b) = (edge.source().index(), edge.target().index());
                if a == b {
                    continue;
                }
                let dx = pos[a][0] - pos[b][0];
                let dy = pos[a][1] - pos[b][1];
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                let force = dist * dist / k;
                disp[a][0] -= dx / dist * force;
                disp[a][1] -= dy / dist * force;
                disp[b][0] += dx / dist * force;
                disp[b][1] += dy / dist * force;
            }

            for (p, d) in pos.iter_mut().zip(&disp) {
                let len = (d[0] * d[0] + d[1] * d[1]).sqrt().max(0.0001);
                let step = len.min(temperature);
                p[0] = (p[0] + d[0] / len * step).clamp(-1.0, 1.0);
                p[1] = (p[1] + d[1] / len * step).clamp(-1.0, 1.0);
            }
            temperature -= cooling;
        }

        pos.into_iter()
            .map(|[x, y]| {
                let x = x + rng.random_range(-JITTER..JITTER);
                let y = y + rng.random_range(-JITTER..JITTER);
                [x * LAYOUT_SCALE, y * LAYOUT_SCALE]
            })
            .collect()
    }
}

pub fn node_size(min_depth: usize) -> usize {
    5000 / (min_depth + 1)
}

pub fn node_color(min_depth: usize) -> [u8; 3] {
    DEPTH_PALETTE.get(min_depth).copied().unwrap_or(GRAY)
}

pub fn random_edge_color() -> [u8; 3] {
    let mut rng = rand::rng();
    [rng.random(), rng.random(), rng.random()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::DomainKey;

    fn relation(source: &str, target: &str, depth: usize) -> Relation {
        Relation::new(DomainKey::from(source), DomainKey::from(target), depth)
    }

    fn sample() -> RelationGraph {
        RelationGraph::from_relations(&[
            relation("a.test", "b.test", 1),
            relation("a.test", "c.test", 1),
            relation("c.test", "d.test", 2),
            relation("b.test", "d.test", 3),
        ])
    }

    #[test]
    fn test_nodes_are_unique_per_domain() {
        let graph = sample();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_parallel_edges_are_kept() {
        let graph = RelationGraph::from_relations(&[
            relation("a.test", "b.test", 1),
            relation("a.test", "b.test", 2),
        ]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_min_incoming_depth() {
        let graph = sample();
        let depth = |d: &str| graph.min_incoming_depth(graph.index_of(d).unwrap());
        assert_eq!(depth("a.test"), 0);
        assert_eq!(depth("b.test"), 1);
        assert_eq!(depth("d.test"), 2);
    }

    #[test]
    fn test_size_and_color_by_depth() {
        assert_eq!(node_size(0), 5000);
        assert_eq!(node_size(1), 2500);
        assert_eq!(node_size(4), 1000);
        assert_eq!(node_color(0), [255, 0, 0]);
        assert_eq!(node_color(5), [128, 0, 128]);
        assert_eq!(node_color(6), GRAY);
        assert_eq!(node_color(42), GRAY);
    }

    #[test]
    fn test_layout_is_bounded() {
        let graph = sample();
        let pos = graph.layout();
        assert_eq!(pos.len(), graph.node_count());
        let limit = (1.0 + JITTER) * LAYOUT_SCALE;
        for [x, y] in pos {
            assert!(x.is_finite() && y.is_finite());
            assert!(x.abs() <= limit && y.abs() <= limit);
        }
    }

    #[test]
    fn test_empty_graph_layout() {
        assert!(RelationGraph::from_relations(&[]).layout().is_empty());
    }
}

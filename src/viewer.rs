use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use log2::info;

use crate::crawler::Relation;
use crate::link_graph::{RelationGraph, node_color, node_size, random_edge_color};

const WINDOW_TITLE: &str = "Website Relations Graph";

struct DrawnNode {
    label: String,
    pos: [f32; 2],
    radius: f32,
    color: Color32,
}

struct DrawnEdge {
    from: usize,
    to: usize,
    color: Color32,
}

/// Layout and colors are computed once, so the picture stays still while the window is open
struct RelationsView {
    nodes: Vec<DrawnNode>,
    edges: Vec<DrawnEdge>,
}

fn rgb([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgb(r, g, b)
}

impl RelationsView {
    fn new(graph: &RelationGraph) -> Self {
        let positions = graph.layout();
        let nodes = graph
            .graph
            .node_indices()
            .map(|idx| {
                let min_depth = graph.min_incoming_depth(idx);
                DrawnNode {
                    label: graph.graph[idx].clone(),
                    pos: positions[idx.index()],
                    // node_size is an area in the original scale
                    radius: (node_size(min_depth) as f32).sqrt() / 3.0,
                    color: rgb(node_color(min_depth)),
                }
            })
            .collect();
        let edges = graph
            .graph
            .raw_edges()
            .iter()
            .map(|e| DrawnEdge {
                from: e.source().index(),
                to: e.target().index(),
                color: rgb(random_edge_color()),
            })
            .collect();

        Self { nodes, edges }
    }

    fn to_screen(rect: Rect, [x, y]: [f32; 2]) -> Pos2 {
        // layout coordinates span about [-2.6, 2.6]
        let half = 2.6;
        let margin = 40.0;
        let w = rect.width() - 2.0 * margin;
        let h = rect.height() - 2.0 * margin;
        Pos2::new(
            rect.left() + margin + (x + half) / (2.0 * half) * w,
            rect.top() + margin + (y + half) / (2.0 * half) * h,
        )
    }
}

impl eframe::App for RelationsView {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(format!(
                "{} ({} sites, {} relations)",
                WINDOW_TITLE,
                self.nodes.len(),
                self.edges.len()
            ));
            let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
            let rect = response.rect;

            for edge in &self.edges {
                let from = Self::to_screen(rect, self.nodes[edge.from].pos);
                let to = Self::to_screen(rect, self.nodes[edge.to].pos);
                painter.line_segment([from, to], Stroke::new(1.5, edge.color));
            }

            for node in &self.nodes {
                let center = Self::to_screen(rect, node.pos);
                painter.circle_filled(center, node.radius, node.color);
                painter.text(
                    center + Vec2::new(0.0, node.radius + 8.0),
                    Align2::CENTER_CENTER,
                    &node.label,
                    FontId::proportional(12.0),
                    ui.visuals().text_color(),
                );
            }
        });
    }
}

/// Opens a window with the relation graph and blocks until it is closed
pub fn show(relations: &[Relation]) -> anyhow::Result<()> {
    let graph = RelationGraph::from_relations(relations);
    info!(
        "Visualizing {} sites and {} relations",
        graph.node_count(),
        graph.edge_count()
    );
    let view = RelationsView::new(&graph);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([1600.0, 1200.0]),
        ..Default::default()
    };

    eframe::run_native(WINDOW_TITLE, options, Box::new(move |_cc| Box::new(view)))
        .map_err(|e| anyhow::anyhow!("Viewer failed: {}", e))
}

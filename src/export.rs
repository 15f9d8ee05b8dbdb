//! Exporting a galaxy's current arrangement.
//!
//! - [`Galaxy::to_description`]: the load shape again, with live positions
//! - [`Galaxy::to_viewer_data`]: flat buffers for the web viewer
//! - [`Galaxy::debug_graphviz`]: GraphViz text for diagnostics

use petgraph::dot::{Config, Dot};
use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use serde::{Deserialize, Serialize};

use crate::description::{GalaxyDescription, SystemRecord};
use crate::galaxy::Galaxy;

/// Flat buffers in the shape the web viewer loads.
///
/// `positions` and `colors` hold three floats per system; `neighbours` holds
/// one `(a, b)` index pair per neighbour relation, `a < b`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerData {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub neighbours: Vec<u32>,
}

impl Galaxy {
    /// The current arrangement as a description.
    ///
    /// Loading the result gives a galaxy whose original positions are this
    /// galaxy's live positions. Everything else round-trips as loaded.
    pub fn to_description(&self) -> GalaxyDescription {
        let systems = self
            .systems()
            .iter()
            .map(|system| SystemRecord {
                name: system.name().to_string(),
                position: system.position().into(),
                neighbours: system.neighbours().iter().map(|n| n.raw()).collect(),
                constrained: system.is_constrained(),
                color: Some(system.color()),
            })
            .collect();

        GalaxyDescription::new(systems).with_seed(self.seed())
    }

    pub fn to_viewer_data(&self) -> ViewerData {
        let mut data = ViewerData {
            positions: Vec::with_capacity(self.len() * 3),
            colors: Vec::with_capacity(self.len() * 3),
            neighbours: Vec::with_capacity(self.edge_count() * 2),
        };

        for system in self.systems() {
            let p = system.position();
            data.positions.extend_from_slice(&[p.x, p.y, p.z]);
            let c = system.color();
            data.colors.extend_from_slice(&[c.r, c.g, c.b]);
        }
        for (a, b) in self.neighbour_pairs() {
            data.neighbours.push(a.raw());
            data.neighbours.push(b.raw());
        }

        data
    }

    /// GraphViz description of the neighbour graph.
    ///
    /// One node per system labelled with its name, one edge per neighbour
    /// pair labelled with the desired distance.
    pub fn debug_graphviz(&self) -> String {
        let mut graph: StableUnGraph<String, f32> =
            StableUnGraph::with_capacity(self.len(), self.edge_count());

        for system in self.systems() {
            graph.add_node(system.name().to_string());
        }
        for (a, b) in self.neighbour_pairs() {
            let desired = self.desired_distance(a, b).unwrap_or_default();
            graph.add_edge(NodeIndex::new(a.slot()), NodeIndex::new(b.slot()), desired);
        }

        format!("{}", Dot::with_config(&graph, &[Config::GraphContentOnly]))
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .fold(String::from("graph galaxy {\n"), |mut out, line| {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
                out
            })
            + "}\n"
    }
}

//! Genome representation for neuro-evolution
//!
//! A genome is the flat, layer-major list of a network's nodes. Each node is
//! the weight vector for its predecessors followed by one trailing bias:
//!
//! ```text
//! [w_1, w_2, ..., w_k, bias]
//! ```
//!
//! where `k` is the number of external inputs for the first layer, or the
//! size of the previous layer otherwise.
//!
//! # Why a flat node list?
//!
//! Genetic operators stay simple on a linear structure:
//! - **Crossover**: swapping a window of nodes is a slice swap
//! - **Mutation**: replacing one weight never changes a node's shape
//! - **Persistence**: the genome serializes as a plain `[[f64]]`
//!
//! The shape is only meaningful together with a [`Topology`], which every
//! operator receives explicitly and uses to reject mismatched genomes.
use crate::error::{NeurotradeError, Result};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One neuron: predecessor weights followed by the bias
pub type Node = Vec<f64>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genome {
    nodes: Vec<Node>,
}

impl Genome {
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Index<usize> for Genome {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        &self.nodes[index]
    }
}

impl IndexMut<usize> for Genome {
    fn index_mut(&mut self, index: usize) -> &mut Node {
        &mut self.nodes[index]
    }
}

/// Network shape shared by every genome of a population.
///
/// `layers` lists hidden layer sizes followed by the output layer size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub inputs: usize,
    pub layers: Vec<usize>,
}

impl Topology {
    pub fn new(inputs: usize, layers: Vec<usize>) -> Result<Self> {
        if inputs == 0 {
            return Err(NeurotradeError::Configuration(
                "Topology needs at least one input".to_string(),
            ));
        }
        if layers.is_empty() {
            return Err(NeurotradeError::Configuration(
                "Topology needs at least an output layer".to_string(),
            ));
        }
        if let Some(pos) = layers.iter().position(|&size| size == 0) {
            return Err(NeurotradeError::Configuration(format!(
                "Layer {} has no nodes",
                pos + 1
            )));
        }
        Ok(Self { inputs, layers })
    }

    pub fn node_count(&self) -> usize {
        self.layers.iter().sum()
    }

    pub fn output_count(&self) -> usize {
        self.layers.last().copied().unwrap_or(0)
    }

    /// Number of values feeding each node of the given zero-based layer
    pub fn predecessor_count(&self, layer: usize) -> usize {
        if layer == 0 {
            self.inputs
        } else {
            self.layers[layer - 1]
        }
    }

    /// Expected length of every node in genome order.
    pub fn node_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.layers
            .iter()
            .enumerate()
            .flat_map(move |(layer, &size)| {
                std::iter::repeat(self.predecessor_count(layer) + 1).take(size)
            })
    }

    /// Zero-based layer number of a flat node index
    pub fn layer_of(&self, node_index: usize) -> Option<usize> {
        let mut boundary = 0;
        for (layer, &size) in self.layers.iter().enumerate() {
            boundary += size;
            if node_index < boundary {
                return Some(layer);
            }
        }
        None
    }

    pub fn check(&self, genome: &Genome) -> Result<()> {
        if genome.is_empty() {
            return Err(NeurotradeError::EmptyGenome);
        }
        if genome.len() != self.node_count() {
            return Err(NeurotradeError::TopologyMismatch(format!(
                "expected {} nodes, genome has {}",
                self.node_count(),
                genome.len()
            )));
        }
        for (index, (node, expected)) in genome.nodes().iter().zip(self.node_lengths()).enumerate() {
            if node.len() != expected {
                return Err(NeurotradeError::TopologyMismatch(format!(
                    "node {} has {} values, expected {}",
                    index,
                    node.len(),
                    expected
                )));
            }
        }
        Ok(())
    }

    pub fn accepts(&self, genome: &Genome) -> bool {
        self.check(genome).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genome_of(lengths: &[usize]) -> Genome {
        Genome::from_nodes(lengths.iter().map(|&len| vec![0.0; len]).collect())
    }

    #[test]
    fn test_node_lengths_follow_layers() {
        let topology = Topology::new(3, vec![2, 1]).unwrap();
        let lengths: Vec<usize> = topology.node_lengths().collect();
        assert_eq!(lengths, vec![4, 4, 3]);
        assert_eq!(topology.node_count(), 3);
        assert_eq!(topology.output_count(), 1);
    }

    #[test]
    fn test_layer_of() {
        let topology = Topology::new(4, vec![3, 2, 2]).unwrap();
        assert_eq!(topology.layer_of(0), Some(0));
        assert_eq!(topology.layer_of(2), Some(0));
        assert_eq!(topology.layer_of(3), Some(1));
        assert_eq!(topology.layer_of(6), Some(2));
        assert_eq!(topology.layer_of(7), None);
    }

    #[test]
    fn test_check_rejects_wrong_shapes() {
        let topology = Topology::new(3, vec![2, 1]).unwrap();
        assert!(topology.check(&genome_of(&[4, 4, 3])).is_ok());
        assert!(matches!(
            topology.check(&genome_of(&[4, 4])),
            Err(NeurotradeError::TopologyMismatch(_))
        ));
        assert!(matches!(
            topology.check(&genome_of(&[4, 3, 3])),
            Err(NeurotradeError::TopologyMismatch(_))
        ));
        assert!(matches!(
            topology.check(&Genome::default()),
            Err(NeurotradeError::EmptyGenome)
        ));
    }

    #[test]
    fn test_rejects_empty_layers() {
        assert!(Topology::new(3, vec![]).is_err());
        assert!(Topology::new(3, vec![2, 0, 1]).is_err());
        assert!(Topology::new(0, vec![1]).is_err());
    }

    #[test]
    fn test_serializes_as_nested_arrays() {
        let genome = Genome::from_nodes(vec![vec![0.5, -0.25], vec![1.0]]);
        let json = serde_json::to_string(&genome).unwrap();
        assert_eq!(json, "[[0.5,-0.25],[1.0]]");
    }
}

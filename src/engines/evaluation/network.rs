//! Feed-forward pass of a genome.
//!
//! Hidden layers use swish, the output layer uses sigmoid, and every
//! activation is rounded to 5 decimals so repeated evaluations stay
//! bit-identical.
use crate::engines::generation::genome::{Genome, Topology};
use crate::error::{NeurotradeError, Result};
use crate::utils::round_weight;

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

pub fn swish(x: f64) -> f64 {
    x * sigmoid(x)
}

/// Run `genome` over `input` and return the output layer.
///
/// `layers` holds hidden sizes followed by the output size. Only the
/// previous layer's values are kept while walking the genome.
pub fn evaluate(input: &[f64], genome: &Genome, layers: &[usize]) -> Result<Vec<f64>> {
    if layers.is_empty() {
        return Err(NeurotradeError::MalformedGenome(
            "network has no layers".to_string(),
        ));
    }
    let expected_nodes: usize = layers.iter().sum();
    if genome.len() != expected_nodes {
        return Err(NeurotradeError::MalformedGenome(format!(
            "expected {} nodes for layers {:?}, genome has {}",
            expected_nodes,
            layers,
            genome.len()
        )));
    }

    let output_layer = layers.len() - 1;
    let mut predecessor: Vec<f64> = input.to_vec();
    let mut offset = 0;

    for (layer, &size) in layers.iter().enumerate() {
        let mut current = Vec::with_capacity(size);

        for (index, node) in genome.nodes()[offset..offset + size].iter().enumerate() {
            if node.len() != predecessor.len() + 1 {
                return Err(NeurotradeError::MalformedGenome(format!(
                    "node {} in layer {} has {} values, expected {} weights plus bias",
                    offset + index,
                    layer + 1,
                    node.len(),
                    predecessor.len()
                )));
            }

            let (weights, bias) = node.split_at(predecessor.len());
            let sum: f64 = weights
                .iter()
                .zip(&predecessor)
                .map(|(w, x)| w * x)
                .sum::<f64>()
                + bias[0];

            let activated = if layer == output_layer {
                sigmoid(sum)
            } else {
                swish(sum)
            };
            current.push(round_weight(activated));
        }

        offset += size;
        predecessor = current;
    }

    Ok(predecessor)
}

/// Same as [`evaluate`], taking the shape from a topology token.
pub fn evaluate_topology(input: &[f64], genome: &Genome, topology: &Topology) -> Result<Vec<f64>> {
    if input.len() != topology.inputs {
        return Err(NeurotradeError::MalformedGenome(format!(
            "topology expects {} inputs, got {}",
            topology.inputs,
            input.len()
        )));
    }
    evaluate(input, genome, &topology.layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activations() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert_eq!(swish(0.0), 0.0);
        assert!((swish(1.0) - 0.7310585786).abs() < 1e-9);
    }

    #[test]
    fn test_single_output_node() {
        // 0.5 * 2.0 + (-1.0) * 1.0 + 0.0 = 0.0 -> sigmoid = 0.5
        let genome = Genome::from_nodes(vec![vec![0.5, -1.0, 0.0]]);
        let output = evaluate(&[2.0, 1.0], &genome, &[1]).unwrap();
        assert_eq!(output, vec![0.5]);
    }

    #[test]
    fn test_hidden_layer_uses_swish() {
        // hidden: 1.0 * 1.0 + 0.0 = 1.0 -> swish(1.0) = 0.73106
        // output: 1.0 * 0.73106 + 0.0 -> sigmoid = 0.67504
        let genome = Genome::from_nodes(vec![vec![1.0, 0.0], vec![1.0, 0.0]]);
        let output = evaluate(&[1.0], &genome, &[1, 1]).unwrap();
        assert_eq!(output, vec![round_weight(sigmoid(0.73106))]);
    }

    #[test]
    fn test_rejects_arity_mismatch() {
        let genome = Genome::from_nodes(vec![vec![0.1, 0.2]]);
        let result = evaluate(&[1.0, 2.0], &genome, &[1]);
        assert!(matches!(result, Err(NeurotradeError::MalformedGenome(_))));
    }

    #[test]
    fn test_rejects_wrong_node_count() {
        let genome = Genome::from_nodes(vec![vec![0.1, 0.2]]);
        let result = evaluate(&[1.0], &genome, &[1, 1]);
        assert!(matches!(result, Err(NeurotradeError::MalformedGenome(_))));
    }
}

use crate::engines::generation::genome::{Genome, Node, Topology};
use crate::error::Result;
use crate::utils::round_weight;
use rand::Rng;
use std::ops::Range;

/// Bound of the uniform interval new weights are drawn from
pub const WEIGHT_LIMIT: f64 = 0.01;

/// Draw one weight uniformly from [-0.01, 0.01], rounded to 5 decimals
pub fn random_weight<R: Rng>(rng: &mut R) -> f64 {
    round_weight(rng.gen_range(-WEIGHT_LIMIT..=WEIGHT_LIMIT))
}

/// Generate a random genome for the topology
pub fn random_genome<R: Rng>(topology: &Topology, rng: &mut R) -> Genome {
    let nodes: Vec<Node> = topology
        .node_lengths()
        .map(|len| (0..len).map(|_| random_weight(rng)).collect())
        .collect();
    Genome::from_nodes(nodes)
}

/// Segment crossover: swap one window of nodes between two genomes in place.
///
/// Both genomes must match `topology`, so every swapped node lands in a slot
/// of the same shape. Returns the swapped window.
pub fn crossover<R: Rng>(
    first: &mut Genome,
    second: &mut Genome,
    topology: &Topology,
    rng: &mut R,
) -> Result<Range<usize>> {
    topology.check(first)?;
    topology.check(second)?;

    let len = first.len().min(second.len());
    let start = rng.gen_range(0..len);
    let length = rng.gen_range(1..=len - start);
    let window = start..start + length;

    first.nodes_mut()[window.clone()].swap_with_slice(&mut second.nodes_mut()[window.clone()]);

    Ok(window)
}

/// Point mutation: replace exactly one weight with a fresh random value.
///
/// Returns the `(node, weight)` position that changed.
pub fn mutate<R: Rng>(
    genome: &mut Genome,
    topology: &Topology,
    rng: &mut R,
) -> Result<(usize, usize)> {
    topology.check(genome)?;

    let node_index = rng.gen_range(0..genome.len());
    let node = &mut genome[node_index];
    let weight_index = rng.gen_range(0..node.len());

    let previous = node[weight_index];
    let mut replacement = random_weight(rng);
    while replacement == previous {
        replacement = random_weight(rng);
    }
    node[weight_index] = replacement;

    Ok((node_index, weight_index))
}

//! Union-find reference partition over the radius graph.
//!
//! Without an admission predicate, extraction must produce exactly the
//! connected components of the graph joining every participating pair within
//! the tolerance. This module computes those components by brute force.

use std::collections::HashMap;

use crate::{
    cloud::{DenseCloud, PointId},
    result::Extraction,
};

/// Disjoint-set forest over dense slot numbers.
#[derive(Clone, Debug)]
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut slot: usize) -> usize {
        let mut root = slot;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[slot] != root {
            let next = self.parent[slot];
            self.parent[slot] = root;
            slot = next;
        }
        root
    }

    fn union(&mut self, left: usize, right: usize) {
        let (mut left, mut right) = (self.find(left), self.find(right));
        if left == right {
            return;
        }
        if self.rank[left] < self.rank[right] {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        if self.rank[left] == self.rank[right] {
            self.rank[left] = self.rank[left].saturating_add(1);
        }
    }
}

/// Returns the components of the radius graph over `participants`.
///
/// Components are listed in the order their first member appears in
/// `participants`; members are sorted ascending.
pub(super) fn reference_components(
    cloud: &DenseCloud,
    participants: &[PointId],
    tolerance: f32,
) -> Vec<Vec<PointId>> {
    let mut sets = DisjointSet::new(participants.len());
    for (left_slot, &left) in participants.iter().enumerate() {
        for (offset, &right) in participants[left_slot + 1..].iter().enumerate() {
            let within = cloud
                .distance(left, right)
                .is_some_and(|distance| distance <= tolerance);
            if within {
                sets.union(left_slot, left_slot + 1 + offset);
            }
        }
    }

    let mut by_root: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<Vec<PointId>> = Vec::new();
    for (slot, &id) in participants.iter().enumerate() {
        let root = sets.find(slot);
        let position = *by_root.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[position].push(id);
    }
    for component in &mut components {
        component.sort_unstable();
    }
    components
}

/// Returns the extraction's clusters with members sorted ascending.
pub(super) fn sorted_memberships(extraction: &Extraction) -> Vec<Vec<PointId>> {
    extraction
        .clusters()
        .iter()
        .map(|cluster| {
            let mut members = cluster.indices().to_vec();
            members.sort_unstable();
            members
        })
        .collect()
}

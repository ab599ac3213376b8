//! Union-find used to relabel nearest-neighbour-chain merges.
//!
//! The chain emits merges out of height order and names clusters by a
//! surviving point index. After sorting by height, each merge is replayed
//! here so both sides can be mapped to the tree node that currently covers
//! them.

#[derive(Clone, Debug)]
pub(super) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    /// Tree node currently covering each root.
    pub(super) component_node: Vec<usize>,
}

impl DisjointSet {
    pub(super) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            component_node: (0..n).collect(),
        }
    }

    pub(super) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    /// Returns the tree node covering `point`.
    pub(super) fn node_of(&mut self, point: usize) -> usize {
        let root = self.find(point);
        self.component_node[root]
    }

    /// Joins the sets of `left` and `right` and names the result `node`.
    pub(super) fn merge_into(&mut self, left: usize, right: usize, node: usize) {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            self.component_node[left] = node;
            return;
        }
        if self.rank[left] < self.rank[right] {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        if self.rank[left] == self.rank[right] {
            self.rank[left] = self.rank[left].saturating_add(1);
        }
        self.component_node[left] = node;
    }
}

use crate::dictionary::WordId;

/// The best edge ending at a boundary position.
#[derive(Debug, Clone, Copy)]
pub struct Node {
    /// Start position of the edge; `usize::MAX` for BOS.
    pub start: usize,
    /// `None` for BOS and the single-unit fallback.
    pub word: Option<WordId>,
    pub word_cost: f64,
    /// Minimum total cost from BOS to the end of this edge.
    pub min_cost: f64,
}

impl Node {
    const BOS: Self = Self {
        start: usize::MAX,
        word: None,
        word_cost: 0.0,
        min_cost: 0.0,
    };

    /// Checks if an edge from `start` with total cost `min_cost` beats this node.
    ///
    /// On equal cost, the edge covering the longer span, i.e., starting earlier, wins.
    #[inline(always)]
    fn is_beaten_by(&self, start: usize, min_cost: f64) -> bool {
        min_cost < self.min_cost || (min_cost == self.min_cost && start < self.start)
    }
}

/// Match lattice over boundary positions `0..=len_unit`.
///
/// Positions must be filled in increasing order of the edge start, so that the
/// node ending at a position is final once edges leave from it.
#[derive(Default)]
pub struct Lattice {
    ends: Vec<Option<Node>>,
    len_unit: usize,
}

impl Lattice {
    pub fn reset(&mut self, len_unit: usize) {
        self.ends.clear();
        self.ends.resize(len_unit + 1, None);
        self.len_unit = len_unit;
        self.ends[0] = Some(Node::BOS);
    }

    /// Checks if some path from BOS reaches position `i`.
    #[inline(always)]
    pub fn has_previous_node(&self, i: usize) -> bool {
        self.ends.get(i).is_some_and(Option::is_some)
    }

    pub fn insert_node(&mut self, start: usize, end: usize, word: Option<WordId>, word_cost: f64) {
        debug_assert!(start < end);
        debug_assert!(end <= self.len_unit);
        let Some(left) = self.ends[start] else {
            return;
        };
        let min_cost = left.min_cost + word_cost;
        let slot = &mut self.ends[end];
        if slot.is_none_or(|node| node.is_beaten_by(start, min_cost)) {
            *slot = Some(Node {
                start,
                word,
                word_cost,
                min_cost,
            });
        }
    }

    /// Pushes the nodes of the best path as `(end, node)` pairs, from the last to the first.
    ///
    /// Returns `false`, leaving `top_nodes` untouched, if no path reaches the end.
    pub fn append_top_nodes(&self, top_nodes: &mut Vec<(usize, Node)>) -> bool {
        if !self.has_previous_node(self.len_unit) {
            return false;
        }
        let base = top_nodes.len();
        let mut end = self.len_unit;
        while end != 0 {
            let Some(node) = self.ends[end] else {
                top_nodes.truncate(base);
                return false;
            };
            top_nodes.push((end, node));
            end = node.start;
        }
        true
    }
}

impl std::fmt::Debug for Lattice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Lattice {{ ends: [")?;
        for (i, e) in self.ends[..=self.len_unit].iter().enumerate() {
            writeln!(f, "{i} => {e:?}")?;
        }
        writeln!(f, "]}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(lattice: &Lattice) -> Vec<(usize, usize)> {
        let mut top_nodes = vec![];
        assert!(lattice.append_top_nodes(&mut top_nodes));
        top_nodes
            .iter()
            .rev()
            .map(|(end, node)| (node.start, *end))
            .collect()
    }

    #[test]
    fn test_min_cost_path() {
        let mut lattice = Lattice::default();
        lattice.reset(3);
        lattice.insert_node(0, 1, Some(1), 1.0);
        lattice.insert_node(0, 2, Some(2), 3.0);
        lattice.insert_node(1, 2, Some(3), 1.0);
        lattice.insert_node(1, 3, Some(4), 5.0);
        lattice.insert_node(2, 3, Some(5), 1.0);
        assert_eq!(path(&lattice), vec![(0, 1), (1, 2), (2, 3)]);
        assert!(lattice.has_previous_node(3));
    }

    #[test]
    fn test_tie_prefers_longer_span() {
        let mut lattice = Lattice::default();
        lattice.reset(2);
        lattice.insert_node(0, 1, Some(1), 1.0);
        lattice.insert_node(0, 2, Some(2), 2.0);
        lattice.insert_node(1, 2, Some(3), 1.0);
        assert_eq!(path(&lattice), vec![(0, 2)]);
    }

    #[test]
    fn test_unreachable_end() {
        let mut lattice = Lattice::default();
        lattice.reset(3);
        lattice.insert_node(0, 2, Some(1), 1.0);
        // Position 1 is unreachable, so this edge is dropped.
        lattice.insert_node(1, 3, Some(2), 1.0);
        assert!(!lattice.has_previous_node(1));

        let mut top_nodes = vec![];
        assert!(!lattice.append_top_nodes(&mut top_nodes));
        assert!(top_nodes.is_empty());
    }

    #[test]
    fn test_empty() {
        let mut lattice = Lattice::default();
        lattice.reset(0);
        let mut top_nodes = vec![];
        assert!(lattice.append_top_nodes(&mut top_nodes));
        assert!(top_nodes.is_empty());
    }
}

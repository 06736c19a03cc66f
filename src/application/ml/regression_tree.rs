//! Regression tree used as the weak learner of the boosting ensemble.
//!
//! Splits minimize the squared error of the gradient targets; leaves hold a
//! Newton step `sum(gradient) / sum(hessian)` so the tree plugs directly into
//! log-loss boosting.

#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub max_depth: u16,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct RegressionTree {
    nodes: Vec<Node>,
}

struct TreeBuilder<'a> {
    rows: &'a [Vec<f64>],
    gradients: &'a [f64],
    hessians: &'a [f64],
    params: TreeParams,
    nodes: Vec<Node>,
}

impl RegressionTree {
    pub(crate) fn fit(
        rows: &[Vec<f64>],
        gradients: &[f64],
        hessians: &[f64],
        sample: &[usize],
        params: TreeParams,
    ) -> Self {
        let mut builder = TreeBuilder {
            rows,
            gradients,
            hessians,
            params,
            nodes: Vec::new(),
        };
        builder.build(sample, 0);
        Self {
            nodes: builder.nodes,
        }
    }

    pub(crate) fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

impl TreeBuilder<'_> {
    fn build(&mut self, indices: &[usize], depth: u16) -> usize {
        let leaf = Node::Leaf {
            value: self.leaf_value(indices),
        };

        if depth >= self.params.max_depth || indices.len() < self.params.min_samples_split.max(2) {
            return self.push(leaf);
        }

        let Some((feature, threshold)) = self.best_split(indices) else {
            return self.push(leaf);
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| self.rows[i][feature] <= threshold);

        // Placeholder until both children exist.
        let node = self.push(leaf);
        let left = self.build(&left_idx, depth + 1);
        let right = self.build(&right_idx, depth + 1);
        self.nodes[node] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        node
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn leaf_value(&self, indices: &[usize]) -> f64 {
        let g: f64 = indices.iter().map(|&i| self.gradients[i]).sum();
        let h: f64 = indices.iter().map(|&i| self.hessians[i]).sum();
        if h.abs() < 1e-150 { 0.0 } else { g / h }
    }

    /// Best (feature, threshold) by squared-error reduction; first wins on ties.
    fn best_split(&self, indices: &[usize]) -> Option<(usize, f64)> {
        let n = indices.len();
        let n_features = self.rows[indices[0]].len();
        let min_leaf = self.params.min_samples_leaf.max(1);

        let total: f64 = indices.iter().map(|&i| self.gradients[i]).sum();
        let parent_score = total * total / n as f64;

        let mut best: Option<(usize, f64)> = None;
        let mut best_gain = 1e-12;

        for feature in 0..n_features {
            let mut pairs: Vec<(f64, f64)> = indices
                .iter()
                .map(|&i| (self.rows[i][feature], self.gradients[i]))
                .collect();
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            for split in 1..n {
                left_sum += pairs[split - 1].1;
                if pairs[split - 1].0 == pairs[split].0 {
                    continue;
                }
                let right_count = n - split;
                if split < min_leaf || right_count < min_leaf {
                    continue;
                }

                let right_sum = total - left_sum;
                let score = left_sum * left_sum / split as f64
                    + right_sum * right_sum / right_count as f64;
                let gain = score - parent_score;

                if gain > best_gain {
                    best_gain = gain;
                    best = Some((feature, (pairs[split - 1].0 + pairs[split].0) / 2.0));
                }
            }
        }

        best
    }
}

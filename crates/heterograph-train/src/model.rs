//! Differentiable node classifiers over a flat parameter vector.
//!
//! Two models share one calling convention: parameters live in a single
//! `Vec<f64>` (so [`Adam`](crate::optim::Adam) can update them in one sweep),
//! each weight matrix is a [`Block`] of that vector, and
//! [`Model::forward_backward`] returns the logits together with the gradient of
//! the mean cross-entropy loss.
//!
//! - [`SageModel`]: two GraphSAGE layers with mean aggregation,
//!   `h' = mean_{j→i} h_j · W_neigh + b + h_i · W_root`, ReLU between them.
//! - [`LogisticModel`]: softmax regression on the raw features.

use heterograph_core::{Edge, Label};
use ndarray::{Array2, ArrayView2, Axis, Zip};
use rand::Rng;
use sprs::{CsMat, TriMat};

use crate::error::{TrainError, TrainResult};

// ---------------------------------------------------------------------------
// Parameter blocks
// ---------------------------------------------------------------------------

/// A `rows x cols` matrix stored row-major at `offset` in the flat vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    offset: usize,
    rows: usize,
    cols: usize,
    fan_in: usize,
}

impl Block {
    fn len(&self) -> usize {
        self.rows * self.cols
    }

    fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.len()
    }

    /// Borrow the block as a matrix.
    pub fn view<'a>(&self, flat: &'a [f64]) -> TrainResult<ArrayView2<'a, f64>> {
        let end = self.offset + self.len();
        if flat.len() < end {
            return Err(TrainError::shape_mismatch(vec![end], vec![flat.len()]));
        }
        ArrayView2::from_shape((self.rows, self.cols), &flat[self.range()])
            .map_err(|_| TrainError::shape_mismatch(vec![self.rows, self.cols], vec![self.len()]))
    }

    /// Copy `value` into the block.
    pub fn write(&self, flat: &mut [f64], value: &Array2<f64>) -> TrainResult<()> {
        if value.dim() != (self.rows, self.cols) {
            return Err(TrainError::shape_mismatch(
                vec![self.rows, self.cols],
                value.shape().to_vec(),
            ));
        }
        let end = self.offset + self.len();
        if flat.len() < end {
            return Err(TrainError::shape_mismatch(vec![end], vec![flat.len()]));
        }
        for (dst, &src) in flat[self.range()].iter_mut().zip(value.iter()) {
            *dst = src;
        }
        Ok(())
    }
}

/// Allocates consecutive [`Block`]s.
#[derive(Debug, Default)]
struct Layout {
    blocks: Vec<Block>,
    len: usize,
}

impl Layout {
    fn push(&mut self, rows: usize, cols: usize, fan_in: usize) -> Block {
        let block = Block { offset: self.len, rows, cols, fan_in };
        self.len += block.len();
        self.blocks.push(block);
        block
    }

    /// Every block drawn from U(-1/sqrt(fan_in), 1/sqrt(fan_in)).
    fn init<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let mut params = vec![0.0; self.len];
        for block in &self.blocks {
            let bound = 1.0 / (block.fan_in.max(1) as f64).sqrt();
            for p in &mut params[block.range()] {
                *p = rng.gen_range(-bound..bound);
            }
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// Output of one full-batch forward and backward pass.
#[derive(Debug, Clone)]
pub struct Step {
    /// Mean cross-entropy loss.
    pub loss: f64,
    /// `N x C` pre-softmax scores.
    pub logits: Array2<f64>,
    /// Gradient of `loss`, laid out like the parameters.
    pub gradients: Vec<f64>,
}

/// A classifier whose parameters are a flat vector.
pub trait Model {
    /// Length of the parameter vector.
    fn num_params(&self) -> usize;

    /// Fresh parameters.
    fn init_params<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64>;

    /// Logits, loss and gradient at `params`.
    fn forward_backward(&self, params: &[f64], labels: &[Label]) -> TrainResult<Step>;
}

// ---------------------------------------------------------------------------
// Mean aggregation
// ---------------------------------------------------------------------------

/// Sparse mean-over-in-neighbours operator.
///
/// `M[i][j] = count(j→i) / in_degree(i)`, so parallel edges weigh in as often
/// as they occur and nodes without incoming edges aggregate to zero. The
/// transpose is kept for backpropagation.
#[derive(Debug, Clone)]
pub struct MeanAggregator {
    gather: CsMat<f64>,
    scatter: CsMat<f64>,
}

impl MeanAggregator {
    /// Build the operator for `num_nodes` nodes.
    ///
    /// # Errors
    ///
    /// [`TrainError::InvalidEdge`] if an endpoint is out of range.
    pub fn from_edges(edges: &[Edge], num_nodes: usize) -> TrainResult<Self> {
        let mut in_degree = vec![0usize; num_nodes];
        for &(src, dst) in edges {
            if src >= num_nodes || dst >= num_nodes {
                return Err(TrainError::InvalidEdge { src, dst, num_nodes });
            }
            in_degree[dst] += 1;
        }

        let mut gather = TriMat::<f64>::new((num_nodes, num_nodes));
        let mut scatter = TriMat::<f64>::new((num_nodes, num_nodes));
        for &(src, dst) in edges {
            let w = 1.0 / in_degree[dst] as f64;
            gather.add_triplet(dst, src, w);
            scatter.add_triplet(src, dst, w);
        }
        Ok(MeanAggregator { gather: gather.to_csr(), scatter: scatter.to_csr() })
    }

    /// `M x`.
    pub fn apply(&self, x: &Array2<f64>) -> Array2<f64> {
        &self.gather * x
    }

    /// `Mᵀ g`.
    pub fn apply_transpose(&self, g: &Array2<f64>) -> Array2<f64> {
        &self.scatter * g
    }
}

// ---------------------------------------------------------------------------
// GraphSAGE
// ---------------------------------------------------------------------------

/// Two-layer GraphSAGE classifier bound to one graph and feature matrix.
pub struct SageModel<'a> {
    features: &'a Array2<f64>,
    // M X never changes between epochs.
    neigh_features: Array2<f64>,
    aggregator: MeanAggregator,
    layout: Layout,
    w1_neigh: Block,
    w1_root: Block,
    b1: Block,
    w2_neigh: Block,
    w2_root: Block,
    b2: Block,
}

impl<'a> SageModel<'a> {
    /// Bind a model of the given widths to `features` (`N x F`) and `edges`.
    pub fn new(
        features: &'a Array2<f64>,
        edges: &[Edge],
        hidden_dim: usize,
        num_classes: usize,
    ) -> TrainResult<Self> {
        let (n, f) = features.dim();
        let aggregator = MeanAggregator::from_edges(edges, n)?;
        let neigh_features = aggregator.apply(features);

        let mut layout = Layout::default();
        let w1_neigh = layout.push(f, hidden_dim, f);
        let w1_root = layout.push(f, hidden_dim, f);
        let b1 = layout.push(1, hidden_dim, f);
        let w2_neigh = layout.push(hidden_dim, num_classes, hidden_dim);
        let w2_root = layout.push(hidden_dim, num_classes, hidden_dim);
        let b2 = layout.push(1, num_classes, hidden_dim);

        Ok(SageModel {
            features,
            neigh_features,
            aggregator,
            layout,
            w1_neigh,
            w1_root,
            b1,
            w2_neigh,
            w2_root,
            b2,
        })
    }
}

impl Model for SageModel<'_> {
    fn num_params(&self) -> usize {
        self.layout.len
    }

    fn init_params<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.layout.init(rng)
    }

    fn forward_backward(&self, params: &[f64], labels: &[Label]) -> TrainResult<Step> {
        let x = self.features;
        let w1n = self.w1_neigh.view(params)?;
        let w1r = self.w1_root.view(params)?;
        let b1 = self.b1.view(params)?;
        let w2n = self.w2_neigh.view(params)?;
        let w2r = self.w2_root.view(params)?;
        let b2 = self.b2.view(params)?;

        let pre1 = self.neigh_features.dot(&w1n) + x.dot(&w1r) + &b1.row(0);
        let h1 = pre1.mapv(relu);
        let neigh_h1 = self.aggregator.apply(&h1);
        let logits = neigh_h1.dot(&w2n) + h1.dot(&w2r) + &b2.row(0);

        let (loss, d_logits) = softmax_cross_entropy(&logits, labels)?;

        let mut gradients = vec![0.0; self.layout.len];
        self.w2_neigh.write(&mut gradients, &neigh_h1.t().dot(&d_logits))?;
        self.w2_root.write(&mut gradients, &h1.t().dot(&d_logits))?;
        self.b2.write(&mut gradients, &column_sums(&d_logits))?;

        let mut d_pre1 = self.aggregator.apply_transpose(&d_logits.dot(&w2n.t())) + d_logits.dot(&w2r.t());
        Zip::from(&mut d_pre1).and(&pre1).for_each(|g, &p| {
            if p <= 0.0 {
                *g = 0.0;
            }
        });
        self.w1_neigh.write(&mut gradients, &self.neigh_features.t().dot(&d_pre1))?;
        self.w1_root.write(&mut gradients, &x.t().dot(&d_pre1))?;
        self.b1.write(&mut gradients, &column_sums(&d_pre1))?;

        Ok(Step { loss, logits, gradients })
    }
}

// ---------------------------------------------------------------------------
// Logistic regression
// ---------------------------------------------------------------------------

/// Softmax regression on the node features alone.
pub struct LogisticModel<'a> {
    features: &'a Array2<f64>,
    layout: Layout,
    weight: Block,
    bias: Block,
}

impl<'a> LogisticModel<'a> {
    /// Bind a model to `features` (`N x F`).
    pub fn new(features: &'a Array2<f64>, num_classes: usize) -> Self {
        let f = features.ncols();
        let mut layout = Layout::default();
        let weight = layout.push(f, num_classes, f);
        let bias = layout.push(1, num_classes, f);
        LogisticModel { features, layout, weight, bias }
    }
}

impl Model for LogisticModel<'_> {
    fn num_params(&self) -> usize {
        self.layout.len
    }

    fn init_params<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.layout.init(rng)
    }

    fn forward_backward(&self, params: &[f64], labels: &[Label]) -> TrainResult<Step> {
        let w = self.weight.view(params)?;
        let b = self.bias.view(params)?;
        let logits = self.features.dot(&w) + &b.row(0);
        let (loss, d_logits) = softmax_cross_entropy(&logits, labels)?;

        let mut gradients = vec![0.0; self.layout.len];
        self.weight.write(&mut gradients, &self.features.t().dot(&d_logits))?;
        self.bias.write(&mut gradients, &column_sums(&d_logits))?;
        Ok(Step { loss, logits, gradients })
    }
}

// ---------------------------------------------------------------------------
// Loss and metrics
// ---------------------------------------------------------------------------

/// ReLU; NaN passes through.
fn relu(v: f64) -> f64 {
    if v < 0.0 {
        0.0
    } else {
        v
    }
}

fn column_sums(m: &Array2<f64>) -> Array2<f64> {
    m.sum_axis(Axis(0)).insert_axis(Axis(0))
}

/// Mean cross-entropy of `softmax(logits)` against `labels`, and its gradient
/// with respect to the logits, `(softmax - onehot) / N`.
pub fn softmax_cross_entropy(logits: &Array2<f64>, labels: &[Label]) -> TrainResult<(f64, Array2<f64>)> {
    let (n, c) = logits.dim();
    if labels.len() != n {
        return Err(TrainError::shape_mismatch(vec![n], vec![labels.len()]));
    }
    let scale = 1.0 / n.max(1) as f64;
    let mut grad = Array2::zeros((n, c));
    let mut loss = 0.0;

    for (node, ((row, mut g), &label)) in logits
        .rows()
        .into_iter()
        .zip(grad.rows_mut())
        .zip(labels)
        .enumerate()
    {
        let y = usize::from(label);
        if y >= c {
            return Err(TrainError::InvalidLabel { node, label, num_classes: c });
        }
        let max = row.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let sum: f64 = row.iter().map(|&z| (z - max).exp()).sum();
        loss -= row[y] - max - sum.ln();
        for (gj, &z) in g.iter_mut().zip(row.iter()) {
            *gj = (z - max).exp() / sum * scale;
        }
        g[y] -= scale;
    }
    Ok((loss * scale, grad))
}

/// Fraction of rows whose arg-max (first on ties) equals the label.
pub fn accuracy(logits: &Array2<f64>, labels: &[Label]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let mut correct = 0usize;
    for (row, &label) in logits.rows().into_iter().zip(labels) {
        let mut best = 0;
        for (j, &v) in row.iter().enumerate() {
            if v > row[best] {
                best = j;
            }
        }
        if best == usize::from(label) {
            correct += 1;
        }
    }
    correct as f64 / labels.len() as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Lanczos iteration with full reorthogonalization.
//!
//! Builds an orthonormal Krylov basis `Q` of the Laplacian and the symmetric
//! tridiagonal projection `T = Qᵀ L Q`. Eigenpairs of `T` (computed densely by
//! `nalgebra`) give Ritz pairs of `L`; the smallest Ritz pairs converge first
//! because 0 is an extreme point of the Laplacian spectrum.
//!
//! Every new basis vector is orthogonalized twice against the whole basis, so
//! `Q` stays orthonormal to machine precision and no spurious copies of
//! converged eigenvalues appear. When the recurrence breaks down (an invariant
//! subspace has been exhausted, e.g. one connected component) the basis is
//! continued with a fresh random vector, which lets repeated eigenvalues of
//! disconnected graphs surface. Once the basis spans all `n` dimensions the
//! decomposition is exact.

use nalgebra::{DMatrix, SymmetricEigen};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::SpectralError;
use crate::laplacian::Laplacian;

/// Norm below which the three-term recurrence is treated as broken down.
const BREAKDOWN_TOL: f64 = 1e-10;

/// Attempts at drawing a random vector that survives orthogonalization.
const MAX_RESTART_DRAWS: usize = 8;

/// One converged (or candidate) Ritz pair.
#[derive(Debug, Clone)]
pub(crate) struct RitzPair {
    pub value: f64,
    pub vector: Vec<f64>,
    pub residual: f64,
}

/// Krylov basis and tridiagonal coefficients.
///
/// Owns every buffer the solver touches; the whole workspace is released when
/// it goes out of scope, on success and on error alike.
pub(crate) struct LanczosWorkspace<'a> {
    op: &'a Laplacian,
    basis: Vec<Vec<f64>>,
    alpha: Vec<f64>,
    beta: Vec<f64>,
    scratch: Vec<f64>,
    rng: StdRng,
}

impl<'a> LanczosWorkspace<'a> {
    pub(crate) fn new(op: &'a Laplacian, seed: u64) -> Self {
        let n = op.num_nodes();
        let mut ws = LanczosWorkspace {
            op,
            basis: Vec::new(),
            alpha: Vec::new(),
            beta: Vec::new(),
            scratch: vec![0.0; n],
            rng: StdRng::seed_from_u64(seed),
        };
        if let Some(q0) = ws.fresh_direction() {
            ws.basis.push(q0);
        }
        ws
    }

    /// Number of Lanczos steps taken (the order of `T`).
    pub(crate) fn steps(&self) -> usize {
        self.alpha.len()
    }

    /// Run Lanczos steps until `T` has order `m` or the basis spans the space.
    pub(crate) fn extend_to(&mut self, m: usize) {
        let n = self.op.num_nodes();
        while self.alpha.len() < m.min(n) && self.alpha.len() < self.basis.len() {
            self.step();
        }
    }

    fn step(&mut self) {
        let n = self.op.num_nodes();
        let j = self.alpha.len();

        self.op.mul_vec(&self.basis[j], &mut self.scratch);
        let mut w = std::mem::take(&mut self.scratch);

        let a = dot(&self.basis[j], &w);
        axpy(&mut w, &self.basis[j], -a);
        if j > 0 {
            axpy(&mut w, &self.basis[j - 1], -self.beta[j - 1]);
        }
        for _ in 0..2 {
            orthogonalize(&mut w, &self.basis);
        }
        self.alpha.push(a);

        if self.basis.len() < n {
            let b = norm(&w);
            if b > BREAKDOWN_TOL {
                w.iter_mut().for_each(|x| *x /= b);
                self.basis.push(w.clone());
                self.beta.push(b);
            } else if let Some(q) = self.fresh_direction() {
                debug!(step = j, "Lanczos breakdown, restarting in orthogonal complement");
                self.basis.push(q);
                self.beta.push(0.0);
            }
        }
        self.scratch = w;
    }

    /// A random unit vector orthogonal to the current basis.
    fn fresh_direction(&mut self) -> Option<Vec<f64>> {
        let n = self.op.num_nodes();
        for _ in 0..MAX_RESTART_DRAWS {
            let mut v: Vec<f64> = (0..n).map(|_| self.rng.gen::<f64>() - 0.5).collect();
            for _ in 0..2 {
                orthogonalize(&mut v, &self.basis);
            }
            let nv = norm(&v);
            if nv > BREAKDOWN_TOL {
                v.iter_mut().for_each(|x| *x /= nv);
                return Some(v);
            }
        }
        None
    }

    /// All Ritz pairs of the current projection, ascending by value.
    ///
    /// `max_iterations` bounds the QR sweeps of the dense tridiagonal solve.
    pub(crate) fn ritz_pairs(&self, take: usize, max_iterations: usize) -> Result<Vec<RitzPair>, SpectralError> {
        let m = self.alpha.len();
        let mut t = DMatrix::<f64>::zeros(m, m);
        for i in 0..m {
            t[(i, i)] = self.alpha[i];
            if i + 1 < m {
                t[(i, i + 1)] = self.beta[i];
                t[(i + 1, i)] = self.beta[i];
            }
        }

        let eigen = SymmetricEigen::try_new(t, f64::EPSILON, max_iterations).ok_or_else(|| {
            SpectralError::non_convergence(format!(
                "tridiagonal eigensolve of order {m} exceeded {max_iterations} iterations"
            ))
        })?;

        let mut order: Vec<usize> = (0..m).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

        let n = self.op.num_nodes();
        let mut pairs = Vec::with_capacity(take);
        let mut lv = vec![0.0; n];
        for &col in order.iter().take(take) {
            let value = eigen.eigenvalues[col];
            let mut vector = vec![0.0; n];
            for (i, q) in self.basis.iter().take(m).enumerate() {
                axpy(&mut vector, q, eigen.eigenvectors[(i, col)]);
            }
            let nv = norm(&vector);
            if nv > 0.0 {
                vector.iter_mut().for_each(|x| *x /= nv);
            }

            self.op.mul_vec(&vector, &mut lv);
            let residual = lv
                .iter()
                .zip(&vector)
                .map(|(l, v)| (l - value * v).powi(2))
                .sum::<f64>()
                .sqrt();
            pairs.push(RitzPair { value, vector, residual });
        }
        Ok(pairs)
    }
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// `a += scale * b`
#[inline]
fn axpy(a: &mut [f64], b: &[f64], scale: f64) {
    for (ai, bi) in a.iter_mut().zip(b) {
        *ai += scale * bi;
    }
}

/// Classical Gram-Schmidt pass against every basis vector.
fn orthogonalize(v: &mut [f64], basis: &[Vec<f64>]) {
    for q in basis {
        let c = dot(v, q);
        axpy(v, q, -c);
    }
}

//! Adam optimiser over a flat parameter vector.

/// Adam (Kingma & Ba) with bias-corrected first and second moments.
///
/// Moment buffers are sized on the first [`step`](Adam::step) and reset if the
/// parameter count changes.
#[derive(Debug, Clone)]
pub struct Adam {
    lr: f64,
    beta1: f64,
    beta2: f64,
    eps: f64,
    t: i32,
    m: Vec<f64>,
    v: Vec<f64>,
}

impl Adam {
    /// Default first-moment decay.
    pub const BETA1: f64 = 0.9;
    /// Default second-moment decay.
    pub const BETA2: f64 = 0.999;
    /// Default denominator epsilon.
    pub const EPS: f64 = 1e-8;

    /// Adam with the default betas and epsilon.
    pub fn new(lr: f64) -> Self {
        Self::with_betas(lr, Self::BETA1, Self::BETA2, Self::EPS)
    }

    /// Adam with explicit hyperparameters.
    pub fn with_betas(lr: f64, beta1: f64, beta2: f64, eps: f64) -> Self {
        Adam { lr, beta1, beta2, eps, t: 0, m: Vec::new(), v: Vec::new() }
    }

    /// Number of steps taken.
    pub fn steps(&self) -> i32 {
        self.t
    }

    /// Learning rate.
    pub fn lr(&self) -> f64 {
        self.lr
    }

    /// m = b1*m + (1-b1)*g; v = b2*v + (1-b2)*g²;
    /// param -= lr * m̂ / (sqrt(v̂) + eps)
    pub fn step(&mut self, params: &mut [f64], gradients: &[f64]) {
        if self.m.len() != params.len() {
            self.m = vec![0.0; params.len()];
            self.v = vec![0.0; params.len()];
            self.t = 0;
        }
        self.t += 1;
        let bc1 = 1.0 - self.beta1.powi(self.t);
        let bc2 = 1.0 - self.beta2.powi(self.t);

        for i in 0..params.len().min(gradients.len()) {
            let g = gradients[i];
            self.m[i] = self.beta1 * self.m[i] + (1.0 - self.beta1) * g;
            self.v[i] = self.beta2 * self.v[i] + (1.0 - self.beta2) * g * g;
            let m_hat = self.m[i] / bc1;
            let v_hat = self.v[i] / bc2;
            params[i] -= self.lr * m_hat / (v_hat.sqrt() + self.eps);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn first_step_moves_by_lr() {
        // With bias correction the first update is lr * g / (|g| + eps).
        let mut adam = Adam::new(0.01);
        let mut p = vec![1.0, -1.0, 0.5];
        adam.step(&mut p, &[2.0, -0.5, 0.0]);
        assert_abs_diff_eq!(p[0], 0.99, epsilon = 1e-6);
        assert_abs_diff_eq!(p[1], -0.99, epsilon = 1e-6);
        assert_eq!(p[2], 0.5);
        assert_eq!(adam.steps(), 1);
    }

    #[test]
    fn minimises_quadratic() {
        // f(x) = sum (x_i - 3)^2
        let mut adam = Adam::new(0.1);
        let mut p = vec![0.0, 10.0];
        for _ in 0..500 {
            let g: Vec<f64> = p.iter().map(|x| 2.0 * (x - 3.0)).collect();
            adam.step(&mut p, &g);
        }
        for x in p {
            assert_abs_diff_eq!(x, 3.0, epsilon = 1e-2);
        }
    }

    #[test]
    fn resizing_resets_state() {
        let mut adam = Adam::new(0.01);
        let mut a = vec![0.0; 2];
        adam.step(&mut a, &[1.0, 1.0]);
        adam.step(&mut a, &[1.0, 1.0]);
        let mut b = vec![0.0; 3];
        adam.step(&mut b, &[1.0, 1.0, 1.0]);
        assert_eq!(adam.steps(), 1);
    }
}

//! Small dense linear algebra for the Gauss-Newton / Levenberg-Marquardt step.
//!
//! With residuals `r_i = (y_i - m_i) / σ_i` and Jacobian `J_ij = ∂m_i/∂p_j / σ_i`
//! the normal equations of one damped step are
//!
//! ```text
//! (JᵀJ + λ diag(JᵀJ)) δ = Jᵀ r
//! ```
//!
//! Marquardt's diagonal scaling keeps the step invariant to the very different
//! magnitudes of `To` (~10¹) and `k` (~10⁻³).

use nalgebra::{DMatrix, DVector, Matrix2, Vector2};

/// Relative conditioning below which `JᵀJ` is treated as singular.
const SINGULAR_RCOND: f64 = 1e-14;

/// Build `JᵀJ` and `Jᵀr` for a two-parameter problem.
pub fn normal_equations(jacobian: &DMatrix<f64>, residuals: &DVector<f64>) -> (Matrix2<f64>, Vector2<f64>) {
    let jtj = jacobian.transpose() * jacobian;
    let jtr = jacobian.transpose() * residuals;
    (
        Matrix2::new(jtj[(0, 0)], jtj[(0, 1)], jtj[(1, 0)], jtj[(1, 1)]),
        Vector2::new(jtr[0], jtr[1]),
    )
}

/// `true` when the normal matrix has (numerically) dependent columns.
pub fn is_singular(jtj: &Matrix2<f64>) -> bool {
    let d0 = jtj[(0, 0)];
    let d1 = jtj[(1, 1)];
    if !(d0.is_finite() && d1.is_finite()) || d0 <= 0.0 || d1 <= 0.0 {
        return true;
    }
    // Determinant of the correlation-scaled matrix: 1 - ρ².
    let scaled_det = jtj.determinant() / (d0 * d1);
    !(scaled_det.is_finite() && scaled_det > SINGULAR_RCOND)
}

/// Solve the Marquardt-damped system for the parameter step.
pub fn solve_damped(jtj: &Matrix2<f64>, jtr: &Vector2<f64>, lambda: f64) -> Option<Vector2<f64>> {
    let mut a = *jtj;
    for i in 0..2 {
        a[(i, i)] += lambda * jtj[(i, i)];
    }
    let step = a.cholesky()?.solve(jtr);
    step.iter().all(|v| v.is_finite()).then_some(step)
}

/// Invert `JᵀJ` (the parameter covariance at the optimum).
pub fn invert(jtj: &Matrix2<f64>) -> Option<Matrix2<f64>> {
    if is_singular(jtj) {
        return None;
    }
    let inv = jtj.try_inverse()?;
    inv.iter().all(|v| v.is_finite()).then_some(inv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_equations_of_a_line() {
        // m(x) = a + b x at x = 0, 1, 2; J columns are [1, x].
        let j = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let r = DVector::from_row_slice(&[1.0, 1.0, 1.0]);
        let (jtj, jtr) = normal_equations(&j, &r);
        assert_eq!(jtj, Matrix2::new(3.0, 3.0, 3.0, 5.0));
        assert_eq!(jtr, Vector2::new(3.0, 3.0));

        // Undamped step solves the linear least-squares problem exactly.
        let step = solve_damped(&jtj, &jtr, 0.0).unwrap();
        assert!((step[0] - 1.0).abs() < 1e-12);
        assert!(step[1].abs() < 1e-12);
    }

    #[test]
    fn dependent_columns_are_singular() {
        let jtj = Matrix2::new(4.0, 8.0, 8.0, 16.0);
        assert!(is_singular(&jtj));
        assert!(invert(&jtj).is_none());
        assert!(is_singular(&Matrix2::new(1.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn inverse_of_diagonal() {
        let inv = invert(&Matrix2::new(4.0, 0.0, 0.0, 0.25)).unwrap();
        assert!((inv[(0, 0)] - 0.25).abs() < 1e-15);
        assert!((inv[(1, 1)] - 4.0).abs() < 1e-15);
    }
}

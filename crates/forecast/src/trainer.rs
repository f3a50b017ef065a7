//! Ordinary least-squares fit of the demand model.
//!
//! The estimator is deliberately a single linear regression over the 8
//! feature dimensions: closed-form, fast to retrain, and interpretable.
//! The fit solves the normal equations for the intercept-augmented design
//! matrix with Gaussian elimination; at 8 features the system is a 9×9
//! solve, so no linear-algebra dependency is warranted.

use crate::error::TrainingError;
use crate::feature::{FEATURE_DIM, FEATURE_NAMES, TrainingExample};
use crate::model::TrainedModel;

/// Feature dimensions plus the intercept column.
const AUG_DIM: usize = FEATURE_DIM + 1;

/// Pivots below this magnitude are treated as a singular system.
const PIVOT_EPSILON: f64 = 1e-9;

/// Deviation below which a feature column counts as constant.
const VARIANCE_EPSILON: f64 = 1e-12;

/// Fit the least-squares demand model for the corpus.
///
/// Errors on an empty corpus and on any constant feature column (constant
/// columns are collinear with the intercept, so the normal equations have
/// no unique solution). Callers handle a failure by regenerating the
/// corpus under a fresh seed.
pub fn fit(corpus: &[TrainingExample]) -> Result<TrainedModel, TrainingError> {
    if corpus.is_empty() {
        return Err(TrainingError::EmptyCorpus);
    }
    check_column_variance(corpus)?;

    // Accumulate X'X and X'y over the intercept-augmented rows.
    let mut xtx = [[0.0f64; AUG_DIM]; AUG_DIM];
    let mut xty = [0.0f64; AUG_DIM];

    for example in corpus {
        let mut row = [1.0f64; AUG_DIM];
        row[..FEATURE_DIM].copy_from_slice(&example.features.to_array());

        for i in 0..AUG_DIM {
            xty[i] += row[i] * example.demand;
            for j in 0..AUG_DIM {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    let beta = solve(xtx, xty)?;

    let mut weights = [0.0f64; FEATURE_DIM];
    weights.copy_from_slice(&beta[..FEATURE_DIM]);
    let bias = beta[FEATURE_DIM];

    Ok(TrainedModel::from_parameters(weights, bias, corpus.len()))
}

fn check_column_variance(corpus: &[TrainingExample]) -> Result<(), TrainingError> {
    for (j, name) in FEATURE_NAMES.iter().enumerate() {
        let first = corpus[0].features.to_array()[j];
        let constant = corpus
            .iter()
            .all(|ex| (ex.features.to_array()[j] - first).abs() <= VARIANCE_EPSILON);
        if constant {
            return Err(TrainingError::ZeroVariance(name));
        }
    }
    Ok(())
}

/// Solve `A·x = b` by Gaussian elimination with partial pivoting.
fn solve(
    mut a: [[f64; AUG_DIM]; AUG_DIM],
    mut b: [f64; AUG_DIM],
) -> Result<[f64; AUG_DIM], TrainingError> {
    for col in 0..AUG_DIM {
        // Pick the largest remaining pivot for stability.
        let mut pivot_row = col;
        for row in (col + 1)..AUG_DIM {
            if a[row][col].abs() > a[pivot_row][col].abs() {
                pivot_row = row;
            }
        }
        if a[pivot_row][col].abs() < PIVOT_EPSILON {
            return Err(TrainingError::Singular);
        }
        if pivot_row != col {
            a.swap(pivot_row, col);
            b.swap(pivot_row, col);
        }

        for row in (col + 1)..AUG_DIM {
            let factor = a[row][col] / a[col][col];
            for k in col..AUG_DIM {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    // Back substitution.
    let mut x = [0.0f64; AUG_DIM];
    for row in (0..AUG_DIM).rev() {
        let mut sum = b[row];
        for col in (row + 1)..AUG_DIM {
            sum -= a[row][col] * x[col];
        }
        x[row] = sum / a[row][row];
    }
    Ok(x)
}

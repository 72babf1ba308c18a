//! Pairwise Pearson correlation over nullable columns.

use serde::Serialize;

/// Symmetric correlation matrix, rows and columns in `columns` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Build the matrix using only rows where both columns of a pair are present.
    ///
    /// The diagonal is 1.0 for any column with at least one value.
    pub fn pearson(columns: &[(String, Vec<Option<f64>>)]) -> Self {
        let k = columns.len();
        let mut values = vec![vec![f64::NAN; k]; k];

        for i in 0..k {
            let has_values = columns[i].1.iter().any(Option::is_some);
            values[i][i] = if has_values { 1.0 } else { f64::NAN };

            for j in (i + 1)..k {
                let r = pearson_pairwise(&columns[i].1, &columns[j].1);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Self {
            columns: columns.iter().map(|(name, _)| name.clone()).collect(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }
}

/// Pearson r over the rows where both `x` and `y` are present.
///
/// NaN with fewer than two complete pairs or when either side has no variance.
pub fn pearson_pairwise(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();

    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }

    let n_f = n as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n_f;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n_f;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, values: &[Option<f64>]) -> (String, Vec<Option<f64>>) {
        (name.to_string(), values.to_vec())
    }

    #[test]
    fn test_perfect_correlation() {
        let r = pearson_pairwise(
            &[Some(1.0), Some(2.0), Some(3.0)],
            &[Some(2.0), Some(4.0), Some(6.0)],
        );
        assert!((r - 1.0).abs() < 1e-12);

        let r = pearson_pairwise(
            &[Some(1.0), Some(2.0), Some(3.0)],
            &[Some(3.0), Some(2.0), Some(1.0)],
        );
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_complete_rows_only() {
        // The outlier in row 3 is ignored because its partner is missing.
        let r = pearson_pairwise(
            &[Some(1.0), Some(2.0), Some(3.0), Some(1000.0)],
            &[Some(10.0), Some(20.0), Some(30.0), None],
        );
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_pairs_are_nan() {
        assert!(pearson_pairwise(&[Some(1.0)], &[Some(2.0)]).is_nan());
        assert!(pearson_pairwise(&[Some(1.0), Some(1.0)], &[Some(2.0), Some(3.0)]).is_nan());
    }

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let matrix = CorrelationMatrix::pearson(&[
            column("Rating", &[Some(4.1), Some(3.9), None, Some(4.7), Some(4.5)]),
            column("Reviews", &[Some(159.0), Some(967.0), Some(87510.0), None, Some(215644.0)]),
            column("Installs", &[Some(1e4), Some(5e5), Some(5e6), Some(5e7), Some(1e5)]),
        ]);

        assert_eq!(matrix.len(), 3);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), 1.0);
            for j in 0..3 {
                assert_eq!(matrix.get(i, j).to_bits(), matrix.get(j, i).to_bits());
                assert!(matrix.get(i, j) >= -1.0 && matrix.get(i, j) <= 1.0);
            }
        }
    }

    #[test]
    fn test_diagonal_one_for_single_value_column() {
        let matrix = CorrelationMatrix::pearson(&[
            column("a", &[Some(1.0), None]),
            column("b", &[None, None]),
        ]);

        assert_eq!(matrix.get(0, 0), 1.0);
        assert!(matrix.get(1, 1).is_nan());
        assert!(matrix.get(0, 1).is_nan());
    }
}

//! Row-wise L2 normalization of embedding matrices.

use crate::similarity::SimilarityError;

/// Rescale each embedding to unit Euclidean length.
///
/// Every row must share the same dimension. Rows with a near-zero norm are
/// rejected so cosine scores downstream stay finite.
pub fn normalize_rows(mut rows: Vec<Vec<f32>>) -> Result<Vec<Vec<f32>>, SimilarityError> {
    let dims = match rows.first() {
        Some(row) => row.len(),
        None => return Ok(rows),
    };
    if dims == 0 {
        return Err(SimilarityError::DimensionMismatch {
            expected: 1,
            got: 0,
        });
    }

    for (index, row) in rows.iter_mut().enumerate() {
        if row.len() != dims {
            return Err(SimilarityError::DimensionMismatch {
                expected: dims,
                got: row.len(),
            });
        }

        let norm = l2_norm(row);
        if norm < f32::EPSILON {
            return Err(SimilarityError::ZeroNormVector { index });
        }

        for value in row.iter_mut() {
            *value /= norm;
        }
    }

    Ok(rows)
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

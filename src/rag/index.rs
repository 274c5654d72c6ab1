//! Exact nearest-neighbour index over L2-normalized rows.
//!
//! Scores are cosine distances `1 - cos(q, v)` clamped into `[0, 1]`, so
//! `1 - distance` is a similarity in the same range.

use ndarray::{Array2, ArrayView1};

use super::error::IndexError;

#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub label: String,
    pub distance: f32,
}

#[derive(Debug, Clone)]
pub struct FlatIndex {
    labels: Vec<String>,
    matrix: Array2<f32>,
}

impl FlatIndex {
    pub fn build(entries: Vec<(String, Vec<f32>)>) -> Result<Self, IndexError> {
        let Some((_, first)) = entries.first() else {
            return Err(IndexError::Empty);
        };
        let dimensions = first.len();
        if dimensions == 0 {
            return Err(IndexError::Shape("vectors have zero dimensions".to_string()));
        }

        let mut labels = Vec::with_capacity(entries.len());
        let mut data = Vec::with_capacity(entries.len() * dimensions);
        for (label, vector) in entries {
            if vector.len() != dimensions {
                return Err(IndexError::DimensionMismatch {
                    label,
                    expected: dimensions,
                    actual: vector.len(),
                });
            }
            if vector.iter().any(|x| !x.is_finite()) {
                return Err(IndexError::NonFinite(label));
            }
            data.extend(normalized(&vector));
            labels.push(label);
        }

        let matrix = Array2::from_shape_vec((labels.len(), dimensions), data)
            .map_err(|e| IndexError::Shape(e.to_string()))?;

        Ok(Self { labels, matrix })
    }

    pub fn dimensions(&self) -> usize {
        self.matrix.ncols()
    }

    /// The `k` closest rows, ascending by distance. Ties keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<IndexHit>, IndexError> {
        if query.len() != self.dimensions() {
            return Err(IndexError::QueryDimension {
                expected: self.dimensions(),
                actual: query.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let query = normalized(query);
        let cosines = self.matrix.dot(&ArrayView1::from(&query[..]));

        let mut scored: Vec<(usize, f32)> = cosines
            .iter()
            .enumerate()
            .map(|(row, cos)| (row, cosine_distance(*cos)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(row, distance)| IndexHit {
                label: self.labels[row].clone(),
                distance,
            })
            .collect())
    }
}

fn cosine_distance(cos: f32) -> f32 {
    if cos.is_nan() {
        return 1.0;
    }
    (1.0 - cos).clamp(0.0, 1.0)
}

fn normalized(vector: &[f32]) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm <= f32::EPSILON {
        return vector.to_vec();
    }
    vector.iter().map(|x| x / norm).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(left: f32, right: f32) -> bool {
        (left - right).abs() < 1e-5
    }

    fn sample_index() -> FlatIndex {
        FlatIndex::build(vec![
            ("east".to_string(), vec![1.0, 0.0]),
            ("north".to_string(), vec![0.0, 2.0]),
            ("north-east".to_string(), vec![1.0, 1.0]),
        ])
        .expect("index builds")
    }

    #[test]
    fn identical_direction_has_zero_distance() {
        let hits = sample_index().search(&[3.0, 0.0], 1).expect("search");
        assert_eq!(hits[0].label, "east");
        assert!(approx_eq(hits[0].distance, 0.0));
    }

    #[test]
    fn results_are_ascending_and_truncated_to_k() {
        let hits = sample_index().search(&[1.0, 0.2], 2).expect("search");

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].label, "east");
        assert_eq!(hits[1].label, "north-east");
        assert!(hits[0].distance <= hits[1].distance);
    }

    #[test]
    fn opposite_vectors_clamp_to_unit_distance() {
        let hits = sample_index().search(&[-1.0, 0.0], 3).expect("search");
        assert!(hits.iter().all(|hit| (0.0..=1.0).contains(&hit.distance)));
        let east = hits.iter().find(|hit| hit.label == "east").expect("east present");
        assert!(approx_eq(east.distance, 1.0));
    }

    #[test]
    fn zero_query_is_maximally_distant() {
        let hits = sample_index().search(&[0.0, 0.0], 3).expect("search");
        assert!(hits.iter().all(|hit| approx_eq(hit.distance, 1.0)));
    }

    #[test]
    fn build_rejects_mixed_dimensions_and_empty_input() {
        let err = FlatIndex::build(vec![
            ("a".to_string(), vec![1.0, 0.0]),
            ("b".to_string(), vec![1.0]),
        ])
        .expect_err("mixed dims");
        assert!(matches!(err, IndexError::DimensionMismatch { ref label, .. } if label == "b"));

        assert!(matches!(FlatIndex::build(Vec::new()), Err(IndexError::Empty)));
    }

    #[test]
    fn build_rejects_non_finite_values() {
        let err = FlatIndex::build(vec![("nan".to_string(), vec![f32::NAN, 1.0])])
            .expect_err("nan rejected");
        assert!(matches!(err, IndexError::NonFinite(_)));
    }

    #[test]
    fn search_rejects_wrong_query_dimension() {
        let err = sample_index().search(&[1.0, 0.0, 0.0], 1).expect_err("dim mismatch");
        assert!(matches!(
            err,
            IndexError::QueryDimension {
                expected: 2,
                actual: 3
            }
        ));
    }
}

//! k-nearest-neighbor classification over labeled exemplars.
//!
//! A [`KnnModel`] is immutable once built and can be shared between threads
//! (for example behind an `Arc`) while any number of classifiers query it.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Anything that can be viewed as a fixed-length vector of features.
pub trait FeatureVector {
    /// The feature values.
    fn values(&self) -> &[f64];

    /// Number of features.
    fn dimension(&self) -> usize {
        self.values().len()
    }
}

impl FeatureVector for Vec<f64> {
    fn values(&self) -> &[f64] {
        self
    }
}

impl FeatureVector for [f64] {
    fn values(&self) -> &[f64] {
        self
    }
}

impl<const N: usize> FeatureVector for [f64; N] {
    fn values(&self) -> &[f64] {
        self
    }
}

/// A labeled training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exemplar<L, V = Vec<f64>> {
    /// Feature vector
    pub features: V,
    /// Class label
    pub label: L,
}

impl<L, V> Exemplar<L, V> {
    /// Create an exemplar.
    pub fn new(features: V, label: L) -> Self {
        Self { features, label }
    }
}

#[derive(Deserialize)]
struct ModelData<L, V> {
    exemplars: Vec<Exemplar<L, V>>,
}

/// An immutable set of exemplars sharing one dimension.
///
/// Serializes as `{"exemplars": [...]}`; deserializing re-runs the same
/// checks as [`KnnModel::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    try_from = "ModelData<L, V>",
    bound(
        serialize = "L: Serialize, V: Serialize",
        deserialize = "L: Deserialize<'de>, V: Deserialize<'de> + FeatureVector"
    )
)]
pub struct KnnModel<L, V = Vec<f64>> {
    exemplars: Vec<Exemplar<L, V>>,
    #[serde(skip)]
    dimension: usize,
    #[serde(skip)]
    min: Vec<f64>,
    #[serde(skip)]
    max: Vec<f64>,
}

impl<L, V: FeatureVector> KnnModel<L, V> {
    /// Build a model, checking that all exemplars share one dimension.
    ///
    /// An empty model is allowed; classifying against it fails with
    /// [`Error::EmptyModel`].
    pub fn new(exemplars: Vec<Exemplar<L, V>>) -> Result<Self> {
        let dimension = exemplars.first().map(|e| e.features.dimension()).unwrap_or(0);
        let mut min = vec![f64::INFINITY; dimension];
        let mut max = vec![f64::NEG_INFINITY; dimension];

        for exemplar in &exemplars {
            let values = exemplar.features.values();
            if values.len() != dimension {
                return Err(Error::InvalidFeatureVector {
                    expected: dimension,
                    actual: values.len(),
                });
            }
            for (d, &v) in values.iter().enumerate() {
                min[d] = min[d].min(v);
                max[d] = max[d].max(v);
            }
        }

        Ok(Self {
            exemplars,
            dimension,
            min,
            max,
        })
    }

    /// Number of exemplars.
    pub fn len(&self) -> usize {
        self.exemplars.len()
    }

    /// Whether the model holds no exemplars.
    pub fn is_empty(&self) -> bool {
        self.exemplars.is_empty()
    }

    /// Dimension shared by all exemplars (0 for an empty model).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The exemplars, in training order.
    pub fn exemplars(&self) -> &[Exemplar<L, V>] {
        &self.exemplars
    }

    /// Per-dimension `(min, max)` over the exemplars.
    pub fn range(&self, dimension: usize) -> Option<(f64, f64)> {
        Some((*self.min.get(dimension)?, *self.max.get(dimension)?))
    }

    fn normalize(&self, values: &[f64], normalization: Normalization, out: &mut Vec<f64>) {
        out.clear();
        match normalization {
            Normalization::None => out.extend_from_slice(values),
            Normalization::MinMax => {
                out.extend(values.iter().enumerate().map(|(d, &v)| {
                    let span = self.max[d] - self.min[d];
                    if span > 0.0 {
                        (v - self.min[d]) / span
                    } else {
                        0.0
                    }
                }));
            }
        }
    }
}

impl<L, V: FeatureVector> TryFrom<ModelData<L, V>> for KnnModel<L, V> {
    type Error = Error;

    fn try_from(data: ModelData<L, V>) -> Result<Self> {
        KnnModel::new(data.exemplars)
    }
}

/// Distance between two feature vectors of equal length.
pub trait DistanceMetric {
    /// Compute the distance.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

/// Euclidean (L2) distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl DistanceMetric for Euclidean {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    }
}

/// Manhattan (L1) distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl DistanceMetric for Manhattan {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
    }
}

/// Feature scaling applied before distances are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Scale every dimension to `[0, 1]` by the model's min/max
    #[default]
    MinMax,
    /// Use raw values
    None,
}

/// A k-nearest-neighbor classifier.
#[derive(Debug, Clone, Default)]
pub struct KnnClassifier<D = Euclidean> {
    metric: D,
    normalization: Normalization,
}

impl KnnClassifier<Euclidean> {
    /// Create a classifier with Euclidean distance over min-max normalized features.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: DistanceMetric> KnnClassifier<D> {
    /// Create a classifier with a custom distance metric.
    pub fn with_metric(metric: D) -> Self {
        Self {
            metric,
            normalization: Normalization::default(),
        }
    }

    /// Set the normalization.
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// The `k` exemplars nearest to `query` as `(exemplar index, distance)`.
    ///
    /// `k` is clamped to `1..=model.len()`. Exemplars at equal distance keep
    /// training order.
    pub fn nearest<L, V, Q>(
        &self,
        query: &Q,
        model: &KnnModel<L, V>,
        k: usize,
    ) -> Result<Vec<(usize, f64)>>
    where
        V: FeatureVector,
        Q: FeatureVector + ?Sized,
    {
        if model.is_empty() {
            return Err(Error::EmptyModel);
        }
        let values = query.values();
        if values.len() != model.dimension() {
            return Err(Error::InvalidFeatureVector {
                expected: model.dimension(),
                actual: values.len(),
            });
        }

        let mut normalized_query = Vec::with_capacity(values.len());
        model.normalize(values, self.normalization, &mut normalized_query);
        let mut normalized = Vec::with_capacity(values.len());

        let mut distances: Vec<(usize, f64)> = model
            .exemplars
            .iter()
            .enumerate()
            .map(|(i, exemplar)| {
                model.normalize(exemplar.features.values(), self.normalization, &mut normalized);
                (i, self.metric.distance(&normalized_query, &normalized))
            })
            .collect();
        distances.sort_by(|a, b| a.1.total_cmp(&b.1));
        distances.truncate(k.clamp(1, model.len()));
        Ok(distances)
    }

    /// Classify `query` by majority vote among its `k` nearest exemplars.
    ///
    /// When several labels share the highest vote count, the label of the
    /// nearest exemplar among them wins.
    pub fn classify<L, V, Q>(&self, query: &Q, model: &KnnModel<L, V>, k: usize) -> Result<L>
    where
        L: Clone + PartialEq,
        V: FeatureVector,
        Q: FeatureVector + ?Sized,
    {
        let nearest = self.nearest(query, model, k)?;

        // (label, votes, rank of its nearest exemplar)
        let mut tally: Vec<(&L, usize, usize)> = Vec::new();
        for (rank, &(index, _)) in nearest.iter().enumerate() {
            let label = &model.exemplars[index].label;
            match tally.iter_mut().find(|(l, _, _)| *l == label) {
                Some(entry) => entry.1 += 1,
                None => tally.push((label, 1, rank)),
            }
        }

        tally
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.2.cmp(&a.2)))
            .map(|(label, _, _)| label.clone())
            .ok_or(Error::EmptyModel)
    }
}

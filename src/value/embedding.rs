use serde::{Deserialize, Serialize};

/// A fixed-dimension numeric vector representation of text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Embedding(Vec<f32>);

impl From<Vec<f32>> for Embedding {
    fn from(value: Vec<f32>) -> Self {
        Self(value)
    }
}

impl From<Embedding> for Vec<f32> {
    fn from(value: Embedding) -> Self {
        value.0
    }
}

/// Dot product.
impl std::ops::Mul for &Embedding {
    type Output = f32;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.len() != rhs.len() {
            panic!("Cannot dot-product two embeddings of different lengths");
        }

        self.0.iter().zip(rhs.0.iter()).map(|(x, y)| x * y).sum()
    }
}

impl Embedding {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn norm(&self) -> f32 {
        self.0.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Cosine distance in `[0, 2]`. Zero-norm vectors are maximally distant.
    pub fn cosine_distance(&self, other: &Embedding) -> f32 {
        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 1.0;
        }
        1.0 - (self * other) / denom
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

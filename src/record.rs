//! The stored unit: id, source text and its embedding

/// One stored item. The vector is owned by the record and always has the
/// store's dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    id: usize,
    raw_text: String,
    raw_length: usize,
    vector: Vec<f32>,
}

impl VectorRecord {
    pub(crate) fn new(id: usize, raw_text: String, vector: Vec<f32>) -> VectorRecord {
        let raw_length = raw_text.len();
        VectorRecord { id, raw_text, raw_length, vector }
    }

    /// Replace text and vector, keeping the id.
    pub(crate) fn replace(&mut self, raw_text: String, vector: Vec<f32>) {
        self.raw_length = raw_text.len();
        self.raw_text = raw_text;
        self.vector = vector;
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Byte length of the text, captured when the record was created or last updated.
    pub fn raw_length(&self) -> usize {
        self.raw_length
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }
}

//! The store module
//! Owns the records, turns text into fixed-dimension vectors and ranks them

use std::cmp::Ordering;
use std::fmt;

use log::{debug, trace, warn};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::metric::Metric;
use crate::record::VectorRecord;
use crate::vector::fit_to_dimension;

/// Embedding callback: text in, raw values of any length out.
pub type EmbedFn = Box<dyn Fn(&str) -> Vec<f32>>;

pub struct VectorStore {
    dimension: usize,
    embedding_function: Option<EmbedFn>,
    records: Vec<VectorRecord>,
    next_id: usize,
}

impl VectorStore {
    /// Creates an empty store with no embedding function.
    ///
    /// Without an embedding function every text maps to the zero vector.
    /// Fails with [`StoreError::InvalidDimension`] when `dimension` is zero.
    pub fn new(dimension: usize) -> Result<VectorStore> {
        if dimension == 0 {
            return Err(StoreError::InvalidDimension(dimension));
        }
        Ok(VectorStore {
            dimension,
            embedding_function: None,
            records: Vec::new(),
            next_id: 1,
        })
    }

    /// Creates an empty store that embeds text with `embed`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vstore::VectorStore;
    ///
    /// let store = VectorStore::with_embedding(4, |text: &str| {
    ///     text.bytes().map(f32::from).collect()
    /// }).unwrap();
    /// assert_eq!(store.dimension(), 4);
    /// assert!(store.is_empty());
    /// ```
    pub fn with_embedding<F>(dimension: usize, embed: F) -> Result<VectorStore>
    where
        F: Fn(&str) -> Vec<f32> + 'static,
    {
        let mut store = VectorStore::new(dimension)?;
        store.embedding_function = Some(Box::new(embed));
        Ok(store)
    }

    /// Creates an empty store from validated configuration.
    pub fn from_config(config: &StoreConfig) -> Result<VectorStore> {
        config.validate()?;
        VectorStore::new(config.dimension)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the number of records in the store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Swaps the embedding function. Only later insertions and updates see it.
    pub fn set_embedding_function<F>(&mut self, embed: F)
    where
        F: Fn(&str) -> Vec<f32> + 'static,
    {
        debug!("Embedding function replaced");
        self.embedding_function = Some(Box::new(embed));
    }

    pub fn clear_embedding_function(&mut self) {
        debug!("Embedding function removed");
        self.embedding_function = None;
    }

    /// Embeds `raw_text` and forces the result to the store's dimension.
    ///
    /// Extra values are dropped from the tail, missing values are filled with
    /// zeros. With no embedding function the result is all zeros.
    pub fn preprocessing(&self, raw_text: &str) -> Vec<f32> {
        let raw = match &self.embedding_function {
            Some(embed) => embed(raw_text),
            None => {
                debug!("No embedding function configured, using zero vector");
                Vec::new()
            }
        };

        if raw.len() > self.dimension {
            warn!(
                "Embedding has {} values, truncating to dimension {}",
                raw.len(),
                self.dimension
            );
        }

        fit_to_dimension(raw, self.dimension)
    }

    /// Embeds and stores a text, returning the id assigned to it.
    ///
    /// Ids start at 1 and grow by one per insertion, so on a store without
    /// removals the id is the record count plus one. Removed ids are never
    /// handed out again and surviving records are never renumbered.
    ///
    /// # Examples
    ///
    /// ```
    /// use vstore::VectorStore;
    ///
    /// let mut store = VectorStore::with_embedding(3, |_: &str| vec![1.0]).unwrap();
    /// let id = store.add_text("hello");
    ///
    /// assert_eq!(id, 1);
    /// assert_eq!(store.get_raw_text(0).unwrap(), "hello");
    /// assert_eq!(store.get_vector(0).unwrap(), &[1.0, 0.0, 0.0]);
    /// ```
    pub fn add_text(&mut self, raw_text: impl Into<String>) -> usize {
        let raw_text = raw_text.into();
        let vector = self.preprocessing(&raw_text);
        let id = self.next_id;
        self.next_id += 1;

        self.records.push(VectorRecord::new(id, raw_text, vector));
        debug!("Added record id {} (total: {})", id, self.records.len());

        id
    }

    /// Replaces the text at `index` and recomputes its vector. The id is kept.
    pub fn update_text(&mut self, index: usize, new_raw_text: impl Into<String>) -> Result<()> {
        self.check_index(index)?;

        let new_raw_text = new_raw_text.into();
        let vector = self.preprocessing(&new_raw_text);
        let record = &mut self.records[index];
        record.replace(new_raw_text, vector);

        debug!("Updated record id {} at index {}", record.id(), index);
        Ok(())
    }

    /// Removes the record at `index` and hands it back.
    ///
    /// Later records shift down by one index; their ids do not change.
    ///
    /// # Examples
    ///
    /// ```
    /// use vstore::VectorStore;
    ///
    /// let mut store = VectorStore::new(2).unwrap();
    /// store.add_text("a");
    /// store.add_text("b");
    ///
    /// let removed = store.remove_at(0).unwrap();
    /// assert_eq!(removed.raw_text(), "a");
    /// assert_eq!(store.get_id(0).unwrap(), 2);
    ///
    /// assert!(store.remove_at(5).is_err());
    /// ```
    pub fn remove_at(&mut self, index: usize) -> Result<VectorRecord> {
        self.check_index(index)?;

        let record = self.records.remove(index);
        debug!("Removed record id {} (total: {})", record.id(), self.records.len());
        Ok(record)
    }

    /// Drops every record. Id assignment starts over at 1.
    pub fn clear(&mut self) {
        debug!("Clearing {} records", self.records.len());
        self.records.clear();
        self.next_id = 1;
    }

    pub fn get_record(&self, index: usize) -> Result<&VectorRecord> {
        self.check_index(index)?;
        Ok(&self.records[index])
    }

    pub fn get_vector(&self, index: usize) -> Result<&[f32]> {
        self.get_record(index).map(|r| r.vector())
    }

    pub fn get_raw_text(&self, index: usize) -> Result<&str> {
        self.get_record(index).map(|r| r.raw_text())
    }

    pub fn get_raw_length(&self, index: usize) -> Result<usize> {
        self.get_record(index).map(|r| r.raw_length())
    }

    pub fn get_id(&self, index: usize) -> Result<usize> {
        self.get_record(index).map(|r| r.id())
    }

    /// Iterates over the records in index order.
    pub fn records(&self) -> impl Iterator<Item = &VectorRecord> {
        self.records.iter()
    }

    /// Calls `action(vector, id, raw_text)` for every record in index order.
    pub fn for_each<F>(&self, mut action: F)
    where
        F: FnMut(&[f32], usize, &str),
    {
        for record in &self.records {
            action(record.vector(), record.id(), record.raw_text());
        }
    }

    // Metrics read at most `dimension` values of each side.

    pub fn cosine_similarity(&self, v1: &[f32], v2: &[f32]) -> f64 {
        Metric::Cosine.score(self.bounded(v1), self.bounded(v2))
    }

    pub fn l1_distance(&self, v1: &[f32], v2: &[f32]) -> f64 {
        Metric::Manhattan.score(self.bounded(v1), self.bounded(v2))
    }

    pub fn l2_distance(&self, v1: &[f32], v2: &[f32]) -> f64 {
        Metric::Euclidean.score(self.bounded(v1), self.bounded(v2))
    }

    /// Finds the index of the record closest to `query` under the named metric.
    ///
    /// # Arguments
    ///
    /// * `query` - Query vector of the store's dimension
    /// * `metric` - One of `"cosine"`, `"euclidean"`, `"manhattan"`
    ///
    /// # Returns
    ///
    /// * `Ok(Some(index))` - Index (not id) of the best match; the lowest index wins ties
    /// * `Ok(None)` - The store is empty
    /// * `Err(StoreError::InvalidMetric)` - Unknown metric name on a non-empty store
    ///
    /// # Examples
    ///
    /// ```
    /// use vstore::VectorStore;
    ///
    /// let mut store = VectorStore::with_embedding(2, |text: &str| match text {
    ///     "east" => vec![1.0, 0.0],
    ///     _ => vec![0.0, 1.0],
    /// }).unwrap();
    ///
    /// assert_eq!(store.find_nearest(&[1.0, 0.0], "cosine").unwrap(), None);
    ///
    /// store.add_text("north");
    /// store.add_text("east");
    /// assert_eq!(store.find_nearest(&[0.9, 0.1], "cosine").unwrap(), Some(1));
    /// assert!(store.find_nearest(&[0.9, 0.1], "bogus").is_err());
    /// ```
    pub fn find_nearest(&self, query: &[f32], metric: &str) -> Result<Option<usize>> {
        if self.records.is_empty() {
            return Ok(None);
        }

        let metric: Metric = metric.parse()?;
        Ok(self.nearest(query, metric))
    }

    /// Typed form of [`find_nearest`](VectorStore::find_nearest).
    pub fn nearest(&self, query: &[f32], metric: Metric) -> Option<usize> {
        let query = self.bounded(query);
        let mut best_score = metric.worst_score();
        let mut best_index = None;

        for (i, record) in self.records.iter().enumerate() {
            let score = metric.score(query, record.vector());
            if metric.is_better(score, best_score) {
                best_score = score;
                best_index = Some(i);
            }
        }

        trace!("nearest ({}) -> {:?} score {}", metric, best_index, best_score);
        best_index
    }

    /// Returns the indices of the `k` best matches for `query`, best first.
    ///
    /// Records with equal scores keep their index order.
    ///
    /// # Arguments
    ///
    /// * `query` - Query vector of the store's dimension
    /// * `k` - Number of indices to return, between 1 and [`len`](VectorStore::len)
    /// * `metric` - One of `"cosine"`, `"euclidean"`, `"manhattan"`
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<usize>)` - Exactly `k` indices
    /// * `Err(StoreError::InvalidK)` - `k` is zero or larger than the store
    /// * `Err(StoreError::InvalidMetric)` - Unknown metric name
    ///
    /// # Examples
    ///
    /// ```
    /// use vstore::VectorStore;
    ///
    /// let mut store = VectorStore::with_embedding(3, |text: &str| match text {
    ///     "x" => vec![1.0, 0.0, 0.0],
    ///     "y" => vec![0.0, 1.0, 0.0],
    ///     _ => vec![1.0, 1.0, 0.0],
    /// }).unwrap();
    /// store.add_text("x");
    /// store.add_text("y");
    /// store.add_text("xy");
    ///
    /// let top = store.top_k_nearest(&[1.0, 0.0, 0.0], 2, "cosine").unwrap();
    /// assert_eq!(top, vec![0, 2]);
    ///
    /// assert!(store.top_k_nearest(&[1.0, 0.0, 0.0], 0, "cosine").is_err());
    /// assert!(store.top_k_nearest(&[1.0, 0.0, 0.0], 4, "cosine").is_err());
    /// ```
    pub fn top_k_nearest(&self, query: &[f32], k: usize, metric: &str) -> Result<Vec<usize>> {
        self.check_k(k)?;
        let metric: Metric = metric.parse()?;
        Ok(self.rank(query, k, metric))
    }

    /// Typed form of [`top_k_nearest`](VectorStore::top_k_nearest).
    pub fn top_k(&self, query: &[f32], k: usize, metric: Metric) -> Result<Vec<usize>> {
        self.check_k(k)?;
        Ok(self.rank(query, k, metric))
    }

    /// Best-first indices of the `k` top records. `k` must already be valid.
    fn rank(&self, query: &[f32], k: usize, metric: Metric) -> Vec<usize> {
        let query = self.bounded(query);
        let mut scored: Vec<(f64, usize)> = self.records.iter()
            .enumerate()
            .map(|(i, record)| (metric.sort_key(metric.score(query, record.vector())), i))
            .collect();

        // Index as secondary key keeps ties in scan order
        scored.sort_by(|a, b| compare_keys(a.0, b.0).then(a.1.cmp(&b.1)));

        let result: Vec<usize> = scored.into_iter()
            .take(k)
            .map(|(_, i)| i)
            .collect();

        trace!("top_k ({}, k={}) -> {:?}", metric, k, result);
        result
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.records.len() {
            return Err(StoreError::OutOfRange { index, len: self.records.len() });
        }
        Ok(())
    }

    fn check_k(&self, k: usize) -> Result<()> {
        if k == 0 || k > self.records.len() {
            return Err(StoreError::InvalidK { k, len: self.records.len() });
        }
        Ok(())
    }

    fn bounded<'a>(&self, vector: &'a [f32]) -> &'a [f32] {
        &vector[..vector.len().min(self.dimension)]
    }
}

/// Total order on sort keys: NaN sorts after every number, so a record
/// with an undefined score is never ranked above a real match.
fn compare_keys(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

impl fmt::Debug for VectorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorStore")
            .field("dimension", &self.dimension)
            .field("embedding_function", &self.embedding_function.is_some())
            .field("records", &self.records)
            .finish()
    }
}

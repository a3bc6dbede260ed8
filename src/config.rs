//! Store configuration
//! Settings can be built in code or read from JSON

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Length of every stored and queried vector
    pub dimension: usize,
}

impl StoreConfig {
    pub fn new(dimension: usize) -> StoreConfig {
        StoreConfig { dimension }
    }

    /// Parses a configuration from JSON text and validates it.
    ///
    /// # Examples
    ///
    /// ```
    /// use vstore::StoreConfig;
    ///
    /// let config = StoreConfig::from_json(r#"{"dimension": 384}"#).unwrap();
    /// assert_eq!(config.dimension, 384);
    ///
    /// assert!(StoreConfig::from_json(r#"{"dimension": 0}"#).is_err());
    /// ```
    pub fn from_json(text: &str) -> Result<StoreConfig> {
        let config: StoreConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(StoreError::InvalidDimension(self.dimension));
        }
        Ok(())
    }
}

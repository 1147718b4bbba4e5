use crate::error::ConfigurationError;

pub const DEFAULT_CAPACITY: usize = 60000;
pub const DEFAULT_MAX_STACK_DEPTH: usize = 32;

/// Process-level sampling settings, fixed before any sample is taken.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Number of sample slots in the buffer.
    pub capacity: usize,
    /// Frames kept per sample; deeper frames are truncated.
    pub max_stack_depth: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
        }
    }
}

impl Configuration {
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let configuration: Self = serde_json::from_str(json)?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.capacity == 0 {
            return Err(ConfigurationError::ZeroCapacity);
        }
        if self.max_stack_depth == 0 {
            return Err(ConfigurationError::ZeroStackDepth);
        }
        Ok(())
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_max_stack_depth(mut self, depth: usize) -> Self {
        self.max_stack_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_fills_defaults() {
        let configuration = Configuration::from_json(r#"{"capacity": 16}"#).unwrap();
        assert_eq!(configuration.capacity, 16);
        assert_eq!(configuration.max_stack_depth, DEFAULT_MAX_STACK_DEPTH);
    }

    #[test]
    fn test_from_json_rejects_invalid_values() {
        assert!(matches!(
            Configuration::from_json(r#"{"capacity": 0}"#),
            Err(ConfigurationError::ZeroCapacity)
        ));
        assert!(matches!(
            Configuration::from_json(r#"{"max_stack_depth": 0}"#),
            Err(ConfigurationError::ZeroStackDepth)
        ));
        assert!(matches!(
            Configuration::from_json(r#"{"capacity": -1}"#),
            Err(ConfigurationError::Parse(_))
        ));
    }
}

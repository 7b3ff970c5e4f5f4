use crate::arena::DEFAULT_ARENA_CAPACITY;
use crate::error::CoreError;

pub const DEFAULT_SOURCE_EXTENSION: &str = "cfh";
pub const DEFAULT_OUTPUT_EXTENSION: &str = "h";

/// Knobs for a hierarchy build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyConfig {
    /// Extension (without the dot) of class-declaration source files.
    pub source_extension: String,
    /// Extension (without the dot) of the generated file for each source file.
    pub output_extension: String,
    /// Capacity of the per-file parse arena, in bytes.
    pub arena_capacity: usize,
}

impl HierarchyConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.source_extension.is_empty() {
            return Err(CoreError::Config(
                "source extension must not be empty".to_string(),
            ));
        }
        if self.output_extension.is_empty() {
            return Err(CoreError::Config(
                "output extension must not be empty".to_string(),
            ));
        }
        if self.source_extension.starts_with('.') || self.output_extension.starts_with('.') {
            return Err(CoreError::Config(
                "extensions are given without a leading '.'".to_string(),
            ));
        }
        if self.arena_capacity == 0 {
            return Err(CoreError::Config(
                "arena capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            arena_capacity: DEFAULT_ARENA_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        HierarchyConfig::default().validate().expect("valid");
    }

    #[test]
    fn rejects_empty_or_dotted_extensions() {
        let config = HierarchyConfig {
            source_extension: String::new(),
            ..HierarchyConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let config = HierarchyConfig {
            output_extension: ".h".to_string(),
            ..HierarchyConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn rejects_zero_arena_capacity() {
        let config = HierarchyConfig {
            arena_capacity: 0,
            ..HierarchyConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }
}

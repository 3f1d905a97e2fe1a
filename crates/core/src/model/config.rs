use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Width below which sections stack vertically.
pub const DEFAULT_BREAKPOINT_PX: f64 = 1024.0;
/// How long auto-advance dwells on each section.
pub const DEFAULT_DWELL_MS: u32 = 3000;

/// Engine tuning. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub breakpoint_px: f64,
    pub dwell_ms: u32,
    /// Publish the active index only when it changes. When false, every
    /// scroll event republishes it.
    pub edge_triggered: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: DEFAULT_BREAKPOINT_PX,
            dwell_ms: DEFAULT_DWELL_MS,
            edge_triggered: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.breakpoint_px.is_finite() || self.breakpoint_px <= 0.0 {
            return Err(ConfigError::InvalidBreakpoint(self.breakpoint_px));
        }
        if self.dwell_ms == 0 {
            return Err(ConfigError::ZeroDwell);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = EngineConfig::from_json("{}");
        assert!(matches!(config, Ok(ref c) if *c == EngineConfig::default()));
    }

    #[test]
    fn partial_override() {
        let config = EngineConfig::from_json(r#"{"dwellMs": 1500}"#).unwrap_or_default();
        assert_eq!(config.dwell_ms, 1500);
        assert!((config.breakpoint_px - DEFAULT_BREAKPOINT_PX).abs() < f64::EPSILON);
        assert!(config.edge_triggered);
    }

    #[test]
    fn rejects_bad_breakpoint() {
        let err = EngineConfig::from_json(r#"{"breakpointPx": -5}"#);
        assert!(matches!(err, Err(ConfigError::InvalidBreakpoint(_))));
    }

    #[test]
    fn rejects_zero_dwell() {
        let err = EngineConfig::from_json(r#"{"dwellMs": 0}"#);
        assert!(matches!(err, Err(ConfigError::ZeroDwell)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            EngineConfig::from_json("{breakpoint"),
            Err(ConfigError::Json(_))
        ));
    }
}

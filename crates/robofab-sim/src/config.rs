use robofab_paths::Neighborhood;

use crate::error::{FactoryError, FactoryResult};

/// Timing and movement parameters of a [`Factory`](crate::Factory).
///
/// All durations are in milliseconds. With the `serde` feature, missing
/// fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FactoryConfig {
    /// How long a producer stays busy after an item is picked up.
    pub producer_delay_ms: u32,
    /// How long a consumer stays busy after an item is dropped off.
    pub consumer_delay_ms: u32,
    /// How long a robot works at a machine before leaving.
    pub robot_work_ms: u32,
    /// How long a robot takes to move one cell.
    pub robot_step_ms: u32,
    /// Which moves robots may take.
    pub neighborhood: Neighborhood,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            producer_delay_ms: 15_000,
            consumer_delay_ms: 3_000,
            robot_work_ms: 500,
            robot_step_ms: 500,
            neighborhood: Neighborhood::Eight,
        }
    }
}

impl FactoryConfig {
    /// Check that every duration is positive.
    pub fn validate(&self) -> FactoryResult<()> {
        let durations = [
            ("producer_delay_ms", self.producer_delay_ms),
            ("consumer_delay_ms", self.consumer_delay_ms),
            ("robot_work_ms", self.robot_work_ms),
            ("robot_step_ms", self.robot_step_ms),
        ];
        for (name, value) in durations {
            if value == 0 {
                return Err(FactoryError::InvalidConfig(format!("{name} must be > 0")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(FactoryConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_duration_is_rejected() {
        let config = FactoryConfig {
            robot_step_ms: 0,
            ..FactoryConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: robot_step_ms must be > 0"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_fills_missing_fields() {
        let config: FactoryConfig =
            serde_json::from_str(r#"{"robot_step_ms": 250, "neighborhood": "four"}"#).unwrap();
        assert_eq!(config.robot_step_ms, 250);
        assert_eq!(config.neighborhood, Neighborhood::Four);
        assert_eq!(config.producer_delay_ms, 15_000);

        let json = serde_json::to_string(&config).unwrap();
        let back: FactoryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}

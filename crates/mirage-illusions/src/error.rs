use std::fmt;

/// A demo configuration that cannot produce a sensible scene.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroRows,
    ZeroColumns,
    /// A length that must be strictly positive.
    NonPositive { field: &'static str, value: f32 },
    /// `min <= default <= max` does not hold for the slant range.
    SlantRange { min: f32, max: f32, default: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroRows => write!(f, "wall needs at least one row"),
            ConfigError::ZeroColumns => write!(f, "wall needs at least one tile per row"),
            ConfigError::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            ConfigError::SlantRange { min, max, default } => write!(
                f,
                "slant default {default}° must lie within [{min}°, {max}°]"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_field() {
        let e = ConfigError::NonPositive { field: "tile_width", value: -1.0 };
        assert_eq!(e.to_string(), "tile_width must be positive, got -1");
        let e = ConfigError::SlantRange { min: 0.0, max: 10.0, default: 12.0 };
        assert!(e.to_string().contains("[0°, 10°]"));
    }
}

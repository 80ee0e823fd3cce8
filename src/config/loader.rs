//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,ignore
/// use tmc5160::load_config;
///
/// let config = load_config("drivers.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<SystemConfig> {
    let config: SystemConfig = toml::from_str(content).map_err(|e| {
        let msg = heapless::String::try_from(e.message()).unwrap_or_default();
        Error::Config(ConfigError::ParseError(msg))
    })?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DriverConfig, PollPolicy};

    #[test]
    fn test_empty_table_is_baseline() {
        let toml = r#"
[drivers.x_axis]
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.driver("x_axis"), Some(&DriverConfig::default()));
    }

    #[test]
    fn test_parse_full_driver() {
        let toml = r#"
[drivers.x_axis]
stealth_chop = false
shaft = true
power_down_delay = 20
pwm_threshold = 1000

[drivers.x_axis.current]
irun = 20

[drivers.x_axis.chopper]
toff = 5
mres = 4

[drivers.x_axis.ramp]
vmax = 50000
amax = 1000

[drivers.x_axis.polling]
interval_ms = 10
max_polls = 500
"#;

        let config = parse_config(toml).unwrap();
        let driver = config.driver("x_axis").unwrap();
        assert!(!driver.stealth_chop);
        assert!(driver.multistep_filter);
        assert!(driver.shaft);
        assert_eq!(driver.power_down_delay, 20);
        assert_eq!(driver.current.irun, 20);
        assert_eq!(driver.current.ihold, 2);
        assert_eq!(driver.chopper.toff, 5);
        assert_eq!(driver.chopper.hstrt, 4);
        assert_eq!(driver.ramp.vmax, 50_000);
        assert_eq!(driver.ramp.a1, 5_000);
        assert_eq!(driver.polling, PollPolicy::bounded(10, 500));
    }

    #[test]
    fn test_invalid_value_fails_validation() {
        let toml = r#"
[drivers.x_axis.chopper]
tbl = 4
"#;

        assert!(matches!(
            parse_config(toml),
            Err(Error::Config(ConfigError::ChopperOutOfRange { field: "tbl", .. }))
        ));
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(
            parse_config("[drivers.x_axis"),
            Err(Error::Config(ConfigError::ParseError(_)))
        ));
    }
}

//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{DriverConfig, PollPolicy, RampParameters, SystemConfig};

const MAX_CURRENT: u8 = 31;
const MAX_IHOLDDELAY: u8 = 15;
const MAX_TOFF: u8 = 15;
const MAX_HSTRT: u8 = 7;
const MAX_HEND: u8 = 15;
const MAX_TBL: u8 = 3;
const MAX_MRES: u8 = 8;

const MAX_U16: u32 = (1 << 16) - 1;
const MAX_U18: u32 = (1 << 18) - 1;
const MAX_U20: u32 = (1 << 20) - 1;
const MAX_VMAX: u32 = (1 << 23) - 512;

/// Validate a system configuration.
///
/// Checks every driver with [`validate_driver`].
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (_name, driver) in config.drivers.iter() {
        validate_driver(driver)?;
    }

    Ok(())
}

/// Validate one driver configuration.
///
/// Checks:
/// - Current and chopper settings fit their register fields
/// - TPWMTHRS fits 20 bits
/// - Ramp parameters fit their registers, D1 and VSTOP are non-zero, VSTOP >= VSTART
/// - Poll interval and poll bound are non-zero
pub fn validate_driver(config: &DriverConfig) -> Result<()> {
    let current = &config.current;
    check_current("ihold", current.ihold, MAX_CURRENT)?;
    check_current("irun", current.irun, MAX_CURRENT)?;
    check_current("iholddelay", current.iholddelay, MAX_IHOLDDELAY)?;

    let chopper = &config.chopper;
    check_chopper("toff", chopper.toff, MAX_TOFF)?;
    check_chopper("hstrt", chopper.hstrt, MAX_HSTRT)?;
    check_chopper("hend", chopper.hend, MAX_HEND)?;
    check_chopper("tbl", chopper.tbl, MAX_TBL)?;
    check_chopper("mres", chopper.mres, MAX_MRES)?;

    if config.pwm_threshold > MAX_U20 {
        return Err(Error::Config(ConfigError::PwmThresholdOutOfRange(
            config.pwm_threshold,
        )));
    }

    validate_ramp(&config.ramp)?;
    validate_polling(&config.polling)
}

/// Validate ramp parameters against the register widths.
pub fn validate_ramp(ramp: &RampParameters) -> Result<()> {
    check_ramp("a1", ramp.a1, MAX_U16, false)?;
    check_ramp("v1", ramp.v1, MAX_U20, false)?;
    check_ramp("amax", ramp.amax, MAX_U16, false)?;
    check_ramp("vmax", ramp.vmax, MAX_VMAX, false)?;
    check_ramp("dmax", ramp.dmax, MAX_U16, false)?;
    check_ramp("d1", ramp.d1, MAX_U16, true)?;
    check_ramp("vstart", ramp.vstart, MAX_U18, false)?;
    check_ramp("vstop", ramp.vstop, MAX_U18, true)?;

    if ramp.vstop < ramp.vstart {
        return Err(Error::Config(ConfigError::InvalidRampOrder {
            vstart: ramp.vstart,
            vstop: ramp.vstop,
        }));
    }

    Ok(())
}

fn validate_polling(policy: &PollPolicy) -> Result<()> {
    if policy.interval_ms == 0 || policy.max_polls == Some(0) {
        return Err(Error::Config(ConfigError::InvalidPollPolicy));
    }
    Ok(())
}

fn check_current(field: &'static str, value: u8, max: u8) -> Result<()> {
    if value > max {
        return Err(Error::Config(ConfigError::CurrentOutOfRange { field, value, max }));
    }
    Ok(())
}

fn check_chopper(field: &'static str, value: u8, max: u8) -> Result<()> {
    if value > max {
        return Err(Error::Config(ConfigError::ChopperOutOfRange { field, value, max }));
    }
    Ok(())
}

fn check_ramp(field: &'static str, value: u32, max: u32, non_zero: bool) -> Result<()> {
    if value > max || (non_zero && value == 0) {
        return Err(Error::Config(ConfigError::RampParameterOutOfRange {
            field,
            value,
            max,
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CurrentSettings;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_driver(&DriverConfig::default()).is_ok());
    }

    #[test]
    fn test_run_current_out_of_range() {
        let config = DriverConfig {
            current: CurrentSettings {
                irun: 32,
                ..CurrentSettings::default()
            },
            ..DriverConfig::default()
        };

        let result = validate_driver(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::CurrentOutOfRange { field: "irun", .. }))
        ));
    }

    #[test]
    fn test_zero_d1_is_rejected() {
        let ramp = RampParameters {
            d1: 0,
            ..RampParameters::default()
        };
        assert!(matches!(
            validate_ramp(&ramp),
            Err(Error::Config(ConfigError::RampParameterOutOfRange { field: "d1", .. }))
        ));
    }

    #[test]
    fn test_vstop_below_vstart() {
        let ramp = RampParameters {
            vstart: 20,
            vstop: 10,
            ..RampParameters::default()
        };
        assert_eq!(
            validate_ramp(&ramp),
            Err(Error::Config(ConfigError::InvalidRampOrder {
                vstart: 20,
                vstop: 10
            }))
        );
    }

    #[test]
    fn test_vmax_limit() {
        let mut ramp = RampParameters::default();
        ramp.vmax = MAX_VMAX;
        assert!(validate_ramp(&ramp).is_ok());
        ramp.vmax = MAX_VMAX + 1;
        assert!(validate_ramp(&ramp).is_err());
    }

    #[test]
    fn test_zero_poll_bound() {
        let config = DriverConfig {
            polling: PollPolicy::bounded(100, 0),
            ..DriverConfig::default()
        };
        assert_eq!(
            validate_driver(&config),
            Err(Error::Config(ConfigError::InvalidPollPolicy))
        );
    }
}

//! Per-chip driver configuration from TOML.

use serde::Deserialize;

use crate::registers::{ChopperConfig, CurrentControl, GlobalConfig};

use super::polling::PollPolicy;
use super::ramp::RampParameters;

/// Configuration of one TMC5160.
///
/// Every field has a default, so an empty `[drivers.<name>]` table gives the
/// baseline configuration written by `apply_defaults`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Enable stealthChop voltage PWM mode (GCONF.en_pwm_mode).
    pub stealth_chop: bool,

    /// Enable the step input filter (GCONF.multistep_filt).
    pub multistep_filter: bool,

    /// Invert motor direction (GCONF.shaft).
    pub shaft: bool,

    /// Delay from standstill to current reduction (TPOWERDOWN).
    pub power_down_delay: u8,

    /// Upper velocity for stealthChop (TPWMTHRS).
    pub pwm_threshold: u32,

    /// Hold and run current.
    pub current: CurrentSettings,

    /// Chopper settings.
    pub chopper: ChopperSettings,

    /// Ramp generator parameters.
    pub ramp: RampParameters,

    /// Wait loop policy.
    pub polling: PollPolicy,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            stealth_chop: true,
            multistep_filter: true,
            shaft: false,
            power_down_delay: 10,
            pwm_threshold: 500,
            current: CurrentSettings::default(),
            chopper: ChopperSettings::default(),
            ramp: RampParameters::default(),
            polling: PollPolicy::default(),
        }
    }
}

impl DriverConfig {
    /// GCONF word for this configuration.
    pub fn global_config(&self) -> GlobalConfig {
        let mut gconf = GlobalConfig::default();
        gconf.set_en_pwm_mode(self.stealth_chop);
        gconf.set_multistep_filt(self.multistep_filter);
        gconf.set_shaft(self.shaft);
        gconf
    }

    /// IHOLD_IRUN word for this configuration.
    pub fn current_control(&self) -> CurrentControl {
        self.current.to_register()
    }

    /// CHOPCONF word for this configuration.
    pub fn chopper_config(&self) -> ChopperConfig {
        self.chopper.to_register()
    }
}

/// Motor current scaling (IHOLD_IRUN).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CurrentSettings {
    /// Standstill current, 0-31.
    pub ihold: u8,
    /// Run current, 0-31.
    pub irun: u8,
    /// Power down ramp length, 0-15.
    pub iholddelay: u8,
}

impl Default for CurrentSettings {
    fn default() -> Self {
        Self {
            ihold: 2,
            irun: 15,
            iholddelay: 2,
        }
    }
}

impl CurrentSettings {
    /// Pack into the register payload.
    pub fn to_register(&self) -> CurrentControl {
        let mut current = CurrentControl::default();
        current.set_ihold(self.ihold);
        current.set_irun(self.irun);
        current.set_iholddelay(self.iholddelay);
        current
    }
}

/// Chopper settings (CHOPCONF subset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChopperSettings {
    /// Off time, 0-15; 0 disables the driver stage.
    pub toff: u8,
    /// Hysteresis start, 0-7.
    pub hstrt: u8,
    /// Hysteresis end, 0-15.
    pub hend: u8,
    /// Blank time select, 0-3.
    pub tbl: u8,
    /// Constant off time chopper mode.
    pub chm: bool,
    /// Microstep resolution, 0 (256 microsteps) to 8 (full step).
    pub mres: u8,
}

impl Default for ChopperSettings {
    fn default() -> Self {
        Self {
            toff: 3,
            hstrt: 4,
            hend: 1,
            tbl: 2,
            chm: false,
            mres: 0,
        }
    }
}

impl ChopperSettings {
    /// Pack into the register payload. Fields not covered here stay zero.
    pub fn to_register(&self) -> ChopperConfig {
        let mut chop = ChopperConfig::default();
        chop.set_toff(self.toff);
        chop.set_hstrt(self.hstrt);
        chop.set_hend(self.hend);
        chop.set_tbl(self.tbl);
        chop.set_chm(self.chm);
        chop.set_mres(self.mres);
        chop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_baseline_words() {
        let config = DriverConfig::default();
        assert_eq!(config.global_config().bits(), 0x0000_000C);
        assert_eq!(config.current_control().bits(), 0x0002_0F02);
        assert_eq!(config.chopper_config().bits(), 0x0001_00C3);
    }

    #[test]
    fn test_shaft_and_mres() {
        let config = DriverConfig {
            shaft: true,
            stealth_chop: false,
            chopper: ChopperSettings {
                mres: 4,
                ..ChopperSettings::default()
            },
            ..DriverConfig::default()
        };
        assert_eq!(config.global_config().bits(), 0b1_1000);
        assert_eq!(config.chopper_config().mres(), 4);
    }
}

//! Builder pattern for Tmc5160.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use embedded_hal_async::delay::DelayNs;

use crate::bus::RegisterBus;
use crate::config::{validate_driver, DriverConfig, PollPolicy, RampParameters, SystemConfig};
use crate::error::{ConfigError, Error, Result};

use super::driver::Tmc5160;
use super::pins::NoEnablePin;

/// Builder for creating Tmc5160 instances.
#[derive(Debug)]
pub struct Tmc5160Builder<SPI, CS, DELAY, EN = NoEnablePin> {
    spi: Option<SPI>,
    chip_select: Option<CS>,
    delay: Option<DELAY>,
    enable: EN,
    name: Option<heapless::String<32>>,
    config: DriverConfig,
    apply_defaults: bool,
}

impl<SPI, CS, DELAY> Default for Tmc5160Builder<SPI, CS, DELAY, NoEnablePin>
where
    SPI: SpiBus,
    CS: OutputPin,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<SPI, CS, DELAY> Tmc5160Builder<SPI, CS, DELAY, NoEnablePin>
where
    SPI: SpiBus,
    CS: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            spi: None,
            chip_select: None,
            delay: None,
            enable: NoEnablePin,
            name: None,
            config: DriverConfig::default(),
            apply_defaults: true,
        }
    }
}

impl<SPI, CS, DELAY, EN> Tmc5160Builder<SPI, CS, DELAY, EN>
where
    SPI: SpiBus,
    CS: OutputPin,
    DELAY: DelayNs,
    EN: OutputPin,
{
    /// Set the SPI transport.
    pub fn spi(mut self, spi: SPI) -> Self {
        self.spi = Some(spi);
        self
    }

    /// Set the chip-select pin.
    pub fn chip_select(mut self, pin: CS) -> Self {
        self.chip_select = Some(pin);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the enable pin.
    pub fn enable_pin<PIN: OutputPin>(self, pin: PIN) -> Tmc5160Builder<SPI, CS, DELAY, PIN> {
        Tmc5160Builder {
            spi: self.spi,
            chip_select: self.chip_select,
            delay: self.delay,
            enable: pin,
            name: self.name,
            config: self.config,
            apply_defaults: self.apply_defaults,
        }
    }

    /// Set the driver name.
    ///
    /// Names longer than 32 bytes keep their leading characters.
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(truncated_name(name));
        self
    }

    /// Set the ramp defaults.
    pub fn ramp(mut self, ramp: RampParameters) -> Self {
        self.config.ramp = ramp;
        self
    }

    /// Set the wait loop policy.
    pub fn polling(mut self, policy: PollPolicy) -> Self {
        self.config.polling = policy;
        self
    }

    /// Whether `build` writes the baseline configuration (default `true`).
    pub fn apply_defaults(mut self, apply: bool) -> Self {
        self.apply_defaults = apply;
        self
    }

    /// Configure from a DriverConfig.
    pub fn from_driver_config(mut self, config: &DriverConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Configure from SystemConfig by driver name.
    ///
    /// The driver name becomes the handle name unless one was set.
    pub fn from_config(mut self, config: &SystemConfig, driver_name: &str) -> Result<Self> {
        let driver_config = config.driver(driver_name).ok_or_else(|| {
            Error::Config(ConfigError::DriverNotFound(
                heapless::String::try_from(driver_name).unwrap_or_default(),
            ))
        })?;

        if self.name.is_none() {
            self.name = Some(truncated_name(driver_name));
        }
        Ok(self.from_driver_config(driver_config))
    }

    /// Build the Tmc5160.
    ///
    /// Validates the configuration, drives chip-select to idle and, unless
    /// disabled, writes the baseline configuration.
    ///
    /// # Errors
    ///
    /// Returns the builder with the error if required fields are missing, the
    /// configuration is invalid, or a register write fails. The builder still
    /// owns every part it was given.
    pub fn build(self) -> core::result::Result<Tmc5160<SPI, CS, DELAY, EN>, (Self, Error)> {
        if let Err(e) = validate_driver(&self.config) {
            return Err((self, e));
        }

        let Tmc5160Builder {
            spi,
            chip_select,
            delay,
            enable,
            name,
            config,
            apply_defaults,
        } = self;

        let (spi, chip_select, delay) = match (spi, chip_select, delay) {
            (Some(spi), Some(chip_select), Some(delay)) => (spi, chip_select, delay),
            (spi, chip_select, delay) => {
                let field = if spi.is_none() {
                    "spi"
                } else if chip_select.is_none() {
                    "chip_select"
                } else {
                    "delay"
                };
                let builder = Tmc5160Builder {
                    spi,
                    chip_select,
                    delay,
                    enable,
                    name,
                    config,
                    apply_defaults,
                };
                return Err((builder, Error::Config(ConfigError::MissingField(field))));
            }
        };

        let name = name.unwrap_or_else(|| truncated_name("tmc5160"));
        let mut driver = Tmc5160::new(
            RegisterBus::new(spi, chip_select),
            delay,
            enable,
            name,
            config,
        );

        match Self::initialize(&mut driver, apply_defaults) {
            Ok(()) => Ok(driver),
            Err(e) => Err((Self::from_driver(driver, apply_defaults), e)),
        }
    }

    fn initialize(driver: &mut Tmc5160<SPI, CS, DELAY, EN>, apply_defaults: bool) -> Result<()> {
        driver.registers().deselect()?;
        if apply_defaults {
            driver.apply_defaults()?;
        }
        Ok(())
    }

    /// Take the parts back out of a handle whose initialization failed.
    fn from_driver(driver: Tmc5160<SPI, CS, DELAY, EN>, apply_defaults: bool) -> Self {
        let name = Some(truncated_name(driver.name()));
        let config = driver.config().clone();
        let (spi, chip_select, delay, enable) = driver.release();
        Tmc5160Builder {
            spi: Some(spi),
            chip_select: Some(chip_select),
            delay: Some(delay),
            enable,
            name,
            config,
            apply_defaults,
        }
    }

    /// Give back whatever parts the builder holds.
    pub fn release(self) -> (Option<SPI>, Option<CS>, Option<DELAY>, EN) {
        (self.spi, self.chip_select, self.delay, self.enable)
    }
}

/// Keep the leading characters of `name` that fit the handle name capacity.
fn truncated_name(name: &str) -> heapless::String<32> {
    let mut truncated = heapless::String::new();
    for c in name.chars() {
        if truncated.push(c).is_err() {
            break;
        }
    }
    truncated
}

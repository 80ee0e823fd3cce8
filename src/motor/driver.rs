//! TMC5160 device handle.
//!
//! Generic over embedded-hal 1.0 SPI and pin types, with an async delay for
//! the wait loops.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use embedded_hal_async::delay::DelayNs;

use crate::bus::RegisterBus;
use crate::config::{DriverConfig, PollPolicy, RampParameters};
use crate::error::{MotionError, Result, TransportError};
use crate::registers::{
    A1, Amax, Chopconf, D1, Dmax, Gconf, IholdIrun, RampMode, RampStat, RampStatus, Rampmode,
    SpiStatus, Tpowerdown, Tpwmthrs, V1, Vactual, Vmax, Vstart, Vstop, Xactual, Xtarget,
};

use super::builder::Tmc5160Builder;
use super::pins::NoEnablePin;
use super::poll::{MotionGoal, PollStep, Poller};

/// One TMC5160 on an SPI bus.
///
/// Generic over:
/// - `SPI`: transport (must implement `SpiBus`)
/// - `CS`: chip-select pin (must implement `OutputPin`)
/// - `DELAY`: async delay used between status polls (must implement `DelayNs`)
/// - `EN`: driver enable pin, active low (defaults to [`NoEnablePin`])
///
/// The handle keeps no motion state of its own. Position, velocity and ramp
/// mode live in the chip and are read back on demand.
pub struct Tmc5160<SPI, CS, DELAY, EN = NoEnablePin> {
    /// Register access for this chip.
    bus: RegisterBus<SPI, CS>,

    /// Sleep provider for the wait loops.
    delay: DELAY,

    /// Enable pin (low = driver stage on).
    enable: EN,

    /// Driver name for logging/debugging.
    name: heapless::String<32>,

    /// Baseline configuration, ramp defaults and poll policy.
    config: DriverConfig,
}

impl<SPI, CS, DELAY> Tmc5160<SPI, CS, DELAY, NoEnablePin>
where
    SPI: SpiBus,
    CS: OutputPin,
    DELAY: DelayNs,
{
    /// Start building a handle.
    pub fn builder() -> Tmc5160Builder<SPI, CS, DELAY, NoEnablePin> {
        Tmc5160Builder::new()
    }
}

impl<SPI, CS, DELAY, EN> Tmc5160<SPI, CS, DELAY, EN>
where
    SPI: SpiBus,
    CS: OutputPin,
    DELAY: DelayNs,
    EN: OutputPin,
{
    pub(crate) fn new(
        bus: RegisterBus<SPI, CS>,
        delay: DELAY,
        enable: EN,
        name: heapless::String<32>,
        config: DriverConfig,
    ) -> Self {
        Self {
            bus,
            delay,
            enable,
            name,
            config,
        }
    }

    /// Get the driver name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Get the configuration the handle was built with.
    #[inline]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Direct register access.
    #[inline]
    pub fn registers(&mut self) -> &mut RegisterBus<SPI, CS> {
        &mut self.bus
    }

    /// Status byte of the most recent transfer.
    #[inline]
    pub fn last_status(&self) -> SpiStatus {
        self.bus.last_status()
    }

    /// Poll policy of the wait operations.
    #[inline]
    pub fn poll_policy(&self) -> PollPolicy {
        self.config.polling
    }

    /// Replace the poll policy.
    pub fn set_poll_policy(&mut self, policy: PollPolicy) {
        self.config.polling = policy;
    }

    /// Write the baseline configuration, then the ramp defaults.
    ///
    /// Order: GCONF, CHOPCONF, IHOLD_IRUN, TPOWERDOWN, TPWMTHRS, RAMPMODE
    /// (position), XACTUAL = 0, XTARGET = 0, followed by
    /// [`apply_ramp_defaults`](Self::apply_ramp_defaults).
    pub fn apply_defaults(&mut self) -> Result<()> {
        self.bus.write::<Gconf>(self.config.global_config())?;
        self.bus.write::<Chopconf>(self.config.chopper_config())?;
        self.bus.write::<IholdIrun>(self.config.current_control())?;
        self.bus.write::<Tpowerdown>(self.config.power_down_delay)?;
        self.bus.write::<Tpwmthrs>(self.config.pwm_threshold)?;
        self.bus.write::<Rampmode>(RampMode::Position)?;
        self.bus.write::<Xactual>(0)?;
        self.bus.write::<Xtarget>(0)?;

        self.apply_ramp_defaults()?;

        #[cfg(feature = "defmt")]
        defmt::info!("{=str}: defaults applied", self.name.as_str());

        Ok(())
    }

    /// Replace the cached ramp defaults. Nothing is written to the chip.
    pub fn set_ramp_defaults(&mut self, ramp: RampParameters) {
        self.config.ramp = ramp;
    }

    /// Cached ramp defaults.
    #[inline]
    pub fn ramp_defaults(&self) -> RampParameters {
        self.config.ramp
    }

    /// Write the cached ramp defaults: A1, V1, D1, AMAX, VMAX, DMAX, VSTART, VSTOP.
    pub fn apply_ramp_defaults(&mut self) -> Result<()> {
        let ramp = self.config.ramp;
        self.bus.write::<A1>(ramp.a1)?;
        self.bus.write::<V1>(ramp.v1)?;
        self.bus.write::<D1>(ramp.d1)?;
        self.bus.write::<Amax>(ramp.amax)?;
        self.bus.write::<Vmax>(ramp.vmax)?;
        self.bus.write::<Dmax>(ramp.dmax)?;
        self.bus.write::<Vstart>(ramp.vstart)?;
        self.bus.write::<Vstop>(ramp.vstop)?;
        Ok(())
    }

    /// Switch the driver stage on (enable pin low).
    pub fn enable_motor(&mut self) -> Result<()> {
        self.enable
            .set_low()
            .map_err(|_| TransportError::EnablePin)?;
        Ok(())
    }

    /// Switch the driver stage off (enable pin high).
    pub fn disable_motor(&mut self) -> Result<()> {
        self.enable
            .set_high()
            .map_err(|_| TransportError::EnablePin)?;
        Ok(())
    }

    /// Actual velocity (VACTUAL).
    pub fn get_velocity(&mut self) -> Result<i32> {
        self.bus.read::<Vactual>()
    }

    /// Actual position (XACTUAL).
    pub fn get_actual_position(&mut self) -> Result<i32> {
        self.bus.read::<Xactual>()
    }

    /// Ramp generator status (RAMP_STAT).
    pub fn ramp_status(&mut self) -> Result<RampStatus> {
        self.bus.read::<RampStat>()
    }

    /// Move to an absolute position in positioning mode.
    ///
    /// Positions outside the 32-bit signed range are clamped to the nearest
    /// bound. With `wait`, returns once RAMP_STAT reports the position reached.
    ///
    /// Returns the target written to XTARGET, which differs from `position`
    /// when it was clamped.
    pub async fn set_target_position(&mut self, position: i64, wait: bool) -> Result<i32> {
        self.bus.write::<Rampmode>(RampMode::Position)?;

        let target = clamp_position(position);
        if i64::from(target) != position {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "{=str}: target {=i64} out of range, clamped to {=i32}",
                self.name.as_str(),
                position,
                target
            );
        }

        self.bus.write::<Xtarget>(target)?;

        if wait {
            self.wait_target_position_reached().await?;
        }
        Ok(target)
    }

    /// Run at constant velocity in one of the velocity modes.
    ///
    /// `direction` must be [`RampMode::Positive`] or [`RampMode::Negative`];
    /// other modes fail with [`MotionError::InvalidArgument`] before anything
    /// is written. VMAX and AMAX are written only when given. With `wait`,
    /// returns once RAMP_STAT reports the velocity reached.
    pub async fn set_velocity(
        &mut self,
        direction: RampMode,
        vmax: Option<u32>,
        amax: Option<u32>,
        wait: bool,
    ) -> Result<()> {
        if !direction.is_velocity() {
            return Err(MotionError::InvalidArgument(
                heapless::String::try_from(direction.as_str()).unwrap_or_default(),
            )
            .into());
        }

        self.bus.write::<Rampmode>(direction)?;
        if let Some(vmax) = vmax {
            self.bus.write::<Vmax>(vmax)?;
        }
        if let Some(amax) = amax {
            self.bus.write::<Amax>(amax)?;
        }

        if wait {
            self.wait_velocity_reached().await?;
        }
        Ok(())
    }

    /// Ramp down to standstill by setting VMAX to zero.
    ///
    /// With `wait`, returns once RAMP_STAT reports zero velocity.
    pub async fn stop_motor(&mut self, wait: bool) -> Result<()> {
        self.bus.write::<Vmax>(0)?;

        if wait {
            self.wait_motor_stopped().await?;
        }
        Ok(())
    }

    /// Wait until RAMP_STAT.position_reached is set.
    pub async fn wait_target_position_reached(&mut self) -> Result<()> {
        self.wait_for(MotionGoal::PositionReached).await
    }

    /// Wait until RAMP_STAT.velocity_reached is set.
    pub async fn wait_velocity_reached(&mut self) -> Result<()> {
        self.wait_for(MotionGoal::VelocityReached).await
    }

    /// Wait until RAMP_STAT.vzero is set.
    pub async fn wait_motor_stopped(&mut self) -> Result<()> {
        self.wait_for(MotionGoal::Stopped).await
    }

    /// Poll RAMP_STAT until `goal` holds, sleeping between reads.
    ///
    /// Transport errors abort the wait immediately.
    async fn wait_for(&mut self, goal: MotionGoal) -> Result<()> {
        let mut poller = Poller::new(goal, self.config.polling);

        loop {
            let status = self.bus.read::<RampStat>()?;

            #[cfg(feature = "defmt")]
            defmt::trace!(
                "{=str}: poll {=u32} RAMP_STAT {=u32:#x}",
                self.name.as_str(),
                poller.polls() + 1,
                status.bits()
            );

            match poller.observe(&status) {
                PollStep::Done => return Ok(()),
                PollStep::Sleep(ms) => self.delay.delay_ms(ms).await,
                PollStep::Exhausted => {
                    return Err(MotionError::Timeout {
                        goal,
                        polls: poller.polls(),
                    }
                    .into())
                }
            }
        }
    }

    /// Give back the hardware resources.
    pub fn release(self) -> (SPI, CS, DELAY, EN) {
        let (spi, cs) = self.bus.release();
        (spi, cs, self.delay, self.enable)
    }
}

/// Clamp a position into the XTARGET range.
pub(crate) fn clamp_position(position: i64) -> i32 {
    position.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

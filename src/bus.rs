//! Register access over SPI.
//!
//! [`RegisterBus`] is the only part of the crate that talks to the transport.
//! It checks the access mode of each register, frames the request and brackets
//! every transfer with the chip-select line.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::error::{RegisterError, Result, TransportError};
use crate::frame::{self, Frame, Response};
use crate::registers::{lookup, Register, RegisterDescriptor, RegisterValue, SpiStatus};

/// SPI transport plus chip-select line of one chip.
///
/// The bus handle is owned, so sharing one SPI peripheral between several
/// chips means passing each `RegisterBus` a handle type that implements
/// [`SpiBus`] over the shared peripheral. Transfers of different chips must
/// not interleave; this type does no locking.
pub struct RegisterBus<SPI, CS> {
    spi: SPI,
    cs: CS,
    last_status: SpiStatus,
}

impl<SPI, CS> RegisterBus<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Wrap a transport and a chip-select pin.
    ///
    /// The pin is not touched until the first transfer.
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self {
            spi,
            cs,
            last_status: SpiStatus::default(),
        }
    }

    /// Drive chip-select to its idle (deasserted) level.
    pub fn deselect(&mut self) -> Result<()> {
        self.cs.set_high().map_err(|_| TransportError::ChipSelect)?;
        Ok(())
    }

    /// Status byte of the most recent transfer.
    #[inline]
    pub fn last_status(&self) -> SpiStatus {
        self.last_status
    }

    /// Read a register through its marker type.
    ///
    /// # Errors
    ///
    /// Fails with [`RegisterError::ReadForbidden`] for write-only registers,
    /// with a decode error if the payload does not decode, or with a
    /// transport error.
    pub fn read<R: Register>(&mut self) -> Result<R::Value> {
        let value = self.read_descriptor(&R::DESCRIPTOR)?;
        R::Value::try_from(value)
            .map_err(|_| RegisterError::InvalidRegisterValue(R::DESCRIPTOR.name).into())
    }

    /// Write a register through its marker type.
    ///
    /// # Errors
    ///
    /// Fails with [`RegisterError::WriteForbidden`] for read-only registers
    /// or with a transport error.
    pub fn write<R: Register>(&mut self, value: R::Value) -> Result<Response> {
        self.write_descriptor(&R::DESCRIPTOR, &value.into())
    }

    /// Read a register by datasheet name.
    pub fn read_named(&mut self, name: &str) -> Result<RegisterValue> {
        let descriptor = lookup(name)?;
        self.read_descriptor(descriptor)
    }

    /// Write a register by datasheet name.
    pub fn write_named(&mut self, name: &str, value: RegisterValue) -> Result<Response> {
        let descriptor = lookup(name)?;
        self.write_descriptor(descriptor, &value)
    }

    /// Read the register described by `descriptor`.
    ///
    /// The chip answers a read request with the data of the previous request,
    /// so the read frame is sent twice and only the second answer is kept.
    pub fn read_descriptor(&mut self, descriptor: &RegisterDescriptor) -> Result<RegisterValue> {
        if !descriptor.access.is_readable() {
            return Err(RegisterError::ReadForbidden(descriptor.name).into());
        }

        let request = frame::build_read_frame(descriptor.address);
        self.transfer(request)?;
        let response = self.transfer(request)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "read {=str} = {=u32:#010x}",
            descriptor.name,
            u32::from_be_bytes(response.payload)
        );

        Ok(descriptor.decode(response.payload)?)
    }

    /// Write `value` to the register described by `descriptor`.
    ///
    /// Exactly one transfer is issued. The returned response carries the
    /// status byte and the answer to the previous request.
    pub fn write_descriptor(
        &mut self,
        descriptor: &RegisterDescriptor,
        value: &RegisterValue,
    ) -> Result<Response> {
        if !descriptor.access.is_writable() {
            return Err(RegisterError::WriteForbidden(descriptor.name).into());
        }

        let payload = descriptor.encode(value)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "write {=str} = {=u32:#010x}",
            descriptor.name,
            u32::from_be_bytes(payload)
        );

        self.transfer(frame::build_write_frame(descriptor.address, payload))
    }

    /// Give back the transport and the chip-select pin.
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    /// One bracketed transfer. Chip-select is deasserted even if the transfer fails.
    fn transfer(&mut self, request: Frame) -> Result<Response> {
        let mut buffer = request;

        self.cs.set_low().map_err(|_| TransportError::ChipSelect)?;
        let exchanged = self
            .spi
            .transfer_in_place(&mut buffer)
            .and_then(|()| self.spi.flush());
        let deselected = self.cs.set_high();

        exchanged.map_err(|_| TransportError::Spi)?;
        deselected.map_err(|_| TransportError::ChipSelect)?;

        let response = frame::parse_response(&buffer);
        self.last_status = response.status;
        Ok(response)
    }
}

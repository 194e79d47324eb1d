//! Memory model (C5): owns the `mem`/`io` buffers, panel identity fields,
//! and the observed-range log.

use crate::{
    error::{CoreError, Result},
    model::{ModelDescriptor, model_for},
    ranges::Range,
};

/// Which buffer an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Configuration memory.
    Mem,
    /// Live I/O state.
    Io,
}

/// The reconstructed memory image of a single panel.
#[derive(Debug, Clone)]
pub struct Memory {
    descriptor: ModelDescriptor,
    mem: Vec<u8>,
    io: Vec<u8>,
    banner: String,
    serial: String,
    udlpasswd: String,
    /// Every `(base, size)` configuration-memory read observed so far, in
    /// observation order. Append-only; not deduplicated.
    mem_ranges: Vec<Range>,
}

impl Memory {
    /// Builds a fresh, all-zero memory image for the generic (unidentified)
    /// model. Call [`Memory::set_identity`] with a banner once one arrives
    /// to upgrade it to a specific model.
    #[must_use]
    pub fn new() -> Self {
        let descriptor = model_for("");
        Self {
            mem: vec![0; descriptor.mem_size],
            io: vec![0; descriptor.io_size],
            banner: String::new(),
            serial: String::new(),
            udlpasswd: String::new(),
            mem_ranges: Vec::new(),
            descriptor,
        }
    }

    /// The currently selected model descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    /// The configuration-memory buffer.
    #[must_use]
    pub fn mem(&self) -> &[u8] {
        &self.mem
    }

    /// The live I/O buffer.
    #[must_use]
    pub fn io(&self) -> &[u8] {
        &self.io
    }

    /// The panel's banner string, if known.
    #[must_use]
    pub fn banner(&self) -> &str {
        &self.banner
    }

    /// The panel's BCD serial string, if known.
    #[must_use]
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// The panel's UDL password, if known.
    #[must_use]
    pub fn udlpasswd(&self) -> &str {
        &self.udlpasswd
    }

    /// Every configuration-memory range observed so far, in order.
    #[must_use]
    pub fn mem_ranges(&self) -> &[Range] {
        &self.mem_ranges
    }

    /// Applies an observed read response: overwrites `region[base..base+size]`
    /// with `data` and, for `mem`, appends `(base, size)` to the observation
    /// log.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SizeMismatch`] if `data.len() != size`, or
    /// [`CoreError::OutOfBounds`] if the write would run past the end of the
    /// target buffer.
    pub fn apply_read_response(
        &mut self,
        region: Region,
        base: u32,
        size: u32,
        data: &[u8],
    ) -> Result<()> {
        self.apply(region, base, size, data)?;
        if region == Region::Mem {
            self.mem_ranges.push((base, size));
        }
        Ok(())
    }

    /// Applies an observed write: same preconditions as
    /// [`Memory::apply_read_response`], but records nothing in the
    /// observation log.
    ///
    /// # Errors
    ///
    /// See [`Memory::apply_read_response`].
    pub fn apply_write(&mut self, region: Region, base: u32, size: u32, data: &[u8]) -> Result<()> {
        self.apply(region, base, size, data)
    }

    fn apply(&mut self, region: Region, base: u32, size: u32, data: &[u8]) -> Result<()> {
        if data.len() != size as usize {
            return Err(CoreError::SizeMismatch { declared: size as usize, actual: data.len() });
        }
        let buf = match region {
            Region::Mem => &mut self.mem,
            Region::Io => &mut self.io,
        };
        let base = base as usize;
        let size = size as usize;
        let end = base.checked_add(size).ok_or(CoreError::OutOfBounds {
            base,
            size,
            region_len: buf.len(),
        })?;
        if end > buf.len() {
            return Err(CoreError::OutOfBounds { base, size, region_len: buf.len() });
        }
        buf[base..end].copy_from_slice(data);
        Ok(())
    }

    /// Sets the banner, upgrading the model descriptor (and reallocating
    /// `mem`/`io` to match) if this is the first time it's been set.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IdentityAlreadySet`] if the banner was already
    /// non-empty.
    pub fn set_banner(&mut self, banner: impl Into<String>) -> Result<()> {
        if !self.banner.is_empty() {
            return Err(CoreError::IdentityAlreadySet { field: "banner" });
        }
        let banner = banner.into();
        let descriptor = model_for(&banner);
        if descriptor.mem_size != self.mem.len() {
            self.mem.resize(descriptor.mem_size, 0);
        }
        if descriptor.io_size != self.io.len() {
            self.io.resize(descriptor.io_size, 0);
        }
        self.descriptor = descriptor;
        self.banner = banner;
        Ok(())
    }

    /// Sets the serial string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IdentityAlreadySet`] if the serial was already
    /// non-empty.
    pub fn set_serial(&mut self, serial: impl Into<String>) -> Result<()> {
        if !self.serial.is_empty() {
            return Err(CoreError::IdentityAlreadySet { field: "serial" });
        }
        self.serial = serial.into();
        Ok(())
    }

    /// Sets the UDL password.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IdentityAlreadySet`] if it was already non-empty.
    pub fn set_udlpasswd(&mut self, udlpasswd: impl Into<String>) -> Result<()> {
        if !self.udlpasswd.is_empty() {
            return Err(CoreError::IdentityAlreadySet { field: "udlpasswd" });
        }
        self.udlpasswd = udlpasswd.into();
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

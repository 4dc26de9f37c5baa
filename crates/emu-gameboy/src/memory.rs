//! Flat 64K address space.
//!
//! There is no banking and no ROM protection: every address is plain RAM,
//! and cartridge images are copied into the bottom 32K.

#![allow(clippy::cast_possible_truncation)] // Intentional: offsets wrap in the 16-bit space.

use std::fs;
use std::path::Path;

use emu_core::Bus;

use crate::error::Error;

/// Size of the cartridge ROM window at $0000-$7FFF.
pub const ROM_WINDOW: usize = 0x8000;

/// Read a ROM image from disk.
///
/// # Errors
///
/// Returns [`Error::RomLoad`] if the file cannot be read.
pub fn read_rom(path: &Path) -> Result<Vec<u8>, Error> {
    let data = fs::read(path).map_err(|source| Error::RomLoad {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("read {} bytes from {}", data.len(), path.display());
    Ok(data)
}

/// 64K of byte-addressable memory.
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Memory {
    /// Create zeroed memory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: vec![0; 0x10000].into_boxed_slice(),
        }
    }

    /// Read a byte without going through the `Bus` trait.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.bytes[address as usize]
    }

    /// Copy `data` to consecutive addresses starting at `address`, wrapping
    /// at the top of the address space.
    pub fn load(&mut self, address: u16, data: &[u8]) {
        for (offset, &byte) in data.iter().enumerate() {
            let addr = address.wrapping_add(offset as u16);
            self.bytes[addr as usize] = byte;
        }
    }

    /// Map a cartridge image at $0000. Anything past the 32K ROM window is
    /// dropped. Returns the number of bytes copied.
    pub fn load_image(&mut self, image: &[u8]) -> usize {
        self.load_image_max(image, ROM_WINDOW)
    }

    /// Copy at most `max_len` bytes of `image` to $0000. `max_len` is capped
    /// at the size of the address space. Returns the number of bytes copied.
    pub fn load_image_max(&mut self, image: &[u8], max_len: usize) -> usize {
        let max_len = max_len.min(self.bytes.len());
        let len = image.len().min(max_len);
        if image.len() > max_len {
            log::warn!(
                "image is {} bytes; only the first {max_len} are mapped",
                image.len()
            );
        }
        self.bytes[..len].copy_from_slice(&image[..len]);
        len
    }

    /// Read a ROM file and map it at $0000.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RomLoad`] if the file cannot be read. Memory is left
    /// untouched in that case.
    pub fn load_rom_file(&mut self, path: &Path) -> Result<usize, Error> {
        let image = read_rom(path)?;
        Ok(self.load_image(&image))
    }

    /// Zero every byte.
    pub fn reset(&mut self) {
        self.bytes.fill(0);
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Memory {
    fn read(&mut self, address: u16) -> u8 {
        self.bytes[address as usize]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.bytes[address as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let mem = Memory::new();
        assert_eq!(mem.peek(0x0000), 0);
        assert_eq!(mem.peek(0xFFFF), 0);
    }

    #[test]
    fn read_write_round_trip() {
        let mut mem = Memory::new();
        mem.write(0xC123, 0x5A);
        assert_eq!(mem.read(0xC123), 0x5A);
        // ROM area is writable too
        mem.write(0x0100, 0x76);
        assert_eq!(mem.peek(0x0100), 0x76);
    }

    #[test]
    fn load_wraps_at_top() {
        let mut mem = Memory::new();
        mem.load(0xFFFF, &[0x11, 0x22]);
        assert_eq!(mem.peek(0xFFFF), 0x11);
        assert_eq!(mem.peek(0x0000), 0x22);
    }

    #[test]
    fn image_is_clipped_to_rom_window() {
        let mut mem = Memory::new();
        let image = vec![0xAB; ROM_WINDOW + 16];
        assert_eq!(mem.load_image(&image), ROM_WINDOW);
        assert_eq!(mem.peek(0x7FFF), 0xAB);
        assert_eq!(mem.peek(0x8000), 0x00);
    }

    #[test]
    fn short_image_leaves_rest_alone() {
        let mut mem = Memory::new();
        mem.write(0x0004, 0x99);
        assert_eq!(mem.load_image(&[1, 2, 3]), 3);
        assert_eq!(mem.peek(0x0002), 3);
        assert_eq!(mem.peek(0x0004), 0x99);
    }

    #[test]
    fn image_limit_is_caller_chosen() {
        let mut mem = Memory::new();
        assert_eq!(mem.load_image_max(&[0x11; 0x10], 4), 4);
        assert_eq!(mem.peek(0x0003), 0x11);
        assert_eq!(mem.peek(0x0004), 0x00);

        // Larger than the ROM window but capped at 64K
        let image = vec![0x22; 0x10010];
        assert_eq!(mem.load_image_max(&image, usize::MAX), 0x10000);
        assert_eq!(mem.peek(0xFFFF), 0x22);
    }

    #[test]
    fn missing_rom_file_is_an_error() {
        let mut mem = Memory::new();
        let err = mem
            .load_rom_file(Path::new("/nonexistent/definitely-missing.gb"))
            .unwrap_err();
        assert!(matches!(err, Error::RomLoad { .. }));
        assert!(err.to_string().contains("definitely-missing.gb"));
    }

    #[test]
    fn reset_zeroes() {
        let mut mem = Memory::new();
        mem.write(0x8000, 1);
        mem.reset();
        assert_eq!(mem.peek(0x8000), 0);
    }
}

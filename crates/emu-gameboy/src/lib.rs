//! Game Boy machine around the SM83 interpreter.
//!
//! Only the CPU and a flat 64K address space are modelled. Peripherals see
//! the machine purely through the I/O register bytes the post-boot table
//! initialises in the high page.

mod config;
mod error;
mod gameboy;
mod memory;
mod post_boot;

pub use config::{GameBoyConfig, ROM_STEP_LIMIT, TEST_PROGRAM, TEST_PROGRAM_STEPS};
pub use error::Error;
pub use gameboy::{GameBoy, RunSummary};
pub use memory::{Memory, ROM_WINDOW, read_rom};
pub use post_boot::{POST_BOOT_IO, apply_post_boot};

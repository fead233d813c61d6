//! Hardware constants shared by the encoder and the generated project.

use bitflags::bitflags;

bitflags! {
    /// POKEY's `AUDCTL` register: clock-join and filter modes for the four audio channels.
    #[derive(Default)]
    pub struct AudCtl: u8 {
        /// Channel 1 clocked directly from 1.79 MHz instead of through its `AUDF` divisor.
        const CH1_HICLOCK = 1 << 0;
        /// Channel 3 clocked directly from 1.79 MHz instead of through its `AUDF` divisor.
        const CH3_HICLOCK = 1 << 2;
        /// Channels 1+2 joined into one 16-bit counter.
        const CH12_JOIN = 1 << 4;
        /// Channels 3+4 joined into one 16-bit counter.
        const CH34_JOIN = 1 << 3;
        /// Channel 1 output used as a high-pass filter clock for channel 3.
        const CH1_FILTER = 1 << 1;
        /// Channel 2 output used as a high-pass filter clock for channel 4.
        const CH2_FILTER = 1 << 5;
        /// 9-bit poly counter instead of the default 17-bit one.
        const POLY9 = 1 << 7;
        /// 15 kHz base clock divider instead of the default 64 kHz one.
        const BASE_MULT = 1 << 6;
    }
}

/// PAL GTIA/POKEY base clock in Hz; all achievable playback rates are `PAL_CLOCK / (d+1)`.
pub const PAL_CLOCK: u32 = 1_773_447;

/// IRQ enable mask (`AUDF`/`IRQ ST`) used by the player's timer interrupt.
pub const IRQ_MASK: u8 = 0x01;

/// `AUDC` byte written for a silent channel: volume-only mode, zero volume.
pub const SILENCE: u8 = 0x10;

/// `PORTB` value selecting the main OS ROM bank (OS ROM disabled, no extended RAM banked in).
pub const PORTB_MAIN: u8 = 0xFC;

/// Load address of the generated player stub.
pub const STUB_ADDR: u16 = 0x0600;

/// Base address of assembled player code.
pub const CODE_BASE: u16 = 0x2000;

/// Base address of the 16 KB extended-memory bank window.
pub const BANK_BASE: u16 = 0x4000;

/// Size in bytes of one bank.
pub const BANK_SIZE: usize = 0x4000;

/// Base address of the DeltaLZ decode mirror buffer (circular, 16 KB).
pub const LZ_BUF_BASE: u16 = 0x8000;

/// One past the end of the DeltaLZ decode mirror buffer.
pub const LZ_BUF_END: u16 = 0xC000;

/// Size in bytes of the DeltaLZ decode mirror buffer.
pub const LZ_BUF_SIZE: usize = (LZ_BUF_END - LZ_BUF_BASE) as usize;

/// Address of the low byte of the XEX RUN vector.
pub const RUN_VECTOR: u16 = 0x02E0;

/// Address of the low byte of the XEX INIT vector.
pub const INIT_VECTOR: u16 = 0x02E2;

/// Hard ceiling on the number of banks (`max_banks` option upper bound).
pub const MAX_BANKS_CEILING: u32 = 64;

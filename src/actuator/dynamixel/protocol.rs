//! # Dynamixel Protocol 2.0 Constants and Types
//!
//! Packet layout:
//!
//! ```text
//! FF FF FD 00 | ID | LEN_L LEN_H | INST | PARAMS... | CRC_L CRC_H
//! ```
//!
//! `LEN` counts INST + PARAMS + CRC, after byte stuffing.

use std::f64::consts::{PI, TAU};

/// Packet header (0xFF 0xFF 0xFD) followed by the reserved byte
pub const DXL_HEADER: [u8; 4] = [0xFF, 0xFF, 0xFD, 0x00];

/// Header + ID + LEN (the bytes before INST)
pub const DXL_PREFIX_SIZE: usize = 7;

/// Write instruction
pub const DXL_INST_WRITE: u8 = 0x03;

/// Status (return) packet instruction
pub const DXL_INST_STATUS: u8 = 0x55;

/// Control table: Torque Enable (1 byte)
pub const ADDR_TORQUE_ENABLE: u16 = 64;

/// Control table: Goal Position (4 bytes)
pub const ADDR_GOAL_POSITION: u16 = 116;

/// Status reply to a write: prefix + INST + ERR + CRC
pub const DXL_WRITE_STATUS_SIZE: usize = DXL_PREFIX_SIZE + 4;

/// Largest raw position of one revolution (12-bit)
pub const DXL_POSITION_MAX: u32 = 4095;

/// Hardware alert flag in the status error byte
pub const DXL_ERROR_ALERT: u8 = 0x80;

/// Convert an angle in radians to a 12-bit Goal Position.
///
/// `-π` maps to 0 and `+π` to 4095; angles outside one turn wrap around
/// through the 12-bit mask.
#[must_use]
pub fn rad_to_raw(rad: f64) -> u32 {
    let scaled = ((rad + PI) / TAU * f64::from(DXL_POSITION_MAX)) as i64;
    (scaled & 0x0FFF) as u32
}

/// Name of the error code carried in the low 7 bits of a status error byte.
#[must_use]
pub fn status_error_name(code: u8) -> &'static str {
    match code & !DXL_ERROR_ALERT {
        0x00 => "none",
        0x01 => "result fail",
        0x02 => "instruction error",
        0x03 => "CRC error",
        0x04 => "data range error",
        0x05 => "data length error",
        0x06 => "data limit error",
        0x07 => "access error",
        _ => "unknown error",
    }
}

/// Decoded status packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPacket {
    /// Replying servo
    pub id: u8,

    /// Error byte (0 when the instruction succeeded)
    pub error: u8,

    /// Returned parameters, unstuffed
    pub params: Vec<u8>,
}

impl StatusPacket {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rad_to_raw_range() {
        assert_eq!(rad_to_raw(-PI), 0);
        assert_eq!(rad_to_raw(0.0), 2047);
        assert_eq!(rad_to_raw(PI), 4095);
    }

    #[test]
    fn test_rad_to_raw_wraps() {
        // Past one turn wraps through the 12-bit mask
        assert_eq!(rad_to_raw(PI + TAU), (2 * 4095) & 0x0FFF);
        // Below -π, two's complement wrap
        assert_eq!(rad_to_raw(-PI - 0.5), 3771);
    }

    #[test]
    fn test_rad_to_raw_nan() {
        assert_eq!(rad_to_raw(f64::NAN), 0);
    }

    #[test]
    fn test_write_status_size() {
        assert_eq!(DXL_WRITE_STATUS_SIZE, 11);
    }

    #[test]
    fn test_status_error_names() {
        assert_eq!(status_error_name(0x00), "none");
        assert_eq!(status_error_name(0x04), "data range error");
        // Alert bit does not hide the code
        assert_eq!(status_error_name(0x87), "access error");
    }
}

//! # Dynamixel Packet Decoder
//!
//! Decodes status packets returned by a servo.

use super::crc::crc16;
use super::protocol::*;
use crate::error::{FiveBarError, Result};

/// Remove the 0xFD inserted after every 0xFF 0xFF 0xFD run
pub fn unstuff(body: &[u8]) -> Vec<u8> {
    let mut plain = Vec::with_capacity(body.len());
    let mut i = 0;

    while i < body.len() {
        plain.push(body[i]);
        let n = plain.len();
        if n >= 3 && plain[n - 3..] == DXL_HEADER[..3] && body.get(i + 1) == Some(&0xFD) {
            // Skip the stuffing byte
            i += 1;
        }
        i += 1;
    }

    plain
}

/// Decode a complete status packet
///
/// # Arguments
///
/// * `packet` - Header through CRC
///
/// # Returns
///
/// * `Result<StatusPacket>` - Decoded status, error byte untouched
///
/// # Errors
///
/// Returns error if:
/// - Packet is too short or its length field disagrees with its size
/// - Header is incorrect
/// - Instruction is not a status reply
/// - CRC check fails
pub fn decode_status(packet: &[u8]) -> Result<StatusPacket> {
    // prefix(7) + inst(1) + err(1) + crc(2)
    if packet.len() < DXL_WRITE_STATUS_SIZE {
        return Err(FiveBarError::Protocol(format!(
            "Status packet too short: {} bytes",
            packet.len()
        )));
    }

    if packet[..4] != DXL_HEADER {
        return Err(FiveBarError::Protocol(format!(
            "Invalid header: {:02X?}",
            &packet[..4]
        )));
    }

    let length = u16::from_le_bytes([packet[5], packet[6]]) as usize;
    if packet.len() != DXL_PREFIX_SIZE + length {
        return Err(FiveBarError::Protocol(format!(
            "Length mismatch: expected {} bytes, got {}",
            DXL_PREFIX_SIZE + length,
            packet.len()
        )));
    }

    let crc_at = packet.len() - 2;
    let received_crc = u16::from_le_bytes([packet[crc_at], packet[crc_at + 1]]);
    let calculated_crc = crc16(&packet[..crc_at]);
    if calculated_crc != received_crc {
        return Err(FiveBarError::Protocol(format!(
            "CRC mismatch: expected 0x{:04X}, got 0x{:04X}",
            calculated_crc, received_crc
        )));
    }

    let instruction = packet[DXL_PREFIX_SIZE];
    if instruction != DXL_INST_STATUS {
        return Err(FiveBarError::Protocol(format!(
            "Expected status instruction, got 0x{:02X}",
            instruction
        )));
    }

    Ok(StatusPacket {
        id: packet[4],
        error: packet[DXL_PREFIX_SIZE + 1],
        params: unstuff(&packet[DXL_PREFIX_SIZE + 2..crc_at]),
    })
}

/// Decode a status packet and require it to come from `id` without an error
///
/// # Errors
///
/// Returns `Protocol` if decoding fails, the reply is from another servo, or
/// the error byte is set.
pub fn expect_ok(packet: &[u8], id: u8) -> Result<StatusPacket> {
    let status = decode_status(packet)?;

    if status.id != id {
        return Err(FiveBarError::Protocol(format!(
            "Reply from ID {} while waiting for ID {}",
            status.id, id
        )));
    }

    if !status.is_ok() {
        return Err(FiveBarError::Protocol(format!(
            "ID {} reported {} (0x{:02X})",
            id,
            status_error_name(status.error),
            status.error
        )));
    }

    Ok(status)
}

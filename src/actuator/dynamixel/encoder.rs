//! # Dynamixel Packet Encoder
//!
//! Builds Write instruction packets.

use super::crc::crc16;
use super::protocol::*;

/// Insert 0xFD after every 0xFF 0xFF 0xFD run so the body never contains a
/// header
///
/// # Arguments
///
/// * `params` - Raw parameter bytes
///
/// # Returns
///
/// * `Vec<u8>` - Stuffed parameter bytes
pub fn stuff(params: &[u8]) -> Vec<u8> {
    let mut stuffed = Vec::with_capacity(params.len() + params.len() / 3);

    for &byte in params {
        stuffed.push(byte);
        let n = stuffed.len();
        if n >= 3 && stuffed[n - 3..] == DXL_HEADER[..3] {
            stuffed.push(0xFD);
        }
    }

    stuffed
}

/// Encode an instruction packet with a CRC
///
/// # Arguments
///
/// * `id` - Target servo
/// * `instruction` - Instruction byte
/// * `params` - Unstuffed parameters
///
/// # Returns
///
/// * `Vec<u8>` - Complete packet ready for the wire
pub fn encode_packet(id: u8, instruction: u8, params: &[u8]) -> Vec<u8> {
    let body = stuff(params);
    // INST + PARAMS + CRC
    let length = (body.len() + 3) as u16;

    let mut packet = Vec::with_capacity(DXL_PREFIX_SIZE + length as usize);
    packet.extend_from_slice(&DXL_HEADER);
    packet.push(id);
    packet.extend_from_slice(&length.to_le_bytes());
    packet.push(instruction);
    packet.extend_from_slice(&body);

    let crc = crc16(&packet);
    packet.extend_from_slice(&crc.to_le_bytes());

    packet
}

/// Encode a Write of `data` to control-table `address`
///
/// # Examples
///
/// ```
/// use fivebar_teleop::actuator::dynamixel::encoder::encode_write;
///
/// // Goal Position = 512 on ID 1
/// let packet = encode_write(1, 116, &512u32.to_le_bytes());
/// assert_eq!(&packet[packet.len() - 2..], &[0xCA, 0x89]);
/// ```
pub fn encode_write(id: u8, address: u16, data: &[u8]) -> Vec<u8> {
    let mut params = Vec::with_capacity(2 + data.len());
    params.extend_from_slice(&address.to_le_bytes());
    params.extend_from_slice(data);

    encode_packet(id, DXL_INST_WRITE, &params)
}

/// Encode a Torque Enable write
pub fn encode_torque(id: u8, enable: bool) -> Vec<u8> {
    encode_write(id, ADDR_TORQUE_ENABLE, &[u8::from(enable)])
}

/// Encode a Goal Position write
pub fn encode_goal_position(id: u8, raw: u32) -> Vec<u8> {
    encode_write(id, ADDR_GOAL_POSITION, &raw.to_le_bytes())
}

//! # CRC-16 Implementation
//!
//! CRC-16 checksum calculation for Dynamixel Protocol 2.0.
//!
//! **Polynomial**: 0x8005 (x^16 + x^15 + x^2 + 1)
//! **Initial Value**: 0x0000, no reflection, no final XOR

/// CRC-16 polynomial
const CRC16_POLY: u16 = 0x8005;

/// Precomputed CRC16 lookup table for fast calculation
const CRC16_TABLE: [u16; 256] = generate_crc16_table();

/// Generate CRC16 lookup table at compile time
const fn generate_crc16_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut j = 0;

        while j < 8 {
            if (crc & 0x8000) != 0 {
                crc = (crc << 1) ^ CRC16_POLY;
            } else {
                crc <<= 1;
            }
            j += 1;
        }

        table[i] = crc;
        i += 1;
    }

    table
}

/// Calculate the packet CRC using the lookup table
///
/// # Arguments
///
/// * `data` - Every packet byte before the CRC, header included
///
/// # Examples
///
/// ```
/// use fivebar_teleop::actuator::dynamixel::crc::crc16;
///
/// // Ping to ID 1
/// let packet = [0xFF, 0xFF, 0xFD, 0x00, 0x01, 0x03, 0x00, 0x01];
/// assert_eq!(crc16(&packet), 0x4E19);
/// ```
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;

    for &byte in data {
        let index = ((crc >> 8) as u8 ^ byte) as usize;
        crc = (crc << 8) ^ CRC16_TABLE[index];
    }

    crc
}

/// Bitwise CRC, used to check the lookup table
#[cfg(test)]
fn crc16_slow(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;

    for &byte in data {
        crc ^= u16::from(byte) << 8;

        for _ in 0..8 {
            if (crc & 0x8000) != 0 {
                crc = (crc << 1) ^ CRC16_POLY;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_empty() {
        assert_eq!(crc16(&[]), 0x0000);
    }

    #[test]
    fn test_crc16_check_value() {
        // Standard check input for CRC-16/UMTS
        assert_eq!(crc16(b"123456789"), 0xFEE8);
        assert_eq!(crc16_slow(b"123456789"), 0xFEE8);
    }

    #[test]
    fn test_crc16_write_goal_position() {
        // Write 512 to Goal Position of ID 1
        let packet = [
            0xFF, 0xFF, 0xFD, 0x00, 0x01, 0x09, 0x00, 0x03, 0x74, 0x00, 0x00, 0x02, 0x00, 0x00,
        ];
        assert_eq!(crc16(&packet), 0x89CA);
    }

    #[test]
    fn test_crc16_status_packet() {
        let packet = [0xFF, 0xFF, 0xFD, 0x00, 0x01, 0x04, 0x00, 0x55, 0x00];
        assert_eq!(crc16(&packet), 0x0CA1);
    }

    #[test]
    fn test_crc16_lookup_table_matches_slow() {
        let test_data = [
            vec![0x01, 0x02, 0x03],
            vec![0xFF, 0xFF, 0xFD, 0x00],
            vec![0x00; 24],
            vec![0xFF; 10],
            (0..=255u8).collect::<Vec<_>>(),
        ];

        for data in test_data.iter() {
            assert_eq!(crc16(data), crc16_slow(data), "CRC mismatch for data: {:?}", data);
        }
    }

    #[test]
    fn test_crc16_changes_with_data() {
        assert_ne!(crc16(&[0x01, 0x02]), crc16(&[0x01, 0x03]));
    }
}

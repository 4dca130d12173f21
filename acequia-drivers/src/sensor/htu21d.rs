//! HTU21D temperature and humidity sensor
//!
//! I²C sensor read in hold-master mode. Conversions follow the
//! datasheet formulas with integer-only math; every response carries a
//! CRC-8 over the two data bytes.

use acequia_core::traits::{Climate, ClimateSensor, SensorError};
use embedded_hal::i2c::I2c;

/// Fixed I²C address
pub const ADDRESS: u8 = 0x40;

/// Trigger temperature measurement, hold master
const CMD_MEASURE_TEMP_HOLD: u8 = 0xE3;

/// Trigger humidity measurement, hold master
const CMD_MEASURE_HUMIDITY_HOLD: u8 = 0xE5;

/// HTU21D driver
pub struct Htu21d<I> {
    i2c: I,
}

impl<I: I2c> Htu21d<I> {
    /// Create a new driver on the given bus
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Run one measurement command and return the 14/12-bit code
    fn read_code(&mut self, command: u8) -> Result<u16, SensorError> {
        let mut buf = [0u8; 3];
        self.i2c
            .write_read(ADDRESS, &[command], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        if crc8(&buf[..2]) != buf[2] {
            return Err(SensorError::Bus);
        }
        // the two low bits of the LSB are status bits
        Ok(u16::from_be_bytes([buf[0], buf[1] & 0xFC]))
    }
}

/// Convert a temperature code to 0.1 °C units
///
/// T = -46.85 + 175.72 * code / 2^16
pub fn temp_code_to_c_x10(code: u16) -> i16 {
    let t_x100 = ((17_572i32 * i32::from(code)) >> 16) - 4_685;
    (t_x100 / 10) as i16
}

/// Convert a humidity code to percent, clamped to 0-100
///
/// RH = -6 + 125 * code / 2^16
pub fn humidity_code_to_pct(code: u16) -> u8 {
    let rh = ((125i32 * i32::from(code)) >> 16) - 6;
    rh.clamp(0, 100) as u8
}

/// CRC-8 over the response data (polynomial x^8 + x^5 + x^4 + 1)
fn crc8(data: &[u8]) -> u8 {
    const POLY: u8 = 0x31;
    let mut crc: u8 = 0;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ POLY;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

impl<I: I2c> ClimateSensor for Htu21d<I> {
    fn read_climate(&mut self) -> Result<Climate, SensorError> {
        let temp_code = self.read_code(CMD_MEASURE_TEMP_HOLD)?;
        let humidity_code = self.read_code(CMD_MEASURE_HUMIDITY_HOLD)?;
        Ok(Climate {
            temperature_c_x10: temp_code_to_c_x10(temp_code),
            humidity_pct: humidity_code_to_pct(humidity_code),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::i2c::Operation;

    #[test]
    fn test_crc8_datasheet_vector() {
        // the datasheet checksum example: 0xDC -> 0x79
        assert_eq!(crc8(&[0xDC]), 0x79);
    }

    #[test]
    fn test_temp_conversion() {
        // code 0 is the lower end of the scale
        assert_eq!(temp_code_to_c_x10(0), -468);
        // code 0x6800 ~ 24.5 °C
        assert_eq!(temp_code_to_c_x10(0x6800), 245);
    }

    #[test]
    fn test_humidity_conversion_clamped() {
        assert_eq!(humidity_code_to_pct(0x8000), 56);
        // codes near zero would go negative without the clamp
        assert_eq!(humidity_code_to_pct(0), 0);
        assert_eq!(humidity_code_to_pct(u16::MAX), 100);
    }

    /// Bus that answers each command with a canned response
    struct MockI2c {
        temp: [u8; 3],
        humidity: [u8; 3],
        last_command: u8,
    }

    impl embedded_hal::i2c::ErrorType for MockI2c {
        type Error = Infallible;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            _address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                match op {
                    Operation::Write(bytes) => self.last_command = bytes[0],
                    Operation::Read(buf) => {
                        let response = if self.last_command == CMD_MEASURE_TEMP_HOLD {
                            self.temp
                        } else {
                            self.humidity
                        };
                        buf.copy_from_slice(&response);
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_read_climate() {
        let mut sensor = Htu21d::new(MockI2c {
            temp: [0x68, 0x00, 0x62],
            humidity: [0x80, 0x00, 0x23],
            last_command: 0,
        });
        assert_eq!(
            sensor.read_climate(),
            Ok(Climate {
                temperature_c_x10: 245,
                humidity_pct: 56,
            })
        );
    }

    #[test]
    fn test_crc_mismatch_is_a_bus_error() {
        let mut sensor = Htu21d::new(MockI2c {
            temp: [0x68, 0x00, 0xFF],
            humidity: [0x80, 0x00, 0x23],
            last_command: 0,
        });
        assert_eq!(sensor.read_climate(), Err(SensorError::Bus));
    }
}

use crate::error::DecodeError;
use crate::gatt::Channel;


const HR_FORMAT_U16: u8 = 0b0000_0001;
const HR_CONTACT_DETECTED: u8 = 0b0000_0010;
const HR_CONTACT_SUPPORTED: u8 = 0b0000_0100;
const HR_ENERGY_EXPENDED: u8 = 0b0000_1000;
const HR_RR_INTERVALS: u8 = 0b0001_0000;

const TEMP_FAHRENHEIT: u8 = 0b0000_0001;
const TEMP_TIMESTAMP: u8 = 0b0000_0010;
const TEMP_TYPE: u8 = 0b0000_0100;

const OPTICAL_SAMPLE_LEN: usize = 6;


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartRateMeasurement {
    pub bpm: u16,
    /// `None` when the sensor does not report skin contact.
    pub sensor_contact: Option<bool>,
    pub energy_expended: Option<u16>,
    /// Milliseconds between beats.
    pub rr_intervals: Vec<u16>,
}

impl HeartRateMeasurement {
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        let flags = *data.first().ok_or(DecodeError::TooShort { expected: 2, actual: 0 })?;
        let mut offset = 1;

        let bpm = if flags & HR_FORMAT_U16 != 0 {
            let bpm = read_u16(data, offset)?;
            offset += 2;
            bpm
        } else {
            let bpm = read_u8(data, offset)?;
            offset += 1;
            u16::from(bpm)
        };

        let sensor_contact = if flags & HR_CONTACT_SUPPORTED != 0 {
            Some(flags & HR_CONTACT_DETECTED != 0)
        } else {
            None
        };

        let energy_expended = if flags & HR_ENERGY_EXPENDED != 0 {
            let energy = read_u16(data, offset)?;
            offset += 2;
            Some(energy)
        } else {
            None
        };

        let mut rr_intervals = Vec::new();
        if flags & HR_RR_INTERVALS != 0 {
            while offset + 1 < data.len() {
                // 1/1024 s resolution
                let rr = read_u16(data, offset)?;
                rr_intervals.push(((u32::from(rr) * 1000) / 1024) as u16);
                offset += 2;
            }
        }

        Ok(HeartRateMeasurement {
            bpm,
            sensor_contact,
            energy_expended,
            rr_intervals,
        })
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureMeasurement {
    pub celsius: f32,
    pub timestamp: Option<Timestamp>,
    /// Body location code from the Temperature Type characteristic.
    pub location: Option<u8>,
}

impl TemperatureMeasurement {
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        let flags = read_u8(data, 0)?;
        let value = read_ieee11073_float(data, 1)?;
        let mut offset = 5;

        let celsius = if flags & TEMP_FAHRENHEIT != 0 {
            (value - 32.0) * 5.0 / 9.0
        } else {
            value
        };

        let timestamp = if flags & TEMP_TIMESTAMP != 0 {
            let timestamp = Timestamp {
                year: read_u16(data, offset)?,
                month: read_u8(data, offset + 2)?,
                day: read_u8(data, offset + 3)?,
                hours: read_u8(data, offset + 4)?,
                minutes: read_u8(data, offset + 5)?,
                seconds: read_u8(data, offset + 6)?,
            };
            offset += 7;
            Some(timestamp)
        } else {
            None
        };

        let location = if flags & TEMP_TYPE != 0 {
            Some(read_u8(data, offset)?)
        } else {
            None
        };

        Ok(TemperatureMeasurement {
            celsius,
            timestamp,
            location,
        })
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpticalSample {
    pub green: i32,
    pub blue: i32,
}

pub fn parse_battery_level(data: &[u8]) -> Result<u8, DecodeError> {
    let percent = read_u8(data, 0)?;
    if percent > 100 {
        return Err(DecodeError::BatteryOutOfRange(percent));
    }
    Ok(percent)
}

pub fn parse_step_count(data: &[u8]) -> Result<u32, DecodeError> {
    read_u32(data, 0)
}

pub fn parse_acceleration_energy(data: &[u8]) -> Result<u32, DecodeError> {
    read_u32(data, 0)
}

pub fn parse_acceleration_waveform(data: &[u8]) -> Result<Vec<i32>, DecodeError> {
    if data.len() < 2 {
        return Err(DecodeError::TooShort { expected: 2, actual: data.len() });
    }
    Ok(data
        .chunks_exact(2)
        .map(|c| i32::from(i16::from_le_bytes([c[0], c[1]])))
        .collect())
}

pub fn parse_optical_waveform(data: &[u8]) -> Result<Vec<OpticalSample>, DecodeError> {
    if data.len() < OPTICAL_SAMPLE_LEN {
        return Err(DecodeError::TooShort { expected: OPTICAL_SAMPLE_LEN, actual: data.len() });
    }
    Ok(data
        .chunks_exact(OPTICAL_SAMPLE_LEN)
        .map(|c| OpticalSample {
            green: u24_le(&c[0..3]),
            blue: u24_le(&c[3..6]),
        })
        .collect())
}


/// A decoded notification or read, tagged by where it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    HeartRate(HeartRateMeasurement),
    Temperature(TemperatureMeasurement),
    BatteryLevel(u8),
    StepCount(u32),
    AccelerationEnergy(u32),
    AccelerationWaveform(Vec<i32>),
    OpticalWaveform(Vec<OpticalSample>),
}

impl Reading {
    pub fn decode(channel: Channel, data: &[u8]) -> Result<Reading, DecodeError> {
        Ok(match channel {
            Channel::HeartRateMeasurement => Reading::HeartRate(HeartRateMeasurement::parse(data)?),
            Channel::TemperatureMeasurement => {
                Reading::Temperature(TemperatureMeasurement::parse(data)?)
            }
            Channel::BatteryLevel => Reading::BatteryLevel(parse_battery_level(data)?),
            Channel::StepCount => Reading::StepCount(parse_step_count(data)?),
            Channel::AccelerationEnergyMagnitude => {
                Reading::AccelerationEnergy(parse_acceleration_energy(data)?)
            }
            Channel::AccelerationWaveform => {
                Reading::AccelerationWaveform(parse_acceleration_waveform(data)?)
            }
            Channel::OpticalWaveform => Reading::OpticalWaveform(parse_optical_waveform(data)?),
        })
    }
}


fn read_u8(data: &[u8], offset: usize) -> Result<u8, DecodeError> {
    data.get(offset).copied().ok_or(DecodeError::TooShort {
        expected: offset + 1,
        actual: data.len(),
    })
}

fn read_u16(data: &[u8], offset: usize) -> Result<u16, DecodeError> {
    match data.get(offset..offset + 2) {
        Some(b) => Ok(u16::from_le_bytes([b[0], b[1]])),
        None => Err(DecodeError::TooShort { expected: offset + 2, actual: data.len() }),
    }
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32, DecodeError> {
    match data.get(offset..offset + 4) {
        Some(b) => Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
        None => Err(DecodeError::TooShort { expected: offset + 4, actual: data.len() }),
    }
}

fn u24_le(b: &[u8]) -> i32 {
    i32::from(b[0]) | i32::from(b[1]) << 8 | i32::from(b[2]) << 16
}

/// IEEE-11073 32-bit FLOAT: 24-bit signed mantissa, 8-bit signed exponent.
fn read_ieee11073_float(data: &[u8], offset: usize) -> Result<f32, DecodeError> {
    let raw = read_u32(data, offset)?;
    let mantissa_bits = raw & 0x00ff_ffff;

    // NaN, NRes, +INF, -INF and the reserved value
    if matches!(mantissa_bits, 0x007f_ffff | 0x0080_0000 | 0x007f_fffe | 0x0080_0002 | 0x0080_0001) {
        return Err(DecodeError::NotANumber);
    }

    // sign-extend from 24 bits
    let mantissa = ((mantissa_bits << 8) as i32) >> 8;
    let exponent = (raw >> 24) as u8 as i8;

    Ok(mantissa as f32 * 10f32.powi(i32::from(exponent)))
}

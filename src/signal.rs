use crate::measurement::{HeartRateMeasurement, OpticalSample, Reading, TemperatureMeasurement};


/// Sent from the sensor task to the GUI.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorSignal {
    Scanning,
    Connected {
        name: String,
    },
    Disconnected,
    SignalStrength(i16),
    HeartRate(HeartRateMeasurement),
    Temperature(TemperatureMeasurement),
    BatteryLevel(u8),
    StepCount(u32),
    AccelerationEnergy(u32),
    AccelerationWaveform(Vec<i32>),
    OpticalWaveform(Vec<OpticalSample>),
}

impl From<Reading> for SensorSignal {
    fn from(reading: Reading) -> Self {
        match reading {
            Reading::HeartRate(hr) => SensorSignal::HeartRate(hr),
            Reading::Temperature(t) => SensorSignal::Temperature(t),
            Reading::BatteryLevel(percent) => SensorSignal::BatteryLevel(percent),
            Reading::StepCount(steps) => SensorSignal::StepCount(steps),
            Reading::AccelerationEnergy(energy) => SensorSignal::AccelerationEnergy(energy),
            Reading::AccelerationWaveform(wave) => SensorSignal::AccelerationWaveform(wave),
            Reading::OpticalWaveform(wave) => SensorSignal::OpticalWaveform(wave),
        }
    }
}

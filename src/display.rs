use crate::profile::DeviceModel;
use crate::signal::SensorSignal;


pub const DISCONNECTED_SIGNAL_DB: i16 = -99;
pub const DISCONNECTED_BATTERY_PERCENT: u8 = 0;

pub const HEART_RATE_PHRASE: &str = "Heart Rate:";
pub const TEMPERATURE_PHRASE: &str = "Temperature: ";
pub const STEP_COUNT_PHRASE: &str = "Step Count: ";
pub const ACCEL_ENERGY_PHRASE: &str = "Accel Energy: ";
pub const AMBIENT_TEMP_PHRASE: &str = "Ambient Temp: ";


/// Number of bars on the signal strength icon, 0..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SignalLevel(pub u8);

impl SignalLevel {
    pub const MAX: u8 = 4;

    pub fn from_rssi(db: i16) -> Self {
        let bars = if db > -70 {
            4
        } else if db > -80 {
            3
        } else if db > -85 {
            2
        } else if db > -87 {
            1
        } else {
            0
        };
        SignalLevel(bars)
    }
}

/// Filled segments on the battery icon, 0..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BatteryLevel(pub u8);

impl BatteryLevel {
    pub const MAX: u8 = 4;

    pub fn from_percent(percent: u8) -> Self {
        let segments = if percent < 20 {
            0
        } else if percent < 40 {
            1
        } else if percent < 60 {
            2
        } else if percent < 80 {
            3
        } else {
            4
        };
        BatteryLevel(segments)
    }
}


pub fn format_heart_rate(bpm: u16) -> String {
    format!("{bpm} bpm")
}

pub fn format_temperature(celsius: f32) -> String {
    format!("{celsius:.1}\u{00b0}C")
}

pub fn format_battery(percent: u8) -> String {
    format!("{percent}%")
}

pub fn format_step_count(steps: u32) -> String {
    format!("{steps} steps")
}

pub fn format_acceleration_energy(energy: u32) -> String {
    format!("{energy}g")
}

pub fn format_signal_strength(db: i16) -> String {
    format!("{db}db")
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Scanning,
    Connected(String),
    Disconnected,
}

impl Status {
    pub fn text(&self) -> String {
        match self {
            Status::Idle => "Idle".to_string(),
            Status::Scanning => "Scanning...".to_string(),
            Status::Connected(name) => format!("Connected to {name}"),
            Status::Disconnected => "Disconnected, reconnecting...".to_string(),
        }
    }
}


/// Everything the readings layout shows. `None` means the row stays blank.
#[derive(Debug, Clone, PartialEq)]
pub struct Readings {
    pub model: DeviceModel,
    pub status: Status,
    pub signal_db: Option<i16>,
    pub battery_percent: Option<u8>,
    pub heart_rate: Option<u16>,
    pub temperature: Option<f32>,
    pub step_count: Option<u32>,
    pub acceleration_energy: Option<u32>,
}

impl Readings {
    pub fn new(model: DeviceModel) -> Self {
        Readings {
            model,
            status: Status::Idle,
            signal_db: None,
            battery_percent: None,
            heart_rate: None,
            temperature: None,
            step_count: None,
            acceleration_energy: None,
        }
    }

    pub fn apply(&mut self, signal: &SensorSignal) {
        match signal {
            SensorSignal::Scanning => {
                self.status = Status::Scanning;
                self.show_disconnected();
            }
            SensorSignal::Connected { name } => self.status = Status::Connected(name.clone()),
            SensorSignal::Disconnected => {
                self.status = Status::Disconnected;
                self.show_disconnected();
            }
            SensorSignal::SignalStrength(db) => self.signal_db = Some(*db),
            SensorSignal::HeartRate(hr) => self.heart_rate = Some(hr.bpm),
            SensorSignal::Temperature(t) => self.temperature = Some(t.celsius),
            SensorSignal::BatteryLevel(percent) => self.battery_percent = Some(*percent),
            SensorSignal::StepCount(steps) => self.step_count = Some(*steps),
            SensorSignal::AccelerationEnergy(energy) => self.acceleration_energy = Some(*energy),
            SensorSignal::AccelerationWaveform(_) | SensorSignal::OpticalWaveform(_) => {}
        }
    }

    fn show_disconnected(&mut self) {
        self.signal_db = Some(DISCONNECTED_SIGNAL_DB);
        self.battery_percent = Some(DISCONNECTED_BATTERY_PERCENT);
    }

    pub fn signal_level(&self) -> Option<SignalLevel> {
        self.signal_db.map(SignalLevel::from_rssi)
    }

    pub fn battery_level(&self) -> Option<BatteryLevel> {
        self.battery_percent.map(BatteryLevel::from_percent)
    }

    /// Phrase and value pairs for the text rows that have received a value.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = Vec::new();
        if let Some(bpm) = self.heart_rate {
            rows.push((HEART_RATE_PHRASE, format_heart_rate(bpm)));
        }
        if let Some(celsius) = self.temperature {
            rows.push((TEMPERATURE_PHRASE, format_temperature(celsius)));
        }
        if let Some(steps) = self.step_count {
            rows.push((STEP_COUNT_PHRASE, format_step_count(steps)));
        }
        if let Some(energy) = self.acceleration_energy {
            rows.push((ACCEL_ENERGY_PHRASE, format_acceleration_energy(energy)));
        }
        rows
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::HeartRateMeasurement;

    #[test]
    fn signal_thresholds() {
        assert_eq!(SignalLevel::from_rssi(-40), SignalLevel(4));
        assert_eq!(SignalLevel::from_rssi(-69), SignalLevel(4));
        assert_eq!(SignalLevel::from_rssi(-70), SignalLevel(3));
        assert_eq!(SignalLevel::from_rssi(-79), SignalLevel(3));
        assert_eq!(SignalLevel::from_rssi(-80), SignalLevel(2));
        assert_eq!(SignalLevel::from_rssi(-84), SignalLevel(2));
        assert_eq!(SignalLevel::from_rssi(-85), SignalLevel(1));
        assert_eq!(SignalLevel::from_rssi(-86), SignalLevel(1));
        assert_eq!(SignalLevel::from_rssi(-87), SignalLevel(0));
        assert_eq!(SignalLevel::from_rssi(DISCONNECTED_SIGNAL_DB), SignalLevel(0));
    }

    #[test]
    fn battery_thresholds() {
        assert_eq!(BatteryLevel::from_percent(0), BatteryLevel(0));
        assert_eq!(BatteryLevel::from_percent(19), BatteryLevel(0));
        assert_eq!(BatteryLevel::from_percent(20), BatteryLevel(1));
        assert_eq!(BatteryLevel::from_percent(39), BatteryLevel(1));
        assert_eq!(BatteryLevel::from_percent(40), BatteryLevel(2));
        assert_eq!(BatteryLevel::from_percent(60), BatteryLevel(3));
        assert_eq!(BatteryLevel::from_percent(79), BatteryLevel(3));
        assert_eq!(BatteryLevel::from_percent(80), BatteryLevel(4));
        assert_eq!(BatteryLevel::from_percent(100), BatteryLevel(4));
    }

    #[test]
    fn formatting() {
        assert_eq!(format_heart_rate(72), "72 bpm");
        assert_eq!(format_temperature(36.54), "36.5°C");
        assert_eq!(format_temperature(37.0), "37.0°C");
        assert_eq!(format_temperature(-0.04), "-0.0°C");
        assert_eq!(format_battery(87), "87%");
        assert_eq!(format_step_count(1200), "1200 steps");
        assert_eq!(format_acceleration_energy(15), "15g");
        assert_eq!(format_signal_strength(-72), "-72db");
    }

    #[test]
    fn disconnect_resets_to_placeholders() {
        let mut readings = Readings::new(DeviceModel::AngelSensor);
        readings.apply(&SensorSignal::SignalStrength(-60));
        readings.apply(&SensorSignal::BatteryLevel(90));
        readings.apply(&SensorSignal::Disconnected);

        assert_eq!(readings.status, Status::Disconnected);
        assert_eq!(readings.signal_db, Some(-99));
        assert_eq!(readings.battery_percent, Some(0));
        assert_eq!(readings.signal_level(), Some(SignalLevel(0)));
        assert_eq!(readings.battery_level(), Some(BatteryLevel(0)));
    }

    #[test]
    fn rows_follow_received_values() {
        let mut readings = Readings::new(DeviceModel::AngelSensor);
        assert!(readings.rows().is_empty());

        readings.apply(&SensorSignal::HeartRate(HeartRateMeasurement {
            bpm: 64,
            sensor_contact: Some(true),
            energy_expended: None,
            rr_intervals: vec![],
        }));
        readings.apply(&SensorSignal::StepCount(42));

        assert_eq!(
            readings.rows(),
            vec![
                (HEART_RATE_PHRASE, "64 bpm".to_string()),
                (STEP_COUNT_PHRASE, "42 steps".to_string()),
            ]
        );
    }
}

use crate::gatt::{Channel, ServiceKind, ServiceRegistry};


pub const ANGEL_SENSOR_PREFIX: &str = "Angel Sensor";
pub const SENSOR_TAG_NAME: &str = "CC2650 SensorTag";


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceModel {
    AngelSensor,
    /// Recognised but not wired up yet: nothing is subscribed.
    SensorTag,
    Unknown,
}

impl DeviceModel {
    pub fn from_name(name: &str) -> Self {
        if name.starts_with(ANGEL_SENSOR_PREFIX) {
            DeviceModel::AngelSensor
        } else if name == SENSOR_TAG_NAME {
            DeviceModel::SensorTag
        } else {
            DeviceModel::Unknown
        }
    }

    pub fn shows_readings(self) -> bool {
        self == DeviceModel::AngelSensor
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Readings,
    Graphs,
}

impl Layout {
    pub fn services(self) -> &'static [ServiceKind] {
        match self {
            Layout::Readings => &[
                ServiceKind::HeartRate,
                ServiceKind::HealthThermometer,
                ServiceKind::Battery,
                ServiceKind::ActivityMonitoring,
            ],
            Layout::Graphs => &[ServiceKind::WaveformSignal],
        }
    }

    pub fn polls_rssi(self) -> bool {
        self == Layout::Readings
    }
}


/// What one session registers, subscribes to and polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub model: DeviceModel,
    pub layout: Layout,
}

impl Profile {
    pub fn new(name: &str, layout: Layout) -> Self {
        Profile {
            model: DeviceModel::from_name(name),
            layout,
        }
    }

    pub fn registry(&self) -> ServiceRegistry {
        let mut registry = ServiceRegistry::new();
        for &service in self.layout.services() {
            registry.register(service);
        }
        registry
    }

    pub fn notifications(&self) -> &'static [Channel] {
        match (self.layout, self.model) {
            (Layout::Readings, DeviceModel::AngelSensor) => &[
                Channel::HeartRateMeasurement,
                Channel::TemperatureMeasurement,
                Channel::BatteryLevel,
                Channel::StepCount,
            ],
            (Layout::Graphs, _) => &[Channel::AccelerationWaveform, Channel::OpticalWaveform],
            (Layout::Readings, DeviceModel::SensorTag | DeviceModel::Unknown) => &[],
        }
    }

    pub fn polled(&self) -> Option<Channel> {
        match (self.layout, self.model) {
            (Layout::Readings, DeviceModel::AngelSensor) => Some(Channel::AccelerationEnergyMagnitude),
            _ => None,
        }
    }

    pub fn polls_rssi(&self) -> bool {
        self.layout.polls_rssi()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_from_name() {
        assert_eq!(DeviceModel::from_name("Angel Sensor 03957"), DeviceModel::AngelSensor);
        assert_eq!(DeviceModel::from_name("Angel Sensor M1"), DeviceModel::AngelSensor);
        assert_eq!(DeviceModel::from_name("CC2650 SensorTag"), DeviceModel::SensorTag);
        assert_eq!(DeviceModel::from_name("COROS PACE Pro"), DeviceModel::Unknown);
        assert_eq!(DeviceModel::from_name("angel sensor"), DeviceModel::Unknown);
    }

    #[test]
    fn readings_profile_for_angel_sensor() {
        let profile = Profile::new("Angel Sensor 03957", Layout::Readings);
        let registry = profile.registry();

        assert_eq!(registry.services().len(), 4);
        assert!(!registry.is_registered(ServiceKind::WaveformSignal));
        assert_eq!(profile.notifications().len(), 4);
        assert_eq!(profile.polled(), Some(Channel::AccelerationEnergyMagnitude));
        assert!(profile.polls_rssi());
        assert!(profile.model.shows_readings());

        for channel in profile.notifications() {
            assert!(registry.is_registered(channel.service()));
        }
    }

    #[test]
    fn graphs_profile_registers_waveforms_only() {
        let profile = Profile::new("Angel Sensor 03957", Layout::Graphs);
        let registry = profile.registry();

        assert_eq!(registry.services(), &[ServiceKind::WaveformSignal]);
        assert_eq!(
            profile.notifications(),
            &[Channel::AccelerationWaveform, Channel::OpticalWaveform]
        );
        assert_eq!(profile.polled(), None);
        assert!(!profile.polls_rssi());
    }

    #[test]
    fn sensor_tag_subscribes_to_nothing() {
        let profile = Profile::new(SENSOR_TAG_NAME, Layout::Readings);
        assert!(profile.notifications().is_empty());
        assert_eq!(profile.polled(), None);
        assert!(profile.polls_rssi());
        assert!(!profile.model.shows_readings());
    }
}

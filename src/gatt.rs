//! Services and characteristics this monitor knows how to consume.

use btleplug::api::Characteristic;
use uuid::Uuid;

use crate::error::SensorError;


// https://www.bluetooth.com/specifications/assigned-numbers/
pub const HEART_RATE_SERVICE_UUID: Uuid = Uuid::from_u128(0x0000180d00001000800000805f9b34fb);
pub const HEART_RATE_MEASUREMENT_UUID: Uuid = Uuid::from_u128(0x00002a3700001000800000805f9b34fb);
pub const HEALTH_THERMOMETER_SERVICE_UUID: Uuid = Uuid::from_u128(0x0000180900001000800000805f9b34fb);
pub const TEMPERATURE_MEASUREMENT_UUID: Uuid = Uuid::from_u128(0x00002a1c00001000800000805f9b34fb);
pub const BATTERY_SERVICE_UUID: Uuid = Uuid::from_u128(0x0000180f00001000800000805f9b34fb);
pub const BATTERY_LEVEL_UUID: Uuid = Uuid::from_u128(0x00002a1900001000800000805f9b34fb);

// Angel Sensor vendor services
pub const ACTIVITY_MONITORING_SERVICE_UUID: Uuid = Uuid::from_u128(0x68b527384a0440e18f83337a29c3284d);
pub const STEP_COUNT_UUID: Uuid = Uuid::from_u128(0x7a5433056b9e4878ad6729c5a9d99736);
pub const ACCELERATION_ENERGY_MAGNITUDE_UUID: Uuid = Uuid::from_u128(0x9e3bd0d7bdd841fdaf1f5e99679183ff);
pub const WAVEFORM_SIGNAL_SERVICE_UUID: Uuid = Uuid::from_u128(0x481d178c10dd11e4b514b2227cce2b54);
pub const OPTICAL_WAVEFORM_UUID: Uuid = Uuid::from_u128(0x334c0be876f9458bbb2e7df2b486b4d7);
pub const ACCELERATION_WAVEFORM_UUID: Uuid = Uuid::from_u128(0x4e92f4abc01f4b4c8ad415cb69f1a7b9);


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    HeartRate,
    HealthThermometer,
    Battery,
    ActivityMonitoring,
    WaveformSignal,
}

impl ServiceKind {
    pub fn uuid(self) -> Uuid {
        match self {
            ServiceKind::HeartRate => HEART_RATE_SERVICE_UUID,
            ServiceKind::HealthThermometer => HEALTH_THERMOMETER_SERVICE_UUID,
            ServiceKind::Battery => BATTERY_SERVICE_UUID,
            ServiceKind::ActivityMonitoring => ACTIVITY_MONITORING_SERVICE_UUID,
            ServiceKind::WaveformSignal => WAVEFORM_SIGNAL_SERVICE_UUID,
        }
    }

    pub fn characteristics(self) -> &'static [Channel] {
        match self {
            ServiceKind::HeartRate => &[Channel::HeartRateMeasurement],
            ServiceKind::HealthThermometer => &[Channel::TemperatureMeasurement],
            ServiceKind::Battery => &[Channel::BatteryLevel],
            ServiceKind::ActivityMonitoring => {
                &[Channel::StepCount, Channel::AccelerationEnergyMagnitude]
            }
            ServiceKind::WaveformSignal => {
                &[Channel::OpticalWaveform, Channel::AccelerationWaveform]
            }
        }
    }
}

/// A characteristic whose values end up on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    HeartRateMeasurement,
    TemperatureMeasurement,
    BatteryLevel,
    StepCount,
    AccelerationEnergyMagnitude,
    OpticalWaveform,
    AccelerationWaveform,
}

impl Channel {
    pub const ALL: [Channel; 7] = [
        Channel::HeartRateMeasurement,
        Channel::TemperatureMeasurement,
        Channel::BatteryLevel,
        Channel::StepCount,
        Channel::AccelerationEnergyMagnitude,
        Channel::OpticalWaveform,
        Channel::AccelerationWaveform,
    ];

    pub fn uuid(self) -> Uuid {
        match self {
            Channel::HeartRateMeasurement => HEART_RATE_MEASUREMENT_UUID,
            Channel::TemperatureMeasurement => TEMPERATURE_MEASUREMENT_UUID,
            Channel::BatteryLevel => BATTERY_LEVEL_UUID,
            Channel::StepCount => STEP_COUNT_UUID,
            Channel::AccelerationEnergyMagnitude => ACCELERATION_ENERGY_MAGNITUDE_UUID,
            Channel::OpticalWaveform => OPTICAL_WAVEFORM_UUID,
            Channel::AccelerationWaveform => ACCELERATION_WAVEFORM_UUID,
        }
    }

    pub fn service(self) -> ServiceKind {
        match self {
            Channel::HeartRateMeasurement => ServiceKind::HeartRate,
            Channel::TemperatureMeasurement => ServiceKind::HealthThermometer,
            Channel::BatteryLevel => ServiceKind::Battery,
            Channel::StepCount | Channel::AccelerationEnergyMagnitude => {
                ServiceKind::ActivityMonitoring
            }
            Channel::OpticalWaveform | Channel::AccelerationWaveform => {
                ServiceKind::WaveformSignal
            }
        }
    }

    pub fn from_uuid(uuid: Uuid) -> Option<Channel> {
        Channel::ALL.into_iter().find(|channel| channel.uuid() == uuid)
    }
}


/// Anything discovered on a peripheral that can be matched against the catalog.
pub trait GattEntry {
    fn uuid(&self) -> Uuid;
    fn service_uuid(&self) -> Uuid;
}

impl GattEntry for Characteristic {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn service_uuid(&self) -> Uuid {
        self.service_uuid
    }
}


/// The set of services a session asked for before connecting.
#[derive(Debug, Default, Clone)]
pub struct ServiceRegistry {
    services: Vec<ServiceKind>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        ServiceRegistry::default()
    }

    pub fn register(&mut self, kind: ServiceKind) {
        if !self.services.contains(&kind) {
            self.services.push(kind);
        }
    }

    pub fn is_registered(&self, kind: ServiceKind) -> bool {
        self.services.contains(&kind)
    }

    #[cfg(test)]
    pub fn services(&self) -> &[ServiceKind] {
        &self.services
    }

    /// Pairs each requested channel with the matching discovered characteristic.
    pub fn resolve<'a, C, I>(&self, channels: &[Channel], discovered: I) -> Result<Vec<(Channel, C)>, SensorError>
    where
        C: GattEntry + Clone + 'a,
        I: IntoIterator<Item = &'a C>,
    {
        let discovered: Vec<&C> = discovered.into_iter().collect();
        let mut resolved = Vec::with_capacity(channels.len());

        for &channel in channels {
            let service = channel.service();
            if !self.is_registered(service) {
                return Err(SensorError::UnregisteredService(channel));
            }

            let Some(found) = discovered
                .iter()
                .find(|c| c.uuid() == channel.uuid() && c.service_uuid() == service.uuid())
            else {
                return Err(SensorError::MissingCharacteristic {
                    channel,
                    service,
                    uuid: channel.uuid(),
                });
            };

            resolved.push((channel, (*found).clone()));
        }

        Ok(resolved)
    }

    /// Like `resolve` for a single channel, but a characteristic the device
    /// lacks yields `None`. An unregistered service is still an error.
    pub fn resolve_optional<'a, C, I>(&self, channel: Channel, discovered: I) -> Result<Option<C>, SensorError>
    where
        C: GattEntry + Clone + 'a,
        I: IntoIterator<Item = &'a C>,
    {
        match self.resolve(&[channel], discovered) {
            Ok(resolved) => Ok(resolved.into_iter().next().map(|(_, c)| c)),
            Err(SensorError::MissingCharacteristic { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        uuid: Uuid,
        service_uuid: Uuid,
    }

    impl GattEntry for Entry {
        fn uuid(&self) -> Uuid {
            self.uuid
        }

        fn service_uuid(&self) -> Uuid {
            self.service_uuid
        }
    }

    fn entry(channel: Channel) -> Entry {
        Entry {
            uuid: channel.uuid(),
            service_uuid: channel.service().uuid(),
        }
    }

    #[test]
    fn every_channel_belongs_to_its_service() {
        for channel in Channel::ALL {
            assert!(channel.service().characteristics().contains(&channel));
            assert_eq!(Channel::from_uuid(channel.uuid()), Some(channel));
        }
    }

    #[test]
    fn standard_uuids_use_the_bluetooth_base() {
        assert_eq!(
            HEART_RATE_MEASUREMENT_UUID.to_string(),
            "00002a37-0000-1000-8000-00805f9b34fb"
        );
        assert_eq!(
            BATTERY_SERVICE_UUID.to_string(),
            "0000180f-0000-1000-8000-00805f9b34fb"
        );
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = ServiceRegistry::new();
        registry.register(ServiceKind::Battery);
        registry.register(ServiceKind::Battery);
        assert_eq!(registry.services(), &[ServiceKind::Battery]);
    }

    #[test]
    fn resolve_finds_registered_characteristics() {
        let mut registry = ServiceRegistry::new();
        registry.register(ServiceKind::HeartRate);
        registry.register(ServiceKind::Battery);

        let discovered = vec![entry(Channel::BatteryLevel), entry(Channel::HeartRateMeasurement)];
        let resolved = registry
            .resolve(&[Channel::HeartRateMeasurement, Channel::BatteryLevel], &discovered)
            .unwrap();

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].0, Channel::HeartRateMeasurement);
        assert_eq!(resolved[0].1, entry(Channel::HeartRateMeasurement));
        assert_eq!(resolved[1].0, Channel::BatteryLevel);
    }

    #[test]
    fn resolve_rejects_unregistered_service() {
        let registry = ServiceRegistry::new();
        let discovered = vec![entry(Channel::StepCount)];
        let err = registry.resolve(&[Channel::StepCount], &discovered).unwrap_err();
        assert!(matches!(err, SensorError::UnregisteredService(Channel::StepCount)));
    }

    #[test]
    fn resolve_reports_missing_characteristic() {
        let mut registry = ServiceRegistry::new();
        registry.register(ServiceKind::WaveformSignal);
        let discovered = vec![entry(Channel::OpticalWaveform)];
        let err = registry
            .resolve(&[Channel::AccelerationWaveform], &discovered)
            .unwrap_err();
        assert!(matches!(
            err,
            SensorError::MissingCharacteristic { channel: Channel::AccelerationWaveform, .. }
        ));
    }

    #[test]
    fn optional_channel_absent_from_device_is_none() {
        let mut registry = ServiceRegistry::new();
        registry.register(ServiceKind::ActivityMonitoring);

        let without = vec![entry(Channel::StepCount)];
        assert_eq!(
            registry.resolve_optional(Channel::AccelerationEnergyMagnitude, &without).unwrap(),
            None
        );

        let with = vec![entry(Channel::StepCount), entry(Channel::AccelerationEnergyMagnitude)];
        assert_eq!(
            registry.resolve_optional(Channel::AccelerationEnergyMagnitude, &with).unwrap(),
            Some(entry(Channel::AccelerationEnergyMagnitude))
        );
    }

    #[test]
    fn optional_channel_still_requires_registration() {
        let registry = ServiceRegistry::new();
        let discovered = vec![entry(Channel::AccelerationEnergyMagnitude)];
        let err = registry
            .resolve_optional(Channel::AccelerationEnergyMagnitude, &discovered)
            .unwrap_err();
        assert!(matches!(
            err,
            SensorError::UnregisteredService(Channel::AccelerationEnergyMagnitude)
        ));
    }

    #[test]
    fn resolve_ignores_same_uuid_under_other_service() {
        let mut registry = ServiceRegistry::new();
        registry.register(ServiceKind::Battery);
        let discovered = vec![Entry {
            uuid: BATTERY_LEVEL_UUID,
            service_uuid: HEART_RATE_SERVICE_UUID,
        }];
        assert!(registry.resolve(&[Channel::BatteryLevel], &discovered).is_err());
    }
}

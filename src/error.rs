use thiserror::Error;
use uuid::Uuid;

use crate::gatt::{Channel, ServiceKind};


#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("payload too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("battery level out of range: {0}%")]
    BatteryOutOfRange(u8),
    #[error("temperature is not a number")]
    NotANumber,
}

#[derive(Error, Debug)]
pub enum SensorError {
    #[error("no Bluetooth adapter found")]
    AdapterNotFound,
    #[error("device {0} not found during scan")]
    DeviceNotFound(String),
    #[error("could not connect to {0}")]
    ConnectionFailed(String),
    #[error("{0:?} requested but its service was never registered")]
    UnregisteredService(Channel),
    #[error("{channel:?} ({uuid}) is missing from the {service:?} service")]
    MissingCharacteristic {
        channel: Channel,
        service: ServiceKind,
        uuid: Uuid,
    },
    #[error("GUI channel closed")]
    ChannelClosed,
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("either --address or --name must be given")]
    NoDevice,
    #[error("scan window must be at least one second")]
    ZeroScanWindow,
}

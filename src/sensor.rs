use std::time::Duration;

use btleplug::api::{Central, CentralEvent, Characteristic, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral as PlatformPeripheral};
use futures::StreamExt;
use log::{debug, error, info, warn};
use tokio::sync::mpsc::Sender as TokioSender;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{DecodeError, SensorError};
use crate::gatt::Channel;
use crate::measurement::Reading;
use crate::profile::Profile;
use crate::signal::SensorSignal;


pub const RSSI_UPDATE_INTERVAL: Duration = Duration::from_millis(1000);


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Disconnected,
    Cancelled,
}


/// Decodes a notification into the signal the GUI expects.
/// Returns `None` for characteristics this monitor does not consume.
pub fn route(uuid: Uuid, value: &[u8]) -> Option<Result<SensorSignal, DecodeError>> {
    let channel = Channel::from_uuid(uuid)?;
    Some(Reading::decode(channel, value).map(SensorSignal::from))
}


pub struct SensorManager {
    config: Config,
    profile: Profile,
    tx_to_gui: TokioSender<SensorSignal>,
    cancel: CancellationToken,
}

impl SensorManager {
    pub fn new(config: Config, tx_to_gui: TokioSender<SensorSignal>, cancel: CancellationToken) -> Self {
        let profile = Profile::new(&config.name, config.layout);
        SensorManager {
            config,
            profile,
            tx_to_gui,
            cancel,
        }
    }

    async fn send(&self, signal: SensorSignal) -> Result<(), SensorError> {
        self.tx_to_gui
            .send(signal)
            .await
            .map_err(|_| SensorError::ChannelClosed)
    }

    /// Connects and keeps reconnecting until cancelled.
    pub async fn run(&mut self) -> Result<(), SensorError> {
        let manager = Manager::new().await?;

        let result = loop {
            if self.cancel.is_cancelled() {
                break Ok(());
            }

            match self.connect(&manager).await {
                Ok(SessionEnd::Cancelled) => break Ok(()),
                Ok(SessionEnd::Disconnected) => {
                    info!("{} disconnected, reconnecting", self.config.device_label());
                }
                Err(SensorError::ChannelClosed) => break Ok(()),
                Err(err @ SensorError::UnregisteredService(_)) => {
                    error!("{err}");
                    break Err(err);
                }
                Err(SensorError::AdapterNotFound) => {
                    warn!("No Bluetooth adapter found, retrying in {:?}", self.config.scan_window);
                    tokio::select! {
                        _ = self.cancel.cancelled() => break Ok(()),
                        _ = tokio::time::sleep(self.config.scan_window) => {}
                    }
                }
                Err(err) => warn!("Session ended: {err}"),
            }

            if self.send(SensorSignal::Disconnected).await.is_err() {
                break Ok(());
            }
        };

        result
    }

    async fn connect(&self, manager: &Manager) -> Result<SessionEnd, SensorError> {
        let adapter = manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .ok_or(SensorError::AdapterNotFound)?;

        self.send(SensorSignal::Scanning).await?;
        let Some((peripheral, name)) = self.find_peripheral(&adapter).await? else {
            return Ok(SessionEnd::Cancelled);
        };

        let result = self.session(&adapter, &peripheral, name).await;

        if peripheral.is_connected().await.unwrap_or(false) {
            info!("Disconnecting from {}", self.config.device_label());
            if let Err(err) = peripheral.disconnect().await {
                warn!("Disconnect failed: {err}");
            }
        }
        result
    }

    async fn find_peripheral(&self, adapter: &Adapter) -> Result<Option<(PlatformPeripheral, String)>, SensorError> {
        info!("Scanning for {}...", self.config.device_label());
        adapter.start_scan(ScanFilter::default()).await?;

        tokio::select! {
            _ = self.cancel.cancelled() => {
                let _ = adapter.stop_scan().await;
                return Ok(None);
            }
            _ = tokio::time::sleep(self.config.scan_window) => {}
        }

        // may contain peripherals that are no longer in range
        let peripherals = adapter.peripherals().await?;
        let mut found = None;
        for peripheral in peripherals {
            let Some(properties) = peripheral.properties().await? else { continue; };
            let address = properties.address.to_string();
            let name = properties.local_name;
            debug!("Saw {address} {name:?}");

            if self.config.matches(&address, name.as_deref()) {
                let name = name.unwrap_or(address);
                found = Some((peripheral, name));
                break;
            }
        }

        adapter.stop_scan().await?;
        match found {
            Some(found) => Ok(Some(found)),
            None => Err(SensorError::DeviceNotFound(self.config.device_label().to_string())),
        }
    }

    async fn session(&self, adapter: &Adapter, peripheral: &PlatformPeripheral, name: String) -> Result<SessionEnd, SensorError> {
        info!("Found matching peripheral {name:?}");

        if !peripheral.is_connected().await? {
            peripheral.connect().await?;
        }
        if !peripheral.is_connected().await? {
            return Err(SensorError::ConnectionFailed(name));
        }

        debug!("Discovering {name} services...");
        peripheral.discover_services().await?;

        let registry = self.profile.registry();
        let discovered = peripheral.characteristics();
        let subscribed = registry.resolve(self.profile.notifications(), &discovered)?;
        let polled = match self.profile.polled() {
            Some(channel) => {
                let polled = registry.resolve_optional(channel, &discovered)?;
                if polled.is_none() {
                    warn!("{name} has no {channel:?} characteristic, not polling it");
                }
                polled
            }
            None => None,
        };

        for (channel, characteristic) in &subscribed {
            debug!("Subscribing to {channel:?}");
            peripheral.subscribe(characteristic).await?;
        }

        self.send(SensorSignal::Connected { name: name.clone() }).await?;
        info!("Connected to {name}, {} notifications enabled", subscribed.len());

        self.stream(adapter, peripheral, polled).await
    }

    async fn stream(&self, adapter: &Adapter, peripheral: &PlatformPeripheral, polled: Option<Characteristic>) -> Result<SessionEnd, SensorError> {
        let mut notifications = peripheral.notifications().await?;
        let mut events = adapter.events().await?;
        let id = peripheral.id();

        let polling = self.profile.polls_rssi();
        let mut reader = tokio::time::interval(RSSI_UPDATE_INTERVAL);
        reader.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return Ok(SessionEnd::Cancelled),
                notification = notifications.next() => {
                    // the stream ends when the link drops
                    let Some(notification) = notification else {
                        return Ok(SessionEnd::Disconnected);
                    };
                    match route(notification.uuid, &notification.value) {
                        Some(Ok(signal)) => self.send(signal).await?,
                        Some(Err(err)) => warn!("Dropping {} value: {err}", notification.uuid),
                        None => debug!("Ignoring notification from {}", notification.uuid),
                    }
                }
                Some(event) = events.next() => {
                    if let CentralEvent::DeviceDisconnected(disconnected) = event {
                        if disconnected == id {
                            return Ok(SessionEnd::Disconnected);
                        }
                    }
                }
                _ = reader.tick(), if polling => {
                    self.read_periodic(peripheral, polled.as_ref()).await?;
                }
            }
        }
    }

    async fn read_periodic(&self, peripheral: &PlatformPeripheral, polled: Option<&Characteristic>) -> Result<(), SensorError> {
        match peripheral.properties().await {
            Ok(Some(properties)) => {
                if let Some(rssi) = properties.rssi {
                    self.send(SensorSignal::SignalStrength(rssi)).await?;
                }
            }
            Ok(None) => {}
            Err(err) => warn!("Reading RSSI failed: {err}"),
        }

        let Some(characteristic) = polled else { return Ok(()); };
        match peripheral.read(characteristic).await {
            Ok(value) => match route(characteristic.uuid, &value) {
                Some(Ok(signal)) => self.send(signal).await?,
                Some(Err(err)) => warn!("Dropping {} value: {err}", characteristic.uuid),
                None => {}
            },
            Err(err) => warn!("Reading {} failed: {err}", characteristic.uuid),
        }
        Ok(())
    }
}

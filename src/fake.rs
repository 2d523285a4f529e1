use std::f32::consts::TAU;
use std::time::Duration;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;

use crate::measurement::{HeartRateMeasurement, OpticalSample, TemperatureMeasurement};
use crate::profile::Layout;
use crate::sensor::RSSI_UPDATE_INTERVAL;
use crate::signal::SensorSignal;


pub const SIMULATED_NAME: &str = "Angel Sensor (simulated)";

const WAVEFORM_INTERVAL: Duration = Duration::from_millis(50);
const SAMPLES_PER_PACKET: usize = 5;


/// Waveform and reading generator standing in for a real sensor.
pub struct FakeSensor {
    rng: StdRng,
    phase: f32,
    steps: u32,
    battery: u8,
}

impl FakeSensor {
    pub fn new(rng: StdRng) -> Self {
        FakeSensor {
            rng,
            phase: 0.0,
            steps: 0,
            battery: 100,
        }
    }

    pub fn readings(&mut self) -> Vec<SensorSignal> {
        self.steps += self.rng.gen_range(0..3);
        if self.rng.gen_ratio(1, 60) {
            self.battery = self.battery.saturating_sub(1);
        }

        vec![
            SensorSignal::SignalStrength(self.rng.gen_range(-90..-55)),
            SensorSignal::HeartRate(HeartRateMeasurement {
                bpm: self.rng.gen_range(58..75),
                sensor_contact: Some(true),
                energy_expended: None,
                rr_intervals: vec![],
            }),
            SensorSignal::Temperature(TemperatureMeasurement {
                celsius: self.rng.gen_range(36.2..37.1),
                timestamp: None,
                location: None,
            }),
            SensorSignal::BatteryLevel(self.battery),
            SensorSignal::StepCount(self.steps),
            SensorSignal::AccelerationEnergy(self.rng.gen_range(0..40)),
        ]
    }

    pub fn waveforms(&mut self) -> Vec<SensorSignal> {
        let mut optical = Vec::with_capacity(SAMPLES_PER_PACKET);
        let mut acceleration = Vec::with_capacity(SAMPLES_PER_PACKET);

        for _ in 0..SAMPLES_PER_PACKET {
            // roughly one pulse per second at 100 samples/s
            self.phase = (self.phase + TAU / 100.0) % TAU;
            let pulse = self.phase.sin();
            optical.push(OpticalSample {
                green: 80_000 + (pulse * 3_000.0) as i32 + self.rng.gen_range(-200..200),
                blue: 60_000 + (pulse * 1_500.0) as i32 + self.rng.gen_range(-200..200),
            });
            acceleration.push((pulse * 200.0) as i32 + self.rng.gen_range(-50..50));
        }

        vec![
            SensorSignal::AccelerationWaveform(acceleration),
            SensorSignal::OpticalWaveform(optical),
        ]
    }
}


pub async fn transmit_fake_sensor_data(tx: Sender<SensorSignal>, layout: Layout, cancel: CancellationToken) {
    info!("Simulating {SIMULATED_NAME}");
    let mut sensor = FakeSensor::new(StdRng::from_entropy());

    if tx.send(SensorSignal::Connected { name: SIMULATED_NAME.to_string() }).await.is_err() {
        return;
    }

    let period = match layout {
        Layout::Readings => RSSI_UPDATE_INTERVAL,
        Layout::Graphs => WAVEFORM_INTERVAL,
    };
    let mut ticker = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let signals = match layout {
                    Layout::Readings => sensor.readings(),
                    Layout::Graphs => sensor.waveforms(),
                };
                for signal in signals {
                    if tx.send(signal).await.is_err() {
                        return;
                    }
                }
            }
        }
    }
}

use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui::{self, Color32, RichText};
use log::{error, info, warn, LevelFilter};
use tokio::spawn;
use tokio::sync::mpsc::{self, Receiver as TokioReceiver};
use tokio_util::sync::CancellationToken;

mod config;
mod display;
mod error;
mod fake;
mod gatt;
mod graph;
mod measurement;
mod profile;
mod sensor;
mod signal;
mod widget;

use config::{Args, Config};
use display::{format_battery, format_signal_strength, Readings, AMBIENT_TEMP_PHRASE};
use graph::Graphs;
use profile::{DeviceModel, Layout};
use sensor::SensorManager;
use signal::SensorSignal;

const MAX_FPS: f64 = 60.0;
const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);


#[tokio::main]
async fn main() -> Result<()> {
    env_logger::builder()
        .filter_module(env!("CARGO_CRATE_NAME"), LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = Config::from_args(Args::parse())?;
    let (tx, rx) = mpsc::channel(128);
    let cancel = CancellationToken::new();

    let sensor_task = if config.simulate {
        spawn(fake::transmit_fake_sensor_data(tx, config.layout, cancel.clone()))
    } else {
        let mut sensor_manager = SensorManager::new(config.clone(), tx, cancel.clone());
        spawn(async move {
            if let Err(err) = sensor_manager.run().await {
                error!("Sensor session aborted: {err}");
                std::process::exit(1);
            }
        })
    };

    let model = if config.simulate {
        DeviceModel::AngelSensor
    } else {
        DeviceModel::from_name(&config.name)
    };
    let inner_size = match config.layout {
        Layout::Readings => [360.0, 480.0],
        Layout::Graphs => [800.0, 480.0],
    };
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("angel-monitor - {}", config.device_label()))
            .with_inner_size(inner_size),
        ..Default::default()
    };
    let layout = config.layout;
    let result = eframe::run_native(
        "angel-monitor",
        native_options,
        Box::new(move |cc| Ok(Box::new(MonitorApp::new(cc, rx, model, layout)))),
    );

    // window closed: stop the periodic reader and drop the connection
    info!("Window closed, disconnecting");
    cancel.cancel();
    if tokio::time::timeout(SHUTDOWN_GRACE, sensor_task).await.is_err() {
        warn!("Sensor task did not stop within {SHUTDOWN_GRACE:?}");
    }

    result.map_err(|err| anyhow!("window error: {err}"))
}


struct MonitorApp {
    rx_from_sensor: TokioReceiver<SensorSignal>,
    layout: Layout,
    readings: Readings,
    graphs: Graphs,
    frame_time: Duration,
}

impl MonitorApp {
    fn new(_cc: &eframe::CreationContext<'_>, rx_from_sensor: TokioReceiver<SensorSignal>, model: DeviceModel, layout: Layout) -> Self {
        MonitorApp {
            rx_from_sensor,
            layout,
            readings: Readings::new(model),
            graphs: Graphs::default(),
            frame_time: Duration::from_secs_f64(1.0 / MAX_FPS),
        }
    }

    fn read_channel(&mut self) {
        while let Ok(signal) = self.rx_from_sensor.try_recv() {
            self.readings.apply(&signal);
            self.graphs.apply(&signal);
        }
    }

    fn show_readings(&self, ui: &mut egui::Ui) {
        if !self.readings.model.shows_readings() {
            if self.readings.model == DeviceModel::SensorTag {
                ui.add(widget::get_phrase_label(AMBIENT_TEMP_PHRASE));
            }
            return;
        }

        ui.horizontal(|ui| {
            if let (Some(level), Some(db)) = (self.readings.signal_level(), self.readings.signal_db) {
                widget::signal_icon(ui, level);
                ui.add(widget::get_small_label(&format_signal_strength(db)));
            }
            ui.add_space(24.0);
            if let (Some(level), Some(percent)) = (self.readings.battery_level(), self.readings.battery_percent) {
                widget::battery_icon(ui, level);
                ui.add(widget::get_small_label(&format_battery(percent)));
            }
        });
        ui.separator();

        for (phrase, value) in self.readings.rows() {
            ui.horizontal(|ui| {
                ui.add(widget::get_phrase_label(phrase));
                ui.add(widget::get_value_label(&value));
            });
        }
    }

    fn show_graphs(&self, ui: &mut egui::Ui) {
        let height = ((ui.available_height() - 60.0) / 3.0).max(40.0);

        widget::graph_title(ui, "Optical (green)");
        widget::graph_view(ui, &self.graphs.green, height);
        widget::graph_title(ui, "Optical (blue)");
        widget::graph_view(ui, &self.graphs.blue, height);
        widget::graph_title(ui, "Acceleration");
        widget::graph_view(ui, &self.graphs.acceleration, height);
    }
}

impl eframe::App for MonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.read_channel();

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(Color32::BLACK).inner_margin(12.0))
            .show(ctx, |ui| {
                ui.add(widget::get_status_label(&self.readings.status));
                ui.add_space(8.0);

                match self.layout {
                    Layout::Readings => self.show_readings(ui),
                    Layout::Graphs => self.show_graphs(ui),
                }

                if self.readings.model == DeviceModel::Unknown && self.layout == Layout::Readings {
                    ui.label(RichText::new("Unsupported device model").color(Color32::GRAY));
                }
            });

        ctx.request_repaint_after(self.frame_time);
    }
}

use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;
use crate::profile::Layout;


pub const DEFAULT_DEVICE_NAME: &str = "Angel Sensor 03957";


#[derive(Parser, Debug, Clone)]
#[command(name = "angel-monitor", about = "Live readings from an Angel Sensor over BLE")]
pub struct Args {
    /// BLE address of the sensor (e.g. 00:07:80:AB:CD:EF)
    #[arg(long)]
    pub address: Option<String>,
    /// Advertised name of the sensor
    #[arg(long, default_value = DEFAULT_DEVICE_NAME)]
    pub name: String,
    /// Show the optical and acceleration waveforms instead of readings
    #[arg(long)]
    pub graphs: bool,
    /// Seconds to scan before looking for the sensor
    #[arg(long, default_value_t = 5)]
    pub scan_secs: u64,
    /// Feed the window from simulated data instead of a real sensor
    #[arg(long)]
    pub simulate: bool,
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub address: Option<String>,
    pub name: String,
    pub layout: Layout,
    pub scan_window: Duration,
    pub simulate: bool,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let address = args.address.filter(|a| !a.trim().is_empty());
        if address.is_none() && args.name.trim().is_empty() {
            return Err(ConfigError::NoDevice);
        }
        if args.scan_secs == 0 {
            return Err(ConfigError::ZeroScanWindow);
        }

        Ok(Config {
            address,
            name: args.name,
            layout: if args.graphs { Layout::Graphs } else { Layout::Readings },
            scan_window: Duration::from_secs(args.scan_secs),
            simulate: args.simulate,
        })
    }

    /// Address wins when configured; otherwise the advertised name must match exactly.
    pub fn matches(&self, address: &str, name: Option<&str>) -> bool {
        match &self.address {
            Some(wanted) => wanted.eq_ignore_ascii_case(address),
            None => name == Some(self.name.as_str()),
        }
    }

    pub fn device_label(&self) -> &str {
        self.address.as_deref().unwrap_or(&self.name)
    }
}

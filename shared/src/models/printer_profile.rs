//! Printer profile model
//!
//! Persisted configuration describing one physical printer. Values are
//! loosely validated at the edge; numeric knobs are clamped by the
//! compiler at emit time rather than rejected here.

use serde::{Deserialize, Serialize};

/// Printer profile (long-lived, read-only during a compile call)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Transport mode: "usb" | "network" | "bluetooth"
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub usb: UsbSettings,
    #[serde(default)]
    pub network: NetworkSettings,
    #[serde(default)]
    pub bluetooth: BluetoothSettings,
    #[serde(default)]
    pub cash_drawer: CashDrawerSettings,
    #[serde(default)]
    pub cut: CutSettings,
}

impl PrinterProfile {
    /// Trimmed, lowercased transport mode
    pub fn mode_normalized(&self) -> String {
        self.mode.trim().to_ascii_lowercase()
    }
}

impl Default for PrinterProfile {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            enabled: true,
            mode: default_mode(),
            usb: UsbSettings::default(),
            network: NetworkSettings::default(),
            bluetooth: BluetoothSettings::default(),
            cash_drawer: CashDrawerSettings::default(),
            cut: CutSettings::default(),
        }
    }
}

/// USB transport settings (spooler device name)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UsbSettings {
    pub printer_name: String,
}

/// Network transport settings (raw TCP, port 9100)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    #[serde(default)]
    pub ip: String,
    #[serde(default = "default_network_port")]
    pub port: u16,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            ip: String::new(),
            port: default_network_port(),
        }
    }
}

/// Bluetooth serial transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BluetoothSettings {
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_bluetooth_port")]
    pub port: u16,
}

impl Default for BluetoothSettings {
    fn default() -> Self {
        Self {
            address: String::new(),
            port: default_bluetooth_port(),
        }
    }
}

/// Cash drawer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashDrawerSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub kick_pulse: KickPulseSettings,
}

impl Default for CashDrawerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            kick_pulse: KickPulseSettings::default(),
        }
    }
}

/// Drawer-kick pulse timings (ESC p m t1 t2)
///
/// m selects the connector pin, t1/t2 the on/off time. Device range is
/// m in [0,1] and t1/t2 in [0,255]; out-of-range persisted values are
/// clamped when the pulse is emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KickPulseSettings {
    #[serde(default)]
    pub m: i32,
    #[serde(default = "default_kick_t1")]
    pub t1: i32,
    #[serde(default = "default_kick_t2")]
    pub t2: i32,
}

impl Default for KickPulseSettings {
    fn default() -> Self {
        Self { m: 0, t1: 25, t2: 250 }
    }
}

/// Paper cut configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cut mode: "partial" | "full"; unknown values fall back to partial
    #[serde(default = "default_cut_mode")]
    pub mode: String,
}

impl Default for CutSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: default_cut_mode(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_mode() -> String {
    "usb".to_string()
}

fn default_network_port() -> u16 {
    9100
}

fn default_bluetooth_port() -> u16 {
    1
}

fn default_kick_t1() -> i32 {
    25
}

fn default_kick_t2() -> i32 {
    250
}

fn default_cut_mode() -> String {
    "partial".to_string()
}

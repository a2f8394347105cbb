//! # Game-pad Device Module
//!
//! Finds a game-pad under `/dev/input` and reads its level state using the
//! Linux evdev interface.
//!
//! ## Device Detection
//!
//! In order of preference:
//! 1. The configured `device_path`, if non-empty
//! 2. A Sony DualSense (vendor 0x054c, product 0x0ce6)
//! 3. The first event device that reports `BTN_SOUTH`
//!
//! ## Control Mapping
//!
//! | Control | evdev code | Notes |
//! |---------|------------|-------|
//! | up / down | ABS_HAT0Y | evdev reports up as -1 |
//! | left / right | ABS_HAT0X | |
//! | select | BTN_SOUTH | Cross (×) |
//! | back | BTN_EAST | Circle (○) |
//! | trigger-click | BTN_TL2 | L2 click |
//! | left-x / left-y | ABS_X / ABS_Y | |
//! | right-x / right-y | ABS_RX / ABS_RY | |
//! | trigger-analog | ABS_Z | released reads as -1 |
//!
//! State is read with the key-state and absolute-state queries rather than by
//! replaying the event stream, so a poll always reflects the current levels.

use evdev::{AbsoluteAxisType, Device, Key};
use std::path::Path;
use tracing::{debug, info};

use super::sampler::PadSource;
use super::snapshot::{Axes, Axis, Button, Buttons, PadReading};
use crate::error::{FiveBarError, Result};

/// PS5 DualSense vendor ID (Sony)
const DUALSENSE_VENDOR_ID: u16 = 0x054c;

/// PS5 DualSense product ID (wired and Bluetooth)
const DUALSENSE_PRODUCT_ID: u16 = 0x0ce6;

const BUTTON_KEYS: [(Button, Key); 3] = [
    (Button::Select, Key::BTN_SOUTH),
    (Button::Back, Key::BTN_EAST),
    (Button::TriggerClick, Key::BTN_TL2),
];

const AXIS_CODES: [(Axis, AbsoluteAxisType); 5] = [
    (Axis::LeftX, AbsoluteAxisType::ABS_X),
    (Axis::LeftY, AbsoluteAxisType::ABS_Y),
    (Axis::RightX, AbsoluteAxisType::ABS_RX),
    (Axis::RightY, AbsoluteAxisType::ABS_RY),
    (Axis::TriggerAnalog, AbsoluteAxisType::ABS_Z),
];

/// Map a raw absolute value from `[minimum, maximum]` onto [-1, 1].
///
/// Axes that report an empty range read as 0.
#[must_use]
pub fn normalize_axis(value: i32, minimum: i32, maximum: i32) -> f64 {
    if maximum <= minimum {
        return 0.0;
    }
    let span = f64::from(maximum) - f64::from(minimum);
    (2.0 * (f64::from(value) - f64::from(minimum)) / span - 1.0).clamp(-1.0, 1.0)
}

/// Split hat axes into up/down/left/right presses.
pub fn apply_hat(buttons: &mut Buttons, hat_x: i32, hat_y: i32) {
    buttons.set(Button::Up, hat_y < 0);
    buttons.set(Button::Down, hat_y > 0);
    buttons.set(Button::Left, hat_x < 0);
    buttons.set(Button::Right, hat_x > 0);
}

/// Game-pad handle
pub struct Gamepad {
    device: Device,
    device_path: String,
}

impl std::fmt::Debug for Gamepad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gamepad")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl Gamepad {
    /// Open a game-pad
    ///
    /// # Arguments
    ///
    /// * `device_path` - Explicit `/dev/input/eventX` path, or empty to scan
    ///
    /// # Errors
    ///
    /// - `ControllerNotFound`: No game-pad found on the system
    /// - `Controller`: The explicit path could not be opened or `/dev/input`
    ///   could not be read
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fivebar_teleop::controller::gamepad::Gamepad;
    ///
    /// let pad = Gamepad::open("")?;
    /// println!("Connected to game-pad at: {}", pad.device_path());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(device_path: &str) -> Result<Self> {
        if !device_path.is_empty() {
            let device = Device::open(device_path).map_err(|e| {
                FiveBarError::Controller(format!("Failed to open {}: {}", device_path, e))
            })?;
            info!("Using configured game-pad at: {}", device_path);
            return Ok(Self {
                device,
                device_path: device_path.to_string(),
            });
        }

        Self::scan(Path::new("/dev/input"))
    }

    fn scan(input_dir: &Path) -> Result<Self> {
        if !input_dir.exists() {
            return Err(FiveBarError::Controller(format!(
                "{} directory not found",
                input_dir.display()
            )));
        }

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| FiveBarError::Controller(format!("Failed to read {}: {}", input_dir.display(), e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| FiveBarError::Controller(format!("Failed to read directory entry: {}", e)))?;

        // Deterministic choice when several pads are connected
        entries.sort_by_key(|entry| entry.path());

        let mut fallback: Option<Gamepad> = None;

        for entry in entries {
            let path = entry.path();

            let is_event = path
                .file_name()
                .map(|name| name.to_string_lossy().starts_with("event"))
                .unwrap_or(false);
            if !is_event {
                continue;
            }

            let device = match Device::open(&path) {
                Ok(device) => device,
                Err(e) => {
                    // Permission denied or other errors - skip device
                    debug!("Could not open {}: {}", path.display(), e);
                    continue;
                }
            };

            let id = device.input_id();
            debug!(
                "Found input device: {} (vendor: 0x{:04x}, product: 0x{:04x})",
                path.display(),
                id.vendor(),
                id.product()
            );

            let device_path = path.to_string_lossy().to_string();

            if id.vendor() == DUALSENSE_VENDOR_ID && id.product() == DUALSENSE_PRODUCT_ID {
                info!("Found PS5 DualSense controller at: {}", device_path);
                return Ok(Self { device, device_path });
            }

            let is_gamepad = device
                .supported_keys()
                .map(|keys| keys.contains(Key::BTN_SOUTH))
                .unwrap_or(false);

            if is_gamepad && fallback.is_none() {
                fallback = Some(Self { device, device_path });
            }
        }

        match fallback {
            Some(pad) => {
                info!("Found game-pad at: {}", pad.device_path);
                Ok(pad)
            }
            None => Err(FiveBarError::ControllerNotFound),
        }
    }

    /// Get the device path of this game-pad
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Human-readable name reported by the driver
    pub fn name(&self) -> Option<&str> {
        self.device.name()
    }
}

impl PadSource for Gamepad {
    fn read(&mut self) -> Result<PadReading> {
        let keys = self
            .device
            .get_key_state()
            .map_err(|e| FiveBarError::Controller(format!("Failed to read buttons: {}", e)))?;
        let abs = self
            .device
            .get_abs_state()
            .map_err(|e| FiveBarError::Controller(format!("Failed to read axes: {}", e)))?;

        let mut buttons = Buttons::default();
        for (button, key) in BUTTON_KEYS {
            buttons.set(button, keys.contains(key));
        }

        let hat_x = abs[AbsoluteAxisType::ABS_HAT0X.0 as usize].value;
        let hat_y = abs[AbsoluteAxisType::ABS_HAT0Y.0 as usize].value;
        apply_hat(&mut buttons, hat_x, hat_y);

        let mut axes = Axes::default();
        for (axis, code) in AXIS_CODES {
            let info = &abs[code.0 as usize];
            axes.set(axis, normalize_axis(info.value, info.minimum, info.maximum));
        }

        Ok(PadReading { buttons, axes })
    }

    fn describe(&self) -> String {
        match self.name() {
            Some(name) => format!("{} ({})", name, self.device_path),
            None => self.device_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dualsense_ids() {
        assert_eq!(DUALSENSE_VENDOR_ID, 0x054c, "Sony vendor ID should be 0x054c");
        assert_eq!(DUALSENSE_PRODUCT_ID, 0x0ce6, "DualSense product ID should be 0x0ce6");
    }

    #[test]
    fn test_normalize_axis_endpoints() {
        assert_eq!(normalize_axis(0, 0, 255), -1.0);
        assert_eq!(normalize_axis(255, 0, 255), 1.0);
        assert!(normalize_axis(128, 0, 255).abs() < 0.01);
    }

    #[test]
    fn test_normalize_axis_signed_range() {
        assert_eq!(normalize_axis(-32768, -32768, 32767), -1.0);
        assert_eq!(normalize_axis(32767, -32768, 32767), 1.0);
    }

    #[test]
    fn test_normalize_axis_clamps_out_of_range() {
        assert_eq!(normalize_axis(300, 0, 255), 1.0);
        assert_eq!(normalize_axis(-5, 0, 255), -1.0);
    }

    #[test]
    fn test_normalize_axis_empty_range() {
        assert_eq!(normalize_axis(42, 0, 0), 0.0);
    }

    #[test]
    fn test_hat_directions() {
        let mut buttons = Buttons::default();

        apply_hat(&mut buttons, 0, -1);
        assert!(buttons.get(Button::Up));
        assert!(!buttons.get(Button::Down));

        apply_hat(&mut buttons, 1, 1);
        assert!(!buttons.get(Button::Up));
        assert!(buttons.get(Button::Down));
        assert!(buttons.get(Button::Right));
        assert!(!buttons.get(Button::Left));

        apply_hat(&mut buttons, 0, 0);
        assert!(!buttons.any());
    }

    #[test]
    fn test_scan_missing_directory() {
        let result = Gamepad::scan(Path::new("/nonexistent/input"));
        assert!(matches!(result, Err(FiveBarError::Controller(_))));
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = Gamepad::scan(dir.path());
        assert!(matches!(result, Err(FiveBarError::ControllerNotFound)));
    }

    #[test]
    fn test_open_invalid_path() {
        let result = Gamepad::open("/dev/input/nonexistent_event_device");
        assert!(matches!(result, Err(FiveBarError::Controller(_))));
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore]
    fn test_read_with_real_hardware() {
        let mut pad = Gamepad::open("").expect("Game-pad not found");
        assert!(pad.device_path().starts_with("/dev/input/event"));

        let reading = pad.read().expect("Failed to read game-pad state");
        println!("Reading: {:?}", reading);
    }
}

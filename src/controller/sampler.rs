//! # Input Sampler
//!
//! Turns a level-based game-pad into per-tick [`InputSnapshot`]s with
//! rising-edge events. The previous digital state is the only thing kept
//! between polls.

use tracing::warn;

use super::snapshot::{Buttons, InputSnapshot, PadReading};
use crate::error::Result;

/// A device that can report its current level state.
pub trait PadSource {
    /// Discard any queued device events so the driver does not stall.
    fn drain(&mut self) -> Result<()> {
        Ok(())
    }

    /// Read the current digital and analog state.
    fn read(&mut self) -> Result<PadReading>;

    /// Human-readable device description for logs.
    fn describe(&self) -> String;
}

/// Samples a [`PadSource`] once per tick.
///
/// Without a device every control reads as released and every axis as zero.
/// A device that fails to read is logged once and treated as absent from then
/// on.
///
/// # Examples
///
/// ```
/// use fivebar_teleop::controller::{Button, InputSampler};
///
/// let mut sampler = InputSampler::detached();
/// let snapshot = sampler.poll();
/// assert!(!snapshot.fired(Button::Back));
/// ```
pub struct InputSampler {
    source: Option<Box<dyn PadSource>>,
    previous: Buttons,
}

impl std::fmt::Debug for InputSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputSampler")
            .field("source", &self.source.as_ref().map(|s| s.describe()))
            .field("previous", &self.previous)
            .finish()
    }
}

impl InputSampler {
    #[must_use]
    pub fn new(source: Box<dyn PadSource>) -> Self {
        Self {
            source: Some(source),
            previous: Buttons::default(),
        }
    }

    /// A sampler with no device attached.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            source: None,
            previous: Buttons::default(),
        }
    }

    /// Whether a device is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.source.is_some()
    }

    /// Sample the device and compute this tick's snapshot.
    pub fn poll(&mut self) -> InputSnapshot {
        let reading = self.read_source();

        let events = reading.buttons.rising_edges(&self.previous);
        self.previous = reading.buttons;

        InputSnapshot {
            events,
            state: reading.buttons,
            axes: reading.axes,
        }
    }

    fn read_source(&mut self) -> PadReading {
        let result = match self.source.as_mut() {
            Some(source) => source.drain().and_then(|()| source.read()),
            None => return PadReading::default(),
        };

        match result {
            Ok(reading) => reading,
            Err(e) => {
                if let Some(source) = self.source.take() {
                    warn!("Game-pad {} stopped responding, continuing without it: {}", source.describe(), e);
                }
                PadReading::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::snapshot::{Axes, Axis, Button};
    use crate::error::FiveBarError;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replays a fixed sequence of readings, then fails.
    struct ScriptedPad {
        readings: VecDeque<PadReading>,
        drains: Arc<Mutex<usize>>,
    }

    impl ScriptedPad {
        fn new(readings: Vec<PadReading>) -> Self {
            Self {
                readings: readings.into(),
                drains: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl PadSource for ScriptedPad {
        fn drain(&mut self) -> Result<()> {
            *self.drains.lock().unwrap() += 1;
            Ok(())
        }

        fn read(&mut self) -> Result<PadReading> {
            self.readings
                .pop_front()
                .ok_or_else(|| FiveBarError::Controller("unplugged".to_string()))
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    fn pressed(button: Button) -> PadReading {
        PadReading {
            buttons: Buttons::default().with(button, true),
            axes: Axes::default(),
        }
    }

    #[test]
    fn test_detached_sampler_is_neutral() {
        let mut sampler = InputSampler::detached();
        assert!(!sampler.is_attached());

        let snapshot = sampler.poll();
        assert_eq!(snapshot, InputSnapshot::default());
    }

    #[test]
    fn test_hold_fires_exactly_once() {
        let released = PadReading::default();
        let script = vec![
            released,
            pressed(Button::Select),
            pressed(Button::Select),
            pressed(Button::Select),
            released,
            pressed(Button::Select),
        ];
        let mut sampler = InputSampler::new(Box::new(ScriptedPad::new(script)));

        let snapshots: Vec<InputSnapshot> = (0..6).map(|_| sampler.poll()).collect();
        let fired: Vec<bool> = snapshots.iter().map(|s| s.fired(Button::Select)).collect();
        let held: Vec<bool> = snapshots.iter().map(|s| s.held(Button::Select)).collect();

        assert_eq!(fired, [false, true, false, false, false, true]);
        assert_eq!(held, [false, true, true, true, false, true]);
    }

    #[test]
    fn test_pressed_on_first_poll_fires() {
        let mut sampler = InputSampler::new(Box::new(ScriptedPad::new(vec![pressed(Button::Back)])));
        assert!(sampler.poll().fired(Button::Back));
    }

    #[test]
    fn test_axes_pass_through_unmodified() {
        let reading = PadReading {
            buttons: Buttons::default(),
            axes: Axes::default()
                .with(Axis::RightX, 0.04)
                .with(Axis::LeftY, -0.9)
                .with(Axis::TriggerAnalog, -1.0),
        };
        let mut sampler = InputSampler::new(Box::new(ScriptedPad::new(vec![reading])));

        let snapshot = sampler.poll();
        // Below any deadzone, still reported as-is
        assert_eq!(snapshot.axis(Axis::RightX), 0.04);
        assert_eq!(snapshot.axis(Axis::LeftY), -0.9);
        assert_eq!(snapshot.axis(Axis::TriggerAnalog), -1.0);
    }

    #[test]
    fn test_drains_before_every_read() {
        let pad = ScriptedPad::new(vec![PadReading::default(); 3]);
        let drains = Arc::clone(&pad.drains);
        let mut sampler = InputSampler::new(Box::new(pad));

        for _ in 0..3 {
            sampler.poll();
        }
        assert_eq!(*drains.lock().unwrap(), 3);
    }

    #[test]
    fn test_read_failure_detaches_device() {
        let mut sampler = InputSampler::new(Box::new(ScriptedPad::new(vec![pressed(Button::Up)])));

        assert!(sampler.poll().held(Button::Up));

        // Script exhausted: read fails, sampler degrades to neutral input
        let snapshot = sampler.poll();
        assert_eq!(snapshot, InputSnapshot::default());
        assert!(!sampler.is_attached());

        // Stays detached without retrying
        assert_eq!(sampler.poll(), InputSnapshot::default());
    }
}

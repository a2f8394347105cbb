//! # Input Snapshot Types
//!
//! One tick's worth of game-pad input, split into three parts:
//!
//! | Part | Meaning |
//! |------|---------|
//! | `events` | digital control went released → pressed since the last poll |
//! | `state` | digital control is currently held |
//! | `axes` | analog value in the device's native [-1, 1] range |
//!
//! ## Controls
//!
//! | Digital | Name | Analog | Name |
//! |---------|------|--------|------|
//! | D-Pad up | `up` | Left stick X | `left-x` |
//! | D-Pad down | `down` | Left stick Y | `left-y` |
//! | D-Pad left | `left` | Right stick X | `right-x` |
//! | D-Pad right | `right` | Right stick Y | `right-y` |
//! | Cross (×) | `select` | L2 analog | `trigger-analog` |
//! | Circle (○) | `back` | | |
//! | L2 click | `trigger-click` | | |

use std::fmt;

/// Digital controls sampled every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Select,
    Back,
    TriggerClick,
}

impl Button {
    /// Number of digital controls.
    pub const COUNT: usize = 7;

    /// Every digital control, in index order.
    pub const ALL: [Button; Self::COUNT] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Select,
        Button::Back,
        Button::TriggerClick,
    ];

    /// Stable control name used in logs and by host processes.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
            Button::Select => "select",
            Button::Back => "back",
            Button::TriggerClick => "trigger-click",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Analog controls sampled every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    TriggerAnalog,
}

impl Axis {
    /// Number of analog controls.
    pub const COUNT: usize = 5;

    /// Every analog control, in index order.
    pub const ALL: [Axis; Self::COUNT] = [
        Axis::LeftX,
        Axis::LeftY,
        Axis::RightX,
        Axis::RightY,
        Axis::TriggerAnalog,
    ];

    /// Stable axis name used in logs and by host processes.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Axis::LeftX => "left-x",
            Axis::LeftY => "left-y",
            Axis::RightX => "right-x",
            Axis::RightY => "right-y",
            Axis::TriggerAnalog => "trigger-analog",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One boolean per [`Button`]. Defaults to all released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons([bool; Button::COUNT]);

impl Buttons {
    #[must_use]
    pub fn get(&self, button: Button) -> bool {
        self.0[button.index()]
    }

    pub fn set(&mut self, button: Button, pressed: bool) {
        self.0[button.index()] = pressed;
    }

    /// Builder-style [`Buttons::set`].
    #[must_use]
    pub fn with(mut self, button: Button, pressed: bool) -> Self {
        self.set(button, pressed);
        self
    }

    /// Controls pressed now that were released in `previous`.
    #[must_use]
    pub fn rising_edges(&self, previous: &Buttons) -> Buttons {
        let mut edges = Buttons::default();
        for button in Button::ALL {
            edges.set(button, self.get(button) && !previous.get(button));
        }
        edges
    }

    /// Whether any control is set.
    #[must_use]
    pub fn any(&self) -> bool {
        self.0.iter().any(|&pressed| pressed)
    }
}

/// One value per [`Axis`]. Defaults to all zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Axes([f64; Axis::COUNT]);

impl Axes {
    #[must_use]
    pub fn get(&self, axis: Axis) -> f64 {
        self.0[axis.index()]
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        self.0[axis.index()] = value;
    }

    /// Builder-style [`Axes::set`].
    #[must_use]
    pub fn with(mut self, axis: Axis, value: f64) -> Self {
        self.set(axis, value);
        self
    }
}

/// Raw level state read from a device in one poll.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PadReading {
    pub buttons: Buttons,
    pub axes: Axes,
}

/// Game-pad input for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    /// Released → pressed transitions since the previous poll.
    pub events: Buttons,
    /// Controls currently held.
    pub state: Buttons,
    /// Raw analog values, no deadzone applied.
    pub axes: Axes,
}

impl InputSnapshot {
    /// Whether `button` was pressed on this tick.
    #[must_use]
    pub fn fired(&self, button: Button) -> bool {
        self.events.get(button)
    }

    /// Whether `button` is held.
    #[must_use]
    pub fn held(&self, button: Button) -> bool {
        self.state.get(button)
    }

    #[must_use]
    pub fn axis(&self, axis: Axis) -> f64 {
        self.axes.get(axis)
    }
}

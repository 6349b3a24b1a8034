//! Collaborators the engine talks to: a display sink, a key source, a clock
//! and the main menu. The terminal front end implements them; tests use
//! scripted fakes.

use crate::error::{GaraponError, Result};
use crate::palette::ColorTag;
use crate::variant::{Game, MenuItem};
use std::ops::ControlFlow;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Logical areas of the game screen. Layout is up to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Drum(usize),
    MainTray,
    BonusTray,
    Heading,
    WinningMain,
    BonusHeading,
    WinningBonus,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Align {
    Left,
    Center,
}

/// A two-digit number cell and its colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub value: u32,
    pub tag: ColorTag,
}

pub trait Display {
    /// Paint `cells` as a grid `columns` wide, starting at the region origin.
    fn draw_number_grid(&mut self, region: Region, columns: usize, cells: &[Cell]) -> Result<()>;

    /// Replace the text of a region. Used for one-line regions only.
    fn draw_message(&mut self, region: Region, text: &str, align: Align) -> Result<()>;

    /// Blank one region, or the whole surface with `None`.
    fn clear(&mut self, region: Option<Region>) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Enter,
    Quit,
    Retry,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// Block until a key arrives.
    Block,
    /// Let one animation frame pass, then report whatever key is pending.
    Frame(Duration),
}

pub trait Input {
    fn poll_key(&mut self, wait: Wait) -> Result<Option<Key>>;
}

/// Wall-clock reading split into whole seconds and the sub-second part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    pub secs: u64,
    pub nanos: u32,
}

pub trait Clock {
    fn now(&self) -> Result<Timestamp>;

    /// Block for a fixed stretch of an animation.
    fn pause(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<Timestamp> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| GaraponError::clock(e.to_string()))?;
        Ok(Timestamp {
            secs: since_epoch.as_secs(),
            nanos: since_epoch.subsec_nanos(),
        })
    }

    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

pub trait Menu {
    fn choose(&mut self) -> Result<MenuItem>;

    /// Show the help screen. `Break` ends the program.
    fn help(&mut self, games: &[Game]) -> Result<ControlFlow<()>>;
}

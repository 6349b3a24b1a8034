#![allow(dead_code)]

use garapon_core::{
    Align, Cell, Clock, Display, Game, GameConfig, Input, Key, Menu, MenuItem, Region, Result,
    Timestamp, Wait,
};
use garapon_core::variant::draw_plan;
use std::cell::{Cell as StdCell, RefCell};
use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Grid(Region, usize, Vec<Cell>),
    Message(Region, String),
    Clear(Option<Region>),
    Flush,
}

/// Display that records every call and counts how often it was dropped.
pub struct RecordingDisplay {
    pub events: Rc<RefCell<Vec<Event>>>,
    pub drops: Rc<StdCell<u32>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
            drops: Rc::new(StdCell::new(0)),
        }
    }
}

impl Display for RecordingDisplay {
    fn draw_number_grid(&mut self, region: Region, columns: usize, cells: &[Cell]) -> Result<()> {
        self.events
            .borrow_mut()
            .push(Event::Grid(region, columns, cells.to_vec()));
        Ok(())
    }

    fn draw_message(&mut self, region: Region, text: &str, _align: Align) -> Result<()> {
        self.events
            .borrow_mut()
            .push(Event::Message(region, text.to_string()));
        Ok(())
    }

    fn clear(&mut self, region: Option<Region>) -> Result<()> {
        self.events.borrow_mut().push(Event::Clear(region));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.events.borrow_mut().push(Event::Flush);
        Ok(())
    }
}

impl Drop for RecordingDisplay {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// Keys fed in order. Frame polls take the next entry (a `None` entry means no
/// key that frame); blocking polls skip `None`s. Running dry reads as quit.
pub struct ScriptedInput {
    keys: VecDeque<Option<Key>>,
}

impl ScriptedInput {
    pub fn new(keys: Vec<Option<Key>>) -> Self {
        Self { keys: keys.into() }
    }

    /// Begin, stop the drum immediately for each of `picks`, then `last`.
    pub fn quick(picks: usize, last: Key) -> Self {
        let mut keys = vec![Some(Key::Enter)];
        keys.extend(std::iter::repeat(Some(Key::Enter)).take(picks));
        keys.push(Some(last));
        Self::new(keys)
    }
}

impl Input for ScriptedInput {
    fn poll_key(&mut self, wait: Wait) -> Result<Option<Key>> {
        match wait {
            Wait::Frame(_) => Ok(self.keys.pop_front().flatten()),
            Wait::Block => loop {
                match self.keys.pop_front() {
                    Some(Some(key)) => return Ok(Some(key)),
                    Some(None) => continue,
                    None => return Ok(Some(Key::Quit)),
                }
            },
        }
    }
}

/// Clock that moves forward a fixed step per reading and never sleeps.
pub struct StepClock {
    nanos: StdCell<u64>,
    step: u64,
    pub paused: StdCell<Duration>,
}

impl StepClock {
    pub fn new(step: u64) -> Self {
        Self {
            nanos: StdCell::new(1_700_000_000_123_456_789),
            step,
            paused: StdCell::new(Duration::ZERO),
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> Result<Timestamp> {
        let n = self.nanos.get();
        self.nanos.set(n + self.step);
        Ok(Timestamp {
            secs: n / 1_000_000_000,
            nanos: (n % 1_000_000_000) as u32,
        })
    }

    fn pause(&self, duration: Duration) {
        self.paused.set(self.paused.get() + duration);
    }
}

pub struct ScriptedMenu {
    pub choices: VecDeque<MenuItem>,
    pub help_answers: VecDeque<ControlFlow<()>>,
    pub help_shown: u32,
}

impl ScriptedMenu {
    pub fn new(choices: Vec<MenuItem>) -> Self {
        Self {
            choices: choices.into(),
            help_answers: VecDeque::new(),
            help_shown: 0,
        }
    }
}

impl Menu for ScriptedMenu {
    fn choose(&mut self) -> Result<MenuItem> {
        Ok(self.choices.pop_front().unwrap_or(MenuItem::Quit))
    }

    fn help(&mut self, games: &[Game]) -> Result<ControlFlow<()>> {
        assert_eq!(games.len(), 6);
        self.help_shown += 1;
        Ok(self
            .help_answers
            .pop_front()
            .unwrap_or(ControlFlow::Continue(())))
    }
}

pub fn fast_config() -> GameConfig {
    GameConfig {
        patience: 108,
        frame_interval_ms: 1,
        closing_frames: 6,
        closing_frame_ms: 150,
        closing_lead_in_ms: 1000,
        closing_pause_ms: 500,
        palette: Some(1),
        seed: Some(2020),
    }
}

/// Picks a full playthrough of `game` takes.
pub fn picks(game: Game) -> usize {
    draw_plan(&game.config().build_machines().unwrap()).len()
}

pub fn grids(events: &[Event], wanted: Region) -> Vec<Vec<Cell>> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Grid(region, _, cells) if *region == wanted => Some(cells.clone()),
            _ => None,
        })
        .collect()
}

pub fn messages(events: &[Event], wanted: Region) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Message(region, text) if *region == wanted => Some(text.clone()),
            _ => None,
        })
        .collect()
}

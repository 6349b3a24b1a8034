use crate::config::GameConfig;
use crate::error::Result;
use crate::io::{Align, Cell, Clock, Display, Input, Key, Region, Wait};
use crate::machine::Machine;
use crate::palette::{Color, Palette};
use crate::picker::{Spin, TimedPicker};
use crate::shuffle::Shuffler;
use crate::sort::{order_bonus, sort_main};
use crate::variant::{draw_plan, Game, PlannedDraw, ShufflePolicy, Tray, VariantConfig};
use rand::Rng;
use uuid::Uuid;

pub const PROMPT_BEGIN: &str = "Press <Enter> key";
pub const PROMPT_AFTER: &str = "'r' to retry, 'q' to exit";
pub const HEADING_MAIN: &str = "winning numbers";
pub const HEADING_BONUS: &str = "omake";
const SLEEP_WORD: &str = "nowsleeping";
const TICKER_WIDTH: usize = 6;

/// Session states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    MachineSetup,
    Drawing,
    Presenting,
    Finished(Outcome),
}

/// What the operator asked for at the end of a playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Retry,
    Quit,
}

/// Numbers drawn in one playthrough.
///
/// Filled in draw order while drawing; [`DrawResult::finalize`] produces the
/// presented form with main numbers ascending and bonus numbers ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawResult {
    main: Vec<u32>,
    bonus: Vec<u32>,
}

impl DrawResult {
    pub fn main(&self) -> &[u32] {
        &self.main
    }

    pub fn bonus(&self) -> &[u32] {
        &self.bonus
    }

    fn record(&mut self, tray: Tray, value: u32) {
        match tray {
            Tray::Main => self.main.push(value),
            Tray::Bonus => self.bonus.push(value),
        }
    }

    pub fn finalize(&self) -> Result<DrawResult> {
        Ok(DrawResult {
            main: sort_main(&self.main)?,
            bonus: order_bonus(&self.bonus),
        })
    }
}

/// One playthrough of one variant.
///
/// Owns its machines and its display surface; the surface is released when
/// the session is dropped.
pub struct GameSession<'a, D, I, C, R> {
    id: Uuid,
    game: Game,
    variant: &'static VariantConfig,
    config: &'a GameConfig,
    palette: &'a Palette,
    clock: &'a C,
    shuffler: &'a mut Shuffler<R>,
    picker: TimedPicker,
    display: D,
    input: I,
    machines: Vec<Machine>,
    drawn: DrawResult,
    result: Option<DrawResult>,
    phase: Phase,
}

impl<'a, D, I, C, R> GameSession<'a, D, I, C, R>
where
    D: Display,
    I: Input,
    C: Clock,
    R: Rng,
{
    pub fn new(
        game: Game,
        config: &'a GameConfig,
        palette: &'a Palette,
        clock: &'a C,
        shuffler: &'a mut Shuffler<R>,
        display: D,
        input: I,
    ) -> Result<Self> {
        let variant = game.config();
        let machines = variant.build_machines()?;

        Ok(Self {
            id: Uuid::new_v4(),
            game,
            variant,
            config,
            palette,
            clock,
            shuffler,
            picker: TimedPicker::from_config(config),
            display,
            input,
            machines,
            drawn: DrawResult::default(),
            result: None,
            phase: Phase::MachineSetup,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    /// The presented result, once the session reached the presenting phase.
    pub fn result(&self) -> Option<&DrawResult> {
        self.result.as_ref()
    }

    /// Run the playthrough to its end.
    pub fn play(&mut self) -> Result<Outcome> {
        tracing::info!("Session {} started: {}", self.id, self.game);

        let outcome = match self.run_phases()? {
            Some(outcome) => outcome,
            None => {
                tracing::info!("Session {} quit by operator", self.id);
                self.display.clear(None)?;
                self.display.flush()?;
                Outcome::Quit
            }
        };

        self.phase = Phase::Finished(outcome);
        tracing::debug!("Session {} finished: {:?}", self.id, outcome);
        Ok(outcome)
    }

    /// `None` means the operator quit before the end.
    fn run_phases(&mut self) -> Result<Option<Outcome>> {
        self.phase = Phase::MachineSetup;
        if !self.setup()? {
            return Ok(None);
        }

        self.phase = Phase::Drawing;
        tracing::debug!("Session {} drawing", self.id);
        if !self.draw_all()? {
            return Ok(None);
        }

        self.phase = Phase::Presenting;
        tracing::debug!("Session {} presenting", self.id);
        self.present()
    }

    fn setup(&mut self) -> Result<bool> {
        for machine in &mut self.machines {
            machine.reset();
        }

        self.display.clear(None)?;
        for index in 0..self.machines.len() {
            paint_drum(&mut self.display, self.palette, self.variant, &self.machines, index)?;
        }
        self.display
            .draw_message(Region::Status, PROMPT_BEGIN, Align::Center)?;
        self.display.flush()?;

        self.wait_for(Key::Enter)
    }

    fn draw_all(&mut self) -> Result<bool> {
        for step in draw_plan(&self.machines) {
            if !self.draw_one(step)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn draw_one(&mut self, step: PlannedDraw) -> Result<bool> {
        self.display
            .draw_message(Region::Status, PROMPT_BEGIN, Align::Center)?;
        self.display.flush()?;

        let started = self.clock.now()?;

        let picker = self.picker;
        let variant = self.variant;
        let palette = self.palette;
        let shuffler = &mut *self.shuffler;
        let machines = &mut self.machines;
        let display = &mut self.display;

        let spin = picker.spin(&mut self.input, || {
            let turning: Vec<usize> = match variant.shuffle {
                ShufflePolicy::AllDrums => (0..machines.len()).collect(),
                ShufflePolicy::ActiveDrum => vec![step.drum],
            };
            for index in turning {
                shuffler.shuffle(&mut machines[index]);
                paint_drum(display, palette, variant, machines, index)?;
            }
            display.flush()
        })?;

        match spin {
            Spin::Quit => return Ok(false),
            Spin::PatienceExhausted => {
                tracing::debug!(
                    "Session {} drum {} stopped after {} frames",
                    self.id,
                    step.drum,
                    picker.patience()
                );
            }
            Spin::Stopped => {}
        }
        self.display.clear(Some(Region::Status))?;

        let machine = &mut self.machines[step.drum];
        let extraction = self.picker.extract(self.clock, started, machine)?;
        tracing::debug!(
            "Session {} drew {} from drum {} slot {} ({} resamples)",
            self.id,
            extraction.value,
            step.drum,
            extraction.slot,
            extraction.resamples
        );

        self.drawn.record(step.tray, extraction.value);
        self.paint_trays()?;
        for index in 0..self.machines.len() {
            paint_drum(&mut self.display, self.palette, self.variant, &self.machines, index)?;
        }
        self.display.flush()?;

        Ok(true)
    }

    fn paint_trays(&mut self) -> Result<()> {
        let main_drum = self.machines.first().and_then(Machine::color);
        let bonus_drum = self.machines.last().and_then(Machine::color);

        let main = self.cells(main_drum, self.drawn.main());
        let bonus = self.cells(bonus_drum, self.drawn.bonus());
        self.display
            .draw_number_grid(Region::MainTray, main.len().max(1), &main)?;
        self.display
            .draw_number_grid(Region::BonusTray, bonus.len().max(1), &bonus)
    }

    fn present(&mut self) -> Result<Option<Outcome>> {
        self.closing_animation()?;
        self.display.clear(None)?;

        let result = self.drawn.finalize()?;
        let main_drum = self.machines.first().and_then(Machine::color);
        let bonus_drum = self.machines.last().and_then(Machine::color);
        let main = self.cells(main_drum, result.main());
        let bonus = self.cells(bonus_drum, result.bonus());

        self.display
            .draw_message(Region::Heading, HEADING_MAIN, Align::Center)?;
        self.display
            .draw_number_grid(Region::WinningMain, main.len().max(1), &main)?;
        if !self.variant.is_dual() {
            self.display
                .draw_message(Region::BonusHeading, HEADING_BONUS, Align::Center)?;
        }
        if !bonus.is_empty() {
            self.display
                .draw_number_grid(Region::WinningBonus, bonus.len(), &bonus)?;
        }
        self.display
            .draw_message(Region::Status, PROMPT_AFTER, Align::Center)?;
        self.display.flush()?;

        tracing::info!(
            "Session {} result: main {:?} bonus {:?}",
            self.id,
            result.main(),
            result.bonus()
        );
        self.result = Some(result);

        if self.wait_for(Key::Retry)? {
            Ok(Some(Outcome::Retry))
        } else {
            Ok(None)
        }
    }

    fn closing_animation(&mut self) -> Result<()> {
        self.display.clear(Some(Region::Status))?;
        self.display.flush()?;
        self.clock.pause(self.config.closing_lead_in());

        self.display
            .draw_message(Region::Status, &sleep_line(""), Align::Center)?;
        self.display.flush()?;
        self.clock.pause(self.config.closing_pause());

        for ticker in sleep_ticker(self.config.closing_frames) {
            self.display
                .draw_message(Region::Status, &sleep_line(&ticker), Align::Center)?;
            self.display.flush()?;
            self.clock.pause(self.config.closing_frame());
        }

        self.display.clear(Some(Region::Status))?;
        self.display.flush()
    }

    fn cells(&self, drum: Option<Color>, values: &[u32]) -> Vec<Cell> {
        values
            .iter()
            .map(|&value| Cell {
                value,
                tag: self.palette.cell(drum, value),
            })
            .collect()
    }

    /// Block until `wanted` arrives. `false` when the operator quit instead.
    fn wait_for(&mut self, wanted: Key) -> Result<bool> {
        loop {
            match self.input.poll_key(Wait::Block)? {
                Some(key) if key == wanted => return Ok(true),
                Some(Key::Quit) => return Ok(false),
                _ => {}
            }
        }
    }
}

fn paint_drum<D: Display + ?Sized>(
    display: &mut D,
    palette: &Palette,
    variant: &VariantConfig,
    machines: &[Machine],
    index: usize,
) -> Result<()> {
    let machine = &machines[index];
    let cells: Vec<Cell> = machine
        .pool()
        .iter()
        .map(|&value| Cell {
            value,
            tag: palette.cell(machine.color(), value),
        })
        .collect();
    display.draw_number_grid(Region::Drum(index), variant.drums[index].columns, &cells)
}

fn sleep_line(ticker: &str) -> String {
    format!("{} {:<width$}", SLEEP_WORD, ticker, width = TICKER_WIDTH)
}

/// Frames of the "zzz..." ticker shown while the drum winds down.
///
/// Six cells are written one per frame, `z` for the first three and `.` for
/// the rest; every other pass blanks them again.
pub fn sleep_ticker(frames: u32) -> Vec<String> {
    let mut cells = [' '; TICKER_WIDTH];
    let mut writing = true;
    let mut out = Vec::with_capacity(frames as usize);

    for i in 0..frames as usize {
        let pos = i % TICKER_WIDTH;
        cells[pos] = match (writing, pos < TICKER_WIDTH / 2) {
            (false, _) => ' ',
            (true, true) => 'z',
            (true, false) => '.',
        };
        if pos == TICKER_WIDTH - 1 {
            writing = !writing;
        }
        out.push(cells.iter().collect::<String>().trim_end().to_string());
    }
    out
}

//! The fixed table of lottery variants.

use crate::error::{GaraponError, Result};
use crate::machine::Machine;
use crate::palette::Color;
use std::fmt;
use std::str::FromStr;

/// One drum of a variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrumSpec {
    pub name: &'static str,
    pub size: usize,
    pub balls: usize,
    pub sample: usize,
    pub bonus: usize,
    /// `None` paints each ball through the palette rotation.
    pub color: Option<Color>,
    /// Grid width used when the drum is drawn.
    pub columns: usize,
}

impl DrumSpec {
    pub fn build(&self) -> Result<Machine> {
        Machine::new(self.size, self.balls, self.sample, self.bonus, self.color)
    }
}

/// Which drums turn during the animation of a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShufflePolicy {
    AllDrums,
    ActiveDrum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantConfig {
    pub drums: &'static [DrumSpec],
    pub shuffle: ShufflePolicy,
}

/// Where a drawn ball is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tray {
    Main,
    Bonus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedDraw {
    pub drum: usize,
    pub tray: Tray,
}

/// The ordered sequence of picks for one playthrough over `machines`.
///
/// The first machine supplies its sample as main numbers and then its own
/// bonus balls; every later machine only supplies bonus numbers.
pub fn draw_plan(machines: &[Machine]) -> Vec<PlannedDraw> {
    let mut plan = Vec::new();
    for (drum, machine) in machines.iter().enumerate() {
        for n in 0..machine.draws_required() {
            let tray = if drum == 0 && n < machine.sample_size() {
                Tray::Main
            } else {
                Tray::Bonus
            };
            plan.push(PlannedDraw { drum, tray });
        }
    }
    plan
}

impl VariantConfig {
    pub fn build_machines(&self) -> Result<Vec<Machine>> {
        if self.drums.is_empty() {
            return Err(GaraponError::config("Variant has no drums"));
        }
        self.drums.iter().map(DrumSpec::build).collect()
    }

    pub fn main_count(&self) -> usize {
        self.drums.first().map_or(0, |d| d.sample)
    }

    pub fn is_dual(&self) -> bool {
        self.drums.len() > 1
    }
}

const JA_SIZE: usize = 70;
const US_SIZE: usize = 108;
const EU_SIZE: usize = 108;
const STAR_SIZE: usize = 54;

const fn ja_drum(balls: usize, sample: usize, bonus: usize) -> DrumSpec {
    DrumSpec {
        name: "drum",
        size: JA_SIZE,
        balls,
        sample,
        bonus,
        color: None,
        columns: 7,
    }
}

static MINI_LOTO: VariantConfig = VariantConfig {
    drums: &[ja_drum(28, 5, 1)],
    shuffle: ShufflePolicy::ActiveDrum,
};

static LOTO_SIX: VariantConfig = VariantConfig {
    drums: &[ja_drum(40, 6, 1)],
    shuffle: ShufflePolicy::ActiveDrum,
};

static LOTO_SEVEN: VariantConfig = VariantConfig {
    drums: &[ja_drum(34, 7, 2)],
    shuffle: ShufflePolicy::ActiveDrum,
};

static POWERBALL: VariantConfig = VariantConfig {
    drums: &[
        DrumSpec {
            name: "main",
            size: US_SIZE,
            balls: 66,
            sample: 5,
            bonus: 0,
            color: Some(Color::Blue),
            columns: 9,
        },
        DrumSpec {
            name: "power",
            size: US_SIZE,
            balls: 23,
            sample: 1,
            bonus: 0,
            color: Some(Color::Red),
            columns: 9,
        },
    ],
    shuffle: ShufflePolicy::AllDrums,
};

static MEGA_MILLIONS: VariantConfig = VariantConfig {
    drums: &[
        DrumSpec {
            name: "main",
            size: US_SIZE,
            balls: 67,
            sample: 5,
            bonus: 0,
            color: Some(Color::Cyan),
            columns: 9,
        },
        DrumSpec {
            name: "mega",
            size: US_SIZE,
            balls: 22,
            sample: 1,
            bonus: 0,
            color: Some(Color::Yellow),
            columns: 9,
        },
    ],
    shuffle: ShufflePolicy::AllDrums,
};

static EUROSTYLE: VariantConfig = VariantConfig {
    drums: &[
        DrumSpec {
            name: "main",
            size: EU_SIZE,
            balls: 47,
            sample: 5,
            bonus: 0,
            color: Some(Color::Red),
            columns: 9,
        },
        DrumSpec {
            name: "stars",
            size: STAR_SIZE,
            balls: 9,
            sample: 2,
            bonus: 0,
            color: Some(Color::Yellow),
            columns: 6,
        },
    ],
    shuffle: ShufflePolicy::ActiveDrum,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Game {
    MiniLoto,
    LotoSix,
    LotoSeven,
    Powerball,
    MegaMillions,
    Eurostyle,
}

impl Game {
    pub const ALL: [Game; 6] = [
        Game::MiniLoto,
        Game::LotoSix,
        Game::LotoSeven,
        Game::Powerball,
        Game::MegaMillions,
        Game::Eurostyle,
    ];

    pub fn config(&self) -> &'static VariantConfig {
        match self {
            Game::MiniLoto => &MINI_LOTO,
            Game::LotoSix => &LOTO_SIX,
            Game::LotoSeven => &LOTO_SEVEN,
            Game::Powerball => &POWERBALL,
            Game::MegaMillions => &MEGA_MILLIONS,
            Game::Eurostyle => &EUROSTYLE,
        }
    }

    /// Menu label.
    pub fn title(&self) -> &'static str {
        match self {
            Game::MiniLoto => "mini garapon",
            Game::LotoSix => "garapon six",
            Game::LotoSeven => "garapon seven",
            Game::Powerball => "power garapon",
            Game::MegaMillions => "mega garapon",
            Game::Eurostyle => "super garapon",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            Game::MiniLoto => "mini",
            Game::LotoSix => "six",
            Game::LotoSeven => "seven",
            Game::Powerball => "power",
            Game::MegaMillions => "mega",
            Game::Eurostyle => "super",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Game {
    type Err = GaraponError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Game::ALL
            .into_iter()
            .find(|g| g.slug() == wanted || g.title() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Game::ALL.iter().map(|g| g.slug()).collect();
                GaraponError::config(format!(
                    "Unknown game '{}', expected one of: {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Play(Game),
    Help,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 8] = [
        MenuItem::Play(Game::MiniLoto),
        MenuItem::Play(Game::LotoSix),
        MenuItem::Play(Game::LotoSeven),
        MenuItem::Play(Game::Powerball),
        MenuItem::Play(Game::MegaMillions),
        MenuItem::Play(Game::Eurostyle),
        MenuItem::Help,
        MenuItem::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Play(game) => game.title(),
            MenuItem::Help => "garapon help",
            MenuItem::Quit => "garapon quit",
        }
    }
}

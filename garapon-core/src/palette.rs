//! Colour assignment for balls and headings.
//!
//! A process picks one of ten fixed rotations of the seven terminal colours
//! at start-up and passes the resulting [`Palette`] to every session. Drums
//! without a colour of their own paint each ball by value through the
//! rotation; coloured drums paint every ball the same.

use crate::error::{GaraponError, Result};
use rand::Rng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Cyan => "cyan",
            Color::White => "white",
        };
        f.write_str(name)
    }
}

/// What a display should paint a cell or message with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorTag {
    /// Drawn or padding slot, painted black on black.
    Empty,
    Ball(Color),
    Heading,
}

use Color::*;

pub const ROTATIONS: [[Color; 7]; 10] = [
    [Red, Yellow, White, Green, Cyan, Blue, Magenta],
    [Yellow, White, Green, Cyan, Blue, Magenta, Red],
    [White, Green, Cyan, Blue, Magenta, Red, Yellow],
    [Green, Cyan, Blue, Magenta, Red, Yellow, White],
    [Cyan, Blue, Magenta, Red, Yellow, White, Green],
    [Magenta, Blue, Cyan, Green, White, Yellow, Red],
    [Blue, Cyan, Green, White, Yellow, Red, Magenta],
    [Cyan, Green, White, Yellow, Red, Magenta, Blue],
    [Green, White, Yellow, Red, Magenta, Blue, Cyan],
    [White, Yellow, Red, Magenta, Blue, Cyan, Green],
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    rotation: u8,
    colors: [Color; 7],
}

impl Palette {
    /// Build the palette for a 1-based rotation number.
    pub fn new(rotation: u8) -> Result<Self> {
        let colors = usize::from(rotation)
            .checked_sub(1)
            .and_then(|i| ROTATIONS.get(i))
            .ok_or_else(|| {
                GaraponError::config(format!(
                    "Palette must be between 1 and {}, got {}",
                    ROTATIONS.len(),
                    rotation
                ))
            })?;

        Ok(Self {
            rotation,
            colors: *colors,
        })
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let rotation = rng.gen_range(1..=ROTATIONS.len() as u8);
        Self {
            rotation,
            colors: ROTATIONS[usize::from(rotation) - 1],
        }
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Colour for a ball from a drum with no colour of its own.
    pub fn ball(&self, value: u32) -> ColorTag {
        if value == 0 {
            ColorTag::Empty
        } else {
            ColorTag::Ball(self.colors[(value % 7) as usize])
        }
    }

    /// Colour for a pool slot, given the owning drum's colour.
    pub fn cell(&self, drum: Option<Color>, value: u32) -> ColorTag {
        match (drum, value) {
            (_, 0) => ColorTag::Empty,
            (Some(color), _) => ColorTag::Ball(color),
            (None, value) => self.ball(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rotation_bounds() {
        assert!(Palette::new(0).is_err());
        assert!(Palette::new(11).is_err());
        assert_eq!(Palette::new(1).unwrap().ball(1), ColorTag::Ball(Yellow));
        assert_eq!(Palette::new(1).unwrap().ball(7), ColorTag::Ball(Red));
    }

    #[test]
    fn test_every_rotation_uses_all_colours() {
        for rotation in ROTATIONS {
            let mut seen = rotation.to_vec();
            seen.sort_by_key(|c| *c as u8);
            seen.dedup();
            assert_eq!(seen.len(), 7);
            assert!(!seen.contains(&Black));
        }
    }

    #[test]
    fn test_cell_tags() {
        let palette = Palette::new(3).unwrap();
        assert_eq!(palette.cell(Some(Blue), 0), ColorTag::Empty);
        assert_eq!(palette.cell(Some(Blue), 12), ColorTag::Ball(Blue));
        assert_eq!(palette.cell(None, 0), ColorTag::Empty);
        assert_eq!(palette.cell(None, 9), palette.ball(9));
    }

    #[test]
    fn test_random_palette_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let palette = Palette::random(&mut rng);
            assert!((1..=10).contains(&palette.rotation()));
        }
    }
}

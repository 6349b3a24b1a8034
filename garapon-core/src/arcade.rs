use crate::config::GameConfig;
use crate::error::Result;
use crate::io::{Clock, Display, Input, Menu};
use crate::palette::Palette;
use crate::session::{GameSession, Outcome};
use crate::shuffle::Shuffler;
use crate::variant::{Game, MenuItem};
use rand::Rng;

/// Process-wide game state: configuration, the colour palette, the clock and
/// the shuffle generator. Sessions borrow from it one at a time.
pub struct Arcade<C, R> {
    config: GameConfig,
    palette: Palette,
    clock: C,
    shuffler: Shuffler<R>,
}

impl<C: Clock, R: Rng> Arcade<C, R> {
    pub fn new(config: GameConfig, clock: C, mut rng: R) -> Result<Self> {
        config.validate()?;

        let palette = match config.palette {
            Some(rotation) => Palette::new(rotation)?,
            None => Palette::random(&mut rng),
        };
        tracing::debug!("Using palette rotation {}", palette.rotation());

        Ok(Self {
            config,
            palette,
            clock,
            shuffler: Shuffler::new(rng),
        })
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn session<D: Display, I: Input>(
        &mut self,
        game: Game,
        display: D,
        input: I,
    ) -> Result<GameSession<'_, D, I, C, R>> {
        GameSession::new(
            game,
            &self.config,
            &self.palette,
            &self.clock,
            &mut self.shuffler,
            display,
            input,
        )
    }

    /// Play `game` until the operator quits, opening a fresh surface for every
    /// playthrough. Returns the number of playthroughs that reached the result.
    pub fn play_game<D, I, F>(&mut self, game: Game, open: &mut F) -> Result<usize>
    where
        D: Display,
        I: Input,
        F: FnMut(Game) -> Result<(D, I)>,
    {
        let mut completed = 0;
        loop {
            let (display, input) = open(game)?;
            let mut session = self.session(game, display, input)?;
            let outcome = session.play()?;
            if session.result().is_some() {
                completed += 1;
            }
            drop(session);

            match outcome {
                Outcome::Retry => tracing::debug!("Retrying {}", game),
                Outcome::Quit => return Ok(completed),
            }
        }
    }

    /// The main menu loop. Returns when the operator quits from the menu.
    pub fn run<M, D, I, F>(&mut self, menu: &mut M, mut open: F) -> Result<()>
    where
        M: Menu + ?Sized,
        D: Display,
        I: Input,
        F: FnMut(Game) -> Result<(D, I)>,
    {
        loop {
            match menu.choose()? {
                MenuItem::Play(game) => match self.play_game(game, &mut open) {
                    Ok(completed) => {
                        tracing::info!("Left {} after {} completed draws", game, completed)
                    }
                    Err(e) if !e.is_fatal() => tracing::warn!("Abandoned {}: {}", game, e),
                    Err(e) => return Err(e),
                },
                MenuItem::Help => {
                    if menu.help(&Game::ALL)?.is_break() {
                        break;
                    }
                }
                MenuItem::Quit => break,
            }
        }

        tracing::info!("Leaving the arcade");
        Ok(())
    }
}

use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::Select;
use garapon_core::{Game, GaraponError, Menu, MenuItem, Result};
use std::io::{stdout, Write};
use std::ops::ControlFlow;
use termion::event::Key;
use termion::input::TermRead;
use termion::raw::IntoRawMode;

/// Main menu drawn with dialoguer.
pub struct DialogMenu {
    last: usize,
}

impl DialogMenu {
    pub fn new() -> Self {
        Self { last: 0 }
    }
}

impl Default for DialogMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu for DialogMenu {
    fn choose(&mut self) -> Result<MenuItem> {
        let labels: Vec<&str> = MenuItem::ALL.iter().map(MenuItem::label).collect();

        let selection = Select::new()
            .with_prompt("garapon")
            .items(&labels)
            .default(self.last)
            .interact_opt()
            .map_err(|e| GaraponError::surface(e.to_string()))?;

        match selection {
            Some(index) => {
                self.last = index;
                Ok(MenuItem::ALL[index])
            }
            // Esc or 'q'
            None => Ok(MenuItem::Quit),
        }
    }

    fn help(&mut self, games: &[Game]) -> Result<ControlFlow<()>> {
        println!("{}", help_table(games));
        println!("Press <Enter> to stop a spinning drum, 'q' to quit at any prompt.");
        println!("'q' to exit, any other key for the menu");
        stdout().flush()?;

        let _raw = stdout().into_raw_mode()?;
        match termion::get_tty()?.keys().next() {
            Some(Ok(Key::Char('q'))) | None => Ok(ControlFlow::Break(())),
            Some(Ok(_)) => Ok(ControlFlow::Continue(())),
            Some(Err(e)) => Err(e.into()),
        }
    }
}

fn help_table(games: &[Game]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Game", "Drum", "Slots", "Balls", "Draws", "Bonus", "Colour"]);

    for game in games {
        for drum in game.config().drums {
            let colour = drum
                .color
                .map_or_else(|| "rainbow".to_string(), |c| c.to_string());
            table.add_row(vec![
                game.title().to_string(),
                drum.name.to_string(),
                drum.size.to_string(),
                format!("1-{}", drum.balls),
                drum.sample.to_string(),
                drum.bonus.to_string(),
                colour,
            ]);
        }
    }
    table
}

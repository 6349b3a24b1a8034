//! garapon - a lottery drum game
//!
//! The draw engine behind the terminal game: drums of numbered balls, a
//! Fisher-Yates shuffler, a picker that turns the operator's reaction time
//! into the winning slot, and the session state machine that strings them
//! together for each lottery variant.

pub mod arcade;
pub mod config;
pub mod error;
pub mod io;
pub mod machine;
pub mod palette;
pub mod picker;
pub mod session;
pub mod shuffle;
pub mod sort;
pub mod variant;

pub use arcade::Arcade;
pub use config::GameConfig;
pub use error::{GaraponError, Result};
pub use io::{Align, Cell, Clock, Display, Input, Key, Menu, Region, SystemClock, Timestamp, Wait};
pub use machine::Machine;
pub use palette::{Color, ColorTag, Palette};
pub use picker::{Spin, TimedPicker};
pub use session::{DrawResult, GameSession, Outcome, Phase};
pub use shuffle::Shuffler;
pub use variant::{Game, MenuItem, VariantConfig};

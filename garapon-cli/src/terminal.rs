//! termion-backed game surface.
//!
//! Each playthrough gets its own raw-mode alternate screen. Dropping the
//! display restores the terminal. Keys come from one [`KeyReader`] for the
//! whole process.

use garapon_core::{
    Align, Cell, Color, ColorTag, Display, Game, GaraponError, Input, Key, Region, Result, Wait,
};
use std::collections::VecDeque;
use std::io::{self, stdout, Read, Stdout, Write};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use termion::color::{AnsiValue, Bg, Fg};
use termion::cursor::{Goto, Hide, Show};
use termion::event::{parse_event, Event, Key as TermKey};
use termion::raw::{IntoRawMode, RawTerminal};
use termion::screen::{AlternateScreen, IntoAlternateScreen};
use termion::{clear, style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// Where a region lives on screen. Coordinates are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    frame: Option<Rect>,
    x: u16,
    y: u16,
    width: u16,
    center_grid: bool,
}

impl Slot {
    fn framed(frame: Rect) -> Self {
        Self {
            frame: Some(frame),
            x: frame.x + 2,
            y: frame.y + 1,
            width: frame.w.saturating_sub(4),
            center_grid: false,
        }
    }

    fn line(x: u16, y: u16, width: u16) -> Self {
        Self {
            frame: None,
            x,
            y,
            width,
            center_grid: false,
        }
    }

    fn centered(mut self) -> Self {
        self.center_grid = true;
        self
    }

    fn shifted(mut self, dx: u16) -> Self {
        self.x += dx;
        self
    }
}

#[derive(Debug, Clone)]
struct Layout {
    slots: Vec<(Region, Slot)>,
}

impl Layout {
    fn for_game(game: Game, cols: u16, rows: u16) -> Self {
        let variant = game.config();
        let status = Slot::line(0, rows.saturating_sub(2), cols);

        let slots = if variant.is_dual() {
            let euro = variant.drums.get(1).is_some_and(|d| d.columns < 9);
            let (right_y, right_w, right_h, tray_w) = if euro { (5, 21, 11, 24) } else { (3, 30, 14, 21) };
            let main_offset = 3 * variant.main_count() as u16;

            let left = Rect { x: (cols / 2).saturating_sub(31), y: 3, w: 30, h: 14 };
            let right = Rect { x: cols / 2 + 1, y: right_y, w: right_w, h: right_h };
            let tx = cols.saturating_sub(tray_w) / 2;
            let tray = Rect { x: tx, y: 18, w: tray_w, h: 3 };
            let summary = Slot::line(tx + 2, 6, tray_w.saturating_sub(4));

            vec![
                (Region::Drum(0), Slot::framed(left)),
                (Region::Drum(1), Slot::framed(right)),
                (Region::MainTray, Slot::framed(tray)),
                (Region::BonusTray, Slot::framed(tray).shifted(main_offset)),
                (Region::Heading, Slot::line(tx, 4, tray_w)),
                (Region::WinningMain, summary),
                (Region::BonusHeading, Slot::line(tx, 8, tray_w)),
                (Region::WinningBonus, summary.shifted(main_offset)),
                (Region::Status, status),
            ]
        } else {
            let bx = cols.saturating_sub(24) / 2;
            let drum = Rect { x: bx, y: 3, w: 24, h: 12 };
            let main_tray = Rect { x: bx, y: 15, w: 24, h: 3 };
            let bonus_tray = Rect { x: bx, y: 18, w: 24, h: 3 };

            vec![
                (Region::Drum(0), Slot::framed(drum)),
                (Region::MainTray, Slot::framed(main_tray)),
                (Region::BonusTray, Slot::framed(bonus_tray)),
                (Region::Heading, Slot::line(bx, 4, 24)),
                (Region::WinningMain, Slot::line(bx, 6, 24).centered()),
                (Region::BonusHeading, Slot::line(bx, 8, 24)),
                (Region::WinningBonus, Slot::line(bx, 10, 24).centered()),
                (Region::Status, status),
            ]
        };

        Self { slots }
    }

    fn slot(&self, region: Region) -> Result<Slot> {
        self.slots
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, slot)| *slot)
            .ok_or_else(|| GaraponError::surface(format!("no room for {:?} on screen", region)))
    }
}

fn ansi(color: Color) -> AnsiValue {
    let code = match color {
        Color::Black => 0,
        Color::Red => 1,
        Color::Green => 2,
        Color::Yellow => 3,
        Color::Blue => 4,
        Color::Magenta => 5,
        Color::Cyan => 6,
        Color::White => 7,
    };
    AnsiValue(code)
}

fn goto(x: u16, y: u16) -> Goto {
    Goto(x + 1, y + 1)
}

pub struct TerminalDisplay {
    out: AlternateScreen<RawTerminal<Stdout>>,
    layout: Layout,
}

impl TerminalDisplay {
    pub fn open(game: Game) -> Result<Self> {
        let (cols, rows) = termion::terminal_size()
            .map_err(|e| GaraponError::surface(format!("cannot read terminal size: {}", e)))?;
        let raw = stdout()
            .into_raw_mode()
            .map_err(|e| GaraponError::surface(format!("cannot enter raw mode: {}", e)))?;
        let mut out = raw
            .into_alternate_screen()
            .map_err(|e| GaraponError::surface(format!("cannot open alternate screen: {}", e)))?;

        write!(out, "{}{}", Hide, clear::All)?;
        out.flush()?;
        tracing::debug!("Opened {}x{} surface for {}", cols, rows, game);

        Ok(Self {
            out,
            layout: Layout::for_game(game, cols, rows),
        })
    }

    fn paint(&mut self, tag: ColorTag) -> Result<()> {
        match tag {
            ColorTag::Empty => write!(self.out, "{}{}", Fg(ansi(Color::Black)), Bg(ansi(Color::Black)))?,
            ColorTag::Ball(color) => write!(self.out, "{}", Fg(ansi(color)))?,
            ColorTag::Heading => write!(self.out, "{}", Fg(ansi(Color::White)))?,
        }
        Ok(())
    }

    fn draw_frame(&mut self, rect: Rect) -> Result<()> {
        if rect.w < 2 || rect.h < 2 {
            return Ok(());
        }
        let inner = "─".repeat(usize::from(rect.w - 2));
        write!(self.out, "{}{}┌{}┐", style::Reset, goto(rect.x, rect.y), inner)?;
        for dy in 1..rect.h - 1 {
            write!(self.out, "{}│", goto(rect.x, rect.y + dy))?;
            write!(self.out, "{}│", goto(rect.x + rect.w - 1, rect.y + dy))?;
        }
        write!(self.out, "{}└{}┘", goto(rect.x, rect.y + rect.h - 1), inner)?;
        Ok(())
    }

    fn blank(&mut self, x: u16, y: u16, width: u16) -> Result<()> {
        write!(
            self.out,
            "{}{}{:width$}",
            style::Reset,
            goto(x, y),
            "",
            width = usize::from(width)
        )?;
        Ok(())
    }
}

impl Display for TerminalDisplay {
    fn draw_number_grid(&mut self, region: Region, columns: usize, cells: &[Cell]) -> Result<()> {
        let slot = self.layout.slot(region)?;
        if let Some(frame) = slot.frame {
            self.draw_frame(frame)?;
        }

        let columns = columns.max(1);
        let x0 = if slot.center_grid {
            let used = (3 * cells.len().min(columns)) as u16;
            slot.x + slot.width.saturating_sub(used).saturating_add(1) / 2
        } else {
            slot.x
        };

        for (i, cell) in cells.iter().enumerate() {
            let x = x0 + 3 * (i % columns) as u16;
            let y = slot.y + (i / columns) as u16;
            write!(self.out, "{}", goto(x, y))?;
            self.paint(cell.tag)?;
            write!(self.out, "{:02}{}", cell.value, style::Reset)?;
        }
        Ok(())
    }

    fn draw_message(&mut self, region: Region, text: &str, align: Align) -> Result<()> {
        let slot = self.layout.slot(region)?;
        self.blank(slot.x, slot.y, slot.width)?;

        let len = text.chars().count() as u16;
        let x = match align {
            Align::Left => slot.x,
            Align::Center => slot.x + slot.width.saturating_sub(len) / 2,
        };
        write!(self.out, "{}", goto(x, slot.y))?;
        self.paint(ColorTag::Heading)?;
        write!(self.out, "{}{}", text, style::Reset)?;
        Ok(())
    }

    fn clear(&mut self, region: Option<Region>) -> Result<()> {
        let Some(region) = region else {
            write!(self.out, "{}{}", style::Reset, clear::All)?;
            return Ok(());
        };

        let slot = self.layout.slot(region)?;
        match slot.frame {
            Some(frame) => {
                for dy in 0..frame.h {
                    self.blank(frame.x, frame.y + dy, frame.w)?;
                }
            }
            None => self.blank(slot.x, slot.y, slot.width)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        // Raw mode and the alternate screen are undone by their own drops.
        let _ = write!(self.out, "{}{}{}", style::Reset, clear::All, Show);
        let _ = self.out.flush();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    /// Decode and send back one key.
    Key,
    /// Forget bytes read past the last key.
    Discard,
}

/// Terminal key reader shared by every surface of the process.
///
/// A single thread reads the tty without buffering, and only after a key has
/// been requested. Bytes a session read but never used are discarded when its
/// input goes away, so the menu and the next session start clean.
pub struct KeyReader {
    requests: Sender<Request>,
    keys: Receiver<io::Result<TermKey>>,
}

impl KeyReader {
    pub fn spawn() -> Result<Self> {
        let tty = termion::get_tty()
            .map_err(|e| GaraponError::surface(format!("cannot open the terminal: {}", e)))?;
        let (request_tx, request_rx) = mpsc::channel();
        let (key_tx, key_rx) = mpsc::channel();

        thread::Builder::new()
            .name("garapon-keys".into())
            .spawn(move || pump(tty, request_rx, key_tx))?;

        Ok(Self {
            requests: request_tx,
            keys: key_rx,
        })
    }

    /// A game surface: a fresh screen plus input fed by this reader.
    pub fn open(&self, game: Game) -> Result<(TerminalDisplay, TerminalInput<'_>)> {
        Ok((TerminalDisplay::open(game)?, TerminalInput::new(self)))
    }
}

fn pump<R: Read>(mut source: R, requests: Receiver<Request>, keys: Sender<io::Result<TermKey>>) {
    let mut unread = VecDeque::new();
    while let Ok(request) = requests.recv() {
        match request {
            Request::Discard => unread.clear(),
            Request::Key => {
                let key = next_key(&mut source, &mut unread);
                let failed = key.is_err();
                if keys.send(key).is_err() || failed {
                    break;
                }
            }
        }
    }
}

fn next_key<R: Read>(source: &mut R, unread: &mut VecDeque<u8>) -> io::Result<TermKey> {
    loop {
        if unread.is_empty() {
            let mut buf = [0u8; 16];
            let n = source.read(&mut buf)?;
            if n == 0 {
                return Err(io::ErrorKind::UnexpectedEof.into());
            }
            unread.extend(&buf[..n]);
        }

        // Escape alone in its read is the Esc key, not the start of a sequence.
        if unread.len() == 1 && unread[0] == 0x1b {
            unread.clear();
            return Ok(TermKey::Esc);
        }

        let Some(first) = unread.pop_front() else { continue };
        let mut rest = std::iter::from_fn(|| unread.pop_front().map(Ok));
        // Mouse events and truncated sequences are dropped.
        if let Ok(Event::Key(key)) = parse_event(first, &mut rest) {
            return Ok(key);
        }
    }
}

pub struct TerminalInput<'a> {
    reader: &'a KeyReader,
    pending: bool,
}

impl<'a> TerminalInput<'a> {
    fn new(reader: &'a KeyReader) -> Self {
        Self {
            reader,
            pending: false,
        }
    }

    fn send(&self, request: Request) -> Result<()> {
        self.reader
            .requests
            .send(request)
            .map_err(|_| GaraponError::surface("key reader stopped"))
    }

    fn request(&mut self) -> Result<()> {
        if !self.pending {
            self.send(Request::Key)?;
            self.pending = true;
        }
        Ok(())
    }

    fn received(&mut self, key: io::Result<TermKey>) -> Result<Option<Key>> {
        self.pending = false;
        Ok(Some(map_key(key?)))
    }
}

impl Input for TerminalInput<'_> {
    fn poll_key(&mut self, wait: Wait) -> Result<Option<Key>> {
        self.request()?;
        match wait {
            Wait::Frame(frame) => {
                thread::sleep(frame);
                match self.reader.keys.try_recv() {
                    Ok(key) => self.received(key),
                    Err(TryRecvError::Empty) => Ok(None),
                    Err(TryRecvError::Disconnected) => Err(GaraponError::surface("key reader stopped")),
                }
            }
            Wait::Block => match self.reader.keys.recv() {
                Ok(key) => self.received(key),
                Err(_) => Err(GaraponError::surface("key reader stopped")),
            },
        }
    }
}

impl Drop for TerminalInput<'_> {
    fn drop(&mut self) {
        let _ = self.send(Request::Discard);
    }
}

fn map_key(key: TermKey) -> Key {
    match key {
        TermKey::Char('\n') | TermKey::Char('\r') => Key::Enter,
        TermKey::Char('q') | TermKey::Esc | TermKey::Ctrl('c') => Key::Quit,
        TermKey::Char('r') => Key::Retry,
        TermKey::Up | TermKey::Char('k') => Key::Up,
        TermKey::Down | TermKey::Char('j') => Key::Down,
        _ => Key::Other,
    }
}

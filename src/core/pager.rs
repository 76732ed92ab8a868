//! A small `less`-style pager using the catalog listing key bindings.
//!
//! [`Pager`] holds no terminal state so it can be driven from tests;
//! [`run_interactive`] wires it to crossterm.

const HELP: &str = "\
Key bindings

  q, Esc            quit
  j, Down, Enter    one line down
  k, Up             one line up
  Space, f, PgDn    one page down
  b, PgUp           one page up
  g, Home           first line
  G, End            last line
  /pattern          search down
  ?pattern          search up
  n                 repeat search
  N                 repeat search in the opposite direction
  h                 toggle this help";

const HINTS: &str = "q-quit j-down k-up /-search down ?-search up h-help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerKey {
    Char(char),
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Esc,
    Backspace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerAction {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Normal,
    Search { forward: bool, query: String },
    Help,
}

#[derive(Debug, Clone)]
pub struct Pager {
    lines: Vec<String>,
    help: Vec<String>,
    height: usize,
    offset: usize,
    cursor: usize,
    mode: Mode,
    last_search: Option<(String, bool)>,
    status: Option<String>,
}

impl Pager {
    pub fn new(text: &str, height: usize) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            help: HELP.lines().map(str::to_string).collect(),
            height: height.max(1),
            offset: 0,
            cursor: 0,
            mode: Mode::Normal,
            last_search: None,
            status: None,
        }
    }

    pub fn resize(&mut self, height: usize) {
        self.height = height.max(1);
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn fits(&self) -> bool {
        self.lines.len() <= self.height
    }

    pub fn visible_lines(&self) -> &[String] {
        if self.mode == Mode::Help {
            let end = self.help.len().min(self.height);
            return &self.help[..end];
        }
        let end = (self.offset + self.height).min(self.lines.len());
        &self.lines[self.offset..end]
    }

    pub fn status_line(&self) -> String {
        match &self.mode {
            Mode::Search { forward, query } => {
                format!("{}{}", if *forward { '/' } else { '?' }, query)
            }
            Mode::Help => "HELP -- press q or h to return".to_string(),
            Mode::Normal => {
                if let Some(status) = &self.status {
                    return status.clone();
                }
                let total = self.lines.len();
                if total == 0 {
                    return format!("(empty)  {}", HINTS);
                }
                let last = (self.offset + self.height).min(total);
                format!(
                    "lines {}-{} of {} ({}%)  {}",
                    self.offset + 1,
                    last,
                    total,
                    last * 100 / total,
                    HINTS
                )
            }
        }
    }

    pub fn handle_key(&mut self, key: PagerKey) -> PagerAction {
        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => self.handle_normal(key),
            Mode::Help => {
                if !matches!(key, PagerKey::Char('q') | PagerKey::Char('h') | PagerKey::Esc) {
                    self.mode = Mode::Help;
                }
                PagerAction::Continue
            }
            Mode::Search { forward, mut query } => {
                match key {
                    PagerKey::Enter => {
                        if query.is_empty() {
                            // An empty pattern reuses the last one in the direction just typed.
                            match self.last_search.take() {
                                Some((last, _)) => query = last,
                                None => {
                                    self.status = Some("No previous search pattern".to_string());
                                    return PagerAction::Continue;
                                }
                            }
                        }
                        self.search(&query, forward);
                        self.last_search = Some((query, forward));
                    }
                    PagerKey::Esc => {}
                    PagerKey::Backspace => {
                        if query.pop().is_some() {
                            self.mode = Mode::Search { forward, query };
                        }
                    }
                    PagerKey::Char(c) => {
                        query.push(c);
                        self.mode = Mode::Search { forward, query };
                    }
                    _ => self.mode = Mode::Search { forward, query },
                }
                PagerAction::Continue
            }
        }
    }

    fn handle_normal(&mut self, key: PagerKey) -> PagerAction {
        self.status = None;
        match key {
            PagerKey::Char('q') | PagerKey::Esc => return PagerAction::Quit,
            PagerKey::Char('j') | PagerKey::Down | PagerKey::Enter => self.scroll_to(self.offset + 1),
            PagerKey::Char('k') | PagerKey::Up => self.scroll_to(self.offset.saturating_sub(1)),
            PagerKey::Char(' ') | PagerKey::Char('f') | PagerKey::PageDown => {
                self.scroll_to(self.offset + self.height)
            }
            PagerKey::Char('b') | PagerKey::PageUp => {
                self.scroll_to(self.offset.saturating_sub(self.height))
            }
            PagerKey::Char('g') | PagerKey::Home => self.scroll_to(0),
            PagerKey::Char('G') | PagerKey::End => self.scroll_to(self.max_offset()),
            PagerKey::Char('/') => {
                self.mode = Mode::Search {
                    forward: true,
                    query: String::new(),
                }
            }
            PagerKey::Char('?') => {
                self.mode = Mode::Search {
                    forward: false,
                    query: String::new(),
                }
            }
            PagerKey::Char('n') => self.repeat_search(false),
            PagerKey::Char('N') => self.repeat_search(true),
            PagerKey::Char('h') => self.mode = Mode::Help,
            _ => {}
        }
        PagerAction::Continue
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height)
    }

    fn scroll_to(&mut self, offset: usize) {
        self.offset = offset.min(self.max_offset());
        self.cursor = self.offset;
    }

    fn repeat_search(&mut self, reversed: bool) {
        match self.last_search.clone() {
            Some((query, forward)) => self.search(&query, forward != reversed),
            None => self.status = Some("No previous search pattern".to_string()),
        }
    }

    fn search(&mut self, query: &str, forward: bool) {
        let needle = query.to_lowercase();
        let total = self.lines.len();
        if total == 0 {
            self.status = Some("Pattern not found".to_string());
            return;
        }

        let found = (1..=total)
            .map(|step| {
                if forward {
                    (self.cursor + step) % total
                } else {
                    (self.cursor + total - step % total) % total
                }
            })
            .find(|&index| self.lines[index].to_lowercase().contains(&needle));

        match found {
            Some(index) => {
                self.cursor = index;
                self.offset = index.min(self.max_offset());
            }
            None => self.status = Some("Pattern not found".to_string()),
        }
    }
}

#[cfg(feature = "cli")]
pub use terminal::{page_or_print, run_interactive};

#[cfg(feature = "cli")]
mod terminal {
    use super::{Pager, PagerAction, PagerKey};
    use crate::utils::error::Result;
    use crossterm::{
        cursor::{Hide, MoveTo, Show},
        event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
        execute, queue,
        style::{Attribute, Print, SetAttribute},
        terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use std::io::{self, IsTerminal, Write};

    /// Pages `text` when stdout is a terminal and the text does not fit,
    /// otherwise prints it as is.
    pub fn page_or_print(text: &str, use_pager: bool) -> Result<()> {
        let stdout = io::stdout();
        if use_pager && stdout.is_terminal() {
            let (_, rows) = terminal::size()?;
            let pager = Pager::new(text, usize::from(rows.saturating_sub(1)));
            if !pager.fits() {
                return run_interactive(pager);
            }
        }

        let mut out = stdout.lock();
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    pub fn run_interactive(mut pager: Pager) -> Result<()> {
        tracing::debug!("Opening pager for {} lines", pager.line_count());
        let screen = Screen::enter()?;
        let result = event_loop(&mut pager);
        screen.leave()?;
        result
    }

    /// Raw mode plus the alternate screen, restored on drop if `leave` is
    /// never reached.
    struct Screen {
        active: bool,
    }

    impl Screen {
        fn enter() -> Result<Self> {
            terminal::enable_raw_mode()?;
            let screen = Screen { active: true };
            execute!(io::stdout(), EnterAlternateScreen, Hide)?;
            Ok(screen)
        }

        fn leave(mut self) -> Result<()> {
            self.active = false;
            execute!(io::stdout(), Show, LeaveAlternateScreen)?;
            terminal::disable_raw_mode()?;
            Ok(())
        }
    }

    impl Drop for Screen {
        fn drop(&mut self) {
            if self.active {
                let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
                let _ = terminal::disable_raw_mode();
            }
        }
    }

    fn event_loop(pager: &mut Pager) -> Result<()> {
        loop {
            draw(pager)?;
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    let Some(key) = map_key(key) else {
                        continue;
                    };
                    if pager.handle_key(key) == PagerAction::Quit {
                        return Ok(());
                    }
                }
                Event::Resize(_, rows) => pager.resize(usize::from(rows.saturating_sub(1))),
                _ => {}
            }
        }
    }

    fn map_key(key: KeyEvent) -> Option<PagerKey> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(PagerKey::Char('q'));
        }
        Some(match key.code {
            KeyCode::Char(c) => PagerKey::Char(c),
            KeyCode::Up => PagerKey::Up,
            KeyCode::Down => PagerKey::Down,
            KeyCode::PageUp => PagerKey::PageUp,
            KeyCode::PageDown => PagerKey::PageDown,
            KeyCode::Home => PagerKey::Home,
            KeyCode::End => PagerKey::End,
            KeyCode::Enter => PagerKey::Enter,
            KeyCode::Esc => PagerKey::Esc,
            KeyCode::Backspace => PagerKey::Backspace,
            _ => return None,
        })
    }

    fn draw(pager: &Pager) -> Result<()> {
        let (cols, rows) = terminal::size()?;
        let cols = usize::from(cols);
        let mut out = io::stdout();

        queue!(out, Clear(ClearType::All))?;
        for (row, line) in pager.visible_lines().iter().enumerate() {
            let shown: String = line.chars().take(cols).collect();
            queue!(out, MoveTo(0, row as u16), Print(shown))?;
        }

        let status: String = pager.status_line().chars().take(cols).collect();
        queue!(
            out,
            MoveTo(0, rows.saturating_sub(1)),
            SetAttribute(Attribute::Reverse),
            Print(status),
            SetAttribute(Attribute::Reset)
        )?;
        out.flush()?;
        Ok(())
    }
}

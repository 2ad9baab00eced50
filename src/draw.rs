use std::io::{self, Write, stdout};

use crossterm::{
    ExecutableCommand, QueueableCommand,
    cursor::{Hide, MoveTo, Show},
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll, read},
    execute, queue,
    style::{Color, Print, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, EndSynchronizedUpdate, EnterAlternateScreen,
        LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    },
};

use crate::form::CommandForm;
use crate::protocol::TurnRequest;
use crate::state::{Phase, State};

const OUTPUT_ROW: u16 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InputMode {
    Select,
    Typing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    Start,
    Submit(TurnRequest),
    CommandSelected(String),
}

/// Keyboard handling for both screens, kept apart from the terminal so it can
/// run without one.
pub struct Controls {
    mode: InputMode,
    form: CommandForm,
    typed: String,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

impl Controls {
    pub fn new() -> Self {
        Self {
            mode: InputMode::Select,
            form: CommandForm::new(),
            typed: String::new(),
        }
    }

    pub fn form(&self) -> &CommandForm {
        &self.form
    }

    pub fn is_typing(&self) -> bool {
        self.mode == InputMode::Typing
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn handle_key(&mut self, key: KeyEvent, s: &State) -> Vec<InputEvent> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![InputEvent::Quit];
        }

        match s.phase {
            Phase::NotStarted => match key.code {
                KeyCode::Enter | KeyCode::Char('s') if s.in_flight => vec![],
                KeyCode::Enter | KeyCode::Char('s') => vec![InputEvent::Start],
                KeyCode::Esc | KeyCode::Char('q') => vec![InputEvent::Quit],
                _ => vec![],
            },
            Phase::Finished => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => vec![InputEvent::Quit],
                _ => vec![],
            },
            Phase::Playing => match self.mode {
                InputMode::Typing => self.handle_typing(key),
                InputMode::Select => self.handle_select(key, s),
            },
        }
    }

    fn handle_typing(&mut self, key: KeyEvent) -> Vec<InputEvent> {
        match key.code {
            KeyCode::Backspace => {
                self.typed.pop();
                vec![]
            }
            KeyCode::Esc => {
                self.typed.clear();
                self.mode = InputMode::Select;
                vec![]
            }
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.typed);
                self.mode = InputMode::Select;
                TurnRequest::parse(&line)
                    .map(InputEvent::Submit)
                    .into_iter()
                    .collect()
            }
            code => {
                if let Some(c) = code.as_char() {
                    self.typed.push(c);
                }
                vec![]
            }
        }
    }

    fn handle_select(&mut self, key: KeyEvent, s: &State) -> Vec<InputEvent> {
        let catalog = &s.catalog;
        match key.code {
            KeyCode::Esc => vec![InputEvent::Quit],
            KeyCode::Enter => vec![InputEvent::Submit(self.form.to_request(catalog))],
            KeyCode::Char(':') => {
                self.typed.clear();
                self.mode = InputMode::Typing;
                vec![]
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.form.prev_command(catalog);
                vec![InputEvent::CommandSelected(self.form.command(catalog).to_owned())]
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.form.next_command(catalog);
                vec![InputEvent::CommandSelected(self.form.command(catalog).to_owned())]
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.form.prev_argument(catalog);
                vec![]
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.form.next_argument(catalog);
                vec![]
            }
            _ => vec![],
        }
    }
}

/// Greedy word wrap. Blank lines in `text` are kept.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = vec![];
    for raw in text.lines() {
        let mut current = String::new();
        for word in raw.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}

pub struct Drawer {
    controls: Controls,
}

impl Drawer {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        // Built before touching the screen so Drop restores raw mode if this fails.
        let drawer = Self {
            controls: Controls::new(),
        };
        execute!(stdout(), EnterAlternateScreen, SetForegroundColor(Color::White), Hide)?;
        Ok(drawer)
    }

    pub fn fetch_events(&mut self, s: &State) -> io::Result<Vec<InputEvent>> {
        if !poll(std::time::Duration::from_secs(0))? {
            return Ok(vec![]);
        }
        match read()? {
            Event::Key(key) => Ok(self.controls.handle_key(key, s)),
            _ => Ok(vec![]),
        }
    }

    pub fn draw(&mut self, s: &State) -> io::Result<()> {
        let mut stdout = io::stdout();
        let (cols, rows) = terminal::size()?;
        execute!(stdout, BeginSynchronizedUpdate)?;
        stdout.queue(terminal::Clear(terminal::ClearType::All))?;

        queue!(
            stdout,
            MoveTo(0, 0),
            SetForegroundColor(Color::Cyan),
            Print(s.title.as_deref().unwrap_or(""))
        )?;

        match s.phase {
            Phase::NotStarted => {
                queue!(
                    stdout,
                    MoveTo(0, 2),
                    SetForegroundColor(Color::Yellow),
                    Print("[ Start Game ]"),
                    MoveTo(0, 4),
                    SetForegroundColor(Color::DarkGrey),
                    Print("Enter: start   Esc: quit")
                )?;
            }
            Phase::Playing => self.queue_form(&mut stdout, s)?,
            Phase::Finished => {
                queue!(
                    stdout,
                    MoveTo(0, 2),
                    SetForegroundColor(Color::Yellow),
                    Print("Game over."),
                    MoveTo(0, 4),
                    SetForegroundColor(Color::DarkGrey),
                    Print("q: quit")
                )?;
            }
        }

        if let Some(error) = s.error {
            queue!(
                stdout,
                MoveTo(0, 5),
                SetForegroundColor(Color::Red),
                Print(error)
            )?;
        } else if s.in_flight {
            queue!(
                stdout,
                MoveTo(0, 5),
                SetForegroundColor(Color::DarkGrey),
                Print("waiting for the server...")
            )?;
        }

        let visible = rows.saturating_sub(OUTPUT_ROW) as usize;
        for (i, line) in wrap(&s.output, cols as usize).iter().take(visible).enumerate() {
            queue!(
                stdout,
                MoveTo(0, OUTPUT_ROW + i as u16),
                SetForegroundColor(Color::White),
                Print(line)
            )?;
        }

        stdout.flush()?;
        stdout.execute(EndSynchronizedUpdate)?;
        Ok(())
    }

    fn queue_form(&self, stdout: &mut io::Stdout, s: &State) -> io::Result<()> {
        let form = self.controls.form();
        queue!(
            stdout,
            MoveTo(0, 2),
            SetForegroundColor(Color::White),
            Print("Command:  "),
            SetForegroundColor(Color::Yellow),
            Print(format!("< {} >", form.command(&s.catalog)))
        )?;
        if form.shows_argument_selector(&s.catalog) {
            queue!(
                stdout,
                MoveTo(0, 3),
                SetForegroundColor(Color::White),
                Print("Argument: "),
                SetForegroundColor(Color::Yellow),
                Print(format!("< {} >", form.argument(&s.catalog).unwrap_or("(none)")))
            )?;
        }
        if self.controls.is_typing() {
            queue!(
                stdout,
                MoveTo(0, 4),
                SetForegroundColor(Color::White),
                Print(format!("> {}", self.controls.typed()))
            )?;
        } else {
            queue!(
                stdout,
                MoveTo(0, 4),
                SetForegroundColor(Color::DarkGrey),
                Print("Enter: submit   Up/Down: command   Left/Right: argument   ':' type   Esc: quit")
            )?;
        }
        Ok(())
    }
}

impl Drop for Drawer {
    fn drop(&mut self) {
        // Nothing useful to do if restoring the terminal fails on the way out.
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, Show);
    }
}

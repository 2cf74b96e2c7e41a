//! App — the interactive terminal host.
//!
//! Owns the catalog, one `Visualizer` drawing into a `TerminalSurface`, and
//! the explanation service. Lesson selection goes through the catalog; the
//! visualizer hears about it through its subscription, drained once per frame.

pub mod menubar;
pub mod terminal;

use std::io::{self, Write};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::{cursor, execute, queue, style};

use log::{info, warn};

use crate::catalog::{Catalog, Lesson, LessonKind};
use crate::config::{AppConfig, KeyBindings, matches_binding};
use crate::explain::{ExplainService, ExplainState};
use crate::params::{Snapshot, format_count};
use crate::visualizer::Visualizer;

use menubar::{menu_items, print_menu_item};
use terminal::{CANVAS_OFFSET, TerminalSurface};

/// Run the app on the current terminal until the user quits.
///
/// Sets up the terminal, enters the event loop, and restores the terminal
/// on exit (even on error).
pub fn run(config: &AppConfig, catalog: Catalog, explain: ExplainService) -> Result<()> {
    let mut stdout = io::stdout();
    crossterm::terminal::enable_raw_mode()?;
    execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        cursor::Hide,
        crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
    )?;

    let result = crossterm::terminal::size()
        .context("Failed to read terminal size")
        .and_then(|(cols, rows)| {
            let mut app = App::new(config, catalog, explain, io::stdout(), cols, rows)?;
            app.run_loop()
        });

    // Always restore terminal state.
    let _ = execute!(stdout, cursor::Show, crossterm::terminal::LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();

    result
}

pub struct App<W: Write> {
    catalog: Catalog,
    lessons: Receiver<Lesson>,
    visualizer: Visualizer<TerminalSurface<W>>,
    explain: ExplainService,
    keys: KeyBindings,
    frame: Duration,
    cols: u16,
    status: String,
}

impl<W: Write> App<W> {
    pub fn new(
        config: &AppConfig,
        mut catalog: Catalog,
        explain: ExplainService,
        out: W,
        cols: u16,
        rows: u16,
    ) -> Result<Self> {
        let lesson = catalog.selected().cloned().context("Curriculum has no lessons")?;
        let lessons = catalog.subscribe();

        let mut surface = TerminalSurface::new(out);
        surface.resize(cols, rows);
        let visualizer = Visualizer::new(lesson, surface, config.timing, config.seed);

        let mut app = App {
            catalog,
            lessons,
            visualizer,
            explain,
            keys: config.key_bindings.clone(),
            frame: Duration::from_millis(config.timing.frame_ms.max(1)),
            cols,
            status: String::new(),
        };
        app.draw_menubar()?;
        Ok(app)
    }

    pub fn visualizer(&self) -> &Visualizer<TerminalSurface<W>> {
        &self.visualizer
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self) -> Result<()> {
        let started = Instant::now();
        let mut ticked = 0u64;

        loop {
            if event::poll(self.frame)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if !self.handle_key(key) {
                            break;
                        }
                    }
                    Event::Resize(cols, rows) => self.resize(cols, rows)?,
                    _ => {}
                }
            }

            let elapsed = started.elapsed().as_millis() as u64;
            self.frame_tick(elapsed.saturating_sub(ticked))?;
            ticked = elapsed;
        }

        self.visualizer.teardown();
        Ok(())
    }

    /// One host frame: forward lesson changes, advance the clock, refresh
    /// the status line.
    pub fn frame_tick(&mut self, dt_ms: u64) -> Result<()> {
        while let Ok(lesson) = self.lessons.try_recv() {
            self.visualizer.on_lesson_changed(lesson);
        }
        self.visualizer.tick(dt_ms);
        self.explain.poll();
        self.draw_status()
    }

    /// Apply one key press. Returns `false` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let keys = &self.keys;
        if key.code == KeyCode::Esc || matches_binding(&keys.quit, &key) {
            return false;
        }

        if matches_binding(&keys.play, &key) {
            self.visualizer.play();
        } else if matches_binding(&keys.reset, &key) {
            self.visualizer.reset();
        } else if matches_binding(&keys.next_lesson, &key) {
            self.step_lesson(1);
        } else if matches_binding(&keys.prev_lesson, &key) {
            self.step_lesson(-1);
        } else if matches_binding(&keys.input_up, &key) {
            let value = self.visualizer.snapshot().input_value as i32;
            self.visualizer.set_input_value(value + 1);
        } else if matches_binding(&keys.input_down, &key) {
            let value = self.visualizer.snapshot().input_value as i32;
            self.visualizer.set_input_value(value - 1);
        } else if matches_binding(&keys.push, &key) {
            self.visualizer.array_push();
        } else if matches_binding(&keys.pop, &key) {
            self.visualizer.array_pop();
        } else if matches_binding(&keys.explain, &key) {
            let lesson = self.visualizer.lesson();
            let module = self.catalog.module_of(lesson).map_or("", |m| m.title.as_str());
            self.explain.request(&lesson.title, module);
        }
        true
    }

    fn step_lesson(&mut self, delta: isize) {
        let current = self.catalog.selected_id().to_string();
        let Some(next) = self.catalog.neighbor(&current, delta).map(str::to_string) else {
            return;
        };
        if next == current {
            return;
        }
        if let Err(e) = self.catalog.select(&next) {
            warn!("cannot switch lesson: {e}");
            return;
        }
        self.explain.dismiss();
    }

    fn resize(&mut self, cols: u16, rows: u16) -> Result<()> {
        info!("terminal resized to {cols}x{rows}");
        self.cols = cols;
        let surface = self.visualizer.surface_mut();
        surface.resize(cols, rows);
        queue!(
            surface.writer(),
            crossterm::terminal::Clear(crossterm::terminal::ClearType::All)
        )?;
        self.status.clear();
        self.draw_menubar()?;
        // Scripts hold positions laid out for the old size.
        self.visualizer.reset();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Chrome
    // -----------------------------------------------------------------------

    fn draw_menubar(&mut self) -> Result<()> {
        let items = menu_items(&self.keys);
        let out = self.visualizer.surface_mut().writer();
        queue!(
            out,
            cursor::MoveTo(0, 0),
            crossterm::terminal::Clear(crossterm::terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                queue!(out, style::Print("  "))?;
            }
            print_menu_item(out, item)?;
        }
        out.flush()?;
        Ok(())
    }

    fn draw_status(&mut self) -> Result<()> {
        let lesson = self.visualizer.lesson();
        let module = self.catalog.module_of(lesson).map(|m| m.title.as_str());
        let text = status_text(lesson, module, &self.visualizer.snapshot(), self.explain.state());
        let text: String = text.chars().take(self.cols as usize).collect();
        if text == self.status {
            return Ok(());
        }

        let row = CANVAS_OFFSET + self.visualizer.surface().canvas_height();
        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);
        let out = self.visualizer.surface_mut().writer();
        queue!(
            out,
            cursor::MoveTo(0, row),
            crossterm::terminal::Clear(crossterm::terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, &text)),
        )?;
        out.flush()?;
        self.status = text;
        Ok(())
    }
}

/// One-line summary under the canvas: where we are, playback state, the
/// lesson's live parameter, and the explanation (or the description).
pub fn status_text(
    lesson: &Lesson,
    module: Option<&str>,
    snapshot: &Snapshot,
    explain: &ExplainState,
) -> String {
    let mut parts = Vec::new();
    match module {
        Some(module) => parts.push(format!("{module} › {}", lesson.title)),
        None => parts.push(lesson.title.clone()),
    }
    parts.push(if snapshot.is_playing { "Playing" } else { "Idle" }.to_string());
    match lesson.kind {
        LessonKind::Flow => parts.push(format!("age {}", snapshot.input_value)),
        LessonKind::Loop => parts.push(format!("loop {}", format_count(snapshot.loop_count))),
        LessonKind::Array => parts.push(format!("length {}", snapshot.array_data.len())),
        _ => {}
    }
    parts.push(match explain {
        ExplainState::Idle => lesson.description.clone(),
        ExplainState::Loading => "Thinking...".to_string(),
        ExplainState::Ready(text) => text.split_whitespace().collect::<Vec<_>>().join(" "),
    });
    format!(" {} ", parts.join(" | "))
}

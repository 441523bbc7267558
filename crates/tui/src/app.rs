use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ovenpilot_core::{Session, SyncOutcome};
use ovenpilot_protocol::ChartData;
use ratatui::layout::{Position, Rect};

use crate::worker::{Command, Reply};

/// Fixed status poll cadence.
pub const POLL_PERIOD: Duration = Duration::from_secs(2);

/// Which gain field the parameter editor has focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PidField {
    Kp,
    Ki,
    Kd,
}

impl PidField {
    fn next(self) -> Self {
        match self {
            Self::Kp => Self::Ki,
            Self::Ki => Self::Kd,
            Self::Kd => Self::Kp,
        }
    }
}

/// UI-side state: the session plus everything the event loop needs to
/// translate terminal events into session operations.
pub struct App {
    pub session: Session,
    commands: Sender<Command>,
    /// Plot region of the last rendered frame, for mouse mapping.
    pub graph_area: Option<Rect>,
    /// Gain field being edited, if the parameter editor is open.
    pub pid_focus: Option<PidField>,
    /// Transient action feedback (file written, recipe loaded, ...).
    pub note: Option<String>,
    recipe_path: Option<PathBuf>,
    last_poll: Option<Instant>,
    pub should_quit: bool,
}

impl App {
    pub fn new(commands: Sender<Command>, recipe_path: Option<PathBuf>) -> Self {
        Self {
            session: Session::new(),
            commands,
            graph_area: None,
            pid_focus: None,
            note: None,
            recipe_path,
            last_poll: None,
            should_quit: false,
        }
    }

    // --- polling -----------------------------------------------------

    /// The poll timer fires every [`POLL_PERIOD`]; a tick with a poll
    /// still outstanding is dropped by the session's in-flight guard.
    pub fn on_tick(&mut self) {
        let due = self.last_poll.is_none_or(|t| t.elapsed() >= POLL_PERIOD);
        if due {
            self.last_poll = Some(Instant::now());
            self.try_poll();
        }
    }

    fn try_poll(&mut self) {
        if let Some(query) = self.session.next_poll() {
            self.send(Command::Poll(query));
        }
    }

    fn send(&mut self, command: Command) {
        if self.commands.send(command).is_err() {
            self.note = Some("transport worker is gone".into());
        }
    }

    pub fn handle_reply(&mut self, reply: Reply) {
        match reply {
            Reply::Status(Ok(status)) => {
                if self.session.apply_status(&status) == SyncOutcome::ResyncRequired {
                    // reseed immediately instead of waiting out the timer
                    self.try_poll();
                }
            }
            Reply::Status(Err(error)) => self.session.poll_failed(error),
            Reply::Run(Ok(_)) => self.note = Some("process started".into()),
            Reply::Run(Err(error)) => self.session.start_failed(error),
            Reply::Kill(Ok(message)) => self.session.apply_kill(&message),
            Reply::Kill(Err(error)) => self.session.kill_failed(error),
            Reply::Clear(Ok(_)) => {}
            Reply::Clear(Err(error)) => {
                self.note = Some(format!("clear request failed: {error}"));
            }
            Reply::ChartData(Ok(data)) => self.write_chart_data(&data),
            Reply::ChartData(Err(error)) => {
                self.note = Some(format!("chart data request failed: {error}"));
            }
        }
    }

    // --- keyboard ----------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.pid_focus.is_some() {
            self.handle_pid_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('r') => self.start_run(),
            KeyCode::Char('s') => self.stop_run(),
            KeyCode::Char('c') => self.clear_all(),
            KeyCode::Char('o') => self.load_recipe(),
            KeyCode::Char('w') => self.save_recipe(),
            KeyCode::Char('d') => self.send(Command::FetchChartData),
            KeyCode::Char('p') if !self.session.editing_locked() => {
                self.pid_focus = Some(PidField::Kp);
            }
            _ => {}
        }
    }

    fn handle_pid_key(&mut self, key: KeyEvent) {
        let Some(field) = self.pid_focus else {
            return;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.pid_focus = None,
            KeyCode::Tab => self.pid_focus = Some(field.next()),
            KeyCode::Backspace => {
                self.field_mut(field).pop();
            }
            KeyCode::Char(c) if !c.is_control() => self.field_mut(field).push(c),
            _ => {}
        }
    }

    fn field_mut(&mut self, field: PidField) -> &mut String {
        let inputs = self.session.pid_inputs_mut();
        match field {
            PidField::Kp => &mut inputs.kp,
            PidField::Ki => &mut inputs.ki,
            PidField::Kd => &mut inputs.kd,
        }
    }

    // --- mouse curve editing -----------------------------------------

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some((x, y)) = self.data_coords(mouse.column, mouse.row) else {
            // releasing outside the plot still ends a drag session
            if matches!(mouse.kind, MouseEventKind::Up(MouseButton::Left)) {
                self.session.release_drag();
            }
            return;
        };
        let (x_tol, y_tol) = self.hit_tolerance();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // grab a nearby point for dragging, otherwise append
                if self.session.select_point(x, y, x_tol, y_tol).is_none() {
                    self.session.add_point(x, y);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.session.drag_to(x, y);
            }
            MouseEventKind::Up(MouseButton::Left) => self.session.release_drag(),
            MouseEventKind::Down(MouseButton::Right) => {
                self.session.delete_near(x, y, x_tol, y_tol);
            }
            _ => {}
        }
    }

    /// Map a terminal cell inside the plot region to data coordinates.
    fn data_coords(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        let area = self.graph_area?;
        if !area.contains(Position::new(column, row)) {
            return None;
        }
        let bounds = self.session.bounds();
        let width = f64::from(area.width.saturating_sub(1).max(1));
        let height = f64::from(area.height.saturating_sub(1).max(1));
        let fx = f64::from(column - area.x) / width;
        let fy = f64::from(row - area.y) / height;
        Some((fx * bounds.x_max, (1.0 - fy) * bounds.y_max))
    }

    /// Hit radius of roughly two terminal cells, in data units.
    fn hit_tolerance(&self) -> (f64, f64) {
        let bounds = self.session.bounds();
        match self.graph_area {
            Some(area) if area.width > 1 && area.height > 1 => (
                2.0 * bounds.x_max / f64::from(area.width),
                2.0 * bounds.y_max / f64::from(area.height),
            ),
            _ => (bounds.x_max / 50.0, bounds.y_max / 50.0),
        }
    }

    // --- user actions ------------------------------------------------

    fn start_run(&mut self) {
        match self.session.request_start() {
            Some(request) => self.send(Command::Run(request)),
            None => self.note = Some("nothing to run: profile empty or process active".into()),
        }
    }

    fn stop_run(&mut self) {
        if self.session.request_stop() {
            self.send(Command::Kill);
        }
    }

    fn clear_all(&mut self) {
        self.session.clear();
        self.note = None;
        self.send(Command::ClearStatus);
        self.try_poll();
    }

    fn load_recipe(&mut self) {
        let Some(path) = self.recipe_path.clone() else {
            self.note = Some("no recipe file given on the command line".into());
            return;
        };
        match std::fs::read(&path) {
            Ok(data) => match self.session.import_recipe(&data) {
                Ok(()) => self.note = Some(format!("loaded {}", path.display())),
                Err(error) => self.note = Some(format!("recipe import failed: {error}")),
            },
            Err(error) => self.note = Some(format!("cannot read {}: {error}", path.display())),
        }
    }

    fn save_recipe(&mut self) {
        let recipe = self.session.export_recipe();
        self.note = Some(match write_json("recipe.json", &recipe) {
            Ok(()) => "recipe.json written".into(),
            Err(error) => format!("recipe save failed: {error}"),
        });
    }

    fn write_chart_data(&mut self, data: &ChartData) {
        self.note = Some(match write_json("chart_data.json", data) {
            Ok(()) => "chart_data.json written".into(),
            Err(error) => format!("chart data save failed: {error}"),
        });
    }
}

fn write_json<T: serde::Serialize>(path: &str, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

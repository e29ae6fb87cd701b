use std::{
    io::{self, Stdout},
    time::Duration,
};

use crossterm::{
    event::{self, Event as CrosstermEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Terminal,
};

use crate::{
    config::{self, SimConfig},
    controls::ControlState,
    error::SimError,
    render::{self, Camera, FrameBuffer, SpeedPalette, Viewport},
    sim::{self, Frontend, RenderView, RunSummary, Simulation},
    types::Rgb,
};

const ZOOM_STEP: f64 = 1.25;

/// Display flags by key, addressed by name like the `--flag` option.
const FLAG_KEYS: [(char, &str); 2] = [('c', "color-by-velocity"), ('a', "show-axes")];

fn flag_for_key(key: char) -> Option<&'static str> {
    FLAG_KEYS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, name)| *name)
}

pub fn run(config: SimConfig) -> Result<RunSummary, SimError> {
    let frame_rate_cap = config.frame_rate_cap;
    let palette = SpeedPalette::from_config(&config);
    let mut sim = Simulation::from_config(config)?;

    let mut frontend = TerminalFrontend::start(palette)?;
    let result = sim::run(&mut sim, &mut frontend, frame_rate_cap);
    let restored = frontend.shutdown();
    prefer_run_error(result, restored)
}

/// A failed loop is reported over a failed terminal restore.
fn prefer_run_error<T>(
    run: Result<T, SimError>,
    restore: Result<(), SimError>,
) -> Result<T, SimError> {
    let value = run?;
    restore?;
    Ok(value)
}

/// Runs `restore` before handing back an error, so a half-entered terminal is left usable.
fn restore_on_err<T>(result: Result<T, SimError>, restore: impl FnOnce()) -> Result<T, SimError> {
    if result.is_err() {
        restore();
    }
    result
}

struct TerminalFrontend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    camera: Option<Camera>,
    framebuf: FrameBuffer,
    palette: SpeedPalette,
    pending: Vec<KeyCode>,
}

impl TerminalFrontend {
    fn start(palette: SpeedPalette) -> Result<Self, SimError> {
        enable_raw_mode()?;
        let terminal = restore_on_err(Self::enter_screen(), || {
            // best effort; the original error is the one worth reporting
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        })?;
        Ok(Self {
            terminal,
            camera: None,
            framebuf: FrameBuffer::new(0, 0),
            palette,
            pending: Vec::new(),
        })
    }

    fn enter_screen() -> Result<Terminal<CrosstermBackend<Stdout>>, SimError> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        Ok(Terminal::new(CrosstermBackend::new(stdout))?)
    }

    fn shutdown(mut self) -> Result<(), SimError> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Frontend for TerminalFrontend {
    fn poll_stop(&mut self) -> Result<bool, SimError> {
        while event::poll(Duration::from_millis(0))? {
            if let CrosstermEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        info!("quit requested");
                        return Ok(true);
                    }
                    code => self.pending.push(code),
                }
            }
        }
        Ok(false)
    }

    fn render(&mut self, view: &RenderView<'_>) -> Result<(), SimError> {
        let Self {
            terminal,
            camera,
            framebuf,
            palette,
            ..
        } = self;

        terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(3),
                    Constraint::Length(3),
                    Constraint::Length(3),
                ])
                .split(frame.size());

            let header = Paragraph::new(format!(
                "particles: {} | culled: {} | mean v: {:.1} | max v: {:.1} | E: {:.3e} | t: {:.2} | fps: {:.1}",
                view.stats.count,
                view.culled_total,
                view.stats.mean_speed,
                view.stats.max_speed,
                view.stats.total_energy,
                view.sim_time,
                view.fps
            ))
            .block(Block::default().borders(Borders::ALL).title("gravitoy"));
            frame.render_widget(header, chunks[0]);

            let inner = Block::default().borders(Borders::ALL).inner(chunks[1]);
            let viewport = Viewport {
                width: inner.width,
                height: inner.height,
            };
            let camera =
                *camera.get_or_insert_with(|| Camera::fit(view.center, config::FRAME_WIDTH, viewport));
            render::draw(
                view.particles,
                view.center,
                view.flags,
                *palette,
                &camera,
                viewport,
                framebuf,
            );
            let lines: Vec<Line> = (0..framebuf.height())
                .map(|y| {
                    let spans: Vec<Span> = (0..framebuf.width())
                        .map(|x| {
                            let cell = framebuf.get(x, y);
                            Span::styled(cell.ch.to_string(), Style::default().fg(color_for(cell.color)))
                        })
                        .collect();
                    Line::from(spans)
                })
                .collect();
            let viewport_widget = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Field"));
            frame.render_widget(viewport_widget, chunks[1]);

            let slider = Gauge::default()
                .block(Block::default().borders(Borders::ALL).title("Attractor mass"))
                .gauge_style(Style::default().fg(Color::Gray))
                .ratio(view.mass_fraction.clamp(0.0, 1.0))
                .label(format!("{:.3e}", view.attractor_mass));
            frame.render_widget(slider, chunks[2]);

            let footer = Paragraph::new(format!(
                "color by velocity [c]: {} | axes [a]: {} | ↑↓ mass | PgUp/PgDn coarse | +/- zoom | q: quit",
                on_off(view.flags.color_by_velocity),
                on_off(view.flags.show_axes)
            ))
            .block(Block::default().borders(Borders::ALL).title("Controls"));
            frame.render_widget(footer, chunks[3]);
        })?;
        Ok(())
    }

    fn apply_input(&mut self, controls: &ControlState) -> Result<(), SimError> {
        for code in self.pending.drain(..) {
            match code {
                KeyCode::Up => controls.nudge_attractor_mass(1),
                KeyCode::Down => controls.nudge_attractor_mass(-1),
                KeyCode::PageUp => controls.nudge_attractor_mass(10),
                KeyCode::PageDown => controls.nudge_attractor_mass(-10),
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    if let Some(camera) = self.camera.as_mut() {
                        camera.zoom_by(ZOOM_STEP);
                    }
                }
                KeyCode::Char('-') => {
                    if let Some(camera) = self.camera.as_mut() {
                        camera.zoom_by(1.0 / ZOOM_STEP);
                    }
                }
                KeyCode::Char(key) => {
                    if let Some(name) = flag_for_key(key) {
                        controls.toggle_named(name);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn color_for(color: Rgb) -> Color {
    match color {
        Rgb::WHITE => Color::White,
        Rgb(r, g, b) => Color::Rgb(r, g, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_maps_to_terminal_white() {
        assert_eq!(color_for(Rgb::WHITE), Color::White);
    }

    #[test]
    fn other_colors_are_true_color() {
        assert_eq!(color_for(Rgb::TANGELO), Color::Rgb(249, 110, 21));
        assert_eq!(color_for(Rgb::BLUE), Color::Rgb(0, 0, 255));
    }

    #[test]
    fn flag_keys_name_real_flags() {
        use crate::controls::Flag;

        assert_eq!(flag_for_key('c'), Some("color-by-velocity"));
        assert_eq!(flag_for_key('a'), Some("show-axes"));
        assert_eq!(flag_for_key('x'), None);
        for (_, name) in FLAG_KEYS {
            assert!(name.parse::<Flag>().is_ok(), "{name}");
        }
    }

    #[test]
    fn flag_key_toggles_through_controls() {
        let controls = ControlState::default();
        for key in ['a', 'c', 'a'] {
            if let Some(name) = flag_for_key(key) {
                controls.toggle_named(name);
            }
        }
        let flags = controls.display_flags();
        assert!(flags.color_by_velocity);
        assert!(!flags.show_axes);
    }

    fn io_error(msg: &str) -> SimError {
        io::Error::other(msg.to_string()).into()
    }

    #[test]
    fn run_error_wins_over_restore_error() {
        let out: Result<(), SimError> =
            prefer_run_error(Err(io_error("loop")), Err(io_error("restore")));
        assert!(out.unwrap_err().to_string().contains("loop"));
    }

    #[test]
    fn restore_error_surfaces_after_a_clean_run() {
        let out = prefer_run_error(Ok(7), Err(io_error("restore")));
        assert!(out.unwrap_err().to_string().contains("restore"));
        assert_eq!(prefer_run_error(Ok(7), Ok(())).unwrap(), 7);
    }

    #[test]
    fn restore_runs_only_on_error() {
        let mut restored = false;
        let ok: Result<u8, SimError> = restore_on_err(Ok(1), || restored = true);
        assert_eq!(ok.unwrap(), 1);
        assert!(!restored);

        let err: Result<u8, SimError> = restore_on_err(Err(io_error("screen")), || restored = true);
        assert!(err.is_err());
        assert!(restored);
    }

    #[test]
    fn on_off_labels() {
        assert_eq!(on_off(true), "on");
        assert_eq!(on_off(false), "off");
    }
}

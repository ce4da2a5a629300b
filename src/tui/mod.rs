//! Ratatui-based terminal UI.
//!
//! The TUI shows the entity list on the left (the selection surface) and the
//! sampled daily case chart for the highlighted entity on the right. Every
//! selection change reruns the shared pipeline on the already-loaded table.

use std::io;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::RngCore;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::pipeline::run_selection;
use crate::app::sampler_rng;
use crate::domain::{CaseTable, DailySeriesPoint, SelectionOutput, SeriesConfig};
use crate::error::{AppError, EXIT_RUNTIME};
use crate::report::{fmt_compact, fmt_month};

mod plotters_chart;

use plotters_chart::CaseChart;

/// Rows moved by PageUp/PageDown.
const PAGE_STEP: usize = 10;
/// Sample size change per `+`/`-` press.
const SAMPLE_STEP: usize = 10;

/// Start the TUI over an already-loaded table.
pub fn run(table: CaseTable, config: SeriesConfig) -> Result<(), AppError> {
    let mut app = App::new(table, config);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_RUNTIME, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    table: CaseTable,
    entities: Vec<String>,
    selected: usize,
    sample_size: usize,
    seed: u64,
    status: String,
    output: Option<SelectionOutput>,
}

impl App {
    fn new(table: CaseTable, config: SeriesConfig) -> Self {
        let entities = crate::series::list_entities(&table);
        let selected = config
            .entity
            .as_deref()
            .and_then(|wanted| entities.iter().position(|e| e == wanted))
            .unwrap_or(0);
        // Resampling bumps the seed, so an unseeded session still needs a base.
        let seed = config.seed.unwrap_or_else(|| sampler_rng(None).next_u64());

        let mut app = Self {
            table,
            entities,
            selected,
            sample_size: config.sample_size.max(1),
            seed,
            status: String::new(),
            output: None,
        };
        app.refresh();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply a key press; returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let len = self.entities.len();
        let before = self.selected;

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected = move_selection(self.selected, -1, len),
            KeyCode::Down => self.selected = move_selection(self.selected, 1, len),
            KeyCode::PageUp => self.selected = move_selection(self.selected, -(PAGE_STEP as isize), len),
            KeyCode::PageDown => self.selected = move_selection(self.selected, PAGE_STEP as isize, len),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = len.saturating_sub(1),
            KeyCode::Char('r') => {
                self.seed = self.seed.wrapping_add(1);
                self.refresh();
                return false;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.sample_size = self.sample_size.saturating_add(SAMPLE_STEP);
                self.refresh();
                return false;
            }
            KeyCode::Char('-') => {
                self.sample_size = self.sample_size.saturating_sub(SAMPLE_STEP).max(1);
                self.refresh();
                return false;
            }
            _ => {}
        }

        if self.selected != before {
            self.refresh();
        }
        false
    }

    fn refresh(&mut self) {
        let Some(entity) = self.entities.get(self.selected) else {
            self.output = None;
            self.status = "The table has no entities.".to_string();
            return;
        };

        let mut rng = sampler_rng(Some(self.seed));
        let output = run_selection(&self.table, entity, self.sample_size, &mut rng);
        self.status = format!(
            "rows={} | dropped={} | series={} | shown={} | seed={}",
            output.stats.rows_matched,
            output.stats.dates_dropped,
            output.stats.series_len,
            output.stats.sample_len,
            self.seed,
        );
        self.output = Some(output);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let entity = self.entities.get(self.selected).map(String::as_str).unwrap_or("-");
        let source = self
            .table
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());

        let lines = vec![
            Line::from(vec![
                Span::styled("cases", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" — Daily COVID-19 cases in {entity}")),
            ]),
            Line::from(Span::styled(
                format!(
                    "source: {source} | entities: {} | sample size: {}",
                    self.entities.len(),
                    self.sample_size,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(0)])
            .split(area);

        self.draw_entities(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
    }

    fn draw_entities(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .entities
            .iter()
            .map(|e| ListItem::new(e.as_str()))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Entity").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        if !self.entities.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Daily cases").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(output) = self.output.as_ref().filter(|o| !o.is_empty()) else {
            let entity = self.entities.get(self.selected).map(String::as_str).unwrap_or("-");
            let msg = Paragraph::new(format!("No dated rows for {entity}."))
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let (points, x_bounds, y_bounds) = chart_series(&output.sample);

        let (chart_rect, insets) = chart_layout(inner);
        let widget = CaseChart {
            points: &points,
            x_bounds,
            y_bounds,
            x_label: "date",
            y_label: "new cases/day",
            fmt_x: fmt_axis_date,
            fmt_y: fmt_compact,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ PgUp/PgDn select  r resample  +/- size  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Move a list cursor by `delta`, clamped to `[0, len)`.
fn move_selection(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}

/// Build chart points and padded bounds for Plotters.
fn chart_series(sample: &[DailySeriesPoint]) -> (Vec<(f64, f64)>, [f64; 2], [f64; 2]) {
    let points: Vec<(f64, f64)> = sample
        .iter()
        .map(|p| (p.date.num_days_from_ce() as f64, p.daily_cases))
        .collect();

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in &points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        if y.is_finite() {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }

    if !x_min.is_finite() || !x_max.is_finite() {
        x_min = 0.0;
        x_max = 1.0;
    }
    if x_max <= x_min {
        x_min -= 1.0;
        x_max += 1.0;
    }

    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }
    if y_max <= y_min {
        y_min -= 0.5;
        y_max += 0.5;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    (points, [x_min, x_max], [y_min - pad, y_max + pad])
}

/// Day number (days from the common era) to a `Mon YYYY` label.
fn fmt_axis_date(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(fmt_month)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_date(x_val);
        let label_len = label.chars().count() as u16;
        let start = x
            .saturating_sub(label_len / 2)
            .min((inner.x + inner.width).saturating_sub(label_len));
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_compact(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("date")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("cases/d")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CaseRecord, TableSchema};

    fn point(date: &str, daily_cases: f64) -> DailySeriesPoint {
        DailySeriesPoint {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            daily_cases,
        }
    }

    fn table() -> CaseTable {
        let record = |entity: &str, day: &str, cases: f64| CaseRecord {
            entity: entity.to_string(),
            day: day.to_string(),
            biweekly_cases: cases,
        };
        CaseTable {
            source: None,
            schema: TableSchema::default(),
            records: vec![
                record("Brazil", "2020-01-01", 140.0),
                record("France", "2020-01-01", 70.0),
                record("Chad", "oops", 7.0),
            ],
        }
    }

    #[test]
    fn selection_is_clamped() {
        assert_eq!(move_selection(0, -1, 5), 0);
        assert_eq!(move_selection(3, 10, 5), 4);
        assert_eq!(move_selection(2, 1, 5), 3);
        assert_eq!(move_selection(0, 1, 0), 0);
    }

    #[test]
    fn chart_bounds_pad_values() {
        let (points, x, y) = chart_series(&[point("2020-01-01", 10.0), point("2020-01-11", 20.0)]);
        assert_eq!(points.len(), 2);
        assert!((x[1] - x[0] - 10.0).abs() < 1e-9);
        assert!((y[0] - 9.5).abs() < 1e-9);
        assert!((y[1] - 20.5).abs() < 1e-9);
    }

    #[test]
    fn chart_bounds_single_point_are_non_empty() {
        let (_, x, y) = chart_series(&[point("2020-01-01", 3.0)]);
        assert!(x[1] > x[0]);
        assert!(y[1] > y[0]);
    }

    #[test]
    fn axis_dates_round_trip_day_numbers() {
        let d = NaiveDate::from_ymd_opt(2021, 3, 15).unwrap();
        assert_eq!(fmt_axis_date(d.num_days_from_ce() as f64), "Mar 2021");
    }

    #[test]
    fn app_starts_on_requested_entity_and_reruns_on_move() {
        let config = SeriesConfig {
            entity: Some("France".to_string()),
            seed: Some(5),
            ..SeriesConfig::default()
        };
        let mut app = App::new(table(), config);
        assert_eq!(app.selected, 1);
        let out = app.output.as_ref().unwrap();
        assert_eq!(out.entity, "France");
        assert_eq!(out.sample[0].daily_cases, 5.0);

        assert!(!app.handle_key(KeyCode::Down));
        let out = app.output.as_ref().unwrap();
        assert_eq!(out.entity, "Chad");
        assert!(out.is_empty());
        assert_eq!(out.stats.dates_dropped, 1);

        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn unknown_start_entity_falls_back_to_first() {
        let config = SeriesConfig {
            entity: Some("Germany".to_string()),
            seed: Some(1),
            ..SeriesConfig::default()
        };
        let app = App::new(table(), config);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn resample_bumps_seed() {
        let config = SeriesConfig {
            seed: Some(10),
            ..SeriesConfig::default()
        };
        let mut app = App::new(table(), config);
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.seed, 11);
        app.handle_key(KeyCode::Char('-'));
        assert_eq!(app.sample_size, 40);
    }
}

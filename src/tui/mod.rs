//! Ratatui-based terminal UI.
//!
//! The TUI renders the view engine's table: the index overview with search,
//! and the constituent table of a selected index. Data is loaded on a worker
//! thread so the table stays responsive while a refresh is in flight.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use chrono::NaiveDateTime;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use tracing::{debug, info};

use crate::data::FallbackProvider;
use crate::domain::{DataSource, RadarConfig, RowView, Snapshot, SortKey};
use crate::error::AppError;
use crate::report::format::{cell_text, header_label};
use crate::report::{Tone, format_updated, momentum_fraction, source_banner};
use crate::view::{CurrentView, ReplaceOutcome, SelectOutcome, ViewState};

/// Block glyphs for the weekly momentum bar, empty to full.
const BAR_GLYPHS: [&str; 8] = ["▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];

/// Start the TUI.
pub fn run(config: RadarConfig) -> Result<(), AppError> {
    let provider = Arc::new(crate::app::pipeline::build_provider(&config)?);
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(provider, &config);
    app.request_refresh();
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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

/// Loading state kept next to the engine. The engine itself never looks at it.
#[derive(Debug, Clone, Default)]
struct FetchStatus {
    loading: bool,
    source: Option<DataSource>,
    last_updated: Option<NaiveDateTime>,
}

struct App {
    state: ViewState,
    provider: Arc<FallbackProvider>,
    pending: Option<Receiver<Snapshot>>,
    fetch: FetchStatus,
    table_state: TableState,
    editing_search: bool,
    status: String,
}

impl App {
    fn new(provider: Arc<FallbackProvider>, config: &RadarConfig) -> Self {
        Self {
            state: crate::app::pipeline::new_view_state(config),
            provider,
            pending: None,
            fetch: FetchStatus::default(),
            table_state: TableState::default().with_selected(Some(0)),
            editing_search: false,
            status: String::new(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.poll_refresh() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
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

    /// Start a background load unless one is already running.
    fn request_refresh(&mut self) {
        if self.pending.is_some() {
            return;
        }
        let provider = Arc::clone(&self.provider);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(provider.load());
        });
        self.pending = Some(rx);
        self.fetch.loading = true;
        self.status = "Refreshing...".to_string();
        info!("refresh requested");
    }

    /// Apply a finished load, if any. Returns `true` when something changed.
    fn poll_refresh(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        match rx.try_recv() {
            Ok(snapshot) => {
                self.pending = None;
                self.apply_snapshot(snapshot);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.fetch.loading = false;
                self.status = "Refresh worker stopped unexpectedly.".to_string();
                true
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let outcome = self.state.replace(snapshot.datasets);
        self.fetch.loading = false;
        self.fetch.last_updated = self.state.datasets().as_of;
        self.fetch.source = Some(snapshot.source);
        self.status = replace_message(outcome).to_string();
        self.clamp_selection();
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_search {
            self.handle_search_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Enter | KeyCode::Right => self.open_selected(),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => {
                if matches!(self.state.current_view(), CurrentView::Detail { .. }) {
                    self.state.on_back();
                    self.table_state.select(Some(0));
                    self.status.clear();
                }
            }
            KeyCode::Char('/') => {
                if self.state.current_view() == CurrentView::Overview {
                    self.editing_search = true;
                    self.status = "Searching. Enter/Esc to finish.".to_string();
                }
            }
            KeyCode::Char('r') => self.request_refresh(),
            KeyCode::Char(c) if c.is_ascii_digit() => self.sort_by_column(c),
            _ => {}
        }
        false
    }

    fn handle_search_edit(&mut self, code: KeyCode) {
        let mut term = self.state.search().to_string();
        match code {
            KeyCode::Esc | KeyCode::Enter => {
                self.editing_search = false;
                self.status.clear();
                return;
            }
            KeyCode::Backspace => {
                term.pop();
            }
            KeyCode::Char(c) => term.push(c),
            _ => return,
        }
        self.state.on_search(&term);
        self.table_state.select(Some(0));
    }

    fn sort_by_column(&mut self, digit: char) {
        let Some(n) = digit.to_digit(10) else {
            return;
        };
        let columns = self.state.table().columns;
        let Some(&key) = (n as usize).checked_sub(1).and_then(|i| columns.get(i)) else {
            return;
        };
        self.state.on_sort(key);
        let sort = self.state.sort();
        self.status = format!("sort: {} {}", key.label(), sort.direction.arrow());
    }

    fn open_selected(&mut self) {
        if self.state.current_view() != CurrentView::Overview {
            return;
        }
        let rows = self.state.visible_rows();
        let Some(row) = self.table_state.selected().and_then(|i| rows.get(i)) else {
            return;
        };
        if !row.has_detail {
            return;
        }
        let code = row.key.clone();
        match self.state.on_select_parent(&code) {
            SelectOutcome::Selected => self.status.clear(),
            SelectOutcome::UnknownParent => self.status = format!("Unknown index code: {code}"),
        }
        self.table_state.select(Some(0));
        debug!(code = %code, "drilled into index");
    }

    fn move_selection(&mut self, delta: i32) {
        let len = self.state.visible_rows().len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as i64;
        let next = (current + delta as i64).clamp(0, len as i64 - 1);
        self.table_state.select(Some(next as usize));
    }

    fn clamp_selection(&mut self) {
        let len = self.state.visible_rows().len();
        let selected = match (self.table_state.selected(), len) {
            (_, 0) => None,
            (Some(i), n) => Some(i.min(n - 1)),
            (None, _) => Some(0),
        };
        self.table_state.select(selected);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();

        let updated = if self.fetch.loading && self.fetch.last_updated.is_none() {
            "Loading...".to_string()
        } else {
            format_updated(self.fetch.last_updated)
        };
        lines.push(Line::from(vec![
            Span::styled("BIST Radar", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(updated, Style::default().fg(Color::Gray)),
        ]));

        let crumb = match self.state.current_view() {
            CurrentView::Overview => {
                let search = self.state.search();
                let mut spans = vec![Span::styled("Sector rotations", Style::default().fg(Color::White))];
                if !search.is_empty() || self.editing_search {
                    let cursor = if self.editing_search { "_" } else { "" };
                    spans.push(Span::styled(
                        format!("   search: {search}{cursor}"),
                        Style::default().fg(Color::Yellow),
                    ));
                }
                Line::from(spans)
            }
            CurrentView::Detail { code, parent } => {
                let name = parent.map(|p| p.name.as_str()).unwrap_or("?");
                Line::from(vec![
                    Span::styled("← All indices", Style::default().fg(Color::Gray)),
                    Span::styled(" › ", Style::default().fg(Color::DarkGray)),
                    Span::styled(format!("{name} ({code})"), Style::default().fg(Color::LightBlue)),
                ])
            }
        };
        lines.push(crumb);

        if let Some(banner) = self.fetch.source.as_ref().and_then(source_banner) {
            let color = match &self.fetch.source {
                Some(DataSource::Fallback { reason: Some(_) }) => Color::Red,
                _ => Color::Yellow,
            };
            lines.push(Line::from(Span::styled(banner, Style::default().fg(color))));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_table(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let table = self.state.table();
        let block = Block::default().borders(Borders::ALL);

        if table.rows.is_empty() {
            let msg = if self.fetch.loading { "Loading data..." } else { "No data found." };
            let p = Paragraph::new(msg)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray))
                .block(block);
            frame.render_widget(p, area);
            return;
        }

        let with_detail = table.rows.iter().any(|r| r.has_detail);
        let mut header_cells: Vec<Cell> = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, &key)| {
                let style = if table.sort.key == key {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Cell::from(format!("{} {}", i + 1, header_label(&table, key))).style(style)
            })
            .collect();
        if with_detail {
            header_cells.push(Cell::from(""));
        }

        let rows: Vec<Row> = table
            .rows
            .iter()
            .map(|row| table_row(row, table.columns, with_detail))
            .collect();

        let mut widths: Vec<Constraint> = table
            .columns
            .iter()
            .map(|&key| match key {
                SortKey::Code => Constraint::Min(20),
                SortKey::Category => Constraint::Length(12),
                SortKey::Change1w => Constraint::Length(14),
                _ => Constraint::Length(11),
            })
            .collect();
        if with_detail {
            widths.push(Constraint::Length(2));
        }

        let widget = Table::new(rows, widths)
            .header(Row::new(header_cells).height(1).bottom_margin(1))
            .block(block)
            .row_highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("» ");
        frame.render_stateful_widget(widget, area, &mut self.table_state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.state.current_view() {
            CurrentView::Overview => "↑/↓ move  Enter open  / search  1-8 sort  r refresh  q quit",
            CurrentView::Detail { .. } => "↑/↓ move  Esc back  1-6 sort  r refresh  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn table_row<'a>(row: &'a RowView, columns: &[SortKey], with_detail: bool) -> Row<'a> {
    let mut cells: Vec<Cell> = columns
        .iter()
        .map(|&key| match key {
            SortKey::Code => Cell::from(Text::from(vec![
                Line::from(Span::styled(
                    row.key.as_str(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(row.label.as_str(), Style::default().fg(Color::Gray))),
            ])),
            SortKey::Change1w => {
                let value = row.changes.w1;
                let glyph = bar_glyph(momentum_fraction(value));
                let text = Line::from(vec![
                    Span::raw(cell_text(row, key)),
                    Span::raw(" "),
                    Span::raw(glyph),
                ]);
                Cell::from(text.alignment(Alignment::Right)).style(tone_style(value))
            }
            key if key.is_change() => {
                let value = match key {
                    SortKey::Change1d => row.changes.d1,
                    SortKey::Change1m => row.changes.m1,
                    _ => row.changes.m3,
                };
                Cell::from(Line::from(cell_text(row, key)).alignment(Alignment::Right)).style(tone_style(value))
            }
            SortKey::Category => Cell::from(cell_text(row, key)).style(Style::default().fg(Color::Gray)),
            _ => Cell::from(Line::from(cell_text(row, key)).alignment(Alignment::Right)),
        })
        .collect();
    if with_detail {
        cells.push(Cell::from(if row.has_detail { "›" } else { "" }));
    }
    Row::new(cells).height(2)
}

fn replace_message(outcome: ReplaceOutcome) -> &'static str {
    match outcome {
        ReplaceOutcome::NoSelection | ReplaceOutcome::Kept => "Data refreshed.",
        ReplaceOutcome::Cleared => "Selected index is no longer in the data.",
    }
}

fn bar_glyph(fraction: f64) -> &'static str {
    let idx = (fraction.clamp(0.0, 1.0) * (BAR_GLYPHS.len() - 1) as f64).round() as usize;
    BAR_GLYPHS[idx]
}

fn tone_style(value: Option<f64>) -> Style {
    match Tone::of(value) {
        Tone::Up => Style::default().fg(Color::Green),
        Tone::Down => Style::default().fg(Color::Red),
        Tone::Flat => Style::default().fg(Color::Gray),
    }
}

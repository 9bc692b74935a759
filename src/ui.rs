use std::io::{self, Stdout};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use unicode_width::UnicodeWidthStr;

use crate::clipboard::ClipboardBackend;
use crate::config::TimingConfig;
use crate::data::{LinkSource, LoadError};
use crate::effects::{Effects, Timings};
use crate::launch::Launcher;
use crate::links::{LinkAction, LinkDescriptor, LinkEntry};

const COLOR_BG: Color = Color::Rgb(30, 30, 46);
const COLOR_PANEL_BG: Color = Color::Rgb(24, 24, 36);
const COLOR_PANEL_SELECTED_BG: Color = Color::Rgb(69, 71, 90);
const COLOR_BORDER: Color = Color::Rgb(49, 50, 68);
const COLOR_TEXT_PRIMARY: Color = Color::Rgb(205, 214, 244);
const COLOR_TEXT_SECONDARY: Color = Color::Rgb(166, 173, 200);
const COLOR_ACCENT: Color = Color::Rgb(137, 180, 250);
const COLOR_SUCCESS: Color = Color::Rgb(166, 227, 161);
const COLOR_ERROR: Color = Color::Rgb(243, 139, 168);

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const WORDMARK: &str = "L I N K D E C K";
const TOAST_TEXT: &str = "Copied!";
const CLOSE_CONTROL: &str = "[ close ]";
const LOAD_ERROR_TEXT: &str = "Links are unavailable right now.";
const ROW_HEIGHT: u16 = 3;
const MAX_PAGE_WIDTH: u16 = 64;

const MASCOT_IDLE: [&str; 3] = [" /\\_/\\", "( -.- )", " > ^ <"];
const MASCOT_JUMP: [&str; 3] = [" /\\_/\\", "( ^o^ )", "  /|\\"];
const CAT_MARK: &str = "=^.^=";
const CAT_MARK_BOUNCE: &str = "=^o^=";

/// Splash-to-page reveal. Time driven; independent of the link load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Splash { since: Instant },
    Fading { until: Instant },
    Revealed,
}

/// The one shared overlay. At most one modal is open at a time and
/// `close` is idempotent.
#[derive(Debug, Default)]
struct ModalState {
    open: bool,
    title: String,
    content: String,
}

impl ModalState {
    fn open(&mut self, title: String, content: String) {
        self.open = true;
        self.title = title;
        self.content = content;
    }

    fn close(&mut self) {
        self.open = false;
        self.title.clear();
        self.content.clear();
    }
}

enum AsyncResponse {
    Links {
        request_id: u64,
        result: Result<Vec<LinkDescriptor>, LoadError>,
    },
}

pub struct Options {
    pub source: Arc<dyn LinkSource>,
    pub clipboard: Box<dyn ClipboardBackend>,
    pub launcher: Box<dyn Launcher>,
    pub reduced_motion: bool,
    pub timing: TimingConfig,
    pub status_message: String,
    pub load_on_start: bool,
}

struct Spinner {
    index: usize,
    last_tick: Instant,
}

impl Spinner {
    fn new() -> Self {
        Self {
            index: 0,
            last_tick: Instant::now(),
        }
    }

    fn frame(&self) -> &'static str {
        SPINNER_FRAMES[self.index % SPINNER_FRAMES.len()]
    }

    fn advance(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_tick) >= Duration::from_millis(120) {
            self.index = (self.index + 1) % SPINNER_FRAMES.len();
            self.last_tick = now;
            true
        } else {
            false
        }
    }

    fn reset(&mut self) {
        self.index = 0;
        self.last_tick = Instant::now();
    }
}

pub struct Model {
    source: Arc<dyn LinkSource>,
    clipboard: Box<dyn ClipboardBackend>,
    launcher: Box<dyn Launcher>,
    timing: TimingConfig,
    reduced_motion: bool,
    phase: Phase,
    entries: Vec<LinkEntry>,
    load_error: Option<String>,
    loading: bool,
    selected: usize,
    pressed: Option<usize>,
    modal: ModalState,
    effects: Effects,
    spinner: Spinner,
    status_message: String,
    source_label: String,
    needs_redraw: bool,
    links_rect: Option<Rect>,
    modal_rect: Option<Rect>,
    modal_close_rect: Option<Rect>,
    response_tx: Sender<AsyncResponse>,
    response_rx: Receiver<AsyncResponse>,
    links_request_id: u64,
}

impl Model {
    pub fn new(options: Options) -> Self {
        let (response_tx, response_rx) = unbounded();
        let source_label = options.source.describe();
        let effects = Effects::new(
            options.reduced_motion,
            Timings {
                toast: options.timing.toast,
                jump: options.timing.jump,
                ripple: options.timing.ripple,
            },
        );

        let mut model = Model {
            source: options.source,
            clipboard: options.clipboard,
            launcher: options.launcher,
            timing: options.timing,
            reduced_motion: options.reduced_motion,
            phase: Phase::Splash {
                since: Instant::now(),
            },
            entries: Vec::new(),
            load_error: None,
            loading: false,
            selected: 0,
            pressed: None,
            modal: ModalState::default(),
            effects,
            spinner: Spinner::new(),
            status_message: options.status_message,
            source_label,
            needs_redraw: true,
            links_rect: None,
            modal_rect: None,
            modal_close_rect: None,
            response_tx,
            response_rx,
            links_request_id: 0,
        };

        if options.load_on_start {
            model.queue_load();
        }
        model
    }

    fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    fn splash_duration(&self) -> Duration {
        if self.reduced_motion {
            self.timing.splash_reduced
        } else {
            self.timing.splash
        }
    }

    /// Starts a background load. The reveal timer keeps running
    /// independently; results are applied whenever they arrive.
    fn queue_load(&mut self) {
        self.loading = true;
        self.load_error = None;
        self.links_request_id += 1;
        let request_id = self.links_request_id;
        let tx = self.response_tx.clone();
        let source = self.source.clone();
        thread::spawn(move || {
            let result = source.load();
            let _ = tx.send(AsyncResponse::Links { request_id, result });
        });
        self.mark_dirty();
    }

    fn poll_async(&mut self) -> bool {
        let mut changed = false;
        while let Ok(message) = self.response_rx.try_recv() {
            self.handle_async_response(message);
            changed = true;
        }
        changed
    }

    fn handle_async_response(&mut self, message: AsyncResponse) {
        match message {
            AsyncResponse::Links { request_id, result } => {
                if request_id != self.links_request_id {
                    return;
                }
                self.loading = false;
                match result {
                    Ok(descriptors) => self.apply_descriptors(descriptors),
                    Err(err) => {
                        self.entries.clear();
                        self.load_error = Some(LOAD_ERROR_TEXT.to_string());
                        self.status_message = format!("Failed to load links: {err}");
                    }
                }
            }
        }
    }

    fn apply_descriptors(&mut self, descriptors: Vec<LinkDescriptor>) {
        let converted: Result<Vec<LinkEntry>, _> = descriptors
            .into_iter()
            .map(LinkEntry::from_descriptor)
            .collect();
        match converted {
            Ok(entries) => {
                let count = entries.len();
                self.entries = entries;
                self.load_error = None;
                self.selected = self.selected.min(count.saturating_sub(1));
                self.status_message = format!(
                    "Loaded {count} links from {source}.",
                    source = self.source_label
                );
            }
            Err(err) => {
                self.entries.clear();
                self.load_error = Some(LOAD_ERROR_TEXT.to_string());
                self.status_message = format!("Invalid link data: {err}");
            }
        }
    }

    /// Advances the splash state machine. Returns true on a transition.
    fn advance_phase(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Splash { since } => {
                if now.duration_since(since) >= self.splash_duration() {
                    self.phase = if self.reduced_motion {
                        Phase::Revealed
                    } else {
                        Phase::Fading {
                            until: now + self.timing.splash_fade,
                        }
                    };
                    true
                } else {
                    false
                }
            }
            Phase::Fading { until } => {
                if now >= until {
                    self.phase = Phase::Revealed;
                    true
                } else {
                    false
                }
            }
            Phase::Revealed => false,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        terminal.backend_mut().execute(DisableMouseCapture)?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut last_tick = Instant::now();
        let tick_rate = Duration::from_millis(120);

        loop {
            if self.poll_async() {
                self.mark_dirty();
            }
            if self.advance_phase(Instant::now()) {
                self.mark_dirty();
            }

            if self.needs_redraw {
                terminal.draw(|frame| self.draw(frame))?;
                self.needs_redraw = false;
            }

            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_millis(16));

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        match self.handle_key(key.code) {
                            Ok(true) => break,
                            Ok(false) => {}
                            Err(err) => {
                                self.status_message = format!("Error: {}", err);
                                self.mark_dirty();
                            }
                        }
                    }
                    Event::Mouse(mouse) => {
                        if let Err(err) = self.handle_mouse(mouse) {
                            self.status_message = format!("Error: {}", err);
                            self.mark_dirty();
                        }
                    }
                    Event::Resize(..) => self.mark_dirty(),
                    _ => {}
                }
            }

            if self.poll_async() {
                self.mark_dirty();
            }

            if last_tick.elapsed() >= tick_rate {
                last_tick = Instant::now();
                if self.effects.tick(Instant::now()) {
                    self.mark_dirty();
                }
                if self.loading && self.spinner.advance() {
                    self.mark_dirty();
                } else if !self.loading {
                    self.spinner.reset();
                }
            }
        }

        Ok(())
    }

    /// Returns Ok(true) when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        if self.modal.open {
            match code {
                // Enter and Space activate the close control; Esc closes
                // from anywhere. All paths funnel into the same close.
                KeyCode::Esc | KeyCode::Char('q') => self.close_modal(),
                KeyCode::Enter | KeyCode::Char(' ') => self.close_modal(),
                _ => {}
            }
            return Ok(false);
        }

        if let Phase::Splash { .. } = self.phase {
            return Ok(matches!(code, KeyCode::Char('q') | KeyCode::Esc));
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_previous(),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_selected()?,
            KeyCode::Char('r') => self.queue_load(),
            _ => {}
        }
        Ok(false)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        let position = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.modal.open {
                    return Ok(());
                }
                // Ripple fires on press, not on activation, so a
                // press-and-drag-away still ripples.
                if let Some(index) = self.hit_entry(position) {
                    self.pressed = Some(index);
                    self.selected = index;
                    self.effects.trigger_ripple(index, Instant::now());
                    self.mark_dirty();
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.modal.open {
                    if rect_contains(self.modal_close_rect, position) {
                        self.close_modal();
                    } else if !rect_contains(self.modal_rect, position) {
                        // Backdrop click: only clicks outside the modal
                        // body close it.
                        self.close_modal();
                    }
                    return Ok(());
                }
                let pressed = self.pressed.take();
                if let Some(index) = self.hit_entry(position) {
                    if pressed == Some(index) {
                        self.activate_selected()?;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn hit_entry(&self, position: (u16, u16)) -> Option<usize> {
        if self.load_error.is_some() || self.entries.is_empty() {
            return None;
        }
        let rect = self.links_rect?;
        let (column, row) = position;
        if column < rect.x
            || column >= rect.x.saturating_add(rect.width)
            || row < rect.y
            || row >= rect.y.saturating_add(rect.height)
        {
            return None;
        }
        let index = usize::from((row - rect.y) / ROW_HEIGHT);
        (index < self.entries.len()).then_some(index)
    }

    fn select_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.entries.len() - 1);
        self.mark_dirty();
    }

    fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.mark_dirty();
    }

    fn close_modal(&mut self) {
        self.modal.close();
        self.mark_dirty();
    }

    /// One dispatch path for every activation gesture. The pointer click
    /// and the Enter/Space keys land here with identical behavior.
    fn activate_selected(&mut self) -> Result<()> {
        let Some(entry) = self.entries.get(self.selected).cloned() else {
            return Ok(());
        };
        let now = Instant::now();
        self.effects.trigger_jump(now);
        if entry.cat {
            self.effects.trigger_bounce(self.selected, now);
        }

        match entry.action {
            LinkAction::Navigate { url } => match self.launcher.open(&url) {
                Ok(()) => {
                    self.status_message = format!("Opened {} in your browser.", entry.label);
                }
                Err(err) => {
                    self.status_message = format!("Could not open {}: {err}", entry.label);
                }
            },
            LinkAction::Copy { value } => {
                // The toast fires exactly once per copy no matter which
                // clipboard path ran.
                self.clipboard.copy(&value);
                self.effects.trigger_toast(now);
                self.status_message = format!("Copied {}.", entry.label);
            }
            LinkAction::ShowModal { title, content } => {
                self.modal.open(title, content);
            }
        }

        self.mark_dirty();
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let area = frame.size();
        frame.render_widget(Block::default().style(Style::default().bg(COLOR_BG)), area);

        match self.phase {
            Phase::Splash { .. } => {
                self.links_rect = None;
                self.modal_rect = None;
                self.modal_close_rect = None;
                self.draw_splash(frame, area, false);
                return;
            }
            Phase::Fading { .. } => {
                self.draw_page(frame, area);
                self.draw_splash(frame, area, true);
            }
            Phase::Revealed => self.draw_page(frame, area),
        }

        if self.modal.open {
            self.draw_modal(frame, area);
        } else {
            self.modal_rect = None;
            self.modal_close_rect = None;
        }

        if self.effects.toast_visible() {
            self.draw_toast(frame, area);
        }
    }

    fn draw_splash(&self, frame: &mut Frame<'_>, area: Rect, remnant: bool) {
        let popup = centered_rect(50, 40, area);
        if popup.height < 5 {
            return;
        }
        let (mark_color, text_color) = if remnant {
            (COLOR_BORDER, COLOR_BORDER)
        } else {
            (COLOR_ACCENT, COLOR_TEXT_SECONDARY)
        };

        let mut lines: Vec<Line<'_>> = MASCOT_IDLE
            .iter()
            .map(|row| Line::from(Span::styled(*row, Style::default().fg(mark_color))))
            .collect();
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            WORDMARK,
            Style::default().fg(mark_color).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "gathering your links…",
            Style::default().fg(text_color),
        )));

        if !remnant {
            frame.render_widget(Clear, popup);
        }
        let splash = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(splash, popup);
    }

    fn draw_page(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let page = centered_column(MAX_PAGE_WIDTH, area);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(page);

        self.draw_header(frame, chunks[0]);
        self.draw_links(frame, chunks[1]);
        self.draw_status(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(10)])
            .split(area);

        let title = Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(
                WORDMARK,
                Style::default()
                    .fg(COLOR_ACCENT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "all my links, one terminal",
                Style::default().fg(COLOR_TEXT_SECONDARY),
            )),
        ]);
        frame.render_widget(title, chunks[0]);

        // The mascot rides one row higher while a jump is in flight.
        let jumping = self.effects.jumping();
        let art = if jumping { MASCOT_JUMP } else { MASCOT_IDLE };
        let mut lines: Vec<Line<'_>> = Vec::new();
        if !jumping {
            lines.push(Line::default());
        }
        lines.extend(
            art.iter()
                .map(|row| Line::from(Span::styled(*row, Style::default().fg(COLOR_ACCENT)))),
        );
        if jumping {
            lines.push(Line::default());
        }
        frame.render_widget(Paragraph::new(lines), chunks[1]);
    }

    fn draw_links(&mut self, frame: &mut Frame<'_>, area: Rect) {
        self.links_rect = Some(area);

        if let Some(message) = &self.load_error {
            let error = Paragraph::new(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(COLOR_ERROR),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(error, area);
            return;
        }

        if self.entries.is_empty() {
            let text = if self.loading {
                format!("{} loading links…", self.spinner.frame())
            } else {
                "No links yet.".to_string()
            };
            let placeholder = Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(COLOR_TEXT_SECONDARY),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(placeholder, area);
            return;
        }

        let mut items: Vec<ListItem<'_>> = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            let selected = index == self.selected;
            let rippling = self.effects.rippling(index);
            let background = if selected {
                COLOR_PANEL_SELECTED_BG
            } else {
                COLOR_PANEL_BG
            };

            let mut label_style = Style::default()
                .fg(COLOR_TEXT_PRIMARY)
                .bg(background)
                .add_modifier(Modifier::BOLD);
            if rippling {
                label_style = label_style.add_modifier(Modifier::REVERSED);
            }

            let mut label_spans = vec![Span::styled(format!(" {}", entry.label), label_style)];
            if entry.cat {
                let bouncing = self.effects.bouncing(index);
                let mark = if bouncing { CAT_MARK_BOUNCE } else { CAT_MARK };
                let mut mark_style = Style::default().fg(COLOR_ACCENT).bg(background);
                if bouncing {
                    mark_style = mark_style.add_modifier(Modifier::BOLD);
                }
                label_spans.push(Span::styled(format!("  {mark}"), mark_style));
            }

            let detail = match &entry.action {
                LinkAction::Navigate { url } => Span::styled(
                    format!(" {url}"),
                    Style::default().fg(COLOR_ACCENT).bg(background),
                ),
                action => Span::styled(
                    format!(" {}", action.kind_label()),
                    Style::default().fg(COLOR_TEXT_SECONDARY).bg(background),
                ),
            };

            items.push(ListItem::new(vec![
                Line::from(label_spans),
                Line::from(detail),
                Line::default(),
            ]));
        }

        let list = List::new(items).block(Block::default().borders(Borders::NONE));
        frame.render_widget(list, area);
    }

    fn draw_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let status = Paragraph::new(Line::from(Span::styled(
            self.status_message.clone(),
            Style::default().fg(COLOR_TEXT_SECONDARY),
        )));
        frame.render_widget(status, area);
    }

    fn draw_toast(&self, frame: &mut Frame<'_>, area: Rect) {
        let width = (TOAST_TEXT.width() as u16).saturating_add(4);
        let height = 3;
        if area.width < width || area.height < height + 1 {
            return;
        }
        let toast_area = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + area.height - height - 1,
            width,
            height,
        };
        frame.render_widget(Clear, toast_area);
        let toast = Paragraph::new(Line::from(Span::styled(
            TOAST_TEXT,
            Style::default()
                .fg(COLOR_SUCCESS)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(COLOR_SUCCESS))
                .style(Style::default().bg(COLOR_PANEL_BG)),
        );
        frame.render_widget(toast, toast_area);
    }

    fn draw_modal(&mut self, frame: &mut Frame<'_>, area: Rect) {
        // Too small to host the overlay: degrade silently, the modal
        // state itself stays untouched.
        if area.width < 24 || area.height < 8 {
            self.modal_rect = None;
            self.modal_close_rect = None;
            return;
        }

        let popup = centered_rect(60, 60, area);
        self.modal_rect = Some(popup);
        frame.render_widget(Clear, popup);

        let body_style = Style::default().fg(COLOR_TEXT_PRIMARY).bg(COLOR_PANEL_BG);
        let wrap_width = usize::from(popup.width.saturating_sub(4)).max(1);
        let mut lines: Vec<Line<'_>> = Vec::new();
        lines.push(Line::default());
        for row in textwrap::wrap(&self.modal.content, wrap_width) {
            lines.push(Line::from(Span::styled(row.into_owned(), body_style)));
        }

        let modal = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(Span::styled(
                        format!(" {} ", self.modal.title),
                        Style::default()
                            .fg(COLOR_ACCENT)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(COLOR_ACCENT))
                    .style(Style::default().bg(COLOR_PANEL_BG)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(modal, popup);

        let close_width = CLOSE_CONTROL.width() as u16;
        let close_rect = Rect {
            x: popup.x + popup.width.saturating_sub(close_width) / 2,
            y: popup.y + popup.height.saturating_sub(2),
            width: close_width,
            height: 1,
        };
        self.modal_close_rect = Some(close_rect);
        let close = Paragraph::new(Line::from(Span::styled(
            CLOSE_CONTROL,
            Style::default()
                .fg(COLOR_ACCENT)
                .bg(COLOR_PANEL_BG)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(close, close_rect);
    }
}

fn rect_contains(rect: Option<Rect>, position: (u16, u16)) -> bool {
    let Some(rect) = rect else {
        return false;
    };
    let (column, row) = position;
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn centered_column(max_width: u16, r: Rect) -> Rect {
    if r.width <= max_width {
        return r;
    }
    let margin = (r.width - max_width) / 2;
    Rect {
        x: r.x + margin,
        width: max_width,
        ..r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::RecordingClipboard;
    use crate::data::MockSource;
    use crate::launch::RecordingLauncher;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use reqwest::StatusCode;

    fn nav(label: &str, url: &str) -> LinkDescriptor {
        LinkDescriptor {
            label: label.into(),
            url: Some(url.into()),
            ..LinkDescriptor::default()
        }
    }

    fn copy(label: &str, value: &str) -> LinkDescriptor {
        LinkDescriptor {
            label: label.into(),
            copy: Some(value.into()),
            ..LinkDescriptor::default()
        }
    }

    fn modal(label: &str, content: &str) -> LinkDescriptor {
        LinkDescriptor {
            label: label.into(),
            kind: Some("modal".into()),
            content: Some(content.into()),
            ..LinkDescriptor::default()
        }
    }

    fn build_model(
        descriptors: Vec<LinkDescriptor>,
        reduced_motion: bool,
    ) -> (Model, RecordingClipboard, RecordingLauncher) {
        let clipboard = RecordingClipboard::default();
        let launcher = RecordingLauncher::default();
        let model = Model::new(Options {
            source: Arc::new(MockSource::new(descriptors)),
            clipboard: Box::new(clipboard.clone()),
            launcher: Box::new(launcher.clone()),
            reduced_motion,
            timing: TimingConfig::default(),
            status_message: String::new(),
            load_on_start: false,
        });
        (model, clipboard, launcher)
    }

    fn revealed_model(
        descriptors: Vec<LinkDescriptor>,
    ) -> (Model, RecordingClipboard, RecordingLauncher) {
        let (mut model, clipboard, launcher) = build_model(descriptors.clone(), false);
        model.handle_async_response(AsyncResponse::Links {
            request_id: model.links_request_id,
            result: Ok(descriptors),
        });
        model.phase = Phase::Revealed;
        (model, clipboard, launcher)
    }

    fn draw_once(model: &mut Model) {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| model.draw(frame)).unwrap();
    }

    fn mouse(kind: MouseEventKind, position: (u16, u16)) -> MouseEvent {
        MouseEvent {
            kind,
            column: position.0,
            row: position.1,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn entry_position(model: &Model, index: usize) -> (u16, u16) {
        let rect = model.links_rect.expect("links area drawn");
        (rect.x + 1, rect.y + index as u16 * ROW_HEIGHT)
    }

    #[test]
    fn copy_activation_toasts_and_never_navigates() {
        let (mut model, clipboard, launcher) =
            revealed_model(vec![copy("Email", "me@example.com")]);

        model.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(clipboard.copied(), vec!["me@example.com"]);
        assert!(model.effects.toast_visible());
        assert!(launcher.opened().is_empty());

        // Space must behave identically to Enter.
        model.handle_key(KeyCode::Char(' ')).unwrap();
        assert_eq!(clipboard.copied().len(), 2);

        // A full click (press + release on the same row) is the third
        // equivalent gesture.
        draw_once(&mut model);
        let position = entry_position(&model, 0);
        model
            .handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), position))
            .unwrap();
        model
            .handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), position))
            .unwrap();
        assert_eq!(clipboard.copied().len(), 3);
        assert!(launcher.opened().is_empty());
    }

    #[test]
    fn navigation_opens_the_browser_only() {
        let (mut model, clipboard, launcher) =
            revealed_model(vec![nav("GitHub", "https://github.com/example")]);
        model.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(launcher.opened(), vec!["https://github.com/example"]);
        assert!(clipboard.copied().is_empty());
        assert!(!model.modal.open);
        assert!(!model.effects.toast_visible());
    }

    #[test]
    fn modal_opens_with_label_and_content() {
        let (mut model, _, _) = revealed_model(vec![modal("About", "Hello there.")]);
        model.handle_key(KeyCode::Enter).unwrap();
        assert!(model.modal.open);
        assert_eq!(model.modal.title, "About");
        assert_eq!(model.modal.content, "Hello there.");
    }

    #[test]
    fn modal_closes_from_escape_close_control_and_backdrop() {
        let (mut model, _, _) = revealed_model(vec![modal("About", "Hello there.")]);

        // Escape.
        model.handle_key(KeyCode::Enter).unwrap();
        model.handle_key(KeyCode::Esc).unwrap();
        assert!(!model.modal.open);

        // Close control.
        model.handle_key(KeyCode::Enter).unwrap();
        draw_once(&mut model);
        let close = model.modal_close_rect.expect("close control drawn");
        model
            .handle_mouse(mouse(
                MouseEventKind::Up(MouseButton::Left),
                (close.x, close.y),
            ))
            .unwrap();
        assert!(!model.modal.open);

        // Backdrop click; a click inside the modal body does not close.
        model.handle_key(KeyCode::Enter).unwrap();
        draw_once(&mut model);
        let body = model.modal_rect.expect("modal drawn");
        model
            .handle_mouse(mouse(
                MouseEventKind::Up(MouseButton::Left),
                (body.x + 2, body.y + 2),
            ))
            .unwrap();
        assert!(model.modal.open);
        model
            .handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), (0, 0)))
            .unwrap();
        assert!(!model.modal.open);
    }

    #[test]
    fn close_is_idempotent() {
        let (mut model, _, _) = revealed_model(vec![modal("About", "Hello.")]);
        model.handle_key(KeyCode::Enter).unwrap();
        model.close_modal();
        model.close_modal();
        assert!(!model.modal.open);
        assert!(model.modal.title.is_empty());
    }

    #[test]
    fn failed_load_shows_one_error_and_no_entries() {
        let (mut model, _, _) = revealed_model(vec![nav("Old", "https://example.com")]);
        model.handle_async_response(AsyncResponse::Links {
            request_id: model.links_request_id,
            result: Err(LoadError::Status {
                location: "https://example.com/links.json".into(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            }),
        });
        assert!(model.entries.is_empty());
        assert_eq!(model.load_error.as_deref(), Some(LOAD_ERROR_TEXT));
        assert!(model.status_message.contains("500"));

        // No rows are clickable while the error is up.
        draw_once(&mut model);
        let rect = model.links_rect.unwrap();
        assert!(model.hit_entry((rect.x + 1, rect.y)).is_none());
    }

    #[test]
    fn invalid_descriptor_payload_counts_as_load_failure() {
        let (mut model, _, _) = revealed_model(vec![nav("Good", "https://example.com")]);
        model.handle_async_response(AsyncResponse::Links {
            request_id: model.links_request_id,
            result: Ok(vec![LinkDescriptor {
                label: "No action".into(),
                ..LinkDescriptor::default()
            }]),
        });
        assert!(model.entries.is_empty());
        assert!(model.load_error.is_some());
    }

    #[test]
    fn descriptors_render_in_input_order() {
        let (model, _, _) = revealed_model(vec![
            nav("One", "https://one.example"),
            copy("Two", "two"),
            modal("Three", "three"),
        ]);
        let labels: Vec<&str> = model
            .entries
            .iter()
            .map(|entry| entry.label.as_str())
            .collect();
        assert_eq!(labels, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn stale_load_responses_are_ignored() {
        let (mut model, _, _) = revealed_model(vec![nav("Keep", "https://example.com")]);
        model.links_request_id = 7;
        model.handle_async_response(AsyncResponse::Links {
            request_id: 3,
            result: Ok(vec![nav("Stale", "https://stale.example")]),
        });
        assert_eq!(model.entries[0].label, "Keep");
    }

    #[test]
    fn splash_fades_then_reveals_with_motion() {
        let (mut model, _, _) = build_model(Vec::new(), false);
        let since = match model.phase {
            Phase::Splash { since } => since,
            _ => unreachable!(),
        };

        assert!(!model.advance_phase(since + Duration::from_millis(2399)));
        assert!(model.advance_phase(since + Duration::from_millis(2400)));
        let until = match model.phase {
            Phase::Fading { until } => until,
            other => panic!("expected fading, got {other:?}"),
        };
        assert!(model.advance_phase(until));
        assert_eq!(model.phase, Phase::Revealed);
    }

    #[test]
    fn reduced_motion_reveals_early_and_skips_the_fade() {
        let (mut model, _, _) = build_model(Vec::new(), true);
        let since = match model.phase {
            Phase::Splash { since } => since,
            _ => unreachable!(),
        };

        assert!(!model.advance_phase(since + Duration::from_millis(399)));
        assert!(model.advance_phase(since + Duration::from_millis(400)));
        assert_eq!(model.phase, Phase::Revealed);
    }

    #[test]
    fn reduced_motion_suppresses_ripple_and_jump_on_activation() {
        let (mut model, clipboard, _) = build_model(vec![copy("Email", "me@example.com")], true);
        model.handle_async_response(AsyncResponse::Links {
            request_id: model.links_request_id,
            result: Ok(vec![copy("Email", "me@example.com")]),
        });
        model.phase = Phase::Revealed;

        model.handle_key(KeyCode::Enter).unwrap();
        assert!(!model.effects.jumping());
        assert!(model.effects.toast_visible());
        assert_eq!(clipboard.copied().len(), 1);

        draw_once(&mut model);
        let position = entry_position(&model, 0);
        model
            .handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), position))
            .unwrap();
        assert!(!model.effects.rippling(0));
    }

    #[test]
    fn press_without_release_ripples_but_does_not_activate() {
        let (mut model, clipboard, _) = revealed_model(vec![copy("Email", "me@example.com")]);
        draw_once(&mut model);
        let position = entry_position(&model, 0);
        model
            .handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), position))
            .unwrap();
        assert!(model.effects.rippling(0));
        assert!(clipboard.copied().is_empty());

        // Release somewhere else: the drag-away gesture never activates.
        model
            .handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), (0, 0)))
            .unwrap();
        assert!(clipboard.copied().is_empty());
    }

    #[test]
    fn cat_entries_bounce_on_activation() {
        let mut descriptor = nav("Cat Tax", "https://example.com/cat.png");
        descriptor.cat = true;
        let (mut model, _, _) = revealed_model(vec![descriptor]);
        model.handle_key(KeyCode::Enter).unwrap();
        assert!(model.effects.jumping());
        assert!(model.effects.bouncing(0));
    }

    #[test]
    fn refresh_key_queues_a_new_load() {
        let (mut model, _, _) = revealed_model(vec![nav("One", "https://one.example")]);
        let before = model.links_request_id;
        model.handle_key(KeyCode::Char('r')).unwrap();
        assert!(model.loading);
        assert_eq!(model.links_request_id, before + 1);
    }

    #[test]
    fn selection_moves_and_clamps() {
        let (mut model, _, _) = revealed_model(vec![
            nav("One", "https://one.example"),
            nav("Two", "https://two.example"),
        ]);
        model.handle_key(KeyCode::Char('j')).unwrap();
        assert_eq!(model.selected, 1);
        model.handle_key(KeyCode::Down).unwrap();
        assert_eq!(model.selected, 1);
        model.handle_key(KeyCode::Char('k')).unwrap();
        assert_eq!(model.selected, 0);
        model.handle_key(KeyCode::Up).unwrap();
        assert_eq!(model.selected, 0);
    }

    #[test]
    fn tiny_terminal_degrades_modal_drawing_to_a_no_op() {
        let (mut model, _, _) = revealed_model(vec![modal("About", "Hello.")]);
        model.handle_key(KeyCode::Enter).unwrap();

        let backend = TestBackend::new(10, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| model.draw(frame)).unwrap();

        assert!(model.modal.open);
        assert!(model.modal_rect.is_none());
        assert!(model.modal_close_rect.is_none());
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use stockroom_app::{
    AppCommand, AppEvent, AppMode, AppState, CategoryFilter, Item, ItemDraft, ItemField, ItemId,
    SortDirection, SortKey, format_money,
};
use tracing::{debug, info};

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const POLL_INTERVAL: Duration = Duration::from_millis(120);
const LOW_STOCK_MARK: &str = "!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableColumn {
    Id,
    Name,
    Category,
    Quantity,
    Price,
}

impl TableColumn {
    const ALL: [Self; 5] = [
        Self::Id,
        Self::Name,
        Self::Category,
        Self::Quantity,
        Self::Price,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Category => "category",
            Self::Quantity => "qty",
            Self::Price => "price $",
        }
    }

    const fn sort_key(self) -> Option<SortKey> {
        match self {
            Self::Id => None,
            Self::Name => Some(SortKey::Name),
            Self::Category => Some(SortKey::Category),
            Self::Quantity => Some(SortKey::Quantity),
            Self::Price => Some(SortKey::Price),
        }
    }

    const fn field(self) -> Option<ItemField> {
        match self {
            Self::Id => None,
            Self::Name => Some(ItemField::Name),
            Self::Category => Some(ItemField::Category),
            Self::Quantity => Some(ItemField::Quantity),
            Self::Price => Some(ItemField::Price),
        }
    }

    const fn width(self) -> Constraint {
        match self {
            Self::Id => Constraint::Length(5),
            Self::Name => Constraint::Min(16),
            Self::Category => Constraint::Length(12),
            Self::Quantity => Constraint::Length(7),
            Self::Price => Constraint::Length(12),
        }
    }
}

/// Rendering state that lives outside [`AppState`]. `rows` caches the current
/// projection as ids and is rebuilt only when a dispatched event invalidates it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    rows: Vec<ItemId>,
    selected_row: usize,
    selected_col: usize,
    help_visible: bool,
    status_token: u64,
}

pub fn run_app(state: &mut AppState) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();
    refresh_view_data(state, &mut view_data);
    info!(items = state.store.len(), "terminal session started");

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(POLL_INTERVAL).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) => {
                if handle_key_event(state, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    info!(items = state.store.len(), "terminal session ended");
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn bump_status_token(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>) {
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    bump_status_token(view_data, internal_tx);
}

fn dispatch_and_refresh(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    if events.iter().any(AppEvent::invalidates_view) {
        refresh_view_data(state, view_data);
    }
    for event in &events {
        match event {
            AppEvent::ItemAdded(id) | AppEvent::ItemUpdated(id) => select_row_for(view_data, *id),
            AppEvent::StatusUpdated(_) => bump_status_token(view_data, internal_tx),
            _ => {}
        }
    }
}

fn refresh_view_data(state: &AppState, view_data: &mut ViewData) {
    view_data.rows = state.visible_items().iter().map(|item| item.id).collect();
    view_data.selected_row = view_data
        .selected_row
        .min(view_data.rows.len().saturating_sub(1));
}

fn select_row_for(view_data: &mut ViewData, id: ItemId) {
    if let Some(index) = view_data.rows.iter().position(|row| *row == id) {
        view_data.selected_row = index;
    }
}

fn selected_id(view_data: &ViewData) -> Option<ItemId> {
    view_data.rows.get(view_data.selected_row).copied()
}

fn selected_column(view_data: &ViewData) -> TableColumn {
    TableColumn::ALL[view_data.selected_col.min(TableColumn::ALL.len() - 1)]
}

fn handle_key_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    match state.mode {
        AppMode::Nav => handle_nav_key(state, view_data, internal_tx, key),
        AppMode::Form => {
            handle_form_key(state, view_data, internal_tx, key);
            false
        }
        AppMode::Edit => {
            handle_edit_key(state, view_data, internal_tx, key);
            false
        }
    }
}

fn handle_nav_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
        (KeyCode::Char('?'), _) => view_data.help_visible = true,
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => move_row(view_data, 1),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => move_row(view_data, -1),
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => move_col(view_data, -1),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => move_col(view_data, 1),
        (KeyCode::Char('g'), _) => view_data.selected_row = 0,
        (KeyCode::Char('G'), _) => {
            view_data.selected_row = view_data.rows.len().saturating_sub(1);
        }
        (KeyCode::Char('f'), KeyModifiers::NONE) | (KeyCode::Tab, _) => {
            dispatch_and_refresh(state, view_data, internal_tx, AppCommand::NextCategory);
        }
        (KeyCode::Char('b'), KeyModifiers::NONE) | (KeyCode::BackTab, _) => {
            dispatch_and_refresh(state, view_data, internal_tx, AppCommand::PrevCategory);
        }
        (KeyCode::Char('s'), KeyModifiers::NONE) => {
            let column = selected_column(view_data);
            match column.sort_key() {
                Some(sort_key) => {
                    let command = AppCommand::SortBy(sort_key);
                    dispatch_and_refresh(state, view_data, internal_tx, command);
                }
                None => {
                    debug!(column = column.label(), "sort ignored on unsortable column");
                    emit_status(
                        state,
                        view_data,
                        internal_tx,
                        format!("{} column is not sortable", column.label()),
                    );
                }
            }
        }
        (KeyCode::Char('S'), _) => {
            dispatch_and_refresh(state, view_data, internal_tx, AppCommand::ClearSort);
        }
        (KeyCode::Char('a'), KeyModifiers::NONE) => {
            dispatch_and_refresh(state, view_data, internal_tx, AppCommand::OpenAddForm);
        }
        (KeyCode::Char('e'), KeyModifiers::NONE) | (KeyCode::Enter, _) => {
            if let Some(id) = selected_id(view_data) {
                dispatch_and_refresh(state, view_data, internal_tx, AppCommand::BeginEdit(id));
                if state.mode == AppMode::Edit
                    && let Some(field) = selected_column(view_data).field()
                {
                    state.edit_field = field;
                }
            }
        }
        (KeyCode::Char('d'), KeyModifiers::NONE) => {
            if let Some(id) = selected_id(view_data) {
                dispatch_and_refresh(state, view_data, internal_tx, AppCommand::Delete(id));
            }
        }
        _ => {}
    }
    false
}

fn handle_form_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let field = state.form_field;
    let command = match key.code {
        KeyCode::Esc => AppCommand::CloseAddForm,
        KeyCode::Enter => AppCommand::SubmitAddForm,
        KeyCode::Tab | KeyCode::Down => AppCommand::FocusField(1),
        KeyCode::BackTab | KeyCode::Up => AppCommand::FocusField(-1),
        KeyCode::Left if field == ItemField::Category => AppCommand::CycleFormCategory(-1),
        KeyCode::Right if field == ItemField::Category => AppCommand::CycleFormCategory(1),
        _ => {
            let Some(text) = edited_text(&state.add_form, field, key) else {
                return;
            };
            AppCommand::SetFormField(field, text)
        }
    };
    dispatch_and_refresh(state, view_data, internal_tx, command);
}

fn handle_edit_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let field = state.edit_field;
    let command = match key.code {
        KeyCode::Esc => AppCommand::CancelEdit,
        KeyCode::Enter => AppCommand::CommitEdit,
        KeyCode::Tab | KeyCode::Down => AppCommand::FocusField(1),
        KeyCode::BackTab | KeyCode::Up => AppCommand::FocusField(-1),
        KeyCode::Left if field == ItemField::Category => AppCommand::CycleEditCategory(-1),
        KeyCode::Right if field == ItemField::Category => AppCommand::CycleEditCategory(1),
        _ => {
            let Some(scratch) = state.edit.scratch() else {
                return;
            };
            let Some(text) = edited_text(scratch, field, key) else {
                return;
            };
            AppCommand::SetEditField(field, text)
        }
    };
    dispatch_and_refresh(state, view_data, internal_tx, command);
}

/// New raw text for `field` after a typing key, or `None` when the key does
/// not edit text. The category field only changes through Left/Right.
fn edited_text(draft: &ItemDraft, field: ItemField, key: KeyEvent) -> Option<String> {
    if field == ItemField::Category {
        return None;
    }
    let mut text = draft.field_text(field).to_owned();
    match key.code {
        KeyCode::Backspace => {
            text.pop()?;
        }
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            text.push(ch);
        }
        _ => return None,
    }
    Some(text)
}

fn move_row(view_data: &mut ViewData, delta: isize) {
    let row_count = view_data.rows.len();
    if row_count == 0 {
        view_data.selected_row = 0;
        return;
    }

    let current = view_data.selected_row;
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize)
    };
    view_data.selected_row = next.min(row_count - 1);
}

fn move_col(view_data: &mut ViewData, delta: isize) {
    let current = view_data.selected_col;
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize)
    };
    view_data.selected_col = next.min(TableColumn::ALL.len() - 1);
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected = CategoryFilter::ALL
        .iter()
        .position(|filter| *filter == state.filter)
        .unwrap_or(0);
    let titles = CategoryFilter::ALL
        .iter()
        .map(|filter| format!(" {} ", filter.label()))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(titles)
        .block(Block::default().title("stockroom").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    render_table(frame, layout[1], state, view_data);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if state.mode == AppMode::Form {
        let area = centered_rect(50, 45, frame.area());
        frame.render_widget(Clear, area);
        let form = Paragraph::new(render_form_text(&state.add_form, state.form_field))
            .block(Block::default().title("add item").borders(Borders::ALL));
        frame.render_widget(form, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let header = Row::new(TableColumn::ALL.iter().map(|column| {
        Cell::from(header_label(*column, state)).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let editing = state.edit.editing_id().zip(state.edit.scratch());
    let rows = view_data
        .rows
        .iter()
        .filter_map(|id| state.store.get(*id))
        .enumerate()
        .map(|(row_index, item)| {
            let selected_row = row_index == view_data.selected_row;
            let scratch = editing
                .filter(|(id, _)| *id == item.id)
                .map(|(_, scratch)| scratch);

            let cells = TableColumn::ALL
                .iter()
                .enumerate()
                .map(|(column_index, column)| {
                    let mut style = Style::default();
                    if item.is_low_stock() {
                        style = style.fg(Color::Red);
                    }
                    if selected_row {
                        style = style.bg(Color::DarkGray);
                    }

                    let text = match scratch {
                        Some(scratch) => {
                            let focused = column.field() == Some(state.edit_field);
                            if focused {
                                style = Style::default()
                                    .fg(Color::Black)
                                    .bg(Color::Yellow)
                                    .add_modifier(Modifier::BOLD);
                            }
                            scratch_cell_text(item, scratch, *column, focused)
                        }
                        None => {
                            if selected_row && column_index == view_data.selected_col {
                                style = Style::default()
                                    .fg(Color::Black)
                                    .bg(Color::Cyan)
                                    .add_modifier(Modifier::BOLD);
                            }
                            cell_text(item, *column)
                        }
                    };
                    Cell::from(text).style(style)
                })
                .collect::<Vec<_>>();
            Row::new(cells)
        });

    let widths = TableColumn::ALL.map(TableColumn::width);
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(table_title(state, view_data))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn header_label(column: TableColumn, state: &AppState) -> String {
    let mut label = column.label().to_owned();
    if let Some(direction) = column
        .sort_key()
        .and_then(|key| state.sort.direction_for(key))
    {
        label.push_str(match direction {
            SortDirection::Asc => " ↑",
            SortDirection::Desc => " ↓",
        });
    }
    label
}

fn cell_text(item: &Item, column: TableColumn) -> String {
    match column {
        TableColumn::Id => item.id.to_string(),
        TableColumn::Name => item.name.clone(),
        TableColumn::Category => item.category.as_str().to_owned(),
        TableColumn::Quantity if item.is_low_stock() => {
            format!("{} {LOW_STOCK_MARK}", item.quantity)
        }
        TableColumn::Quantity => item.quantity.to_string(),
        TableColumn::Price => price_cell(item.price_cents),
    }
}

fn scratch_cell_text(
    item: &Item,
    scratch: &ItemDraft,
    column: TableColumn,
    focused: bool,
) -> String {
    let Some(field) = column.field() else {
        return item.id.to_string();
    };
    let text = scratch.field_text(field);
    match (field, focused) {
        (ItemField::Category, true) => format!("< {text} >"),
        (_, true) => format!("{text}_"),
        _ => text.to_owned(),
    }
}

fn price_cell(cents: i64) -> String {
    format_money(cents).replacen('$', "", 1)
}

fn table_title(state: &AppState, view_data: &ViewData) -> String {
    let low_stock = view_data
        .rows
        .iter()
        .filter_map(|id| state.store.get(*id))
        .filter(|item| item.is_low_stock())
        .count();
    format!(
        "items {}/{} | low stock {low_stock}",
        view_data.rows.len(),
        state.store.len()
    )
}

fn render_form_text(draft: &ItemDraft, focused: ItemField) -> String {
    let mut lines = ItemField::ALL
        .iter()
        .map(|field| {
            let marker = if *field == focused { ">" } else { " " };
            let value = draft.field_text(*field);
            match (*field, *field == focused) {
                (ItemField::Category, true) => format!("{marker} {}: < {value} >", field.label()),
                (_, true) => format!("{marker} {}: {value}_", field.label()),
                _ => format!("{marker} {}: {value}", field.label()),
            }
        })
        .collect::<Vec<_>>();
    lines.push(String::new());
    lines.push("tab/shift+tab field | left/right category | enter add | esc cancel".to_owned());
    lines.join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }

    let (mode, hints) = match state.mode {
        AppMode::Nav => (
            "NAV",
            "j/k/h/l g/G | f/b category | s/S sort | a add | e edit | d del | ? help | q",
        ),
        AppMode::Form => ("FORM", "tab field | enter add | esc cancel"),
        AppMode::Edit => (
            "EDIT",
            "tab field | left/right category | enter save | esc cancel",
        ),
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit\n\
nav: j/k/up/down row | h/l/left/right column | g/G first/last row\n\
nav: f/b or tab/shift+tab category | s sort column (again to flip) | S clear sort\n\
nav: a add | e/enter edit row | d delete row | ? help | q quit\n\
form/edit: tab/shift+tab field | left/right category | backspace erase\n\
form/edit: enter add/save | esc cancel\n\
rows in red have fewer than 10 units"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

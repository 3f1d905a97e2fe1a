use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use panscroll_protocol::{NavGeometry, Rect as PxRect, ViewportMode};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph},
};

use crate::app::{Action, App};
use crate::host::{PX_PER_COL, PX_PER_ROW};

const FRAME: Duration = Duration::from_millis(16);
const IDLE_FRAME: Duration = Duration::from_millis(50);
const SCROLL_ROWS: i32 = 3;
const LOGO: &str = " panscroll ";

const SECTION_COLORS: [Color; 5] = [
    Color::Rgb(40, 44, 52),
    Color::Rgb(52, 40, 60),
    Color::Rgb(36, 56, 48),
    Color::Rgb(60, 48, 36),
    Color::Rgb(36, 48, 64),
];

pub fn run(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    restoring(
        || {
            execute!(stdout(), EnterAlternateScreen)?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
            event_loop(&mut terminal, app)?;
            app.shutdown(Instant::now());
            Ok(())
        },
        || {
            disable_raw_mode()?;
            execute!(stdout(), LeaveAlternateScreen, cursor::Show)?;
            Ok(())
        },
    )
}

/// Run `body`, then `restore` whether or not `body` failed. The body's error
/// wins over the restore's.
fn restoring<T>(
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let size = terminal.size()?;
    app.resize(size.width, size.height, Instant::now());

    loop {
        app.tick(Instant::now());
        terminal.draw(|frame| draw(frame, app))?;

        let timeout = if app.page.is_animating() {
            FRAME
        } else {
            IDLE_FRAME
        };
        if event::poll(timeout)? {
            let now = Instant::now();
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.code == KeyCode::Char('q') {
                        return Ok(());
                    }
                    app.handle(action_for(key.code), now);
                }
                Event::Resize(cols, rows) => app.resize(cols, rows, now),
                _ => {}
            }
        }
    }
}

fn action_for(code: KeyCode) -> Action {
    match code {
        KeyCode::Down | KeyCode::Char('j') => Action::Scroll(SCROLL_ROWS),
        KeyCode::Up | KeyCode::Char('k') => Action::Scroll(-SCROLL_ROWS),
        KeyCode::PageDown => Action::Scroll(SCROLL_ROWS * 5),
        KeyCode::PageUp => Action::Scroll(-SCROLL_ROWS * 5),
        KeyCode::Right | KeyCode::Char('n') => Action::Next,
        KeyCode::Left | KeyCode::Char('p') => Action::Prev,
        KeyCode::Home | KeyCode::Char('h') => Action::Home,
        KeyCode::Char(' ') => Action::TogglePlay,
        KeyCode::Char('m') => Action::ToggleMenu,
        KeyCode::Esc => Action::Escape,
        KeyCode::Char(c) => match c.to_digit(10) {
            Some(d) => Action::Select(d as usize),
            None => Action::OtherKey,
        },
        _ => Action::OtherKey,
    }
}

/// Clip a page-space pixel rectangle to a terminal area.
fn to_cells(x: f64, y: f64, w: f64, h: f64, area: Rect) -> Option<Rect> {
    let left = (x / PX_PER_COL).round();
    let top = (y / PX_PER_ROW).round();
    let right = ((x + w) / PX_PER_COL).round();
    let bottom = ((y + h) / PX_PER_ROW).round();

    let clip_left = left.max(f64::from(area.left()));
    let clip_top = top.max(f64::from(area.top()));
    let clip_right = right.min(f64::from(area.right()));
    let clip_bottom = bottom.min(f64::from(area.bottom()));
    if clip_right <= clip_left || clip_bottom <= clip_top {
        return None;
    }
    Some(Rect::new(
        clip_left as u16,
        clip_top as u16,
        (clip_right - clip_left) as u16,
        (clip_bottom - clip_top) as u16,
    ))
}

fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    draw_strip(frame, app, area);
    draw_header(frame, app, area);
    draw_indicator(frame, app, area);
    if app.page.menu_open {
        draw_menu(frame, app, area);
    }
}

fn draw_strip(frame: &mut Frame, app: &App, area: Rect) {
    let viewport = app.page.viewport;
    let panned = app.engine.mode() == ViewportMode::Panned;

    for (i, section) in app.engine.sections().iter().enumerate() {
        let (x, y) = if panned {
            (i as f64 * viewport.width + app.page.strip_x, 0.0)
        } else {
            (0.0, i as f64 * viewport.height - app.page.scroll_y)
        };
        let Some(cells) = to_cells(x, y, viewport.width, viewport.height, area) else {
            continue;
        };
        let bg = SECTION_COLORS[i % SECTION_COLORS.len()];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(bg));
        let body = Paragraph::new(vec![
            Line::default(),
            Line::default(),
            Line::from(Span::styled(
                format!("  {}", section.code),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                format!("  {}", section.display_name),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .block(block);
        frame.render_widget(body, cells);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    if area.height < 2 {
        return;
    }
    let header = Rect::new(area.x, area.y, area.width, 1);
    let bar_col = LOGO.len() as u16 + 1;

    let mut spans = vec![Span::styled(
        LOGO,
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw(" "));

    // Link rectangles in page pixels, relative layout mirrors the spans.
    let links = app.engine.header_links();
    let mut link_rects = vec![None; app.engine.sections().len()];
    let mut col = bar_col;
    for link in &links {
        let text = format!(" {} ", link.label);
        let width = text.chars().count() as u16;
        if let Some(slot) = link_rects.get_mut(link.index) {
            *slot = Some(PxRect::new(
                f64::from(col) * PX_PER_COL,
                0.0,
                f64::from(width) * PX_PER_COL,
                PX_PER_ROW,
            ));
        }
        let style = if link.active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(text, style));
        col += width;
    }

    let status = format!(
        " {} {}",
        app.engine.mode(),
        if app.engine.is_playing() { "▶" } else { "" }
    );
    spans.push(Span::styled(status, Style::default().fg(Color::DarkGray)));
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black)),
        header,
    );

    let nav = NavGeometry {
        bar: Some(PxRect::new(
            f64::from(bar_col) * PX_PER_COL,
            0.0,
            f64::from(col.saturating_sub(bar_col)) * PX_PER_COL,
            PX_PER_ROW,
        )),
        links: link_rects,
    };
    let underline = app.engine.underline(&nav);
    let underline_row = Rect::new(area.x, area.y + 1, area.width, 1);
    frame.render_widget(Clear, underline_row);
    if underline.is_visible() {
        let left = f64::from(bar_col) * PX_PER_COL + underline.left;
        let top = f64::from(underline_row.y) * PX_PER_ROW;
        if let Some(cells) = to_cells(left, top, underline.width, PX_PER_ROW, underline_row) {
            let bar = "▔".repeat(usize::from(cells.width));
            frame.render_widget(
                Paragraph::new(bar).style(Style::default().fg(Color::Yellow)),
                cells,
            );
        }
    }
}

fn draw_indicator(frame: &mut Frame, app: &App, area: Rect) {
    if area.height < 3 {
        return;
    }
    let view = app.engine.indicator();
    let row = Rect::new(area.x, area.bottom() - 1, area.width, 1);
    let prev = if view.can_go_prev { "‹" } else { " " };
    let next = if view.can_go_next { "›" } else { " " };
    let play = if view.playing { "❚❚" } else { "▶" };
    let label = format!(
        "{prev} {} {} {play} {next}  {:>3.0}%",
        view.code,
        view.label,
        view.progress * 100.0
    );
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(view.progress)
        .label(label);
    frame.render_widget(gauge, row);
}

fn draw_menu(frame: &mut Frame, app: &App, area: Rect) {
    let items = app.engine.menu_items();
    let height = (items.len() as u16 * 2 + 2).min(area.height);
    let width = 36.min(area.width);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    let active = app.engine.active_index();

    let list: Vec<ListItem> = items
        .iter()
        .map(|item| {
            let style = if item.index == active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            let mut lines = vec![Line::from(Span::styled(
                format!(" {}  {}", item.index, item.display_name),
                style,
            ))];
            if item.separated {
                lines.push(Line::from(Span::styled(
                    "─".repeat(usize::from(width.saturating_sub(2))),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    frame.render_widget(Clear, popup);
    frame.render_widget(
        List::new(list).block(Block::bordered().title(" menu · esc to close ")),
        popup,
    );
}

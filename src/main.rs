use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap};

use scout_terminal::config::ScoutConfig;
use scout_terminal::console_log::ConsoleLogger;
use scout_terminal::dataset::{dataset_updated_on, load_descriptions, load_working_table};
use scout_terminal::filter::TextMatch;
use scout_terminal::state::{AppState, ExportKind, FilterField, FilterForm, MultiSelect, Screen, ScoutFocus, export_dir};
use scout_terminal::table::position_label;

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Scout,
            KeyCode::Char('2') => self.state.screen = Screen::Rankings,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc if self.state.help_overlay => self.state.help_overlay = false,
            _ => match self.state.screen {
                Screen::Scout => self.on_scout_key(key),
                Screen::Rankings => self.on_rankings_key(key),
            },
        }
    }

    fn on_scout_key(&mut self, key: KeyEvent) {
        let state = &mut self.state;
        match key.code {
            KeyCode::Enter => state.run_search(),
            KeyCode::Tab => state.toggle_focus(),
            KeyCode::Char('c') => state.clear_search(),
            KeyCode::Char('n') => state.next_page(),
            KeyCode::Char('p') => state.prev_page(),
            KeyCode::Char('e') => {
                state.export_results(ExportKind::Csv, &export_dir(), Local::now().date_naive());
            }
            KeyCode::Char('x') => {
                state.export_results(ExportKind::Xlsx, &export_dir(), Local::now().date_naive());
            }
            _ if state.focus == ScoutFocus::Results => match key.code {
                KeyCode::Char('j') | KeyCode::Down => state.select_result_next(),
                KeyCode::Char('k') | KeyCode::Up => state.select_result_prev(),
                KeyCode::Char('o') => state.toggle_sheet(),
                KeyCode::Esc => state.sheet_open = false,
                _ => {}
            },
            KeyCode::Char('j') | KeyCode::Down => state.form.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => state.form.move_cursor(-1),
            KeyCode::Char('l') | KeyCode::Right => state.form.adjust(1, false),
            KeyCode::Char('h') | KeyCode::Left => state.form.adjust(-1, false),
            KeyCode::Char('L') => state.form.adjust(1, true),
            KeyCode::Char('H') => state.form.adjust(-1, true),
            KeyCode::Char(' ') => state.form.toggle_option(),
            KeyCode::Char('m') => state.form.toggle_text_match(),
            _ => {}
        }
    }

    fn on_rankings_key(&mut self, key: KeyEvent) {
        let state = &mut self.state;
        match key.code {
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('j') | KeyCode::Down => {
                state.cycle_rank_attribute(1)
            }
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('k') | KeyCode::Up => {
                state.cycle_rank_attribute(-1)
            }
            KeyCode::Char('t') => state.cycle_top_n(),
            KeyCode::Char('+') | KeyCode::Char('=') => state.adjust_min_minutes(1),
            KeyCode::Char('-') => state.adjust_min_minutes(-1),
            _ => {}
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cfg = ScoutConfig::from_env();
    let (log_tx, log_rx) = mpsc::channel();
    ConsoleLogger::channel(log_tx, cfg.log_level).install();

    let loaded = load_working_table(&cfg);
    let descriptions = load_descriptions(&cfg.descriptions_path, cfg.descriptions_delimiter);
    let data_date = if cfg.demo {
        None
    } else {
        dataset_updated_on(&cfg.data_path)
    };
    let mut app = App::new(AppState::new(loaded, descriptions, data_date, &cfg));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, log_rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    logs: mpsc::Receiver<String>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(line) = logs.try_recv() {
            app.state.push_log(line);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    if let Some(err) = &app.state.load_error {
        let msg = Paragraph::new(format!("{err}\n\nSet SCOUT_DATA_PATH or SCOUT_DEMO=1 and restart."))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Dataset").borders(Borders::ALL));
        frame.render_widget(msg, chunks[1]);
    } else {
        match app.state.screen {
            Screen::Scout => render_scout(frame, chunks[1], &app.state),
            Screen::Rankings => render_rankings(frame, chunks[1], &app.state),
        }
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Scout => format!("SCOUT | {}", state.session.status_line()),
        Screen::Rankings => match state.rankings.attribute() {
            Some(attr) => format!(
                "RANKINGS | {attr} | Top {} | Min minutes {:.0}",
                state.rankings.top_n(),
                state.rankings.min_minutes
            ),
            None => "RANKINGS | no numeric attributes".to_string(),
        },
    };
    let updated = match &state.data_date {
        Some(date) => format!("Data updated on {date}"),
        None => "Data date not available".to_string(),
    };
    format!(
        " (o)  {title}\n /|\\  {} players | {} attributes | {updated}\n / \\",
        state.table.len(),
        state.catalog.len()
    )
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Scout => match state.focus {
            ScoutFocus::Filters => {
                "1 Scout | 2 Rankings | j/k Field | h/l Adjust | H/L Lower | Space Toggle | m Match | Enter Search | Tab Results | c Clear | ? Help | q Quit".to_string()
            }
            ScoutFocus::Results => {
                "1 Scout | 2 Rankings | j/k Player | o Sheet | n/p Page | e CSV | x XLSX | Tab Filters | c Clear | ? Help | q Quit".to_string()
            }
        },
        Screen::Rankings => {
            "1 Scout | 2 Rankings | h/l Attribute | t Top N | +/- Min minutes | ? Help | q Quit".to_string()
        }
    }
}

fn render_scout(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_filter_form(frame, columns[0], state);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(columns[1]);

    render_results(frame, right[0], state);
    if state.sheet_open {
        render_player_sheet(frame, right[1], state);
    } else {
        let help = state
            .focused_description()
            .unwrap_or("Move to an attribute slider to see its description.");
        let desc = Paragraph::new(help)
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Attribute").borders(Borders::ALL));
        frame.render_widget(desc, right[1]);
    }
}

fn render_filter_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let form = &state.form;
    let focused = state.focus == ScoutFocus::Filters;
    let title = format!("Filters [{}]", match_label(form.text_match));
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = form.fields();
    let visible = inner.height as usize;
    let (start, end) = visible_range(form.cursor, fields.len(), visible);
    let lines: Vec<Line> = fields[start..end]
        .iter()
        .enumerate()
        .map(|(offset, field)| {
            let idx = start + offset;
            let style = if focused && idx == form.cursor {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            Line::styled(field_text(form, *field), style)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn field_text(form: &FilterForm, field: FilterField) -> String {
    match field {
        FilterField::AgeMin => format!("Age from      {}", form.age.0),
        FilterField::AgeMax => format!("Age to        {}", form.age.1),
        FilterField::Nationality => select_text("Nationality", &form.nationality),
        FilterField::Position => select_text("Position", &form.position),
        FilterField::Club => select_text("Club", &form.club),
        FilterField::Slider(idx) => match form.sliders.get(idx) {
            Some(s) if s.is_default() => format!("{:<28} any (0-{})", truncate(&s.label, 28), fmt_num(s.max)),
            Some(s) => format!(
                "{:<28} {}-{}",
                truncate(&s.label, 28),
                fmt_num(s.lo),
                fmt_num(s.hi)
            ),
            None => String::new(),
        },
    }
}

fn select_text(name: &str, select: &MultiSelect) -> String {
    let current = select.current().unwrap_or("-");
    let mark = if select.selected.contains(&select.cursor) {
        "x"
    } else {
        " "
    };
    format!(
        "{name:<13} <[{mark}] {current}> | {}",
        truncate(&select.summary(), 30)
    )
}

fn render_results(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == ScoutFocus::Results;
    let title = if state.session.total_pages() > 0 {
        format!(
            "Results | Page {} of {}",
            state.session.page.index + 1,
            state.session.total_pages()
        )
    } else {
        "Results".to_string()
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = state.page_rows();
    if rows.is_empty() {
        let empty = Paragraph::new(state.session.status_line())
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let mut lines = vec![Line::styled(
        format!("{:<24} {:<18} {:<4} {:<14} {}", "PLAYER", "TEAM", "AGE", "POS", "NATION"),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for (i, row) in rows.iter().enumerate() {
        let Some(p) = state.table.row(*row) else {
            continue;
        };
        let style = if focused && i == state.result_selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::styled(
            format!(
                "{:<24} {:<18} {:<4} {:<14} {}",
                truncate(&p.name, 24),
                truncate(&p.team, 18),
                p.age,
                position_label(p.general_position),
                p.nationality
            ),
            style,
        ));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_player_sheet(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(player) = state.selected_player() else {
        return;
    };
    let mut text = format!(
        "{} | {} | {} | age {} | {}\n",
        player.name, player.team, player.position, player.age, player.nationality
    );
    let sections = state.selected_sheet();
    if sections.is_empty() {
        text.push_str("\nNo recorded statistics");
    }
    for section in sections {
        text.push_str(&format!("\n{}\n", section.category));
        for (label, value) in section.stats {
            text.push_str(&format!("  {label:<30} {}\n", fmt_num(value)));
        }
    }
    let sheet = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Player sheet").borders(Borders::ALL));
    frame.render_widget(sheet, area);
}

fn render_rankings(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let view = &state.rankings;
    let Some(ranking) = &view.result else {
        let msg = view
            .error
            .clone()
            .unwrap_or_else(|| "No ranking available".to_string());
        let empty = Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Top players").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let chart_block = Block::default()
        .title(format!("Top {} by {}", view.top_n(), ranking.attribute))
        .borders(Borders::ALL);
    if ranking.top.is_empty() {
        let empty = Paragraph::new("No players meet the minutes threshold")
            .style(Style::default().fg(Color::DarkGray))
            .block(chart_block);
        frame.render_widget(empty, columns[0]);
    } else {
        let bars: Vec<Bar> = ranking
            .top
            .iter()
            .map(|p| {
                Bar::default()
                    .value((p.value.max(0.0) * 100.0).round() as u64)
                    .label(Line::from(format!("{} ({})", truncate(&p.player, 20), truncate(&p.team, 14))))
                    .text_value(fmt_num(p.value))
                    .style(Style::default().fg(Color::Green))
            })
            .collect();
        let chart = BarChart::default()
            .block(chart_block)
            .data(BarGroup::default().bars(&bars))
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .value_style(Style::default().fg(Color::Black).bg(Color::Green));
        frame.render_widget(chart, columns[0]);
    }

    let mut text = format!(
        "Eligible players: {} (min {:.0} minutes)\n\n{:<12} {:>5} {:>8} {:>8} {:>8} {:>8}\n",
        ranking.eligible, ranking.min_minutes, "POSITION", "N", "MEAN", "MEDIAN", "MIN", "MAX"
    );
    for stats in &ranking.position_stats {
        text.push_str(&format!(
            "{:<12} {:>5} {:>8} {:>8} {:>8} {:>8}\n",
            position_label(stats.position),
            stats.count,
            fmt_num(stats.mean),
            fmt_num(stats.median),
            fmt_num(stats.min),
            fmt_num(stats.max)
        ));
    }
    text.push('\n');
    text.push_str(state.descriptions.get(&ranking.attribute));
    let panel = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().title("By position").borders(Borders::ALL));
    frame.render_widget(panel, columns[1]);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn match_label(mode: TextMatch) -> &'static str {
    match mode {
        TextMatch::Substring => "contains",
        TextMatch::Token => "exact",
    }
}

fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn truncate(raw: &str, max: usize) -> String {
    if raw.chars().count() <= max {
        return raw.to_string();
    }
    let mut out: String = raw.chars().take(max.saturating_sub(1)).collect();
    out.push('~');
    out
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Scout Terminal - Help",
        "",
        "Global:",
        "  1 / 2        Scout / Rankings",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Scout filters:",
        "  j/k          Move between fields",
        "  h/l          Adjust value, upper bound or option",
        "  H/L          Adjust lower bound of a slider",
        "  Space        Toggle the highlighted option",
        "  m            Contains / exact matching",
        "  Enter        Search",
        "  c            Clear filters and results",
        "",
        "Scout results:",
        "  Tab          Switch filters/results",
        "  j/k          Move selection",
        "  o            Open/close player sheet",
        "  n/p          Next/previous page",
        "  e / x        Export CSV / XLSX",
        "",
        "Rankings:",
        "  h/l          Previous/next attribute",
        "  t            Cycle top N",
        "  + / -        Minimum minutes",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

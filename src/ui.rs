use color_eyre::eyre::Result;
use crossterm::event::{
    Event,
    EventStream,
    KeyCode,
    KeyEvent,
    KeyEventKind,
    KeyModifiers,
};
use crossterm::terminal::{
    disable_raw_mode,
    enable_raw_mode,
};
use futures::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::*;
use seven_dice::{
    BetSelection,
    Choice,
    Die,
    GameConfig,
    GameView,
    Renderer,
    Verdict,
    history::RoundRecord,
    render::{
        ResultStyle,
        pip_rows,
    },
};
use std::io::stdout;

const MAX_NOTICES: usize = 50;
const MAX_INPUT_LEN: usize = 20;
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub enum UserEvent {
    Quit,
    Redraw,
    Deposit(String),
    Withdraw(String),
    SelectBet(BetSelection),
    CustomBet(String),
    Play(Choice),
}

#[derive(Debug)]
pub struct UiState {
    mode: Mode,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
    last_view: Option<GameView>,
    bet_presets: Vec<u64>,
    rules_line: String,
    notices: Vec<String>,
    spinner: usize,
}

impl UiState {
    pub fn new(config: &GameConfig) -> Self {
        let rules = &config.rules;
        let rules_line = format!(
            "Limits: {}-{}{} | Payouts: under {} equal {} over {}",
            rules.min_bet,
            rules.max_bet,
            if rules.strict_limits { " (strict)" } else { "" },
            rules.payouts.under,
            rules.payouts.equal,
            rules.payouts.over,
        );
        UiState {
            mode: Mode::Normal,
            terminal: None,
            last_view: None,
            bet_presets: config.bet_presets.clone(),
            rules_line,
            notices: Vec::new(),
            spinner: 0,
        }
    }

    pub fn advance_spinner(&mut self) {
        self.spinner = (self.spinner + 1) % SPINNER.len();
    }

    fn rolling(&self) -> bool {
        self.last_view.as_ref().is_some_and(|v| v.rolling)
    }

    fn push_notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
        if self.notices.len() > MAX_NOTICES {
            let drain = self.notices.len() - MAX_NOTICES;
            self.notices.drain(0..drain);
        }
    }

    fn draw(&mut self) -> Result<()> {
        let Some(view) = self.last_view.clone() else {
            return Ok(());
        };
        if let Some(mut term) = self.terminal.take() {
            let res = term.draw(|f| ui(f, self, &view)).map(drop);
            self.terminal = Some(term);
            res?;
        }
        Ok(())
    }

    /// Maps a key press to a game event given the current mode. `None` means
    /// the key is ignored.
    fn handle_key(&mut self, key: KeyEvent) -> Option<UserEvent> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
        {
            return Some(UserEvent::Quit);
        }
        match &mut self.mode {
            Mode::Prompt(prompt) => match key.code {
                KeyCode::Esc => {
                    self.mode = Mode::Normal;
                    Some(UserEvent::Redraw)
                }
                KeyCode::Enter => {
                    let input = std::mem::take(&mut prompt.input);
                    let kind = prompt.kind;
                    self.mode = Mode::Normal;
                    Some(match kind {
                        PromptKind::Deposit => UserEvent::Deposit(input),
                        PromptKind::Withdraw => UserEvent::Withdraw(input),
                        PromptKind::Bet => UserEvent::CustomBet(input),
                    })
                }
                KeyCode::Backspace => {
                    prompt.input.pop();
                    Some(UserEvent::Redraw)
                }
                KeyCode::Char(c) if prompt.input.len() < MAX_INPUT_LEN => {
                    prompt.input.push(c);
                    Some(UserEvent::Redraw)
                }
                _ => None,
            },
            Mode::Alert(_) => {
                self.mode = Mode::Normal;
                Some(UserEvent::Redraw)
            }
            Mode::QuitModal => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Some(UserEvent::Quit),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.mode = Mode::Normal;
                    Some(UserEvent::Redraw)
                }
                _ => None,
            },
            Mode::Normal => self.handle_normal_key(key.code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> Option<UserEvent> {
        if let KeyCode::Char('q') | KeyCode::Esc = code {
            self.mode = Mode::QuitModal;
            return Some(UserEvent::Redraw);
        }
        // Everything else is disabled until the dice land.
        if self.rolling() {
            return None;
        }
        let event = match code {
            KeyCode::Char('d') => self.open_prompt(PromptKind::Deposit),
            KeyCode::Char('w') => self.open_prompt(PromptKind::Withdraw),
            KeyCode::Char('b') => self.open_prompt(PromptKind::Bet),
            KeyCode::Char('n') => UserEvent::SelectBet(BetSelection::Min),
            KeyCode::Char('x') => UserEvent::SelectBet(BetSelection::Max),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c.to_digit(10).map(|d| d as usize - 1)?;
                let amount = self.bet_presets.get(idx)?;
                UserEvent::SelectBet(BetSelection::Amount(*amount))
            }
            KeyCode::Char('u') => UserEvent::Play(Choice::Under),
            KeyCode::Char('e') => UserEvent::Play(Choice::Equal),
            KeyCode::Char('o') => UserEvent::Play(Choice::Over),
            _ => return None,
        };
        Some(event)
    }

    fn open_prompt(&mut self, kind: PromptKind) -> UserEvent {
        self.mode = Mode::Prompt(PromptState {
            kind,
            input: String::new(),
        });
        UserEvent::Redraw
    }
}

impl Renderer for UiState {
    fn render(&mut self, view: &GameView) -> Result<()> {
        self.last_view = Some(view.clone());
        self.draw()
    }

    fn alert(&mut self, message: &str) -> Result<()> {
        self.push_notice(message);
        self.mode = Mode::Alert(message.to_string());
        self.draw()
    }
}

#[derive(Clone, Debug, Default)]
enum Mode {
    #[default]
    Normal,
    Prompt(PromptState),
    Alert(String),
    QuitModal,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum PromptKind {
    Deposit,
    Withdraw,
    Bet,
}

impl PromptKind {
    fn title(self) -> &'static str {
        match self {
            PromptKind::Deposit => "Deposit",
            PromptKind::Withdraw => "Withdraw",
            PromptKind::Bet => "Bet Amount",
        }
    }
}

#[derive(Clone, Debug)]
struct PromptState {
    kind: PromptKind,
    input: String,
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    // Single persistent Terminal so buffers survive across draws
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
    Ok(())
}

pub async fn next_event(state: &mut UiState, events: &mut EventStream) -> Result<UserEvent> {
    loop {
        let Some(event) = events.next().await else {
            return Ok(UserEvent::Quit);
        };
        match event? {
            Event::Key(k) => {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(ev) = state.handle_key(k) {
                    return Ok(ev);
                }
            }
            Event::Resize(_, _) => return Ok(UserEvent::Redraw),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, state: &UiState, view: &GameView) {
    f.render_widget(Clear, f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // status
            Constraint::Length(7), // dice
            Constraint::Length(4), // result
            Constraint::Min(6),    // history + notices
            Constraint::Length(3), // help
        ])
        .split(f.area());

    draw_top(f, chunks[0], state, view);
    draw_dice(f, chunks[1], state, view);
    draw_result(f, chunks[2], view);
    draw_lower(f, chunks[3], state, view);
    draw_help(f, chunks[4], view);
    draw_modals(f, state);
}

fn draw_top(f: &mut Frame, area: Rect, state: &UiState, view: &GameView) {
    let status = Paragraph::new(format!(
        "Balance: {} {} | Bet: {}\n{}\n{}",
        view.balance, view.currency, view.current_bet, state.rules_line, view.status
    ))
    .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn draw_dice(f: &mut Frame, area: Rect, state: &UiState, view: &GameView) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Min(10),
        ])
        .split(area);
    let face_style = if view.rolling {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    for (rect, die) in [(cols[0], view.dice.first), (cols[1], view.dice.second)] {
        f.render_widget(die_widget(die, face_style), rect);
    }
    let total = if view.rolling {
        format!("Rolling {}", SPINNER[state.spinner])
    } else {
        match view.total {
            Some(total) => format!("Total: {total}"),
            None => String::from("Total: -"),
        }
    };
    let total = Paragraph::new(vec![Line::from(""), Line::styled(total, face_style)])
        .block(Block::default().borders(Borders::ALL).title("Sum vs 7"));
    f.render_widget(total, cols[2]);
}

fn die_widget(die: Die, style: Style) -> Paragraph<'static> {
    let lines: Vec<Line> = pip_rows(die)
        .iter()
        .map(|row| Line::styled(*row, style))
        .collect();
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(format!("{die}")),
        )
}

fn draw_result(f: &mut Frame, area: Rect, view: &GameView) {
    let mut lines = Vec::new();
    if let Some(banner) = &view.result {
        let color = match banner.style {
            ResultStyle::Win => Color::Green,
            ResultStyle::Lose => Color::Red,
        };
        lines.push(Line::styled(
            banner.text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        if let Some(amount) = &banner.amount {
            lines.push(Line::styled(amount.clone(), Style::default().fg(color)));
        }
    }
    let result = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Result"));
    f.render_widget(result, area);
}

fn draw_lower(f: &mut Frame, area: Rect, state: &UiState, view: &GameView) {
    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let mut history_lines = Vec::new();
    if view.history.is_empty() {
        history_lines.push(Line::styled("None", Style::default().fg(Color::DarkGray)));
    } else {
        for record in &view.history {
            history_lines.push(history_line(record, &view.currency));
        }
    }
    let history = Paragraph::new(history_lines)
        .block(Block::default().borders(Borders::ALL).title("Recent Rounds"));
    f.render_widget(history, lower[0]);

    let mut notice_lines: Vec<Line> = Vec::new();
    if state.notices.is_empty() {
        notice_lines.push(Line::from("No notices"));
    } else {
        for n in state.notices.iter().rev().take(5) {
            notice_lines.push(Line::from(n.clone()));
        }
    }
    let color = if state.notices.is_empty() {
        Color::DarkGray
    } else {
        Color::Red
    };
    let notices = Paragraph::new(notice_lines)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title("Notices"));
    f.render_widget(notices, lower[1]);
}

fn history_line(record: &RoundRecord, currency: &str) -> Line<'static> {
    let (mark, color) = match record.verdict {
        Verdict::Win => ("W", Color::Green),
        Verdict::Lose => ("L", Color::DarkGray),
    };
    Line::styled(
        format!(
            "#{} {} {} {}+{}={} {} {:+} {} -> {}",
            record.round,
            record.resolved_at.format("%H:%M:%S"),
            record.choice,
            record.dice.first,
            record.dice.second,
            record.dice.total(),
            mark,
            record.net(),
            currency,
            record.balance_after,
        ),
        Style::default().fg(color),
    )
}

fn draw_help(f: &mut Frame, area: Rect, view: &GameView) {
    let enabled = Style::default();
    let disabled = Style::default().fg(Color::DarkGray);
    let actions = if view.rolling { disabled } else { enabled };
    let help = Paragraph::new(Line::from(vec![
        Span::styled("d deposit | w withdraw | n min | x max | 1-9 preset | b bet | ", actions),
        Span::styled("u under | e equal | o over", actions),
        Span::styled(" | q quit", enabled),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, area);
}

fn draw_modals(f: &mut Frame, state: &UiState) {
    match &state.mode {
        Mode::Prompt(prompt) => {
            let area = centered_rect(40, 25, f.area());
            let block = Block::default()
                .borders(Borders::ALL)
                .title(prompt.kind.title());
            let p = Paragraph::new(format!(
                "Amount: {}_\nEnter=confirm Esc=cancel",
                prompt.input
            ));
            f.render_widget(Clear, area);
            f.render_widget(block.clone(), area);
            f.render_widget(p, block.inner(area));
        }
        Mode::Alert(message) => {
            let area = centered_rect(40, 20, f.area());
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title("Notice");
            let p = Paragraph::new(format!("{message}\n\nPress any key"));
            f.render_widget(Clear, area);
            f.render_widget(block.clone(), area);
            f.render_widget(p, block.inner(area));
        }
        Mode::QuitModal => {
            let area = centered_rect(40, 20, f.area());
            let block = Block::default().borders(Borders::ALL).title("Confirm Quit");
            let p = Paragraph::new("Quit the game? (Y/N)");
            f.render_widget(Clear, area);
            f.render_widget(block.clone(), area);
            f.render_widget(p, block.inner(area));
        }
        Mode::Normal => {}
    }
}

fn centered_rect(w_percent: u16, h_percent: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h_percent) / 2),
            Constraint::Percentage(h_percent),
            Constraint::Percentage((100 - h_percent) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w_percent) / 2),
            Constraint::Percentage(w_percent),
            Constraint::Percentage((100 - w_percent) / 2),
        ])
        .split(popup_layout[1])[1]
}

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::config::{Config, KeyAction, KeyCombo, KeyContext};
use crate::demo::DemoScenario;
use crate::dialog::DialogProvider;
use crate::ui::components::theme::{SharedTheme, Theme, ThemeProvider};
use crate::ui::dialog_layer::DialogLayer;
use crate::ui::terminal_guard::TerminalGuard;

/// Events sent to the UI loop from background tasks
#[derive(Debug)]
pub enum AppEvent {
    Log(String),
}

/// Demo application hosting one dialog provider
pub struct App {
    config: Config,
    provider: DialogProvider,
    layer: DialogLayer,
    theme: Arc<SharedTheme>,
    log: Vec<String>,
    should_quit: bool,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    /// Must be called from within a tokio runtime.
    pub fn new(config: Config) -> Self {
        let theme = Arc::new(SharedTheme::new(Theme::default_dark()));
        if let Some(name) = config.theme_name.as_deref() {
            theme.load_by_name(name);
        }
        if !config.theme_overrides.is_empty() {
            if let Some(active) = theme.active_theme() {
                theme.set_theme(active.with_overrides(&config.theme_overrides));
            }
        }

        let provider = DialogProvider::mount(config.dialog.clone());
        let layer = DialogLayer::new(
            &provider,
            theme.clone(),
            Arc::new(config.keybindings.clone()),
        );
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            config,
            provider,
            layer,
            theme,
            log: Vec::new(),
            should_quit: false,
            event_tx,
            event_rx,
        }
    }

    /// Start a scenario on a background task.
    pub fn start_demo(&self, scenario: DemoScenario) {
        let broker = self.provider.broker();
        let event_tx = self.event_tx.clone();
        let (log_tx, mut log_rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            while let Some(line) = log_rx.recv().await {
                if event_tx.send(AppEvent::Log(line)).is_err() {
                    break;
                }
            }
        });
        tokio::spawn(async move {
            if let Err(e) = scenario.run(broker, log_tx).await {
                tracing::warn!(error = %e, "Demo scenario failed");
            }
        });
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut guard = TerminalGuard::enter()?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal).await;

        guard.leave()?;
        terminal.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(16)) => {
                    if event::poll(Duration::from_millis(0))? {
                        if let Event::Key(key) = event::read()? {
                            self.handle_key_event(key);
                        }
                    }
                }

                Some(event) = self.event_rx.recv() => {
                    match event {
                        AppEvent::Log(line) => self.log.push(line),
                    }
                }

                _ = self.layer.changed() => {}
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.layer.handle_key(&key) {
            return;
        }

        let context = if self.layer.is_open() {
            KeyContext::Dialog
        } else {
            KeyContext::App
        };
        let combo = KeyCombo::from_key_event(&key);
        match self.config.keybindings.get_action(&combo, context) {
            Some(KeyAction::Quit) => self.should_quit = true,
            Some(KeyAction::ToggleTheme) => self.theme.toggle(),
            _ => {}
        }
    }

    fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        let [log_area, footer_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let (text, muted, background) = match self.theme.active_theme() {
            Some(t) => (t.text_primary, t.text_muted, t.bg_base),
            None => Default::default(),
        };

        let visible = usize::from(log_area.height.saturating_sub(2));
        let start = self.log.len().saturating_sub(visible);
        let lines: Vec<Line> = self.log[start..].iter().map(|l| Line::raw(l.as_str())).collect();
        let log = Paragraph::new(lines)
            .style(Style::default().fg(text).bg(background))
            .block(
                Block::default()
                    .title(" dialog-broker demo ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(muted)),
            );
        f.render_widget(log, log_area);

        let footer = Paragraph::new(" q quit  t toggle theme")
            .style(Style::default().fg(muted).bg(background));
        f.render_widget(footer, footer_area);

        self.layer.render(area, f.buffer_mut());
    }
}

use color_eyre::Result;
use crossterm::{
    cursor,
    event::{
        Event as CrosstermEvent,
        EventStream,
        KeyEvent,
        KeyEventKind,
    },
    terminal::{
        disable_raw_mode,
        enable_raw_mode,
        is_raw_mode_enabled,
        EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use futures::StreamExt as _;
use ratatui::backend::CrosstermBackend;
use std::{
    io::{
        stdout,
        Stdout,
    },
    ops::{
        Deref,
        DerefMut,
    },
    time::Duration,
};
use tokio::{
    sync::mpsc::{
        self,
        UnboundedReceiver,
        UnboundedSender,
    },
    task::JoinHandle,
    time::interval,
};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug)]
pub(crate) enum Event {
    Init,
    Error,
    Tick,
    Render,
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Owns the terminal and turns crossterm input plus tick and render intervals into [`Event`]s.
pub struct Tui {
    pub terminal: ratatui::Terminal<CrosstermBackend<Stdout>>,
    task: JoinHandle<()>,
    cancellation_token: CancellationToken,
    event_rx: UnboundedReceiver<Event>,
    event_tx: UnboundedSender<Event>,
    frame_rate: f64,
    tick_rate: f64,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal: ratatui::Terminal::new(CrosstermBackend::new(stdout()))?,
            task: tokio::spawn(async {}),
            cancellation_token: CancellationToken::new(),
            event_rx,
            event_tx,
            frame_rate: 30.0,
            tick_rate: 4.0,
        })
    }

    pub fn tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    fn start(&mut self) {
        self.cancel();
        self.cancellation_token = CancellationToken::new();
        let event_loop = Self::event_loop(
            self.event_tx.clone(),
            self.cancellation_token.clone(),
            self.tick_rate,
            self.frame_rate,
        );
        self.task = tokio::spawn(event_loop);
    }

    async fn event_loop(
        event_tx: UnboundedSender<Event>,
        cancellation_token: CancellationToken,
        tick_rate: f64,
        frame_rate: f64,
    ) {
        let mut event_stream = EventStream::new();
        let mut tick_interval = interval(Duration::from_secs_f64(1.0 / tick_rate.max(0.1)));
        let mut render_interval = interval(Duration::from_secs_f64(1.0 / frame_rate.max(1.0)));

        if event_tx.send(Event::Init).is_err() {
            return;
        }
        loop {
            let event = tokio::select! {
                _ = cancellation_token.cancelled() => break,
                _ = tick_interval.tick() => Event::Tick,
                _ = render_interval.tick() => Event::Render,
                crossterm_event = event_stream.next() => match crossterm_event {
                    Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => Event::Key(key),
                    Some(Ok(CrosstermEvent::Resize(x, y))) => Event::Resize(x, y),
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => {
                        error!("Failed to read terminal event: {err}");
                        Event::Error
                    }
                    None => break,
                },
            };
            if event_tx.send(event).is_err() {
                break;
            }
        }
        cancellation_token.cancel();
    }

    pub fn stop(&self) -> Result<()> {
        self.cancel();
        let mut counter = 0;
        while !self.task.is_finished() {
            std::thread::sleep(Duration::from_millis(1));
            counter += 1;
            if counter > 50 {
                self.task.abort();
            }
            if counter > 100 {
                error!("Failed to abort task in 100 milliseconds for unknown reason");
                break;
            }
        }
        Ok(())
    }

    pub fn enter(&mut self) -> Result<()> {
        enable_raw_mode()?;
        crossterm::execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        self.start();
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stop()?;
        if is_raw_mode_enabled()? {
            self.flush()?;
            restore_terminal()?;
        }
        Ok(())
    }

    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    pub(crate) async fn next_event(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }
}

/// Leaves the alternate screen and raw mode. Safe to call from a panic hook.
pub(crate) fn restore_terminal() -> Result<()> {
    crossterm::execute!(stdout(), LeaveAlternateScreen, cursor::Show)?;
    disable_raw_mode()?;
    Ok(())
}

impl Deref for Tui {
    type Target = ratatui::Terminal<CrosstermBackend<Stdout>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(err) = self.exit() {
            error!("Failed to restore the terminal: {err}");
        }
    }
}

use crate::{
    clock::LocalClock,
    device_client::DeviceTransport,
    terminal::{HELP, UserCommand},
};
use anyhow::{Context, Result};
use crux_core::{Core, Request};
use crux_http::protocol::{HttpRequest, HttpResult};
use light_panel_core::{
    App, Effect, Event, LocalTimestamp, PanelConfig, TimerOperation, TimerOutput, ViewModel,
};
use log::{debug, info, warn};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    signal,
    sync::mpsc,
    task::{JoinHandle, JoinSet},
    time,
};

/// Presents the core's view model to the user
pub trait View {
    fn render(&mut self, view: &ViewModel) -> Result<()>;

    /// Free-form text outside the panel, e.g. help or input errors
    fn message(&mut self, text: &str) -> Result<()>;
}

/// Results of background work, fed back into the core in order of arrival
pub enum ShellMessage {
    Http { id: u64, result: HttpResult },
    Tick(LocalTimestamp),
}

enum Step {
    Line(Option<String>),
    Message(Option<ShellMessage>),
    Interrupted,
}

/// Runs the core: executes its effects and delivers their outputs
pub struct Shell<T, V> {
    core: Core<App>,
    transport: Arc<T>,
    view: V,
    clock: LocalClock,
    tx: mpsc::UnboundedSender<ShellMessage>,
    rx: mpsc::UnboundedReceiver<ShellMessage>,
    pending: HashMap<u64, Request<HttpRequest>>,
    next_id: u64,
    in_flight: JoinSet<()>,
    timer: Option<JoinHandle<()>>,
}

impl<T, V> Shell<T, V>
where
    T: DeviceTransport + Send + Sync + 'static,
    V: View,
{
    pub fn new(transport: T, view: V) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Shell {
            core: Core::new(),
            transport: Arc::new(transport),
            view,
            clock: LocalClock::system(),
            tx,
            rx,
            pending: HashMap::new(),
            next_id: 0,
            in_flight: JoinSet::new(),
            timer: None,
        }
    }

    pub fn with_clock(mut self, clock: LocalClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn view_model(&self) -> ViewModel {
        self.core.view()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// Send an event to the core and execute the resulting effects
    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        let effects = self.core.process_event(event);
        self.process_effects(effects)
    }

    /// Wait for the next background result and feed it to the core
    pub async fn process_next(&mut self) -> Result<()> {
        let message = self
            .rx
            .recv()
            .await
            .context("shell message channel closed")?;
        self.handle_message(message)
    }

    pub fn handle_message(&mut self, message: ShellMessage) -> Result<()> {
        while self.in_flight.try_join_next().is_some() {}

        match message {
            ShellMessage::Http { id, result } => {
                let Some(mut request) = self.pending.remove(&id) else {
                    warn!("no pending request with id {id}");
                    return Ok(());
                };
                let effects = self
                    .core
                    .resolve(&mut request, result)
                    .context("failed to resolve HTTP request")?;
                self.process_effects(effects)
            }
            ShellMessage::Tick(now) => self.dispatch(Event::Tick(now)),
        }
    }

    /// Drive the panel from user input until it ends or the user quits
    pub async fn run<R>(&mut self, config: PanelConfig, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        self.dispatch(Event::Configure(config))?;
        self.dispatch(Event::Mount)?;
        self.view.message("type 'help' for commands")?;

        let mut lines = input.lines();
        let ctrl_c = signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            let step = tokio::select! {
                line = lines.next_line() => Step::Line(line.context("failed to read input")?),
                message = self.rx.recv() => Step::Message(message),
                _ = &mut ctrl_c => Step::Interrupted,
            };

            match step {
                Step::Line(Some(line)) => {
                    if !self.handle_line(&line)? {
                        break;
                    }
                }
                Step::Line(None) => break,
                Step::Message(Some(message)) => self.handle_message(message)?,
                Step::Message(None) => break,
                Step::Interrupted => {
                    info!("interrupted");
                    break;
                }
            }
        }

        self.shutdown()
    }

    /// Unmount the panel and abandon in-flight requests
    pub fn shutdown(&mut self) -> Result<()> {
        self.dispatch(Event::Unmount)?;
        self.in_flight.abort_all();
        self.pending.clear();
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<bool> {
        if line.trim().is_empty() {
            return Ok(true);
        }

        match line.parse::<UserCommand>() {
            Ok(UserCommand::Quit) => Ok(false),
            Ok(UserCommand::Help) => {
                self.view.message(HELP)?;
                Ok(true)
            }
            Ok(command) => {
                if let Some(event) = command.into_event(self.clock.now()) {
                    self.dispatch(event)?;
                }
                Ok(true)
            }
            Err(e) => {
                self.view.message(&format!("{e:#}"))?;
                Ok(true)
            }
        }
    }

    fn process_effects(&mut self, effects: Vec<Effect>) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::Render(_) => self.render()?,
                Effect::Http(request) => self.send_http(request),
                Effect::Timer(mut request) => {
                    let output = self.handle_timer(&request.operation);
                    let effects = self
                        .core
                        .resolve(&mut request, output)
                        .context("failed to resolve timer request")?;
                    self.process_effects(effects)?;
                }
            }
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let view = self.core.view();
        self.view.render(&view)?;

        // alerts are shown once; clearing them needs no redraw
        let mut clear = Vec::new();
        if view.error_message.is_some() {
            clear.push(Event::ClearError);
        }
        if view.success_message.is_some() {
            clear.push(Event::ClearSuccess);
        }
        for event in clear {
            let effects = self
                .core
                .process_event(event)
                .into_iter()
                .filter(|effect| !matches!(effect, Effect::Render(_)))
                .collect();
            self.process_effects(effects)?;
        }
        Ok(())
    }

    fn send_http(&mut self, request: Request<HttpRequest>) {
        let id = self.next_id;
        self.next_id += 1;

        let operation = request.operation.clone();
        self.pending.insert(id, request);

        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        self.in_flight.spawn(async move {
            let result = transport.send(operation).await;
            if tx.send(ShellMessage::Http { id, result }).is_err() {
                debug!("shell stopped before response {id} arrived");
            }
        });
    }

    fn handle_timer(&mut self, operation: &TimerOperation) -> TimerOutput {
        match operation {
            TimerOperation::Start { interval_ms } => {
                self.stop_timer();
                let period = Duration::from_millis((*interval_ms).max(1));
                let tx = self.tx.clone();
                let clock = self.clock;
                self.timer = Some(tokio::spawn(async move {
                    let mut interval = time::interval(period);
                    loop {
                        interval.tick().await;
                        if tx.send(ShellMessage::Tick(clock.now())).is_err() {
                            break;
                        }
                    }
                }));
                debug!("clock timer started every {period:?}");
                TimerOutput::Started
            }
            TimerOperation::Stop => {
                self.stop_timer();
                debug!("clock timer stopped");
                TimerOutput::Stopped
            }
        }
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl<T, V> Drop for Shell<T, V> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

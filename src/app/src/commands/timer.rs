//! Timer command definitions.
//!
//! The Shell owns the actual repeating timer; the Core only asks for it to be
//! started or stopped. While running, the Shell delivers `Event::Tick`.

use crux_core::{capability::Operation, command, Command};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

// Operations that the Shell needs to perform for the clock timer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerOperation {
    Start { interval_ms: u64 },
    Stop,
}

// The output from timer operations (shell tells us what happened)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerOutput {
    Started,
    Stopped,
}

impl Operation for TimerOperation {
    type Output = TimerOutput;
}

/// Command-based timer API
pub struct Timer<Effect, Event> {
    _effect: PhantomData<Effect>,
    _event: PhantomData<Event>,
}

impl<Effect, Event> Timer<Effect, Event>
where
    Effect: Send + From<crux_core::Request<TimerOperation>> + 'static,
    Event: Send + 'static,
{
    /// Start a repeating timer firing every `interval_ms` milliseconds
    pub fn start(interval_ms: u64) -> RequestBuilder<Effect, Event> {
        RequestBuilder::new(TimerOperation::Start { interval_ms })
    }

    /// Stop the running timer
    pub fn stop() -> RequestBuilder<Effect, Event> {
        RequestBuilder::new(TimerOperation::Stop)
    }
}

/// Request builder for timer operations
#[must_use]
pub struct RequestBuilder<Effect, Event> {
    operation: TimerOperation,
    _effect: PhantomData<Effect>,
    _event: PhantomData<fn() -> Event>,
}

impl<Effect, Event> RequestBuilder<Effect, Event>
where
    Effect: Send + From<crux_core::Request<TimerOperation>> + 'static,
    Event: Send + 'static,
{
    fn new(operation: TimerOperation) -> Self {
        Self {
            operation,
            _effect: PhantomData,
            _event: PhantomData,
        }
    }

    /// Build the request into a Command RequestBuilder
    pub fn build(
        self,
    ) -> command::RequestBuilder<Effect, Event, impl std::future::Future<Output = TimerOutput>>
    {
        command::RequestBuilder::new(move |ctx| async move {
            Command::request_from_shell(self.operation)
                .into_future(ctx)
                .await
        })
    }
}

use std::{
    fmt::Display,
    io::{self, Stdout, Write},
    thread,
    time::Duration,
};

use crossterm::{
    cursor::{MoveTo, MoveToNextLine},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use log::warn;

use crate::env::Environment;

use super::Observer;

/// Redraws the environment on a terminal after every step
///
/// Rendering uses the environment's [`Display`] implementation followed by a score line.
pub struct Console<W: Write> {
    out: W,
    delay: Duration,
}

impl Console<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            delay: Duration::ZERO,
        }
    }

    /// Pause for `delay` after every frame so a run can be watched
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render<E: Environment + Display>(&mut self, env: &E) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        for line in env.to_string().lines() {
            queue!(self.out, Print(line), MoveToNextLine(1))?;
        }
        queue!(
            self.out,
            Print(format!("score: {}", env.score())),
            MoveToNextLine(1)
        )?;
        self.out.flush()
    }
}

impl<E: Environment + Display, A, W: Write> Observer<E, A> for Console<W> {
    fn notify(&mut self, env: &E, _agent: &A) {
        if let Err(err) = self.render(env) {
            warn!("console observer failed to render: {err}");
        }
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

//! Interactive session loop
//!
//! One line in, one turn out. The loop ends on the locale's exit word, on
//! end of input, or on an interrupt. A turn that is already running is never
//! cut short: an interrupt raised during it ends the session once it is done.

use crate::render::{render_outcome, OutputFormat, ShellText};
use anyhow::Result;
use deepchain_agent::GenerationService;
use deepchain_orchestrator::{PipelineController, TurnOutcome};
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    ExitCommand,
    EndOfInput,
    Interrupted,
}

/// Counters reported when the session ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub turns: usize,
    pub failed_turns: usize,
}

/// Run the interactive loop until the user leaves
///
/// `interrupt` resolves when the user asks to stop (Ctrl-C in the binary).
/// It is polled for the whole session, so an interrupt that arrives while a
/// turn is running is seen before the next line is read.
pub async fn run_session<S, R, W, I>(
    controller: &PipelineController<S>,
    input: R,
    out: &mut W,
    format: OutputFormat,
    interrupt: I,
) -> Result<(SessionEnd, SessionStats)>
where
    S: GenerationService,
    R: AsyncBufRead + Unpin,
    W: Write,
    I: Future<Output = ()>,
{
    let locale = controller.locale();
    let text = ShellText::for_locale(locale);
    let mut lines = input.lines();
    let mut stats = SessionStats::default();
    tokio::pin!(interrupt);

    let end = loop {
        write!(out, "\n{}", text.input_prompt)?;
        out.flush()?;

        let line = tokio::select! {
            biased;
            _ = &mut interrupt => {
                writeln!(out)?;
                break SessionEnd::Interrupted;
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            writeln!(out)?;
            break SessionEnd::EndOfInput;
        };

        let query = line.trim();
        if locale.is_exit_command(query) {
            break SessionEnd::ExitCommand;
        }
        debug!("Turn {}: {} chars of input", stats.turns + 1, query.len());

        let outcome = controller.run_turn(query).await;
        stats.turns += 1;
        if let TurnOutcome::Failure(e) = &outcome {
            stats.failed_turns += 1;
            if !e.is_turn_level() {
                return Err(anyhow::anyhow!("session aborted: {}", e));
            }
        }

        writeln!(out, "{}", render_outcome(&outcome, locale, format))?;
    };

    writeln!(out, "{}", text.goodbye)?;
    out.flush()?;
    Ok((end, stats))
}

//! Yes/no prompts on the terminal.
//!
//! The install orchestrator asks through the [`Confirm`] trait so tests can
//! answer for the user. [`TerminalPrompt`] is the real thing: it reads stdin
//! and gives up with [`BurrowError::Interrupted`] on Ctrl-C.

use anyhow::Result;
use colored::Colorize;
use std::future::Future;
use std::io::{self, IsTerminal, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::core::BurrowError;

/// Whether an answer counts as yes. An empty answer does.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer.is_empty() || answer == "y" || answer == "yes"
}

/// Something that can answer a `[Y/n]` question.
pub trait Confirm: Sync {
    /// Ask `question`, resolving to the answer.
    ///
    /// # Errors
    ///
    /// [`BurrowError::Interrupted`] when the user interrupts instead of
    /// answering.
    fn confirm(&self, question: &str) -> impl Future<Output = Result<bool>> + Send;
}

/// Asks on the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    /// When stdin is not a terminal nobody can answer, so the prompt is
    /// skipped and the answer is yes.
    async fn confirm(&self, question: &str) -> Result<bool> {
        if !io::stdin().is_terminal() {
            tracing::debug!("stdin is not a terminal, assuming yes to: {}", question);
            return Ok(true);
        }

        print!("{} ", format!("{question} [Y/n]:").green());
        io::stdout().flush()?;

        let interrupt = async {
            // A failed listener must not read as an interrupt.
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        read_answer(BufReader::new(tokio::io::stdin()), interrupt).await
    }
}

/// Read one answer line from `reader`, unless `interrupt` resolves first.
///
/// End of input counts as no.
pub async fn read_answer<R, I>(mut reader: R, interrupt: I) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
    I: Future<Output = ()>,
{
    let mut response = String::new();
    tokio::select! {
        read = reader.read_line(&mut response) => {
            if read? == 0 {
                println!();
                return Ok(false);
            }
            Ok(is_affirmative(&response))
        }
        () = interrupt => {
            println!();
            Err(BurrowError::Interrupted.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative(""));
        assert!(is_affirmative("Y\n"));
        assert!(is_affirmative(" yes "));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("nope"));
    }

    #[tokio::test]
    async fn test_read_answer() {
        let pending = std::future::pending::<()>;
        assert!(read_answer(&b"\n"[..], pending()).await.unwrap());
        assert!(read_answer(&b"yes\n"[..], pending()).await.unwrap());
        assert!(!read_answer(&b"n\n"[..], pending()).await.unwrap());
        assert!(!read_answer(&b""[..], pending()).await.unwrap());
    }

    #[tokio::test]
    async fn test_interrupt_while_waiting_for_an_answer() {
        // The writer stays open, so the read never completes
        let (_writer, reader) = tokio::io::duplex(64);
        let err = read_answer(BufReader::new(reader), async {}).await.unwrap_err();
        assert!(matches!(err.downcast_ref(), Some(BurrowError::Interrupted)));
    }
}

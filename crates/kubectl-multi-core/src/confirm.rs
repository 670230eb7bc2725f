//! Confirmation gate for destructive commands

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Affirmative answer, compared case-insensitively after trimming.
pub const CONFIRM_WORD: &str = "yes";

/// Ask once and wait for one line.
///
/// Only `yes` (any case, surrounding whitespace ignored) confirms. Anything
/// else, end of input, a read error, or cancellation while waiting declines.
pub async fn confirm_destructive<R, W>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
    cancel: &CancellationToken,
) -> bool
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if let Err(e) = write!(
        output,
        "{}\nType '{}' to confirm, or anything else to cancel.\n",
        prompt, CONFIRM_WORD
    )
    .and_then(|_| output.flush())
    {
        warn!(error = %e, "Failed to write confirmation prompt");
    }

    let mut line = String::new();
    let read = tokio::select! {
        _ = cancel.cancelled() => {
            warn!("Interrupted while waiting for confirmation");
            return false;
        }
        read = input.read_line(&mut line) => read,
    };

    match read {
        Ok(_) => line.trim().eq_ignore_ascii_case(CONFIRM_WORD),
        Err(e) => {
            warn!(error = %e, "Failed to read confirmation, treating as decline");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use tokio::io::{AsyncRead, BufReader, ReadBuf};

    async fn answer(input: &str) -> bool {
        let mut out = Vec::new();
        confirm_destructive(
            "Delete?",
            &mut Cursor::new(input.as_bytes()),
            &mut out,
            &CancellationToken::new(),
        )
        .await
    }

    struct BrokenReader;

    impl AsyncRead for BrokenReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _: &mut Context<'_>,
            _: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed")))
        }
    }

    /// Never yields a byte, like a terminal nobody types into.
    struct SilentReader;

    impl AsyncRead for SilentReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _: &mut Context<'_>,
            _: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Pending
        }
    }

    #[tokio::test]
    async fn test_accepts_yes_variants() {
        assert!(answer("yes\n").await);
        assert!(answer("YES\n").await);
        assert!(answer("Yes \n").await);
        assert!(answer(" yes\n").await);
        assert!(answer("yes").await);
    }

    #[tokio::test]
    async fn test_declines_everything_else() {
        assert!(!answer("y\n").await);
        assert!(!answer("\n").await);
        assert!(!answer("").await);
        assert!(!answer("no\n").await);
        assert!(!answer("yes please\n").await);
    }

    #[tokio::test]
    async fn test_read_error_declines() {
        let mut reader = BufReader::new(BrokenReader);
        let mut out = Vec::new();
        assert!(!confirm_destructive("Delete?", &mut reader, &mut out, &CancellationToken::new()).await);
    }

    #[tokio::test]
    async fn test_cancel_while_waiting_declines() {
        let mut reader = BufReader::new(SilentReader);
        let mut out = Vec::new();
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move { trigger.cancel() });

        assert!(!confirm_destructive("Delete?", &mut reader, &mut out, &cancel).await);
    }

    #[tokio::test]
    async fn test_only_first_line_is_read() {
        let mut input = Cursor::new("no\nyes\n".as_bytes());
        let mut out = Vec::new();
        assert!(!confirm_destructive("Delete?", &mut input, &mut out, &CancellationToken::new()).await);
    }

    #[tokio::test]
    async fn test_prompt_is_written() {
        let mut out = Vec::new();
        confirm_destructive(
            "Delete these?",
            &mut Cursor::new(&b"no\n"[..]),
            &mut out,
            &CancellationToken::new(),
        )
        .await;
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Delete these?\n"));
        assert!(text.contains("Type 'yes' to confirm"));
    }
}

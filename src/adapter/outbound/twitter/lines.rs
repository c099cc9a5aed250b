//! Newline framing for a chunked HTTP body.

use std::pin::Pin;
use std::time::Duration;

use futures_util::stream::{self, Stream, StreamExt};
use tokio::time::timeout;

use crate::error::{Error, StreamError};
use crate::port::LineStream;

/// Longest record accepted before the connection is treated as broken.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

struct Framer<S> {
    chunks: Pin<Box<S>>,
    buffer: Vec<u8>,
    idle: Duration,
    max_line: usize,
    finished: bool,
}

impl<S> Framer<S> {
    /// Next complete line in the buffer, without `\n` or `\r\n`.
    fn take_line(&mut self) -> Option<String> {
        let end = self.buffer.iter().position(|b| *b == b'\n')?;
        let mut line: Vec<u8> = self.buffer.drain(..=end).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

/// Split a byte-chunk stream into lines.
///
/// Chunks may cut lines anywhere. A trailing unterminated line is yielded when
/// the body ends. A transport error, or no bytes at all for `idle`, yields one
/// `Err` and ends the stream. So does a line longer than [`MAX_LINE_BYTES`].
pub fn split_lines<S, B, E>(chunks: S, idle: Duration) -> LineStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    frame(chunks, idle, MAX_LINE_BYTES)
}

fn frame<S, B, E>(chunks: S, idle: Duration, max_line: usize) -> LineStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let framer = Framer {
        chunks: Box::pin(chunks),
        buffer: Vec::new(),
        idle,
        max_line,
        finished: false,
    };

    Box::pin(stream::unfold(framer, |mut framer| async move {
        loop {
            if let Some(line) = framer.take_line() {
                return Some((Ok(line), framer));
            }
            if framer.finished {
                if framer.buffer.is_empty() {
                    return None;
                }
                let rest = std::mem::take(&mut framer.buffer);
                let line = String::from_utf8_lossy(&rest).trim_end_matches('\r').to_string();
                return Some((Ok(line), framer));
            }
            if framer.buffer.len() > framer.max_line {
                framer.finished = true;
                let message = format!(
                    "record exceeds {} bytes without a newline",
                    framer.max_line
                );
                framer.buffer.clear();
                return Some((Err(Error::from(StreamError::Read(message))), framer));
            }

            match timeout(framer.idle, framer.chunks.next()).await {
                Ok(Some(Ok(chunk))) => framer.buffer.extend_from_slice(chunk.as_ref()),
                Ok(Some(Err(e))) => {
                    framer.finished = true;
                    framer.buffer.clear();
                    return Some((Err(Error::from(StreamError::Read(e.to_string()))), framer));
                }
                Ok(None) => framer.finished = true,
                Err(_) => {
                    framer.finished = true;
                    framer.buffer.clear();
                    let message = format!("no data for {}s", framer.idle.as_secs());
                    return Some((Err(Error::from(StreamError::Read(message))), framer));
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: Duration = Duration::from_secs(30);

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<&'static [u8], String>> {
        stream::iter(parts.iter().map(|p| Ok::<_, String>(p.as_bytes())).collect::<Vec<_>>())
    }

    async fn collect(lines: LineStream) -> Vec<String> {
        lines.map(|l| l.unwrap()).collect().await
    }

    #[tokio::test]
    async fn joins_lines_across_chunks() {
        let lines = split_lines(
            chunks(&["{\"data\":", "{\"id\":\"1\"}}\r\n", "\r\n{\"a\"", ":1}\r\n"]),
            IDLE,
        );
        assert_eq!(
            collect(lines).await,
            vec!["{\"data\":{\"id\":\"1\"}}", "", "{\"a\":1}"]
        );
    }

    #[tokio::test]
    async fn yields_unterminated_tail() {
        let lines = split_lines(chunks(&["a\nb"]), IDLE);
        assert_eq!(collect(lines).await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn transport_error_ends_stream() {
        let parts: Vec<Result<&'static [u8], String>> =
            vec![Ok(&b"partial"[..]), Err("connection reset".to_string())];
        let mut lines = split_lines(stream::iter(parts), IDLE);

        let err = lines.next().await.unwrap().unwrap_err();
        assert!(err.to_string().contains("connection reset"));
        assert!(lines.next().await.is_none());
    }

    #[tokio::test]
    async fn oversized_line_ends_stream() {
        let mut lines = frame(chunks(&["ok\n", "0123456789", "0123456789"]), IDLE, 16);

        assert_eq!(lines.next().await.unwrap().unwrap(), "ok");
        let err = lines.next().await.unwrap().unwrap_err();
        assert!(err.to_string().contains("exceeds 16 bytes"));
        assert!(lines.next().await.is_none());
    }

    #[tokio::test]
    async fn line_at_the_limit_is_kept() {
        let lines = frame(chunks(&["0123456789", "012345\n"]), IDLE, 16);
        assert_eq!(collect(lines).await, vec!["0123456789012345"]);
    }

    #[tokio::test(start_paused = true)]
    async fn silent_connection_times_out() {
        let silent = stream::pending::<Result<&'static [u8], String>>();
        let mut lines = split_lines(silent, IDLE);

        let err = lines.next().await.unwrap().unwrap_err();
        assert!(err.to_string().contains("no data for 30s"));
    }
}

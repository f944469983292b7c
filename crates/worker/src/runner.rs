//! Line-oriented job loop.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::handler::JobHandler;

/// Read one JSON job per line from `reader` and write one JSON response per
/// line to `writer` until EOF. Blank lines are skipped. Returns the number
/// of jobs handled.
pub async fn run_lines<R, W>(
    handler: &JobHandler,
    reader: R,
    mut writer: W,
) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handler.handle_line(&line).await;
        let mut encoded = serde_json::to_string(&response).map_err(std::io::Error::other)?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
        handled += 1;
    }

    tracing::info!(jobs = handled, "Input closed");
    Ok(handled)
}

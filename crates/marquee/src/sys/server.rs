use crate::events::AppEvent;
use crate::stage::SnapshotBoard;
use crate::sys::request::Request;
use async_channel::Sender;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/marquee.sock";

/// Answers one protocol line: forwards navigation to the stage and replies
/// with the text to send back.
pub async fn respond(line: &str, tx: &Sender<AppEvent>, board: &SnapshotBoard) -> String {
    let request = match line.parse::<Request>() {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Rejected request '{}': {}", line.trim(), e);
            return format!("error: {e}");
        }
    };

    if let Request::Status(name) = &request {
        let lines = board.status_lines(name.as_ref());
        return if lines.is_empty() {
            "error: no such carousel".to_string()
        } else {
            lines.join("\n")
        };
    }

    match request.into_event() {
        Some(event) if tx.send(event.clone()).await.is_ok() => "ok".to_string(),
        Some(_) => "error: stage is not running".to_string(),
        None => String::new(),
    }
}

pub async fn run_server(tx: Sender<AppEvent>, board: SnapshotBoard) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = fs_err::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };
    log::info!("Listening on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                let board = board.clone();
                tokio::spawn(async move {
                    let (read, mut write) = stream.into_split();
                    let mut lines = BufReader::new(read).lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if line.trim().is_empty() {
                            continue;
                        }
                        let reply = respond(&line, &tx, &board).await;
                        if let Err(e) = write.write_all(format!("{reply}\n").as_bytes()).await {
                            log::error!("Failed to write reply: {}", e);
                            break;
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

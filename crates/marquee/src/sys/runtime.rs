use crate::events::AppEvent;
use crate::stage::SnapshotBoard;
use async_channel::Sender;
use std::thread;
use tokio::runtime::Runtime;

/// Spawns the command server, the config watcher, and the ctrl-c handler on a
/// dedicated runtime thread. The stage itself stays on the caller's thread.
pub fn start_background_services(tx: Sender<AppEvent>, board: SnapshotBoard) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            {
                let tx = tx.clone();
                let board = board.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(tx, board).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    match tokio::signal::ctrl_c().await {
                        Ok(()) => {
                            let _ = tx.send(AppEvent::Shutdown).await;
                        }
                        Err(e) => log::error!("Failed to listen for ctrl-c: {}", e),
                    }
                });
            }

            std::future::pending::<()>().await;
        });
    });
}

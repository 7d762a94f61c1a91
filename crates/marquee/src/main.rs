use marquee::config;
use marquee::stage::{self, Clock, SnapshotBoard, Stage};
use marquee::sys::{runtime, server};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = config::load_or_default();
    let board = SnapshotBoard::default();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx, board.clone());

    // Controllers are driven from one thread, one event at a time.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let clock = Clock::start();
        let stage = Stage::new(&config, board, clock.now_ms());
        stage::run(stage, rx, clock, std::io::stdout()).await;
    });

    let _ = fs_err::remove_file(server::SOCKET_PATH);
    Ok(())
}

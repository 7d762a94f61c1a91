use anyhow::Context;
use clap::{Parser, Subcommand};
use marquee::config::{self, CarouselName};
use marquee::sys::request::Request;
use marquee::sys::server::SOCKET_PATH;
use std::io::{Read, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "marquee-ctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Socket of the running marquee daemon
    #[arg(short, long, default_value = SOCKET_PATH)]
    socket: PathBuf,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Commands {
    /// Slide a carousel to its next item
    Next { carousel: String },
    /// Slide a carousel to its previous item
    Prev { carousel: String },
    /// Jump to an item by zero-based index
    Goto { carousel: String, index: usize },
    /// Print the current state of one or all carousels
    Status { carousel: Option<String> },
    /// Write the default config file if none exists and print its path
    InitConfig,
}

impl Commands {
    fn into_request(self) -> Option<Request> {
        match self {
            Self::Next { carousel } => Some(Request::Next(CarouselName::new(carousel))),
            Self::Prev { carousel } => Some(Request::Prev(CarouselName::new(carousel))),
            Self::Goto { carousel, index } => {
                Some(Request::GoTo(CarouselName::new(carousel), index))
            }
            Self::Status { carousel } => Some(Request::Status(carousel.map(CarouselName::new))),
            Self::InitConfig => None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command.into_request() {
        Some(request) => {
            let reply = send_request(&cli.socket, &request)?;
            print!("{reply}");
            if reply.starts_with("error:") {
                anyhow::bail!("daemon rejected '{}'", request);
            }
        }
        None => {
            let path = config::write_default_config().context("Failed to write default config")?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn send_request(socket: &Path, request: &Request) -> anyhow::Result<String> {
    let mut stream = UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to marquee daemon at {}: {}. Is marquee running?",
            socket.display(),
            e
        )
    })?;

    writeln!(stream, "{}", request)?;
    stream.shutdown(Shutdown::Write)?;
    log::debug!("sent '{}'", request);

    let mut reply = String::new();
    stream.read_to_string(&mut reply)?;
    Ok(reply)
}

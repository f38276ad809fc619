// Replays an NDJSON landmark recording and prints one snapshot per line.
//
//     replay <recording.ndjson> [rps|balloon]

use gesture_arcade::frameworks::{config, server};
use gesture_arcade::interface_adapters::protocol::ServerMessage;
use gesture_arcade::interface_adapters::replay::{parse_recording, replay_balloon, replay_rps};
use gesture_arcade::interface_adapters::utils::rng::session_rng;
use gesture_arcade::use_cases::{GameMode, SessionSnapshot};
use std::io::{self, BufReader, BufWriter, Write};

fn main() -> io::Result<()> {
    server::init_runtime();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        tracing::error!("usage: replay <recording.ndjson> [rps|balloon]");
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "missing recording path",
        ));
    };
    let mode = match args.next().map(|m| m.parse::<GameMode>()).transpose() {
        Ok(mode) => mode.unwrap_or_default(),
        Err(e) => {
            tracing::error!(error = %e, "bad mode");
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e));
        }
    };

    let tuning = config::load_tuning().map_err(|e| {
        tracing::error!(error = %e, "failed to load tuning");
        io::Error::other(e.to_string())
    })?;

    let file = std::fs::File::open(&path).inspect_err(|e| {
        tracing::error!(%path, error = %e, "failed to open recording");
    })?;
    let frames = parse_recording(BufReader::new(file)).map_err(|e| {
        tracing::error!(%path, error = %e, "failed to parse recording");
        io::Error::new(io::ErrorKind::InvalidData, e)
    })?;
    tracing::info!(%path, frames = frames.len(), %mode, "replaying");

    let rng = session_rng();
    let snapshots: Vec<SessionSnapshot> = match mode {
        GameMode::Rps => replay_rps(&frames, tuning.gesture, tuning.rps, rng)
            .into_iter()
            .map(SessionSnapshot::Rps)
            .collect(),
        GameMode::Balloon => replay_balloon(&frames, tuning.balloon, rng)
            .into_iter()
            .map(SessionSnapshot::Balloon)
            .collect(),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for snapshot in snapshots {
        let line =
            serde_json::to_string(&ServerMessage::from(snapshot)).map_err(io::Error::other)?;
        writeln!(out, "{line}")?;
    }
    out.flush()
}

//! raccoon sound CLI: play a register sequence or export it to WAV.
//!
//! Usage:
//!   rcn-cli                          # play the built-in demo
//!   rcn-cli song.rcn                 # play a register sequence
//!   rcn-cli song.rcn --wav out.wav   # render offline

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rcn_ir::{channel_registers, NoteRegister, RegisterFile, CHANNEL_COUNT};
use rcn_master::{demo_sequence, parse_sequence, Controller, PlayerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rcn-cli", about = "Play raccoon sound register sequences")]
struct Args {
    /// Register sequence file (16 hex bytes per line). Defaults to a demo.
    sequence: Option<PathBuf>,

    /// Player config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render to this WAV file instead of playing
    #[arg(long)]
    wav: Option<PathBuf>,

    /// Master volume, 0.0..=1.0
    #[arg(long)]
    volume: Option<f32>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log)),
        )
        .init();

    let config = match &args.config {
        Some(path) => PlayerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlayerConfig::default(),
    };

    let sequence = match &args.sequence {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_sequence(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => demo_sequence(),
    };

    let mut ctrl = Controller::new(config);
    if let Some(volume) = args.volume {
        ctrl.set_volume(volume);
        ctrl.config().validate().context("--volume")?;
    }

    print_summary(&sequence, ctrl.config());

    match &args.wav {
        Some(path) => render_to_wav(&ctrl, &sequence, path),
        None => {
            play_audio(&mut ctrl, sequence);
            Ok(())
        }
    }
}

fn print_summary(sequence: &[RegisterFile], config: &PlayerConfig) {
    let seconds = sequence.len() as f64 / config.update_rate_hz;
    println!("Frames:   {}", sequence.len());
    println!("Duration: {:.2}s at {} Hz", seconds, config.update_rate_hz);
    println!("Volume:   {:.2}", config.engine.volume);

    for ch in 0..CHANNEL_COUNT {
        let notes: Vec<NoteRegister> = sequence
            .iter()
            .filter_map(|frame| NoteRegister::decode(channel_registers(frame, ch)))
            .collect();
        print!("Ch {}:     {} notes", ch, notes.len());
        if let Some(first) = notes.first() {
            print!(
                " (first: {} inst {} {:?})",
                rcn_engine::pitch_to_name(first.pitch),
                first.instrument,
                first.effect
            );
        }
        println!();
    }
    println!();
}

fn play_audio(ctrl: &mut Controller, sequence: Vec<RegisterFile>) {
    let total = sequence.len();
    ctrl.play(sequence);
    println!("Playing...");

    while ctrl.is_playing() {
        if let Some(frame) = ctrl.position() {
            print!("\rFrame: {:05}/{:05}", frame, total);
            let _ = std::io::stdout().flush();
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }

    println!("\rDone.               ");
}

fn render_to_wav(ctrl: &Controller, sequence: &[RegisterFile], path: &Path) -> Result<()> {
    println!("Rendering to {}...", path.display());
    let wav = ctrl.render_to_wav(sequence);
    fs::write(path, &wav).with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {} bytes", wav.len());
    Ok(())
}

//! Headless controller for the raccoon sound engine.
//!
//! Drives an [`Engine`] from a sequence of register frames, either in real
//! time on the default audio device or offline into a WAV file. Stands in
//! for the console's execution host, which would otherwise feed the
//! registers once per frame.

mod config;
mod error;
mod sequence;
mod wav;

use std::iter;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rcn_audio::{CpalOutput, OfflineOutput};
use rcn_engine::Engine;
use rcn_ir::timing::SAMPLE_RATE;
use rcn_ir::{RegisterFile, REGISTER_FILE_SIZE};
use tracing::{error, info};

pub use config::PlayerConfig;
pub use error::ControllerError;
pub use sequence::{demo_sequence, format_sequence, parse_sequence};
pub use wav::{samples_to_wav, write_wav};

const SILENT_FRAME: RegisterFile = [0; REGISTER_FILE_SIZE];

/// Headless controller: owns a config and manages playback.
pub struct Controller {
    config: PlayerConfig,
    playback: Option<PlaybackHandle>,
}

struct PlaybackHandle {
    stop_signal: Arc<AtomicBool>,
    current_frame: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
    volume: Arc<AtomicU32>,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            playback: None,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Change the master volume, including for a sequence that is playing.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.config.engine.volume = volume;
        if let Some(pb) = &self.playback {
            pb.volume.store(volume.to_bits(), Ordering::Relaxed);
        }
    }

    // --- Real-time playback ---

    pub fn play(&mut self, sequence: Vec<RegisterFile>) {
        self.stop();

        let config = self.config.clone();
        let stop_signal = Arc::new(AtomicBool::new(false));
        let current_frame = Arc::new(AtomicU64::new(0));
        let finished = Arc::new(AtomicBool::new(false));
        let volume = Arc::new(AtomicU32::new(config.engine.volume.to_bits()));

        let shared = DriverShared {
            stop_signal: stop_signal.clone(),
            current_frame: current_frame.clone(),
            finished: finished.clone(),
            volume: volume.clone(),
        };

        let thread = std::thread::Builder::new()
            .name("rcn-driver".into())
            .spawn(move || driver_thread(sequence, config, shared))
            .map_err(|e| error!("failed to spawn driver thread: {}", e))
            .ok();

        if thread.is_none() {
            finished.store(true, Ordering::Relaxed);
        }

        self.playback = Some(PlaybackHandle {
            stop_signal,
            current_frame,
            finished,
            volume,
            thread,
        });
    }

    pub fn stop(&mut self) {
        if let Some(mut pb) = self.playback.take() {
            pb.stop_signal.store(true, Ordering::Relaxed);
            if let Some(handle) = pb.thread.take() {
                let _ = handle.join();
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| !p.finished.load(Ordering::Relaxed))
    }

    pub fn is_finished(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| p.finished.load(Ordering::Relaxed))
    }

    /// Index of the frame most recently fed to the engine.
    pub fn position(&self) -> Option<u64> {
        let pb = self.playback.as_ref()?;
        if pb.finished.load(Ordering::Relaxed) {
            return None;
        }
        Some(pb.current_frame.load(Ordering::Relaxed))
    }

    // --- Offline rendering ---

    /// Render `sequence` (plus the configured silent tail) to a mono
    /// timeline at [`SAMPLE_RATE`], as if updates arrived exactly on
    /// schedule.
    pub fn render(&self, sequence: &[RegisterFile]) -> Vec<f32> {
        let mut engine = Engine::with_config(OfflineOutput::running(), self.config.engine.clone());
        let interval = 1.0 / self.config.update_rate_hz;

        for (i, frame) in with_tail(sequence, self.config.tail_frames()).enumerate() {
            engine.output_mut().set_time(i as f64 * interval);
            engine.update_now(frame);
        }
        engine.output().mixdown()
    }

    pub fn render_to_wav(&self, sequence: &[RegisterFile]) -> Vec<u8> {
        let samples = self.render(sequence);
        wav::samples_to_wav(&samples, SAMPLE_RATE)
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn with_tail(sequence: &[RegisterFile], tail: usize) -> impl Iterator<Item = &RegisterFile> {
    sequence.iter().chain(iter::repeat(&SILENT_FRAME).take(tail))
}

struct DriverShared {
    stop_signal: Arc<AtomicBool>,
    current_frame: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
    volume: Arc<AtomicU32>,
}

/// Marks playback finished when dropped, so a driver that panics still
/// releases whoever is waiting on it.
struct FinishedGuard(Arc<AtomicBool>);

impl Drop for FinishedGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

fn driver_thread(sequence: Vec<RegisterFile>, config: PlayerConfig, shared: DriverShared) {
    let _finished = FinishedGuard(shared.finished.clone());
    match drive(&sequence, &config, &shared) {
        Ok(()) => info!(frames = sequence.len(), "playback finished"),
        Err(e) => error!("playback failed: {}", e),
    }
}

fn drive(
    sequence: &[RegisterFile],
    config: &PlayerConfig,
    shared: &DriverShared,
) -> Result<(), ControllerError> {
    let output = CpalOutput::new()?;

    let mut engine = Engine::with_config(output, config.engine.clone());
    // The first update only asks the device to start
    engine.update_now(&SILENT_FRAME);

    let interval = Duration::from_secs_f64(1.0 / config.update_rate_hz);
    let mut deadline = Instant::now();

    for (i, frame) in with_tail(sequence, config.tail_frames()).enumerate() {
        if shared.stop_signal.load(Ordering::Relaxed) {
            break;
        }
        engine.set_volume(f32::from_bits(shared.volume.load(Ordering::Relaxed)));
        engine.update_now(frame);
        shared.current_frame.store(i as u64, Ordering::Relaxed);

        deadline += interval;
        if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
            std::thread::sleep(wait);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rcn_ir::{write_channel, Effect, Instrument, NoteRegister};

    fn one_note(volume: u8) -> Vec<RegisterFile> {
        let mut frame = SILENT_FRAME;
        let reg = NoteRegister {
            period: 12,
            instrument: Instrument::Square.id(),
            offset: 0,
            pitch: 45,
            volume,
            effect: Effect::None,
        };
        write_channel(&mut frame, 0, reg.encode());
        vec![frame]
    }

    #[test]
    fn render_of_empty_sequence_is_silent() {
        let ctrl = Controller::new(PlayerConfig::default());
        let samples = ctrl.render(&[]);
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn render_covers_sequence_and_tail() {
        let ctrl = Controller::new(PlayerConfig::default());
        let samples = ctrl.render(&one_note(7));
        let frames = 1 + ctrl.config().tail_frames();
        // First block starts one latency in, every update adds one block
        let expected = (frames + 1) * rcn_ir::timing::BLOCK_SIZE;
        assert_eq!(samples.len(), expected);
        assert!(samples.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn render_applies_master_volume() {
        let mut ctrl = Controller::new(PlayerConfig::default());
        let loud = ctrl.render(&one_note(7));
        ctrl.set_volume(0.5);
        let quiet = ctrl.render(&one_note(7));
        let peak = |s: &[f32]| s.iter().fold(0.0f32, |m, x| m.max(x.abs()));
        assert_abs_diff_eq!(peak(&quiet), peak(&loud) * 0.5, epsilon = 1e-6);
    }

    #[test]
    fn wav_wraps_rendered_samples() {
        let ctrl = Controller::new(PlayerConfig::default());
        let samples = ctrl.render(&one_note(7));
        let wav = ctrl.render_to_wav(&one_note(7));
        assert_eq!(wav.len(), 44 + samples.len() * 2);
    }

    #[test]
    fn finished_guard_survives_a_panicking_driver() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let result = std::thread::spawn(move || {
            let _guard = FinishedGuard(flag);
            panic!("driver died");
        })
        .join();
        assert!(result.is_err());
        assert!(finished.load(Ordering::Relaxed));
    }

    #[test]
    fn nan_volume_fails_validation() {
        let mut ctrl = Controller::new(PlayerConfig::default());
        ctrl.set_volume(f32::NAN);
        assert!(matches!(
            ctrl.config().validate(),
            Err(ControllerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn idle_controller_reports_nothing() {
        let ctrl = Controller::new(PlayerConfig::default());
        assert!(!ctrl.is_playing());
        assert!(!ctrl.is_finished());
        assert_eq!(ctrl.position(), None);
    }
}

//! The sound engine: register snapshots in, scheduled blocks out.

use rcn_ir::timing::SAMPLE_RATE;
use rcn_ir::{
    channel_registers, AudioBlock, AudioOutput, DeviceState, NoteRegister, RegisterFile,
    CHANNEL_COUNT,
};
use tracing::{debug, warn};

use crate::channel::ChannelState;
use crate::config::EngineConfig;
use crate::mixer::render_block;
use crate::scheduler::{Advance, Scheduler};

/// What an [`Engine::update`] call did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UpdateOutcome {
    /// The device was not running; a resume was requested and nothing was
    /// rendered.
    Resuming,
    /// Updates had stalled; the cursor was reset and nothing was rendered.
    Starved,
    /// One block was queued at `start_time`.
    Rendered { start_time: f64 },
}

/// The sound engine.
///
/// Owns the output device for its whole lifetime; dropping the engine stops
/// submitting audio and releases the device. Blocks already accepted by the
/// device may still play out.
pub struct Engine<O: AudioOutput> {
    output: O,
    channels: [ChannelState; CHANNEL_COUNT],
    scheduler: Scheduler,
    /// Master gain, pushed to the device on every update
    volume: f32,
    config: EngineConfig,
}

impl<O: AudioOutput> Engine<O> {
    /// Create an engine with default settings.
    pub fn new(output: O) -> Self {
        Self::with_config(output, EngineConfig::default())
    }

    pub fn with_config(output: O, config: EngineConfig) -> Self {
        if output.sample_rate() != SAMPLE_RATE {
            warn!(
                device_rate = output.sample_rate(),
                engine_rate = SAMPLE_RATE,
                "output device sample rate differs from engine rate"
            );
        }
        Self {
            output,
            channels: Default::default(),
            scheduler: Scheduler::new(),
            volume: config.volume.clamp(0.0, 1.0),
            config,
        }
    }

    /// Set the master volume (clamped to 0.0..=1.0). Takes effect on the next
    /// update.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process one register snapshot at device time `now`.
    ///
    /// Call at roughly [`UPDATE_RATE`](rcn_ir::timing::UPDATE_RATE) Hz from a
    /// single thread. Each rendering call queues exactly one block.
    pub fn update(&mut self, registers: &RegisterFile, now: f64) -> UpdateOutcome {
        self.output.set_gain(self.volume);

        if self.output.state() != DeviceState::Running {
            debug!("output not running, requesting resume");
            if let Err(e) = self.output.resume() {
                warn!("resume request failed: {}", e);
            }
            return UpdateOutcome::Resuming;
        }

        let start_time = match self.scheduler.advance(now) {
            Advance::Starved { gap } => {
                debug!(gap, now, "update starvation, resetting playback cursor");
                if self.config.silence_on_starvation {
                    self.channels.iter_mut().for_each(ChannelState::silence);
                }
                return UpdateOutcome::Starved;
            }
            Advance::Ready { start_time } => start_time,
        };

        self.apply_registers(registers, start_time);

        let mut block = AudioBlock::new(start_time);
        render_block(&mut self.channels, &mut block);

        if let Err(e) = self.output.enqueue(block) {
            warn!(start_time, "dropping block: {}", e);
        }
        self.scheduler.commit();

        UpdateOutcome::Rendered { start_time }
    }

    /// [`update`](Self::update) using the device's own clock.
    pub fn update_now(&mut self, registers: &RegisterFile) -> UpdateOutcome {
        let now = self.output.current_time();
        self.update(registers, now)
    }

    /// Trigger notes for every channel whose register has the trigger bit set.
    fn apply_registers(&mut self, registers: &RegisterFile, cursor: f64) {
        for (ch, channel) in self.channels.iter_mut().enumerate() {
            if let Some(register) = NoteRegister::decode(channel_registers(registers, ch)) {
                channel.trigger(&register, cursor);
            }
        }
    }

    /// Device time at which the next block will start.
    pub fn playback_cursor(&self) -> f64 {
        self.scheduler.playback_cursor()
    }

    pub fn last_update_time(&self) -> f64 {
        self.scheduler.last_update_time()
    }

    pub fn channel(&self, ch: usize) -> &ChannelState {
        &self.channels[ch]
    }

    pub fn channels(&self) -> &[ChannelState] {
        &self.channels
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Tear down the engine, handing back the device.
    pub fn into_output(self) -> O {
        self.output
    }
}

//! Channel mixing into output blocks.

use rcn_ir::timing::SAMPLE_RATE;
use rcn_ir::{AudioBlock, CHANNEL_COUNT};

use crate::channel::ChannelState;

/// Mix every channel at time `t` into one output sample.
///
/// The sum is divided by the channel count so four voices at full scale
/// cannot clip.
pub fn mix_sample(channels: &mut [ChannelState], t: f64) -> f32 {
    let sum: f64 = channels.iter_mut().map(|ch| ch.render(t)).sum();
    (sum / CHANNEL_COUNT as f64) as f32
}

/// Render consecutive samples starting at `start_time` into `out`.
///
/// Sample `i` is evaluated at `start_time + i / SAMPLE_RATE`. Does not
/// allocate.
pub fn render_into(channels: &mut [ChannelState], start_time: f64, out: &mut [f32]) {
    for (i, sample) in out.iter_mut().enumerate() {
        let t = start_time + i as f64 / SAMPLE_RATE as f64;
        *sample = mix_sample(channels, t);
    }
}

/// Render a full block at its own start time.
pub fn render_block(channels: &mut [ChannelState], block: &mut AudioBlock) {
    let start = block.start_time();
    render_into(channels, start, block.samples_mut());
}

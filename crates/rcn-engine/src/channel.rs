//! Channel state: a three-deep note history per voice.

use rcn_ir::NoteRegister;

use crate::envelope::sample_note;
use crate::note::Note;

/// Note history for a single channel.
///
/// The current note and its predecessor are both rendered every sample so a
/// note that just ended keeps releasing while the new one attacks. The
/// oldest entry is only kept as the predecessor of `previous`, which slides
/// need.
#[derive(Clone, Debug, Default)]
pub struct ChannelState {
    pub current: Option<Note>,
    pub previous: Option<Note>,
    pub previous_previous: Option<Note>,
}

impl ChannelState {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger a new note at `cursor`, shifting the history down.
    pub fn trigger(&mut self, register: &NoteRegister, cursor: f64) {
        let note = Note::derive(register, cursor, self.current.as_ref());
        self.previous_previous = self.previous.take();
        self.previous = self.current.take();
        self.current = Some(note);
    }

    /// Drop all notes.
    pub fn silence(&mut self) {
        self.current = None;
        self.previous = None;
        self.previous_previous = None;
    }

    /// Has this channel never been triggered (or been silenced)?
    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.previous.is_none()
    }

    /// Render this channel at time `t`, advancing note phases.
    pub fn render(&mut self, t: f64) -> f64 {
        let mut out = 0.0;

        if let Some(note) = self.current.as_mut() {
            let s = sample_note(t, note, self.previous.as_ref());
            note.phase = s.phase;
            out += s.amplitude;
        }

        // Release tail of the note that was just replaced
        if let Some(note) = self.previous.as_mut() {
            let s = sample_note(t, note, self.previous_previous.as_ref());
            note.phase = s.phase;
            out += s.amplitude;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcn_ir::{Effect, Instrument};

    fn reg(pitch: u8) -> NoteRegister {
        NoteRegister {
            period: 12,
            instrument: Instrument::Square.id(),
            offset: 0,
            pitch,
            volume: 7,
            effect: Effect::None,
        }
    }

    #[test]
    fn new_channel_is_idle() {
        let ch = ChannelState::new();
        assert!(ch.is_idle());
        assert!(ch.previous_previous.is_none());
    }

    #[test]
    fn trigger_shifts_history() {
        let mut ch = ChannelState::new();
        ch.trigger(&reg(40), 0.0);
        ch.trigger(&reg(41), 0.1);
        ch.trigger(&reg(42), 0.2);
        assert_eq!(ch.current.as_ref().unwrap().pitch, 42);
        assert_eq!(ch.previous.as_ref().unwrap().pitch, 41);
        assert_eq!(ch.previous_previous.as_ref().unwrap().pitch, 40);

        ch.trigger(&reg(43), 0.3);
        assert_eq!(ch.current.as_ref().unwrap().pitch, 43);
        assert_eq!(ch.previous_previous.as_ref().unwrap().pitch, 41);
    }

    #[test]
    fn trigger_carries_phase_from_current() {
        let mut ch = ChannelState::new();
        ch.trigger(&reg(45), 0.0);
        ch.current.as_mut().unwrap().phase = 7.5;
        ch.trigger(&reg(47), 0.1);
        assert_eq!(ch.current.as_ref().unwrap().phase, 7.5);
    }

    #[test]
    fn render_advances_current_phase() {
        let mut ch = ChannelState::new();
        ch.trigger(&reg(45), 0.0);
        ch.render(0.01);
        ch.render(0.01 + 1.0 / 44100.0);
        let phase = ch.current.as_ref().unwrap().phase;
        assert!((phase - 2.0 * 440.0 / 44100.0).abs() < 1e-12);
    }

    #[test]
    fn render_overlaps_release_and_attack() {
        let mut ch = ChannelState::new();
        ch.trigger(&reg(45), 0.0);
        ch.trigger(&reg(45), 0.1);
        // 2 ms into the new note: old note is in release, new note in attack
        let t = 0.102;
        let prev_alone = {
            let p = ch.previous.as_ref().unwrap();
            sample_note(t, p, None).amplitude
        };
        assert!(prev_alone != 0.0);
        let mixed = ch.render(t);
        assert!(mixed.abs() > prev_alone.abs());
    }

    #[test]
    fn releasing_note_slides_from_its_own_predecessor() {
        let mut ch = ChannelState::new();
        ch.trigger(&reg(33), 0.0);
        ch.trigger(
            &NoteRegister {
                volume: 3,
                effect: Effect::Slide,
                ..reg(45)
            },
            0.1,
        );
        ch.trigger(&reg(50), 0.2);

        // 2 ms into the slide note's release, 2 ms into the newest attack
        let t = 0.202;
        let current = ch.current.clone().unwrap();
        let previous = ch.previous.clone().unwrap();
        let oldest = ch.previous_previous.clone().unwrap();

        let releasing = sample_note(t, &previous, Some(&oldest));
        let unslid = sample_note(t, &previous, None);
        assert!(releasing.amplitude != 0.0);
        assert!((releasing.amplitude - unslid.amplitude).abs() > 1e-6);
        assert!((releasing.phase - unslid.phase).abs() > 1e-9);

        let attacking = sample_note(t, &current, Some(&previous));
        let mixed = ch.render(t);
        assert!((mixed - (attacking.amplitude + releasing.amplitude)).abs() < 1e-12);
        assert_eq!(ch.previous.as_ref().unwrap().phase, releasing.phase);
        assert_eq!(ch.current.as_ref().unwrap().phase, attacking.phase);
    }

    #[test]
    fn silence_clears_everything() {
        let mut ch = ChannelState::new();
        ch.trigger(&reg(45), 0.0);
        ch.trigger(&reg(45), 0.1);
        ch.silence();
        assert!(ch.is_idle());
        assert_eq!(ch.render(0.05), 0.0);
    }
}

//! The fixed instrument set.

/// Number of instruments in the waveform bank.
pub const INSTRUMENT_COUNT: usize = 9;

/// One of the nine built-in oscillator shapes.
///
/// The register byte stores the instrument as a plain index; the order of
/// the variants is the on-wire order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instrument {
    Triangle,
    TiltedSaw,
    Saw,
    Square,
    Pulse,
    Organ,
    Noise,
    Phaser,
    Sine,
}

impl Instrument {
    /// All instruments in register-index order.
    pub const ALL: [Instrument; INSTRUMENT_COUNT] = [
        Instrument::Triangle,
        Instrument::TiltedSaw,
        Instrument::Saw,
        Instrument::Square,
        Instrument::Pulse,
        Instrument::Organ,
        Instrument::Noise,
        Instrument::Phaser,
        Instrument::Sine,
    ];

    /// Look up an instrument by register index. `None` if out of range.
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Register index of this instrument.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Display name, as shown in the editor's instrument column.
    pub fn name(self) -> &'static str {
        match self {
            Instrument::Triangle => "Triangle",
            Instrument::TiltedSaw => "Tilted Saw",
            Instrument::Saw => "Saw",
            Instrument::Square => "Square",
            Instrument::Pulse => "Pulse",
            Instrument::Organ => "Organ",
            Instrument::Noise => "Noise",
            Instrument::Phaser => "Phaser",
            Instrument::Sine => "Sine",
        }
    }
}

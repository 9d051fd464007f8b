//! Per-note effect selector.

/// Modulation applied over the lifetime of a note.
///
/// Encoded in bits 3..6 of the fourth register byte. Codes 6 and 7 are
/// unassigned and decode to [`Effect::None`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Effect {
    #[default]
    None,
    /// Glide pitch and volume from the previous note.
    Slide,
    /// One LFO cycle of upward pitch wobble per note.
    Vibrato,
    /// Linear pitch fall to zero by the end of the note.
    Drop,
    /// Linear volume ramp up over the note.
    Fadein,
    /// Linear volume ramp down over the note.
    Fadeout,
}

impl Effect {
    /// Decode the 3-bit effect field.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x7 {
            1 => Effect::Slide,
            2 => Effect::Vibrato,
            3 => Effect::Drop,
            4 => Effect::Fadein,
            5 => Effect::Fadeout,
            _ => Effect::None,
        }
    }

    /// The 3-bit code for this effect.
    pub fn bits(self) -> u8 {
        match self {
            Effect::None => 0,
            Effect::Slide => 1,
            Effect::Vibrato => 2,
            Effect::Drop => 3,
            Effect::Fadein => 4,
            Effect::Fadeout => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Effect::None => "None",
            Effect::Slide => "Slide",
            Effect::Vibrato => "Vibrato",
            Effect::Drop => "Drop",
            Effect::Fadein => "Fadein",
            Effect::Fadeout => "Fadeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigned_codes_decode() {
        assert_eq!(Effect::from_bits(0), Effect::None);
        assert_eq!(Effect::from_bits(1), Effect::Slide);
        assert_eq!(Effect::from_bits(2), Effect::Vibrato);
        assert_eq!(Effect::from_bits(3), Effect::Drop);
        assert_eq!(Effect::from_bits(4), Effect::Fadein);
        assert_eq!(Effect::from_bits(5), Effect::Fadeout);
    }

    #[test]
    fn unassigned_codes_are_none() {
        assert_eq!(Effect::from_bits(6), Effect::None);
        assert_eq!(Effect::from_bits(7), Effect::None);
    }

    #[test]
    fn bits_inverts_from_bits() {
        for code in 0..6 {
            assert_eq!(Effect::from_bits(code).bits(), code);
        }
    }
}

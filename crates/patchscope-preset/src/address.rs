//! Static parameter address table.
//!
//! Maps preset attribute names to the ordinal parameter addresses the engine
//! exposes. The table is compiled in and never changes at runtime. Lookup is
//! exact and case-sensitive; names the table does not know are ignored.

use crate::attributes::PresetAttributes;

/// Ordinal engine parameter address.
pub type ParameterAddress = u32;

/// `(name, address)` pairs in address order.
///
/// Addresses 44 and 51 are unassigned.
const ENTRIES: &[(&str, ParameterAddress)] = &[
    // Global
    ("modulation", 0),
    ("volume", 1),
    ("masterfinetune", 2),
    ("octavetranspose", 3),
    ("portamentomode", 4),
    ("portamentointensity", 5),
    ("midilearn", 6),
    ("midilearndelete", 7),
    ("polymode", 8),
    ("panic", 9),
    // LFO
    ("lforate", 10),
    ("lfowaveform", 11),
    ("lfotrigger", 12),
    ("lfosync", 13),
    ("lfoinverted", 14),
    // DCO
    ("dcolfovalue", 15),
    ("dcopwmvalue", 16),
    ("dcopwmmode", 17),
    ("dcorange", 18),
    ("dcolfovaluesnap", 19),
    // Mixer
    ("pulsevolume", 20),
    ("sawvolume", 21),
    ("suboscvolume", 22),
    ("suboscmode", 23),
    ("noisevolume", 24),
    ("whitenoiseenabled", 25),
    // VCF
    ("filtercutoff", 26),
    ("filterresonance", 27),
    ("filterenvelopevalue", 28),
    ("filtermodulationvalue", 29),
    ("filterkeyboardvalue", 30),
    ("filterenvelopevaluefullrange", 31),
    ("filtervolumecorrection", 32),
    // VCA / envelope
    ("vcamode", 33),
    ("adsrmode", 34),
    ("adsrattack", 35),
    ("adsrdecay", 36),
    ("adsrsustain", 37),
    ("adsrrelease", 38),
    // Controllers
    ("controlbenderfilter", 39),
    ("controlbenderdco", 40),
    ("controlbendermodulation", 41),
    ("controlvelocityvolume", 42),
    ("controlvelocityenvelope", 43),
    // Arpeggiator / sequencer
    ("arpseqhold", 45),
    ("arpseqsyncenabled", 46),
    ("arpseqtempo", 47),
    ("arpseqlength", 48),
    ("arpenabled", 49),
    ("arpmode", 50),
    ("seqenabled", 52),
    ("seqrecord", 53),
    ("portamentolinear", 54),
    ("resetseq", 55),
    ("mainsyncmode", 56),
    ("adsrdecklick", 57),
    ("loadsequencerpreset", 58),
    ("arpseqshuffle", 59),
    // Analog modelling / FM
    ("noisefloor", 60),
    ("fmpulse", 61),
    ("fmsaw", 62),
    ("fmsubosc", 63),
    ("fmnoise", 64),
    ("fmintensity", 65),
    ("seqpauserecord", 66),
    ("engineoff", 67),
    ("presetup", 68),
    ("presetdown", 69),
    ("midilock", 70),
    ("mpeEnabled", 71),
];

/// An attribute resolved to its engine address.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedParameter {
    /// Attribute name as it appears in the table.
    pub name: &'static str,
    /// Engine parameter address.
    pub address: ParameterAddress,
    /// Value taken from the preset.
    pub value: f32,
}

/// Read-only name to address mapping.
#[derive(Debug, Clone, Copy)]
pub struct ParameterAddressTable {
    entries: &'static [(&'static str, ParameterAddress)],
}

impl Default for ParameterAddressTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ParameterAddressTable {
    /// Returns the compiled-in table.
    pub const fn builtin() -> Self {
        Self { entries: ENTRIES }
    }

    /// Looks up the address of `name` (exact, case-sensitive).
    pub fn address_of(&self, name: &str) -> Option<ParameterAddress> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, address)| *address)
    }

    /// Looks up the name registered for `address`.
    pub fn name_of(&self, address: ParameterAddress) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, entry)| *entry == address)
            .map(|(name, _)| *name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, address)` pairs in address order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ParameterAddress)> + '_ {
        self.entries.iter().copied()
    }

    /// Resolves every attribute that has a table entry.
    ///
    /// Output follows attribute (name) order. Attributes without an entry are
    /// skipped; see [`ParameterAddressTable::unmapped`] to list them.
    pub fn resolve(&self, attributes: &PresetAttributes) -> Vec<MappedParameter> {
        attributes
            .iter()
            .filter_map(|(name, value)| {
                self.entries
                    .iter()
                    .find(|(entry, _)| *entry == name)
                    .map(|&(name, address)| MappedParameter {
                        name,
                        address,
                        value,
                    })
            })
            .collect()
    }

    /// Returns the attribute names that have no table entry.
    pub fn unmapped<'a>(&self, attributes: &'a PresetAttributes) -> Vec<&'a str> {
        attributes
            .iter()
            .map(|(name, _)| name)
            .filter(|name| self.address_of(name).is_none())
            .collect()
    }
}

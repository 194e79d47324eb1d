//! Read planner (C4): mapping a set of configuration topics to a concrete,
//! uncompacted list of `(base, size)` reads for a given panel model.

use crate::{
    error::{CoreError, Result},
    model::{ModelDescriptor, ModelId},
    ranges::{Range, uncompact},
};

/// A single configuration topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Topic {
    /// Zone configuration.
    Zones = 1 << 0,
    /// Area configuration.
    Areas = 1 << 1,
    /// Panel-wide global configuration.
    Global = 1 << 2,
    /// Keypad configuration.
    Keypads = 1 << 3,
    /// Expander configuration.
    Expanders = 1 << 4,
    /// Output configuration.
    Outputs = 1 << 5,
    /// Communications configuration.
    Comms = 1 << 6,
    /// User configuration.
    Users = 1 << 7,
    /// Event log.
    Logs = 1 << 8,
}

impl Topic {
    /// All nine topics, in a stable, documented order.
    pub const ALL: [Topic; 9] = [
        Topic::Zones,
        Topic::Areas,
        Topic::Global,
        Topic::Keypads,
        Topic::Expanders,
        Topic::Outputs,
        Topic::Comms,
        Topic::Users,
        Topic::Logs,
    ];
}

/// A set of [`Topic`]s, represented as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Topics(u16);

impl Topics {
    /// The empty topic set.
    pub const NONE: Topics = Topics(0);

    /// Builds the union of every topic.
    #[must_use]
    pub fn all() -> Self {
        let mut t = Topics::NONE;
        for topic in Topic::ALL {
            t = t.with(topic);
        }
        t
    }

    /// Returns a copy of this set with `topic` added.
    #[must_use]
    pub fn with(self, topic: Topic) -> Self {
        Topics(self.0 | topic as u16)
    }

    /// Whether `topic` is a member of this set.
    #[must_use]
    pub fn contains(self, topic: Topic) -> bool {
        self.0 & (topic as u16) != 0
    }
}

impl From<Topic> for Topics {
    fn from(topic: Topic) -> Self {
        Topics::NONE.with(topic)
    }
}

impl std::ops::BitOr for Topics {
    type Output = Topics;

    fn bitor(self, rhs: Self) -> Self::Output {
        Topics(self.0 | rhs.0)
    }
}

/// Reads included in every plan, regardless of which topics were requested:
/// unique ID, banner registers, and panel flags. Reproduced verbatim from
/// the reference tables; entries are intentionally not deduplicated against
/// each other or against per-topic ranges.
pub const ELITE24_COMMON_READS: &[Range] = &[
    (25755, 16),
    (23812, 16),
    (5752, 1),
    (8138, 7),
    (5758, 1),
    (23637, 2),
    (23639, 2),
];

fn elite24_topic_ranges(topic: Topic) -> &'static [Range] {
    match topic {
        Topic::Zones => &[
            (0x0000, 24),
            (0x0030, 24),
            (0x0060, 24),
            (0x0090, 24),
            (0x00C0, 48),
            (0x5400, 768),
        ],
        Topic::Users => &[
            (0x4000, 200),
            (0x4190, 0x4B),
            (0x630B, 0x18),
            (0x42B6, 25),
            (0x42EE, 50),
            (0x43E8, 25),
        ],
        Topic::Areas => &[(0x16A0, 32), (0x05E8, 32)],
        Topic::Global => &[
            (0x1100, 32),
            (0x1120, 32),
            (0x1140, 32),
            (0x1160, 32),
            (0x1180, 16),
            (0x1190, 16),
            (0x1800, 16),
            (0x1810, 16),
            (0x1820, 16),
            (0x5D04, 16),
        ],
        Topic::Keypads => {
            &[(0x0FA0, 8), (0x0FC0, 8), (0x0FE0, 8), (0x1000, 4), (0x1010, 4)]
        },
        Topic::Expanders => &[(0x0E50, 32), (0x0F50, 4), (0x0F70, 2), (0x0F80, 2), (0x0F90, 2)],
        Topic::Comms => &[(0x1A30, 16), (0x1A40, 16)],
        // Not documented with named decoder fields; these windows are read
        // so the raw bytes are populated even though no typed field reads
        // them back out yet.
        Topic::Outputs => &[(0x1030, 32)],
        Topic::Logs => &[(0x6000, 0x400)],
    }
}

/// Builds the concrete, uncompacted read plan for `topics` against `model`.
///
/// # Errors
///
/// Returns [`CoreError::UnplannableModel`] if `model` is not
/// [`ModelDescriptor::plannable`] - the topic tables above are known to be
/// correct only for the Elite-24 offset layout.
pub fn plan(model: &ModelDescriptor, topics: Topics) -> Result<Vec<Range>> {
    if !model.plannable || model.id != ModelId::Elite24 {
        return Err(CoreError::UnplannableModel);
    }

    let mut compacted = ELITE24_COMMON_READS.to_vec();
    for topic in Topic::ALL {
        if topics.contains(topic) {
            compacted.extend_from_slice(elite24_topic_ranges(topic));
        }
    }
    Ok(uncompact(&compacted))
}

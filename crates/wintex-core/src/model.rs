//! Panel identity: selecting a model descriptor from a login banner.

use crate::decode::{Decoder, elite24_decoder, generic_decoder};

/// A recognised panel model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelId {
    /// Premier Elite 24: 24 zones, 25 users, 2 expanders, 4 keypads, 2 areas.
    Elite24,
    /// Fallback for any banner we don't recognise.
    Generic,
}

/// Zone/user/area/expander/keypad counts and memory sizes for a model,
/// together with its structured decoder.
#[derive(Clone, Copy)]
pub struct ModelDescriptor {
    /// Which model this descriptor is for.
    pub id: ModelId,
    /// Size of the configuration-memory buffer.
    pub mem_size: usize,
    /// Size of the live I/O buffer.
    pub io_size: usize,
    /// Number of zones.
    pub zones: usize,
    /// Number of users.
    pub users: usize,
    /// Number of areas.
    pub areas: usize,
    /// Number of area suites (part-arm text slots).
    pub area_suites: usize,
    /// Number of expanders.
    pub expanders: usize,
    /// Number of keypads.
    pub keypads: usize,
    /// Structured decoder for this model.
    pub decode: Decoder,
    /// Whether the read planner is permitted to plan reads for this model.
    ///
    /// The generic descriptor's memory is sized completely differently from
    /// the only planner tables this implementation carries (Elite-24's), so
    /// planning against it would index past the buffers it actually owns.
    pub plannable: bool,
}

const ELITE24: ModelDescriptor = ModelDescriptor {
    id: ModelId::Elite24,
    mem_size: 0x8000,
    io_size: 0x2000,
    zones: 24,
    users: 25,
    areas: 2,
    area_suites: 2,
    expanders: 2,
    keypads: 4,
    decode: elite24_decoder,
    plannable: true,
};

const GENERIC: ModelDescriptor = ModelDescriptor {
    id: ModelId::Generic,
    mem_size: 0x80000,
    io_size: 0x20000,
    zones: 0,
    users: 0,
    areas: 0,
    area_suites: 0,
    expanders: 0,
    keypads: 0,
    decode: generic_decoder,
    plannable: false,
};

/// Selects a model descriptor from a login banner string.
///
/// Dispatch is by prefix: a banner starting with `"Elite 24"` selects the
/// Elite-24 descriptor. Anything else - including an empty banner, before
/// login completes - yields the generic descriptor.
#[must_use]
pub fn model_for(banner: &str) -> ModelDescriptor {
    if banner.starts_with("Elite 24") { ELITE24 } else { GENERIC }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn elite24_banner_selects_elite24() {
        let d = model_for("Elite 24    V6.05.03");
        assert_eq!(d.id, ModelId::Elite24);
        assert_eq!(d.zones, 24);
        assert!(d.plannable);
    }

    #[test]
    fn unknown_banner_falls_back_to_generic() {
        let d = model_for("Some Other Panel v1");
        assert_eq!(d.id, ModelId::Generic);
        assert_eq!(d.mem_size, 0x80000);
        assert!(!d.plannable);
    }
}

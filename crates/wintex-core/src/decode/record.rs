//! The typed configuration record produced by a structured decoder.

/// A single zone's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ZoneRecord {
    /// First 16 characters of the zone name.
    pub name: String,
    /// Second 16 characters of the zone name.
    pub name2: String,
    /// Raw zone type byte; render via [`super::tables::ZONE_TYPES`].
    pub r#type: u8,
    /// Chime enable byte.
    pub chime: u8,
    /// Area assignment byte.
    pub area: u8,
    /// Raw wiring byte; render via [`super::tables::ZONE_WIRING`].
    pub wiring: u8,
    /// First attribute byte.
    pub attrib1: u8,
    /// Second attribute byte.
    pub attrib2: u8,
}

/// A single user's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct UserRecord {
    /// User name, right-stripped of trailing NULs.
    pub name: String,
    /// Derived pincode, `d`/`e`/`f` sentinel nibbles trimmed.
    pub pincode: String,
    /// Raw access-areas bitmask byte; render via
    /// [`super::tables::ZONE_ACCESS_AREAS`].
    pub access_areas: u8,
    /// First user flags byte.
    pub flags0: u8,
    /// Second user flags byte.
    pub flags1: u8,
}

/// A single area's display text.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct AreaRecord {
    /// Area name/text.
    pub text: String,
}

/// A single area suite's display text (a part-arm grouping of areas).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct AreaSuiteRecord {
    /// Suite name/text.
    pub text: String,
}

/// A single expander's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ExpanderRecord {
    /// Expander location text.
    pub location: String,
    /// Area assignment byte.
    pub area: u8,
    /// Auxiliary input byte.
    pub aux_input: u8,
    /// Sounds byte.
    pub sounds: u8,
    /// Speaker byte.
    pub speaker: u8,
}

/// A single keypad's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct KeypadRecord {
    /// Areas assignment byte.
    pub areas: u8,
    /// Zone 1 input byte.
    pub keypad_z1_zone: u8,
    /// Zone 2 input byte.
    pub keypad_z2_zone: u8,
    /// Options byte.
    pub options: u8,
    /// Sounds byte.
    pub sounds: u8,
    /// Volume byte.
    pub volume: u8,
}

/// Panel-wide ASCII/BCD configuration text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ConfigRecord {
    /// Unique panel ID, BCD-encoded.
    pub unique_id: String,
    /// Engineer reset message.
    pub engineer_reset: String,
    /// Anti-code reset message.
    pub anticode_reset: String,
    /// Service message text.
    pub service_message: String,
    /// Panel location text.
    pub panel_location: String,
    /// Banner message text.
    pub banner_message: String,
    /// Part-arm header text.
    pub part_arm_header: String,
    /// Part-arm message 1/2/3 text.
    pub part_arm_messages: [String; 3],
}

/// Communications-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CommsRecord {
    /// First SMS centre number.
    pub sms_centre1: String,
    /// Second SMS centre number.
    pub sms_centre2: String,
}

/// Live virtual-keypad display state (from the `io` buffer).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct VirtualKeypadRecord {
    /// First line of the keypad display.
    pub screen: String,
    /// Second line of the keypad display.
    pub screen2: String,
    /// Raw LED bitmask byte; render via [`super::tables::KEYPAD_LEDS`].
    pub leds: u8,
}

/// Literal lookup/bitmask tables a downstream viewer should use to render
/// certain raw byte fields carried elsewhere in the record. Emitted verbatim
/// rather than derived, per the wire contract with such viewers.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct EnumMetadata {
    /// Lookup table for `zones[i].type`.
    pub zone_types: &'static [&'static str],
    /// Lookup table for `zones[i].wiring`.
    pub zone_wiring: &'static [&'static str],
    /// Bitmask labels for `zones[i].access_areas`.
    pub zone_access_areas: &'static [&'static str],
    /// Bitmask labels for `virtualkeypad.leds`.
    pub keypad_leds: &'static [&'static str],
}

/// The full typed configuration record decoded from `mem` and `io`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Record {
    /// Per-zone configuration.
    pub zones: Vec<ZoneRecord>,
    /// Per-user configuration.
    pub users: Vec<UserRecord>,
    /// Per-area display text.
    pub areas: Vec<AreaRecord>,
    /// Per-area-suite display text.
    pub area_suites: Vec<AreaSuiteRecord>,
    /// Per-expander configuration.
    pub expanders: Vec<ExpanderRecord>,
    /// Per-keypad configuration.
    pub keypads: Vec<KeypadRecord>,
    /// Panel-wide configuration text.
    pub config: ConfigRecord,
    /// Communications configuration.
    pub comms: CommsRecord,
    /// Live virtual-keypad state.
    pub virtualkeypad: VirtualKeypadRecord,
    /// Rendering tables for the raw enum/bitmask bytes above.
    pub enums: EnumMetadata,
}

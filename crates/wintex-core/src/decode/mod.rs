//! Structured decoder (C7): pure fixed-offset field extraction over
//! `(mem, io)` into a typed configuration record.

mod fields;
mod record;
mod tables;

pub use fields::{get_ascii, get_bcd, get_pincode, put_bcd};
pub use record::{
    AreaRecord, AreaSuiteRecord, CommsRecord, ConfigRecord, EnumMetadata, ExpanderRecord,
    KeypadRecord, Record, UserRecord, VirtualKeypadRecord, ZoneRecord,
};
pub use tables::{KEYPAD_LEDS, ZONE_ACCESS_AREAS, ZONE_TYPES, ZONE_WIRING};

use crate::model::ModelDescriptor;

/// A model's structured decoder: a pure function from `(mem, io)` to a
/// [`Record`]. Carried as a plain function pointer on [`ModelDescriptor`] so
/// dispatch costs nothing more than an indirect call.
pub type Decoder = fn(&ModelDescriptor, mem: &[u8], io: &[u8]) -> Record;

/// Decoder for unidentified panels: returns an empty record without reading
/// any memory, since the Elite-24 field offsets below are not known to be
/// valid for an unrecognised layout.
pub fn generic_decoder(_descriptor: &ModelDescriptor, _mem: &[u8], _io: &[u8]) -> Record {
    Record::default()
}

/// Decoder for the Premier Elite 24.
#[allow(clippy::similar_names)] // screen/screen2, part_arm1/2/3 are genuinely similar by design
pub fn elite24_decoder(descriptor: &ModelDescriptor, mem: &[u8], io: &[u8]) -> Record {
    let mut zones = Vec::with_capacity(descriptor.zones);
    for i in 0..descriptor.zones {
        zones.push(ZoneRecord {
            name: get_ascii(mem, 0x5400 + 32 * i, 16),
            name2: get_ascii(mem, 0x5400 + 32 * i + 16, 16),
            r#type: byte_at(mem, 0x0000 + i),
            chime: byte_at(mem, 0x0030 + i),
            area: byte_at(mem, 0x0060 + i),
            wiring: byte_at(mem, 0x0090 + i),
            attrib1: byte_at(mem, 0x00C0 + 2 * i),
            attrib2: byte_at(mem, 0x00C1 + 2 * i),
        });
    }

    // Pincodes are derived from two disjoint regions concatenated into a
    // single 99-byte scratch buffer, three bytes per user.
    let mut pincode_buf = Vec::with_capacity(0x4B + 0x18);
    pincode_buf.extend_from_slice(mem.get(0x4190..0x4190 + 0x4B).unwrap_or(&[0; 0x4B]));
    pincode_buf.extend_from_slice(mem.get(0x630B..0x630B + 0x18).unwrap_or(&[0; 0x18]));

    let mut users = Vec::with_capacity(descriptor.users);
    for i in 0..descriptor.users {
        users.push(UserRecord {
            name: get_ascii(mem, 0x4000 + 8 * i, 8).trim_end().to_string(),
            pincode: get_pincode(&pincode_buf, 3 * i),
            access_areas: byte_at(mem, 0x42EE + 2 * i),
            flags0: byte_at(mem, 0x42B6 + i),
            flags1: byte_at(mem, 0x43E8 + i),
        });
    }

    let areas = (0..descriptor.areas)
        .map(|i| AreaRecord { text: get_ascii(mem, 0x16A0 + 16 * i, 16) })
        .collect();

    let area_suites = (0..descriptor.area_suites)
        .map(|i| AreaSuiteRecord { text: get_ascii(mem, 0x05E8 + 16 * i, 16) })
        .collect();

    let expanders = (0..descriptor.expanders)
        .map(|i| ExpanderRecord {
            location: get_ascii(mem, 0x0E50 + 16 * i, 16),
            area: byte_at(mem, 0x0F50 + 2 * i),
            aux_input: byte_at(mem, 0x0F70 + i),
            sounds: byte_at(mem, 0x0F80 + i),
            speaker: byte_at(mem, 0x0F90 + i),
        })
        .collect();

    let keypads = (0..descriptor.keypads)
        .map(|i| KeypadRecord {
            areas: byte_at(mem, 0x0FA0 + 2 * i),
            keypad_z1_zone: byte_at(mem, 0x0FC0 + 2 * i),
            keypad_z2_zone: byte_at(mem, 0x0FC1 + 2 * i),
            options: byte_at(mem, 0x0FE0 + 2 * i),
            sounds: byte_at(mem, 0x1010 + i),
            volume: byte_at(mem, 0x1000 + i),
        })
        .collect();

    let config = ConfigRecord {
        unique_id: get_bcd(mem, 0x5D04, 16),
        engineer_reset: get_ascii(mem, 0x1100, 32),
        anticode_reset: get_ascii(mem, 0x1120, 32),
        service_message: get_ascii(mem, 0x1140, 32),
        panel_location: get_ascii(mem, 0x1160, 32),
        banner_message: get_ascii(mem, 0x1180, 16),
        part_arm_header: get_ascii(mem, 0x1190, 16),
        part_arm_messages: [
            get_ascii(mem, 0x1800, 16),
            get_ascii(mem, 0x1810, 16),
            get_ascii(mem, 0x1820, 16),
        ],
    };

    let comms = CommsRecord {
        sms_centre1: get_ascii(mem, 0x1A30, 16),
        sms_centre2: get_ascii(mem, 0x1A40, 16),
    };

    let virtualkeypad = VirtualKeypadRecord {
        screen: get_ascii(io, 0x1196, 16),
        screen2: get_ascii(io, 0x11A6, 16),
        leds: byte_at(io, 0x11B7),
    };

    let enums = EnumMetadata {
        zone_types: ZONE_TYPES,
        zone_wiring: ZONE_WIRING,
        zone_access_areas: ZONE_ACCESS_AREAS,
        keypad_leds: KEYPAD_LEDS,
    };

    Record {
        zones,
        users,
        areas,
        area_suites,
        expanders,
        keypads,
        config,
        comms,
        virtualkeypad,
        enums,
    }
}

fn byte_at(buf: &[u8], off: usize) -> u8 {
    buf.get(off).copied().unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::model_for;

    #[test]
    fn decoder_is_total_over_correctly_sized_buffers() {
        let descriptor = model_for("Elite 24    V6.05.03");
        let mem = vec![0u8; descriptor.mem_size];
        let io = vec![0u8; descriptor.io_size];
        let record = (descriptor.decode)(&descriptor, &mem, &io);
        assert_eq!(record.zones.len(), 24);
        assert_eq!(record.users.len(), 25);
    }

    #[test]
    fn generic_decoder_returns_empty_record_without_touching_buffers() {
        let descriptor = model_for("Unknown Panel");
        let record = generic_decoder(&descriptor, &[], &[]);
        assert_eq!(record, Record::default());
    }

    #[test]
    fn elite24_record_carries_the_enum_rendering_tables() {
        let descriptor = model_for("Elite 24    V6.05.03");
        let mem = vec![0u8; descriptor.mem_size];
        let io = vec![0u8; descriptor.io_size];
        let record = (descriptor.decode)(&descriptor, &mem, &io);
        assert_eq!(record.enums.zone_types, ZONE_TYPES);
        assert_eq!(record.enums.zone_wiring, ZONE_WIRING);
        assert_eq!(record.enums.zone_access_areas, ZONE_ACCESS_AREAS);
        assert_eq!(record.enums.keypad_leds, KEYPAD_LEDS);
    }

    #[test]
    fn trailing_nul_and_trailing_space_zone_names_from_spec_scenario() {
        let descriptor = model_for("Elite 24    V6.05.03");
        let mut mem = vec![0u8; descriptor.mem_size];

        // zones[2].name = "ZOME003" (NUL-padded), name2 = 16 spaces.
        let base = 0x5400 + 32 * 2;
        mem[base..base + 7].copy_from_slice(b"ZOME003");
        mem[base + 16..base + 32].copy_from_slice(&[b' '; 16]);

        let record = (descriptor.decode)(&descriptor, &mem, &[0u8; 0x2000]);
        assert_eq!(record.zones[2].name, "ZOME003");
        assert_eq!(record.zones[2].name2, "                ");
    }
}

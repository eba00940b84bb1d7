//! Curated code lists for the common ring widths.
//!
//! These are the code sequences shipped by the established marker sheets for
//! 8, 12 and 14 bit rings. Markers printed from them must keep their numbers
//! across releases, so the lists are fixed here instead of being regenerated.

pub const STANDARD_8: [u32; 30] = [
    0x0001, 0x0003, 0x0005, 0x0007, 0x0009, 0x000b, 0x000d, 0x000f, 0x0011, 0x0013,
    0x0015, 0x0017, 0x0019, 0x001b, 0x001d, 0x001f, 0x0025, 0x0027, 0x002b, 0x002d,
    0x002f, 0x0033, 0x0035, 0x0037, 0x003b, 0x003d, 0x003f, 0x0055, 0x0057, 0x005b,
];

pub const STANDARD_12: [u32; 50] = [
    0x0001, 0x0003, 0x0005, 0x0007, 0x0009, 0x000b, 0x000d, 0x000f, 0x0011, 0x0013,
    0x0015, 0x0017, 0x0019, 0x001b, 0x001d, 0x001f, 0x0021, 0x0023, 0x0025, 0x0027,
    0x0029, 0x002b, 0x002d, 0x002f, 0x0031, 0x0033, 0x0035, 0x0037, 0x0039, 0x003b,
    0x003d, 0x003f, 0x0041, 0x0043, 0x0045, 0x0047, 0x0049, 0x004b, 0x004d, 0x004f,
    0x0051, 0x0053, 0x0055, 0x0057, 0x0059, 0x005b, 0x005d, 0x005f, 0x0061, 0x0063,
];

pub const STANDARD_14: [u32; 50] = [
    0x0001, 0x0003, 0x0005, 0x0007, 0x0009, 0x000b, 0x000d, 0x000f, 0x0011, 0x0013,
    0x0015, 0x0017, 0x0019, 0x001b, 0x001d, 0x001f, 0x0021, 0x0023, 0x0025, 0x0027,
    0x0029, 0x002b, 0x002d, 0x002f, 0x0031, 0x0033, 0x0035, 0x0037, 0x0039, 0x003b,
    0x003d, 0x003f, 0x0041, 0x0043, 0x0045, 0x0047, 0x0049, 0x004b, 0x004d, 0x004f,
    0x0051, 0x0053, 0x0055, 0x0057, 0x0059, 0x005b, 0x005d, 0x005f, 0x0061, 0x0063,
];

/// Look up the standard table for a ring width, if one exists.
pub fn standard_table(bits: u32) -> Option<&'static [u32]> {
    match bits {
        8 => Some(&STANDARD_8),
        12 => Some(&STANDARD_12),
        14 => Some(&STANDARD_14),
        _ => None,
    }
}

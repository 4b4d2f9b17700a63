//! Palette resolution
//!
//! Parses a group's hex color strings into render colors.

use crate::core::catalog::Palette;

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Fallback for palette fields that fail to parse: opaque white.
pub const DEFAULT_COLOR: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

/// The resolved render palette for one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupColors {
    pub primary: Rgba,
    pub secondary: Rgba,
    pub circles: [Rgba; 5],
}

/// A palette field that is not a well-formed hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("palette field `{field}` is not a hex color: {value:?}")]
pub struct ColorParseError {
    pub field: &'static str,
    pub value: String,
}

/// Resolve all seven palette fields, failing on the first malformed one.
pub fn resolve(palette: &Palette) -> Result<GroupColors, ColorParseError> {
    Ok(GroupColors {
        primary: parse_field("primary", &palette.primary)?,
        secondary: parse_field("secondary", &palette.secondary)?,
        circles: [
            parse_field("circle1", &palette.circle1)?,
            parse_field("circle2", &palette.circle2)?,
            parse_field("circle3", &palette.circle3)?,
            parse_field("circle4", &palette.circle4)?,
            parse_field("circle5", &palette.circle5)?,
        ],
    })
}

/// Resolve all seven palette fields, substituting [`DEFAULT_COLOR`] for any
/// malformed one so a bad field never takes the whole group down.
pub fn resolve_lenient(palette: &Palette) -> GroupColors {
    let lenient = |field, value: &str| {
        parse_field(field, value).unwrap_or_else(|err| {
            tracing::warn!("{err}, using default");
            DEFAULT_COLOR
        })
    };

    GroupColors {
        primary: lenient("primary", &palette.primary),
        secondary: lenient("secondary", &palette.secondary),
        circles: [
            lenient("circle1", &palette.circle1),
            lenient("circle2", &palette.circle2),
            lenient("circle3", &palette.circle3),
            lenient("circle4", &palette.circle4),
            lenient("circle5", &palette.circle5),
        ],
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<Rgba, ColorParseError> {
    parse_hex(value).ok_or_else(|| ColorParseError {
        field,
        value: value.to_string(),
    })
}

/// Parse `#RRGGBB` or `#RRGGBBAA`; the leading `#` is optional.
fn parse_hex(value: &str) -> Option<Rgba> {
    let hex = value.strip_prefix('#').unwrap_or(value);

    let channel = |index: usize| -> Option<f32> {
        let byte = u8::from_str_radix(hex.get(index..index + 2)?, 16).ok()?;
        Some(byte as f32 / 255.0)
    };

    match hex.len() {
        6 => Some(Rgba::new(channel(0)?, channel(2)?, channel(4)?, 1.0)),
        8 => Some(Rgba::new(
            channel(0)?,
            channel(2)?,
            channel(4)?,
            channel(6)?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette_of(primary: &str) -> Palette {
        Palette {
            primary: primary.to_string(),
            secondary: "#66C0F4".to_string(),
            circle1: "#C7D5E0".to_string(),
            circle2: "#2A475E".to_string(),
            circle3: "#171A21".to_string(),
            circle4: "#417A9B".to_string(),
            circle5: "#E3E3E3".to_string(),
        }
    }

    #[test]
    fn test_parse_rgb() {
        let colors = resolve(&palette_of("#112233")).unwrap();
        assert_eq!(
            colors.primary,
            Rgba::new(0x11 as f32 / 255.0, 0x22 as f32 / 255.0, 0x33 as f32 / 255.0, 1.0)
        );
    }

    #[test]
    fn test_parse_rgba() {
        let colors = resolve(&palette_of("#11223344")).unwrap();
        assert_eq!(colors.primary.a, 0x44 as f32 / 255.0);
    }

    #[test]
    fn test_missing_hash_accepted() {
        let colors = resolve(&palette_of("112233")).unwrap();
        assert_eq!(colors.primary.b, 0x33 as f32 / 255.0);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = resolve(&palette_of("11223")).unwrap_err();
        assert_eq!(err.field, "primary");
        assert_eq!(err.value, "11223");
    }

    #[test]
    fn test_non_hex_rejected() {
        assert!(resolve(&palette_of("#11223G")).is_err());
    }

    #[test]
    fn test_error_names_offending_field() {
        let mut palette = palette_of("#112233");
        palette.circle4 = "oops".to_string();
        let err = resolve(&palette).unwrap_err();
        assert_eq!(err.field, "circle4");
    }

    #[test]
    fn test_lenient_substitutes_only_bad_fields() {
        let mut palette = palette_of("#112233");
        palette.circle2 = "nope".to_string();

        let colors = resolve_lenient(&palette);
        assert_eq!(colors.circles[1], DEFAULT_COLOR);
        assert_eq!(colors.primary, Rgba::new(0x11 as f32 / 255.0, 0x22 as f32 / 255.0, 0x33 as f32 / 255.0, 1.0));
    }
}

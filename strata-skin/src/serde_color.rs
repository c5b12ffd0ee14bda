//! Custom serialization helpers for vello::peniko::Color

use serde::{Deserialize, Deserializer, Serializer};
use vello::peniko::Color;

use crate::error::{SkinError, SkinResult};

/// Serialize a Color as a hex string.
pub fn serialize<S>(color: &Color, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_hex(*color))
}

/// Deserialize a Color from a hex string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let hex = String::deserialize(deserializer)?;
    parse_hex(&hex).map_err(Error::custom)
}

/// Format a colour as `#rrggbb`, or `#rrggbbaa` when it is not opaque.
pub fn to_hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    if rgba.a == 255 {
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

/// Parse `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
pub fn parse_hex(value: &str) -> SkinResult<Color> {
    let hex = value.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return Err(SkinError::invalid_color(value, "not a hex string"));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| SkinError::invalid_color(value, "invalid hex digit"))
    };
    match hex.len() {
        6 => Ok(Color::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        8 => Ok(Color::from_rgba8(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => Err(SkinError::invalid_color(
            value,
            "hex color must be 6 or 8 characters",
        )),
    }
}

/// Same as the parent module, for `Option<Color>` fields.
pub mod option {
    use super::*;
    use serde::Serialize;

    /// Serialize an optional Color as a hex string or none.
    pub fn serialize<S>(color: &Option<Color>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        color.map(to_hex).serialize(serializer)
    }

    /// Deserialize an optional Color from a hex string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;
        match Option::<String>::deserialize(deserializer)? {
            Some(hex) => parse_hex(&hex).map(Some).map_err(Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_opaque_and_translucent() {
        let opaque = parse_hex("#ff8000").unwrap().to_rgba8();
        assert_eq!((opaque.r, opaque.g, opaque.b, opaque.a), (255, 128, 0, 255));

        let translucent = parse_hex("00000080").unwrap().to_rgba8();
        assert_eq!(translucent.a, 128);
    }

    #[test]
    fn rejects_bad_lengths_and_digits() {
        assert!(matches!(
            parse_hex("#fff"),
            Err(SkinError::InvalidColor { .. })
        ));
        assert!(parse_hex("#gg0000").is_err());
        assert!(parse_hex("#ééé").is_err());
    }

    #[test]
    fn hex_output_drops_opaque_alpha() {
        assert_eq!(to_hex(Color::from_rgb8(1, 2, 3)), "#010203");
        assert_eq!(to_hex(Color::from_rgba8(1, 2, 3, 4)), "#01020304");
    }
}

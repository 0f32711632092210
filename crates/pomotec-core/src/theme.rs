//! Light and dark colour palettes for the timer screen.
//!
//! The palette roles follow the usual material naming so front ends can
//! map them onto whatever widgets they draw.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// A 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);

    pub const fn from_hex(hex: u32) -> Self {
        Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl FromStr for Rgb {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidValue {
            field: "color".into(),
            message: format!("expected #RRGGBB, got '{s}'"),
        };
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        Ok(Rgb::from_hex(value))
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn scheme(self) -> &'static ColorScheme {
        match self {
            ThemeMode::Light => &LIGHT,
            ThemeMode::Dark => &DARK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub background: Rgb,
    pub surface: Rgb,
    pub on_primary: Rgb,
    pub on_secondary: Rgb,
    pub on_background: Rgb,
    pub on_surface: Rgb,
    pub primary_container: Rgb,
    pub on_primary_container: Rgb,
    pub surface_variant: Rgb,
}

pub static DARK: ColorScheme = ColorScheme {
    primary: Rgb::from_hex(0xFF6B6B),
    secondary: Rgb::from_hex(0xFFE66D),
    background: Rgb::from_hex(0x121212),
    surface: Rgb::from_hex(0x1E1E1E),
    on_primary: Rgb::WHITE,
    on_secondary: Rgb::BLACK,
    on_background: Rgb::WHITE,
    on_surface: Rgb::WHITE,
    primary_container: Rgb::from_hex(0x3F3F3F),
    on_primary_container: Rgb::WHITE,
    surface_variant: Rgb::from_hex(0x252525),
};

pub static LIGHT: ColorScheme = ColorScheme {
    primary: Rgb::from_hex(0xB22222),
    secondary: Rgb::from_hex(0xFFD740),
    background: Rgb::from_hex(0xFFF0F0),
    surface: Rgb::WHITE,
    on_primary: Rgb::WHITE,
    on_secondary: Rgb::BLACK,
    on_background: Rgb::from_hex(0xB22222),
    on_surface: Rgb::from_hex(0xB22222),
    primary_container: Rgb::from_hex(0xFFE6E6),
    on_primary_container: Rgb::from_hex(0xB22222),
    surface_variant: Rgb::from_hex(0xFFE6E6),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_hex_display_and_parse() {
        let c = Rgb::from_hex(0xB22222);
        assert_eq!(c, Rgb(178, 34, 34));
        assert_eq!(c.to_string(), "#B22222");
        assert_eq!("#ff6b6b".parse::<Rgb>().unwrap(), Rgb(0xFF, 0x6B, 0x6B));
    }

    #[test]
    fn rgb_parse_rejects_malformed() {
        assert!("B22222".parse::<Rgb>().is_err());
        assert!("#B222".parse::<Rgb>().is_err());
        assert!("#GGGGGG".parse::<Rgb>().is_err());
    }

    #[test]
    fn toggle_switches_palette() {
        let mode = ThemeMode::default();
        assert_eq!(mode, ThemeMode::Light);
        assert_eq!(mode.scheme().background, Rgb::from_hex(0xFFF0F0));
        let dark = mode.toggled();
        assert!(dark.is_dark());
        assert_eq!(dark.scheme().background, Rgb::from_hex(0x121212));
        assert_eq!(dark.toggled(), ThemeMode::Light);
    }

    #[test]
    fn scheme_serializes_hex_strings() {
        let json = serde_json::to_value(ThemeMode::Dark.scheme()).unwrap();
        assert_eq!(json["primary"], "#FF6B6B");
        let back: ColorScheme = serde_json::from_value(json).unwrap();
        assert_eq!(&back, &DARK);
    }
}

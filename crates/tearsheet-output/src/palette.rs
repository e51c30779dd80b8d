//! Fill colours.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::banding::Band;

/// An sRGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Packs the colour as `0xRRGGBB`.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        ((self.0 as u32) << 16) | ((self.1 as u32) << 8) | self.2 as u32
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.0, c.1, c.2]
    }
}

/// Band colours used for conditional fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Strongest positive indication.
    pub dark_green: Rgb,
    /// Medium positive.
    pub med_green: Rgb,
    /// Mild positive.
    pub light_green: Rgb,
    /// Borderline.
    pub yellow: Rgb,
    /// Mild concern.
    pub light_red: Rgb,
    /// Moderate concern.
    pub med_red: Rgb,
    /// Serious concern.
    pub dark_red: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            dark_green: Rgb(51, 153, 51),
            med_green: Rgb(102, 187, 102),
            light_green: Rgb(144, 213, 144),
            yellow: Rgb(255, 217, 102),
            light_red: Rgb(247, 153, 153),
            med_red: Rgb(230, 102, 102),
            dark_red: Rgb(204, 51, 51),
        }
    }
}

impl Palette {
    /// Builds a palette from `NAME -> [r, g, b]` entries. Names not given keep
    /// their default colour; unknown names are ignored.
    #[must_use]
    pub fn from_named(colors: &BTreeMap<String, Rgb>) -> Self {
        let mut palette = Self::default();
        for (name, &rgb) in colors {
            match name.as_str() {
                "DARK_GREEN" => palette.dark_green = rgb,
                "MED_GREEN" => palette.med_green = rgb,
                "LIGHT_GREEN" => palette.light_green = rgb,
                "YELLOW" => palette.yellow = rgb,
                "LIGHT_RED" => palette.light_red = rgb,
                "MED_RED" => palette.med_red = rgb,
                "DARK_RED" => palette.dark_red = rgb,
                other => tracing::warn!(name = other, "ignoring unknown colour"),
            }
        }
        palette
    }

    /// Fill colour for a band.
    #[must_use]
    pub const fn color(&self, band: Band) -> Rgb {
        match band {
            Band::DarkGreen => self.dark_green,
            Band::MedGreen => self.med_green,
            Band::LightGreen => self.light_green,
            Band::Yellow => self.yellow,
            Band::LightRed => self.light_red,
            Band::MedRed => self.med_red,
            Band::DarkRed => self.dark_red,
        }
    }
}

//! Sensor quantum-efficiency profiles used to weight RGB into luminance.
//!
//! Profiles are plain data. The pipeline receives an explicit
//! [`SensorProfileTable`] instead of reaching into a global array, so custom
//! tables can be injected in tests or by host applications.

use strum_macros::{Display, EnumIter};

use crate::error::{Error, Result};

/// Broad family a profile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SensorCategory {
    /// Colour standards (Rec.709).
    Standard,
    /// One-shot-colour camera sensors.
    Sensor,
    /// Narrowband false-colour palettes.
    Narrowband,
}

/// Relative red/green/blue quantum-efficiency weights for one sensor.
///
/// Weights are non-negative and need not sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorProfile {
    pub name: String,
    pub description: String,
    pub category: SensorCategory,
    pub r_weight: f32,
    pub g_weight: f32,
    pub b_weight: f32,
}

impl SensorProfile {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: SensorCategory,
        weights: [f32; 3],
    ) -> Self {
        let [r_weight, g_weight, b_weight] = weights;
        Self {
            name: name.into(),
            description: description.into(),
            category,
            r_weight,
            g_weight,
            b_weight,
        }
    }

    #[inline]
    pub fn weights(&self) -> [f32; 3] {
        [self.r_weight, self.g_weight, self.b_weight]
    }

    /// Weighted sum of one RGB triple.
    #[inline]
    pub fn luminance(&self, r: f32, g: f32, b: f32) -> f32 {
        self.r_weight * r + self.g_weight * g + self.b_weight * b
    }
}

/// Immutable, index-addressable collection of sensor profiles.
#[derive(Debug, Clone)]
pub struct SensorProfileTable {
    profiles: Vec<SensorProfile>,
}

/// (name, description, category, [r, g, b])
type ProfileRow = (&'static str, &'static str, SensorCategory, [f32; 3]);

const BUILTIN_PROFILES: &[ProfileRow] = {
    use SensorCategory::*;
    &[
        (
            "Rec.709 (Recommended)",
            "ITU-R BT.709 standard for sRGB/HDTV",
            Standard,
            [0.2126, 0.7152, 0.0722],
        ),
        (
            "Sony IMX571 (ASI2600/QHY268)",
            "Sony IMX571 26MP APS-C BSI (STARVIS)",
            Sensor,
            [0.2944, 0.5021, 0.2035],
        ),
        (
            "Sony IMX455 (ASI6200/QHY600)",
            "Sony IMX455 61MP Full Frame BSI",
            Sensor,
            [0.2987, 0.5001, 0.2013],
        ),
        (
            "Sony IMX410 (ASI2400)",
            "Sony IMX410 24MP Full Frame (Large Pixels)",
            Sensor,
            [0.3015, 0.5050, 0.1935],
        ),
        (
            "Sony IMX269 (Altair/ToupTek)",
            "Sony IMX269 20MP 4/3\" BSI",
            Sensor,
            [0.3040, 0.5010, 0.1950],
        ),
        (
            "Sony IMX294 (ASI294)",
            "Sony IMX294 11.7MP 4/3\" BSI",
            Sensor,
            [0.3068, 0.5008, 0.1925],
        ),
        (
            "Sony IMX533 (ASI533)",
            "Sony IMX533 9MP 1\" Square BSI",
            Sensor,
            [0.2910, 0.5072, 0.2018],
        ),
        (
            "Sony IMX676 (ASI676)",
            "Sony IMX676 12MP Square BSI (Starvis 2)",
            Sensor,
            [0.2880, 0.5100, 0.2020],
        ),
        (
            "Sony IMX585 (ASI585)",
            "Sony IMX585 8.3MP 1/1.2\" BSI (STARVIS 2)",
            Sensor,
            [0.3431, 0.4822, 0.1747],
        ),
        (
            "Sony IMX662 (ASI662)",
            "Sony IMX662 2.1MP 1/2.8\" BSI (STARVIS 2)",
            Sensor,
            [0.3430, 0.4821, 0.1749],
        ),
        (
            "Sony IMX678 (ASI678)",
            "Sony IMX678 8MP BSI (STARVIS 2)",
            Sensor,
            [0.3426, 0.4825, 0.1750],
        ),
        (
            "Sony IMX462 (ASI462)",
            "Sony IMX462 2MP 1/2.8\" (High NIR)",
            Sensor,
            [0.3333, 0.4866, 0.1801],
        ),
        (
            "Sony IMX715 (ASI715)",
            "Sony IMX715 8MP (Starvis 2)",
            Sensor,
            [0.3410, 0.4840, 0.1750],
        ),
        (
            "Sony IMX482 (ASI482)",
            "Sony IMX482 2MP (Large Pixels)",
            Sensor,
            [0.3150, 0.4950, 0.1900],
        ),
        (
            "Sony IMX183 (ASI183)",
            "Sony IMX183 20MP 1\" BSI",
            Sensor,
            [0.2967, 0.4983, 0.2050],
        ),
        (
            "Sony IMX178 (ASI178)",
            "Sony IMX178 6.4MP 1/1.8\" BSI",
            Sensor,
            [0.2346, 0.5206, 0.2448],
        ),
        (
            "Sony IMX224 (ASI224)",
            "Sony IMX224 1.27MP 1/3\" BSI",
            Sensor,
            [0.3402, 0.4765, 0.1833],
        ),
        (
            "Canon EOS (Modern)",
            "Canon CMOS (Digic 4/5 Era)",
            Sensor,
            [0.2600, 0.5200, 0.2200],
        ),
        (
            "Canon EOS (Legacy)",
            "Canon CMOS (Legacy Digic 2/3)",
            Sensor,
            [0.2450, 0.5350, 0.2200],
        ),
        (
            "Nikon DSLR (Modern)",
            "Nikon DX/FX CMOS (Modern)",
            Sensor,
            [0.2650, 0.5100, 0.2250],
        ),
        (
            "Nikon DSLR (Legacy)",
            "Nikon CMOS (Legacy)",
            Sensor,
            [0.2500, 0.5300, 0.2200],
        ),
        (
            "Fujifilm X-Trans 5 HR",
            "Fujifilm X-Trans 5 (40MP)",
            Sensor,
            [0.2800, 0.5100, 0.2100],
        ),
        (
            "Panasonic MN34230 (ASI1600)",
            "Panasonic MN34230 4/3\" CMOS",
            Sensor,
            [0.2650, 0.5250, 0.2100],
        ),
        (
            "ZWO Seestar S50",
            "ZWO Seestar S50 (IMX462)",
            Sensor,
            [0.3333, 0.4866, 0.1801],
        ),
        (
            "ZWO Seestar S30",
            "ZWO Seestar S30",
            Sensor,
            [0.2928, 0.5053, 0.2019],
        ),
        (
            "Narrowband HOO",
            "Bicolor palette: Ha=Red, OIII=Green+Blue",
            Narrowband,
            [0.5000, 0.2500, 0.2500],
        ),
        (
            "Narrowband SHO",
            "Hubble palette: SII=Red, Ha=Green, OIII=Blue",
            Narrowband,
            [0.3333, 0.3400, 0.3267],
        ),
    ]
};

impl SensorProfileTable {
    /// Build a table from custom profiles.
    pub fn new(profiles: Vec<SensorProfile>) -> Self {
        Self { profiles }
    }

    /// The built-in sensor database. Index 0 is Rec.709.
    pub fn builtin() -> Self {
        let profiles = BUILTIN_PROFILES
            .iter()
            .map(|&(name, description, category, weights)| {
                SensorProfile::new(name, description, category, weights)
            })
            .collect();
        Self { profiles }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&SensorProfile> {
        self.profiles.get(index).ok_or(Error::UnknownSensorProfile {
            index,
            available: self.profiles.len(),
        })
    }

    /// Index of the first profile whose name matches case-insensitively.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.profiles
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorProfile> {
        self.profiles.iter()
    }

    /// Profiles of one category, with their table indices.
    pub fn in_category(
        &self,
        category: SensorCategory,
    ) -> impl Iterator<Item = (usize, &SensorProfile)> {
        self.profiles
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.category == category)
    }
}

impl Default for SensorProfileTable {
    fn default() -> Self {
        Self::builtin()
    }
}

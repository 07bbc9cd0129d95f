//! Transport modes and their presentation metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a line type string names no known mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport mode: {0}")]
pub struct UnknownMode(String);

/// The kind of vehicle serving a line.
///
/// Every mode-dependent decision (labels, colors, icons, the per-stop ride
/// estimate) goes through a `match` on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Metro,
    /// Commuter rail (Cercanías).
    #[serde(alias = "cercanias", alias = "rail")]
    Commuter,
    Tram,
    /// Light metro (Metro Ligero).
    #[serde(alias = "metro_ligero")]
    LightMetro,
}

impl TransportMode {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TransportMode::Metro => "Metro",
            TransportMode::Commuter => "Cercanías",
            TransportMode::Tram => "Tram",
            TransportMode::LightMetro => "Metro Ligero",
        }
    }

    /// Color used when a line carries none of its own (hex RGB, no '#').
    pub fn default_color(&self) -> &'static str {
        match self {
            TransportMode::Metro => "005AA9",
            TransportMode::Commuter => "E1001A",
            TransportMode::Tram => "3BA935",
            TransportMode::LightMetro => "70A0D9",
        }
    }

    /// Icon name for map markers.
    pub fn icon(&self) -> &'static str {
        match self {
            TransportMode::Metro => "tram.fill.tunnel",
            TransportMode::Commuter => "train.side.front.car",
            TransportMode::Tram => "tram.fill",
            TransportMode::LightMetro => "lightrail.fill",
        }
    }

    /// Minutes assumed per stop when estimating a ride segment's duration.
    pub fn minutes_per_stop(&self) -> f64 {
        match self {
            TransportMode::Metro
            | TransportMode::Commuter
            | TransportMode::Tram
            | TransportMode::LightMetro => 2.0,
        }
    }
}

impl FromStr for TransportMode {
    type Err = UnknownMode;

    /// Accepts mode names as well as the network's numeric type codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metro" | "4" => Ok(TransportMode::Metro),
            "commuter" | "cercanias" | "cercanías" | "rail" | "5" => Ok(TransportMode::Commuter),
            "tram" | "tranvia" | "tranvía" | "12" => Ok(TransportMode::Tram),
            "light_metro" | "metro_ligero" | "ml" | "10" => Ok(TransportMode::LightMetro),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

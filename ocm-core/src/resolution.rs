use crate::config::ZoomThresholds;
use crate::error::GeoError;
use serde::{Deserialize, Serialize};

/// One of three nested geographic granularities, coarsest first.
///
/// On the wire (backend requests and the `g` URL key) a level is its
/// integer value 1, 2 or 3.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub enum ResolutionLevel {
    /// Level 1: Local Authorities
    #[default]
    LocalAuthority = 1,
    /// Level 2: MSOA / Intermediate Zones
    Intermediate = 2,
    /// Level 3: LSOA / Data Zones
    DataZone = 3,
}

impl ResolutionLevel {
    pub const ALL: [ResolutionLevel; 3] = [
        ResolutionLevel::LocalAuthority,
        ResolutionLevel::Intermediate,
        ResolutionLevel::DataZone,
    ];

    pub fn level(self) -> u8 {
        self as u8
    }

    /// Short label shown when hovering a feature, e.g. "Local Authority: Fife".
    pub fn short_name(self) -> &'static str {
        match self {
            ResolutionLevel::LocalAuthority => "Local Authority",
            ResolutionLevel::Intermediate => "MSOA/Intermediate",
            ResolutionLevel::DataZone => "LSOA/Datazone",
        }
    }

    pub fn descriptive_name(self) -> &'static str {
        match self {
            ResolutionLevel::LocalAuthority => "Local Authorities",
            ResolutionLevel::Intermediate => "MSOA/Intermediate Zones",
            ResolutionLevel::DataZone => "LSOA/Data Zones",
        }
    }

    /// Highlight colour for selected areas of this level.
    pub fn colour(self) -> &'static str {
        match self {
            ResolutionLevel::LocalAuthority => "#3f51b5",
            ResolutionLevel::Intermediate => "#9c27b0",
            ResolutionLevel::DataZone => "#4caf50",
        }
    }

    /// Whether the user may explicitly select this level at `zoom`.
    /// Level 1 is always available.
    pub fn is_available_at(self, zoom: u32, thresholds: &ZoomThresholds) -> bool {
        match self {
            ResolutionLevel::LocalAuthority => true,
            ResolutionLevel::Intermediate => zoom >= thresholds.show_level_2,
            ResolutionLevel::DataZone => zoom >= thresholds.show_level_3,
        }
    }
}

impl TryFrom<i64> for ResolutionLevel {
    type Error = GeoError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ResolutionLevel::LocalAuthority),
            2 => Ok(ResolutionLevel::Intermediate),
            3 => Ok(ResolutionLevel::DataZone),
            other => Err(GeoError::InvalidResolution(other)),
        }
    }
}

impl From<ResolutionLevel> for i64 {
    fn from(level: ResolutionLevel) -> Self {
        level as i64
    }
}

impl std::fmt::Display for ResolutionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// Pick the resolution to show after the map settles at `zoom`.
///
/// Zooming out below a level's reveal threshold drops to the next coarser
/// level. Zooming in never raises the level: finer levels are only ever
/// chosen explicitly by the user.
pub fn resolution_for_zoom(
    zoom: u32,
    current: ResolutionLevel,
    thresholds: &ZoomThresholds,
) -> ResolutionLevel {
    if zoom < thresholds.show_level_2 && current >= ResolutionLevel::Intermediate {
        ResolutionLevel::LocalAuthority
    } else if zoom < thresholds.show_level_3 && current >= ResolutionLevel::DataZone {
        ResolutionLevel::Intermediate
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_out_drops_to_coarsest() {
        let thresholds = ZoomThresholds::default();
        assert_eq!(
            resolution_for_zoom(5, ResolutionLevel::DataZone, &thresholds),
            ResolutionLevel::LocalAuthority
        );
        assert_eq!(
            resolution_for_zoom(7, ResolutionLevel::Intermediate, &thresholds),
            ResolutionLevel::LocalAuthority
        );
    }

    #[test]
    fn test_zoom_between_thresholds_drops_one_level() {
        let thresholds = ZoomThresholds::default();
        assert_eq!(
            resolution_for_zoom(8, ResolutionLevel::DataZone, &thresholds),
            ResolutionLevel::Intermediate
        );
        assert_eq!(
            resolution_for_zoom(8, ResolutionLevel::Intermediate, &thresholds),
            ResolutionLevel::Intermediate
        );
    }

    #[test]
    fn test_zoom_in_never_upgrades() {
        let thresholds = ZoomThresholds::default();
        assert_eq!(
            resolution_for_zoom(10, ResolutionLevel::LocalAuthority, &thresholds),
            ResolutionLevel::LocalAuthority
        );
        assert_eq!(
            resolution_for_zoom(15, ResolutionLevel::Intermediate, &thresholds),
            ResolutionLevel::Intermediate
        );
        assert_eq!(
            resolution_for_zoom(9, ResolutionLevel::DataZone, &thresholds),
            ResolutionLevel::DataZone
        );
    }

    #[test]
    fn test_availability() {
        let thresholds = ZoomThresholds::default();
        assert!(ResolutionLevel::LocalAuthority.is_available_at(0, &thresholds));
        assert!(!ResolutionLevel::Intermediate.is_available_at(7, &thresholds));
        assert!(ResolutionLevel::Intermediate.is_available_at(8, &thresholds));
        assert!(!ResolutionLevel::DataZone.is_available_at(8, &thresholds));
        assert!(ResolutionLevel::DataZone.is_available_at(9, &thresholds));
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(serde_json::to_string(&ResolutionLevel::Intermediate).unwrap(), "2");
        let level: ResolutionLevel = serde_json::from_str("3").unwrap();
        assert_eq!(level, ResolutionLevel::DataZone);
        assert!(serde_json::from_str::<ResolutionLevel>("4").is_err());
        assert_eq!(ResolutionLevel::try_from(0), Err(GeoError::InvalidResolution(0)));
    }
}

//! Charging-station records and their derived fields.

use ev_core::{GeoPoint, StationId};

/// Rated power per port, kW.
pub const LEVEL1_KW: f64 = 1.2;
pub const LEVEL2_KW: f64 = 7.6;
pub const DC_FAST_KW: f64 = 50.0;

/// Per-level port counts.  `None` means the source cell was empty or not a
/// usable number; it contributes zero to every derived value.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PortCounts {
    pub level1:  Option<f64>,
    pub level2:  Option<f64>,
    pub dc_fast: Option<f64>,
}

impl PortCounts {
    /// Weighted sum of port counts, kW (unrounded).
    pub fn capacity_kw(&self) -> f64 {
        LEVEL1_KW * self.level1.unwrap_or(0.0)
            + LEVEL2_KW * self.level2.unwrap_or(0.0)
            + DC_FAST_KW * self.dc_fast.unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.level1.unwrap_or(0.0) + self.level2.unwrap_or(0.0) + self.dc_fast.unwrap_or(0.0)
    }
}

/// One station from the source export.
#[derive(Clone, Debug, PartialEq)]
pub struct StationRecord {
    pub id:              StationId,
    pub name:            String,
    pub pos:             GeoPoint,
    pub ports:           PortCounts,
    pub connector_types: Vec<String>,
    /// Every source field, verbatim, in source column order.
    pub raw:             Vec<String>,
}

impl StationRecord {
    /// Rated capacity rounded to whole kW.
    pub fn capacity_kw(&self) -> i64 {
        self.ports.capacity_kw().round() as i64
    }

    /// Capacity as persisted, e.g. `"2kW"`.
    pub fn capacity_label(&self) -> String {
        format!("{}kW", self.capacity_kw())
    }

    pub fn port_count(&self) -> f64 {
        self.ports.total()
    }

    /// Connector list as persisted, e.g. `"J1772, CHADEMO"`.
    pub fn connector_label(&self) -> String {
        self.connector_types.join(", ")
    }
}

/// Parse a port-count cell.  Empty, non-numeric, negative, or non-finite
/// values yield `None`.
pub fn parse_count(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Split a space-separated connector cell (`"J1772 CHADEMO"`) into labels.
pub fn normalize_connectors(s: &str) -> Vec<String> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

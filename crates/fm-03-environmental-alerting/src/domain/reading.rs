use fleet_types::FleetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of environmental reading a shipment can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingKind {
    Temperature,
    Humidity,
    Shock,
}

impl ReadingKind {
    pub const ALL: [ReadingKind; 3] = [
        ReadingKind::Temperature,
        ReadingKind::Humidity,
        ReadingKind::Shock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingKind::Temperature => "temperature",
            ReadingKind::Humidity => "humidity",
            ReadingKind::Shock => "shock",
        }
    }
}

impl fmt::Display for ReadingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingKind {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                FleetError::invalid(format!(
                    "invalid log type '{s}': expected temperature, humidity or shock"
                ))
            })
    }
}

use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

/// Length units a measurement can be shown in. The order is the order of the
/// unit picker and of the digit shortcuts (1 = millimeters ... 9 = nautical miles).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, EnumCount)]
#[strum(ascii_case_insensitive)]
pub enum Unit {
    #[strum(serialize = "mm")]
    Millimeter,
    #[strum(serialize = "cm")]
    Centimeter,
    #[default]
    #[strum(serialize = "m")]
    Meter,
    #[strum(serialize = "km")]
    Kilometer,
    #[strum(serialize = "in")]
    Inch,
    #[strum(serialize = "ft")]
    Foot,
    #[strum(serialize = "yd")]
    Yard,
    #[strum(serialize = "mi")]
    Mile,
    #[strum(serialize = "nmi")]
    NauticalMile,
}

impl Unit {
    /// Multiplier converting meters into this unit.
    pub fn factor(self) -> f64 {
        match self {
            Unit::Millimeter => 1000.0,
            Unit::Centimeter => 100.0,
            Unit::Meter => 1.0,
            Unit::Kilometer => 0.001,
            Unit::Inch => 1.0 / 0.0254,
            Unit::Foot => 1.0 / 0.3048,
            Unit::Yard => 1.0 / 0.9144,
            Unit::Mile => 1.0 / 1609.344,
            Unit::NauticalMile => 1.0 / 1852.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Unit::Millimeter => "millimeters",
            Unit::Centimeter => "centimeters",
            Unit::Meter => "meters",
            Unit::Kilometer => "kilometers",
            Unit::Inch => "inches",
            Unit::Foot => "feet",
            Unit::Yard => "yards",
            Unit::Mile => "miles",
            Unit::NauticalMile => "nautical miles",
        }
    }

    /// Zero-based position in the unit table.
    pub fn from_index(index: usize) -> Option<Self> {
        Unit::iter().nth(index)
    }

    pub fn index(self) -> usize {
        Unit::iter().position(|unit| unit == self).unwrap_or(0)
    }

    pub fn from_meters(self, meters: f64) -> f64 {
        meters * self.factor()
    }

    pub fn to_meters(self, value: f64) -> f64 {
        value / self.factor()
    }
}

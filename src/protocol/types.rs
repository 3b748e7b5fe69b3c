use core::fmt;

use thiserror::Error;

use super::registers::Decoding;

/// Raw value byte for fan speeds 1 to 8: one more low bit set per step.
const FAN_SPEEDS: [u8; 8] = [0x01, 0x03, 0x07, 0x0f, 0x1f, 0x3f, 0x7f, 0xff];

/// `value_to_speed` result for a byte that is not one of the eight patterns.
pub const UNKNOWN_SPEED: i8 = -1;

const RH_OFFSET: u32 = 51;
const DUTY_CYCLE_DIVIDER: f64 = 2.5;

/// Celsius for every raw temperature byte, as the controller reports it.
static TEMPERATURES: [i8; 256] = [
     -74,  -70,  -66,  -62,  -59,  -56,  -54,  -52,  -50,  -48,  -47,  -46,  -44,  -43,  -42,  -41,
     -40,  -39,  -38,  -37,  -36,  -35,  -34,  -33,  -33,  -32,  -31,  -30,  -30,  -29,  -28,  -28,
     -27,  -27,  -26,  -25,  -25,  -24,  -24,  -23,  -23,  -22,  -22,  -21,  -21,  -20,  -20,  -19,
     -19,  -19,  -18,  -18,  -17,  -17,  -16,  -16,  -16,  -15,  -15,  -14,  -14,  -14,  -13,  -13,
     -12,  -12,  -12,  -11,  -11,  -11,  -10,  -10,   -9,   -9,   -9,   -8,   -8,   -8,   -7,   -7,
      -7,   -6,   -6,   -6,   -5,   -5,   -5,   -4,   -4,   -4,   -3,   -3,   -3,   -2,   -2,   -2,
      -1,   -1,   -1,   -1,    0,    0,    0,    1,    1,    1,    2,    2,    2,    3,    3,    3,
       4,    4,    4,    5,    5,    5,    5,    6,    6,    6,    7,    7,    7,    8,    8,    8,
       9,    9,    9,   10,   10,   10,   11,   11,   11,   12,   12,   12,   13,   13,   13,   14,
      14,   14,   15,   15,   15,   16,   16,   16,   17,   17,   18,   18,   18,   19,   19,   19,
      20,   20,   21,   21,   21,   22,   22,   22,   23,   23,   24,   24,   24,   25,   25,   26,
      26,   27,   27,   27,   28,   28,   29,   29,   30,   30,   31,   31,   32,   32,   33,   33,
      34,   34,   35,   35,   36,   36,   37,   37,   38,   38,   39,   40,   40,   41,   41,   42,
      43,   43,   44,   45,   45,   46,   47,   48,   48,   49,   50,   51,   52,   53,   53,   54,
      55,   56,   57,   59,   60,   61,   62,   63,   65,   66,   68,   69,   71,   73,   75,   77,
      79,   81,   82,   86,   90,   93,   97,  100,  100,  100,  100,  100,  100,  100,  100,  100,
];

#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("invalid fan speed {0}, must be 1-8")]
pub struct InvalidSpeedLevel(pub u8);

#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("invalid panel address {0:#04x}, must be 0x20-0x2f")]
pub struct InvalidAddress(pub u8);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FanSpeed(u8);

impl FanSpeed {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    pub fn new(level: u8) -> Result<Self, InvalidSpeedLevel> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(FanSpeed(level))
        } else {
            Err(InvalidSpeedLevel(level))
        }
    }

    pub fn from_raw(raw: u8) -> Option<Self> {
        FAN_SPEEDS.iter().position(|v| *v == raw).map(|i| FanSpeed(i as u8 + 1))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn to_raw(self) -> u8 {
        FAN_SPEEDS[usize::from(self.0 - 1)]
    }
}

/// Bus address of a remote panel. Only 0x20 to 0x2f are panels, and 0x20
/// itself is the all-panels broadcast group.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PanelAddress(u8);

impl PanelAddress {
    pub const MIN: u8 = 0x20;
    pub const MAX: u8 = 0x2f;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for PanelAddress {
    fn default() -> Self {
        PanelAddress(0x27)
    }
}

impl TryFrom<u8> for PanelAddress {
    type Error = InvalidAddress;

    fn try_from(address: u8) -> Result<Self, InvalidAddress> {
        if (Self::MIN..=Self::MAX).contains(&address) {
            Ok(PanelAddress(address))
        } else {
            Err(InvalidAddress(address))
        }
    }
}

/// A translated register value.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Int(i16),
    Float(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
        }
    }
}

impl Decoding {
    pub fn decode(self, raw: u8) -> Value {
        match self {
            Decoding::FanSpeed => Value::Int(i16::from(value_to_speed(raw))),
            Decoding::Humidity => Value::Float(value_to_rh(raw)),
            Decoding::Temperature => Value::Int(i16::from(value_to_temp(raw))),
            Decoding::DutyCycle => Value::Float(value_to_duty_cycle(raw)),
            Decoding::Raw => Value::Int(i16::from(raw)),
        }
    }
}

/// Fan speed 1-8, or [`UNKNOWN_SPEED`].
pub fn value_to_speed(raw: u8) -> i8 {
    FanSpeed::from_raw(raw).map_or(UNKNOWN_SPEED, |s| s.level() as i8)
}

pub fn speed_to_value(level: u8) -> Result<u8, InvalidSpeedLevel> {
    FanSpeed::new(level).map(FanSpeed::to_raw)
}

/// Relative humidity in percent, `(raw + 51) / 2.04` rounded to hundredths.
pub fn value_to_rh(raw: u8) -> f64 {
    // (raw + 51) * 100 / 2.04 == (raw + 51) * 10000 / 204; never lands on .5
    let hundredths = ((u32::from(raw) + RH_OFFSET) * 10_000 + 102) / 204;
    f64::from(hundredths) / 100.0
}

pub fn value_to_temp(raw: u8) -> i8 {
    TEMPERATURES[usize::from(raw)]
}

/// Share of time a heating element is on, in percent.
pub fn value_to_duty_cycle(raw: u8) -> f64 {
    f64::from(raw) / DUTY_CYCLE_DIVIDER
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn speed_patterns() {
        for level in 1..=8 {
            assert_eq!(value_to_speed(speed_to_value(level).unwrap()), level as i8);
        }
        assert_eq!(speed_to_value(4), Ok(0x0f));
        assert_eq!(value_to_speed(0x00), -1);
        assert_eq!(value_to_speed(0x02), -1);
    }

    #[test]
    fn speed_out_of_range() {
        assert_eq!(FanSpeed::new(0), Err(InvalidSpeedLevel(0)));
        assert_eq!(FanSpeed::new(9), Err(InvalidSpeedLevel(9)));
        assert_eq!(speed_to_value(200), Err(InvalidSpeedLevel(200)));
    }

    #[test]
    fn fan_speed_raw_pattern() {
        assert_eq!(FanSpeed::new(3).map(FanSpeed::to_raw), Ok(0x07));
        assert_eq!(FanSpeed::from_raw(0x07).map(FanSpeed::level), Some(3));
    }

    #[test]
    fn temperature_table_ends() {
        assert_eq!(value_to_temp(0), -74);
        assert_eq!(value_to_temp(1), -70);
        assert_eq!(value_to_temp(100), 0);
        assert_eq!(value_to_temp(246), 97);
        assert_eq!(value_to_temp(247), 100);
        assert_eq!(value_to_temp(255), 100);
    }

    #[test]
    fn temperature_table_is_monotonic() {
        assert!(TEMPERATURES.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn humidity() {
        assert!(close(value_to_rh(0), 25.0));
        assert!(close(value_to_rh(1), 25.49));
        assert!(close(value_to_rh(153), 100.0));
        assert!(close(value_to_rh(255), 150.0));
    }

    #[test]
    fn duty_cycle() {
        assert!(close(value_to_duty_cycle(0), 0.0));
        assert!(close(value_to_duty_cycle(125), 50.0));
        assert!(close(value_to_duty_cycle(250), 100.0));
    }

    #[test]
    fn decode_by_rule() {
        assert_eq!(Decoding::FanSpeed.decode(0x1f), Value::Int(5));
        assert_eq!(Decoding::Temperature.decode(0x00), Value::Int(-74));
        assert_eq!(Decoding::Raw.decode(0xff), Value::Int(255));
        assert_eq!(Decoding::DutyCycle.decode(5), Value::Float(2.0));
    }

    #[test]
    fn panel_address_range() {
        assert_eq!(PanelAddress::try_from(0x1f), Err(InvalidAddress(0x1f)));
        assert_eq!(PanelAddress::try_from(0x30), Err(InvalidAddress(0x30)));
        assert_eq!(PanelAddress::try_from(0x20).map(PanelAddress::get), Ok(0x20));
        assert_eq!(PanelAddress::try_from(0x2f).map(PanelAddress::get), Ok(0x2f));
        assert_eq!(PanelAddress::default().get(), 0x27);
    }
}

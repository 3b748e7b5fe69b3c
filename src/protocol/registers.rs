
/// Protocol/domain identifier carried in the first byte of every frame.
pub const DOMAIN: u8 = 0x01;
/// Register byte of a poll frame.
pub const POLL_BYTE: u8 = 0x00;
/// Broadcast group of all mainboards.
pub const MAINBOARDS: u8 = 0x10;
/// The primary controller.
pub const MAINBOARD_1: u8 = 0x11;
/// Broadcast group of all remote panels.
pub const PANELS: u8 = 0x20;
pub const PANEL_1: u8 = 0x21;

/// How the raw value byte of a register is turned into a physical value.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Decoding {
    FanSpeed,
    Humidity,
    Temperature,
    DutyCycle,
    Raw,
}

impl Decoding {
    /// Total over all register ids: anything outside the catalog is `Raw`.
    pub fn for_register(id: u8) -> Self {
        Register::try_from(id).map(Register::decoding).unwrap_or(Decoding::Raw)
    }
}

macro_rules! registers {
    ( $( $(#[$doc:meta])* $name:ident = $id:literal => $decoding:ident, )* ) => {
        /// Registers of the ventilation controller, in the order they are
        /// polled at startup.
        #[repr(u8)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum Register {
            $( $(#[$doc])* $name = $id, )*
        }

        impl Register {
            pub const ALL: &'static [Register] = &[ $( Register::$name, )* ];

            pub fn decoding(self) -> Decoding {
                match self {
                    $( Register::$name => Decoding::$decoding, )*
                }
            }
        }

        impl TryFrom<u8> for Register {
            type Error = u8;

            fn try_from(byte: u8) -> Result<Self, u8> {
                match byte {
                    $( $id => Ok(Register::$name), )*
                    other => Err(other),
                }
            }
        }
    }
}

registers! {
    IO07 = 0x07 => Raw,
    IO08 = 0x08 => Raw,
    CurrentFanSpeed = 0x29 => FanSpeed,
    MaxRH = 0x2a => Humidity,
    CurrentCO2 = 0x2b => Raw,
    MaximumCO2 = 0x2c => Raw,
    CO2Status = 0x2d => Raw,
    Message = 0x2e => Raw,
    RH1 = 0x2f => Humidity,
    RH2 = 0x30 => Humidity,
    OutdoorTemp = 0x32 => Temperature,
    ExhaustOutTemp = 0x33 => Temperature,
    ExhaustInTemp = 0x34 => Temperature,
    SupplyTemp = 0x35 => Temperature,
    FaultCode = 0x36 => Raw,
    PostHeatingOnTime = 0x55 => DutyCycle,
    PostHeatingOffTime = 0x56 => DutyCycle,
    PostHeatingTarget = 0x57 => Temperature,
    Flags02 = 0x6d => Raw,
    Flags04 = 0x6f => Raw,
    Flags05 = 0x70 => Raw,
    Flags06 = 0x71 => Raw,
    FireplaceCounter = 0x79 => Raw,
    Status = 0xa3 => Raw,
    PostHeatingSetpoint = 0xa4 => Temperature,
    MaxFanSpeed = 0xa5 => FanSpeed,
    ServiceInterval = 0xa6 => Raw,
    PreheatingTemp = 0xa7 => Temperature,
    SupplyFanStopTemp = 0xa8 => Raw,
    DefaultFanSpeed = 0xa9 => FanSpeed,
    Program = 0xaa => Raw,
    ServiceCounter = 0xab => Raw,
    BasicHumidity = 0xae => Humidity,
    BypassTemp = 0xaf => Temperature,
    SupplyFanSetpoint = 0xb0 => Raw,
    ExhaustFanSetpoint = 0xb1 => Raw,
    AntiFreezeHysteresis = 0xb2 => Raw,
    CO2SetpointUpper = 0xb3 => Raw,
    CO2SetpointLower = 0xb4 => Raw,
    Program2 = 0xb5 => Raw,
}

/// Seen on the bus with no known meaning. Not polled at startup, decoded raw.
pub const REGISTER_8F: u8 = 0x8f;
pub const REGISTER_91: u8 = 0x91;

impl Register {
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl From<Register> for u8 {
    fn from(register: Register) -> u8 {
        register.id()
    }
}

pub mod io07 {
    pub const REHEATING: u8 = 0x20;
}

pub mod io08 {
    pub const SUMMER_MODE: u8 = 0x02;
    pub const ERROR_RELAY: u8 = 0x04;
    pub const MOTOR_IN: u8 = 0x08;
    pub const PREHEATING: u8 = 0x10;
    pub const MOTOR_OUT: u8 = 0x20;
    pub const FIREPLACE_SWITCH: u8 = 0x40;
}

/// Bits of `CO2Status`.
pub mod co2_status {
    pub const SENSOR_1: u8 = 0x02;
    pub const SENSOR_2: u8 = 0x04;
    pub const SENSOR_3: u8 = 0x08;
    pub const SENSOR_4: u8 = 0x10;
    pub const SENSOR_5: u8 = 0x20;
}

/// Values of `FaultCode`. These are codes, not bits.
pub mod fault {
    pub const SUPPLY_AIR_SENSOR: u8 = 0x05;
    pub const CARBON_DIOXIDE_ALARM: u8 = 0x06;
    pub const OUTDOOR_SENSOR: u8 = 0x07;
    pub const EXHAUST_AIR_IN_SENSOR: u8 = 0x08;
    pub const WATER_COIL_FREEZING: u8 = 0x09;
    pub const EXHAUST_AIR_OUT_SENSOR: u8 = 0x0a;
}

pub mod flags02 {
    pub const CO2_HIGHER_SPEED_REQ: u8 = 0x01;
    pub const CO2_LOWER_SPEED_REQ: u8 = 0x02;
    pub const RH_LOWER_SPEED_REQ: u8 = 0x04;
    pub const SWITCH_LOWER_SPEED_REQ: u8 = 0x08;
    pub const CO2_ALARM: u8 = 0x40;
    pub const CELL_FREEZE_ALARM: u8 = 0x80;
}

pub mod flags04 {
    pub const WATER_COIL_FREEZING: u8 = 0x10;
    pub const MASTER: u8 = 0xf0;
}

pub mod flags05 {
    pub const PREHEATING_STATUS: u8 = 0xf0;
}

pub mod flags06 {
    pub const REMOTE_CONTROL: u8 = 0x10;
    pub const ACTIVATE_FIREPLACE_SWITCH: u8 = 0x20;
    pub const FIREPLACE_FUNCTION: u8 = 0x40;
}

/// Bits of `Status`.
pub mod status {
    pub const POWER: u8 = 0x01;
    pub const CO2: u8 = 0x02;
    pub const RH: u8 = 0x04;
    pub const HEATING_MODE: u8 = 0x08;
    pub const FILTER: u8 = 0x10;
    pub const HEATING: u8 = 0x20;
    pub const FAULT: u8 = 0x40;
    pub const SERVICE: u8 = 0x80;
}

pub mod program {
    pub const AUTOMATIC_HUMIDITY: u8 = 0x10;
    pub const BOOST_SWITCH: u8 = 0x20;
    pub const WATER: u8 = 0x40;
    pub const CASCADE_CONTROL: u8 = 0x80;
}

pub mod program2 {
    pub const MAXIMUM_SPEED_LIMIT: u8 = 0x01;
}

//! Closed enumerations used by schedule keywords.
//!
//! Each enumeration is declared once as a list of `Variant => "TOKEN"` pairs.
//! The same list produces the enum, its token table and an exhaustive
//! `as_str` match, so adding a variant without a token does not compile.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant paired with its deck token, in declaration order.
            pub const TOKENS: &'static [($name, &'static str)] = &[
                $( ($name::$variant, $token), )+
            ];

            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// The deck token for this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $token, )+
                }
            }

            /// Parse a deck token. Matching is exact and case-sensitive.
            pub fn from_token(token: &str) -> Result<Self> {
                Self::TOKENS
                    .iter()
                    .find(|(_, candidate)| *candidate == token)
                    .map(|(value, _)| *value)
                    .ok_or_else(|| {
                        ScheduleError::invalid_value(format!(
                            "Unknown {} token: {:?}",
                            stringify!($name),
                            token
                        ))
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ScheduleError;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_token(s)
            }
        }
    };
}

token_enum! {
    /// Whether a completion lets fluid flow.
    CompletionState {
        /// Open to flow.
        Open => "OPEN",
        /// Opened automatically by the simulator when a well needs it.
        Auto => "AUTO",
        /// Shut in.
        Shut => "SHUT",
    }
}

token_enum! {
    /// Control mode of a group injection target.
    GroupInjectionControl {
        None => "NONE",
        Rate => "RATE",
        Resv => "RESV",
        Rein => "REIN",
        Vrep => "VREP",
        Fld => "FLD",
    }
}

token_enum! {
    /// Control mode of a group production target.
    GroupProductionControl {
        None => "NONE",
        Orat => "ORAT",
        Wrat => "WRAT",
        Grat => "GRAT",
        Lrat => "LRAT",
        Crat => "CRAT",
        Resv => "RESV",
        Prbl => "PRBL",
    }
}

token_enum! {
    /// Action taken when a group exceeds a production limit.
    GroupProductionExceedLimitAction {
        None => "NONE",
        Con => "CON",
        /// Close the worst-offending connection and all below it (`+CON`).
        ConPlus => "+CON",
        Well => "WELL",
        Plug => "PLUG",
        Rate => "RATE",
    }
}

token_enum! {
    /// Fluid phase.
    Phase {
        Oil => "OIL",
        Gas => "GAS",
        Water => "WATER",
    }
}

impl Default for CompletionState {
    fn default() -> Self {
        CompletionState::Open
    }
}

//! Enumerated values shared by the datamodel and the API surface.

use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An enum value arrived that is not part of the recognized set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value {value:?} for {field}")]
pub struct UnknownValue {
    pub field: &'static str,
    pub value: String,
}

macro_rules! wire_enum {
    ($(#[$doc:meta])* $name:ident, $field:literal, { $($variant:ident => $wire:literal,)+ }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// The wire value, also used as the stored representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(UnknownValue {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

wire_enum!(
    /// Progress of the handling of a VERZOEK.
    VerzoekStatus,
    "status",
    {
        Ontvangen => "ontvangen",
        InBehandeling => "in_behandeling",
        Afgehandeld => "afgehandeld",
        Afgewezen => "afgewezen",
        Ingetrokken => "ingetrokken",
    }
);

wire_enum!(
    /// Type of the OBJECT a relation points at.
    ObjectType,
    "objectType",
    {
        Zaak => "zaak",
    }
);

wire_enum!(
    /// Role of the KLANT within a VERZOEK.
    KlantRol,
    "rol",
    {
        Belanghebbende => "belanghebbende",
        Initiator => "initiator",
    }
);

wire_enum!(
    /// Whether the KLANT acts for itself or on behalf of another party.
    IndicatieMachtiging,
    "indicatieMachtiging",
    {
        Gemachtigde => "gemachtigde",
        Machtiginggever => "machtiginggever",
    }
);

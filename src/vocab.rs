//! Closed vocabularies for caregiver-reported observations.
//!
//! Every enumerated observation parses from its snake_case wire form through
//! [`FromStr`]; anything outside the vocabulary is a
//! [`VocabError::InvalidEnumValue`], never a silent default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{VocabError, VocabResult};

/// Declares a closed vocabulary: the enum, its wire strings, `FromStr`,
/// `Display`, and the field name reported on parse failure.
macro_rules! closed_vocab {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal, expected = $expected:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Name of the request field this vocabulary fills.
            pub const FIELD: &'static str = $field;

            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The snake_case wire string.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }
        }

        impl FromStr for $name {
            type Err = VocabError;

            fn from_str(s: &str) -> VocabResult<Self> {
                match s {
                    $( $wire => Ok($name::$variant), )+
                    other => Err(VocabError::InvalidEnumValue {
                        field: $field,
                        value: other.to_string(),
                        expected: $expected,
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

closed_vocab! {
    /// How the child fell asleep.
    SleepType, field = "sleep_type", expected = "independent, assisted" {
        /// Put down awake and fell asleep alone.
        Independent => "independent",
        /// Fed, rocked, held or otherwise helped to sleep.
        Assisted => "assisted",
    }
}

closed_vocab! {
    /// Behaviour when put down in the crib.
    PutDownBehavior,
    field = "putdown_behavior",
    expected = "cries_immediately, plays_fusses_long, calm" {
        CriesImmediately => "cries_immediately",
        PlaysFussesLong => "plays_fusses_long",
        Calm => "calm",
    }
}

closed_vocab! {
    /// Mood on waking from the sleep period.
    #[derive(Default)]
    WakeMood, field = "wake_mood", expected = "crying, happy, neutral" {
        Crying => "crying",
        Happy => "happy",
        #[default]
        Neutral => "neutral",
    }
}

closed_vocab! {
    /// Shape of the night following a bedtime.
    #[derive(Default)]
    NightPattern,
    field = "night_pattern",
    expected = "frequent_wakings, split_nights, normal" {
        FrequentWakings => "frequent_wakings",
        /// Long, happy awake stretch in the middle of the night.
        SplitNights => "split_nights",
        #[default]
        Normal => "normal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_every_wire_string() {
        for st in SleepType::ALL {
            assert_eq!(st.as_str().parse::<SleepType>().unwrap(), *st);
        }
        for pb in PutDownBehavior::ALL {
            assert_eq!(pb.as_str().parse::<PutDownBehavior>().unwrap(), *pb);
        }
        for wm in WakeMood::ALL {
            assert_eq!(wm.as_str().parse::<WakeMood>().unwrap(), *wm);
        }
        for np in NightPattern::ALL {
            assert_eq!(np.as_str().parse::<NightPattern>().unwrap(), *np);
        }
    }

    #[test]
    fn unknown_value_is_rejected_with_field_name() {
        let err = "nursed".parse::<SleepType>().unwrap_err();
        match err {
            VocabError::InvalidEnumValue { field, value, .. } => {
                assert_eq!(field, "sleep_type");
                assert_eq!(value, "nursed");
            }
        }
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert!("Calm".parse::<PutDownBehavior>().is_err());
        assert!(" calm".parse::<PutDownBehavior>().is_err());
    }

    #[test]
    fn defaults_match_reference_inputs() {
        assert_eq!(WakeMood::default(), WakeMood::Neutral);
        assert_eq!(NightPattern::default(), NightPattern::Normal);
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&NightPattern::SplitNights).unwrap();
        assert_eq!(json, "\"split_nights\"");
        let back: PutDownBehavior = serde_json::from_str("\"plays_fusses_long\"").unwrap();
        assert_eq!(back, PutDownBehavior::PlaysFussesLong);
    }
}

use serde::{Deserialize, Serialize};

use super::ParseEnumError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The wire form (serde) is the same string as `as_str`.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ParseEnumError {
                        field: stringify!($name),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(ContentionType {
    New => "NEW",
    Increase => "INCREASE",
    Secondary => "SECONDARY",
    Worsened => "WORSENED",
});

impl ContentionType {
    /// Claims for increase carry an authoritative diagnostic code.
    pub fn is_increase(&self) -> bool {
        matches!(self, Self::Increase)
    }
}

str_enum!(ClassifiedBy {
    DiagnosticCode => "diagnostic_code",
    ContentionText => "contention_text",
    MlFallback => "ml_fallback",
    NotClassified => "not classified",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn contention_type_round_trip() {
        for (variant, s) in [
            (ContentionType::New, "NEW"),
            (ContentionType::Increase, "INCREASE"),
            (ContentionType::Secondary, "SECONDARY"),
            (ContentionType::Worsened, "WORSENED"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(ContentionType::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn classified_by_tags() {
        assert_eq!(ClassifiedBy::DiagnosticCode.as_str(), "diagnostic_code");
        assert_eq!(ClassifiedBy::ContentionText.as_str(), "contention_text");
        assert_eq!(ClassifiedBy::MlFallback.as_str(), "ml_fallback");
        assert_eq!(ClassifiedBy::NotClassified.as_str(), "not classified");
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&ContentionType::Increase).unwrap();
        assert_eq!(json, "\"INCREASE\"");
        let parsed: ContentionType = serde_json::from_str("\"NEW\"").unwrap();
        assert_eq!(parsed, ContentionType::New);
        assert!(serde_json::from_str::<ContentionType>("\"new\"").is_err());
    }

    #[test]
    fn only_increase_is_increase() {
        assert!(ContentionType::Increase.is_increase());
        assert!(!ContentionType::New.is_increase());
        assert!(!ContentionType::Secondary.is_increase());
    }

    #[test]
    fn invalid_enum_returns_error() {
        let err = ContentionType::from_str("increase").unwrap_err();
        assert_eq!(err.field, "ContentionType");
        assert!(ClassifiedBy::from_str("").is_err());
    }
}

//! Macro for implementing Display and FromStr for wire-valued enums
//!
//! The Admin Settings API exchanges enum values as bare strings
//! (`"SMTP_TLS"`). This macro keeps the mapping between variants and their
//! wire form in one place.
//!
//! # Example
//!
//! ```rust
//! use mailroute_domain::impl_wire_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Transport {
//!     Plain,
//!     Secure,
//! }
//!
//! impl_wire_enum_conversions!(Transport {
//!     Plain => "PLAIN",
//!     Secure => "SECURE",
//! });
//!
//! assert_eq!(Transport::Secure.to_string(), "SECURE");
//! assert_eq!("plain".parse::<Transport>().unwrap(), Transport::Plain);
//! ```

/// Implements Display and FromStr traits for wire-valued enums
///
/// This macro generates:
/// - Display trait: writes the exact wire string
/// - FromStr trait: parses the wire string, ignoring ASCII case
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their wire
///   representations
#[macro_export]
macro_rules! impl_wire_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation of this value.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}

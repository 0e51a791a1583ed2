//! Provenance identifiers attached to every captured image.
//!
//! These are opaque strings assigned upstream (camera firmware, line controller,
//! upload tooling). We never generate them, only carry them.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::InspectionError;

/// Identifier of the camera that captured an image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CameraId(String);

/// Identifier of an assembly line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssemblyLineId(String);

/// Identifier of a captured image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageId(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Validate and wrap an identifier. Blank values are rejected.
            pub fn parse(value: impl Into<String>) -> Result<Self, InspectionError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(InspectionError::input(format!("{} must not be empty", $name)));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $t {
            type Error = InspectionError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = InspectionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

impl_string_newtype!(CameraId, "CameraId");
impl_string_newtype!(AssemblyLineId, "AssemblyLineId");
impl_string_newtype!(ImageId, "ImageId");

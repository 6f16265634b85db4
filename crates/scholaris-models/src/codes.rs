//! Human-readable natural keys and their codec.
//!
//! Three formats are issued and accepted, matched with ASCII digits only:
//!
//! | key        | format                 | example      |
//! |------------|------------------------|--------------|
//! | school     | `sch_[0-9]{3}[bgm]`    | `sch_010m`   |
//! | student    | `st[0-9]{3}[bgm][0-9]{4}` | `st010m4567` |
//! | teacher    | `te[0-9]{3}[bgm][0-9]{4}` | `te010m4567` |
//!
//! The school sequence is global across school types and capped at
//! [`MAX_SCHOOL_SEQUENCE`]. Student and teacher keys are derived from the
//! owning school's code and the last four digits of the person's NIC, so they
//! are deterministic and may collide within one school; the store rejects
//! collisions with a unique constraint.
//!
//! The raw string functions ([`generate_student_id`], [`is_valid_school_code`],
//! [`extract_school_code`], ...) accept arbitrary input. The newtypes
//! ([`SchoolCode`], [`StudentCode`], [`TeacherCode`]) can only hold values that
//! match their format, and validate again when deserialized from JSON.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use scholaris_core::AppError;
use serde::{Deserialize, Serialize};
use sqlx::{Database, Decode, Encode, Type, postgres::PgTypeInfo};
use utoipa::ToSchema;

/// Highest school sequence number that can be issued.
pub const MAX_SCHOOL_SEQUENCE: u16 = 999;

const SCHOOL_PREFIX: &str = "sch_";
const STUDENT_PREFIX: &str = "st";
const TEACHER_PREFIX: &str = "te";

static SCHOOL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sch_[0-9]{3}[bgm]$").expect("school code pattern"));
static STUDENT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^st[0-9]{3}[bgm][0-9]{4}$").expect("student code pattern"));
static TEACHER_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^te[0-9]{3}[bgm][0-9]{4}$").expect("teacher code pattern"));
static MEMBER_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:st|te)([0-9]{3}[bgm])[0-9]{4}$").expect("member code pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("School ID capacity exceeded: sequence cannot go beyond {MAX_SCHOOL_SEQUENCE}")]
    CapacityExceeded,
}

impl CodeError {
    fn invalid(message: impl Into<String>) -> Self {
        CodeError::InvalidInput(message.into())
    }

    /// `InvalidInput` maps to 400, `CapacityExceeded` to 409.
    pub fn into_app_error(self) -> AppError {
        match self {
            CodeError::InvalidInput(_) => AppError::bad_request(self),
            CodeError::CapacityExceeded => AppError::conflict(self),
        }
    }
}

// ============================================================================
// SchoolType
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SchoolType {
    Boys,
    Girls,
    Mixed,
}

impl SchoolType {
    pub fn suffix(&self) -> char {
        match self {
            SchoolType::Boys => 'b',
            SchoolType::Girls => 'g',
            SchoolType::Mixed => 'm',
        }
    }

    pub fn from_suffix(suffix: char) -> Option<Self> {
        match suffix {
            'b' => Some(SchoolType::Boys),
            'g' => Some(SchoolType::Girls),
            'm' => Some(SchoolType::Mixed),
            _ => None,
        }
    }
}

impl FromStr for SchoolType {
    type Err = CodeError;

    /// Case-insensitive: `"Boys"`, `"GIRLS"` and `"mixed"` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "boys" => Ok(SchoolType::Boys),
            "girls" => Ok(SchoolType::Girls),
            "mixed" => Ok(SchoolType::Mixed),
            _ => Err(CodeError::invalid(format!(
                "Invalid school type '{s}': expected one of boys, girls, mixed"
            ))),
        }
    }
}

impl fmt::Display for SchoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchoolType::Boys => f.write_str("boys"),
            SchoolType::Girls => f.write_str("girls"),
            SchoolType::Mixed => f.write_str("mixed"),
        }
    }
}

// ============================================================================
// Raw codec
// ============================================================================

pub fn is_valid_school_code(value: &str) -> bool {
    SCHOOL_CODE_RE.is_match(value)
}

pub fn is_valid_student_code(value: &str) -> bool {
    STUDENT_CODE_RE.is_match(value)
}

pub fn is_valid_teacher_code(value: &str) -> bool {
    TEACHER_CODE_RE.is_match(value)
}

/// Last `n` characters of `value`, or all of it when shorter.
fn last_chars(value: &str, n: usize) -> &str {
    let count = value.chars().count();
    if count <= n {
        return value;
    }
    let start = value
        .char_indices()
        .nth(count - n)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &value[start..]
}

fn generate_member_id(prefix: &str, school_id: &str, nic: &str) -> Result<String, CodeError> {
    if school_id.chars().count() < 4 {
        return Err(CodeError::invalid(
            "School ID must be at least 4 characters long",
        ));
    }

    let digits: String = nic.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 4 {
        return Err(CodeError::invalid("NIC must contain at least 4 digits"));
    }

    Ok(format!(
        "{prefix}{}{}",
        last_chars(school_id, 4),
        &digits[digits.len() - 4..]
    ))
}

/// `st` + last 4 characters of `school_id` + last 4 digits of `nic`.
///
/// Non-digit characters in `nic` are ignored. The school id is not checked
/// against the school format here; see [`StudentCode::derive`] for the typed
/// variant.
pub fn generate_student_id(school_id: &str, nic: &str) -> Result<String, CodeError> {
    generate_member_id(STUDENT_PREFIX, school_id, nic)
}

/// `te` + last 4 characters of `school_id` + last 4 digits of `nic`.
pub fn generate_teacher_id(school_id: &str, nic: &str) -> Result<String, CodeError> {
    generate_member_id(TEACHER_PREFIX, school_id, nic)
}

/// Recovers the school code embedded in a student or teacher key.
///
/// ```ignore
/// assert_eq!(extract_school_code("st010m1099").unwrap().as_str(), "sch_010m");
/// assert!(extract_school_code("not-an-id").is_none());
/// ```
pub fn extract_school_code(user_id: &str) -> Option<SchoolCode> {
    MEMBER_CODE_RE
        .captures(user_id)
        .and_then(|caps| caps.get(1))
        .map(|fragment| SchoolCode(format!("{SCHOOL_PREFIX}{}", fragment.as_str())))
}

/// Computes the code following `current_max` for a school of `school_type`.
///
/// `current_max` is the lexicographically greatest school code already
/// stored, across all school types. With none stored the sequence starts at 1.
pub fn next_school_code(
    school_type: SchoolType,
    current_max: Option<&SchoolCode>,
) -> Result<SchoolCode, CodeError> {
    let next = current_max.map_or(1, |code| code.sequence() + 1);
    if next > MAX_SCHOOL_SEQUENCE {
        return Err(CodeError::CapacityExceeded);
    }

    Ok(SchoolCode(format!(
        "{SCHOOL_PREFIX}{next:03}{}",
        school_type.suffix()
    )))
}

// ============================================================================
// Newtypes
// ============================================================================

macro_rules! define_code {
    (
        $(#[$meta:meta])*
        $name:ident, $pattern:expr, $label:literal, $example:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
        #[schema(value_type = String, example = $example)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, CodeError> {
                let value = value.into();
                if $pattern.is_match(&value) {
                    Ok(Self(value))
                } else {
                    Err(CodeError::invalid(format!(
                        "'{}' is not a valid {}",
                        value, $label
                    )))
                }
            }

            /// Wraps a value already known to match the format, such as one
            /// read back from a CHECK-constrained column.
            #[inline]
            pub fn new_unchecked(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = CodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = CodeError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <String as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <String as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        // Columns carry a CHECK constraint with the same pattern.
        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <String as Decode<'r, sqlx::Postgres>>::decode(value)?;
                Ok(Self::new_unchecked(s))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::new(s).map_err(serde::de::Error::custom)
            }
        }
    };
}

define_code!(
    /// A school's natural key, e.g. `sch_010m`.
    SchoolCode,
    SCHOOL_CODE_RE,
    "school ID",
    "sch_010m"
);

define_code!(
    /// A student's natural key, e.g. `st010m4567`.
    StudentCode,
    STUDENT_CODE_RE,
    "student ID",
    "st010m4567"
);

define_code!(
    /// A teacher's natural key, e.g. `te010m4567`.
    TeacherCode,
    TEACHER_CODE_RE,
    "teacher ID",
    "te010m4567"
);

impl SchoolCode {
    /// The three-digit sequence number.
    pub fn sequence(&self) -> u16 {
        self.0
            .get(4..7)
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0)
    }

    pub fn school_type(&self) -> Option<SchoolType> {
        self.0.chars().last().and_then(SchoolType::from_suffix)
    }
}

impl StudentCode {
    pub fn derive(school: &SchoolCode, nic: &str) -> Result<Self, CodeError> {
        generate_student_id(school.as_str(), nic).and_then(Self::new)
    }

    pub fn school_code(&self) -> Option<SchoolCode> {
        extract_school_code(&self.0)
    }
}

impl TeacherCode {
    pub fn derive(school: &SchoolCode, nic: &str) -> Result<Self, CodeError> {
        generate_teacher_id(school.as_str(), nic).and_then(Self::new)
    }

    pub fn school_code(&self) -> Option<SchoolCode> {
        extract_school_code(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_school_type_parse_is_case_insensitive() {
        assert_eq!("BOYS".parse::<SchoolType>().unwrap(), SchoolType::Boys);
        assert_eq!("Girls".parse::<SchoolType>().unwrap(), SchoolType::Girls);
        assert_eq!("mixed".parse::<SchoolType>().unwrap(), SchoolType::Mixed);
    }

    #[test]
    fn test_school_type_rejects_unknown() {
        let err = "alien".parse::<SchoolType>().unwrap_err();
        assert!(matches!(err, CodeError::InvalidInput(_)));
        assert_eq!(err.into_app_error().status.as_u16(), 400);
    }

    #[test]
    fn test_first_school_code_is_001() {
        let code = next_school_code(SchoolType::Mixed, None).unwrap();
        assert_eq!(code, "sch_001m");
    }

    #[test]
    fn test_next_school_code_increments_global_sequence() {
        let max = SchoolCode::new("sch_041g").unwrap();
        let code = next_school_code(SchoolType::Boys, Some(&max)).unwrap();
        assert_eq!(code, "sch_042b");
        assert!(is_valid_school_code(code.as_str()));
    }

    #[test]
    fn test_next_school_code_capacity() {
        let max = SchoolCode::new("sch_998m").unwrap();
        assert_eq!(
            next_school_code(SchoolType::Mixed, Some(&max)).unwrap(),
            "sch_999m"
        );

        let max = SchoolCode::new("sch_999b").unwrap();
        let err = next_school_code(SchoolType::Mixed, Some(&max)).unwrap_err();
        assert_eq!(err, CodeError::CapacityExceeded);
        assert_eq!(err.into_app_error().status.as_u16(), 409);
    }

    #[test]
    fn test_generate_student_id() {
        assert_eq!(
            generate_student_id("sch_010m", "901234567").unwrap(),
            "st010m4567"
        );
    }

    #[test]
    fn test_generate_teacher_id_strips_non_digits() {
        assert_eq!(
            generate_teacher_id("sch_003g", "19-88-7V 12x34").unwrap(),
            "te003g1234"
        );
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = generate_student_id("sch_120b", "200012345678").unwrap();
        let b = generate_student_id("sch_120b", "200012345678").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_rejects_short_school_id() {
        assert!(matches!(
            generate_student_id("abc", "12345"),
            Err(CodeError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_student_id("", "12345"),
            Err(CodeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_generate_rejects_short_nic() {
        assert!(matches!(
            generate_teacher_id("sch_010m", "12a3"),
            Err(CodeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_generate_ignores_non_ascii_digits() {
        // Arabic-Indic digits are not NIC digits.
        assert!(generate_student_id("sch_010m", "١٢٣٤").is_err());
    }

    #[test]
    fn test_generate_uses_last_four_chars_of_any_school_id() {
        assert_eq!(generate_student_id("abcdwxyz", "0000").unwrap(), "stwxyz0000");
    }

    #[test]
    fn test_validators() {
        assert!(is_valid_school_code("sch_000b"));
        assert!(!is_valid_school_code("sch_01m"));
        assert!(!is_valid_school_code("sch_010x"));
        assert!(!is_valid_school_code("SCH_010m"));
        assert!(!is_valid_school_code("sch_010m "));

        assert!(is_valid_student_code("st010m4567"));
        assert!(!is_valid_student_code("te010m4567"));
        assert!(!is_valid_student_code("st010m456"));

        assert!(is_valid_teacher_code("te999g0001"));
        assert!(!is_valid_teacher_code("te999z0001"));
    }

    #[test]
    fn test_extract_school_code() {
        assert_eq!(extract_school_code("st010m1099").unwrap(), "sch_010m");
        assert_eq!(extract_school_code("te123b0000").unwrap(), "sch_123b");
        assert!(extract_school_code("not-an-id").is_none());
        assert!(extract_school_code("xx010m1099").is_none());
    }

    #[test]
    fn test_derive_typed_codes() {
        let school = SchoolCode::new("sch_010m").unwrap();
        let student = StudentCode::derive(&school, "901234567").unwrap();
        assert_eq!(student, "st010m4567");
        assert_eq!(student.school_code().unwrap(), school);

        let teacher = TeacherCode::derive(&school, "V-88881111").unwrap();
        assert_eq!(teacher, "te010m1111");
    }

    #[test]
    fn test_school_code_accessors() {
        let code = SchoolCode::new("sch_042g").unwrap();
        assert_eq!(code.sequence(), 42);
        assert_eq!(code.school_type(), Some(SchoolType::Girls));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: SchoolCode = serde_json::from_str("\"sch_010m\"").unwrap();
        assert_eq!(ok, "sch_010m");
        assert!(serde_json::from_str::<SchoolCode>("\"sch_10m\"").is_err());
        assert!(serde_json::from_str::<StudentCode>("\"st010m45\"").is_err());
    }
}

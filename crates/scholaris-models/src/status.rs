use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{Database, Decode, Encode, Type, postgres::PgTypeInfo};
use utoipa::ToSchema;

/// Account lifecycle state. Only `active` accounts can authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActorStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl ActorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorStatus::Active => "active",
            ActorStatus::Inactive => "inactive",
            ActorStatus::Suspended => "suspended",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ActorStatus::Active)
    }
}

impl fmt::Display for ActorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ActorStatus::Active),
            "inactive" => Ok(ActorStatus::Inactive),
            "suspended" => Ok(ActorStatus::Suspended),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

impl Type<sqlx::Postgres> for ActorStatus {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, sqlx::Postgres> for ActorStatus {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as Encode<'q, sqlx::Postgres>>::encode(self.as_str(), buf)
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for ActorStatus {
    fn decode(
        value: <sqlx::Postgres as Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<'r, sqlx::Postgres>>::decode(value)?;
        s.parse().map_err(Into::into)
    }
}

//! # SQLite Column Adapters
//!
//! Enabled with the `sqlx` feature. Both types live in TEXT columns.
//!
//! ## Amount Columns
//! ```text
//! write: Amount(125000) ──► "12.5000"   (to_scaled_text, fixed 4 digits)
//! read:  "12.5000" ──► strip "." ──► "125000" ──► Amount(125000)
//! ```
//! Writing the canonical form (`"12.50"`) would read back as `1250`; the
//! fixed four-digit form is what the stored-text decoder expects.

use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::{Database, Decode, Encode, Type};

use crate::amount::Amount;
use crate::currency::CurrencyCode;
use crate::storage::StoredText;

impl Type<Sqlite> for Amount {
    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Amount {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        <String as Encode<'q, Sqlite>>::encode(self.to_scaled_text(), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for Amount {
    fn decode(value: <Sqlite as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        let text = <&str as Decode<'r, Sqlite>>::decode(value)?;
        Ok(Amount::decode_stored(Some(text))?)
    }
}

impl Type<Sqlite> for CurrencyCode {
    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for CurrencyCode {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        <String as Encode<'q, Sqlite>>::encode(self.encode_stored(), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for CurrencyCode {
    fn decode(value: <Sqlite as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        let text = <&str as Decode<'r, Sqlite>>::decode(value)?;
        Ok(CurrencyCode::decode_stored(Some(text))?)
    }
}

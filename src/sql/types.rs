//! PostgreSQL column types and the field-type lookup tables.
//!
//! A model field is lowered through one of four static maps, chosen by the
//! primary-key width (`SERIAL` vs `BIGSERIAL`) and by whether the column is
//! the field itself (local) or a column referencing it (foreign). A
//! referencing column can never be auto-incrementing, so `AutoIncrement`
//! maps to the matching plain integer type in the foreign maps.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::FieldType;

/// PostgreSQL column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PsqlType {
    Serial,
    BigSerial,
    Integer,
    BigInt,
    Boolean,
    Date,
    DoublePrecision,
    Text,
    TimestampTz,
    Uuid,
    Jsonb,
}

impl PsqlType {
    /// SQL spelling of the type.
    pub fn as_sql(&self) -> &'static str {
        match self {
            PsqlType::Serial => "SERIAL",
            PsqlType::BigSerial => "BIGSERIAL",
            PsqlType::Integer => "INTEGER",
            PsqlType::BigInt => "BIGINT",
            PsqlType::Boolean => "BOOLEAN",
            PsqlType::Date => "DATE",
            PsqlType::DoublePrecision => "DOUBLE PRECISION",
            PsqlType::Text => "TEXT",
            PsqlType::TimestampTz => "TIMESTAMPTZ",
            PsqlType::Uuid => "UUID",
            PsqlType::Jsonb => "JSONB",
        }
    }
}

impl fmt::Display for PsqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Static field-type to column-type lookup.
#[derive(Debug, Clone, Copy)]
pub struct TypeMap {
    name: &'static str,
    entries: &'static [(FieldType, PsqlType)],
}

impl TypeMap {
    /// Look up the column type for a field type.
    pub fn get(&self, field_type: FieldType) -> Option<PsqlType> {
        self.entries
            .iter()
            .find(|(ft, _)| *ft == field_type)
            .map(|(_, pt)| *pt)
    }

    /// Name of the map, used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Select the local map for a primary-key width.
    pub fn local(use_bigserial: bool) -> &'static TypeMap {
        if use_bigserial {
            &LOCAL_BIGSERIAL
        } else {
            &LOCAL_SERIAL
        }
    }

    /// Select the foreign (referencing) map for a primary-key width.
    pub fn foreign(use_bigserial: bool) -> &'static TypeMap {
        if use_bigserial {
            &FOREIGN_BIGSERIAL
        } else {
            &FOREIGN_SERIAL
        }
    }
}

pub static LOCAL_SERIAL: TypeMap = TypeMap {
    name: "local/serial",
    entries: &[
        (FieldType::AutoIncrement, PsqlType::Serial),
        (FieldType::Boolean, PsqlType::Boolean),
        (FieldType::Date, PsqlType::Date),
        (FieldType::Float, PsqlType::DoublePrecision),
        (FieldType::Integer, PsqlType::Integer),
        (FieldType::Protected, PsqlType::Text),
        (FieldType::Sealed, PsqlType::Text),
        (FieldType::String, PsqlType::Text),
        (FieldType::Time, PsqlType::TimestampTz),
        (FieldType::Uuid, PsqlType::Uuid),
    ],
};

pub static LOCAL_BIGSERIAL: TypeMap = TypeMap {
    name: "local/bigserial",
    entries: &[
        (FieldType::AutoIncrement, PsqlType::BigSerial),
        (FieldType::Boolean, PsqlType::Boolean),
        (FieldType::Date, PsqlType::Date),
        (FieldType::Float, PsqlType::DoublePrecision),
        (FieldType::Integer, PsqlType::Integer),
        (FieldType::Protected, PsqlType::Text),
        (FieldType::Sealed, PsqlType::Text),
        (FieldType::String, PsqlType::Text),
        (FieldType::Time, PsqlType::TimestampTz),
        (FieldType::Uuid, PsqlType::Uuid),
    ],
};

// Protected and Sealed values are encrypted or hashed at rest and cannot
// be referenced.
pub static FOREIGN_SERIAL: TypeMap = TypeMap {
    name: "foreign/serial",
    entries: &[
        (FieldType::AutoIncrement, PsqlType::Integer),
        (FieldType::Boolean, PsqlType::Boolean),
        (FieldType::Date, PsqlType::Date),
        (FieldType::Float, PsqlType::DoublePrecision),
        (FieldType::Integer, PsqlType::Integer),
        (FieldType::String, PsqlType::Text),
        (FieldType::Time, PsqlType::TimestampTz),
        (FieldType::Uuid, PsqlType::Uuid),
    ],
};

pub static FOREIGN_BIGSERIAL: TypeMap = TypeMap {
    name: "foreign/bigserial",
    entries: &[
        (FieldType::AutoIncrement, PsqlType::BigInt),
        (FieldType::Boolean, PsqlType::Boolean),
        (FieldType::Date, PsqlType::Date),
        (FieldType::Float, PsqlType::DoublePrecision),
        (FieldType::Integer, PsqlType::Integer),
        (FieldType::String, PsqlType::Text),
        (FieldType::Time, PsqlType::TimestampTz),
        (FieldType::Uuid, PsqlType::Uuid),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_increment_variants() {
        assert_eq!(LOCAL_SERIAL.get(FieldType::AutoIncrement), Some(PsqlType::Serial));
        assert_eq!(LOCAL_BIGSERIAL.get(FieldType::AutoIncrement), Some(PsqlType::BigSerial));
        assert_eq!(FOREIGN_SERIAL.get(FieldType::AutoIncrement), Some(PsqlType::Integer));
        assert_eq!(FOREIGN_BIGSERIAL.get(FieldType::AutoIncrement), Some(PsqlType::BigInt));
    }

    #[test]
    fn test_shared_entries() {
        for map in [&LOCAL_SERIAL, &LOCAL_BIGSERIAL, &FOREIGN_SERIAL, &FOREIGN_BIGSERIAL] {
            assert_eq!(map.get(FieldType::String), Some(PsqlType::Text));
            assert_eq!(map.get(FieldType::Time), Some(PsqlType::TimestampTz));
            assert_eq!(map.get(FieldType::Uuid), Some(PsqlType::Uuid));
        }
    }

    #[test]
    fn test_sealed_not_referencable() {
        assert_eq!(LOCAL_SERIAL.get(FieldType::Sealed), Some(PsqlType::Text));
        assert_eq!(FOREIGN_SERIAL.get(FieldType::Sealed), None);
        assert_eq!(FOREIGN_BIGSERIAL.get(FieldType::Protected), None);
    }

    #[test]
    fn test_map_selection() {
        assert_eq!(TypeMap::local(false).name(), "local/serial");
        assert_eq!(TypeMap::local(true).name(), "local/bigserial");
        assert_eq!(TypeMap::foreign(false).name(), "foreign/serial");
        assert_eq!(TypeMap::foreign(true).name(), "foreign/bigserial");
    }

    #[test]
    fn test_display() {
        assert_eq!(PsqlType::DoublePrecision.to_string(), "DOUBLE PRECISION");
        assert_eq!(PsqlType::TimestampTz.to_string(), "TIMESTAMPTZ");
    }
}

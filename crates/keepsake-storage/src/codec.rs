// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record bytes to entities and back.
//!
//! Reading runs parse, then migrate, then validate. Writing serializes the
//! entity and stamps the current schema version.

use serde::Serialize;
use serde_json::Value;

use keepsake_core::{
    CURRENT_SCHEMA_VERSION, KeepsakeError, SCHEMA_VERSION_FIELD, ValidationWarning, Violation,
};
use keepsake_schema::{Schema, migrate, validate};

/// An entity read back from storage.
#[derive(Debug)]
pub struct Decoded<T> {
    pub value: T,
    pub warnings: Vec<ValidationWarning>,
    /// The record was stored at an older schema version.
    pub upgraded: bool,
    /// The record as it looked after migration.
    pub raw: Value,
}

pub fn decode<T: Schema>(bytes: &[u8]) -> Result<Decoded<T>, KeepsakeError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| KeepsakeError::MalformedEntity {
        kind: T::KIND,
        id: None,
        violations: vec![Violation::Invariant {
            field: "$".into(),
            message: format!("is not valid JSON: {e}"),
        }],
    })?;
    let migrated = migrate(T::KIND, value)?;
    let upgraded = migrated.was_upgraded();
    let validated = validate::<T>(&migrated.value)?;
    Ok(Decoded {
        value: validated.value,
        warnings: validated.warnings,
        upgraded,
        raw: migrated.value,
    })
}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, KeepsakeError> {
    let mut json = serde_json::to_value(value)
        .map_err(|e| KeepsakeError::Internal(format!("failed to serialize record: {e}")))?;
    if let Value::Object(map) = &mut json {
        map.insert(SCHEMA_VERSION_FIELD.into(), CURRENT_SCHEMA_VERSION.into());
    }
    serde_json::to_vec(&json)
        .map_err(|e| KeepsakeError::Internal(format!("failed to serialize record: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_core::model::{CompanionProfile, Gem, Maturity};
    use keepsake_test_utils::fixtures;

    #[test]
    fn encode_stamps_current_version() {
        let bytes = encode(&fixtures::minimal_gem("g1")).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value[SCHEMA_VERSION_FIELD], CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn encoded_records_decode_unchanged() {
        let gem = fixtures::maximal_gem("g1");
        let decoded = decode::<Gem>(&encode(&gem).unwrap()).unwrap();
        assert_eq!(decoded.value, gem);
        assert!(!decoded.upgraded);
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn garbage_bytes_are_malformed() {
        let err = decode::<Gem>(b"{not json").unwrap_err();
        assert!(err.is_record_level());
        assert_eq!(err.violations()[0].field(), "$");
    }

    #[test]
    fn legacy_records_are_flagged_upgraded() {
        let bytes = serde_json::to_vec(&fixtures::legacy_profile_json("p1")).unwrap();
        let decoded = decode::<CompanionProfile>(&bytes).unwrap();
        assert!(decoded.upgraded);
        assert_eq!(decoded.value.maturity, Maturity::Standard);
        assert_eq!(decoded.raw[SCHEMA_VERSION_FIELD], CURRENT_SCHEMA_VERSION);
    }
}

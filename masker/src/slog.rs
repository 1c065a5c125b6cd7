//! Adapters for emitting masked values through `slog`.
//!
//! This module connects [`Maskable`] with `slog` by providing a `slog::Value`
//! that serializes the masked copy as structured JSON via `slog`'s
//! nested-value support.
//!
//! It is responsible for:
//! - Ensuring the logged representation comes from `Masker::mask`, never from
//!   the original value.
//! - Avoiding fallible logging APIs: masking and serialization failures are
//!   logged as placeholder strings rather than propagated as errors.
//!
//! It does not configure `slog` or decide which fields are sensitive.

use serde::Serialize;
use serde_json::Value as JsonValue;
use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{default_masker, Maskable, Masker};

/// Placeholder logged when masking fails.
pub const MASK_FAILED: &str = "Failed to mask value";

/// Placeholder logged when the masked value cannot be converted to JSON.
pub const SERIALIZE_FAILED: &str = "Failed to serialize masked value";

/// A `slog::Value` holding an owned masked payload as JSON.
#[derive(Clone, Debug)]
pub struct MaskedJson {
    value: JsonValue,
}

impl MaskedJson {
    fn new(value: JsonValue) -> Self {
        Self { value }
    }

    /// The JSON that will be logged.
    pub fn as_json(&self) -> &JsonValue {
        &self.value
    }
}

impl SlogValue for MaskedJson {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.value.clone());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

/// Converts values into a `slog::Value` that logs their masked form as JSON.
///
/// ## Example
/// ```ignore
/// use masker::slog::IntoMaskedJson;
///
/// info!(logger, "login"; "request" => request.into_masked_json());
/// ```
pub trait IntoMaskedJson: Maskable + Serialize {
    /// Masks `self` with the default masker.
    fn into_masked_json(self) -> MaskedJson {
        self.into_masked_json_with(default_masker())
    }

    /// Masks `self` with `masker`.
    ///
    /// On failure the payload is the string [`MASK_FAILED`] or
    /// [`SERIALIZE_FAILED`]; the original value is never logged.
    fn into_masked_json_with(self, masker: &Masker) -> MaskedJson {
        let value = match masker.mask(&self) {
            Ok(masked) => serde_json::to_value(masked)
                .unwrap_or_else(|_| JsonValue::String(SERIALIZE_FAILED.to_string())),
            Err(error) => {
                tracing::warn!(%error, "masking failed while logging");
                JsonValue::String(MASK_FAILED.to_string())
            }
        };
        MaskedJson::new(value)
    }
}

impl<T> IntoMaskedJson for T where T: Maskable + Serialize {}

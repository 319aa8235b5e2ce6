use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::constants::{MAX_ASSET_NAME_HEX_LEN, POLICY_ID_HEX_LEN};
use crate::error::AppError;

/// One `amount` row from the indexer's address endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    #[serde(rename = "unit")]
    pub asset_id: String,
    #[serde(rename = "quantity")]
    pub raw_quantity: String,
}

#[cfg(test)]
impl BalanceEntry {
    pub fn new(asset_id: impl Into<String>, raw_quantity: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            raw_quantity: raw_quantity.into(),
        }
    }
}

/// On-chain image reference as it appears in asset metadata.
///
/// Long URIs are sometimes split across two string fragments. Any other JSON
/// shape lands in `Unsupported` instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Plain(String),
    Split(String, String),
    Unsupported(Value),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AssetMetadata {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

// Strings pass through, string arrays are joined, everything else is absent.
fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(text_from_value))
}

fn text_from_value(value: Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s,
        Value::Array(parts) => parts
            .iter()
            .map(|part| part.as_str())
            .collect::<Option<Vec<_>>>()?
            .concat(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAsset {
    pub id: String,
    pub display_name: String,
    pub image_url: String,
    pub quantity: u64,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,
}

impl ResolvedAsset {
    pub fn assemble(entry: &BalanceEntry, metadata: AssetMetadata, image_url: String) -> Self {
        let (policy_id, asset_name) = match split_asset_unit(&entry.asset_id) {
            Some((policy, name_hex)) => (Some(policy.to_string()), decode_asset_name(name_hex)),
            None => (None, None),
        };

        Self {
            id: entry.asset_id.clone(),
            display_name: metadata.name.unwrap_or_else(|| entry.asset_id.clone()),
            image_url,
            quantity: parse_quantity(&entry.raw_quantity),
            description: metadata.description.unwrap_or_default(),
            policy_id,
            asset_name,
        }
    }
}

/// Parses the leading decimal digits of a raw quantity.
///
/// Fractions are truncated, input without leading digits yields 0 and values
/// beyond `u64::MAX` saturate.
pub fn parse_quantity(raw: &str) -> u64 {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<u64>().unwrap_or(u64::MAX)
}

/// Splits a Cardano asset unit into (policy id, hex asset name).
pub fn split_asset_unit(unit: &str) -> Option<(&str, &str)> {
    if unit.len() < POLICY_ID_HEX_LEN || unit.len() > POLICY_ID_HEX_LEN + MAX_ASSET_NAME_HEX_LEN {
        return None;
    }
    if !unit.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    if (unit.len() - POLICY_ID_HEX_LEN) % 2 != 0 {
        return None;
    }
    Some(unit.split_at(POLICY_ID_HEX_LEN))
}

pub fn decode_asset_name(name_hex: &str) -> Option<String> {
    if name_hex.is_empty() {
        return None;
    }
    let bytes = hex::decode(name_hex).ok()?;
    let name = String::from_utf8(bytes).ok()?;
    if name.chars().any(char::is_control) {
        return None;
    }
    Some(name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedAsset {
    pub asset_id: String,
    pub kind: &'static str,
    pub reason: String,
}

impl DroppedAsset {
    pub fn from_error(asset_id: &str, err: &AppError) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            kind: err.kind(),
            reason: err.to_string(),
        }
    }
}

/// Full outcome of one resolution, including what was dropped and why.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub address: String,
    pub assets: Vec<ResolvedAsset>,
    pub dropped: Vec<DroppedAsset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_error: Option<String>,
    pub resolved_at: DateTime<Utc>,
}

impl Resolution {
    pub fn empty(address: &str) -> Self {
        Self {
            address: address.to_string(),
            assets: Vec::new(),
            dropped: Vec::new(),
            balance_error: None,
            resolved_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const POLICY: &str = "d5e6bf0500378d4f0da4e8dde6becec7621cd8cbf5cbb9b87013d4cc";

    #[test]
    fn parse_quantity_reads_plain_integers() {
        assert_eq!(parse_quantity("42"), 42);
        assert_eq!(parse_quantity("0"), 0);
        assert_eq!(parse_quantity("45000000000"), 45_000_000_000);
    }

    #[test]
    fn parse_quantity_falls_back_to_zero() {
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("abc"), 0);
        assert_eq!(parse_quantity("-5"), 0);
    }

    #[test]
    fn parse_quantity_truncates_and_saturates() {
        assert_eq!(parse_quantity(" 12.7"), 12);
        assert_eq!(parse_quantity("7 units"), 7);
        assert_eq!(parse_quantity("+9"), 9);
        assert_eq!(parse_quantity("99999999999999999999999999"), u64::MAX);
    }

    #[test]
    fn balance_entry_reads_indexer_field_names() {
        let entry: BalanceEntry =
            serde_json::from_value(json!({ "unit": "lovelace", "quantity": "1500000" })).unwrap();
        assert_eq!(entry, BalanceEntry::new("lovelace", "1500000"));
    }

    #[test]
    fn image_ref_accepts_every_shape() {
        let plain: ImageRef = serde_json::from_value(json!("ipfs://abc")).unwrap();
        assert_eq!(plain, ImageRef::Plain("ipfs://abc".to_string()));

        let split: ImageRef = serde_json::from_value(json!(["ipfs://abc", "/2"])).unwrap();
        assert_eq!(split, ImageRef::Split("ipfs://abc".to_string(), "/2".to_string()));

        let three: ImageRef = serde_json::from_value(json!(["a", "b", "c"])).unwrap();
        assert!(matches!(three, ImageRef::Unsupported(_)));

        let number: ImageRef = serde_json::from_value(json!(7)).unwrap();
        assert!(matches!(number, ImageRef::Unsupported(_)));
    }

    #[test]
    fn metadata_text_fields_are_lenient() {
        let metadata: AssetMetadata = serde_json::from_value(json!({
            "name": "",
            "description": ["A long ", "description"],
            "image": null,
            "mediaType": "image/png"
        }))
        .unwrap();
        assert_eq!(metadata.name, None);
        assert_eq!(metadata.description.as_deref(), Some("A long description"));
        assert_eq!(metadata.image, None);

        let numeric: AssetMetadata = serde_json::from_value(json!({ "name": 12 })).unwrap();
        assert_eq!(numeric.name, None);
    }

    #[test]
    fn assemble_applies_fallbacks() {
        let entry = BalanceEntry::new("a1", "3");
        let asset = ResolvedAsset::assemble(&entry, AssetMetadata::default(), "https://img".into());
        assert_eq!(asset.display_name, "a1");
        assert_eq!(asset.description, "");
        assert_eq!(asset.quantity, 3);
        assert_eq!(asset.policy_id, None);
        assert_eq!(asset.asset_name, None);
    }

    #[test]
    fn assemble_decodes_cardano_units() {
        // "SpaceBud" hex encoded
        let unit = format!("{}{}", POLICY, "5370616365427564");
        let entry = BalanceEntry::new(unit, "1");
        let asset = ResolvedAsset::assemble(&entry, AssetMetadata::default(), "https://img".into());
        assert_eq!(asset.policy_id.as_deref(), Some(POLICY));
        assert_eq!(asset.asset_name.as_deref(), Some("SpaceBud"));
    }

    #[test]
    fn split_asset_unit_rejects_non_units() {
        assert_eq!(split_asset_unit("lovelace"), None);
        assert_eq!(split_asset_unit(&format!("{}abc", POLICY)), None);
        assert_eq!(split_asset_unit(POLICY), Some((POLICY, "")));
        assert_eq!(decode_asset_name(""), None);
        assert_eq!(decode_asset_name("ff"), None);
    }

    #[test]
    fn resolved_asset_serializes_camel_case() {
        let entry = BalanceEntry::new("a1", "3");
        let asset = ResolvedAsset::assemble(&entry, AssetMetadata::default(), "https://img".into());
        let value = serde_json::to_value(&asset).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "a1",
                "displayName": "a1",
                "imageUrl": "https://img",
                "quantity": 3,
                "description": ""
            })
        );
    }
}

//! Daily record model and its persisted document shape.

use super::error::FamilyCostError;
use super::money::{self, Amount};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict, zero-padded `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, FamilyCostError> {
    let value = value.trim();
    let invalid = || FamilyCostError::InvalidDate {
        value: value.to_string(),
    };
    if value.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

/// One day's worth of entries; at most one per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(serialize_with = "serialize_date", deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_logs: Vec<UnitEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bazar_items: Vec<PurchaseItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub other_items: Vec<MiscItem>,
    #[serde(default, deserialize_with = "money::lenient")]
    pub building_income: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_name: String,
    #[serde(default, deserialize_with = "money::lenient")]
    pub income: Amount,
    #[serde(default, deserialize_with = "money::lenient")]
    pub cost: Amount,
}

/// A bazar (daily grocery) purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "money::lenient")]
    pub price: Amount,
}

/// A miscellaneous expense that is not a bazar purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiscItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "money::lenient")]
    pub price: Amount,
}

impl DailyRecord {
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
            unit_logs: Vec::new(),
            bazar_items: Vec::new(),
            other_items: Vec::new(),
            building_income: 0,
        }
    }

    /// The entry for `unit_name`, matched by exact name.
    pub fn unit_entry(&self, unit_name: &str) -> Option<&UnitEntry> {
        self.unit_logs.iter().find(|e| e.unit_name == unit_name)
    }

    pub fn unit_income(&self) -> Amount {
        money::total(self.unit_logs.iter().map(|e| e.income))
    }

    pub fn unit_cost(&self) -> Amount {
        money::total(self.unit_logs.iter().map(|e| e.cost))
    }

    pub fn bazar_total(&self) -> Amount {
        money::total(self.bazar_items.iter().map(|i| i.price))
    }

    pub fn other_total(&self) -> Amount {
        money::total(self.other_items.iter().map(|i| i.price))
    }

    pub fn date_key(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

impl UnitEntry {
    pub fn new(unit_name: impl Into<String>, income: Amount, cost: Amount) -> Self {
        let unit_name = unit_name.into();
        Self {
            unit_id: unit_name.clone(),
            unit_name,
            income,
            cost,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.income == 0 && self.cost == 0
    }
}

impl PurchaseItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Amount) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

impl MiscItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Amount) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

fn serialize_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

/// `null` decodes like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_date_accepts_padded_iso() {
        assert_eq!(parse_date("2026-02-07").unwrap(), date(2026, 2, 7));
        assert_eq!(parse_date(" 2026-02-07 ").unwrap(), date(2026, 2, 7));
    }

    #[test]
    fn parse_date_rejects_unpadded_and_garbage() {
        assert!(matches!(
            parse_date("2026-2-7"),
            Err(FamilyCostError::InvalidDate { .. })
        ));
        assert!(parse_date("2026-02-30").is_err());
        assert!(parse_date("07/02/2026").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn deserializes_full_document() {
        let doc = json!({
            "id": "abc123",
            "date": "2026-02-10",
            "unitLogs": [{"unitId": "Car", "unitName": "Car", "income": 3000, "cost": 200}],
            "bazarItems": [{"id": "b1", "name": "Rice & Oil", "price": 450}],
            "otherItems": [{"id": "o1", "name": "Phone bill", "price": 100}],
            "buildingIncome": 1000
        });
        let record: DailyRecord = serde_json::from_value(doc).unwrap();
        assert_eq!(record.id, "abc123");
        assert_eq!(record.date, date(2026, 2, 10));
        assert_eq!(record.unit_income(), 3000);
        assert_eq!(record.unit_cost(), 200);
        assert_eq!(record.bazar_total(), 450);
        assert_eq!(record.other_total(), 100);
        assert_eq!(record.building_income, 1000);
    }

    #[test]
    fn missing_optional_fields_default() {
        let doc = json!({
            "id": "1",
            "date": "2026-02-10",
            "unitLogs": [{"unitId": "Car", "unitName": "Car", "income": 3000}],
            "bazarItems": []
        });
        let record: DailyRecord = serde_json::from_value(doc).unwrap();
        assert!(record.other_items.is_empty());
        assert_eq!(record.building_income, 0);
        assert_eq!(record.unit_logs[0].cost, 0);
    }

    #[test]
    fn null_and_odd_values_coerce() {
        let doc = json!({
            "date": "2026-02-10",
            "unitLogs": null,
            "bazarItems": [{"name": "Fish", "price": "320"}],
            "otherItems": null,
            "buildingIncome": null
        });
        let record: DailyRecord = serde_json::from_value(doc).unwrap();
        assert_eq!(record.id, "");
        assert!(record.unit_logs.is_empty());
        assert_eq!(record.bazar_total(), 320);
        assert_eq!(record.building_income, 0);
    }

    #[test]
    fn null_strings_decode_as_empty() {
        let doc = json!({
            "id": null,
            "date": "2026-02-10",
            "unitLogs": [{"unitId": null, "unitName": "Car", "income": 3000, "cost": 200}],
            "bazarItems": [{"id": null, "name": null, "price": 450}],
            "otherItems": [{"id": "o1", "name": null, "price": 0}]
        });
        let record: DailyRecord = serde_json::from_value(doc).unwrap();
        assert_eq!(record.id, "");
        assert_eq!(record.unit_logs[0].unit_id, "");
        assert_eq!(record.unit_logs[0].unit_name, "Car");
        assert_eq!(record.bazar_items[0].name, "");
        assert_eq!(record.bazar_total(), 450);
        assert_eq!(record.other_items[0].name, "");
    }

    #[test]
    fn rejects_malformed_date() {
        let doc = json!({"id": "1", "date": "10-02-2026", "unitLogs": [], "bazarItems": []});
        assert!(serde_json::from_value::<DailyRecord>(doc).is_err());
    }

    #[test]
    fn serializes_wire_shape() {
        let mut record = DailyRecord::new("r1", date(2026, 3, 1));
        record.unit_logs.push(UnitEntry::new("Auto", 500, 50));
        record.bazar_items.push(PurchaseItem::new("b1", "Eggs", 120));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["date"], "2026-03-01");
        assert_eq!(value["unitLogs"][0]["unitId"], "Auto");
        assert_eq!(value["unitLogs"][0]["unitName"], "Auto");
        assert_eq!(value["bazarItems"][0]["price"], 120);
        assert_eq!(value["otherItems"], json!([]));
        assert_eq!(value["buildingIncome"], 0);
    }

    #[test]
    fn unit_entry_lookup_is_exact() {
        let mut record = DailyRecord::new("r1", date(2026, 3, 1));
        record.unit_logs.push(UnitEntry::new("Car", 10, 1));
        assert!(record.unit_entry("Car").is_some());
        assert!(record.unit_entry("car").is_none());
        assert!(record.unit_entry("Car ").is_none());
    }
}

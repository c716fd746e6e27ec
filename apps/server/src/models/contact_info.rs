//! Address and phone sub-records owned by an identity record

use crate::db::sql::FieldSet;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Address {
    pub address_id: i32,
    pub street_address: String,
    pub apartment_number: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Phone {
    pub phone_id: i32,
    pub country_code: String,
    pub area_code: String,
    pub phone_number: String,
    pub phone_type: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAddress {
    #[validate(length(min = 1, max = 255))]
    pub street_address: String,
    #[validate(length(max = 50))]
    pub apartment_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 50))]
    pub state: String,
    #[validate(length(min = 1, max = 20))]
    pub postal_code: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPhone {
    #[validate(length(min = 1, max = 5))]
    pub country_code: String,
    #[validate(length(min = 1, max = 5))]
    pub area_code: String,
    #[validate(length(min = 1, max = 20))]
    pub phone_number: String,
    #[validate(length(min = 1, max = 20))]
    pub phone_type: String,
}

/// Partial address update. Keys outside the allow-list (including
/// `address_id`) are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AddressPatch {
    #[validate(length(min = 1, max = 255))]
    pub street_address: Option<String>,
    /// `null` clears the apartment number.
    #[serde(default, deserialize_with = "super::deserialize_some")]
    #[validate(length(max = 50))]
    pub apartment_number: Option<Option<String>>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub postal_code: Option<String>,
}

impl AddressPatch {
    pub fn field_set(&self) -> FieldSet {
        let mut fields = FieldSet::new();
        fields
            .set_opt("street_address", self.street_address.clone())
            .set_opt("apartment_number", self.apartment_number.clone())
            .set_opt("city", self.city.clone())
            .set_opt("state", self.state.clone())
            .set_opt("postal_code", self.postal_code.clone());
        fields
    }
}

/// Partial phone update. `phone_id` and unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PhonePatch {
    #[validate(length(min = 1, max = 5))]
    pub country_code: Option<String>,
    #[validate(length(min = 1, max = 5))]
    pub area_code: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub phone_type: Option<String>,
}

impl PhonePatch {
    pub fn field_set(&self) -> FieldSet {
        let mut fields = FieldSet::new();
        fields
            .set_opt("country_code", self.country_code.clone())
            .set_opt("area_code", self.area_code.clone())
            .set_opt("phone_number", self.phone_number.clone())
            .set_opt("phone_type", self.phone_type.clone());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sql::SqlValue;
    use serde_json::json;

    #[test]
    fn address_patch_ignores_unknown_keys() {
        let patch: AddressPatch = serde_json::from_value(json!({
            "address_id": 99,
            "city": "Denver",
            "favourite_colour": "green"
        }))
        .unwrap();

        let fields: Vec<_> = patch.field_set().fields().collect();
        assert_eq!(fields, vec!["city"]);
    }

    #[test]
    fn null_apartment_number_clears_the_column() {
        let patch: AddressPatch =
            serde_json::from_value(json!({ "apartment_number": null })).unwrap();
        assert_eq!(patch.apartment_number, Some(None));

        let clause =
            crate::db::sql::sql_for_partial_update(patch.field_set(), &[]).unwrap();
        assert_eq!(clause.values, vec![SqlValue::NullableText(None)]);
    }

    #[test]
    fn empty_phone_patch_has_no_fields() {
        let patch: PhonePatch = serde_json::from_value(json!({ "phone_id": 3 })).unwrap();
        assert!(patch.field_set().is_empty());
    }

    #[test]
    fn long_apartment_number_fails_validation() {
        let patch: AddressPatch =
            serde_json::from_value(json!({ "apartment_number": "9".repeat(51) })).unwrap();
        let errors = patch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("apartment_number"));

        let cleared: AddressPatch =
            serde_json::from_value(json!({ "apartment_number": null })).unwrap();
        assert!(cleared.validate().is_ok());
    }

    #[test]
    fn blank_city_fails_validation() {
        let patch: AddressPatch = serde_json::from_value(json!({ "city": "" })).unwrap();
        assert!(patch.validate().is_err());
    }
}

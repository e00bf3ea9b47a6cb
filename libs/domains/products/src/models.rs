use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::de;

pub const CODE_MAX_LENGTH: usize = 10;
pub const NAME_MAX_LENGTH: usize = 100;
pub const PRICE_DECIMAL_PLACES: u32 = 2;
/// `NUMERIC(8, 2)` leaves six digits before the point
pub const PRICE_MAX_WHOLE_DIGITS: u32 = 6;

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A stored product with the names of its categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    /// Category names, oldest category first
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product as returned by create, retrieve and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDetail {
    #[schema(example = "20")]
    pub code: String,
    #[schema(example = "Ball")]
    pub name: String,
    #[schema(value_type = String, example = "50.00")]
    pub price: Decimal,
    #[schema(example = 25)]
    pub quantity: i32,
    #[schema(example = json!(["Sport"]))]
    pub categories: Vec<String>,
}

impl From<Product> for ProductDetail {
    fn from(product: Product) -> Self {
        Self {
            code: product.code,
            name: product.name,
            price: product.price,
            quantity: product.quantity,
            categories: product.categories,
        }
    }
}

/// Row of a product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSummary {
    pub code: String,
    pub name: String,
    #[schema(value_type = String, example = "50.00")]
    pub price: Decimal,
}

/// Request body for creating a product.
///
/// `price` and `quantity` may be sent as numbers or numeric strings.
/// `categories` may be a list of names or a single name.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[serde(default)]
    #[validate(custom(function = "validate_code"))]
    #[schema(example = "20", max_length = 10)]
    pub code: String,

    #[serde(default)]
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Ball", max_length = 100)]
    pub name: String,

    #[serde(default)]
    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_price")
    )]
    #[schema(value_type = String, example = "50")]
    pub price: Option<Decimal>,

    #[serde(default, deserialize_with = "de::int_or_string")]
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    #[schema(value_type = i32, example = 25, minimum = 0)]
    pub quantity: i32,

    #[serde(default, deserialize_with = "de::one_or_many")]
    #[schema(example = json!(["Sport"]))]
    pub categories: Vec<String>,
}

/// Request body for a partial update. Categories are not mutable here.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(custom(function = "validate_code"))]
    #[schema(example = "21", max_length = 10)]
    pub code: Option<String>,

    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Match ball", max_length = 100)]
    pub name: Option<String>,

    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "45.50")]
    pub price: Option<Decimal>,

    #[serde(default, deserialize_with = "de::option_int_or_string")]
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    #[schema(value_type = Option<i32>, example = 10, minimum = 0)]
    pub quantity: Option<i32>,
}

/// Validated product row handed to the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

impl NewProduct {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        mut price: Decimal,
        quantity: i32,
    ) -> Self {
        price.rescale(PRICE_DECIMAL_PLACES);

        Self {
            code: code.into(),
            name: name.into(),
            price,
            quantity,
        }
    }
}

/// Query string of the product listing.
///
/// Values stay raw strings so a bad `page` can be answered with 404
/// "Invalid page" instead of a decoding error.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// Name of the category to list products for
    #[param(example = "Sport")]
    pub category: Option<String>,
    /// 1-based page number
    #[param(example = "1")]
    pub page: Option<String>,
    /// Results per page, at most 100
    #[param(example = "10")]
    pub page_size: Option<String>,
}

/// Paginated product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    /// Products in the category across all pages
    pub count: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub results: Vec<ProductSummary>,
}

fn blank() -> ValidationError {
    ValidationError::new("blank").with_message(Cow::Borrowed("This field may not be blank."))
}

fn too_long(max: usize) -> ValidationError {
    ValidationError::new("max_length").with_message(Cow::Owned(format!(
        "Ensure this field has no more than {} characters.",
        max
    )))
}

fn validate_code(code: &str) -> Result<(), ValidationError> {
    if code.trim().is_empty() {
        return Err(blank());
    }
    if code.chars().count() > CODE_MAX_LENGTH {
        return Err(too_long(CODE_MAX_LENGTH));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(blank());
    }
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(too_long(NAME_MAX_LENGTH));
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::new(1, PRICE_DECIMAL_PLACES) {
        return Err(ValidationError::new("min_value").with_message(Cow::Borrowed(
            "Ensure this value is greater than or equal to 0.01.",
        )));
    }

    if price.normalize().scale() > PRICE_DECIMAL_PLACES {
        return Err(ValidationError::new("max_decimal_places").with_message(Cow::Owned(
            format!(
                "Ensure that there are no more than {} decimal places.",
                PRICE_DECIMAL_PLACES
            ),
        )));
    }

    if price.trunc() >= Decimal::from(10_i64.pow(PRICE_MAX_WHOLE_DIGITS)) {
        return Err(ValidationError::new("max_whole_digits").with_message(Cow::Owned(
            format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                PRICE_MAX_WHOLE_DIGITS
            ),
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn ball() -> CreateProduct {
        CreateProduct {
            code: "20".into(),
            name: "Ball".into(),
            price: Some(Decimal::from(50)),
            quantity: 25,
            categories: vec!["Sport".into()],
        }
    }

    fn first_code(input: &CreateProduct, field: &str) -> String {
        let errors = input.validate().unwrap_err();
        let field_errors = errors.field_errors();
        field_errors[field][0].code.to_string()
    }

    #[test]
    fn test_valid_product() {
        assert!(ball().validate().is_ok());
    }

    #[test]
    fn test_code_rules() {
        let mut input = ball();
        input.code = " ".into();
        assert_eq!(first_code(&input, "code"), "blank");

        input.code = "12345678901".into();
        assert_eq!(first_code(&input, "code"), "max_length");

        input.code = "1234567890".into();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_price_rules() {
        let mut input = ball();

        input.price = None;
        assert_eq!(first_code(&input, "price"), "required");

        for (raw, code) in [
            ("0", "min_value"),
            ("-1", "min_value"),
            ("0.001", "min_value"),
            ("1.005", "max_decimal_places"),
            ("1000000", "max_whole_digits"),
        ] {
            input.price = Some(Decimal::from_str(raw).unwrap());
            assert_eq!(first_code(&input, "price"), code, "price {}", raw);
        }

        for raw in ["0.01", "999999.99", "12.50", "7.000"] {
            input.price = Some(Decimal::from_str(raw).unwrap());
            assert!(input.validate().is_ok(), "price {}", raw);
        }
    }

    #[test]
    fn test_negative_quantity() {
        let mut input = ball();
        input.quantity = -1;
        assert_eq!(first_code(&input, "quantity"), "range");
    }

    #[test]
    fn test_create_accepts_string_numbers() {
        let input: CreateProduct = serde_json::from_str(
            r#"{"code":"20","name":"Ball","price":"50","quantity":"25","categories":"Sport"}"#,
        )
        .unwrap();

        assert_eq!(input.price, Some(Decimal::from(50)));
        assert_eq!(input.quantity, 25);
        assert_eq!(input.categories, ["Sport"]);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_update_validates_present_fields_only() {
        assert!(UpdateProduct::default().validate().is_ok());

        let update = UpdateProduct {
            quantity: Some(-5),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_new_product_stores_two_decimal_places() {
        let product = NewProduct::new("20", "Ball", Decimal::from(50), 25);
        assert_eq!(product.price.to_string(), "50.00");
    }
}

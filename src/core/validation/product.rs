//! Field rules for product payloads

use super::config::EntityValidationConfig;
use super::extractor::{Operation, ValidatableEntity};
use super::{filters, validators};
use crate::core::pricing::PRICE_SCALE;
use crate::core::product::Product;
use regex::Regex;
use std::sync::LazyLock;

pub const NAME_MAX_LEN: usize = 100;
pub const CREATOR_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 500;
pub const MAX_PRICE: f64 = 1_000_000.0;
pub const MAX_DISCOUNT: f64 = 100.0;

/// `http(s)://` URL or `data:image/<type>;base64,<payload>` URI
pub static IMAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://[^\s/$.?#][^\s]*|data:image/[A-Za-z0-9.+-]+;base64,[A-Za-z0-9+/]+={0,2})$")
        .expect("image pattern is valid")
});

const IMAGE_DESCRIPTION: &str = "an http(s) URL or a base64 image data URI";

impl ValidatableEntity for Product {
    fn validation_config(operation: Operation) -> EntityValidationConfig {
        let mut config = match operation {
            Operation::Create => EntityValidationConfig::new("product"),
            Operation::Update => EntityValidationConfig::partial("product"),
        };

        // Whether the field must be present (create) or may merely not be
        // nulled out (update).
        let presence = |config: &mut EntityValidationConfig, field: &str| match operation {
            Operation::Create => config.add_validator(field, validators::required()),
            Operation::Update => config.add_validator(field, validators::not_null()),
        };

        config.add_filter("name", filters::trim());
        presence(&mut config, "name");
        config.add_validator("name", validators::string());
        config.add_validator("name", validators::string_length(1, NAME_MAX_LEN));

        config.add_filter("price", filters::empty_to_null());
        config.add_filter("price", filters::coerce_number());
        presence(&mut config, "price");
        config.add_validator("price", validators::number());
        config.add_validator("price", validators::positive());
        config.add_validator("price", validators::max_value(MAX_PRICE));
        config.add_filter("price", filters::round_decimals(PRICE_SCALE));

        config.add_filter("discount", filters::empty_to_null());
        config.add_filter("discount", filters::coerce_number());
        config.add_validator("discount", validators::number());
        config.add_validator("discount", validators::min_value(0.0));
        config.add_validator("discount", validators::max_value(MAX_DISCOUNT));
        config.add_filter("discount", filters::round_decimals(PRICE_SCALE));

        config.add_filter("image", filters::trim());
        presence(&mut config, "image");
        config.add_validator("image", validators::string());
        config.add_validator("image", validators::matches(&IMAGE_PATTERN, IMAGE_DESCRIPTION));

        config.add_filter("creator", filters::trim());
        config.add_filter("creator", filters::empty_to_null());
        config.add_validator("creator", validators::string());
        config.add_validator("creator", validators::string_length(0, CREATOR_MAX_LEN));

        config.add_validator("description", validators::string());
        config.add_validator(
            "description",
            validators::string_length(0, DESCRIPTION_MAX_LEN),
        );

        config.add_filter("stock", filters::empty_to_null());
        config.add_filter("stock", filters::coerce_number());
        config.add_filter("stock", filters::whole_number());
        config.add_validator("stock", validators::integer());
        config.add_validator("stock", validators::min_value(0.0));
        config.add_validator("stock", validators::max_value(f64::from(u32::MAX)));

        config
    }
}

//! Products Data

use crate::{
    domain::products::models::{Product, ProductUuid},
    money::price_input,
    validation::{ValidationErrors, Validator},
};

/// Product form input, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    /// Price text such as `49,90`.
    pub price: String,
    pub description: String,
    pub image_uri: Option<String>,
}

impl ProductForm {
    /// Check every field and produce validated details.
    ///
    /// # Errors
    ///
    /// Returns every failing field when the form is not valid.
    pub fn validate(&self) -> Result<ProductDetails, ValidationErrors> {
        let mut validator = Validator::new();

        let name = validator.required("name", &self.name);
        let price = validator.price("price", &self.price);

        let description = self.description.trim().to_string();
        let image_uri = self
            .image_uri
            .as_deref()
            .map(str::trim)
            .filter(|uri| !uri.is_empty())
            .map(str::to_string);

        validator.finish(|| {
            Some(ProductDetails {
                name,
                price: price?,
                description,
                image_uri,
            })
        })
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: price_input(product.price),
            description: product.description.clone(),
            image_uri: product.image_uri.clone(),
        }
    }
}

/// Validated product fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetails {
    pub name: String,
    /// Price in minor units.
    pub price: u64,
    pub description: String,
    pub image_uri: Option<String>,
}

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub details: ProductDetails,
}

//! Test data builders.

use crate::{
    domain::{clients::data::ClientDetails, products::data::ProductDetails},
    postal::PostalCode,
    validation::TaxId,
};

#[expect(clippy::expect_used, reason = "fixed, known-valid test data")]
pub(crate) fn client_details(name: &str) -> ClientDetails {
    ClientDetails {
        name: name.to_string(),
        tax_id: TaxId::parse("12345678000195").expect("valid tax id"),
        email: "contato@example.com.br".to_string(),
        phone: "(11) 98765-4321".to_string(),
        postal_code: PostalCode::parse("01310-100").expect("valid postal code"),
        state: "SP".to_string(),
        city: "São Paulo".to_string(),
        neighborhood: "Bela Vista".to_string(),
        street: "Avenida Paulista".to_string(),
        number: "1000".to_string(),
        photo_uri: None,
    }
}

pub(crate) fn product_details(name: &str, price: u64) -> ProductDetails {
    ProductDetails {
        name: name.to_string(),
        price,
        description: String::new(),
        image_uri: None,
    }
}

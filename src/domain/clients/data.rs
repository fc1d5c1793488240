//! Clients Data

use crate::{
    domain::clients::models::{Client, ClientUuid},
    postal::{Address, PostalCode},
    validation::{TaxId, ValidationErrors, Validator},
};

/// Client form input, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientForm {
    pub name: String,
    pub tax_id: String,
    pub email: String,
    pub phone: String,
    pub postal_code: String,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
    pub number: String,
    pub photo_uri: Option<String>,
}

impl ClientForm {
    /// Fill the address fields from an autofilled [`Address`]. The postal
    /// code and house number are left alone.
    pub fn apply_address(&mut self, address: Address) {
        self.street = address.street;
        self.neighborhood = address.neighborhood;
        self.city = address.city;
        self.state = address.state;
    }

    /// Check every field and produce validated details.
    ///
    /// # Errors
    ///
    /// Returns every failing field when the form is not valid.
    pub fn validate(&self) -> Result<ClientDetails, ValidationErrors> {
        let mut validator = Validator::new();

        let name = validator.required("name", &self.name);
        let tax_id = validator.tax_id("tax_id", &self.tax_id);
        let email = validator.email("email", &self.email);
        let phone = validator.required("phone", &self.phone);
        let postal_code = validator.postal_code("postal_code", &self.postal_code);
        let state = validator.required("state", &self.state);
        let city = validator.required("city", &self.city);
        let neighborhood = validator.required("neighborhood", &self.neighborhood);
        let street = validator.required("street", &self.street);
        let number = validator.required("number", &self.number);

        let photo_uri = self
            .photo_uri
            .as_deref()
            .map(str::trim)
            .filter(|uri| !uri.is_empty())
            .map(str::to_string);

        validator.finish(|| {
            Some(ClientDetails {
                name,
                tax_id: tax_id?,
                email: email?,
                phone,
                postal_code: postal_code?,
                state,
                city,
                neighborhood,
                street,
                number,
                photo_uri,
            })
        })
    }
}

impl From<&Client> for ClientForm {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            tax_id: client.tax_id.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            postal_code: client.postal_code.clone(),
            state: client.state.clone(),
            city: client.city.clone(),
            neighborhood: client.neighborhood.clone(),
            street: client.street.clone(),
            number: client.number.clone(),
            photo_uri: client.photo_uri.clone(),
        }
    }
}

/// Validated client fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDetails {
    pub name: String,
    pub tax_id: TaxId,
    pub email: String,
    pub phone: String,
    pub postal_code: PostalCode,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
    pub number: String,
    pub photo_uri: Option<String>,
}

/// New Client Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub uuid: ClientUuid,
    pub details: ClientDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ClientForm {
        ClientForm {
            name: " Padaria Central ".to_string(),
            tax_id: "12345678000195".to_string(),
            email: "contato@padaria.com.br".to_string(),
            phone: "(11) 98765-4321".to_string(),
            postal_code: "01310100".to_string(),
            state: "SP".to_string(),
            city: "São Paulo".to_string(),
            neighborhood: "Bela Vista".to_string(),
            street: "Avenida Paulista".to_string(),
            number: "1000".to_string(),
            photo_uri: Some("  ".to_string()),
        }
    }

    #[test]
    fn valid_form_is_normalised() -> Result<(), ValidationErrors> {
        let details = valid_form().validate()?;

        assert_eq!(details.name, "Padaria Central");
        assert_eq!(details.tax_id.as_str(), "12.345.678/0001-95");
        assert_eq!(details.postal_code.as_str(), "01310-100");
        assert_eq!(details.photo_uri, None);

        Ok(())
    }

    #[test]
    fn invalid_form_reports_each_field() {
        let form = ClientForm {
            name: String::new(),
            tax_id: "123".to_string(),
            postal_code: "abc".to_string(),
            ..valid_form()
        };

        let errors = form.validate().err().unwrap_or_default();

        assert!(errors.has("name"));
        assert!(errors.has("tax_id"));
        assert!(errors.has("postal_code"));
        assert!(!errors.has("email"));
    }

    #[test]
    fn apply_address_keeps_number_and_postal_code() {
        let mut form = valid_form();

        form.apply_address(Address {
            street: "Rua Augusta".to_string(),
            neighborhood: "Consolação".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
        });

        assert_eq!(form.street, "Rua Augusta");
        assert_eq!(form.neighborhood, "Consolação");
        assert_eq!(form.number, "1000");
        assert_eq!(form.postal_code, "01310100");
    }
}

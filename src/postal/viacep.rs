//! ViaCEP postal code client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::{Address, LookupError, PostalCode, PostalCodeLookup};

/// Configuration for the ViaCEP client.
#[derive(Debug, Clone)]
pub struct ViaCepConfig {
    /// Service address, e.g. `"https://viacep.com.br"`.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

/// HTTP client for the public ViaCEP service.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    config: ViaCepConfig,
    http: Client,
}

impl ViaCepClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: ViaCepConfig) -> Result<Self, LookupError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }

    fn url_for(&self, code: &PostalCode) -> String {
        format!(
            "{}/ws/{}/json/",
            self.config.base_url.trim_end_matches('/'),
            code.digits()
        )
    }
}

#[async_trait]
impl PostalCodeLookup for ViaCepClient {
    #[instrument(skip_all, fields(code = %code))]
    async fn lookup(&self, code: &PostalCode) -> Result<Address, LookupError> {
        let response = self.http.get(self.url_for(code)).send().await?;

        let status = response.status();

        if status == StatusCode::BAD_REQUEST {
            return Err(LookupError::NotFound);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            return Err(LookupError::UnexpectedResponse(format!(
                "lookup failed with status {status}: {text}"
            )));
        }

        let parsed: ViaCepResponse = response.json().await?;

        parsed.into_address()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    erro: Option<Value>,

    #[serde(default)]
    logradouro: String,

    #[serde(default)]
    bairro: String,

    #[serde(default)]
    localidade: String,

    #[serde(default)]
    uf: String,
}

impl ViaCepResponse {
    fn into_address(self) -> Result<Address, LookupError> {
        let unknown = match &self.erro {
            None | Some(Value::Bool(false) | Value::Null) => false,
            Some(Value::String(flag)) => flag != "false",
            Some(_) => true,
        };

        if unknown {
            return Err(LookupError::NotFound);
        }

        Ok(Address {
            street: self.logradouro,
            neighborhood: self.bairro,
            city: self.localidade,
            state: self.uf,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn client(base_url: &str) -> Result<ViaCepClient, LookupError> {
        ViaCepClient::new(ViaCepConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(1),
        })
    }

    #[test]
    fn url_uses_bare_digits() -> TestResult {
        let client = client("https://viacep.com.br/")?;

        assert_eq!(
            client.url_for(&PostalCode::parse("01310-100")?),
            "https://viacep.com.br/ws/01310100/json/"
        );

        Ok(())
    }

    #[test]
    fn response_maps_to_address() -> TestResult {
        let body = r#"{
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "complemento": "de 612 a 1510 - lado par",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP"
        }"#;

        let address = serde_json::from_str::<ViaCepResponse>(body)?.into_address()?;

        assert_eq!(
            address,
            Address {
                street: "Avenida Paulista".to_string(),
                neighborhood: "Bela Vista".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
            }
        );

        Ok(())
    }

    #[test]
    fn erro_flag_means_not_found() -> TestResult {
        for body in [r#"{"erro": true}"#, r#"{"erro": "true"}"#] {
            let result = serde_json::from_str::<ViaCepResponse>(body)?.into_address();

            assert!(
                matches!(result, Err(LookupError::NotFound)),
                "expected NotFound for {body}, got {result:?}"
            );
        }

        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::Validator;

/// Embedded address value object. Owned exclusively by the physician record and
/// persisted as columns of the `medicos` row; it has no identity of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Address {
    #[serde(rename = "logradouro")]
    #[sqlx(rename = "logradouro")]
    pub street: String,
    #[serde(rename = "bairro")]
    #[sqlx(rename = "bairro")]
    pub district: String,
    #[serde(rename = "cep")]
    #[sqlx(rename = "cep")]
    pub zip_code: String,
    #[serde(rename = "cidade")]
    #[sqlx(rename = "cidade")]
    pub city: String,
    #[serde(rename = "uf")]
    #[sqlx(rename = "uf")]
    pub state: String,
    #[serde(rename = "complemento")]
    #[sqlx(rename = "complemento")]
    pub complement: Option<String>,
    #[serde(rename = "numero")]
    #[sqlx(rename = "numero")]
    pub number: Option<String>,
}

/// Address section of a registration payload. The wire keys `CEP` and `UF` are
/// uppercase on input only; responses serialize the lowercase entity names.
#[derive(Debug, Deserialize)]
pub struct AddressPayload {
    #[serde(rename = "logradouro")]
    pub street: Option<String>,
    #[serde(rename = "bairro")]
    pub district: Option<String>,
    #[serde(rename = "CEP")]
    pub zip_code: Option<String>,
    #[serde(rename = "cidade")]
    pub city: Option<String>,
    #[serde(rename = "UF")]
    pub state: Option<String>,
    #[serde(rename = "complemento")]
    pub complement: Option<String>,
    #[serde(rename = "numero")]
    pub number: Option<String>,
}

/// Address section of an update payload. Every field is optional; absent fields
/// leave the stored value unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct AddressUpdate {
    #[serde(rename = "logradouro")]
    pub street: Option<String>,
    #[serde(rename = "bairro")]
    pub district: Option<String>,
    #[serde(rename = "CEP")]
    pub zip_code: Option<String>,
    #[serde(rename = "cidade")]
    pub city: Option<String>,
    #[serde(rename = "UF")]
    pub state: Option<String>,
    #[serde(rename = "complemento")]
    pub complement: Option<String>,
    #[serde(rename = "numero")]
    pub number: Option<String>,
}

impl AddressPayload {
    /// Field-level checks for registration, reported under the `endereco.` prefix
    pub fn check(&self, v: &mut Validator) {
        v.require_text("endereco.logradouro", self.street.as_deref());
        v.require_text("endereco.bairro", self.district.as_deref());
        v.require_digits("endereco.CEP", self.zip_code.as_deref(), 8, 8);
        v.require_text("endereco.cidade", self.city.as_deref());
        v.require_text("endereco.UF", self.state.as_deref());
    }

    /// Build the value object from a payload whose required fields were already
    /// verified by `check`. Missing required fields yield `None`.
    pub fn into_address(self) -> Option<Address> {
        Some(Address {
            street: self.street?,
            district: self.district?,
            zip_code: self.zip_code?,
            city: self.city?,
            state: self.state?,
            complement: self.complement,
            number: self.number,
        })
    }
}

impl AddressUpdate {
    pub fn check(&self, v: &mut Validator) {
        v.optional_text("endereco.logradouro", self.street.as_deref());
        v.optional_text("endereco.bairro", self.district.as_deref());
        v.optional_digits("endereco.CEP", self.zip_code.as_deref(), 8, 8);
        v.optional_text("endereco.cidade", self.city.as_deref());
        v.optional_text("endereco.UF", self.state.as_deref());
    }
}

impl Address {
    /// Apply a partial update: only present fields overwrite stored values,
    /// absence means "no change requested".
    pub fn apply_update(&mut self, update: &AddressUpdate) {
        if let Some(street) = &update.street {
            self.street = street.clone();
        }
        if let Some(district) = &update.district {
            self.district = district.clone();
        }
        if let Some(zip_code) = &update.zip_code {
            self.zip_code = zip_code.clone();
        }
        if let Some(city) = &update.city {
            self.city = city.clone();
        }
        if let Some(state) = &update.state {
            self.state = state.clone();
        }
        if let Some(complement) = &update.complement {
            self.complement = Some(complement.clone());
        }
        if let Some(number) = &update.number {
            self.number = Some(number.clone());
        }
    }
}

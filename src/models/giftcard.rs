// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gift card records from the search and detail endpoints.
//!
//! The API is loose about number encoding (amounts arrive as decimal strings
//! or numbers, ids as strings or numbers), so those fields go through lenient
//! deserializers. Anything that cannot be read as a number is a parse error.
//! The card's JSON is kept as received and is what gets serialized back out.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::cmp::Ordering;

/// A single gift card.
///
/// Search results and the detail endpoint share this shape; the detail
/// response carries more of the optional fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Giftcard {
    pub giftcard_id: String,
    /// Value date, used to order cards by recency
    pub valuta: f64,
    pub remaining_amount: Money,
    /// Amount the card was issued with
    pub amount: Option<Money>,
    pub properties: GiftcardProperties,
    /// The record exactly as the API sent it
    pub raw: Value,
}

/// A monetary amount.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Money {
    #[serde(deserialize_with = "decimal")]
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GiftcardProperties {
    /// Link to the rendered voucher barcode
    #[serde(rename = "eVoucherLink", default)]
    pub e_voucher_link: Option<String>,
}

/// Typed view of the fields the client relies on.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GiftcardFields {
    #[serde(deserialize_with = "string_or_number")]
    giftcard_id: String,
    #[serde(deserialize_with = "timestamp")]
    valuta: f64,
    remaining_amount: Money,
    #[serde(default)]
    amount: Option<Money>,
    #[serde(default)]
    properties: GiftcardProperties,
}

impl TryFrom<Value> for Giftcard {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let fields = GiftcardFields::deserialize(&raw)?;
        Ok(Self {
            giftcard_id: fields.giftcard_id,
            valuta: fields.valuta,
            remaining_amount: fields.remaining_amount,
            amount: fields.amount,
            properties: fields.properties,
            raw,
        })
    }
}

impl Serialize for Giftcard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl Giftcard {
    pub fn remaining(&self) -> f64 {
        self.remaining_amount.amount
    }

    pub fn original_amount(&self) -> Option<f64> {
        self.amount.as_ref().map(|money| money.amount)
    }

    /// Order two cards by value date.
    pub fn cmp_valuta(&self, other: &Giftcard) -> Ordering {
        self.valuta.total_cmp(&other.valuta)
    }
}

/// Response body of `POST /giftcards/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct GiftcardPage {
    pub content: Vec<Giftcard>,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

fn number_or_numeric_string<'de, D: Deserializer<'de>>(
    deserializer: D,
    what: &str,
) -> Result<f64, D::Error> {
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        other => {
            return Err(de::Error::custom(format!(
                "expected numeric {}, got {}",
                what, other
            )))
        }
    };

    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| de::Error::custom(format!("invalid {}", what)))
}

fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    number_or_numeric_string(deserializer, "amount")
}

fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    number_or_numeric_string(deserializer, "valuta")
}

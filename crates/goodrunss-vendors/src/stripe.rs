// ABOUTME: Stripe Connect client for booking charges and trainer payouts
// ABOUTME: Creates destination charges, inspects connected accounts, and manages payouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use goodrunss_core::constants::payments::CURRENCY;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::circuit_breaker::CircuitBreaker;
use crate::errors::VendorError;
use crate::http_client::{normalize_base_url, read_json, shared_client};

const VENDOR: &str = "Stripe";

/// Production Stripe API base URL
pub const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Parameters for a confirmed destination charge
#[derive(Debug, Clone)]
pub struct DestinationCharge<'a> {
    /// Total amount in cents
    pub amount_cents: i64,
    /// Stripe payment method id supplied by the client app
    pub payment_method_id: &'a str,
    /// Platform fee in cents kept by the platform account
    pub application_fee_cents: i64,
    /// Connected account receiving the remainder
    pub destination_account: &'a str,
    /// Booking being paid for, stored as metadata
    pub booking_id: i64,
}

/// Subset of a Stripe `PaymentIntent`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// `pi_...` identifier
    pub id: String,
    /// Amount in cents
    pub amount: i64,
    /// Intent status (`succeeded`, `requires_action`, ...)
    pub status: String,
}

/// Subset of a Stripe connected account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectedAccount {
    /// `acct_...` identifier
    pub id: String,
    /// Whether the account can accept charges
    #[serde(default)]
    pub charges_enabled: bool,
    /// Whether the account can receive payouts
    #[serde(default)]
    pub payouts_enabled: bool,
}

/// Subset of a Stripe payout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payout {
    /// `po_...` identifier
    pub id: String,
    /// Amount in cents
    pub amount: i64,
    /// Payout status (`paid`, `pending`, `in_transit`, ...)
    pub status: String,
    /// Expected arrival as a Unix timestamp
    pub arrival_date: Option<i64>,
    /// Creation time as a Unix timestamp
    pub created: Option<i64>,
    /// `standard` or `instant`
    pub method: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeList<T> {
    data: Vec<T>,
}

/// Stripe API client authenticated with the platform secret key
#[derive(Debug)]
pub struct StripeClient {
    secret_key: String,
    base_url: String,
    breaker: CircuitBreaker,
}

impl StripeClient {
    /// Create a client against the production API
    #[must_use]
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            base_url: STRIPE_API_BASE.to_owned(),
            breaker: CircuitBreaker::new(VENDOR),
        }
    }

    /// Point the client at a different API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Create and confirm a payment that routes funds to a connected account
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` if Stripe declines or cannot be reached
    #[instrument(skip(self, charge), fields(vendor = VENDOR, booking_id = charge.booking_id))]
    pub async fn create_destination_charge(
        &self,
        charge: &DestinationCharge<'_>,
    ) -> Result<PaymentIntent, VendorError> {
        let form = [
            ("amount", charge.amount_cents.to_string()),
            ("currency", CURRENCY.to_owned()),
            ("payment_method", charge.payment_method_id.to_owned()),
            ("confirm", "true".to_owned()),
            ("automatic_payment_methods[enabled]", "true".to_owned()),
            ("automatic_payment_methods[allow_redirects]", "never".to_owned()),
            (
                "application_fee_amount",
                charge.application_fee_cents.to_string(),
            ),
            (
                "transfer_data[destination]",
                charge.destination_account.to_owned(),
            ),
            ("metadata[booking_id]", charge.booking_id.to_string()),
        ];

        let intent: PaymentIntent = self
            .breaker
            .call(async {
                let response = shared_client()
                    .post(format!("{}/payment_intents", self.base_url))
                    .bearer_auth(&self.secret_key)
                    .form(&form)
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await?;

        info!(payment_intent = %intent.id, status = %intent.status, "Payment intent created");
        Ok(intent)
    }

    /// Fetch a connected account
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` if the account is unknown or Stripe fails
    #[instrument(skip(self), fields(vendor = VENDOR))]
    pub async fn retrieve_account(&self, account_id: &str) -> Result<ConnectedAccount, VendorError> {
        self.breaker
            .call(async {
                let response = shared_client()
                    .get(format!("{}/accounts/{account_id}", self.base_url))
                    .bearer_auth(&self.secret_key)
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await
    }

    /// Create an instant payout on a connected account's balance
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` if the payout is refused
    #[instrument(skip(self), fields(vendor = VENDOR))]
    pub async fn create_instant_payout(
        &self,
        account_id: &str,
        amount_cents: i64,
    ) -> Result<Payout, VendorError> {
        let form = [
            ("amount", amount_cents.to_string()),
            ("currency", CURRENCY.to_owned()),
            ("method", "instant".to_owned()),
        ];

        self.breaker
            .call(async {
                let response = shared_client()
                    .post(format!("{}/payouts", self.base_url))
                    .bearer_auth(&self.secret_key)
                    .header("Stripe-Account", account_id)
                    .form(&form)
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await
    }

    /// List recent payouts of a connected account, newest first
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` if Stripe fails
    #[instrument(skip(self), fields(vendor = VENDOR))]
    pub async fn list_payouts(
        &self,
        account_id: &str,
        limit: u32,
    ) -> Result<Vec<Payout>, VendorError> {
        let list: StripeList<Payout> = self
            .breaker
            .call(async {
                let response = shared_client()
                    .get(format!("{}/payouts", self.base_url))
                    .bearer_auth(&self.secret_key)
                    .header("Stripe-Account", account_id)
                    .query(&[("limit", limit)])
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await?;
        Ok(list.data)
    }
}

// ABOUTME: Stripe Connect payment routes for booking charges and trainer payouts
// ABOUTME: Splits each booking payment between the platform commission and the trainer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use goodrunss_core::constants::payments::{CURRENCY, PLATFORM_COMMISSION_RATE, STATUS_COMPLETED};
use goodrunss_core::errors::{AppError, AppResult, ErrorCode};
use goodrunss_vendors::stripe::DestinationCharge;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::models::{NewTransaction, User};
use crate::resources::ServerResources;

/// Number of payouts returned by the payout history
const PAYOUT_HISTORY_LIMIT: u32 = 20;

/// Body of `POST /process-booking-payment`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingPaymentRequest {
    /// Booking to pay for
    pub booking_id: i64,
    /// Stripe payment method collected by the client
    pub payment_method_id: String,
}

/// Body of `POST /instant-payout`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InstantPayoutRequest {
    /// Trainer requesting the payout
    pub trainer_id: i64,
    /// Amount in dollars
    pub amount: f64,
}

/// Cent amounts of one booking charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentSplit {
    /// Total charged
    pub amount_cents: i64,
    /// Platform commission
    pub platform_fee_cents: i64,
    /// Remainder transferred to the trainer
    pub trainer_cents: i64,
}

impl PaymentSplit {
    /// Split a booking total in dollars
    ///
    /// The charge is rounded to the nearest cent while the commission is
    /// rounded down, so the trainer never receives less than their share.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn for_total(total_price: f64) -> Self {
        let amount_cents = (total_price * 100.0).round() as i64;
        let platform_fee_cents = (total_price * PLATFORM_COMMISSION_RATE * 100.0).floor() as i64;
        Self {
            amount_cents,
            platform_fee_cents,
            trainer_cents: amount_cents - platform_fee_cents,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

fn connect_account(trainer: &User) -> AppResult<&str> {
    trainer
        .stripe_connect_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::invalid_input("Trainer has no connected Stripe account"))
}

/// Stripe payment routes
pub struct PaymentRoutes;

impl PaymentRoutes {
    /// Create all payment routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/v1/payments/process-booking-payment",
                post(Self::handle_booking_payment),
            )
            .route(
                "/api/v1/payments/instant-payout",
                post(Self::handle_instant_payout),
            )
            .route(
                "/api/v1/payments/available-balance/:trainer_id",
                get(Self::handle_available_balance),
            )
            .route(
                "/api/v1/payments/payout-history/:trainer_id",
                get(Self::handle_payout_history),
            )
            .with_state(resources)
    }

    async fn load_trainer(resources: &ServerResources, trainer_id: i64) -> AppResult<User> {
        resources
            .database
            .get_user(trainer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Trainer").with_resource_id(trainer_id.to_string()))
    }

    /// Handle POST /api/v1/payments/process-booking-payment
    async fn handle_booking_payment(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<BookingPaymentRequest>,
    ) -> Result<Response, AppError> {
        let stripe = resources.stripe()?;

        let booking = resources
            .database
            .get_booking(request.booking_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Booking").with_resource_id(request.booking_id.to_string())
            })?;
        let trainer = Self::load_trainer(&resources, booking.trainer_id).await?;
        let destination = connect_account(&trainer)?;

        let split = PaymentSplit::for_total(booking.total_price);
        let intent = stripe
            .create_destination_charge(&DestinationCharge {
                amount_cents: split.amount_cents,
                payment_method_id: &request.payment_method_id,
                application_fee_cents: split.platform_fee_cents,
                destination_account: destination,
                booking_id: booking.id,
            })
            .await?;

        let transaction_id = resources
            .database
            .record_transaction(&NewTransaction {
                user_id: booking.user_id,
                booking_id: Some(booking.id),
                amount: dollars(split.amount_cents),
                platform_fee: dollars(split.platform_fee_cents),
                trainer_amount: dollars(split.trainer_cents),
                stripe_payment_intent_id: Some(intent.id.clone()),
                status: STATUS_COMPLETED.to_owned(),
            })
            .await?;

        info!(
            booking_id = booking.id,
            transaction_id,
            amount_cents = split.amount_cents,
            "Booking payment processed"
        );

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "payment_intent_id": intent.id,
                "transaction_id": transaction_id,
                "amount_charged": dollars(split.amount_cents),
                "platform_fee": dollars(split.platform_fee_cents),
                "trainer_amount": dollars(split.trainer_cents),
                "status": intent.status,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/payments/instant-payout
    async fn handle_instant_payout(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<InstantPayoutRequest>,
    ) -> Result<Response, AppError> {
        let stripe = resources.stripe()?;

        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                "amount must be greater than zero",
            ));
        }

        let trainer = Self::load_trainer(&resources, request.trainer_id).await?;
        let account_id = connect_account(&trainer)?;

        let account = stripe.retrieve_account(account_id).await?;
        if !(account.charges_enabled && account.payouts_enabled) {
            return Err(AppError::invalid_input(
                "Connected account is not enabled for instant payouts",
            ));
        }

        let amount_cents = PaymentSplit::for_total(request.amount).amount_cents;
        let payout = stripe.create_instant_payout(account_id, amount_cents).await?;

        info!(trainer_id = trainer.id, payout_id = %payout.id, "Instant payout created");

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "payout_id": payout.id,
                "amount": dollars(payout.amount),
                "status": payout.status,
                "arrival_date": payout.arrival_date,
            })),
        )
            .into_response())
    }

    /// Handle GET /api/v1/payments/available-balance/:trainer_id
    async fn handle_available_balance(
        State(resources): State<Arc<ServerResources>>,
        Path(trainer_id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::load_trainer(&resources, trainer_id).await?;
        let balance = resources
            .database
            .trainer_available_balance(trainer_id)
            .await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "trainer_id": trainer_id,
                "available_balance": balance,
                "currency": CURRENCY,
            })),
        )
            .into_response())
    }

    /// Handle GET /api/v1/payments/payout-history/:trainer_id
    async fn handle_payout_history(
        State(resources): State<Arc<ServerResources>>,
        Path(trainer_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let stripe = resources.stripe()?;
        let trainer = Self::load_trainer(&resources, trainer_id).await?;
        let account_id = connect_account(&trainer)?;

        let payouts: Vec<_> = stripe
            .list_payouts(account_id, PAYOUT_HISTORY_LIMIT)
            .await?
            .into_iter()
            .map(|payout| {
                json!({
                    "id": payout.id,
                    "amount": dollars(payout.amount),
                    "status": payout.status,
                    "arrival_date": payout.arrival_date,
                    "created": payout.created,
                    "method": payout.method,
                })
            })
            .collect();

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "trainer_id": trainer_id,
                "count": payouts.len(),
                "payouts": payouts,
            })),
        )
            .into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_rounds_fee_down() {
        let split = PaymentSplit::for_total(80.0);
        assert_eq!(split.amount_cents, 8000);
        assert_eq!(split.platform_fee_cents, 400);
        assert_eq!(split.trainer_cents, 7600);

        let split = PaymentSplit::for_total(19.99);
        assert_eq!(split.amount_cents, 1999);
        assert_eq!(split.platform_fee_cents, 99);
        assert_eq!(split.trainer_cents, 1900);
    }

    #[test]
    fn test_split_parts_sum_to_total() {
        for total in [0.01, 1.0, 33.33, 75.5, 120.0, 999.99] {
            let split = PaymentSplit::for_total(total);
            assert_eq!(split.platform_fee_cents + split.trainer_cents, split.amount_cents);
            assert!(split.platform_fee_cents <= split.amount_cents / 20);
        }
    }
}

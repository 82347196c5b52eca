// ABOUTME: OpenAPI documentation endpoint with Swagger UI for the GoodRunss API
// ABOUTME: Serves the generated spec at /api-docs/openapi.json and interactive docs at /docs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

//! `OpenAPI` documentation routes
//!
//! Handlers are associated functions, which `utoipa` path annotations cannot
//! describe, so the document carries request schemas only.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::routes::calendar::CreateEventRequest;
use crate::routes::gmail::{BookingConfirmationRequest, SendEmailRequest};
use crate::routes::instagram::{ConnectInstagramRequest, PostAchievementRequest};
use crate::routes::maps::{DirectionsRequest, GeocodeRequest, NearbyCourtsRequest};
use crate::routes::marketplace::CreateListingRequest;
use crate::routes::payments::{BookingPaymentRequest, InstantPayoutRequest};
use crate::routes::sms::{SendCodeRequest, SendSmsRequest, VerifyCodeRequest};
use crate::routes::wearables::ConnectDeviceRequest;
use crate::routes::zoom::{ConnectZoomRequest, CreateVirtualSessionRequest};

/// `OpenAPI` document for the GoodRunss API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "GoodRunss API",
        version = "2.0.0",
        description = "Sports marketplace and vendor integrations backend",
        license(name = "MIT OR Apache-2.0")
    ),
    tags(
        (name = "marketplace", description = "Equipment listings"),
        (name = "payments", description = "Stripe Connect booking payments"),
        (name = "integrations", description = "Vendor integrations under /api/v1")
    ),
    components(
        schemas(
            CreateListingRequest,
            BookingPaymentRequest,
            InstantPayoutRequest,
            ConnectDeviceRequest,
            SendEmailRequest,
            BookingConfirmationRequest,
            CreateEventRequest,
            SendSmsRequest,
            SendCodeRequest,
            VerifyCodeRequest,
            ConnectInstagramRequest,
            PostAchievementRequest,
            GeocodeRequest,
            DirectionsRequest,
            NearbyCourtsRequest,
            ConnectZoomRequest,
            CreateVirtualSessionRequest,
        )
    ),
    servers(
        (url = "http://localhost:8001", description = "Local development server")
    )
)]
pub struct ApiDoc;

/// `OpenAPI` routes provider
pub struct OpenApiRoutes;

impl OpenApiRoutes {
    /// Create `OpenAPI` documentation routes
    ///
    /// Provides:
    /// - `/docs` - Interactive Swagger UI documentation
    /// - `/api-docs/openapi.json` - Raw `OpenAPI` JSON document
    pub fn routes<S: Clone + Send + Sync + 'static>() -> Router<S> {
        Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
    }
}

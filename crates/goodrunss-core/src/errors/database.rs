// ABOUTME: Conversion from sqlx errors into AppError
// ABOUTME: Maps missing rows to not-found and everything else to database errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use super::{AppError, ErrorCode};

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::new(ErrorCode::ResourceNotFound, "Record not found"),
            other => Self::database(format!("Database operation failed: {other}")).with_source(other),
        }
    }
}

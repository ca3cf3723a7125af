use actix_web::{HttpResponse, web};
use log::info;

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::transaction::NewTransaction;

/// `POST /transactions`
///
/// Validates and stores a purchase. Responds 201 with the stored record,
/// 400 with the validator's message, or 500 if the store fails.
pub async fn store_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTransaction>,
) -> ApiResult<HttpResponse> {
    let mut transaction = body.into_inner();
    transaction.validate(&state.date_format)?;

    let stored = state
        .store
        .insert(&transaction)
        .await
        .map_err(ApiError::store_write)?;

    info!("transaction successfully stored: {}", stored.id);
    Ok(HttpResponse::Created().json(stored))
}

/// `GET /transactions/{id}/exchange-rate/{country}`
pub async fn retrieve_converted_transaction(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (id, country) = path.into_inner();

    // Non-numeric ids can never match a row.
    let Ok(numeric_id) = id.parse::<i64>() else {
        return Err(ApiError::transaction_not_found(&id));
    };

    let result = state.conversions.convert(numeric_id, &country).await?;
    info!("successfully retrieved transaction with exchange rate: {result:?}");

    Ok(HttpResponse::Ok().json(result))
}

// Aggregate endpoints

use crate::aggregator::{self, filter::RecordFilter};
use crate::auth::middleware::AuthenticatedUser;
use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::api::{FeatureTotals, FilterQuery, TrendPoint};
use crate::models::record::Feature;
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::debug;

/// Sum of all six features over the filtered records
///
/// GET /totalTimeSpent?age=<bucket>&gender=<Male|Female>&fromDate=<date>&toDate=<date>
///
/// Sits behind the conditional auth gate: any filter requires a token.
pub async fn total_time_spent_handler(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<AuthenticatedUser>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<FeatureTotals>, ApiError> {
    let filter = RecordFilter::from_query(&query)?;
    let totals = aggregator::total_sum(&state.records, &filter);

    debug!(
        stages = filter.stages().len(),
        account_id = user.as_ref().map(|Extension(u)| u.0.account_id.as_str()),
        "Total time spent computed"
    );

    Ok(Json(totals))
}

/// Per-day sums of one feature over the filtered records
///
/// GET /feature-trend/:feature?age=&gender=&fromDate=&toDate=
pub async fn feature_trend_handler(
    State(state): State<Arc<AppState>>,
    Path(feature): Path<String>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Vec<TrendPoint>>, ApiError> {
    let feature: Feature = feature.parse().map_err(ApiError::InvalidArgument)?;
    let filter = RecordFilter::from_query(&query)?;

    let trend = aggregator::feature_trend(&state.records, feature, &filter);
    debug!(feature = %feature, days = trend.len(), "Feature trend computed");

    Ok(Json(trend))
}

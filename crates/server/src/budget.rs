use api_types::budget::BudgetOverview;
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use engine::BudgetWindow;

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
};

/// Overview for the current UTC calendar month.
pub async fn overview(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetOverview>, ServerError> {
    let window = BudgetWindow::month_of(Utc::now());
    let overview = state.engine.budget_overview(user.id, window).await?;
    Ok(Json(overview))
}

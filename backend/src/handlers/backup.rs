//! HTTP handlers for backup and restore endpoints

use axum::{extract::State, Json};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::backup::{BackupService, RestoreSummary};
use crate::AppState;
use crate::models::BackupDocument;

/// Export the ledger as a checksummed JSON document
pub async fn export_backup(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<BackupDocument>> {
    require_owner(&current_user)?;
    let service = BackupService::new(state.db);
    let document = service.export().await?;
    Ok(Json(document))
}

/// Restore a previously exported document, replacing the ledger
pub async fn restore_backup(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(document): Json<BackupDocument>,
) -> AppResult<Json<RestoreSummary>> {
    require_owner(&current_user)?;
    let service = BackupService::new(state.db);
    let summary = service.restore(document).await?;
    Ok(Json(summary))
}

fn require_owner(current_user: &CurrentUser) -> AppResult<()> {
    if !current_user.0.is_owner() {
        return Err(AppError::Unauthorized(
            "Backup operations require the owner account".to_string(),
        ));
    }
    Ok(())
}

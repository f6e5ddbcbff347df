use axum::{
    extract::{Path, State},
    response::Redirect,
    Form,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    error::{AppError, AppResult},
    middleware::flash,
    models::group::CreateGroupForm,
    services::{groups::GroupService, metrics},
    AppState,
};

/// POST /add_group
pub async fn add_group(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CreateGroupForm>,
) -> AppResult<(CookieJar, Redirect)> {
    let jar = match GroupService::create(&state.db, &form.group_name).await {
        Ok(group) => {
            metrics::GROUPS_CREATED.inc();
            tracing::info!("Created group \"{}\" ({})", group.name, group.id);
            flash::success(jar, format!("Group \"{}\" created!", group.name))
        }
        Err(AppError::Validation(msg)) => {
            tracing::warn!("Rejected group name {:?}: {}", form.group_name, msg);
            metrics::rejected("add_group");
            flash::error(jar, msg)
        }
        Err(e) => return Err(e),
    };
    Ok((jar, Redirect::to("/")))
}

/// POST /delete_group/{id}. Removes the group and every alarm in it.
pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Redirect)> {
    let jar = match GroupService::delete(&state.db, id).await {
        Ok(group) => {
            metrics::GROUPS_DELETED.inc();
            flash::success(jar, format!("Group \"{}\" deleted!", group.name))
        }
        Err(AppError::Validation(msg)) => {
            tracing::warn!("Rejected deletion of group {}: {}", id, msg);
            metrics::rejected("delete_group");
            flash::error(jar, msg)
        }
        Err(e) => return Err(e),
    };
    Ok((jar, Redirect::to("/")))
}

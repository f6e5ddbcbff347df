use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Uri},
    response::Redirect,
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    error::{AppError, AppResult},
    middleware::flash,
    models::alarm::{AddAlarmForm, AlarmsResponse, ApiAlarm},
    services::{alarms::AlarmService, groups::GroupService, metrics},
    AppState,
};

pub fn group_url(group_id: i64) -> String {
    format!("/group/{group_id}")
}

/// Path of the page that submitted the form, falling back to the listing.
/// Only the path is kept so a forged Referer cannot redirect off-site.
fn back(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<Uri>().ok())
        .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_string()))
        .filter(|p| p.starts_with('/') && !p.starts_with("//"))
        .unwrap_or_else(|| "/".to_string())
}

/// GET /api/alarms. Every alarm, for the notification worker.
pub async fn api_alarms(State(state): State<AppState>) -> AppResult<Json<AlarmsResponse>> {
    let alarms = AlarmService::list_all(&state.db)
        .await?
        .into_iter()
        .map(ApiAlarm::from)
        .collect();
    Ok(Json(AlarmsResponse { alarms }))
}

/// POST /add
pub async fn add_alarm(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(form): Form<AddAlarmForm>,
) -> AppResult<(CookieJar, Redirect)> {
    let Some(group_id) = form.selected_group() else {
        tracing::warn!("Rejected alarm without a group");
        metrics::rejected("add");
        return Ok((flash::error(jar, "No group selected!"), Redirect::to(&back(&headers))));
    };
    let group = GroupService::get(&state.db, group_id).await?;

    let new_alarm = match form.into_new_alarm(group.id) {
        Ok(alarm) => alarm,
        Err(AppError::Validation(msg)) => {
            tracing::warn!("Rejected alarm for group {}: {}", group.id, msg);
            metrics::rejected("add");
            return Ok((flash::error(jar, msg), Redirect::to(&back(&headers))));
        }
        Err(e) => return Err(e),
    };

    let alarm = AlarmService::create(&state.db, &new_alarm).await?;
    metrics::ALARMS_CREATED.inc();
    tracing::info!("Created alarm {} in group \"{}\"", alarm.id, group.name);

    Ok((
        flash::success(jar, "Alarm added successfully!"),
        Redirect::to(&group_url(group.id)),
    ))
}

/// GET /delete/{id}
pub async fn delete_alarm(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Redirect)> {
    let alarm = AlarmService::delete(&state.db, id).await?;
    metrics::ALARMS_DELETED.inc();
    tracing::info!("Deleted alarm {}", alarm.id);
    Ok((
        flash::success(jar, "Alarm deleted!"),
        Redirect::to(&group_url(alarm.group_id)),
    ))
}

/// POST /toggle_done/{id}
pub async fn toggle_done(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    let alarm = AlarmService::toggle_done(&state.db, id).await?;
    metrics::ALARMS_TOGGLED.inc();
    Ok(Redirect::to(&group_url(alarm.group_id)))
}

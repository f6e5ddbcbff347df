use axum::{
    extract::{Path, State},
    response::Html,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    error::AppResult,
    middleware::flash,
    models::alarm::AlarmView,
    services::{alarms::AlarmService, groups::GroupService},
    views::{self, IndexPage},
    AppState,
};

/// GET /. All groups, none selected. The default group is guaranteed by startup.
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let groups = GroupService::list(&state.db).await?;
    let (jar, flashes) = flash::take(jar);
    let html = views::render_index(
        &state.templates,
        &IndexPage {
            groups: &groups,
            selected_group: None,
            alarms: &[],
            flashes: &flashes,
        },
    )?;
    Ok((jar, Html(html)))
}

/// GET /group/{id}. One group's alarms, earliest first.
pub async fn view_group(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Html<String>)> {
    let selected = GroupService::get(&state.db, group_id).await?;
    let groups = GroupService::list(&state.db).await?;
    let alarms: Vec<AlarmView> = AlarmService::list_for_group(&state.db, group_id)
        .await?
        .into_iter()
        .map(AlarmView::from)
        .collect();

    let (jar, flashes) = flash::take(jar);
    let html = views::render_index(
        &state.templates,
        &IndexPage {
            groups: &groups,
            selected_group: Some(&selected),
            alarms: &alarms,
            flashes: &flashes,
        },
    )?;
    Ok((jar, Html(html)))
}

/// GET /timer
pub async fn timer(State(state): State<AppState>) -> AppResult<Html<String>> {
    Ok(Html(views::render_timer(&state.templates)?))
}

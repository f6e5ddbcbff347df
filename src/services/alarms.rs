use crate::{
    db::{with_pool, Db},
    error::{AppError, AppResult},
    models::alarm::{Alarm, NewAlarm},
};

const ALARM_COLUMNS: &str =
    "id, title, description, alarm_time, group_id, is_done, notify_before_minutes";

pub struct AlarmService;

impl AlarmService {
    /// Alarms of one group, earliest first.
    pub async fn list_for_group(db: &Db, group_id: i64) -> AppResult<Vec<Alarm>> {
        let sql = format!(
            "SELECT {ALARM_COLUMNS} FROM alarms WHERE group_id = $1 ORDER BY alarm_time, id"
        );
        let alarms = with_pool!(db, pool => {
            sqlx::query_as::<_, Alarm>(&sql)
                .bind(group_id)
                .fetch_all(pool)
                .await?
        });
        Ok(alarms)
    }

    pub async fn list_all(db: &Db) -> AppResult<Vec<Alarm>> {
        let sql = format!("SELECT {ALARM_COLUMNS} FROM alarms ORDER BY id");
        let alarms = with_pool!(db, pool => {
            sqlx::query_as::<_, Alarm>(&sql).fetch_all(pool).await?
        });
        Ok(alarms)
    }

    pub async fn get(db: &Db, id: i64) -> AppResult<Alarm> {
        let sql = format!("SELECT {ALARM_COLUMNS} FROM alarms WHERE id = $1");
        let alarm = with_pool!(db, pool => {
            sqlx::query_as::<_, Alarm>(&sql)
                .bind(id)
                .fetch_optional(pool)
                .await?
        });
        alarm.ok_or(AppError::NotFound("Alarm"))
    }

    pub async fn create(db: &Db, alarm: &NewAlarm) -> AppResult<Alarm> {
        let sql = format!(
            "INSERT INTO alarms (title, description, alarm_time, group_id, is_done, notify_before_minutes)
             VALUES ($1, $2, $3, $4, FALSE, $5)
             RETURNING {ALARM_COLUMNS}"
        );
        let created = with_pool!(db, pool => {
            sqlx::query_as::<_, Alarm>(&sql)
                .bind(&alarm.title)
                .bind(&alarm.description)
                .bind(alarm.alarm_time)
                .bind(alarm.group_id)
                .bind(alarm.notify_before_minutes)
                .fetch_one(pool)
                .await?
        });
        Ok(created)
    }

    /// Delete an alarm and return it, so the caller knows which group it belonged to.
    pub async fn delete(db: &Db, id: i64) -> AppResult<Alarm> {
        let sql = format!("DELETE FROM alarms WHERE id = $1 RETURNING {ALARM_COLUMNS}");
        let alarm = with_pool!(db, pool => {
            sqlx::query_as::<_, Alarm>(&sql)
                .bind(id)
                .fetch_optional(pool)
                .await?
        });
        alarm.ok_or(AppError::NotFound("Alarm"))
    }

    /// Flip the completion flag in a single statement.
    pub async fn toggle_done(db: &Db, id: i64) -> AppResult<Alarm> {
        let sql = format!(
            "UPDATE alarms SET is_done = NOT is_done WHERE id = $1 RETURNING {ALARM_COLUMNS}"
        );
        let alarm = with_pool!(db, pool => {
            sqlx::query_as::<_, Alarm>(&sql)
                .bind(id)
                .fetch_optional(pool)
                .await?
        });
        alarm.ok_or(AppError::NotFound("Alarm"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db, models::alarm::parse_alarm_time, services::groups::GroupService};

    async fn pool() -> Db {
        db::connect_and_prepare("sqlite::memory:").await.unwrap()
    }

    async fn alarm_count(db: &Db) -> i64 {
        with_pool!(db, pool => {
            sqlx::query_scalar("SELECT COUNT(*) FROM alarms")
                .fetch_one(pool)
                .await
                .unwrap()
        })
    }

    fn new_alarm(title: &str, time: &str, group_id: i64, lead: i64) -> NewAlarm {
        NewAlarm {
            title: title.into(),
            description: String::new(),
            alarm_time: parse_alarm_time(time).unwrap(),
            group_id,
            notify_before_minutes: lead,
        }
    }

    #[tokio::test]
    async fn group_alarms_are_ordered_by_time() {
        let pool = pool().await;
        let work = GroupService::create(&pool, "Work").await.unwrap();
        AlarmService::create(&pool, &new_alarm("late", "2024-01-02T09:00", work.id, 0)).await.unwrap();
        AlarmService::create(&pool, &new_alarm("early", "2024-01-01T08:30", work.id, 5)).await.unwrap();

        let alarms = AlarmService::list_for_group(&pool, work.id).await.unwrap();
        let titles: Vec<&str> = alarms.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["early", "late"]);
        assert_eq!(alarms[0].notify_before_minutes, Some(5));
        assert!(!alarms[0].is_done);
    }

    #[tokio::test]
    async fn toggling_twice_restores_the_flag() {
        let pool = pool().await;
        let work = GroupService::create(&pool, "Work").await.unwrap();
        let alarm = AlarmService::create(&pool, &new_alarm("a", "2024-01-01T09:00", work.id, 0))
            .await
            .unwrap();

        assert!(AlarmService::toggle_done(&pool, alarm.id).await.unwrap().is_done);
        assert!(!AlarmService::toggle_done(&pool, alarm.id).await.unwrap().is_done);
    }

    #[tokio::test]
    async fn deleting_a_group_removes_its_alarms() {
        let pool = pool().await;
        let work = GroupService::create(&pool, "Work").await.unwrap();
        let home = GroupService::create(&pool, "Home").await.unwrap();
        let a = AlarmService::create(&pool, &new_alarm("a", "2024-01-01T09:00", work.id, 0)).await.unwrap();
        let b = AlarmService::create(&pool, &new_alarm("b", "2024-01-01T10:00", work.id, 0)).await.unwrap();
        let keep = AlarmService::create(&pool, &new_alarm("c", "2024-01-01T11:00", home.id, 0)).await.unwrap();

        GroupService::delete(&pool, work.id).await.unwrap();

        for id in [a.id, b.id] {
            assert!(matches!(AlarmService::get(&pool, id).await, Err(AppError::NotFound(_))));
        }
        assert_eq!(AlarmService::get(&pool, keep.id).await.unwrap().title, "c");
        assert_eq!(alarm_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn delete_returns_owner_and_missing_is_not_found() {
        let pool = pool().await;
        let work = GroupService::create(&pool, "Work").await.unwrap();
        let alarm = AlarmService::create(&pool, &new_alarm("a", "2024-01-01T09:00", work.id, 0)).await.unwrap();

        assert_eq!(AlarmService::delete(&pool, alarm.id).await.unwrap().group_id, work.id);
        assert!(matches!(AlarmService::delete(&pool, alarm.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(AlarmService::toggle_done(&pool, alarm.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_all_spans_groups() {
        let pool = pool().await;
        let general = GroupService::list(&pool).await.unwrap().remove(0);
        let work = GroupService::create(&pool, "Work").await.unwrap();
        AlarmService::create(&pool, &new_alarm("a", "2024-01-01T09:00", general.id, 0)).await.unwrap();
        AlarmService::create(&pool, &new_alarm("b", "2024-01-01T09:00", work.id, 0)).await.unwrap();

        assert_eq!(AlarmService::list_all(&pool).await.unwrap().len(), 2);
        assert_eq!(alarm_count(&pool).await, 2);
    }
}

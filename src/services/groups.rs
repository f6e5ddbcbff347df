use crate::{
    db::{with_pool, Db},
    error::{AppError, AppResult},
    models::group::{validate_new_group_name, Group, DEFAULT_GROUP_NAME},
};

pub struct GroupService;

impl GroupService {
    pub async fn list(db: &Db) -> AppResult<Vec<Group>> {
        let groups = with_pool!(db, pool => {
            sqlx::query_as::<_, Group>("SELECT id, name FROM groups ORDER BY name")
                .fetch_all(pool)
                .await?
        });
        Ok(groups)
    }

    pub async fn find(db: &Db, id: i64) -> AppResult<Option<Group>> {
        let group = with_pool!(db, pool => {
            sqlx::query_as::<_, Group>("SELECT id, name FROM groups WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?
        });
        Ok(group)
    }

    /// Like [`GroupService::find`], but a missing group is an error.
    pub async fn get(db: &Db, id: i64) -> AppResult<Group> {
        Self::find(db, id).await?.ok_or(AppError::NotFound("Group"))
    }

    pub async fn exists_by_name(db: &Db, name: &str) -> AppResult<bool> {
        let found: Option<i64> = with_pool!(db, pool => {
            sqlx::query_scalar("SELECT id FROM groups WHERE name = $1")
                .bind(name)
                .fetch_optional(pool)
                .await?
        });
        Ok(found.is_some())
    }

    /// Validate and insert a new group. Name rules: trimmed, non-empty, not the
    /// reserved default name, and not an exact duplicate of an existing group.
    /// The duplicate check and the insert are one statement, so a concurrent
    /// create of the same name is reported as a duplicate too.
    pub async fn create(db: &Db, raw_name: &str) -> AppResult<Group> {
        let name = validate_new_group_name(raw_name)?;
        let group = with_pool!(db, pool => {
            sqlx::query_as::<_, Group>(
                "INSERT INTO groups (name) VALUES ($1)
                 ON CONFLICT (name) DO NOTHING
                 RETURNING id, name",
            )
            .bind(&name)
            .fetch_optional(pool)
            .await?
        });
        group.ok_or_else(|| AppError::Validation(format!("Group \"{name}\" already exists!")))
    }

    /// Delete a group together with all of its alarms, in one transaction.
    /// Returns the deleted group.
    pub async fn delete(db: &Db, id: i64) -> AppResult<Group> {
        let group = Self::get(db, id).await?;
        if group.is_default() {
            return Err(AppError::Validation(format!(
                "Cannot delete the {DEFAULT_GROUP_NAME} group!"
            )));
        }

        let alarms = with_pool!(db, pool => {
            let mut tx = pool.begin().await?;
            let alarms = sqlx::query("DELETE FROM alarms WHERE group_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            sqlx::query("DELETE FROM groups WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            alarms
        });

        tracing::info!("Deleted group \"{}\" and {} alarm(s)", group.name, alarms);
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn pool() -> Db {
        db::connect_and_prepare("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn list_is_alphabetical_and_contains_new_group_once() {
        let pool = pool().await;
        GroupService::create(&pool, "Work").await.unwrap();
        GroupService::create(&pool, "Home").await.unwrap();

        let names: Vec<String> = GroupService::list(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["General", "Home", "Work"]);
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected_exactly() {
        let pool = pool().await;
        GroupService::create(&pool, "Work").await.unwrap();

        let err = GroupService::create(&pool, " Work ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Group \"Work\" already exists!"));

        // Exact-name rule: a different case is a different group.
        GroupService::create(&pool, "work").await.unwrap();
    }

    #[tokio::test]
    async fn reserved_name_cannot_be_created() {
        let pool = pool().await;
        for name in ["general", "General", "GENERAL"] {
            assert!(matches!(
                GroupService::create(&pool, name).await,
                Err(AppError::Validation(_))
            ));
        }
        assert_eq!(GroupService::list(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn default_group_cannot_be_deleted() {
        let pool = pool().await;
        let general = GroupService::list(&pool).await.unwrap().remove(0);
        assert!(matches!(
            GroupService::delete(&pool, general.id).await,
            Err(AppError::Validation(_))
        ));
        assert!(GroupService::find(&pool, general.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_group_is_not_found() {
        let pool = pool().await;
        assert!(matches!(
            GroupService::delete(&pool, 999).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(GroupService::get(&pool, 999).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn concurrent_creates_of_one_name_yield_a_single_group() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders.db");
        let db = db::connect_and_prepare(&format!("sqlite://{}?mode=rwc", path.display()))
            .await
            .unwrap();

        for round in 0..25 {
            let name = format!("Team {round}");
            let (a, b) = tokio::join!(
                GroupService::create(&db, &name),
                GroupService::create(&db, &name)
            );
            let created = [&a, &b].iter().filter(|r| r.is_ok()).count();
            assert_eq!(created, 1, "round {round}: {a:?} / {b:?}");
            for result in [a, b] {
                if let Err(e) = result {
                    assert!(
                        matches!(e, AppError::Validation(ref m) if m == &format!("Group \"{name}\" already exists!")),
                        "round {round}: {e}"
                    );
                }
            }
        }

        assert_eq!(GroupService::list(&db).await.unwrap().len(), 26);
    }
}

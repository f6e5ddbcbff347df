use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_gauge, register_gauge_vec, Counter,
    CounterVec, Encoder, Gauge, GaugeVec, TextEncoder,
};

use crate::db::{with_pool, Db};

lazy_static! {
    // ── Event counters ──────────────────────────────────────────────────────
    pub static ref ALARMS_CREATED: Counter = register_counter!(
        "reminders_alarms_created_total",
        "Alarms created"
    ).unwrap();

    pub static ref ALARMS_DELETED: Counter = register_counter!(
        "reminders_alarms_deleted_total",
        "Alarms deleted individually"
    ).unwrap();

    pub static ref ALARMS_TOGGLED: Counter = register_counter!(
        "reminders_alarms_toggled_total",
        "Completion flag flips"
    ).unwrap();

    pub static ref GROUPS_CREATED: Counter = register_counter!(
        "reminders_groups_created_total",
        "Groups created"
    ).unwrap();

    pub static ref GROUPS_DELETED: Counter = register_counter!(
        "reminders_groups_deleted_total",
        "Groups deleted (with their alarms)"
    ).unwrap();

    pub static ref VALIDATION_REJECTIONS: CounterVec = register_counter_vec!(
        "reminders_validation_rejections_total",
        "Form submissions rejected by validation, by route",
        &["route"]
    ).unwrap();

    // ── Stored state, refreshed on scrape ───────────────────────────────────
    pub static ref GROUPS_GAUGE: Gauge = register_gauge!(
        "reminders_groups",
        "Stored groups"
    ).unwrap();

    pub static ref ALARMS_GAUGE: GaugeVec = register_gauge_vec!(
        "reminders_alarms",
        "Stored alarms by completion state",
        &["state"]
    ).unwrap();
}

pub fn rejected(route: &str) {
    VALIDATION_REJECTIONS.with_label_values(&[route]).inc();
}

/// Refresh the storage gauges.
pub async fn collect(db: &Db) -> anyhow::Result<()> {
    let groups: i64 = with_pool!(db, pool => {
        sqlx::query_scalar("SELECT COUNT(*) FROM groups")
            .fetch_one(pool)
            .await?
    });
    GROUPS_GAUGE.set(groups as f64);

    let done: i64 = with_pool!(db, pool => {
        sqlx::query_scalar("SELECT COUNT(*) FROM alarms WHERE is_done")
            .fetch_one(pool)
            .await?
    });
    let total: i64 = with_pool!(db, pool => {
        sqlx::query_scalar("SELECT COUNT(*) FROM alarms")
            .fetch_one(pool)
            .await?
    });
    let pending = total - done;
    ALARMS_GAUGE.with_label_values(&["done"]).set(done as f64);
    ALARMS_GAUGE.with_label_values(&["pending"]).set(pending as f64);
    Ok(())
}

/// Text exposition of every registered metric.
pub fn render() -> anyhow::Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

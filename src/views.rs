use serde::Serialize;
use tera::{Context, Tera};

use crate::{
    middleware::flash::FlashMessage,
    models::{alarm::AlarmView, group::Group},
};

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const TIMER_TEMPLATE: &str = include_str!("../templates/timer.html");

/// Compile the embedded templates once at startup.
pub fn load_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("index.html", INDEX_TEMPLATE),
        ("timer.html", TIMER_TEMPLATE),
    ])?;
    Ok(tera)
}

/// Everything the listing page needs.
#[derive(Debug, Serialize)]
pub struct IndexPage<'a> {
    pub groups: &'a [Group],
    pub selected_group: Option<&'a Group>,
    pub alarms: &'a [AlarmView],
    pub flashes: &'a [FlashMessage],
}

pub fn render_index(tera: &Tera, page: &IndexPage<'_>) -> Result<String, tera::Error> {
    let mut ctx = Context::from_serialize(page)?;
    // Handed to the client-side timer; `</` is escaped so the JSON cannot close the script tag.
    let alarms_json = serde_json::to_string(page.alarms)
        .map_err(|e| tera::Error::msg(e.to_string()))?
        .replace("</", "<\\/");
    ctx.insert("alarms_json", &alarms_json);
    ctx.insert("today", &chrono::Local::now().format("%b %d").to_string());
    tera.render("index.html", &ctx)
}

pub fn render_timer(tera: &Tera) -> Result<String, tera::Error> {
    tera.render("timer.html", &Context::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::flash::FlashLevel;

    #[test]
    fn index_lists_groups_and_escapes_user_text() {
        let tera = load_templates().unwrap();
        let groups = vec![
            Group { id: 1, name: "General".into() },
            Group { id: 2, name: "<b>Work</b>".into() },
        ];
        let alarms = vec![AlarmView {
            id: 9,
            title: "</script><script>alert(1)".into(),
            description: String::new(),
            alarm_time: "2024-01-01 09:00:00".into(),
            group_id: 2,
            is_done: false,
            notify_before_minutes: 10,
        }];
        let flashes = vec![FlashMessage {
            category: FlashLevel::Success,
            message: "Alarm added successfully!".into(),
        }];
        let html = render_index(
            &tera,
            &IndexPage {
                groups: &groups,
                selected_group: Some(&groups[1]),
                alarms: &alarms,
                flashes: &flashes,
            },
        )
        .unwrap();

        assert!(html.contains("General"));
        assert!(html.contains("&lt;b&gt;Work&lt;&#x2F;b&gt;"));
        assert!(html.contains("Alarm added successfully!"));
        assert!(!html.contains("</script><script>alert(1)"));
    }

    #[test]
    fn timer_renders() {
        let tera = load_templates().unwrap();
        assert!(render_timer(&tera).unwrap().contains("<title>Timer</title>"));
    }
}

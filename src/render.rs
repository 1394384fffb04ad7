use crate::api::EventId;
use crate::events::EventRecord;

/// One team row: `{name}` and `{odds}` are substituted.
pub const TEAM_TEMPLATE: &str = "  {name}  @ {odds}";

/// Replace every `{key}` in `template` with its value. Unknown
/// placeholders are left as they are.
pub fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    values.iter().fold(template.to_string(), |out, (key, value)| {
        out.replace(&format!("{{{}}}", key), value)
    })
}

/// Link to the event page on the betting site.
pub fn event_link(site_url: &str, id: &EventId) -> String {
    format!("{}/s/e{}", site_url.trim_end_matches('/'), id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamView {
    pub name: String,
    pub odds: String,
}

/// What the popup shows for a matched event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventView {
    pub title: String,
    pub teams: [TeamView; 2],
    pub link: String,
}

impl EventView {
    pub fn from_record(record: &EventRecord, site_url: &str) -> Self {
        let team = |i: usize| TeamView {
            name: record.teams[i].name.clone(),
            odds: record.teams[i].odds.to_string(),
        };
        Self {
            title: record.name.clone(),
            teams: [team(0), team(1)],
            link: event_link(site_url, &record.id),
        }
    }

    /// Team rows filled into `template`, team A first.
    pub fn team_rows(&self, template: &str) -> [String; 2] {
        self.teams.clone().map(|t| {
            fill_template(template, &[("name", t.name), ("odds", t.odds)])
        })
    }
}

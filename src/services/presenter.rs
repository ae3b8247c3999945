// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page-side presentation: workout list markup, popups, form state and
//! user notices.
//!
//! Rendering reads flat record fields only, so restored and freshly
//! created workouts render the same way.

use crate::models::{WorkoutKind, WorkoutRecord};
use crate::services::map::{Marker, PopupOptions};
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Default delay before a hidden form may be displayed again.
pub const DEFAULT_REDISPLAY_DELAY_MS: u64 = 1000;

/// Upper bound on the configurable redisplay delay.
const MAX_REDISPLAY_DELAY_MS: u64 = 60_000;

/// Notices kept for the page; older ones are dropped.
const MAX_NOTICES: usize = 20;

/// Operations the tracker needs from the page.
pub trait WorkoutView {
    fn render_list_item(&mut self, record: &WorkoutRecord);
    fn show_form(&mut self);
    fn clear_and_hide_form(&mut self);
    fn toggle_kind_fields(&mut self, kind: WorkoutKind);
    fn notify_error(&mut self, message: &str);
    /// Drop all rendered state (used by reset).
    fn reset(&mut self);
}

pub fn kind_icon(kind: WorkoutKind) -> &'static str {
    match kind {
        WorkoutKind::Running => "🏃‍♂️",
        WorkoutKind::Cycling => "🚴‍♀️",
    }
}

/// Build the marker for a workout, popup included.
pub fn marker_for(record: &WorkoutRecord) -> Marker {
    Marker {
        coords: record.coords,
        popup_content: format!(
            "{} {}",
            kind_icon(record.kind),
            escape_html(&record.description)
        ),
        popup_class: format!("{}-popup", record.kind),
        popup: PopupOptions::default(),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One decimal place, ties rounded away from zero (10.25 -> "10.3").
fn one_decimal(value: Option<f64>) -> String {
    value.map_or_else(
        || "-".to_string(),
        |v| format!("{:.1}", (v * 10.0).round() / 10.0),
    )
}

fn plain(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn detail(icon: &str, value: &str, unit: &str) -> String {
    format!(
        r#"<div class="workout__details"><span class="workout__icon">{icon}</span><span class="workout__value">{value}</span><span class="workout__unit">{unit}</span></div>"#
    )
}

/// Render the `<li>` markup for a workout.
pub fn render_list_item_html(record: &WorkoutRecord) -> String {
    let mut html = format!(
        r#"<li class="workout workout--{kind}" data-id="{id}"><h2 class="workout__title">{title}</h2>"#,
        kind = record.kind,
        id = escape_html(record.id.as_str()),
        title = escape_html(&record.description),
    );
    html.push_str(&detail(
        kind_icon(record.kind),
        &record.distance.to_string(),
        "km",
    ));
    html.push_str(&detail("⏱", &record.duration.to_string(), "min"));

    match record.kind {
        WorkoutKind::Running => {
            html.push_str(&detail("⚡️", &one_decimal(record.pace), "min/km"));
            html.push_str(&detail("🦶🏼", &plain(record.cadence), "spm"));
        }
        WorkoutKind::Cycling => {
            html.push_str(&detail("⚡️", &one_decimal(record.speed), "km/h"));
            html.push_str(&detail("⛰", &plain(record.elevation_gain), "m"));
        }
    }
    html.push_str("</li>");
    html
}

/// Which kind-specific input row is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KindField {
    Cadence,
    Elevation,
}

impl From<WorkoutKind> for KindField {
    fn from(kind: WorkoutKind) -> Self {
        match kind {
            WorkoutKind::Running => KindField::Cadence,
            WorkoutKind::Cycling => KindField::Elevation,
        }
    }
}

/// Entry-creation form state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub visible: bool,
    pub kind: WorkoutKind,
    pub shown_field: KindField,
    /// Input to focus when the form opens
    pub focus: Option<&'static str>,
    /// A hidden form may not be displayed again before this instant.
    pub displayable_at: Option<DateTime<Utc>>,
}

impl Default for FormView {
    fn default() -> Self {
        Self {
            visible: false,
            kind: WorkoutKind::Running,
            shown_field: KindField::Cadence,
            focus: None,
            displayable_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub id: String,
    pub kind: WorkoutKind,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub message: String,
    pub at: String,
}

/// Recorded page state.
#[derive(Debug, Clone)]
pub struct PageView {
    form: FormView,
    /// Rendered list, top of the page first
    list: Vec<ListItem>,
    notices: Vec<Notice>,
    redisplay_delay: Duration,
}

impl Default for PageView {
    fn default() -> Self {
        Self::new(DEFAULT_REDISPLAY_DELAY_MS)
    }
}

impl PageView {
    pub fn new(redisplay_delay_ms: u64) -> Self {
        Self {
            form: FormView::default(),
            list: Vec::new(),
            notices: Vec::new(),
            redisplay_delay: Duration::milliseconds(
                redisplay_delay_ms.min(MAX_REDISPLAY_DELAY_MS) as i64,
            ),
        }
    }

    pub fn form(&self) -> &FormView {
        &self.form
    }

    pub fn list(&self) -> &[ListItem] {
        &self.list
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}

impl WorkoutView for PageView {
    fn render_list_item(&mut self, record: &WorkoutRecord) {
        // Items are inserted right after the form, so the newest is on top.
        self.list.insert(
            0,
            ListItem {
                id: record.id.to_string(),
                kind: record.kind,
                html: render_list_item_html(record),
            },
        );
    }

    fn show_form(&mut self) {
        self.form.visible = true;
        self.form.focus = Some("distance");
    }

    fn clear_and_hide_form(&mut self) {
        self.form.visible = false;
        self.form.focus = None;
        self.form.displayable_at = Some(Utc::now() + self.redisplay_delay);
    }

    fn toggle_kind_fields(&mut self, kind: WorkoutKind) {
        self.form.kind = kind;
        self.form.shown_field = KindField::from(kind);
    }

    fn notify_error(&mut self, message: &str) {
        if self.notices.len() == MAX_NOTICES {
            self.notices.remove(0);
        }
        self.notices.push(Notice {
            message: message.to_string(),
            at: format_utc_rfc3339(Utc::now()),
        });
    }

    fn reset(&mut self) {
        self.form = FormView::default();
        self.list.clear();
        self.notices.clear();
    }
}

//! Dashboard shell: one container per target region.

use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use chrono::TimeDelta;

use tiledash_app::ports::ReadingStore;
use tiledash_domain::region::{RegionContent, RegionSnapshot, RegionStatus, Transition};
use tiledash_domain::time::Timestamp;

use crate::state::AppState;

/// How a single region is drawn on the shell page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionView {
    /// DOM id of the container, the region id.
    pub id: String,
    /// Live fragment; `None` renders the spinner.
    pub markup: Option<String>,
    /// Fade-in duration when the fragment is new enough to animate.
    pub fade_ms: Option<u64>,
    /// Consecutive failures when the region is flagged as failing.
    pub failing: Option<u32>,
}

impl RegionView {
    /// Build the view of `snapshot` at `now`. A fade-in is only emitted when
    /// the fragment was applied less than `fade_window` ago, so a page
    /// reload does not replay the animation on unchanged content.
    #[must_use]
    pub fn from_snapshot(snapshot: &RegionSnapshot, now: Timestamp, fade_window: TimeDelta) -> Self {
        let (markup, fade_ms) = match &snapshot.content {
            RegionContent::Loading => (None, None),
            RegionContent::Fragment {
                fragment,
                transition,
                applied_at,
            } => {
                let fade_ms = match transition {
                    Transition::FadeIn(_) if now - *applied_at < fade_window => {
                        Some(u64::try_from(transition.duration().as_millis()).unwrap_or(u64::MAX))
                    }
                    _ => None,
                };
                (Some(fragment.as_str().to_string()), fade_ms)
            }
        };
        let failing = match snapshot.status {
            RegionStatus::Fresh => None,
            RegionStatus::Failing {
                consecutive_failures,
            } => Some(consecutive_failures),
        };
        Self {
            id: snapshot.id.to_string(),
            markup,
            fade_ms,
            failing,
        }
    }
}

/// Shell page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    title: String,
    refresh_seconds: u32,
    regions: Vec<RegionView>,
}

impl IntoResponse for DashboardTemplate {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

/// `GET /` — the dashboard shell.
pub async fn index<RS>(State(state): State<AppState<RS>>) -> DashboardTemplate
where
    RS: ReadingStore + 'static,
{
    let now = tiledash_domain::time::now();
    let fade_window = TimeDelta::seconds(i64::from(state.dashboard.refresh_seconds));
    let regions = state
        .regions
        .snapshots()
        .iter()
        .map(|snapshot| RegionView::from_snapshot(snapshot, now, fade_window))
        .collect();

    DashboardTemplate {
        title: state.dashboard.title.clone(),
        refresh_seconds: state.dashboard.refresh_seconds,
        regions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiledash_domain::fragment::Fragment;
    use tiledash_domain::poll::RequestSeq;
    use tiledash_domain::region::{FadeSpeed, RegionId};

    fn snapshot(content: RegionContent, status: RegionStatus) -> RegionSnapshot {
        RegionSnapshot {
            id: RegionId::new("load_data_tiles").unwrap(),
            content,
            seq: RequestSeq::new(1),
            status,
        }
    }

    fn fragment(transition: Transition, applied_at: Timestamp) -> RegionContent {
        RegionContent::Fragment {
            fragment: Fragment::from("<div>A</div>"),
            transition,
            applied_at,
        }
    }

    #[test]
    fn should_render_spinner_view_while_loading() {
        let view = RegionView::from_snapshot(
            &snapshot(RegionContent::Loading, RegionStatus::Fresh),
            tiledash_domain::time::now(),
            TimeDelta::seconds(2),
        );
        assert_eq!(view.id, "load_data_tiles");
        assert!(view.markup.is_none());
        assert!(view.fade_ms.is_none());
        assert!(view.failing.is_none());
    }

    #[test]
    fn should_fade_in_recent_fragment() {
        let now = tiledash_domain::time::now();
        let view = RegionView::from_snapshot(
            &snapshot(
                fragment(Transition::FadeIn(FadeSpeed::Slow), now - TimeDelta::milliseconds(500)),
                RegionStatus::Fresh,
            ),
            now,
            TimeDelta::seconds(2),
        );
        assert_eq!(view.markup.as_deref(), Some("<div>A</div>"));
        assert_eq!(view.fade_ms, Some(600));
    }

    #[test]
    fn should_not_fade_old_fragment() {
        let now = tiledash_domain::time::now();
        let view = RegionView::from_snapshot(
            &snapshot(
                fragment(Transition::FadeIn(FadeSpeed::Slow), now - TimeDelta::seconds(30)),
                RegionStatus::Fresh,
            ),
            now,
            TimeDelta::seconds(2),
        );
        assert!(view.markup.is_some());
        assert!(view.fade_ms.is_none());
    }

    #[test]
    fn should_not_fade_instant_transition() {
        let now = tiledash_domain::time::now();
        let view = RegionView::from_snapshot(
            &snapshot(fragment(Transition::Instant, now), RegionStatus::Fresh),
            now,
            TimeDelta::seconds(2),
        );
        assert!(view.fade_ms.is_none());
    }

    #[test]
    fn should_expose_failure_count() {
        let view = RegionView::from_snapshot(
            &snapshot(
                RegionContent::Loading,
                RegionStatus::Failing {
                    consecutive_failures: 4,
                },
            ),
            tiledash_domain::time::now(),
            TimeDelta::seconds(2),
        );
        assert_eq!(view.failing, Some(4));
    }

    #[test]
    fn should_render_region_container_with_fragment_verbatim() {
        let page = DashboardTemplate {
            title: "Lab".to_string(),
            refresh_seconds: 2,
            regions: vec![RegionView {
                id: "load_data_tiles".to_string(),
                markup: Some("<div class=\"tile\">21.5</div>".to_string()),
                fade_ms: Some(600),
                failing: None,
            }],
        }
        .to_string();

        assert!(page.contains(r#"<meta http-equiv="refresh" content="2">"#));
        assert!(page.contains(r#"id="load_data_tiles""#));
        assert!(page.contains("animation-duration: 600ms"));
        assert!(page.contains(r#"<div class="tile">21.5</div>"#));
        assert!(!page.contains("role=\"status\""));
        assert!(!page.contains("role=\"alert\""));
    }

    #[test]
    fn should_render_spinner_and_banner() {
        let page = DashboardTemplate {
            title: "Lab".to_string(),
            refresh_seconds: 2,
            regions: vec![RegionView {
                id: "load_data_tiles".to_string(),
                markup: None,
                fade_ms: None,
                failing: Some(3),
            }],
        }
        .to_string();

        assert!(page.contains("role=\"status\""));
        assert!(page.contains("Loading..."));
        assert!(page.contains("3 attempts failed in a row"));
    }
}

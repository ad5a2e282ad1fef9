//! Migration of course detail URLs written by clients that spoke an older API.
//!
//! Old manifests store an organization-scoped path such as
//! `https://host/org/<slug>/courses/<id>`; the current API serves the same course at
//! `https://host/api/v<N>/core/courses/<id>`.

use tracing::{info, warn};

use super::GradingService;
use crate::console::Console;
use crate::models::{Course, CourseInfo};

/// Whether the course detail URL was written for another API version.
pub fn api_url_is_outdated(course: &Course, api_version: u32) -> bool {
    !course.details_url.contains(&format!("v{}", api_version))
}

/// Rewrite an organization-style detail URL to the versioned API path.
///
/// Every `/org` path segment followed by `/courses` is collapsed into
/// `/api/v<N>/core`, so the result holds no such pair and a second call returns it
/// unchanged. URLs without one come back as they are. Only the path is searched,
/// so a host name starting with `org` is left alone.
pub fn updated_details_url(old: &str, api_version: u32) -> String {
    let mut url = old.to_string();
    while let Some(next) = rewrite_first(&url, api_version) {
        url = next;
    }
    url
}

/// Collapse the first `/org ... /courses` span of the path, if there is one.
fn rewrite_first(url: &str, api_version: u32) -> Option<String> {
    let path_start = url
        .find("://")
        .and_then(|scheme_end| {
            let authority = scheme_end + 3;
            url[authority..].find('/').map(|slash| authority + slash)
        })
        .unwrap_or(0);

    let org = url[path_start..].find("/org").map(|i| path_start + i)?;
    let courses = url[org..].find("/courses").map(|i| org + i)?;

    Some(format!(
        "{}/api/v{}/core{}",
        &url[..org],
        api_version,
        &url[courses..]
    ))
}

/// Migrate an outdated course to the current API and refresh its exercises.
///
/// The rewritten URL and the refreshed exercise list are applied together, and only
/// when the refresh succeeds. Returns whether the manifest changed.
pub async fn migrate_course<S, C>(
    service: &S,
    console: &C,
    info: &mut CourseInfo,
    api_version: u32,
) -> bool
where
    S: GradingService,
    C: Console,
{
    if !api_url_is_outdated(&info.course, api_version) {
        return false;
    }

    let details_url = updated_details_url(&info.course.details_url, api_version);
    if details_url == info.course.details_url {
        return false;
    }

    let mut course = info.course.clone();
    course.details_url = details_url;
    info!(
        "Migrating course {} from {} to {}",
        course.name, info.course.details_url, course.details_url
    );

    match service.fetch_course_exercises(&course).await {
        Ok(exercises) => {
            course.merge_exercises(exercises);
            info.course = course;
            true
        }
        Err(e) => {
            warn!("Refreshing exercises of {} failed: {}", course.name, e);
            console.error(&format!(
                "Failed to update urls for exercises of course {}",
                info.course_name()
            ));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn rewrites_organization_url() {
        assert_eq!(
            updated_details_url("https://example.org/org/my-org/courses/123/details", 8),
            "https://example.org/api/v8/core/courses/123/details"
        );
    }

    #[test]
    fn rewrites_every_organization_span() {
        let url = "https://h/org/a/courses/1/org/b/courses/2";
        let once = updated_details_url(url, 8);
        assert_eq!(once, "https://h/api/v8/core/courses/1/api/v8/core/courses/2");
        assert_eq!(updated_details_url(&once, 8), once);
    }

    proptest! {
        /// Rewriting an already rewritten URL changes nothing.
        #[test]
        fn prop_rewrite_is_idempotent(url in arb_details_url(), version in 1u32..20) {
            let once = updated_details_url(&url, version);
            let twice = updated_details_url(&once, version);
            prop_assert_eq!(once, twice);
        }

        /// A rewritten URL keeps the host and holds no `/org ... /courses` span.
        #[test]
        fn prop_rewrite_leaves_no_organization_span(url in arb_details_url()) {
            let rewritten = updated_details_url(&url, 8);
            prop_assert!(rewritten.starts_with("https://"));
            prop_assert_eq!(rewrite_first(&rewritten, 8), None);
        }
    }

    // Paths built from segments that exercise the `/org` and `/courses` matching,
    // including repeated and nested spans and lookalikes such as `organization`.
    fn arb_details_url() -> impl Strategy<Value = String> {
        let host = prop::sample::select(vec!["tmc.example", "org.example", "h"]);
        let segment = prop::sample::select(vec![
            "org", "courses", "organization", "api", "v7", "v8", "core", "hy", "42",
            "details", "exercises", "1.json",
        ]);
        (host, prop::collection::vec(segment, 0..10)).prop_map(|(host, segments)| {
            let mut url = format!("https://{}", host);
            for segment in segments {
                url.push('/');
                url.push_str(segment);
            }
            url
        })
    }

    #[test]
    fn current_url_is_unchanged() {
        let url = "https://example.org/api/v8/core/courses/123";
        assert_eq!(updated_details_url(url, 8), url);
    }

    #[test]
    fn host_starting_with_org_is_not_a_path_segment() {
        let url = "https://org.example/api/v7/courses/5";
        assert_eq!(updated_details_url(url, 8), url);
    }

    #[test]
    fn org_without_courses_is_unchanged() {
        let url = "https://example.org/org/my-org/exercises/1";
        assert_eq!(updated_details_url(url, 8), url);
    }

    #[test]
    fn targets_injected_version() {
        assert_eq!(
            updated_details_url("https://h/org/x/courses/1", 11),
            "https://h/api/v11/core/courses/1"
        );
    }

    #[test]
    fn detects_outdated_version() {
        let mut course = Course {
            id: 1,
            name: "c".to_string(),
            details_url: "https://h/org/x/courses/1".to_string(),
            exercises: vec![],
        };
        assert!(api_url_is_outdated(&course, 8));
        course.details_url = "https://h/api/v8/core/courses/1".to_string();
        assert!(!api_url_is_outdated(&course, 8));
        assert!(api_url_is_outdated(&course, 9));
    }
}

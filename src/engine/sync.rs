use tracing::warn;

use super::GradingService;
use crate::client::ClientError;
use crate::console::Console;
use crate::models::{CourseInfo, Exercise};

/// What a synchronization pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Submitted exercises whose records were replaced with the server's.
    pub updated: Vec<String>,
    /// Submitted exercises the server no longer lists. Their local records are kept.
    pub missing: Vec<String>,
}

/// Reconcile the submitted exercises with the server's exercise list.
///
/// Only exercises in `submitted` are touched: each is replaced by the server's
/// record, and dropped from the locally-completed set once the server confirms it
/// completed. An exercise the server no longer lists is reported and left alone,
/// since a missing entry does not prove the exercise was deleted. When the fetch
/// fails, `info` is not modified at all.
pub async fn update_course_info<S, C>(
    service: &S,
    console: &C,
    info: &mut CourseInfo,
    submitted: &[Exercise],
) -> Result<SyncReport, ClientError>
where
    S: GradingService,
    C: Console,
{
    let server = match service.fetch_course_exercises(&info.course).await {
        Ok(exercises) => exercises,
        Err(e) => {
            warn!("Fetching exercises of {} failed: {}", info.course_name(), e);
            console.error(&format!(
                "Failed to update config file for course {}",
                info.course_name()
            ));
            return Err(e);
        }
    };

    let mut report = SyncReport::default();
    for exercise in submitted {
        let Some(updated) = server.iter().find(|e| e.name == exercise.name) else {
            console.error(&format!(
                "Failed to update config file for exercise {}. \
                 The exercise doesn't exist in server anymore.",
                exercise.name
            ));
            report.missing.push(exercise.name.clone());
            continue;
        };

        if updated.completed {
            info.local_completed_exercises.remove(&updated.name);
        }
        info.replace_old_exercise(updated.clone());
        report.updated.push(updated.name.clone());
    }

    Ok(report)
}

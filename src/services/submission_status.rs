use time::OffsetDateTime;

use crate::store::models::{Submission, Task};
use crate::store::types::SubmissionStatus;

/// Derives a submission's lifecycle status from the task deadlines.
///
/// An existing submission is `delivered` no matter how late it was
/// registered. With no submission, `expired` covers the late window
/// between `due_at` and `expires_at` where uploads are still accepted
/// but flagged as overdue; only past `expires_at` does the task become
/// `inactive`. Comparisons are strict, so a request landing exactly on
/// a boundary still belongs to the earlier bucket.
pub(crate) fn resolve_status(
    now: OffsetDateTime,
    task: &Task,
    submission: Option<&Submission>,
) -> SubmissionStatus {
    if submission.is_some() {
        SubmissionStatus::Delivered
    } else if now > task.expires_at {
        SubmissionStatus::Inactive
    } else if now > task.due_at {
        SubmissionStatus::Expired
    } else {
        SubmissionStatus::Pending
    }
}

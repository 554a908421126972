use crate::repositories;
use crate::services::ServiceError;
use crate::store::models::Enrollment;
use crate::store::ItemStore;

pub(crate) async fn enroll(
    store: &dyn ItemStore,
    user_id: &str,
    subject_id: &str,
) -> Result<Enrollment, ServiceError> {
    if repositories::enrollments::find(store, subject_id, user_id).await?.is_some() {
        return Err(ServiceError::Conflict(
            "user is already enrolled in this subject".to_string(),
        ));
    }

    let enrollment =
        Enrollment { user_id: user_id.to_string(), subject_id: subject_id.to_string() };
    repositories::enrollments::create(store, &enrollment).await?;
    Ok(enrollment)
}

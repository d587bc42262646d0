use crate::activity::Activity;
use crate::graph::StructuralError;
use std::collections::HashSet;

fn invalid(activity: &Activity, reason: String) -> StructuralError {
    StructuralError::InvalidActivity {
        id: activity.id,
        reason,
    }
}

pub fn validate_activity(activity: &Activity) -> Result<(), StructuralError> {
    if activity.duration < 0 {
        return Err(invalid(
            activity,
            format!("negative duration {}", activity.duration),
        ));
    }

    if activity.is_dummy && activity.duration != 0 {
        return Err(invalid(
            activity,
            format!(
                "dummy activity must have zero duration (got {})",
                activity.duration
            ),
        ));
    }

    let mut resource_ids = HashSet::with_capacity(activity.resources.len());
    for resource_id in &activity.resources {
        if !resource_ids.insert(*resource_id) {
            return Err(invalid(
                activity,
                format!("resource {resource_id} is assigned more than once"),
            ));
        }
    }

    Ok(())
}

/// Checks every activity and bounds the summed duration, which is the longest
/// any chain of offsets can grow, to `i64`.
pub fn validate_activity_collection(activities: &[Activity]) -> Result<(), StructuralError> {
    let mut seen_ids = HashSet::with_capacity(activities.len());
    let mut total_duration: i64 = 0;
    for activity in activities {
        if !seen_ids.insert(activity.id) {
            return Err(StructuralError::DuplicateActivity(activity.id));
        }
        validate_activity(activity)?;
        total_duration = total_duration
            .checked_add(activity.duration)
            .ok_or_else(|| {
                invalid(
                    activity,
                    "summed network duration overflows the offset range".to_string(),
                )
            })?;
    }
    Ok(())
}

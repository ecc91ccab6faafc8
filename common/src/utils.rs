use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to milliseconds, the precision BSON datetimes keep,
/// so a freshly built entry compares equal to the one read back from storage.
pub fn get_current_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

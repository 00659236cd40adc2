use crate::domain::model::{DeletePolicy, DeletionPlan, SetId, Timetable};
use crate::utils::error::{ProfileError, Result};

/// 決定刪除電力剖面集時要一併移除哪些時刻表。
///
/// `Restrict` 在仍有引用時回傳 `Conflict`；`Cascade` 會把所有引用的時刻表列入計畫。
pub fn plan_deletion<'a, I>(set_id: SetId, timetables: I, policy: DeletePolicy) -> Result<DeletionPlan>
where
    I: IntoIterator<Item = &'a Timetable>,
{
    let mut dependants: Vec<_> = timetables
        .into_iter()
        .filter(|t| t.electrical_profile_set == Some(set_id))
        .map(|t| t.id)
        .collect();
    dependants.sort_unstable();

    match policy {
        DeletePolicy::Restrict if !dependants.is_empty() => Err(ProfileError::Conflict {
            entity: "ElectricalProfilesSet",
            id: set_id.to_string(),
            blocking: "timetables",
            referenced_by: dependants,
        }),
        _ => Ok(DeletionPlan {
            set_id,
            timetables: dependants,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timetable(id: u64, set: Option<u64>) -> Timetable {
        Timetable {
            id,
            name: format!("timetable {}", id),
            infra: 1,
            electrical_profile_set: set,
        }
    }

    #[test]
    fn test_unreferenced_set_is_deleted_under_any_policy() {
        let timetables = vec![timetable(1, None), timetable(2, Some(9))];

        for policy in [DeletePolicy::Restrict, DeletePolicy::Cascade] {
            let plan = plan_deletion(3, &timetables, policy).unwrap();
            assert_eq!(plan, DeletionPlan { set_id: 3, timetables: vec![] });
        }
    }

    #[test]
    fn test_restrict_reports_blocking_timetables() {
        let timetables = vec![timetable(4, Some(3)), timetable(1, Some(3)), timetable(2, None)];

        match plan_deletion(3, &timetables, DeletePolicy::Restrict) {
            Err(ProfileError::Conflict { referenced_by, .. }) => assert_eq!(referenced_by, vec![1, 4]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_cascade_lists_dependants() {
        let timetables = vec![timetable(4, Some(3)), timetable(1, Some(3)), timetable(2, None)];

        let plan = plan_deletion(3, &timetables, DeletePolicy::Cascade).unwrap();
        assert_eq!(plan.timetables, vec![1, 4]);
    }
}

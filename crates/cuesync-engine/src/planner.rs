//! Change planning: diffing a playlist's current state against a
//! desired ordering.
//!
//! Planning runs in three phases against a [`PositionSimulator`]: delete
//! videos that are not desired, insert desired videos that are missing,
//! then deduplicate and reposition the survivors. The simulator tracks
//! how each emitted action shifts positions, so every insert and update
//! is recorded at the position the remote system will actually assign
//! when the actions replay in order.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use cuesync_connector::{PlaylistEntry, PlaylistId, VideoId};

use crate::action::{ActionError, PlannedAction};
use crate::desired::DesiredSequence;
use crate::simulator::PositionSimulator;

/// The ordered output of planning.
///
/// `actions` is authoritative: its order is the execution order. The
/// categorized lists exist for inspection and reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePlan {
    /// The playlist the plan applies to.
    pub playlist_id: PlaylistId,
    /// Entries the plan deletes, in emission order.
    pub to_delete: Vec<PlaylistEntry>,
    /// Entries the plan moves, positions already set to their targets.
    pub to_update: Vec<PlaylistEntry>,
    /// Videos the plan inserts, with the real positions assigned.
    pub to_insert: Vec<(VideoId, u64)>,
    /// Every planned action, in execution order.
    pub actions: Vec<PlannedAction>,
}

impl ChangePlan {
    /// Whether the plan changes nothing.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of planned deletions.
    pub fn delete_count(&self) -> usize {
        self.to_delete.len()
    }

    /// Number of planned insertions.
    pub fn insert_count(&self) -> usize {
        self.to_insert.len()
    }

    /// Number of planned moves.
    pub fn update_count(&self) -> usize {
        self.to_update.len()
    }
}

/// Groups of current items sharing a video id, in order of first
/// appearance by position.
fn group_by_video(items: Vec<PlaylistEntry>) -> Vec<(VideoId, Vec<PlaylistEntry>)> {
    let mut order: Vec<VideoId> = Vec::new();
    let mut groups: HashMap<VideoId, Vec<PlaylistEntry>> = HashMap::new();
    for item in items {
        let id = item.video_id.clone();
        if !groups.contains_key(&id) {
            order.push(id.clone());
        }
        groups.entry(id).or_default().push(item);
    }
    order
        .into_iter()
        .map(|id| {
            let group = groups.remove(&id).unwrap_or_default();
            (id, group)
        })
        .collect()
}

/// Computes the plan that transforms `current_items` into `desired`.
///
/// The remote collection is not assumed clean: duplicate video ids among
/// the current items are planned away, all but one representative per
/// surviving video. Construction of a structurally invalid action (an
/// entry without a placement id, for instance) is a contract violation
/// and fails the whole plan.
pub fn plan_changes(
    playlist_id: &PlaylistId,
    current_items: Vec<PlaylistEntry>,
    desired: &DesiredSequence,
) -> Result<ChangePlan, ActionError> {
    let mut simulator = PositionSimulator::new(playlist_id.clone(), current_items, desired);
    // The simulator's view is already position-sorted and densely
    // renumbered; grouping from it keeps phase order deterministic.
    let groups = group_by_video(simulator.ordered_view());

    let mut plan = ChangePlan {
        playlist_id: playlist_id.clone(),
        to_delete: Vec::new(),
        to_update: Vec::new(),
        to_insert: Vec::new(),
        actions: Vec::new(),
    };

    // Phase 1: delete every item of every video that is not desired.
    let mut survivors: Vec<(VideoId, Vec<PlaylistEntry>)> = Vec::new();
    for (video_id, group) in groups {
        if desired.contains(&video_id) {
            survivors.push((video_id, group));
            continue;
        }
        tracing::debug!(
            video_id = %video_id,
            count = group.len(),
            "Planning deletion of undesired video"
        );
        for item in group {
            plan.actions.push(PlannedAction::delete(&item)?);
            plan.to_delete.push(item);
            simulator.remove_by_video_id(&video_id);
        }
    }

    // Phase 2: insert desired videos with no current item, at the real
    // position the simulator assigns.
    let current_ids: HashSet<&VideoId> = survivors.iter().map(|(id, _)| id).collect();
    for (index, video_id) in desired.ids().iter().enumerate() {
        if current_ids.contains(&video_id) {
            continue;
        }
        let Some(real_position) = simulator.insert(video_id, index) else {
            // Unreachable for ids taken from the desired sequence itself.
            tracing::warn!(video_id = %video_id, "Insert has no determinable target, skipping");
            continue;
        };
        tracing::debug!(
            video_id = %video_id,
            target_index = index,
            real_position,
            "Planning insertion"
        );
        plan.actions.push(PlannedAction::insert(
            video_id.clone(),
            plan.playlist_id.clone(),
            real_position,
        )?);
        plan.to_insert.push((video_id.clone(), real_position));
    }

    // Phase 3: drop duplicate placements of surviving videos, then move
    // what is left into place, largest displacement first. Cleanup runs
    // over all groups before any displacement is measured, so the
    // at-target checks never see slots still held by doomed duplicates.
    let mut representatives: Vec<(VideoId, PlaylistEntry, usize)> = Vec::new();
    for (video_id, group) in survivors {
        let target = desired
            .index_of(&video_id)
            .unwrap_or_default();
        let representative_idx = group
            .iter()
            .position(|item| simulator.position_of(item) == Some(target as u64))
            .unwrap_or(0);
        let mut duplicates = group;
        let representative = duplicates.remove(representative_idx);
        for duplicate in duplicates {
            tracing::debug!(video_id = %video_id, "Planning duplicate cleanup");
            plan.actions.push(PlannedAction::delete(&duplicate)?);
            if let Some(item_id) = &duplicate.item_id {
                simulator.remove_by_item_id(item_id);
            }
            plan.to_delete.push(duplicate);
        }
        representatives.push((video_id, representative, target));
    }

    let mut repositions: Vec<(VideoId, PlaylistEntry, usize, u64)> = Vec::new();
    for (video_id, representative, target) in representatives {
        let Some(current_position) = simulator.position_of(&representative) else {
            tracing::warn!(
                video_id = %video_id,
                "No resolvable position, excluding from repositioning"
            );
            continue;
        };
        let displacement = current_position.abs_diff(target as u64);
        repositions.push((video_id, representative, target, displacement));
    }
    repositions.sort_by(|a, b| b.3.cmp(&a.3).then(a.2.cmp(&b.2)));

    for (video_id, representative, target, _) in repositions {
        if simulator.is_at_target(&representative) {
            tracing::debug!(video_id = %video_id, "Already at target, no move planned");
            continue;
        }
        let Some(real_position) = simulator.update_position(&video_id, target) else {
            tracing::warn!(video_id = %video_id, "Video vanished from simulator, skipping move");
            continue;
        };
        tracing::debug!(
            video_id = %video_id,
            target_index = target,
            real_position,
            "Planning move"
        );
        plan.actions
            .push(PlannedAction::update(&representative, real_position)?);
        plan.to_update
            .push(representative.with_position(real_position));
    }

    tracing::info!(
        playlist_id = %plan.playlist_id,
        deletes = plan.delete_count(),
        inserts = plan.insert_count(),
        updates = plan.update_count(),
        "Change plan computed"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(video: &str, item: &str, position: u64) -> PlaylistEntry {
        PlaylistEntry::new(video, "pl-1")
            .with_item_id(item)
            .with_position(position)
    }

    fn desired(raw: &[&str]) -> DesiredSequence {
        let ids: Vec<VideoId> = raw.iter().map(|s| VideoId::new(*s)).collect();
        DesiredSequence::new(&ids)
    }

    fn plan(current: Vec<PlaylistEntry>, target: &[&str]) -> ChangePlan {
        plan_changes(&PlaylistId::new("pl-1"), current, &desired(target)).unwrap()
    }

    /// Replays the plan's actions with remote semantics: positions are
    /// raw list indices, inserts shift successors, deletes compact.
    fn replay(current: Vec<PlaylistEntry>, plan: &ChangePlan) -> Vec<String> {
        let mut list: Vec<(String, Option<String>)> = {
            let mut sorted = current;
            sorted.sort_by_key(|e| e.position.unwrap_or(u64::MAX));
            sorted
                .into_iter()
                .map(|e| {
                    (
                        e.video_id.as_str().to_string(),
                        e.item_id.map(|i| i.as_str().to_string()),
                    )
                })
                .collect()
        };
        for action in &plan.actions {
            match action {
                PlannedAction::Delete { item_id, .. } => {
                    list.retain(|(_, item)| item.as_deref() != Some(item_id.as_str()));
                }
                PlannedAction::Insert {
                    video_id,
                    target_position,
                    ..
                } => {
                    let at = (*target_position as usize).min(list.len());
                    list.insert(at, (video_id.as_str().to_string(), None));
                }
                PlannedAction::Update {
                    item_id,
                    video_id,
                    target_position,
                    ..
                } => {
                    list.retain(|(_, item)| item.as_deref() != Some(item_id.as_str()));
                    let at = (*target_position as usize).min(list.len());
                    list.insert(
                        at,
                        (
                            video_id.as_str().to_string(),
                            Some(item_id.as_str().to_string()),
                        ),
                    );
                }
            }
        }
        list.into_iter().map(|(video, _)| video).collect()
    }

    #[test]
    fn test_no_changes_needed() {
        let current = vec![entry("a", "i-a", 0), entry("b", "i-b", 1)];
        let plan = plan(current, &["a", "b"]);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_move_single_item() {
        // Scenario A: one move suffices.
        let current = vec![
            entry("a", "i-a", 0),
            entry("b", "i-b", 1),
            entry("c", "i-c", 2),
        ];
        let result = plan(current.clone(), &["b", "c", "a"]);

        assert_eq!(result.delete_count(), 0);
        assert_eq!(result.insert_count(), 0);
        assert_eq!(result.update_count(), 1);
        assert_eq!(result.to_update[0].video_id.as_str(), "a");
        assert_eq!(result.to_update[0].position, Some(2));
        assert_eq!(replay(current, &result), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_insert_only() {
        // Scenario B.
        let current = vec![entry("a", "i-a", 0), entry("b", "i-b", 1)];
        let result = plan(current.clone(), &["a", "b", "c"]);

        assert_eq!(result.delete_count(), 0);
        assert_eq!(result.update_count(), 0);
        assert_eq!(result.to_insert, vec![(VideoId::new("c"), 2)]);
        assert_eq!(replay(current, &result), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_cleanup_keeps_representative_at_target() {
        // Scenario C: the "a" at position 0 already matches, the other
        // one goes.
        let current = vec![
            entry("a", "i-1", 0),
            entry("a", "i-2", 1),
            entry("b", "i-3", 2),
        ];
        let result = plan(current.clone(), &["a", "b"]);

        assert_eq!(result.delete_count(), 1);
        assert_eq!(result.to_delete[0].item_id.as_ref().unwrap().as_str(), "i-2");
        assert_eq!(result.insert_count(), 0);
        assert_eq!(result.update_count(), 0);
        assert_eq!(replay(current, &result), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_cleanup_does_not_displace_later_survivors() {
        // The doomed "a" duplicate sits between "b" and "c" and their
        // targets; once it is gone everything is in place, so the plan
        // must not move anything.
        let current = vec![
            entry("a", "i-1", 0),
            entry("a", "i-2", 1),
            entry("b", "i-3", 2),
            entry("c", "i-4", 3),
        ];
        let result = plan(current.clone(), &["a", "b", "c"]);

        assert_eq!(result.delete_count(), 1);
        assert_eq!(result.update_count(), 0);
        assert_eq!(replay(current, &result), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_desired_deletes_everything() {
        // Scenario D.
        let current = vec![
            entry("a", "i-a", 0),
            entry("b", "i-b", 1),
            entry("c", "i-c", 2),
        ];
        let result = plan(current.clone(), &[]);

        assert_eq!(result.delete_count(), 3);
        assert_eq!(result.insert_count(), 0);
        assert_eq!(result.update_count(), 0);
        assert!(replay(current, &result).is_empty());
    }

    #[test]
    fn test_deletes_precede_inserts_in_action_order() {
        let current = vec![entry("x", "i-x", 0), entry("a", "i-a", 1)];
        let result = plan(current, &["a", "b"]);

        assert!(matches!(result.actions[0], PlannedAction::Delete { .. }));
        assert!(matches!(result.actions[1], PlannedAction::Insert { .. }));
    }

    #[test]
    fn test_largest_displacement_moves_first() {
        // "a" is 3 slots from home, "b" only 1.
        let current = vec![
            entry("a", "i-a", 0),
            entry("b", "i-b", 1),
            entry("c", "i-c", 2),
            entry("d", "i-d", 3),
        ];
        let result = plan(current.clone(), &["b", "c", "d", "a"]);

        let moved: Vec<&str> = result
            .actions
            .iter()
            .filter_map(|a| match a {
                PlannedAction::Update { video_id, .. } => Some(video_id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(moved.first(), Some(&"a"));
        assert_eq!(
            replay(current, &result),
            vec!["b", "c", "d", "a"]
        );
    }

    #[test]
    fn test_mixed_delete_insert_move() {
        let current = vec![
            entry("x", "i-x", 0),
            entry("a", "i-a", 1),
            entry("b", "i-b", 2),
        ];
        let target = ["b", "a", "c"];
        let result = plan(current.clone(), &target);

        assert_eq!(result.delete_count(), 1);
        assert_eq!(result.insert_count(), 1);
        assert_eq!(replay(current, &result), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_desired_duplicates_planned_once() {
        let current = vec![entry("a", "i-a", 0)];
        let result = plan(current, &["a", "b", "b"]);

        assert_eq!(result.insert_count(), 1);
        assert_eq!(result.to_insert[0].0.as_str(), "b");
    }

    #[test]
    fn test_plan_counts_match_action_list() {
        let current = vec![
            entry("x", "i-x", 0),
            entry("a", "i-1", 1),
            entry("a", "i-2", 2),
            entry("c", "i-c", 3),
        ];
        let result = plan(current, &["c", "a", "b"]);

        let deletes = result
            .actions
            .iter()
            .filter(|a| matches!(a, PlannedAction::Delete { .. }))
            .count();
        assert_eq!(deletes, result.delete_count());
        // One undesired video plus one duplicate survivor.
        assert_eq!(deletes, 2);
    }
}

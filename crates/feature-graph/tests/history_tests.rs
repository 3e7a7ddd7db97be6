use camber_types::EntityId;
use feature_graph::{
    Command, CommandError, Editor, EntityClass, FeatureParams, Status,
};
use sketch_store::Sketch;
use solid_kernel::{MockKernel, SolidKernel};

/// Sketch whose four lines form a closed 2x1 rectangle.
fn rect_sketch() -> Sketch {
    let mut sketch = Sketch::new();
    let p1 = sketch.add_point(0.0, 0.0, true);
    let p2 = sketch.add_point(2.0, 0.0, false);
    let p3 = sketch.add_point(2.0, 1.0, false);
    let p4 = sketch.add_point(0.0, 1.0, false);
    sketch.add_line(p1, p2).unwrap();
    sketch.add_line(p2, p3).unwrap();
    sketch.add_line(p3, p4).unwrap();
    sketch.add_line(p4, p1).unwrap();
    sketch
}

// ── Add-Command Round Trips ─────────────────────────────────────────────────

#[test]
fn add_line_on_empty_sketch_lands_at_index_zero() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch("Sketch 1");

    editor
        .execute(Command::add_point(sketch, 0.0, 0.0, false), &mut kernel)
        .unwrap();
    editor
        .execute(Command::add_point(sketch, 1.0, 0.0, false), &mut kernel)
        .unwrap();
    editor
        .execute(
            Command::add_line(sketch, EntityId(1), EntityId(2)),
            &mut kernel,
        )
        .unwrap();

    let store = editor.graph.sketch(sketch).unwrap();
    assert_eq!(store.lines.len(), 1);
    let line_id = store.lines.get(0).unwrap().id;
    assert_eq!(line_id, EntityId(3));

    editor.undo(&mut kernel).unwrap();
    assert_eq!(editor.graph.sketch(sketch).unwrap().lines.len(), 0);

    editor.redo(&mut kernel).unwrap();
    let store = editor.graph.sketch(sketch).unwrap();
    assert_eq!(store.lines.len(), 1);
    assert_eq!(store.lines.get(0).unwrap().id, line_id);
}

#[test]
fn execute_undo_redo_reproduces_the_exact_collection() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch_with("Sketch 1", rect_sketch());

    editor
        .execute(Command::add_point(sketch, 9.0, 9.0, false), &mut kernel)
        .unwrap();
    let after_execute = editor.graph.sketch(sketch).unwrap().clone();

    editor.undo(&mut kernel).unwrap();
    assert_ne!(editor.graph.sketch(sketch).unwrap(), &after_execute);

    editor.redo(&mut kernel).unwrap();
    assert_eq!(editor.graph.sketch(sketch).unwrap(), &after_execute);
}

#[test]
fn delete_undo_redo_reproduces_content_order_and_ids() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch_with("Sketch 1", rect_sketch());
    let before_delete = editor.graph.sketch(sketch).unwrap().clone();

    editor
        .execute(
            Command::delete_entity(sketch, EntityClass::Point, 1),
            &mut kernel,
        )
        .unwrap();
    let after_delete = editor.graph.sketch(sketch).unwrap().clone();
    assert_eq!(after_delete.points.len(), 3);

    editor.undo(&mut kernel).unwrap();
    assert_eq!(editor.graph.sketch(sketch).unwrap(), &before_delete);

    editor.redo(&mut kernel).unwrap();
    assert_eq!(editor.graph.sketch(sketch).unwrap(), &after_delete);
}

#[test]
fn interleaved_adds_and_deletes_rewind_and_replay_exactly() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch("Sketch 1");

    editor
        .execute(Command::add_point(sketch, 0.0, 0.0, false), &mut kernel)
        .unwrap();
    editor
        .execute(Command::add_point(sketch, 1.0, 0.0, false), &mut kernel)
        .unwrap();
    editor
        .execute(Command::add_point(sketch, 2.0, 0.0, false), &mut kernel)
        .unwrap();
    editor
        .execute(
            Command::delete_entity(sketch, EntityClass::Point, 0),
            &mut kernel,
        )
        .unwrap();
    let final_state = editor.graph.sketch(sketch).unwrap().clone();
    assert_eq!(final_state.points.len(), 2);
    assert_eq!(final_state.points.get(0).unwrap().id, EntityId(2));

    // Rewind to the start. The id counter never rewinds, so compare
    // contents rather than the whole store.
    for _ in 0..4 {
        editor.undo(&mut kernel).unwrap();
    }
    assert!(editor.graph.sketch(sketch).unwrap().points.is_empty());

    for _ in 0..4 {
        editor.redo(&mut kernel).unwrap();
    }
    assert_eq!(editor.graph.sketch(sketch).unwrap(), &final_state);
}

// ── History Invariants ──────────────────────────────────────────────────────

#[test]
fn full_rewind_restores_the_pre_existing_graph() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();

    let sketch = editor.add_sketch(&mut kernel).unwrap();
    editor
        .execute(Command::add_point(sketch, 0.0, 0.0, false), &mut kernel)
        .unwrap();
    editor.add_extrude(sketch, 5.0, &mut kernel).unwrap();

    for _ in 0..3 {
        editor.undo(&mut kernel).unwrap();
    }
    assert!(editor.graph.features.is_empty());
    assert_eq!(editor.undo(&mut kernel), Err(CommandError::NothingToUndo));
}

#[test]
fn executing_a_new_command_invalidates_redo() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch("Sketch 1");

    editor
        .execute(Command::add_point(sketch, 0.0, 0.0, false), &mut kernel)
        .unwrap();
    editor.undo(&mut kernel).unwrap();
    assert!(editor.can_redo());

    editor
        .execute(Command::add_point(sketch, 5.0, 5.0, false), &mut kernel)
        .unwrap();
    assert!(!editor.can_redo());
    assert_eq!(editor.redo(&mut kernel), Err(CommandError::NothingToRedo));
}

#[test]
fn history_depth_bounds_the_undo_ring() {
    let mut editor = Editor::with_history_depth(2);
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch("Sketch 1");

    for x in 0..3 {
        editor
            .execute(Command::add_point(sketch, x as f64, 0.0, false), &mut kernel)
            .unwrap();
    }
    assert_eq!(editor.history.undo_len(), 2);

    editor.undo(&mut kernel).unwrap();
    editor.undo(&mut kernel).unwrap();
    assert_eq!(editor.undo(&mut kernel), Err(CommandError::NothingToUndo));

    // The first command's effect is no longer reachable via undo.
    let store = editor.graph.sketch(sketch).unwrap();
    assert_eq!(store.points.len(), 1);
    assert_eq!(store.points.get(0).unwrap().id, EntityId(1));
}

#[test]
fn failed_execute_leaves_history_untouched() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch("Sketch 1");

    let err = editor
        .execute(
            Command::add_line(sketch, EntityId(7), EntityId(8)),
            &mut kernel,
        )
        .unwrap_err();
    assert!(matches!(err, CommandError::Store(_)));
    assert!(!editor.can_undo());
    assert_eq!(editor.graph.sketch(sketch).unwrap().lines.len(), 0);
}

#[test]
fn failed_undo_drops_the_command_permanently() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch("Sketch 1");

    editor
        .execute(Command::add_point(sketch, 0.0, 0.0, false), &mut kernel)
        .unwrap();
    // Pull the rug out from under the command's inverse.
    editor
        .graph
        .sketch_mut(sketch)
        .unwrap()
        .points
        .remove_by_id(EntityId(1))
        .unwrap();

    let err = editor.undo(&mut kernel).unwrap_err();
    assert!(matches!(err, CommandError::TargetNotFound { .. }));
    assert!(!editor.can_undo());
    assert!(!editor.can_redo());
}

#[test]
fn peek_names_track_the_stack_tops() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch("Sketch 1");

    editor
        .execute(Command::add_point(sketch, 0.0, 0.0, false), &mut kernel)
        .unwrap();
    assert_eq!(editor.history.peek_undo_name(), Some("Add Point"));
    assert_eq!(editor.history.peek_redo_name(), None);

    editor.undo(&mut kernel).unwrap();
    assert_eq!(editor.history.peek_undo_name(), None);
    assert_eq!(editor.history.peek_redo_name(), Some("Add Point"));
}

// ── Stable Identity Across Redo ─────────────────────────────────────────────

#[test]
fn feature_ids_stay_unique_across_undo_redo() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();

    let first = editor.add_sketch(&mut kernel).unwrap();
    editor.undo(&mut kernel).unwrap();
    editor.redo(&mut kernel).unwrap();
    assert_eq!(editor.graph.features[0].id, first);

    let second = editor.add_sketch(&mut kernel).unwrap();
    assert!(second > first);
}

#[test]
fn entity_ids_stay_unique_after_redo_restores_one() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch("Sketch 1");

    editor
        .execute(Command::add_point(sketch, 0.0, 0.0, false), &mut kernel)
        .unwrap();
    editor.undo(&mut kernel).unwrap();
    editor.redo(&mut kernel).unwrap();

    editor
        .execute(Command::add_point(sketch, 1.0, 0.0, false), &mut kernel)
        .unwrap();
    let store = editor.graph.sketch(sketch).unwrap();
    assert_eq!(store.points.get(0).unwrap().id, EntityId(1));
    assert_eq!(store.points.get(1).unwrap().id, EntityId(2));
}

// ── Selection Fix-Ups Through Commands ──────────────────────────────────────

#[test]
fn delete_and_undo_keep_the_selection_on_the_same_point() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch_with("Sketch 1", rect_sketch());

    let store = editor.graph.sketch_mut(sketch).unwrap();
    store.points.select(Some(2));
    let selected_id = store.points.get(2).unwrap().id;

    editor
        .execute(
            Command::delete_entity(sketch, EntityClass::Point, 1),
            &mut kernel,
        )
        .unwrap();
    let store = editor.graph.sketch(sketch).unwrap();
    assert_eq!(store.points.selected(), Some(1));
    assert_eq!(store.points.get(1).unwrap().id, selected_id);

    editor.undo(&mut kernel).unwrap();
    let store = editor.graph.sketch(sketch).unwrap();
    assert_eq!(store.points.selected(), Some(2));
    assert_eq!(store.points.get(2).unwrap().id, selected_id);
}

#[test]
fn deleting_the_selected_point_clears_the_selection() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch_with("Sketch 1", rect_sketch());
    editor
        .graph
        .sketch_mut(sketch)
        .unwrap()
        .points
        .select(Some(1));

    editor
        .execute(
            Command::delete_entity(sketch, EntityClass::Point, 1),
            &mut kernel,
        )
        .unwrap();
    assert_eq!(editor.graph.sketch(sketch).unwrap().points.selected(), None);
}

// ── Modify Commands ─────────────────────────────────────────────────────────

#[test]
fn change_extrude_depth_marks_stale_without_regenerating() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch_with("Sketch 1", rect_sketch());
    let extrude = editor.graph.add_extrude(sketch, 5.0, "Extrude 1").unwrap();
    assert!(editor.regenerate_all(&mut kernel));
    let artifact = editor.graph.get(extrude).unwrap().artifact.unwrap();

    editor
        .change_extrude_depth(extrude, 10.0, &mut kernel)
        .unwrap();

    let feature = editor.graph.get(extrude).unwrap();
    assert_eq!(feature.status, Status::NeedsUpdate);
    // No regeneration happened: the old artifact is still installed.
    assert_eq!(feature.artifact, Some(artifact));
    assert!(kernel.is_alive(artifact));
    assert!(matches!(
        feature.params,
        FeatureParams::Extrude { depth, .. } if depth == 10.0
    ));
}

#[test]
fn modify_undo_restores_params_and_forces_recompute() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch_with("Sketch 1", rect_sketch());
    let extrude = editor.graph.add_extrude(sketch, 5.0, "Extrude 1").unwrap();
    assert!(editor.regenerate_all(&mut kernel));

    editor
        .change_extrude_depth(extrude, 10.0, &mut kernel)
        .unwrap();
    assert!(editor.regenerate_all(&mut kernel));
    let rebuilt = editor.graph.get(extrude).unwrap().artifact.unwrap();
    assert_eq!(kernel.volume(rebuilt), Some(20.0));

    editor.undo(&mut kernel).unwrap();
    let feature = editor.graph.get(extrude).unwrap();
    assert!(matches!(
        feature.params,
        FeatureParams::Extrude { depth, .. } if depth == 5.0
    ));
    // Rollback restores params only, never cached geometry; recomputation
    // is forced through staleness.
    assert_eq!(feature.status, Status::NeedsUpdate);
    assert_eq!(feature.artifact, Some(rebuilt));

    assert!(editor.regenerate_all(&mut kernel));
    let back = editor.graph.get(extrude).unwrap().artifact.unwrap();
    assert_eq!(kernel.volume(back), Some(10.0));
}

#[test]
fn modify_rejects_params_of_a_different_kind() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch_with("Sketch 1", rect_sketch());
    let extrude = editor.graph.add_extrude(sketch, 5.0, "Extrude 1").unwrap();

    let err = editor
        .execute(
            Command::modify_feature(
                extrude,
                FeatureParams::Revolve {
                    sketch,
                    axis_origin: [0.0, 0.0],
                    axis_direction: [0.0, 1.0],
                    angle_degrees: 90.0,
                },
            ),
            &mut kernel,
        )
        .unwrap_err();
    assert_eq!(err, CommandError::KindMismatch { id: extrude });
    assert!(!editor.can_undo());
}

// ── Snapshot Ownership ──────────────────────────────────────────────────────

#[test]
fn deleted_feature_artifact_survives_for_undo() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch_with("Sketch 1", rect_sketch());
    let extrude = editor.graph.add_extrude(sketch, 5.0, "Extrude 1").unwrap();
    assert!(editor.regenerate_all(&mut kernel));
    let artifact = editor.graph.get(extrude).unwrap().artifact.unwrap();
    let index = editor.graph.feature_index(extrude).unwrap();

    editor
        .execute(Command::delete_feature(index), &mut kernel)
        .unwrap();
    assert!(editor.graph.get(extrude).is_none());
    // Deleted-but-undoable data is kept alive, not freed at delete time.
    assert!(kernel.is_alive(artifact));

    editor.undo(&mut kernel).unwrap();
    let restored = editor.graph.get(extrude).unwrap();
    assert_eq!(restored.artifact, Some(artifact));
    assert!(kernel.is_alive(artifact));
}

#[test]
fn discarded_redo_snapshot_frees_its_artifact() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch_with("Sketch 1", rect_sketch());
    let extrude = editor.add_extrude(sketch, 5.0, &mut kernel).unwrap();
    assert!(editor.regenerate_all(&mut kernel));
    let artifact = editor.graph.get(extrude).unwrap().artifact.unwrap();

    // Undoing the add moves the regenerated feature into the redo stack;
    // its artifact must stay alive while redo can still restore it.
    editor.undo(&mut kernel).unwrap();
    assert!(editor.graph.get(extrude).is_none());
    assert!(kernel.is_alive(artifact));

    // A new command discards the redo stack and its snapshots.
    editor
        .execute(Command::add_point(sketch, 0.0, 0.0, false), &mut kernel)
        .unwrap();
    assert!(!editor.can_redo());
    assert!(!kernel.is_alive(artifact));
}

#[test]
fn evicted_delete_command_frees_its_snapshot_artifact() {
    let mut editor = Editor::with_history_depth(1);
    let mut kernel = MockKernel::new();
    let sketch = editor.graph.add_sketch_with("Sketch 1", rect_sketch());
    let extrude = editor.graph.add_extrude(sketch, 5.0, "Extrude 1").unwrap();
    assert!(editor.regenerate_all(&mut kernel));
    let artifact = editor.graph.get(extrude).unwrap().artifact.unwrap();
    let index = editor.graph.feature_index(extrude).unwrap();

    editor
        .execute(Command::delete_feature(index), &mut kernel)
        .unwrap();
    assert!(kernel.is_alive(artifact));

    // Depth 1: the next execute evicts the delete command from the ring.
    editor
        .execute(Command::add_point(sketch, 0.0, 0.0, false), &mut kernel)
        .unwrap();
    assert!(!kernel.is_alive(artifact));
}

// ── Feature Commands ────────────────────────────────────────────────────────

#[test]
fn default_names_come_from_kind_counts() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();

    let s1 = editor.add_sketch(&mut kernel).unwrap();
    let s2 = editor.add_sketch(&mut kernel).unwrap();
    let e1 = editor.add_extrude(s1, 5.0, &mut kernel).unwrap();

    assert_eq!(editor.graph.get(s1).unwrap().name, "Sketch 1");
    assert_eq!(editor.graph.get(s2).unwrap().name, "Sketch 2");
    assert_eq!(editor.graph.get(e1).unwrap().name, "Extrude 1");
}

#[test]
fn add_feature_command_validates_before_mutating() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let sketch = editor.add_sketch(&mut kernel).unwrap();
    let extrude = editor.add_extrude(sketch, 5.0, &mut kernel).unwrap();

    // Cut against a base with no artifact fails with no partial mutation.
    let err = editor.add_cut(sketch, extrude, 1.0, &mut kernel).unwrap_err();
    assert!(matches!(err, CommandError::Graph(_)));
    assert_eq!(editor.graph.features.len(), 2);
    assert_eq!(editor.history.undo_len(), 2);
}

#[test]
fn undone_feature_comes_back_at_its_recorded_position() {
    let mut editor = Editor::new();
    let mut kernel = MockKernel::new();
    let s1 = editor.add_sketch(&mut kernel).unwrap();
    let e1 = editor.add_extrude(s1, 5.0, &mut kernel).unwrap();
    let s2 = editor.add_sketch(&mut kernel).unwrap();

    // Undo the trailing sketch and the extrude, then redo both.
    editor.undo(&mut kernel).unwrap();
    editor.undo(&mut kernel).unwrap();
    editor.redo(&mut kernel).unwrap();
    editor.redo(&mut kernel).unwrap();

    let order: Vec<_> = editor.graph.features.iter().map(|f| f.id).collect();
    assert_eq!(order, vec![s1, e1, s2]);
}

use approx::assert_relative_eq;
use gridbin_kernel::{
    ExtrudeExtent, Kernel, KernelId, KernelIntrospect, KernelSolidHandle, MockKernel,
    PatternDirection, SketchPlane, SketchShape,
};
use gridbin_types::{Orientation, TopoKind};
use modeling_ops::*;

const UP: [f64; 3] = [0.0, 0.0, 1.0];

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> SketchShape {
    SketchShape::Rectangle {
        first_corner: (x0, y0),
        second_corner: (x1, y1),
    }
}

/// Helper: extrude a rectangle from the ground plane.
fn make_box(kernel: &mut MockKernel, x0: f64, y0: f64, x1: f64, y1: f64, h: f64) -> KernelSolidHandle {
    let sketch = create_profile(kernel, &SketchPlane::horizontal(0.0), &[rect(x0, y0, x1, y1)]).unwrap();
    let result = execute_extrude(kernel, &sketch.regions, UP, ExtrudeExtent::Blind { depth: h }).unwrap();
    result.main().unwrap()
}

// ── Topology Diff Tests ────────────────────────────────────────────────────

#[test]
fn extrude_reports_every_entity_as_created() {
    let mut kernel = MockKernel::new();
    let sketch = create_profile(&mut kernel, &SketchPlane::horizontal(0.0), &[rect(0.0, 0.0, 2.0, 3.0)]).unwrap();
    let result = execute_extrude(&mut kernel, &sketch.regions, UP, ExtrudeExtent::Blind { depth: 5.0 }).unwrap();

    assert_eq!(result.outputs.len(), 1);
    assert_eq!(result.created(TopoKind::Face).len(), 6, "Box extrude creates 6 faces");
    assert_eq!(result.created(TopoKind::Edge).len(), 12, "Box extrude creates 12 edges");
    assert!(result.provenance.deleted.is_empty(), "Nothing existed before");
}

#[test]
fn identical_snapshots_have_no_changes() {
    let mut kernel = MockKernel::new();
    let b = make_box(&mut kernel, 0.0, 0.0, 1.0, 1.0, 1.0);
    let snap = snapshot(&kernel, &[b]);
    let result = diff::diff(&snap, &snap);
    assert!(result.created.is_empty());
    assert!(result.deleted.is_empty());
}

#[test]
fn extrude_unknown_region_returns_kernel_error() {
    let mut kernel = MockKernel::new();
    let result = execute_extrude(&mut kernel, &[KernelId(999)], UP, ExtrudeExtent::Blind { depth: 5.0 });
    assert!(matches!(result, Err(OpError::Kernel(_))));
}

#[test]
fn extrude_without_regions_is_rejected() {
    let mut kernel = MockKernel::new();
    let result = execute_extrude(&mut kernel, &[], UP, ExtrudeExtent::Blind { depth: 5.0 });
    assert!(matches!(result, Err(OpError::NoProfiles)));
}

#[test]
fn empty_profile_is_rejected() {
    let mut kernel = MockKernel::new();
    let result = create_profile(&mut kernel, &SketchPlane::horizontal(0.0), &[]);
    assert!(matches!(result, Err(OpError::NoProfiles)));
}

// ── Wall Extrude Tests ─────────────────────────────────────────────────────

#[test]
fn plain_wall_extrude_returns_top_face() {
    let mut kernel = MockKernel::new();
    let sketch = create_profile(&mut kernel, &SketchPlane::horizontal(0.0), &[rect(0.0, 0.0, 4.0, 4.0)]).unwrap();
    let wall = wall_extrude(
        &mut kernel,
        &sketch.regions,
        sketch.regions[0],
        &WallExtrude {
            depth: 3.0,
            ..Default::default()
        },
    )
    .unwrap();

    let top = face_point(&kernel, wall.top_face).unwrap();
    assert_relative_eq!(top[2], 3.0, epsilon = 1e-9);
    assert_eq!(kernel.list_faces(&wall.solid).len(), 6);
}

#[test]
fn wall_extrude_rounds_and_drafts() {
    let mut kernel = MockKernel::new();
    let sketch = create_profile(&mut kernel, &SketchPlane::horizontal(0.0), &[rect(0.0, 0.0, 10.0, 10.0)]).unwrap();
    let wall = wall_extrude(
        &mut kernel,
        &sketch.regions,
        sketch.regions[0],
        &WallExtrude {
            depth: 1.0,
            fillet_radius: Some(1.0),
            draft_angle: Some(45.0),
        },
    )
    .unwrap();

    let bbox = kernel.solid_bounding_box(&wall.solid).unwrap();
    assert_relative_eq!(bbox.size()[0], 12.0, epsilon = 1e-6);
    assert_relative_eq!(bbox.size()[1], 12.0, epsilon = 1e-6);

    // Side faces lean outward, so none faces exactly left any more.
    assert!(matches!(
        find_solid_face(&kernel, &wall.solid, Orientation::Left),
        Err(OpError::FaceNotFound { .. })
    ));

    let top_loop = loop_edges(&kernel, wall.top_face);
    let arcs = top_loop
        .iter()
        .filter(|&&e| matches!(kernel.edge_curve(e), Some(gridbin_kernel::EdgeCurve::Arc { .. })))
        .count();
    assert_eq!(arcs, 4, "every corner rounded");
}

#[test]
fn wall_extrude_rejects_non_positive_depth() {
    let mut kernel = MockKernel::new();
    let sketch = create_profile(&mut kernel, &SketchPlane::horizontal(0.0), &[rect(0.0, 0.0, 1.0, 1.0)]).unwrap();
    let result = wall_extrude(&mut kernel, &sketch.regions, sketch.regions[0], &WallExtrude::default());
    assert!(matches!(result, Err(OpError::InvalidParameter { .. })));
}

// ── Boolean Tests ──────────────────────────────────────────────────────────

#[test]
fn merge_skips_missing_parts_and_keeps_first() {
    let mut kernel = MockKernel::new();
    let a = make_box(&mut kernel, 0.0, 0.0, 1.0, 1.0, 1.0);
    let b = make_box(&mut kernel, 5.0, 0.0, 6.0, 1.0, 1.0);

    let result = merge_parts(&mut kernel, &[None, Some(a), None, Some(b)]).unwrap();

    assert_eq!(result.main(), Some(a));
    assert_eq!(kernel.list_solids(), vec![a]);
}

#[test]
fn merge_of_nothing_is_an_error() {
    let mut kernel = MockKernel::new();
    assert!(matches!(merge_parts(&mut kernel, &[None, None]), Err(OpError::NoBodies)));
}

#[test]
fn merge_of_single_part_is_a_no_op() {
    let mut kernel = MockKernel::new();
    let a = make_box(&mut kernel, 0.0, 0.0, 1.0, 1.0, 1.0);
    let result = merge_parts(&mut kernel, &[Some(a)]).unwrap();
    assert_eq!(result.main(), Some(a));
    assert!(result.provenance.created.is_empty());
    assert!(result.provenance.deleted.is_empty());
}

#[test]
fn stacked_merge_deletes_contact_faces() {
    let mut kernel = MockKernel::new();
    let lower = make_box(&mut kernel, 0.0, 0.0, 2.0, 2.0, 1.0);
    let top = find_solid_face(&kernel, &lower, Orientation::Top).unwrap();
    let upper = execute_extrude(&mut kernel, &[top], UP, ExtrudeExtent::Blind { depth: 1.0 })
        .unwrap()
        .main()
        .unwrap();

    let result = merge_parts(&mut kernel, &[Some(lower), Some(upper)]).unwrap();

    let deleted_faces = result
        .provenance
        .deleted
        .iter()
        .filter(|r| r.kind == TopoKind::Face)
        .count();
    assert_eq!(deleted_faces, 2, "the two touching caps disappear");
    assert!(find_solid_face(&kernel, &lower, Orientation::Top).is_ok());
}

#[test]
fn subtract_returns_target_and_consumes_tools() {
    let mut kernel = MockKernel::new();
    let block = make_box(&mut kernel, 0.0, 0.0, 10.0, 10.0, 5.0);
    let pocket = make_box(&mut kernel, 2.0, 2.0, 4.0, 4.0, 2.0);
    let volume = kernel.solid_volume(&block).unwrap();

    let result = subtract_parts(&mut kernel, &[Some(block), None, Some(pocket)]).unwrap();

    assert_eq!(result.main(), Some(block));
    assert_eq!(kernel.list_solids(), vec![block]);
    assert_relative_eq!(kernel.solid_volume(&block).unwrap(), volume - 8.0, epsilon = 1e-9);
    let bottom = find_solid_face(&kernel, &block, Orientation::Bottom);
    assert!(
        matches!(bottom, Err(OpError::AmbiguousFace { count: 2, .. })),
        "pocket ceiling also faces down: {:?}",
        bottom
    );
}

// ── Query Tests ────────────────────────────────────────────────────────────

#[test]
fn find_face_reports_ambiguity() {
    let mut kernel = MockKernel::new();
    let a = make_box(&mut kernel, 0.0, 0.0, 1.0, 1.0, 1.0);
    let b = make_box(&mut kernel, 3.0, 0.0, 4.0, 1.0, 1.0);
    merge_parts(&mut kernel, &[Some(a), Some(b)]).unwrap();

    let err = find_solid_face(&kernel, &a, Orientation::Top).unwrap_err();
    assert!(matches!(
        err,
        OpError::AmbiguousFace {
            orientation: Orientation::Top,
            count: 2
        }
    ));
}

#[test]
fn extreme_edges_follow_axis_directions() {
    let mut kernel = MockKernel::new();
    let b = make_box(&mut kernel, 0.0, 0.0, 4.0, 6.0, 2.0);
    let top = find_solid_face(&kernel, &b, Orientation::Top).unwrap();
    let edges = loop_edges(&kernel, top);

    let front = edge_geometry(&kernel, find_extreme_edge(&kernel, &edges, Orientation::Front).unwrap()).unwrap();
    assert_relative_eq!(front.midpoint()[1], 0.0, epsilon = 1e-9);
    let back = edge_geometry(&kernel, find_extreme_edge(&kernel, &edges, Orientation::Back).unwrap()).unwrap();
    assert_relative_eq!(back.midpoint()[1], 6.0, epsilon = 1e-9);
    let right = edge_geometry(&kernel, find_extreme_edge(&kernel, &edges, Orientation::Right).unwrap()).unwrap();
    assert_relative_eq!(right.midpoint()[0], 4.0, epsilon = 1e-9);
}

#[test]
fn extreme_edge_of_nothing_is_an_error() {
    let kernel = MockKernel::new();
    assert!(matches!(
        find_extreme_edge(&kernel, &[], Orientation::Back),
        Err(OpError::EdgeNotFound {
            orientation: Orientation::Back
        })
    ));
}

#[test]
fn face_center_ignores_a_single_rounded_corner() {
    let mut kernel = MockKernel::new();
    let b = make_box(&mut kernel, 0.0, 0.0, 4.0, 6.0, 2.0);
    let edges = kernel.list_edges(&b);
    let corner = parallel_edges(&kernel, &edges, UP)[0];
    execute_fillet(&mut kernel, &b, &[corner], 1.5, false).unwrap();

    let top = find_solid_face(&kernel, &b, Orientation::Top).unwrap();
    let center = face_center(&kernel, top).unwrap();
    assert_relative_eq!(center[0], 2.0, epsilon = 1e-9);
    assert_relative_eq!(center[1], 3.0, epsilon = 1e-9);
    assert_relative_eq!(center[2], 2.0, epsilon = 1e-9);
}

#[test]
fn parallel_shared_and_adjacent_queries() {
    let mut kernel = MockKernel::new();
    let b = make_box(&mut kernel, 0.0, 0.0, 1.0, 1.0, 1.0);
    let edges = kernel.list_edges(&b);
    assert_eq!(parallel_edges(&kernel, &edges, UP).len(), 4);
    assert_eq!(parallel_edges(&kernel, &edges, [1.0, 0.0, 0.0]).len(), 4);

    let top = find_solid_face(&kernel, &b, Orientation::Top).unwrap();
    let front = find_solid_face(&kernel, &b, Orientation::Front).unwrap();
    assert_eq!(shared_edges(&kernel, top, front).len(), 1);
    assert_eq!(adjacent_faces(&kernel, top).len(), 4);
}

// ── Fillet / Chamfer / Draft Tests ─────────────────────────────────────────

#[test]
fn fillet_rejects_bad_radius() {
    let mut kernel = MockKernel::new();
    let b = make_box(&mut kernel, 0.0, 0.0, 1.0, 1.0, 1.0);
    let edges = kernel.list_edges(&b);
    let result = execute_fillet(&mut kernel, &b, &edges[..1], 0.0, false);
    assert!(matches!(result, Err(OpError::InvalidParameter { .. })));
    let result = execute_fillet(&mut kernel, &b, &[], 0.5, false);
    assert!(matches!(result, Err(OpError::InvalidParameter { .. })));
}

#[test]
fn chamfer_creates_one_face_per_edge() {
    let mut kernel = MockKernel::new();
    let b = make_box(&mut kernel, 0.0, 0.0, 10.0, 10.0, 10.0);
    let top = find_solid_face(&kernel, &b, Orientation::Top).unwrap();
    let front_edge = find_extreme_edge(&kernel, &loop_edges(&kernel, top), Orientation::Front).unwrap();

    let result = execute_chamfer(&mut kernel, &b, &[front_edge], 2.0).unwrap();

    assert_eq!(result.created(TopoKind::Face).len(), 1);
    assert!(result
        .provenance
        .deleted
        .iter()
        .any(|r| r.kernel_id == front_edge));
}

#[test]
fn draft_angle_out_of_range_is_rejected() {
    let mut kernel = MockKernel::new();
    let b = make_box(&mut kernel, 0.0, 0.0, 1.0, 1.0, 1.0);
    let left = find_solid_face(&kernel, &b, Orientation::Left).unwrap();
    let bottom = find_solid_face(&kernel, &b, Orientation::Bottom).unwrap();
    let result = execute_draft(&mut kernel, &b, &[left], bottom, [0.0, 0.0, -1.0], 90.0);
    assert!(matches!(result, Err(OpError::InvalidParameter { .. })));
}

// ── Pattern / Sweep Tests ──────────────────────────────────────────────────

#[test]
fn pattern_outputs_new_instances_only() {
    let mut kernel = MockKernel::new();
    let b = make_box(&mut kernel, 0.0, 0.0, 1.0, 1.0, 1.0);
    let result = execute_linear_pattern(
        &mut kernel,
        &b,
        PatternDirection {
            direction: [1.0, 0.0, 0.0],
            spacing: 2.0,
            count: 2,
        },
        Some(PatternDirection {
            direction: [0.0, 1.0, 0.0],
            spacing: 2.0,
            count: 3,
        }),
    )
    .unwrap();

    assert_eq!(result.outputs.len(), 5);
    assert!(!result.outputs.contains(&b));
    assert_eq!(result.created(TopoKind::Face).len(), 5 * 6);
    assert!(result.provenance.deleted.is_empty());
}

#[test]
fn pattern_with_zero_count_is_rejected() {
    let mut kernel = MockKernel::new();
    let b = make_box(&mut kernel, 0.0, 0.0, 1.0, 1.0, 1.0);
    let result = execute_linear_pattern(
        &mut kernel,
        &b,
        PatternDirection {
            direction: [1.0, 0.0, 0.0],
            spacing: 2.0,
            count: 0,
        },
        None,
    );
    assert!(matches!(result, Err(OpError::InvalidParameter { .. })));
}

#[test]
fn sweep_rim_around_top_face() {
    let mut kernel = MockKernel::new();
    let b = make_box(&mut kernel, 0.0, 0.0, 10.0, 10.0, 3.0);
    let top = find_solid_face(&kernel, &b, Orientation::Top).unwrap();
    let front = edge_geometry(
        &kernel,
        find_extreme_edge(&kernel, &loop_edges(&kernel, top), Orientation::Front).unwrap(),
    )
    .unwrap();

    let plane = SketchPlane::new(front.midpoint(), [-1.0, 0.0, 0.0], UP);
    let triangle = SketchShape::Polyline {
        points: vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
    };
    let sketch = create_profile(&mut kernel, &plane, &[triangle]).unwrap();
    let path = loop_edges(&kernel, top);
    let result = execute_sweep(&mut kernel, sketch.regions[0], &path).unwrap();

    let rim = result.main().unwrap();
    let bbox = kernel.solid_bounding_box(&rim).unwrap();
    assert_relative_eq!(bbox.max[2], 4.0, epsilon = 1e-9);
    assert_relative_eq!(bbox.size()[0], 10.0, epsilon = 1e-9);
    // One annulus at the bottom, a vertical band and a sloped band of 4 faces each.
    assert_eq!(kernel.list_faces(&rim).len(), 9);
}

// ── Lifecycle Tests ────────────────────────────────────────────────────────

#[test]
fn center_part_moves_horizontally_only() {
    let mut kernel = MockKernel::new();
    let b = make_box(&mut kernel, 2.0, 4.0, 12.0, 24.0, 3.0);
    let offset = center_part(&mut kernel, &b).unwrap();

    assert_relative_eq!(offset[0], -7.0, epsilon = 1e-9);
    assert_relative_eq!(offset[1], -14.0, epsilon = 1e-9);
    let bbox = kernel.solid_bounding_box(&b).unwrap();
    assert_relative_eq!(bbox.center()[0], 0.0, epsilon = 1e-9);
    assert_relative_eq!(bbox.center()[1], 0.0, epsilon = 1e-9);
    assert_relative_eq!(bbox.min[2], 0.0, epsilon = 1e-9);
}

#[test]
fn rename_and_remove() {
    let mut kernel = MockKernel::new();
    let sketch = create_profile(&mut kernel, &SketchPlane::horizontal(0.0), &[rect(0.0, 0.0, 1.0, 1.0)]).unwrap();
    let b = make_box(&mut kernel, 0.0, 0.0, 1.0, 1.0, 1.0);

    rename_part(&mut kernel, &b, "Part 1").unwrap();
    assert_eq!(kernel.solid_name(&b).as_deref(), Some("Part 1"));

    remove_sketches(&mut kernel, &[sketch.handle]).unwrap();
    remove_bodies(&mut kernel, &[None, Some(b)]).unwrap();
    assert!(kernel.list_solids().is_empty());
    // make_box leaves its own sketch behind.
    assert_eq!(kernel.list_sketches().len(), 1);
    assert!(kernel.delete_solid(&b).is_err());
}

use bin_engine::*;
use gridbin_kernel::{KernelIntrospect, MockKernel};
use proptest::prelude::*;

fn stage_names(bin: &GeneratedBin) -> Vec<&str> {
    bin.stages.stages().iter().map(|s| s.name.as_str()).collect()
}

fn position(names: &[&str], name: &str) -> usize {
    names
        .iter()
        .position(|n| *n == name)
        .unwrap_or_else(|| panic!("stage {name:?} missing from {names:?}"))
}

// ── Configuration Tests ────────────────────────────────────────────────────

#[test]
fn partial_json_fills_in_defaults() {
    let config: BinConfig = serde_json::from_str(r#"{ "rows": 2, "lip": "ROUNDED" }"#).unwrap();
    assert_eq!(config.rows, 2);
    assert_eq!(config.columns, 1);
    assert_eq!(config.lip, Some(LipShape::Rounded));
    assert_eq!(config.magnets, Some(MagnetOptions::default()));
    assert!(config.validate().is_ok());
}

#[test]
fn json_rejects_unknown_variants_with_config_message() {
    let err = serde_json::from_str::<BinConfig>(r#"{ "lip": "WAVY" }"#).unwrap_err();
    assert!(err.to_string().contains("lip shape"), "{err}");

    let err = serde_json::from_str::<BinConfig>(r#"{ "fill": "HALF" }"#).unwrap_err();
    assert!(err.to_string().contains("fill type"), "{err}");
}

#[test]
fn enums_serialize_as_upper_case_names() {
    let config = BinConfig {
        fill: Some(FillType::UntilLip),
        finger_slide: Some(FingerSlideOptions {
            kind: FingerSlideType::Chamfer,
            height: 4.0,
        }),
        ..BinConfig::default()
    };
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["fill"], "UNTIL_LIP");
    assert_eq!(json["lip"], "SHARP");
    assert_eq!(json["finger_slide"]["kind"], "CHAMFER");
    assert!(json["label"].is_object());
}

#[test]
fn bin_name_lists_rows_then_columns() {
    assert_eq!(bin_name(&BinConfig::grid(3, 2)), "Gridfinity Bin 3x2");
}

// ── Generation Tests ───────────────────────────────────────────────────────

#[test]
fn default_bin_is_one_named_solid() {
    let mut kernel = MockKernel::new();
    let bin = generate(&BinConfig::default(), &mut kernel).unwrap();

    assert_eq!(kernel.list_solids(), vec![bin.solid]);
    assert!(kernel.list_sketches().is_empty(), "construction sketches removed");
    assert_eq!(bin.name, "Gridfinity Bin 1x1");
    assert_eq!(kernel.solid_name(&bin.solid).as_deref(), Some("Gridfinity Bin 1x1"));
}

#[test]
fn invalid_config_touches_nothing() {
    let mut kernel = MockKernel::new();
    let config = BinConfig {
        height: 60,
        ..BinConfig::default()
    };
    let err = generate(&config, &mut kernel).unwrap_err();
    assert!(matches!(
        err,
        BuildError::Config(ConfigError::OutOfRange { field: "height", .. })
    ));
    assert!(kernel.list_solids().is_empty());
    assert!(kernel.list_sketches().is_empty());
}

#[test]
fn stages_run_in_pipeline_order() {
    let mut kernel = MockKernel::new();
    let bin = generate(&BinConfig::default(), &mut kernel).unwrap();
    let names = stage_names(&bin);

    let order = [
        "layer 1",
        "layer 2",
        "layer 3",
        "foot",
        "magnet cut",
        "layer 4",
        "base",
        "walls",
        "cavity",
        "hollow",
        "lip",
        "bin",
        "finger slide",
        "label",
        "bin with label",
        "center",
    ];
    let positions: Vec<usize> = order.iter().map(|n| position(&names, n)).collect();
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "out of order: {names:?}"
    );
    assert!(!names.contains(&"foot pattern"), "single cell is not patterned");
    assert!(!names.contains(&"cap"));
}

#[test]
fn completely_filled_bin_skips_hollow_features() {
    let mut kernel = MockKernel::new();
    let config = BinConfig {
        fill: Some(FillType::Complete),
        lip: Some(LipShape::Rounded),
        ..BinConfig::default()
    };
    let bin = generate(&config, &mut kernel).unwrap();
    let names = stage_names(&bin);

    assert!(names.contains(&"cap"));
    for skipped in ["cavity", "hollow", "lip", "lip fillet", "finger slide", "label"] {
        assert!(!names.contains(&skipped), "{skipped} built for a filled bin");
    }
}

#[test]
fn filled_until_lip_keeps_the_lip() {
    let mut kernel = MockKernel::new();
    let config = BinConfig {
        fill: Some(FillType::UntilLip),
        ..BinConfig::default()
    };
    let bin = generate(&config, &mut kernel).unwrap();
    let names = stage_names(&bin);
    assert!(names.contains(&"lip"));
    assert!(!names.contains(&"cavity"));
    assert!(!names.contains(&"label"));
}

#[test]
fn rounded_lip_gets_a_fillet_stage() {
    let mut kernel = MockKernel::new();
    let config = BinConfig {
        lip: Some(LipShape::Rounded),
        ..BinConfig::default()
    };
    let bin = generate(&config, &mut kernel).unwrap();
    let id = bin.stages.find("lip fillet").expect("lip fillet stage");
    let stage = bin.stages.get(id).unwrap();
    assert_eq!(stage.kind, StageKind::Fillet);
    assert!(!stage.created_faces.is_empty());
}

#[test]
fn chamfered_finger_slide() {
    let mut kernel = MockKernel::new();
    let config = BinConfig {
        finger_slide: Some(FingerSlideOptions {
            kind: FingerSlideType::Chamfer,
            height: 5.0,
        }),
        ..BinConfig::default()
    };
    let bin = generate(&config, &mut kernel).unwrap();
    let id = bin.stages.find("finger slide").unwrap();
    assert_eq!(bin.stages.get(id).unwrap().kind, StageKind::Chamfer);
}

#[test]
fn grid_bins_pattern_the_foot() {
    let mut kernel = MockKernel::new();
    let bin = generate(&BinConfig::grid(2, 3), &mut kernel).unwrap();
    let id = bin.stages.find("foot pattern").expect("pattern stage");
    let stage = bin.stages.get(id).unwrap();
    assert_eq!(stage.kind, StageKind::Pattern);
    // Six cells: the original foot plus five copies.
    assert!(stage.solid.is_some());
    assert_eq!(1 + stage.extra_solids.len(), 5);
    assert_eq!(kernel.list_solids(), vec![bin.solid]);
}

#[test]
fn magnets_off_skips_sockets() {
    let mut kernel = MockKernel::new();
    let config = BinConfig {
        magnets: None,
        ..BinConfig::default()
    };
    let bin = generate(&config, &mut kernel).unwrap();
    assert!(bin.stages.find("magnet cut").is_none());
    assert!(bin.stages.find("magnet sockets").is_none());
}

#[test]
fn label_sits_below_the_lip() {
    let mut kernel = MockKernel::new();
    let config = BinConfig::default();
    let options = LabelOptions::default();
    let builder = BinBuilder::new(&mut kernel, &config);
    // 5 body units, the cap, minus the lip and the offset.
    approx::assert_relative_eq!(builder.label_top(&options), 35.0 + 4.4 - 5.8 - 0.5, epsilon = 1e-9);

    let no_lip = BinConfig {
        lip: None,
        ..BinConfig::default()
    };
    let mut kernel = MockKernel::new();
    let builder = BinBuilder::new(&mut kernel, &no_lip);
    approx::assert_relative_eq!(builder.label_top(&options), 35.0 + 4.4 - 0.5, epsilon = 1e-9);
}

// ── Property Tests ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn in_range_configs_validate(
        rows in 1u32..8,
        columns in 1u32..8,
        height in 2u32..=50,
        wall in 1.2f64..=10.0,
        radius in 0.5f64..=4.25,
        slide in 2.0f64..=15.0,
    ) {
        let config = BinConfig {
            rows,
            columns,
            height,
            wall_thickness: wall,
            magnets: Some(MagnetOptions { radius, depth: 2.0 }),
            finger_slide: Some(FingerSlideOptions { kind: FingerSlideType::Rounded, height: slide }),
            ..BinConfig::default()
        };
        prop_assert!(config.validate().is_ok());
    }

    #[test]
    fn thin_walls_are_rejected(wall in 0.0f64..1.19) {
        let config = BinConfig { wall_thickness: wall, ..BinConfig::default() };
        let rejected = matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "wall thickness", .. })
        );
        prop_assert!(rejected);
    }
}

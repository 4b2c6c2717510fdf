use super::*;

/// 20x20 canvas, 10 frames at 10 fps. A red 10x10 square moves from x=5 to x=15 (center)
/// over frames 0..=9 at y=10.
fn moving_square() -> String {
    r##"{
        "v":"5.7.0","nm":"square","fr":10,"ip":0,"op":10,"w":20,"h":20,
        "layers":[{
            "ty":4,"ind":1,"ip":0,"op":10,"st":0,
            "ks":{"p":{"a":1,"k":[{"t":0,"s":[5,10]},{"t":9,"s":[15,10]}]}},
            "shapes":[{"ty":"gr","it":[
                {"ty":"rc","p":{"a":0,"k":[0,0]},"s":{"a":0,"k":[10,10]}},
                {"ty":"fl","c":{"a":0,"k":[1,0,0,1]},"o":{"a":0,"k":100}},
                {"ty":"tr"}
            ]}]
        }]
    }"##
    .to_string()
}

fn load(json: &str) -> LottieDocument {
    CpuRasterizer::new().load_from_data(json).unwrap()
}

#[test]
fn metadata_comes_from_header() {
    let doc = load(&moving_square());
    assert_eq!(doc.width(), 20);
    assert_eq!(doc.height(), 20);
    assert_eq!(doc.frame_rate(), 10.0);
    assert_eq!(doc.total_frames(), 10);
    assert!((doc.duration() - 1.0).abs() < 1e-9);
    assert_eq!(doc.version(), Some("5.7.0"));
    assert_eq!(doc.name(), Some("square"));
}

#[test]
fn renders_square_at_keyframed_position() {
    let doc = load(&moving_square());

    let first = doc.render_rgba(0, 20, 20).unwrap();
    assert_eq!(first.data.len(), 20 * 20 * 4);
    // square spans x in [0, 10) at frame 0
    assert_eq!(first.pixel(4, 10), Some([255, 0, 0, 255]));
    assert_eq!(first.pixel(15, 10).unwrap()[3], 0);

    let last = doc.render_rgba(9, 20, 20).unwrap();
    // square spans x in [10, 20) at frame 9
    assert_eq!(last.pixel(15, 10), Some([255, 0, 0, 255]));
    assert_eq!(last.pixel(4, 10).unwrap()[3], 0);
}

#[test]
fn rendering_is_deterministic() {
    let doc = load(&moving_square());
    let a = doc.render_rgba(3, 20, 20).unwrap();
    let b = doc.render_rgba(3, 20, 20).unwrap();
    assert_eq!(a, b);
}

#[test]
fn out_of_range_index_clamps_to_last_frame() {
    let doc = load(&moving_square());
    let last = doc.render_rgba(9, 20, 20).unwrap();
    let past = doc.render_rgba(500, 20, 20).unwrap();
    assert_eq!(last, past);
}

#[test]
fn output_scales_to_requested_size() {
    let doc = load(&moving_square());
    let big = doc.render_rgba(0, 40, 40).unwrap();
    assert_eq!((big.width, big.height), (40, 40));
    assert_eq!(big.pixel(8, 20), Some([255, 0, 0, 255]));
    assert_eq!(big.pixel(30, 20).unwrap()[3], 0);
}

#[test]
fn zero_or_oversized_targets_are_raster_errors() {
    let doc = load(&moving_square());
    assert!(matches!(doc.render_rgba(0, 0, 20), Err(ExportError::Raster(_))));
    assert!(matches!(
        doc.render_rgba(0, 70_000, 1),
        Err(ExportError::Raster(_))
    ));
}

#[test]
fn clear_color_fills_background() {
    let doc = CpuRasterizer::new()
        .with_clear_rgba(Some([0, 0, 255, 255]))
        .load_from_data(&moving_square())
        .unwrap();
    let frame = doc.render_rgba(0, 20, 20).unwrap();
    assert_eq!(frame.pixel(18, 2), Some([0, 0, 255, 255]));
    assert_eq!(frame.pixel(4, 10), Some([255, 0, 0, 255]));
}

#[test]
fn solid_layer_with_half_opacity_is_straight_alpha() {
    let doc = load(
        r##"{"fr":1,"ip":0,"op":1,"w":4,"h":4,"layers":[
            {"ty":1,"sc":"#00ff00","sw":4,"sh":4,"ks":{"o":{"a":0,"k":50}}}
        ]}"##,
    );
    let frame = doc.render_rgba(0, 4, 4).unwrap();
    let [r, g, b, a] = frame.pixel(2, 2).unwrap();
    assert_eq!((r, b), (0, 0));
    assert!(g >= 254, "straight green expected, got {g}");
    assert!((126..=129).contains(&a), "alpha ~50% expected, got {a}");
}

#[test]
fn hidden_and_inactive_layers_are_skipped() {
    let doc = load(
        r##"{"fr":1,"ip":0,"op":4,"w":4,"h":4,"layers":[
            {"ty":1,"sc":"#ff0000","sw":4,"sh":4,"hd":true},
            {"ty":1,"sc":"#00ff00","sw":4,"sh":4,"ip":2,"op":4}
        ]}"##,
    );
    assert_eq!(doc.render_rgba(0, 4, 4).unwrap().pixel(1, 1), Some([0, 0, 0, 0]));
    assert_eq!(
        doc.render_rgba(2, 4, 4).unwrap().pixel(1, 1),
        Some([0, 255, 0, 255])
    );
}

#[test]
fn first_layer_draws_on_top() {
    let doc = load(
        r##"{"fr":1,"ip":0,"op":1,"w":4,"h":4,"layers":[
            {"ty":1,"sc":"#ff0000","sw":4,"sh":4},
            {"ty":1,"sc":"#00ff00","sw":4,"sh":4}
        ]}"##,
    );
    assert_eq!(
        doc.render_rgba(0, 4, 4).unwrap().pixel(1, 1),
        Some([255, 0, 0, 255])
    );
}

#[test]
fn parent_transform_moves_child() {
    let doc = load(
        r##"{"fr":1,"ip":0,"op":1,"w":20,"h":20,"layers":[
            {"ty":1,"ind":2,"parent":1,"sc":"#ffffff","sw":5,"sh":5},
            {"ty":3,"ind":1,"ks":{"p":{"a":0,"k":[10,10]}}}
        ]}"##,
    );
    let frame = doc.render_rgba(0, 20, 20).unwrap();
    assert_eq!(frame.pixel(12, 12), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(2, 2).unwrap()[3], 0);
}

#[test]
fn parent_cycles_do_not_hang() {
    let doc = load(
        r##"{"fr":1,"ip":0,"op":1,"w":4,"h":4,"layers":[
            {"ty":1,"ind":1,"parent":2,"sc":"#ffffff","sw":4,"sh":4},
            {"ty":3,"ind":2,"parent":1}
        ]}"##,
    );
    assert!(doc.render_rgba(0, 4, 4).is_ok());
}

#[test]
fn invalid_solid_color_is_a_raster_error() {
    let doc = load(r##"{"fr":1,"ip":0,"op":1,"w":4,"h":4,"layers":[{"ty":1,"sc":"red","sw":4,"sh":4}]}"##);
    assert!(matches!(doc.render_rgba(0, 4, 4), Err(ExportError::Raster(_))));
}

#[test]
fn ellipse_and_path_geometry_fill() {
    let doc = load(
        r##"{"fr":1,"ip":0,"op":1,"w":20,"h":20,"layers":[{"ty":4,"shapes":[
            {"ty":"el","p":{"a":0,"k":[5,5]},"s":{"a":0,"k":[8,8]}},
            {"ty":"sh","ks":{"a":0,"k":{"c":true,"v":[[12,12],[19,12],[19,19],[12,19]],"i":[],"o":[]}}},
            {"ty":"fl","c":{"a":0,"k":[0,0,1,1]}}
        ]}]}"##,
    );
    let frame = doc.render_rgba(0, 20, 20).unwrap();
    assert_eq!(frame.pixel(5, 5), Some([0, 0, 255, 255]));
    assert_eq!(frame.pixel(15, 15), Some([0, 0, 255, 255]));
    assert_eq!(frame.pixel(15, 5).unwrap()[3], 0);
}

#[test]
fn helpers_convert_colors() {
    assert_eq!(parse_hex_rgb("#1a2B3c").unwrap(), [0x1a, 0x2b, 0x3c]);
    assert!(parse_hex_rgb("#123").is_err());
    assert_eq!(color_rgba8(&[1.0, 0.5, 0.0], 1.0), [255, 128, 0, 255]);
    assert_eq!(color_rgba8(&[255.0, 128.0, 0.0, 1.0], 0.5), [255, 128, 0, 128]);

    let mut px = vec![64u8, 0, 32, 128, 10, 10, 10, 0];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![128, 0, 64, 128, 0, 0, 0, 0]);
}

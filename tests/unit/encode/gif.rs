use super::*;

#[test]
fn defaults_loop_forever_and_restore_background() {
    let opts = GifOptions::default();
    assert_eq!(opts.loop_count, 0);
    assert_eq!(opts.disposal, GifDisposal::Background);
    assert!(!opts.optimize);
    assert_eq!(opts.format_name(), "GIF");
}

#[test]
fn disposal_codes_map_to_gif_methods() {
    assert_eq!(GifDisposal::try_from(0).unwrap(), GifDisposal::Unspecified);
    assert_eq!(GifDisposal::try_from(2).unwrap(), GifDisposal::Background);
    assert!(GifDisposal::try_from(4).is_err());
    assert_eq!(GifDisposal::Keep.to_gif(), gif::DisposalMethod::Keep);
    assert_eq!(GifDisposal::Previous.to_gif(), gif::DisposalMethod::Previous);
}

#[test]
fn repeat_and_delay_conversions() {
    assert_eq!(gif_repeat(0), gif::Repeat::Infinite);
    assert_eq!(gif_repeat(3), gif::Repeat::Finite(3));
    assert_eq!(gif_delay_cs(100).unwrap(), 10);
    assert_eq!(gif_delay_cs(333).unwrap(), 33);
    assert_eq!(gif_delay_cs(40).unwrap(), 4);
    assert_eq!(gif_delay_cs(15).unwrap(), 1);
    // 15 fps resolves to 66 ms per frame
    assert_eq!(gif_delay_cs(66).unwrap(), 6);
    assert_eq!(gif_delay_cs(655_359).unwrap(), u16::MAX);
}

#[test]
fn oversized_delay_is_rejected_before_writing() {
    assert!(matches!(
        gif_delay_cs(655_360).unwrap_err(),
        ExportError::Validation(_)
    ));

    let path = std::env::temp_dir().join(format!(
        "lottie_export_gif_delay_{}_{}.gif",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let frames = vec![RgbaImage::new(2, 2)];
    let err = GifOptions::default()
        .write(&path, &frames, u32::MAX)
        .unwrap_err();
    assert!(matches!(err, ExportError::Validation(_)));
    assert!(!path.exists());
}

#[test]
fn writes_decodable_frames() {
    let dir = std::env::temp_dir().join(format!(
        "lottie_export_gif_unit_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let path = dir.join("nested").join("out.gif");

    let frames = vec![
        RgbaImage::from_pixel(4, 3, image::Rgba([255, 0, 0, 255])),
        RgbaImage::from_pixel(4, 3, image::Rgba([0, 0, 255, 255])),
    ];
    let opts = GifOptions {
        loop_count: 2,
        ..GifOptions::default()
    };
    opts.write(&path, &frames, 250).unwrap();

    let mut decode = gif::DecodeOptions::new();
    decode.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = decode.read_info(std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!((decoder.width(), decoder.height()), (4, 3));

    let mut delays = Vec::new();
    let mut first_pixel = None;
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        delays.push(frame.delay);
        assert_eq!(frame.dispose, gif::DisposalMethod::Background);
        first_pixel.get_or_insert_with(|| frame.buffer[..4].to_vec());
    }
    assert_eq!(delays, vec![25, 25]);
    let px = first_pixel.unwrap();
    assert!(px[0] > 200 && px[2] < 50 && px[3] == 255, "{px:?}");

    std::fs::remove_dir_all(&dir).ok();
}

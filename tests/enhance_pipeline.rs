use image::imageops::{self, FilterType};
use image::RgbaImage;
use stillreel::{EnhancementParams, RasterImage, enhance};

/// A gradient with a few hard blocks, so resampling and sharpening both have
/// structure to chew on.
fn test_pattern(w: u32, h: u32) -> RasterImage {
    let mut data = Vec::with_capacity(w as usize * h as usize * 4);
    for y in 0..h {
        for x in 0..w {
            let in_block = (x / 50 + y / 50) % 2 == 0;
            let r = if in_block { 230 } else { (x * 255 / w) as u8 };
            let g = (y * 255 / h) as u8;
            let b = if in_block { 40 } else { 180 };
            data.extend_from_slice(&[r, g, b, 255]);
        }
    }
    RasterImage::new(w, h, data).unwrap()
}

#[test]
fn neutral_params_match_a_plain_2x_resample_byte_for_byte() {
    let src = test_pattern(500, 500);
    let asset = enhance(
        &src,
        &EnhancementParams {
            scale: 2,
            brightness: 1.0,
            saturation: 1.0,
            sharpen: 0.0,
        },
    )
    .unwrap();

    assert_eq!(asset.raster.width, 1000);
    assert_eq!(asset.raster.height, 1000);

    let reference_src = RgbaImage::from_raw(500, 500, src.data.clone()).unwrap();
    let reference = imageops::resize(&reference_src, 1000, 1000, FilterType::CatmullRom);
    assert_eq!(
        asset.raster.data,
        reference.into_raw(),
        "neutral enhancement must be exactly the resample"
    );
}

#[test]
fn dimensions_scale_exactly_for_non_square_sources() {
    let src = test_pattern(123, 77);
    for scale in [1u32, 2, 3, 4] {
        let asset = enhance(
            &src,
            &EnhancementParams {
                scale,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(asset.raster.width, 123 * scale);
        assert_eq!(asset.raster.height, 77 * scale);
    }
}

#[test]
fn sharpen_changes_interior_but_not_border() {
    let src = test_pattern(100, 100);
    let base = enhance(
        &src,
        &EnhancementParams {
            scale: 2,
            brightness: 1.0,
            saturation: 1.0,
            sharpen: 0.0,
        },
    )
    .unwrap();
    let sharp = enhance(
        &src,
        &EnhancementParams {
            scale: 2,
            brightness: 1.0,
            saturation: 1.0,
            sharpen: 0.6,
        },
    )
    .unwrap();

    let (w, h) = (base.raster.width, base.raster.height);
    for x in 0..w {
        assert_eq!(sharp.raster.pixel(x, 0), base.raster.pixel(x, 0));
        assert_eq!(sharp.raster.pixel(x, h - 1), base.raster.pixel(x, h - 1));
    }
    for y in 0..h {
        assert_eq!(sharp.raster.pixel(0, y), base.raster.pixel(0, y));
        assert_eq!(sharp.raster.pixel(w - 1, y), base.raster.pixel(w - 1, y));
    }
    assert_ne!(
        sharp.raster.data, base.raster.data,
        "sharpening a contrasty image must change interior pixels"
    );
}

#[test]
fn png_payload_is_lossless_at_the_enhanced_resolution() {
    let src = test_pattern(60, 40);
    let asset = enhance(
        &src,
        &EnhancementParams {
            scale: 3,
            brightness: 1.3,
            saturation: 0.8,
            sharpen: 0.2,
        },
    )
    .unwrap();
    let decoded = RasterImage::decode(&asset.png).unwrap();
    assert_eq!(decoded, asset.raster);
}

#[test]
fn one_bad_item_does_not_poison_a_batch() {
    let sources: Vec<Result<RasterImage, _>> = vec![
        Ok(test_pattern(20, 20)),
        RasterImage::decode(b"corrupt bytes"),
        Ok(test_pattern(30, 10)),
    ];

    let mut ok = 0;
    let mut failed = 0;
    for source in sources {
        match source.and_then(|s| enhance(&s, &EnhancementParams::default())) {
            Ok(asset) => {
                assert!(!asset.png.is_empty());
                ok += 1;
            }
            Err(_) => failed += 1,
        }
    }
    assert_eq!(ok, 2);
    assert_eq!(failed, 1);
}

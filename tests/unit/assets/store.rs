use std::io::Cursor;

use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "ckpass_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, w: u32, h: u32) {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, buf).unwrap();
}

#[test]
fn empty_has_no_logos_or_fonts() {
    let assets = PassAssets::empty();
    assert_eq!(assets.font_face_count(), 0);
    for logo in LogoRef::ALL {
        assert!(assets.logo(logo).is_none());
    }
}

#[test]
fn load_picks_up_png_and_svg_logos() {
    let dir = temp_dir("assets_logos");
    std::fs::create_dir_all(&dir).unwrap();
    write_png(&dir.join("premium-logo.png"), 12, 4);
    std::fs::write(
        dir.join("deluxe-logo.svg"),
        br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="20" height="10" fill="#000"/></svg>"##,
    )
    .unwrap();

    let assets = PassAssets::load(Some(&dir), false).unwrap();
    let premium = assets.logo(LogoRef::Premium).unwrap();
    assert_eq!((premium.width, premium.height), (12, 4));
    let deluxe = assets.logo(LogoRef::Deluxe).unwrap();
    assert_eq!(deluxe.height, LOGO_RASTER_HEIGHT);
    assert_eq!(deluxe.width, LOGO_RASTER_HEIGHT * 2);
    assert!(assets.logo(LogoRef::Essentials).is_none());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn corrupt_logo_is_an_error() {
    let dir = temp_dir("assets_corrupt");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("essentials-logo.png"), b"nope").unwrap();
    assert!(PassAssets::load(Some(&dir), false).is_err());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn with_logo_overrides() {
    let img = PreparedImage {
        width: 1,
        height: 1,
        rgba8_premul: std::sync::Arc::new(vec![0, 0, 0, 255]),
    };
    let assets = PassAssets::empty().with_logo(LogoRef::Essentials, img.clone());
    assert_eq!(assets.logo(LogoRef::Essentials), Some(&img));
}

use std::io::Cursor;

use super::*;

fn png_1x1(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(1, 1, rgba.to_vec()).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let prepared = decode_image(&png_1x1([100, 50, 200, 128])).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn parse_svg_ok_and_err() {
    let opts = usvg::Options::default();
    let ok = br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"></svg>"#;
    parse_svg(ok, &opts).unwrap();
    assert!(parse_svg(br#"<svg"#, &opts).is_err());
}

#[test]
fn rasterize_svg_scales_to_height() {
    let opts = usvg::Options::default();
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="10">
        <rect width="30" height="10" fill="#ff0000"/></svg>"##;
    let tree = parse_svg(svg, &opts).unwrap();
    let img = rasterize_svg_to_height(&tree, 20).unwrap();
    assert_eq!((img.width, img.height), (60, 20));
    let center = ((10 * img.width + 30) * 4) as usize;
    assert_eq!(&img.rgba8_premul[center..center + 4], &[255, 0, 0, 255]);
}

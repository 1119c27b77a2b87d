use super::*;

fn fields(first: &str, last: &str) -> PassFields {
    PassFields {
        first_name: first.into(),
        last_name: last.into(),
        ..PassFields::default()
    }
}

fn is_named(name: &str, prefix: &str) -> bool {
    let Some(rest) = name.strip_prefix(prefix) else {
        return false;
    };
    let Some(digits) = rest.strip_suffix(".png") else {
        return false;
    };
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[test]
fn filename_uses_names_and_millis() {
    let name = suggested_filename(&fields("Jane", "Doe"), 1_705_276_800_123);
    assert_eq!(name, "Jane-Doe-1705276800123.png");
    assert!(is_named(&name, "Jane-Doe-"));
}

#[test]
fn filename_falls_back_per_part() {
    assert!(is_named(&suggested_filename(&fields("", "Doe"), 5), "access-Doe-"));
    assert!(is_named(&suggested_filename(&fields("Jane", ""), 5), "Jane-pass-"));
    assert_eq!(suggested_filename(&fields("", ""), 5), "access-pass-5.png");
}

#[test]
fn encode_png_roundtrips_pixels() {
    let img = CapturedImage {
        width: 2,
        height: 1,
        data: vec![255, 0, 0, 255, 64, 32, 0, 128],
        premultiplied: true,
    };
    let png = encode_png(&img).unwrap();
    assert_eq!(&png[1..4], b"PNG");

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (2, 1));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    // 64/128 premultiplied -> 128 straight.
    assert_eq!(decoded.get_pixel(1, 0).0, [128, 64, 0, 128]);
}

#[test]
fn encode_png_rejects_short_buffer() {
    let img = CapturedImage {
        width: 2,
        height: 2,
        data: vec![0; 4],
        premultiplied: true,
    };
    assert!(encode_png(&img).unwrap_err().is_capture());
}

#[test]
fn artifact_carries_data_uri() {
    let artifact = ExportArtifact::new(vec![1, 2, 3], 1, 1, "a.png".into());
    assert_eq!(artifact.image_data_uri, "data:image/png;base64,AQID");
    assert_eq!(&*artifact.png, &[1, 2, 3]);
}

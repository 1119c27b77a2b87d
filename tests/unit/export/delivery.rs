use super::*;

fn artifact() -> ExportArtifact {
    ExportArtifact::new(vec![137, 80, 78, 71], 1, 1, "Jane-Doe-1700000000000.png".into())
}

struct FailingTarget;

impl DeliveryTarget for FailingTarget {
    fn download(&mut self, _filename: &str, _png: &[u8]) -> PassResult<()> {
        Err(PassError::Other(anyhow::anyhow!("disk full")))
    }

    fn open_document(&mut self, _doc: &ManualSaveDocument) -> PassResult<()> {
        Err(PassError::delivery("popup blocked"))
    }
}

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "ckpass_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn standard_engine_downloads() {
    let a = artifact();
    let plan = DeliveryPlan::for_engine(EngineKind::Standard, &a);
    let mut target = InMemoryTarget::new();
    let receipt = plan.execute(&mut target).unwrap();
    assert_eq!(
        receipt,
        DeliveryReceipt::Downloaded {
            filename: a.suggested_filename.clone()
        }
    );
    assert_eq!(target.downloads.len(), 1);
    assert_eq!(target.downloads[0].1, a.png.to_vec());
    assert!(target.documents.is_empty());
}

#[test]
fn restricted_engine_opens_manual_save_page() {
    let a = artifact();
    let plan = DeliveryPlan::for_engine(EngineKind::Restricted, &a);
    let mut target = InMemoryTarget::new();
    let receipt = plan.execute(&mut target).unwrap();
    assert!(matches!(receipt, DeliveryReceipt::OpenedDocument { .. }));
    assert!(target.downloads.is_empty());

    let doc = &target.documents[0];
    assert_eq!(doc.title, MANUAL_SAVE_TITLE);
    assert!(doc.html.contains(&a.image_data_uri));
    assert!(doc.html.contains("Save Image As..."));
}

#[test]
fn target_errors_become_delivery_errors() {
    let a = artifact();
    for engine in [EngineKind::Standard, EngineKind::Restricted] {
        let err = DeliveryPlan::for_engine(engine, &a)
            .execute(&mut FailingTarget)
            .unwrap_err();
        assert!(err.is_delivery(), "{err}");
    }
}

#[test]
fn directory_target_writes_png_and_html() {
    let dir = temp_dir("delivery_dir");
    let a = artifact();
    let mut target = DirectoryTarget::new(&dir);

    DeliveryPlan::for_engine(EngineKind::Standard, &a)
        .execute(&mut target)
        .unwrap();
    DeliveryPlan::for_engine(EngineKind::Restricted, &a)
        .execute(&mut target)
        .unwrap();

    assert_eq!(
        target.written(),
        &[
            dir.join("Jane-Doe-1700000000000.png"),
            dir.join("Jane-Doe-1700000000000.html")
        ]
    );
    assert_eq!(std::fs::read(&target.written()[0]).unwrap(), a.png.to_vec());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn directory_target_keeps_writes_inside_its_directory() {
    let dir = temp_dir("delivery_strip");
    let mut target = DirectoryTarget::new(&dir);
    target.download("../escape.png", &[1]).unwrap();
    assert_eq!(target.written(), &[dir.join(".._escape.png")]);
    assert!(target.download("..", &[1]).is_err());
    assert!(target.download("", &[1]).is_err());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn directory_target_flattens_separators_in_names() {
    let dir = temp_dir("delivery_slash");
    let a = ExportArtifact::new(vec![1, 2, 3], 1, 1, "AC/DC-Doe-1700000000000.png".into());
    let mut target = DirectoryTarget::new(&dir);

    DeliveryPlan::for_engine(EngineKind::Standard, &a)
        .execute(&mut target)
        .unwrap();
    DeliveryPlan::for_engine(EngineKind::Restricted, &a)
        .execute(&mut target)
        .unwrap();

    let png = dir.join("AC_DC-Doe-1700000000000.png");
    let html = dir.join("AC_DC-Doe-1700000000000.html");
    assert_eq!(target.written(), &[png.clone(), html.clone()]);
    assert_eq!(std::fs::read(&png).unwrap(), vec![1, 2, 3]);
    assert!(html.is_file());
    std::fs::remove_dir_all(&dir).ok();
}

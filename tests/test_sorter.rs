//! Integration tests for the request context and lazy classifier loading.

mod common;

use std::sync::Arc;

use common::*;
use image::{DynamicImage, GrayImage};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_sorter_is_shareable() {
    assert_send_sync::<Sorter>();
    assert_send_sync::<Classifier>();
    assert_send_sync::<ClassifierSlot>();
}

#[test]
fn test_sort_black_image() -> anyhow::Result<()> {
    let sorter = Sorter::new(Arc::new(default_classifier()))?;

    let descriptor = sorter.extract(&solid_image(64, 128, [0, 0, 0]))?;
    assert_eq!(descriptor.len(), DEFAULT_LEN);

    // All-zero descriptor: decision value 0, probability 0.5
    let result = sorter.sort(&solid_image(64, 128, [0, 0, 0]))?;
    assert_eq!(result, sorter.classify(&descriptor)?);
    assert!((result.confidence - 0.5).abs() < 1e-6);
    Ok(())
}

#[test]
fn test_sort_photo_like_image() -> anyhow::Result<()> {
    let sorter = Sorter::new(Arc::new(default_classifier()))?;

    let result = sorter.sort(&textured_image(480, 640))?;
    assert!(result.confidence > 0.0 && result.confidence < 1.0);
    assert!(!sorter.is_untrained());
    Ok(())
}

#[test]
fn test_sorter_uses_configuration_stored_with_classifier() -> anyhow::Result<()> {
    let classifier = Classifier::from_parts(small_config(), linear_model(324), Provenance::Untrained)?;
    let sorter = Sorter::new(Arc::new(classifier))?;

    assert_eq!(sorter.extractor().config(), &small_config());
    assert_eq!(sorter.extract(&textured_image(200, 100))?.len(), 324);
    assert!(sorter.sort(&textured_image(200, 100)).is_ok());
    assert!(sorter.is_untrained());
    Ok(())
}

#[test]
fn test_sort_reports_invalid_image() -> anyhow::Result<()> {
    let sorter = Sorter::new(Arc::new(default_classifier()))?;
    let gray = DynamicImage::ImageLuma8(GrayImage::new(10, 10));

    let result = sorter.sort(&gray);
    assert!(matches!(
        result,
        Err(Error::Extract(ExtractError::InvalidImage(_)))
    ));
    Ok(())
}

#[test]
fn test_sorter_debug_output() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let sorter = Sorter::new(Arc::new(default_classifier()))?.with_debug(dir.path().join("bottle"))?;

    sorter.sort(&textured_image(30, 40))?;
    assert!(dir.path().join("bottle/02_canonical_resize/01.png").is_file());
    Ok(())
}

#[test]
fn test_slot_does_not_remember_failed_load() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let slot = ClassifierSlot::new(dir.path().join("model.ecosort"));

    assert!(matches!(slot.get(), Err(ModelLoadError::Missing { .. })));
    assert!(!slot.is_loaded());

    write_artifact(dir.path(), "model.ecosort", linear_model(DEFAULT_LEN), Provenance::Trained);
    let classifier = slot.get()?;
    assert_eq!(classifier.expected_len(), DEFAULT_LEN);
    assert!(slot.is_loaded());
    Ok(())
}

#[test]
fn test_slot_loads_once_for_concurrent_callers() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = write_artifact(dir.path(), "model.ecosort", linear_model(DEFAULT_LEN), Provenance::Trained);
    let slot = ClassifierSlot::new(path);

    let loaded: Vec<Arc<Classifier>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8).map(|_| s.spawn(|| slot.get())).collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("loader thread panicked"))
            .collect::<Result<_, _>>()
    })?;

    let first = &loaded[0];
    assert!(loaded.iter().all(|c| Arc::ptr_eq(c, first)));
    assert!(Arc::ptr_eq(&slot.get()?, first));
    Ok(())
}

//! Crop recommendation integration tests

mod common;

use agrosense_backend::services::CropRecommendationService;
use agrosense_backend::store::MemoryStore;
use agrosense_backend::{AppError, EngineSettings};
use chrono::{Duration, Utc};
use common::*;
use shared::{default_catalog, season_for_date, SoilTexture};
use std::sync::Arc;

async fn loam_field(store: &MemoryStore) {
    store
        .insert_field(unconfirmed_field("node-loam", SoilTexture::Loam))
        .await;
    add_reading(store, "node-loam", "25", "22", Utc::now() - Duration::hours(1)).await;
}

#[tokio::test]
async fn test_default_top_n_ranked_descending() {
    let store = Arc::new(MemoryStore::new());
    loam_field(&store).await;
    let service = CropRecommendationService::new(context(store, None));

    let list = service.recommend("node-loam", None).await.unwrap();

    assert_eq!(list.recommendations.len(), 5);
    assert!(list
        .recommendations
        .windows(2)
        .all(|pair| pair[0].suitability_score >= pair[1].suitability_score));
    assert_eq!(
        list.season,
        season_for_date(Utc::now().date_naive(), false)
    );
}

#[tokio::test]
async fn test_region_filter_excludes_non_regional_crops() {
    let store = Arc::new(MemoryStore::new());
    loam_field(&store).await;
    let service = CropRecommendationService::new(context(store, None));

    let list = service.recommend("node-loam", Some(20)).await.unwrap();

    let regional = default_catalog().iter().filter(|c| c.up_region_valid).count();
    assert_eq!(list.recommendations.len(), regional);
    assert!(list.recommendations.iter().all(|r| r.crop_name != "Tea"));
}

#[tokio::test]
async fn test_full_catalog_when_region_filter_off() {
    let store = Arc::new(MemoryStore::new());
    loam_field(&store).await;
    let settings = EngineSettings {
        region_only_catalog: false,
        ..EngineSettings::default()
    };
    let service = CropRecommendationService::new(context_with_settings(store, None, settings));

    let list = service.recommend("node-loam", Some(20)).await.unwrap();

    assert_eq!(list.recommendations.len(), default_catalog().len());
}

#[tokio::test]
async fn test_scores_within_bounds_with_reasons() {
    let store = Arc::new(MemoryStore::new());
    loam_field(&store).await;
    let service = CropRecommendationService::new(context(store, None));

    let list = service.recommend("node-loam", Some(3)).await.unwrap();

    assert_eq!(list.recommendations.len(), 3);
    for rec in &list.recommendations {
        assert!(rec.suitability_score >= dec("0"));
        assert!(rec.suitability_score <= dec("100"));
        assert!(!rec.reason.is_empty());
    }
}

#[tokio::test]
async fn test_zero_top_n_rejected() {
    let store = Arc::new(MemoryStore::new());
    loam_field(&store).await;
    let service = CropRecommendationService::new(context(store, None));

    let err = service.recommend("node-loam", Some(0)).await.unwrap_err();

    assert!(err.is_validation());
}

#[tokio::test]
async fn test_field_without_readings_not_found() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_field(unconfirmed_field("node-loam", SoilTexture::Loam))
        .await;
    let service = CropRecommendationService::new(context(store, None));

    let err = service.recommend("node-loam", None).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_old_readings_fall_back_to_latest_temperature() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_field(unconfirmed_field("node-loam", SoilTexture::Loam))
        .await;
    add_reading(&store, "node-loam", "25", "22", Utc::now() - Duration::days(30)).await;
    let service = CropRecommendationService::new(context(store, None));

    let list = service.recommend("node-loam", Some(1)).await.unwrap();

    assert_eq!(list.recommendations.len(), 1);
}

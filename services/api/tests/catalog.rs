//! Product and service-profile repositories: CRUD, defaults, validation,
//! and the read-side helpers.

mod common;

use fixit_core::domain::{
    NewProduct, NewServiceProfile, ProductCategory, ProductPatch, Profession,
};
use fixit_core::error::CoreError;

fn drill() -> NewProduct {
    NewProduct {
        name: "Cordless Drill Driver".to_string(),
        price: 89.99,
        category: ProductCategory::PowerTools,
        image: None,
        description: "18V drill".to_string(),
        rating: Some(4.8),
    }
}

fn electrician(name: &str, rating: f64) -> NewServiceProfile {
    NewServiceProfile {
        name: name.to_string(),
        profession: Profession::Electrician,
        rate: 75.0,
        rating: Some(rating),
        image: None,
        available: None,
    }
}

#[tokio::test]
async fn created_product_round_trips_and_is_searchable() {
    let store = common::store();
    let products = common::product_repo(&store);

    let created = products.create(drill()).await.unwrap();
    assert!(!created.id.is_empty());
    assert!(created.image.starts_with("https://picsum.photos/300"));

    let fetched = products.get_by_id(&created.id).await.unwrap();
    assert_eq!(fetched.name, "Cordless Drill Driver");
    assert_eq!(fetched.price, 89.99);
    assert_eq!(fetched.category, ProductCategory::PowerTools);
    assert_eq!(fetched.description, "18V drill");
    assert_eq!(fetched.rating, 4.8);

    // Case-insensitive containment over name and description.
    let hits = products.search("DRILL").await.unwrap();
    assert!(hits.iter().any(|p| p.id == created.id));
    assert!(products.search("plunger").await.unwrap().is_empty());
}

#[tokio::test]
async fn product_validation_runs_before_storage() {
    let store = common::store();
    let products = common::product_repo(&store);

    let mut free = drill();
    free.price = 0.0;
    assert!(matches!(
        products.create(free).await.unwrap_err(),
        CoreError::Validation(_)
    ));

    let mut overrated = drill();
    overrated.rating = Some(5.1);
    assert!(matches!(
        products.create(overrated).await.unwrap_err(),
        CoreError::Validation(_)
    ));

    // Nothing was written by the rejected creates.
    assert!(products.get_all().await.unwrap().is_empty());

    let created = products.create(drill()).await.unwrap();
    let err = products
        .update(
            &created.id,
            ProductPatch {
                rating: Some(-0.1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn partial_update_leaves_other_fields_alone() {
    let store = common::store();
    let products = common::product_repo(&store);
    let created = products.create(drill()).await.unwrap();

    let updated = products
        .update(
            &created.id,
            ProductPatch {
                price: Some(79.99),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.price, 79.99);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn update_and_delete_missing_product_are_not_found() {
    let store = common::store();
    let products = common::product_repo(&store);

    let patch = ProductPatch {
        price: Some(1.0),
        ..Default::default()
    };
    assert!(matches!(
        products.update("missing", patch).await.unwrap_err(),
        CoreError::NotFound { .. }
    ));
    assert!(matches!(
        products.delete("missing").await.unwrap_err(),
        CoreError::NotFound { .. }
    ));

    let created = products.create(drill()).await.unwrap();
    products.delete(&created.id).await.unwrap();
    assert!(matches!(
        products.get_by_id(&created.id).await.unwrap_err(),
        CoreError::NotFound { .. }
    ));
}

#[tokio::test]
async fn top_rated_sorts_descending_with_limit() {
    let store = common::store();
    let products = common::product_repo(&store);
    for (name, rating) in [("saw", 3.5), ("hammer", 4.9), ("tape", 4.2)] {
        let mut input = drill();
        input.name = name.to_string();
        input.rating = Some(rating);
        products.create(input).await.unwrap();
    }

    let top = products.top_rated(2).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].name, "hammer");
    assert_eq!(top[1].name, "tape");
}

#[tokio::test]
async fn category_filter_is_exact() {
    let store = common::store();
    let products = common::product_repo(&store);
    products.create(drill()).await.unwrap();
    let mut gloves = drill();
    gloves.name = "Work Gloves".to_string();
    gloves.category = ProductCategory::Safety;
    products.create(gloves).await.unwrap();

    let safety = products
        .get_by_category(ProductCategory::Safety)
        .await
        .unwrap();
    assert_eq!(safety.len(), 1);
    assert_eq!(safety[0].name, "Work Gloves");
    assert!(products
        .get_by_category(ProductCategory::Plumbing)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn availability_round_trip() {
    let store = common::store();
    let profiles = common::profile_repo(&store);
    let created = profiles.create(electrician("Sam", 4.5)).await.unwrap();
    assert!(created.available, "profiles default to available");

    profiles.set_availability(&created.id, false).await.unwrap();
    let fetched = profiles.get_by_id(&created.id).await.unwrap();
    assert!(!fetched.available);
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, created.name);
}

#[tokio::test]
async fn profession_filters_respect_availability() {
    let store = common::store();
    let profiles = common::profile_repo(&store);
    let sam = profiles.create(electrician("Sam", 4.5)).await.unwrap();
    let kim = profiles.create(electrician("Kim", 4.0)).await.unwrap();
    profiles
        .create(NewServiceProfile {
            name: "Pat".to_string(),
            profession: Profession::Plumber,
            rate: 60.0,
            rating: None,
            image: None,
            available: Some(true),
        })
        .await
        .unwrap();
    profiles.set_availability(&kim.id, false).await.unwrap();

    let electricians = profiles
        .get_by_profession(Profession::Electrician)
        .await
        .unwrap();
    assert_eq!(electricians.len(), 2);

    let available = profiles
        .get_available_by_profession(Profession::Electrician)
        .await
        .unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, sam.id);

    assert_eq!(profiles.get_available().await.unwrap().len(), 2);
}

#[tokio::test]
async fn rating_updates_are_bounds_checked() {
    let store = common::store();
    let profiles = common::profile_repo(&store);
    let created = profiles.create(electrician("Sam", 4.5)).await.unwrap();

    assert!(matches!(
        profiles.set_rating(&created.id, 6.0).await.unwrap_err(),
        CoreError::Validation(_)
    ));
    let updated = profiles.set_rating(&created.id, 5.0).await.unwrap();
    assert_eq!(updated.rating, 5.0);
}

//! Runs the sqlx adapters against a real Postgres. Every test returns early
//! when `DATABASE_URL` is unset. Rows are scoped to freshly inserted users and
//! materials so runs can share one database.

use super::helpers::{insert_material, insert_user, postgres_pool};
use chrono::Utc;
use engagement_api::{
    application::{
        comments::use_case::CommentService, engagement::use_case::EngagementAggregator,
        likes::use_case::LikeService, ratings::use_case::RatingService,
    },
    domain::{
        like::{
            entity::NewLike,
            repository::LikeRepository,
            target::{Target, TargetType},
        },
        material::{entity::MaterialFilters, repository::MaterialRepository},
        rating::{repository::RatingRepository, value_objects::RatingValue},
        shared::{errors::DomainError, pagination::PaginationRequest},
    },
    infrastructure::repositories::{
        sqlx_comment_repository::SqlxCommentRepository,
        sqlx_like_repository::SqlxLikeRepository,
        sqlx_material_repository::SqlxMaterialRepository,
        sqlx_rating_repository::SqlxRatingRepository,
    },
};
use futures_util::future::join_all;
use sqlx::PgPool;
use std::sync::Arc;

fn engine(db: &PgPool) -> EngagementAggregator {
    let materials: Arc<dyn MaterialRepository> = Arc::new(SqlxMaterialRepository::new(db.clone()));
    EngagementAggregator::new(
        materials.clone(),
        LikeService::new(Arc::new(SqlxLikeRepository::new(db.clone()))),
        RatingService::new(
            Arc::new(SqlxRatingRepository::new(db.clone())),
            materials.clone(),
        ),
        CommentService::new(Arc::new(SqlxCommentRepository::new(db.clone())), materials, 1000),
    )
}

async fn like_rows(db: &PgPool, target: Target) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*)::bigint FROM likes WHERE target_type = $1 AND target_id = $2",
    )
    .bind(target.kind.as_str())
    .bind(target.id)
    .fetch_one(db)
    .await
    .expect("failed to count likes")
}

async fn rating_rows(db: &PgPool, material_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::bigint FROM ratings WHERE material_id = $1")
        .bind(material_id)
        .fetch_one(db)
        .await
        .expect("failed to count ratings")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_toggles_keep_row_parity() {
    let Some(db) = postgres_pool().await else {
        return;
    };
    let user = insert_user(&db, "Racer").await;
    let m = insert_material(&db, &user, "Race Track").await;
    let target = Target::material(m);
    let user_id = user.id;
    let likes = Arc::new(LikeService::new(Arc::new(SqlxLikeRepository::new(db.clone()))));

    for (calls, expected_rows) in [(7, 1), (4, 1), (5, 0)] {
        let results = join_all((0..calls).map(|_| {
            let likes = likes.clone();
            async move { likes.toggle_like(user_id, target).await }
        }))
        .await;
        assert!(results.iter().all(Result::is_ok), "{:?}", results);
        assert_eq!(like_rows(&db, target).await, expected_rows);
    }
}

#[tokio::test]
async fn duplicate_like_insert_is_a_conflict() {
    let Some(db) = postgres_pool().await else {
        return;
    };
    let repository = SqlxLikeRepository::new(db.clone());
    let user = insert_user(&db, "Twice").await;
    let m = insert_material(&db, &user, "Doubled").await;
    let like = NewLike {
        user_id: user.id,
        target: Target::material(m),
        created_at: Utc::now(),
    };

    repository.insert(like.clone()).await.unwrap();
    assert!(matches!(
        repository.insert(like).await,
        Err(DomainError::Conflict(_))
    ));
    assert_eq!(like_rows(&db, Target::material(m)).await, 1);
}

#[tokio::test]
async fn rating_overwrite_keeps_one_row() {
    let Some(db) = postgres_pool().await else {
        return;
    };
    let engine = engine(&db);
    let author = insert_user(&db, "Author").await;
    let rater = insert_user(&db, "Rater").await;
    let m = insert_material(&db, &author, "Rated Twice").await;

    engine.submit_rating(m, &rater, 3).await.unwrap();
    let aggregate = engine.submit_rating(m, &rater, 5).await.unwrap();

    assert_eq!(rating_rows(&db, m).await, 1);
    assert_eq!(aggregate.total_ratings, 1);
    assert_eq!(aggregate.average_rating, 5.0);
    assert_eq!(aggregate.distribution[&5], 1);
    assert_eq!(aggregate.distribution[&3], 0);
    assert_eq!(aggregate.user_rating, Some(5));

    let repository = SqlxRatingRepository::new(db.clone());
    assert!(matches!(
        repository
            .insert(m, rater.id, RatingValue::new(2).unwrap())
            .await,
        Err(DomainError::Conflict(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_ratings_by_one_user_leave_one_row() {
    let Some(db) = postgres_pool().await else {
        return;
    };
    let engine = Arc::new(engine(&db));
    let author = insert_user(&db, "Author").await;
    let rater = insert_user(&db, "Eager").await;
    let m = insert_material(&db, &author, "Contested").await;

    let results = join_all((1..=5).map(|value| {
        let engine = engine.clone();
        let rater = rater.clone();
        async move { engine.submit_rating(m, &rater, value).await }
    }))
    .await;
    assert!(results.iter().all(Result::is_ok), "{:?}", results);

    assert_eq!(rating_rows(&db, m).await, 1);
    let aggregate = engine.get_rating(m, Some(&rater)).await.unwrap();
    assert_eq!(aggregate.total_ratings, 1);
    assert_eq!(
        aggregate.user_rating.map(f64::from),
        Some(aggregate.average_rating)
    );
}

#[tokio::test]
async fn batch_counts_omit_targets_without_likes() {
    let Some(db) = postgres_pool().await else {
        return;
    };
    let repository = SqlxLikeRepository::new(db.clone());
    let likes = LikeService::new(Arc::new(SqlxLikeRepository::new(db.clone())));
    let (a, b) = (insert_user(&db, "A").await, insert_user(&db, "B").await);
    let popular = insert_material(&db, &a, "Popular").await;
    let liked_once = insert_material(&db, &a, "Liked Once").await;
    let ignored = insert_material(&db, &a, "Ignored").await;

    likes.toggle_like(a.id, Target::material(popular)).await.unwrap();
    likes.toggle_like(b.id, Target::material(popular)).await.unwrap();
    likes.toggle_like(b.id, Target::material(liked_once)).await.unwrap();

    let counts = repository
        .count_by_targets(TargetType::Material, &[popular, liked_once, ignored])
        .await
        .unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[&popular], 2);
    assert_eq!(counts[&liked_once], 1);
    assert!(!counts.contains_key(&ignored));

    let liked = repository
        .find_liked_among(b.id, TargetType::Material, &[popular, liked_once, ignored])
        .await
        .unwrap();
    assert_eq!(liked.len(), 2);
    assert!(!liked.contains(&ignored));
}

#[tokio::test]
async fn download_update_returns_file_name() {
    let Some(db) = postgres_pool().await else {
        return;
    };
    let repository = SqlxMaterialRepository::new(db.clone());
    let author = insert_user(&db, "Author").await;
    let m = insert_material(&db, &author, "Field Guide").await;

    assert_eq!(
        repository.record_download(m).await.unwrap().as_deref(),
        Some("uploads/field-guide.pdf")
    );
    repository.record_download(m).await.unwrap();
    let downloads = sqlx::query_scalar::<_, i64>("SELECT total_download FROM materials WHERE id = $1")
        .bind(m)
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(downloads, 2);

    let missing = sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(id), 0) + 1000 FROM materials")
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(repository.record_download(missing).await.unwrap(), None);
}

#[tokio::test]
async fn owner_delete_cascades_through_triggers() {
    let Some(db) = postgres_pool().await else {
        return;
    };
    let engine = engine(&db);
    let (owner, fan) = (insert_user(&db, "Owner").await, insert_user(&db, "Fan").await);
    let m = insert_material(&db, &owner, "Ephemeral").await;
    let comment = engine.add_comment(m, "first!", &fan).await.unwrap();
    engine.toggle_like_on_material(m, &fan).await.unwrap();
    engine.toggle_like_on_comment(m, comment.id, &fan).await.unwrap();
    engine.submit_rating(m, &fan, 4).await.unwrap();

    assert!(matches!(
        engine.delete_material(m, &fan).await,
        Err(DomainError::Forbidden(_))
    ));
    engine.delete_material(m, &owner).await.unwrap();

    assert_eq!(like_rows(&db, Target::material(m)).await, 0);
    assert_eq!(like_rows(&db, Target::comment(comment.id)).await, 0);
    assert_eq!(rating_rows(&db, m).await, 0);
    assert!(matches!(
        engine.delete_material(m, &owner).await,
        Err(DomainError::NotFound(_))
    ));
}

#[tokio::test]
async fn search_matches_wildcards_literally() {
    let Some(db) = postgres_pool().await else {
        return;
    };
    let repository = SqlxMaterialRepository::new(db.clone());
    let author = insert_user(&db, "Searcher").await;
    let exact = insert_material(&db, &author, "Yield 100% Pure").await;
    insert_material(&db, &author, "Yield 1000 Pure").await;

    let filters = MaterialFilters {
        search: Some("100%".into()),
        author_id: Some(author.id),
        ..Default::default()
    };
    let (items, total) = repository
        .find_page(&filters, PaginationRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, exact);
    assert_eq!(items[0].author.display_name, "Searcher");
}

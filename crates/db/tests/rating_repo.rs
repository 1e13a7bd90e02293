use cinedex_db::models::movie::Movie;
use cinedex_db::models::rating::RatingSummary;
use cinedex_db::repositories::{MovieRepo, RatingRepo};
use sqlx::PgPool;
use uuid::Uuid;

async fn rating_row_count(pool: &PgPool, movie_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM ratings WHERE movieid = $1")
        .bind(movie_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn seed_movie(pool: &PgPool, title: &str) -> Movie {
    let movie = Movie::new(Uuid::now_v7(), title, 2010, vec!["Drama".to_string()]);
    MovieRepo::create(pool, &movie).await.unwrap();
    movie
}

/// A second rating from the same viewer replaces the first.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_replaces_existing_rating(pool: PgPool) {
    let movie = seed_movie(&pool, "Inception").await;
    let viewer = Uuid::now_v7();

    assert!(RatingRepo::upsert(&pool, movie.id, viewer, 3).await.unwrap());
    assert!(RatingRepo::upsert(&pool, movie.id, viewer, 5).await.unwrap());

    assert_eq!(rating_row_count(&pool, movie.id).await, 1);
    let summary = RatingRepo::aggregate_and_viewer_rating(&pool, movie.id, viewer)
        .await
        .unwrap();
    assert_eq!(
        summary,
        RatingSummary {
            rating: Some(5.0),
            user_rating: Some(5),
        }
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_aggregate_rounds_to_one_decimal(pool: PgPool) {
    let movie = seed_movie(&pool, "Heat").await;
    for rating in [5, 4, 4] {
        RatingRepo::upsert(&pool, movie.id, Uuid::now_v7(), rating)
            .await
            .unwrap();
    }

    // 13 / 3 = 4.333..
    let avg = RatingRepo::aggregate_rating(&pool, movie.id).await.unwrap();
    assert_eq!(avg, Some(4.3));

    let found = MovieRepo::find_by_id(&pool, movie.id, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.rating, 4.3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unrated_movie_has_no_aggregate(pool: PgPool) {
    let movie = seed_movie(&pool, "Alien").await;
    let viewer = Uuid::now_v7();

    assert_eq!(
        RatingRepo::aggregate_rating(&pool, movie.id).await.unwrap(),
        None
    );
    let summary = RatingRepo::aggregate_and_viewer_rating(&pool, movie.id, viewer)
        .await
        .unwrap();
    assert_eq!(summary.rating, None);
    assert_eq!(summary.user_rating, None);

    // The entity view reports zero for an unrated movie.
    let found = MovieRepo::find_by_id(&pool, movie.id, Some(viewer))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.rating, 0.0);
    assert_eq!(found.user_rating, None);
}

/// The viewer's own rating is reported alongside an average over everyone.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_viewer_rating_is_independent_of_average(pool: PgPool) {
    let movie = seed_movie(&pool, "Arrival").await;
    let viewer = Uuid::now_v7();
    let other = Uuid::now_v7();
    RatingRepo::upsert(&pool, movie.id, viewer, 2).await.unwrap();
    RatingRepo::upsert(&pool, movie.id, other, 5).await.unwrap();

    let summary = RatingRepo::aggregate_and_viewer_rating(&pool, movie.id, viewer)
        .await
        .unwrap();
    assert_eq!(summary.rating, Some(3.5));
    assert_eq!(summary.user_rating, Some(2));

    let by_slug = MovieRepo::find_by_slug(&pool, "arrival-2010", Some(other))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_slug.rating, 3.5);
    assert_eq!(by_slug.user_rating, Some(5));
}

/// Ratings live and die with their movie.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rating_requires_existing_movie(pool: PgPool) {
    let result = RatingRepo::upsert(&pool, Uuid::now_v7(), Uuid::now_v7(), 4).await;
    assert!(result.is_err(), "foreign key should reject unknown movie");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rating_out_of_range_is_rejected_by_schema(pool: PgPool) {
    let movie = seed_movie(&pool, "Memento").await;
    let result = RatingRepo::upsert(&pool, movie.id, Uuid::now_v7(), 6).await;
    assert!(result.is_err(), "check constraint should reject rating 6");
    assert_eq!(rating_row_count(&pool, movie.id).await, 0);
}

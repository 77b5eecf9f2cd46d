use crate::common::{COMMENT_MAX_LENGTH, MemoryStore};
use engagement_api::{
    application::comments::use_case::CommentService,
    domain::shared::{errors::DomainError, pagination::PaginationRequest},
};
use std::sync::Arc;

fn service(store: &Arc<MemoryStore>) -> CommentService {
    CommentService::new(store.clone(), store.clone(), COMMENT_MAX_LENGTH)
}

#[tokio::test]
async fn comment_is_trimmed_and_attributed() {
    let store = MemoryStore::new();
    let comments = service(&store);
    let ana = store.seed_user("Ana");
    let material = store.seed_material(&ana, "Calculus");

    let view = comments
        .add_comment(material, "  Very helpful, thanks!  ", &ana)
        .await
        .unwrap();
    assert_eq!(view.content, "Very helpful, thanks!");
    assert_eq!(view.author, "Ana");
    assert_eq!(view.like_count, 0);
    assert_eq!(store.comment_rows(material), 1);
}

#[tokio::test]
async fn blank_or_oversized_content_is_rejected() {
    let store = MemoryStore::new();
    let comments = service(&store);
    let ana = store.seed_user("Ana");
    let material = store.seed_material(&ana, "Physics");

    let too_long = "x".repeat(COMMENT_MAX_LENGTH + 1);
    for content in ["", "   \n\t ", too_long.as_str()] {
        let result = comments.add_comment(material, content, &ana).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }
    assert_eq!(store.comment_rows(material), 0);

    let longest = "é".repeat(COMMENT_MAX_LENGTH);
    assert!(comments.add_comment(material, &longest, &ana).await.is_ok());
}

#[tokio::test]
async fn commenting_on_a_missing_material_is_not_found() {
    let store = MemoryStore::new();
    let comments = service(&store);
    let ana = store.seed_user("Ana");

    let result = comments.add_comment(99, "hello", &ana).await;
    assert!(matches!(result, Err(DomainError::NotFound(_))));
    assert_eq!(store.comment_rows(99), 0);
}

#[tokio::test]
async fn comments_page_newest_first() {
    let store = MemoryStore::new();
    let comments = service(&store);
    let ana = store.seed_user("Ana");
    let material = store.seed_material(&ana, "Statistics");
    let other = store.seed_material(&ana, "Other");

    for content in ["first", "second", "third"] {
        comments.add_comment(material, content, &ana).await.unwrap();
    }
    comments.add_comment(other, "elsewhere", &ana).await.unwrap();

    let page = comments
        .list_comments(material, PaginationRequest::new(2, 0))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    let contents: Vec<_> = page.items.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, ["third", "second"]);

    let rest = comments
        .list_comments(material, PaginationRequest::new(2, 2))
        .await
        .unwrap();
    assert_eq!(rest.items.len(), 1);
    assert_eq!(rest.items[0].content, "first");
    assert_eq!(rest.offset, 2);
}

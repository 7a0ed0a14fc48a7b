//! Client-facing read routes.
//!
//! Every handler takes one `current()` snapshot up front and answers from
//! it, so a reload landing mid-request cannot mix generations.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use parlo_content::Deck;

use crate::error::{AppError, Result};
use crate::handlers::{
    self, BookDetail, BookSummary, CourseBookDetail, CourseDetail, CourseSummary, DeckSummary,
    SearchQuery, SearchResponse,
};
use crate::AppState;

/// Create cloud routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cloud/books", get(list_books))
        .route("/cloud/books/{id}", get(get_book))
        .route("/cloud/courses", get(list_courses))
        .route("/cloud/courses/{id}", get(get_course))
        .route("/cloud/courses/{course_id}/books/{book_id}", get(get_course_book))
        .route("/cloud/decks", get(list_decks))
        .route("/cloud/decks/{id}", get(get_deck))
        .route("/cloud/search", get(search))
}

/// GET /cloud/books - List book summaries.
async fn list_books(State(state): State<AppState>) -> Json<Vec<BookSummary>> {
    Json(handlers::list_books(&state.store.current()))
}

/// GET /cloud/books/{id} - Hydrated book detail.
async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookDetail>> {
    handlers::get_book(&state.store.current(), &id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("book {id}")))
}

/// GET /cloud/courses - List course summaries.
async fn list_courses(State(state): State<AppState>) -> Json<Vec<CourseSummary>> {
    Json(handlers::list_courses(&state.store.current()))
}

/// GET /cloud/courses/{id} - Course detail with materialized slots.
async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CourseDetail>> {
    handlers::get_course(&state.store.current(), &id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("course {id}")))
}

/// GET /cloud/courses/{course_id}/books/{book_id} - One slot by alias id.
async fn get_course_book(
    State(state): State<AppState>,
    Path((course_id, book_id)): Path<(String, String)>,
) -> Result<Json<CourseBookDetail>> {
    handlers::get_course_book(&state.store.current(), &course_id, &book_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("book {book_id} in course {course_id}")))
}

/// GET /cloud/decks - List deck summaries.
async fn list_decks(State(state): State<AppState>) -> Json<Vec<DeckSummary>> {
    Json(handlers::list_decks(&state.store.current()))
}

/// GET /cloud/decks/{id} - Deck with cards.
async fn get_deck(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Deck>> {
    handlers::get_deck(&state.store.current(), &id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("deck {id}")))
}

/// GET /cloud/search?q= - Substring search over courses and their books.
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResponse> {
    Json(handlers::search(&state.store.current(), &query.q))
}

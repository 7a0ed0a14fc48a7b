//! Deck read handlers.

use parlo_content::{Deck, Library};
use serde::Serialize;

/// One row in the deck listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
    pub id: String,
    pub name: String,
    pub card_count: usize,
}

/// All decks in the active snapshot, in id order.
pub fn list_decks(library: &Library) -> Vec<DeckSummary> {
    library
        .decks
        .values()
        .map(|deck| DeckSummary {
            id: deck.id.clone(),
            name: deck.name.clone(),
            card_count: deck.cards.len(),
        })
        .collect()
}

/// One deck by id, cards included.
pub fn get_deck(library: &Library, id: &str) -> Option<Deck> {
    library.deck(id).cloned()
}

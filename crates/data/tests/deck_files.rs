use deckhand_core::{sort_cards, Category, DeckRegistry, DeckState, RngState};
use deckhand_data::{
    export_companion, export_full, import_deck, table_link, DeckFormat, TableConfig,
};

const FULL_DECK: &str = r#"[
  {"id":"sv1-1","name":"Potion","supertype":"Trainer","subtypes":["Item"],"number":"1",
   "set":{"id":"sv1","name":"Scarlet & Violet"}},
  {"id":"sv1-2","name":"Fire Energy","supertype":"Energy","subtypes":["Basic"],"number":"2",
   "set":{"id":"sv1","name":"Scarlet & Violet"},"images":{"small":"fe.png"}},
  {"id":"sv1-3","name":"Charmander","supertype":"Pokémon","subtypes":["Basic"],"types":["Fire"],
   "number":"3","set":{"id":"sv1","name":"Scarlet & Violet"},"images":{"small":"c.png","large":"C.png"},
   "tcgplayer":{"url":"x","updatedAt":"2024/01/01","prices":{"normal":{"low":0.1,"market":0.25},"holofoil":{"market":9.0}}},
   "rarity":"Common"},
  {"id":"sv1-3","name":"Charmander","supertype":"Pokémon","subtypes":["Basic"],"types":["Fire"],
   "number":"3","set":{"id":"sv1","name":"Scarlet & Violet"},"images":{"small":"c.png"},
   "tcgplayer":{"prices":{"normal":{"market":0.25}}}}
]"#;

#[test]
fn import_edit_and_export_keeps_unknown_fields() {
    let imported = import_deck(FULL_DECK).expect("import");
    assert_eq!(imported.format, DeckFormat::Full);

    let mut deck = DeckState::new();
    deck.replace_all(imported.cards);
    let stats = deck.stats();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.creatures, 2);
    assert!((stats.price - 0.5).abs() < 1e-9);
    assert!(!deck.is_playable());

    deck.sort();
    let names: Vec<_> = deck.cards().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Charmander", "Charmander", "Potion", "Fire Energy"]);

    let groups = deck.groups();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].count, 2);

    let text = export_full(deck.cards()).expect("export");
    assert!(text.contains("\"rarity\": \"Common\""));
    let again = import_deck(&text).expect("reimport");
    assert_eq!(again.cards, deck.cards());
}

#[test]
fn companion_round_trip_feeds_the_registry() {
    let imported = import_deck(FULL_DECK).expect("import");
    let mut cards = imported.cards;
    sort_cards(&mut cards);
    let text = export_companion("Fire", &cards, 42, &mut RngState::from_seed(9)).expect("export");

    let companion = import_deck(&text).expect("companion import");
    assert_eq!(companion.format, DeckFormat::Companion);
    assert_eq!(companion.name, "Fire");
    // The reduced layout drops categories.
    assert!(companion.cards.iter().all(|c| c.category == Category::default()));

    let mut registry = DeckRegistry::new();
    let idx = registry.add_deck(&companion.name, companion.cards);
    registry.set_main_cards(idx, &[0]).expect("main");
    let preview = registry.preview(idx).expect("preview");
    assert_eq!(preview.primary.name, "Charmander");
    assert_eq!(registry.total_price(), 0.0);
}

#[test]
fn tabletop_link_from_imported_deck() {
    let imported = import_deck(FULL_DECK).expect("import");
    let link = table_link(&imported.cards, &TableConfig::default()).expect("link");
    assert_eq!(link.card_count, 3);
    assert_eq!(link.skipped, 1);
    assert!(!link.oversized);
}

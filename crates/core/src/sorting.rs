use crate::{Card, Category};
use std::cmp::Ordering;

const UNRANKED: u8 = u8::MAX;

fn category_rank(category: &Category) -> u8 {
    match category {
        Category::Creature => 0,
        Category::Modifier => 1,
        Category::Resource => 2,
        Category::Unknown(_) => UNRANKED,
    }
}

/// Category-dependent sub-keys; unknown values land after every known one.
fn bucket_key(card: &Card) -> (u8, u8) {
    match card.category {
        Category::Creature => (
            card.primary_element().map_or(UNRANKED, |e| e as u8),
            card.stage().map_or(UNRANKED, |s| s as u8),
        ),
        Category::Modifier => (card.modifier_kind().map_or(UNRANKED, |k| k as u8), 0),
        Category::Resource => (card.resource_element().map_or(UNRANKED, |e| e as u8), 0),
        Category::Unknown(_) => (0, 0),
    }
}

/// Canonical display order: category, then the category's sub-keys, then
/// name (case-sensitive).
pub fn compare_cards(a: &Card, b: &Card) -> Ordering {
    category_rank(&a.category)
        .cmp(&category_rank(&b.category))
        .then_with(|| bucket_key(a).cmp(&bucket_key(b)))
        .then_with(|| a.name.cmp(&b.name))
}

pub fn sort_cards(cards: &mut [Card]) {
    cards.sort_by(compare_cards);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creature(name: &str, element: &str, stage: &str) -> Card {
        Card::new(name, Category::Creature)
            .with_types(&[element])
            .with_subtypes(&[stage])
    }

    fn modifier(name: &str, kind: &str) -> Card {
        Card::new(name, Category::Modifier).with_subtypes(&[kind])
    }

    fn basic_resource(name: &str) -> Card {
        Card::new(name, Category::Resource).with_subtypes(&["Basic"])
    }

    fn names(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn categories_sort_creature_modifier_resource_unknown() {
        let mut cards = vec![
            Card::new("Mystery", Category::Unknown("Token".into())),
            basic_resource("Fire Energy"),
            modifier("Potion", "Item"),
            creature("Charmander", "Fire", "Basic"),
        ];
        sort_cards(&mut cards);
        assert_eq!(
            names(&cards),
            vec!["Charmander", "Potion", "Fire Energy", "Mystery"]
        );
    }

    #[test]
    fn creatures_sort_by_element_then_stage_then_name() {
        let mut cards = vec![
            creature("Charmander", "Fire", "Basic"),
            creature("Charizard", "Fire", "Stage 2"),
            creature("Bulbasaur", "Grass", "Basic"),
            creature("Charmeleon", "Fire", "Stage 1"),
            creature("Hitmonlee", "Fighting", "Basic"),
            creature("Abra", "Psychic", "Basic"),
        ];
        sort_cards(&mut cards);
        assert_eq!(
            names(&cards),
            vec![
                "Bulbasaur",
                "Charizard",
                "Charmeleon",
                "Charmander",
                "Abra",
                "Hitmonlee"
            ]
        );
    }

    #[test]
    fn modifiers_sort_by_subtype_then_name() {
        let mut cards = vec![
            modifier("Town", "Stadium"),
            modifier("Rare Candy", "Item"),
            modifier("Professor", "Supporter"),
            modifier("Belt", "Pokémon Tool"),
            modifier("Oddity", "Technical Machine"),
            modifier("Boss", "Supporter"),
        ];
        sort_cards(&mut cards);
        assert_eq!(
            names(&cards),
            vec!["Boss", "Professor", "Rare Candy", "Belt", "Town", "Oddity"]
        );
    }

    #[test]
    fn resources_sort_by_element_of_basic_name() {
        let mut cards = vec![
            basic_resource("Water Energy"),
            Card::new("Double Turbo Energy", Category::Resource).with_subtypes(&["Special"]),
            basic_resource("Grass Energy"),
        ];
        sort_cards(&mut cards);
        assert_eq!(
            names(&cards),
            vec!["Grass Energy", "Water Energy", "Double Turbo Energy"]
        );
    }

    #[test]
    fn name_tie_break_is_case_sensitive() {
        let mut cards = vec![
            modifier("potion", "Item"),
            modifier("Potion", "Item"),
        ];
        sort_cards(&mut cards);
        assert_eq!(names(&cards), vec!["Potion", "potion"]);
    }

    #[test]
    fn equal_cards_keep_all_entries() {
        let mut cards = vec![
            creature("Pikachu", "Lightning", "Basic").with_number("25"),
            creature("Pikachu", "Lightning", "Basic").with_number("26"),
            creature("Pikachu", "Lightning", "Basic").with_number("25"),
        ];
        sort_cards(&mut cards);
        assert_eq!(cards.len(), 3);
        assert_eq!(compare_cards(&cards[0], &cards[1]), Ordering::Equal);
    }
}
